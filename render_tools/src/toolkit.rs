/// Render Tools - process-wide services
///
/// Holds the logger registry and the device factory. Devices themselves are
/// never stored here: every buffer carries the `SharedDevice` it was created
/// on, so independent devices never share state.

use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::SystemTime;

use crate::device::{DeviceConfig, SharedDevice, SoftwareDevice};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== PUBLIC API =====

/// Entry point for process-wide services
pub struct Toolkit;

impl Toolkit {
    /// Create a new in-memory device and wrap it for sharing between buffers
    ///
    /// # Example
    ///
    /// ```no_run
    /// use render_tools::rt::Toolkit;
    /// use render_tools::rt::device::DeviceConfig;
    ///
    /// let device = Toolkit::create_software_device(DeviceConfig::default());
    /// ```
    pub fn create_software_device(config: DeviceConfig) -> SharedDevice {
        crate::rt_info!("rt::Toolkit", "Creating software device '{}' (error checks: {})",
            config.label, config.error_checks);
        Arc::new(Mutex::new(SoftwareDevice::new(config)))
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger, test capture, etc.)
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like rt_info!, rt_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by rt_error!, rt_err! and rt_precondition! to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}
