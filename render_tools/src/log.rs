//! Internal logging system for Render Tools
//!
//! This module provides a small logging facility with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - File and line information for detailed ERROR logs
//!
//! The active logger is registered process-wide on [`crate::rt::Toolkit`].

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use render_tools::rt::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "rt::Buffer", "rt::SoftwareDevice")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose information (per-call tracing)
    Trace,

    /// Allocation and reallocation events
    Debug,

    /// Important informational messages
    Info,

    /// Recoverable problems (e.g. lost mapping contents)
    Warn,

    /// Device errors and API misuse, with file:line details
    Error,
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry the way it is printed, without colors
    pub fn format_plain(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");
        let severity = match entry.severity {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        };
        match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity, entry.source, entry.message, file, line
            ),
            _ => format!("[{}] [{}] [{}] {}", timestamp, severity, entry.source, entry.message),
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            eprintln!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            eprintln!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! rt_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::rt::Toolkit::log(
            $crate::rt::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
///
/// # Example
///
/// ```no_run
/// render_tools::rt_debug!("rt::Buffer", "Allocated {} bytes", 256);
/// ```
#[macro_export]
macro_rules! rt_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::rt::Toolkit::log(
            $crate::rt::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! rt_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::rt::Toolkit::log(
            $crate::rt::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! rt_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::rt::Toolkit::log(
            $crate::rt::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! rt_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::rt::Toolkit::log_detailed(
            $crate::rt::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR and build an `Error::InvalidResource` with the same message
#[macro_export]
macro_rules! rt_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::rt::Toolkit::log_detailed(
            $crate::rt::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::rt::Error::InvalidResource(message)
    }};
}

/// Log an ERROR and return `Err(Error::InvalidResource)` from the current function
#[macro_export]
macro_rules! rt_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::rt_err!($source, $($arg)*))
    };
}

/// Report an API misuse: log an ERROR with file:line, then panic
///
/// Misuse is a caller bug, never a recoverable error.
#[macro_export]
macro_rules! rt_panic {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::rt::Toolkit::log_detailed(
            $crate::rt::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        panic!("{}", message)
    }};
}

/// Check an API precondition, reporting it through `rt_panic!` when it does not hold
#[macro_export]
macro_rules! rt_precondition {
    ($cond:expr, $source:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::rt_panic!($source, $($arg)*);
        }
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
