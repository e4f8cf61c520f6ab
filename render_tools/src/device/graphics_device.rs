/// GraphicsDevice trait - the raw device memory primitive
///
/// Buffers never talk to a driver directly; everything goes through this
/// trait. Calls do not return errors: like the native API, a failing call
/// records a sticky error code that `take_error` reports (and clears).

use std::ptr::NonNull;
use std::sync::{Arc, Mutex};

use crate::buffer::{StorageFlags, UsageHint};

// ============================================================================
// Common types
// ============================================================================

/// Device context shared by every buffer created on it
///
/// The device is not reentrant; each call locks it for its own duration.
pub type SharedDevice = Arc<Mutex<dyn GraphicsDevice>>;

/// Opaque device buffer name (`0` is the null name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BufferId(u32);

impl BufferId {
    /// The null name
    pub const NULL: BufferId = BufferId(0);

    /// Wrap a raw name
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw name
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is the null name
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Device error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceError {
    NoError,
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    OutOfMemory,
}

impl DeviceError {
    /// Name of the error code
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceError::NoError => "NO_ERROR",
            DeviceError::InvalidEnum => "INVALID_ENUM",
            DeviceError::InvalidValue => "INVALID_VALUE",
            DeviceError::InvalidOperation => "INVALID_OPERATION",
            DeviceError::OutOfMemory => "OUT_OF_MEMORY",
        }
    }
}

/// Indexed binding targets a buffer can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindTarget {
    /// Uniform block binding
    Uniform,
    /// Shader storage block binding
    ShaderStorage,
}

/// Device configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Name used in log messages
    pub label: String,
    /// Query the device error after every call and return it as `Err`
    pub error_checks: bool,
    /// Total bytes of buffer storage the device will hand out (`None` = unlimited)
    pub max_allocation_bytes: Option<u64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            label: "Render Tools Device".to_string(),
            error_checks: cfg!(debug_assertions),
            max_allocation_bytes: None,
        }
    }
}

/// Device statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Buffer names created
    pub buffers_created: u64,
    /// Buffer names deleted
    pub buffers_deleted: u64,
    /// Buffer names currently alive
    pub live_buffers: u64,
    /// Bytes of storage currently allocated
    pub bytes_allocated: u64,
    /// Storage allocations performed (immutable and mutable)
    pub allocations: u64,
    /// Explicit flushes performed
    pub flushes: u64,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Raw buffer primitive of a graphics device
///
/// Implemented by `SoftwareDevice` (host memory) and by hardware backends.
/// Offsets and sizes are in bytes.
pub trait GraphicsDevice: Send {
    /// Device configuration
    fn config(&self) -> &DeviceConfig;

    /// Device statistics
    fn stats(&self) -> DeviceStats;

    /// Create a new buffer name without storage
    fn create_buffer(&mut self) -> BufferId;

    /// Delete a buffer name, its storage, mapping and bindings
    fn delete_buffer(&mut self, id: BufferId);

    /// Whether `id` names a live buffer
    fn is_buffer(&self, id: BufferId) -> bool;

    /// Allocate immutable storage, optionally initialized from `data`
    fn buffer_storage(&mut self, id: BufferId, size: u64, data: Option<&[u8]>, flags: StorageFlags);

    /// (Re)allocate mutable storage, optionally initialized from `data`
    fn buffer_data(&mut self, id: BufferId, size: u64, data: Option<&[u8]>, usage: UsageHint);

    /// Overwrite a byte range
    fn buffer_sub_data(&mut self, id: BufferId, offset: u64, data: &[u8]);

    /// Read a byte range back into host memory
    fn get_buffer_sub_data(&mut self, id: BufferId, offset: u64, out: &mut [u8]);

    /// Device-side copy between two buffers
    fn copy_buffer_sub_data(
        &mut self,
        src: BufferId,
        dst: BufferId,
        read_offset: u64,
        write_offset: u64,
        size: u64,
    );

    /// Fill the whole buffer with a repeated pattern
    fn clear_buffer_data(&mut self, id: BufferId, pattern: &[u8]);

    /// Discard the whole buffer's contents
    fn invalidate_buffer_data(&mut self, id: BufferId);

    /// Discard a byte range's contents
    fn invalidate_buffer_sub_data(&mut self, id: BufferId, offset: u64, length: u64);

    /// Map a byte range; `None` on failure
    fn map_buffer_range(
        &mut self,
        id: BufferId,
        offset: u64,
        length: u64,
        flags: StorageFlags,
    ) -> Option<NonNull<u8>>;

    /// End the active mapping; false if the contents were lost while mapped
    fn unmap_buffer(&mut self, id: BufferId) -> bool;

    /// Make writes to a sub-range of the active mapping visible
    /// (`offset` is relative to the start of the mapping)
    fn flush_mapped_buffer_range(&mut self, id: BufferId, offset: u64, length: u64);

    /// Attach a buffer (or a byte range of it) to an indexed binding point;
    /// the null id detaches
    fn bind_buffer_range(&mut self, target: BindTarget, index: u32, id: BufferId, range: Option<(u64, u64)>);

    /// Report and clear the recorded error
    fn take_error(&mut self) -> DeviceError;
}

/// Name of the device's recorded error (clears it)
pub fn last_error_string(device: &mut dyn GraphicsDevice) -> &'static str {
    device.take_error().as_str()
}
