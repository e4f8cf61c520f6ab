/// BufferResource - one device buffer, owned exclusively
///
/// Every buffer variant is a `BufferResource` tagged with a [`BufferKind`].
/// The resource validates each request against its byte length, its
/// creation flags, its map state and the rules of its kind before the
/// device sees it.
///
/// Failure policy:
/// - misuse (bounds, flags, double initialization, map state) panics after
///   logging an ERROR with file:line
/// - errors reported by the device come back as `Err`
///
/// Lifecycle: created empty (handle allocated, length 0), initialized once,
/// used, then released on drop. `reset()` returns it to the empty state
/// with a fresh handle.

use std::fmt;
use std::mem;
use std::sync::{Arc, MutexGuard};

use bytemuck::Pod;

use crate::buffer::{
    is_valid_creation_flag_set, is_valid_mapping_flag_set, BufferKind, ClearValue, MapState,
    Mapping, StorageFlags, StorageModel, UsageHint,
};
use crate::device::{BindTarget, BufferId, DeviceError, GraphicsDevice, SharedDevice};
use crate::error::{Error, Result};
use crate::{rt_bail, rt_debug, rt_error, rt_panic, rt_precondition, rt_trace, rt_warn};

const SOURCE: &str = "rt::BufferResource";

// ===== DEVICE ACCESS =====

fn lock(device: &SharedDevice) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device
        .lock()
        .map_err(|_| Error::BackendError("Graphics device mutex poisoned".to_string()))
}

/// Query the device error left by `operation` (skipped without error checks)
fn check(device: &mut dyn GraphicsDevice, operation: &'static str) -> Result<()> {
    if !device.config().error_checks {
        return Ok(());
    }
    match device.take_error() {
        DeviceError::NoError => Ok(()),
        code => {
            rt_error!(SOURCE, "[{}] {} after {}", device.config().label, code.as_str(), operation);
            Err(Error::from_device(operation, code))
        }
    }
}

// ===== BUFFER RESOURCE =====

/// Exclusively owned device buffer
///
/// Move-only; there is no `Clone`:
///
/// ```compile_fail
/// use render_tools::rt::buffer::BufferResource;
///
/// fn duplicate(buffer: &BufferResource) -> BufferResource {
///     buffer.clone()
/// }
/// ```
pub struct BufferResource {
    device: SharedDevice,
    id: BufferId,
    size: u64,
    kind: BufferKind,
    flags: StorageFlags,
    mapping: Option<Mapping>,
}

impl BufferResource {
    /// Allocate a device handle for an empty resource of `kind`
    pub(crate) fn create(device: SharedDevice, kind: BufferKind) -> Result<Self> {
        let id = {
            let mut guard = lock(&device)?;
            let id = guard.create_buffer();
            check(&mut *guard, "create_buffer")?;
            id
        };
        rt_trace!(SOURCE, "Created {} {}", kind.name(), id.raw());
        Ok(Self {
            device,
            id,
            size: 0,
            kind,
            flags: StorageFlags::empty(),
            mapping: None,
        })
    }

    // ===== ACCESSORS =====

    /// Device handle (null after `take`)
    pub fn id(&self) -> BufferId { self.id }

    /// Byte length (0 until initialized)
    pub fn size_bytes(&self) -> u64 { self.size }

    /// Capability tag
    pub fn kind(&self) -> BufferKind { self.kind }

    /// Flags recorded at creation (empty for mutable storage)
    pub fn storage_flags(&self) -> StorageFlags { self.flags }

    /// Device the buffer lives on
    pub fn device(&self) -> &SharedDevice { &self.device }

    /// Whether the resource owns a device handle
    pub fn is_valid(&self) -> bool { !self.id.is_null() }

    /// Whether storage has been allocated
    pub fn is_initialized(&self) -> bool { self.size > 0 }

    /// Whether size and flags are frozen at creation
    pub fn is_immutable(&self) -> bool {
        self.kind.rules().storage == StorageModel::Immutable
    }

    /// Current map state
    pub fn map_state(&self) -> MapState {
        match self.mapping {
            Some(mapping) => MapState::for_flags(mapping.flags()),
            None => MapState::Unmapped,
        }
    }

    /// Whether a mapping is active
    pub fn is_mapped(&self) -> bool { self.mapping.is_some() }

    /// The active mapping, if any
    pub fn current_mapping(&self) -> Option<Mapping> { self.mapping }

    /// Whether `[offset, offset + length)` lies inside the buffer
    pub fn bounds_check_bytes(&self, offset: u64, length: u64) -> bool {
        offset.checked_add(length).is_some_and(|end| end <= self.size)
    }

    /// Ask the device whether the handle still names a live buffer
    pub fn verify_id(&self) -> Result<bool> {
        Ok(lock(&self.device)?.is_buffer(self.id))
    }

    // ===== PRECONDITIONS =====

    fn require_initialized(&self, operation: &str) {
        rt_precondition!(self.is_initialized(), SOURCE,
            "{} on uninitialized {} {}", operation, self.kind.name(), self.id.raw());
    }

    fn require_range(&self, offset: u64, length: u64, operation: &str) {
        rt_precondition!(self.bounds_check_bytes(offset, length), SOURCE,
            "{}: range at offset {} with length {} exceeds buffer size {}",
            operation, offset, length, self.size);
    }

    /// Non-persistent mappings lock the buffer against device-side access
    fn require_unblocked(&self, operation: &str) {
        let blocked = self.mapping.is_some_and(|mapping| !mapping.is_persistent());
        rt_precondition!(!blocked, SOURCE,
            "{} while {} {} is mapped", operation, self.kind.name(), self.id.raw());
    }

    // ===== INITIALIZATION =====

    fn initialize_storage(&mut self, size: u64, data: Option<&[u8]>, flags: StorageFlags) -> Result<()> {
        let rules = self.kind.rules();
        rt_precondition!(rules.storage == StorageModel::Immutable, SOURCE,
            "{} storage is allocated by resizing", rules.name);
        rt_precondition!(self.is_valid(), SOURCE, "Initializing a {} without a handle", rules.name);
        rt_precondition!(!self.is_initialized(), SOURCE,
            "{} {} is already initialized", rules.name, self.id.raw());
        rt_precondition!(size > 0, SOURCE, "{} {} initialized with zero length", rules.name, self.id.raw());
        rt_precondition!(is_valid_creation_flag_set(flags), SOURCE,
            "Illegal creation flags {:?}: {}", flags,
            flags.creation_violation().map(|v| v.to_string()).unwrap_or_default());
        if let Some(fixed) = rules.fixed_flags {
            rt_precondition!(flags == fixed, SOURCE,
                "{} is always created with {:?}, got {:?}", rules.name, fixed, flags);
        }

        let mut device = lock(&self.device)?;
        device.buffer_storage(self.id, size, data, flags);
        check(&mut *device, "buffer_storage")?;
        self.size = size;
        self.flags = flags;
        rt_debug!(SOURCE, "{} {}: allocated {} bytes with {:?}", rules.name, self.id.raw(), size, flags);
        Ok(())
    }

    /// Allocate `size_bytes` of zeroed storage
    pub(crate) fn initialize_array(&mut self, size_bytes: u64, flags: StorageFlags) -> Result<()> {
        self.initialize_storage(size_bytes, None, flags)
    }

    /// Allocate storage holding a copy of `data`
    pub(crate) fn initialize_from_slice<T: Pod>(&mut self, data: &[T], flags: StorageFlags) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.initialize_storage(bytes.len() as u64, Some(bytes), flags)
    }

    /// Allocate storage holding a copy of `value`
    pub(crate) fn initialize_value<T: Pod>(&mut self, value: &T, flags: StorageFlags) -> Result<()> {
        let bytes = bytemuck::bytes_of(value);
        self.initialize_storage(bytes.len() as u64, Some(bytes), flags)
    }

    /// Orphan the current storage and allocate `size` bytes with `usage`
    pub(crate) fn reallocate(&mut self, size: u64, data: Option<&[u8]>, usage: UsageHint) -> Result<()> {
        let rules = self.kind.rules();
        rt_precondition!(rules.storage == StorageModel::Mutable, SOURCE,
            "{} storage cannot be reallocated", rules.name);
        rt_precondition!(self.is_valid(), SOURCE, "Resizing a {} without a handle", rules.name);
        rt_precondition!(size > 0, SOURCE, "{} {} resized to zero length", rules.name, self.id.raw());
        rt_precondition!(!self.is_mapped(), SOURCE,
            "{} {} resized while mapped", rules.name, self.id.raw());

        let mut device = lock(&self.device)?;
        device.buffer_data(self.id, size, data, usage);
        check(&mut *device, "buffer_data")?;
        rt_debug!(SOURCE, "{} {}: reallocated {} -> {} bytes ({})",
            rules.name, self.id.raw(), self.size, size, usage);
        self.size = size;
        Ok(())
    }

    /// Move the contents into a fresh handle allocated with `usage`
    ///
    /// The old handle is deleted, so every external binding becomes stale.
    pub(crate) fn respecify_with_copy(&mut self, usage: UsageHint) -> Result<()> {
        let rules = self.kind.rules();
        rt_precondition!(rules.storage == StorageModel::Mutable, SOURCE,
            "{} storage cannot be respecified", rules.name);
        self.require_initialized("change_usage_hint");
        rt_precondition!(!self.is_mapped(), SOURCE,
            "{} {} respecified while mapped", rules.name, self.id.raw());

        let mut device = lock(&self.device)?;
        let replacement = device.create_buffer();
        device.buffer_data(replacement, self.size, None, usage);
        if let Err(err) = check(&mut *device, "buffer_data") {
            device.delete_buffer(replacement);
            return Err(err);
        }
        device.copy_buffer_sub_data(self.id, replacement, 0, 0, self.size);
        if let Err(err) = check(&mut *device, "copy_buffer_sub_data") {
            device.delete_buffer(replacement);
            return Err(err);
        }
        device.delete_buffer(self.id);
        if let Err(err) = check(&mut *device, "delete_buffer") {
            device.delete_buffer(replacement);
            return Err(err);
        }
        rt_debug!(SOURCE, "{} {}: moved {} bytes to {} ({})",
            rules.name, self.id.raw(), self.size, replacement.raw(), usage);
        self.id = replacement;
        Ok(())
    }

    // ===== DATA TRANSFER =====

    /// Overwrite bytes starting at `byte_offset`
    ///
    /// Only storage created with `DYNAMIC` accepts sub-range writes.
    pub fn write_sub_range<T: Pod>(&mut self, data: &[T], byte_offset: u64) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.require_initialized("write_sub_range");
        let rules = self.kind.rules();
        rt_precondition!(rules.sub_range_writes && self.flags.contains(StorageFlags::DYNAMIC), SOURCE,
            "{} {} does not permit sub-range writes (flags {:?})",
            rules.name, self.id.raw(), self.flags);
        self.require_range(byte_offset, bytes.len() as u64, "write_sub_range");
        self.require_unblocked("write_sub_range");

        let mut device = lock(&self.device)?;
        device.buffer_sub_data(self.id, byte_offset, bytes);
        check(&mut *device, "buffer_sub_data")
    }

    /// Overwrite `size_of::<T>()` bytes at `byte_offset`
    pub fn write_value<T: Pod>(&mut self, value: &T, byte_offset: u64) -> Result<()> {
        self.write_sub_range(std::slice::from_ref(value), byte_offset)
    }

    /// Read `count` elements starting at `byte_offset`
    pub fn read_sub_range<T: Pod>(&self, count: usize, byte_offset: u64) -> Result<Vec<T>> {
        self.require_initialized("read_sub_range");
        let byte_length = count.checked_mul(std::mem::size_of::<T>()).map_or(u64::MAX, |len| len as u64);
        self.require_range(byte_offset, byte_length, "read_sub_range");
        let mut out = vec![T::zeroed(); count];
        self.read_into(&mut out, byte_offset)?;
        Ok(out)
    }

    /// Fill `out` with elements starting at `byte_offset`
    pub fn read_into<T: Pod>(&self, out: &mut [T], byte_offset: u64) -> Result<()> {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(out);
        self.require_initialized("read_sub_range");
        self.require_range(byte_offset, bytes.len() as u64, "read_sub_range");
        self.require_unblocked("read_sub_range");

        let mut device = lock(&self.device)?;
        device.get_buffer_sub_data(self.id, byte_offset, bytes);
        check(&mut *device, "get_buffer_sub_data")
    }

    /// Device-side copy of `length` bytes into `other`
    pub fn copy_to(
        &self,
        other: &mut BufferResource,
        length: u64,
        read_offset: u64,
        write_offset: u64,
    ) -> Result<()> {
        self.require_initialized("copy_to");
        other.require_initialized("copy_to");
        rt_precondition!(self.shares_device_with(other), SOURCE,
            "copy_to between buffers of different devices");
        self.require_range(read_offset, length, "copy_to (source)");
        other.require_range(write_offset, length, "copy_to (destination)");
        self.require_unblocked("copy_to");
        other.require_unblocked("copy_to");

        let mut device = lock(&self.device)?;
        device.copy_buffer_sub_data(self.id, other.id, read_offset, write_offset, length);
        check(&mut *device, "copy_buffer_sub_data")
    }

    /// Copy the whole buffer to the start of `other`
    pub fn copy_whole_to(&self, other: &mut BufferResource) -> Result<()> {
        rt_precondition!(other.size >= self.size, SOURCE,
            "copy_to destination holds {} bytes, source needs {}", other.size, self.size);
        self.copy_to(other, self.size, 0, 0)
    }

    fn shares_device_with(&self, other: &BufferResource) -> bool {
        // Compare data pointers only; vtable pointers may differ per codegen unit
        Arc::as_ptr(&self.device) as *const () == Arc::as_ptr(&other.device) as *const ()
    }

    /// Fill the whole buffer with `value`
    pub fn clear_to<T: ClearValue>(&mut self, value: T) -> Result<()> {
        self.require_initialized("clear_to");
        let width = mem::size_of::<T>() as u64;
        rt_precondition!(self.size % width == 0, SOURCE,
            "clear_to {}: buffer size {} is not a multiple of {}", T::FORMAT, self.size, width);
        self.require_unblocked("clear_to");

        let mut device = lock(&self.device)?;
        device.clear_buffer_data(self.id, bytemuck::bytes_of(&value));
        check(&mut *device, "clear_buffer_data")
    }

    /// Discard the contents of the whole buffer
    pub fn invalidate(&mut self) -> Result<()> {
        self.require_initialized("invalidate");
        self.require_unblocked("invalidate");

        let mut device = lock(&self.device)?;
        device.invalidate_buffer_data(self.id);
        check(&mut *device, "invalidate_buffer_data")
    }

    /// Discard the contents of a byte range
    pub fn invalidate_range(&mut self, byte_offset: u64, byte_length: u64) -> Result<()> {
        self.require_initialized("invalidate_range");
        self.require_range(byte_offset, byte_length, "invalidate_range");
        self.require_unblocked("invalidate_range");

        let mut device = lock(&self.device)?;
        device.invalidate_buffer_sub_data(self.id, byte_offset, byte_length);
        check(&mut *device, "invalidate_buffer_sub_data")
    }

    // ===== MAPPING =====

    /// Map the whole buffer
    pub fn map_whole(&mut self, flags: StorageFlags) -> Result<Mapping> {
        self.map_range(0, self.size, flags)
    }

    /// Map `byte_length` bytes starting at `byte_offset`
    ///
    /// `flags` must be a legal mapping set, must request READ or WRITE, and
    /// on immutable storage may only ask for access the buffer was created
    /// with.
    pub fn map_range(&mut self, byte_offset: u64, byte_length: u64, flags: StorageFlags) -> Result<Mapping> {
        self.require_initialized("map_range");
        let rules = self.kind.rules();
        rt_precondition!(is_valid_mapping_flag_set(flags), SOURCE,
            "Illegal mapping flags {:?}: {}", flags,
            flags.mapping_violation().map(|v| v.to_string()).unwrap_or_default());
        rt_precondition!(flags.any_of(StorageFlags::READ | StorageFlags::WRITE), SOURCE,
            "Mapping flags {:?} request neither READ nor WRITE", flags);
        rt_precondition!(!flags.any_of(rules.forbidden_map_flags), SOURCE,
            "{} cannot be mapped with {:?}", rules.name, flags & rules.forbidden_map_flags);
        if rules.storage == StorageModel::Immutable {
            rt_precondition!(self.flags.contains(flags & StorageFlags::ACCESS_MASK), SOURCE,
                "Mapping flags {:?} exceed creation flags {:?} of {} {}",
                flags, self.flags, rules.name, self.id.raw());
        }
        rt_precondition!(byte_length > 0, SOURCE, "map_range with zero length");
        self.require_range(byte_offset, byte_length, "map_range");
        rt_precondition!(self.mapping.is_none(), SOURCE,
            "{} {} is already mapped", rules.name, self.id.raw());

        let mut device = lock(&self.device)?;
        let ptr = device.map_buffer_range(self.id, byte_offset, byte_length, flags);
        check(&mut *device, "map_buffer_range")?;
        let Some(ptr) = ptr else {
            rt_bail!(SOURCE, "Device returned no mapping for {} {}", rules.name, self.id.raw());
        };

        let mapping = Mapping::new(ptr, byte_offset, byte_length, flags);
        self.mapping = Some(mapping);
        rt_trace!(SOURCE, "{} {}: mapped [{}, +{}) with {:?}",
            rules.name, self.id.raw(), byte_offset, byte_length, flags);
        Ok(mapping)
    }

    /// End the active mapping
    ///
    /// Returns `Ok(false)` when the device lost the mapped contents; the
    /// caller must upload them again.
    #[must_use = "unmap reports whether the mapped contents survived"]
    pub fn unmap(&mut self) -> Result<bool> {
        rt_precondition!(self.mapping.is_some(), SOURCE,
            "{} {} is not mapped", self.kind.name(), self.id.raw());

        let mut device = lock(&self.device)?;
        let intact = device.unmap_buffer(self.id);
        self.mapping = None;
        check(&mut *device, "unmap_buffer")?;
        if !intact {
            rt_warn!(SOURCE, "{} {}: mapped contents were lost, upload them again",
                self.kind.name(), self.id.raw());
        }
        Ok(intact)
    }

    /// Flush the whole active mapping
    pub fn flush(&self) -> Result<()> {
        let length = self.mapping.map_or(0, |mapping| mapping.len());
        self.flush_range(0, length)
    }

    /// Flush a range of the active mapping (`offset` relative to the mapping)
    pub fn flush_range(&self, offset: u64, length: u64) -> Result<()> {
        let Some(mapping) = self.mapping else {
            rt_panic!(SOURCE, "flush on unmapped {} {}", self.kind.name(), self.id.raw())
        };
        rt_precondition!(mapping.flags().contains(StorageFlags::FLUSH_EXPLICIT), SOURCE,
            "flush requires a FLUSH_EXPLICIT mapping, got {:?}", mapping.flags());
        rt_precondition!(offset.checked_add(length).is_some_and(|end| end <= mapping.len()), SOURCE,
            "flush range at offset {} with length {} exceeds mapping length {}",
            offset, length, mapping.len());

        let mut device = lock(&self.device)?;
        device.flush_mapped_buffer_range(self.id, offset, length);
        check(&mut *device, "flush_mapped_buffer_range")
    }

    /// Copy `data` into the active mapping at `offset` (relative to the mapping)
    pub fn write_mapped<T: Pod>(&mut self, offset: u64, data: &[T]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let mapping = self.require_mapped_range(offset, bytes.len() as u64, "write_mapped");
        rt_precondition!(mapping.is_writable(), SOURCE, "write_mapped through a mapping without WRITE");

        // Hold the device so no device-side access races the copy
        let _device = lock(&self.device)?;
        // SAFETY: the mapping is active and the range was checked against it
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), mapping.as_ptr().add(offset as usize), bytes.len());
        }
        Ok(())
    }

    /// Copy from the active mapping at `offset` (relative to the mapping) into `out`
    pub fn read_mapped<T: Pod>(&self, offset: u64, out: &mut [T]) -> Result<()> {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(out);
        let mapping = self.require_mapped_range(offset, bytes.len() as u64, "read_mapped");
        rt_precondition!(mapping.is_readable(), SOURCE, "read_mapped through a mapping without READ");

        let _device = lock(&self.device)?;
        // SAFETY: the mapping is active and the range was checked against it
        unsafe {
            std::ptr::copy_nonoverlapping(mapping.as_ptr().add(offset as usize), bytes.as_mut_ptr(), bytes.len());
        }
        Ok(())
    }

    fn require_mapped_range(&self, offset: u64, length: u64, operation: &str) -> Mapping {
        let Some(mapping) = self.mapping else {
            rt_panic!(SOURCE, "{} on unmapped {} {}", operation, self.kind.name(), self.id.raw())
        };
        rt_precondition!(offset.checked_add(length).is_some_and(|end| end <= mapping.len()), SOURCE,
            "{}: range at offset {} with length {} exceeds mapping length {}",
            operation, offset, length, mapping.len());
        mapping
    }

    // ===== BINDING =====

    /// Attach the whole buffer to uniform block binding `index`
    pub fn bind_uniform(&self, index: u32) -> Result<()> {
        self.bind(BindTarget::Uniform, index, None)
    }

    /// Attach a byte range to uniform block binding `index`
    pub fn bind_uniform_range(&self, index: u32, byte_offset: u64, byte_length: u64) -> Result<()> {
        self.bind(BindTarget::Uniform, index, Some((byte_offset, byte_length)))
    }

    /// Attach the whole buffer to shader storage binding `index`
    pub fn bind_storage(&self, index: u32) -> Result<()> {
        self.bind(BindTarget::ShaderStorage, index, None)
    }

    /// Attach a byte range to shader storage binding `index`
    pub fn bind_storage_range(&self, index: u32, byte_offset: u64, byte_length: u64) -> Result<()> {
        self.bind(BindTarget::ShaderStorage, index, Some((byte_offset, byte_length)))
    }

    fn bind(&self, target: BindTarget, index: u32, range: Option<(u64, u64)>) -> Result<()> {
        self.require_initialized("bind");
        if let Some((offset, length)) = range {
            rt_precondition!(length > 0, SOURCE, "bind range with zero length");
            self.require_range(offset, length, "bind");
        }

        let mut device = lock(&self.device)?;
        device.bind_buffer_range(target, index, self.id, range);
        check(&mut *device, "bind_buffer_range")
    }

    // ===== LIFETIME =====

    /// Release the handle and start over with a fresh, empty one
    ///
    /// Bindings and mappings held elsewhere become stale. Calling it twice
    /// is the same as calling it once.
    pub fn reset(&mut self) -> Result<()> {
        let mut device = lock(&self.device)?;
        if !self.id.is_null() {
            // Deleting also ends any mapping
            device.delete_buffer(self.id);
        }
        self.mapping = None;
        self.size = 0;
        self.flags = StorageFlags::empty();
        self.id = device.create_buffer();
        check(&mut *device, "reset")?;
        rt_trace!(SOURCE, "{} reset to handle {}", self.kind.name(), self.id.raw());
        Ok(())
    }

    /// Move the handle out, leaving this resource empty (null handle, length 0)
    pub fn take(&mut self) -> BufferResource {
        BufferResource {
            device: Arc::clone(&self.device),
            id: mem::replace(&mut self.id, BufferId::NULL),
            size: mem::take(&mut self.size),
            kind: self.kind,
            flags: mem::replace(&mut self.flags, StorageFlags::empty()),
            mapping: self.mapping.take(),
        }
    }
}

impl fmt::Debug for BufferResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferResource")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("flags", &self.flags)
            .field("map_state", &self.map_state())
            .finish()
    }
}

impl Drop for BufferResource {
    fn drop(&mut self) {
        if self.id.is_null() {
            return;
        }
        // Never panic here; a poisoned device is still released
        let mut device = match self.device.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        device.delete_buffer(self.id);
        if device.config().error_checks {
            let code = device.take_error();
            if code != DeviceError::NoError {
                rt_error!(SOURCE, "{} {}: {} while releasing",
                    self.kind.name(), self.id.raw(), code.as_str());
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "buffer_resource_tests.rs"]
mod tests;
