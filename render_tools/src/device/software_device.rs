/// Software device - host-memory implementation of GraphicsDevice
///
/// Every buffer is backed by a zeroed, 64-byte aligned host allocation and
/// validated with the same rules a driver applies: a call that breaks them
/// records an error code and leaves the buffer untouched. Used by tests
/// (no GPU required) and by tools that need buffer semantics off-GPU.

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use rustc_hash::FxHashMap;

use crate::buffer::{is_valid_creation_flag_set, is_valid_mapping_flag_set, StorageFlags, UsageHint};
use crate::device::{
    BindTarget, BufferId, DeviceConfig, DeviceError, DeviceStats, GraphicsDevice,
};
use crate::utils::IdAllocator;

const SOURCE: &str = "rt::SoftwareDevice";

/// Alignment of every allocation (and so of every whole-buffer mapping)
pub const MAP_ALIGNMENT: usize = 64;

// ============================================================================
// Device memory
// ============================================================================

/// Host allocation standing in for device memory
///
/// Accessed only through raw copies so that pointers handed out by
/// `map_buffer_range` stay valid while the device keeps working on it.
struct DeviceMemory {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: the allocation is owned exclusively by one buffer object of one
// device; all access is serialized by the device's owner.
unsafe impl Send for DeviceMemory {}

impl DeviceMemory {
    fn zeroed(len: usize) -> Option<Self> {
        if len == 0 {
            return Some(Self { ptr: NonNull::dangling(), len: 0 });
        }
        let layout = Layout::from_size_align(len, MAP_ALIGNMENT).ok()?;
        // SAFETY: layout has a non-zero size
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        NonNull::new(raw).map(|ptr| Self { ptr, len })
    }

    /// Pointer to `offset`; callers validate `offset <= len`
    fn at(&self, offset: u64) -> *mut u8 {
        debug_assert!(offset as usize <= self.len);
        // SAFETY: offset is within (or one past) the allocation
        unsafe { self.ptr.as_ptr().add(offset as usize) }
    }

    fn write(&mut self, offset: u64, data: &[u8]) {
        // SAFETY: callers validate offset + data.len() <= len
        unsafe { ptr::copy_nonoverlapping(data.as_ptr(), self.at(offset), data.len()) }
    }

    fn read(&self, offset: u64, out: &mut [u8]) {
        // SAFETY: callers validate offset + out.len() <= len
        unsafe { ptr::copy_nonoverlapping(self.at(offset), out.as_mut_ptr(), out.len()) }
    }

    fn zero(&mut self, offset: u64, length: u64) {
        // SAFETY: callers validate offset + length <= len
        unsafe { ptr::write_bytes(self.at(offset), 0, length as usize) }
    }
}

impl Drop for DeviceMemory {
    fn drop(&mut self) {
        if self.len == 0 {
            return;
        }
        if let Ok(layout) = Layout::from_size_align(self.len, MAP_ALIGNMENT) {
            // SAFETY: allocated in `zeroed` with this exact layout
            unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) }
        }
    }
}

// ============================================================================
// Buffer objects
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Storage {
    Immutable(StorageFlags),
    Mutable(UsageHint),
}

#[derive(Debug, Clone, Copy)]
struct ActiveMap {
    length: u64,
    flags: StorageFlags,
}

#[derive(Default)]
struct BufferObject {
    storage: Option<Storage>,
    memory: Option<DeviceMemory>,
    mapping: Option<ActiveMap>,
}

impl BufferObject {
    fn size(&self) -> u64 {
        self.memory.as_ref().map_or(0, |memory| memory.len as u64)
    }

    fn contains(&self, offset: u64, length: u64) -> bool {
        offset.checked_add(length).is_some_and(|end| end <= self.size())
    }

    /// Non-persistent mappings lock the buffer against every other access
    fn blocks_access(&self) -> bool {
        self.mapping.is_some_and(|map| !map.flags.contains(StorageFlags::PERSISTENT))
    }
}

/// Buffer attached to an indexed binding point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferBinding {
    pub id: BufferId,
    /// `(offset, length)` for range bindings, `None` for the whole buffer
    pub range: Option<(u64, u64)>,
}

// ============================================================================
// SoftwareDevice
// ============================================================================

/// In-memory graphics device
pub struct SoftwareDevice {
    config: DeviceConfig,
    ids: IdAllocator,
    buffers: FxHashMap<u32, BufferObject>,
    bindings: FxHashMap<(BindTarget, u32), BufferBinding>,
    error: DeviceError,
    corrupt_next_unmap: bool,
    stats: DeviceStats,
}

impl SoftwareDevice {
    /// Create a device with no buffers
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            ids: IdAllocator::new(),
            buffers: FxHashMap::default(),
            bindings: FxHashMap::default(),
            error: DeviceError::NoError,
            corrupt_next_unmap: false,
            stats: DeviceStats::default(),
        }
    }

    /// Make the next successful unmap report that the contents were lost
    pub fn corrupt_next_unmap(&mut self) {
        self.corrupt_next_unmap = true;
    }

    /// Buffer attached to an indexed binding point
    pub fn binding(&self, target: BindTarget, index: u32) -> Option<BufferBinding> {
        self.bindings.get(&(target, index)).copied()
    }

    /// Size of a buffer's storage (`None` for unknown names)
    pub fn buffer_size(&self, id: BufferId) -> Option<u64> {
        self.buffers.get(&id.raw()).map(BufferObject::size)
    }

    /// Creation flags of immutable storage
    pub fn storage_flags(&self, id: BufferId) -> Option<StorageFlags> {
        match self.buffers.get(&id.raw())?.storage? {
            Storage::Immutable(flags) => Some(flags),
            Storage::Mutable(_) => None,
        }
    }

    /// Usage hint of mutable storage
    pub fn usage_hint(&self, id: BufferId) -> Option<UsageHint> {
        match self.buffers.get(&id.raw())?.storage? {
            Storage::Mutable(usage) => Some(usage),
            Storage::Immutable(_) => None,
        }
    }

    /// Whether a buffer currently has an active mapping
    pub fn is_mapped(&self, id: BufferId) -> bool {
        self.buffers.get(&id.raw()).is_some_and(|buffer| buffer.mapping.is_some())
    }

    /// Record an error; the first one sticks until taken
    fn fail(&mut self, error: DeviceError, message: &str) {
        crate::rt_debug!(SOURCE, "[{}] {}: {}", self.config.label, error.as_str(), message);
        if self.error == DeviceError::NoError {
            self.error = error;
        }
    }

    fn within_budget(&self, released: u64, requested: u64) -> bool {
        match self.config.max_allocation_bytes {
            Some(max) => (self.stats.bytes_allocated - released)
                .checked_add(requested)
                .is_some_and(|total| total <= max),
            None => true,
        }
    }

    /// Allocate `size` bytes, optionally copied from `data`, within the budget
    fn allocate(&mut self, released: u64, size: u64, data: Option<&[u8]>) -> Option<DeviceMemory> {
        if !self.within_budget(released, size) {
            self.fail(DeviceError::OutOfMemory, "allocation exceeds device budget");
            return None;
        }
        let memory = usize::try_from(size).ok().and_then(DeviceMemory::zeroed);
        let Some(mut memory) = memory else {
            self.fail(DeviceError::OutOfMemory, "host allocation failed");
            return None;
        };
        if let Some(data) = data {
            memory.write(0, data);
        }
        self.stats.bytes_allocated = self.stats.bytes_allocated - released + size;
        self.stats.allocations += 1;
        Some(memory)
    }
}

impl GraphicsDevice for SoftwareDevice {
    fn config(&self) -> &DeviceConfig {
        &self.config
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = self.ids.alloc();
        self.buffers.insert(id, BufferObject::default());
        self.stats.buffers_created += 1;
        self.stats.live_buffers += 1;
        BufferId::from_raw(id)
    }

    fn delete_buffer(&mut self, id: BufferId) {
        // Unknown names are silently ignored
        let Some(buffer) = self.buffers.remove(&id.raw()) else { return };
        self.stats.bytes_allocated -= buffer.size();
        self.stats.buffers_deleted += 1;
        self.stats.live_buffers -= 1;
        self.ids.release(id.raw());
        self.bindings.retain(|_, binding| binding.id != id);
    }

    fn is_buffer(&self, id: BufferId) -> bool {
        self.buffers.contains_key(&id.raw())
    }

    fn buffer_storage(&mut self, id: BufferId, size: u64, data: Option<&[u8]>, flags: StorageFlags) {
        if !is_valid_creation_flag_set(flags) {
            return self.fail(DeviceError::InvalidValue, "illegal storage flags");
        }
        if size == 0 || data.is_some_and(|data| data.len() as u64 != size) {
            return self.fail(DeviceError::InvalidValue, "storage size does not match data");
        }
        let Some(buffer) = self.buffers.get(&id.raw()) else {
            return self.fail(DeviceError::InvalidOperation, "buffer_storage on unknown buffer");
        };
        if matches!(buffer.storage, Some(Storage::Immutable(_))) {
            return self.fail(DeviceError::InvalidOperation, "storage is already immutable");
        }
        let released = buffer.size();
        let Some(memory) = self.allocate(released, size, data) else { return };
        if let Some(buffer) = self.buffers.get_mut(&id.raw()) {
            buffer.storage = Some(Storage::Immutable(flags));
            buffer.memory = Some(memory);
            buffer.mapping = None;
        }
    }

    fn buffer_data(&mut self, id: BufferId, size: u64, data: Option<&[u8]>, usage: UsageHint) {
        if data.is_some_and(|data| data.len() as u64 != size) {
            return self.fail(DeviceError::InvalidValue, "data length does not match size");
        }
        let Some(buffer) = self.buffers.get(&id.raw()) else {
            return self.fail(DeviceError::InvalidOperation, "buffer_data on unknown buffer");
        };
        if matches!(buffer.storage, Some(Storage::Immutable(_))) {
            return self.fail(DeviceError::InvalidOperation, "cannot respecify immutable storage");
        }
        let released = buffer.size();
        let Some(memory) = self.allocate(released, size, data) else { return };
        if let Some(buffer) = self.buffers.get_mut(&id.raw()) {
            buffer.storage = Some(Storage::Mutable(usage));
            buffer.memory = Some(memory);
            // Respecifying storage implicitly unmaps
            buffer.mapping = None;
        }
    }

    fn buffer_sub_data(&mut self, id: BufferId, offset: u64, data: &[u8]) {
        let Some(buffer) = self.buffers.get_mut(&id.raw()) else {
            return self.fail(DeviceError::InvalidOperation, "buffer_sub_data on unknown buffer");
        };
        if !buffer.contains(offset, data.len() as u64) {
            return self.fail(DeviceError::InvalidValue, "sub data range out of bounds");
        }
        if let Some(Storage::Immutable(flags)) = buffer.storage {
            if !flags.contains(StorageFlags::DYNAMIC) {
                return self.fail(DeviceError::InvalidOperation, "storage is not DYNAMIC");
            }
        }
        if buffer.blocks_access() {
            return self.fail(DeviceError::InvalidOperation, "buffer is mapped");
        }
        if let Some(memory) = buffer.memory.as_mut() {
            memory.write(offset, data);
        }
    }

    fn get_buffer_sub_data(&mut self, id: BufferId, offset: u64, out: &mut [u8]) {
        let Some(buffer) = self.buffers.get(&id.raw()) else {
            return self.fail(DeviceError::InvalidOperation, "get_buffer_sub_data on unknown buffer");
        };
        if !buffer.contains(offset, out.len() as u64) {
            return self.fail(DeviceError::InvalidValue, "read range out of bounds");
        }
        if buffer.blocks_access() {
            return self.fail(DeviceError::InvalidOperation, "buffer is mapped");
        }
        if let Some(memory) = buffer.memory.as_ref() {
            memory.read(offset, out);
        }
    }

    fn copy_buffer_sub_data(
        &mut self,
        src: BufferId,
        dst: BufferId,
        read_offset: u64,
        write_offset: u64,
        size: u64,
    ) {
        let (Some(source), Some(target)) = (self.buffers.get(&src.raw()), self.buffers.get(&dst.raw())) else {
            return self.fail(DeviceError::InvalidOperation, "copy between unknown buffers");
        };
        if !source.contains(read_offset, size) || !target.contains(write_offset, size) {
            return self.fail(DeviceError::InvalidValue, "copy range out of bounds");
        }
        if src == dst && read_offset.abs_diff(write_offset) < size {
            return self.fail(DeviceError::InvalidValue, "overlapping copy within one buffer");
        }
        if source.blocks_access() || target.blocks_access() {
            return self.fail(DeviceError::InvalidOperation, "copy involves a mapped buffer");
        }
        if size == 0 {
            return;
        }
        if let (Some(from), Some(to)) = (source.memory.as_ref(), target.memory.as_ref()) {
            // SAFETY: both ranges were validated against their allocations
            unsafe { ptr::copy(from.at(read_offset), to.at(write_offset), size as usize) }
        }
    }

    fn clear_buffer_data(&mut self, id: BufferId, pattern: &[u8]) {
        let Some(buffer) = self.buffers.get_mut(&id.raw()) else {
            return self.fail(DeviceError::InvalidOperation, "clear on unknown buffer");
        };
        if pattern.is_empty() || buffer.size() % pattern.len() as u64 != 0 {
            return self.fail(DeviceError::InvalidValue, "size is not a multiple of the clear value");
        }
        if buffer.blocks_access() {
            return self.fail(DeviceError::InvalidOperation, "buffer is mapped");
        }
        if let Some(memory) = buffer.memory.as_mut() {
            let mut offset = 0;
            while offset < memory.len as u64 {
                memory.write(offset, pattern);
                offset += pattern.len() as u64;
            }
        }
    }

    fn invalidate_buffer_data(&mut self, id: BufferId) {
        let Some(buffer) = self.buffers.get_mut(&id.raw()) else {
            return self.fail(DeviceError::InvalidValue, "invalidate on unknown buffer");
        };
        if buffer.blocks_access() {
            return self.fail(DeviceError::InvalidOperation, "buffer is mapped");
        }
        let size = buffer.size();
        if let Some(memory) = buffer.memory.as_mut() {
            memory.zero(0, size);
        }
    }

    fn invalidate_buffer_sub_data(&mut self, id: BufferId, offset: u64, length: u64) {
        let Some(buffer) = self.buffers.get_mut(&id.raw()) else {
            return self.fail(DeviceError::InvalidValue, "invalidate on unknown buffer");
        };
        if !buffer.contains(offset, length) {
            return self.fail(DeviceError::InvalidValue, "invalidate range out of bounds");
        }
        if buffer.blocks_access() {
            return self.fail(DeviceError::InvalidOperation, "buffer is mapped");
        }
        if let Some(memory) = buffer.memory.as_mut() {
            memory.zero(offset, length);
        }
    }

    fn map_buffer_range(
        &mut self,
        id: BufferId,
        offset: u64,
        length: u64,
        flags: StorageFlags,
    ) -> Option<NonNull<u8>> {
        let Some(buffer) = self.buffers.get_mut(&id.raw()) else {
            self.fail(DeviceError::InvalidOperation, "map on unknown buffer");
            return None;
        };
        if length == 0 || !buffer.contains(offset, length) {
            self.fail(DeviceError::InvalidValue, "map range out of bounds");
            return None;
        }
        if buffer.mapping.is_some() {
            self.fail(DeviceError::InvalidOperation, "buffer is already mapped");
            return None;
        }
        if !flags.any_of(StorageFlags::READ | StorageFlags::WRITE) || !is_valid_mapping_flag_set(flags) {
            self.fail(DeviceError::InvalidOperation, "illegal mapping flags");
            return None;
        }
        let permitted = match buffer.storage {
            Some(Storage::Immutable(created)) => created.contains(flags & StorageFlags::ACCESS_MASK),
            Some(Storage::Mutable(_)) => {
                !flags.any_of(StorageFlags::PERSISTENT | StorageFlags::COHERENT)
            }
            None => false,
        };
        if !permitted {
            self.fail(DeviceError::InvalidOperation, "mapping flags exceed storage flags");
            return None;
        }
        let size = buffer.size();
        let memory = buffer.memory.as_mut()?;
        if flags.contains(StorageFlags::INVALIDATE_BUFFER) {
            memory.zero(0, size);
        } else if flags.contains(StorageFlags::INVALIDATE_RANGE) {
            memory.zero(offset, length);
        }
        let ptr = NonNull::new(memory.at(offset))?;
        buffer.mapping = Some(ActiveMap { length, flags });
        Some(ptr)
    }

    fn unmap_buffer(&mut self, id: BufferId) -> bool {
        let Some(buffer) = self.buffers.get_mut(&id.raw()) else {
            self.fail(DeviceError::InvalidOperation, "unmap on unknown buffer");
            return false;
        };
        if buffer.mapping.take().is_none() {
            self.fail(DeviceError::InvalidOperation, "buffer is not mapped");
            return false;
        }
        !std::mem::take(&mut self.corrupt_next_unmap)
    }

    fn flush_mapped_buffer_range(&mut self, id: BufferId, offset: u64, length: u64) {
        let Some(buffer) = self.buffers.get(&id.raw()) else {
            return self.fail(DeviceError::InvalidOperation, "flush on unknown buffer");
        };
        let Some(mapping) = buffer.mapping else {
            return self.fail(DeviceError::InvalidOperation, "flush without a mapping");
        };
        if !mapping.flags.contains(StorageFlags::FLUSH_EXPLICIT) {
            return self.fail(DeviceError::InvalidOperation, "mapping is not FLUSH_EXPLICIT");
        }
        if !offset.checked_add(length).is_some_and(|end| end <= mapping.length) {
            return self.fail(DeviceError::InvalidValue, "flush range outside the mapping");
        }
        self.stats.flushes += 1;
    }

    fn bind_buffer_range(&mut self, target: BindTarget, index: u32, id: BufferId, range: Option<(u64, u64)>) {
        if id.is_null() {
            self.bindings.remove(&(target, index));
            return;
        }
        let Some(buffer) = self.buffers.get(&id.raw()) else {
            return self.fail(DeviceError::InvalidValue, "bind of unknown buffer");
        };
        if let Some((offset, length)) = range {
            if length == 0 || !buffer.contains(offset, length) {
                return self.fail(DeviceError::InvalidValue, "binding range out of bounds");
            }
        }
        self.bindings.insert((target, index), BufferBinding { id, range });
    }

    fn take_error(&mut self) -> DeviceError {
        std::mem::replace(&mut self.error, DeviceError::NoError)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "software_device_tests.rs"]
mod tests;
