/// Mapping descriptors and map state

use std::ptr::NonNull;

use crate::buffer::StorageFlags;

/// Mapping state of a buffer resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// No mapping is active
    Unmapped,
    /// A mapping without WRITE is active
    MappedRead,
    /// A mapping with WRITE is active
    MappedReadWrite,
}

impl MapState {
    pub(crate) fn for_flags(flags: StorageFlags) -> Self {
        if flags.contains(StorageFlags::WRITE) {
            MapState::MappedReadWrite
        } else {
            MapState::MappedRead
        }
    }
}

/// Active mapping of a byte range of a buffer
///
/// The pointer stays valid until the owning buffer is unmapped, reset,
/// reallocated or dropped. Prefer `BufferResource::write_mapped` and
/// `BufferResource::read_mapped`, which check the mapping is still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    ptr: NonNull<u8>,
    offset: u64,
    len: u64,
    flags: StorageFlags,
}

// SAFETY: the pointer addresses device memory owned by the device behind
// its mutex, not memory owned by the thread that created the mapping.
unsafe impl Send for Mapping {}

impl Mapping {
    pub(crate) fn new(ptr: NonNull<u8>, offset: u64, len: u64, flags: StorageFlags) -> Self {
        Self { ptr, offset, len, flags }
    }

    /// First mapped byte
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Byte offset of the mapping within the buffer
    pub fn offset(&self) -> u64 { self.offset }

    /// Mapped length in bytes
    pub fn len(&self) -> u64 { self.len }

    /// Whether the mapping covers no bytes (never true for a live mapping)
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Flags the mapping was requested with
    pub fn flags(&self) -> StorageFlags { self.flags }

    /// Whether the mapping may be read
    pub fn is_readable(&self) -> bool {
        self.flags.contains(StorageFlags::READ)
    }

    /// Whether the mapping may be written
    pub fn is_writable(&self) -> bool {
        self.flags.contains(StorageFlags::WRITE)
    }

    /// Whether the mapping survives device use of the buffer
    pub fn is_persistent(&self) -> bool {
        self.flags.contains(StorageFlags::PERSISTENT)
    }

    /// View the mapped bytes
    ///
    /// # Safety
    ///
    /// - The buffer must still be mapped with this mapping
    /// - No synchronization with device writes; caller must fence
    /// - No other live `&mut` view may alias the range
    pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
        std::slice::from_raw_parts(self.ptr.as_ptr(), self.len as usize)
    }

    /// Mutable view of the mapped bytes
    ///
    /// # Safety
    ///
    /// Same as [`Mapping::as_slice`], and the mapping must be writable.
    pub unsafe fn as_mut_slice<'a>(&self) -> &'a mut [u8] {
        std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len as usize)
    }
}
