/// CoherentBuffer - persistently mapped, coherent storage
///
/// Always created with `READ | WRITE | PERSISTENT | COHERENT`; the caller
/// cannot pick other flags. Once mapped, the pointer stays valid while the
/// device keeps using the buffer, and traffic through it needs no flush.
/// Ordering against device work (fences, double buffering) is up to the
/// caller.

use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::buffer::{BufferKind, BufferResource, Mapping, StorageFlags, COHERENT_FLAGS};
use crate::device::SharedDevice;
use crate::error::Result;

const PERSISTENT_COHERENT: StorageFlags = StorageFlags::PERSISTENT.union(StorageFlags::COHERENT);

/// Persistent + coherent device storage
#[derive(Debug)]
pub struct CoherentBuffer {
    resource: BufferResource,
}

impl CoherentBuffer {
    /// Empty buffer: a handle without storage
    pub fn new(device: SharedDevice) -> Result<Self> {
        Ok(Self {
            resource: BufferResource::create(device, BufferKind::Coherent)?,
        })
    }

    /// Buffer of `size_bytes` zeroed bytes
    pub fn with_size(device: SharedDevice, size_bytes: u64) -> Result<Self> {
        let mut buffer = Self::new(device)?;
        buffer.initialize_array(size_bytes)?;
        Ok(buffer)
    }

    /// Buffer holding a copy of `data`
    pub fn from_slice<T: Pod>(device: SharedDevice, data: &[T]) -> Result<Self> {
        let mut buffer = Self::new(device)?;
        buffer.initialize_from_slice(data)?;
        Ok(buffer)
    }

    /// Buffer holding a copy of `value`
    pub fn from_value<T: Pod>(device: SharedDevice, value: &T) -> Result<Self> {
        let mut buffer = Self::new(device)?;
        buffer.initialize_value(value)?;
        Ok(buffer)
    }

    pub fn initialize_array(&mut self, size_bytes: u64) -> Result<()> {
        self.resource.initialize_array(size_bytes, COHERENT_FLAGS)
    }

    pub fn initialize_from_slice<T: Pod>(&mut self, data: &[T]) -> Result<()> {
        self.resource.initialize_from_slice(data, COHERENT_FLAGS)
    }

    pub fn initialize_value<T: Pod>(&mut self, value: &T) -> Result<()> {
        self.resource.initialize_value(value, COHERENT_FLAGS)
    }

    // ===== MAPPING SHORTHANDS =====

    /// Map everything for reading and writing
    pub fn map(&mut self) -> Result<Mapping> {
        self.resource.map_whole(COHERENT_FLAGS)
    }

    /// Map everything for reading
    pub fn map_read(&mut self) -> Result<Mapping> {
        self.resource.map_whole(StorageFlags::READ | PERSISTENT_COHERENT)
    }

    /// Map everything for writing
    pub fn map_write(&mut self) -> Result<Mapping> {
        self.resource.map_whole(StorageFlags::WRITE | PERSISTENT_COHERENT)
    }

    /// Map a byte range for reading and writing
    pub fn map_sub_range(&mut self, byte_offset: u64, byte_length: u64) -> Result<Mapping> {
        self.resource.map_range(byte_offset, byte_length, COHERENT_FLAGS)
    }

    /// Map a byte range for reading
    pub fn map_read_sub_range(&mut self, byte_offset: u64, byte_length: u64) -> Result<Mapping> {
        self.resource.map_range(byte_offset, byte_length, StorageFlags::READ | PERSISTENT_COHERENT)
    }

    /// Map a byte range for writing
    pub fn map_write_sub_range(&mut self, byte_offset: u64, byte_length: u64) -> Result<Mapping> {
        self.resource.map_range(byte_offset, byte_length, StorageFlags::WRITE | PERSISTENT_COHERENT)
    }

    /// Move the handle out, leaving this buffer empty
    pub fn take(&mut self) -> CoherentBuffer {
        Self { resource: self.resource.take() }
    }

    pub fn into_resource(self) -> BufferResource {
        self.resource
    }
}

impl Deref for CoherentBuffer {
    type Target = BufferResource;

    fn deref(&self) -> &BufferResource {
        &self.resource
    }
}

impl DerefMut for CoherentBuffer {
    fn deref_mut(&mut self) -> &mut BufferResource {
        &mut self.resource
    }
}

#[cfg(test)]
#[path = "coherent_buffer_tests.rs"]
mod tests;
