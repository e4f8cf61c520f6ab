/// DynamicBuffer - immutable storage rewritten through sub-range writes
///
/// Always created with `READ | WRITE | DYNAMIC`, never persistent. Meant to
/// be rewritten with `write_sub_range` between uses; mapping is for the
/// occasional bulk read or write and must be ended with `unmap`.

use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::buffer::{BufferKind, BufferResource, Mapping, StorageFlags, DYNAMIC_FLAGS};
use crate::device::SharedDevice;
use crate::error::Result;

const READ_WRITE: StorageFlags = StorageFlags::READ.union(StorageFlags::WRITE);

/// Sub-range writable device storage
#[derive(Debug)]
pub struct DynamicBuffer {
    resource: BufferResource,
}

impl DynamicBuffer {
    pub fn new(device: SharedDevice) -> Result<Self> {
        Ok(Self {
            resource: BufferResource::create(device, BufferKind::Dynamic)?,
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
        self.resource.initialize_array(size_bytes, DYNAMIC_FLAGS)
    }

    pub fn initialize_from_slice<T: Pod>(&mut self, data: &[T]) -> Result<()> {
        self.resource.initialize_from_slice(data, DYNAMIC_FLAGS)
    }

    pub fn initialize_value<T: Pod>(&mut self, value: &T) -> Result<()> {
        self.resource.initialize_value(value, DYNAMIC_FLAGS)
    }

    // ===== MAPPING SHORTHANDS =====

    pub fn map(&mut self) -> Result<Mapping> {
        self.resource.map_whole(READ_WRITE)
    }

    pub fn map_read(&mut self) -> Result<Mapping> {
        self.resource.map_whole(StorageFlags::READ)
    }

    pub fn map_write(&mut self) -> Result<Mapping> {
        self.resource.map_whole(StorageFlags::WRITE)
    }

    pub fn map_sub_range(&mut self, byte_offset: u64, byte_length: u64) -> Result<Mapping> {
        self.resource.map_range(byte_offset, byte_length, READ_WRITE)
    }

    pub fn map_read_sub_range(&mut self, byte_offset: u64, byte_length: u64) -> Result<Mapping> {
        self.resource.map_range(byte_offset, byte_length, StorageFlags::READ)
    }

    pub fn map_write_sub_range(&mut self, byte_offset: u64, byte_length: u64) -> Result<Mapping> {
        self.resource.map_range(byte_offset, byte_length, StorageFlags::WRITE)
    }

    /// Move the handle out, leaving this buffer empty
    pub fn take(&mut self) -> DynamicBuffer {
        Self { resource: self.resource.take() }
    }

    pub fn into_resource(self) -> BufferResource {
        self.resource
    }
}

impl Deref for DynamicBuffer {
    type Target = BufferResource;

    fn deref(&self) -> &BufferResource {
        &self.resource
    }
}

impl DerefMut for DynamicBuffer {
    fn deref_mut(&mut self) -> &mut BufferResource {
        &mut self.resource
    }
}

#[cfg(test)]
#[path = "dynamic_buffer_tests.rs"]
mod tests;
