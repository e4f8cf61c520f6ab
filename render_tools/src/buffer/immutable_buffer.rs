/// ImmutableBuffer - storage whose size and access contract are frozen
///
/// The creation flags chosen by the caller are recorded once. Every later
/// mapping is checked against them, and nothing can widen them.

use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::buffer::{BufferKind, BufferResource, StorageFlags};
use crate::device::SharedDevice;
use crate::error::Result;

/// Immutable device storage with caller-chosen creation flags
#[derive(Debug)]
pub struct ImmutableBuffer {
    resource: BufferResource,
}

impl ImmutableBuffer {
    /// Empty buffer: a handle without storage
    pub fn new(device: SharedDevice) -> Result<Self> {
        Ok(Self {
            resource: BufferResource::create(device, BufferKind::Immutable)?,
        })
    }

    /// Buffer of `size_bytes` zeroed bytes
    ///
    /// # Example
    ///
    /// ```
    /// use render_tools::rt::Toolkit;
    /// use render_tools::rt::buffer::{ImmutableBuffer, StorageFlags};
    /// use render_tools::rt::device::DeviceConfig;
    ///
    /// let device = Toolkit::create_software_device(DeviceConfig::default());
    /// let buffer = ImmutableBuffer::with_size(device, 256, StorageFlags::READ | StorageFlags::WRITE)?;
    /// assert_eq!(buffer.size_bytes(), 256);
    /// # Ok::<(), render_tools::rt::Error>(())
    /// ```
    pub fn with_size(device: SharedDevice, size_bytes: u64, flags: StorageFlags) -> Result<Self> {
        let mut buffer = Self::new(device)?;
        buffer.initialize_array(size_bytes, flags)?;
        Ok(buffer)
    }

    /// Buffer holding a copy of `data`
    pub fn from_slice<T: Pod>(device: SharedDevice, data: &[T], flags: StorageFlags) -> Result<Self> {
        let mut buffer = Self::new(device)?;
        buffer.initialize_from_slice(data, flags)?;
        Ok(buffer)
    }

    /// Buffer holding a copy of `value`
    pub fn from_value<T: Pod>(device: SharedDevice, value: &T, flags: StorageFlags) -> Result<Self> {
        let mut buffer = Self::new(device)?;
        buffer.initialize_value(value, flags)?;
        Ok(buffer)
    }

    /// Allocate `size_bytes` zeroed bytes (once)
    pub fn initialize_array(&mut self, size_bytes: u64, flags: StorageFlags) -> Result<()> {
        self.resource.initialize_array(size_bytes, flags)
    }

    /// Allocate storage holding a copy of `data` (once)
    pub fn initialize_from_slice<T: Pod>(&mut self, data: &[T], flags: StorageFlags) -> Result<()> {
        self.resource.initialize_from_slice(data, flags)
    }

    /// Allocate storage holding a copy of `value` (once)
    pub fn initialize_value<T: Pod>(&mut self, value: &T, flags: StorageFlags) -> Result<()> {
        self.resource.initialize_value(value, flags)
    }

    /// Flags recorded at creation
    pub fn flags(&self) -> StorageFlags {
        self.resource.storage_flags()
    }

    /// Move the handle out, leaving this buffer empty
    pub fn take(&mut self) -> ImmutableBuffer {
        Self { resource: self.resource.take() }
    }

    /// Give up the variant and keep the resource
    pub fn into_resource(self) -> BufferResource {
        self.resource
    }
}

impl Deref for ImmutableBuffer {
    type Target = BufferResource;

    fn deref(&self) -> &BufferResource {
        &self.resource
    }
}

impl DerefMut for ImmutableBuffer {
    fn deref_mut(&mut self) -> &mut BufferResource {
        &mut self.resource
    }
}

#[cfg(test)]
#[path = "immutable_buffer_tests.rs"]
mod tests;
