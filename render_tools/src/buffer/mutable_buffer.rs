/// MutableBuffer - orphan-and-replace storage
///
/// Carries a usage hint instead of capability flags. Every resize discards
/// the old backing store and allocates a new one; there are no sub-range
/// writes on this variant, and persistent/coherent mappings are refused.

use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::buffer::{BufferKind, BufferResource, UsageHint};
use crate::device::SharedDevice;
use crate::error::Result;
use crate::rt_precondition;

/// Reallocatable device storage tagged with a usage hint
#[derive(Debug)]
pub struct MutableBuffer {
    resource: BufferResource,
    usage: UsageHint,
}

impl MutableBuffer {
    /// Empty buffer: a handle without storage
    pub fn new(device: SharedDevice, usage: UsageHint) -> Result<Self> {
        Ok(Self {
            resource: BufferResource::create(device, BufferKind::Mutable)?,
            usage,
        })
    }

    /// Buffer of `size_bytes` zeroed bytes
    pub fn with_size(device: SharedDevice, usage: UsageHint, size_bytes: u64) -> Result<Self> {
        let mut buffer = Self::new(device, usage)?;
        buffer.resize_array(size_bytes)?;
        Ok(buffer)
    }

    /// Buffer holding a copy of `data`
    pub fn from_slice<T: Pod>(device: SharedDevice, usage: UsageHint, data: &[T]) -> Result<Self> {
        let mut buffer = Self::new(device, usage)?;
        buffer.resize_from_slice(data)?;
        Ok(buffer)
    }

    /// Usage hint the storage was (or will next be) allocated with
    pub fn usage_hint(&self) -> UsageHint {
        self.usage
    }

    /// Hint for the next resize; the current storage is left alone
    pub fn set_usage_hint(&mut self, usage: UsageHint) {
        self.usage = usage;
    }

    // ===== RESIZE =====

    /// Replace the storage with `size_bytes` zeroed bytes
    pub fn resize_array(&mut self, size_bytes: u64) -> Result<()> {
        self.resource.reallocate(size_bytes, None, self.usage)
    }

    /// Replace the storage with a copy of `data`
    pub fn resize_from_slice<T: Pod>(&mut self, data: &[T]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.resource.reallocate(bytes.len() as u64, Some(bytes), self.usage)
    }

    /// Replace the storage with a copy of `data[start..start + count]`
    pub fn resize_from_slice_range<T: Pod>(&mut self, data: &[T], start: usize, count: usize) -> Result<()> {
        rt_precondition!(start.checked_add(count).is_some_and(|end| end <= data.len()), "rt::MutableBuffer",
            "resize_from_slice_range: {} elements from {} exceed slice length {}",
            count, start, data.len());
        self.resize_from_slice(&data[start..start + count])
    }

    /// Replace the storage with a copy of `value`
    pub fn resize_value<T: Pod>(&mut self, value: &T) -> Result<()> {
        self.resize_from_slice(std::slice::from_ref(value))
    }

    /// Move the contents into storage allocated with `usage`
    ///
    /// The buffer gets a new handle: every external binding must be redone.
    /// Without storage yet, only the hint changes.
    pub fn change_usage_hint(&mut self, usage: UsageHint) -> Result<()> {
        if self.resource.is_initialized() {
            self.resource.respecify_with_copy(usage)?;
        }
        self.usage = usage;
        Ok(())
    }

    /// Move the handle out, leaving this buffer empty
    pub fn take(&mut self) -> MutableBuffer {
        Self {
            resource: self.resource.take(),
            usage: self.usage,
        }
    }

    pub fn into_resource(self) -> BufferResource {
        self.resource
    }
}

impl Deref for MutableBuffer {
    type Target = BufferResource;

    fn deref(&self) -> &BufferResource {
        &self.resource
    }
}

impl DerefMut for MutableBuffer {
    fn deref_mut(&mut self) -> &mut BufferResource {
        &mut self.resource
    }
}

#[cfg(test)]
#[path = "mutable_buffer_tests.rs"]
mod tests;
