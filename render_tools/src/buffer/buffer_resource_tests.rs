use super::*;
use crate::buffer::DYNAMIC_FLAGS;
use crate::device::{last_error_string, BufferBinding, DeviceConfig, SoftwareDevice};
use std::sync::Mutex;

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> DeviceConfig {
    DeviceConfig {
        label: "buffer_resource_tests".to_string(),
        error_checks: true,
        max_allocation_bytes: None,
    }
}

/// Concrete device (for inspection) plus the shared handle buffers use
fn create_device(config: DeviceConfig) -> (Arc<Mutex<SoftwareDevice>>, SharedDevice) {
    let concrete = Arc::new(Mutex::new(SoftwareDevice::new(config)));
    let shared: SharedDevice = concrete.clone();
    (concrete, shared)
}

fn shared_device() -> SharedDevice {
    create_device(test_config()).1
}

fn rw() -> StorageFlags {
    StorageFlags::READ | StorageFlags::WRITE
}

fn immutable(device: &SharedDevice, size: u64, flags: StorageFlags) -> BufferResource {
    let mut resource = BufferResource::create(device.clone(), BufferKind::Immutable).unwrap();
    resource.initialize_array(size, flags).unwrap();
    resource
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_created_resource_is_empty() {
    let device = shared_device();
    let resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    assert!(resource.is_valid());
    assert!(!resource.is_initialized());
    assert_eq!(resource.size_bytes(), 0);
    assert_eq!(resource.storage_flags(), StorageFlags::empty());
    assert_eq!(resource.map_state(), MapState::Unmapped);
    assert!(resource.verify_id().unwrap());
}

#[test]
fn test_initialize_records_size_and_flags() {
    let device = shared_device();
    let resource = immutable(&device, 256, rw());
    assert!(resource.is_initialized());
    assert!(resource.is_immutable());
    assert_eq!(resource.size_bytes(), 256);
    assert_eq!(resource.storage_flags(), rw());
    assert_eq!(resource.kind(), BufferKind::Immutable);
}

#[test]
fn test_initialize_from_slice_and_value() {
    let device = shared_device();
    let mut from_slice = BufferResource::create(device.clone(), BufferKind::Immutable).unwrap();
    from_slice.initialize_from_slice(&[1.0f32, 2.0, 3.0], StorageFlags::READ).unwrap();
    assert_eq!(from_slice.size_bytes(), 12);
    assert_eq!(from_slice.read_sub_range::<f32>(3, 0).unwrap(), vec![1.0, 2.0, 3.0]);

    let mut from_value = BufferResource::create(device, BufferKind::Immutable).unwrap();
    from_value.initialize_value(&[7u32, 8, 9, 10], StorageFlags::READ).unwrap();
    assert_eq!(from_value.size_bytes(), 16);
    assert_eq!(from_value.read_sub_range::<u32>(2, 8).unwrap(), vec![9, 10]);
}

#[test]
#[should_panic(expected = "already initialized")]
fn test_double_initialize_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    let _ = resource.initialize_array(64, rw());
}

#[test]
#[should_panic(expected = "zero length")]
fn test_zero_length_initialize_panics() {
    let device = shared_device();
    let mut resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    let _ = resource.initialize_array(0, rw());
}

#[test]
#[should_panic(expected = "zero length")]
fn test_empty_slice_initialize_panics() {
    let device = shared_device();
    let mut resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    let _ = resource.initialize_from_slice::<u32>(&[], rw());
}

#[test]
#[should_panic(expected = "COHERENT requires PERSISTENT")]
fn test_illegal_creation_flags_panic() {
    let device = shared_device();
    let mut resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    let _ = resource.initialize_array(64, StorageFlags::COHERENT);
}

#[test]
#[should_panic(expected = "Illegal creation flags")]
fn test_mapping_only_flags_rejected_at_creation() {
    let device = shared_device();
    let mut resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    let _ = resource.initialize_array(64, StorageFlags::WRITE | StorageFlags::FLUSH_EXPLICIT);
}

#[test]
fn test_lock_shared_device() {
    let (concrete, device) = create_device(test_config());
    let id = {
        let mut guard = lock(&device).unwrap();
        let id = guard.create_buffer();
        check(&mut *guard, "create_buffer").unwrap();
        id
    };
    assert!(concrete.lock().unwrap().is_buffer(id));
}

#[test]
fn test_out_of_memory_is_an_error() {
    let (_, device) = create_device(DeviceConfig {
        max_allocation_bytes: Some(64),
        ..test_config()
    });
    let mut resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    assert_eq!(resource.initialize_array(128, rw()), Err(Error::OutOfMemory));
    assert!(!resource.is_initialized());

    // The failure leaves the resource usable
    resource.initialize_array(64, rw()).unwrap();
    assert_eq!(resource.size_bytes(), 64);
}

#[test]
fn test_unchecked_device_leaves_error_for_caller() {
    let (concrete, device) = create_device(DeviceConfig {
        error_checks: false,
        max_allocation_bytes: Some(64),
        ..test_config()
    });
    let mut resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    assert!(resource.initialize_array(128, rw()).is_ok());
    assert_eq!(last_error_string(&mut *concrete.lock().unwrap()), "OUT_OF_MEMORY");
}

#[test]
fn test_drop_releases_handle() {
    let (concrete, device) = create_device(test_config());
    {
        let _a = immutable(&device, 32, rw());
        let _b = immutable(&device, 32, rw());
        assert_eq!(concrete.lock().unwrap().stats().live_buffers, 2);
        assert_eq!(concrete.lock().unwrap().stats().bytes_allocated, 64);
    }
    let stats = concrete.lock().unwrap().stats();
    assert_eq!(stats.live_buffers, 0);
    assert_eq!(stats.bytes_allocated, 0);
}

#[test]
fn test_drop_while_mapped_releases_handle() {
    let (concrete, device) = create_device(test_config());
    {
        let mut resource = immutable(&device, 32, rw());
        resource.map_whole(StorageFlags::WRITE).unwrap();
    }
    assert_eq!(concrete.lock().unwrap().stats().live_buffers, 0);
    assert_eq!(concrete.lock().unwrap().take_error(), DeviceError::NoError);
}

#[test]
fn test_reset_is_idempotent() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());

    resource.reset().unwrap();
    let id_after_first = resource.id();
    assert!(resource.is_valid());
    assert_eq!(resource.size_bytes(), 0);
    assert_eq!(resource.storage_flags(), StorageFlags::empty());

    resource.reset().unwrap();
    assert_eq!(resource.id(), id_after_first);
    assert!(resource.is_valid());
    assert!(!resource.is_initialized());
    assert!(resource.verify_id().unwrap());

    // Can be initialized again, with different flags
    resource.initialize_array(16, StorageFlags::READ).unwrap();
    assert_eq!(resource.storage_flags(), StorageFlags::READ);
}

#[test]
fn test_reset_drops_mapping() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    resource.map_whole(rw()).unwrap();
    resource.reset().unwrap();
    assert_eq!(resource.map_state(), MapState::Unmapped);
}

#[test]
fn test_take_leaves_source_empty() {
    let (concrete, device) = create_device(test_config());
    let mut source = immutable(&device, 64, rw());
    let id = source.id();

    let taken = source.take();
    assert_eq!(taken.id(), id);
    assert_eq!(taken.size_bytes(), 64);
    assert_eq!(source.id(), BufferId::NULL);
    assert_eq!(source.size_bytes(), 0);
    assert!(!source.is_valid());

    // Dropping the empty source must not release the taken handle
    drop(source);
    assert!(concrete.lock().unwrap().is_buffer(id));
    drop(taken);
    assert!(!concrete.lock().unwrap().is_buffer(id));
}

// ============================================================================
// Sub-range transfer
// ============================================================================

#[test]
fn test_write_read_round_trip() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, DYNAMIC_FLAGS);
    let data: Vec<u8> = (0..20).collect();
    resource.write_sub_range(&data, 13).unwrap();
    assert_eq!(resource.read_sub_range::<u8>(20, 13).unwrap(), data);
    assert_eq!(resource.size_bytes(), 64);
}

#[test]
fn test_write_value_and_read_into() {
    let device = shared_device();
    let mut resource = immutable(&device, 16, DYNAMIC_FLAGS);
    resource.write_value(&[1.5f32, -2.0], 8).unwrap();

    let mut out = [0.0f32; 2];
    resource.read_into(&mut out, 8).unwrap();
    assert_eq!(out, [1.5, -2.0]);
}

#[test]
fn test_write_ending_at_size_succeeds() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, DYNAMIC_FLAGS);
    resource.write_sub_range(&[0xAAu8; 4], 60).unwrap();
    assert_eq!(resource.read_sub_range::<u8>(4, 60).unwrap(), vec![0xAA; 4]);
}

#[test]
#[should_panic(expected = "exceeds buffer size")]
fn test_write_one_past_size_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, DYNAMIC_FLAGS);
    let _ = resource.write_sub_range(&[0xAAu8; 4], 61);
}

#[test]
#[should_panic(expected = "exceeds buffer size")]
fn test_read_one_past_size_panics() {
    let device = shared_device();
    let resource = immutable(&device, 64, rw());
    let _ = resource.read_sub_range::<u8>(5, 60);
}

#[test]
#[should_panic(expected = "exceeds buffer size")]
fn test_overflowing_offset_panics() {
    let device = shared_device();
    let resource = immutable(&device, 64, rw());
    let _ = resource.read_sub_range::<u8>(2, u64::MAX);
}

#[test]
#[should_panic(expected = "exceeds buffer size")]
fn test_read_huge_count_panics_before_allocating() {
    let device = shared_device();
    let resource = immutable(&device, 16, rw());
    let _ = resource.read_sub_range::<u64>(usize::MAX / 4, 0);
}

#[test]
#[should_panic(expected = "exceeds buffer size")]
fn test_read_count_past_size_panics() {
    let device = shared_device();
    let resource = immutable(&device, 16, rw());
    let _ = resource.read_sub_range::<u8>(usize::MAX / 2, 0);
}

#[test]
#[should_panic(expected = "does not permit sub-range writes")]
fn test_write_without_dynamic_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    let _ = resource.write_sub_range(&[1u32], 0);
}

#[test]
#[should_panic(expected = "on uninitialized")]
fn test_read_uninitialized_panics() {
    let device = shared_device();
    let resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    let _ = resource.read_sub_range::<u8>(1, 0);
}

#[test]
fn test_bounds_check_bytes() {
    let device = shared_device();
    let resource = immutable(&device, 64, rw());
    assert!(resource.bounds_check_bytes(0, 64));
    assert!(resource.bounds_check_bytes(64, 0));
    assert!(!resource.bounds_check_bytes(1, 64));
    assert!(!resource.bounds_check_bytes(u64::MAX, 2));
}

// ============================================================================
// Copy, clear, invalidate
// ============================================================================

#[test]
fn test_copy_to_ranges() {
    let device = shared_device();
    let mut source = BufferResource::create(device.clone(), BufferKind::Immutable).unwrap();
    source.initialize_from_slice(&[1u8, 2, 3, 4, 5, 6, 7, 8], StorageFlags::READ).unwrap();
    let mut target = immutable(&device, 8, StorageFlags::READ);

    source.copy_to(&mut target, 4, 2, 4).unwrap();
    assert_eq!(target.read_sub_range::<u8>(8, 0).unwrap(), vec![0, 0, 0, 0, 3, 4, 5, 6]);
}

#[test]
fn test_copy_whole_to_larger_target() {
    let device = shared_device();
    let mut source = BufferResource::create(device.clone(), BufferKind::Immutable).unwrap();
    source.initialize_from_slice(&[9u16, 8], StorageFlags::READ).unwrap();
    let mut target = immutable(&device, 8, StorageFlags::READ);

    source.copy_whole_to(&mut target).unwrap();
    assert_eq!(target.read_sub_range::<u16>(4, 0).unwrap(), vec![9, 8, 0, 0]);
}

#[test]
#[should_panic(expected = "copy_to destination holds")]
fn test_copy_whole_to_smaller_target_panics() {
    let device = shared_device();
    let source = immutable(&device, 16, rw());
    let mut target = immutable(&device, 8, rw());
    let _ = source.copy_whole_to(&mut target);
}

#[test]
#[should_panic(expected = "exceeds buffer size")]
fn test_copy_past_destination_panics() {
    let device = shared_device();
    let source = immutable(&device, 16, rw());
    let mut target = immutable(&device, 16, rw());
    let _ = source.copy_to(&mut target, 8, 0, 9);
}

#[test]
#[should_panic(expected = "different devices")]
fn test_copy_across_devices_panics() {
    let source = immutable(&shared_device(), 16, rw());
    let mut target = immutable(&shared_device(), 16, rw());
    let _ = source.copy_to(&mut target, 16, 0, 0);
}

#[test]
fn test_clear_to_fills_buffer() {
    let device = shared_device();
    let mut resource = immutable(&device, 16, rw());
    resource.clear_to(0xDEADBEEFu32).unwrap();
    assert_eq!(resource.read_sub_range::<u32>(4, 0).unwrap(), vec![0xDEADBEEF; 4]);

    resource.clear_to(-1i8).unwrap();
    assert_eq!(resource.read_sub_range::<u8>(16, 0).unwrap(), vec![0xFF; 16]);

    resource.clear_to(0.5f32).unwrap();
    assert_eq!(resource.read_sub_range::<f32>(4, 0).unwrap(), vec![0.5; 4]);
}

#[test]
#[should_panic(expected = "is not a multiple of 4")]
fn test_clear_to_mismatched_width_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 6, rw());
    let _ = resource.clear_to(1u32);
}

#[test]
fn test_invalidate_discards_contents() {
    let device = shared_device();
    let mut resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    resource.initialize_from_slice(&[1u8; 8], StorageFlags::READ).unwrap();

    resource.invalidate_range(2, 2).unwrap();
    assert_eq!(resource.read_sub_range::<u8>(8, 0).unwrap(), vec![1, 1, 0, 0, 1, 1, 1, 1]);
    resource.invalidate().unwrap();
    assert_eq!(resource.read_sub_range::<u8>(8, 0).unwrap(), vec![0; 8]);
}

// ============================================================================
// Mapping
// ============================================================================

#[test]
fn test_map_state_transitions() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());

    let mapping = resource.map_whole(rw()).unwrap();
    assert_eq!(resource.map_state(), MapState::MappedReadWrite);
    assert_eq!(resource.current_mapping(), Some(mapping));
    assert_eq!(mapping.len(), 64);
    assert!(resource.unmap().unwrap());
    assert_eq!(resource.map_state(), MapState::Unmapped);

    resource.map_range(16, 16, StorageFlags::READ).unwrap();
    assert_eq!(resource.map_state(), MapState::MappedRead);
    assert!(resource.unmap().unwrap());
}

#[test]
fn test_write_mapped_then_read_back() {
    let device = shared_device();
    let mut resource = immutable(&device, 32, rw());

    resource.map_range(8, 8, StorageFlags::WRITE | StorageFlags::INVALIDATE_RANGE).unwrap();
    resource.write_mapped(0, &[0x11223344u32, 0x55667788]).unwrap();
    assert!(resource.unmap().unwrap());

    assert_eq!(resource.read_sub_range::<u32>(2, 8).unwrap(), vec![0x11223344, 0x55667788]);
}

#[test]
fn test_read_mapped() {
    let device = shared_device();
    let mut resource = BufferResource::create(device, BufferKind::Immutable).unwrap();
    resource.initialize_from_slice(&[5u8, 6, 7, 8], StorageFlags::READ).unwrap();

    let mapping = resource.map_whole(StorageFlags::READ).unwrap();
    let mut out = [0u8; 2];
    resource.read_mapped(2, &mut out).unwrap();
    assert_eq!(out, [7, 8]);
    assert_eq!(unsafe { mapping.as_slice() }, &[5, 6, 7, 8]);
    assert!(resource.unmap().unwrap());
}

#[test]
fn test_map_range_ending_at_size_succeeds() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    let mapping = resource.map_range(48, 16, StorageFlags::READ).unwrap();
    assert_eq!(mapping.offset(), 48);
    assert!(resource.unmap().unwrap());
}

#[test]
#[should_panic(expected = "exceeds buffer size")]
fn test_map_range_one_past_size_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    let _ = resource.map_range(48, 17, StorageFlags::READ);
}

#[test]
#[should_panic(expected = "exceed creation flags")]
fn test_map_beyond_creation_flags_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, StorageFlags::READ);
    let _ = resource.map_whole(StorageFlags::WRITE);
}

#[test]
#[should_panic(expected = "READ cannot be combined with INVALIDATE")]
fn test_map_read_with_invalidate_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    let _ = resource.map_whole(StorageFlags::READ | StorageFlags::INVALIDATE_BUFFER);
}

#[test]
#[should_panic(expected = "neither READ nor WRITE")]
fn test_map_without_access_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    let _ = resource.map_whole(StorageFlags::UNSYNCHRONIZED);
}

#[test]
#[should_panic(expected = "is already mapped")]
fn test_map_while_mapped_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    resource.map_whole(StorageFlags::READ).unwrap();
    let _ = resource.map_whole(StorageFlags::READ);
}

#[test]
#[should_panic(expected = "is not mapped")]
fn test_unmap_while_unmapped_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    let _ = resource.unmap();
}

#[test]
#[should_panic(expected = "is mapped")]
fn test_read_while_mapped_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    resource.map_whole(StorageFlags::WRITE).unwrap();
    let _ = resource.read_sub_range::<u8>(4, 0);
}

#[test]
#[should_panic(expected = "without WRITE")]
fn test_write_through_read_mapping_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    resource.map_whole(StorageFlags::READ).unwrap();
    let _ = resource.write_mapped(0, &[1u8]);
}

#[test]
#[should_panic(expected = "exceeds mapping length")]
fn test_write_past_mapping_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    resource.map_range(0, 8, StorageFlags::WRITE).unwrap();
    let _ = resource.write_mapped(4, &[0u8; 5]);
}

#[test]
fn test_corrupted_unmap_reports_false() {
    let (concrete, device) = create_device(test_config());
    let mut resource = immutable(&device, 64, rw());
    resource.map_whole(StorageFlags::WRITE).unwrap();

    concrete.lock().unwrap().corrupt_next_unmap();
    assert_eq!(resource.unmap(), Ok(false));
    assert_eq!(resource.map_state(), MapState::Unmapped);
}

#[test]
fn test_flush_explicit_mapping() {
    let (concrete, device) = create_device(test_config());
    let mut resource = immutable(&device, 64, rw());
    resource.map_range(32, 32, StorageFlags::WRITE | StorageFlags::FLUSH_EXPLICIT).unwrap();
    resource.write_mapped(0, &[3u8; 32]).unwrap();
    resource.flush_range(0, 16).unwrap();
    resource.flush().unwrap();
    assert!(resource.unmap().unwrap());
    assert_eq!(concrete.lock().unwrap().stats().flushes, 2);
}

#[test]
#[should_panic(expected = "FLUSH_EXPLICIT")]
fn test_flush_without_flush_explicit_panics() {
    let device = shared_device();
    let mut resource = immutable(&device, 64, rw());
    resource.map_whole(StorageFlags::WRITE).unwrap();
    let _ = resource.flush();
}

#[test]
#[should_panic(expected = "flush on unmapped")]
fn test_flush_unmapped_panics() {
    let device = shared_device();
    let resource = immutable(&device, 64, rw());
    let _ = resource.flush_range(0, 4);
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn test_bind_uniform_and_storage() {
    let (concrete, device) = create_device(test_config());
    let resource = immutable(&device, 256, rw());
    resource.bind_uniform(0).unwrap();
    resource.bind_storage_range(3, 64, 128).unwrap();

    let dev = concrete.lock().unwrap();
    assert_eq!(
        dev.binding(BindTarget::Uniform, 0),
        Some(BufferBinding { id: resource.id(), range: None })
    );
    assert_eq!(
        dev.binding(BindTarget::ShaderStorage, 3),
        Some(BufferBinding { id: resource.id(), range: Some((64, 128)) })
    );
}

#[test]
fn test_reset_invalidates_bindings() {
    let (concrete, device) = create_device(test_config());
    let mut resource = immutable(&device, 256, rw());
    resource.bind_uniform_range(1, 0, 64).unwrap();
    resource.reset().unwrap();
    assert_eq!(concrete.lock().unwrap().binding(BindTarget::Uniform, 1), None);
}

#[test]
#[should_panic(expected = "exceeds buffer size")]
fn test_bind_range_past_size_panics() {
    let device = shared_device();
    let resource = immutable(&device, 64, rw());
    let _ = resource.bind_storage_range(0, 32, 64);
}
