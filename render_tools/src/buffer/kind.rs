/// Buffer kinds and the rules table keyed by them
///
/// All four buffer variants share one resource type. The handful of
/// behaviors that differ between them are data, looked up here.

use crate::buffer::StorageFlags;

/// Capability tag carried by every buffer resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Immutable storage with caller-chosen creation flags
    Immutable,
    /// Reallocatable storage tagged with a usage hint
    Mutable,
    /// Immutable storage, persistent and coherent
    Coherent,
    /// Immutable storage, rewritten through sub-range writes
    Dynamic,
}

/// Whether storage can be respecified after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageModel {
    Immutable,
    Mutable,
}

/// Per-kind behavior
#[derive(Debug)]
pub struct KindRules {
    /// Name used in log and panic messages
    pub name: &'static str,
    /// Storage model
    pub storage: StorageModel,
    /// Creation flags the kind always uses; `None` lets the caller choose
    pub fixed_flags: Option<StorageFlags>,
    /// Whether the kind exposes sub-range writes at all
    /// (immutable storage additionally needs `DYNAMIC`)
    pub sub_range_writes: bool,
    /// Mapping bits never allowed on this kind
    pub forbidden_map_flags: StorageFlags,
}

static RULES: [KindRules; 4] = [
    KindRules {
        name: "ImmutableBuffer",
        storage: StorageModel::Immutable,
        fixed_flags: None,
        sub_range_writes: true,
        forbidden_map_flags: StorageFlags::empty(),
    },
    KindRules {
        name: "MutableBuffer",
        storage: StorageModel::Mutable,
        fixed_flags: None,
        sub_range_writes: false,
        forbidden_map_flags: StorageFlags::PERSISTENT.union(StorageFlags::COHERENT),
    },
    KindRules {
        name: "CoherentBuffer",
        storage: StorageModel::Immutable,
        fixed_flags: Some(COHERENT_FLAGS),
        sub_range_writes: false,
        forbidden_map_flags: StorageFlags::empty(),
    },
    KindRules {
        name: "DynamicBuffer",
        storage: StorageModel::Immutable,
        fixed_flags: Some(DYNAMIC_FLAGS),
        sub_range_writes: true,
        forbidden_map_flags: StorageFlags::PERSISTENT.union(StorageFlags::COHERENT),
    },
];

impl BufferKind {
    /// Rules for this kind
    pub fn rules(self) -> &'static KindRules {
        &RULES[self as usize]
    }

    /// Kind name
    pub fn name(self) -> &'static str {
        self.rules().name
    }
}

/// Creation flags of [`crate::buffer::CoherentBuffer`]
pub const COHERENT_FLAGS: StorageFlags = StorageFlags::READ
    .union(StorageFlags::WRITE)
    .union(StorageFlags::PERSISTENT)
    .union(StorageFlags::COHERENT);

/// Creation flags of [`crate::buffer::DynamicBuffer`]
pub const DYNAMIC_FLAGS: StorageFlags = StorageFlags::READ
    .union(StorageFlags::WRITE)
    .union(StorageFlags::DYNAMIC);
