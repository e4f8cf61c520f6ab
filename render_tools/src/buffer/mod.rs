/// Buffer module - capability-typed device buffers
///
/// `BufferResource` is the single resource type; the four variants are thin
/// wrappers that only expose the constructors (and shorthands) legal for
/// their kind.

// Module declarations
pub mod storage_flags;
pub mod usage_hint;
pub mod kind;
pub mod mapping;
pub mod clear_value;
pub mod buffer_resource;
pub mod immutable_buffer;
pub mod mutable_buffer;
pub mod coherent_buffer;
pub mod dynamic_buffer;

// Re-export everything from storage_flags.rs
pub use storage_flags::*;

// Re-export from other modules
pub use usage_hint::UsageHint;
pub use kind::{BufferKind, KindRules, StorageModel, COHERENT_FLAGS, DYNAMIC_FLAGS};
pub use mapping::{MapState, Mapping};
pub use clear_value::ClearValue;
pub use buffer_resource::BufferResource;
pub use immutable_buffer::ImmutableBuffer;
pub use mutable_buffer::MutableBuffer;
pub use coherent_buffer::CoherentBuffer;
pub use dynamic_buffer::DynamicBuffer;
