/// Device module - the raw buffer primitive and its implementations

// Module declarations
pub mod graphics_device;
pub mod software_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use software_device::*;
