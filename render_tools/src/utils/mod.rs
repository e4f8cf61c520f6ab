/// Small internal helpers shared by the device implementations

pub mod id_allocator;

pub use id_allocator::*;
