/*!
# Render Tools

Capability-typed GPU buffer management.

This crate turns a single low-level "create / allocate / map / free" device
memory primitive into a family of buffer kinds, each with its own legal
operation set. Flag legality, bounds and mapping state are validated on every
call; misuse panics, device failures are returned as errors.

## Architecture

- **StorageFlags**: capability bits and the creation/mapping legality rules
- **BufferResource**: the shared resource surface (read, write, map, copy, ...)
- **ImmutableBuffer**: storage whose size and flags are frozen at creation
- **MutableBuffer**: orphan-and-replace storage tagged with a usage hint
- **CoherentBuffer**: persistent + coherent mapped storage
- **DynamicBuffer**: storage rewritten through sub-range writes
- **GraphicsDevice**: the raw device primitive, with an in-memory
  `SoftwareDevice` implementation

Buffers hold an explicit `SharedDevice` handle; there is no global device.
*/

// Internal modules
mod error;
mod toolkit;
pub mod log;
pub mod buffer;
pub mod device;
pub(crate) mod utils;

// Main rt namespace module
pub mod rt {
    // Error types
    pub use crate::error::{Error, Result};

    // Logger registry
    pub use crate::toolkit::Toolkit;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Buffer sub-module
    pub mod buffer {
        pub use crate::buffer::*;
    }

    // Device sub-module
    pub mod device {
        pub use crate::device::*;
    }
}
