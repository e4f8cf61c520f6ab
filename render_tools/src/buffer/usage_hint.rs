/// Usage hints for mutable (orphan-and-replace) storage

use std::fmt;

/// How often mutable storage is respecified, and who consumes it
///
/// Hints never change behavior, only where the device places the storage.
/// Raw values follow the native graphics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageHint {
    StaticDraw,
    DynamicDraw,
    StreamDraw,

    StaticRead,
    DynamicRead,
    StreamRead,

    StaticCopy,
    DynamicCopy,
    StreamCopy,
}

impl UsageHint {
    /// All nine hints
    pub const ALL: [UsageHint; 9] = [
        UsageHint::StaticDraw,
        UsageHint::DynamicDraw,
        UsageHint::StreamDraw,
        UsageHint::StaticRead,
        UsageHint::DynamicRead,
        UsageHint::StreamRead,
        UsageHint::StaticCopy,
        UsageHint::DynamicCopy,
        UsageHint::StreamCopy,
    ];

    /// Native enum value
    pub fn raw(self) -> u32 {
        match self {
            UsageHint::StreamDraw => 0x88E0,
            UsageHint::StreamRead => 0x88E1,
            UsageHint::StreamCopy => 0x88E2,
            UsageHint::StaticDraw => 0x88E4,
            UsageHint::StaticRead => 0x88E5,
            UsageHint::StaticCopy => 0x88E6,
            UsageHint::DynamicDraw => 0x88E8,
            UsageHint::DynamicRead => 0x88E9,
            UsageHint::DynamicCopy => 0x88EA,
        }
    }

    /// Inverse of [`UsageHint::raw`]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|hint| hint.raw() == raw)
    }
}

impl fmt::Display for UsageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
#[path = "usage_hint_tests.rs"]
mod tests;
