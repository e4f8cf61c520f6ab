/// Storage capability flags and their legality rules
///
/// One bitset serves both purposes a device buffer needs flags for:
/// declaring capabilities when storage is created, and requesting access
/// when the storage is mapped. Which bits are legal, and in which
/// combinations, differs between the two; `is_valid_creation_flag_set` and
/// `is_valid_mapping_flag_set` are the only places those rules live.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Buffer storage / mapping capability bits
    ///
    /// Bit values follow the native graphics API so a hardware backend can
    /// pass them through untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StorageFlags: u32 {
        /// Storage may be mapped for reading / the mapping will be read
        const READ = 0x0001;
        /// Storage may be mapped for writing / the mapping will be written
        const WRITE = 0x0002;
        /// Mapping discards the previous contents of the mapped range
        const INVALIDATE_RANGE = 0x0004;
        /// Mapping discards the previous contents of the whole buffer
        const INVALIDATE_BUFFER = 0x0008;
        /// Writes through the mapping become visible only on flush
        const FLUSH_EXPLICIT = 0x0010;
        /// The device does not synchronize the mapping with pending work
        const UNSYNCHRONIZED = 0x0020;
        /// The mapping may stay open while the device uses the buffer
        const PERSISTENT = 0x0040;
        /// Persistent mapping traffic is visible without barriers
        const COHERENT = 0x0080;
        /// Contents may be replaced through sub-range writes
        const DYNAMIC = 0x0100;
        /// Prefer client-side (host) memory as backing store
        const CLIENT = 0x0200;
    }
}

impl StorageFlags {
    /// Bits accepted when storage is created
    pub const CREATION_MASK: Self = Self::READ
        .union(Self::WRITE)
        .union(Self::PERSISTENT)
        .union(Self::COHERENT)
        .union(Self::DYNAMIC)
        .union(Self::CLIENT);

    /// Bits accepted when storage is mapped
    pub const MAPPING_MASK: Self = Self::READ
        .union(Self::WRITE)
        .union(Self::INVALIDATE_RANGE)
        .union(Self::INVALIDATE_BUFFER)
        .union(Self::FLUSH_EXPLICIT)
        .union(Self::UNSYNCHRONIZED)
        .union(Self::PERSISTENT)
        .union(Self::COHERENT);

    /// Mapping bits that must also have been granted at creation
    pub const ACCESS_MASK: Self = Self::READ
        .union(Self::WRITE)
        .union(Self::PERSISTENT)
        .union(Self::COHERENT);

    /// True if every bit of `other` is set
    pub fn all_of(self, other: Self) -> bool {
        self.contains(other)
    }

    /// True if at least one bit of `other` is set
    pub fn any_of(self, other: Self) -> bool {
        self.intersects(other)
    }

    /// First rule this set breaks as a creation flag set, if any
    pub fn creation_violation(self) -> Option<FlagViolation> {
        let outside = self.difference(Self::CREATION_MASK);
        if !outside.is_empty() {
            return Some(FlagViolation::OutsideCreationMask(outside));
        }
        if self.contains(Self::PERSISTENT) && !self.any_of(Self::READ | Self::WRITE) {
            return Some(FlagViolation::PersistentWithoutAccess);
        }
        if self.contains(Self::COHERENT) && !self.contains(Self::PERSISTENT) {
            return Some(FlagViolation::CoherentWithoutPersistent);
        }
        None
    }

    /// First rule this set breaks as a mapping flag set, if any
    pub fn mapping_violation(self) -> Option<FlagViolation> {
        let outside = self.difference(Self::MAPPING_MASK);
        if !outside.is_empty() {
            return Some(FlagViolation::OutsideMappingMask(outside));
        }
        if self.contains(Self::READ)
            && self.any_of(Self::INVALIDATE_BUFFER | Self::INVALIDATE_RANGE)
        {
            return Some(FlagViolation::ReadWithInvalidate);
        }
        if self.contains(Self::FLUSH_EXPLICIT) && !self.contains(Self::WRITE) {
            return Some(FlagViolation::FlushExplicitWithoutWrite);
        }
        None
    }
}

/// Validate a flag set intended for storage creation
pub fn is_valid_creation_flag_set(flags: StorageFlags) -> bool {
    flags.creation_violation().is_none()
}

/// Validate a flag set intended for a mapping request
pub fn is_valid_mapping_flag_set(flags: StorageFlags) -> bool {
    flags.mapping_violation().is_none()
}

/// Reason a flag set was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagViolation {
    /// Bits that are not legal at creation time
    OutsideCreationMask(StorageFlags),
    /// Bits that are not legal at mapping time
    OutsideMappingMask(StorageFlags),
    /// PERSISTENT without READ or WRITE
    PersistentWithoutAccess,
    /// COHERENT without PERSISTENT
    CoherentWithoutPersistent,
    /// READ together with an invalidate bit
    ReadWithInvalidate,
    /// FLUSH_EXPLICIT without WRITE
    FlushExplicitWithoutWrite,
}

impl fmt::Display for FlagViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagViolation::OutsideCreationMask(bits) => {
                write!(f, "flags {:?} are not legal at creation", bits)
            }
            FlagViolation::OutsideMappingMask(bits) => {
                write!(f, "flags {:?} are not legal when mapping", bits)
            }
            FlagViolation::PersistentWithoutAccess => {
                write!(f, "PERSISTENT requires READ or WRITE")
            }
            FlagViolation::CoherentWithoutPersistent => {
                write!(f, "COHERENT requires PERSISTENT")
            }
            FlagViolation::ReadWithInvalidate => {
                write!(f, "READ cannot be combined with INVALIDATE_RANGE or INVALIDATE_BUFFER")
            }
            FlagViolation::FlushExplicitWithoutWrite => {
                write!(f, "FLUSH_EXPLICIT requires WRITE")
            }
        }
    }
}

#[cfg(test)]
#[path = "storage_flags_tests.rs"]
mod tests;
