/// Scalar types a buffer can be cleared to

use bytemuck::Pod;

mod sealed {
    pub trait Sealed {}
}

/// A scalar that can fill a whole buffer
///
/// Matches the single-channel formats the device clear operation accepts.
pub trait ClearValue: Pod + sealed::Sealed {
    /// Device format name, for diagnostics
    const FORMAT: &'static str;
}

macro_rules! clear_value {
    ($($ty:ty => $format:literal),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl ClearValue for $ty {
                const FORMAT: &'static str = $format;
            }
        )*
    };
}

clear_value! {
    f32 => "R32F",
    i32 => "R32I",
    u32 => "R32UI",
    i16 => "R16I",
    u16 => "R16UI",
    i8 => "R8I",
    u8 => "R8UI",
}
