//! Display styles: numeric interpretation plus an explicit byte width.

/// How a number is interpreted when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Signed,
    Unsigned,
    Hex,
}

/// Width class of a value, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ByteWidth {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl ByteWidth {
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        (self as u32) * 8
    }

    /// Hex digits needed to show every bit of this width.
    #[must_use]
    pub const fn nibbles(self) -> u8 {
        (self as u8) * 2
    }

    /// All-ones mask covering this width.
    #[must_use]
    pub const fn mask(self) -> u64 {
        match self {
            Self::One => 0xFF,
            Self::Two => 0xFFFF,
            Self::Four => 0xFFFF_FFFF,
            Self::Eight => u64::MAX,
        }
    }

    /// Width for a bit count of 8, 16, 32 or 64.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::One),
            16 => Some(Self::Two),
            32 => Some(Self::Four),
            64 => Some(Self::Eight),
            _ => None,
        }
    }
}

/// Interpretation and width used to render a number.
///
/// The width is a separate field rather than being folded into the kind, so
/// `UINT8` and `HEX8` are simply `(Unsigned, One)` and `(Hex, One)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayStyle {
    pub kind: NumberKind,
    pub width: ByteWidth,
}

impl DisplayStyle {
    pub const INT: Self = Self::new(NumberKind::Signed, ByteWidth::Four);
    pub const INT8: Self = Self::new(NumberKind::Signed, ByteWidth::One);
    pub const INT16: Self = Self::new(NumberKind::Signed, ByteWidth::Two);
    pub const INT32: Self = Self::new(NumberKind::Signed, ByteWidth::Four);
    pub const INT64: Self = Self::new(NumberKind::Signed, ByteWidth::Eight);
    pub const UINT: Self = Self::new(NumberKind::Unsigned, ByteWidth::Four);
    pub const UINT8: Self = Self::new(NumberKind::Unsigned, ByteWidth::One);
    pub const UINT16: Self = Self::new(NumberKind::Unsigned, ByteWidth::Two);
    pub const UINT32: Self = Self::new(NumberKind::Unsigned, ByteWidth::Four);
    pub const UINT64: Self = Self::new(NumberKind::Unsigned, ByteWidth::Eight);
    pub const HEX8: Self = Self::new(NumberKind::Hex, ByteWidth::One);
    pub const HEX16: Self = Self::new(NumberKind::Hex, ByteWidth::Two);
    pub const HEX32: Self = Self::new(NumberKind::Hex, ByteWidth::Four);
    pub const HEX64: Self = Self::new(NumberKind::Hex, ByteWidth::Eight);

    #[must_use]
    pub const fn new(kind: NumberKind, width: ByteWidth) -> Self {
        Self { kind, width }
    }

    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self.kind, NumberKind::Signed)
    }
}

/// Integer types usable as array elements.
///
/// The element type fixes the comparison stride, so a caller can no longer
/// claim a width that differs from the data it passes.
pub trait ArrayElement: Copy + PartialEq {
    const WIDTH: ByteWidth;

    /// Value widened to `i64` (sign-extended for signed types, bit-preserving
    /// for `u64`). Unsigned rendering masks it back to [`Self::WIDTH`].
    fn to_raw(self) -> i64;
}

macro_rules! array_element {
    ($($ty:ty => $width:ident),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                const WIDTH: ByteWidth = ByteWidth::$width;

                #[allow(clippy::cast_possible_wrap, reason = "bit-preserving widening")]
                fn to_raw(self) -> i64 {
                    self as i64
                }
            }
        )*
    };
}

array_element! {
    u8 => One,
    i8 => One,
    u16 => Two,
    i16 => Two,
    u32 => Four,
    i32 => Four,
    u64 => Eight,
    i64 => Eight,
}
