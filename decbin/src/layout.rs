// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Static descriptions of binary floating-point encodings.
//!
//! Bit offsets used throughout this module count from the most significant
//! bit of the encoding: offset 0 is the sign bit, the exponent field follows,
//! and the mantissa occupies the remaining bits. [`BitCursor`] maps offsets
//! to bytes according to the layout's byte order.
//!
//! [`BitCursor`]: crate::BitCursor

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use static_assertions::{const_assert, const_assert_eq};

/// The order in which the bytes of an encoding are stored in memory.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ByteOrder {
    /// The most significant byte is stored first.
    Big,
    /// The least significant byte is stored first.
    Little,
}

impl ByteOrder {
    /// The byte order of the target platform.
    pub const NATIVE: ByteOrder = if cfg!(target_endian = "little") {
        ByteOrder::Little
    } else {
        ByteOrder::Big
    };
}

/// A supported binary floating-point format.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    /// IEEE 754 binary64: 11 exponent bits, 52 stored mantissa bits and a
    /// hidden leading bit.
    Binary64,
    /// The x87 80-bit extended format: 15 exponent bits and 64 mantissa bits
    /// with an explicit leading bit, stored in a 16-byte slot.
    Extended80,
    /// IEEE 754 binary128: 15 exponent bits, 112 stored mantissa bits and a
    /// hidden leading bit.
    Binary128,
}

impl Format {
    const fn exponent_bits(self) -> u32 {
        match self {
            Format::Binary64 => 11,
            Format::Extended80 | Format::Binary128 => 15,
        }
    }

    const fn stored_mantissa_bits(self) -> u32 {
        match self {
            Format::Binary64 => 52,
            Format::Extended80 => 64,
            Format::Binary128 => 112,
        }
    }

    const fn implicit_bit(self) -> bool {
        !matches!(self, Format::Extended80)
    }

    const fn total_bytes(self) -> usize {
        match self {
            Format::Binary64 => 8,
            Format::Extended80 | Format::Binary128 => 16,
        }
    }
}

/// The byte layout of one binary floating-point encoding.
///
/// Layouts are constants: either one of the associated constants, or the
/// result of [`BinaryLayout::new`] evaluated in a `const` item, where an
/// unsupported combination fails the build.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct BinaryLayout {
    format: Format,
    byte_order: ByteOrder,
    total_bytes: usize,
    exponent_bits: u32,
    exponent_bias: i32,
    implicit_bit: bool,
}

impl BinaryLayout {
    /// Big-endian IEEE binary64.
    pub const BINARY64_BE: BinaryLayout = BinaryLayout::new(Format::Binary64, ByteOrder::Big);
    /// Little-endian IEEE binary64.
    pub const BINARY64_LE: BinaryLayout = BinaryLayout::new(Format::Binary64, ByteOrder::Little);
    /// Little-endian x87 extended precision.
    pub const EXTENDED80_LE: BinaryLayout =
        BinaryLayout::new(Format::Extended80, ByteOrder::Little);
    /// Big-endian IEEE binary128.
    pub const BINARY128_BE: BinaryLayout = BinaryLayout::new(Format::Binary128, ByteOrder::Big);
    /// Little-endian IEEE binary128.
    pub const BINARY128_LE: BinaryLayout =
        BinaryLayout::new(Format::Binary128, ByteOrder::Little);

    /// The layout of Rust's `f64` on the target platform.
    pub const F64: BinaryLayout = BinaryLayout::new(Format::Binary64, ByteOrder::NATIVE);

    /// The layout of the platform's `long double`, selected by exactly one of
    /// the `long-double-64`, `long-double-80` and `long-double-128` features.
    pub const NATIVE: BinaryLayout = BinaryLayout::new(NATIVE_FORMAT, ByteOrder::NATIVE);

    /// Describes `format` stored in `byte_order`.
    ///
    /// # Panics
    ///
    /// Panics if the x87 extended format is requested in big-endian order,
    /// which no platform uses. In a `const` item this is a build failure.
    pub const fn new(format: Format, byte_order: ByteOrder) -> BinaryLayout {
        if let (Format::Extended80, ByteOrder::Big) = (format, byte_order) {
            panic!("the x87 extended format is only defined for little-endian targets");
        }
        let exponent_bits = format.exponent_bits();
        BinaryLayout {
            format,
            byte_order,
            total_bytes: format.total_bytes(),
            exponent_bits,
            exponent_bias: (1 << (exponent_bits - 1)) - 1,
            implicit_bit: format.implicit_bit(),
        }
    }

    /// Returns the encoded format.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Returns the byte order of the encoding.
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Returns the number of bytes occupied by one value, including any
    /// padding.
    pub const fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Returns the number of bytes that carry the encoding. Padding bytes
    /// follow them in memory.
    pub const fn encoded_bytes(&self) -> usize {
        ((1 + self.exponent_bits + self.format.stored_mantissa_bits()) / 8) as usize
    }

    /// Returns the width of the exponent field in bits.
    pub const fn exponent_bits(&self) -> u32 {
        self.exponent_bits
    }

    /// Returns the bias added to the exponent before it is stored.
    pub const fn exponent_bias(&self) -> i32 {
        self.exponent_bias
    }

    /// Reports whether the leading mantissa bit of normal values is implied
    /// rather than stored.
    pub const fn has_implicit_bit(&self) -> bool {
        self.implicit_bit
    }

    /// Returns the number of mantissa bits physically stored.
    pub const fn stored_mantissa_bits(&self) -> u32 {
        self.format.stored_mantissa_bits()
    }

    /// Returns the number of significant bits of a normal value, including
    /// the leading bit.
    pub const fn precision_bits(&self) -> u32 {
        if self.implicit_bit {
            self.stored_mantissa_bits() + 1
        } else {
            self.stored_mantissa_bits()
        }
    }

    /// Returns the bit offset of the sign bit.
    pub const fn sign_offset(&self) -> u32 {
        0
    }

    /// Returns the bit offset of the most significant exponent bit.
    pub const fn exponent_offset(&self) -> u32 {
        1
    }

    /// Returns the bit offset of the first stored mantissa bit.
    pub const fn mantissa_offset(&self) -> u32 {
        1 + self.exponent_bits
    }

    /// Returns the biased exponent reserved for infinities and NaNs.
    pub const fn max_biased_exponent(&self) -> u32 {
        (1 << self.exponent_bits) - 1
    }

    /// Returns the unbiased exponent of the largest normal values.
    pub const fn max_exponent(&self) -> i32 {
        self.exponent_bias
    }

    /// Returns the unbiased exponent of the smallest normal values, which is
    /// also the scale of subnormal values.
    pub const fn min_exponent(&self) -> i32 {
        1 - self.exponent_bias
    }
}

#[cfg(not(any(
    feature = "long-double-64",
    feature = "long-double-80",
    feature = "long-double-128"
)))]
compile_error!("select a long double layout: long-double-64, long-double-80 or long-double-128");

#[cfg(any(
    all(feature = "long-double-64", feature = "long-double-80"),
    all(feature = "long-double-64", feature = "long-double-128"),
    all(feature = "long-double-80", feature = "long-double-128"),
))]
compile_error!("select exactly one long double layout feature; disable default features first");

#[cfg(feature = "long-double-64")]
const NATIVE_FORMAT: Format = Format::Binary64;
#[cfg(feature = "long-double-80")]
const NATIVE_FORMAT: Format = Format::Extended80;
#[cfg(feature = "long-double-128")]
const NATIVE_FORMAT: Format = Format::Binary128;

const_assert_eq!(BinaryLayout::F64.total_bytes(), std::mem::size_of::<f64>());
const_assert_eq!(BinaryLayout::F64.precision_bits(), f64::MANTISSA_DIGITS);
const_assert_eq!(BinaryLayout::F64.max_exponent() + 1, f64::MAX_EXP);
const_assert!(BinaryLayout::NATIVE.encoded_bytes() <= BinaryLayout::NATIVE.total_bytes());
const_assert!(BinaryLayout::EXTENDED80_LE.encoded_bytes() == 10);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fields() {
        let l = BinaryLayout::BINARY64_BE;
        assert_eq!(l.total_bytes(), 8);
        assert_eq!(l.exponent_bias(), 1023);
        assert_eq!(l.mantissa_offset(), 12);
        assert_eq!(l.max_biased_exponent(), 0x7FF);
        assert_eq!(l.min_exponent(), -1022);
        assert!(l.has_implicit_bit());

        let l = BinaryLayout::EXTENDED80_LE;
        assert_eq!(l.total_bytes(), 16);
        assert_eq!(l.encoded_bytes(), 10);
        assert_eq!(l.exponent_bias(), 16383);
        assert_eq!(l.precision_bits(), 64);
        assert!(!l.has_implicit_bit());

        let l = BinaryLayout::BINARY128_LE;
        assert_eq!(l.encoded_bytes(), 16);
        assert_eq!(l.precision_bits(), 113);
        assert_eq!(l.mantissa_offset(), 16);
    }

    #[test]
    #[should_panic(expected = "little-endian")]
    fn test_big_endian_extended_is_rejected() {
        BinaryLayout::new(Format::Extended80, ByteOrder::Big);
    }
}
