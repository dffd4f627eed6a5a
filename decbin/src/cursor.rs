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

use crate::layout::{BinaryLayout, ByteOrder};

/// A position within the bytes of a binary floating-point value.
///
/// The cursor walks bits in significance order independently of the byte
/// order of the encoding: [`advance`](BitCursor::advance) moves one bit
/// toward the least significant end and [`retreat`](BitCursor::retreat) one
/// bit toward the most significant end. Moving past either end of the buffer
/// leaves the cursor exhausted.
///
/// A cursor only stores a position. The buffer is passed to
/// [`read`](BitCursor::read) and [`write`](BitCursor::write), so several
/// cursors may address the same value.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BitCursor {
    index: usize,
    mask: u8,
    byte_order: ByteOrder,
    len: usize,
}

impl BitCursor {
    /// Positions a cursor at bit `offset` of an encoding with the specified
    /// layout, where offset 0 is the sign bit.
    pub fn at(layout: &BinaryLayout, offset: u32) -> BitCursor {
        let byte = (offset / 8) as usize;
        let index = match layout.byte_order() {
            ByteOrder::Big => byte,
            ByteOrder::Little => (layout.encoded_bytes() - 1).wrapping_sub(byte),
        };
        BitCursor {
            index,
            mask: 0x80 >> (offset % 8),
            byte_order: layout.byte_order(),
            len: layout.total_bytes(),
        }
    }

    /// Positions a cursor at the first stored mantissa bit of `layout`.
    ///
    /// For layouts with an explicit leading bit this is the leading bit
    /// itself.
    pub fn mantissa(layout: &BinaryLayout) -> BitCursor {
        BitCursor::at(layout, layout.mantissa_offset())
    }

    /// Moves the cursor one bit toward the least significant end.
    pub fn advance(&mut self) {
        if self.mask == 0x01 {
            self.mask = 0x80;
            self.index = match self.byte_order {
                ByteOrder::Big => self.index.wrapping_add(1),
                ByteOrder::Little => self.index.wrapping_sub(1),
            };
        } else {
            self.mask >>= 1;
        }
    }

    /// Moves the cursor one bit toward the most significant end.
    pub fn retreat(&mut self) {
        if self.mask == 0x80 {
            self.mask = 0x01;
            self.index = match self.byte_order {
                ByteOrder::Big => self.index.wrapping_sub(1),
                ByteOrder::Little => self.index.wrapping_add(1),
            };
        } else {
            self.mask <<= 1;
        }
    }

    /// Reports whether the cursor has moved off the buffer.
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.len
    }

    /// Reads the bit under the cursor.
    ///
    /// The cursor must not be exhausted.
    pub fn read(&self, bytes: &[u8]) -> bool {
        bytes[self.index] & self.mask != 0
    }

    /// Sets or clears the bit under the cursor.
    ///
    /// The cursor must not be exhausted.
    pub fn write(&self, bytes: &mut [u8], bit: bool) {
        if bit {
            bytes[self.index] |= self.mask;
        } else {
            bytes[self.index] &= !self.mask;
        }
    }
}

/// Reads the `width`-bit unsigned field that starts at bit `offset`.
pub(crate) fn read_field(bytes: &[u8], layout: &BinaryLayout, offset: u32, width: u32) -> u32 {
    let mut cursor = BitCursor::at(layout, offset);
    let mut value = 0;
    for _ in 0..width {
        value = (value << 1) | u32::from(cursor.read(bytes));
        cursor.advance();
    }
    value
}

/// Stores the low `width` bits of `value` in the field that starts at bit
/// `offset`.
pub(crate) fn write_field(
    bytes: &mut [u8],
    layout: &BinaryLayout,
    offset: u32,
    width: u32,
    value: u32,
) {
    let mut cursor = BitCursor::at(layout, offset);
    for i in (0..width).rev() {
        cursor.write(bytes, (value >> i) & 1 != 0);
        cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mantissa_start() {
        let c = BitCursor::mantissa(&BinaryLayout::BINARY64_BE);
        assert_eq!((c.index, c.mask), (1, 0x08));
        let c = BitCursor::mantissa(&BinaryLayout::BINARY64_LE);
        assert_eq!((c.index, c.mask), (6, 0x08));
        let c = BitCursor::mantissa(&BinaryLayout::EXTENDED80_LE);
        assert_eq!((c.index, c.mask), (7, 0x80));
        let c = BitCursor::mantissa(&BinaryLayout::BINARY128_BE);
        assert_eq!((c.index, c.mask), (2, 0x80));
        let c = BitCursor::mantissa(&BinaryLayout::BINARY128_LE);
        assert_eq!((c.index, c.mask), (13, 0x80));
    }

    #[test]
    fn test_walk_covers_mantissa() {
        for layout in &[
            BinaryLayout::BINARY64_BE,
            BinaryLayout::BINARY64_LE,
            BinaryLayout::EXTENDED80_LE,
            BinaryLayout::BINARY128_BE,
            BinaryLayout::BINARY128_LE,
        ] {
            let mut c = BitCursor::mantissa(layout);
            let mut n = 0;
            while !c.is_exhausted() {
                c.advance();
                n += 1;
            }
            assert_eq!(n, layout.stored_mantissa_bits(), "{:?}", layout);

            // Retreating from the exhausted position lands on the last bit.
            c.retreat();
            assert!(!c.is_exhausted());
            let mut bytes = vec![0; layout.total_bytes()];
            c.write(&mut bytes, true);
            let lsb = match layout.byte_order() {
                ByteOrder::Big => layout.total_bytes() - 1,
                ByteOrder::Little => 0,
            };
            assert_eq!(bytes[lsb], 0x01);
        }
    }

    #[test]
    fn test_fields() {
        let layout = BinaryLayout::BINARY64_LE;
        let bytes = 1.5f64.to_le_bytes();
        assert_eq!(read_field(&bytes, &layout, layout.sign_offset(), 1), 0);
        assert_eq!(read_field(&bytes, &layout, layout.exponent_offset(), 11), 1023);

        let mut bytes = [0; 8];
        write_field(&mut bytes, &layout, layout.sign_offset(), 1, 1);
        write_field(&mut bytes, &layout, layout.exponent_offset(), 11, 1024);
        assert_eq!(f64::from_le_bytes(bytes), -2.0);

        let layout = BinaryLayout::BINARY64_BE;
        let mut bytes = [0; 8];
        write_field(&mut bytes, &layout, layout.exponent_offset(), 11, 1023);
        assert_eq!(f64::from_be_bytes(bytes), 1.0);
    }
}
