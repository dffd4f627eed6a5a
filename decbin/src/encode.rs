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

//! Conversion from decimal to binary floating point.
//!
//! The integer part of the decimal is accumulated into an exact binary
//! integer; the fractional part is expanded one bit at a time by comparing it
//! against successive decimal powers of one half. Both feed a single
//! [`BitCursor`] that writes the mantissa in place, so the final encoding is
//! assembled without any native floating-point arithmetic.

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::context::{Context, Rounding};
use crate::cursor::{read_field, write_field, BitCursor};
use crate::decimal::{Decimal, UNIT_RADIX};
use crate::layout::BinaryLayout;

/// How the discarded bits of a mantissa compare with half of the last
/// retained bit.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Tail {
    Below,
    Half,
    Above,
}

impl Tail {
    /// Classifies a tail from its first discarded bit and whether any bit
    /// after it is set. Returns `None` if nothing was discarded.
    fn from_bits(first: bool, rest: bool) -> Option<Tail> {
        match (first, rest) {
            (false, false) => None,
            (false, true) => Some(Tail::Below),
            (true, false) => Some(Tail::Half),
            (true, true) => Some(Tail::Above),
        }
    }

    fn rounds_up(self, rounding: Rounding, negative: bool, odd: bool) -> bool {
        match rounding {
            Rounding::Ceiling => !negative,
            Rounding::Floor => negative,
            Rounding::Down => false,
            Rounding::Up => true,
            Rounding::HalfUp => self != Tail::Below,
            Rounding::HalfDown => self == Tail::Above,
            Rounding::HalfEven => self == Tail::Above || (self == Tail::Half && odd),
            Rounding::ZeroFiveUp => !odd,
        }
    }
}

impl<const N: usize> Context<Decimal<N>> {
    /// Encodes `d` as a binary floating-point value with the specified layout.
    ///
    /// NaNs become the layout's quiet NaN and infinities the infinity of the
    /// same sign; neither touches the status. Finite values are rounded to
    /// the layout's precision using the context's rounding algorithm, with
    /// the inexact flag raised if any nonzero bit was discarded. Values
    /// beyond the largest finite binary value become infinities and raise
    /// overflow. Values in the subnormal range are encoded as subnormals, and
    /// raise underflow if they are also inexact.
    ///
    /// A context built with [`Context::default`] rounds half to even, so the
    /// result is the nearest binary value with ties going to an even
    /// mantissa, as `str::parse::<f64>` produces.
    ///
    /// The returned buffer is `layout.total_bytes()` long.
    pub fn to_binary(&mut self, d: &Decimal<N>, layout: &BinaryLayout) -> Vec<u8> {
        let mut bytes = vec![0; layout.total_bytes()];
        if d.is_nan() {
            write_nan(&mut bytes, layout);
        } else if d.is_infinite() {
            write_infinity(&mut bytes, layout, d.is_negative());
        } else {
            let encoder = Encoder::new(self.scratch(), layout, &mut bytes, self.rounding());
            let flags = encoder.encode(d);
            if flags != 0 {
                self.raise(flags);
            }
        }
        bytes
    }

    /// Encodes `d` as an `f64`.
    ///
    /// See [`Context::to_binary`] for the handling of special values,
    /// rounding and exceptional conditions.
    pub fn to_f64(&mut self, d: &Decimal<N>) -> f64 {
        let mut bytes = [0; 8];
        bytes.copy_from_slice(&self.to_binary(d, &BinaryLayout::F64));
        f64::from_ne_bytes(bytes)
    }

    /// Encodes `d` in the platform's `long double` layout,
    /// [`BinaryLayout::NATIVE`].
    pub fn to_native(&mut self, d: &Decimal<N>) -> Vec<u8> {
        self.to_binary(d, &BinaryLayout::NATIVE)
    }
}

struct Encoder<'a, const N: usize> {
    work: Context<Decimal<N>>,
    layout: &'a BinaryLayout,
    bytes: &'a mut [u8],
    rounding: Rounding,
    cursor: BitCursor,
    /// The unbiased exponent of the leading bit, or of the bit currently
    /// being examined while the leading bit has not been found.
    exponent: i32,
    leading: bool,
    subnormal: bool,
}

impl<'a, const N: usize> Encoder<'a, N> {
    fn new(
        work: Context<Decimal<N>>,
        layout: &'a BinaryLayout,
        bytes: &'a mut [u8],
        rounding: Rounding,
    ) -> Encoder<'a, N> {
        Encoder {
            work,
            layout,
            bytes,
            rounding,
            cursor: BitCursor::mantissa(layout),
            exponent: -1,
            leading: false,
            subnormal: false,
        }
    }

    /// Encodes the finite number `d`, returning the status flags the caller
    /// should raise.
    fn encode(mut self, d: &Decimal<N>) -> u32 {
        let negative = d.is_negative();
        let layout = self.layout;
        write_field(self.bytes, layout, layout.sign_offset(), 1, u32::from(negative));

        // Split |d| into an integer part and a fractional remainder.
        let mut frac = d.clone();
        frac.set_negative(false);
        let mut int = frac.clone();
        self.work.to_integral(&mut int, Rounding::Down);
        self.work.set_rounding(Rounding::HalfUp);
        if !int.is_zero() {
            self.work.sub(&mut frac, &int);
        }

        let mut tail = None;
        if !int.is_zero() {
            let int = match self.integer_bits(&int) {
                Some(int) => int,
                None => return self.overflow(negative),
            };
            tail = self.place_integer(&int, !frac.is_zero());
        }
        if tail.is_none() && !frac.is_zero() {
            tail = self.place_fraction(&frac);
        }

        let tiny = self.subnormal;
        if self.leading && !tiny {
            self.set_biased_exponent((self.exponent + self.layout.exponent_bias()) as u32);
        }

        let mut flags = 0;
        if let Some(tail) = tail {
            flags |= decnumber_sys::DEC_Inexact | decnumber_sys::DEC_Rounded;
            let mut last = self.cursor;
            last.retreat();
            if tail.rounds_up(self.rounding, negative, last.read(self.bytes)) {
                self.increment();
            }
            if self.biased_exponent() == self.layout.max_biased_exponent() {
                flags |= decnumber_sys::DEC_Overflow;
            }
        }
        if tiny {
            flags |= decnumber_sys::DEC_Subnormal;
            if tail.is_some() {
                flags |= decnumber_sys::DEC_Underflow;
            }
        }
        flags
    }

    /// Converts the integral decimal `int` into a binary integer.
    ///
    /// Returns `None` if the integer exceeds the layout's largest finite
    /// value.
    fn integer_bits(&self, int: &Decimal<N>) -> Option<BigUint> {
        // 10^adjusted <= int, and log10(2) ~= 0.30103.
        let adjusted = i64::from(int.digits()) + i64::from(int.exponent()) - 1;
        let limit = (i64::from(self.layout.max_exponent()) + 1) * 30103 / 100000;
        if adjusted > limit {
            return None;
        }

        let mut acc = coefficient(int);
        if int.exponent() > 0 {
            acc *= BigUint::from(10u32).pow(int.exponent() as u32);
        }
        if acc.bits() - 1 > self.layout.max_exponent() as u64 {
            return None;
        }
        Some(acc)
    }

    /// Writes the bits of the nonzero binary integer `int` into the mantissa.
    ///
    /// Returns the tail if the integer has more significant bits than the
    /// mantissa can hold; `frac_nonzero` reports whether a fractional part
    /// follows the integer.
    fn place_integer(&mut self, int: &BigUint, frac_nonzero: bool) -> Option<Tail> {
        let len = int.bits();
        self.exponent = (len - 1) as i32;
        self.place_leading();
        for i in (0..len - 1).rev() {
            if self.cursor.is_exhausted() {
                let rest = frac_nonzero || (0..i).any(|j| int.bit(j));
                return Tail::from_bits(int.bit(i), rest);
            }
            self.cursor.write(self.bytes, int.bit(i));
            self.cursor.advance();
        }
        None
    }

    /// Expands the fraction `frac`, which is in `(0, 1)`, into mantissa bits
    /// until the mantissa is full or the fraction is exhausted.
    ///
    /// Returns the tail if the fraction could not be represented exactly.
    fn place_fraction(&mut self, frac: &Decimal<N>) -> Option<Tail> {
        let mut halves = HalfPowers::new(frac);
        while !self.cursor.is_exhausted() && !halves.is_exhausted() {
            halves.halve();
            let one = halves.take();
            if self.leading {
                self.cursor.write(self.bytes, one);
                self.cursor.advance();
            } else if one {
                self.place_leading();
            } else if self.exponent == self.layout.min_exponent() {
                // The next bit lies below the normal range: store the rest as
                // a subnormal, whose leading bit is zero.
                self.leading = true;
                self.subnormal = true;
                if !self.layout.has_implicit_bit() {
                    self.cursor.advance();
                }
            } else {
                self.exponent -= 1;
            }
        }
        if halves.is_exhausted() {
            return None;
        }
        halves.halve();
        match halves.remainder_cmp() {
            Ordering::Greater => Some(Tail::Above),
            Ordering::Equal => Some(Tail::Half),
            Ordering::Less => Some(Tail::Below),
        }
    }

    /// Records the leading one bit of a normal value. Layouts with a hidden
    /// bit consume it without writing; otherwise it is stored explicitly.
    fn place_leading(&mut self) {
        self.leading = true;
        if self.layout.has_implicit_bit() {
            self.cursor.retreat();
        } else {
            self.cursor.write(self.bytes, true);
        }
        self.cursor.advance();
    }

    /// Adds one unit in the last place to the mantissa. A carry out of the
    /// mantissa propagates into the exponent field.
    fn increment(&mut self) {
        let lead = BitCursor::mantissa(self.layout);
        let lead_before = lead.read(self.bytes);

        let mut c = self.cursor;
        loop {
            c.retreat();
            if c.read(self.bytes) {
                c.write(self.bytes, false);
            } else {
                c.write(self.bytes, true);
                break;
            }
        }

        if !self.layout.has_implicit_bit() {
            let lead_after = lead.read(self.bytes);
            if lead_before && !lead_after {
                // The carry left the explicit leading bit and bumped the
                // exponent; the mantissa is now 1.000...
                lead.write(self.bytes, true);
            } else if !lead_before && lead_after {
                // A subnormal rounded up to the smallest normal.
                self.set_biased_exponent(1);
            }
        }
    }

    fn biased_exponent(&self) -> u32 {
        let layout = self.layout;
        read_field(self.bytes, layout, layout.exponent_offset(), layout.exponent_bits())
    }

    fn set_biased_exponent(&mut self, biased: u32) {
        let layout = self.layout;
        write_field(self.bytes, layout, layout.exponent_offset(), layout.exponent_bits(), biased);
    }

    fn overflow(self, negative: bool) -> u32 {
        write_infinity(self.bytes, self.layout, negative);
        decnumber_sys::DEC_Overflow | decnumber_sys::DEC_Inexact | decnumber_sys::DEC_Rounded
    }
}

/// The remainder of a decimal fraction and the current power of one half,
/// both held exactly as integer multiples of `10^-scale`.
///
/// Halving multiplies the power by five and moves it one decimal place to
/// the right, so neither value is ever rounded no matter how many bits the
/// expansion takes.
struct HalfPowers {
    remainder: BigUint,
    power: BigUint,
}

impl HalfPowers {
    /// Starts at a power of one for the nonzero fraction `frac`.
    fn new<const N: usize>(frac: &Decimal<N>) -> HalfPowers {
        debug_assert!(frac.exponent() < 0);
        let scale = frac.exponent().unsigned_abs();
        HalfPowers {
            remainder: coefficient(frac),
            power: BigUint::from(10u32).pow(scale),
        }
    }

    fn halve(&mut self) {
        if self.power.bit(0) {
            self.power *= 10u32;
            self.remainder *= 10u32;
        }
        self.power >>= 1;
    }

    /// Subtracts the current power from the remainder if it fits, reporting
    /// whether it did. That is the value of the current bit.
    fn take(&mut self) -> bool {
        if self.power <= self.remainder {
            self.remainder -= &self.power;
            true
        } else {
            false
        }
    }

    fn is_exhausted(&self) -> bool {
        self.remainder.is_zero()
    }

    fn remainder_cmp(&self) -> Ordering {
        self.remainder.cmp(&self.power)
    }
}

/// Returns the coefficient of the finite number `d` as a binary integer, by
/// Horner's method over its storage units, most significant unit first.
fn coefficient<const N: usize>(d: &Decimal<N>) -> BigUint {
    let mut acc = BigUint::zero();
    for &unit in d.units().iter().rev() {
        acc = acc * UNIT_RADIX + u32::from(unit);
    }
    acc
}

/// Writes the layout's default quiet NaN: all exponent bits and the most
/// significant fraction bit set.
fn write_nan(bytes: &mut [u8], layout: &BinaryLayout) {
    write_special_exponent(bytes, layout);
    let mut c = BitCursor::mantissa(layout);
    if !layout.has_implicit_bit() {
        c.write(bytes, true);
        c.advance();
    }
    c.write(bytes, true);
}

fn write_infinity(bytes: &mut [u8], layout: &BinaryLayout, negative: bool) {
    bytes.iter_mut().for_each(|b| *b = 0);
    write_field(bytes, layout, layout.sign_offset(), 1, u32::from(negative));
    write_special_exponent(bytes, layout);
    if !layout.has_implicit_bit() {
        BitCursor::mantissa(layout).write(bytes, true);
    }
}

fn write_special_exponent(bytes: &mut [u8], layout: &BinaryLayout) {
    let biased = layout.max_biased_exponent();
    write_field(bytes, layout, layout.exponent_offset(), layout.exponent_bits(), biased);
}
