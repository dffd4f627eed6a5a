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

use crate::context::Context;
use crate::cursor::{read_field, BitCursor};
use crate::decimal::Decimal;
use crate::layout::BinaryLayout;

impl<const N: usize> Context<Decimal<N>> {
    /// Decodes the binary floating-point value in `bytes`, which is encoded
    /// with the specified layout.
    ///
    /// The mantissa is summed exactly in decimal, one power of one half per
    /// set bit, and then scaled by two raised to the binary exponent. The
    /// result is exact whenever `Decimal<N>` has enough digits to hold it;
    /// otherwise it is rounded and the inexact flag is raised.
    ///
    /// NaNs decode to a quiet NaN and infinities to the infinity of the same
    /// sign. Subnormal inputs raise the subnormal flag. The underflow flag is
    /// raised if the exponent of the result equals the context's minimum
    /// exponent.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not `layout.total_bytes()` long.
    pub fn from_binary(&mut self, bytes: &[u8], layout: &BinaryLayout) -> Decimal<N> {
        assert_eq!(
            bytes.len(),
            layout.total_bytes(),
            "binary value does not match its layout"
        );

        let negative = read_field(bytes, layout, layout.sign_offset(), 1) == 1;
        let biased = read_field(bytes, layout, layout.exponent_offset(), layout.exponent_bits());

        if biased == layout.max_biased_exponent() {
            let mut c = BitCursor::mantissa(layout);
            if !layout.has_implicit_bit() {
                // The x87 integer bit is set for both infinities and NaNs.
                c.advance();
            }
            let mut fraction = false;
            while !c.is_exhausted() {
                fraction |= c.read(bytes);
                c.advance();
            }
            return if fraction {
                Decimal::nan()
            } else {
                let mut d = Decimal::infinity();
                d.set_negative(negative);
                d
            };
        }

        let subnormal = biased == 0;
        let mut work = self.scratch();
        let mut acc = Decimal::<N>::zero();
        let mut power = Decimal::<N>::from(1u32);

        let mut c = BitCursor::mantissa(layout);
        if !layout.has_implicit_bit() {
            // The explicit leading bit has the weight of `power` itself.
            if c.read(bytes) {
                work.add(&mut acc, &power);
            }
            c.advance();
        } else if !subnormal {
            work.add(&mut acc, &power);
        }
        while !c.is_exhausted() {
            work.halve(&mut power);
            if c.read(bytes) {
                work.add(&mut acc, &power);
            }
            c.advance();
        }

        if acc.is_zero() {
            let mut d = Decimal::zero();
            d.set_negative(negative);
            return d;
        }

        let exponent = if subnormal {
            layout.min_exponent()
        } else {
            biased as i32 - layout.exponent_bias()
        };
        let mut scale = Decimal::<N>::from(2u32);
        work.pow(&mut scale, &Decimal::from(exponent));
        if work.status().inexact() {
            self.raise(decnumber_sys::DEC_Inexact | decnumber_sys::DEC_Rounded);
        }

        self.mul(&mut acc, &scale);
        self.reduce(&mut acc);
        acc.set_negative(negative);

        if subnormal {
            self.raise(decnumber_sys::DEC_Subnormal);
        }
        if acc.exponent() as isize == self.min_exponent() {
            self.raise(decnumber_sys::DEC_Underflow);
        }
        acc
    }

    /// Decodes an `f64`.
    ///
    /// See [`Context::from_binary`] for details.
    pub fn from_f64(&mut self, n: f64) -> Decimal<N> {
        self.from_binary(&n.to_ne_bytes(), &BinaryLayout::F64)
    }

    /// Decodes a value stored in the platform's `long double` layout,
    /// [`BinaryLayout::NATIVE`].
    pub fn from_native(&mut self, bytes: &[u8]) -> Decimal<N> {
        self.from_binary(bytes, &BinaryLayout::NATIVE)
    }
}
