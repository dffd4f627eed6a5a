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

//! Conversions between decimals and primitive integers.

use crate::context::{Context, Rounding};
use crate::decimal::{Decimal, UNIT_RADIX};

impl<const N: usize> Decimal<N> {
    /// Builds a decimal from `n` one storage unit at a time, least
    /// significant unit first.
    fn from_unsigned(mut n: u64) -> Decimal<N> {
        let mut d = Decimal::zero();
        d.digits = n.checked_ilog10().map_or(1, |l| l + 1);
        let radix = u64::from(UNIT_RADIX);
        let mut i = 0;
        while n > 0 {
            d.lsu[i] = (n % radix) as u16;
            n /= radix;
            i += 1;
        }
        d
    }

    /// Truncates the number toward zero and clamps it to `[min, max]`.
    fn to_saturating(&self, min: i128, max: i128) -> i128 {
        let negative = self.is_negative();
        let saturated = if negative { min } else { max };
        if self.is_nan() {
            return min;
        } else if self.is_infinite() {
            return saturated;
        }

        let max_digits = max.ilog10() + 1;
        let mut cx = Context::<Decimal<N>>::default();
        cx.inner.digits = max_digits as i32 + 1;
        let mut d = self.clone();
        cx.to_integral(&mut d, Rounding::Down);
        if d.is_zero() {
            return 0;
        }
        if d.exponent > 0 {
            if i64::from(d.digits) + i64::from(d.exponent) > i64::from(max_digits) {
                return saturated;
            }
            cx.quantize(&mut d, &Decimal::zero());
        }
        if d.digits > max_digits {
            return saturated;
        }
        debug_assert_eq!(d.exponent, 0);

        let mut v = 0i128;
        for &unit in d.units().iter().rev() {
            v = v * i128::from(UNIT_RADIX) + i128::from(unit);
        }
        if negative {
            v = -v;
        }
        v.clamp(min, max)
    }
}

macro_rules! decimal_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl<const N: usize> From<$t> for Decimal<N> {
                fn from(n: $t) -> Decimal<N> {
                    Decimal::from_unsigned(n as u64)
                }
            }
        )*
    };
}

macro_rules! decimal_from_signed {
    ($($t:ty),*) => {
        $(
            impl<const N: usize> From<$t> for Decimal<N> {
                fn from(n: $t) -> Decimal<N> {
                    let mut d = Decimal::from_unsigned(n.unsigned_abs() as u64);
                    d.set_negative(n < 0);
                    d
                }
            }
        )*
    };
}

macro_rules! decimal_to_signed {
    ($($t:ty),*) => {
        $(
            paste::paste! {
                #[doc = concat!(
                    "Converts the number to an `", stringify!($t), "`, ",
                    "truncating any fractional part.\n\n",
                    "Values outside the range of `", stringify!($t), "` saturate to ",
                    "its minimum or maximum. Infinities saturate according to their ",
                    "sign; NaNs become the minimum."
                )]
                pub fn [<to_ $t>](&self) -> $t {
                    self.to_saturating(i128::from(<$t>::MIN), i128::from(<$t>::MAX)) as $t
                }
            }
        )*
    };
}

decimal_from_unsigned!(u8, u16, u32, u64, usize);
decimal_from_signed!(i8, i16, i32, i64, isize);

impl<const N: usize> Decimal<N> {
    decimal_to_signed!(i8, i16, i32, i64);

    /// Converts the number to an `isize`, truncating any fractional part.
    ///
    /// Saturates like [`Decimal::to_i64`].
    pub fn to_isize(&self) -> isize {
        self.to_saturating(isize::MIN as i128, isize::MAX as i128) as isize
    }
}
