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

use std::cmp::Ordering;
use std::ffi::{CStr, CString};
use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::str::FromStr;

use libc::c_char;
#[cfg(feature = "serde")]
use serde::{de, ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

use crate::context::{Context, Defaults, Rounding};
use crate::error::{InvalidExponentError, InvalidPrecisionError, ParseDecimalError};

/// The radix of one coefficient storage unit.
pub(crate) const UNIT_RADIX: u32 = 1000;

fn validate_n(n: usize) {
    if n < 12 || n > 999_999_999 {
        panic!("Decimal<N>:: N is not in the range [12, 999999999]");
    }
}

/// An arbitrary-precision decimal number.
///
/// The coefficient is stored in `N` units of three decimal digits each,
/// least-significant unit first, so a value of type `Decimal<12>` has space
/// for 36 decimal digits. The layout matches libdecnumber's `decNumber`, which
/// performs all arithmetic on the value.
///
/// `N` must be at least 12 and no greater than 999,999,999. This is checked
/// at runtime when a number is constructed.
#[repr(C)]
#[derive(Clone)]
pub struct Decimal<const N: usize> {
    pub(crate) digits: u32,
    pub(crate) exponent: i32,
    pub(crate) bits: u8,
    pub(crate) lsu: [u16; N],
}

impl<const N: usize> Decimal<N> {
    pub(crate) fn as_ptr(&self) -> *const decnumber_sys::decNumber {
        self as *const Decimal<N> as *const decnumber_sys::decNumber
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut decnumber_sys::decNumber {
        self as *mut Decimal<N> as *mut decnumber_sys::decNumber
    }

    /// Constructs a decimal number representing the number 0.
    pub fn zero() -> Decimal<N> {
        Decimal::default()
    }

    /// Constructs a decimal number representing positive infinity.
    pub fn infinity() -> Decimal<N> {
        let mut d = Decimal::default();
        d.bits = decnumber_sys::DECINF;
        d
    }

    /// Constructs a decimal number representing a non-signaling NaN.
    pub fn nan() -> Decimal<N> {
        let mut d = Decimal::default();
        d.bits = decnumber_sys::DECNAN;
        d
    }

    /// Returns the number of significant digits in the coefficient.
    ///
    /// If the number is zero or infinite, returns 1.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Returns the exponent of the number.
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Returns the coefficient storage units that hold significant digits,
    /// least-significant unit first.
    ///
    /// Each unit holds a value in the range `[0, 999]`.
    pub fn units(&self) -> &[u16] {
        let n = (self.digits as usize + decnumber_sys::DECDPUN - 1) / decnumber_sys::DECDPUN;
        &self.lsu[..n.clamp(1, N)]
    }

    /// Reports whether the number is finite.
    ///
    /// A finite number is one that is neither infinite nor a NaN.
    pub fn is_finite(&self) -> bool {
        (self.bits & decnumber_sys::DECSPECIAL) == 0
    }

    /// Reports whether the number is positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        (self.bits & decnumber_sys::DECINF) != 0
    }

    /// Reports whether the number is a NaN.
    pub fn is_nan(&self) -> bool {
        (self.bits & (decnumber_sys::DECNAN | decnumber_sys::DECSNAN)) != 0
    }

    /// Reports whether the number is negative.
    ///
    /// A negative number is either negative zero, less than zero, or NaN
    /// with a sign of one.
    pub fn is_negative(&self) -> bool {
        (self.bits & decnumber_sys::DECNEG) != 0
    }

    /// Reports whether the number has a special value.
    ///
    /// A special value is either infinity or NaN. This is the inverse of
    /// [`Decimal::is_finite`].
    pub fn is_special(&self) -> bool {
        (self.bits & decnumber_sys::DECSPECIAL) != 0
    }

    /// Reports whether the number is positive or negative zero.
    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.lsu[0] == 0 && self.digits == 1
    }

    /// Sets or clears the sign of the number without touching its magnitude.
    pub(crate) fn set_negative(&mut self, negative: bool) {
        if negative {
            self.bits |= decnumber_sys::DECNEG;
        } else {
            self.bits &= !decnumber_sys::DECNEG;
        }
    }

    /// Returns the raw parts of this decimal.
    ///
    /// The meaning of these parts are unspecified and subject to change.
    pub fn to_raw_parts(&self) -> (u32, i32, u8, [u16; N]) {
        (self.digits, self.exponent, self.bits, self.lsu)
    }
}

impl<const N: usize> Default for Decimal<N> {
    fn default() -> Decimal<N> {
        validate_n(N);
        Decimal {
            digits: 1,
            exponent: 0,
            bits: 0,
            lsu: [0; N],
        }
    }
}

impl<const N: usize> fmt::Debug for Decimal<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<const N: usize> fmt::Display for Decimal<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // String conversion may need up to `self.digits + 14` characters,
        // per the libdecnumber documentation.
        let mut buf = Vec::with_capacity(self.digits as usize + 14);
        let c_str = unsafe {
            if f.alternate() {
                decnumber_sys::decNumberToEngString(self.as_ptr(), buf.as_mut_ptr() as *mut c_char);
            } else {
                decnumber_sys::decNumberToString(self.as_ptr(), buf.as_mut_ptr() as *mut c_char);
            }
            CStr::from_ptr(buf.as_ptr() as *const c_char)
        };
        f.write_str(&c_str.to_string_lossy())
    }
}

impl<const N: usize> FromStr for Decimal<N> {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Decimal<N>, ParseDecimalError> {
        Context::<Decimal<N>>::default().parse(s)
    }
}

impl<const N: usize> PartialEq for Decimal<N> {
    /// Compares numerically; NaNs are never equal, `0 == -0` and
    /// `1.0 == 1`.
    fn eq(&self, other: &Decimal<N>) -> bool {
        Context::<Decimal<N>>::default().partial_cmp(self, other) == Some(Ordering::Equal)
    }
}

#[cfg(feature = "serde")]
impl<const N: usize> Serialize for Decimal<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Decimal", 4)?;
        s.serialize_field("digits", &self.digits)?;
        s.serialize_field("exponent", &self.exponent)?;
        s.serialize_field("bits", &self.bits)?;
        s.serialize_field("lsu", &self.lsu[..])?;
        s.end()
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename = "Decimal")]
struct RawDecimal {
    digits: u32,
    exponent: i32,
    bits: u8,
    lsu: Vec<u16>,
}

#[cfg(feature = "serde")]
impl<'de, const N: usize> Deserialize<'de> for Decimal<N> {
    fn deserialize<D>(deserializer: D) -> Result<Decimal<N>, D::Error>
    where
        D: Deserializer<'de>,
    {
        validate_n(N);
        let raw = RawDecimal::deserialize(deserializer)?;
        let len = raw.lsu.len();
        let lsu: [u16; N] = raw
            .lsu
            .try_into()
            .map_err(|_| de::Error::invalid_length(len, &"one entry per decimal unit"))?;
        if lsu.iter().any(|u| u32::from(*u) >= UNIT_RADIX) {
            return Err(de::Error::custom("decimal unit out of range"));
        }
        if raw.digits == 0 || raw.digits as usize > N * decnumber_sys::DECDPUN {
            return Err(de::Error::custom("decimal digit count out of range"));
        }
        Ok(Decimal {
            digits: raw.digits,
            exponent: raw.exponent,
            bits: raw.bits,
            lsu,
        })
    }
}

impl<const N: usize> Default for Context<Decimal<N>> {
    fn default() -> Context<Decimal<N>> {
        Context::with_defaults(&Defaults::default())
    }
}

impl<const N: usize> Context<Decimal<N>> {
    /// Constructs a context with the maximum precision of `Decimal<N>`,
    /// libdecnumber's widest exponent range, and the rounding algorithm from
    /// `defaults`.
    pub fn with_defaults(defaults: &Defaults) -> Context<Decimal<N>> {
        validate_n(N);
        let mut ctx = MaybeUninit::<decnumber_sys::decContext>::uninit();
        let mut ctx = unsafe {
            decnumber_sys::decContextDefault(ctx.as_mut_ptr(), decnumber_sys::DEC_INIT_BASE);
            ctx.assume_init()
        };
        ctx.traps = 0;
        ctx.digits = max_precision::<N>();
        ctx.round = defaults.rounding().to_c();
        Context {
            inner: ctx,
            _phantom: PhantomData,
        }
    }

    /// Returns a fresh context for intermediate steps of a conversion: full
    /// precision, the widest exponent range, an empty status and this
    /// context's rounding algorithm.
    pub(crate) fn scratch(&self) -> Context<Decimal<N>> {
        Context::with_defaults(&Defaults::new(self.rounding()))
    }

    /// Returns the context's precision.
    ///
    /// Operations that use this context will be rounded to this length if
    /// necessary.
    pub fn precision(&self) -> usize {
        self.inner.digits as usize
    }

    /// Sets the context's precision.
    ///
    /// The precision must be at least one and no greater than `N * 3`.
    pub fn set_precision(&mut self, precision: usize) -> Result<(), InvalidPrecisionError> {
        let max = N * decnumber_sys::DECDPUN;
        if precision < 1 || precision > max {
            return Err(InvalidPrecisionError { max });
        }
        self.inner.digits = i32::try_from(precision).map_err(|_| InvalidPrecisionError { max })?;
        Ok(())
    }

    /// Returns the context's maximum exponent.
    pub fn max_exponent(&self) -> isize {
        self.inner.emax as isize
    }

    /// Sets the context's maximum exponent.
    ///
    /// The maximum exponent must not be negative and no greater than
    /// 999,999,999.
    pub fn set_max_exponent(&mut self, e: isize) -> Result<(), InvalidExponentError> {
        if e < 0 || e > 999999999 {
            return Err(InvalidExponentError);
        }
        self.inner.emax = i32::try_from(e).map_err(|_| InvalidExponentError)?;
        Ok(())
    }

    /// Returns the context's minimum exponent.
    pub fn min_exponent(&self) -> isize {
        self.inner.emin as isize
    }

    /// Sets the context's minimum exponent.
    ///
    /// The minimum exponent must not be positive and no smaller than
    /// -999,999,999.
    pub fn set_min_exponent(&mut self, e: isize) -> Result<(), InvalidExponentError> {
        if e > 0 || e < -999999999 {
            return Err(InvalidExponentError);
        }
        self.inner.emin = i32::try_from(e).map_err(|_| InvalidExponentError)?;
        Ok(())
    }

    /// Parses a number from its string representation.
    pub fn parse<S>(&mut self, s: S) -> Result<Decimal<N>, ParseDecimalError>
    where
        S: Into<Vec<u8>>,
    {
        let c_string = CString::new(s).map_err(|_| ParseDecimalError)?;
        let mut d = Decimal::<N>::zero();
        unsafe {
            decnumber_sys::decNumberFromString(d.as_mut_ptr(), c_string.as_ptr(), &mut self.inner);
        }
        if (self.inner.status & decnumber_sys::DEC_Conversion_syntax) != 0 {
            Err(ParseDecimalError)
        } else {
            Ok(d)
        }
    }

    /// Computes the absolute value of `n`, storing the result in `n`.
    pub fn abs(&mut self, n: &mut Decimal<N>) {
        unsafe {
            decnumber_sys::decNumberAbs(n.as_mut_ptr(), n.as_ptr(), &mut self.inner);
        }
    }

    /// Adds `lhs` and `rhs`, storing the result in `lhs`.
    pub fn add(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        unsafe {
            decnumber_sys::decNumberAdd(
                lhs.as_mut_ptr(),
                lhs.as_ptr(),
                rhs.as_ptr(),
                &mut self.inner,
            );
        }
    }

    /// Subtracts `rhs` from `lhs`, storing the result in `lhs`.
    pub fn sub(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        unsafe {
            decnumber_sys::decNumberSubtract(
                lhs.as_mut_ptr(),
                lhs.as_ptr(),
                rhs.as_ptr(),
                &mut self.inner,
            );
        }
    }

    /// Multiples `lhs` by `rhs`, storing the result in `lhs`.
    pub fn mul(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        unsafe {
            decnumber_sys::decNumberMultiply(
                lhs.as_mut_ptr(),
                lhs.as_ptr(),
                rhs.as_ptr(),
                &mut self.inner,
            );
        }
    }

    /// Subtracts `n` from zero, storing the result in `n`.
    pub fn minus(&mut self, n: &mut Decimal<N>) {
        unsafe {
            decnumber_sys::decNumberMinus(n.as_mut_ptr(), n.as_ptr(), &mut self.inner);
        }
    }

    /// Raises `x` to the power of `y`, storing the result in `x`.
    pub fn pow(&mut self, x: &mut Decimal<N>, y: &Decimal<N>) {
        unsafe {
            decnumber_sys::decNumberPower(x.as_mut_ptr(), x.as_ptr(), y.as_ptr(), &mut self.inner);
        }
    }

    /// Rounds `n` to an integral value using `rounding`, storing the result
    /// in `n`.
    ///
    /// The context's own rounding algorithm is left unchanged.
    pub fn to_integral(&mut self, n: &mut Decimal<N>, rounding: Rounding) {
        let saved = self.inner.round;
        self.inner.round = rounding.to_c();
        unsafe {
            decnumber_sys::decNumberToIntegralValue(n.as_mut_ptr(), n.as_ptr(), &mut self.inner);
        }
        self.inner.round = saved;
    }

    /// Rounds or pads `lhs` so that it has the same exponent as `rhs`, storing
    /// the result in `lhs`.
    pub fn quantize(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        unsafe {
            decnumber_sys::decNumberQuantize(
                lhs.as_mut_ptr(),
                lhs.as_ptr(),
                rhs.as_ptr(),
                &mut self.inner,
            );
        }
    }

    /// Reduces `n`'s coefficient to its shortest possible form without
    /// changing the value of the result, storing the result in `n`.
    pub fn reduce(&mut self, n: &mut Decimal<N>) {
        unsafe {
            decnumber_sys::decNumberReduce(n.as_mut_ptr(), n.as_ptr(), &mut self.inner);
        }
    }

    /// Divides `n` by two exactly, storing the result in `n`.
    ///
    /// The halving is computed as `n * 5 / 10`, where the division by ten
    /// only moves the exponent, so no digits are lost unless the product
    /// itself exceeds the precision.
    pub(crate) fn halve(&mut self, n: &mut Decimal<N>) {
        self.mul(n, &Decimal::from(5u32));
        if !n.is_zero() {
            n.exponent -= 1;
        }
    }

    /// Determines the ordering of `lhs` relative to `rhs`, using a partial
    /// order.
    ///
    /// If either `lhs` or `rhs` is a NaN, returns `None`.
    pub fn partial_cmp(&mut self, lhs: &Decimal<N>, rhs: &Decimal<N>) -> Option<Ordering> {
        let mut d = Decimal::<N>::zero();
        unsafe {
            decnumber_sys::decNumberCompare(
                d.as_mut_ptr(),
                lhs.as_ptr(),
                rhs.as_ptr(),
                &mut self.inner,
            );
        }
        if d.is_nan() {
            None
        } else if d.is_negative() {
            Some(Ordering::Less)
        } else if d.is_zero() {
            Some(Ordering::Equal)
        } else {
            debug_assert!(!d.is_special());
            Some(Ordering::Greater)
        }
    }

    /// Reports whether `lhs` is less than or equal to `rhs`.
    ///
    /// Always false if either operand is a NaN.
    pub fn le(&mut self, lhs: &Decimal<N>, rhs: &Decimal<N>) -> bool {
        matches!(
            self.partial_cmp(lhs, rhs),
            Some(Ordering::Less | Ordering::Equal)
        )
    }
}

fn max_precision<const N: usize>() -> i32 {
    // libdecnumber caps precision at 999,999,999 digits.
    N.saturating_mul(decnumber_sys::DECDPUN).min(999_999_999) as i32
}
