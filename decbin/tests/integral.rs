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

use std::error::Error;

use decbin::{Context, Decimal};

#[test]
fn test_from_integers() -> Result<(), Box<dyn Error>> {
    let mut cx = Context::<Decimal<12>>::default();

    let d = Decimal::<12>::from(1234567890123u64);
    assert_eq!(d.digits(), 13);
    assert_eq!(d.units(), &[123, 890, 567, 234, 1]);
    assert_eq!(d, cx.parse("1234567890123")?);

    assert_eq!(Decimal::<12>::from(0u8).to_string(), "0");
    assert_eq!(Decimal::<12>::from(1000u16).digits(), 4);
    assert_eq!(Decimal::<12>::from(u64::MAX).to_string(), u64::MAX.to_string());
    assert_eq!(Decimal::<12>::from(i64::MIN).to_string(), i64::MIN.to_string());
    assert_eq!(Decimal::<12>::from(-7i8).to_string(), "-7");
    assert_eq!(Decimal::<12>::from(isize::MAX).to_string(), isize::MAX.to_string());
    Ok(())
}

#[test]
fn test_to_integers() -> Result<(), Box<dyn Error>> {
    let mut cx = Context::<Decimal<12>>::default();
    for (input, expected) in [
        ("0", 0),
        ("-0", 0),
        ("12.9", 12),
        ("-12.9", -12),
        ("1234567890123", 1234567890123),
        ("1.5E+3", 1500),
        ("9223372036854775807", i64::MAX),
        ("-9223372036854775808", i64::MIN),
        ("9223372036854775808", i64::MAX),
        ("-1E+19", i64::MIN),
        ("1E+30", i64::MAX),
        ("1E-30", 0),
        ("Infinity", i64::MAX),
        ("-Infinity", i64::MIN),
        ("NaN", i64::MIN),
    ] {
        let d = cx.parse(input)?;
        assert_eq!(d.to_i64(), expected, "{}", input);
    }
    Ok(())
}

#[test]
fn test_small_integers_saturate() -> Result<(), Box<dyn Error>> {
    let mut cx = Context::<Decimal<12>>::default();
    let d = cx.parse("300")?;
    assert_eq!(d.to_i8(), i8::MAX);
    assert_eq!(d.to_i16(), 300);
    let d = cx.parse("-300.5")?;
    assert_eq!(d.to_i8(), i8::MIN);
    assert_eq!(d.to_i16(), -300);
    let d = cx.parse("-2147483648.99")?;
    assert_eq!(d.to_i32(), i32::MIN);
    assert_eq!(d.to_isize(), -2147483648);
    let d = cx.parse("7E+5")?;
    assert_eq!(d.to_i16(), i16::MAX);
    assert_eq!(d.to_i32(), 700_000);
    Ok(())
}

#[test]
fn test_integer_roundtrip_through_f64() -> Result<(), Box<dyn Error>> {
    // Decoding a 53-bit mantissa exactly takes 53 digits.
    let mut cx = Context::<Decimal<20>>::default();
    for n in [0i64, 1, -1, 42, 1 << 53, -(1 << 40) - 7] {
        let f = cx.to_f64(&Decimal::from(n));
        assert_eq!(f, n as f64);
        assert_eq!(cx.from_f64(f).to_i64(), n);
    }
    assert!(!cx.status().inexact());
    Ok(())
}
