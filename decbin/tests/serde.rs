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

use serde_json::json;
use serde_test::{assert_tokens, Token};

use decbin::{ByteOrder, Context, Decimal, Defaults, Format, Rounding};

#[test]
fn test_serde_decimal() {
    const N: usize = 12;
    let mut cx = Context::<Decimal<N>>::default();
    let d = cx.parse("-12.34").unwrap();

    let mut tokens = vec![
        Token::Struct {
            name: "Decimal",
            len: 4,
        },
        Token::Str("digits"),
        Token::U32(4),
        Token::Str("exponent"),
        Token::I32(-2),
        Token::Str("bits"),
        // decnumber_sys::DECNEG
        Token::U8(128),
        Token::Str("lsu"),
        Token::Seq { len: Some(12) },
        Token::U16(234),
        Token::U16(1),
    ];
    tokens.extend(std::iter::repeat(Token::U16(0)).take(10));
    tokens.extend([Token::SeqEnd, Token::StructEnd]);
    assert_tokens(&d, &tokens);

    // Rounded to the 36 digits a Decimal<12> holds.
    let d = cx
        .parse("1234567890123456789012345678901234567890")
        .unwrap();
    assert_tokens(
        &d,
        &[
            Token::Struct {
                name: "Decimal",
                len: 4,
            },
            Token::Str("digits"),
            Token::U32(36),
            Token::Str("exponent"),
            Token::I32(4),
            Token::Str("bits"),
            Token::U8(0),
            Token::Str("lsu"),
            Token::Seq { len: Some(12) },
            Token::U16(457),
            Token::U16(123),
            Token::U16(890),
            Token::U16(567),
            Token::U16(234),
            Token::U16(901),
            Token::U16(678),
            Token::U16(345),
            Token::U16(12),
            Token::U16(789),
            Token::U16(456),
            Token::U16(123),
            Token::SeqEnd,
            Token::StructEnd,
        ],
    );

    for (json, err) in vec![
        (
            json!(1i32),
            "invalid type: integer `1`, expected struct Decimal",
        ),
        (
            json!("-1"),
            "invalid type: string \"-1\", expected struct Decimal",
        ),
        (
            json!({"digits": 1, "exponent": 0, "bits": 0, "lsu": [1, 2]}),
            "invalid length 2, expected one entry per decimal unit",
        ),
        (
            json!({"digits": 1, "exponent": 0, "bits": 0, "lsu": [1000, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]}),
            "decimal unit out of range",
        ),
        (
            json!({"digits": 37, "exponent": 0, "bits": 0, "lsu": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]}),
            "decimal digit count out of range",
        ),
    ] {
        assert_eq!(
            serde_json::from_value::<Decimal<N>>(json)
                .unwrap_err()
                .to_string(),
            err
        );
    }
}

#[test]
fn test_serde_json_roundtrip() {
    let mut cx = Context::<Decimal<12>>::default();
    let d = cx.parse("0.1").unwrap();
    let f = cx.to_f64(&d);

    let json = serde_json::to_string(&d).unwrap();
    let back: Decimal<12> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, d);
    assert_eq!(cx.to_f64(&back), f);
}

#[test]
fn test_serde_configuration() {
    assert_tokens(
        &Rounding::HalfEven,
        &[Token::UnitVariant {
            name: "Rounding",
            variant: "HalfEven",
        }],
    );
    assert_tokens(
        &Defaults::default(),
        &[
            Token::Struct {
                name: "Defaults",
                len: 1,
            },
            Token::Str("rounding"),
            Token::UnitVariant {
                name: "Rounding",
                variant: "HalfEven",
            },
            Token::StructEnd,
        ],
    );
    assert_tokens(
        &ByteOrder::Little,
        &[Token::UnitVariant {
            name: "ByteOrder",
            variant: "Little",
        }],
    );
    assert_tokens(
        &Format::Extended80,
        &[Token::UnitVariant {
            name: "Format",
            variant: "Extended80",
        }],
    );

    let defaults: Defaults = serde_json::from_str(r#"{"rounding":"Floor"}"#).unwrap();
    let cx = Context::<Decimal<12>>::with_defaults(&defaults);
    assert_eq!(cx.rounding(), Rounding::Floor);
}
