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

//! decbin converts between arbitrary-precision decimal numbers and binary
//! floating-point encodings.
//!
//! # Introduction
//!
//! A binary floating-point value such as `0.1f64` is not the decimal number
//! it was written as; it is the nearest sum of powers of two. decbin moves
//! values across that boundary without ever performing binary floating-point
//! arithmetic. Every intermediate step happens in decimal, where the powers
//! of one half that make up a binary fraction are exactly representable, and
//! the binary encoding is assembled bit by bit.
//!
//! # Details
//!
//! Decimal arithmetic is provided by the C reference implementation,
//! [libdecnumber], through the [decnumber-sys] crate.
//!
//! The main types exposed by this library are as follows:
//!
//!  * [`Decimal`], a decimal representation whose precision is configurable
//!    via its generic `N` parameter.
//!
//!  * [`Context`], which hosts the conversions and the decimal operations
//!    they are built on. A context configures the behavior of each operation
//!    (e.g., rounding mode) and accumulates exceptional conditions (e.g.,
//!    inexact results) in its [`Status`].
//!
//!  * [`BinaryLayout`], a description of one binary encoding: its
//!    [`Format`], [`ByteOrder`] and the position of every field.
//!    [`BinaryLayout::NATIVE`] describes the platform's `long double` and is
//!    selected at build time with exactly one of the `long-double-64`
//!    (default), `long-double-80` and `long-double-128` features.
//!
//!  * [`BitCursor`], a position within an encoded value that walks its bits
//!    in significance order regardless of byte order.
//!
//! Conversions never fail. Precision loss, overflow and underflow are
//! reported only through the context's status flags, so callers that need
//! to know must inspect [`Context::status`] after the call.
//!
//! # Examples
//!
//! ```
//! # use std::error::Error;
//! use decbin::{Context, Decimal};
//!
//! let mut cx = Context::<Decimal<12>>::default();
//! let d = cx.parse("0.1")?;
//! assert_eq!(cx.to_f64(&d), 0.1);
//! assert!(cx.status().inexact());
//!
//! cx.clear_status();
//! let d = cx.parse("2.5")?;
//! assert_eq!(cx.to_f64(&d), 2.5);
//! assert!(!cx.status().inexact());
//!
//! # Ok::<_, Box<dyn Error>>(())
//! ```
//!
//! [libdecnumber]: http://speleotrove.com/decimal/decarith.html
//! [decnumber-sys]: https://docs.rs/decnumber-sys

#![deny(missing_debug_implementations, missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod context;
mod cursor;
mod decimal;
mod decode;
mod encode;
mod error;
mod integral;
mod layout;

pub use context::{Context, Defaults, Rounding, Status};
pub use cursor::BitCursor;
pub use decimal::Decimal;
pub use error::{InvalidExponentError, InvalidPrecisionError, ParseDecimalError};
pub use layout::{BinaryLayout, ByteOrder, Format};

static_assertions::assert_eq_size!(Decimal<12>, decnumber_sys::decNumber);
