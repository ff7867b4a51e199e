// Copyright 2026 Redglyph
//
// Free-format ("Dragon4"-family) conversions between IEEE-754 floating-point
// values and decimal strings, for both double and single precision:
//
// - binary -> decimal produces the shortest digit sequence that reads back
//   to the exact same value under round-to-nearest-even;
// - decimal -> binary parses any decimal or C99 hexadecimal literal into the
//   nearest representable value, ties to even, saturating out-of-range
//   exponents to signed zero or infinity.
//
// The digit generator and the parser's correction loop share an exact
// radix-2^32 big-integer engine; small magnitudes take native-integer fast
// paths and never touch it.

//! Shortest round-trip floating-point <-> decimal conversions.
//!
//! ```
//! use dragon4::{dtoa, parse};
//!
//! assert_eq!(dtoa(0.1), "0.1");
//! assert_eq!(parse::<f64>("0.1"), Ok(0.1));
//! assert_eq!(parse::<f64>("0x1.8p3"), Ok(12.0));
//! ```

mod bignum;
mod dtoa;
mod error;
mod float;
mod fmt;
mod strtod;
mod tests;

pub use crate::dtoa::{binary_to_decimal, DecimalDigits};
pub use crate::error::{ParseErrorKind, ParseFloatError};
pub use crate::float::{Encoding, FloatFormat};
pub use crate::fmt::{dtoa, format, format_opt, ftoa, FmtMode, FmtOptions, NumFmtBuffer};
pub use crate::strtod::{decimal_to_binary, hex_to_binary, parse};
