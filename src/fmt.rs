// Copyright 2026 Redglyph
//
// Formatting front end: renders the digit/exponent output of the generator
// into plain, scientific or general textual layouts.

use ilog::IntLog;

use crate::dtoa::{binary_to_decimal, DecimalDigits};
use crate::float::{Encoding, FloatFormat};

/// Textual layout selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmtMode {
    /// Plain decimal notation, `ddd.ddd`.
    Fix,
    /// Scientific notation, `d.ddde±dd`.
    Sci,
    /// Plain notation for decimal exponents in `(-3, 8)`, scientific outside.
    Std,
}

/// Formatting options for [NumFmtBuffer] methods and [format_opt].
#[derive(Debug, Clone)]
pub struct FmtOptions {
    /// number of fractional digits; rounds half-up when the digit sequence
    /// is longer, pads with zeros when shorter
    pub precision: Option<u32>,
    /// textual layout
    pub mode: FmtMode,
    /// true: includes ".0" for integer values, false: only the integer part
    pub trailing_dot_zero: bool,
}

impl Default for FmtOptions {
    fn default() -> Self {
        FmtOptions { precision: None, mode: FmtMode::Std, trailing_dot_zero: true }
    }
}

/// Reusable floating-point formatter.
///
/// The output buffer is owned by the caller and recycled across conversions,
/// so repeated formatting does not allocate.
pub struct NumFmtBuffer {
    buf: Vec<u8>,
}

impl NumFmtBuffer {
    pub fn new() -> Self {
        NumFmtBuffer { buf: Vec::with_capacity(32) }
    }

    /// Formats `value` with the default options.
    pub fn to_str<F: FloatFormat>(&mut self, value: F) -> &str {
        self.format_value(value, &FmtOptions::default())
    }

    /// Formats `value` into the buffer and returns the rendered text.
    pub fn format_value<F: FloatFormat>(&mut self, value: F, options: &FmtOptions) -> &str {
        self.buf.clear();
        match value.encoding() {
            Encoding::NaN => self.buf.extend_from_slice(b"NaN"),
            Encoding::Inf => {
                if value.sign_bit() {
                    self.buf.push(b'-');
                }
                self.buf.extend_from_slice(b"inf");
            }
            Encoding::Zero | Encoding::Digits => {
                let dec = binary_to_decimal(value).unwrap();
                self.render(&dec, options);
            }
        }
        // the buffer only ever holds ASCII
        std::str::from_utf8(&self.buf).unwrap()
    }

    /// Renders an already-computed digit/exponent triple.
    pub fn format_digits(&mut self, dec: &DecimalDigits, options: &FmtOptions) -> &str {
        self.buf.clear();
        self.render(dec, options);
        std::str::from_utf8(&self.buf).unwrap()
    }

    fn render(&mut self, dec: &DecimalDigits, options: &FmtOptions) {
        if dec.is_negative() {
            self.buf.push(b'-');
        }
        let mode = match options.mode {
            FmtMode::Std => {
                if -3 < dec.decimal_exponent() && dec.decimal_exponent() < 8 {
                    FmtMode::Fix
                } else {
                    FmtMode::Sci
                }
            }
            m => m,
        };
        // working copy: precision rounding may rewrite digits and exponent
        let src = dec.digits();
        let mut digits = [0u8; 20];
        let mut len = src.len();
        digits[..len].copy_from_slice(src);
        let mut dec_exp = dec.decimal_exponent();
        if len == 1 && digits[0] == b'0' {
            // zeros carry no significant digits
            len = 0;
        }
        if let Some(p) = options.precision {
            let keep = match mode {
                FmtMode::Fix => dec_exp.saturating_add(p.min(1 << 20) as i32),
                _ => 1 + p.min(1 << 20) as i32,
            };
            round_digits(&mut digits, &mut len, &mut dec_exp, keep);
        }
        match mode {
            FmtMode::Fix => self.render_fix(&digits[..len], dec_exp, options),
            _ => self.render_sci(&digits[..len], dec_exp, options),
        }
    }

    fn render_fix(&mut self, digits: &[u8], dec_exp: i32, options: &FmtOptions) {
        let len = digits.len();
        // integer part
        if len == 0 || dec_exp <= 0 {
            self.buf.push(b'0');
        } else {
            let int_len = (dec_exp as usize).min(len);
            self.buf.extend_from_slice(&digits[..int_len]);
            for _ in int_len..dec_exp as usize {
                self.buf.push(b'0');
            }
        }
        // fraction part
        let (lead_zeros, frac): (usize, &[u8]) = if len == 0 {
            (0, &[])
        } else if dec_exp <= 0 {
            ((-dec_exp) as usize, digits)
        } else if len > dec_exp as usize {
            (0, &digits[dec_exp as usize..])
        } else {
            (0, &[])
        };
        match options.precision {
            Some(0) => {}
            Some(p) => {
                let p = p as usize;
                self.buf.push(b'.');
                let zeros = lead_zeros.min(p);
                for _ in 0..zeros {
                    self.buf.push(b'0');
                }
                let take = frac.len().min(p - zeros);
                self.buf.extend_from_slice(&frac[..take]);
                for _ in zeros + take..p {
                    self.buf.push(b'0');
                }
            }
            None => {
                if lead_zeros + frac.len() > 0 {
                    self.buf.push(b'.');
                    for _ in 0..lead_zeros {
                        self.buf.push(b'0');
                    }
                    self.buf.extend_from_slice(frac);
                } else if options.trailing_dot_zero {
                    self.buf.extend_from_slice(b".0");
                }
            }
        }
    }

    fn render_sci(&mut self, digits: &[u8], dec_exp: i32, options: &FmtOptions) {
        let (leading, frac): (u8, &[u8]) = if digits.is_empty() {
            (b'0', &[])
        } else {
            (digits[0], &digits[1..])
        };
        self.buf.push(leading);
        match options.precision {
            Some(0) => {}
            Some(p) => {
                let p = p as usize;
                self.buf.push(b'.');
                self.buf.extend_from_slice(frac);
                for _ in frac.len()..p {
                    self.buf.push(b'0');
                }
            }
            None => {
                self.buf.push(b'.');
                if frac.is_empty() {
                    self.buf.push(b'0');
                } else {
                    self.buf.extend_from_slice(frac);
                }
            }
        }
        self.buf.push(b'e');
        let scientific_exp = if digits.is_empty() { 0 } else { dec_exp - 1 };
        if scientific_exp < 0 {
            self.buf.push(b'-');
        }
        let e = scientific_exp.unsigned_abs();
        let n = if e == 0 { 1 } else { e.log10() + 1 };
        for i in (0..n).rev() {
            self.buf.push(b'0' + (e / 10u32.pow(i as u32) % 10) as u8);
        }
    }
}

impl Default for NumFmtBuffer {
    fn default() -> Self {
        NumFmtBuffer::new()
    }
}

/// Rounds the digit sequence down to `keep` significant digits, half-up with
/// carry propagation; a carry out of the top digit bumps the exponent.
fn round_digits(digits: &mut [u8], len: &mut usize, dec_exp: &mut i32, keep: i32) {
    if *len == 0 {
        return;
    }
    if keep <= 0 {
        // every digit is dropped, but the value may still round up into view
        if keep == 0 && digits[0] >= b'5' {
            digits[0] = b'1';
            *len = 1;
            *dec_exp += 1;
        } else {
            *len = 0;
        }
        return;
    }
    let keep = keep as usize;
    if keep >= *len {
        return;
    }
    let round_up = digits[keep] >= b'5';
    *len = keep;
    if round_up {
        let mut i = keep;
        while i > 0 && digits[i - 1] == b'9' {
            digits[i - 1] = b'0';
            i -= 1;
        }
        if i == 0 {
            digits[0] = b'1';
            *len = 1;
            *dec_exp += 1;
        } else {
            digits[i - 1] += 1;
        }
    }
}

/// Formats `value` with the given fractional precision and layout.
pub fn format<F: FloatFormat>(value: F, precision: Option<u32>, mode: FmtMode) -> String {
    format_opt(value, &FmtOptions { precision, mode, ..FmtOptions::default() })
}

/// Formats `value` with explicit options.
pub fn format_opt<F: FloatFormat>(value: F, options: &FmtOptions) -> String {
    let mut buffer = NumFmtBuffer::new();
    buffer.format_value(value, options).to_string()
}

/// Converts the given double-precision number into decimal form.
///
/// ```
/// use dragon4::dtoa;
///
/// assert_eq!(dtoa(12.3456789), "12.3456789");
/// assert_eq!(dtoa(0.1), "0.1");
/// assert_eq!(dtoa(-1.5e300), "-1.5e300");
/// ```
///
/// The output uses plain notation when the decimal point falls within the
/// `(-3, 8)` exponent window and scientific notation outside of it. The digit
/// sequence is the shortest that parses back to the same value under
/// round-to-nearest-even.
pub fn dtoa(value: f64) -> String {
    format_opt(value, &FmtOptions::default())
}

/// Converts the given single-precision number into decimal form.
///
/// ```
/// use dragon4::ftoa;
///
/// assert_eq!(ftoa(0.25f32), "0.25");
/// ```
pub fn ftoa(value: f32) -> String {
    format_opt(value, &FmtOptions::default())
}
