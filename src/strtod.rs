// Copyright 2026 Redglyph
//
// Decimal and hexadecimal literal parsing.
//
// The decimal path scans the literal, computes a close approximation with
// ordinary floating-point scaling, then corrects it against exact big-integer
// arithmetic until the candidate is the nearest representable value, ties to
// even. The hexadecimal path is a single change of base: one round/sticky
// rounding, no correction loop.

use std::cmp::Ordering;

use crate::bignum::Bignum;
use crate::error::{ParseErrorKind, ParseFloatError};
use crate::float::FloatFormat;

/// Decimal exponent clamp of the scanner; beyond this every literal
/// saturates whatever the target format.
const BIG_DECIMAL_EXPONENT: i64 = 324;

const BIG_10_POW: [f64; 5] = [1e16, 1e32, 1e64, 1e128, 1e256];
const TINY_10_POW: [f64; 5] = [1e-16, 1e-32, 1e-64, 1e-128, 1e-256];

fn infinity_bits<F: FloatFormat>(negative: bool) -> u64 {
    F::EXP_MASK | if negative { F::SIGN_MASK } else { 0 }
}

fn zero_bits<F: FloatFormat>(negative: bool) -> u64 {
    if negative {
        F::SIGN_MASK
    } else {
        0
    }
}

/// Parses a floating-point literal: optional sign, `NaN`, `Infinity`/`inf`,
/// a decimal literal with optional fraction, exponent and `f/F/d/D` suffix,
/// or a C99-style hexadecimal literal (`0x1.8p3`). Surrounding ASCII
/// whitespace is ignored.
pub fn parse<F: FloatFormat>(input: &str) -> Result<F, ParseFloatError> {
    let text = input.trim_matches(|c: char| c.is_ascii_whitespace());
    if text.is_empty() {
        return Err(ParseFloatError::new(ParseErrorKind::Empty, input));
    }
    let bytes = text.as_bytes();
    let (negative, sign_seen) = scan_sign(bytes);
    let i = sign_seen as usize;
    match bytes.get(i) {
        Some(b'N') => {
            return if &bytes[i..] == b"NaN" {
                Ok(F::from_bits(F::EXP_MASK | 1 << (F::EXP_SHIFT - 1)))
            } else {
                Err(ParseFloatError::new(ParseErrorKind::TrailingJunk, input))
            };
        }
        Some(b'I') | Some(b'i') => {
            return if &bytes[i..] == b"Infinity" || &bytes[i..] == b"inf" {
                Ok(F::from_bits(infinity_bits::<F>(negative)))
            } else {
                Err(ParseFloatError::new(ParseErrorKind::TrailingJunk, input))
            };
        }
        Some(b'0') if matches!(bytes.get(i + 1), Some(b'x') | Some(b'X')) => {
            return scan_hex(bytes, i + 2, negative, input);
        }
        _ => {}
    }
    scan_decimal(bytes, i, sign_seen, negative, input)
}

/// Parses a decimal literal (optional sign, no hex or NaN/Infinity forms).
pub fn decimal_to_binary<F: FloatFormat>(input: &str) -> Result<F, ParseFloatError> {
    if input.is_empty() {
        return Err(ParseFloatError::new(ParseErrorKind::Empty, input));
    }
    let bytes = input.as_bytes();
    let (negative, sign_seen) = scan_sign(bytes);
    scan_decimal(bytes, sign_seen as usize, sign_seen, negative, input)
}

/// Parses a C99-style hexadecimal literal (optional sign, `0x`, hex digits
/// with optional point, mandatory `p` exponent, optional suffix).
pub fn hex_to_binary<F: FloatFormat>(input: &str) -> Result<F, ParseFloatError> {
    let bytes = input.as_bytes();
    let (negative, sign_seen) = scan_sign(bytes);
    let i = sign_seen as usize;
    if !(matches!(bytes.get(i), Some(b'0')) && matches!(bytes.get(i + 1), Some(b'x') | Some(b'X')))
    {
        return Err(ParseFloatError::new(ParseErrorKind::MalformedHex, input));
    }
    scan_hex(bytes, i + 2, negative, input)
}

fn scan_sign(bytes: &[u8]) -> (bool, bool) {
    match bytes.first() {
        Some(b'-') => (true, true),
        Some(b'+') => (false, true),
        _ => (false, false),
    }
}

// ---------------------------------------------------------------------------------------------
// Decimal literals

fn scan_decimal<F: FloatFormat>(
    bytes: &[u8],
    start: usize,
    sign_seen: bool,
    negative: bool,
    input: &str,
) -> Result<F, ParseFloatError> {
    let err = |kind| Err(ParseFloatError::new(kind, input));
    let len = bytes.len();
    let sign_ofs = sign_seen as usize;
    let mut i = start;
    let mut digits: Vec<u8> = Vec::with_capacity(len - start);
    let mut dec_seen = false;
    let mut dec_pt = 0i64;
    let mut n_lead_zero = 0i64;
    let mut n_trail_zero = 0usize;

    // leading zeros (and at most one point among them)
    while i < len {
        match bytes[i] {
            b'0' => n_lead_zero += 1,
            b'.' => {
                if dec_seen {
                    return err(ParseErrorKind::MultiplePoints);
                }
                dec_pt = (i - sign_ofs) as i64;
                dec_seen = true;
            }
            _ => break,
        }
        i += 1;
    }
    // significant digits
    while i < len {
        match bytes[i] {
            b'1'..=b'9' => {
                digits.push(bytes[i]);
                n_trail_zero = 0;
            }
            b'0' => {
                digits.push(b'0');
                n_trail_zero += 1;
            }
            b'.' => {
                if dec_seen {
                    return err(ParseErrorKind::MultiplePoints);
                }
                dec_pt = (i - sign_ofs) as i64;
                dec_seen = true;
            }
            _ => break,
        }
        i += 1;
    }
    digits.truncate(digits.len() - n_trail_zero);
    let n_digits = digits.len();
    let is_zero = n_digits == 0;
    if is_zero && n_lead_zero == 0 {
        // no digits at all, not even a zero
        return err(ParseErrorKind::NoDigits);
    }
    let mut dec_exp: i64 = if dec_seen {
        dec_pt - n_lead_zero
    } else {
        (n_digits + n_trail_zero) as i64
    };

    // optional exponent
    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        let mut exp_sign = 1i64;
        match bytes.get(i) {
            Some(b'-') => {
                exp_sign = -1;
                i += 1;
            }
            Some(b'+') => {
                i += 1;
            }
            _ => {}
        }
        let exp_at = i;
        let mut exp_val = 0i64;
        let mut exp_overflow = false;
        const REALLY_BIG: i64 = i32::MAX as i64 / 10;
        while i < len && bytes[i].is_ascii_digit() {
            if exp_val >= REALLY_BIG {
                // one more digit would overflow a 32-bit exponent
                exp_overflow = true;
            } else {
                exp_val = exp_val * 10 + (bytes[i] - b'0') as i64;
            }
            i += 1;
        }
        if i == exp_at {
            return err(ParseErrorKind::MissingExponent);
        }
        let exp_limit = BIG_DECIMAL_EXPONENT + (n_digits + n_trail_zero) as i64;
        if exp_overflow || exp_val > exp_limit {
            // the exponent may still be usable if a negative dec_exp pulls
            // it back under the limit
            if !exp_overflow && exp_sign == 1 && dec_exp < 0 && exp_val + dec_exp < exp_limit {
                dec_exp += exp_val;
            } else {
                // saturate: small enough not to overflow the scaling below,
                // big enough to force a zero or infinite result
                dec_exp = exp_sign * exp_limit;
            }
        } else {
            dec_exp += exp_sign * exp_val;
        }
    }
    // only a type suffix may remain
    if i < len && (i != len - 1 || !matches!(bytes[i], b'f' | b'F' | b'd' | b'D')) {
        return err(ParseErrorKind::TrailingJunk);
    }
    if is_zero {
        return Ok(F::from_bits(zero_bits::<F>(negative)));
    }
    Ok(digits_to_binary(negative, dec_exp, digits))
}

/// Converts scanned digits (no leading/trailing zeros) and a decimal
/// exponent in the `0.digits * 10^dec_exp` convention into the nearest
/// representable value.
fn digits_to_binary<F: FloatFormat>(negative: bool, dec_exp: i64, mut digits: Vec<u8>) -> F {
    let signed = |v: F| if negative { -v } else { v };
    // the scanner clamps against BIG_DECIMAL_EXPONENT, so this cast is safe
    let dec_exponent = dec_exp.clamp(-(1 << 30), 1 << 30) as i32;
    let mut n_digits = digits.len();
    let k_digits = n_digits.min(F::MAX_DECIMAL_DIGITS + 1);
    let mut l_value = 0u64;
    for &d in &digits[..k_digits] {
        l_value = l_value * 10 + (d - b'0') as u64;
    }
    let mut exp = dec_exponent - k_digits as i32;

    if n_digits <= F::MAX_DECIMAL_DIGITS {
        //
        // The digits are exact in the target format, and if the power of ten
        // is exact too the whole conversion takes one operation, hence one
        // rounding.
        //
        if exp == 0 {
            return signed(F::from_u64(l_value));
        } else if exp >= 0 {
            if exp <= F::MAX_SMALL_POW10 as i32 {
                return signed(F::from_u64(l_value) * F::small_pow10(exp as usize));
            }
            let slop = (F::MAX_DECIMAL_DIGITS - k_digits) as i32;
            if exp <= F::MAX_SMALL_POW10 as i32 + slop {
                // scaling by 10^slop keeps the value exact, leaving a single
                // rounding for the rest
                let v = F::from_u64(l_value) * F::small_pow10(slop as usize);
                return signed(v * F::small_pow10((exp - slop) as usize));
            }
        } else if exp >= -(F::MAX_SMALL_POW10 as i32) {
            return signed(F::from_u64(l_value) / F::small_pow10((-exp) as usize));
        }
    }

    //
    // Harder cases. Approximate by scaling with powers of ten in f64, good
    // to a few ULPs, then let the big-integer correction loop do the rest.
    //
    let mut d_value = l_value as f64;
    if exp > 0 {
        if dec_exponent > F::MAX_DECIMAL_EXPONENT + 1 {
            return signed(F::from_bits(F::EXP_MASK));
        }
        if exp & 15 != 0 {
            d_value *= f64::small_pow10((exp & 15) as usize);
        }
        exp >>= 4;
        if exp != 0 {
            let mut j = 0;
            while exp > 1 {
                if exp & 1 != 0 {
                    d_value *= BIG_10_POW[j];
                }
                j += 1;
                exp >>= 1;
            }
            // the last multiply may overflow; if backing off a factor of two
            // still overflows the result is infinite, otherwise estimate
            // from the largest finite value
            let mut t = d_value * BIG_10_POW[j];
            if t.is_infinite() {
                t = d_value / 2.0 * BIG_10_POW[j];
                if t.is_infinite() {
                    return signed(F::from_bits(F::EXP_MASK));
                }
                t = f64::MAX;
            }
            d_value = t;
        }
    } else if exp < 0 {
        let mut exp = -exp;
        if dec_exponent < F::MIN_DECIMAL_EXPONENT - 1 {
            return signed(F::from_bits(0));
        }
        if exp & 15 != 0 {
            d_value /= f64::small_pow10((exp & 15) as usize);
        }
        exp >>= 4;
        if exp != 0 {
            let mut j = 0;
            while exp > 1 {
                if exp & 1 != 0 {
                    d_value *= TINY_10_POW[j];
                }
                j += 1;
                exp >>= 1;
            }
            // symmetric underflow recovery
            let mut t = d_value * TINY_10_POW[j];
            if t == 0.0 {
                t = d_value * 2.0 * TINY_10_POW[j];
                if t == 0.0 {
                    return signed(F::from_bits(0));
                }
                t = f64::from_bits(1);
            }
            d_value = t;
        }
    }
    let candidate = F::from_f64(d_value);

    //
    // Formulate the exact decimal value as big_d0 * 10^exp, truncating
    // overlong digit runs with a sticky non-zero digit.
    //
    if n_digits > F::MAX_NDIGITS {
        digits.truncate(F::MAX_NDIGITS);
        digits.push(b'1');
        n_digits = F::MAX_NDIGITS + 1;
    }
    let big_d0 = Bignum::from_digits(l_value, &digits, k_digits);
    let exp = dec_exponent - n_digits as i32;

    let b5 = 0.max(-exp) as usize; // powers of 5 in big_b
    let d5 = 0.max(exp) as usize; // powers of 5 in big_d
    let big_d0 = big_d0.mult_by_pow52(d5, 0);
    // big_d0 is shared by every pass of the correction loop and only read
    let mut big_d: Option<Bignum> = None;
    let mut prev_d2 = 0;

    let mut ieee_bits = candidate.to_bits();
    loop {
        // the candidate is finite, non-zero and positive here
        let bin_exp_field = (ieee_bits >> F::EXP_SHIFT) as i32;
        let mut big_b_bits = ieee_bits & F::SIG_MASK;
        let mut bin_exp;
        if bin_exp_field > 0 {
            big_b_bits |= F::HIDDEN_BIT;
            bin_exp = bin_exp_field;
        } else {
            debug_assert!(big_b_bits != 0);
            let leading_zeros = big_b_bits.leading_zeros();
            let shift = leading_zeros - (63 - F::EXP_SHIFT);
            big_b_bits <<= shift;
            bin_exp = 1 - shift as i32;
        }
        bin_exp -= F::EXP_BIAS;
        let low_order_zeros = big_b_bits.trailing_zeros();
        big_b_bits >>= low_order_zeros;
        let big_int_exp = bin_exp - F::EXP_SHIFT as i32 + low_order_zeros as i32;
        let big_int_nbits = F::EXP_SHIFT + 1 - low_order_zeros;

        //
        // Scale big_b and big_d to a common integer footing, tracking powers
        // of 2 and 5 separately and cancelling shared factors, while keeping
        // half an ULP an integer.
        //
        let mut b2 = b5 as i32;
        let mut d2 = d5 as i32;
        if big_int_exp >= 0 {
            b2 += big_int_exp;
        } else {
            d2 -= big_int_exp;
        }
        let mut ulp2 = b2;
        let hulp_bias = if bin_exp <= -F::EXP_BIAS {
            // subnormal candidate: half an ULP sits at the very bottom
            bin_exp + low_order_zeros as i32 + F::EXP_BIAS
        } else {
            1 + low_order_zeros as i32
        };
        b2 += hulp_bias;
        d2 += hulp_bias;
        let common2 = b2.min(d2).min(ulp2);
        b2 -= common2;
        d2 -= common2;
        ulp2 -= common2;

        let big_b = Bignum::mul_pow52(big_b_bits, b5, b2 as u32);
        if big_d.is_none() || prev_d2 != d2 {
            big_d = Some(big_d0.clone().left_shift(d2 as u32));
            prev_d2 = d2;
        }
        let big_d_ref = big_d.as_ref().unwrap();

        //
        // If the difference between candidate and exact value is below half
        // an ULP the candidate is right; exactly half an ULP ties to even;
        // otherwise step one representable value toward the truth and retry.
        //
        let (diff, overvalue, ulp2) = match big_b.cmp(big_d_ref) {
            Ordering::Greater => {
                let mut diff = big_b.left_inplace_sub(big_d_ref);
                let mut ulp2 = ulp2;
                if big_int_nbits == 1 && big_int_exp > 1 - F::EXP_BIAS {
                    // the candidate is an exact power of two above the
                    // smallest normal: going down, the ULP is half as big
                    ulp2 -= 1;
                    if ulp2 < 0 {
                        ulp2 = 0;
                        diff = diff.left_shift(1);
                    }
                }
                (diff, true, ulp2)
            }
            Ordering::Less => (big_d_ref.right_inplace_sub(big_b), false, ulp2),
            Ordering::Equal => break,
        };
        match diff.cmp_pow52(b5, ulp2 as u32) {
            Ordering::Less => break,
            Ordering::Equal => {
                if ieee_bits & 1 != 0 {
                    ieee_bits = if overvalue { ieee_bits - 1 } else { ieee_bits + 1 };
                }
                break;
            }
            Ordering::Greater => {
                ieee_bits = if overvalue { ieee_bits - 1 } else { ieee_bits + 1 };
                if ieee_bits == 0 || ieee_bits == F::EXP_MASK {
                    // fell off the representable range
                    break;
                }
            }
        }
    }
    if negative {
        ieee_bits |= F::SIGN_MASK;
    }
    F::from_bits(ieee_bits)
}

// ---------------------------------------------------------------------------------------------
// Hexadecimal literals

fn hex_val(b: u8) -> u64 {
    match b {
        b'0'..=b'9' => (b - b'0') as u64,
        b'a'..=b'f' => (b - b'a' + 10) as u64,
        _ => (b - b'A' + 10) as u64,
    }
}

/// Hexadecimal significand and binary exponent: the change of base is exact,
/// so one round-to-nearest-even with round/sticky tracking suffices.
fn scan_hex<F: FloatFormat>(
    bytes: &[u8],
    start: usize,
    negative: bool,
    input: &str,
) -> Result<F, ParseFloatError> {
    let err = |kind| Err(ParseFloatError::new(kind, input));
    let len = bytes.len();
    let mut i = start;
    let int_start = i;
    while i < len && bytes[i].is_ascii_hexdigit() {
        i += 1;
    }
    let int_digits = &bytes[int_start..i];
    let mut frac_digits: &[u8] = &[];
    if i < len && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < len && bytes[i].is_ascii_hexdigit() {
            i += 1;
        }
        frac_digits = &bytes[frac_start..i];
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return err(ParseErrorKind::MalformedHex);
    }
    // the binary exponent is not optional
    if i >= len || !matches!(bytes[i], b'p' | b'P') {
        return err(ParseErrorKind::MalformedHex);
    }
    i += 1;
    let mut exp_negative = false;
    match bytes.get(i) {
        Some(b'-') => {
            exp_negative = true;
            i += 1;
        }
        Some(b'+') => {
            i += 1;
        }
        _ => {}
    }
    let exp_at = i;
    let mut raw_exp = 0i64;
    while i < len && bytes[i].is_ascii_digit() {
        if raw_exp < 10_000_000_000 {
            raw_exp = raw_exp * 10 + (bytes[i] - b'0') as i64;
        }
        i += 1;
    }
    if i == exp_at {
        return err(ParseErrorKind::MissingExponent);
    }
    if i < len && (i != len - 1 || !matches!(bytes[i], b'f' | b'F' | b'd' | b'D')) {
        return err(ParseErrorKind::TrailingJunk);
    }

    //
    // Normalize the significand string: leading zeros never matter on the
    // integer part, and the exponent adjustment counts hex digits, four bits
    // each, relative to a one-digit integer part.
    //
    let int_lead = int_digits.iter().take_while(|&&b| b == b'0').count();
    let int_stripped = &int_digits[int_lead..];
    let left_digits = int_stripped.len() as i64;
    let right_digits = frac_digits.len() as i64;
    let mut sig: Vec<u8> = Vec::with_capacity(int_stripped.len() + frac_digits.len());
    sig.extend_from_slice(int_stripped);
    sig.extend_from_slice(frac_digits);
    let lead = sig.iter().take_while(|&&b| b == b'0').count();
    sig.drain(..lead);
    let signif_len = sig.len() as i64;
    if signif_len == 0 {
        // only zeros in the input
        return Ok(F::from_bits(zero_bits::<F>(negative)));
    }
    let exponent_adjust = if left_digits >= 1 {
        4 * (left_digits - 1)
    } else {
        -4 * (right_digits - signif_len + 1)
    };
    let signed_exp = if exp_negative { -raw_exp } else { raw_exp };
    let mut exponent = signed_exp + exponent_adjust;

    //
    // Copy the digit bits into the significand, hidden-bit position first,
    // deriving the round bit and the sticky bit from whatever does not fit.
    //
    let leading_digit = hex_val(sig[0]);
    let leading_bits = 64 - leading_digit.leading_zeros(); // 1..=4
    let mut significand = leading_digit << (F::SIG_BITS - leading_bits);
    exponent += leading_bits as i64 - 1;
    let mut next_shift = F::SIG_BITS as i32 - leading_bits as i32 - 4;
    let mut round = false;
    let mut sticky = false;
    let mut idx = 1;
    while idx < sig.len() && next_shift >= 0 {
        significand |= hex_val(sig[idx]) << next_shift;
        next_shift -= 4;
        idx += 1;
    }
    if idx < sig.len() {
        // a digit straddles the end of the significand
        let digit = hex_val(sig[idx]);
        let cut = (-next_shift) as u32; // 1..=4 low bits do not fit
        significand |= digit >> cut;
        round = (digit >> (cut - 1)) & 1 != 0;
        sticky = digit & ((1 << (cut - 1)) - 1) != 0;
        idx += 1;
        while idx < sig.len() && !sticky {
            sticky = hex_val(sig[idx]) != 0;
            idx += 1;
        }
    }

    let sign = zero_bits::<F>(negative);
    if exponent > F::MAX_EXPONENT as i64 {
        return Ok(F::from_bits(sign | F::EXP_MASK));
    }
    let bits = if exponent >= F::MIN_EXPONENT as i64 {
        // normal range; an increment from rounding below carries cleanly
        // into the exponent field, including an overflow to infinity
        ((((exponent + F::EXP_BIAS as i64) as u64) << F::EXP_SHIFT) & F::EXP_MASK)
            | (significand & F::SIG_MASK)
    } else if exponent < F::MIN_SUB_EXPONENT as i64 - 1 {
        // no rounding can bring this back to non-zero
        return Ok(F::from_bits(sign));
    } else {
        // subnormal: drop low bits, recomputing round and sticky
        sticky |= round;
        let discarded = (F::SIG_BITS as i64 - (exponent - F::MIN_SUB_EXPONENT as i64 + 1)) as u32;
        debug_assert!(discarded >= 1 && discarded <= F::SIG_BITS);
        round = significand & (1 << (discarded - 1)) != 0;
        if discarded > 1 {
            sticky |= significand & ((1 << (discarded - 1)) - 1) != 0;
        }
        significand >> discarded
    };
    // round to nearest, ties to even
    let least_zero = bits & 1 == 0;
    let bits = if (least_zero && round && sticky) || (!least_zero && round) {
        bits + 1
    } else {
        bits
    };
    Ok(F::from_bits(sign | bits))
}
