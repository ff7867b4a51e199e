// Copyright 2026 Redglyph
//
// Digit generator tests.

use std::str::FromStr;

use crate::dtoa::binary_to_decimal;
use crate::fmt::{format, FmtMode};

fn digits_of(value: f64) -> (bool, String, i32) {
    let dec = binary_to_decimal(value).unwrap();
    (
        dec.is_negative(),
        String::from_utf8(dec.digits().to_vec()).unwrap(),
        dec.decimal_exponent(),
    )
}

#[test]
fn boundary_digits() {
    // 0.1 is the shortest sequence for the nearest double, 1 * 10^-1
    assert_eq!(digits_of(0.1), (false, "1".to_string(), 0));
    assert_eq!(digits_of(2.0), (false, "2".to_string(), 1));
    assert_eq!(digits_of(0.5), (false, "5".to_string(), 0));
    assert_eq!(digits_of(-0.0), (true, "0".to_string(), 0));
    assert_eq!(digits_of(0.0), (false, "0".to_string(), 0));
    assert_eq!(digits_of(1e7), (false, "1".to_string(), 8));
    assert_eq!(digits_of(12.5), (false, "125".to_string(), 2));
    assert_eq!(digits_of(-12000.0), (true, "12".to_string(), 5));
}

#[test]
fn extreme_digits() {
    // largest finite double
    assert_eq!(
        digits_of(f64::MAX),
        (false, "17976931348623157".to_string(), 309)
    );
    // smallest subnormal keeps two digits, being scientific-form output
    assert_eq!(digits_of(f64::from_bits(1)), (false, "49".to_string(), -323));
    // smallest normal
    assert_eq!(
        digits_of(f64::MIN_POSITIVE),
        (false, "22250738585072014".to_string(), -307)
    );
}

#[test]
fn long_integer_digits() {
    // 2^60 runs the insignificant-digit suppression of the integer path
    let (neg, digits, exp) = digits_of((1u64 << 60) as f64);
    assert!(!neg);
    assert_eq!(digits, "115292150460684698");
    assert_eq!(exp, 19);
    // exact small integers
    assert_eq!(digits_of(1048576.0), (false, "1048576".to_string(), 7));
}

#[test]
fn exceptional_values() {
    assert!(binary_to_decimal(f64::NAN).is_none());
    assert!(binary_to_decimal(f64::INFINITY).is_none());
    assert!(binary_to_decimal(f64::NEG_INFINITY).is_none());
    assert!(binary_to_decimal(f32::NAN).is_none());
}

#[test]
fn conversion_flags() {
    // 0.5 = 5 * 10^-1 exactly
    let dec = binary_to_decimal(0.5f64).unwrap();
    assert!(dec.is_exact());
    assert!(!dec.rounded_up());
    // the double nearest 0.1 is slightly above, digits are not exact
    let dec = binary_to_decimal(0.1f64).unwrap();
    assert!(!dec.is_exact());
    // 0.3 holds 0.29999...988, so the last digit must have been rounded up
    let dec = binary_to_decimal(0.3f64).unwrap();
    assert_eq!(dec.digits(), b"3");
    assert!(dec.rounded_up());
    assert!(!dec.is_exact());
}

#[test]
fn single_precision_digits() {
    let digits_of32 = |value: f32| {
        let dec = binary_to_decimal(value).unwrap();
        (
            dec.is_negative(),
            String::from_utf8(dec.digits().to_vec()).unwrap(),
            dec.decimal_exponent(),
        )
    };
    assert_eq!(digits_of32(0.1f32), (false, "1".to_string(), 0));
    assert_eq!(digits_of32(1.0f32), (false, "1".to_string(), 1));
    assert_eq!(digits_of32(f32::MAX), (false, "34028235".to_string(), 39));
    // smallest subnormal single keeps two digits, being scientific-form output
    assert_eq!(digits_of32(f32::from_bits(1)), (false, "14".to_string(), -44));
    assert_eq!(digits_of32(-0.25f32), (true, "25".to_string(), 0));
}

#[test]
fn random_roundtrip_f64() {
    let mut rng = oorandom::Rand64::new(1);
    for i in 0..20_000 {
        let mut f;
        loop {
            f = f64::from_bits(rng.rand_u64());
            if f.is_finite() {
                break;
            }
        }
        let text = format(f, None, FmtMode::Sci);
        let back = f64::from_str(&text)
            .unwrap_or_else(|_| panic!("test #{i}: could not re-parse {f} -> '{text}'"));
        assert_eq!(f.to_bits(), back.to_bits(), "test #{i}: {f} -> '{text}'");
    }
}

#[test]
fn random_roundtrip_f32() {
    let mut rng = oorandom::Rand64::new(2);
    for i in 0..20_000 {
        let mut f;
        loop {
            f = f32::from_bits(rng.rand_u64() as u32);
            if f.is_finite() {
                break;
            }
        }
        let text = format(f, None, FmtMode::Sci);
        let back = f32::from_str(&text)
            .unwrap_or_else(|_| panic!("test #{i}: could not re-parse {f} -> '{text}'"));
        assert_eq!(f.to_bits(), back.to_bits(), "test #{i}: {f} -> '{text}'");
    }
}
