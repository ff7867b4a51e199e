// Copyright 2026 Redglyph
//
// Integration tests: the public conversion surface works end to end.

#![cfg(test)]

use dragon4::*;

#[test]
fn format_options() {
    let options = FmtOptions {
        precision: None,
        mode: FmtMode::Std,
        ..FmtOptions::default()
    };
    assert_eq!(format_opt(1.0, &options), "1.0");
}

#[test]
fn conversion_surface() {
    // binary -> decimal -> binary
    let dec = binary_to_decimal(0.1f64).unwrap();
    assert_eq!(dec.digits(), b"1");
    assert_eq!(dec.decimal_exponent(), 0);
    assert!(!dec.is_negative());
    let back: f64 = parse("0.1").unwrap();
    assert_eq!(back, 0.1);

    // the three grammars
    assert_eq!(parse::<f64>("12.5e-1"), Ok(1.25));
    assert_eq!(decimal_to_binary::<f64>("12.5e-1"), Ok(1.25));
    assert_eq!(hex_to_binary::<f64>("0x1.4p0"), Ok(1.25));

    // formatting modes
    assert_eq!(format(1.25, None, FmtMode::Fix), "1.25");
    assert_eq!(format(1.25, None, FmtMode::Sci), "1.25e0");
    assert_eq!(format(1.25, None, FmtMode::Std), "1.25");
    assert_eq!(format(1.25, Some(1), FmtMode::Fix), "1.3");
}

#[test]
fn saturation_is_not_an_error() {
    assert_eq!(parse::<f64>("2e308"), Ok(f64::INFINITY));
    assert_eq!(parse::<f64>("-2e308"), Ok(f64::NEG_INFINITY));
    assert_eq!(parse::<f64>("1e-1000").map(f64::to_bits), Ok(0));
    assert_eq!(parse::<f32>("1e40"), Ok(f32::INFINITY));
}

#[test]
fn errors_carry_the_offending_text() {
    let err = parse::<f64>("12..5").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::MultiplePoints);
    assert_eq!(err.input(), "12..5");
    assert!(err.to_string().contains("12..5"));

    let err = parse::<f64>("0x1.8q3").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::MalformedHex);
}

#[test]
fn exceptional_values_roundtrip() {
    assert_eq!(dtoa(f64::INFINITY), "inf");
    assert_eq!(parse::<f64>(&dtoa(f64::INFINITY)), Ok(f64::INFINITY));
    assert_eq!(dtoa(f64::NEG_INFINITY), "-inf");
    assert_eq!(parse::<f64>(&dtoa(f64::NEG_INFINITY)), Ok(f64::NEG_INFINITY));
    assert_eq!(dtoa(f64::NAN), "NaN");
    assert!(parse::<f64>("NaN").unwrap().is_nan());
    assert_eq!(dtoa(-0.0), "-0.0");
    assert_eq!(parse::<f64>("-0.0").map(f64::to_bits), Ok((-0.0f64).to_bits()));
}
