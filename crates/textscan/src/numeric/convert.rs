//! Conversion of isolated tokens into typed values.
//!
//! Tokens reaching this module already matched the grammar for their type,
//! so the work here is normalization (grouping separators, locale affixes,
//! localized digits) followed by the actual numeric parse. A token can still
//! fail here, for instance when it overflows the requested width.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::locale::NumberSymbols;

/// Code points of the digit zero for scripts whose ten digits are
/// contiguous.
const DIGIT_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
];

/// Decimal value of a (possibly non-ASCII) digit.
pub(crate) fn decimal_digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    let cp = u32::from(c);
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&cp))
        .map(|zero| cp - zero)
}

/// Rewrites localized digits as ASCII; other characters pass through.
fn ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c
            } else {
                decimal_digit_value(c)
                    .and_then(|d| char::from_digit(d, 10))
                    .unwrap_or(c)
            }
        })
        .collect()
}

/// Removes locale affixes and reports whether they marked a negative value.
fn strip_affixes<'a>(mut s: &'a str, sym: &NumberSymbols) -> (bool, &'a str) {
    let mut negative = false;
    if !sym.negative_prefix.is_empty() {
        if let Some(rest) = s.strip_prefix(&*sym.negative_prefix) {
            negative = true;
            s = rest;
        }
    }
    if !sym.negative_suffix.is_empty() {
        if let Some(rest) = s.strip_suffix(&*sym.negative_suffix) {
            negative = true;
            s = rest;
        }
    }
    if !negative {
        if !sym.positive_prefix.is_empty() {
            s = s.strip_prefix(&*sym.positive_prefix).unwrap_or(s);
        }
        if !sym.positive_suffix.is_empty() {
            s = s.strip_suffix(&*sym.positive_suffix).unwrap_or(s);
        }
    }
    (negative, s)
}

/// Canonical form of an integer token: optional sign then ASCII digits or
/// radix letters.
pub(crate) fn normalize_integer(token: &str, sym: &NumberSymbols) -> String {
    let ungrouped: String = token
        .chars()
        .filter(|&c| c != sym.grouping_separator)
        .collect();
    let (negative, body) = strip_affixes(&ungrouped, sym);
    let body = ascii_digits(body);
    if negative { format!("-{body}") } else { body }
}

/// Canonical form of a floating token, suitable for `f64::from_str` or
/// `BigDecimal::from_str`.
pub(crate) fn normalize_float(token: &str, sym: &NumberSymbols) -> String {
    let mut s: String = token
        .chars()
        .filter(|&c| c != sym.grouping_separator)
        .collect();
    if sym.decimal_separator != '.' {
        s = s.replace(sym.decimal_separator, ".");
    }
    let (negative, body) = strip_affixes(&s, sym);
    let (sign, magnitude) = match body.as_bytes().first() {
        Some(b'-' | b'+') => body.split_at(1),
        _ => ("", body),
    };
    let magnitude = if magnitude == sym.nan {
        "NaN".to_owned()
    } else if magnitude == sym.infinity {
        "Infinity".to_owned()
    } else {
        ascii_digits(magnitude)
    };
    let sign = if negative { "-" } else { sign };
    format!("{sign}{magnitude}")
}

/// Parses `0x<hex>.<hex>[p<exp>]` literals.
pub(crate) fn parse_hex_float(s: &str) -> Option<f64> {
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let rest = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))?;
    let (mantissa_part, exp_part) = match rest.find(['p', 'P']) {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };
    let (int_part, frac_part) = mantissa_part.split_once('.').unwrap_or((mantissa_part, ""));

    // Digits past the first 60 bits only matter for rounding; any nonzero
    // one sets the lowest bit, which rounds the same way.
    let mut mantissa: u64 = 0;
    let mut scale: i64 = 0;
    let mut sticky = false;
    for c in int_part.chars() {
        let d = c.to_digit(16)?;
        if mantissa >> 60 == 0 {
            mantissa = mantissa * 16 + u64::from(d);
        } else {
            sticky |= d != 0;
            scale += 4;
        }
    }
    for c in frac_part.chars() {
        let d = c.to_digit(16)?;
        if mantissa >> 60 == 0 {
            mantissa = mantissa * 16 + u64::from(d);
            scale -= 4;
        } else {
            sticky |= d != 0;
        }
    }
    if sticky {
        mantissa |= 1;
    }
    let exponent = match exp_part {
        Some(e) => parse_saturating_exponent(e)?,
        None => 0,
    };
    let value = if mantissa == 0 {
        0.0
    } else {
        #[allow(clippy::cast_possible_truncation)]
        let total = scale.saturating_add(exponent).clamp(-2400, 2400) as i32;
        let half = total / 2;
        #[allow(clippy::cast_precision_loss)]
        let mantissa = mantissa as f64;
        mantissa * 2f64.powi(half) * 2f64.powi(total - half)
    };
    Some(if negative { -value } else { value })
}

/// A binary exponent; values beyond `i64` saturate, which is far outside the
/// range where the result is anything but zero or infinity.
fn parse_saturating_exponent(e: &str) -> Option<i64> {
    let (negative, digits) = match e.as_bytes().first() {
        Some(b'-') => (true, &e[1..]),
        Some(b'+') => (false, &e[1..]),
        _ => (false, e),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for c in digits.chars() {
        let d = c.to_digit(10)?;
        value = value.saturating_mul(10).saturating_add(i64::from(d));
    }
    Some(if negative { -value } else { value })
}

fn is_hex_float(s: &str) -> bool {
    s.contains(['x', 'X'])
}

pub(crate) fn parse_f64(token: &str, sym: &NumberSymbols) -> Result<f64, String> {
    let s = normalize_float(token, sym);
    if is_hex_float(&s) {
        return parse_hex_float(&s).ok_or_else(|| format!("invalid hex float {s:?}"));
    }
    s.parse::<f64>().map_err(|e| e.to_string())
}

pub(crate) fn parse_f32(token: &str, sym: &NumberSymbols) -> Result<f32, String> {
    let s = normalize_float(token, sym);
    if is_hex_float(&s) {
        #[allow(clippy::cast_possible_truncation)]
        let narrowed = parse_hex_float(&s).map(|v| v as f32);
        return narrowed.ok_or_else(|| format!("invalid hex float {s:?}"));
    }
    s.parse::<f32>().map_err(|e| e.to_string())
}

pub(crate) fn parse_big_decimal(token: &str, sym: &NumberSymbols) -> Result<BigDecimal, String> {
    let s = normalize_float(token, sym);
    BigDecimal::from_str(&s).map_err(|e| e.to_string())
}

pub(crate) fn parse_big_int(token: &str, sym: &NumberSymbols, radix: u32) -> Result<BigInt, String> {
    let s = normalize_integer(token, sym);
    BigInt::parse_bytes(s.as_bytes(), radix)
        .ok_or_else(|| format!("{s:?} is not a base-{radix} integer"))
}

pub(crate) fn parse_bool(token: &str, sym: &NumberSymbols) -> Result<bool, String> {
    let lower = token.to_lowercase();
    if lower == sym.true_literal.to_lowercase() {
        Ok(true)
    } else if lower == sym.false_literal.to_lowercase() {
        Ok(false)
    } else {
        Err(format!("{token:?} is not a boolean"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::locale::Locale;

    #[rstest]
    #[case('7', Some(7))]
    #[case('\u{0663}', Some(3))]
    #[case('\u{0969}', Some(3))]
    #[case('\u{FF19}', Some(9))]
    #[case('a', None)]
    fn digit_values(#[case] c: char, #[case] expected: Option<u32>) {
        assert_eq!(decimal_digit_value(c), expected);
    }

    #[rstest]
    #[case("1,200", "1200")]
    #[case("-12,345", "-12345")]
    #[case("\u{0661}\u{0662}", "12")]
    #[case("+5", "+5")]
    fn integer_normalization(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(normalize_integer(token, Locale::US.symbols()), expected);
    }

    #[test]
    fn float_normalization_uses_locale_separators() {
        let de = Locale::GERMANY;
        assert_eq!(normalize_float("-1.234,5", de.symbols()), "-1234.5");
        assert_eq!(normalize_float("\u{221E}", de.symbols()), "Infinity");
        assert_eq!(normalize_float("-\u{221E}", de.symbols()), "-Infinity");
    }

    #[test]
    fn arabic_affixes_and_digits() {
        let ar = Locale::EGYPT_ARABIC;
        let token = "\u{061C}-\u{0661}\u{066C}\u{0662}\u{0663}\u{0664}\u{066B}\u{0665}";
        assert_eq!(normalize_float(token, ar.symbols()), "-1234.5");
    }

    #[rstest]
    #[case("0x1.8p1", 3.0)]
    #[case("-0x.8", -0.5)]
    #[case("0X10.0P-4", 1.0)]
    #[case("0x1.0p99999999999999999999", f64::INFINITY)]
    #[case("-0x1.0p99999999999999999999", f64::NEG_INFINITY)]
    #[case("0x1.0p-99999999999999999999", 0.0)]
    #[case("0x0.0p99999999999999999999", 0.0)]
    fn hex_floats(#[case] token: &str, #[case] expected: f64) {
        assert_eq!(parse_hex_float(token), Some(expected));
    }

    #[test]
    fn hex_float_digits_past_the_mantissa_round() {
        // 1 + 2^-53 is a tie and rounds to even; any further nonzero digit
        // pushes it up to the next double.
        let tie = "0x1.00000000000008";
        assert_eq!(parse_hex_float(tie), Some(1.0));
        let above = "0x1.000000000000080000001";
        assert_eq!(parse_hex_float(above), Some(1.0 + f64::EPSILON));
        let below = "0x1.00000000000007ffffffff";
        assert_eq!(parse_hex_float(below), Some(1.0));
    }

    #[test]
    fn big_values() {
        let us = Locale::US;
        assert_eq!(
            parse_big_decimal("-45,067.444", us.symbols()).unwrap(),
            BigDecimal::from_str("-45067.444").unwrap()
        );
        assert_eq!(
            parse_big_int("123,456,789,012,345,678,901", us.symbols(), 10).unwrap(),
            BigInt::from_str("123456789012345678901").unwrap()
        );
        assert_eq!(
            parse_big_int("ff", us.symbols(), 16).unwrap(),
            BigInt::from(255)
        );
    }

    #[test]
    fn booleans_ignore_case() {
        let us = Locale::US;
        assert_eq!(parse_bool("TRUE", us.symbols()), Ok(true));
        assert_eq!(parse_bool("fAlSe", us.symbols()), Ok(false));
        assert!(parse_bool("yes", us.symbols()).is_err());
    }
}
