//! Typed values recognized by the scanner.

mod convert;
mod grammar;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

pub(crate) use grammar::GrammarCache;

use crate::locale::NumberSymbols;

/// The type a typed query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// [`BigInt`]
    BigInt,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// [`BigDecimal`]
    BigDecimal,
}

/// Which grammar isolates tokens of a given [`ValueKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grammar {
    Boolean,
    Integer,
    Float,
    Decimal,
}

impl ValueKind {
    pub(crate) fn grammar(self) -> Grammar {
        match self {
            ValueKind::Bool => Grammar::Boolean,
            ValueKind::I8 | ValueKind::I16 | ValueKind::I32 | ValueKind::I64 | ValueKind::BigInt => {
                Grammar::Integer
            }
            ValueKind::F32 | ValueKind::F64 => Grammar::Float,
            ValueKind::BigDecimal => Grammar::Decimal,
        }
    }

    /// Whether values of this kind are read in a selectable radix.
    #[must_use]
    pub fn is_integral(self) -> bool {
        self.grammar() == Grammar::Integer
    }
}

/// A converted token, tagged with its type.
///
/// The lookahead cache stores one of these so that a consuming call can
/// return the value found by the preceding probe without parsing again.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// A boolean literal.
    Bool(bool),
    /// An 8-bit integer.
    I8(i8),
    /// A 16-bit integer.
    I16(i16),
    /// A 32-bit integer.
    I32(i32),
    /// A 64-bit integer.
    I64(i64),
    /// An arbitrary-precision integer.
    BigInt(BigInt),
    /// A 32-bit float.
    F32(f32),
    /// A 64-bit float.
    F64(f64),
    /// An arbitrary-precision decimal.
    BigDecimal(BigDecimal),
}

impl TypedValue {
    /// The kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Bool(_) => ValueKind::Bool,
            TypedValue::I8(_) => ValueKind::I8,
            TypedValue::I16(_) => ValueKind::I16,
            TypedValue::I32(_) => ValueKind::I32,
            TypedValue::I64(_) => ValueKind::I64,
            TypedValue::BigInt(_) => ValueKind::BigInt,
            TypedValue::F32(_) => ValueKind::F32,
            TypedValue::F64(_) => ValueKind::F64,
            TypedValue::BigDecimal(_) => ValueKind::BigDecimal,
        }
    }
}

/// Converts a token that already matched the grammar for `kind`.
///
/// The error string explains why the conversion failed; the caller wraps it
/// into a mismatch.
pub(crate) fn convert(
    kind: ValueKind,
    token: &str,
    sym: &NumberSymbols,
    radix: u32,
) -> Result<TypedValue, String> {
    let integer = |t: &str| convert::normalize_integer(t, sym);
    Ok(match kind {
        ValueKind::Bool => TypedValue::Bool(convert::parse_bool(token, sym)?),
        ValueKind::I8 => TypedValue::I8(
            i8::from_str_radix(&integer(token), radix).map_err(|e| e.to_string())?,
        ),
        ValueKind::I16 => TypedValue::I16(
            i16::from_str_radix(&integer(token), radix).map_err(|e| e.to_string())?,
        ),
        ValueKind::I32 => TypedValue::I32(
            i32::from_str_radix(&integer(token), radix).map_err(|e| e.to_string())?,
        ),
        ValueKind::I64 => TypedValue::I64(
            i64::from_str_radix(&integer(token), radix).map_err(|e| e.to_string())?,
        ),
        ValueKind::BigInt => TypedValue::BigInt(convert::parse_big_int(token, sym, radix)?),
        ValueKind::F32 => TypedValue::F32(convert::parse_f32(token, sym)?),
        ValueKind::F64 => TypedValue::F64(convert::parse_f64(token, sym)?),
        ValueKind::BigDecimal => TypedValue::BigDecimal(convert::parse_big_decimal(token, sym)?),
    })
}

mod sealed {
    pub trait Sealed {}
}

/// Types the scanner can produce from a token.
///
/// Implemented for `bool`, `i8`, `i16`, `i32`, `i64`, `f32`, `f64`,
/// [`BigInt`] and [`BigDecimal`]; used through
/// [`Scanner::next_value`](crate::Scanner::next_value).
pub trait Scannable: sealed::Sealed + Sized {
    /// The kind requested when scanning this type.
    const KIND: ValueKind;

    #[doc(hidden)]
    fn from_typed(value: TypedValue) -> Option<Self>;
}

macro_rules! scannable {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scannable for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_typed(value: TypedValue) -> Option<Self> {
                match value {
                    TypedValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    )*};
}

scannable! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    BigInt => BigInt,
    f32 => F32,
    f64 => F64,
    BigDecimal => BigDecimal,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::locale::Locale;

    #[rstest]
    #[case(ValueKind::I8, "127", 10, Some(TypedValue::I8(127)))]
    #[case(ValueKind::I8, "128", 10, None)]
    #[case(ValueKind::I8, "-128", 10, Some(TypedValue::I8(-128)))]
    #[case(ValueKind::I16, "7f", 16, Some(TypedValue::I16(127)))]
    #[case(ValueKind::I32, "1,200", 10, Some(TypedValue::I32(1200)))]
    #[case(ValueKind::I64, "9,223,372,036,854,775,807", 10, Some(TypedValue::I64(i64::MAX)))]
    #[case(ValueKind::I32, "101", 2, Some(TypedValue::I32(5)))]
    #[case(ValueKind::I32, "102", 2, None)]
    #[case(ValueKind::F64, "1.5e2", 10, Some(TypedValue::F64(150.0)))]
    #[case(ValueKind::F32, "-0.5", 10, Some(TypedValue::F32(-0.5)))]
    fn conversions(
        #[case] kind: ValueKind,
        #[case] token: &str,
        #[case] radix: u32,
        #[case] expected: Option<TypedValue>,
    ) {
        let got = convert(kind, token, Locale::US.symbols(), radix).ok();
        assert_eq!(got, expected);
    }

    #[test]
    fn kinds_round_trip_through_values() {
        let v = convert(ValueKind::BigInt, "42", Locale::US.symbols(), 10).unwrap();
        assert_eq!(v.kind(), ValueKind::BigInt);
        assert_eq!(BigInt::from_typed(v), Some(BigInt::from(42)));
        assert!(ValueKind::BigInt.is_integral());
        assert!(!ValueKind::BigDecimal.is_integral());
    }
}
