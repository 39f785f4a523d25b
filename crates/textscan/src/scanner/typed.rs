//! Typed probes and reads.
//!
//! A typed probe isolates the next token with the grammar for the requested
//! type, converts it, and remembers the converted value. The consuming call
//! for the same type (and radix, for integers) then returns that value
//! without scanning again.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use super::{Scanner, TypedLookahead, check_radix};
use crate::{
    error::{ScanError, ScanResult},
    numeric::{self, Grammar, Scannable, TypedValue, ValueKind},
    pattern::Pattern,
    source::CharSource,
};

impl<S: CharSource> Scanner<S> {
    fn grammar_for(&mut self, kind: ValueKind, radix: u32) -> ScanResult<Pattern> {
        match kind.grammar() {
            Grammar::Boolean => self.grammars.boolean(&self.locale),
            Grammar::Integer => self.grammars.integer(&self.locale, radix),
            Grammar::Float => self.grammars.float(&self.locale),
            Grammar::Decimal => self.grammars.decimal(&self.locale),
        }
    }

    /// Radix to use for `kind`; non-integral kinds always read decimal.
    fn radix_for(kind: ValueKind, radix: u32) -> ScanResult<u32> {
        if kind.is_integral() {
            check_radix(radix)
        } else {
            Ok(10)
        }
    }

    /// Probes for a token of `kind` and caches its converted value.
    pub(crate) fn has_next_kind(&mut self, kind: ValueKind, radix: u32) -> ScanResult<bool> {
        self.ensure_open()?;
        let radix = Self::radix_for(kind, radix)?;
        self.typed = None;
        let pattern = self.grammar_for(kind, radix)?;
        if self.probe(&pattern).is_none() {
            return Ok(false);
        }
        let Some(lookahead) = self.lookahead.as_ref() else {
            return Ok(false);
        };
        match numeric::convert(kind, &lookahead.token, self.locale.symbols(), radix) {
            Ok(value) => {
                self.typed = Some(TypedLookahead {
                    value,
                    radix,
                    end: lookahead.end,
                });
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    /// Reads a token of `kind`, reusing the value cached by a matching probe.
    ///
    /// A token outside the grammar for `kind` is consumed and reported as a
    /// mismatch. A token that fits the grammar but cannot be converted (an
    /// overflowing integer, say) is reported the same way but left unread,
    /// so a wider type can still take it.
    pub(crate) fn next_kind(&mut self, kind: ValueKind, radix: u32) -> ScanResult<TypedValue> {
        self.ensure_open()?;
        let radix = Self::radix_for(kind, radix)?;
        if let Some(cached) = self.take_typed(kind, radix) {
            return Ok(cached);
        }
        self.clear_caches();
        let pattern = self.grammar_for(kind, radix)?;
        let token = self.next_token_matching(&pattern, true)?;
        numeric::convert(kind, &token.text, self.locale.symbols(), radix).map_err(|reason| {
            self.buf.position = token.start;
            self.last_match = None;
            ScanError::mismatch(token.text, reason)
        })
    }

    fn take_typed(&mut self, kind: ValueKind, radix: u32) -> Option<TypedValue> {
        let hit = self
            .typed
            .as_ref()
            .is_some_and(|t| t.value.kind() == kind && t.radix == radix);
        if !hit {
            return None;
        }
        let typed = self.typed.take()?;
        self.mod_count += 1;
        self.buf.position = typed.end;
        self.clear_caches();
        Some(typed.value)
    }

    /// Returns `true` if the next token reads as a `T`.
    ///
    /// Integral types use the scanner's default radix.
    ///
    /// # Errors
    ///
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn has_next_value<T: Scannable>(&mut self) -> ScanResult<bool> {
        self.has_next_kind(T::KIND, self.radix)
    }

    /// Returns `true` if the next token reads as a `T` in `radix`.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidRadix`] for a radix outside `2..=36`, and
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn has_next_value_radix<T: Scannable>(&mut self, radix: u32) -> ScanResult<bool> {
        self.has_next_kind(T::KIND, radix)
    }

    /// Reads the next token as a `T`.
    ///
    /// # Errors
    ///
    /// [`ScanError::InputMismatch`] if the token does not read as a `T`,
    /// [`ScanError::NoSuchElement`] when no tokens remain, and
    /// [`ScanError::Closed`] if the scanner is closed. A mismatching token is
    /// consumed unless it has the right shape but is out of range for `T`.
    pub fn next_value<T: Scannable>(&mut self) -> ScanResult<T> {
        self.next_value_radix(self.radix)
    }

    /// Reads the next token as a `T` in `radix`.
    ///
    /// # Errors
    ///
    /// As [`next_value`](Self::next_value), plus [`ScanError::InvalidRadix`].
    pub fn next_value_radix<T: Scannable>(&mut self, radix: u32) -> ScanResult<T> {
        let value = self.next_kind(T::KIND, radix)?;
        T::from_typed(value).ok_or(ScanError::NoSuchElement("typed value of another kind"))
    }
}

/// Expands to `has_next_x`, `next_x` and, for integral types, the `_radix`
/// variants of both.
macro_rules! typed_accessors {
    (
        $(#[$doc:meta])*
        $ty:ty, $has:ident, $next:ident
    ) => {
        impl<S: CharSource> Scanner<S> {
            $(#[$doc])*
            #[doc = ""]
            #[doc = "Returns `true` if the next token reads as this type. Does not advance."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "[`ScanError::Closed`] if the scanner is closed."]
            pub fn $has(&mut self) -> ScanResult<bool> {
                self.has_next_value::<$ty>()
            }

            $(#[$doc])*
            #[doc = ""]
            #[doc = "Reads the next token as this type."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "[`ScanError::InputMismatch`] if the token does not convert,"]
            #[doc = "[`ScanError::NoSuchElement`] when no tokens remain, and"]
            #[doc = "[`ScanError::Closed`] if the scanner is closed. An out-of-range"]
            #[doc = "token is left unread; any other mismatching token is consumed."]
            pub fn $next(&mut self) -> ScanResult<$ty> {
                self.next_value::<$ty>()
            }
        }
    };
    (
        $(#[$doc:meta])*
        $ty:ty, $has:ident, $next:ident, $has_radix:ident, $next_radix:ident
    ) => {
        typed_accessors!($(#[$doc])* $ty, $has, $next);

        impl<S: CharSource> Scanner<S> {
            $(#[$doc])*
            #[doc = ""]
            #[doc = "Returns `true` if the next token reads as this type in `radix`."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "[`ScanError::InvalidRadix`] for a radix outside `2..=36`, and"]
            #[doc = "[`ScanError::Closed`] if the scanner is closed."]
            pub fn $has_radix(&mut self, radix: u32) -> ScanResult<bool> {
                self.has_next_value_radix::<$ty>(radix)
            }

            $(#[$doc])*
            #[doc = ""]
            #[doc = "Reads the next token as this type in `radix`."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "As the default-radix variant, plus [`ScanError::InvalidRadix`]."]
            pub fn $next_radix(&mut self, radix: u32) -> ScanResult<$ty> {
                self.next_value_radix::<$ty>(radix)
            }
        }
    };
}

typed_accessors!(
    /// Boolean literals, case-insensitive.
    bool, has_next_bool, next_bool
);
typed_accessors!(
    /// 8-bit integers.
    i8, has_next_i8, next_i8, has_next_i8_radix, next_i8_radix
);
typed_accessors!(
    /// 16-bit integers.
    i16, has_next_i16, next_i16, has_next_i16_radix, next_i16_radix
);
typed_accessors!(
    /// 32-bit integers.
    i32, has_next_i32, next_i32, has_next_i32_radix, next_i32_radix
);
typed_accessors!(
    /// 64-bit integers.
    i64, has_next_i64, next_i64, has_next_i64_radix, next_i64_radix
);
typed_accessors!(
    /// Arbitrary-precision integers.
    BigInt, has_next_big_int, next_big_int, has_next_big_int_radix, next_big_int_radix
);
typed_accessors!(
    /// 32-bit floats, including NaN, infinities and hexadecimal literals.
    f32, has_next_f32, next_f32
);
typed_accessors!(
    /// 64-bit floats, including NaN, infinities and hexadecimal literals.
    f64, has_next_f64, next_f64
);
typed_accessors!(
    /// Arbitrary-precision decimals.
    BigDecimal, has_next_big_decimal, next_big_decimal
);
