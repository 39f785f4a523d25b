//! Locale-specific number symbols.
//!
//! A [`Locale`] only carries what the scanner needs to recognize numeric and
//! boolean literals: separators, affixes and the localized special tokens.

use std::borrow::Cow;

/// Symbols used when recognizing and converting numeric tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberSymbols {
    /// Separator allowed between digit groups of the integer part.
    pub grouping_separator: char,
    /// Number of digits in each group after the first (leftmost) one.
    pub grouping_size: usize,
    /// Separator between the integer and fractional part.
    pub decimal_separator: char,
    /// Localized not-a-number token.
    pub nan: Cow<'static, str>,
    /// Localized infinity token.
    pub infinity: Cow<'static, str>,
    /// Prefix written before positive numbers (usually empty).
    pub positive_prefix: Cow<'static, str>,
    /// Suffix written after positive numbers (usually empty).
    pub positive_suffix: Cow<'static, str>,
    /// Prefix written before negative numbers.
    pub negative_prefix: Cow<'static, str>,
    /// Suffix written after negative numbers (usually empty).
    pub negative_suffix: Cow<'static, str>,
    /// Literal accepted as boolean true, compared case-insensitively.
    pub true_literal: Cow<'static, str>,
    /// Literal accepted as boolean false, compared case-insensitively.
    pub false_literal: Cow<'static, str>,
}

impl NumberSymbols {
    const fn western(grouping_separator: char, decimal_separator: char) -> Self {
        Self {
            grouping_separator,
            grouping_size: 3,
            decimal_separator,
            nan: Cow::Borrowed("NaN"),
            infinity: Cow::Borrowed("\u{221E}"),
            positive_prefix: Cow::Borrowed(""),
            positive_suffix: Cow::Borrowed(""),
            negative_prefix: Cow::Borrowed("-"),
            negative_suffix: Cow::Borrowed(""),
            true_literal: Cow::Borrowed("true"),
            false_literal: Cow::Borrowed("false"),
        }
    }
}

impl Default for NumberSymbols {
    fn default() -> Self {
        Locale::US.symbols
    }
}

/// A named set of [`NumberSymbols`].
///
/// Two locales are equal when both their tags and symbols are equal.
///
/// ```
/// use textscan::{Locale, NumberSymbols};
///
/// let custom = Locale::new("x-underscore", NumberSymbols {
///     grouping_separator: '_',
///     ..NumberSymbols::default()
/// });
/// assert_eq!(custom.tag(), "x-underscore");
/// assert_ne!(custom, Locale::US);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locale {
    tag: Cow<'static, str>,
    symbols: NumberSymbols,
}

impl Locale {
    /// Language-neutral symbols: `1,234.5`.
    pub const ROOT: Locale = Locale::builtin("und", NumberSymbols::western(',', '.'));
    /// United States English: `1,234.5`.
    pub const US: Locale = Locale::builtin("en-US", NumberSymbols::western(',', '.'));
    /// United Kingdom English: `1,234.5`.
    pub const UK: Locale = Locale::builtin("en-GB", NumberSymbols::western(',', '.'));
    /// German (Germany): `1.234,5`.
    pub const GERMANY: Locale = Locale::builtin("de-DE", NumberSymbols::western('.', ','));
    /// French (France): narrow no-break space grouping, `1 234,5`.
    pub const FRANCE: Locale = Locale::builtin("fr-FR", NumberSymbols::western('\u{202F}', ','));
    /// Italian (Italy): `1.234,5`.
    pub const ITALY: Locale = Locale::builtin("it-IT", NumberSymbols::western('.', ','));
    /// German (Switzerland): right single quotation mark grouping, `1’234.5`.
    pub const SWITZERLAND: Locale =
        Locale::builtin("de-CH", NumberSymbols::western('\u{2019}', '.'));
    /// Arabic (Egypt): Arabic-Indic digits with Arabic separators, `١٬٢٣٤٫٥`.
    pub const EGYPT_ARABIC: Locale = Locale::builtin(
        "ar-EG",
        NumberSymbols {
            grouping_separator: '\u{066C}',
            grouping_size: 3,
            decimal_separator: '\u{066B}',
            nan: Cow::Borrowed("\u{0644}\u{064A}\u{0633}\u{00A0}\u{0631}\u{0642}\u{0645}\u{064B}\u{0627}"),
            infinity: Cow::Borrowed("\u{221E}"),
            positive_prefix: Cow::Borrowed(""),
            positive_suffix: Cow::Borrowed(""),
            negative_prefix: Cow::Borrowed("\u{061C}-"),
            negative_suffix: Cow::Borrowed(""),
            true_literal: Cow::Borrowed("true"),
            false_literal: Cow::Borrowed("false"),
        },
    );

    const fn builtin(tag: &'static str, symbols: NumberSymbols) -> Self {
        Self {
            tag: Cow::Borrowed(tag),
            symbols,
        }
    }

    /// Creates a locale with custom symbols.
    pub fn new(tag: impl Into<Cow<'static, str>>, symbols: NumberSymbols) -> Self {
        Self {
            tag: tag.into(),
            symbols,
        }
    }

    /// Looks up a built-in locale by its BCP 47 tag (case-insensitive).
    #[must_use]
    pub fn for_tag(tag: &str) -> Option<Self> {
        [
            Self::ROOT,
            Self::US,
            Self::UK,
            Self::GERMANY,
            Self::FRANCE,
            Self::ITALY,
            Self::SWITZERLAND,
            Self::EGYPT_ARABIC,
        ]
        .into_iter()
        .find(|l| l.tag.eq_ignore_ascii_case(tag))
    }

    /// The locale's tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The locale's number symbols.
    #[must_use]
    pub fn symbols(&self) -> &NumberSymbols {
        &self.symbols
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::US
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_tag() {
        assert_eq!(Locale::for_tag("de-de"), Some(Locale::GERMANY));
        assert_eq!(Locale::for_tag("zz-ZZ"), None);
    }

    #[test]
    fn default_is_us() {
        assert_eq!(Locale::default(), Locale::US);
        assert_eq!(NumberSymbols::default().grouping_separator, ',');
    }
}
