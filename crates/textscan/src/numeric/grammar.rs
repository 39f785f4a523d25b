//! Regex templates for localized numeric and boolean literals.
//!
//! The grammars follow the usual shape of formatted numbers: an optional
//! sign or locale affix, digits (optionally grouped), an optional fraction
//! and exponent. Any Unicode decimal digit is accepted by the grammar; the
//! conversion step decides whether it can actually be interpreted.

use std::collections::HashMap;

use crate::{error::ScanResult, locale::Locale, pattern::Pattern};

const RADIX_DIGITS: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Escapes `s` for literal use, or returns an empty string.
fn literal(s: &str) -> String {
    regex::escape(s)
}

fn literal_char(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0u8; 4]))
}

/// Digits grouped from the right: a leading group of one to `size` digits
/// starting with a non-zero digit, then one or more separator-led groups of
/// exactly `size` digits.
fn grouped_numeral(digit: &str, separator: &str, size: usize) -> String {
    let size = size.max(1);
    let optional_lead = format!("{digit}?").repeat(size - 1);
    let group = digit.repeat(size);
    format!(r"([\d&&[^0]]{optional_lead}({separator}{group})+)")
}

pub(crate) fn integer_pattern_source(locale: &Locale, radix: u32) -> String {
    let sym = locale.symbols();
    let radix_digits = &RADIX_DIGITS[..radix as usize];
    let digit = format!(r"(?i:[{radix_digits}\d])");
    let grouped = grouped_numeral(
        &digit,
        &literal_char(sym.grouping_separator),
        sym.grouping_size,
    );
    let numeral = format!("(({digit}+)|{grouped})");
    let plain = format!("([-+]?({numeral}))");
    let positive = format!(
        "{}{numeral}{}",
        literal(&sym.positive_prefix),
        literal(&sym.positive_suffix)
    );
    let negative = format!(
        "{}{numeral}{}",
        literal(&sym.negative_prefix),
        literal(&sym.negative_suffix)
    );
    format!("({plain})|({positive})|({negative})")
}

/// Returns the (float, decimal) pattern sources for `locale`.
///
/// The float grammar additionally admits hexadecimal floating literals and
/// the NaN/Infinity tokens; the decimal grammar admits only finite numbers.
pub(crate) fn float_pattern_sources(locale: &Locale) -> (String, String) {
    let sym = locale.symbols();
    let digit = r"\d";
    let exponent = format!("([eE][+-]?{digit}+)?");
    let grouped = grouped_numeral(
        digit,
        &literal_char(sym.grouping_separator),
        sym.grouping_size,
    );
    let numeral = format!("(({digit}+)|{grouped})");
    let point = literal_char(sym.decimal_separator);
    let decimal_numeral =
        format!("({numeral}|{numeral}{point}{digit}*|{point}{digit}+)");
    let non_number = format!(
        "(NaN|{}|Infinity|{})",
        literal(&sym.nan),
        literal(&sym.infinity)
    );
    let (pp, ps) = (literal(&sym.positive_prefix), literal(&sym.positive_suffix));
    let (np, ns) = (literal(&sym.negative_prefix), literal(&sym.negative_suffix));
    let positive_float = format!("({pp}{decimal_numeral}{ps}{exponent})");
    let negative_float = format!("({np}{decimal_numeral}{ns}{exponent})");
    let decimal = format!(
        "(([-+]?{decimal_numeral}{exponent})|{positive_float}|{negative_float})"
    );
    let hex_float = r"[-+]?0[xX][0-9a-fA-F]*\.[0-9a-fA-F]+([pP][-+]?[0-9]+)?";
    let signed_non_number = format!(
        "(([-+]?{non_number})|({pp}{non_number}{ps})|({np}{non_number}{ns}))"
    );
    (
        format!("{decimal}|{hex_float}|{signed_non_number}"),
        decimal,
    )
}

pub(crate) fn boolean_pattern_source(locale: &Locale) -> String {
    let sym = locale.symbols();
    format!(
        "(?i:{}|{})",
        literal(&sym.true_literal),
        literal(&sym.false_literal)
    )
}

#[derive(Clone)]
struct FloatGrammar {
    float: Pattern,
    decimal: Pattern,
}

/// Compiled grammars keyed by the locale (and radix, for integers).
///
/// Patterns are built lazily the first time a combination is requested and
/// reused afterwards.
#[derive(Default)]
pub(crate) struct GrammarCache {
    integer: HashMap<(Locale, u32), Pattern>,
    float: HashMap<Locale, FloatGrammar>,
    boolean: HashMap<Locale, Pattern>,
}

impl GrammarCache {
    pub(crate) fn integer(&mut self, locale: &Locale, radix: u32) -> ScanResult<Pattern> {
        let key = (locale.clone(), radix);
        if let Some(p) = self.integer.get(&key) {
            return Ok(p.clone());
        }
        let compiled = Pattern::new(&integer_pattern_source(locale, radix))?;
        self.integer.insert(key, compiled.clone());
        Ok(compiled)
    }

    fn float_grammar(&mut self, locale: &Locale) -> ScanResult<FloatGrammar> {
        if let Some(g) = self.float.get(locale) {
            return Ok(g.clone());
        }
        let (float, decimal) = float_pattern_sources(locale);
        let grammar = FloatGrammar {
            float: Pattern::new(&float)?,
            decimal: Pattern::new(&decimal)?,
        };
        self.float.insert(locale.clone(), grammar.clone());
        Ok(grammar)
    }

    pub(crate) fn float(&mut self, locale: &Locale) -> ScanResult<Pattern> {
        Ok(self.float_grammar(locale)?.float)
    }

    pub(crate) fn decimal(&mut self, locale: &Locale) -> ScanResult<Pattern> {
        Ok(self.float_grammar(locale)?.decimal)
    }

    pub(crate) fn boolean(&mut self, locale: &Locale) -> ScanResult<Pattern> {
        if let Some(p) = self.boolean.get(locale) {
            return Ok(p.clone());
        }
        let compiled = Pattern::new(&boolean_pattern_source(locale))?;
        self.boolean.insert(locale.clone(), compiled.clone());
        Ok(compiled)
    }
}

impl std::fmt::Debug for GrammarCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarCache")
            .field("integer", &self.integer.len())
            .field("float", &self.float.len())
            .field("boolean", &self.boolean.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn whole(pattern: &Pattern, token: &str) -> bool {
        pattern.captures_whole(token).is_some()
    }

    #[rstest]
    #[case("123", true)]
    #[case("-123", true)]
    #[case("+7", true)]
    #[case("1,200", true)]
    #[case("12,345,678", true)]
    #[case("1,20", false)]
    #[case("0,200", false)]
    #[case(",200", false)]
    #[case("1,2000", false)]
    #[case("12a", false)]
    #[case("\u{0661}\u{0662}", true)]
    fn integer_grammar_decimal(#[case] token: &str, #[case] accepted: bool) {
        let p = GrammarCache::default().integer(&Locale::US, 10).unwrap();
        assert_eq!(whole(&p, token), accepted, "{token}");
    }

    #[test]
    fn integer_grammar_hex_accepts_letters_case_insensitively() {
        let p = GrammarCache::default().integer(&Locale::US, 16).unwrap();
        assert!(whole(&p, "fF"));
        assert!(!whole(&p, "fg"));
    }

    #[test]
    fn integer_grammar_follows_locale_separator() {
        let p = GrammarCache::default().integer(&Locale::GERMANY, 10).unwrap();
        assert!(whole(&p, "1.200"));
        assert!(!whole(&p, "1,200"));
    }

    #[rstest]
    #[case("1.5", true)]
    #[case("-45,067.444", true)]
    #[case(".5", true)]
    #[case("5.", true)]
    #[case("1e10", true)]
    #[case("-1.5E-3", true)]
    #[case("NaN", true)]
    #[case("-Infinity", true)]
    #[case("\u{221E}", true)]
    #[case("0x1.8p1", true)]
    #[case("1.2.3", false)]
    #[case("e5", false)]
    fn float_grammar(#[case] token: &str, #[case] accepted: bool) {
        let p = GrammarCache::default().float(&Locale::US).unwrap();
        assert_eq!(whole(&p, token), accepted, "{token}");
    }

    #[test]
    fn decimal_grammar_excludes_specials() {
        let mut cache = GrammarCache::default();
        let p = cache.decimal(&Locale::US).unwrap();
        assert!(whole(&p, "-45,067.444"));
        assert!(!whole(&p, "NaN"));
        assert!(!whole(&p, "0x1.8p1"));
    }

    #[test]
    fn boolean_grammar_is_case_insensitive() {
        let p = GrammarCache::default().boolean(&Locale::US).unwrap();
        assert!(whole(&p, "TRUE"));
        assert!(whole(&p, "False"));
        assert!(!whole(&p, "yes"));
    }

    #[test]
    fn grammars_are_cached_per_locale_and_radix() {
        let mut cache = GrammarCache::default();
        let a = cache.integer(&Locale::US, 10).unwrap();
        let b = cache.integer(&Locale::US, 10).unwrap();
        let c = cache.integer(&Locale::US, 16).unwrap();
        assert!(a.same_as(&b));
        assert_ne!(a.as_str(), c.as_str());
    }
}
