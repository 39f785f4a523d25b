//! Compiled patterns, the string-pattern cache, and match results.
//!
//! A [`Pattern`] keeps several compiled forms of the same expression: one for
//! unanchored searching (`find_at` with full look-behind context over the
//! buffered window), one anchored at both ends for testing whether an
//! isolated token matches as a whole, and a meta regex for searches confined
//! to a window whose assertions still see the text around it. A lazy DFA is
//! built on first use to tell whether an anchored match depends on input past
//! the end of the buffer.

use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, OnceLock},
};

use regex::{Captures, Regex};
use regex_automata::{Anchored, Input, hybrid::dfa::DFA, meta, util::captures::Captures as Spans};
use tracing::debug;

use crate::error::ScanResult;

/// Default number of string patterns kept compiled per scanner.
pub const DEFAULT_PATTERN_CACHE_SIZE: usize = 7;

/// A compiled regular expression usable as a delimiter or search target.
///
/// Cloning is cheap; clones share the compiled automata.
#[derive(Clone)]
pub struct Pattern {
    inner: Arc<PatternInner>,
}

struct PatternInner {
    source: String,
    find: Regex,
    whole: Regex,
    bounded: meta::Regex,
    anchored_dfa: OnceLock<Option<DFA>>,
    end_sensitive: bool,
}

impl Pattern {
    /// Compiles `source` using `regex` syntax.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPattern`](crate::ScanError::InvalidPattern)
    /// if the expression does not compile.
    pub fn new(source: &str) -> ScanResult<Self> {
        let find = Regex::new(source)?;
        let whole = Regex::new(&format!(r"\A(?:{source})\z"))?;
        let bounded =
            meta::Regex::new(source).map_err(|e| regex::Error::Syntax(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(PatternInner {
                source: source.into(),
                find,
                whole,
                bounded,
                anchored_dfa: OnceLock::new(),
                end_sensitive: mentions_end_assertion(source),
            }),
        })
    }

    /// The expression this pattern was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner.source
    }

    /// Leftmost match starting at or after `start` in `haystack`.
    pub(crate) fn captures_at<'h>(&self, haystack: &'h str, start: usize) -> Option<Captures<'h>> {
        self.inner.find.captures_at(haystack, start)
    }

    /// Match anchored at `start`; `None` if the leftmost match begins later.
    pub(crate) fn captures_anchored<'h>(
        &self,
        haystack: &'h str,
        start: usize,
    ) -> Option<Captures<'h>> {
        self.captures_at(haystack, start)
            .filter(|caps| caps.get(0).is_some_and(|m| m.start() == start))
    }

    /// Leftmost match lying inside `start..limit`. Assertions such as `$`
    /// and `\b` look at the whole `haystack`, not just the window.
    pub(crate) fn search_within(
        &self,
        haystack: &str,
        start: usize,
        limit: usize,
        base: usize,
    ) -> Option<MatchResult> {
        let re = &self.inner.bounded;
        let mut caps = re.create_captures();
        re.search_captures(&Input::new(haystack).span(start..limit), &mut caps);
        caps.is_match().then(|| MatchResult::from_spans(&caps, haystack, base))
    }

    /// Whether an anchored match at `start` could change if more input
    /// followed `haystack`: the automaton is still alive after the last
    /// byte. Answers `true` when the automaton cannot tell.
    pub(crate) fn hits_end(&self, haystack: &str, start: usize) -> bool {
        let dfa = self
            .inner
            .anchored_dfa
            .get_or_init(|| build_anchored_dfa(&self.inner.source));
        let Some(dfa) = dfa else {
            return true;
        };
        let mut cache = dfa.create_cache();
        let input = Input::new(haystack)
            .span(start..haystack.len())
            .anchored(Anchored::Yes);
        let Ok(mut state) = dfa.start_state_forward(&mut cache, &input) else {
            return true;
        };
        for &byte in &haystack.as_bytes()[start..] {
            if state.is_dead() {
                return false;
            }
            if state.is_quit() {
                return true;
            }
            match dfa.next_state(&mut cache, state, byte) {
                Ok(next) => state = next,
                Err(_) => return true,
            }
        }
        !state.is_dead()
    }

    /// Match covering all of `token`.
    pub(crate) fn captures_whole<'h>(&self, token: &'h str) -> Option<Captures<'h>> {
        self.inner.whole.captures(token)
    }

    /// Whether a match touching the window end could be lost if more input
    /// arrived, because the expression asserts something about what follows.
    pub(crate) fn is_end_sensitive(&self) -> bool {
        self.inner.end_sensitive
    }

    pub(crate) fn same_as(&self, other: &Pattern) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.as_str() == other.as_str()
    }
}

fn build_anchored_dfa(source: &str) -> Option<DFA> {
    DFA::builder()
        .configure(DFA::config().unicode_word_boundary(true))
        .build(source)
        .inspect_err(|err| debug!(pattern = source, error = %err, "no lazy DFA for pattern"))
        .ok()
}

fn mentions_end_assertion(source: &str) -> bool {
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if matches!(chars.next(), Some('b' | 'B' | 'z' | '>')) {
                    return true;
                }
            }
            '$' => return true,
            _ => {}
        }
    }
    false
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Most-recently-used cache of patterns compiled from strings.
#[derive(Debug)]
#[doc(hidden)]
pub struct PatternCache {
    entries: VecDeque<Pattern>,
    capacity: usize,
}

impl PatternCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Returns the cached pattern for `source`, compiling it on a miss.
    pub(crate) fn for_source(&mut self, source: &str) -> ScanResult<Pattern> {
        if let Some(idx) = self.entries.iter().position(|p| p.as_str() == source) {
            if idx > 0 {
                if let Some(hit) = self.entries.remove(idx) {
                    self.entries.push_front(hit);
                }
            }
            return Ok(self.entries[0].clone());
        }
        let compiled = Pattern::new(source)?;
        self.entries.push_front(compiled.clone());
        self.entries.truncate(self.capacity);
        Ok(compiled)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Anything a scanning operation accepts as a pattern: a `&str` (compiled
/// through the scanner's cache) or an already compiled [`Pattern`].
pub trait AsPattern {
    #[doc(hidden)]
    fn resolve(&self, cache: &mut PatternCache) -> ScanResult<Pattern>;
}

impl AsPattern for str {
    fn resolve(&self, cache: &mut PatternCache) -> ScanResult<Pattern> {
        cache.for_source(self)
    }
}

impl AsPattern for String {
    fn resolve(&self, cache: &mut PatternCache) -> ScanResult<Pattern> {
        cache.for_source(self)
    }
}

impl AsPattern for Pattern {
    fn resolve(&self, _cache: &mut PatternCache) -> ScanResult<Pattern> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Group {
    start: usize,
    end: usize,
    text: String,
}

/// The outcome of a successful scanning operation.
///
/// Offsets are absolute byte offsets into the decoded character stream, so
/// they stay meaningful after the scanner discards consumed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    groups: Vec<Option<Group>>,
}

impl MatchResult {
    /// Builds a result from captures over a haystack whose index 0 sits at
    /// absolute offset `base`.
    pub(crate) fn from_captures(caps: &Captures<'_>, base: usize) -> Self {
        let groups = caps
            .iter()
            .map(|g| {
                g.map(|m| Group {
                    start: base + m.start(),
                    end: base + m.end(),
                    text: m.as_str().into(),
                })
            })
            .collect();
        Self { groups }
    }

    /// Builds a result from spans over `haystack`, whose index 0 sits at
    /// absolute offset `base`.
    fn from_spans(caps: &Spans, haystack: &str, base: usize) -> Self {
        let groups = (0..caps.group_len())
            .map(|i| {
                caps.get_group(i).map(|span| Group {
                    start: base + span.start,
                    end: base + span.end,
                    text: haystack[span.range()].into(),
                })
            })
            .collect();
        Self { groups }
    }

    fn whole(&self) -> &Group {
        // Group 0 always participates in a match.
        match self.groups.first() {
            Some(Some(g)) => g,
            _ => unreachable!("match result without group 0"),
        }
    }

    /// Absolute offset of the first matched byte.
    #[must_use]
    pub fn start(&self) -> usize {
        self.whole().start
    }

    /// Absolute offset one past the last matched byte.
    #[must_use]
    pub fn end(&self) -> usize {
        self.whole().end
    }

    /// The matched text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.whole().text
    }

    /// Text of capture group `index`, or `None` if it did not participate.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index)?.as_ref().map(|g| g.text.as_str())
    }

    /// Absolute span of capture group `index`.
    #[must_use]
    pub fn group_span(&self, index: usize) -> Option<(usize, usize)> {
        self.groups.get(index)?.as_ref().map(|g| (g.start, g.end))
    }

    /// Number of capture groups, not counting the whole match.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len() - 1
    }

    /// Returns `true` for a zero-length match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_reuses_and_evicts_least_recent() {
        let mut cache = PatternCache::new(2);
        let a = cache.for_source("a+").unwrap();
        let _b = cache.for_source("b+").unwrap();
        let a_again = cache.for_source("a+").unwrap();
        assert!(Arc::ptr_eq(&a.inner, &a_again.inner));
        let _c = cache.for_source("c+").unwrap();
        assert_eq!(cache.len(), 2);
        // "b+" was least recently used and is gone; "a+" survives.
        let a_third = cache.for_source("a+").unwrap();
        assert!(Arc::ptr_eq(&a.inner, &a_third.inner));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn anchored_rejects_later_match() {
        let p = Pattern::new("b+").unwrap();
        assert!(p.captures_anchored("abb", 0).is_none());
        let m = p.captures_anchored("abb", 1).unwrap();
        assert_eq!(m.get(0).unwrap().as_str(), "bb");
    }

    #[test]
    fn whole_requires_full_token() {
        let p = Pattern::new("[0-9]+").unwrap();
        assert!(p.captures_whole("123").is_some());
        assert!(p.captures_whole("123x").is_none());
    }

    #[test]
    fn end_sensitivity_detection() {
        assert!(Pattern::new(r"foo$").unwrap().is_end_sensitive());
        assert!(Pattern::new(r"\bfoo\b").unwrap().is_end_sensitive());
        assert!(!Pattern::new(r"\s+").unwrap().is_end_sensitive());
        assert!(!Pattern::new(r"\$").unwrap().is_end_sensitive());
    }

    #[test]
    fn window_search_sees_text_past_the_limit() {
        let p = Pattern::new(r"a\b").unwrap();
        assert!(p.search_within("ab", 0, 1, 0).is_none());
        assert!(p.search_within("a b", 0, 1, 0).is_some());
        let dollar = Pattern::new("a$").unwrap();
        assert!(dollar.search_within("ab", 0, 1, 0).is_none());
        let m = dollar.search_within("xa", 0, 2, 10).unwrap();
        assert_eq!((m.start(), m.end(), m.as_str()), (11, 12, "a"));
    }

    #[test]
    fn hits_end_stops_at_a_dead_prefix() {
        let p = Pattern::new("xyz").unwrap();
        assert!(!p.hits_end("abc", 0));
        assert!(p.hits_end("xy", 0));
        assert!(p.hits_end("", 0));
        // Matches are seen one byte late, so the automaton dies one byte
        // after a finished match.
        assert!(!Pattern::new("a").unwrap().hits_end("abc", 0));
        assert!(Pattern::new("a+").unwrap().hits_end("aa", 0));
        // A longer, preferred alternative is still possible.
        assert!(Pattern::new("abcd|ab").unwrap().hits_end("abc", 0));
        assert!(!Pattern::new("a$").unwrap().hits_end("ab", 0));
    }

    #[test]
    fn match_result_offsets_are_absolute() {
        let p = Pattern::new("(b)(x)?").unwrap();
        let caps = p.captures_at("abc", 0).unwrap();
        let m = MatchResult::from_captures(&caps, 100);
        assert_eq!((m.start(), m.end()), (101, 102));
        assert_eq!(m.group(1), Some("b"));
        assert_eq!(m.group(2), None);
        assert_eq!(m.group_count(), 2);
    }
}
