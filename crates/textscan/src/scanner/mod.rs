//! The scanner: delimiter-driven tokenization over an incrementally read
//! character source.
//!
//! All operations work on a buffered window of input. A search that cannot
//! be decided with the characters currently buffered (the match or the
//! delimiter touches the end of the window and the source is still open)
//! asks for more input and is retried, so results never depend on how the
//! source happens to split its reads.

mod iter;
mod typed;


use std::{
    fmt,
    fs::File,
    io::{self, Read},
    path::Path,
    sync::LazyLock,
};

use encoding_rs::Encoding;
use tracing::{debug, trace, warn};

pub use iter::{FindAll, IntoTokens, Tokens};

use crate::{
    buffer::InputBuffer,
    error::{ScanError, ScanResult},
    locale::Locale,
    numeric::{GrammarCache, TypedValue},
    options::ScannerOptions,
    pattern::{AsPattern, MatchResult, Pattern, PatternCache},
    source::{CharSource, ReaderSource, StrSource},
};

/// One or more whitespace characters.
///
/// Whitespace here is the ASCII control separators plus Unicode space,
/// line and paragraph separators, excluding the no-break spaces.
pub const WHITESPACE: &str =
    r"[\t\n\x0B\x0C\r\x1C-\x1F\p{Zl}\p{Zp}\p{Zs}&&[^\xA0\x{2007}\x{202F}]]+";

/// A single line terminator.
pub const LINE_SEPARATOR: &str = "\r\n|[\n\r\u{2028}\u{2029}\u{85}]";

fn compile_builtin(source: &str) -> Pattern {
    Pattern::new(source).unwrap_or_else(|e| panic!("built-in pattern {source:?}: {e}"))
}

static WHITESPACE_PATTERN: LazyLock<Pattern> = LazyLock::new(|| compile_builtin(WHITESPACE));
static SEPARATOR_PATTERN: LazyLock<Pattern> = LazyLock::new(|| compile_builtin(LINE_SEPARATOR));
static LINE_PATTERN: LazyLock<Pattern> = LazyLock::new(|| {
    let body = "[^\n\r\u{2028}\u{2029}\u{85}]";
    compile_builtin(&format!("{body}*({LINE_SEPARATOR})|{body}+$"))
});
static ANY_TOKEN: LazyLock<Pattern> = LazyLock::new(|| compile_builtin("(?s).*"));

/// Lowest radix accepted by integer queries.
pub const MIN_RADIX: u32 = 2;
/// Highest radix accepted by integer queries.
pub const MAX_RADIX: u32 = 36;

pub(crate) fn check_radix(radix: u32) -> ScanResult<u32> {
    if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
        Ok(radix)
    } else {
        Err(ScanError::InvalidRadix(radix))
    }
}

/// Settings restored by [`Scanner::reset`].
#[derive(Debug, Clone)]
struct Settings {
    delimiter: Pattern,
    locale: Locale,
    radix: u32,
}

/// Result of the last successful pattern probe, kept so the matching
/// consuming call can skip the search.
#[derive(Debug, Clone)]
struct Lookahead {
    pattern: Pattern,
    token: String,
    matched: MatchResult,
    /// Buffer offset just past the token.
    end: usize,
}

/// Converted value of the last successful typed probe.
#[derive(Debug, Clone)]
struct TypedLookahead {
    value: TypedValue,
    radix: u32,
    end: usize,
}

/// A token isolated from the buffer.
struct Token {
    text: String,
    /// Buffer offset of the first byte.
    start: usize,
}

/// Breaks character input into tokens separated by a delimiter pattern and
/// converts tokens into typed values.
///
/// Probing methods (`has_next*`) never consume input; consuming methods
/// (`next*`, [`skip`](Self::skip), the searches) advance past what they
/// return. Every operation may read more input from the source, which is the
/// only place a scanner can block.
///
/// # Examples
///
/// ```rust
/// use textscan::Scanner;
///
/// let mut scanner = Scanner::from_text("1 fish 2 fish red fish");
/// let mut numbers = Vec::new();
/// let mut words = Vec::new();
/// while scanner.has_next().unwrap() {
///     if scanner.has_next_i32().unwrap() {
///         numbers.push(scanner.next_i32().unwrap());
///     } else {
///         words.push(scanner.next().unwrap());
///     }
/// }
/// assert_eq!(numbers, [1, 2]);
/// assert_eq!(words, ["fish", "fish", "red", "fish"]);
/// ```
pub struct Scanner<S: CharSource> {
    source: Option<S>,
    buf: InputBuffer,

    delimiter: Pattern,
    locale: Locale,
    radix: u32,
    defaults: Settings,

    patterns: PatternCache,
    grammars: GrammarCache,

    source_closed: bool,
    need_input: bool,
    /// Delimiters before the current token have already been skipped.
    skipped: bool,
    closed: bool,

    lookahead: Option<Lookahead>,
    typed: Option<TypedLookahead>,
    /// Buffer span of the last complete token that failed its pattern.
    rejected: Option<(usize, usize)>,
    last_match: Option<MatchResult>,
    io_error: Option<io::Error>,
    /// Bumped by every operation that may move the position or change how
    /// input is tokenized.
    mod_count: u64,
}

impl<S: CharSource> Scanner<S> {
    /// Creates a scanner over `source` with default options: whitespace
    /// delimiter, US locale, radix 10.
    pub fn new(source: S) -> Self {
        let options = ScannerOptions::default();
        let defaults = Settings {
            delimiter: WHITESPACE_PATTERN.clone(),
            locale: options.locale.clone(),
            radix: options.radix,
        };
        Self::build(source, &options, defaults)
    }

    /// Creates a scanner over `source` configured by `options`.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidPattern`] if the delimiter does not compile, and
    /// [`ScanError::InvalidRadix`] if the radix is outside `2..=36`.
    pub fn with_options(source: S, options: ScannerOptions) -> ScanResult<Self> {
        let delimiter = match options.delimiter.as_deref() {
            Some(src) => Pattern::new(src)?,
            None => WHITESPACE_PATTERN.clone(),
        };
        let defaults = Settings {
            delimiter,
            locale: options.locale.clone(),
            radix: check_radix(options.radix)?,
        };
        Ok(Self::build(source, &options, defaults))
    }

    fn build(source: S, options: &ScannerOptions, defaults: Settings) -> Self {
        Self {
            source: Some(source),
            buf: InputBuffer::new(options.buffer_capacity),
            delimiter: defaults.delimiter.clone(),
            locale: defaults.locale.clone(),
            radix: defaults.radix,
            defaults,
            patterns: PatternCache::new(options.pattern_cache_size),
            grammars: GrammarCache::default(),
            source_closed: false,
            need_input: false,
            skipped: false,
            closed: false,
            lookahead: None,
            typed: None,
            rejected: None,
            last_match: None,
            io_error: None,
            mod_count: 0,
        }
    }

    // Internal machinery

    pub(crate) fn ensure_open(&self) -> ScanResult<()> {
        if self.closed {
            Err(ScanError::Closed)
        } else {
            Ok(())
        }
    }

    fn clear_caches(&mut self) {
        self.lookahead = None;
        self.typed = None;
    }

    fn save_state(&mut self) {
        self.buf.save();
    }

    fn revert_state<T>(&mut self, result: T) -> T {
        self.buf.restore();
        self.skipped = false;
        result
    }

    /// Appends input from the source. End of input and I/O failures both
    /// mark the source closed; the error is kept for [`Self::io_error`].
    pub(crate) fn read_input(&mut self) {
        let Some(source) = self.source.as_mut() else {
            self.source_closed = true;
            self.need_input = false;
            return;
        };
        let (moved, read) = self.buf.fill(source);
        if moved {
            self.clear_caches();
        }
        match read {
            Ok(0) => {
                trace!(offset = self.buf.absolute(self.buf.len()), "end of input");
                self.source_closed = true;
            }
            Ok(n) => trace!(bytes = n, buffered = self.buf.len(), "read input"),
            Err(err) => {
                warn!(error = %err, "input source failed; treating as end of input");
                self.io_error = Some(err);
                self.source_closed = true;
            }
        }
        self.need_input = false;
    }

    fn delimiter_end_at(&self, at: usize) -> Option<usize> {
        self.delimiter
            .captures_anchored(self.buf.as_str(), at)
            .and_then(|caps| caps.get(0))
            .map(|m| m.end())
    }

    /// Isolates the next token and checks it against `pattern` (any token
    /// when `None`).
    ///
    /// On success the position moves past the token. `None` with
    /// `need_input` set means the answer depends on input not yet read;
    /// otherwise the token is missing or does not match.
    fn complete_token(&mut self, pattern: Option<&Pattern>) -> Option<Token> {
        self.last_match = None;
        self.rejected = None;

        if !self.skipped {
            if let Some(end) = self.delimiter_end_at(self.buf.position) {
                if end == self.buf.len() && !self.source_closed {
                    self.need_input = true;
                    return None;
                }
                self.skipped = true;
                self.buf.position = end;
            }
        }

        let position = self.buf.position;
        let len = self.buf.len();
        if position == len {
            if !self.source_closed {
                self.need_input = true;
            }
            return None;
        }

        let hay = self.buf.as_str();
        let mut delimiter = self
            .delimiter
            .captures_at(hay, position)
            .and_then(|caps| caps.get(0))
            .map(|m| (m.start(), m.end()));
        if let Some((_, end)) = delimiter {
            if end == position {
                // Zero-length delimiter at the token start; tokens are at
                // least one character long.
                let from = self.buf.next_boundary(position);
                delimiter = self
                    .delimiter
                    .captures_at(hay, from)
                    .and_then(|caps| caps.get(0))
                    .map(|m| (m.start(), m.end()));
            }
        }

        let token_end = match delimiter {
            Some((start, end)) => {
                if end == len && !self.source_closed && self.delimiter.is_end_sensitive() {
                    self.need_input = true;
                    return None;
                }
                start
            }
            None if self.source_closed => len,
            None => {
                self.need_input = true;
                return None;
            }
        };

        let pattern = pattern.unwrap_or(&*ANY_TOKEN);
        let text = &hay[position..token_end];
        let Some(caps) = pattern.captures_whole(text) else {
            self.rejected = Some((position, token_end));
            return None;
        };
        let matched = MatchResult::from_captures(&caps, self.buf.absolute(position));
        let text = text.to_owned();
        self.last_match = Some(matched);
        self.buf.position = token_end;
        Some(Token {
            text,
            start: position,
        })
    }

    /// Searches for `pattern` from the position, within `horizon` characters
    /// when `horizon > 0`. A match moves the position to its end.
    fn find_pattern_in_buffer(&mut self, pattern: &Pattern, horizon: usize) -> Option<MatchResult> {
        self.last_match = None;
        let position = self.buf.position;
        let len = self.buf.len();
        let horizon_limit = if horizon > 0 {
            self.buf.char_offset(position, horizon)
        } else {
            None
        };

        let found = if let Some(limit) = horizon_limit {
            // The match must fit the window, but assertions at its edge see
            // the text that follows. That text is only missing when the
            // window ends where the buffer does.
            let found =
                pattern.search_within(self.buf.as_str(), position, limit, self.buf.absolute(0));
            if limit == len && !self.source_closed && pattern.is_end_sensitive() {
                let touches_limit = found
                    .as_ref()
                    .is_none_or(|m| self.buf.relative(m.end()) == limit);
                if touches_limit {
                    self.need_input = true;
                    return None;
                }
            }
            found
        } else {
            let hay = self.buf.as_str();
            match pattern.captures_at(hay, position) {
                Some(caps) => {
                    let end = caps.get(0).map_or(position, |m| m.end());
                    if end == len && !self.source_closed {
                        self.need_input = true;
                        return None;
                    }
                    Some(MatchResult::from_captures(&caps, self.buf.absolute(0)))
                }
                None => {
                    if !self.source_closed {
                        self.need_input = true;
                    }
                    None
                }
            }
        };

        let result = found?;
        self.buf.position = self.buf.relative(result.end());
        self.last_match = Some(result.clone());
        Some(result)
    }

    /// Matches `pattern` anchored at the position, ignoring delimiters.
    ///
    /// More input is requested only while the answer could still change,
    /// that is while the pattern can run past the end of the buffer.
    fn match_pattern_in_buffer(&mut self, pattern: &Pattern) -> Option<MatchResult> {
        self.last_match = None;
        let position = self.buf.position;
        let hay = self.buf.as_str();
        if !self.source_closed && pattern.hits_end(hay, position) {
            self.need_input = true;
            return None;
        }
        let caps = pattern.captures_anchored(hay, position)?;
        let end = caps.get(0).map_or(position, |m| m.end());
        let result = MatchResult::from_captures(&caps, self.buf.absolute(0));
        self.buf.position = end;
        self.last_match = Some(result.clone());
        Some(result)
    }

    /// The error for a consuming call that found nothing usable: exhaustion
    /// when only delimiters remain, a mismatch otherwise.
    ///
    /// With `consume`, a rejected token is skipped over.
    fn throw_for(&mut self, consume: bool) -> ScanError {
        self.skipped = false;
        if self.source_closed && self.buf.at_end() {
            return ScanError::NoSuchElement("no more tokens");
        }
        let Some((start, end)) = self.rejected.take() else {
            return ScanError::mismatch("", "no token matches the requested pattern");
        };
        let token = self.buf.as_str()[start..end].to_owned();
        if consume {
            self.buf.position = end;
        }
        ScanError::mismatch(token, "token does not match the requested pattern")
    }

    fn cache_lookahead(&mut self, pattern: Pattern, token: String) {
        if let Some(matched) = self.last_match.clone() {
            self.lookahead = Some(Lookahead {
                pattern,
                token,
                matched,
                end: self.buf.position,
            });
        }
    }

    /// Consumes a cached lookahead for `pattern`, if there is one.
    fn take_lookahead(&mut self, pattern: &Pattern) -> Option<Token> {
        if !self.lookahead.as_ref().is_some_and(|l| l.pattern.same_as(pattern)) {
            return None;
        }
        let lookahead = self.lookahead.take()?;
        self.clear_caches();
        let start = self.buf.relative(lookahead.matched.start());
        self.buf.position = lookahead.end;
        self.last_match = Some(lookahead.matched);
        Some(Token {
            text: lookahead.token,
            start,
        })
    }

    fn resolve(&mut self, pattern: &(impl AsPattern + ?Sized)) -> ScanResult<Pattern> {
        pattern.resolve(&mut self.patterns)
    }

    // Token operations

    /// Returns `true` if another token is available.
    ///
    /// Reads ahead until the token is complete, which may block waiting for
    /// input. Does not advance.
    ///
    /// # Errors
    ///
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn has_next(&mut self) -> ScanResult<bool> {
        self.ensure_open()?;
        Ok(self.probe(&ANY_TOKEN).is_some())
    }

    /// Returns the next complete token.
    ///
    /// # Errors
    ///
    /// [`ScanError::NoSuchElement`] when no tokens remain, and
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn next(&mut self) -> ScanResult<String> {
        self.ensure_open()?;
        self.mod_count += 1;
        if let Some(token) = self.take_lookahead(&ANY_TOKEN) {
            return Ok(token.text);
        }
        self.clear_caches();
        loop {
            if let Some(token) = self.complete_token(None) {
                self.skipped = false;
                return Ok(token.text);
            }
            if self.need_input {
                self.read_input();
            } else {
                return Err(self.throw_for(false));
            }
        }
    }

    /// Returns `true` if the next token matches `pattern` as a whole.
    ///
    /// A positive answer is remembered, so an immediately following
    /// [`next_matching`](Self::next_matching) with the same pattern does not
    /// search again.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidPattern`] for a pattern string that does not
    /// compile, and [`ScanError::Closed`] if the scanner is closed.
    pub fn has_next_matching(&mut self, pattern: &(impl AsPattern + ?Sized)) -> ScanResult<bool> {
        self.ensure_open()?;
        let pattern = self.resolve(pattern)?;
        Ok(self.probe(&pattern).is_some())
    }

    /// Looks ahead for a token matching `pattern` without consuming it, and
    /// caches it on success.
    fn probe(&mut self, pattern: &Pattern) -> Option<String> {
        self.lookahead = None;
        self.save_state();
        self.mod_count += 1;
        loop {
            if let Some(token) = self.complete_token(Some(pattern)) {
                self.cache_lookahead(pattern.clone(), token.text.clone());
                return self.revert_state(Some(token.text));
            }
            if self.need_input {
                self.read_input();
            } else {
                return self.revert_state(None);
            }
        }
    }

    /// Returns the next token if it matches `pattern` as a whole.
    ///
    /// # Errors
    ///
    /// [`ScanError::InputMismatch`] if the token does not match (the token
    /// is not consumed), [`ScanError::NoSuchElement`] when no tokens remain,
    /// plus the errors of [`has_next_matching`](Self::has_next_matching).
    pub fn next_matching(&mut self, pattern: &(impl AsPattern + ?Sized)) -> ScanResult<String> {
        self.ensure_open()?;
        let pattern = self.resolve(pattern)?;
        self.next_token_matching(&pattern, false).map(|token| token.text)
    }

    /// Reads the next token if it matches `pattern`. A token that does not
    /// match stays unread unless `consume_rejected` is set.
    fn next_token_matching(&mut self, pattern: &Pattern, consume_rejected: bool) -> ScanResult<Token> {
        self.mod_count += 1;
        if let Some(token) = self.take_lookahead(pattern) {
            return Ok(token);
        }
        self.clear_caches();
        loop {
            if let Some(token) = self.complete_token(Some(pattern)) {
                self.skipped = false;
                return Ok(token);
            }
            if self.need_input {
                self.read_input();
            } else {
                return Err(self.throw_for(consume_rejected));
            }
        }
    }

    // Line operations

    /// Returns `true` if there is another line, possibly empty, in the
    /// input. Does not advance.
    ///
    /// # Errors
    ///
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn has_next_line(&mut self) -> ScanResult<bool> {
        self.ensure_open()?;
        self.save_state();
        self.mod_count += 1;
        self.clear_caches();
        let found = self.find_within_horizon_chars(&LINE_PATTERN, 0);
        if let Some(m) = &found {
            let line = strip_separator(m);
            self.cache_lookahead(LINE_PATTERN.clone(), line);
        }
        Ok(self.revert_state(found.is_some()))
    }

    /// Returns the rest of the current line, excluding the line separator,
    /// and moves to the start of the next line.
    ///
    /// # Errors
    ///
    /// [`ScanError::NoSuchElement`] if the input is exhausted, and
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn next_line(&mut self) -> ScanResult<String> {
        self.ensure_open()?;
        self.mod_count += 1;
        if let Some(line) = self.take_lookahead(&LINE_PATTERN) {
            return Ok(line.text);
        }
        self.clear_caches();
        self.find_within_horizon_chars(&LINE_PATTERN, 0)
            .map(|m| strip_separator(&m))
            .ok_or(ScanError::NoSuchElement("no line found"))
    }

    // Searches

    /// Searches the rest of the current line for `pattern`, ignoring
    /// delimiters. On success the position moves past the match.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidPattern`] for a pattern string that does not
    /// compile, and [`ScanError::Closed`] if the scanner is closed.
    pub fn find_in_line(&mut self, pattern: &(impl AsPattern + ?Sized)) -> ScanResult<Option<String>> {
        self.ensure_open()?;
        let pattern = self.resolve(pattern)?;
        self.clear_caches();
        self.mod_count += 1;

        self.save_state();
        let line_end = loop {
            if let Some(separator) = self.find_pattern_in_buffer(&SEPARATOR_PATTERN, 0) {
                break self.buf.relative(separator.start());
            }
            if self.need_input {
                self.read_input();
            } else {
                break self.buf.len();
            }
        };
        self.revert_state(());

        let horizon = self.buf.char_count(self.buf.position, line_end);
        if horizon == 0 {
            return Ok(None);
        }
        Ok(self
            .find_within_horizon_chars(&pattern, horizon)
            .map(|m| m.as_str().to_owned()))
    }

    /// Searches for `pattern` within the next `horizon` characters, or to
    /// the end of input when `horizon` is zero. Delimiters are ignored. On
    /// success the position moves past the match.
    ///
    /// # Errors
    ///
    /// [`ScanError::NegativeHorizon`] if `horizon < 0`,
    /// [`ScanError::InvalidPattern`] for a pattern string that does not
    /// compile, and [`ScanError::Closed`] if the scanner is closed.
    pub fn find_within_horizon(
        &mut self,
        pattern: &(impl AsPattern + ?Sized),
        horizon: isize,
    ) -> ScanResult<Option<String>> {
        self.ensure_open()?;
        let pattern = self.resolve(pattern)?;
        let horizon = usize::try_from(horizon).map_err(|_| ScanError::NegativeHorizon(horizon))?;
        self.clear_caches();
        self.mod_count += 1;
        Ok(self
            .find_within_horizon_chars(&pattern, horizon)
            .map(|m| m.as_str().to_owned()))
    }

    fn find_within_horizon_chars(&mut self, pattern: &Pattern, horizon: usize) -> Option<MatchResult> {
        loop {
            if let Some(found) = self.find_pattern_in_buffer(pattern, horizon) {
                return Some(found);
            }
            if self.need_input {
                self.read_input();
            } else {
                return None;
            }
        }
    }

    /// Skips input matching `pattern` at the current position, ignoring
    /// delimiters.
    ///
    /// # Errors
    ///
    /// [`ScanError::NoSuchElement`] if the input at the position does not
    /// match (nothing is consumed), [`ScanError::InvalidPattern`] for a
    /// pattern string that does not compile, and [`ScanError::Closed`] if
    /// the scanner is closed.
    pub fn skip(&mut self, pattern: &(impl AsPattern + ?Sized)) -> ScanResult<&mut Self> {
        self.ensure_open()?;
        let pattern = self.resolve(pattern)?;
        self.clear_caches();
        self.mod_count += 1;
        loop {
            if self.match_pattern_in_buffer(&pattern).is_some() {
                return Ok(self);
            }
            if self.need_input {
                self.read_input();
            } else {
                return Err(ScanError::NoSuchElement("skip pattern not found"));
            }
        }
    }

    // Settings

    /// The pattern currently separating tokens.
    #[must_use]
    pub fn delimiter(&self) -> &Pattern {
        &self.delimiter
    }

    /// Sets the delimiter pattern.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidPattern`] for a pattern string that does not
    /// compile, and [`ScanError::Closed`] if the scanner is closed.
    pub fn use_delimiter(&mut self, pattern: &(impl AsPattern + ?Sized)) -> ScanResult<&mut Self> {
        self.ensure_open()?;
        let pattern = self.resolve(pattern)?;
        self.mod_count += 1;
        self.delimiter = pattern;
        self.clear_caches();
        Ok(self)
    }

    /// The locale used to recognize numbers and booleans.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Sets the locale.
    ///
    /// # Errors
    ///
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn use_locale(&mut self, locale: Locale) -> ScanResult<&mut Self> {
        self.ensure_open()?;
        if locale != self.locale {
            self.mod_count += 1;
            self.locale = locale;
            self.clear_caches();
        }
        Ok(self)
    }

    /// The radix used by integer queries that do not pass one.
    #[must_use]
    pub fn radix(&self) -> u32 {
        self.radix
    }

    /// Sets the default radix.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidRadix`] if `radix` is outside `2..=36`, and
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn use_radix(&mut self, radix: u32) -> ScanResult<&mut Self> {
        self.ensure_open()?;
        let radix = check_radix(radix)?;
        if radix != self.radix {
            self.mod_count += 1;
            self.radix = radix;
            self.clear_caches();
        }
        Ok(self)
    }

    /// Restores the delimiter, locale and radix the scanner was created
    /// with.
    ///
    /// # Errors
    ///
    /// [`ScanError::Closed`] if the scanner is closed.
    pub fn reset(&mut self) -> ScanResult<&mut Self> {
        self.ensure_open()?;
        self.delimiter = self.defaults.delimiter.clone();
        self.locale = self.defaults.locale.clone();
        self.radix = self.defaults.radix;
        self.mod_count += 1;
        self.clear_caches();
        Ok(self)
    }

    // State

    /// The result of the last successful scanning operation.
    ///
    /// # Errors
    ///
    /// [`ScanError::NoMatchResult`] if the last operation failed or did not
    /// produce a match.
    pub fn match_result(&self) -> ScanResult<&MatchResult> {
        self.last_match.as_ref().ok_or(ScanError::NoMatchResult)
    }

    /// The I/O error that ended input, if one occurred. Also set when
    /// closing the source failed.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        self.io_error.as_ref()
    }

    /// Absolute byte offset of the next unconsumed character.
    #[must_use]
    pub fn position(&self) -> usize {
        self.buf.absolute(self.buf.position)
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the scanner and its source. Idempotent.
    ///
    /// Every later scanning operation, and every pull from an outstanding
    /// iterator, fails with [`ScanError::Closed`].
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Some(mut source) = self.source.take() {
            if let Err(err) = source.close() {
                warn!(error = %err, "failed to close input source");
                self.io_error = Some(err);
            }
        }
        self.source_closed = true;
        self.closed = true;
        debug!(position = self.position(), "scanner closed");
    }
}

/// The line text of a line-pattern match, without its separator.
fn strip_separator(line: &MatchResult) -> String {
    let text = line.as_str();
    match line.group_span(1) {
        Some((start, _)) => text[..start - line.start()].to_owned(),
        None => text.to_owned(),
    }
}

impl Scanner<StrSource> {
    /// Creates a scanner over an in-memory string.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(StrSource::new(text))
    }
}

impl<R: Read> Scanner<ReaderSource<R>> {
    /// Creates a scanner decoding `reader` as UTF-8.
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }

    /// Creates a scanner decoding `reader` with `encoding`.
    pub fn from_reader_with_encoding(reader: R, encoding: &'static Encoding) -> Self {
        Self::new(ReaderSource::with_encoding(reader, encoding))
    }

    /// Creates a scanner decoding `reader` with the charset named by
    /// `label`.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnknownCharset`] if the label is not recognized.
    pub fn from_reader_with_charset(reader: R, label: &str) -> ScanResult<Self> {
        Ok(Self::new(ReaderSource::with_charset(reader, label)?))
    }
}

impl Scanner<ReaderSource<File>> {
    /// Opens the file at `path` and decodes it as UTF-8.
    ///
    /// # Errors
    ///
    /// [`ScanError::Open`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> ScanResult<Self> {
        Ok(Self::new(ReaderSource::open(path, encoding_rs::UTF_8)?))
    }

    /// Opens the file at `path` and decodes it with the charset named by
    /// `label`.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnknownCharset`] if the label is not recognized and
    /// [`ScanError::Open`] if the file cannot be opened.
    pub fn open_with_charset(path: impl AsRef<Path>, label: &str) -> ScanResult<Self> {
        let encoding = crate::source::encoding_for_label(label)?;
        Ok(Self::new(ReaderSource::open(path, encoding)?))
    }
}

impl<S: CharSource> Drop for Scanner<S> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<S: CharSource> fmt::Debug for Scanner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("delimiter", &self.delimiter.as_str())
            .field("position", &self.position())
            .field("need_input", &self.need_input)
            .field("source_closed", &self.source_closed)
            .field("skipped", &self.skipped)
            .field("group_separator", &self.locale.symbols().grouping_separator)
            .field("decimal_separator", &self.locale.symbols().decimal_separator)
            .field("positive_prefix", &self.locale.symbols().positive_prefix)
            .field("negative_prefix", &self.locale.symbols().negative_prefix)
            .field("positive_suffix", &self.locale.symbols().positive_suffix)
            .field("negative_suffix", &self.locale.symbols().negative_suffix)
            .field("nan", &self.locale.symbols().nan)
            .field("infinity", &self.locale.symbols().infinity)
            .field("radix", &self.radix)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
