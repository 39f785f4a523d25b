//! Iterators over tokens and matches.
//!
//! The borrowing iterators record the scanner's modification count after
//! each step. Anything else that advances or reconfigures the scanner in
//! between (through [`Tokens::scanner_mut`], for example) is reported as
//! [`ScanError::ConcurrentModification`] on the next pull.

use super::Scanner;
use crate::{
    error::{ScanError, ScanResult},
    pattern::{AsPattern, MatchResult, Pattern},
    source::CharSource,
};

impl<S: CharSource> Scanner<S> {
    /// Iterates over the remaining tokens.
    ///
    /// The iterator is not fused: after an error, later pulls report the
    /// error again.
    ///
    /// # Errors
    ///
    /// [`ScanError::Closed`] if the scanner is closed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use textscan::Scanner;
    ///
    /// let mut scanner = Scanner::from_text("a b c");
    /// let tokens: Result<Vec<_>, _> = scanner.tokens().unwrap().collect();
    /// assert_eq!(tokens.unwrap(), ["a", "b", "c"]);
    /// ```
    pub fn tokens(&mut self) -> ScanResult<Tokens<'_, S>> {
        self.ensure_open()?;
        Ok(Tokens {
            scanner: self,
            expected: None,
        })
    }

    /// Iterates over every match of `pattern` in the remaining input,
    /// ignoring delimiters.
    ///
    /// After an empty match the search resumes one character further on.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidPattern`] for a pattern string that does not
    /// compile, and [`ScanError::Closed`] if the scanner is closed.
    pub fn find_all(&mut self, pattern: &(impl AsPattern + ?Sized)) -> ScanResult<FindAll<'_, S>> {
        self.ensure_open()?;
        let pattern = self.resolve(pattern)?;
        Ok(FindAll {
            scanner: self,
            pattern,
            expected: None,
            advance: false,
        })
    }

    /// Converts the scanner into an iterator over its remaining tokens.
    pub fn into_tokens(self) -> IntoTokens<S> {
        IntoTokens { scanner: self }
    }
}

fn check_unmodified(expected: Option<u64>, actual: u64) -> ScanResult<()> {
    match expected {
        Some(count) if count != actual => Err(ScanError::ConcurrentModification),
        _ => Ok(()),
    }
}

/// Iterator returned by [`Scanner::tokens`].
#[derive(Debug)]
pub struct Tokens<'a, S: CharSource> {
    scanner: &'a mut Scanner<S>,
    expected: Option<u64>,
}

impl<S: CharSource> Tokens<'_, S> {
    /// The underlying scanner.
    ///
    /// Advancing or reconfiguring it makes the next pull from this iterator
    /// fail with [`ScanError::ConcurrentModification`].
    pub fn scanner_mut(&mut self) -> &mut Scanner<S> {
        self.scanner
    }

    /// Closes the underlying scanner.
    pub fn close(&mut self) {
        self.scanner.close();
    }

    fn pull(&mut self) -> ScanResult<Option<String>> {
        check_unmodified(self.expected, self.scanner.mod_count)?;
        let token = if self.scanner.has_next()? {
            Some(self.scanner.next()?)
        } else {
            None
        };
        self.expected = Some(self.scanner.mod_count);
        Ok(token)
    }
}

impl<S: CharSource> Iterator for Tokens<'_, S> {
    type Item = ScanResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pull().transpose()
    }
}

/// Iterator returned by [`Scanner::find_all`].
#[derive(Debug)]
pub struct FindAll<'a, S: CharSource> {
    scanner: &'a mut Scanner<S>,
    pattern: Pattern,
    expected: Option<u64>,
    /// The previous match was empty; step over one character first.
    advance: bool,
}

impl<S: CharSource> FindAll<'_, S> {
    /// The underlying scanner.
    ///
    /// Advancing or reconfiguring it makes the next pull from this iterator
    /// fail with [`ScanError::ConcurrentModification`].
    pub fn scanner_mut(&mut self) -> &mut Scanner<S> {
        self.scanner
    }

    /// Closes the underlying scanner.
    pub fn close(&mut self) {
        self.scanner.close();
    }

    fn next_in_buffer(&mut self) -> Option<MatchResult> {
        let scanner = &mut *self.scanner;
        if self.advance {
            if scanner.buf.at_end() {
                if !scanner.source_closed {
                    scanner.need_input = true;
                }
                return None;
            }
            scanner.buf.position = scanner.buf.next_boundary(scanner.buf.position);
            self.advance = false;
        }

        let position = scanner.buf.position;
        let len = scanner.buf.len();
        if let Some(caps) = self.pattern.captures_at(scanner.buf.as_str(), position) {
            let (start, end) = caps.get(0).map_or((position, position), |m| (m.start(), m.end()));
            if end != len || scanner.source_closed {
                let result = MatchResult::from_captures(&caps, scanner.buf.absolute(0));
                scanner.buf.position = end;
                scanner.last_match = Some(result.clone());
                self.advance = start == end;
                return Some(result);
            }
        }
        if !scanner.source_closed {
            scanner.need_input = true;
        }
        None
    }

    fn pull(&mut self) -> ScanResult<Option<MatchResult>> {
        self.scanner.ensure_open()?;
        match self.expected {
            Some(_) => check_unmodified(self.expected, self.scanner.mod_count)?,
            None => self.scanner.last_match = None,
        }
        let found = loop {
            if let Some(m) = self.next_in_buffer() {
                break Some(m);
            }
            if self.scanner.need_input {
                self.scanner.read_input();
            } else {
                break None;
            }
        };
        self.expected = Some(self.scanner.mod_count);
        Ok(found)
    }
}

impl<S: CharSource> Iterator for FindAll<'_, S> {
    type Item = ScanResult<MatchResult>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pull().transpose()
    }
}

/// Owning iterator returned by [`Scanner::into_tokens`].
#[derive(Debug)]
pub struct IntoTokens<S: CharSource> {
    scanner: Scanner<S>,
}

impl<S: CharSource> IntoTokens<S> {
    /// Returns the scanner, positioned after the last token yielded.
    pub fn into_inner(self) -> Scanner<S> {
        self.scanner
    }
}

impl<S: CharSource> Iterator for IntoTokens<S> {
    type Item = ScanResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.scanner.has_next() {
            Ok(true) => Some(self.scanner.next()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
