//! An incremental text scanner.
//!
//! [`Scanner`] breaks character input into tokens separated by a delimiter
//! pattern (whitespace by default) and reads tokens as locale-formatted
//! numbers, booleans, lines, or arbitrary pattern matches. Input is pulled
//! from a [`CharSource`] in pieces, so a scanner works the same over an
//! in-memory string, a file, or a slow stream.
//!
//! ```rust
//! use textscan::Scanner;
//!
//! let mut scanner = Scanner::from_text("1 fish 2 fish red fish blue fish");
//! scanner.use_delimiter(r"\s*fish\s*").unwrap();
//! assert_eq!(scanner.next_i32().unwrap(), 1);
//! assert_eq!(scanner.next_i32().unwrap(), 2);
//! assert_eq!(scanner.next().unwrap(), "red");
//! assert_eq!(scanner.next().unwrap(), "blue");
//! assert!(!scanner.has_next().unwrap());
//! ```
//!
//! Errors separate running out of input ([`ScanError::is_exhausted`]) from
//! input of the wrong shape ([`ScanError::is_mismatch`]). A number that is
//! well formed but out of range for the requested type is left unread, so a
//! wider type can still take it. I/O errors end the input quietly and are
//! available from [`Scanner::io_error`].

mod buffer;
mod error;
mod locale;
mod numeric;
mod options;
mod pattern;
mod scanner;
mod source;

#[cfg(test)]
mod tests;

pub use error::{ScanError, ScanResult};
pub use locale::{Locale, NumberSymbols};
pub use numeric::{Scannable, TypedValue, ValueKind};
pub use options::{MIN_BUFFER_CAPACITY, ScannerOptions};
pub use pattern::{AsPattern, DEFAULT_PATTERN_CACHE_SIZE, MatchResult, Pattern, PatternCache};
pub use scanner::{
    FindAll, IntoTokens, LINE_SEPARATOR, MAX_RADIX, MIN_RADIX, Scanner, Tokens, WHITESPACE,
};
pub use source::{CharSource, ChunkedSource, ReaderSource, StrSource, encoding_for_label};

pub use bigdecimal::BigDecimal;
pub use encoding_rs::Encoding;
pub use num_bigint::BigInt;
