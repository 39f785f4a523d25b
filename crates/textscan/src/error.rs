use thiserror::Error;

/// Result alias used by every fallible scanning operation.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors reported by [`Scanner`](crate::Scanner).
///
/// Exhaustion and mismatch are expected outcomes that callers branch on,
/// usually after a `has_next*` probe. The remaining variants indicate misuse.
/// I/O failures of the underlying source are never reported here; see
/// [`Scanner::io_error`](crate::Scanner::io_error).
#[derive(Error, Debug)]
pub enum ScanError {
    /// No further token, line or match exists.
    #[error("no such element: {0}")]
    NoSuchElement(&'static str),
    /// A token exists but does not convert to the requested type.
    #[error("input mismatch on {token:?}: {reason}")]
    InputMismatch {
        /// The offending token, or an empty string when no token was isolated.
        token: String,
        /// Why the conversion failed.
        reason: String,
    },
    /// The radix is outside `2..=36`.
    #[error("radix {0} out of range 2..=36")]
    InvalidRadix(u32),
    /// A horizon below zero was passed to a bounded search.
    #[error("horizon {0} < 0")]
    NegativeHorizon(isize),
    /// A pattern failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    /// The character encoding label is not known.
    #[error("unsupported charset {0:?}")]
    UnknownCharset(String),
    /// The input could not be opened. Only constructors report this; I/O
    /// failures while scanning are retained instead.
    #[error("cannot open input: {0}")]
    Open(#[from] std::io::Error),
    /// The scanner has been closed.
    #[error("scanner closed")]
    Closed,
    /// The scanner was advanced while a derived iterator was active.
    #[error("scanner modified while iterating")]
    ConcurrentModification,
    /// No successful match is available to report.
    #[error("no match result available")]
    NoMatchResult,
}

impl ScanError {
    pub(crate) fn mismatch(token: impl Into<String>, reason: impl Into<String>) -> Self {
        ScanError::InputMismatch {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if no further input matched the request.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, ScanError::NoSuchElement(_))
    }

    /// Returns `true` if a token existed but had the wrong shape.
    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        matches!(self, ScanError::InputMismatch { .. })
    }

    /// Returns `true` for errors caused by a bad argument.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidRadix(_)
                | ScanError::NegativeHorizon(_)
                | ScanError::InvalidPattern(_)
                | ScanError::UnknownCharset(_)
        )
    }

    /// Returns `true` for errors caused by using the scanner in the wrong state.
    #[must_use]
    pub fn is_illegal_state(&self) -> bool {
        matches!(
            self,
            ScanError::Closed | ScanError::ConcurrentModification | ScanError::NoMatchResult
        )
    }
}
