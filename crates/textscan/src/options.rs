use crate::{locale::Locale, pattern::DEFAULT_PATTERN_CACHE_SIZE};

/// Smallest buffer the scanner will allocate, in bytes.
pub const MIN_BUFFER_CAPACITY: usize = 16;

/// Configuration options for a [`Scanner`](crate::Scanner).
///
/// The delimiter, locale and radix given here are the scanner's
/// construction-time settings, which [`Scanner::reset`](crate::Scanner::reset)
/// restores.
///
/// # Examples
///
/// ```rust
/// use textscan::{Locale, Scanner, ScannerOptions, StrSource};
///
/// let options = ScannerOptions {
///     delimiter: Some(",\\s*".into()),
///     locale: Locale::GERMANY,
///     ..Default::default()
/// };
/// let mut scanner = Scanner::with_options(StrSource::new("1.500, 2"), options).unwrap();
/// assert_eq!(scanner.next_i32().unwrap(), 1500);
/// assert_eq!(scanner.next_i32().unwrap(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScannerOptions {
    /// Initial size of the input buffer in bytes.
    ///
    /// The buffer grows when a single token does not fit. Values below
    /// [`MIN_BUFFER_CAPACITY`] are raised to it.
    ///
    /// # Default
    ///
    /// `1024`
    pub buffer_capacity: usize,

    /// Pattern separating tokens.
    ///
    /// # Default
    ///
    /// `None`, meaning one or more whitespace characters.
    pub delimiter: Option<String>,

    /// Locale used to recognize numbers and booleans.
    ///
    /// # Default
    ///
    /// [`Locale::US`]
    pub locale: Locale,

    /// Radix for integer queries that do not pass one explicitly.
    ///
    /// # Default
    ///
    /// `10`
    pub radix: u32,

    /// Number of string patterns kept compiled.
    ///
    /// # Default
    ///
    /// `7`
    pub pattern_cache_size: usize,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 1024,
            delimiter: None,
            locale: Locale::US,
            radix: 10,
            pattern_cache_size: DEFAULT_PATTERN_CACHE_SIZE,
        }
    }
}
