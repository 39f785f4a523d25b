//! Character sources feeding a [`Scanner`](crate::Scanner).
//!
//! A source hands out decoded text in pieces. The scanner asks for at most
//! `limit` bytes at a time and never assumes a read returns everything that
//! is available. Reading is the only place where a scanner may block.

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use crate::error::{ScanError, ScanResult};

/// A pull-based supplier of characters.
pub trait CharSource {
    /// Appends at most `limit` bytes of whole UTF-8 characters to `dst`.
    ///
    /// Returns the number of bytes appended; `Ok(0)` means the source is
    /// exhausted. Callers always pass `limit >= 4`, so an implementation with
    /// data available must append at least one character.
    ///
    /// # Errors
    ///
    /// Any I/O error raised by the underlying input.
    fn read_chars(&mut self, dst: &mut String, limit: usize) -> io::Result<usize>;

    /// Releases the underlying input. Called once, when the scanner closes.
    ///
    /// # Errors
    ///
    /// Any I/O error raised while releasing the input.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn read_chars(&mut self, dst: &mut String, limit: usize) -> io::Result<usize> {
        (**self).read_chars(dst, limit)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Largest prefix of `s` no longer than `limit` bytes that ends on a char
/// boundary.
fn floor_char_boundary(s: &str, limit: usize) -> usize {
    if limit >= s.len() {
        return s.len();
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// An in-memory string. Never blocks.
#[derive(Debug, Clone, Default)]
pub struct StrSource {
    text: String,
    offset: usize,
}

impl StrSource {
    /// Wraps `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: 0,
        }
    }
}

impl CharSource for StrSource {
    fn read_chars(&mut self, dst: &mut String, limit: usize) -> io::Result<usize> {
        let rest = &self.text[self.offset..];
        let n = floor_char_boundary(rest, limit);
        dst.push_str(&rest[..n]);
        self.offset += n;
        Ok(n)
    }
}

/// Hands out a string in pieces of at most `chunk` bytes.
///
/// Useful for exercising code paths where a token or delimiter straddles the
/// boundary between two reads.
#[derive(Debug, Clone)]
pub struct ChunkedSource {
    inner: StrSource,
    chunk: usize,
}

impl ChunkedSource {
    /// Wraps `text`, yielding at most `chunk` bytes (rounded up to a whole
    /// character) per read.
    pub fn new(text: impl Into<String>, chunk: usize) -> Self {
        Self {
            inner: StrSource::new(text),
            chunk: chunk.max(1),
        }
    }
}

impl CharSource for ChunkedSource {
    fn read_chars(&mut self, dst: &mut String, limit: usize) -> io::Result<usize> {
        let rest = &self.inner.text[self.inner.offset..];
        let mut n = floor_char_boundary(rest, limit.min(self.chunk));
        if n == 0 {
            // The chunk is narrower than the next character; hand out the
            // whole character rather than nothing.
            n = rest.chars().next().map_or(0, char::len_utf8);
        }
        dst.push_str(&rest[..n]);
        self.inner.offset += n;
        Ok(n)
    }
}

/// Resolves an encoding label such as `"UTF-8"` or `"ISO-8859-1"`.
///
/// # Errors
///
/// [`ScanError::UnknownCharset`] when the label is not recognized.
pub fn encoding_for_label(label: &str) -> ScanResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ScanError::UnknownCharset(label.to_owned()))
}

/// Decodes bytes from any [`Read`] into characters.
///
/// Decoding is done by `encoding_rs`; the output is UTF-8, possibly split
/// mid-character between two reads, so incomplete trailing sequences are
/// carried over to the next call. Malformed input decodes to U+FFFD.
pub struct ReaderSource<R: Read> {
    reader: Option<DecodeReaderBytes<R, Vec<u8>>>,
    pending: Vec<u8>,
    scratch: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    /// Decodes `reader` as UTF-8.
    pub fn new(reader: R) -> Self {
        Self::with_encoding(reader, UTF_8)
    }

    /// Decodes `reader` with `encoding`. A byte-order mark, if present,
    /// overrides the encoding and is stripped.
    pub fn with_encoding(reader: R, encoding: &'static Encoding) -> Self {
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .bom_override(true)
            .build(reader);
        Self {
            reader: Some(decoder),
            pending: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Decodes `reader` with the encoding named by `label`.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnknownCharset`] when the label is not recognized.
    pub fn with_charset(reader: R, label: &str) -> ScanResult<Self> {
        Ok(Self::with_encoding(reader, encoding_for_label(label)?))
    }
}

impl ReaderSource<File> {
    /// Opens `path` and decodes it with `encoding`.
    ///
    /// # Errors
    ///
    /// Any error raised when opening the file.
    pub fn open(path: impl AsRef<Path>, encoding: &'static Encoding) -> io::Result<Self> {
        Ok(Self::with_encoding(File::open(path)?, encoding))
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn read_chars(&mut self, dst: &mut String, limit: usize) -> io::Result<usize> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(0);
        };
        loop {
            let want = limit.saturating_sub(self.pending.len()).max(1);
            self.scratch.resize(want, 0);
            let n = reader.read(&mut self.scratch)?;
            if n == 0 {
                if self.pending.is_empty() {
                    return Ok(0);
                }
                // Truncated sequence at end of input.
                self.pending.clear();
                dst.push(char::REPLACEMENT_CHARACTER);
                return Ok(char::REPLACEMENT_CHARACTER.len_utf8());
            }
            self.pending.extend_from_slice(&self.scratch[..n]);

            let (valid, consumed) = match std::str::from_utf8(&self.pending) {
                Ok(s) => (s.len(), s.len()),
                Err(e) => match e.error_len() {
                    // Incomplete tail: keep it for the next read.
                    None => (e.valid_up_to(), e.valid_up_to()),
                    Some(bad) => (e.valid_up_to(), e.valid_up_to() + bad),
                },
            };
            if consumed == 0 {
                continue;
            }
            // Bytes up to `valid` were just checked.
            let text = std::str::from_utf8(&self.pending[..valid]).unwrap_or_default();
            dst.push_str(text);
            let mut appended = valid;
            if consumed > valid {
                dst.push(char::REPLACEMENT_CHARACTER);
                appended += char::REPLACEMENT_CHARACTER.len_utf8();
            }
            self.pending.drain(..consumed);
            return Ok(appended);
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.reader = None;
        self.pending.clear();
        Ok(())
    }
}

impl<R: Read> std::fmt::Debug for ReaderSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSource")
            .field("open", &self.reader.is_some())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn drain(source: &mut impl CharSource, limit: usize) -> Vec<String> {
        let mut pieces = Vec::new();
        loop {
            let mut s = String::new();
            if source.read_chars(&mut s, limit).unwrap() == 0 {
                return pieces;
            }
            pieces.push(s);
        }
    }

    #[test]
    fn str_source_respects_limit_and_char_boundaries() {
        let mut src = StrSource::new("aé€");
        // 'a' (1) + 'é' (2) fit in 4 bytes, '€' (3) does not.
        assert_eq!(drain(&mut src, 4), vec!["aé".to_owned(), "€".to_owned()]);
    }

    #[test]
    fn chunked_source_hands_out_whole_chars() {
        let mut src = ChunkedSource::new("€€", 1);
        assert_eq!(drain(&mut src, 64), vec!["€".to_owned(), "€".to_owned()]);
    }

    /// Yields one byte per read.
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(1);
            self.0.read(&mut buf[..n])
        }
    }

    #[test]
    fn reader_source_reassembles_split_utf8() {
        let bytes = "x€y".as_bytes().to_vec();
        let mut src = ReaderSource::new(Trickle(Cursor::new(bytes)));
        assert_eq!(drain(&mut src, 16).concat(), "x€y");
    }

    #[test]
    fn reader_source_decodes_latin1() {
        let mut src = ReaderSource::with_charset(Cursor::new(vec![0x63, 0x61, 0x66, 0xE9]), "ISO-8859-1")
            .unwrap();
        assert_eq!(drain(&mut src, 16).concat(), "café");
    }

    #[test]
    fn reader_source_replaces_truncated_tail() {
        let mut src = ReaderSource::new(Cursor::new(vec![b'a', 0xE2, 0x82]));
        assert_eq!(drain(&mut src, 16).concat(), "a\u{FFFD}");
    }

    #[test]
    fn unknown_charset_is_rejected() {
        let err = encoding_for_label("no-such-charset").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn closed_reader_source_is_exhausted() {
        let mut src = ReaderSource::new(Cursor::new(b"abc".to_vec()));
        src.close().unwrap();
        assert!(drain(&mut src, 16).is_empty());
    }
}
