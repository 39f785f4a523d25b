use std::io;

use tracing::debug;

use crate::{options::MIN_BUFFER_CAPACITY, source::CharSource};

/// Smallest read the buffer ever asks a source for, so that any single
/// UTF-8 character fits.
const MIN_READ: usize = 4;

/// The window of decoded input the scanner works on.
///
/// Offsets handed out by the buffer are byte offsets into [`as_str`]; they
/// shift whenever consumed input is discarded. [`absolute`] converts them to
/// offsets into the whole stream.
///
/// [`as_str`]: InputBuffer::as_str
/// [`absolute`]: InputBuffer::absolute
#[derive(Debug)]
pub(crate) struct InputBuffer {
    data: String,
    capacity: usize,
    /// Stream offset of `data[0]`.
    base: usize,
    /// Next unconsumed byte.
    pub(crate) position: usize,
    saved: Option<usize>,
}

impl InputBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_BUFFER_CAPACITY);
        Self {
            data: String::with_capacity(capacity),
            capacity,
            base: 0,
            position: 0,
            saved: None,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.data
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn at_end(&self) -> bool {
        self.position == self.data.len()
    }

    pub(crate) fn absolute(&self, offset: usize) -> usize {
        self.base + offset
    }

    /// Converts a stream offset back into a buffer offset.
    pub(crate) fn relative(&self, absolute: usize) -> usize {
        absolute.saturating_sub(self.base)
    }

    pub(crate) fn save(&mut self) {
        self.saved = Some(self.position);
    }

    /// Returns to the saved position, if any, and forgets it.
    pub(crate) fn restore(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.position = saved;
        }
    }

    /// Offset just past the character starting at `offset`.
    pub(crate) fn next_boundary(&self, offset: usize) -> usize {
        self.data[offset..]
            .chars()
            .next()
            .map_or(offset + 1, |c| offset + c.len_utf8())
    }

    /// Offset `chars` characters after `from`, or `None` if fewer are
    /// buffered.
    pub(crate) fn char_offset(&self, from: usize, chars: usize) -> Option<usize> {
        let mut seen = 0;
        for (i, _) in self.data[from..].char_indices() {
            if seen == chars {
                return Some(from + i);
            }
            seen += 1;
        }
        (seen == chars).then_some(self.data.len())
    }

    pub(crate) fn char_count(&self, from: usize, to: usize) -> usize {
        self.data[from..to].chars().count()
    }

    fn needs_space(&self) -> bool {
        self.capacity - self.data.len().min(self.capacity) < MIN_READ
    }

    /// Discards input before the saved position (or the current one when
    /// nothing is saved), growing the buffer instead when nothing can be
    /// discarded.
    ///
    /// Any buffer offsets held by the caller are stale afterwards.
    fn make_space(&mut self) {
        let keep_from = self.saved.unwrap_or(self.position);
        if keep_from > 0 {
            self.data.drain(..keep_from);
            self.base += keep_from;
            self.position -= keep_from;
            if let Some(saved) = self.saved.as_mut() {
                *saved -= keep_from;
            }
            debug!(discarded = keep_from, retained = self.data.len(), "compacted input buffer");
        } else {
            self.capacity *= 2;
            self.data.reserve(self.capacity - self.data.len());
            debug!(capacity = self.capacity, "grew input buffer");
        }
    }

    /// Reads more input from `source`.
    ///
    /// Returns whether space had to be made first (which invalidates buffer
    /// offsets) and the number of bytes read; zero means end of input.
    pub(crate) fn fill(&mut self, source: &mut impl CharSource) -> (bool, io::Result<usize>) {
        let moved = self.needs_space();
        if moved {
            self.make_space();
        }
        let limit = self.capacity - self.data.len();
        (moved, source.read_chars(&mut self.data, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChunkedSource, StrSource};

    #[test]
    fn compaction_keeps_saved_position() {
        let mut buf = InputBuffer::new(16);
        let mut src = StrSource::new("0123456789abcdefXYZ");
        let (_, n) = buf.fill(&mut src);
        assert_eq!(n.unwrap(), 16);
        buf.position = 12;
        buf.save();
        buf.position = 14;

        let (moved, n) = buf.fill(&mut src);
        assert!(moved);
        assert_eq!(n.unwrap(), 3);
        assert_eq!(buf.as_str(), "cdefXYZ");
        assert_eq!(buf.position, 2);
        assert_eq!(buf.absolute(buf.position), 14);
        buf.restore();
        assert_eq!(buf.position, 0);
        assert_eq!(buf.relative(12), 0);
    }

    #[test]
    fn grows_when_nothing_is_consumed() {
        let mut buf = InputBuffer::new(16);
        let mut src = ChunkedSource::new("x".repeat(40), 40);
        while buf.fill(&mut src).1.unwrap() > 0 {}
        assert_eq!(buf.len(), 40);
        assert_eq!(buf.position, 0);
    }

    #[test]
    fn char_offsets_count_characters() {
        let mut buf = InputBuffer::new(16);
        buf.fill(&mut StrSource::new("aé€b")).1.unwrap();
        assert_eq!(buf.char_offset(0, 0), Some(0));
        assert_eq!(buf.char_offset(0, 2), Some(3));
        assert_eq!(buf.char_offset(0, 4), Some(buf.len()));
        assert_eq!(buf.char_offset(1, 4), None);
        assert_eq!(buf.char_count(0, buf.len()), 4);
        assert_eq!(buf.next_boundary(3), 6);
    }
}
