use std::io;

use quickcheck::{Arbitrary, Gen};

use crate::CharSource;

/// Hands out text in pieces whose sizes cycle through `splits`.
#[derive(Debug, Clone)]
pub(crate) struct SplitSource {
    text: String,
    offset: usize,
    splits: Vec<usize>,
    next: usize,
}

impl SplitSource {
    pub(crate) fn new(text: &str, splits: &[usize]) -> Self {
        Self {
            text: text.to_owned(),
            offset: 0,
            splits: splits.to_vec(),
            next: 0,
        }
    }
}

impl CharSource for SplitSource {
    fn read_chars(&mut self, dst: &mut String, limit: usize) -> io::Result<usize> {
        let rest = &self.text[self.offset..];
        let Some(first) = rest.chars().next() else {
            return Ok(0);
        };
        let want = match self.splits.get(self.next % self.splits.len().max(1)) {
            Some(s) => 1 + s % 8,
            None => 1,
        };
        self.next += 1;
        let mut end = first.len_utf8();
        for (i, c) in rest.char_indices().skip(1).take(want - 1) {
            if i + c.len_utf8() > limit {
                break;
            }
            end = i + c.len_utf8();
        }
        dst.push_str(&rest[..end]);
        self.offset += end;
        Ok(end)
    }
}

/// Text drawn from an alphabet rich in delimiters, digits and line breaks.
#[derive(Debug, Clone)]
pub(crate) struct ScanText(pub(crate) String);

const ALPHABET: &[char] = &[
    'a', 'b', 'x', '0', '1', '7', '9', ' ', ' ', '\t', '\n', '\r', ',', '.', '-', 'é', '€',
    '\u{2028}',
];

impl Arbitrary for ScanText {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 48;
        Self(
            (0..len)
                .filter_map(|_| g.choose(ALPHABET).copied())
                .collect(),
        )
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(ScanText))
    }
}

pub(crate) fn quickcheck_tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}
