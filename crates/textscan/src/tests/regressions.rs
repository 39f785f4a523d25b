use quickcheck_macros::quickcheck;

use super::support::{ScanText, SplitSource};
use crate::{ChunkedSource, Scanner, ScannerOptions, StrSource};

#[test]
fn empty_input() {
    let mut s = Scanner::from_text("");
    assert!(!s.has_next().unwrap());
    assert!(!s.has_next_line().unwrap());
    assert!(s.next().unwrap_err().is_exhausted());
    assert!(s.next_line().unwrap_err().is_exhausted());
    assert!(s.next_i32().unwrap_err().is_exhausted());
    assert_eq!(s.find_in_line("x").unwrap(), None);
}

#[test]
fn only_delimiters() {
    let mut s = Scanner::new(ChunkedSource::new(" \t \n  ", 1));
    assert!(!s.has_next().unwrap());
    assert!(s.next().unwrap_err().is_exhausted());
}

#[test]
fn crlf_split_across_reads_is_one_separator() {
    let mut s = Scanner::new(SplitSource::new("a\r\nb", &[1, 0, 0]));
    assert_eq!(s.next_line().unwrap(), "a");
    assert_eq!(s.next_line().unwrap(), "b");
    assert!(!s.has_next_line().unwrap());
}

#[test]
fn line_lookahead_is_not_reused_for_tokens() {
    let mut s = Scanner::from_text("a b\nc");
    assert!(s.has_next_line().unwrap());
    assert_eq!(s.next().unwrap(), "a");
    assert_eq!(s.next_line().unwrap(), " b");
    assert_eq!(s.next().unwrap(), "c");
}

#[test]
fn next_matching_rescans_after_another_probe() {
    let mut s = Scanner::from_text("abc");
    assert!(s.has_next_matching("[a-z]+").unwrap());
    assert!(!s.has_next_i32().unwrap());
    assert_eq!(s.next_matching("[a-z]+").unwrap(), "abc");
}

#[test]
fn compaction_during_lookahead_keeps_token() {
    let options = ScannerOptions {
        buffer_capacity: 16,
        ..Default::default()
    };
    let text = format!("{} 42", "w".repeat(14));
    let mut s = Scanner::with_options(ChunkedSource::new(text, 3), options).unwrap();
    assert_eq!(s.next().unwrap().len(), 14);
    assert!(s.has_next_i32().unwrap());
    assert_eq!(s.next_i32().unwrap(), 42);
}

#[test]
fn find_all_match_touching_read_boundary_is_not_split() {
    let mut s = Scanner::new(ChunkedSource::new("aaaa-aa", 2));
    let found: Vec<String> = s
        .find_all("a+")
        .unwrap()
        .map(|m| m.unwrap().as_str().to_owned())
        .collect();
    assert_eq!(found, ["aaaa", "aa"]);
}

#[test]
fn end_assertion_waits_for_more_input() {
    let mut s = Scanner::new(ChunkedSource::new("ab abc", 2));
    assert_eq!(s.find_within_horizon(r"abc\b", 0).unwrap().as_deref(), Some("abc"));
    assert_eq!(s.match_result().unwrap().start(), 3);
}

#[test]
fn skip_then_typed_read() {
    let mut s = Scanner::from_text("id=17;");
    s.skip("id=").unwrap();
    s.use_delimiter(";").unwrap();
    assert_eq!(s.next_i32().unwrap(), 17);
    assert!(!s.has_next().unwrap());
}

#[test]
fn reader_and_string_sources_agree() {
    let text = "x 1\n2,000 y\u{2029}€";
    let mut from_reader = Scanner::from_reader(text.as_bytes());
    let mut from_text = Scanner::new(StrSource::new(text));
    let a: Vec<_> = from_reader.tokens().unwrap().map(Result::unwrap).collect();
    let b: Vec<_> = from_text.tokens().unwrap().map(Result::unwrap).collect();
    assert_eq!(a, b);
}

#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn has_next_agrees_with_next(text: ScanText) -> bool {
    let mut s = Scanner::from_text(text.0.as_str());
    loop {
        let available = s.has_next().unwrap();
        match s.next() {
            Ok(_) if available => {}
            Err(e) if !available => return e.is_exhausted(),
            _ => return false,
        }
    }
}
