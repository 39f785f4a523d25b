use quickcheck::QuickCheck;

use super::support::{ScanText, SplitSource, quickcheck_tests};
use crate::{CharSource, Scanner, StrSource};

#[derive(Debug, PartialEq)]
enum Read {
    Int(i64),
    Float(f64),
    Token(String),
}

fn typed_reads<S: CharSource>(scanner: &mut Scanner<S>) -> Vec<Read> {
    let mut reads = Vec::new();
    loop {
        if scanner.has_next_i64().unwrap() {
            reads.push(Read::Int(scanner.next_i64().unwrap()));
        } else if scanner.has_next_f64().unwrap() {
            reads.push(Read::Float(scanner.next_f64().unwrap()));
        } else if scanner.has_next().unwrap() {
            reads.push(Read::Token(scanner.next().unwrap()));
        } else {
            return reads;
        }
    }
}

fn lines<S: CharSource>(scanner: &mut Scanner<S>) -> Vec<String> {
    let mut lines = Vec::new();
    while scanner.has_next_line().unwrap() {
        lines.push(scanner.next_line().unwrap());
    }
    lines
}

fn small_buffer() -> crate::ScannerOptions {
    crate::ScannerOptions {
        buffer_capacity: 16,
        ..Default::default()
    }
}

/// Property: splitting the input into arbitrary reads never changes the
/// sequence of typed values and tokens.
#[test]
fn typed_reads_ignore_read_boundaries() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: ScanText, splits: Vec<usize>) -> bool {
        let expected = typed_reads(&mut Scanner::from_text(text.0.as_str()));
        let mut split =
            Scanner::with_options(SplitSource::new(&text.0, &splits), small_buffer()).unwrap();
        typed_reads(&mut split) == expected
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(ScanText, Vec<usize>) -> bool);
}

/// Property: line splitting is likewise independent of read boundaries,
/// including a CR LF pair arriving in two reads.
#[test]
fn lines_ignore_read_boundaries() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: ScanText, splits: Vec<usize>) -> bool {
        let expected = lines(&mut Scanner::new(StrSource::new(text.0.as_str())));
        let mut split =
            Scanner::with_options(SplitSource::new(&text.0, &splits), small_buffer()).unwrap();
        lines(&mut split) == expected
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(ScanText, Vec<usize>) -> bool);
}

/// Property: the token iterator yields exactly what a manual
/// `has_next`/`next` loop yields.
#[test]
fn token_iterator_matches_manual_loop() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: ScanText) -> bool {
        let mut manual = Vec::new();
        let mut scanner = Scanner::from_text(text.0.as_str());
        while scanner.has_next().unwrap() {
            manual.push(scanner.next().unwrap());
        }
        let mut scanner = Scanner::from_text(text.0.as_str());
        let iterated: Result<Vec<_>, _> = scanner.tokens().unwrap().collect();
        iterated.unwrap() == manual
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(ScanText) -> bool);
}
