#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use textscan::{CharSource, ChunkedSource, Scanner, ScannerOptions, StrSource};

const DELIMITERS: &[&str] = &[r"\s+", ",", r"\s*,\s*", "-;(-)?", "", r"\b", "x*"];

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    chunk: u8,
    delimiter: u8,
    small_buffer: bool,
}

#[derive(Debug, PartialEq)]
enum Step {
    Int(i64),
    Token(String),
    Line(String),
}

fn run<S: CharSource>(mut scanner: Scanner<S>, delimiter: &str) -> Vec<Step> {
    scanner.use_delimiter(delimiter).unwrap();
    let mut steps = Vec::new();
    // Bounded so a livelock shows up as a crash rather than a timeout.
    for _ in 0..10_000 {
        if scanner.has_next_i64().unwrap() {
            steps.push(Step::Int(scanner.next_i64().unwrap()));
        } else if scanner.has_next().unwrap() {
            steps.push(Step::Token(scanner.next().unwrap()));
        } else if scanner.has_next_line().unwrap() {
            steps.push(Step::Line(scanner.next_line().unwrap()));
        } else {
            return steps;
        }
    }
    panic!("scanner did not terminate");
}

fuzz_target!(|input: Input| {
    let delimiter = DELIMITERS[usize::from(input.delimiter) % DELIMITERS.len()];
    let options = ScannerOptions {
        buffer_capacity: if input.small_buffer { 16 } else { 1024 },
        ..Default::default()
    };

    let expected = run(Scanner::new(StrSource::new(input.text.as_str())), delimiter);
    let chunked = Scanner::with_options(
        ChunkedSource::new(input.text.as_str(), usize::from(input.chunk % 16) + 1),
        options,
    )
    .unwrap();
    assert_eq!(run(chunked, delimiter), expected);
});
