#![allow(missing_docs)]
#![cfg(feature = "serde")]

use textscan::{Locale, Scanner, ScannerOptions, StrSource};

#[test]
fn options_deserialize_with_defaults() {
    let options: ScannerOptions =
        serde_json::from_str(r#"{ "delimiter": ";", "radix": 16 }"#).unwrap();
    assert_eq!(options.radix, 16);
    assert_eq!(options.locale, Locale::US);
    assert_eq!(options.buffer_capacity, ScannerOptions::default().buffer_capacity);

    let mut s = Scanner::with_options(StrSource::new("ff;10"), options).unwrap();
    assert_eq!(s.next_i32().unwrap(), 255);
    assert_eq!(s.next_i32().unwrap(), 16);
}

#[test]
fn options_round_trip() {
    let options = ScannerOptions {
        locale: Locale::GERMANY,
        ..Default::default()
    };
    let json = serde_json::to_string(&options).unwrap();
    let back: ScannerOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}
