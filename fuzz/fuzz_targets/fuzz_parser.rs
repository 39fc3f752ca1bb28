//! Fuzz target for the manifest tokenizer and parser.
//!
//! Goal: parsing should **never panic** on any input. Syntax errors are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep fuzzing fast
    if data.len() > 64 * 1024 {
        return;
    }

    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let _ = depseval_syntax::parse_module(source, "<fuzz>");
    let _ = depseval_syntax::parse_expression(source, "<fuzz>");
});
