#![no_main]
//! The record validator must reject garbage with an error, never a panic.

use dualtest_harness::records::{RecordSummary, parse_records};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(records) = parse_records(text) {
        let summary = RecordSummary::from_records(records);
        assert_eq!(
            summary.total,
            summary.passed + summary.failed + summary.ignored
        );
    }
});
