#![no_main]
//! Arbitrary bytes through the failure path must always yield one valid record.

use dualtest_core::{Channel, EngineConfig, NoFixture, TestContext};
use dualtest_harness::CaptureSink;
use dualtest_harness::records::parse_records;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let split = data.len() / 2;
    let expected = String::from_utf8_lossy(&data[..split]);
    let actual = String::from_utf8_lossy(&data[split..]);

    let mut sink = CaptureSink::new();
    {
        let mut ctx = TestContext::new(&mut sink, "fuzz.c", EngineConfig::default());
        ctx.run_test(&mut NoFixture, "fuzz", 1, |ctx| {
            ctx.assert_equal_string(Some(&expected), Some(&actual), Some(&expected), 2)
        });
    }

    let records = match parse_records(&sink.text(Channel::Structured)) {
        Ok(records) => records,
        Err(err) => panic!("engine produced an invalid record: {err}"),
    };
    assert_eq!(records.len(), 1);

    let narrative = sink.text(Channel::Narrative);
    assert_eq!(narrative.matches('\n').count(), 1, "{narrative:?}");
    assert!(narrative.bytes().all(|b| b == b'\n' || (0x20..0x7F).contains(&b)));
});
