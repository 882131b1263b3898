//! Built-in suite that checks the engine against itself.
//!
//! Each test renders something through a private [`CaptureSink`] and compares
//! the bytes with the outer context's evaluators, so a broken formatter shows
//! up as an ordinary test failure in the outer report.

use dualtest_core::number::{write_decimal, write_hex, write_mask};
use dualtest_core::printer::{print, print_number_by_style};
use dualtest_core::{
    Channel, DisplayStyle, EngineConfig, NoFixture, NumberKind, TestContext, TestResult,
};

use crate::records::{RecordSummary, parse_records};
use crate::sinks::CaptureSink;
use crate::suite::Suite;

/// Default subject name for record files produced by the self-check.
pub const SUBJECT: &str = "self_check";

/// The self-check suite.
#[must_use]
pub fn suite() -> Suite {
    Suite::new("self_check.rs")
        .case("decimal_formatting", line!(), decimal_formatting)
        .case("hex_formatting", line!(), hex_formatting)
        .case("mask_formatting", line!(), mask_formatting)
        .case("text_escaping", line!(), text_escaping)
        .case("failure_line_shape", line!(), failure_line_shape)
        .case("first_failure_only", line!(), first_failure_only)
        .case("record_stream_tallies", line!(), record_stream_tallies)
}

fn narrative<F: FnOnce(&mut CaptureSink)>(render: F) -> String {
    let mut sink = CaptureSink::new();
    render(&mut sink);
    sink.text(Channel::Narrative)
}

fn decimal_formatting(ctx: &mut TestContext<'_>) -> TestResult {
    for (value, expected) in [
        (0, "0"),
        (7, "7"),
        (-42, "-42"),
        (1_000_000, "1000000"),
        (i64::MAX, "9223372036854775807"),
        (i64::MIN, "-9223372036854775808"),
    ] {
        let actual = narrative(|sink| write_decimal(sink, Channel::Narrative, value));
        ctx.assert_equal_string(Some(expected), Some(&actual), None, line!())?;
    }
    Ok(())
}

fn hex_formatting(ctx: &mut TestContext<'_>) -> TestResult {
    let actual = narrative(|sink| write_hex(sink, Channel::Narrative, 0xABCD, 2));
    ctx.assert_equal_string(Some("0xCD"), Some(&actual), Some("truncated"), line!())?;
    let actual = narrative(|sink| {
        print_number_by_style(sink, Channel::Narrative, -1, DisplayStyle::HEX16);
    });
    ctx.assert_equal_string(Some("0xFFFF"), Some(&actual), Some("HEX16"), line!())?;
    let actual = narrative(|sink| {
        print_number_by_style(sink, Channel::Narrative, -1, DisplayStyle::UINT8);
    });
    ctx.assert_equal_string(Some("255"), Some(&actual), Some("UINT8"), line!())
}

fn mask_formatting(ctx: &mut TestContext<'_>) -> TestResult {
    let actual = narrative(|sink| write_mask(sink, Channel::Narrative, 0xF0, 0xA5, 8));
    ctx.assert_equal_string(Some("1010XXXX"), Some(&actual), None, line!())?;
    ctx.assert_bits(0x0F, 0x15, 0x05, Some("upper nibble ignored"), line!())
}

fn text_escaping(ctx: &mut TestContext<'_>) -> TestResult {
    let actual = narrative(|sink| print(sink, Channel::Narrative, Some(&b"a\r\n\x07"[..])));
    ctx.assert_equal_string(Some("a\\r\\n\\0x07"), Some(&actual), None, line!())?;
    let actual = narrative(|sink| print(sink, Channel::Narrative, None));
    ctx.assert_equal_string(Some("NULL"), Some(&actual), None, line!())
}

fn failure_line_shape(ctx: &mut TestContext<'_>) -> TestResult {
    let mut inner = CaptureSink::new();
    {
        let mut nested = TestContext::new(&mut inner, "inner.c", EngineConfig::default());
        nested.run_test(&mut NoFixture, "inner", 10, |nested| {
            nested.assert_equal_int_array(
                Some(&[1u8, 2, 3][..]),
                Some(&[1u8, 2, 4][..]),
                3,
                Some("bytes"),
                11,
                NumberKind::Hex,
            )
        });
    }
    let actual = inner.text(Channel::Narrative);
    ctx.assert_equal_string(
        Some("inner.c:11:inner:FAIL: Element 2 Expected 0x03 Was 0x04. bytes\n"),
        Some(&actual),
        None,
        line!(),
    )
}

fn first_failure_only(ctx: &mut TestContext<'_>) -> TestResult {
    let mut inner = CaptureSink::new();
    {
        let mut nested = TestContext::new(&mut inner, "inner.c", EngineConfig::default());
        nested.run_test(&mut NoFixture, "inner", 20, |nested| {
            let _ = nested.fail(Some("first"), 21);
            nested.fail(Some("second"), 22)
        });
    }
    let lines = inner.text(Channel::Narrative).lines().count();
    ctx.assert_equal_number(1, lines as i64, Some("narrative lines"), line!(), DisplayStyle::INT)
}

fn record_stream_tallies(ctx: &mut TestContext<'_>) -> TestResult {
    let mut inner = CaptureSink::new();
    {
        let mut nested = TestContext::new(&mut inner, "inner.c", EngineConfig::default());
        nested.run_test(&mut NoFixture, "pass", 30, |_| Ok(()));
        nested.run_test(&mut NoFixture, "fail", 31, |p| p.fail(None, 32));
        nested.run_test(&mut NoFixture, "skip", 33, |p| p.ignore(Some("later"), 34));
        nested.end();
    }
    let stream = inner.text(Channel::Structured);
    let Ok(records) = parse_records(&stream) else {
        return ctx.fail(Some("record stream did not parse"), line!());
    };
    let counts = RecordSummary::from_records(records).counts();
    let style = DisplayStyle::UINT;
    ctx.assert_equal_number(3, counts.tests.into(), Some("tests"), line!(), style)?;
    ctx.assert_equal_number(1, counts.failures.into(), Some("failures"), line!(), style)?;
    ctx.assert_equal_number(1, counts.ignores.into(), Some("ignores"), line!(), style)
}
