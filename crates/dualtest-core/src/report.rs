//! Dual-channel report writer.
//!
//! Every reportable event is described once as a [`ReportEvent`] and then
//! rendered twice: first as a structured record on [`Channel::Structured`],
//! then as a narrative line on [`Channel::Narrative`]. Both renderings share
//! [`write_body`], so the detail text cannot drift between channels.
//!
//! Structured record layout (keys in this order, values always quoted):
//!
//! ```text
//! {
//! "filename":"suite.c",
//! "functionn_name":"test_add",
//! "linenumber":"12",
//! "ignored":"NO",
//! "result":"Fail",
//! "message":"Expected 5 Was 6. sum"
//! }
//! ```
//!
//! Narrative line: `suite.c:12:test_add:FAIL: Expected 5 Was 6. sum`.

use crate::number::{write_decimal, write_hex, write_mask, write_unsigned};
use crate::printer::{NULL_TOKEN, print_float, print_number_by_style, print_str};
use crate::sink::{Channel, OutputSink, put_raw};
use crate::state::Verdict;
use crate::style::{ByteWidth, DisplayStyle};

/// Record keys, in emission order.
pub const RECORD_KEYS: [&str; 6] = [
    "filename",
    "functionn_name",
    "linenumber",
    "ignored",
    "result",
    "message",
];

pub(crate) const STR_EXPECTED: &[u8] = b"Expected ";
pub(crate) const STR_WAS: &[u8] = b" Was ";
pub(crate) const STR_ELEMENT: &[u8] = b"Element ";
pub(crate) const STR_BYTE: &[u8] = b"Byte ";
pub(crate) const STR_MEMORY: &[u8] = b"Memory Mismatch.";
pub(crate) const STR_DELTA: &[u8] = b"Values Not Within Delta";
pub(crate) const STR_POINTLESS: &[u8] = b"You Asked Me To Compare Nothing, Which Was Pointless.";
pub(crate) const STR_NULL_EXPECTED: &[u8] = b"Expected pointer to be NULL";
pub(crate) const STR_NULL_ACTUAL: &[u8] = b"Actual pointer was NULL";
pub(crate) const STR_SHORT_ARRAY: &[u8] = b"Element Count Exceeds Array Length";
pub(crate) const STR_SPACER: &[u8] = b". ";

const SUMMARY_RULE: &[u8] = b"-----------------------";

impl Verdict {
    /// Label used on the narrative channel.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Ignore => "IGNORE",
        }
    }

    /// Value of the record's `result` field.
    #[must_use]
    pub const fn record_result(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "Fail",
            Self::Ignore => "",
        }
    }

    /// Value of the record's `ignored` field.
    #[must_use]
    pub const fn record_ignored(self) -> &'static str {
        match self {
            Self::Ignore => "YES",
            Self::Pass | Self::Fail => "NO",
        }
    }
}

/// A value shown inside a failure detail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'v> {
    Number(i64, DisplayStyle),
    /// Bits of `bits` selected by `mask`, rendered with the configured word width.
    Masked { mask: u64, bits: u64 },
    Float(f64),
    /// Quoted with `'`, or `NULL` when absent.
    Text(Option<&'v str>),
}

/// What went wrong (or nothing, for pass and unconditional verdicts).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detail<'v> {
    None,
    /// `[Element N ]Expected X Was Y`
    Mismatch {
        element: Option<usize>,
        expected: Value<'v>,
        actual: Value<'v>,
    },
    /// `Memory Mismatch. [Element N ]Byte B Expected 0xXX Was 0xYY`
    Memory {
        element: Option<usize>,
        byte: usize,
        expected: u8,
        actual: u8,
    },
    /// `Values Not Within Delta D Expected X Was Y`
    NumbersNotWithin {
        delta: Value<'v>,
        expected: Value<'v>,
        actual: Value<'v>,
    },
    /// `[Element N ]Values Not Within Delta`
    NotWithinDelta { element: Option<usize> },
    Pointless,
    NullExpected,
    NullActual,
    ShortArray,
}

/// One reportable event of the current test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportEvent<'v> {
    pub verdict: Verdict,
    /// Source line the event refers to.
    pub line: u32,
    pub detail: Detail<'v>,
    pub message: Option<&'v str>,
}

impl ReportEvent<'_> {
    fn has_body(&self) -> bool {
        !matches!(self.detail, Detail::None) || self.message.is_some()
    }
}

/// Where an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity<'v> {
    pub file: &'v str,
    pub test: &'v str,
}

/// Renders `event` on both channels: the structured record first, then the
/// narrative line.
pub fn emit<S: OutputSink + ?Sized>(
    sink: &mut S,
    identity: Identity<'_>,
    event: &ReportEvent<'_>,
    mask_width: ByteWidth,
) {
    write_record(sink, identity, event, mask_width);
    write_narrative(sink, identity, event, mask_width);
}

fn write_record<S: OutputSink + ?Sized>(
    sink: &mut S,
    identity: Identity<'_>,
    event: &ReportEvent<'_>,
    mask_width: ByteWidth,
) {
    let ch = Channel::Structured;
    put_raw(sink, ch, b"{\n");

    open_field(sink, "filename");
    print_str(sink, ch, Some(identity.file));
    close_field(sink, true);

    open_field(sink, "functionn_name");
    print_str(sink, ch, Some(identity.test));
    close_field(sink, true);

    open_field(sink, "linenumber");
    write_unsigned(sink, ch, u64::from(event.line));
    close_field(sink, true);

    open_field(sink, "ignored");
    put_raw(sink, ch, event.verdict.record_ignored().as_bytes());
    close_field(sink, true);

    open_field(sink, "result");
    put_raw(sink, ch, event.verdict.record_result().as_bytes());
    close_field(sink, true);

    open_field(sink, "message");
    write_body(sink, ch, event, mask_width);
    close_field(sink, false);

    put_raw(sink, ch, b"}\n");
}

fn open_field<S: OutputSink + ?Sized>(sink: &mut S, key: &str) {
    let ch = Channel::Structured;
    sink.put(b'"', ch);
    put_raw(sink, ch, key.as_bytes());
    put_raw(sink, ch, b"\":\"");
}

fn close_field<S: OutputSink + ?Sized>(sink: &mut S, more: bool) {
    let tail: &[u8] = if more { b"\",\n" } else { b"\"\n" };
    put_raw(sink, Channel::Structured, tail);
}

fn write_narrative<S: OutputSink + ?Sized>(
    sink: &mut S,
    identity: Identity<'_>,
    event: &ReportEvent<'_>,
    mask_width: ByteWidth,
) {
    let ch = Channel::Narrative;
    print_str(sink, ch, Some(identity.file));
    sink.put(b':', ch);
    write_unsigned(sink, ch, u64::from(event.line));
    sink.put(b':', ch);
    print_str(sink, ch, Some(identity.test));
    sink.put(b':', ch);
    put_raw(sink, ch, event.verdict.label().as_bytes());

    if event.has_body() {
        sink.put(b':', ch);
        // A bare message that already starts with a space keeps its own.
        let own_space = matches!(event.detail, Detail::None)
            && event.message.is_some_and(|msg| msg.starts_with(' '));
        if !own_space {
            sink.put(b' ', ch);
        }
        write_body(sink, ch, event, mask_width);
    }
    sink.put(b'\n', ch);
}

/// Detail clause followed by the caller's message.
///
/// With a detail present the message is appended after `". "`; otherwise the
/// message stands alone.
pub fn write_body<S: OutputSink + ?Sized>(
    sink: &mut S,
    channel: Channel,
    event: &ReportEvent<'_>,
    mask_width: ByteWidth,
) {
    let has_detail = !matches!(event.detail, Detail::None);
    write_detail(sink, channel, &event.detail, mask_width);
    if let Some(message) = event.message {
        if has_detail {
            put_raw(sink, channel, STR_SPACER);
        }
        print_str(sink, channel, Some(message));
    }
}

fn write_detail<S: OutputSink + ?Sized>(
    sink: &mut S,
    ch: Channel,
    detail: &Detail<'_>,
    mask_width: ByteWidth,
) {
    match *detail {
        Detail::None => {}
        Detail::Mismatch {
            element,
            expected,
            actual,
        } => {
            write_element(sink, ch, element);
            write_expected_was(sink, ch, expected, actual, mask_width);
        }
        Detail::Memory {
            element,
            byte,
            expected,
            actual,
        } => {
            put_raw(sink, ch, STR_MEMORY);
            sink.put(b' ', ch);
            write_element(sink, ch, element);
            put_raw(sink, ch, STR_BYTE);
            write_unsigned(sink, ch, byte as u64);
            sink.put(b' ', ch);
            put_raw(sink, ch, STR_EXPECTED);
            write_hex(sink, ch, u64::from(expected), 2);
            put_raw(sink, ch, STR_WAS);
            write_hex(sink, ch, u64::from(actual), 2);
        }
        Detail::NumbersNotWithin {
            delta,
            expected,
            actual,
        } => {
            put_raw(sink, ch, STR_DELTA);
            sink.put(b' ', ch);
            write_value(sink, ch, delta, mask_width);
            sink.put(b' ', ch);
            write_expected_was(sink, ch, expected, actual, mask_width);
        }
        Detail::NotWithinDelta { element } => {
            write_element(sink, ch, element);
            put_raw(sink, ch, STR_DELTA);
        }
        Detail::Pointless => put_raw(sink, ch, STR_POINTLESS),
        Detail::NullExpected => put_raw(sink, ch, STR_NULL_EXPECTED),
        Detail::NullActual => put_raw(sink, ch, STR_NULL_ACTUAL),
        Detail::ShortArray => put_raw(sink, ch, STR_SHORT_ARRAY),
    }
}

fn write_element<S: OutputSink + ?Sized>(sink: &mut S, ch: Channel, element: Option<usize>) {
    if let Some(index) = element {
        put_raw(sink, ch, STR_ELEMENT);
        write_unsigned(sink, ch, index as u64);
        sink.put(b' ', ch);
    }
}

fn write_expected_was<S: OutputSink + ?Sized>(
    sink: &mut S,
    ch: Channel,
    expected: Value<'_>,
    actual: Value<'_>,
    mask_width: ByteWidth,
) {
    put_raw(sink, ch, STR_EXPECTED);
    write_value(sink, ch, expected, mask_width);
    put_raw(sink, ch, STR_WAS);
    write_value(sink, ch, actual, mask_width);
}

fn write_value<S: OutputSink + ?Sized>(
    sink: &mut S,
    ch: Channel,
    value: Value<'_>,
    mask_width: ByteWidth,
) {
    match value {
        Value::Number(number, style) => print_number_by_style(sink, ch, number, style),
        Value::Masked { mask, bits } => write_mask(sink, ch, mask, bits, mask_width.bits()),
        Value::Float(number) => print_float(sink, ch, number),
        Value::Text(Some(text)) => {
            sink.put(b'\'', ch);
            print_str(sink, ch, Some(text));
            sink.put(b'\'', ch);
        }
        Value::Text(None) => put_raw(sink, ch, NULL_TOKEN),
    }
}

/// Writes the end-of-suite summary on the narrative channel only.
pub fn write_summary<S: OutputSink + ?Sized>(sink: &mut S, tests: u32, failures: u32, ignores: u32) {
    let ch = Channel::Narrative;
    put_raw(sink, ch, SUMMARY_RULE);
    sink.put(b'\n', ch);
    write_decimal(sink, ch, i64::from(tests));
    put_raw(sink, ch, b" Tests ");
    write_decimal(sink, ch, i64::from(failures));
    put_raw(sink, ch, b" Failures ");
    write_decimal(sink, ch, i64::from(ignores));
    put_raw(sink, ch, b" Ignored\n");
    let verdict: &[u8] = if failures == 0 { b"OK" } else { b"FAIL" };
    put_raw(sink, ch, verdict);
    sink.put(b'\n', ch);
}
