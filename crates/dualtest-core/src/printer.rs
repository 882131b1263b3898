//! Escaped text and styled number output.
//!
//! Narrative output keeps printable ASCII as-is, spells `\r` and `\n` out as
//! two characters, and shows every other byte as `\0xHH`. The structured
//! channel applies the same projection but also escapes `"` and `\`, and
//! writes other control bytes as `\u00HH`, so each record value is a valid
//! JSON string body. UTF-8 text keeps its non-ASCII characters on the
//! structured channel; raw byte input is escaped byte by byte.

use core::fmt;

use crate::number::{write_decimal, write_hex, write_hex_digits, write_unsigned};
use crate::sink::{Channel, OutputSink, put_raw};
use crate::style::{DisplayStyle, NumberKind};

/// Token printed in place of absent text.
pub const NULL_TOKEN: &[u8] = b"NULL";

/// Writes `text` to `channel` with that channel's escaping.
///
/// `None` prints [`NULL_TOKEN`].
pub fn print<S: OutputSink + ?Sized>(sink: &mut S, channel: Channel, text: Option<&[u8]>) {
    match text {
        Some(bytes) => {
            for &byte in bytes {
                put_escaped(sink, channel, byte);
            }
        }
        None => put_raw(sink, channel, NULL_TOKEN),
    }
}

/// [`print`] for UTF-8 text.
///
/// On the structured channel non-ASCII characters are written unchanged, so
/// a record reader sees the original text.
pub fn print_str<S: OutputSink + ?Sized>(sink: &mut S, channel: Channel, text: Option<&str>) {
    match text {
        Some(text) if channel == Channel::Structured => {
            for &byte in text.as_bytes() {
                if byte.is_ascii() {
                    put_escaped(sink, channel, byte);
                } else {
                    sink.put(byte, channel);
                }
            }
        }
        _ => print(sink, channel, text.map(str::as_bytes)),
    }
}

fn put_escaped<S: OutputSink + ?Sized>(sink: &mut S, channel: Channel, byte: u8) {
    match byte {
        b'"' | b'\\' if channel == Channel::Structured => {
            sink.put(b'\\', channel);
            sink.put(byte, channel);
        }
        32..=126 => sink.put(byte, channel),
        b'\r' => put_raw(sink, channel, b"\\r"),
        b'\n' => put_raw(sink, channel, b"\\n"),
        _ => match channel {
            Channel::Narrative => {
                sink.put(b'\\', channel);
                write_hex(sink, channel, u64::from(byte), 2);
            }
            Channel::Structured => {
                put_raw(sink, channel, b"\\u00");
                write_hex_digits(sink, channel, u64::from(byte), 2);
            }
        },
    }
}

/// Renders `value` according to `style`.
///
/// Signed styles print plain decimal, unsigned styles mask the value to the
/// style's width first, hex styles print `2 * width` digits.
pub fn print_number_by_style<S: OutputSink + ?Sized>(
    sink: &mut S,
    channel: Channel,
    value: i64,
    style: DisplayStyle,
) {
    match style.kind {
        NumberKind::Signed => write_decimal(sink, channel, value),
        NumberKind::Unsigned => {
            write_unsigned(sink, channel, (value as u64) & style.width.mask());
        }
        NumberKind::Hex => write_hex(sink, channel, value as u64, style.width.nibbles()),
    }
}

/// Prints a float in fixed notation with six decimals (`nan`, `inf`, `-inf`
/// for the special values).
pub fn print_float<S: OutputSink + ?Sized>(sink: &mut S, channel: Channel, value: f64) {
    if value.is_nan() {
        put_raw(sink, channel, b"nan");
    } else if value.is_infinite() {
        let text: &[u8] = if value.is_sign_negative() { b"-inf" } else { b"inf" };
        put_raw(sink, channel, text);
    } else {
        let mut writer = ChannelWriter::new(sink, channel);
        // ChannelWriter::write_str cannot fail.
        let _ = fmt::write(&mut writer, format_args!("{value:.6}"));
    }
}

/// Adapts one channel of a sink to [`core::fmt::Write`].
///
/// Bytes go out unescaped; use it for text the engine generates itself.
pub struct ChannelWriter<'s, S: OutputSink + ?Sized> {
    sink: &'s mut S,
    channel: Channel,
}

impl<'s, S: OutputSink + ?Sized> ChannelWriter<'s, S> {
    pub fn new(sink: &'s mut S, channel: Channel) -> Self {
        Self { sink, channel }
    }
}

impl<S: OutputSink + ?Sized> fmt::Write for ChannelWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        put_raw(self.sink, self.channel, s.as_bytes());
        Ok(())
    }
}
