//! Integer-to-text conversion, one byte at a time.
//!
//! Nothing here allocates or buffers: digits are produced most-significant
//! first by dividing through a power of ten (decimal) or shifting out nibbles
//! (hex), so the stack cost is a couple of `u64`s regardless of the value.

use crate::sink::{Channel, OutputSink};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Writes `value` in decimal with a leading `-` when negative.
///
/// Handles `i64::MIN` without overflow by formatting the unsigned magnitude.
pub fn write_decimal<S: OutputSink + ?Sized>(sink: &mut S, channel: Channel, value: i64) {
    if value < 0 {
        sink.put(b'-', channel);
    }
    write_unsigned(sink, channel, value.unsigned_abs());
}

/// Writes `value` in decimal with no leading zeros.
pub fn write_unsigned<S: OutputSink + ?Sized>(sink: &mut S, channel: Channel, value: u64) {
    // value / divisor > 9 implies divisor * 10 <= value, so this never overflows.
    let mut divisor: u64 = 1;
    while value / divisor > 9 {
        divisor *= 10;
    }

    loop {
        let digit = ((value / divisor) % 10) as u8;
        sink.put(b'0' + digit, channel);
        if divisor == 1 {
            break;
        }
        divisor /= 10;
    }
}

/// Writes `0x` followed by exactly `nibbles` uppercase hex digits.
///
/// Higher bits that do not fit are dropped; missing ones are zero-padded.
/// At most 16 digits are produced.
pub fn write_hex<S: OutputSink + ?Sized>(sink: &mut S, channel: Channel, value: u64, nibbles: u8) {
    sink.put(b'0', channel);
    sink.put(b'x', channel);
    write_hex_digits(sink, channel, value, nibbles);
}

/// Same as [`write_hex`] without the `0x` prefix.
pub fn write_hex_digits<S: OutputSink + ?Sized>(
    sink: &mut S,
    channel: Channel,
    value: u64,
    nibbles: u8,
) {
    let nibbles = u32::from(nibbles.min(16));
    for position in (0..nibbles).rev() {
        let nibble = (value >> (position * 4)) & 0xF;
        sink.put(HEX_DIGITS[nibble as usize], channel);
    }
}

/// Writes one character per bit of a `width_bits`-wide word, MSB first.
///
/// Bits covered by `mask` show as `1`/`0` from `number`; the rest show as `X`.
pub fn write_mask<S: OutputSink + ?Sized>(
    sink: &mut S,
    channel: Channel,
    mask: u64,
    number: u64,
    width_bits: u32,
) {
    let width_bits = width_bits.clamp(1, 64);
    let mut current_bit = 1u64 << (width_bits - 1);
    for _ in 0..width_bits {
        let ch = if current_bit & mask == 0 {
            b'X'
        } else if current_bit & number == 0 {
            b'0'
        } else {
            b'1'
        };
        sink.put(ch, channel);
        current_bit >>= 1;
    }
}
