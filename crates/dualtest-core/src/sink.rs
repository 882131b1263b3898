//! Output channels and the sink capability the engine writes through.

/// One of the two logical report destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    /// Machine-readable record stream (one object per test).
    Structured = 0,
    /// Terse human-readable lines.
    Narrative = 1,
}

impl Channel {
    /// Both channels, in emission order.
    pub const ALL: [Channel; 2] = [Channel::Structured, Channel::Narrative];

    /// Numeric selector as seen by byte-oriented transports.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Channel::index`].
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Structured),
            1 => Some(Self::Narrative),
            _ => None,
        }
    }
}

/// Character-oriented output capability.
///
/// The engine calls [`OutputSink::put`] once per output byte. Implementations
/// may flush every byte; nothing is ever read back.
pub trait OutputSink {
    /// Deliver one byte to `channel`.
    fn put(&mut self, byte: u8, channel: Channel);

    /// Called once a test has concluded.
    fn flush(&mut self) {}
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn put(&mut self, byte: u8, channel: Channel) {
        (**self).put(byte, channel);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn put(&mut self, _byte: u8, _channel: Channel) {}
}

/// Writes a byte slice to one channel without any escaping.
pub fn put_raw<S: OutputSink + ?Sized>(sink: &mut S, channel: Channel, bytes: &[u8]) {
    for &byte in bytes {
        sink.put(byte, channel);
    }
}
