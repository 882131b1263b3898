//! Benchmark support for the dualtest engine.
//!
//! The benches live under `benches/`; this crate only exists to host them.

#![forbid(unsafe_code)]

use dualtest_core::{Channel, OutputSink};

/// Sink that counts bytes per channel and discards them.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingSink {
    pub structured: u64,
    pub narrative: u64,
}

impl OutputSink for CountingSink {
    fn put(&mut self, _byte: u8, channel: Channel) {
        match channel {
            Channel::Structured => self.structured += 1,
            Channel::Narrative => self.narrative += 1,
        }
    }
}
