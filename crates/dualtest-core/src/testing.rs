//! In-memory sink for unit tests.

use std::string::String;
use std::vec::Vec;

use crate::sink::{Channel, OutputSink};

#[derive(Debug, Default)]
pub struct Capture {
    pub structured: Vec<u8>,
    pub narrative: Vec<u8>,
    pub flushes: usize,
}

impl Capture {
    pub fn structured(&self) -> String {
        String::from_utf8(self.structured.clone()).unwrap()
    }

    pub fn narrative(&self) -> String {
        String::from_utf8(self.narrative.clone()).unwrap()
    }
}

impl OutputSink for Capture {
    fn put(&mut self, byte: u8, channel: Channel) {
        match channel {
            Channel::Structured => self.structured.push(byte),
            Channel::Narrative => self.narrative.push(byte),
        }
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
