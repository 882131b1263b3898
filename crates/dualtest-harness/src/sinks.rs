//! Host implementations of [`OutputSink`].
//!
//! The engine's write path is infallible, so every sink here keeps the first
//! I/O error it hits, stops writing, and hands the error back from
//! `finish`.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use dualtest_core::{Channel, OutputSink};

use crate::error::HarnessError;

/// Writer plus the first error it produced.
struct Guarded<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> Guarded<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    fn put(&mut self, byte: u8) {
        if self.error.is_none()
            && let Err(err) = self.writer.write_all(&[byte])
        {
            log::warn!("sink write failed: {err}");
            self.error = Some(err);
        }
    }

    fn flush(&mut self) {
        if self.error.is_none()
            && let Err(err) = self.writer.flush()
        {
            log::warn!("sink flush failed: {err}");
            self.error = Some(err);
        }
    }

    fn finish(mut self) -> Result<W, HarnessError> {
        self.flush();
        match self.error {
            Some(err) => Err(err.into()),
            None => Ok(self.writer),
        }
    }
}

/// Narrative lines to a terminal (or any writer); structured bytes are
/// dropped.
pub struct ConsoleSink<W: Write = io::Stdout> {
    out: Guarded<W>,
}

impl ConsoleSink {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: Guarded::new(writer),
        }
    }

    /// Flushes and returns the writer, or the first error seen.
    pub fn finish(self) -> Result<W, HarnessError> {
        self.out.finish()
    }
}

impl<W: Write> OutputSink for ConsoleSink<W> {
    fn put(&mut self, byte: u8, channel: Channel) {
        if channel == Channel::Narrative {
            self.out.put(byte);
        }
    }

    fn flush(&mut self) {
        self.out.flush();
    }
}

/// Structured records appended to `<dir>/<subject>.json`.
pub struct RecordFileSink {
    path: PathBuf,
    out: Guarded<BufWriter<File>>,
}

impl RecordFileSink {
    /// Opens (creating `dir` and the file if needed) the record file for
    /// `subject` in append mode.
    pub fn open(dir: &Path, subject: &str) -> Result<Self, HarnessError> {
        std::fs::create_dir_all(dir)?;
        let path = record_path(dir, subject);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        log::debug!("appending records to {}", path.display());
        Ok(Self {
            path,
            out: Guarded::new(BufWriter::new(file)),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and closes the file, returning its path.
    pub fn finish(self) -> Result<PathBuf, HarnessError> {
        let path = self.path;
        self.out.finish()?;
        Ok(path)
    }
}

impl OutputSink for RecordFileSink {
    fn put(&mut self, byte: u8, channel: Channel) {
        if channel == Channel::Structured {
            self.out.put(byte);
        }
    }

    fn flush(&mut self) {
        self.out.flush();
    }
}

/// Location of the record file for `subject`.
#[must_use]
pub fn record_path(dir: &Path, subject: &str) -> PathBuf {
    dir.join(format!("{subject}.json"))
}

/// Routes channel 0 to one sink and channel 1 to another.
#[derive(Debug, Default)]
pub struct DualSink<S, N> {
    pub structured: S,
    pub narrative: N,
}

impl<S: OutputSink, N: OutputSink> DualSink<S, N> {
    pub fn new(structured: S, narrative: N) -> Self {
        Self {
            structured,
            narrative,
        }
    }

    pub fn into_parts(self) -> (S, N) {
        (self.structured, self.narrative)
    }
}

impl<S: OutputSink, N: OutputSink> OutputSink for DualSink<S, N> {
    fn put(&mut self, byte: u8, channel: Channel) {
        match channel {
            Channel::Structured => self.structured.put(byte, channel),
            Channel::Narrative => self.narrative.put(byte, channel),
        }
    }

    fn flush(&mut self) {
        self.structured.flush();
        self.narrative.flush();
    }
}

/// Both channels kept in memory.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    structured: Vec<u8>,
    narrative: Vec<u8>,
}

impl CaptureSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bytes(&self, channel: Channel) -> &[u8] {
        match channel {
            Channel::Structured => &self.structured,
            Channel::Narrative => &self.narrative,
        }
    }

    /// Channel contents as text. The engine only ever writes ASCII.
    #[must_use]
    pub fn text(&self, channel: Channel) -> String {
        String::from_utf8_lossy(self.bytes(channel)).into_owned()
    }

    pub fn clear(&mut self) {
        self.structured.clear();
        self.narrative.clear();
    }
}

impl OutputSink for CaptureSink {
    fn put(&mut self, byte: u8, channel: Channel) {
        match channel {
            Channel::Structured => self.structured.push(byte),
            Channel::Narrative => self.narrative.push(byte),
        }
    }
}
