//! Host harness for the dualtest engine.
//!
//! This crate provides:
//! - Sinks: console, append-mode record file, channel router, in-memory capture
//! - Suite runner: drives the engine per test and mirrors the lifecycle to JSONL
//! - Record reader: validates a channel-0 stream and rebuilds suite tallies
//! - Report generation: markdown + JSON summaries of a record file
//! - Self-check: a built-in suite that exercises the engine end to end

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod records;
pub mod report;
pub mod self_check;
pub mod sinks;
pub mod structured_log;
pub mod suite;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use records::{Record, RecordSummary};
pub use report::SuiteReport;
pub use sinks::{CaptureSink, ConsoleSink, DualSink, RecordFileSink};
pub use suite::{Suite, SuiteOutcome, SuiteRunner, TestCase};
