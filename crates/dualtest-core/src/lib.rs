//! # dualtest-core
//!
//! Allocation-free test execution and assertion reporting for embedded
//! targets.
//!
//! The engine writes every result twice through a byte-oriented
//! [`OutputSink`]: a structured record on channel 0 and a one-line narrative
//! on channel 1. Evaluators live on [`TestContext`]; they report the first
//! failure of a test and return [`Abort`], which test bodies forward with `?`.
//!
//! ```
//! use dualtest_core::{DisplayStyle, EngineConfig, NullSink, TestContext, TestResult};
//!
//! fn adds(ctx: &mut TestContext<'_>) -> TestResult {
//!     ctx.assert_equal_number(4, 2 + 2, None, line!(), DisplayStyle::INT)
//! }
//!
//! let mut sink = NullSink;
//! let mut ctx = TestContext::new(&mut sink, "math.rs", EngineConfig::default());
//! ctx.run("adds", line!(), adds);
//! assert_eq!(ctx.end(), 0);
//! ```

#![no_std]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod assert;
pub mod config;
pub mod context;
pub mod number;
pub mod printer;
pub mod report;
pub mod runner;
pub mod sink;
pub mod state;
pub mod style;

#[cfg(test)]
mod testing;

pub use config::EngineConfig;
pub use context::TestContext;
pub use report::{Detail, Identity, RECORD_KEYS, ReportEvent, Value};
pub use runner::{Fixture, NoFixture, TestFn};
pub use sink::{Channel, NullSink, OutputSink};
pub use state::{Abort, RunState, SuiteCounts, TestResult, Verdict};
pub use style::{ArrayElement, ByteWidth, DisplayStyle, NumberKind};
