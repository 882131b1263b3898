//! The context object threaded through every evaluator and the driver.

use crate::config::EngineConfig;
use crate::report::{self, Detail, Identity, ReportEvent};
use crate::sink::OutputSink;
use crate::state::{Abort, RunState, SuiteCounts, Verdict};

/// Sink, run state and configuration of one suite run.
///
/// There is exactly one context per suite and it is passed by `&mut` to each
/// test, so at most one test can be current at a time.
pub struct TestContext<'a> {
    pub(crate) sink: &'a mut dyn OutputSink,
    pub(crate) state: RunState<'a>,
    pub(crate) config: EngineConfig,
}

impl<'a> TestContext<'a> {
    /// Creates a context for the suite named `test_file`.
    pub fn new(sink: &'a mut dyn OutputSink, test_file: &'a str, config: EngineConfig) -> Self {
        Self {
            sink,
            state: RunState::new(test_file),
            config,
        }
    }

    #[must_use]
    pub fn state(&self) -> &RunState<'a> {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn counts(&self) -> SuiteCounts {
        self.state.counts()
    }

    /// Direct access to the sink, e.g. to flush between suites.
    pub fn sink(&mut self) -> &mut dyn OutputSink {
        &mut *self.sink
    }

    pub(crate) fn identity(&self) -> Identity<'a> {
        Identity {
            file: self.state.test_file(),
            test: self.state.test_name(),
        }
    }

    pub(crate) fn emit(&mut self, event: &ReportEvent<'_>) {
        let identity = self.identity();
        report::emit(&mut *self.sink, identity, event, self.config.mask_width);
    }

    /// Reports a failure, marks the current test failed and hands back the
    /// abort the caller must return.
    pub(crate) fn fail_with(&mut self, line: u32, detail: Detail<'_>, message: Option<&str>) -> Abort {
        self.emit(&ReportEvent {
            verdict: Verdict::Fail,
            line,
            detail,
            message,
        });
        self.state.mark_failed();
        log::debug!(
            "{}:{}: {} failed",
            self.state.test_file(),
            line,
            self.state.test_name()
        );
        Abort::Failed
    }
}

impl core::fmt::Debug for TestContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TestContext")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
