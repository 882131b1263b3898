//! Run state: suite counters, per-test flags and the abort sentinel.

use thiserror::Error;

/// Signal that ends a test body early.
///
/// Evaluators return it after reporting; test bodies forward it with `?` and
/// only the per-test driver consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Abort {
    #[error("test failed")]
    Failed,
    #[error("test ignored")]
    Ignored,
}

/// Result type of test bodies, fixtures and evaluators.
pub type TestResult = Result<(), Abort>;

/// Final classification of one test, or of one reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
    Ignore,
}

/// Suite-level tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SuiteCounts {
    pub tests: u32,
    pub failures: u32,
    pub ignores: u32,
}

impl SuiteCounts {
    #[must_use]
    pub const fn passed(&self) -> u32 {
        self.tests
            .saturating_sub(self.failures)
            .saturating_sub(self.ignores)
    }

    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failures == 0
    }
}

/// Process-wide state of one suite run.
///
/// Invariant: the two per-test flags are only ever set while a test is
/// current, and both are cleared when that test concludes.
#[derive(Debug, Clone, Default)]
pub struct RunState<'a> {
    test_file: &'a str,
    test_name: &'a str,
    test_line: u32,
    counts: SuiteCounts,
    current_failed: bool,
    current_ignored: bool,
}

impl<'a> RunState<'a> {
    #[must_use]
    pub fn new(test_file: &'a str) -> Self {
        Self {
            test_file,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn test_file(&self) -> &'a str {
        self.test_file
    }

    #[must_use]
    pub fn test_name(&self) -> &'a str {
        self.test_name
    }

    #[must_use]
    pub fn test_line(&self) -> u32 {
        self.test_line
    }

    #[must_use]
    pub fn counts(&self) -> SuiteCounts {
        self.counts
    }

    #[must_use]
    pub fn current_failed(&self) -> bool {
        self.current_failed
    }

    #[must_use]
    pub fn current_ignored(&self) -> bool {
        self.current_ignored
    }

    /// True once the current test already failed or was ignored.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.current_failed || self.current_ignored
    }

    /// Zeroes counters and flags for a new suite.
    pub fn reset(&mut self, test_file: &'a str) {
        *self = Self::new(test_file);
    }

    pub(crate) fn start_test(&mut self, name: &'a str, line: u32) {
        self.test_name = name;
        self.test_line = line;
        self.counts.tests += 1;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.current_failed = true;
    }

    pub(crate) fn mark_ignored(&mut self) {
        self.current_ignored = true;
    }

    /// Tallies the current test and clears both flags.
    pub(crate) fn conclude(&mut self) -> Verdict {
        let verdict = if self.current_ignored {
            self.counts.ignores += 1;
            Verdict::Ignore
        } else if self.current_failed {
            self.counts.failures += 1;
            Verdict::Fail
        } else {
            Verdict::Pass
        };
        self.current_failed = false;
        self.current_ignored = false;
        verdict
    }
}
