//! Suite definition and the host-side runner that drives the engine.

use std::time::Instant;

use dualtest_core::{
    EngineConfig, Fixture, NoFixture, OutputSink, SuiteCounts, TestContext, TestFn, Verdict,
};

use crate::error::HarnessError;
use crate::structured_log::{
    EVENT_SUITE_END, EVENT_SUITE_START, EVENT_TEST_END, EVENT_TEST_START, LogEmitter, LogLevel,
};

/// One registered test.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    /// Line of the test definition; used for `PASS` reports.
    pub line: u32,
    pub body: TestFn,
}

/// Ordered list of tests sharing one suite file name.
#[derive(Debug, Clone)]
pub struct Suite {
    pub file: String,
    pub cases: Vec<TestCase>,
}

impl Suite {
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            cases: Vec::new(),
        }
    }

    /// Appends a test; tests run in insertion order.
    #[must_use]
    pub fn case(mut self, name: impl Into<String>, line: u32, body: TestFn) -> Self {
        self.cases.push(TestCase {
            name: name.into(),
            line,
            body,
        });
        self
    }
}

/// Verdict of one test as seen by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub name: String,
    pub line: u32,
    pub verdict: Verdict,
}

/// What a suite run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteOutcome {
    pub counts: SuiteCounts,
    pub cases: Vec<CaseOutcome>,
}

impl SuiteOutcome {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.counts.all_passed()
    }
}

/// Runs suites through the engine, optionally mirroring the lifecycle into a
/// JSONL log.
pub struct SuiteRunner<'l> {
    config: EngineConfig,
    log: Option<&'l mut LogEmitter>,
}

impl<'l> SuiteRunner<'l> {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config, log: None }
    }

    #[must_use]
    pub fn with_log(mut self, log: &'l mut LogEmitter) -> Self {
        self.log = Some(log);
        self
    }

    /// Runs every case of `suite` without fixture hooks.
    pub fn run(
        &mut self,
        suite: &Suite,
        sink: &mut dyn OutputSink,
    ) -> Result<SuiteOutcome, HarnessError> {
        self.run_with_fixture(suite, &mut NoFixture, sink)
    }

    /// Runs every case of `suite`, calling `fixture` around each, then writes
    /// the summary.
    pub fn run_with_fixture(
        &mut self,
        suite: &Suite,
        fixture: &mut dyn Fixture,
        sink: &mut dyn OutputSink,
    ) -> Result<SuiteOutcome, HarnessError> {
        log::info!("running {} ({} tests)", suite.file, suite.cases.len());
        if let Some(log) = self.log.as_deref_mut() {
            log.emit(LogLevel::Info, EVENT_SUITE_START)?;
        }

        let mut ctx = TestContext::new(sink, &suite.file, self.config);
        ctx.begin(&suite.file);

        let mut cases = Vec::with_capacity(suite.cases.len());
        for case in &suite.cases {
            if let Some(log) = self.log.as_deref_mut() {
                let entry = log
                    .entry(LogLevel::Debug, EVENT_TEST_START)
                    .with_test(&case.name, case.line);
                log.emit_entry(entry)?;
            }

            let started = Instant::now();
            let verdict = ctx.run_test(fixture, &case.name, case.line, case.body);
            let elapsed = started.elapsed();

            if let Some(log) = self.log.as_deref_mut() {
                let level = match verdict {
                    Verdict::Fail => LogLevel::Warn,
                    Verdict::Pass | Verdict::Ignore => LogLevel::Info,
                };
                let entry = log
                    .entry(level, EVENT_TEST_END)
                    .with_test(&case.name, case.line)
                    .with_outcome(verdict.into())
                    .with_duration_us(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX));
                log.emit_entry(entry)?;
            }
            cases.push(CaseOutcome {
                name: case.name.clone(),
                line: case.line,
                verdict,
            });
        }

        ctx.end();
        let counts = ctx.counts();

        if let Some(log) = self.log.as_deref_mut() {
            let level = if counts.all_passed() {
                LogLevel::Info
            } else {
                LogLevel::Error
            };
            let entry = log.entry(level, EVENT_SUITE_END).with_counts(counts);
            log.emit_entry(entry)?;
            log.flush()?;
        }
        log::info!(
            "{}: {} tests, {} failures, {} ignored",
            suite.file,
            counts.tests,
            counts.failures,
            counts.ignores
        );

        Ok(SuiteOutcome { counts, cases })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::CaptureSink;
    use crate::structured_log::validate_log_line;
    use dualtest_core::{Channel, DisplayStyle, TestResult};
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn ok(ctx: &mut TestContext<'_>) -> TestResult {
        ctx.assert_equal_number(1, 1, None, 3, DisplayStyle::INT)
    }

    fn bad(ctx: &mut TestContext<'_>) -> TestResult {
        ctx.assert_equal_number(1, 2, None, 8, DisplayStyle::INT)
    }

    fn skipped(ctx: &mut TestContext<'_>) -> TestResult {
        ctx.ignore(Some("later"), 13)
    }

    fn suite() -> Suite {
        Suite::new("demo.c")
            .case("test_ok", 2, ok)
            .case("test_bad", 7, bad)
            .case("test_skipped", 12, skipped)
    }

    #[test]
    fn runner_collects_verdicts() {
        let mut sink = CaptureSink::new();
        let outcome = SuiteRunner::new(EngineConfig::default())
            .run(&suite(), &mut sink)
            .unwrap();
        assert_eq!(
            outcome.counts,
            SuiteCounts {
                tests: 3,
                failures: 1,
                ignores: 1
            }
        );
        assert!(!outcome.all_passed());
        let verdicts: Vec<_> = outcome.cases.iter().map(|c| c.verdict).collect();
        assert_eq!(verdicts, [Verdict::Pass, Verdict::Fail, Verdict::Ignore]);
        assert!(
            sink.text(Channel::Narrative)
                .ends_with("3 Tests 1 Failures 1 Ignored\nFAIL\n")
        );
    }

    #[test]
    fn runner_writes_lifecycle_log() {
        let buffer = Shared::default();
        let mut log = LogEmitter::to_writer(Box::new(buffer.clone()), "demo", "run-1");
        let mut sink = CaptureSink::new();
        SuiteRunner::new(EngineConfig::default())
            .with_log(&mut log)
            .run(&suite(), &mut sink)
            .unwrap();

        let text = String::from_utf8(buffer.0.borrow().clone()).unwrap();
        let entries: Vec<_> = text
            .lines()
            .enumerate()
            .map(|(i, line)| validate_log_line(line, i + 1).unwrap())
            .collect();
        let events: Vec<&str> = entries.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(
            events,
            [
                "suite_start",
                "test_start",
                "test_end",
                "test_start",
                "test_end",
                "test_start",
                "test_end",
                "suite_end"
            ]
        );
        assert_eq!(entries[4].level, LogLevel::Warn);
        assert_eq!(entries[4].test.as_deref(), Some("test_bad"));
        let end = entries[7].counts.unwrap();
        assert_eq!((end.tests, end.failures, end.ignores), (3, 1, 1));
        assert_eq!(entries[7].trace_id, "demo::run-1::008");
    }
}
