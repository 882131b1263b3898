//! Per-test driver and suite bracketing.

use crate::context::TestContext;
use crate::report::{self, Detail, ReportEvent};
use crate::state::{Abort, TestResult, Verdict};

/// Signature of a plain test function.
pub type TestFn = fn(&mut TestContext<'_>) -> TestResult;

/// Per-test setup and teardown hooks.
///
/// `set_up` runs before every test body; `tear_down` runs after it unless the
/// test was ignored. Evaluators may be used from either hook.
pub trait Fixture {
    fn set_up(&mut self, _ctx: &mut TestContext<'_>) -> TestResult {
        Ok(())
    }

    fn tear_down(&mut self, _ctx: &mut TestContext<'_>) -> TestResult {
        Ok(())
    }
}

/// Fixture with no hooks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFixture;

impl Fixture for NoFixture {}

impl<'a> TestContext<'a> {
    /// Starts a new suite: counters and flags are zeroed.
    pub fn begin(&mut self, test_file: &'a str) {
        log::debug!("suite {test_file} begins");
        self.state.reset(test_file);
    }

    /// Runs one test through `fixture` and returns its verdict.
    ///
    /// A failure or ignore inside `set_up` or `body` ends that stage early;
    /// the driver absorbs the abort. A passing test gets a `PASS` report at
    /// `line`, failures and ignores were already reported when they
    /// happened.
    pub fn run_test<F>(
        &mut self,
        fixture: &mut dyn Fixture,
        name: &'a str,
        line: u32,
        body: F,
    ) -> Verdict
    where
        F: FnOnce(&mut TestContext<'a>) -> TestResult,
    {
        self.state.start_test(name, line);
        log::trace!("{}:{line}: {name} starts", self.state.test_file());

        let mut outcome = fixture.set_up(self);
        if outcome.is_ok() {
            outcome = body(self);
        }
        self.absorb(outcome, line);

        if !self.state.current_ignored() {
            let outcome = fixture.tear_down(self);
            self.absorb(outcome, line);
        }

        if !self.state.is_decided() {
            self.emit(&ReportEvent {
                verdict: Verdict::Pass,
                line,
                detail: Detail::None,
                message: None,
            });
        }

        let verdict = self.state.conclude();
        self.sink.flush();
        log::debug!("{}:{line}: {name} {}", self.state.test_file(), verdict.label());
        verdict
    }

    /// Runs a plain test function without fixture hooks.
    pub fn run(&mut self, name: &'a str, line: u32, test: TestFn) -> Verdict {
        self.run_test(&mut NoFixture, name, line, |ctx| test(ctx))
    }

    /// Writes the suite summary and returns the failure count.
    pub fn end(&mut self) -> u32 {
        let counts = self.state.counts();
        report::write_summary(&mut *self.sink, counts.tests, counts.failures, counts.ignores);
        self.sink.flush();
        log::debug!(
            "suite {} ends: {} tests, {} failures, {} ignored",
            self.state.test_file(),
            counts.tests,
            counts.failures,
            counts.ignores
        );
        counts.failures
    }

    /// Makes sure a body that returned an abort on its own is still reported
    /// once on both channels.
    fn absorb(&mut self, outcome: TestResult, line: u32) {
        // An abort from an evaluator already decided the test.
        if self.state.is_decided() {
            return;
        }
        match outcome {
            Ok(()) => {}
            Err(Abort::Failed) => {
                let _ = self.fail_with(line, Detail::None, None);
            }
            Err(Abort::Ignored) => {
                let _ = self.ignore(None, line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::state::SuiteCounts;
    use crate::style::DisplayStyle;
    use crate::testing::Capture;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail_set_up: bool,
    }

    impl Fixture for Recorder {
        fn set_up(&mut self, ctx: &mut TestContext<'_>) -> TestResult {
            self.calls.push("set_up");
            if self.fail_set_up {
                ctx.fail(Some("set_up broke"), 1)?;
            }
            Ok(())
        }

        fn tear_down(&mut self, _ctx: &mut TestContext<'_>) -> TestResult {
            self.calls.push("tear_down");
            Ok(())
        }
    }

    fn passing(ctx: &mut TestContext<'_>) -> TestResult {
        ctx.assert_equal_number(4, 4, None, 10, DisplayStyle::INT)
    }

    fn failing(ctx: &mut TestContext<'_>) -> TestResult {
        ctx.assert_equal_number(5, 6, Some("sum"), 21, DisplayStyle::INT)?;
        ctx.fail(Some("unreachable"), 22)
    }

    #[test]
    fn three_test_suite_summary() {
        let mut cap = Capture::default();
        let failures = {
            let mut ctx = TestContext::new(&mut cap, "suite.c", EngineConfig::default());
            ctx.begin("suite.c");
            assert_eq!(ctx.run("test_a", 10, passing), Verdict::Pass);
            assert_eq!(ctx.run("test_b", 20, failing), Verdict::Fail);
            assert_eq!(ctx.run("test_c", 30, passing), Verdict::Pass);
            assert_eq!(
                ctx.counts(),
                SuiteCounts {
                    tests: 3,
                    failures: 1,
                    ignores: 0
                }
            );
            ctx.end()
        };
        assert_eq!(failures, 1);
        let text = cap.narrative();
        assert_eq!(
            text,
            "suite.c:10:test_a:PASS\n\
             suite.c:21:test_b:FAIL: Expected 5 Was 6. sum\n\
             suite.c:30:test_c:PASS\n\
             -----------------------\n\
             3 Tests 1 Failures 0 Ignored\n\
             FAIL\n"
        );
        assert!(!text.contains("unreachable"));
        assert_eq!(cap.structured().matches("{\n").count(), 3);
        assert_eq!(cap.flushes, 4);
    }

    #[test]
    fn ignored_test_skips_tear_down() {
        let mut cap = Capture::default();
        let mut fixture = Recorder::default();
        {
            let mut ctx = TestContext::new(&mut cap, "suite.c", EngineConfig::default());
            let verdict = ctx.run_test(&mut fixture, "test_todo", 40, |ctx| {
                ctx.ignore(Some("todo"), 41)?;
                ctx.fail(Some("after ignore"), 42)
            });
            assert_eq!(verdict, Verdict::Ignore);
            assert_eq!(ctx.counts().ignores, 1);
            assert_eq!(ctx.end(), 0);
        }
        assert_eq!(fixture.calls, ["set_up"]);
        let text = cap.narrative();
        assert!(text.starts_with("suite.c:41:test_todo:IGNORE: todo\n"));
        assert!(text.ends_with("1 Tests 0 Failures 1 Ignored\nOK\n"));
    }

    #[test]
    fn failed_test_still_tears_down() {
        let mut cap = Capture::default();
        let mut fixture = Recorder::default();
        {
            let mut ctx = TestContext::new(&mut cap, "suite.c", EngineConfig::default());
            assert_eq!(ctx.run_test(&mut fixture, "test_b", 20, failing), Verdict::Fail);
        }
        assert_eq!(fixture.calls, ["set_up", "tear_down"]);
    }

    #[test]
    fn set_up_failure_skips_body() {
        let mut cap = Capture::default();
        let mut fixture = Recorder {
            fail_set_up: true,
            ..Recorder::default()
        };
        let mut body_ran = false;
        {
            let mut ctx = TestContext::new(&mut cap, "suite.c", EngineConfig::default());
            let verdict = ctx.run_test(&mut fixture, "test_x", 5, |_| {
                body_ran = true;
                Ok(())
            });
            assert_eq!(verdict, Verdict::Fail);
        }
        assert!(!body_ran);
        assert_eq!(fixture.calls, ["set_up", "tear_down"]);
        assert_eq!(cap.narrative(), "suite.c:1:test_x:FAIL: set_up broke\n");
    }

    #[test]
    fn bare_abort_from_body_is_reported() {
        let mut cap = Capture::default();
        {
            let mut ctx = TestContext::new(&mut cap, "suite.c", EngineConfig::default());
            let verdict = ctx.run_test(&mut NoFixture, "test_raw", 7, |_| Err(Abort::Failed));
            assert_eq!(verdict, Verdict::Fail);
            assert_eq!(ctx.counts().failures, 1);
        }
        assert_eq!(cap.narrative(), "suite.c:7:test_raw:FAIL\n");
    }

    #[test]
    fn bare_ignore_from_body_is_reported() {
        let mut cap = Capture::default();
        let mut fixture = Recorder::default();
        {
            let mut ctx = TestContext::new(&mut cap, "suite.c", EngineConfig::default());
            let verdict = ctx.run_test(&mut fixture, "test_skip", 8, |_| Err(Abort::Ignored));
            assert_eq!(verdict, Verdict::Ignore);
            assert_eq!(ctx.run("test_ok", 9, passing), Verdict::Pass);
            assert_eq!(
                ctx.counts(),
                SuiteCounts {
                    tests: 2,
                    failures: 0,
                    ignores: 1
                }
            );
        }
        assert_eq!(fixture.calls, ["set_up"]);
        assert_eq!(
            cap.narrative(),
            "suite.c:8:test_skip:IGNORE\nsuite.c:9:test_ok:PASS\n"
        );
        let records = cap.structured();
        assert_eq!(records.matches("{\n").count(), 2);
        assert!(records.contains("\"functionn_name\":\"test_skip\",\n\"linenumber\":\"8\""));
        assert_eq!(records.matches("\"ignored\":\"YES\"").count(), 1);
    }

    #[test]
    fn failing_tear_down_fails_a_passing_test() {
        struct BrokenTearDown;

        impl Fixture for BrokenTearDown {
            fn tear_down(&mut self, ctx: &mut TestContext<'_>) -> TestResult {
                ctx.assert_equal_number(1, 2, Some("cleanup"), 99, DisplayStyle::INT)
            }
        }

        let mut cap = Capture::default();
        {
            let mut ctx = TestContext::new(&mut cap, "suite.c", EngineConfig::default());
            let verdict = ctx.run_test(&mut BrokenTearDown, "test_t", 50, passing);
            assert_eq!(verdict, Verdict::Fail);
            assert_eq!(ctx.counts().failures, 1);
        }
        assert_eq!(
            cap.narrative(),
            "suite.c:99:test_t:FAIL: Expected 1 Was 2. cleanup\n"
        );
        let records = cap.structured();
        assert_eq!(records.matches("{\n").count(), 1);
        assert!(records.contains("\"result\":\"Fail\""));
        assert!(!records.contains("PASS"));
    }

    #[test]
    fn flags_reset_between_tests() {
        let mut cap = Capture::default();
        let mut ctx = TestContext::new(&mut cap, "suite.c", EngineConfig::default());
        ctx.run("first", 1, failing);
        assert!(!ctx.state().is_decided());
        assert_eq!(ctx.run("second", 2, passing), Verdict::Pass);
    }

    #[test]
    fn begin_resets_counts() {
        let mut cap = Capture::default();
        let mut ctx = TestContext::new(&mut cap, "one.c", EngineConfig::default());
        ctx.run("first", 1, failing);
        ctx.begin("two.c");
        assert_eq!(ctx.counts(), SuiteCounts::default());
        assert_eq!(ctx.state().test_file(), "two.c");
    }
}
