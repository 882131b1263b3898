//! Integration test: engine -> record file -> validator -> report.
//!
//! Validates that:
//! 1. A suite run through `RecordFileSink` leaves a valid record stream.
//! 2. The record reader rebuilds the engine's tallies from channel 0 alone.
//! 3. Appended runs accumulate in the same subject file.
//! 4. The lifecycle log validates line by line.
//! 5. Reports carry the SHA-256 of the record file.
//!
//! Run: cargo test -p dualtest-harness --test record_pipeline_test

use std::path::PathBuf;

use dualtest_core::{Channel, DisplayStyle, EngineConfig, Fixture, TestContext, TestResult};
use dualtest_harness::records::{RecordSummary, read_records};
use dualtest_harness::report::sha256_hex;
use dualtest_harness::sinks::record_path;
use dualtest_harness::structured_log::{LogEmitter, Outcome, validate_log_file};
use dualtest_harness::{
    CaptureSink, DualSink, HarnessError, RecordFileSink, Suite, SuiteReport, SuiteRunner,
};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "dualtest-pipeline-{tag}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}

fn adds(ctx: &mut TestContext<'_>) -> TestResult {
    ctx.assert_equal_number(4, 2 + 2, None, 30, DisplayStyle::INT)
}

fn overflows(ctx: &mut TestContext<'_>) -> TestResult {
    ctx.assert_numbers_within(1, 250, 10, Some("wrapped"), 40, DisplayStyle::UINT8)
}

fn pending(ctx: &mut TestContext<'_>) -> TestResult {
    ctx.ignore(Some("not yet"), 50)
}

fn strings(ctx: &mut TestContext<'_>) -> TestResult {
    ctx.assert_equal_string_array(
        Some(&[Some("a"), Some("b")][..]),
        Some(&[Some("a"), Some("b")][..]),
        2,
        None,
        60,
    )
}

fn suite() -> Suite {
    Suite::new("pipeline.c")
        .case("adds", 29, adds)
        .case("overflows", 39, overflows)
        .case("pending", 49, pending)
        .case("strings", 59, strings)
}

struct TornDown(u32);

impl Fixture for TornDown {
    fn tear_down(&mut self, _ctx: &mut TestContext<'_>) -> TestResult {
        self.0 += 1;
        Ok(())
    }
}

#[test]
fn record_file_reproduces_engine_tallies() {
    let dir = scratch_dir("tallies");
    let mut sink = DualSink::new(
        RecordFileSink::open(&dir, "pipeline").expect("record file opens"),
        CaptureSink::new(),
    );
    let mut fixture = TornDown(0);
    let outcome = SuiteRunner::new(EngineConfig::default())
        .run_with_fixture(&suite(), &mut fixture, &mut sink)
        .expect("suite runs");
    let (records, console) = sink.into_parts();
    let path = records.finish().expect("record file closes");
    assert_eq!(path, record_path(&dir, "pipeline"));
    assert_eq!(fixture.0, 3, "ignored test skips tear_down");

    let summary = RecordSummary::from_records(read_records(&path).expect("records validate"));
    assert_eq!(summary.counts(), outcome.counts);
    assert_eq!(summary.results[1].outcome, Outcome::Fail);
    assert_eq!(
        summary.results[1].message,
        "Values Not Within Delta 1 Expected 250 Was 10. wrapped"
    );
    assert_eq!(summary.results[3].line, 59);

    let narrative = console.text(Channel::Narrative);
    assert!(narrative.contains(
        "pipeline.c:40:overflows:FAIL: Values Not Within Delta 1 Expected 250 Was 10. wrapped\n"
    ));
    assert!(narrative.ends_with("4 Tests 1 Failures 1 Ignored\nFAIL\n"));
    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn runs_append_to_the_same_subject() {
    let dir = scratch_dir("append");
    for _ in 0..2 {
        let mut sink = RecordFileSink::open(&dir, "twice").expect("record file opens");
        SuiteRunner::new(EngineConfig::default())
            .run(&suite(), &mut sink)
            .expect("suite runs");
        sink.finish().expect("record file closes");
    }
    let records = read_records(&record_path(&dir, "twice")).expect("records validate");
    assert_eq!(records.len(), 8);
    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn lifecycle_log_file_validates() {
    let dir = scratch_dir("log");
    let log_path = dir.join("run.jsonl");
    let mut log = LogEmitter::to_file(&log_path, "pipeline", "run-7").expect("log opens");
    let mut sink = CaptureSink::new();
    SuiteRunner::new(EngineConfig::default())
        .with_log(&mut log)
        .run(&suite(), &mut sink)
        .expect("suite runs");
    drop(log);

    let (lines, errors) = validate_log_file(&log_path).expect("log readable");
    assert_eq!(lines, 2 + 2 * 4);
    assert!(errors.is_empty(), "{errors:?}");
    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn report_hashes_the_record_file() {
    let dir = scratch_dir("report");
    let mut sink = RecordFileSink::open(&dir, "hashed").expect("record file opens");
    SuiteRunner::new(EngineConfig::default())
        .run(&suite(), &mut sink)
        .expect("suite runs");
    let path = sink.finish().expect("record file closes");

    let report = SuiteReport::from_record_file(&path, Some("fixed".to_string())).expect("report");
    let bytes = std::fs::read(&path).expect("record file readable");
    assert_eq!(report.source_sha256, sha256_hex(&bytes));
    assert_eq!(report.summary.ignored, 1);
    let md = report.to_markdown();
    assert!(md.contains("| pipeline.c | pending | 50 | IGNORE | not yet |"));
    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn corrupt_record_file_is_rejected() {
    let dir = scratch_dir("corrupt");
    let path = record_path(&dir, "broken");
    std::fs::write(&path, "{\n\"filename\":\"x.c\"\n}\n").expect("write");
    let err = read_records(&path).expect_err("bad record must fail");
    assert!(matches!(err, HarnessError::RecordFormat { index: 0, .. }));
    std::fs::remove_dir_all(&dir).expect("cleanup");
}
