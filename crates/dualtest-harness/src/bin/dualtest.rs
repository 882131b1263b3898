//! CLI entrypoint for the dualtest harness.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use dualtest_core::ByteWidth;
use dualtest_harness::config::mask_width_arg;
use dualtest_harness::records::{RecordSummary, read_records};
use dualtest_harness::report::json_report_path;
use dualtest_harness::structured_log::LogEmitter;
use dualtest_harness::{
    ConsoleSink, DualSink, HarnessConfig, HarnessError, RecordFileSink, SuiteReport, SuiteRunner,
    self_check,
};

/// Test engine tooling for dualtest.
#[derive(Debug, Parser)]
#[command(name = "dualtest")]
#[command(about = "Dual-channel test engine harness")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the built-in self-check suite through the engine.
    SelfCheck {
        /// Record file subject (`<record-dir>/<subject>.json`).
        #[arg(long, default_value = self_check::SUBJECT)]
        subject: String,
        /// Directory for the record file (overrides DUALTEST_RECORD_DIR).
        #[arg(long)]
        record_dir: Option<PathBuf>,
        /// JSONL lifecycle log path (overrides DUALTEST_LOG).
        #[arg(long)]
        log: Option<PathBuf>,
        /// Markdown report path; a JSON report is written next to it.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Print float values on delta failures.
        #[arg(long)]
        float_verbose: bool,
        /// Bit-mask display width in bits (8, 16, 32 or 64).
        #[arg(long, value_parser = mask_width_arg)]
        mask_width: Option<ByteWidth>,
    },
    /// Validate a structured record stream and print its tallies.
    Validate {
        /// Record file path.
        #[arg(long)]
        records: PathBuf,
    },
    /// Write markdown + JSON reports for a record file.
    Summarize {
        /// Record file path.
        #[arg(long)]
        records: PathBuf,
        /// Markdown report path; the JSON report gets the `.json` extension.
        #[arg(long)]
        report: PathBuf,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::SelfCheck {
            subject,
            record_dir,
            log,
            report,
            float_verbose,
            mask_width,
        } => {
            let mut config = HarnessConfig::from_env()?;
            if let Some(dir) = record_dir {
                config.record_dir = dir;
            }
            if log.is_some() {
                config.log_path = log;
            }
            if float_verbose {
                config.float_verbose = true;
            }
            if let Some(width) = mask_width {
                config.mask_width = width;
            }

            let mut emitter = match &config.log_path {
                Some(path) => Some(LogEmitter::to_file(path, &subject, &run_id())?),
                None => None,
            };
            let mut runner = SuiteRunner::new(config.engine_config());
            if let Some(emitter) = emitter.as_mut() {
                runner = runner.with_log(emitter);
            }

            let mut sink = DualSink::new(
                RecordFileSink::open(&config.record_dir, &subject)?,
                ConsoleSink::stdout(),
            );
            let outcome = runner.run(&self_check::suite(), &mut sink)?;
            let (records, console) = sink.into_parts();
            let record_path = records.finish()?;
            console.finish()?;
            eprintln!("Records appended to {}", record_path.display());
            if let Some(path) = &config.log_path {
                eprintln!("Lifecycle log written to {}", path.display());
            }

            if let Some(report_path) = report {
                write_reports(&record_path, &report_path, None)?;
            }

            if !outcome.all_passed() {
                let failures = outcome.counts.failures;
                return Err(format!("self-check failed: {failures} failures").into());
            }
        }
        Command::Validate { records } => {
            let summary = RecordSummary::from_records(read_records(&records)?);
            println!(
                "{}: {} records, {} passed, {} failed, {} ignored",
                records.display(),
                summary.total,
                summary.passed,
                summary.failed,
                summary.ignored
            );
        }
        Command::Summarize {
            records,
            report,
            timestamp,
        } => {
            let doc = write_reports(&records, &report, timestamp)?;
            eprintln!(
                "Summary: total={}, passed={}, failed={}, ignored={}",
                doc.summary.total, doc.summary.passed, doc.summary.failed, doc.summary.ignored
            );
        }
    }

    Ok(())
}

fn write_reports(
    records: &Path,
    report_path: &Path,
    timestamp: Option<String>,
) -> Result<SuiteReport, HarnessError> {
    let json_path = json_report_path(report_path)?;
    let doc = SuiteReport::from_record_file(records, timestamp)?;
    eprintln!("Writing report to {}", report_path.display());
    std::fs::write(report_path, doc.to_markdown())?;
    std::fs::write(&json_path, doc.to_json()?)?;
    eprintln!("Wrote JSON report to {}", json_path.display());
    Ok(doc)
}

fn run_id() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("run-{secs}-{}", std::process::id())
}
