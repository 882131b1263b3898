//! Suite reports built from a record stream.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::HarnessError;
use crate::records::{RecordSummary, read_records};
use crate::structured_log::Outcome;

/// A suite report: summary plus provenance of the record file it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Report title.
    pub title: String,
    /// Record file the report was built from.
    pub source: String,
    /// SHA-256 of the record file, lowercase hex.
    pub source_sha256: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    pub summary: RecordSummary,
}

impl SuiteReport {
    /// Reads, validates and summarizes the record file at `path`.
    pub fn from_record_file(path: &Path, timestamp: Option<String>) -> Result<Self, HarnessError> {
        let summary = RecordSummary::from_records(read_records(path)?);
        let subject = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        Ok(Self {
            title: format!("dualtest report: {subject}"),
            source: path.display().to_string(),
            source_sha256: sha256_hex(&std::fs::read(path)?),
            timestamp: timestamp.unwrap_or_else(crate::structured_log::now_utc),
            summary,
        })
    }

    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Source: `{}`\n", self.source));
        out.push_str(&format!("- SHA-256: `{}`\n", self.source_sha256));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n", self.summary.failed));
        out.push_str(&format!("- Ignored: {}\n\n", self.summary.ignored));

        out.push_str("| File | Test | Line | Status | Message |\n");
        out.push_str("|------|------|------|--------|---------|\n");
        for r in &self.summary.results {
            let status = match r.outcome {
                Outcome::Pass => "PASS",
                Outcome::Fail => "FAIL",
                Outcome::Ignore => "IGNORE",
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                r.filename,
                r.function_name,
                r.line,
                status,
                escape_cell(&r.message)
            ));
        }
        out
    }

    /// Render the report as JSON.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Path of the JSON report written next to the markdown report at `report`.
///
/// A `report` that already ends in `.json` is rejected, since the two reports
/// would share one file.
pub fn json_report_path(report: &Path) -> Result<PathBuf, HarnessError> {
    let is_json = report
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return Err(HarnessError::Config {
            key: "--report".to_string(),
            value: report.display().to_string(),
        });
    }
    Ok(report.with_extension("json"))
}

/// Lowercase hex SHA-256 of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    use std::fmt::Write;
    Sha256::digest(data)
        .iter()
        .fold(String::with_capacity(64), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
