//! Reader and validator for the structured record stream (channel 0).
//!
//! A record stream is a concatenation of JSON objects, one per reported
//! event, each holding exactly the keys of [`RECORD_KEYS`] in that order with
//! string values. Because one test produces exactly one record, the suite
//! tallies can be rebuilt from the stream alone.

use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use dualtest_core::{RECORD_KEYS, SuiteCounts};

use crate::error::HarnessError;
use crate::structured_log::Outcome;

/// One validated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub filename: String,
    pub function_name: String,
    pub line: u32,
    pub outcome: Outcome,
    pub message: String,
}

/// Object fields in document order.
struct RawRecord(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = RawRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a record object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawRecord, A::Error> {
                let mut fields = Vec::new();
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    fields.push(entry);
                }
                Ok(RawRecord(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

impl Record {
    fn from_raw(index: usize, raw: RawRecord) -> Result<Self, HarnessError> {
        let keys: Vec<&str> = raw.0.iter().map(|(key, _)| key.as_str()).collect();
        if keys != RECORD_KEYS {
            return Err(HarnessError::record(
                index,
                format!("expected keys {RECORD_KEYS:?} in order, found {keys:?}"),
            ));
        }

        let mut values = Vec::with_capacity(RECORD_KEYS.len());
        for (key, value) in raw.0 {
            match value {
                serde_json::Value::String(text) => values.push(text),
                other => {
                    return Err(HarnessError::record(
                        index,
                        format!("field '{key}' must be a string, found {other}"),
                    ));
                }
            }
        }
        let [filename, function_name, line, ignored, result, message]: [String; 6] = values
            .try_into()
            .map_err(|_| HarnessError::record(index, "wrong field count"))?;

        let line = line.parse::<u32>().map_err(|_| {
            HarnessError::record(index, format!("linenumber '{line}' is not a line number"))
        })?;
        let outcome = match (ignored.as_str(), result.as_str()) {
            ("NO", "PASS") => Outcome::Pass,
            ("NO", "Fail") => Outcome::Fail,
            ("YES", "") => Outcome::Ignore,
            _ => {
                return Err(HarnessError::record(
                    index,
                    format!("inconsistent ignored/result pair ('{ignored}', '{result}')"),
                ));
            }
        };

        Ok(Self {
            filename,
            function_name,
            line,
            outcome,
            message,
        })
    }
}

/// Parses and validates a whole record stream.
pub fn parse_records(text: &str) -> Result<Vec<Record>, HarnessError> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<RawRecord>()
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.map_err(|e| HarnessError::record(index, format!("invalid JSON: {e}")))?;
            Record::from_raw(index, raw)
        })
        .collect()
}

/// Reads and validates the record file at `path`.
pub fn read_records(path: &Path) -> Result<Vec<Record>, HarnessError> {
    let text = std::fs::read_to_string(path)?;
    parse_records(&text)
}

/// Aggregate view of a record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub results: Vec<Record>,
}

impl RecordSummary {
    #[must_use]
    pub fn from_records(results: Vec<Record>) -> Self {
        let count = |outcome: Outcome| results.iter().filter(|r| r.outcome == outcome).count();
        let passed = count(Outcome::Pass);
        let failed = count(Outcome::Fail);
        let ignored = count(Outcome::Ignore);
        Self {
            total: results.len(),
            passed,
            failed,
            ignored,
            results,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Tallies in the engine's own terms.
    #[must_use]
    pub fn counts(&self) -> SuiteCounts {
        let narrow = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        SuiteCounts {
            tests: narrow(self.total),
            failures: narrow(self.failed),
            ignores: narrow(self.ignored),
        }
    }
}
