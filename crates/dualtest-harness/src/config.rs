//! Environment-driven harness configuration.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `DUALTEST_RECORD_DIR` | directory for `<subject>.json` record files | `.` |
//! | `DUALTEST_FLOAT_VERBOSE` | print float values on delta failures | off |
//! | `DUALTEST_MASK_WIDTH` | bit-mask display width (8/16/32/64) | 32 |
//! | `DUALTEST_LOG` | JSONL lifecycle log path | none |

use std::path::PathBuf;

use dualtest_core::{ByteWidth, EngineConfig};

use crate::error::HarnessError;

pub const ENV_RECORD_DIR: &str = "DUALTEST_RECORD_DIR";
pub const ENV_FLOAT_VERBOSE: &str = "DUALTEST_FLOAT_VERBOSE";
pub const ENV_MASK_WIDTH: &str = "DUALTEST_MASK_WIDTH";
pub const ENV_LOG: &str = "DUALTEST_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub record_dir: PathBuf,
    pub float_verbose: bool,
    pub mask_width: ByteWidth,
    pub log_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            record_dir: PathBuf::from("."),
            float_verbose: false,
            mask_width: ByteWidth::Four,
            log_path: None,
        }
    }
}

impl HarnessConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset and empty
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(ENV_RECORD_DIR) {
            config.record_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(ENV_FLOAT_VERBOSE) {
            config.float_verbose =
                parse_bool_loose(&raw).ok_or_else(|| invalid(ENV_FLOAT_VERBOSE, &raw))?;
        }
        if let Some(raw) = get(ENV_MASK_WIDTH) {
            config.mask_width =
                parse_mask_width(&raw).ok_or_else(|| invalid(ENV_MASK_WIDTH, &raw))?;
        }
        config.log_path = get(ENV_LOG).map(PathBuf::from);
        Ok(config)
    }

    /// Engine settings derived from this config.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_float_verbose(self.float_verbose)
            .with_mask_width(self.mask_width)
    }
}

/// Accepts the usual spellings of a boolean switch (case-insensitive).
#[must_use]
pub fn parse_bool_loose(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses a mask width given in bits.
#[must_use]
pub fn parse_mask_width(raw: &str) -> Option<ByteWidth> {
    raw.trim().parse::<u32>().ok().and_then(ByteWidth::from_bits)
}

/// [`parse_mask_width`] as a command-line value parser.
pub fn mask_width_arg(raw: &str) -> Result<ByteWidth, HarnessError> {
    parse_mask_width(raw).ok_or_else(|| invalid("--mask-width", raw))
}

fn invalid(key: &str, value: &str) -> HarnessError {
    HarnessError::Config {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = HarnessConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.engine_config(), EngineConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = HarnessConfig::from_lookup(lookup(&[
            (ENV_RECORD_DIR, "out/records"),
            (ENV_FLOAT_VERBOSE, "Yes"),
            (ENV_MASK_WIDTH, "16"),
            (ENV_LOG, "run.jsonl"),
        ]))
        .unwrap();
        assert_eq!(config.record_dir, PathBuf::from("out/records"));
        assert!(config.float_verbose);
        assert_eq!(config.mask_width, ByteWidth::Two);
        assert_eq!(config.log_path, Some(PathBuf::from("run.jsonl")));
        let engine = config.engine_config();
        assert!(engine.float_verbose);
        assert_eq!(engine.mask_width, ByteWidth::Two);
    }

    #[test]
    fn empty_values_keep_defaults() {
        let config =
            HarnessConfig::from_lookup(lookup(&[(ENV_MASK_WIDTH, " "), (ENV_LOG, "")])).unwrap();
        assert_eq!(config.mask_width, ByteWidth::Four);
        assert_eq!(config.log_path, None);
    }

    #[test]
    fn rejects_bad_values() {
        let err = HarnessConfig::from_lookup(lookup(&[(ENV_MASK_WIDTH, "12")])).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Config { ref key, ref value } if key == ENV_MASK_WIDTH && value == "12"
        ));
        let err = HarnessConfig::from_lookup(lookup(&[(ENV_FLOAT_VERBOSE, "maybe")])).unwrap_err();
        assert!(err.to_string().contains(ENV_FLOAT_VERBOSE));
    }

    #[test]
    fn loose_booleans() {
        assert_eq!(parse_bool_loose("ON"), Some(true));
        assert_eq!(parse_bool_loose(" 0 "), Some(false));
        assert_eq!(parse_bool_loose("2"), None);
        assert_eq!(parse_mask_width("64"), Some(ByteWidth::Eight));
        assert_eq!(parse_mask_width("8"), Some(ByteWidth::One));
        assert_eq!(parse_mask_width("x"), None);
    }

    #[test]
    fn mask_width_arg_names_the_flag() {
        assert_eq!(mask_width_arg("32").unwrap(), ByteWidth::Four);
        let err = mask_width_arg("7").unwrap_err();
        assert_eq!(err.to_string(), "invalid value '7' for --mask-width");
    }
}
