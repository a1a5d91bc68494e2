//! Run configuration, read from a JSON file.
//!
//! ```json
//! {
//!   "rules-file": "rules.json",
//!   "skip-known-bugs": true,
//!   "oracle-command": ["./check-layout.sh", "--browser", "firefox"],
//!   "oracle-timeout-secs": 10,
//!   "max-oracle-calls": 500,
//!   "output-dir": "generated"
//! }
//! ```
//!
//! Every key is optional.

use crate::error::{Error, Result};
use crate::reduce::ReduceOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Rule store for known-bug skipping; also where learned rules go.
    pub rules_file: Option<PathBuf>,
    pub skip_known_bugs: bool,
    /// Program and leading arguments of the external oracle.
    pub oracle_command: Vec<String>,
    pub oracle_timeout_secs: u64,
    pub max_oracle_calls: Option<usize>,
    /// Directory for materialized documents.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rules_file: None,
            skip_known_bugs: true,
            oracle_command: Vec::new(),
            oracle_timeout_secs: DEFAULT_ORACLE_TIMEOUT_SECS,
            max_oracle_calls: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Config::from_json(&text).map_err(|err| match err {
            Error::Config { message } => Error::Config { message: format!("{}: {message}", path.display()) },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).map_err(|err| Error::Config { message: err.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.oracle_timeout_secs == 0 {
            return Err(Error::Config { message: "oracle-timeout-secs must be positive".to_string() });
        }
        if self.max_oracle_calls == Some(0) {
            return Err(Error::Config { message: "max-oracle-calls must be positive".to_string() });
        }
        Ok(())
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    pub fn reduce_options(&self) -> ReduceOptions {
        ReduceOptions { max_oracle_calls: self.max_oracle_calls }
    }
}
