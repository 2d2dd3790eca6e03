//! This module controls configuration parsing from the end user. The
//! configuration sets the limits of the threshold table and nothing else.
//! Every field is optional; an absent field keeps its default limit.
use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::threshold::{
    DEFAULT_ERROR_RATE_PERCENT, DEFAULT_P95_LATENCY_MS, DEFAULT_SUCCESS_RATE_PERCENT,
    ThresholdTable,
};

/// Errors produced by [`Config`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error for a serde [`serde_yaml`].
    #[error("Failed to deserialize yaml: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    /// Error reading config file
    #[error("Failed to read config file {path:?}: {source}")]
    ReadFile {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: Box<io::Error>,
    },
    /// Error for a limit that cannot be compared against
    #[error("Invalid limit for {name}: {value}")]
    InvalidLimit {
        /// Config key of the limit
        name: &'static str,
        /// Rejected value
        value: f64,
    },
}

fn default_p95_latency_ms() -> f64 {
    DEFAULT_P95_LATENCY_MS
}

fn default_error_rate_percent() -> f64 {
    DEFAULT_ERROR_RATE_PERCENT
}

fn default_success_rate_percent() -> f64 {
    DEFAULT_SUCCESS_RATE_PERCENT
}

/// Main configuration struct for this program
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Upper bound on p95 request latency, in milliseconds.
    #[serde(default = "default_p95_latency_ms")]
    pub p95_latency_ms: f64,
    /// Upper bound on the failed request percentage.
    #[serde(default = "default_error_rate_percent")]
    pub error_rate_percent: f64,
    /// Lower bound on the successful request percentage.
    #[serde(default = "default_success_rate_percent")]
    pub success_rate_percent: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            p95_latency_ms: default_p95_latency_ms(),
            error_rate_percent: default_error_rate_percent(),
            success_rate_percent: default_success_rate_percent(),
        }
    }
}

impl Config {
    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// configuration.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        contents.parse()
    }

    /// Validate the configured limits and build the threshold table.
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is not finite, is negative, or is a
    /// percentage above 100.
    pub fn threshold_table(&self) -> Result<ThresholdTable, Error> {
        let p95_latency_ms = validate("p95_latency_ms", self.p95_latency_ms, f64::MAX)?;
        let error_rate_percent = validate("error_rate_percent", self.error_rate_percent, 100.0)?;
        let success_rate_percent =
            validate("success_rate_percent", self.success_rate_percent, 100.0)?;

        Ok(ThresholdTable::new(
            p95_latency_ms,
            error_rate_percent,
            success_rate_percent,
        ))
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(input)?)
    }
}

fn validate(name: &'static str, value: f64, max: f64) -> Result<f64, Error> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidLimit { name, value })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::threshold::{Check, Direction, Threshold};

    #[test]
    fn config_deserializes() {
        let contents = r"
p95_latency_ms: 250
error_rate_percent: 0.5
success_rate_percent: 99.5
";
        let config: Config = contents.parse().expect("valid config");
        assert_eq!(
            config,
            Config {
                p95_latency_ms: 250.0,
                error_rate_percent: 0.5,
                success_rate_percent: 99.5,
            }
        );
    }

    #[test]
    fn absent_fields_keep_defaults() {
        let config: Config = "p95_latency_ms: 800\n".parse().expect("valid config");
        assert_eq!(
            config,
            Config {
                p95_latency_ms: 800.0,
                ..Config::default()
            }
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let res = "p99_latency_ms: 900\n".parse::<Config>();
        assert!(matches!(res, Err(Error::SerdeYaml(_))));
    }

    #[test]
    fn default_config_builds_default_table() {
        let table = Config::default()
            .threshold_table()
            .expect("defaults are valid");
        assert_eq!(table, ThresholdTable::default());
    }

    #[test]
    fn table_directions_are_fixed() {
        let table = Config {
            p95_latency_ms: 250.0,
            error_rate_percent: 1.0,
            success_rate_percent: 99.0,
        }
        .threshold_table()
        .expect("valid limits");
        assert_eq!(
            table.threshold(Check::P95Latency),
            Threshold::new(250.0, Direction::LowerIsBetter)
        );
        assert_eq!(
            table.threshold(Check::SuccessRate),
            Threshold::new(99.0, Direction::HigherIsBetter)
        );
    }

    #[test]
    fn negative_limit_is_rejected() {
        let config = Config {
            p95_latency_ms: -1.0,
            ..Config::default()
        };
        assert!(matches!(
            config.threshold_table(),
            Err(Error::InvalidLimit {
                name: "p95_latency_ms",
                ..
            })
        ));
    }

    #[test]
    fn percentage_above_hundred_is_rejected() {
        let config = Config {
            success_rate_percent: 100.5,
            ..Config::default()
        };
        assert!(matches!(
            config.threshold_table(),
            Err(Error::InvalidLimit {
                name: "success_rate_percent",
                ..
            })
        ));
    }

    #[test]
    fn non_finite_limit_is_rejected() {
        let config = Config {
            error_rate_percent: f64::NAN,
            ..Config::default()
        };
        assert!(matches!(
            config.threshold_table(),
            Err(Error::InvalidLimit {
                name: "error_rate_percent",
                ..
            })
        ));
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"error_rate_percent: 0.25\n")
            .expect("write config");

        let config = Config::from_path(file.path()).expect("readable config");
        assert!((config.error_rate_percent - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn from_path_missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let res = Config::from_path(dir.path().join("loadcheck.yaml"));
        assert!(matches!(res, Err(Error::ReadFile { .. })));
    }
}
