//! Canonical representation of a summary document
//!
//! Only the `metrics` section of the export is modelled. Every other top-level
//! key k6 writes (`root_group`, `options`, `state`) is ignored, as is every
//! group key other than `type`, `contains` and `values`.
//!
//! Groups are read leniently. A document may carry custom metrics of any shape
//! and none of them can make the document unreadable: a group that is not an
//! object is dropped, an unrecognized `type` or `contains` reads as `None` and
//! non-numeric statistics are left out of `values`.

use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors produced when loading a [`Summary`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error reading the summary file from disk
    #[error("Failed to read summary file {path:?}: {source}")]
    ReadFile {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: Box<io::Error>,
    },
    /// Error for a serde [`serde_json`].
    #[error("Failed to deserialize summary: {0}")]
    Deserialize(#[from] serde_json::Error),
    /// The document is valid JSON but not a JSON object
    #[error("Summary document must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type found at the top level
        found: &'static str,
    },
    /// The `metrics` key is present but does not hold a JSON object
    #[error("Summary `metrics` must be a JSON object, found {found}")]
    MetricsNotAnObject {
        /// JSON type found under `metrics`
        found: &'static str,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// The kinds of metrics k6 records.
pub enum MetricKind {
    /// A monotonically increasing value.
    Counter,
    /// A point-at-time value.
    Gauge,
    /// A fraction of non-zero observations.
    Rate,
    /// A distribution of observations.
    Trend,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// What the values of a metric group measure.
pub enum ValueKind {
    /// Durations, in milliseconds.
    Time,
    /// Byte counts.
    Data,
    /// Anything else.
    Default,
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The aggregate statistics recorded for one metric group.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MetricGroup {
    /// The kind of metric this group aggregates, if recorded and recognized.
    pub kind: Option<MetricKind>,
    /// The unit class of the values, if recorded and recognized.
    pub contains: Option<ValueKind>,
    /// Statistic name to value, for instance `avg` or `p(95)`. Only numeric
    /// statistics are kept.
    pub values: FxHashMap<String, f64>,
}

impl MetricGroup {
    /// Build a group from its JSON form, `None` if `value` is not an object.
    fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let kind = object
            .get("type")
            .and_then(|kind| MetricKind::deserialize(kind).ok());
        let contains = object
            .get("contains")
            .and_then(|contains| ValueKind::deserialize(contains).ok());
        let values = object
            .get("values")
            .and_then(Value::as_object)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|(field, value)| value.as_f64().map(|v| (field.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            kind,
            contains,
            values,
        })
    }

    /// Look up a statistic, `None` if this group did not record it.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    /// Look up a statistic, falling back to `default` if this group did not
    /// record it.
    #[must_use]
    pub fn value_or(&self, field: &str, default: f64) -> f64 {
        self.value(field).unwrap_or(default)
    }
}

/// One load test run's end-of-test summary.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Summary {
    /// Metric group name to the statistics recorded for it.
    pub metrics: FxHashMap<String, MetricGroup>,
}

impl Summary {
    /// Read and parse the summary document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid summary
    /// document.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        contents.parse()
    }

    /// Build a summary from a top-level JSON object. A missing `metrics` key
    /// yields an empty summary.
    ///
    /// # Errors
    ///
    /// Returns an error if `metrics` is present but is not an object.
    pub fn from_object(document: &Map<String, Value>) -> Result<Self, Error> {
        let metrics = match document.get("metrics") {
            None => FxHashMap::default(),
            Some(Value::Object(groups)) => groups
                .iter()
                .filter_map(|(name, group)| {
                    MetricGroup::from_json(group).map(|group| (name.clone(), group))
                })
                .collect(),
            Some(other) => {
                return Err(Error::MetricsNotAnObject {
                    found: json_type(other),
                });
            }
        };
        Ok(Self { metrics })
    }

    /// Look up a metric group, `None` if the run did not record it.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&MetricGroup> {
        self.metrics.get(name)
    }

    /// Whether the document recorded no metric groups at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl FromStr for Summary {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match serde_json::from_str::<Value>(input)? {
            Value::Object(document) => Self::from_object(&document),
            other => Err(Error::NotAnObject {
                found: json_type(&other),
            }),
        }
    }
}
