//! Metric extraction from summary documents
//!
//! Extraction reads a fixed list of statistics out of a fixed list of metric
//! groups. There is no discovery of other metrics: a group the run did not
//! record contributes nothing, and a statistic missing from a recorded group
//! reads as zero.

use std::fmt;

use loadcheck_summary::{
    Summary,
    names::{self, field},
};
use rustc_hash::FxHashMap;

/// The metrics extracted from a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Mean request latency, in milliseconds.
    AvgLatency,
    /// 95th percentile request latency, in milliseconds.
    P95Latency,
    /// 99th percentile request latency, in milliseconds.
    P99Latency,
    /// Maximum request latency, in milliseconds.
    MaxLatency,
    /// Failed requests, as a percentage.
    ErrorRate,
    /// Requests issued.
    TotalRequests,
    /// Requests issued per second.
    RequestsPerSecond,
    /// Script iterations completed.
    TotalIterations,
    /// Peak concurrent virtual users.
    MaxVus,
}

impl Metric {
    /// Stable snake case name of this metric.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::AvgLatency => "avg_latency",
            Metric::P95Latency => "p95_latency",
            Metric::P99Latency => "p99_latency",
            Metric::MaxLatency => "max_latency",
            Metric::ErrorRate => "error_rate",
            Metric::TotalRequests => "total_requests",
            Metric::RequestsPerSecond => "requests_per_second",
            Metric::TotalIterations => "total_iterations",
            Metric::MaxVus => "max_vus",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a [`Metric`] comes from and how it is scaled.
struct Source {
    group: &'static str,
    field: &'static str,
    metric: Metric,
    scale: f64,
}

const SOURCES: [Source; 9] = [
    Source {
        group: names::HTTP_REQ_DURATION,
        field: field::AVG,
        metric: Metric::AvgLatency,
        scale: 1.0,
    },
    Source {
        group: names::HTTP_REQ_DURATION,
        field: field::P95,
        metric: Metric::P95Latency,
        scale: 1.0,
    },
    Source {
        group: names::HTTP_REQ_DURATION,
        field: field::P99,
        metric: Metric::P99Latency,
        scale: 1.0,
    },
    Source {
        group: names::HTTP_REQ_DURATION,
        field: field::MAX,
        metric: Metric::MaxLatency,
        scale: 1.0,
    },
    // k6 records the failed fraction in [0, 1]
    Source {
        group: names::HTTP_REQ_FAILED,
        field: field::RATE,
        metric: Metric::ErrorRate,
        scale: 100.0,
    },
    Source {
        group: names::HTTP_REQS,
        field: field::COUNT,
        metric: Metric::TotalRequests,
        scale: 1.0,
    },
    Source {
        group: names::HTTP_REQS,
        field: field::RATE,
        metric: Metric::RequestsPerSecond,
        scale: 1.0,
    },
    Source {
        group: names::ITERATIONS,
        field: field::COUNT,
        metric: Metric::TotalIterations,
        scale: 1.0,
    },
    Source {
        group: names::VUS,
        field: field::MAX,
        metric: Metric::MaxVus,
        scale: 1.0,
    },
];

/// Extracted metric values. A metric is absent if its group was absent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Metrics {
    inner: FxHashMap<Metric, f64>,
}

impl Metrics {
    /// Look up a metric, `None` if it was not extracted.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.inner.get(&metric).copied()
    }

    /// Look up a metric, falling back to `default` if it was not extracted.
    #[must_use]
    pub fn get_or(&self, metric: Metric, default: f64) -> f64 {
        self.get(metric).unwrap_or(default)
    }

    /// Record a metric value, replacing any previous one.
    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.inner.insert(metric, value);
    }

    /// Whether no metric was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of extracted metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl FromIterator<(Metric, f64)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Extract the known metrics from `summary`.
#[must_use]
pub fn extract(summary: &Summary) -> Metrics {
    SOURCES
        .iter()
        .filter_map(|source| {
            summary
                .group(source.group)
                .map(|group| (source.metric, group.value_or(source.field, 0.0) * source.scale))
        })
        .collect()
}
