//! The threshold table and the checks run against it
//!
//! A [`ThresholdTable`] holds one [`Threshold`] per [`Check`]. The table is
//! built once, from [`crate::config::Config`], and is read-only afterward.
//! Checks are always run in the order of [`Check::ALL`].

use std::fmt;

use crate::extract::{Metric, Metrics};

/// Default upper bound on p95 request latency, in milliseconds.
pub const DEFAULT_P95_LATENCY_MS: f64 = 500.0;
/// Default upper bound on the failed request percentage.
pub const DEFAULT_ERROR_RATE_PERCENT: f64 = 0.1;
/// Default lower bound on the successful request percentage.
pub const DEFAULT_SUCCESS_RATE_PERCENT: f64 = 99.9;

/// Which side of a limit is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The value must not exceed the limit.
    LowerIsBetter,
    /// The value must not fall below the limit.
    HigherIsBetter,
}

impl Direction {
    /// Whether `value` is on the acceptable side of `limit`. Equality is
    /// acceptable in both directions.
    #[must_use]
    pub fn admits(self, value: f64, limit: f64) -> bool {
        match self {
            Direction::LowerIsBetter => value <= limit,
            Direction::HigherIsBetter => value >= limit,
        }
    }

    /// The comparison symbol printed between value and limit.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Direction::LowerIsBetter => "≤",
            Direction::HigherIsBetter => "≥",
        }
    }
}

/// A numeric limit and the direction in which it binds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    /// The limit itself.
    pub limit: f64,
    /// Which side of `limit` passes.
    pub direction: Direction,
}

impl Threshold {
    /// Create a new [`Threshold`].
    #[must_use]
    pub fn new(limit: f64, direction: Direction) -> Self {
        Self { limit, direction }
    }

    /// Whether `value` passes this threshold.
    #[must_use]
    pub fn passes(&self, value: f64) -> bool {
        self.direction.admits(value, self.limit)
    }
}

/// The checks run against every result document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// 95th percentile request latency.
    P95Latency,
    /// Percentage of failed requests.
    ErrorRate,
    /// Percentage of requests that did not fail, `100 - error_rate`.
    SuccessRate,
}

impl Check {
    /// Every check, in the order they are run and reported.
    pub const ALL: [Check; 3] = [Check::P95Latency, Check::ErrorRate, Check::SuccessRate];

    /// Human-readable name of this check.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Check::P95Latency => "P95 Latency",
            Check::ErrorRate => "Error Rate",
            Check::SuccessRate => "Success Rate",
        }
    }

    /// Unit suffix of the checked value.
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Check::P95Latency => "ms",
            Check::ErrorRate | Check::SuccessRate => "%",
        }
    }

    /// The value this check compares, or `None` if its source metric was not
    /// extracted. An unmeasurable check is skipped.
    #[must_use]
    pub fn measure(self, metrics: &Metrics) -> Option<f64> {
        match self {
            Check::P95Latency => metrics.get(Metric::P95Latency),
            Check::ErrorRate => metrics.get(Metric::ErrorRate),
            Check::SuccessRate => metrics.get(Metric::ErrorRate).map(success_rate),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derive the success percentage from the error percentage.
#[must_use]
pub fn success_rate(error_rate_percent: f64) -> f64 {
    100.0 - error_rate_percent
}

/// The result of comparing one value against one threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckOutcome {
    /// The check that was run.
    pub check: Check,
    /// The compared value.
    pub value: f64,
    /// The threshold `value` was compared against.
    pub threshold: Threshold,
    /// Whether `value` passed `threshold`.
    pub passed: bool,
}

impl CheckOutcome {
    /// Compare `value` against `threshold`.
    #[must_use]
    pub fn evaluate(check: Check, value: f64, threshold: Threshold) -> Self {
        Self {
            check,
            value,
            threshold,
            passed: threshold.passes(value),
        }
    }
}

/// The limits every result document is held to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    p95_latency: Threshold,
    error_rate: Threshold,
    success_rate: Threshold,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_P95_LATENCY_MS,
            DEFAULT_ERROR_RATE_PERCENT,
            DEFAULT_SUCCESS_RATE_PERCENT,
        )
    }
}

impl ThresholdTable {
    /// Create a new [`ThresholdTable`]. Directions are fixed: latency and
    /// error rate are upper bounds, success rate is a lower bound.
    #[must_use]
    pub fn new(p95_latency_ms: f64, error_rate_percent: f64, success_rate_percent: f64) -> Self {
        Self {
            p95_latency: Threshold::new(p95_latency_ms, Direction::LowerIsBetter),
            error_rate: Threshold::new(error_rate_percent, Direction::LowerIsBetter),
            success_rate: Threshold::new(success_rate_percent, Direction::HigherIsBetter),
        }
    }

    /// The threshold for `check`.
    #[must_use]
    pub fn threshold(&self, check: Check) -> Threshold {
        match check {
            Check::P95Latency => self.p95_latency,
            Check::ErrorRate => self.error_rate,
            Check::SuccessRate => self.success_rate,
        }
    }

    /// Every check paired with its threshold, in run order.
    pub fn entries(&self) -> impl Iterator<Item = (Check, Threshold)> + '_ {
        Check::ALL
            .into_iter()
            .map(move |check| (check, self.threshold(check)))
    }

    /// Run every measurable check against `metrics`. Checks whose source
    /// metric is absent are left out of the result.
    #[must_use]
    pub fn evaluate(&self, metrics: &Metrics) -> Vec<CheckOutcome> {
        self.entries()
            .filter_map(|(check, threshold)| {
                check
                    .measure(metrics)
                    .map(|value| CheckOutcome::evaluate(check, value, threshold))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn metrics(pairs: &[(Metric, f64)]) -> Metrics {
        pairs.iter().copied().collect()
    }

    #[test]
    fn default_table_matches_published_limits() {
        let table = ThresholdTable::default();
        assert_eq!(
            table.threshold(Check::P95Latency),
            Threshold::new(500.0, Direction::LowerIsBetter)
        );
        assert_eq!(
            table.threshold(Check::ErrorRate),
            Threshold::new(0.1, Direction::LowerIsBetter)
        );
        assert_eq!(
            table.threshold(Check::SuccessRate),
            Threshold::new(99.9, Direction::HigherIsBetter)
        );
    }

    #[test]
    fn entries_are_in_run_order() {
        let checks: Vec<Check> = ThresholdTable::default()
            .entries()
            .map(|(check, _)| check)
            .collect();
        assert_eq!(checks, Check::ALL.to_vec());
    }

    #[test]
    fn success_rate_passes_just_above_limit() {
        let table = ThresholdTable::default();
        let outcomes = table.evaluate(&metrics(&[(Metric::ErrorRate, 0.05)]));
        let success = outcomes
            .iter()
            .find(|o| o.check == Check::SuccessRate)
            .expect("success rate checked");
        assert!((success.value - 99.95).abs() < 1e-9);
        assert!(success.passed);
    }

    #[test]
    fn missing_error_rate_skips_rate_checks() {
        let table = ThresholdTable::default();
        let outcomes = table.evaluate(&metrics(&[(Metric::P95Latency, 450.0)]));
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].check, Check::P95Latency);
        assert!(outcomes[0].passed);
    }

    #[test]
    fn nothing_measurable_yields_no_outcomes() {
        let table = ThresholdTable::default();
        let outcomes = table.evaluate(&metrics(&[(Metric::TotalRequests, 10.0)]));
        assert!(outcomes.is_empty());
    }

    #[test]
    fn all_fail_above_limits() {
        let table = ThresholdTable::default();
        let outcomes = table.evaluate(&metrics(&[
            (Metric::P95Latency, 600.0),
            (Metric::ErrorRate, 0.2),
        ]));
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| !o.passed));
    }

    proptest! {
        #[test]
        fn lower_is_better_passes_iff_at_most_limit(
            value in -1.0e9f64..1.0e9,
            limit in -1.0e9f64..1.0e9,
        ) {
            let threshold = Threshold::new(limit, Direction::LowerIsBetter);
            prop_assert_eq!(threshold.passes(value), value <= limit);
        }

        #[test]
        fn higher_is_better_passes_iff_at_least_limit(
            value in -1.0e9f64..1.0e9,
            limit in -1.0e9f64..1.0e9,
        ) {
            let threshold = Threshold::new(limit, Direction::HigherIsBetter);
            prop_assert_eq!(threshold.passes(value), value >= limit);
        }

        #[test]
        fn success_rate_is_complement_of_error_rate(error_rate in 0.0f64..100.0) {
            let measured = Check::SuccessRate
                .measure(&metrics(&[(Metric::ErrorRate, error_rate)]))
                .expect("error rate present");
            prop_assert_eq!(measured, 100.0 - error_rate);
        }

        #[test]
        fn outcome_matches_threshold(
            value in 0.0f64..1_000.0,
            limit in 0.0f64..1_000.0,
        ) {
            for direction in [Direction::LowerIsBetter, Direction::HigherIsBetter] {
                let threshold = Threshold::new(limit, direction);
                let outcome = CheckOutcome::evaluate(Check::P95Latency, value, threshold);
                prop_assert_eq!(outcome.passed, threshold.passes(value));
                prop_assert_eq!(outcome.value, value);
            }
        }
    }
}
