//! Well-known metric group and statistic names
//!
//! k6 names its built-in metrics and the statistics it aggregates for them
//! with fixed strings. Only the names this project reads are listed.

/// Request duration trend, in milliseconds.
pub const HTTP_REQ_DURATION: &str = "http_req_duration";
/// Fraction of requests that failed.
pub const HTTP_REQ_FAILED: &str = "http_req_failed";
/// Count of HTTP requests issued.
pub const HTTP_REQS: &str = "http_reqs";
/// Count of completed script iterations.
pub const ITERATIONS: &str = "iterations";
/// Number of concurrently active virtual users.
pub const VUS: &str = "vus";

/// Statistic names found inside a group's `values`.
pub mod field {
    /// Arithmetic mean.
    pub const AVG: &str = "avg";
    /// Minimum observed value.
    pub const MIN: &str = "min";
    /// Median.
    pub const MED: &str = "med";
    /// Maximum observed value.
    pub const MAX: &str = "max";
    /// 90th percentile.
    pub const P90: &str = "p(90)";
    /// 95th percentile.
    pub const P95: &str = "p(95)";
    /// 99th percentile.
    pub const P99: &str = "p(99)";
    /// Per-second rate for counters, true-fraction for rates.
    pub const RATE: &str = "rate";
    /// Total count.
    pub const COUNT: &str = "count";
    /// Last value of a gauge.
    pub const VALUE: &str = "value";
}
