//! Crate regarding load test summary documents
//!
//! A summary document is the end-of-test JSON export written by k6's
//! `handleSummary`. This crate models the subset of that document the rest of
//! the project reads: a mapping from metric group name to the aggregate
//! statistics k6 computed for that group.

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::pedantic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![allow(clippy::multiple_crate_versions)]

pub mod names;
pub mod summary;

pub use summary::{Error, MetricGroup, MetricKind, Summary, ValueKind};
