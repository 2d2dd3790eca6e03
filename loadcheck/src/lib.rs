//! The loadcheck load test threshold evaluator.
//!
//! This library supports the loadcheck binary found elsewhere in this
//! project. It loads load test summaries, extracts a fixed set of metrics from
//! them, holds those metrics to a threshold table and renders the verdict.

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::pedantic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(missing_debug_implementations)]
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod evaluate;
pub mod extract;
pub mod report;
pub mod threshold;
