//! Evaluation of result documents against the threshold table
//!
//! A result document that cannot be read or parsed is not an error for the
//! batch: it is evaluated as an empty document and fails on its own.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use loadcheck_summary::Summary;
use tracing::{debug, warn};

use crate::{
    extract::{self, Metrics},
    report::Report,
    threshold::{CheckOutcome, ThresholdTable},
};

/// The evaluation of a single result document.
#[derive(Debug)]
pub struct FileEvaluation {
    /// Path of the evaluated document.
    pub path: PathBuf,
    /// Why the document could not be loaded, if it could not.
    pub load_error: Option<loadcheck_summary::Error>,
    /// Metrics extracted from the document.
    pub metrics: Metrics,
    /// Outcomes of the checks that could be run, in run order.
    pub checks: Vec<CheckOutcome>,
}

impl FileEvaluation {
    /// Evaluate an already loaded summary.
    #[must_use]
    pub fn from_summary(path: PathBuf, summary: &Summary, table: &ThresholdTable) -> Self {
        let metrics = extract::extract(summary);
        let checks = if metrics.is_empty() {
            Vec::new()
        } else {
            table.evaluate(&metrics)
        };
        debug!(
            "Extracted {count} metrics from {path}, ran {checks} checks",
            count = metrics.len(),
            path = path.display(),
            checks = checks.len(),
        );
        Self {
            path,
            load_error: None,
            metrics,
            checks,
        }
    }

    /// A document with no metrics fails. Otherwise the document passes iff
    /// every check that could be run passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.metrics.is_empty() && self.checks.iter().all(|outcome| outcome.passed)
    }
}

/// Load the document at `path` and evaluate it against `table`.
#[must_use]
pub fn evaluate_file(path: &Path, table: &ThresholdTable) -> FileEvaluation {
    match Summary::from_path(path) {
        Ok(summary) => FileEvaluation::from_summary(path.to_path_buf(), &summary, table),
        Err(err) => {
            warn!("Could not load {path}: {err}", path = path.display());
            FileEvaluation {
                load_error: Some(err),
                ..FileEvaluation::from_summary(path.to_path_buf(), &Summary::default(), table)
            }
        }
    }
}

/// Evaluate every path in order, rendering each to `report`, and return
/// whether all of them passed. A failing file does not stop later files from
/// being evaluated.
///
/// # Errors
///
/// Returns an error only if writing the report fails.
pub fn run<P, W>(paths: &[P], table: &ThresholdTable, report: &mut Report<W>) -> io::Result<bool>
where
    P: AsRef<Path>,
    W: Write,
{
    report.banner(table)?;

    let mut all_passed = true;
    for path in paths {
        let evaluation = evaluate_file(path.as_ref(), table);
        report.file(&evaluation)?;
        all_passed &= evaluation.passed();
    }

    report.verdict(all_passed)?;
    Ok(all_passed)
}
