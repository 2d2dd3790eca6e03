//! Console rendering of evaluations
//!
//! The report is for humans. Its layout is not a stable interface.

use std::io::{self, Write};

use crate::{
    evaluate::FileEvaluation,
    extract::{Metric, Metrics},
    threshold::{CheckOutcome, ThresholdTable},
};

const RULE_WIDTH: usize = 60;

/// ANSI colors used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Green,
    Red,
    Blue,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Green => "\x1b[92m",
            Color::Red => "\x1b[91m",
            Color::Blue => "\x1b[94m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Renders evaluations to a writer, optionally with ANSI colors.
#[derive(Debug)]
pub struct Report<W> {
    out: W,
    colored: bool,
}

impl<W: Write> Report<W> {
    /// Create a new [`Report`] writing to `out`.
    #[must_use]
    pub fn new(out: W, colored: bool) -> Self {
        Self { out, colored }
    }

    /// Consume the report, returning the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: Color, text: &str) -> String {
        if self.colored {
            format!("{}{text}{RESET}", color.code())
        } else {
            text.to_string()
        }
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }

    /// Write the title and the threshold table.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn banner(&mut self, table: &ThresholdTable) -> io::Result<()> {
        let title = self.paint(Color::Blue, "Load Test Threshold Checker");
        writeln!(self.out, "{title}")?;
        self.rule()?;
        writeln!(self.out, "\nThresholds:")?;
        for (check, threshold) in table.entries() {
            writeln!(
                self.out,
                "  {name}: {symbol} {limit}{unit}",
                name = check.name(),
                symbol = threshold.direction.symbol(),
                limit = threshold.limit,
                unit = check.unit(),
            )?;
        }
        Ok(())
    }

    /// Write the full report for one file: the header, then either the load
    /// error, a no-metrics error, or the summary and checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn file(&mut self, evaluation: &FileEvaluation) -> io::Result<()> {
        let header = self.paint(
            Color::Blue,
            &format!("Analyzing: {}", evaluation.path.display()),
        );
        writeln!(self.out, "\n{header}")?;
        self.rule()?;

        if let Some(err) = &evaluation.load_error {
            let line = self.paint(
                Color::Red,
                &format!("Error loading {}: {err}", evaluation.path.display()),
            );
            return writeln!(self.out, "{line}");
        }

        if evaluation.metrics.is_empty() {
            let line = self.paint(Color::Red, "No metrics found in results");
            return writeln!(self.out, "{line}");
        }

        self.summary(&evaluation.metrics)?;

        let heading = self.paint(Color::Blue, "Threshold Checks:");
        writeln!(self.out, "\n{heading}")?;
        for outcome in &evaluation.checks {
            self.check(outcome)?;
        }
        Ok(())
    }

    fn summary(&mut self, metrics: &Metrics) -> io::Result<()> {
        let heading = self.paint(Color::Blue, "Summary:");
        writeln!(self.out, "\n{heading}")?;

        let value = |metric| metrics.get_or(metric, 0.0);
        writeln!(
            self.out,
            "  Total Requests: {:.0}",
            value(Metric::TotalRequests)
        )?;
        writeln!(self.out, "  RPS: {:.2}", value(Metric::RequestsPerSecond))?;
        writeln!(self.out, "  Max VUs: {:.0}", value(Metric::MaxVus))?;
        writeln!(self.out, "  Avg Latency: {:.2}ms", value(Metric::AvgLatency))?;
        writeln!(self.out, "  P95 Latency: {:.2}ms", value(Metric::P95Latency))?;
        writeln!(self.out, "  P99 Latency: {:.2}ms", value(Metric::P99Latency))?;
        writeln!(self.out, "  Error Rate: {:.2}%", value(Metric::ErrorRate))
    }

    /// Write one check line: marker, name, value, comparison, limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn check(&mut self, outcome: &CheckOutcome) -> io::Result<()> {
        let status = if outcome.passed {
            self.paint(Color::Green, "✓ PASS")
        } else {
            self.paint(Color::Red, "✗ FAIL")
        };
        writeln!(
            self.out,
            "  {status} {name}: {value:.2} {symbol} {limit:.2}",
            name = outcome.check.name(),
            value = outcome.value,
            symbol = outcome.threshold.direction.symbol(),
            limit = outcome.threshold.limit,
        )
    }

    /// Write the closing rule and the overall verdict.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn verdict(&mut self, passed: bool) -> io::Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        let line = if passed {
            self.paint(Color::Green, "✓ All tests passed thresholds!")
        } else {
            self.paint(Color::Red, "✗ Some tests failed to meet thresholds")
        };
        writeln!(self.out, "{line}")
    }
}
