use std::path::PathBuf;

use crate::slides::catalog::Category;

/// What happened to one slide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The output file exists and is non-empty.
    Exported {
        /// Written file (MP4, or PNG for still-only runs).
        output: PathBuf,
        /// Size of `output` in bytes.
        bytes: u64,
        /// Still frame written alongside a clip, if any.
        still: Option<PathBuf>,
        /// Frames in the clip.
        frames: u64,
    },
    /// The slide was skipped or its export failed.
    Failed {
        /// Rendered error.
        error: String,
    },
}

/// Per-slide record kept for the end-of-run summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportResult {
    /// Slide name.
    pub slide: String,
    /// Slide category.
    pub category: Category,
    /// Resolution label, e.g. `Full HD (1920x1080)`.
    pub resolution: String,
    /// Result.
    pub outcome: ExportOutcome,
}

impl ExportResult {
    /// `true` for [`ExportOutcome::Exported`].
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ExportOutcome::Exported { .. })
    }

    /// Output size, `0` on failure.
    pub fn bytes(&self) -> u64 {
        match &self.outcome {
            ExportOutcome::Exported { bytes, .. } => *bytes,
            ExportOutcome::Failed { .. } => 0,
        }
    }

    /// Error message, when failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ExportOutcome::Exported { .. } => None,
            ExportOutcome::Failed { error } => Some(error),
        }
    }
}

/// Results of a whole run, in slide order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// One entry per attempted slide.
    pub results: Vec<ExportResult>,
}

impl RunSummary {
    /// Append a result.
    pub fn push(&mut self, result: ExportResult) {
        self.results.push(result);
    }

    /// Successful exports.
    pub fn exported(&self) -> impl Iterator<Item = &ExportResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    /// Failed exports.
    pub fn failed(&self) -> impl Iterator<Item = &ExportResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Number of successful exports.
    pub fn exported_count(&self) -> usize {
        self.exported().count()
    }

    /// Number of failed exports.
    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// Sum of exported file sizes.
    pub fn total_bytes(&self) -> u64 {
        self.results.iter().map(ExportResult::bytes).sum()
    }

    /// Still frames written during the run.
    pub fn still_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    ExportOutcome::Exported {
                        still: Some(_),
                        ..
                    }
                )
            })
            .count()
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Exported {} of {} slides ({})",
            self.exported_count(),
            self.results.len(),
            format_megabytes(self.total_bytes())
        )?;
        for r in &self.results {
            match &r.outcome {
                ExportOutcome::Exported { output, bytes, .. } => writeln!(
                    f,
                    "  ok   {} -> {} ({})",
                    r.slide,
                    output.display(),
                    format_megabytes(*bytes)
                )?,
                ExportOutcome::Failed { error } => writeln!(f, "  FAIL {}: {error}", r.slide)?,
            }
        }
        Ok(())
    }
}

/// Bytes as mebibytes with one decimal, e.g. `12.3 MB`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
#[path = "../../tests/unit/export/report.rs"]
mod tests;
