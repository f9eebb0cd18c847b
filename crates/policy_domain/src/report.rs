use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{EvaluationResult, Status};

/// Verdict counts for a run. `Error` verdicts are tallied under `fail`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub pass: usize,
    pub partial: usize,
    pub fail: usize,
}

impl Summary {
    pub fn record(&mut self, status: Status) {
        if status.is_failure() {
            self.fail += 1;
        } else if status == Status::Partial {
            self.partial += 1;
        } else {
            self.pass += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.partial + self.fail
    }

    /// Integer percentage of passing cases, rounded down.
    pub fn score_percent(&self) -> usize {
        match self.total() {
            0 => 0,
            total => 100 * self.pass / total,
        }
    }
}

/// Aggregate of one run over a catalog: one result per case, in id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: Summary,
    pub results: Vec<EvaluationResult>,
}

impl RunReport {
    pub fn push(&mut self, result: EvaluationResult) {
        self.summary.record(result.status);
        self.results.push(result);
    }

    /// Writes the report as pretty-printed JSON, creating parent directories
    /// as needed.
    pub fn write_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;

        tracing::debug!(path = %path.display(), results = self.results.len(), "Report written");
        Ok(())
    }
}
