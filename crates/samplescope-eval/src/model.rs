use chrono::{DateTime, Utc};
use samplescope_plan::{DEFAULT_STEP, SweepPlan};
use serde::{Deserialize, Serialize};

use crate::strategy::Evaluation;

/// Contract version of serialized sweep reports.
pub const METRICS_VERSION: &str = "0.1";

/// Options of a single sweep run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Stride between sample sizes; must be positive.
    pub step: usize,
    /// Seed handed to every sampling call. `None` draws fresh seeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_state: Option<u64>,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            random_state: None,
        }
    }
}

impl From<&SweepPlan> for SweepOptions {
    fn from(plan: &SweepPlan) -> Self {
        Self {
            step: plan.step,
            random_state: plan.seed,
        }
    }
}

/// One evaluated sample of the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    #[serde(rename = "SampleSize")]
    pub sample_size: usize,
    #[serde(rename = "SamplingStrategy")]
    pub sampling_strategy: String,
    pub columns: Evaluation,
}

/// A `(strategy, size)` pair that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    pub sample_size: usize,
    pub sampling_strategy: String,
    pub message: String,
}

/// Sweep results keyed by sample size and strategy identity.
///
/// Rows are kept in sweep order: strategy order first, then ascending size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepTable {
    rows: Vec<SweepRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    failures: Vec<SweepFailure>,
}

impl SweepTable {
    pub(crate) fn push_row(&mut self, row: SweepRow) {
        self.rows.push(row);
    }

    pub(crate) fn push_failure(&mut self, failure: SweepFailure) {
        self.failures.push(failure);
    }

    pub fn rows(&self) -> &[SweepRow] {
        &self.rows
    }

    pub fn failures(&self) -> &[SweepFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for the given key, if it was evaluated.
    pub fn get(&self, sample_size: usize, strategy: &str) -> Option<&SweepRow> {
        self.rows
            .iter()
            .find(|row| row.sample_size == sample_size && row.sampling_strategy == strategy)
    }

    pub fn rows_for<'a>(&'a self, strategy: &'a str) -> impl Iterator<Item = &'a SweepRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.sampling_strategy == strategy)
    }

    /// Strategy identities in first-seen order.
    pub fn strategies(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.sampling_strategy.as_str()) {
                seen.push(row.sampling_strategy.as_str());
            }
        }
        seen
    }
}

/// Outcome of [`crate::SweepEngine::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub metrics_version: String,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub population_rows: usize,
    pub options: SweepOptions,
    /// Strategy identities in sweep order.
    pub strategies: Vec<String>,
    pub duration_ms: u128,
    pub table: SweepTable,
}
