use std::collections::BTreeMap;

use samplescope_core::{ColumnKind, Table};
use samplescope_plan::EvaluationSpec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::EvalError;
use crate::metrics::{ChiSquaredGoodnessOfFit, KolmogorovSmirnov, Measurement, Metric};

/// Result of one metric on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricOutcome {
    Measured(Measurement),
    /// The metric could not score this column; other columns are unaffected.
    Failed { message: String },
}

impl MetricOutcome {
    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            MetricOutcome::Measured(measurement) => Some(measurement),
            MetricOutcome::Failed { .. } => None,
        }
    }
}

/// Metric name -> outcome for one column.
pub type ColumnComparison = BTreeMap<String, MetricOutcome>;

/// Column name -> comparison for one sample.
pub type Evaluation = BTreeMap<String, ColumnComparison>;

/// Capability that compares a sample against its population.
pub trait EvaluationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, population: &Table, sample: &Table) -> Result<Evaluation, EvalError>;
}

/// Flags of [`DistributionComparison`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionOptions {
    #[serde(default)]
    pub time_series_analytics: bool,
    #[serde(default)]
    pub category_based_analytics: bool,
}

impl From<&EvaluationSpec> for DistributionOptions {
    fn from(spec: &EvaluationSpec) -> Self {
        Self {
            time_series_analytics: spec.time_series_analytics,
            category_based_analytics: spec.category_based_analytics,
        }
    }
}

/// Independent per-column distribution tests.
///
/// Numeric columns are scored with [`KolmogorovSmirnov`], categorical
/// columns with [`ChiSquaredGoodnessOfFit`]. Extra metrics can be attached
/// per column kind with [`DistributionComparison::with_metric`].
pub struct DistributionComparison {
    options: DistributionOptions,
    numeric: Vec<Box<dyn Metric>>,
    categorical: Vec<Box<dyn Metric>>,
}

impl DistributionComparison {
    pub fn new(options: DistributionOptions) -> Result<Self, EvalError> {
        if options.time_series_analytics {
            return Err(EvalError::Unsupported(
                "time_series_analytics is not implemented".to_string(),
            ));
        }
        if options.category_based_analytics {
            return Err(EvalError::Unsupported(
                "category_based_analytics is not implemented".to_string(),
            ));
        }

        Ok(Self {
            options,
            numeric: vec![Box::new(KolmogorovSmirnov)],
            categorical: vec![Box::new(ChiSquaredGoodnessOfFit)],
        })
    }

    /// Also run `metric` on every column of `kind`.
    pub fn with_metric(mut self, kind: ColumnKind, metric: Box<dyn Metric>) -> Self {
        match kind {
            ColumnKind::Numeric => self.numeric.push(metric),
            ColumnKind::Categorical => self.categorical.push(metric),
        }
        self
    }

    pub fn options(&self) -> &DistributionOptions {
        &self.options
    }

    /// Metric names applied to columns of `kind`, in evaluation order.
    pub fn metric_names(&self, kind: ColumnKind) -> Vec<&'static str> {
        self.metrics(kind).iter().map(|metric| metric.name()).collect()
    }

    fn metrics(&self, kind: ColumnKind) -> &[Box<dyn Metric>] {
        match kind {
            ColumnKind::Numeric => &self.numeric,
            ColumnKind::Categorical => &self.categorical,
        }
    }
}

impl EvaluationStrategy for DistributionComparison {
    fn name(&self) -> &'static str {
        "DistributionComparison"
    }

    fn evaluate(&self, population: &Table, sample: &Table) -> Result<Evaluation, EvalError> {
        if population.schema() != sample.schema() {
            let expected = population.schema().names().collect::<Vec<_>>().join(", ");
            let found = sample.schema().names().collect::<Vec<_>>().join(", ");
            return Err(EvalError::SchemaMismatch(format!(
                "expected columns [{expected}], found [{found}]"
            )));
        }

        let mut evaluation = Evaluation::new();
        for column in population.columns() {
            let sample_data = sample.data(&column.name)?;
            let mut comparison = ColumnComparison::new();

            for metric in self.metrics(column.kind()) {
                let outcome = match metric.measure(&column.data, sample_data) {
                    Ok(measurement) => MetricOutcome::Measured(measurement),
                    Err(err) => {
                        warn!(
                            column = %column.name,
                            metric = metric.name(),
                            error = %err,
                            "metric failed"
                        );
                        MetricOutcome::Failed {
                            message: err.to_string(),
                        }
                    }
                };
                comparison.insert(metric.name().to_string(), outcome);
            }

            evaluation.insert(column.name.clone(), comparison);
        }

        Ok(evaluation)
    }
}
