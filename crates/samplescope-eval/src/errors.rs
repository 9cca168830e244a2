use samplescope_core::ColumnKind;
use thiserror::Error;

/// Errors emitted by the evaluation layer and the sweep engine.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("unsupported evaluation mode: {0}")]
    Unsupported(String),
    #[error("sample schema does not match the population schema: {0}")]
    SchemaMismatch(String),
    #[error("invalid sweep options: {0}")]
    InvalidOptions(String),
    #[error("logging error: {0}")]
    Logging(String),
    #[error(transparent)]
    Sampling(#[from] samplescope_sampling::SamplingError),
    #[error(transparent)]
    Core(#[from] samplescope_core::Error),
    #[error(transparent)]
    Plan(#[from] samplescope_plan::PlanError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors of a single metric on a single column pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("{0} column is empty")]
    EmptyColumn(&'static str),
    #[error("{metric} expects {expected} values, found {found}")]
    KindMismatch {
        metric: &'static str,
        expected: ColumnKind,
        found: ColumnKind,
    },
    #[error("numerical failure: {0}")]
    Numerical(String),
}
