//! Sampling sweeps and their statistical evaluation.
//!
//! [`SweepEngine`] draws samples of increasing size from each configured
//! [`samplescope_sampling::SamplingStrategy`], scores every sample against
//! the population with an [`EvaluationStrategy`], and collects the scores in
//! a [`SweepTable`].

pub mod engine;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod output;
pub mod report;
pub mod series;
pub mod strategy;

pub use engine::{SweepEngine, sample_sizes};
pub use errors::{EvalError, MetricError};
pub use logging::{init_run_logging, init_stderr_logging};
pub use metrics::{
    ChiSquaredGoodnessOfFit, EXACT_KS_LIMIT, KolmogorovSmirnov, Measurement, Metric,
    RandomValueAssignment,
};
pub use model::{METRICS_VERSION, SweepFailure, SweepOptions, SweepReport, SweepRow, SweepTable};
pub use output::{SweepOutputs, write_sweep_csv, write_sweep_outputs};
pub use report::render_report;
pub use series::{Chart, Field, Series};
pub use strategy::{
    ColumnComparison, DistributionComparison, DistributionOptions, Evaluation,
    EvaluationStrategy, MetricOutcome,
};
