use thiserror::Error;

/// Errors emitted by sampling strategies.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("population has {found} row(s) but the strategy was fitted on {expected}")]
    PopulationMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Core(#[from] samplescope_core::Error),
}
