use samplescope_core::{Table, strategy_identity};

use crate::errors::SamplingError;

/// Capability shared by every sampling strategy.
///
/// `sample` returns `min(n, population.len())` rows of `population`, keeping
/// its schema. The same `random_state` always selects the same rows.
pub trait SamplingStrategy: Send + Sync {
    /// Implementation name, e.g. `UniformSampling`.
    fn name(&self) -> &'static str;

    /// Optional display alias that tells identical strategies apart.
    fn alias(&self) -> Option<&str>;

    /// Identity used as the `SamplingStrategy` key of sweep rows.
    fn identity(&self) -> String {
        strategy_identity(self.name(), self.alias())
    }

    fn sample(
        &self,
        population: &Table,
        n: usize,
        random_state: Option<u64>,
    ) -> Result<Table, SamplingError>;
}
