use rand::seq::index;
use samplescope_core::Table;
use tracing::debug;

use crate::errors::SamplingError;
use crate::rng::{resolve_seed, seeded_rng};
use crate::strategy::SamplingStrategy;

/// Draws rows uniformly at random without replacement.
#[derive(Debug, Clone, Default)]
pub struct UniformSampling {
    alias: Option<String>,
}

impl UniformSampling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl SamplingStrategy for UniformSampling {
    fn name(&self) -> &'static str {
        "UniformSampling"
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn sample(
        &self,
        population: &Table,
        n: usize,
        random_state: Option<u64>,
    ) -> Result<Table, SamplingError> {
        let target = n.min(population.len());
        let mut rng = seeded_rng(resolve_seed(random_state));

        let mut rows = index::sample(&mut rng, population.len(), target).into_vec();
        rows.sort_unstable();
        debug!(requested = n, drawn = rows.len(), "uniform sample");

        Ok(population.take(&rows)?)
    }
}
