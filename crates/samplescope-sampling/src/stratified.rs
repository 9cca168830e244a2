use std::collections::BTreeMap;

use samplescope_core::Table;

use crate::allocation::{Group, draw_proportional, tuple_key};
use crate::errors::SamplingError;
use crate::rng::resolve_seed;
use crate::strategy::SamplingStrategy;

/// Proportional random sampling within strata.
///
/// A stratum is one distinct combination of values across the `strata`
/// columns. Each stratum contributes rows in proportion to its share of the
/// population; rounding shortfalls are topped up from the remaining rows.
#[derive(Debug, Clone)]
pub struct StratifiedSampling {
    strata: Vec<String>,
    alias: Option<String>,
}

impl StratifiedSampling {
    pub fn new(strata: Vec<String>) -> Result<Self, SamplingError> {
        if strata.is_empty() {
            return Err(SamplingError::InvalidConfig(
                "stratified sampling needs at least one strata column".to_string(),
            ));
        }
        Ok(Self {
            strata,
            alias: None,
        })
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn strata(&self) -> &[String] {
        &self.strata
    }

    fn groups(&self, population: &Table) -> Result<Vec<Group>, SamplingError> {
        let columns = self
            .strata
            .iter()
            .map(|name| population.data(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut strata: BTreeMap<Vec<String>, Vec<usize>> = BTreeMap::new();
        for row in 0..population.len() {
            let key = columns
                .iter()
                .map(|column| column.key_at(row).unwrap_or_default())
                .collect::<Vec<_>>();
            strata.entry(key).or_default().push(row);
        }

        Ok(strata
            .into_iter()
            .map(|(values, rows)| Group {
                key: tuple_key(&values),
                rows,
            })
            .collect())
    }
}

impl SamplingStrategy for StratifiedSampling {
    fn name(&self) -> &'static str {
        "StratifiedSampling"
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
        let groups = self.groups(population)?;
        let rows = draw_proportional(&groups, population.len(), n, resolve_seed(random_state));
        Ok(population.take(&rows)?)
    }
}
