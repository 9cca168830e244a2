use std::collections::BTreeMap;

use samplescope_core::{ColumnData, Table};
use tracing::info;

use crate::allocation::{Group, draw_proportional};
use crate::encoding::{LabelEncoder, MinMaxScaler};
use crate::errors::SamplingError;
use crate::kmeans::{KMeansOptions, kmeans};
use crate::rng::{derive_seed, resolve_seed, seeded_rng};
use crate::strategy::SamplingStrategy;

/// Construction options for [`ClusterSampling`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub n_clusters: usize,
    /// Feature columns the clustering runs on.
    pub fields: Vec<String>,
    /// Seed of the k-means fit.
    pub random_state: Option<u64>,
    pub alias: Option<String>,
}

impl ClusterConfig {
    pub fn new(n_clusters: usize, fields: Vec<String>) -> Self {
        Self {
            n_clusters,
            fields,
            random_state: None,
            alias: None,
        }
    }

    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Encoding fitted for one feature column.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedField {
    pub name: String,
    /// Present when the column is categorical.
    pub encoder: Option<LabelEncoder>,
    pub scaler: MinMaxScaler,
}

/// Proportional sampling within k-means clusters of the population.
///
/// Clusters are computed once by [`ClusterSampling::fit`] and reused by every
/// `sample` call; the strategy only samples the population it was fitted on.
#[derive(Debug, Clone)]
pub struct ClusterSampling {
    config: ClusterConfig,
    fields: Vec<FittedField>,
    labels: Vec<usize>,
    iterations: usize,
}

impl ClusterSampling {
    pub fn fit(population: &Table, config: ClusterConfig) -> Result<Self, SamplingError> {
        if config.n_clusters == 0 {
            return Err(SamplingError::InvalidConfig(
                "n_clusters must be a positive integer".to_string(),
            ));
        }
        if config.fields.is_empty() {
            return Err(SamplingError::InvalidConfig(
                "cluster sampling needs at least one feature column".to_string(),
            ));
        }

        let mut fields = Vec::with_capacity(config.fields.len());
        let mut features = Vec::with_capacity(config.fields.len());
        for name in &config.fields {
            let (field, scaled) = fit_field(name, population.data(name)?);
            fields.push(field);
            features.push(scaled);
        }

        let points = (0..population.len())
            .map(|row| features.iter().map(|feature| feature[row]).collect())
            .collect::<Vec<Vec<f64>>>();

        let seed = resolve_seed(config.random_state);
        let mut rng = seeded_rng(derive_seed(seed, "kmeans"));
        let fit = kmeans(&points, &KMeansOptions::new(config.n_clusters), &mut rng)?;

        let strategy = Self {
            config,
            fields,
            labels: fit.labels,
            iterations: fit.iterations,
        };
        info!(
            n_clusters = strategy.config.n_clusters,
            rows = strategy.labels.len(),
            iterations = strategy.iterations,
            inertia = fit.inertia,
            cluster_sizes = ?strategy.cluster_sizes(),
            "cluster strategy fitted"
        );

        Ok(strategy)
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn fields(&self) -> &[FittedField] {
        &self.fields
    }

    /// Cluster of every population row.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of rows per cluster, indexed by cluster label.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.config.n_clusters];
        for label in &self.labels {
            sizes[*label] += 1;
        }
        sizes
    }

    fn groups(&self) -> Vec<Group> {
        let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (row, label) in self.labels.iter().enumerate() {
            clusters.entry(*label).or_default().push(row);
        }
        clusters
            .into_iter()
            .map(|(label, rows)| Group {
                key: format!("cluster-{label}"),
                rows,
            })
            .collect()
    }
}

impl SamplingStrategy for ClusterSampling {
    fn name(&self) -> &'static str {
        "ClusterSampling"
    }

    fn alias(&self) -> Option<&str> {
        self.config.alias.as_deref()
    }

    fn sample(
        &self,
        population: &Table,
        n: usize,
        random_state: Option<u64>,
    ) -> Result<Table, SamplingError> {
        if population.len() != self.labels.len() {
            return Err(SamplingError::PopulationMismatch {
                expected: self.labels.len(),
                found: population.len(),
            });
        }

        let rows = draw_proportional(
            &self.groups(),
            population.len(),
            n,
            resolve_seed(random_state),
        );
        Ok(population.take(&rows)?)
    }
}

/// Encode (when categorical) and min-max scale one feature column.
fn fit_field(name: &str, data: &ColumnData) -> (FittedField, Vec<f64>) {
    let (encoder, raw) = match data {
        ColumnData::Numeric(values) => (None, values.clone()),
        ColumnData::Categorical(values) => {
            let encoder = LabelEncoder::fit(values);
            let codes = encoder
                .transform(values)
                .into_iter()
                .map(|code| code.unwrap_or_default())
                .collect();
            (Some(encoder), codes)
        }
    };

    let scaler = MinMaxScaler::fit(&raw);
    let scaled = scaler.transform(&raw);
    (
        FittedField {
            name: name.to_string(),
            encoder,
            scaler,
        },
        scaled,
    )
}
