//! Sampling strategies that draw representative subsets of a population table.
//!
//! Every strategy implements [`SamplingStrategy`]: given the population and a
//! target size it returns a row subset with the same schema, reproducible for
//! a fixed seed. Stratified and cluster sampling share the proportional
//! allocation in [`allocation`].

pub mod allocation;
pub mod cluster;
pub mod encoding;
pub mod errors;
pub mod kmeans;
pub mod rng;
pub mod strategy;
pub mod stratified;
pub mod uniform;

pub use allocation::{AllocationPlan, GroupQuota, allocate};
pub use cluster::{ClusterConfig, ClusterSampling, FittedField};
pub use encoding::{LabelEncoder, MinMaxScaler};
pub use errors::SamplingError;
pub use kmeans::{KMeansFit, KMeansOptions, kmeans};
pub use strategy::SamplingStrategy;
pub use stratified::StratifiedSampling;
pub use uniform::UniformSampling;
