use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use samplescope_core::strategy_identity;

/// Current contract version for sweep plans.
pub const PLAN_VERSION: &str = "0.1";

/// Stride used between sample sizes when a plan does not set one.
pub const DEFAULT_STEP: usize = 50;

/// Declarative description of a sampling sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SweepPlan {
    /// Contract version for this plan format.
    pub plan_version: String,
    /// Stride between consecutive sample sizes.
    #[serde(default = "default_step")]
    pub step: usize,
    /// Seed passed through to every sampling call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Evaluation strategy flags.
    #[serde(default)]
    pub evaluation: EvaluationSpec,
    /// Sampling strategies to compare, in output order.
    pub strategies: Vec<StrategySpec>,
}

fn default_step() -> usize {
    DEFAULT_STEP
}

/// Flags for the distribution comparison evaluation.
///
/// Both modes are recognised but not implemented; requesting either one is a
/// validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationSpec {
    #[serde(default)]
    pub time_series_analytics: bool,
    #[serde(default)]
    pub category_based_analytics: bool,
}

/// One sampling strategy entry of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategySpec {
    /// Uniform random sampling without replacement.
    Uniform(UniformSpec),
    /// Proportional sampling within strata of categorical columns.
    Stratified(StratifiedSpec),
    /// Proportional sampling within k-means clusters.
    Cluster(ClusterSpec),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UniformSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StratifiedSpec {
    /// Columns whose value combinations define the strata.
    pub strata: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClusterSpec {
    /// Number of k-means clusters.
    pub n_clusters: usize,
    /// Feature columns to cluster on.
    pub fields: Vec<String>,
    /// Seed for the k-means fit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_state: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl StrategySpec {
    /// Name of the strategy implementation this entry builds.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            StrategySpec::Uniform(_) => "UniformSampling",
            StrategySpec::Stratified(_) => "StratifiedSampling",
            StrategySpec::Cluster(_) => "ClusterSampling",
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            StrategySpec::Uniform(spec) => spec.alias.as_deref(),
            StrategySpec::Stratified(spec) => spec.alias.as_deref(),
            StrategySpec::Cluster(spec) => spec.alias.as_deref(),
        }
    }

    /// Identity the strategy will carry in the sweep table.
    pub fn identity(&self) -> String {
        strategy_identity(self.strategy_name(), self.alias())
    }
}
