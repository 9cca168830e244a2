use std::time::Instant;

use chrono::Utc;
use samplescope_core::Table;
use samplescope_plan::{StrategySpec, SweepPlan, validate_plan};
use samplescope_sampling::{
    ClusterConfig, ClusterSampling, SamplingStrategy, StratifiedSampling, UniformSampling,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::EvalError;
use crate::model::{
    METRICS_VERSION, SweepFailure, SweepOptions, SweepReport, SweepRow, SweepTable,
};
use crate::strategy::{
    DistributionComparison, DistributionOptions, Evaluation, EvaluationStrategy,
};

/// Sample sizes of a sweep: `step, 2 * step, ...` strictly below `population_rows`.
pub fn sample_sizes(step: usize, population_rows: usize) -> Vec<usize> {
    if step == 0 {
        return Vec::new();
    }
    (step..population_rows).step_by(step).collect()
}

/// Sweeps sample sizes across sampling strategies and scores every sample.
pub struct SweepEngine<'a> {
    population: &'a Table,
    strategies: Vec<Box<dyn SamplingStrategy>>,
    evaluation: Box<dyn EvaluationStrategy>,
}

impl<'a> SweepEngine<'a> {
    pub fn new(
        population: &'a Table,
        strategies: Vec<Box<dyn SamplingStrategy>>,
        evaluation: Box<dyn EvaluationStrategy>,
    ) -> Self {
        Self {
            population,
            strategies,
            evaluation,
        }
    }

    /// Build the engine described by a plan.
    ///
    /// The plan is validated against the population schema first; cluster
    /// strategies are fitted on the population here.
    pub fn from_plan(population: &'a Table, plan: &SweepPlan) -> Result<Self, EvalError> {
        let validated = validate_plan(plan.clone(), population.schema())?;
        for issue in &validated.warnings {
            warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
        }

        let mut strategies: Vec<Box<dyn SamplingStrategy>> =
            Vec::with_capacity(plan.strategies.len());
        for spec in &plan.strategies {
            strategies.push(build_strategy(population, spec)?);
        }

        let evaluation = DistributionComparison::new(DistributionOptions::from(&plan.evaluation))?;

        info!(
            strategies = strategies.len(),
            step = plan.step,
            seed = ?plan.seed,
            "sweep engine built from plan"
        );

        Ok(Self::new(population, strategies, Box::new(evaluation)))
    }

    pub fn population(&self) -> &Table {
        self.population
    }

    /// Identities of the configured strategies, in sweep order.
    pub fn identities(&self) -> Vec<String> {
        self.strategies
            .iter()
            .map(|strategy| strategy.identity())
            .collect()
    }

    pub fn run(&self, options: &SweepOptions) -> Result<SweepReport, EvalError> {
        if options.step == 0 {
            return Err(EvalError::InvalidOptions(
                "step must be a positive integer".to_string(),
            ));
        }

        let started_at = Utc::now();
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let sizes = sample_sizes(options.step, self.population.len());

        info!(
            run_id = %run_id,
            population_rows = self.population.len(),
            strategies = self.strategies.len(),
            sample_sizes = sizes.len(),
            step = options.step,
            "sweep started"
        );

        let mut table = SweepTable::default();
        for strategy in &self.strategies {
            let identity = strategy.identity();
            for &n in &sizes {
                match self.score(strategy.as_ref(), n, options.random_state) {
                    Ok(columns) => table.push_row(SweepRow {
                        sample_size: n,
                        sampling_strategy: identity.clone(),
                        columns,
                    }),
                    Err(err) => {
                        warn!(
                            strategy = %identity,
                            sample_size = n,
                            error = %err,
                            "sweep row skipped"
                        );
                        table.push_failure(SweepFailure {
                            sample_size: n,
                            sampling_strategy: identity.clone(),
                            message: err.to_string(),
                        });
                    }
                }
            }
            debug!(strategy = %identity, "strategy swept");
        }

        let duration_ms = start.elapsed().as_millis();
        info!(
            run_id = %run_id,
            rows = table.len(),
            failures = table.failures().len(),
            duration_ms = duration_ms as u64,
            "sweep finished"
        );

        Ok(SweepReport {
            metrics_version: METRICS_VERSION.to_string(),
            run_id,
            started_at,
            population_rows: self.population.len(),
            options: options.clone(),
            strategies: self.identities(),
            duration_ms,
            table,
        })
    }

    fn score(
        &self,
        strategy: &dyn SamplingStrategy,
        n: usize,
        random_state: Option<u64>,
    ) -> Result<Evaluation, EvalError> {
        let sample = strategy.sample(self.population, n, random_state)?;
        self.evaluation.evaluate(self.population, &sample)
    }
}

fn build_strategy(
    population: &Table,
    spec: &StrategySpec,
) -> Result<Box<dyn SamplingStrategy>, EvalError> {
    let strategy: Box<dyn SamplingStrategy> = match spec {
        StrategySpec::Uniform(spec) => {
            let mut strategy = UniformSampling::new();
            if let Some(alias) = &spec.alias {
                strategy = strategy.with_alias(alias.clone());
            }
            Box::new(strategy)
        }
        StrategySpec::Stratified(spec) => {
            let mut strategy = StratifiedSampling::new(spec.strata.clone())?;
            if let Some(alias) = &spec.alias {
                strategy = strategy.with_alias(alias.clone());
            }
            Box::new(strategy)
        }
        StrategySpec::Cluster(spec) => {
            let config = ClusterConfig {
                n_clusters: spec.n_clusters,
                fields: spec.fields.clone(),
                random_state: spec.random_state,
                alias: spec.alias.clone(),
            };
            Box::new(ClusterSampling::fit(population, config)?)
        }
    };
    Ok(strategy)
}
