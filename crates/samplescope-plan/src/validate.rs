use std::collections::HashMap;

use samplescope_core::TableSchema;

use crate::errors::{PlanError, ValidationIssue, ValidationReport};
use crate::model::{ClusterSpec, PLAN_VERSION, StratifiedSpec, StrategySpec, SweepPlan};

/// Validated plan with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedPlan {
    pub plan: SweepPlan,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a parsed plan against the schema of the population it will sweep.
pub fn validate_plan_against_schema(plan: &SweepPlan, schema: &TableSchema) -> ValidationReport {
    let mut report = ValidationReport::default();

    validate_header(plan, &mut report);
    validate_evaluation(plan, &mut report);

    if plan.strategies.is_empty() {
        report.push(
            ValidationIssue::error("no_strategies", "/strategies", "plan has no strategies")
                .with_hint("add at least one uniform, stratified or cluster strategy"),
        );
    }

    for (idx, strategy) in plan.strategies.iter().enumerate() {
        let path = format!("/strategies/{idx}");
        match strategy {
            StrategySpec::Uniform(_) => {}
            StrategySpec::Stratified(spec) => validate_stratified(spec, &path, schema, &mut report),
            StrategySpec::Cluster(spec) => validate_cluster(spec, &path, schema, &mut report),
        }
    }

    validate_identities(plan, &mut report);

    report
}

/// Validate the plan, returning it with its warnings when no errors were found.
pub fn validate_plan(plan: SweepPlan, schema: &TableSchema) -> Result<ValidatedPlan, PlanError> {
    let report = validate_plan_against_schema(&plan, schema).into_result()?;
    Ok(ValidatedPlan {
        plan,
        warnings: report.warnings,
    })
}

fn validate_header(plan: &SweepPlan, report: &mut ValidationReport) {
    if plan.plan_version != PLAN_VERSION {
        report.push(
            ValidationIssue::warning(
                "plan_version_mismatch",
                "/plan_version",
                format!(
                    "plan_version '{}' differs from supported version '{}'",
                    plan.plan_version, PLAN_VERSION
                ),
            )
            .with_hint(format!("set plan_version to \"{PLAN_VERSION}\"")),
        );
    }

    if plan.step == 0 {
        report.push(
            ValidationIssue::error("invalid_step", "/step", "step must be a positive integer")
                .with_hint("omit step to use the default stride"),
        );
    }

    if plan.seed.is_none() {
        report.push(ValidationIssue::warning(
            "unseeded_sweep",
            "/seed",
            "no seed set; samples will differ between runs",
        ));
    }
}

fn validate_evaluation(plan: &SweepPlan, report: &mut ValidationReport) {
    if plan.evaluation.time_series_analytics {
        report.push(ValidationIssue::error(
            "unsupported_evaluation",
            "/evaluation/time_series_analytics",
            "time series analytics are not implemented",
        ));
    }
    if plan.evaluation.category_based_analytics {
        report.push(ValidationIssue::error(
            "unsupported_evaluation",
            "/evaluation/category_based_analytics",
            "category based analytics are not implemented",
        ));
    }
}

fn validate_stratified(
    spec: &StratifiedSpec,
    path: &str,
    schema: &TableSchema,
    report: &mut ValidationReport,
) {
    if spec.strata.is_empty() {
        report.push(
            ValidationIssue::error(
                "empty_strata",
                format!("{path}/strata"),
                "stratified sampling needs at least one strata column",
            )
            .with_hint("use a uniform strategy when no strata apply"),
        );
    }
    validate_columns(&spec.strata, &format!("{path}/strata"), schema, report);
}

fn validate_cluster(
    spec: &ClusterSpec,
    path: &str,
    schema: &TableSchema,
    report: &mut ValidationReport,
) {
    if spec.n_clusters == 0 {
        report.push(ValidationIssue::error(
            "invalid_n_clusters",
            format!("{path}/n_clusters"),
            "n_clusters must be a positive integer",
        ));
    }
    if spec.fields.is_empty() {
        report.push(ValidationIssue::error(
            "empty_fields",
            format!("{path}/fields"),
            "cluster sampling needs at least one feature column",
        ));
    }
    validate_columns(&spec.fields, &format!("{path}/fields"), schema, report);
}

fn validate_columns(
    columns: &[String],
    path: &str,
    schema: &TableSchema,
    report: &mut ValidationReport,
) {
    for (idx, column) in columns.iter().enumerate() {
        if !schema.contains(column) {
            report.push(
                ValidationIssue::error(
                    "unknown_column",
                    format!("{path}/{idx}"),
                    format!("column '{column}' not found in population"),
                )
                .with_hint(format!(
                    "available columns: {}",
                    schema.names().collect::<Vec<_>>().join(", ")
                )),
            );
        }
    }
}

fn validate_identities(plan: &SweepPlan, report: &mut ValidationReport) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (idx, strategy) in plan.strategies.iter().enumerate() {
        let identity = strategy.identity();
        if let Some(first) = seen.get(&identity) {
            report.push(
                ValidationIssue::warning(
                    "duplicate_identity",
                    format!("/strategies/{idx}"),
                    format!("identity '{identity}' already used by /strategies/{first}"),
                )
                .with_hint("set an alias to tell the rows apart"),
            );
        } else {
            seen.insert(identity, idx);
        }
    }
}
