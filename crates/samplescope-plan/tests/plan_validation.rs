use samplescope_core::{ColumnKind, ColumnSchema, TableSchema};
use samplescope_plan::{
    ClusterSpec, EvaluationSpec, PLAN_VERSION, PlanError, StratifiedSpec, StrategySpec,
    SweepPlan, UniformSpec, validate_plan, validate_plan_against_schema,
};

fn population_schema() -> TableSchema {
    TableSchema {
        columns: vec![
            ColumnSchema {
                name: "value".to_string(),
                kind: ColumnKind::Numeric,
            },
            ColumnSchema {
                name: "category".to_string(),
                kind: ColumnKind::Categorical,
            },
        ],
    }
}

fn valid_plan() -> SweepPlan {
    SweepPlan {
        plan_version: PLAN_VERSION.to_string(),
        step: 100,
        seed: Some(7),
        evaluation: EvaluationSpec::default(),
        strategies: vec![
            StrategySpec::Uniform(UniformSpec::default()),
            StrategySpec::Stratified(StratifiedSpec {
                strata: vec!["category".to_string()],
                alias: None,
            }),
            StrategySpec::Cluster(ClusterSpec {
                n_clusters: 3,
                fields: vec!["value".to_string(), "category".to_string()],
                random_state: Some(1),
                alias: Some("k3".to_string()),
            }),
        ],
    }
}

#[test]
fn valid_plan_has_no_issues() {
    let report = validate_plan_against_schema(&valid_plan(), &population_schema());
    assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty(), "unexpected warnings");
}

#[test]
fn reports_unknown_columns_with_pointer_paths() {
    let mut plan = valid_plan();
    plan.strategies[1] = StrategySpec::Stratified(StratifiedSpec {
        strata: vec!["category".to_string(), "region".to_string()],
        alias: None,
    });

    let report = validate_plan_against_schema(&plan, &population_schema());
    let issue = report
        .errors
        .iter()
        .find(|issue| issue.code == "unknown_column")
        .expect("unknown_column error");
    assert_eq!(issue.path, "/strategies/1/strata/1");
    assert!(issue.hint.as_deref().unwrap_or_default().contains("value"));
}

#[test]
fn rejects_structural_problems() {
    let mut plan = valid_plan();
    plan.step = 0;
    plan.strategies = vec![
        StrategySpec::Stratified(StratifiedSpec {
            strata: Vec::new(),
            alias: None,
        }),
        StrategySpec::Cluster(ClusterSpec {
            n_clusters: 0,
            fields: Vec::new(),
            random_state: None,
            alias: None,
        }),
    ];

    let report = validate_plan_against_schema(&plan, &population_schema());
    for code in ["invalid_step", "empty_strata", "invalid_n_clusters", "empty_fields"] {
        assert!(report.has_code(code), "missing {code}");
    }
}

#[test]
fn rejects_unsupported_evaluation_modes() {
    let mut plan = valid_plan();
    plan.evaluation = EvaluationSpec {
        time_series_analytics: true,
        category_based_analytics: true,
    };

    let report = validate_plan_against_schema(&plan, &population_schema());
    let unsupported = report
        .errors
        .iter()
        .filter(|issue| issue.code == "unsupported_evaluation")
        .count();
    assert_eq!(unsupported, 2);
}

#[test]
fn warns_on_duplicate_identity_and_missing_seed() {
    let mut plan = valid_plan();
    plan.seed = None;
    plan.strategies = vec![
        StrategySpec::Uniform(UniformSpec::default()),
        StrategySpec::Uniform(UniformSpec::default()),
        StrategySpec::Uniform(UniformSpec {
            alias: Some("b".to_string()),
        }),
    ];

    let report = validate_plan_against_schema(&plan, &population_schema());
    assert!(report.is_ok());
    assert!(report.has_code("unseeded_sweep"));
    let duplicates = report
        .warnings
        .iter()
        .filter(|issue| issue.code == "duplicate_identity")
        .collect::<Vec<_>>();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].path, "/strategies/1");
}

#[test]
fn validate_plan_returns_invalid_error() {
    let mut plan = valid_plan();
    plan.strategies.clear();

    match validate_plan(plan, &population_schema()) {
        Err(PlanError::Invalid(report)) => assert!(report.has_code("no_strategies")),
        other => panic!("expected invalid plan, got {other:?}"),
    }
}
