use samplescope_core::{Column, Table};
use samplescope_eval::{
    DistributionComparison, DistributionOptions, EvalError, Field, KolmogorovSmirnov, Metric,
    SweepEngine, SweepOptions, sample_sizes,
};
use samplescope_plan::{SweepPlan, parse_plan_json, parse_plan_toml};
use samplescope_sampling::{
    ClusterConfig, ClusterSampling, SamplingError, SamplingStrategy, StratifiedSampling,
    UniformSampling,
};

fn synthetic(rows: usize) -> Table {
    let values = (0..rows)
        .map(|row| ((row * 37) % rows) as f64 * 100.0 / rows as f64)
        .collect::<Vec<_>>();
    let categories = (0..rows)
        .map(|row| match row % 10 {
            0..=4 => "A",
            5..=7 => "B",
            _ => "C",
        })
        .collect::<Vec<_>>();

    Table::new(vec![
        Column::numeric("value", values),
        Column::categorical("category", categories),
    ])
    .expect("build population")
}

fn comparison() -> Box<DistributionComparison> {
    Box::new(DistributionComparison::new(DistributionOptions::default()).expect("evaluation"))
}

fn measured(row: &samplescope_eval::SweepRow, column: &str, metric: &str) -> (f64, f64) {
    let measurement = row.columns[column][metric]
        .measurement()
        .expect("measured outcome");
    (measurement.statistic, measurement.p_value)
}

/// Fails every request above `limit` rows.
struct Capped {
    limit: usize,
}

impl SamplingStrategy for Capped {
    fn name(&self) -> &'static str {
        "CappedSampling"
    }

    fn alias(&self) -> Option<&str> {
        None
    }

    fn sample(
        &self,
        population: &Table,
        n: usize,
        random_state: Option<u64>,
    ) -> Result<Table, SamplingError> {
        if n > self.limit {
            return Err(SamplingError::InvalidConfig(format!(
                "cannot draw more than {} rows",
                self.limit
            )));
        }
        UniformSampling::new().sample(population, n, random_state)
    }
}

#[test]
fn sample_sizes_stop_below_population() {
    assert_eq!(sample_sizes(100, 500), vec![100, 200, 300, 400]);
    assert_eq!(sample_sizes(50, 200), vec![50, 100, 150]);
    assert_eq!(sample_sizes(30, 100), vec![30, 60, 90]);
    assert!(sample_sizes(50, 50).is_empty());
    assert!(sample_sizes(0, 500).is_empty());
}

#[test]
fn sweep_rows_cover_every_strategy_and_size() {
    let population = synthetic(500);
    let cluster = ClusterSampling::fit(
        &population,
        ClusterConfig::new(3, vec!["value".to_string(), "category".to_string()])
            .with_random_state(2),
    )
    .expect("cluster strategy");
    let strategies: Vec<Box<dyn SamplingStrategy>> = vec![
        Box::new(UniformSampling::new()),
        Box::new(StratifiedSampling::new(vec!["category".to_string()]).expect("stratified")),
        Box::new(cluster),
    ];
    let engine = SweepEngine::new(&population, strategies, comparison());

    let report = engine
        .run(&SweepOptions {
            step: 100,
            random_state: Some(7),
        })
        .expect("run sweep");
    let table = &report.table;
    let names = vec!["UniformSampling", "StratifiedSampling", "ClusterSampling"];

    assert_eq!(table.len(), 12);
    assert!(table.failures().is_empty());
    assert_eq!(table.strategies(), names);
    assert_eq!(report.strategies, names);
    assert_eq!(report.population_rows, 500);

    for strategy in names {
        let sizes = table
            .rows_for(strategy)
            .map(|row| row.sample_size)
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![100, 200, 300, 400]);
    }

    for row in table.rows() {
        assert_eq!(row.columns.len(), 2);
        let (statistic, p_value) = measured(row, "value", "KolmogorovSmirnov");
        assert!((0.0..=1.0).contains(&statistic));
        assert!((0.0..=1.0).contains(&p_value));
        let (statistic, p_value) = measured(row, "category", "ChiSquaredGoodnessOfFit");
        assert!(statistic >= 0.0);
        assert!((0.0..=1.0).contains(&p_value));

        for (column, comparison) in &row.columns {
            for (metric, outcome) in comparison {
                let measurement = outcome.measurement().expect("every metric measured");
                assert!(
                    measurement.statistic.is_finite() && measurement.statistic >= 0.0,
                    "{} n={} {column}.{metric} statistic {}",
                    row.sampling_strategy,
                    row.sample_size,
                    measurement.statistic
                );
                assert!(
                    (0.0..=1.0).contains(&measurement.p_value),
                    "{} n={} {column}.{metric} p-value {}",
                    row.sampling_strategy,
                    row.sample_size,
                    measurement.p_value
                );
            }
        }
    }
}

#[test]
fn same_random_state_reproduces_the_table() {
    let population = synthetic(300);
    let build = || {
        let strategies: Vec<Box<dyn SamplingStrategy>> = vec![
            Box::new(UniformSampling::new()),
            Box::new(StratifiedSampling::new(vec!["category".to_string()]).expect("stratified")),
        ];
        SweepEngine::new(&population, strategies, comparison())
    };
    let options = SweepOptions {
        step: 60,
        random_state: Some(11),
    };

    let first = build().run(&options).expect("first run");
    let second = build().run(&options).expect("second run");

    assert_eq!(first.table, second.table);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn uniform_sample_tracks_the_population_distribution() {
    let population = synthetic(1000);
    let sample = UniformSampling::new()
        .sample(&population, 200, Some(0))
        .expect("sample");

    let result = KolmogorovSmirnov
        .measure(
            population.data("value").expect("population value"),
            sample.data("value").expect("sample value"),
        )
        .expect("measure");
    assert!(result.statistic < 0.1, "KS statistic {}", result.statistic);
}

#[test]
fn stratified_sample_matches_category_frequencies() {
    let population = synthetic(1000);
    let strategies: Vec<Box<dyn SamplingStrategy>> =
        vec![Box::new(StratifiedSampling::new(vec!["category".to_string()]).expect("stratified"))];
    let engine = SweepEngine::new(&population, strategies, comparison());

    let report = engine
        .run(&SweepOptions {
            step: 100,
            random_state: Some(3),
        })
        .expect("run sweep");
    let row = report
        .table
        .get(100, "StratifiedSampling")
        .expect("n=100 row");

    let (_, p_value) = measured(row, "category", "ChiSquaredGoodnessOfFit");
    assert!(p_value > 0.9, "p-value {p_value}");
}

#[test]
fn failing_rows_are_recorded_and_skipped() {
    let population = synthetic(500);
    let fitted_elsewhere = ClusterSampling::fit(
        &synthetic(40),
        ClusterConfig::new(2, vec!["value".to_string()])
            .with_random_state(1)
            .with_alias("stale"),
    )
    .expect("cluster strategy");
    let strategies: Vec<Box<dyn SamplingStrategy>> = vec![
        Box::new(Capped { limit: 250 }),
        Box::new(fitted_elsewhere),
        Box::new(UniformSampling::new().with_alias("control")),
    ];
    let engine = SweepEngine::new(&population, strategies, comparison());

    let report = engine
        .run(&SweepOptions {
            step: 100,
            random_state: Some(5),
        })
        .expect("sweep keeps going");
    let table = &report.table;

    let capped = table
        .rows_for("CappedSampling")
        .map(|row| row.sample_size)
        .collect::<Vec<_>>();
    assert_eq!(capped, vec![100, 200]);
    assert_eq!(table.rows_for("ClusterSampling[stale]").count(), 0);
    assert_eq!(table.rows_for("UniformSampling[control]").count(), 4);

    let failures = table
        .failures()
        .iter()
        .map(|failure| (failure.sampling_strategy.as_str(), failure.sample_size))
        .collect::<Vec<_>>();
    assert_eq!(
        failures,
        vec![
            ("CappedSampling", 300),
            ("CappedSampling", 400),
            ("ClusterSampling[stale]", 100),
            ("ClusterSampling[stale]", 200),
            ("ClusterSampling[stale]", 300),
            ("ClusterSampling[stale]", 400),
        ]
    );
    assert!(table.failures()[0].message.contains("250"));
    assert!(table.failures()[2].message.contains("fitted on 40"));
}

#[test]
fn zero_step_is_rejected() {
    let population = synthetic(100);
    let strategies: Vec<Box<dyn SamplingStrategy>> = vec![Box::new(UniformSampling::new())];
    let engine = SweepEngine::new(&population, strategies, comparison());

    let err = engine
        .run(&SweepOptions {
            step: 0,
            random_state: None,
        })
        .expect_err("step 0");
    assert!(matches!(err, EvalError::InvalidOptions(_)));
}

#[test]
fn small_population_yields_an_empty_sweep() {
    let population = synthetic(40);
    let strategies: Vec<Box<dyn SamplingStrategy>> = vec![Box::new(UniformSampling::new())];
    let engine = SweepEngine::new(&population, strategies, comparison());

    let report = engine.run(&SweepOptions::default()).expect("run");
    assert!(report.table.is_empty());
    assert_eq!(report.options.step, 50);
}

#[test]
fn engine_is_built_from_a_plan() {
    let plan = parse_plan_toml(
        r#"
plan_version = "0.1"
step = 100
seed = 17

[[strategies]]
type = "uniform"

[[strategies]]
type = "stratified"
strata = ["category"]
alias = "by_category"

[[strategies]]
type = "cluster"
n_clusters = 3
fields = ["value", "category"]
random_state = 2
"#,
    )
    .expect("parse plan");
    let population = synthetic(400);

    let engine = SweepEngine::from_plan(&population, &plan).expect("build engine");
    assert_eq!(
        engine.identities(),
        vec![
            "UniformSampling",
            "StratifiedSampling[by_category]",
            "ClusterSampling"
        ]
    );

    let report = engine.run(&SweepOptions::from(&plan)).expect("run");
    assert_eq!(report.options.random_state, Some(17));
    assert_eq!(report.table.len(), 9);
    assert!(report.table.failures().is_empty());
}

#[test]
fn invalid_plans_do_not_build_an_engine() {
    let population = synthetic(100);

    let unknown_column: SweepPlan = parse_plan_json(
        r#"{"plan_version": "0.1", "strategies": [{"type": "stratified", "strata": ["region"]}]}"#,
    )
    .expect("parse plan");
    let err = SweepEngine::from_plan(&population, &unknown_column)
        .err()
        .expect("unknown strata column");
    assert!(matches!(err, EvalError::Plan(_)));

    let unsupported: SweepPlan = parse_plan_json(
        r#"{"plan_version": "0.1", "evaluation": {"time_series_analytics": true},
            "strategies": [{"type": "uniform"}]}"#,
    )
    .expect("parse plan");
    assert!(SweepEngine::from_plan(&population, &unsupported).is_err());
}

#[test]
fn series_follow_sample_size_per_column_and_strategy() {
    let population = synthetic(500);
    let strategies: Vec<Box<dyn SamplingStrategy>> = vec![
        Box::new(UniformSampling::new()),
        Box::new(StratifiedSampling::new(vec!["category".to_string()]).expect("stratified")),
    ];
    let engine = SweepEngine::new(&population, strategies, comparison());
    let report = engine
        .run(&SweepOptions {
            step: 100,
            random_state: Some(1),
        })
        .expect("run");

    let series = report.table.series("KolmogorovSmirnov", Field::PValue);
    assert_eq!(series.len(), 2);
    for line in &series {
        assert_eq!(line.column, "value");
        let sizes = line.points.iter().map(|(size, _)| *size).collect::<Vec<_>>();
        assert_eq!(sizes, vec![100, 200, 300, 400]);
        assert!(line.points.iter().all(|(_, value)| (0.0..=1.0).contains(value)));
    }
    assert_eq!(series[0].strategy, "UniformSampling");
    assert_eq!(series[1].strategy, "StratifiedSampling");

    assert!(report.table.series("Missing", Field::Statistic).is_empty());

    let charts = report
        .table
        .charts()
        .into_iter()
        .map(|chart| (chart.metric, chart.field))
        .collect::<Vec<_>>();
    assert_eq!(
        charts,
        vec![
            ("ChiSquaredGoodnessOfFit".to_string(), Field::Statistic),
            ("ChiSquaredGoodnessOfFit".to_string(), Field::PValue),
            ("KolmogorovSmirnov".to_string(), Field::Statistic),
            ("KolmogorovSmirnov".to_string(), Field::PValue),
        ]
    );
}
