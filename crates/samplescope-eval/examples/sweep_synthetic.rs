use samplescope_core::{Column, Table};
use samplescope_eval::{
    DistributionComparison, DistributionOptions, SweepEngine, SweepOptions, init_stderr_logging,
    render_report,
};
use samplescope_sampling::{
    ClusterConfig, ClusterSampling, SamplingStrategy, StratifiedSampling, UniformSampling,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stderr_logging()?;

    let rows = 1000;
    let values = (0..rows)
        .map(|row| ((row * 37) % rows) as f64 / 10.0)
        .collect::<Vec<_>>();
    let categories = (0..rows)
        .map(|row| match row % 10 {
            0..=4 => "A",
            5..=7 => "B",
            _ => "C",
        })
        .collect::<Vec<_>>();
    let population = Table::new(vec![
        Column::numeric("value", values),
        Column::categorical("category", categories),
    ])?;

    let strategies: Vec<Box<dyn SamplingStrategy>> = vec![
        Box::new(UniformSampling::new()),
        Box::new(StratifiedSampling::new(vec!["category".to_string()])?),
        Box::new(ClusterSampling::fit(
            &population,
            ClusterConfig::new(3, vec!["value".to_string()]).with_random_state(0),
        )?),
    ];
    let evaluation = DistributionComparison::new(DistributionOptions::default())?;

    let engine = SweepEngine::new(&population, strategies, Box::new(evaluation));
    let report = engine.run(&SweepOptions {
        step: 200,
        random_state: Some(0),
    })?;

    println!("{}", render_report(&report));
    Ok(())
}
