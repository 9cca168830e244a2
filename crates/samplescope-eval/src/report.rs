use crate::model::SweepReport;
use crate::strategy::MetricOutcome;

/// Render a deterministic markdown report of a sweep.
pub fn render_report(report: &SweepReport) -> String {
    let mut lines = Vec::new();
    let table = &report.table;

    lines.push("# Samplescope Sweep Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", report.run_id));
    lines.push(format!("- started_at: {}", report.started_at.to_rfc3339()));
    lines.push(format!("- metrics_version: {}", report.metrics_version));
    lines.push(format!("- population_rows: {}", report.population_rows));
    lines.push(format!("- step: {}", report.options.step));
    lines.push(format!(
        "- random_state: {}",
        report
            .options
            .random_state
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.push(format!("- duration_ms: {}", report.duration_ms));
    lines.push(String::new());

    lines.push("## Strategies".to_string());
    lines.push("| strategy | rows | failures |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    for strategy in &report.strategies {
        let rows = table.rows_for(strategy).count();
        let failures = table
            .failures()
            .iter()
            .filter(|failure| &failure.sampling_strategy == strategy)
            .count();
        lines.push(format!("| {strategy} | {rows} | {failures} |"));
    }
    lines.push(String::new());

    if !table.is_empty() {
        lines.push("## Results".to_string());
        lines.push("| sample_size | strategy | column | metric | statistic | p_value |".to_string());
        lines.push("| --- | --- | --- | --- | --- | --- |".to_string());
        for row in table.rows() {
            for (column, comparison) in &row.columns {
                for (metric, outcome) in comparison {
                    let (statistic, p_value) = match outcome {
                        MetricOutcome::Measured(measurement) => (
                            format!("{:.4}", measurement.statistic),
                            format!("{:.4}", measurement.p_value),
                        ),
                        MetricOutcome::Failed { message } => {
                            (format!("failed: {message}"), "-".to_string())
                        }
                    };
                    lines.push(format!(
                        "| {} | {} | {} | {} | {} | {} |",
                        row.sample_size, row.sampling_strategy, column, metric, statistic, p_value
                    ));
                }
            }
        }
        lines.push(String::new());
    }

    if !table.failures().is_empty() {
        lines.push("## Skipped samples".to_string());
        for failure in table.failures() {
            lines.push(format!(
                "- {} n={}: {}",
                failure.sampling_strategy, failure.sample_size, failure.message
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
