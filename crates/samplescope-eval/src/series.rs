//! Plot-ready views of a sweep table.
//!
//! A chart is one `(metric, field)` pair; its lines are the
//! `(column, strategy)` series plotted against sample size.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::metrics::Measurement;
use crate::model::SweepTable;

/// Measurement field plotted on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Statistic,
    PValue,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Statistic => "statistic",
            Field::PValue => "p_value",
        }
    }

    pub fn value(&self, measurement: &Measurement) -> f64 {
        match self {
            Field::Statistic => measurement.statistic,
            Field::PValue => measurement.p_value,
        }
    }
}

/// One plotted line: `(sample_size, value)` points in sweep order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub column: String,
    pub strategy: String,
    pub points: Vec<(usize, f64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Chart {
    pub metric: String,
    pub field: Field,
}

impl SweepTable {
    /// Series of `metric`'s `field` for every column and strategy that has it.
    ///
    /// Failed outcomes leave a gap in their series.
    pub fn series(&self, metric: &str, field: Field) -> Vec<Series> {
        let mut series: Vec<Series> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for row in self.rows() {
            for (column, comparison) in &row.columns {
                let Some(measurement) = comparison
                    .get(metric)
                    .and_then(|outcome| outcome.measurement())
                else {
                    continue;
                };

                let key = (column.clone(), row.sampling_strategy.clone());
                let slot = *index.entry(key).or_insert_with(|| {
                    series.push(Series {
                        column: column.clone(),
                        strategy: row.sampling_strategy.clone(),
                        points: Vec::new(),
                    });
                    series.len() - 1
                });
                series[slot]
                    .points
                    .push((row.sample_size, field.value(measurement)));
            }
        }

        series
    }

    /// Every `(metric, field)` chart with at least one measured point.
    pub fn charts(&self) -> Vec<Chart> {
        let metrics = self
            .rows()
            .iter()
            .flat_map(|row| row.columns.values())
            .flat_map(|comparison| comparison.iter())
            .filter(|(_, outcome)| outcome.measurement().is_some())
            .map(|(metric, _)| metric.clone())
            .collect::<BTreeSet<_>>();

        metrics
            .into_iter()
            .flat_map(|metric| {
                [Field::Statistic, Field::PValue].map(|field| Chart {
                    metric: metric.clone(),
                    field,
                })
            })
            .collect()
    }
}
