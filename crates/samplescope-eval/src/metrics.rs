//! Column-level statistical comparisons between a population and a sample.

use std::collections::BTreeMap;

use rand::Rng;
use samplescope_core::{ColumnData, ColumnKind};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::errors::MetricError;

/// Test statistic and p-value of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub statistic: f64,
    pub p_value: f64,
}

/// Stateless comparison of a sample column against its population column.
pub trait Metric: Send + Sync {
    /// Name used as the metric key of a comparison result.
    fn name(&self) -> &'static str;

    fn measure(
        &self,
        population: &ColumnData,
        sample: &ColumnData,
    ) -> Result<Measurement, MetricError>;
}

/// Two-sample Kolmogorov-Smirnov test for numeric columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct KolmogorovSmirnov;

impl Metric for KolmogorovSmirnov {
    fn name(&self) -> &'static str {
        "KolmogorovSmirnov"
    }

    fn measure(
        &self,
        population: &ColumnData,
        sample: &ColumnData,
    ) -> Result<Measurement, MetricError> {
        let population = numeric_values(self.name(), population, "population")?;
        let sample = numeric_values(self.name(), sample, "sample")?;

        let statistic = ks_statistic(sample, population);
        let p_value = ks_p_value(statistic, sample.len(), population.len());
        Ok(Measurement { statistic, p_value })
    }
}

/// Chi-squared test on the contingency table of category counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChiSquaredGoodnessOfFit;

impl Metric for ChiSquaredGoodnessOfFit {
    fn name(&self) -> &'static str {
        "ChiSquaredGoodnessOfFit"
    }

    fn measure(
        &self,
        population: &ColumnData,
        sample: &ColumnData,
    ) -> Result<Measurement, MetricError> {
        let population = categorical_values(self.name(), population, "population")?;
        let sample = categorical_values(self.name(), sample, "sample")?;

        let mut counts: BTreeMap<&str, [f64; 2]> = BTreeMap::new();
        for value in population {
            counts.entry(value.as_str()).or_default()[0] += 1.0;
        }
        for value in sample {
            counts.entry(value.as_str()).or_default()[1] += 1.0;
        }

        let rows = counts
            .into_values()
            .filter(|row| row[0] > 0.0 || row[1] > 0.0)
            .collect::<Vec<_>>();
        contingency_test(&rows)
    }
}

/// Baseline metric returning uniform random values in `[0, 1)`.
///
/// Ignores its inputs; only useful to exercise the metric plumbing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomValueAssignment;

impl Metric for RandomValueAssignment {
    fn name(&self) -> &'static str {
        "RandomValueAssignment"
    }

    fn measure(
        &self,
        _population: &ColumnData,
        _sample: &ColumnData,
    ) -> Result<Measurement, MetricError> {
        let mut rng = rand::rng();
        Ok(Measurement {
            statistic: rng.random::<f64>(),
            p_value: rng.random::<f64>(),
        })
    }
}

fn numeric_values<'a>(
    metric: &'static str,
    data: &'a ColumnData,
    side: &'static str,
) -> Result<&'a [f64], MetricError> {
    let values = data.as_numeric().ok_or(MetricError::KindMismatch {
        metric,
        expected: ColumnKind::Numeric,
        found: data.kind(),
    })?;
    if values.is_empty() {
        return Err(MetricError::EmptyColumn(side));
    }
    Ok(values)
}

fn categorical_values<'a>(
    metric: &'static str,
    data: &'a ColumnData,
    side: &'static str,
) -> Result<&'a [String], MetricError> {
    let values = data.as_categorical().ok_or(MetricError::KindMismatch {
        metric,
        expected: ColumnKind::Categorical,
        found: data.kind(),
    })?;
    if values.is_empty() {
        return Err(MetricError::EmptyColumn(side));
    }
    Ok(values)
}

/// Largest gap between the empirical CDFs of `a` and `b`.
fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut statistic: f64 = 0.0;

    // Step both CDFs past every copy of the next value so ties move together.
    while i < a.len() && j < b.len() {
        let value = a[i].min(b[j]);
        while i < a.len() && a[i] <= value {
            i += 1;
        }
        while j < b.len() && b[j] <= value {
            j += 1;
        }
        statistic = statistic.max((i as f64 / na - j as f64 / nb).abs());
    }

    statistic
}

/// Largest sample size for which the exact two-sample distribution is used.
pub const EXACT_KS_LIMIT: usize = 10_000;

/// Two-sided p-value of a KS statistic for samples of `n1` and `n2` values.
///
/// Exact up to [`EXACT_KS_LIMIT`], asymptotic Kolmogorov distribution above.
fn ks_p_value(statistic: f64, n1: usize, n2: usize) -> f64 {
    if statistic <= 0.0 {
        return 1.0;
    }
    if n1.max(n2) <= EXACT_KS_LIMIT {
        return ks_exact_p_value(statistic, n1, n2);
    }
    let effective = (n1 as f64 * n2 as f64 / (n1 + n2) as f64).sqrt();
    kolmogorov_sf(effective * statistic)
}

/// Probability that a uniformly random lattice path from `(0, 0)` to
/// `(m, n)` reaches `|i / m - j / n| >= statistic`.
///
/// Walks the lattice row by row carrying the probability of each point
/// reached without leaving the band; mass hitting the boundary is summed
/// directly so small p-values keep their precision.
fn ks_exact_p_value(statistic: f64, m: usize, n: usize) -> f64 {
    let g = gcd(m, n);
    let lcm = (m / g) as f64 * n as f64;
    let h = (statistic * lcm).round() as i64;
    if h <= 0 {
        return 1.0;
    }
    // |i/m - j/n| >= h/lcm  <=>  |i*n - j*m| >= h*g
    let threshold = h * g as i64;
    let (m_steps, n_steps) = (m as i64, n as i64);
    let total = (m + n) as f64;

    let mut row = vec![0.0f64; n + 1];
    let mut outside = 0.0;
    for i in 0..=m {
        for j in 0..=n {
            let mut mass = if i == 0 && j == 0 { 1.0 } else { 0.0 };
            if i > 0 {
                // row[j] still holds (i - 1, j).
                mass += row[j] * (m - i + 1) as f64 / (total - (i - 1 + j) as f64);
            }
            if j > 0 {
                mass += row[j - 1] * (n - j + 1) as f64 / (total - (i + j - 1) as f64);
            }
            if (i as i64 * n_steps - j as i64 * m_steps).abs() >= threshold {
                outside += mass;
                mass = 0.0;
            }
            row[j] = mass;
        }
    }

    outside.clamp(0.0, 1.0)
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Survival function of the Kolmogorov distribution.
fn kolmogorov_sf(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }

    let exponent = -2.0 * lambda * lambda;
    let mut sign = 2.0;
    let mut sum = 0.0;
    let mut previous: f64 = 0.0;

    for k in 1..=100u32 {
        let term = sign * (exponent * f64::from(k * k)).exp();
        sum += term;
        if term.abs() <= 1e-3 * previous || term.abs() <= 1e-8 * sum {
            return sum.clamp(0.0, 1.0);
        }
        sign = -sign;
        previous = term.abs();
    }

    // The series only fails to settle for tiny lambda, where the tail is 1.
    1.0
}

/// Pearson chi-squared test of independence on `rows` x 2 observed counts.
///
/// Applies the Yates continuity correction when there is one degree of
/// freedom. A single category has no degrees of freedom and scores 0 / 1.
fn contingency_test(rows: &[[f64; 2]]) -> Result<Measurement, MetricError> {
    if rows.len() < 2 {
        return Ok(Measurement {
            statistic: 0.0,
            p_value: 1.0,
        });
    }

    let columns = [
        rows.iter().map(|row| row[0]).sum::<f64>(),
        rows.iter().map(|row| row[1]).sum::<f64>(),
    ];
    let total = columns[0] + columns[1];
    let dof = rows.len() - 1;

    let mut statistic = 0.0;
    for row in rows {
        let row_total = row[0] + row[1];
        for (observed, column_total) in row.iter().zip(columns) {
            let expected = row_total * column_total / total;
            if expected <= 0.0 {
                return Err(MetricError::Numerical(
                    "contingency table has a zero expected frequency".to_string(),
                ));
            }
            let mut diff = (observed - expected).abs();
            if dof == 1 {
                diff = (diff - 0.5).max(0.0);
            }
            statistic += diff * diff / expected;
        }
    }

    let distribution =
        ChiSquared::new(dof as f64).map_err(|err| MetricError::Numerical(err.to_string()))?;
    let p_value = distribution.sf(statistic).clamp(0.0, 1.0);

    Ok(Measurement { statistic, p_value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kolmogorov_tail_is_monotone() {
        let values = [0.0, 0.3, 0.6, 1.0, 1.36, 2.0, 3.0]
            .iter()
            .map(|lambda| kolmogorov_sf(*lambda))
            .collect::<Vec<_>>();
        assert_eq!(values[0], 1.0);
        assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
        // 1.36 is the classic 5% critical value.
        assert!((values[4] - 0.05).abs() < 0.002);
    }

    #[test]
    fn ks_statistic_handles_ties() {
        let d = ks_statistic(&[1.0, 1.0, 2.0], &[1.0, 2.0, 2.0]);
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn exact_p_value_matches_path_count() {
        // 254 of the 495 paths from (0, 0) to (4, 8) leave the band.
        assert!((ks_exact_p_value(0.5, 4, 8) - 254.0 / 495.0).abs() < 1e-12);
        assert_eq!(gcd(12, 18), 6);
    }

    #[test]
    fn large_samples_use_the_asymptotic_tail() {
        let n = EXACT_KS_LIMIT + 1;
        let expected = kolmogorov_sf((n as f64 / 2.0).sqrt() * 0.02);
        assert_eq!(ks_p_value(0.02, n, n), expected);
    }

    #[test]
    fn single_category_has_no_degrees_of_freedom() {
        let result = contingency_test(&[[10.0, 4.0]]).expect("measure");
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }
}
