//! Proportional allocation of a sample size across groups of rows.
//!
//! Each group receives `round(n * group_size / population)` rows, clamped to
//! the group size. Rounding can leave the total below `n`; the shortfall is
//! drawn uniformly from rows not yet selected (the top-up). Rounding can also
//! push the total above `n`; the excess is removed one row at a time from the
//! groups whose rounding gained the most, so a sample never grows past `n`.

use std::cmp::Ordering;

use rand::seq::index;
use tracing::debug;

use crate::rng::{derive_seed, seeded_rng};

/// Key of the top-up draw in seed derivation.
const TOP_UP_KEY: &str = "top-up";

/// Quota of a single group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupQuota {
    pub group_size: usize,
    /// Unrounded proportional share of the target.
    pub exact: f64,
    /// Rows drawn from the group before the top-up.
    pub allocated: usize,
}

/// Per-group quotas for one sampling call.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPlan {
    pub quotas: Vec<GroupQuota>,
    /// Requested size clamped to the population size.
    pub target: usize,
}

impl AllocationPlan {
    pub fn allocated(&self) -> usize {
        self.quotas.iter().map(|quota| quota.allocated).sum()
    }

    /// Rows left for the top-up pass.
    pub fn shortfall(&self) -> usize {
        self.target.saturating_sub(self.allocated())
    }
}

/// Allocate `n` rows proportionally across groups of the given sizes.
///
/// Rounding is half-to-even.
pub fn allocate(group_sizes: &[usize], n: usize) -> AllocationPlan {
    let population: usize = group_sizes.iter().sum();
    let target = n.min(population);

    let mut quotas = group_sizes
        .iter()
        .map(|&group_size| {
            let exact = if population == 0 {
                0.0
            } else {
                target as f64 * group_size as f64 / population as f64
            };
            GroupQuota {
                group_size,
                exact,
                allocated: (exact.round_ties_even() as usize).min(group_size),
            }
        })
        .collect::<Vec<_>>();

    let mut total: usize = quotas.iter().map(|quota| quota.allocated).sum();
    if total > target {
        let mut order = (0..quotas.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| {
            let gain_a = quotas[a].allocated as f64 - quotas[a].exact;
            let gain_b = quotas[b].allocated as f64 - quotas[b].exact;
            gain_b.partial_cmp(&gain_a).unwrap_or(Ordering::Equal)
        });

        while total > target {
            for &idx in &order {
                if total == target {
                    break;
                }
                if quotas[idx].allocated > 0 {
                    quotas[idx].allocated -= 1;
                    total -= 1;
                }
            }
        }
    }

    AllocationPlan { quotas, target }
}

/// Rows of the population that share one group key.
#[derive(Debug, Clone)]
pub(crate) struct Group {
    pub key: String,
    pub rows: Vec<usize>,
}

/// Draw a proportional sample across `groups`, topping up any shortfall.
///
/// Every group draw and the top-up use seeds derived from `seed`, so the
/// whole selection is reproducible from the caller's seed alone. Returns
/// population row indices in ascending order.
pub(crate) fn draw_proportional(
    groups: &[Group],
    population_rows: usize,
    n: usize,
    seed: u64,
) -> Vec<usize> {
    let sizes = groups.iter().map(|group| group.rows.len()).collect::<Vec<_>>();
    let plan = allocate(&sizes, n);

    let mut selected = vec![false; population_rows];
    let mut rows = Vec::with_capacity(plan.target);

    for (group, quota) in groups.iter().zip(&plan.quotas) {
        if quota.allocated == 0 {
            continue;
        }
        let mut rng = seeded_rng(derive_seed(seed, &group.key));
        for pick in index::sample(&mut rng, group.rows.len(), quota.allocated).into_vec() {
            let row = group.rows[pick];
            selected[row] = true;
            rows.push(row);
        }
    }

    let shortfall = plan.target.saturating_sub(rows.len());
    debug!(
        groups = groups.len(),
        target = plan.target,
        allocated = rows.len(),
        shortfall,
        "proportional allocation"
    );

    if shortfall > 0 {
        let pool = (0..population_rows)
            .filter(|row| !selected[*row])
            .collect::<Vec<_>>();
        let amount = shortfall.min(pool.len());
        let mut rng = seeded_rng(derive_seed(seed, TOP_UP_KEY));
        rows.extend(
            index::sample(&mut rng, pool.len(), amount)
                .into_vec()
                .into_iter()
                .map(|pick| pool[pick]),
        );
    }

    rows.sort_unstable();
    rows
}

/// Group key for a tuple of cell values.
pub(crate) fn tuple_key<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|value| escape_key_component(value.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

fn escape_key_component(value: &str) -> String {
    value.replace('\\', "\\\\").replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_keys_do_not_collide_on_separator() {
        assert_ne!(tuple_key(&["a|b", "c"]), tuple_key(&["a", "b|c"]));
        assert_eq!(tuple_key(&["x", "y"]), "x|y");
    }

    #[test]
    fn draw_covers_shortfall_from_unselected_rows() {
        let groups = vec![
            Group {
                key: "a".to_string(),
                rows: vec![0, 1, 2],
            },
            Group {
                key: "b".to_string(),
                rows: vec![3, 4, 5],
            },
            Group {
                key: "c".to_string(),
                rows: vec![6, 7, 8],
            },
        ];

        // 4 * 3 / 9 = 1.33 per group rounds to 1, leaving one row for the top-up.
        let rows = draw_proportional(&groups, 9, 4, 11);
        assert_eq!(rows.len(), 4);
        let mut unique = rows.clone();
        unique.dedup();
        assert_eq!(unique.len(), 4);
        assert!(rows.iter().all(|row| *row < 9));
        assert_eq!(rows, draw_proportional(&groups, 9, 4, 11));
    }
}
