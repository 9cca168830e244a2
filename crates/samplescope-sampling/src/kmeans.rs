//! Lloyd's k-means with k-means++ seeding.

use rand::Rng;

use crate::errors::SamplingError;

/// Options for a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansOptions {
    pub n_clusters: usize,
    /// Upper bound on Lloyd iterations.
    pub max_iter: usize,
    /// Convergence tolerance relative to the mean feature variance.
    pub tol: f64,
}

impl KMeansOptions {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
        }
    }
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub centroids: Vec<Vec<f64>>,
    /// Cluster of each input point.
    pub labels: Vec<usize>,
    pub iterations: usize,
    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,
}

/// Partition `points` into `options.n_clusters` clusters.
///
/// All points must have the same dimension. Clusters that lose every point
/// keep their previous centroid.
pub fn kmeans<R: Rng + ?Sized>(
    points: &[Vec<f64>],
    options: &KMeansOptions,
    rng: &mut R,
) -> Result<KMeansFit, SamplingError> {
    let k = options.n_clusters;
    if k == 0 {
        return Err(SamplingError::InvalidConfig(
            "n_clusters must be a positive integer".to_string(),
        ));
    }
    if k > points.len() {
        return Err(SamplingError::InvalidConfig(format!(
            "n_clusters ({k}) exceeds the number of rows ({})",
            points.len()
        )));
    }
    let dim = points[0].len();
    if points.iter().any(|point| point.len() != dim) {
        return Err(SamplingError::InvalidConfig(
            "k-means points have inconsistent dimensions".to_string(),
        ));
    }

    let threshold = options.tol * mean_variance(points, dim);
    let mut centroids = init_plus_plus(points, k, rng);
    let mut labels = assign(points, &centroids);
    let mut iterations = 0;

    while iterations < options.max_iter {
        iterations += 1;

        let updated = update_centroids(points, &labels, &centroids);
        let shift = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| squared_distance(old, new))
            .sum::<f64>();
        centroids = updated;

        let relabeled = assign(points, &centroids);
        let stable = relabeled == labels;
        labels = relabeled;

        if stable || shift <= threshold {
            break;
        }
    }

    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(point, label)| squared_distance(point, &centroids[*label]))
        .sum();

    Ok(KMeansFit {
        centroids,
        labels,
        iterations,
        inertia,
    })
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen one.
fn init_plus_plus<R: Rng + ?Sized>(points: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())].clone());

    let mut distances = points
        .iter()
        .map(|point| squared_distance(point, &centroids[0]))
        .collect::<Vec<_>>();

    while centroids.len() < k {
        let total: f64 = distances.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (idx, distance) in distances.iter().enumerate() {
                if target < *distance {
                    chosen = idx;
                    break;
                }
                target -= distance;
            }
            chosen
        } else {
            rng.random_range(0..points.len())
        };

        let centroid = points[next].clone();
        for (distance, point) in distances.iter_mut().zip(points) {
            *distance = distance.min(squared_distance(point, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|point| {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (idx, centroid) in centroids.iter().enumerate() {
                let distance = squared_distance(point, centroid);
                if distance < best_distance {
                    best = idx;
                    best_distance = distance;
                }
            }
            best
        })
        .collect()
}

fn update_centroids(points: &[Vec<f64>], labels: &[usize], previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dim = previous.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0; dim]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (point, label) in points.iter().zip(labels) {
        counts[*label] += 1;
        for (sum, value) in sums[*label].iter_mut().zip(point) {
            *sum += value;
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((sum, count), old)| {
            if count == 0 {
                old.clone()
            } else {
                sum.into_iter().map(|value| value / count as f64).collect()
            }
        })
        .collect()
}

fn mean_variance(points: &[Vec<f64>], dim: usize) -> f64 {
    if dim == 0 {
        return 0.0;
    }
    let n = points.len() as f64;
    let mut total = 0.0;
    for feature in 0..dim {
        let mean = points.iter().map(|point| point[feature]).sum::<f64>() / n;
        total += points
            .iter()
            .map(|point| (point[feature] - mean).powi(2))
            .sum::<f64>()
            / n;
    }
    total / dim as f64
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
