//! Gaussian kernel density estimation.

use ordered_float::OrderedFloat;

/// Grid points evaluated per curve.
pub const DEFAULT_GRID_SIZE: usize = 200;
/// Bandwidths the support extends past the sample extremes.
pub const DEFAULT_CUT: f64 = 3.0;

const INV_SQRT_TWO_PI: f64 = 0.398_942_280_401_432_7;

/// Sampled density curve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DensityCurve {
    pub xs: Vec<f64>,
    pub densities: Vec<f64>,
    pub bandwidth: f64,
}

impl DensityCurve {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn max_density(&self) -> f64 {
        self.densities
            .iter()
            .copied()
            .map(OrderedFloat)
            .max()
            .map_or(0.0, |value| value.0)
    }
}

/// Drops NaN and infinite samples.
#[must_use]
pub fn finite_samples(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|value| value.is_finite()).collect()
}

/// Scott's rule bandwidth: `n^(-1/5)` times the sample standard deviation.
///
/// Returns `None` for fewer than two samples or zero spread.
#[must_use]
pub fn scott_bandwidth(samples: &[f64]) -> Option<f64> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let count = n as f64;
    let mean = samples.iter().sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (count - 1.0);
    let std_dev = variance.sqrt();
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return None;
    }
    Some(std_dev * count.powf(-0.2))
}

/// Estimates the density of `values`, filtering missing samples first.
///
/// An input with no usable spread (all missing, a single sample, or constant
/// values) yields an empty curve rather than an error.
#[must_use]
pub fn estimate_density(values: &[f64], grid_size: usize, cut: f64) -> DensityCurve {
    let samples = finite_samples(values);
    let Some(bandwidth) = scott_bandwidth(&samples) else {
        return DensityCurve::default();
    };
    if grid_size < 2 {
        return DensityCurve::default();
    }

    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(*value), hi.max(*value))
        });
    let start = min - cut * bandwidth;
    let end = max + cut * bandwidth;
    let step = (end - start) / (grid_size - 1) as f64;
    let norm = samples.len() as f64 * bandwidth;

    let mut xs = Vec::with_capacity(grid_size);
    let mut densities = Vec::with_capacity(grid_size);
    for i in 0..grid_size {
        let x = start + step * i as f64;
        let sum: f64 = samples
            .iter()
            .map(|sample| {
                let u = (x - sample) / bandwidth;
                (-0.5 * u * u).exp() * INV_SQRT_TWO_PI
            })
            .sum();
        xs.push(x);
        densities.push(sum / norm);
    }

    DensityCurve {
        xs,
        densities,
        bandwidth,
    }
}
