//! Numeric kernels behind the profiler and the chart planner.
//!
//! Conventions are pinned explicitly because numeric libraries disagree on
//! them:
//! * standard deviation uses the sample (N−1) divisor,
//! * quantiles interpolate linearly at rank `(n−1)·p`,
//! * correlation is Pearson's r over the rows given (callers pass
//!   pairwise-complete rows),
//! * kernel density uses a Gaussian kernel with Scott's bandwidth.

use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Moments
// ---------------------------------------------------------------------------

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N−1 divisor). Undefined below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

// ---------------------------------------------------------------------------
// Order statistics
// ---------------------------------------------------------------------------

/// Copy and sort values ascending (NaN-free input expected).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// Linear-interpolation quantile of an ascending slice, `p` in `[0, 1]`.
pub fn quantile(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted_data[0]);
    }

    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        Some(sorted_data[lower_idx])
    } else {
        let weight = rank - lower_idx as f64;
        Some(sorted_data[lower_idx] + (sorted_data[upper_idx] - sorted_data[lower_idx]) * weight)
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation of two equally long samples.
///
/// `None` when fewer than two pairs are given or either side is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins over the data range.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Histogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    /// Count per bin; the last bin is closed on the right.
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => {
                (hi - lo) / self.counts.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Bin centres, one per count.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

/// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// A constant sample is widened to `[v − 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];

    for &v in values {
        let idx = ((v - lo) / width).floor();
        let idx = if idx < 0.0 { 0 } else { (idx as usize).min(bins - 1) };
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

// ---------------------------------------------------------------------------
// Kernel density
// ---------------------------------------------------------------------------

/// Scott's rule of thumb: `σ · n^(−1/5)` with the sample σ.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let std = sample_std(values)?;
    if std <= 0.0 || !std.is_finite() {
        return None;
    }
    Some(std * (values.len() as f64).powf(-0.2))
}

fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Evaluate a Gaussian KDE on `grid_points` evenly spaced points over
/// `[lo, hi]`. Returns `(grid, density)`; density integrates to ~1.
pub fn gaussian_kde(
    values: &[f64],
    bandwidth: f64,
    lo: f64,
    hi: f64,
    grid_points: usize,
) -> (Vec<f64>, Vec<f64>) {
    let n = values.len() as f64;
    if values.is_empty() || grid_points == 0 || bandwidth <= 0.0 {
        return (Vec::new(), Vec::new());
    }

    let step = if grid_points > 1 {
        (hi - lo) / (grid_points - 1) as f64
    } else {
        0.0
    };

    let mut grid = Vec::with_capacity(grid_points);
    let mut density = Vec::with_capacity(grid_points);
    for i in 0..grid_points {
        let x = lo + step * i as f64;
        let d: f64 = values
            .iter()
            .map(|&xi| gaussian_kernel((x - xi) / bandwidth))
            .sum();
        grid.push(x);
        density.push(d / (n * bandwidth));
    }
    (grid, density)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sample_std_uses_n_minus_one() {
        let std = sample_std(&[2.0, 4.0, 6.0]).unwrap();
        assert!(close(std, 2.0));
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(sample_std(&[]), None);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!(close(quantile(&data, 0.25).unwrap(), 1.75));
        assert!(close(quantile(&data, 0.5).unwrap(), 2.5));
        assert!(close(quantile(&data, 0.75).unwrap(), 3.25));
        assert!(close(quantile(&data, 0.0).unwrap(), 1.0));
        assert!(close(quantile(&data, 1.0).unwrap(), 4.0));
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[7.0], 0.9), Some(7.0));
    }

    #[test]
    fn test_pearson_perfect_and_undefined() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let neg = [8.0, 6.0, 4.0, 2.0];
        assert!(close(pearson(&xs, &ys).unwrap(), 1.0));
        assert!(close(pearson(&xs, &neg).unwrap(), -1.0));
        // Constant side has no variance.
        assert_eq!(pearson(&xs, &[3.0, 3.0, 3.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[2.0]), None);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let h = histogram(&values, 30);
        assert_eq!(h.counts.len(), 30);
        assert_eq!(h.edges.len(), 31);
        assert_eq!(h.counts.iter().sum::<usize>(), 100);
        // Max lands in the last (right-closed) bin.
        assert!(h.counts[29] >= 1);
        assert!(close(h.bin_width(), 99.0 / 30.0));
    }

    #[test]
    fn test_histogram_constant_sample() {
        let h = histogram(&[3.0, 3.0, 3.0], 30);
        assert!(close(h.edges[0], 2.5));
        assert!(close(*h.edges.last().unwrap(), 3.5));
        assert_eq!(h.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 4.5, 5.0];
        let bw = scott_bandwidth(&values).unwrap();
        let (grid, density) = gaussian_kde(&values, bw, -10.0, 16.0, 2000);
        let step = grid[1] - grid[0];
        let area: f64 = density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn test_scott_bandwidth_undefined_for_constant() {
        assert_eq!(scott_bandwidth(&[2.0, 2.0, 2.0]), None);
        assert_eq!(scott_bandwidth(&[2.0]), None);
    }
}
