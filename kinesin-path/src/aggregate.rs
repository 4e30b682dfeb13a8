//! Per-step statistics across classified windows.
//!
//! Windows are aligned on their first row, so step `k` collects the `k`-th
//! frame of every window. All windows are truncated to the shortest one.

use kinesin_core::{KinesinError, Result, Summarizable};

/// Statistics of one aligned step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepSummary {
    pub step: usize,
    /// Number of windows contributing.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Lower percentile of the band.
    pub lower: f64,
    /// Upper percentile of the band.
    pub upper: f64,
}

impl Summarizable for StepSummary {
    fn summary(&self) -> String {
        format!(
            "step {}: n={}, mean={:.4}, median={:.4}, band=[{:.4}, {:.4}]",
            self.step, self.count, self.mean, self.median, self.lower, self.upper,
        )
    }
}

/// Summarize aligned windows step by step.
///
/// `band_percent` selects the `band_percent`-th and `(100 - band_percent)`-th
/// percentiles (linear interpolation). `max_steps` caps the number of steps.
///
/// # Errors
///
/// Returns an error if `windows` is empty or `band_percent` is outside `[0, 50]`.
pub fn summarize_steps(
    windows: &[&[f64]],
    band_percent: f64,
    max_steps: Option<usize>,
) -> Result<Vec<StepSummary>> {
    if windows.is_empty() {
        return Err(KinesinError::InvalidInput(
            "summarize_steps: no windows to summarize".into(),
        ));
    }
    if !(0.0..=50.0).contains(&band_percent) {
        return Err(KinesinError::InvalidInput(format!(
            "summarize_steps: band_percent must be in [0, 50], got {}",
            band_percent
        )));
    }

    let mut steps = windows.iter().map(|w| w.len()).min().unwrap_or(0);
    if let Some(cap) = max_steps {
        steps = steps.min(cap);
    }

    let q = band_percent / 100.0;
    let mut column = Vec::with_capacity(windows.len());
    let mut out = Vec::with_capacity(steps);
    for step in 0..steps {
        column.clear();
        column.extend(windows.iter().map(|w| w[step]));
        column.sort_by(|a, b| a.total_cmp(b));

        let n = column.len() as f64;
        let mean = column.iter().sum::<f64>() / n;
        let variance = column.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;

        out.push(StepSummary {
            step,
            count: column.len(),
            mean,
            median: quantile_sorted(&column, 0.5),
            std_dev: variance.sqrt(),
            lower: quantile_sorted(&column, q),
            upper: quantile_sorted(&column, 1.0 - q),
        });
    }
    Ok(out)
}

/// Quantile of a pre-sorted, non-empty slice using linear interpolation.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = lo + 1;
    let frac = pos - lo as f64;
    if hi >= n {
        sorted[n - 1]
    } else {
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}
