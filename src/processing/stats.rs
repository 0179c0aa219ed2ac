// Statistical helpers shared by imputation and summaries
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

/// Compute mean of values
pub fn compute_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Compute median of values
pub fn compute_median(values: &[f64]) -> Option<f64> {
    compute_quantile(values, 0.5)
}

/// Compute the most frequent value; ties go to the smallest value
pub fn compute_mode(values: &[f64]) -> Option<f64> {
    mode_by(values.to_vec(), f64::total_cmp)
}

/// Most frequent element under `cmp`; ties go to the element that sorts first
pub fn mode_by<T, F>(mut values: Vec<T>, cmp: F) -> Option<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    values.sort_by(&cmp);

    let mut best: Option<(usize, usize)> = None; // (start, run length)
    let mut start = 0;
    for i in 1..=values.len() {
        if i == values.len() || cmp(&values[start], &values[i]) != Ordering::Equal {
            let run = i - start;
            if best.map_or(true, |(_, len)| run > len) {
                best = Some((start, run));
            }
            start = i;
        }
    }

    let (index, _) = best?;
    Some(values.swap_remove(index))
}

/// Compute sample standard deviation (n - 1 denominator)
pub fn compute_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let mean = compute_mean(values)?;
    let variance = values
        .iter()
        .map(|&x| (x - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Compute minimum of values
pub fn compute_min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Compute maximum of values
pub fn compute_max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Compute quantile of values with linear interpolation
pub fn compute_quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;

    if idx + 1 < sorted.len() {
        Some(sorted[idx] + frac * (sorted[idx + 1] - sorted[idx]))
    } else {
        Some(sorted[idx])
    }
}

/// Compute Pearson correlation between two paired sets of values
pub fn compute_correlation(values1: &[f64], values2: &[f64]) -> Option<f64> {
    if values1.len() < 2 || values1.len() != values2.len() {
        return None;
    }

    let mean1 = compute_mean(values1)?;
    let mean2 = compute_mean(values2)?;

    let mut numerator = 0.0;
    let mut denom1 = 0.0;
    let mut denom2 = 0.0;

    for (a, b) in values1.iter().zip(values2) {
        let diff1 = a - mean1;
        let diff2 = b - mean2;

        numerator += diff1 * diff2;
        denom1 += diff1 * diff1;
        denom2 += diff2 * diff2;
    }

    if denom1 == 0.0 || denom2 == 0.0 {
        None
    } else {
        Some(numerator / (denom1.sqrt() * denom2.sqrt()))
    }
}
