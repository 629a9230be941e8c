//! Differencing and its inverse

use crate::{MathError, Result};

/// Apply `d` rounds of first differencing.
///
/// Each round shortens the series by one element, so the result has
/// `series.len() - d` values (or is empty when the series is too short).
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();

    for _ in 0..d {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }

    result
}

/// Last value of the series at every differencing level `0..d`.
///
/// `tails[k]` is the final element of the series differenced `k` times.
/// These are the anchors [`integrate`] needs to undo the differencing.
pub fn difference_tails(series: &[f64], d: usize) -> Result<Vec<f64>> {
    if series.len() <= d {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} values to difference {} times, got {}",
            d,
            d,
            series.len()
        )));
    }

    let mut tails = Vec::with_capacity(d);
    let mut level = series.to_vec();
    for _ in 0..d {
        // non-empty: len > d guarantees at least one value at each level
        tails.push(level[level.len() - 1]);
        level = difference(&level, 1);
    }

    Ok(tails)
}

/// Undo differencing of a forecast path.
///
/// `diffs` are future values of the `d`-times differenced series and `tails`
/// comes from [`difference_tails`] on the historical series.
pub fn integrate(diffs: &[f64], tails: &[f64]) -> Vec<f64> {
    let mut path = diffs.to_vec();

    for &anchor in tails.iter().rev() {
        let mut running = anchor;
        for value in path.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    path
}
