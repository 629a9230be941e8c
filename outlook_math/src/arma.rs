//! ARMA recursions on a (differenced, demeaned) series
//!
//! Coefficient conventions:
//! `z_t = sum(ar[i] * z_{t-1-i}) + e_t + sum(ma[j] * e_{t-1-j})`

/// Conditional one-step residuals.
///
/// The first `ar.len()` residuals are fixed at zero (there is no history to
/// condition on); pre-sample innovations are taken as zero too.
pub fn css_residuals(z: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let p = ar.len();
    let mut residuals = vec![0.0; z.len()];

    for t in p..z.len() {
        let mut predicted = 0.0;
        for (i, phi) in ar.iter().enumerate() {
            predicted += phi * z[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                predicted += theta * residuals[t - 1 - j];
            }
        }
        residuals[t] = z[t] - predicted;
    }

    residuals
}

/// Sum of squared conditional residuals, skipping the conditioning prefix
pub fn conditional_sum_of_squares(z: &[f64], ar: &[f64], ma: &[f64]) -> f64 {
    css_residuals(z, ar, ma)
        .iter()
        .skip(ar.len())
        .map(|e| e * e)
        .sum()
}

/// Multi-step point forecasts of the ARMA process.
///
/// Future innovations are zero, so MA terms only act while the forecast
/// still reaches back into observed residuals.
pub fn forecast(z: &[f64], residuals: &[f64], ar: &[f64], ma: &[f64], horizon: usize) -> Vec<f64> {
    let n = z.len();
    let mut history = z.to_vec();
    let mut forecasts = Vec::with_capacity(horizon);

    for h in 0..horizon {
        let t = n + h;
        let mut value = 0.0;
        for (i, phi) in ar.iter().enumerate() {
            if t > i {
                value += phi * history[t - 1 - i];
            }
        }
        for (j, theta) in ma.iter().enumerate() {
            // residual index t-1-j is observed only when it is < n
            if t > j && t - 1 - j < residuals.len() {
                value += theta * residuals[t - 1 - j];
            }
        }
        history.push(value);
        forecasts.push(value);
    }

    forecasts
}

/// Moving-average (psi) weights of an ARIMA(p, d, q) process.
///
/// The AR polynomial is multiplied by `(1 - L)^d` first so the weights apply
/// to the undifferenced series. Returns `count` weights, `psi[0] == 1`.
pub fn psi_weights(ar: &[f64], ma: &[f64], d: usize, count: usize) -> Vec<f64> {
    // lag polynomial 1 - ar_1 L - ... as coefficients of L^0..L^p
    let mut polynomial: Vec<f64> = std::iter::once(1.0)
        .chain(ar.iter().map(|phi| -phi))
        .collect();
    for _ in 0..d {
        let mut expanded = vec![0.0; polynomial.len() + 1];
        for (i, c) in polynomial.iter().enumerate() {
            expanded[i] += c;
            expanded[i + 1] -= c;
        }
        polynomial = expanded;
    }
    let integrated_ar: Vec<f64> = polynomial.iter().skip(1).map(|c| -c).collect();

    let mut psi: Vec<f64> = Vec::with_capacity(count);
    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let mut weight = ma.get(j - 1).copied().unwrap_or(0.0);
        for (i, phi) in integrated_ar.iter().enumerate() {
            let lag = i + 1;
            if lag <= j {
                weight += phi * psi[j - lag];
            }
        }
        psi.push(weight);
    }

    psi
}
