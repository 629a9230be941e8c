//! Parameter transforms keeping ARMA coefficients inside the admissible region
//!
//! An optimiser works on unconstrained reals. Each real is squashed into a
//! partial autocorrelation in (-1, 1) and the Durbin–Levinson recursion turns
//! the partial autocorrelations into polynomial coefficients. Every point of
//! the unconstrained space maps to a stationary AR (or invertible MA)
//! polynomial and every such polynomial is reachable.

/// Map unconstrained reals to the coefficients of a stationary AR polynomial.
///
/// The result uses the convention `y_t = phi_1 y_{t-1} + ... + phi_p y_{t-p}`.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let partials: Vec<f64> = unconstrained
        .iter()
        .map(|x| x / (1.0 + x * x).sqrt())
        .collect();

    let mut coefficients: Vec<f64> = Vec::with_capacity(partials.len());
    for (k, &r) in partials.iter().enumerate() {
        let previous = coefficients.clone();
        for i in 0..k {
            coefficients[i] = previous[i] - r * previous[k - 1 - i];
        }
        coefficients.push(r);
    }

    coefficients
}

/// Map unconstrained reals to the coefficients of an invertible MA polynomial.
///
/// The result uses the convention `e_t + theta_1 e_{t-1} + ... + theta_q e_{t-q}`.
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|c| -c)
        .collect()
}

/// Whether the AR polynomial `1 - phi_1 z - ... - phi_p z^p` has all roots
/// outside the unit circle.
///
/// Runs the Durbin–Levinson recursion backwards: the polynomial is stationary
/// exactly when every recovered partial autocorrelation lies in (-1, 1).
pub fn is_stationary(ar: &[f64]) -> bool {
    let mut coefficients = ar.to_vec();

    while let Some(&r) = coefficients.last() {
        if !r.is_finite() || r.abs() >= 1.0 {
            return false;
        }
        let k = coefficients.len() - 1;
        let denom = 1.0 - r * r;
        let reduced: Vec<f64> = (0..k)
            .map(|i| (coefficients[i] + r * coefficients[k - 1 - i]) / denom)
            .collect();
        coefficients = reduced;
    }

    true
}

/// Whether the MA polynomial `1 + theta_1 z + ... + theta_q z^q` is invertible.
pub fn is_invertible(ma: &[f64]) -> bool {
    let negated: Vec<f64> = ma.iter().map(|c| -c).collect();
    is_stationary(&negated)
}
