//! Derivative-free minimisation with the Nelder–Mead simplex method

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Outcome of a successful minimisation
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Location of the best vertex
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations used
    pub iterations: usize,
}

/// Nelder–Mead simplex settings.
///
/// The method is fully deterministic: the initial simplex is built from the
/// starting point by stepping along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelderMead {
    /// Iteration cap; reaching it is reported as non-convergence
    pub max_iterations: usize,
    /// Absolute tolerance on the spread of vertex coordinates
    pub x_tolerance: f64,
    /// Absolute tolerance on the spread of objective values
    pub f_tolerance: f64,
    /// Axis step used to build the initial simplex
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            x_tolerance: 1e-6,
            f_tolerance: 1e-10,
            initial_step: 0.5,
        }
    }
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    /// Create settings with a custom iteration cap
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    /// Minimise `objective` starting from `start`.
    ///
    /// Fails with [`MathError::NoConvergence`] when the iteration cap is hit
    /// or the best objective value stops being finite.
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = start.len();
        if n == 0 {
            return Ok(Minimum {
                point: Vec::new(),
                value: objective(start),
                iterations: 0,
            });
        }

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(start.to_vec());
        for axis in 0..n {
            let mut vertex = start.to_vec();
            vertex[axis] += self.initial_step;
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| objective(v.as_slice())).collect();

        for iteration in 0..self.max_iterations {
            sort_simplex(&mut simplex, &mut values);

            if !values[0].is_finite() {
                return Err(MathError::NoConvergence {
                    iterations: iteration,
                });
            }
            if self.has_converged(&simplex, &values) {
                return Ok(Minimum {
                    point: simplex[0].clone(),
                    value: values[0],
                    iterations: iteration,
                });
            }

            let centroid = centroid(&simplex[..n]);
            let worst = simplex[n].clone();

            let reflected = blend(&centroid, &worst, REFLECTION);
            let f_reflected = objective(reflected.as_slice());

            if f_reflected < values[0] {
                let expanded = blend(&centroid, &worst, EXPANSION);
                let f_expanded = objective(expanded.as_slice());
                if f_expanded < f_reflected {
                    simplex[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    simplex[n] = reflected;
                    values[n] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[n - 1] {
                simplex[n] = reflected;
                values[n] = f_reflected;
                continue;
            }

            let (contracted, f_contracted) = if f_reflected < values[n] {
                let outside = blend(&centroid, &worst, CONTRACTION);
                let f_outside = objective(outside.as_slice());
                (outside, f_outside)
            } else {
                let inside = blend(&centroid, &worst, -CONTRACTION);
                let f_inside = objective(inside.as_slice());
                (inside, f_inside)
            };

            if f_contracted < values[n].min(f_reflected) {
                simplex[n] = contracted;
                values[n] = f_contracted;
                continue;
            }

            let best = simplex[0].clone();
            for i in 1..=n {
                let shrunk: Vec<f64> = best
                    .iter()
                    .zip(simplex[i].iter())
                    .map(|(b, x)| b + SHRINK * (x - b))
                    .collect();
                values[i] = objective(shrunk.as_slice());
                simplex[i] = shrunk;
            }
        }

        Err(MathError::NoConvergence {
            iterations: self.max_iterations,
        })
    }

    fn has_converged(&self, simplex: &[Vec<f64>], values: &[f64]) -> bool {
        let best = &simplex[0];
        let x_spread = simplex
            .iter()
            .skip(1)
            .flat_map(|v| v.iter().zip(best.iter()).map(|(a, b)| (a - b).abs()))
            .fold(0.0_f64, f64::max);
        let f_spread = values
            .iter()
            .skip(1)
            .map(|f| (f - values[0]).abs())
            .fold(0.0_f64, f64::max);

        x_spread <= self.x_tolerance && f_spread <= self.f_tolerance
    }
}

/// Sort vertices by objective value, NaN last, keeping ties in place
fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        let (fa, fb) = (values[a], values[b]);
        match (fa.is_nan(), fb.is_nan()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => fa.partial_cmp(&fb).unwrap_or(std::cmp::Ordering::Equal),
        }
    });

    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let dim = vertices[0].len();
    (0..dim)
        .map(|k| vertices.iter().map(|v| v[k]).sum::<f64>() / n)
        .collect()
}

/// `centroid + coefficient * (centroid - worst)`
fn blend(centroid: &[f64], worst: &[f64], coefficient: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(worst.iter())
        .map(|(c, w)| c + coefficient * (c - w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic_bowl() {
        let objective = |x: &[f64]| (x[0] - 1.0).powi(2) + 2.0 * (x[1] + 0.5).powi(2);
        let minimum = NelderMead::default().minimize(objective, &[0.0, 0.0]).unwrap();

        assert_abs_diff_eq!(minimum.point[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(minimum.point[1], -0.5, epsilon = 1e-4);
        assert!(minimum.value < 1e-8);
    }

    #[test]
    fn test_rosenbrock() {
        let objective = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let minimum = NelderMead::default()
            .minimize(objective, &[-1.2, 1.0])
            .unwrap();

        assert_abs_diff_eq!(minimum.point[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(minimum.point[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_flat_objective_converges_by_shrinking() {
        let minimum = NelderMead::default()
            .minimize(|_: &[f64]| 0.0, &[0.0, 0.0, 0.0])
            .unwrap();

        assert_eq!(minimum.value, 0.0);
        assert_eq!(minimum.point, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let result = NelderMead::with_max_iterations(3).minimize(|x: &[f64]| x[0] * x[0], &[10.0]);

        assert_eq!(result, Err(MathError::NoConvergence { iterations: 3 }));
    }

    #[test]
    fn test_non_finite_objective_reports_non_convergence() {
        let result = NelderMead::default().minimize(|_: &[f64]| f64::NAN, &[1.0, 2.0]);

        assert!(matches!(result, Err(MathError::NoConvergence { .. })));
    }

    #[test]
    fn test_deterministic() {
        let objective = |x: &[f64]| (x[0] - 3.0).powi(2) + (x[1] * x[0] - 1.0).powi(2);
        let a = NelderMead::default().minimize(objective, &[0.0, 0.0]).unwrap();
        let b = NelderMead::default().minimize(objective, &[0.0, 0.0]).unwrap();

        assert_eq!(a, b);
    }
}
