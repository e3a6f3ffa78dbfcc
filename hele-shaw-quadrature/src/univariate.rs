//! Quadrature rules for the one-dimensional domain `[-1, 1]`.

use crate::{Error, Rule};
use std::f64::consts::PI;

const MAX_NEWTON_ITERATIONS: usize = 100;

/// Evaluates the Legendre polynomial `P_n` and its derivative at `x`.
///
/// The derivative formula is singular at `|x| == 1`, so `x` must lie in the open interval.
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }

    // Bonnet's recursion
    //  (m + 1) P_{m + 1}(x) = (2m + 1) x P_m(x) - m P_{m - 1}(x)
    let mut p_prev = 1.0;
    let mut p = x;
    for m in 1..n {
        let m = m as f64;
        let p_next = ((2.0 * m + 1.0) * x * p - m * p_prev) / (m + 1.0);
        p_prev = p;
        p = p_next;
    }

    let n = n as f64;
    let dp = n * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

/// Gauss-Legendre quadrature for the reference interval `[-1, 1]`.
///
/// A rule with `n` points integrates polynomials of degree up to `2n - 1` exactly.
/// Points are returned in ascending order.
///
/// Returns an error if zero points are requested.
pub fn gauss(num_points: usize) -> Result<Rule<1>, Error> {
    let n = num_points;
    if n == 0 {
        return Err(Error::NoRuleAvailable);
    }

    let mut points = vec![[0.0]; n];
    let mut weights = vec![0.0; n];

    // The roots are symmetric about the origin, so we only search for the non-negative half.
    // The initial guesses are ordered from the largest root and downwards.
    for i in 0..(n + 1) / 2 {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let (p, dp) = legendre_with_derivative(n, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() <= 1e-15 {
                break;
            }
        }

        let (_, dp) = legendre_with_derivative(n, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);

        points[n - 1 - i] = [x];
        weights[n - 1 - i] = w;
        points[i] = [-x];
        weights[i] = w;
    }

    Ok((weights, points))
}
