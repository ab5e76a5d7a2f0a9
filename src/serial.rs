//! Single-threaded trapezoidal rule
//!
//! Baseline for the parallel coordinator and its one-thread fast path.

use crate::integrand::Integrand;

/// Estimate the integral of `f` over [a, b] with `n` trapezoids of width `h`
///
/// sum = (f(a) + f(b)) / 2 + f(a + k·h) for k in 1..n, scaled by h.
/// The result depends only on the inputs, so repeated calls are bit-identical.
pub fn compute_serial<F: Integrand + ?Sized>(f: &F, a: f64, b: f64, n: u64, h: f64) -> f64 {
    let mut integral = (f.evaluate(a) + f.evaluate(b)) / 2.0;
    for k in 1..n {
        integral += f.evaluate(a + k as f64 * h);
    }
    integral * h
}
