//! Functions to integrate
//!
//! Workers share one integrand by reference across threads, so implementations
//! must be pure and `Sync`.

/// A scalar function of one variable
pub trait Integrand: Sync {
    /// Evaluate the function at `x`
    fn evaluate(&self, x: f64) -> f64;

    /// Closed-form value of the integral over [a, b], if known
    fn exact(&self, _a: f64, _b: f64) -> Option<f64> {
        None
    }

    /// Short human-readable name for reports
    fn name(&self) -> &str {
        "f(x)"
    }
}

/// f(x) = x²
#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl Integrand for Square {
    #[inline]
    fn evaluate(&self, x: f64) -> f64 {
        x * x
    }

    fn exact(&self, a: f64, b: f64) -> Option<f64> {
        Some((b * b * b - a * a * a) / 3.0)
    }

    fn name(&self) -> &str {
        "x^2"
    }
}

impl<F> Integrand for F
where
    F: Fn(f64) -> f64 + Sync,
{
    #[inline]
    fn evaluate(&self, x: f64) -> f64 {
        self(x)
    }
}
