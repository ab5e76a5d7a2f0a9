//! Extended-precision accumulator for worker partial sums
//!
//! Rust has no portable `long double`, so partial sums carry a running
//! compensation term (Neumaier's variant of Kahan summation). The error of the
//! accumulated sum stays O(ε) instead of growing with the number of terms.

use std::iter::Sum;
use std::ops::AddAssign;

/// Compensated f64 sum
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtendedSum {
    sum: f64,
    compensation: f64,
}

impl ExtendedSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an initial value
    pub fn with_value(value: f64) -> Self {
        Self {
            sum: value,
            compensation: 0.0,
        }
    }

    #[inline]
    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// Fold another accumulator in, keeping both compensation terms
    pub fn merge(&mut self, other: &ExtendedSum) {
        self.add(other.sum);
        self.add(other.compensation);
    }

    /// Rounded f64 value of the sum
    #[inline]
    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

impl AddAssign<f64> for ExtendedSum {
    #[inline]
    fn add_assign(&mut self, value: f64) {
        self.add(value);
    }
}

impl Sum<f64> for ExtendedSum {
    fn sum<I: Iterator<Item = f64>>(iter: I) -> Self {
        let mut acc = ExtendedSum::new();
        for v in iter {
            acc.add(v);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_small_terms() {
        let mut acc = ExtendedSum::with_value(1.0);
        for _ in 0..10 {
            acc += 1e-16;
        }
        // Naive f64 addition loses every 1e-16 against 1.0
        assert!(acc.value() > 1.0);
        assert!((acc.value() - 1.0 - 1e-15).abs() <= f64::EPSILON);
    }

    #[test]
    fn test_cancellation() {
        let acc: ExtendedSum = [1.0, 1e100, 1.0, -1e100].into_iter().sum();
        assert_eq!(acc.value(), 2.0);
    }

    #[test]
    fn test_merge() {
        let mut left: ExtendedSum = (1..=100).map(|i| i as f64 * 0.1).sum();
        let right: ExtendedSum = (101..=200).map(|i| i as f64 * 0.1).sum();
        left.merge(&right);

        let all: ExtendedSum = (1..=200).map(|i| i as f64 * 0.1).sum();
        assert!((left.value() - all.value()).abs() < 1e-12);
        assert!((left.value() - 2010.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty() {
        assert_eq!(ExtendedSum::new().value(), 0.0);
    }
}
