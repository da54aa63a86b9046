// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use crate::native::Vector;

/// Check if two floats are approximately equal
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Component-wise approximate equality of two vectors
pub fn vec_approx_eq(a: &Vector, b: &Vector, epsilon: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y, epsilon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0001, 0.001));
        assert!(!approx_eq(1.0, 1.1, 0.001));
        assert!(approx_eq(0.3, 0.1 + 0.2, 1e-12));
    }

    #[test]
    fn test_vec_approx_eq() {
        let a = Vector::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(&a, &Vector::new(1.0, 2.0, 3.0 + 1e-10), 1e-9));
        assert!(!vec_approx_eq(&a, &Vector::new(1.0, 2.5, 3.0), 1e-9));
    }
}
