//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (γ * <x, y> + r)^d
//!
//! Where:
//! - γ (gamma): scaling factor for the dot product
//! - r (coef0): independent term in the polynomial
//! - d (degree): degree of the polynomial

use crate::core::SparseVector;
use crate::kernel::sparse::dot_product;
use crate::kernel::traits::Kernel;

/// Polynomial kernel with configurable degree, gamma, and coefficient
#[derive(Debug, Clone)]
pub struct PolynomialKernel {
    /// Scaling factor for the dot product
    pub gamma: f64,
    /// Independent term in the polynomial
    pub coef0: f64,
    /// Degree of the polynomial
    pub degree: u32,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel with the specified parameters
    ///
    /// # Examples
    /// ```
    /// use rsvm_infer::kernel::PolynomialKernel;
    ///
    /// // Quadratic kernel: (x·y + 1)²
    /// let quad_kernel = PolynomialKernel::new(2, 1.0, 1.0);
    /// assert_eq!(quad_kernel.degree, 2);
    /// ```
    ///
    /// # Panics
    /// Panics if gamma or coef0 is not finite
    pub fn new(degree: u32, gamma: f64, coef0: f64) -> Self {
        assert!(gamma.is_finite(), "Gamma must be finite");
        assert!(coef0.is_finite(), "Coef0 must be finite");

        Self {
            gamma,
            coef0,
            degree,
        }
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        let base = self.gamma * dot_product(x, y) + self.coef0;
        powi(base, self.degree)
    }
}

/// Integer power by repeated squaring
///
/// Negative bases keep their sign for odd degrees.
fn powi(base: f64, degree: u32) -> f64 {
    let mut result = 1.0;
    let mut factor = base;
    let mut exponent = degree;

    while exponent > 0 {
        if exponent & 1 == 1 {
            result *= factor;
        }
        factor *= factor;
        exponent >>= 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_kernel_creation() {
        let kernel = PolynomialKernel::new(3, 0.5, 1.0);
        assert_eq!(kernel.degree, 3);
        assert_eq!(kernel.gamma, 0.5);
        assert_eq!(kernel.coef0, 1.0);
    }

    #[test]
    fn test_polynomial_kernel_computation() {
        let kernel = PolynomialKernel::new(2, 1.0, 1.0);

        let x = SparseVector::new(vec![0, 1], vec![1.0, 2.0]);
        let y = SparseVector::new(vec![0, 1], vec![2.0, 1.0]);

        // Dot product 4, (1.0 * 4 + 1.0)² = 25
        assert_relative_eq!(kernel.compute(&x, &y), 25.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_kernel_same_vector() {
        let kernel = PolynomialKernel::new(3, 0.5, 2.0);
        let x = SparseVector::new(vec![0, 1], vec![3.0, 4.0]);

        // (0.5 * 25 + 2.0)³ = 14.5³
        assert_relative_eq!(kernel.compute(&x, &x), 3048.625, epsilon = 1e-6);
    }

    #[test]
    fn test_polynomial_kernel_negative_base() {
        let kernel = PolynomialKernel::new(3, 1.0, 0.0);

        let x = SparseVector::new(vec![0], vec![1.0]);
        let y = SparseVector::new(vec![0], vec![-2.0]);

        // (-2)³ = -8, sign preserved for odd degree
        assert_relative_eq!(kernel.compute(&x, &y), -8.0, epsilon = 1e-12);

        let even = PolynomialKernel::new(2, 1.0, 0.0);
        assert_relative_eq!(even.compute(&x, &y), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polynomial_kernel_degree_zero() {
        let kernel = PolynomialKernel::new(0, 1.0, 5.0);
        let x = SparseVector::new(vec![0], vec![3.0]);
        assert_eq!(kernel.compute(&x, &x), 1.0);
    }

    #[test]
    fn test_powi_matches_std() {
        for degree in 0..8u32 {
            assert_relative_eq!(
                powi(1.7, degree),
                1.7_f64.powi(degree as i32),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    #[should_panic(expected = "Gamma must be finite")]
    fn test_invalid_gamma() {
        PolynomialKernel::new(2, f64::NAN, 1.0);
    }
}
