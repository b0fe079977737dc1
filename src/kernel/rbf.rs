//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::core::SparseVector;
use crate::kernel::sparse::squared_distance;
use crate::kernel::Kernel;

/// RBF (Radial Basis Function) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The squared distance is accumulated directly by merging the two index
/// lists rather than through ||x||² + ||y||² - 2x·y, which keeps K(x, x)
/// exactly 1 and the kernel exactly symmetric.
#[derive(Debug, Clone, Copy)]
pub struct RBFKernel {
    gamma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Panics
    /// Panics if gamma is negative or not finite
    pub fn new(gamma: f64) -> Self {
        assert!(
            gamma.is_finite() && gamma >= 0.0,
            "Gamma must be non-negative, got: {}",
            gamma
        );
        Self { gamma }
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        (-self.gamma * squared_distance(x, y)).exp()
    }
}
