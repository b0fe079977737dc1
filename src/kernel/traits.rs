//! Kernel trait definition

use crate::core::SparseVector;

/// Kernel function trait
///
/// Implementations are pure functions of their two arguments and their own
/// parameters, so a kernel can be shared between threads and evaluated
/// concurrently.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    ///
    /// During inference `x` is the query and `y` a stored support vector.
    /// Only the precomputed kernel depends on that order.
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64;
}
