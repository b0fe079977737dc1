//! Linear kernel implementation

use crate::core::SparseVector;
use crate::kernel::sparse::dot_product;
use crate::kernel::Kernel;

/// Linear kernel: K(x, y) = x^T * y
///
/// Absent indices count as zero on both sides, so only indices present in
/// both vectors contribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        dot_product(x, y)
    }
}
