//! Read-only summaries of a trained model

use crate::cache::KernelCache;
use crate::core::{Result, SVMError, SvmType};
use crate::kernel::{Kernel, KernelType};
use crate::model::Model;
use log::debug;
use serde::Serialize;
use std::fmt;

/// Kernel values cached while computing hyperplane norms
const NORM_CACHE_BYTES: usize = 16 * 1024 * 1024;

/// Summary of a model's shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub svm_type: SvmType,
    pub kernel_type: KernelType,
    pub class_count: usize,
    pub total_support_vectors: usize,
    pub support_vector_counts: Vec<usize>,
    pub class_labels: Vec<f64>,
    pub decision_functions: usize,
    pub probability: bool,
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "svm_type: {}", self.svm_type)?;
        writeln!(f, "kernel: {}", self.kernel_type)?;
        writeln!(f, "classes: {}", self.class_count)?;
        writeln!(f, "support vectors: {}", self.total_support_vectors)?;
        if !self.class_labels.is_empty() {
            for (label, count) in self.class_labels.iter().zip(&self.support_vector_counts) {
                writeln!(f, "  class {label}: {count}")?;
            }
        }
        writeln!(f, "decision functions: {}", self.decision_functions)?;
        write!(f, "probability: {}", self.probability)
    }
}

impl Model {
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            svm_type: self.svm_type,
            kernel_type: self.kernel_config.kernel_type,
            class_count: self.class_count,
            total_support_vectors: self.support_vectors.len(),
            support_vector_counts: self.support_vector_counts.clone(),
            class_labels: self.class_labels.clone(),
            decision_functions: self.layout.pairs().len(),
            probability: self.has_probability_model()
                || self.svr_probability().is_ok(),
        }
    }

    /// Squared norm `||w||^2` of every pairwise decision function
    ///
    /// Kernel values between support vectors are shared through an LRU cache,
    /// since each class takes part in `k - 1` pairs. Not available for a
    /// precomputed kernel, whose support vectors carry no features.
    pub fn hyperplane_norms(&self) -> Result<Vec<f64>> {
        if self.kernel_config.kernel_type == KernelType::Precomputed {
            return Err(SVMError::InvalidParameter(
                "hyperplane norms need support vector features, not a precomputed kernel"
                    .to_string(),
            ));
        }

        let mut cache = KernelCache::with_memory_limit(NORM_CACHE_BYTES);
        let norms = self
            .layout
            .pairs()
            .iter()
            .map(|pair| {
                let members: Vec<(usize, f64)> = pair
                    .members()
                    .map(|(v, row)| (v, self.dual_coefficients[row][v]))
                    .collect();
                let mut norm = 0.0;
                for &(a, ca) in &members {
                    for &(b, cb) in &members {
                        let k = cache.get_or_compute(a, b, || {
                            self.kernel
                                .compute(&self.support_vectors[a], &self.support_vectors[b])
                        });
                        norm += ca * cb * k;
                    }
                }
                norm
            })
            .collect();

        debug!(
            "hyperplane norms: kernel cache {} (hit rate {:.3})",
            cache.stats(),
            cache.hit_rate()
        );
        Ok(norms)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{SVMError, SparseVector, SvmType};
    use crate::kernel::{KernelConfig, KernelType};
    use crate::model::ModelBuilder;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_norm_matches_explicit_weights() {
        // w = 0.5 * (1, 0) - 0.5 * (-1, 2) = (1, -1)
        let model = ModelBuilder::new(SvmType::CSvc, KernelConfig::linear())
            .class_labels(vec![1.0, -1.0])
            .support_vector_counts(vec![1, 1])
            .support_vectors(vec![
                SparseVector::new(vec![0], vec![1.0]),
                SparseVector::new(vec![0, 1], vec![-1.0, 2.0]),
            ])
            .dual_coefficients(vec![vec![0.5, -0.5]])
            .rho(vec![0.0])
            .build()
            .unwrap();

        let norms = model.hyperplane_norms().unwrap();
        assert_eq!(norms.len(), 1);
        assert_relative_eq!(norms[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_norms_per_pair() {
        let model = ModelBuilder::new(SvmType::CSvc, KernelConfig::rbf(1.0))
            .class_labels(vec![1.0, 2.0, 3.0])
            .support_vector_counts(vec![1, 1, 1])
            .support_vectors(vec![
                SparseVector::new(vec![0], vec![0.0]),
                SparseVector::new(vec![0], vec![1.0]),
                SparseVector::new(vec![0], vec![5.0]),
            ])
            .dual_coefficients(vec![vec![1.0, -1.0, 1.0], vec![1.0, 1.0, -1.0]])
            .rho(vec![0.0, 0.0, 0.0])
            .build()
            .unwrap();

        let norms = model.hyperplane_norms().unwrap();
        assert_eq!(norms.len(), 3);
        // pair (0,1): coefficients 1 and -1, K(0,1) = exp(-1)
        assert_relative_eq!(norms[0], 2.0 - 2.0 * (-1.0_f64).exp(), epsilon = 1e-12);
        assert!(norms.iter().all(|&n| n >= 0.0));
    }

    #[test]
    fn test_precomputed_has_no_norms() {
        let model = ModelBuilder::new(SvmType::CSvc, KernelConfig::precomputed())
            .class_labels(vec![1.0, 2.0])
            .support_vector_counts(vec![1, 1])
            .support_vectors(vec![
                SparseVector::new(vec![0], vec![1.0]),
                SparseVector::new(vec![0], vec![2.0]),
            ])
            .dual_coefficients(vec![vec![1.0, -1.0]])
            .rho(vec![0.0])
            .build()
            .unwrap();
        assert!(matches!(
            model.hyperplane_norms(),
            Err(SVMError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_info_summary() {
        let model = ModelBuilder::new(SvmType::NuSvc, KernelConfig::polynomial(2, 1.0, 0.0))
            .class_labels(vec![3.0, 5.0])
            .support_vector_counts(vec![2, 1])
            .support_vectors(vec![
                SparseVector::new(vec![0], vec![1.0]),
                SparseVector::new(vec![0], vec![2.0]),
                SparseVector::new(vec![0], vec![-1.0]),
            ])
            .dual_coefficients(vec![vec![0.5, 0.5, -1.0]])
            .rho(vec![0.2])
            .probability(vec![-1.0], vec![0.0])
            .build()
            .unwrap();

        let info = model.info();
        assert_eq!(info.svm_type, SvmType::NuSvc);
        assert_eq!(info.kernel_type, KernelType::Polynomial);
        assert_eq!(info.total_support_vectors, 3);
        assert_eq!(info.support_vector_counts, vec![2, 1]);
        assert_eq!(info.decision_functions, 1);
        assert!(info.probability);

        let text = info.to_string();
        assert!(text.contains("class 3: 2"));
        assert!(text.contains("kernel: polynomial"));
    }
}
