//! Trained one-vs-one SVM model and its inference engine
//!
//! A [`Model`] is built once through [`ModelBuilder`] (directly or via a
//! [`crate::persistence::ModelRepository`]) and is read-only afterwards.
//! Every inference entry point takes `&self`, so one model can serve any
//! number of threads without locking.
//!
//! # Quick Start
//!
//! ```rust
//! use rsvm_infer::kernel::KernelConfig;
//! use rsvm_infer::model::ModelBuilder;
//! use rsvm_infer::{SparseVector, SvmType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ModelBuilder::new(SvmType::CSvc, KernelConfig::linear())
//!     .class_labels(vec![1.0, -1.0])
//!     .support_vector_counts(vec![1, 1])
//!     .support_vectors(vec![
//!         SparseVector::new(vec![0], vec![1.0]),
//!         SparseVector::new(vec![0], vec![-1.0]),
//!     ])
//!     .dual_coefficients(vec![vec![0.5, -0.5]])
//!     .rho(vec![0.0])
//!     .build()?;
//!
//! let query = SparseVector::new(vec![0], vec![2.0]);
//! assert_eq!(model.predict(&query)?, 1.0);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod decision;
pub mod introspection;
pub mod layout;
pub mod probability;
pub mod voting;

pub use self::builder::ModelBuilder;
pub use self::introspection::ModelInfo;
pub use self::layout::{pair_count, ClassLayout, PairSlice};

use crate::core::{InferenceConfig, Prediction, Result, SparseVector, SvmType};
use crate::kernel::{KernelConfig, ModelKernel};
use log::trace;

/// Immutable trained model
#[derive(Debug, Clone)]
pub struct Model {
    svm_type: SvmType,
    kernel_config: KernelConfig,
    kernel: ModelKernel,
    class_count: usize,
    support_vectors: Vec<SparseVector>,
    dual_coefficients: Vec<Vec<f64>>,
    rho: Vec<f64>,
    class_labels: Vec<f64>,
    support_vector_counts: Vec<usize>,
    prob_a: Option<Vec<f64>>,
    prob_b: Option<Vec<f64>>,
    support_vector_indices: Option<Vec<usize>>,
    layout: ClassLayout,
    config: InferenceConfig,
}

impl Model {
    /// Return the model with different probability-estimation settings
    pub fn with_inference_config(mut self, config: InferenceConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Predict a label (classification), a value (regression) or +1/-1 (one-class)
    pub fn predict(&self, query: &SparseVector) -> Result<f64> {
        let decision_values = self.decision_values(query)?;
        Ok(self.label_from_decision_values(&decision_values))
    }

    /// Predict with decision values attached, plus probabilities when asked for
    pub fn predict_detailed(&self, query: &SparseVector, with_probability: bool) -> Result<Prediction> {
        let decision_values = self.decision_values(query)?;
        if with_probability {
            let probabilities = self.probabilities_from_decision_values(&decision_values)?;
            let label = self.class_labels[voting::most_probable(&probabilities)];
            return Ok(Prediction::new(label, decision_values).with_probabilities(probabilities));
        }
        let label = self.label_from_decision_values(&decision_values);
        Ok(Prediction::new(label, decision_values))
    }

    /// Predict every query, stopping at the first malformed one
    pub fn predict_batch(&self, queries: &[SparseVector]) -> Result<Vec<f64>> {
        queries.iter().map(|q| self.predict(q)).collect()
    }

    fn label_from_decision_values(&self, decision_values: &[f64]) -> f64 {
        match self.svm_type {
            SvmType::CSvc | SvmType::NuSvc => {
                let winner = voting::one_vs_one_winner(
                    self.class_count,
                    self.layout.pairs(),
                    decision_values,
                );
                trace!("one-vs-one vote selected class index {winner}");
                self.class_labels[winner]
            }
            SvmType::OneClass => {
                if decision_values[0] > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            SvmType::EpsilonSvr | SvmType::NuSvr => decision_values[0],
        }
    }

    pub fn svm_type(&self) -> SvmType {
        self.svm_type
    }

    pub fn kernel_config(&self) -> &KernelConfig {
        &self.kernel_config
    }

    /// Number of classes; 2 for regression and one-class models
    pub fn class_count(&self) -> usize {
        self.class_count
    }

    pub fn total_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }

    pub fn support_vectors(&self) -> &[SparseVector] {
        &self.support_vectors
    }

    /// Support vectors of one internal class index (classification only)
    pub fn class_support_vectors(&self, class: usize) -> Option<&[SparseVector]> {
        self.layout
            .class_range(class)
            .map(|range| &self.support_vectors[range])
    }

    pub fn dual_coefficients(&self) -> &[Vec<f64>] {
        &self.dual_coefficients
    }

    pub fn rho(&self) -> &[f64] {
        &self.rho
    }

    /// Original label of each internal class index (empty for regression/one-class)
    pub fn class_labels(&self) -> &[f64] {
        &self.class_labels
    }

    pub fn support_vector_counts(&self) -> &[usize] {
        &self.support_vector_counts
    }

    pub fn prob_a(&self) -> Option<&[f64]> {
        self.prob_a.as_deref()
    }

    pub fn prob_b(&self) -> Option<&[f64]> {
        self.prob_b.as_deref()
    }

    /// Training-set index of each support vector, when the producer recorded them
    pub fn support_vector_indices(&self) -> Option<&[usize]> {
        self.support_vector_indices.as_deref()
    }

    pub fn inference_config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn layout(&self) -> &ClassLayout {
        &self.layout
    }
}
