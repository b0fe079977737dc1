//! Validated construction of [`Model`]
//!
//! The builder accepts the raw arrays a trainer (or a model file) produces
//! and checks every structural invariant before freezing them into a model.
//! Anything inconsistent is reported as [`SVMError::CorruptModel`]; an
//! unusable kernel configuration as [`SVMError::InvalidKernelConfig`].

use crate::core::{InferenceConfig, Result, SVMError, SparseVector, SvmType};
use crate::kernel::{KernelConfig, KernelType, PrecomputedKernel};
use crate::model::layout::{pair_count, ClassLayout};
use crate::model::Model;
use log::debug;

/// Builder for an immutable [`Model`]
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    svm_type: SvmType,
    kernel_config: KernelConfig,
    class_count: Option<usize>,
    support_vectors: Vec<SparseVector>,
    dual_coefficients: Vec<Vec<f64>>,
    rho: Vec<f64>,
    class_labels: Vec<f64>,
    support_vector_counts: Vec<usize>,
    prob_a: Option<Vec<f64>>,
    prob_b: Option<Vec<f64>>,
    support_vector_indices: Option<Vec<usize>>,
    config: InferenceConfig,
}

impl ModelBuilder {
    pub fn new(svm_type: SvmType, kernel_config: KernelConfig) -> Self {
        Self {
            svm_type,
            kernel_config,
            class_count: None,
            support_vectors: Vec::new(),
            dual_coefficients: Vec::new(),
            rho: Vec::new(),
            class_labels: Vec::new(),
            support_vector_counts: Vec::new(),
            prob_a: None,
            prob_b: None,
            support_vector_indices: None,
            config: InferenceConfig::default(),
        }
    }

    /// Declared class count, checked against the other arrays
    ///
    /// When omitted it is taken from the labels (classification) or set to 2
    /// (regression and one-class).
    pub fn class_count(mut self, class_count: usize) -> Self {
        self.class_count = Some(class_count);
        self
    }

    pub fn support_vectors(mut self, support_vectors: Vec<SparseVector>) -> Self {
        self.support_vectors = support_vectors;
        self
    }

    pub fn dual_coefficients(mut self, dual_coefficients: Vec<Vec<f64>>) -> Self {
        self.dual_coefficients = dual_coefficients;
        self
    }

    pub fn rho(mut self, rho: Vec<f64>) -> Self {
        self.rho = rho;
        self
    }

    pub fn class_labels(mut self, class_labels: Vec<f64>) -> Self {
        self.class_labels = class_labels;
        self
    }

    pub fn support_vector_counts(mut self, counts: Vec<usize>) -> Self {
        self.support_vector_counts = counts;
        self
    }

    /// Platt scaling parameters, one (A, B) per pairwise decision function
    pub fn probability(mut self, prob_a: Vec<f64>, prob_b: Vec<f64>) -> Self {
        self.prob_a = Some(prob_a);
        self.prob_b = Some(prob_b);
        self
    }

    pub fn prob_a(mut self, prob_a: Option<Vec<f64>>) -> Self {
        self.prob_a = prob_a;
        self
    }

    pub fn prob_b(mut self, prob_b: Option<Vec<f64>>) -> Self {
        self.prob_b = prob_b;
        self
    }

    pub fn support_vector_indices(mut self, indices: Option<Vec<usize>>) -> Self {
        self.support_vector_indices = indices;
        self
    }

    pub fn with_inference_config(mut self, config: InferenceConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate every invariant and freeze the model
    pub fn build(self) -> Result<Model> {
        let kernel = self.kernel_config.build()?;
        self.config.validate()?;

        let l = self.support_vectors.len();
        let (class_count, layout) = if self.svm_type.is_classification() {
            self.check_classification(l)?
        } else {
            self.check_single_function(l)?
        };

        for (row_index, row) in self.dual_coefficients.iter().enumerate() {
            if row.len() != l {
                return Err(corrupt(format!(
                    "coefficient row {row_index} has {} entries, expected one per support vector ({l})",
                    row.len()
                )));
            }
            check_finite(row, "dual coefficients")?;
        }
        check_finite(&self.rho, "rho")?;

        for (v, sv) in self.support_vectors.iter().enumerate() {
            sv.check_well_formed()
                .map_err(|e| corrupt(format!("support vector {v}: {e}")))?;
            check_finite(&sv.values, "support vector values")?;
            if self.kernel_config.kernel_type == KernelType::Precomputed
                && PrecomputedKernel::serial_number(sv).is_none()
            {
                return Err(corrupt(format!(
                    "support vector {v} carries no serial number for the precomputed kernel"
                )));
            }
        }

        if let Some(indices) = &self.support_vector_indices {
            if indices.len() != l {
                return Err(corrupt(format!(
                    "{} support vector indices for {l} support vectors",
                    indices.len()
                )));
            }
        }

        debug!(
            "built {} model: {} classes, {} support vectors, {} kernel, probability={}",
            self.svm_type,
            class_count,
            l,
            self.kernel_config.kernel_type,
            self.prob_a.is_some()
        );

        Ok(Model {
            svm_type: self.svm_type,
            kernel_config: self.kernel_config,
            kernel,
            class_count,
            support_vectors: self.support_vectors,
            dual_coefficients: self.dual_coefficients,
            rho: self.rho,
            class_labels: self.class_labels,
            support_vector_counts: self.support_vector_counts,
            prob_a: self.prob_a,
            prob_b: self.prob_b,
            support_vector_indices: self.support_vector_indices,
            layout,
            config: self.config,
        })
    }

    fn check_classification(&self, l: usize) -> Result<(usize, ClassLayout)> {
        let class_count = self.class_count.unwrap_or(self.class_labels.len());
        if class_count == 0 {
            return Err(corrupt("a classifier needs at least one class".to_string()));
        }
        if self.class_labels.len() != class_count {
            return Err(corrupt(format!(
                "{} class labels for {class_count} classes",
                self.class_labels.len()
            )));
        }
        check_finite(&self.class_labels, "class labels")?;
        for (i, label) in self.class_labels.iter().enumerate() {
            if self.class_labels[..i].contains(label) {
                return Err(corrupt(format!("class label {label} appears twice")));
            }
        }

        if self.support_vector_counts.len() != class_count {
            return Err(corrupt(format!(
                "{} per-class support vector counts for {class_count} classes",
                self.support_vector_counts.len()
            )));
        }
        let counted: usize = self.support_vector_counts.iter().sum();
        if counted != l {
            return Err(corrupt(format!(
                "per-class support vector counts sum to {counted}, but the model stores {l}"
            )));
        }

        if self.dual_coefficients.len() != class_count - 1 {
            return Err(corrupt(format!(
                "{} coefficient rows, expected {}",
                self.dual_coefficients.len(),
                class_count - 1
            )));
        }

        let pairs = pair_count(class_count);
        self.check_pairwise_lengths(pairs)?;

        Ok((class_count, ClassLayout::one_vs_one(&self.support_vector_counts)))
    }

    fn check_single_function(&self, l: usize) -> Result<(usize, ClassLayout)> {
        if let Some(declared) = self.class_count {
            if declared != 2 {
                return Err(corrupt(format!(
                    "{} models have class count 2, got {declared}",
                    self.svm_type
                )));
            }
        }
        if !self.class_labels.is_empty() {
            return Err(corrupt(format!(
                "{} models carry no class labels",
                self.svm_type
            )));
        }
        if !self.support_vector_counts.is_empty() {
            let counted: usize = self.support_vector_counts.iter().sum();
            if counted != l {
                return Err(corrupt(format!(
                    "support vector counts sum to {counted}, but the model stores {l}"
                )));
            }
        }
        if self.dual_coefficients.len() != 1 {
            return Err(corrupt(format!(
                "{} coefficient rows, expected 1",
                self.dual_coefficients.len()
            )));
        }
        if self.rho.len() != 1 {
            return Err(corrupt(format!("{} rho values, expected 1", self.rho.len())));
        }
        if let Some(prob_a) = &self.prob_a {
            if prob_a.len() != 1 {
                return Err(corrupt(format!(
                    "{} probA values, expected 1",
                    prob_a.len()
                )));
            }
            check_finite(prob_a, "probA")?;
        }
        if self.prob_b.is_some() && self.prob_a.is_none() {
            return Err(corrupt("probB given without probA".to_string()));
        }

        Ok((2, ClassLayout::single(l)))
    }

    fn check_pairwise_lengths(&self, pairs: usize) -> Result<()> {
        if self.rho.len() != pairs {
            return Err(corrupt(format!(
                "{} rho values, expected one per class pair ({pairs})",
                self.rho.len()
            )));
        }
        match (&self.prob_a, &self.prob_b) {
            (None, None) => Ok(()),
            (Some(a), Some(b)) => {
                if a.len() != pairs || b.len() != pairs {
                    return Err(corrupt(format!(
                        "probA/probB have {}/{} values, expected {pairs}",
                        a.len(),
                        b.len()
                    )));
                }
                check_finite(a, "probA")?;
                check_finite(b, "probB")
            }
            _ => Err(corrupt("probA and probB must be given together".to_string())),
        }
    }
}

fn corrupt(message: String) -> SVMError {
    SVMError::CorruptModel(message)
}

fn check_finite(values: &[f64], what: &str) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(corrupt(format!("{what} entry {i} is not finite"))),
        None => Ok(()),
    }
}
