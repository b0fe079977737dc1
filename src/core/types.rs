//! Core type definitions for SVM inference

use crate::core::{Result, SVMError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prediction result for a single query
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted class label, or the regression value
    pub label: f64,
    /// Raw decision values, one per pairwise decision function
    pub decision_values: Vec<f64>,
    /// Class probabilities in model class order, when requested
    pub probabilities: Option<Vec<f64>>,
}

impl Prediction {
    /// Create a new prediction without probability estimates
    pub fn new(label: f64, decision_values: Vec<f64>) -> Self {
        Self {
            label,
            decision_values,
            probabilities: None,
        }
    }

    /// Attach probability estimates
    pub fn with_probabilities(mut self, probabilities: Vec<f64>) -> Self {
        self.probabilities = Some(probabilities);
        self
    }

    /// Confidence as the smallest distance to any pairwise boundary
    pub fn confidence(&self) -> f64 {
        self.decision_values
            .iter()
            .map(|v| v.abs())
            .fold(f64::INFINITY, f64::min)
    }
}

/// Sparse vector representation with sorted indices
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector, ensuring indices are sorted
    ///
    /// # Panics
    /// Panics if the lengths differ or an index appears twice.
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "Indices and values must have same length"
        );

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);
        assert!(
            pairs.windows(2).all(|w| w[0].0 != w[1].0),
            "Indices must be unique"
        );

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Create a sparse vector from indices that must already be ascending and unique
    pub fn try_new(indices: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        let vector = Self { indices, values };
        vector.check_well_formed()?;
        Ok(vector)
    }

    /// Create a sparse vector from (index, value) pairs in any order
    pub fn from_pairs(pairs: &[(usize, f64)]) -> Self {
        let (indices, values) = pairs.iter().copied().unzip();
        Self::new(indices, values)
    }

    /// Create a sparse vector from a dense slice, dropping exact zeros
    pub fn from_dense(values: &[f64]) -> Self {
        let (indices, values) = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
            .unzip();
        Self { indices, values }
    }

    /// Create an empty sparse vector
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check the ascending/unique index invariant and that every value is finite
    pub fn check_well_formed(&self) -> Result<()> {
        if self.indices.len() != self.values.len() {
            return Err(SVMError::InvalidParameter(format!(
                "sparse vector has {} indices but {} values",
                self.indices.len(),
                self.values.len()
            )));
        }
        if let Some(w) = self.indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SVMError::InvalidParameter(format!(
                "sparse vector indices must be strictly ascending, found {} before {}",
                w[0], w[1]
            )));
        }
        if let Some(pos) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(SVMError::InvalidParameter(format!(
                "sparse vector value at index {} is not finite",
                self.indices[pos]
            )));
        }
        Ok(())
    }

    /// Get the value at a specific index (0 if not present)
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Iterate over (index, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Compute squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Check if vector is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Labelled query vector, as read from a dataset
#[derive(Clone, Debug)]
pub struct Sample {
    /// Feature vector (sparse representation)
    pub features: SparseVector,
    /// Class label or regression target
    pub label: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: SparseVector, label: f64) -> Self {
        Self { features, label }
    }
}

/// Formulation the model was trained with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SvmType {
    CSvc,
    NuSvc,
    OneClass,
    EpsilonSvr,
    NuSvr,
}

impl SvmType {
    /// Whether predictions come from one-vs-one voting
    pub fn is_classification(&self) -> bool {
        matches!(self, SvmType::CSvc | SvmType::NuSvc)
    }

    /// Whether predictions are real-valued regression outputs
    pub fn is_regression(&self) -> bool {
        matches!(self, SvmType::EpsilonSvr | SvmType::NuSvr)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SvmType::CSvc => "c_svc",
            SvmType::NuSvc => "nu_svc",
            SvmType::OneClass => "one_class",
            SvmType::EpsilonSvr => "epsilon_svr",
            SvmType::NuSvr => "nu_svr",
        }
    }
}

impl fmt::Display for SvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SvmType {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "c_svc" => Ok(SvmType::CSvc),
            "nu_svc" => Ok(SvmType::NuSvc),
            "one_class" => Ok(SvmType::OneClass),
            "epsilon_svr" => Ok(SvmType::EpsilonSvr),
            "nu_svr" => Ok(SvmType::NuSvr),
            other => Err(SVMError::CorruptModel(format!("unknown svm type: {other}"))),
        }
    }
}

/// Numerical settings for probability estimation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceConfig {
    /// Pairwise probabilities are clamped into [min_probability, 1 - min_probability]
    pub min_probability: f64,
    /// Lower bound on coupling iterations; the cap is max(this, class count)
    pub max_coupling_iterations: usize,
    /// Coupling stops once the optimality residual drops below tolerance / class count
    pub coupling_tolerance: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            min_probability: 1e-7,
            max_coupling_iterations: 100,
            coupling_tolerance: 0.005,
        }
    }
}

impl InferenceConfig {
    pub fn with_min_probability(mut self, min_probability: f64) -> Self {
        self.min_probability = min_probability;
        self
    }

    pub fn with_max_coupling_iterations(mut self, max_iterations: usize) -> Self {
        self.max_coupling_iterations = max_iterations;
        self
    }

    pub fn with_coupling_tolerance(mut self, tolerance: f64) -> Self {
        self.coupling_tolerance = tolerance;
        self
    }

    /// Reject settings that would break the probability guarantees
    pub fn validate(&self) -> Result<()> {
        if !(self.min_probability > 0.0 && self.min_probability < 0.5) {
            return Err(SVMError::InvalidParameter(format!(
                "min_probability must be in (0, 0.5), got {}",
                self.min_probability
            )));
        }
        if self.max_coupling_iterations == 0 {
            return Err(SVMError::InvalidParameter(
                "max_coupling_iterations must be positive".to_string(),
            ));
        }
        if !(self.coupling_tolerance > 0.0 && self.coupling_tolerance.is_finite()) {
            return Err(SVMError::InvalidParameter(format!(
                "coupling_tolerance must be positive, got {}",
                self.coupling_tolerance
            )));
        }
        Ok(())
    }
}
