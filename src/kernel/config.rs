//! Kernel configuration shared by every decision function of a model
//!
//! A model stores a single kernel family plus its parameters. The
//! configuration is validated once and turned into a [`ModelKernel`], which
//! dispatches to the concrete kernel implementations.

use crate::core::{Result, SVMError, SparseVector};
use crate::kernel::{
    Kernel, LinearKernel, PolynomialKernel, PrecomputedKernel, RBFKernel, SigmoidKernel,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kernel families understood by the inference engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelType {
    Linear,
    Polynomial,
    Rbf,
    Sigmoid,
    Precomputed,
}

impl KernelType {
    pub fn name(&self) -> &'static str {
        match self {
            KernelType::Linear => "linear",
            KernelType::Polynomial => "polynomial",
            KernelType::Rbf => "rbf",
            KernelType::Sigmoid => "sigmoid",
            KernelType::Precomputed => "precomputed",
        }
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelType {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(KernelType::Linear),
            "polynomial" | "poly" => Ok(KernelType::Polynomial),
            "rbf" => Ok(KernelType::Rbf),
            "sigmoid" => Ok(KernelType::Sigmoid),
            "precomputed" => Ok(KernelType::Precomputed),
            other => Err(SVMError::InvalidKernelConfig(format!(
                "unknown kernel family: {other}"
            ))),
        }
    }
}

/// Numeric kernel codes as used by LIBSVM model files (0 = linear ... 4 = precomputed)
impl TryFrom<i32> for KernelType {
    type Error = SVMError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(KernelType::Linear),
            1 => Ok(KernelType::Polynomial),
            2 => Ok(KernelType::Rbf),
            3 => Ok(KernelType::Sigmoid),
            4 => Ok(KernelType::Precomputed),
            other => Err(SVMError::InvalidKernelConfig(format!(
                "unknown kernel code: {other}"
            ))),
        }
    }
}

/// Kernel family and parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    pub kernel_type: KernelType,
    /// Used by polynomial kernels
    pub degree: u32,
    /// Used by polynomial, RBF and sigmoid kernels
    pub gamma: f64,
    /// Used by polynomial and sigmoid kernels
    pub coef0: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::linear()
    }
}

impl KernelConfig {
    pub fn linear() -> Self {
        Self {
            kernel_type: KernelType::Linear,
            degree: 3,
            gamma: 0.0,
            coef0: 0.0,
        }
    }

    pub fn polynomial(degree: u32, gamma: f64, coef0: f64) -> Self {
        Self {
            kernel_type: KernelType::Polynomial,
            degree,
            gamma,
            coef0,
        }
    }

    pub fn rbf(gamma: f64) -> Self {
        Self {
            kernel_type: KernelType::Rbf,
            gamma,
            ..Self::linear()
        }
    }

    pub fn sigmoid(gamma: f64, coef0: f64) -> Self {
        Self {
            kernel_type: KernelType::Sigmoid,
            gamma,
            coef0,
            ..Self::linear()
        }
    }

    pub fn precomputed() -> Self {
        Self {
            kernel_type: KernelType::Precomputed,
            ..Self::linear()
        }
    }

    /// Check the parameters the configured family actually reads
    pub fn validate(&self) -> Result<()> {
        let uses_gamma = matches!(
            self.kernel_type,
            KernelType::Polynomial | KernelType::Rbf | KernelType::Sigmoid
        );
        let uses_coef0 = matches!(
            self.kernel_type,
            KernelType::Polynomial | KernelType::Sigmoid
        );

        if uses_gamma && !self.gamma.is_finite() {
            return Err(SVMError::InvalidKernelConfig(format!(
                "{} kernel needs a finite gamma, got {}",
                self.kernel_type, self.gamma
            )));
        }
        if uses_coef0 && !self.coef0.is_finite() {
            return Err(SVMError::InvalidKernelConfig(format!(
                "{} kernel needs a finite coef0, got {}",
                self.kernel_type, self.coef0
            )));
        }
        if self.kernel_type == KernelType::Rbf && self.gamma < 0.0 {
            return Err(SVMError::InvalidKernelConfig(format!(
                "rbf kernel needs a non-negative gamma, got {}",
                self.gamma
            )));
        }
        Ok(())
    }

    /// Validate and build the evaluator for this configuration
    pub fn build(&self) -> Result<ModelKernel> {
        self.validate()?;
        let kernel = match self.kernel_type {
            KernelType::Linear => ModelKernel::Linear(LinearKernel::new()),
            KernelType::Polynomial => {
                ModelKernel::Polynomial(PolynomialKernel::new(self.degree, self.gamma, self.coef0))
            }
            KernelType::Rbf => ModelKernel::Rbf(RBFKernel::new(self.gamma)),
            KernelType::Sigmoid => ModelKernel::Sigmoid(SigmoidKernel::new(self.gamma, self.coef0)),
            KernelType::Precomputed => ModelKernel::Precomputed(PrecomputedKernel::new()),
        };
        Ok(kernel)
    }
}

/// Kernel evaluator selected at runtime from a [`KernelConfig`]
#[derive(Debug, Clone)]
pub enum ModelKernel {
    Linear(LinearKernel),
    Polynomial(PolynomialKernel),
    Rbf(RBFKernel),
    Sigmoid(SigmoidKernel),
    Precomputed(PrecomputedKernel),
}

impl Kernel for ModelKernel {
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        match self {
            ModelKernel::Linear(k) => k.compute(x, y),
            ModelKernel::Polynomial(k) => k.compute(x, y),
            ModelKernel::Rbf(k) => k.compute(x, y),
            ModelKernel::Sigmoid(k) => k.compute(x, y),
            ModelKernel::Precomputed(k) => k.compute(x, y),
        }
    }
}
