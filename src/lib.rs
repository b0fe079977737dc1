//! Inference engine for trained Support Vector Machine models
//!
//! Evaluates models in the one-vs-one layout popularised by LIBSVM: kernel
//! decision values for every class pair, majority voting, and calibrated
//! class probabilities through Platt scaling and pairwise coupling.

pub mod cache;
pub mod core;
pub mod data;
pub mod evaluation;
pub mod kernel;
pub mod model;
pub mod persistence;

// Re-export main types for convenience
pub use crate::cache::{CacheStats, KernelCache};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::data::LibSVMDataset;
pub use crate::evaluation::{
    ClassPrecision, ClassRecall, Evaluator, GeometricMean, Metric, OverallAccuracy,
};
pub use crate::kernel::{Kernel, KernelConfig, KernelType};
pub use crate::model::{Model, ModelBuilder, ModelInfo};
pub use crate::persistence::{save_model, JsonModelFile, JsonModelReader, ModelRepository};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
