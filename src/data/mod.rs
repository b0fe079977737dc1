//! Data loading and dataset implementations
//!
//! Query sets are read from the sparse libsvm text format and exposed through
//! the [`crate::core::Dataset`] trait.

pub mod libsvm;

pub use self::libsvm::*;
