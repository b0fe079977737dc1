//! LibSVM format dataset implementation
//!
//! Supports loading query sets in the libsvm format:
//! label index:value index:value ...
//!
//! Example:
//! 3 1:0.5 3:1.2 7:0.8
//! -0.25 2:0.3 5:2.1
//!
//! Indices are kept exactly as written, so they line up with the indices of
//! the stored support vectors. Labels are kept as given: class labels of any
//! value, or real-valued regression targets. A precomputed-kernel row is
//! written as `label 0:serial 1:K(x,x1) 2:K(x,x2) ...`.

use crate::core::{Dataset, Result, SVMError, Sample, SparseVector};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dataset implementation for LibSVM format files
#[derive(Debug, Clone)]
pub struct LibSVMDataset {
    samples: Vec<Sample>,
    dimensions: usize,
}

impl LibSVMDataset {
    /// Load a dataset from a LibSVM format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut samples = Vec::new();
        let mut dimensions = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let sample = Self::parse_line(line).map_err(|e| {
                SVMError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;
            if let Some(&last) = sample.features.indices.last() {
                dimensions = dimensions.max(last + 1);
            }
            samples.push(sample);
        }

        if samples.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        Ok(LibSVMDataset {
            samples,
            dimensions,
        })
    }

    /// Build a dataset from samples already in memory
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        let dimensions = samples
            .iter()
            .filter_map(|s| s.features.indices.last())
            .map(|&i| i + 1)
            .max()
            .unwrap_or(0);
        Ok(LibSVMDataset {
            samples,
            dimensions,
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Parse a single line in libsvm format
    fn parse_line(line: &str) -> Result<Sample> {
        let mut parts = line.split_whitespace();

        let label_str = parts
            .next()
            .ok_or_else(|| SVMError::ParseError("Empty line".to_string()))?;
        let label = label_str
            .parse::<f64>()
            .map_err(|_| SVMError::ParseError(format!("Invalid label: {label_str}")))?;

        let mut pairs = Vec::new();
        for feature_str in parts {
            let (index_str, value_str) = feature_str.split_once(':').ok_or_else(|| {
                SVMError::ParseError(format!("Invalid feature format: {feature_str}"))
            })?;

            let index = index_str.parse::<usize>().map_err(|_| {
                SVMError::ParseError(format!("Invalid feature index: {index_str}"))
            })?;
            let value = value_str
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    SVMError::ParseError(format!("Invalid feature value: {value_str}"))
                })?;

            pairs.push((index, value));
        }

        pairs.sort_by_key(|&(index, _)| index);
        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(SVMError::ParseError(format!(
                "Duplicate feature index: {}",
                w[0].0
            )));
        }

        let (indices, values) = pairs.into_iter().unzip();
        let features = SparseVector::try_new(indices, values)?;
        Ok(Sample::new(features, label))
    }
}

impl Dataset for LibSVMDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.dimensions
    }

    fn get_sample(&self, i: usize) -> Sample {
        self.samples[i].clone()
    }

    fn get_labels(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.label).collect()
    }
}
