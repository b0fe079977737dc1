//! Model serialization and persistence
//!
//! Trained models are stored as a JSON document. Loading goes through the
//! [`ModelRepository`] trait so the inference engine does not care where a
//! model comes from; every document is rebuilt through [`ModelBuilder`] and
//! therefore passes the same structural checks as a model built in memory.

use crate::core::{Result, SVMError, SparseVector, SvmType};
use crate::kernel::{KernelConfig, KernelType};
use crate::model::{Model, ModelBuilder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Source of trained models
pub trait ModelRepository {
    fn load_model(&self) -> Result<Model>;
}

/// Serializable representation of a trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableModel {
    pub svm_type: String,
    pub kernel: SerializableKernel,
    pub class_count: usize,
    /// Support vectors, grouped by class
    pub support_vectors: Vec<SparseVector>,
    /// `class_count - 1` rows, one entry per support vector
    pub dual_coefficients: Vec<Vec<f64>>,
    /// One offset per class pair, canonical pair order
    pub rho: Vec<f64>,
    #[serde(default)]
    pub class_labels: Vec<f64>,
    #[serde(default)]
    pub support_vector_counts: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prob_a: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prob_b: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_vector_indices: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ModelMetadata>,
}

/// Kernel family and parameters as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableKernel {
    pub kernel_type: String,
    #[serde(default = "default_degree")]
    pub degree: u32,
    #[serde(default)]
    pub gamma: f64,
    #[serde(default)]
    pub coef0: f64,
}

fn default_degree() -> u32 {
    3
}

/// Model metadata for tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to write the model
    pub library_version: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl From<&KernelConfig> for SerializableKernel {
    fn from(config: &KernelConfig) -> Self {
        Self {
            kernel_type: config.kernel_type.name().to_string(),
            degree: config.degree,
            gamma: config.gamma,
            coef0: config.coef0,
        }
    }
}

impl SerializableKernel {
    fn to_config(&self) -> Result<KernelConfig> {
        Ok(KernelConfig {
            kernel_type: self.kernel_type.parse::<KernelType>()?,
            degree: self.degree,
            gamma: self.gamma,
            coef0: self.coef0,
        })
    }
}

impl SerializableModel {
    /// Capture a model, stamping it with the library version and the current time
    pub fn from_model(model: &Model) -> Self {
        Self {
            svm_type: model.svm_type().name().to_string(),
            kernel: SerializableKernel::from(model.kernel_config()),
            class_count: model.class_count(),
            support_vectors: model.support_vectors().to_vec(),
            dual_coefficients: model.dual_coefficients().to_vec(),
            rho: model.rho().to_vec(),
            class_labels: model.class_labels().to_vec(),
            support_vector_counts: model.support_vector_counts().to_vec(),
            prob_a: model.prob_a().map(<[f64]>::to_vec),
            prob_b: model.prob_b().map(<[f64]>::to_vec),
            support_vector_indices: model.support_vector_indices().map(<[usize]>::to_vec),
            metadata: Some(ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            }),
        }
    }

    /// Validate the document and build the model it describes
    pub fn to_model(&self) -> Result<Model> {
        let svm_type = self.svm_type.parse::<SvmType>()?;
        let kernel_config = self.kernel.to_config()?;

        let model = ModelBuilder::new(svm_type, kernel_config)
            .class_count(self.class_count)
            .support_vectors(self.support_vectors.clone())
            .dual_coefficients(self.dual_coefficients.clone())
            .rho(self.rho.clone())
            .class_labels(self.class_labels.clone())
            .support_vector_counts(self.support_vector_counts.clone())
            .prob_a(self.prob_a.clone())
            .prob_b(self.prob_b.clone())
            .support_vector_indices(self.support_vector_indices.clone())
            .build()?;

        if let Some(metadata) = &self.metadata {
            debug!(
                "model written by version {} at {}",
                metadata.library_version, metadata.created_at
            );
        }
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| SVMError::SerializationError(e.to_string()))
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load model document from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

/// Model stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonModelFile {
    path: PathBuf,
}

impl JsonModelFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelRepository for JsonModelFile {
    fn load_model(&self) -> Result<Model> {
        info!("Loading model from: {:?}", self.path);
        SerializableModel::load_from_file(&self.path)?.to_model()
    }
}

/// Model read from any JSON byte stream
///
/// The reader is consumed by the first load.
pub struct JsonModelReader<R: Read> {
    reader: std::cell::RefCell<Option<R>>,
}

impl<R: Read> JsonModelReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: std::cell::RefCell::new(Some(reader)),
        }
    }
}

impl<R: Read> ModelRepository for JsonModelReader<R> {
    fn load_model(&self) -> Result<Model> {
        let reader = self.reader.borrow_mut().take().ok_or_else(|| {
            SVMError::InvalidParameter("model stream has already been read".to_string())
        })?;
        SerializableModel::from_reader(reader)?.to_model()
    }
}

/// Write `model` as JSON to `path`
pub fn save_model<P: AsRef<Path>>(model: &Model, path: P) -> Result<()> {
    SerializableModel::from_model(model).save_to_file(path.as_ref())?;
    info!("Model saved to: {:?}", path.as_ref());
    Ok(())
}
