use std::path::Path;

use log::{error, info};

use super::classifier::ChurnClassifier;
use super::error::ChurnError;
use super::model::ChurnModel;
use super::onnx::OnnxModel;
use super::xgboost::XgboostModel;
use crate::artifact::{ArtifactFormat, ModelArtifact};
use crate::runtime::RuntimeConfig;

/// A builder for constructing a ChurnClassifier with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    sha256: Option<String>,
    expected_sha256: Option<String>,
    model: Option<Box<dyn ChurnModel>>,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration used when an ONNX artifact is loaded.
    ///
    /// Must be called before [`with_model_path`](Self::with_model_path).
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Requires the artifact's SHA-256 digest to equal `hex`.
    ///
    /// Must be called before [`with_model_path`](Self::with_model_path).
    pub fn with_expected_sha256(mut self, hex: impl Into<String>) -> Self {
        self.expected_sha256 = Some(hex.into());
        self
    }

    /// Loads the model artifact at `path`.
    ///
    /// The format follows the extension: `.onnx` runs through ONNX Runtime,
    /// `.json` is read as an XGBoost JSON model.
    ///
    /// # Returns
    /// * `Result<Self, ChurnError>` - The builder instance if successful, or an error if:
    ///   - A model is already set
    ///   - The file does not exist or has an unsupported extension
    ///   - The digest does not match the expected one
    ///   - The model fails to load or has the wrong structure
    ///
    /// # Example
    /// ```no_run
    /// use churnguard::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_model_path("xgboost_churn_model.json");
    /// ```
    pub fn with_model_path<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ChurnError> {
        if self.model.is_some() {
            return Err(ChurnError::BuildError("Model already set".to_string()));
        }

        let artifact = ModelArtifact::open(path.as_ref(), self.expected_sha256.as_deref())
            .map_err(|e| {
                error!("Failed to open model artifact: {}", e);
                ChurnError::from(e)
            })?;

        let model: Box<dyn ChurnModel> = match artifact.format {
            ArtifactFormat::Onnx => Box::new(OnnxModel::load(&artifact.path, &self.runtime_config)?),
            ArtifactFormat::XgboostJson => Box::new(XgboostModel::load(&artifact.path)?),
        };
        info!("Model loaded: {}", model.describe());

        self.model_path = Some(artifact.path.to_string_lossy().to_string());
        self.sha256 = Some(artifact.sha256);
        self.model = Some(model);
        Ok(self)
    }

    /// Uses an already constructed model instead of loading an artifact.
    pub fn with_model(mut self, model: Box<dyn ChurnModel>) -> Result<Self, ChurnError> {
        if self.model.is_some() {
            return Err(ChurnError::BuildError("Model already set".to_string()));
        }
        self.model = Some(model);
        Ok(self)
    }

    /// Builds and returns the final ChurnClassifier instance
    ///
    /// # Errors
    /// `BuildError` if no model has been set.
    pub fn build(self) -> Result<ChurnClassifier, ChurnError> {
        let model = self
            .model
            .ok_or_else(|| ChurnError::BuildError("A model must be set".to_string()))?;

        Ok(ChurnClassifier {
            model_path: self.model_path,
            sha256: self.sha256,
            model,
        })
    }
}
