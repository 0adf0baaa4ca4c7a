mod error;
mod model;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;
mod onnx;
mod utils;
mod xgboost;

pub use builder::ClassifierBuilder;
pub use classifier::ChurnClassifier;
pub use error::ChurnError;
pub use model::ChurnModel;
pub use onnx::OnnxModel;
pub use xgboost::XgboostModel;

/// Information about the loaded classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path of the artifact, if the model was loaded from disk
    pub model_path: Option<String>,
    /// Inference backend, e.g. `onnx` or `xgboost-json`
    pub backend: &'static str,
    /// Model summary reported by the backend
    pub description: String,
    /// SHA-256 digest of the artifact
    pub sha256: Option<String>,
}
