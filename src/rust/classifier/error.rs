use ort::Error as OrtError;
use std::fmt;

use crate::artifact::ArtifactError;
use crate::encoding::Category;

/// Represents the different types of errors that can occur while scoring a customer.
#[derive(Debug)]
pub enum ChurnError {
    /// A categorical answer is not a member of its category's enumeration
    InvalidLabel {
        category: Category,
        label: String,
    },
    /// Error occurred while loading or inspecting the model artifact
    ModelError(String),
    /// Error occurred during the build phase
    BuildError(String),
    /// Error occurred while running inference
    PredictionError(String),
}

impl ChurnError {
    pub(crate) fn invalid_label(category: Category, label: impl Into<String>) -> Self {
        Self::InvalidLabel {
            category,
            label: label.into(),
        }
    }
}

impl fmt::Display for ChurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLabel { category, label } => write!(
                f,
                "Invalid label '{}' for {} (expected one of: {})",
                label,
                category.name(),
                category.labels().join(", ")
            ),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
        }
    }
}

impl std::error::Error for ChurnError {}

impl From<OrtError> for ChurnError {
    fn from(err: OrtError) -> Self {
        ChurnError::BuildError(err.to_string())
    }
}

impl From<ArtifactError> for ChurnError {
    fn from(err: ArtifactError) -> Self {
        ChurnError::BuildError(err.to_string())
    }
}
