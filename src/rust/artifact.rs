use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Where the model artifact is looked up when nothing else is configured.
pub const DEFAULT_MODEL_PATH: &str = "xgboost_churn_model.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Unsupported model format for {0} (expected .onnx or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("Hash mismatch: expected {expected}, got {actual} for {path}")]
    HashMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

/// Serialization formats the classifier can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// ONNX graph executed by ONNX Runtime
    Onnx,
    /// XGBoost JSON model (`Booster.save_model("model.json")`)
    XgboostJson,
}

impl ArtifactFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("onnx") => Ok(Self::Onnx),
            Some("json") => Ok(Self::XgboostJson),
            _ => Err(ArtifactError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Onnx => "onnx",
            Self::XgboostJson => "xgboost-json",
        }
    }
}

/// A model file on disk, checked for existence and fingerprinted.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub path: PathBuf,
    pub format: ArtifactFormat,
    pub sha256: String,
}

impl ModelArtifact {
    /// Resolves an artifact and computes its SHA-256 digest.
    ///
    /// When `expected_sha256` is given, the digest must match it
    /// (case-insensitive).
    pub fn open<P: AsRef<Path>>(
        path: P,
        expected_sha256: Option<&str>,
    ) -> Result<Self, ArtifactError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(ArtifactError::NotFound(path));
        }
        let format = ArtifactFormat::from_path(&path)?;

        let sha256 = sha256_file(&path)?;
        log::info!("Model artifact {:?} ({}) sha256={}", path, format.name(), sha256);

        if let Some(expected) = expected_sha256 {
            let expected = expected.trim().to_ascii_lowercase();
            if expected != sha256 {
                log::error!("Model artifact hash mismatch: expected {}, got {}", expected, sha256);
                return Err(ArtifactError::HashMismatch {
                    path: path.display().to_string(),
                    expected,
                    actual: sha256,
                });
            }
            log::info!("Model artifact hash verified");
        }

        Ok(Self {
            path,
            format,
            sha256,
        })
    }
}

pub fn sha256_file(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path)?;
    log::debug!("Read {} bytes from {:?}", bytes.len(), path);
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
