use std::fmt::Debug;

use super::error::ChurnError;
use crate::record::FEATURE_COUNT;

/// A loaded binary classifier that scores one encoded customer row.
///
/// Implementations must be reentrant: a single instance is shared by every
/// request for the lifetime of the process.
pub trait ChurnModel: Debug + Send + Sync {
    /// Probability of the positive ("churn") class for an ordered feature row.
    ///
    /// # Errors
    /// - `PredictionError` if inference fails or produces no usable output
    fn predict_probability(&self, features: &[f32; FEATURE_COUNT]) -> Result<f32, ChurnError>;

    /// Short name of the inference backend, e.g. `onnx`
    fn backend(&self) -> &'static str;

    /// One line describing the loaded model, for logs and the page footer
    fn describe(&self) -> String;
}
