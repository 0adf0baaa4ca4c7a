use std::path::Path;

use log::error;

use super::builder::ClassifierBuilder;
use super::error::ChurnError;
use super::model::ChurnModel;
use super::ClassifierInfo;
use crate::record::CustomerRecord;
use crate::risk::PredictionResult;

/// The loaded churn classifier.
///
/// Constructed once at startup and shared read-only for the lifetime of the
/// process; wrap it in an `Arc` to hand it to request handlers.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use churnguard::{record, ChurnClassifier, RawSelections};
///
/// let classifier = ChurnClassifier::load("xgboost_churn_model.json")?;
/// let customer = record::build(&RawSelections::default())?;
/// let result = classifier.predict(&customer)?;
/// println!("Churn probability: {:.2}", result.probability);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ChurnClassifier {
    pub(crate) model_path: Option<String>,
    pub(crate) sha256: Option<String>,
    pub(crate) model: Box<dyn ChurnModel>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn verify_thread_safety() {
        assert_send_sync::<ChurnClassifier>();
    }
};

impl ChurnClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::new()
    }

    /// Loads the artifact at `path` with default settings.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChurnError> {
        Self::builder().with_model_path(path)?.build()
    }

    /// Returns information about the loaded model
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            model_path: self.model_path.clone(),
            backend: self.model.backend(),
            description: self.model.describe(),
            sha256: self.sha256.clone(),
        }
    }

    /// Probability that the customer churns.
    ///
    /// Deterministic: the same record always yields the same probability.
    ///
    /// # Errors
    /// `PredictionError` if inference fails or the model returns a value
    /// outside [0, 1].
    pub fn predict_probability(&self, record: &CustomerRecord) -> Result<f32, ChurnError> {
        let probability = self.model.predict_probability(&record.to_features())?;
        if !(0.0..=1.0).contains(&probability) {
            error!("Model returned {} for {:?}", probability, record);
            return Err(ChurnError::PredictionError(format!(
                "Model returned {} which is not a probability",
                probability
            )));
        }
        Ok(probability)
    }

    /// Scores the record and applies the churn threshold.
    pub fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult, ChurnError> {
        self.predict_probability(record)
            .map(PredictionResult::from_probability)
    }
}
