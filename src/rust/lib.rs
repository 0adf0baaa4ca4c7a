//! Customer churn scoring: a ten-field form, a pre-trained binary classifier
//! and a three-tier retention recommendation.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use churnguard::{present, record, ChurnClassifier, RawSelections};
//!
//! let classifier = ChurnClassifier::load("xgboost_churn_model.json")?;
//!
//! let selections = RawSelections {
//!     gender: "Female".into(),
//!     tenure: 12,
//!     ..RawSelections::default()
//! };
//! let customer = record::build(&selections.clamped())?;
//! let probability = classifier.predict_probability(&customer)?;
//!
//! let presentation = present(probability);
//! println!("{} ({:.2}): {}", presentation.label, probability, presentation.tier.message());
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The classifier is loaded once and shared read-only. Share it across
//! threads or request handlers with `Arc`:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use churnguard::{record, ChurnClassifier, RawSelections};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(ChurnClassifier::load("xgboost_churn_model.json")?);
//! let customer = record::build(&RawSelections::default())?;
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.predict_probability(&customer).unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod classifier;
pub mod config;
pub mod encoding;
pub mod form;
pub mod page;
pub mod record;
pub mod risk;
mod runtime;
pub mod web;

pub use artifact::{ArtifactError, ArtifactFormat, ModelArtifact, DEFAULT_MODEL_PATH};
pub use classifier::{
    ChurnClassifier, ChurnError, ChurnModel, ClassifierBuilder, ClassifierInfo, OnnxModel,
    XgboostModel,
};
pub use config::Args;
pub use encoding::{encode, Category, Contract, Gender, PaymentMethod, YesNo};
pub use form::RawSelections;
pub use record::{CustomerRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use risk::{present, Presentation, PredictionResult, RiskTier, Verdict};
pub use runtime::RuntimeConfig;

/// Initialises `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
