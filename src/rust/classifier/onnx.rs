use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;

use super::error::ChurnError;
use super::model::ChurnModel;
use crate::record::FEATURE_COUNT;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Output tensor name used by skl2onnx/onnxmltools classifier exports.
const PROBABILITIES_OUTPUT: &str = "probabilities";

/// A churn classifier exported to ONNX and executed by ONNX Runtime.
///
/// The graph is expected to:
/// - Accept one float input of shape [batch_size, 10], columns ordered as the record
/// - Produce class probabilities, either as an output named `probabilities`
///   of shape [batch_size, 2] or as its last output
///
/// Exports with a ZipMap output (sequence of maps) must be converted with
/// `zipmap=False`.
#[derive(Debug)]
pub struct OnnxModel {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxModel {
    pub fn load<P: AsRef<Path>>(path: P, config: &RuntimeConfig) -> Result<Self, ChurnError> {
        let path = path.as_ref();
        let session = create_session_builder(config)?
            .commit_from_file(path)
            .map_err(|e| {
                ChurnError::ModelError(format!("Failed to load {}: {}", path.display(), e))
            })?;

        let (input_name, output_name) = Self::validate_model(&session)?;
        info!(
            "ONNX model loaded from {:?} (input '{}', output '{}')",
            path, input_name, output_name
        );

        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }

    /// Checks the graph shape and picks the input and probability output names.
    fn validate_model(session: &Session) -> Result<(String, String), ChurnError> {
        let inputs: Vec<&str> = session.inputs.iter().map(|i| i.name.as_str()).collect();
        let outputs: Vec<&str> = session.outputs.iter().map(|o| o.name.as_str()).collect();

        let input = single_input(&inputs)?;
        let output = pick_output(&outputs)?;
        if output != PROBABILITIES_OUTPUT {
            warn!(
                "No '{}' output, reading probabilities from '{}'",
                PROBABILITIES_OUTPUT, output
            );
        }

        Ok((input.to_string(), output.to_string()))
    }
}

/// The graph takes exactly one input: the feature row.
fn single_input<'a>(names: &[&'a str]) -> Result<&'a str, ChurnError> {
    match names {
        [name] => Ok(*name),
        _ => Err(ChurnError::ModelError(format!(
            "Model must have exactly 1 input (the feature row), found {}",
            names.len()
        ))),
    }
}

/// Prefers the `probabilities` output, falling back to the last one.
fn pick_output<'a>(names: &[&'a str]) -> Result<&'a str, ChurnError> {
    names
        .iter()
        .find(|name| **name == PROBABILITIES_OUTPUT)
        .or_else(|| names.last())
        .copied()
        .ok_or_else(|| {
            ChurnError::ModelError("Model must have at least 1 output for probabilities".into())
        })
}

impl ChurnModel for OnnxModel {
    fn predict_probability(&self, features: &[f32; FEATURE_COUNT]) -> Result<f32, ChurnError> {
        let input = Array2::from_shape_vec((1, FEATURE_COUNT), features.to_vec()).map_err(|e| {
            ChurnError::PredictionError(format!("Failed to create input array: {}", e))
        })?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(input).map_err(|e| {
                ChurnError::PredictionError(format!("Failed to create input tensor: {}", e))
            })?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ChurnError::PredictionError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ChurnError::PredictionError(format!("Failed to extract output tensor: {}", e))
            })?;

        let shape = output_tensor.shape().to_vec();
        let row: Vec<f32> = output_tensor.iter().copied().collect();
        probability_from_row(&shape, &row)
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }

    fn describe(&self) -> String {
        format!(
            "ONNX graph, input '{}', output '{}'",
            self.input_name, self.output_name
        )
    }
}

/// Picks the churn probability out of a single-row output tensor.
///
/// `[1, 2]` holds both class probabilities (churn is column 1); `[1, 1]` and
/// `[1]` hold the churn probability directly.
fn probability_from_row(shape: &[usize], values: &[f32]) -> Result<f32, ChurnError> {
    let columns = match shape {
        [1, c] => *c,
        [1] => 1,
        other => {
            return Err(ChurnError::PredictionError(format!(
                "Unexpected output shape {:?}",
                other
            )))
        }
    };
    match (columns, values) {
        (2, [_, churn]) => Ok(*churn),
        (1, [churn]) => Ok(*churn),
        _ => Err(ChurnError::PredictionError(format!(
            "Expected 1 or 2 probabilities per row, got shape {:?}",
            shape
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_column_output_uses_churn_column() {
        assert_eq!(probability_from_row(&[1, 2], &[0.3, 0.7]).unwrap(), 0.7);
    }

    #[test]
    fn test_single_probability_output() {
        assert_eq!(probability_from_row(&[1, 1], &[0.42]).unwrap(), 0.42);
        assert_eq!(probability_from_row(&[1], &[0.42]).unwrap(), 0.42);
    }

    #[test]
    fn test_unexpected_output_shapes() {
        assert!(probability_from_row(&[1, 3], &[0.2, 0.3, 0.5]).is_err());
        assert!(probability_from_row(&[2, 2], &[0.1, 0.9, 0.2, 0.8]).is_err());
        assert!(probability_from_row(&[1, 2, 1], &[0.1, 0.9]).is_err());
    }

    #[test]
    fn test_prefers_probabilities_output() {
        assert_eq!(
            pick_output(&["output_label", "probabilities"]).unwrap(),
            "probabilities"
        );
        assert_eq!(
            pick_output(&["probabilities", "output_label"]).unwrap(),
            "probabilities"
        );
    }

    #[test]
    fn test_falls_back_to_last_output() {
        assert_eq!(pick_output(&["label", "scores"]).unwrap(), "scores");
        assert_eq!(pick_output(&["variable"]).unwrap(), "variable");
    }

    #[test]
    fn test_model_without_outputs_is_rejected() {
        assert!(matches!(pick_output(&[]), Err(ChurnError::ModelError(_))));
    }

    #[test]
    fn test_requires_exactly_one_input() {
        assert_eq!(single_input(&["float_input"]).unwrap(), "float_input");
        assert!(matches!(single_input(&[]), Err(ChurnError::ModelError(_))));
        assert!(matches!(
            single_input(&["features", "mask"]),
            Err(ChurnError::ModelError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_model_error() {
        let result = OnnxModel::load("/nonexistent/churn.onnx", &RuntimeConfig::default());
        assert!(result.is_err());
    }
}
