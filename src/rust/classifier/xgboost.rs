use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use super::error::ChurnError;
use super::model::ChurnModel;
use super::utils::{logit, sigmoid};
use crate::record::{FEATURE_COUNT, FEATURE_NAMES};

/// Objectives whose output transform is the logistic sigmoid.
const LOGISTIC_OBJECTIVES: [&str; 2] = ["binary:logistic", "reg:logistic"];

#[derive(Debug, Deserialize)]
struct Document {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    #[serde(default)]
    attributes: HashMap<String, String>,
    #[serde(default)]
    feature_names: Vec<String>,
    gradient_booster: GradientBooster,
    learner_model_param: LearnerModelParam,
    objective: Objective,
}

#[derive(Debug, Deserialize)]
struct GradientBooster {
    name: String,
    model: Option<TreeEnsemble>,
}

#[derive(Debug, Deserialize)]
struct TreeEnsemble {
    #[serde(default)]
    gbtree_model_param: Option<EnsembleParam>,
    trees: Vec<RawTree>,
}

#[derive(Debug, Deserialize)]
struct EnsembleParam {
    #[serde(default)]
    num_parallel_tree: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<u32>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<u8>,
}

/// Older dumps store booleans as 0/1, newer ones as `true`/`false`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(i) => *i != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    num_feature: String,
    #[serde(default)]
    num_class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Objective {
    name: String,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    left: i32,
    right: i32,
    feature: usize,
    /// Split threshold, or the leaf value when `left < 0`
    value: f32,
    default_left: bool,
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_raw(index: usize, raw: RawTree) -> Result<Self, ChurnError> {
        let invalid = |msg: String| ChurnError::ModelError(format!("tree {}: {}", index, msg));

        let n = raw.left_children.len();
        if n == 0 {
            return Err(invalid("no nodes".into()));
        }
        if [
            raw.right_children.len(),
            raw.split_indices.len(),
            raw.split_conditions.len(),
            raw.default_left.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(invalid("node arrays have different lengths".into()));
        }
        if raw.split_type.iter().any(|&t| t != 0) {
            return Err(invalid("categorical splits are not supported".into()));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (raw.left_children[i], raw.right_children[i]);
            let feature = raw.split_indices[i] as usize;
            let is_leaf = left < 0;
            if !is_leaf {
                // Children are always allocated after their parent, which also
                // rules out cycles.
                for child in [left, right] {
                    if child <= i as i32 || child as usize >= n {
                        return Err(invalid(format!("node {} has invalid child {}", i, child)));
                    }
                }
                if feature >= FEATURE_COUNT {
                    return Err(invalid(format!(
                        "node {} splits on feature {} (model input has {})",
                        i, feature, FEATURE_COUNT
                    )));
                }
            }
            nodes.push(Node {
                left,
                right,
                feature,
                value: raw.split_conditions[i],
                default_left: raw.default_left[i].is_set(),
            });
        }
        Ok(Self { nodes })
    }

    fn leaf_value(&self, features: &[f32; FEATURE_COUNT]) -> f32 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.left < 0 {
                return node.value;
            }
            let x = features[node.feature];
            let go_left = if x.is_nan() {
                node.default_left
            } else {
                x < node.value
            };
            idx = if go_left { node.left } else { node.right } as usize;
        }
    }
}

/// A gradient-boosted tree ensemble read from an XGBoost JSON model file.
///
/// Scores exactly like `XGBClassifier.predict_proba(...)[:, 1]`: the leaf
/// values of every tree are summed onto the base margin and passed through
/// the logistic sigmoid. Rows are evaluated in `f32`, as XGBoost does.
#[derive(Debug, Clone)]
pub struct XgboostModel {
    trees: Vec<Tree>,
    base_margin: f32,
    objective: String,
}

impl XgboostModel {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChurnError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ChurnError::ModelError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let model = Self::from_json(&json)?;
        info!(
            "Loaded XGBoost model from {:?}: {} trees, objective {}",
            path,
            model.trees.len(),
            model.objective
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ChurnError> {
        let document: Document = serde_json::from_str(json)
            .map_err(|e| ChurnError::ModelError(format!("Not an XGBoost JSON model: {}", e)))?;
        let learner = document.learner;

        let objective = learner.objective.name;
        if !LOGISTIC_OBJECTIVES.contains(&objective.as_str()) {
            return Err(ChurnError::ModelError(format!(
                "Unsupported objective '{}' (expected binary:logistic)",
                objective
            )));
        }

        let num_class = learner
            .learner_model_param
            .num_class
            .as_deref()
            .map(parse_number::<u32>)
            .transpose()?
            .unwrap_or(0);
        if num_class > 1 {
            return Err(ChurnError::ModelError(format!(
                "Expected a binary classifier, model has {} classes",
                num_class
            )));
        }

        let num_feature = parse_number::<usize>(&learner.learner_model_param.num_feature)?;
        if num_feature != FEATURE_COUNT {
            return Err(ChurnError::ModelError(format!(
                "Model expects {} features, customer records have {}",
                num_feature, FEATURE_COUNT
            )));
        }
        if !learner.feature_names.is_empty() && learner.feature_names != FEATURE_NAMES {
            warn!(
                "Model feature names {:?} differ from record columns {:?}; features are passed by position",
                learner.feature_names, FEATURE_NAMES
            );
        }

        let base_score = parse_number::<f32>(&learner.learner_model_param.base_score)?;
        if !(base_score > 0.0 && base_score < 1.0) {
            return Err(ChurnError::ModelError(format!(
                "base_score {} is not a probability",
                base_score
            )));
        }

        let booster = learner.gradient_booster;
        if booster.name != "gbtree" {
            return Err(ChurnError::ModelError(format!(
                "Unsupported booster '{}' (expected gbtree)",
                booster.name
            )));
        }
        let ensemble = booster
            .model
            .ok_or_else(|| ChurnError::ModelError("Booster has no tree model".into()))?;

        let parallel = ensemble
            .gbtree_model_param
            .and_then(|p| p.num_parallel_tree)
            .as_deref()
            .map(parse_number::<usize>)
            .transpose()?
            .unwrap_or(1)
            .max(1);

        let mut trees = ensemble
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Tree::from_raw(i, raw))
            .collect::<Result<Vec<_>, _>>()?;

        // predict_proba stops at the early-stopping iteration when one was recorded
        if let Some(best) = learner.attributes.get("best_iteration") {
            let keep = (parse_number::<usize>(best)? + 1) * parallel;
            trees.truncate(keep);
        }

        if trees.is_empty() {
            return Err(ChurnError::ModelError("Model contains no trees".into()));
        }

        Ok(Self {
            trees,
            base_margin: logit(base_score),
            objective,
        })
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Untransformed score: base margin plus the sum of leaf values.
    pub fn margin(&self, features: &[f32; FEATURE_COUNT]) -> f32 {
        self.trees
            .iter()
            .fold(self.base_margin, |acc, tree| acc + tree.leaf_value(features))
    }
}

impl ChurnModel for XgboostModel {
    fn predict_probability(&self, features: &[f32; FEATURE_COUNT]) -> Result<f32, ChurnError> {
        Ok(sigmoid(self.margin(features)))
    }

    fn backend(&self) -> &'static str {
        "xgboost-json"
    }

    fn describe(&self) -> String {
        format!("XGBoost {} ensemble, {} trees", self.objective, self.trees.len())
    }
}

/// XGBoost writes scalar parameters as strings, sometimes wrapped in brackets
/// (`"[5E-1]"`).
fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, ChurnError> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<T>()
        .map_err(|_| ChurnError::ModelError(format!("Invalid numeric parameter '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// One stump on tenure (feature 2) and one on monthly charges (feature 6).
    fn two_stump_model() -> serde_json::Value {
        json!({
            "learner": {
                "attributes": {},
                "feature_names": FEATURE_NAMES,
                "gradient_booster": {
                    "name": "gbtree",
                    "model": {
                        "gbtree_model_param": { "num_parallel_tree": "1", "num_trees": "2" },
                        "tree_info": [0, 0],
                        "trees": [
                            {
                                "left_children": [1, -1, -1],
                                "right_children": [2, -1, -1],
                                "split_indices": [2, 0, 0],
                                "split_conditions": [24.0, 0.8, -0.6],
                                "default_left": [1, 0, 0],
                                "split_type": [0, 0, 0]
                            },
                            {
                                "left_children": [1, -1, -1],
                                "right_children": [2, -1, -1],
                                "split_indices": [6, 0, 0],
                                "split_conditions": [60.0, -0.4, 0.4],
                                "default_left": [false, false, false],
                                "split_type": [0, 0, 0]
                            }
                        ]
                    }
                },
                "learner_model_param": {
                    "base_score": "5E-1",
                    "num_class": "0",
                    "num_feature": "10"
                },
                "objective": { "name": "binary:logistic" }
            },
            "version": [2, 0, 3]
        })
    }

    fn features(tenure: f32, monthly: f32) -> [f32; FEATURE_COUNT] {
        [1.0, 0.0, tenure, 0.0, 0.0, 0.0, monthly, 2500.0, 5.0, 1.0]
    }

    #[test]
    fn test_margin_sums_leaves() {
        let model = XgboostModel::from_json(&two_stump_model().to_string()).unwrap();
        assert_eq!(model.num_trees(), 2);
        // Short tenure, high charges
        assert!((model.margin(&features(12.0, 70.0)) - 1.2).abs() < 1e-6);
        // Long tenure, low charges
        assert!((model.margin(&features(48.0, 20.0)) + 1.0).abs() < 1e-6);
        // Threshold itself goes right
        assert!((model.margin(&features(24.0, 60.0)) + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_probability_is_sigmoid_of_margin() {
        let model = XgboostModel::from_json(&two_stump_model().to_string()).unwrap();
        let p = model.predict_probability(&features(12.0, 70.0)).unwrap();
        assert!((p - sigmoid(1.2)).abs() < 1e-6);
        assert!(p > 0.5);
    }

    #[test]
    fn test_missing_value_follows_default_direction() {
        let model = XgboostModel::from_json(&two_stump_model().to_string()).unwrap();
        // NaN tenure defaults left (+0.8), NaN charges default right (+0.4)
        let margin = model.margin(&features(f32::NAN, f32::NAN));
        assert!((margin - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_base_score_shifts_margin() {
        let mut doc = two_stump_model();
        doc["learner"]["learner_model_param"]["base_score"] = json!("[2.5E-1]");
        let model = XgboostModel::from_json(&doc.to_string()).unwrap();
        let expected = logit(0.25) + 1.2;
        assert!((model.margin(&features(12.0, 70.0)) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_best_iteration_truncates() {
        let mut doc = two_stump_model();
        doc["learner"]["attributes"] = json!({ "best_iteration": "0" });
        let model = XgboostModel::from_json(&doc.to_string()).unwrap();
        assert_eq!(model.num_trees(), 1);
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let mut doc = two_stump_model();
        doc["learner"]["learner_model_param"]["num_feature"] = json!("9");
        assert!(matches!(
            XgboostModel::from_json(&doc.to_string()),
            Err(ChurnError::ModelError(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_objective() {
        let mut doc = two_stump_model();
        doc["learner"]["objective"]["name"] = json!("reg:squarederror");
        assert!(XgboostModel::from_json(&doc.to_string()).is_err());
    }

    #[test]
    fn test_rejects_backward_child() {
        let mut doc = two_stump_model();
        doc["learner"]["gradient_booster"]["model"]["trees"][0]["left_children"] =
            json!([0, -1, -1]);
        assert!(XgboostModel::from_json(&doc.to_string()).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(XgboostModel::from_json("not json").is_err());
        assert!(XgboostModel::from_json("{\"learner\": {}}").is_err());
    }
}
