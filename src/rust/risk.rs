//! Turns a churn probability into a verdict and a retention recommendation.
//!
//! The verdict threshold and the tier thresholds are independent: a
//! probability of 0.55 reads "CHURN" with a Medium tier.

use serde::Serialize;
use std::fmt;

/// Probability at or above which a customer is predicted to churn.
pub const CHURN_THRESHOLD: f32 = 0.5;
/// Lower bound (inclusive) of the Medium tier.
pub const MEDIUM_RISK_THRESHOLD: f32 = 0.3;
/// Lower bound (inclusive) of the High tier.
pub const HIGH_RISK_THRESHOLD: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Stay,
    Churn,
}

impl Verdict {
    pub fn from_probability(probability: f32) -> Self {
        if probability >= CHURN_THRESHOLD {
            Verdict::Churn
        } else {
            Verdict::Stay
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Stay => "STAY (will NOT leave)",
            Verdict::Churn => "CHURN (will leave)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_probability(probability: f32) -> Self {
        if probability < MEDIUM_RISK_THRESHOLD {
            RiskTier::Low
        } else if probability < HIGH_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RiskTier::Low => "no immediate action required",
            RiskTier::Medium => "consider offering a promotion or engagement email",
            RiskTier::High => "recommend calling the customer and offering a retention plan",
        }
    }

    /// Full message, e.g. `Low risk — no immediate action required.`
    pub fn message(&self) -> String {
        format!("{} risk — {}.", self, self.advice())
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        };
        f.write_str(name)
    }
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub probability: f32,
    pub churn: bool,
}

impl PredictionResult {
    pub fn from_probability(probability: f32) -> Self {
        Self {
            probability,
            churn: Verdict::from_probability(probability) == Verdict::Churn,
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_probability(self.probability)
    }

    pub fn present(&self) -> Presentation {
        present(self.probability)
    }
}

/// What the result page shows for a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub label: &'static str,
    pub tier: RiskTier,
    pub advice: &'static str,
}

pub fn present(probability: f32) -> Presentation {
    let tier = RiskTier::from_probability(probability);
    Presentation {
        label: Verdict::from_probability(probability).label(),
        tier,
        advice: tier.advice(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_extremes() {
        let low = present(0.0);
        assert_eq!(low.label, "STAY (will NOT leave)");
        assert_eq!(low.tier, RiskTier::Low);
        assert_eq!(low.advice, "no immediate action required");

        let high = present(1.0);
        assert_eq!(high.label, "CHURN (will leave)");
        assert_eq!(high.tier, RiskTier::High);
    }

    #[test]
    fn test_present_at_churn_threshold() {
        let p = present(0.5);
        assert_eq!(p.label, "CHURN (will leave)");
        assert_eq!(p.tier, RiskTier::Medium);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(present(0.29).tier, RiskTier::Low);
        assert_eq!(present(0.3).tier, RiskTier::Medium);
        assert_eq!(present(0.59).tier, RiskTier::Medium);
        assert_eq!(present(0.6).tier, RiskTier::High);
    }

    #[test]
    fn test_label_and_tier_can_disagree() {
        let p = present(0.55);
        assert_eq!(p.label, "CHURN (will leave)");
        assert_eq!(p.tier, RiskTier::Medium);

        let p = present(0.45);
        assert_eq!(p.label, "STAY (will NOT leave)");
        assert_eq!(p.tier, RiskTier::Medium);
    }

    #[test]
    fn test_prediction_result() {
        let result = PredictionResult::from_probability(0.5);
        assert!(result.churn);
        assert_eq!(result.verdict(), Verdict::Churn);
        assert!(!PredictionResult::from_probability(0.4999).churn);
    }

    #[test]
    fn test_tier_message() {
        assert_eq!(
            RiskTier::Medium.message(),
            "Medium risk — consider offering a promotion or engagement email."
        );
    }
}
