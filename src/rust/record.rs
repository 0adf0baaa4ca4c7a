//! Feature vector assembly.

use serde::Serialize;

use crate::classifier::ChurnError;
use crate::encoding::{encode, Category};
use crate::form::RawSelections;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 10;

/// Training column names, in the order the classifier expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gender",
    "SeniorCitizen",
    "tenure",
    "Contract",
    "PaperlessBilling",
    "PaymentMethod",
    "MonthlyCharges",
    "TotalCharges",
    "TotalServiceused",
    "FamilyMembers",
];

/// One customer, encoded for the classifier.
///
/// The field order mirrors [`FEATURE_NAMES`]. Serializes with the training
/// column names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CustomerRecord {
    #[serde(rename = "gender")]
    pub gender: u8,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: u8,
    #[serde(rename = "tenure")]
    pub tenure: u32,
    #[serde(rename = "Contract")]
    pub contract: u8,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: u8,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: u8,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
    #[serde(rename = "TotalServiceused")]
    pub total_services_used: u32,
    #[serde(rename = "FamilyMembers")]
    pub family_members: u32,
}

impl CustomerRecord {
    /// The record as a model input row, ordered as [`FEATURE_NAMES`].
    pub fn to_features(&self) -> [f32; FEATURE_COUNT] {
        [
            f32::from(self.gender),
            f32::from(self.senior_citizen),
            self.tenure as f32,
            f32::from(self.contract),
            f32::from(self.paperless_billing),
            f32::from(self.payment_method),
            self.monthly_charges as f32,
            self.total_charges as f32,
            self.total_services_used as f32,
            self.family_members as f32,
        ]
    }
}

/// Builds a record from form selections.
///
/// Categorical labels go through the encoding table; numbers pass through
/// unchanged.
///
/// # Errors
/// `ChurnError::InvalidLabel` if any categorical label is unknown.
pub fn build(raw: &RawSelections) -> Result<CustomerRecord, ChurnError> {
    Ok(CustomerRecord {
        gender: encode(Category::Gender, &raw.gender)?,
        senior_citizen: encode(Category::SeniorCitizen, &raw.senior_citizen)?,
        tenure: raw.tenure,
        contract: encode(Category::Contract, &raw.contract)?,
        paperless_billing: encode(Category::PaperlessBilling, &raw.paperless_billing)?,
        payment_method: encode(Category::PaymentMethod, &raw.payment_method)?,
        monthly_charges: raw.monthly_charges,
        total_charges: raw.total_charges,
        total_services_used: raw.total_services_used,
        family_members: raw.family_members,
    })
}
