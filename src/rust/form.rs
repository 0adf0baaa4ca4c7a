//! The customer details form: field limits, defaults and submitted selections.

use serde::{Deserialize, Serialize};

use crate::encoding::{Contract, Gender, PaymentMethod, YesNo};

/// An integer slider with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderField {
    pub label: &'static str,
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl SliderField {
    pub fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }
}

/// A non-negative amount entered with a number input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountField {
    pub label: &'static str,
    pub min: f64,
    pub default: f64,
    pub step: f64,
}

impl AmountField {
    /// Applies the lower bound. Non-finite input collapses to the minimum.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.max(self.min)
        } else {
            self.min
        }
    }
}

pub const TENURE: SliderField = SliderField {
    label: "Tenure (months)",
    min: 0,
    max: 72,
    default: 12,
};

pub const TOTAL_SERVICES_USED: SliderField = SliderField {
    label: "Total Services Used",
    min: 0,
    max: 15,
    default: 5,
};

pub const FAMILY_MEMBERS: SliderField = SliderField {
    label: "Family Members",
    min: 0,
    max: 10,
    default: 1,
};

pub const MONTHLY_CHARGES: AmountField = AmountField {
    label: "Monthly Charges",
    min: 0.0,
    default: 70.0,
    step: 0.1,
};

pub const TOTAL_CHARGES: AmountField = AmountField {
    label: "Total Charges",
    min: 0.0,
    default: 2500.0,
    step: 0.1,
};

pub const GENDER_LABEL: &str = "Gender";
pub const SENIOR_CITIZEN_LABEL: &str = "Senior Citizen?";
pub const CONTRACT_LABEL: &str = "Contract type";
pub const PAPERLESS_BILLING_LABEL: &str = "Paperless Billing?";
pub const PAYMENT_METHOD_LABEL: &str = "Payment Method";

/// Raw answers as submitted by the form, categorical answers still as labels.
///
/// Field names double as the HTML input names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSelections {
    pub gender: String,
    pub senior_citizen: String,
    pub tenure: u32,
    pub contract: String,
    pub paperless_billing: String,
    pub payment_method: String,
    pub monthly_charges: f64,
    pub total_charges: f64,
    pub total_services_used: u32,
    pub family_members: u32,
}

impl Default for RawSelections {
    fn default() -> Self {
        Self {
            gender: Gender::Male.label().to_string(),
            senior_citizen: YesNo::No.label().to_string(),
            tenure: TENURE.default,
            contract: Contract::MonthToMonth.label().to_string(),
            paperless_billing: YesNo::No.label().to_string(),
            payment_method: PaymentMethod::ElectronicCheck.label().to_string(),
            monthly_charges: MONTHLY_CHARGES.default,
            total_charges: TOTAL_CHARGES.default,
            total_services_used: TOTAL_SERVICES_USED.default,
            family_members: FAMILY_MEMBERS.default,
        }
    }
}

impl RawSelections {
    /// Re-applies the limits the form widgets enforce in the browser.
    ///
    /// Submissions that bypass the widgets are brought back into range rather
    /// than rejected. Labels are left untouched.
    pub fn clamped(mut self) -> Self {
        self.tenure = TENURE.clamp(self.tenure);
        self.monthly_charges = MONTHLY_CHARGES.clamp(self.monthly_charges);
        self.total_charges = TOTAL_CHARGES.clamp(self.total_charges);
        self.total_services_used = TOTAL_SERVICES_USED.clamp(self.total_services_used);
        self.family_members = FAMILY_MEMBERS.clamp(self.family_members);
        self
    }
}
