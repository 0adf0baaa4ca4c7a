//! Categorical encodings the churn model was trained with.
//!
//! Each categorical answer on the form is a closed enum with an exhaustive
//! mapping to the integer code the classifier expects. The string-keyed
//! [`encode`] entry point exists for the form layer, where answers arrive as
//! submitted labels.

use serde::{Deserialize, Serialize};

use crate::classifier::ChurnError;

/// The categorical columns of the feature schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Gender,
    SeniorCitizen,
    Contract,
    PaperlessBilling,
    PaymentMethod,
}

impl Category {
    /// Column name used when the model was trained
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::SeniorCitizen => "SeniorCitizen",
            Self::Contract => "Contract",
            Self::PaperlessBilling => "PaperlessBilling",
            Self::PaymentMethod => "PaymentMethod",
        }
    }

    /// Accepted labels, ordered by code
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Gender => &Gender::LABELS,
            Self::SeniorCitizen | Self::PaperlessBilling => &YesNo::LABELS,
            Self::Contract => &Contract::LABELS,
            Self::PaymentMethod => &PaymentMethod::LABELS,
        }
    }

    /// Human readable mapping, e.g. `0 = Male, 1 = Female`
    pub fn mapping(&self) -> String {
        self.labels()
            .iter()
            .enumerate()
            .map(|(code, label)| format!("{} = {}", code, label))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Categories restated in the mapping table under each prediction.
pub const TABLE_CATEGORIES: [Category; 3] = [
    Category::Gender,
    Category::Contract,
    Category::PaymentMethod,
];

/// Rows of the encoding table shown alongside a prediction: `(feature, mapping)`.
pub fn encoding_table() -> Vec<(&'static str, String)> {
    TABLE_CATEGORIES
        .iter()
        .map(|category| (category.name(), category.mapping()))
        .collect()
}

/// Encodes a submitted label for the given category.
///
/// # Errors
/// `ChurnError::InvalidLabel` when `label` is not one of `category.labels()`.
pub fn encode(category: Category, label: &str) -> Result<u8, ChurnError> {
    match category {
        Category::Gender => Gender::from_label(label).map(|v| v.code()),
        Category::SeniorCitizen | Category::PaperlessBilling => YesNo::from_label(label)
            .map(|v| v.code())
            .map_err(|_| ChurnError::invalid_label(category, label)),
        Category::Contract => Contract::from_label(label).map(|v| v.code()),
        Category::PaymentMethod => PaymentMethod::from_label(label).map(|v| v.code()),
    }
}

macro_rules! coded_enum {
    (@count $($t:ident)+) => { 0usize $(+ coded_enum!(@one $t))+ };
    (@one $t:ident) => { 1usize };
    (
        $(#[$meta:meta])*
        $name:ident, $category:expr, {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: [$name; coded_enum!(@count $($variant)+)] = [$($name::$variant),+];
            pub const LABELS: [&'static str; coded_enum!(@count $($variant)+)] = [$($label),+];

            /// Integer code the model was trained on
            pub fn code(&self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Label as it appears on the form
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn from_label(label: &str) -> Result<Self, ChurnError> {
                match label {
                    $($label => Ok(Self::$variant),)+
                    other => Err(ChurnError::invalid_label($category, other)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

coded_enum!(
    Gender, Category::Gender, {
        Male => (0, "Male"),
        Female => (1, "Female"),
    }
);

coded_enum!(
    Contract, Category::Contract, {
        MonthToMonth => (0, "Month-to-month"),
        OneYear => (1, "One year"),
        TwoYear => (2, "Two year"),
    }
);

coded_enum!(
    PaymentMethod, Category::PaymentMethod, {
        ElectronicCheck => (0, "Electronic check"),
        MailedCheck => (1, "Mailed check"),
        BankTransfer => (2, "Bank transfer (auto)"),
        CreditCard => (3, "Credit card (auto)"),
    }
);

coded_enum!(
    /// Answer to a yes/no question (senior citizen, paperless billing).
    YesNo, Category::SeniorCitizen, {
        No => (0, "No"),
        Yes => (1, "Yes"),
    }
);

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

impl From<YesNo> for bool {
    fn from(value: YesNo) -> Self {
        value == YesNo::Yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_label_order() {
        for category in [
            Category::Gender,
            Category::SeniorCitizen,
            Category::Contract,
            Category::PaperlessBilling,
            Category::PaymentMethod,
        ] {
            for (code, label) in category.labels().iter().enumerate() {
                assert_eq!(encode(category, label).unwrap() as usize, code);
            }
        }
    }

    #[test]
    fn test_payment_method_codes() {
        assert_eq!(PaymentMethod::ElectronicCheck.code(), 0);
        assert_eq!(PaymentMethod::MailedCheck.code(), 1);
        assert_eq!(PaymentMethod::BankTransfer.code(), 2);
        assert_eq!(PaymentMethod::CreditCard.code(), 3);
        assert_eq!(
            PaymentMethod::from_label("Credit card (auto)").unwrap(),
            PaymentMethod::CreditCard
        );
    }

    #[test]
    fn test_yes_no_is_boolean() {
        assert_eq!(YesNo::from(true).code(), 1);
        assert_eq!(YesNo::from(false).code(), 0);
        assert!(bool::from(YesNo::Yes));
    }

    #[test]
    fn test_invalid_label_names_its_category() {
        let err = encode(Category::PaperlessBilling, "Maybe").unwrap_err();
        match err {
            ChurnError::InvalidLabel { category, label } => {
                assert_eq!(category, Category::PaperlessBilling);
                assert_eq!(label, "Maybe");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Labels are matched exactly as they appear on the form
        assert!(encode(Category::Contract, "one year").is_err());
        assert!(encode(Category::Gender, "").is_err());
    }

    #[test]
    fn test_encoding_table_rows() {
        let rows = encoding_table();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ("gender", "0 = Male, 1 = Female".to_string()));
        assert_eq!(
            rows[1],
            ("Contract", "0 = Month-to-month, 1 = One year, 2 = Two year".to_string())
        );
        assert_eq!(
            rows[2].1,
            "0 = Electronic check, 1 = Mailed check, 2 = Bank transfer (auto), 3 = Credit card (auto)"
        );
    }
}
