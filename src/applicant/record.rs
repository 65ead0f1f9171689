//! The eleven-field applicant description sent to the Prediction API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fields::{CreditHistory, Education, Gender, Married, PropertyArea, SelfEmployed};

/// Wire names of the record fields, in the order the API documents them.
pub const FIELD_NAMES: [&str; 11] = [
    "Gender",
    "Married",
    "Dependents",
    "Education",
    "Self_Employed",
    "ApplicantIncome",
    "CoapplicantIncome",
    "LoanAmount",
    "Loan_Amount_Term",
    "Credit_History",
    "Property_Area",
];

/// Minimum loan term in months accepted by the form.
pub const MIN_LOAN_TERM: f64 = 1.0;

/// A single loan applicant, ready to be scored.
///
/// Created per form submission or per selected client row; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Married")]
    pub married: Married,
    #[serde(rename = "Dependents")]
    pub dependents: u32,
    #[serde(rename = "Education")]
    pub education: Education,
    #[serde(rename = "Self_Employed")]
    pub self_employed: SelfEmployed,
    #[serde(rename = "ApplicantIncome")]
    pub applicant_income: f64,
    #[serde(rename = "CoapplicantIncome")]
    pub coapplicant_income: f64,
    /// Loan amount in thousands.
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
    /// Loan term in months.
    #[serde(rename = "Loan_Amount_Term")]
    pub loan_amount_term: f64,
    #[serde(rename = "Credit_History")]
    pub credit_history: CreditHistory,
    #[serde(rename = "Property_Area")]
    pub property_area: PropertyArea,
}

/// A field value the form would not have accepted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} doit être un nombre fini")]
    NotFinite { field: &'static str },

    #[error("{field} doit être positif ou nul (valeur: {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} doit être au moins {min} (valeur: {value})")]
    BelowMinimum {
        field: &'static str,
        min: f64,
        value: f64,
    },

    #[error("{field} doit être un nombre entier (valeur: {value})")]
    NotInteger { field: &'static str, value: f64 },

    #[error(transparent)]
    UnknownValue(#[from] super::fields::UnknownValue),
}

impl ApplicantRecord {
    /// Check the numeric constraints the form enforces on input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let amounts = [
            ("ApplicantIncome", self.applicant_income),
            ("CoapplicantIncome", self.coapplicant_income),
            ("LoanAmount", self.loan_amount),
            ("Loan_Amount_Term", self.loan_amount_term),
        ];

        for (field, value) in amounts {
            check_non_negative(field, value)?;
        }

        if self.loan_amount_term < MIN_LOAN_TERM {
            return Err(ValidationError::BelowMinimum {
                field: "Loan_Amount_Term",
                min: MIN_LOAN_TERM,
                value: self.loan_amount_term,
            });
        }

        Ok(())
    }
}

/// Reject NaN, infinities and negative numbers.
pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// Convert a non-negative whole number (possibly sent as `2.0`) to a count.
pub(crate) fn check_count(field: &'static str, value: f64) -> Result<u32, ValidationError> {
    let value = check_non_negative(field, value)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(ValidationError::NotInteger { field, value });
    }
    Ok(value as u32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
