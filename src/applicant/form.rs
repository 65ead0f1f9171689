//! Form collection: the field schema the page renders and the raw submission
//! it posts back.

use serde::{Deserialize, Serialize};

use super::fields::{
    Categorical, CreditHistory, Education, Gender, Married, PropertyArea, SelfEmployed,
};
use super::record::{
    ApplicantRecord, MIN_LOAN_TERM, ValidationError, check_count, check_non_negative,
};

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Raw values posted by the prediction form.
///
/// Categorical fields arrive as their numeric codes (the page shows labels
/// but submits codes). Numbers are accepted as floats since browsers send
/// `2` and `2.0` interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(rename = "Gender")]
    pub gender: u8,
    #[serde(rename = "Married")]
    pub married: u8,
    #[serde(rename = "Dependents")]
    pub dependents: f64,
    #[serde(rename = "Education")]
    pub education: u8,
    #[serde(rename = "Self_Employed")]
    pub self_employed: u8,
    #[serde(rename = "ApplicantIncome")]
    pub applicant_income: f64,
    #[serde(rename = "CoapplicantIncome")]
    pub coapplicant_income: f64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Amount_Term")]
    pub loan_amount_term: f64,
    #[serde(rename = "Credit_History")]
    pub credit_history: f64,
    #[serde(rename = "Property_Area")]
    pub property_area: u8,
}

impl Default for FormInput {
    /// The values the form shows before the user touches anything.
    fn default() -> Self {
        Self {
            gender: 0,
            married: 0,
            dependents: 0.0,
            education: 0,
            self_employed: 0,
            applicant_income: 0.0,
            coapplicant_income: 0.0,
            loan_amount: 0.0,
            loan_amount_term: MIN_LOAN_TERM,
            credit_history: 0.0,
            property_area: 0,
        }
    }
}

impl FormInput {
    /// Validate the submission and assemble the record to score.
    pub fn into_record(self) -> Result<ApplicantRecord, ValidationError> {
        let record = ApplicantRecord {
            gender: Gender::try_from(self.gender)?,
            married: Married::try_from(self.married)?,
            dependents: check_count("Dependents", self.dependents)?,
            education: Education::try_from(self.education)?,
            self_employed: SelfEmployed::try_from(self.self_employed)?,
            applicant_income: check_non_negative("ApplicantIncome", self.applicant_income)?,
            coapplicant_income: check_non_negative("CoapplicantIncome", self.coapplicant_income)?,
            loan_amount: check_non_negative("LoanAmount", self.loan_amount)?,
            loan_amount_term: self.loan_amount_term,
            credit_history: CreditHistory::try_from(self.credit_history)?,
            property_area: PropertyArea::try_from(self.property_area)?,
        };
        record.validate()?;
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Input widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Select,
    Number,
}

/// One selectable option: the submitted code and its displayed label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOption {
    pub code: f64,
    pub label: &'static str,
}

/// Description of a single form input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Layout column on the page (1 = left, 2 = right).
    pub column: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// `true` for whole-number inputs.
    pub integer: bool,
}

fn select<T: Categorical>(label: &'static str, column: u8) -> FieldSpec {
    FieldSpec {
        key: T::FIELD,
        label,
        kind: FieldKind::Select,
        column,
        options: T::VARIANTS
            .iter()
            .map(|v| FieldOption {
                code: f64::from(v.code()),
                label: v.label(),
            })
            .collect(),
        min: None,
        integer: true,
    }
}

fn number(key: &'static str, label: &'static str, column: u8, min: f64, integer: bool) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Number,
        column,
        options: Vec::new(),
        min: Some(min),
        integer,
    }
}

/// The applicant form, in display order.
pub fn form_schema() -> Vec<FieldSpec> {
    vec![
        select::<Gender>("Genre", 1),
        select::<Married>("État civil", 1),
        number("Dependents", "Personnes à charge", 1, 0.0, true),
        select::<Education>("Éducation", 1),
        select::<SelfEmployed>("Indépendant", 1),
        number("ApplicantIncome", "Revenu Demandeur", 2, 0.0, true),
        number("CoapplicantIncome", "Revenu Co-demandeur", 2, 0.0, true),
        number("LoanAmount", "Montant du prêt (en milliers)", 2, 0.0, true),
        number("Loan_Amount_Term", "Durée du prêt (mois)", 2, MIN_LOAN_TERM, true),
        select::<CreditHistory>("Historique de crédit", 2),
        select::<PropertyArea>("Zone", 2),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
