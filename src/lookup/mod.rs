//! Client lookup: find a record in the test dataset by identifier, show it
//! as label/value cards, and turn it back into a scorable record.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::applicant::fields::{Categorical, decode_cell};
use crate::applicant::record::{check_count, check_non_negative};
use crate::applicant::{
    ApplicantRecord, CreditHistory, Education, FIELD_NAMES, Gender, Married, PropertyArea,
    SelfEmployed, ValidationError,
};
use crate::dataset::{DatasetError, Table};

/// Why a client could not be shown or scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Colonne ID non trouvée.")]
    NoIdColumn,

    #[error("Client introuvable.")]
    ClientNotFound { id: String },

    #[error("Données incomplètes pour le client {id} : {}", .fields.join(", "))]
    IncompleteRecord { id: String, fields: Vec<String> },

    #[error(transparent)]
    InvalidField(#[from] ValidationError),
}

/// One label/value pair displayed for the selected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub label: String,
    pub value: String,
}

/// Placeholder shown for blank cells.
pub const BLANK_VALUE: &str = "—";

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The test dataset with its identifier column resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDataset {
    table: Table,
    id_column: usize,
}

impl ClientDataset {
    /// Read the CSV and resolve the identifier column.
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        Self::from_table(Table::from_path(path)?)
    }

    /// The identifier column is the first header containing `id`,
    /// case-insensitively (`Loan_ID`, `client_id`, `Id`, ...).
    pub fn from_table(table: Table) -> Result<Self, LookupError> {
        let id_column = table
            .headers
            .iter()
            .position(|h| h.to_lowercase().contains("id"))
            .ok_or(LookupError::NoIdColumn)?;
        Ok(Self { table, id_column })
    }

    pub fn id_column(&self) -> &str {
        &self.table.headers[self.id_column]
    }

    /// Distinct non-blank identifiers, in file order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for row in &self.table.rows {
            let id = row[self.id_column].as_str();
            if !id.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// First row whose identifier equals `id`.
    pub fn find(&self, id: &str) -> Option<ClientRow<'_>> {
        let id = id.trim();
        self.table
            .rows
            .iter()
            .find(|row| row[self.id_column] == id)
            .map(|values| ClientRow {
                headers: &self.table.headers,
                values,
                id_column: self.id_column,
            })
    }

    /// Like [`find`](Self::find), reporting a missing client as an error.
    pub fn get(&self, id: &str) -> Result<ClientRow<'_>, LookupError> {
        self.find(id).ok_or_else(|| LookupError::ClientNotFound {
            id: id.trim().to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// A borrowed view of one client record.
#[derive(Debug, Clone, Copy)]
pub struct ClientRow<'a> {
    headers: &'a [String],
    values: &'a [String],
    id_column: usize,
}

impl<'a> ClientRow<'a> {
    pub fn id(&self) -> &'a str {
        &self.values[self.id_column]
    }

    /// Raw cell for a column: exact name first, then case-insensitive.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self
            .headers
            .iter()
            .position(|h| h == column)
            .or_else(|| self.headers.iter().position(|h| h.eq_ignore_ascii_case(column)))?;
        self.values.get(index).map(String::as_str)
    }

    /// Every field of the row, with categorical codes decoded to labels.
    pub fn cards(&self) -> Vec<Card> {
        self.headers
            .iter()
            .zip(self.values)
            .map(|(header, raw)| Card {
                label: card_label(header),
                value: if raw.is_empty() {
                    BLANK_VALUE.to_string()
                } else {
                    decode_cell(header, raw)
                },
            })
            .collect()
    }

    /// Re-encode the displayed values into a record for the Prediction API.
    ///
    /// Each field goes through the same decoding as [`cards`](Self::cards)
    /// and then the reverse mapping, so labels, dataset spellings and codes
    /// are all accepted. `Dependents` of `3+` counts as 3.
    pub fn to_record(&self) -> Result<ApplicantRecord, LookupError> {
        let missing: Vec<String> = FIELD_NAMES
            .iter()
            .filter(|name| self.get(name).is_none_or(str::is_empty))
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(LookupError::IncompleteRecord {
                id: self.id().to_string(),
                fields: missing,
            });
        }

        let record = ApplicantRecord {
            gender: self.categorical::<Gender>()?,
            married: self.categorical::<Married>()?,
            dependents: self.dependents()?,
            education: self.categorical::<Education>()?,
            self_employed: self.categorical::<SelfEmployed>()?,
            applicant_income: self.amount("ApplicantIncome")?,
            coapplicant_income: self.amount("CoapplicantIncome")?,
            loan_amount: self.amount("LoanAmount")?,
            loan_amount_term: self.amount("Loan_Amount_Term")?,
            credit_history: self.categorical::<CreditHistory>()?,
            property_area: self.categorical::<PropertyArea>()?,
        };
        record.validate()?;
        Ok(record)
    }

    fn cell(&self, field: &'static str) -> &'a str {
        self.get(field).unwrap_or_default()
    }

    fn categorical<T: Categorical>(&self) -> Result<T, ValidationError> {
        let shown = decode_cell(T::FIELD, self.cell(T::FIELD));
        Ok(T::parse(&shown)?)
    }

    fn dependents(&self) -> Result<u32, ValidationError> {
        let raw = self.cell("Dependents");
        let value = parse_number("Dependents", raw.trim_end_matches('+'))?;
        check_count("Dependents", value)
    }

    fn amount(&self, field: &'static str) -> Result<f64, ValidationError> {
        check_non_negative(field, parse_number(field, self.cell(field))?)
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim().parse::<f64>().map_err(|_| {
        ValidationError::UnknownValue(crate::applicant::UnknownValue {
            field,
            value: raw.to_string(),
        })
    })
}

/// Column header as a card title: underscores become spaces, then only the
/// first letter is upper-case (`Loan_Amount_Term` → `Loan amount term`).
pub fn card_label(header: &str) -> String {
    let spaced = header.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
