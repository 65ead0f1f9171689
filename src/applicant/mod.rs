//! Applicant data: categorical field mappings, the scored record, and the
//! form that collects it.

pub mod fields;
pub mod form;
pub mod record;

pub use fields::{
    Categorical, CreditHistory, Education, Gender, Married, PropertyArea, SelfEmployed,
    UnknownValue, decode_cell,
};
pub use form::{FieldKind, FieldOption, FieldSpec, FormInput, form_schema};
pub use record::{ApplicantRecord, FIELD_NAMES, ValidationError};
