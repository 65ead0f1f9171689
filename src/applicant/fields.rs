//! Categorical field domains and their label/code mappings.
//!
//! Every categorical applicant attribute is shown to the user as a French
//! label but transmitted to the Prediction API as a small integer code. The
//! reverse direction also accepts the raw spellings found in the Kaggle-style
//! test dataset (`Male`, `Graduate`, `Semiurban`, ...), so a row can be
//! re-encoded whether or not it was decoded for display first.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value outside the domain of a categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("valeur inconnue pour {field}: {value}")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

/// Shared behavior of every categorical field.
pub trait Categorical: Copy + Sized + 'static {
    /// Column name used by the Prediction API and by the datasets.
    const FIELD: &'static str;
    /// All members of the domain, ordered by code.
    const VARIANTS: &'static [Self];

    fn code(self) -> u8;

    /// French label shown in the dashboard.
    fn label(self) -> &'static str;

    /// Raw dataset spellings accepted when re-encoding.
    fn aliases(self) -> &'static [&'static str];

    fn from_code(code: u8) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.code() == code)
    }

    /// Match a French label or a dataset alias, ignoring case and
    /// surrounding whitespace.
    fn from_label(text: &str) -> Option<Self> {
        let wanted = text.trim().to_lowercase();
        Self::VARIANTS.iter().copied().find(|v| {
            v.label().to_lowercase() == wanted
                || v.aliases().iter().any(|a| a.to_lowercase() == wanted)
        })
    }

    /// Reverse mapping used by client lookup: labels, aliases, or numeric
    /// codes written as `1` or `1.0`.
    fn parse(text: &str) -> Result<Self, UnknownValue> {
        Self::from_label(text)
            .or_else(|| integral_code(text).and_then(Self::from_code))
            .ok_or_else(|| UnknownValue {
                field: Self::FIELD,
                value: text.trim().to_string(),
            })
    }
}

/// Parse `"1"`, `"1.0"` or `" 2 "` into a code; `None` for anything else.
pub(crate) fn integral_code(text: &str) -> Option<u8> {
    let value: f64 = text.trim().parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $( $variant:ident = $code:literal, $label:literal, [$($alias:literal),*] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl Categorical for $name {
            const FIELD: &'static str = $field;
            const VARIANTS: &'static [Self] = &[$( Self::$variant ),+];

            fn code(self) -> u8 {
                match self {
                    $( Self::$variant => $code ),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            fn aliases(self) -> &'static [&'static str] {
                match self {
                    $( Self::$variant => &[$($alias),*] ),+
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = UnknownValue;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                Self::from_code(code).ok_or_else(|| UnknownValue {
                    field: $field,
                    value: code.to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical! {
    #[derive(Serialize, Deserialize)]
    #[serde(into = "u8", try_from = "u8")]
    Gender, field = "Gender" {
        Female = 0, "Femme", ["Female"],
        Male = 1, "Homme", ["Male"],
    }
}

categorical! {
    #[derive(Serialize, Deserialize)]
    #[serde(into = "u8", try_from = "u8")]
    Married, field = "Married" {
        No = 0, "Non Marié(e)", ["No"],
        Yes = 1, "Marié(e)", ["Yes"],
    }
}

categorical! {
    #[derive(Serialize, Deserialize)]
    #[serde(into = "u8", try_from = "u8")]
    Education, field = "Education" {
        Graduate = 0, "Supérieur", ["Graduate"],
        NotGraduate = 1, "Non Supérieur", ["Not Graduate"],
    }
}

categorical! {
    #[derive(Serialize, Deserialize)]
    #[serde(into = "u8", try_from = "u8")]
    SelfEmployed, field = "Self_Employed" {
        No = 0, "Non", ["No"],
        Yes = 1, "Oui", ["Yes"],
    }
}

categorical! {
    /// Serialized as a float (`0.0` / `1.0`), the way the scoring model was
    /// trained.
    #[derive(Serialize, Deserialize)]
    #[serde(into = "f64", try_from = "f64")]
    CreditHistory, field = "Credit_History" {
        Bad = 0, "Mauvais", [],
        Good = 1, "Bon", [],
    }
}

categorical! {
    #[derive(Serialize, Deserialize)]
    #[serde(into = "u8", try_from = "u8")]
    PropertyArea, field = "Property_Area" {
        Rural = 0, "Rurale", ["Rural"],
        Urban = 1, "Urbaine", ["Urban"],
        Semiurban = 2, "Semi-urbaine", ["Semiurban"],
    }
}

impl From<CreditHistory> for f64 {
    fn from(value: CreditHistory) -> f64 {
        f64::from(value.code())
    }
}

impl TryFrom<f64> for CreditHistory {
    type Error = UnknownValue;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let code = (value.fract() == 0.0 && (0.0..=1.0).contains(&value)).then_some(value as u8);
        code.and_then(Self::from_code)
            .ok_or_else(|| UnknownValue {
                field: Self::FIELD,
                value: value.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Display decoding for dataset columns
// ---------------------------------------------------------------------------

/// Decode a raw dataset cell for display.
///
/// The column is matched case-insensitively against the categorical fields.
/// Numeric codes become their French label; anything else (already a label,
/// an English spelling, a number for a non-categorical column) is returned
/// unchanged.
pub fn decode_cell(column: &str, raw: &str) -> String {
    let Some(code) = integral_code(raw) else {
        return raw.to_string();
    };

    let label = match column.to_ascii_lowercase().as_str() {
        "gender" => Gender::from_code(code).map(Gender::label),
        "married" => Married::from_code(code).map(Married::label),
        "education" => Education::from_code(code).map(Education::label),
        "self_employed" => SelfEmployed::from_code(code).map(SelfEmployed::label),
        "credit_history" => CreditHistory::from_code(code).map(CreditHistory::label),
        "property_area" => PropertyArea::from_code(code).map(PropertyArea::label),
        _ => None,
    };

    label.map_or_else(|| raw.to_string(), str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
