//! Threshold decision on a default probability.

use std::fmt;

use serde::Serialize;

/// Default-probability cutoff, in percent. At or below it the credit is
/// approved.
pub const THRESHOLD_PCT: f64 = 10.0;

/// Credit decision derived from the default probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Refused,
}

impl Decision {
    /// Apply the fixed threshold. The boundary is inclusive on the approve
    /// side; the comparison is done on the probability itself because
    /// `0.1 * 100.0` is slightly above `10.0` in floating point.
    pub fn from_probability(probability: f64) -> Self {
        if probability <= THRESHOLD_PCT / 100.0 {
            Self::Approved
        } else {
            Self::Refused
        }
    }

    /// French label used in the dashboard and the pie chart.
    pub fn label(self) -> &'static str {
        match self {
            Self::Approved => "Approuvé",
            Self::Refused => "Refusé",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scored applicant: the probability returned by the API and what the
/// dashboard derives from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    /// Probability of default in `[0, 1]`.
    pub probability: f64,
    /// `probability * 100`.
    pub percentage: f64,
    pub decision: Decision,
    pub threshold_pct: f64,
}

impl Assessment {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            percentage: probability * 100.0,
            decision: Decision::from_probability(probability),
            threshold_pct: THRESHOLD_PCT,
        }
    }

    /// Percentage with two decimals, e.g. `"8.00%"`.
    pub fn display_percentage(&self) -> String {
        format!("{:.2}%", self.percentage)
    }

    pub fn is_approved(&self) -> bool {
        self.decision == Decision::Approved
    }

    /// The banner shown after a prediction.
    pub fn message(&self) -> String {
        let verdict = match self.decision {
            Decision::Approved => "Crédit Approuvé",
            Decision::Refused => "Crédit Refusé",
        };
        format!(
            "{verdict} (risque {}) – Seuil fixé à {}%",
            self.display_percentage(),
            self.threshold_pct
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
