/// Scoring: calling the Prediction API and turning its probability into a
/// credit decision.
///
/// Both dashboard tabs go through [`score`]: the form tab with a freshly
/// collected record, the client tab with a re-encoded dataset row.
use log::{info, warn};

pub mod client;
pub mod decision;

pub use client::{PredictionClient, PredictionError};
pub use decision::{Assessment, Decision, THRESHOLD_PCT};

use crate::applicant::ApplicantRecord;

/// Score a record and apply the threshold.
pub fn score(
    client: &PredictionClient,
    record: &ApplicantRecord,
) -> Result<Assessment, PredictionError> {
    match client.predict(record) {
        Ok(probability) => {
            let assessment = Assessment::from_probability(probability);
            info!(
                "prediction: probability={:.4} decision={:?}",
                probability, assessment.decision
            );
            Ok(assessment)
        }
        Err(e) => {
            warn!("prediction failed ({}): {}", e.kind(), e);
            Err(e)
        }
    }
}
