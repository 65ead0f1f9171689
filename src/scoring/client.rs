/// Prediction API HTTP client.
///
/// Talks to the external model-serving API using the synchronous `ureq`
/// client. The contract is a single endpoint:
///
/// - `POST {base_url}/predict` with the eleven [`ApplicantRecord`] fields as
///   JSON
/// - HTTP 200 with `{"Probabilité de défaut": <float in [0, 1]>}`
///
/// Any other status is an error. There is no retry; one call per user
/// action.
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::applicant::ApplicantRecord;
use crate::config::schema::ApiConfig;

/// Key holding the probability in the API response body.
pub const PROBABILITY_KEY: &str = "Probabilité de défaut";

/// Why a prediction could not be obtained.
///
/// The `Display` text is the inline message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// The API answered with something other than HTTP 200.
    #[error("Erreur lors de la prédiction. Code: {code} – Détail: {detail}")]
    Status { code: u16, detail: String },

    /// The API could not be reached.
    #[error("Erreur de connexion à l'API : {0}")]
    Connection(String),

    /// HTTP 200, but the body is not a usable probability.
    #[error("Erreur de connexion à l'API : réponse invalide ({0})")]
    InvalidResponse(String),
}

impl PredictionError {
    /// Short machine-readable kind for the JSON API.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Connection(_) => "connection",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous Prediction API client.
///
/// Built once from config and shared by the web server and the CLI.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    base_url: String,
    timeout: Option<Duration>,
}

impl PredictionClient {
    /// Build a client from the resolved config. A `timeout_ms` of 0 keeps
    /// the HTTP client's own defaults.
    pub fn from_config(config: &ApiConfig) -> Self {
        let timeout = (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms));
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Full URL of the prediction endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Score a record and return the probability of default.
    pub fn predict(&self, record: &ApplicantRecord) -> Result<f64, PredictionError> {
        let mut request = ureq::post(&self.endpoint());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = match request.send_json(record) {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                let detail = resp.into_string().unwrap_or_default();
                return Err(PredictionError::Status { code, detail });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(PredictionError::Connection(err.to_string()));
            }
        };

        let code = response.status();
        let body = response
            .into_string()
            .map_err(|e| PredictionError::Connection(e.to_string()))?;

        if code != 200 {
            return Err(PredictionError::Status { code, detail: body });
        }

        parse_probability(&body)
    }
}

/// Extract the default probability from a 200 response body.
///
/// The value may be a JSON number or a numeric string; it must be finite
/// and within `[0, 1]`.
pub fn parse_probability(body: &str) -> Result<f64, PredictionError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| PredictionError::InvalidResponse(format!("JSON invalide: {e}")))?;

    let raw = value
        .get(PROBABILITY_KEY)
        .ok_or_else(|| PredictionError::InvalidResponse(format!("champ '{PROBABILITY_KEY}' absent")))?;

    let probability = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| PredictionError::InvalidResponse(format!("valeur non numérique: {raw}")))?;

    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(PredictionError::InvalidResponse(format!(
            "probabilité hors de [0, 1]: {probability}"
        )));
    }

    Ok(probability)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let client = PredictionClient::from_config(&ApiConfig::default());
        assert_eq!(client.endpoint(), "https://api-scoring-c8xa.onrender.com/predict");
        assert_eq!(client.timeout, None);
    }

    #[test]
    fn client_strips_trailing_slash_and_sets_timeout() {
        let config = ApiConfig {
            url: "http://localhost:8000/".to_string(),
            timeout_ms: 2500,
        };
        let client = PredictionClient::from_config(&config);
        assert_eq!(client.endpoint(), "http://localhost:8000/predict");
        assert_eq!(client.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn parses_numeric_probability() {
        let body = r#"{"Probabilité de défaut": 0.08}"#;
        assert_eq!(parse_probability(body), Ok(0.08));
    }

    #[test]
    fn parses_string_probability() {
        let body = r#"{"Probabilité de défaut": "0.25", "model": "v2"}"#;
        assert_eq!(parse_probability(body), Ok(0.25));
    }

    #[test]
    fn missing_key_is_invalid() {
        let err = parse_probability(r#"{"probability": 0.1}"#).unwrap_err();
        assert_eq!(err.kind(), "invalid_response");
        assert!(err.to_string().starts_with("Erreur de connexion à l'API"));
    }

    #[test]
    fn out_of_range_probability_is_invalid() {
        assert!(parse_probability(r#"{"Probabilité de défaut": 1.5}"#).is_err());
        assert!(parse_probability(r#"{"Probabilité de défaut": -0.1}"#).is_err());
        assert!(parse_probability(r#"{"Probabilité de défaut": null}"#).is_err());
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert!(matches!(
            parse_probability("<html>oops</html>"),
            Err(PredictionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn status_error_message() {
        let err = PredictionError::Status {
            code: 422,
            detail: "bad field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Erreur lors de la prédiction. Code: 422 – Détail: bad field"
        );
    }
}
