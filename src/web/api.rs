//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a [`Reply`] with
//! JSON content. Domain errors are mapped to status codes by [`ApiError`];
//! only unexpected failures surface as `anyhow` errors (and become a 500).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::applicant::{FieldSpec, FormInput, ValidationError, form_schema};
use crate::charts::ChartSet;
use crate::lookup::{Card, LookupError};
use crate::scoring::{self, Assessment, PredictionError, THRESHOLD_PCT};

use super::{AppState, Reply};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Form schema API response.
#[derive(Serialize)]
struct FormResponse {
    fields: Vec<FieldSpec>,
    defaults: FormInput,
    threshold_pct: f64,
}

/// Prediction API response (both tabs).
#[derive(Serialize)]
struct PredictResponse {
    assessment: Assessment,
    message: String,
    charts: ChartSet,
}

impl PredictResponse {
    fn new(assessment: Assessment, charts: ChartSet) -> Self {
        Self {
            message: assessment.message(),
            assessment,
            charts,
        }
    }
}

/// Client selector API response.
#[derive(Serialize)]
struct ClientsResponse<'a> {
    id_column: &'a str,
    ids: Vec<&'a str>,
}

/// Client detail API response.
#[derive(Serialize)]
struct ClientResponse {
    id: String,
    cards: Vec<Card>,
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    api_url: String,
    predict_endpoint: String,
    train_csv: FileStatus,
    test_csv: FileStatus,
    threshold_pct: f64,
    checked_at: String,
}

#[derive(Serialize)]
struct FileStatus {
    path: String,
    exists: bool,
}

impl FileStatus {
    fn of(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            exists: path.is_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An error answered to the page as `{"error": message, "kind": kind}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    pub kind: &'static str,
    #[serde(rename = "error")]
    pub message: String,
}

impl ApiError {
    fn new(status: u16, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, "bad_request", message)
    }

    pub fn route_not_found(path: &str) -> Self {
        Self::new(404, "not_found", format!("route introuvable : {path}"))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, "internal", message)
    }

    pub fn into_reply(self) -> Reply {
        // Serializing a struct of strings cannot fail.
        let body = serde_json::to_vec(&self).unwrap_or_default();
        Reply::json(self.status, body)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::new(400, "validation", e.to_string())
    }
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        Self::new(502, e.kind(), e.to_string())
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        let (status, kind) = match &e {
            LookupError::Dataset(_) => (503, "dataset_unavailable"),
            LookupError::NoIdColumn => (503, "no_id_column"),
            LookupError::ClientNotFound { .. } => (404, "client_not_found"),
            LookupError::IncompleteRecord { .. } => (400, "incomplete_record"),
            LookupError::InvalidField(_) => (400, "validation"),
        };
        Self::new(status, kind, e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Reply> {
    let body = serde_json::to_vec(data).context("failed to serialize JSON response")?;
    Ok(Reply::json(200, body))
}

/// Turn a handler outcome into a reply, answering domain errors as JSON.
fn respond<T: Serialize>(outcome: Result<T, ApiError>) -> Result<Reply> {
    match outcome {
        Ok(data) => json_response(&data),
        Err(e) => Ok(e.into_reply()),
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/form` — field schema, initial values and threshold.
pub fn get_form() -> Result<Reply> {
    json_response(&FormResponse {
        fields: form_schema(),
        defaults: FormInput::default(),
        threshold_pct: THRESHOLD_PCT,
    })
}

/// `POST /api/predict` — score the submitted form and render all charts.
///
/// Expects the eleven fields as JSON, categoricals as their codes:
/// `{ "Gender": 1, "Married": 0, ..., "Property_Area": 2 }`
pub fn post_predict(state: &AppState, body: &str) -> Result<Reply> {
    respond(predict_form(state, body))
}

fn predict_form(state: &AppState, body: &str) -> Result<PredictResponse, ApiError> {
    let input: FormInput = serde_json::from_str(body)
        .map_err(|e| ApiError::bad_request(format!("formulaire invalide : {e}")))?;
    let record = input.into_record()?;
    let assessment = scoring::score(&state.client, &record)?;
    let charts = ChartSet::full(
        &assessment,
        state.datasets.population(),
        record.applicant_income,
    );
    Ok(PredictResponse::new(assessment, charts))
}

/// `GET /api/clients` — identifier column and selectable ids.
pub fn get_clients(state: &AppState) -> Result<Reply> {
    respond(
        state
            .datasets
            .clients()
            .map(|dataset| ClientsResponse {
                id_column: dataset.id_column(),
                ids: dataset.ids(),
            })
            .map_err(|e| ApiError::from(e.clone())),
    )
}

/// `GET /api/clients/{id}` — the client's fields as display cards.
pub fn get_client(state: &AppState, id: &str) -> Result<Reply> {
    respond(client_cards(state, id))
}

fn client_cards(state: &AppState, id: &str) -> Result<ClientResponse, ApiError> {
    let dataset = state.datasets.clients().map_err(|e| e.clone())?;
    let row = dataset.get(id)?;
    Ok(ClientResponse {
        id: row.id().to_string(),
        cards: row.cards(),
    })
}

/// `POST /api/clients/{id}/predict` — score a dataset row (gauge only).
pub fn post_client_predict(state: &AppState, id: &str) -> Result<Reply> {
    respond(predict_client(state, id))
}

fn predict_client(state: &AppState, id: &str) -> Result<PredictResponse, ApiError> {
    let dataset = state.datasets.clients().map_err(|e| e.clone())?;
    let record = dataset.get(id)?.to_record()?;
    let assessment = scoring::score(&state.client, &record)?;
    Ok(PredictResponse::new(
        assessment,
        ChartSet::gauge_only(&assessment),
    ))
}

/// `GET /api/health` — configuration summary and data file presence.
pub fn get_health(state: &AppState) -> Result<Reply> {
    json_response(&HealthResponse {
        api_url: state.client.base_url().to_string(),
        predict_endpoint: state.client.endpoint(),
        train_csv: FileStatus::of(state.datasets.train_path()),
        test_csv: FileStatus::of(state.datasets.test_path()),
        threshold_pct: THRESHOLD_PCT,
        checked_at: chrono::Local::now().to_rfc3339(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashConfig;
    use crate::dataset::DatasetError;

    fn offline_state() -> AppState {
        let mut config = DashConfig::default();
        config.api.url = "http://127.0.0.1:1".to_string();
        config.data.train_csv = "missing/train.csv".to_string();
        config.data.test_csv = "missing/test.csv".to_string();
        AppState::new(config)
    }

    #[test]
    fn form_lists_eleven_fields() {
        let json = get_form().unwrap().json_value().unwrap();
        assert_eq!(json["fields"].as_array().unwrap().len(), 11);
        assert_eq!(json["threshold_pct"], 10.0);
        assert_eq!(json["defaults"]["Loan_Amount_Term"], 1.0);
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let reply = post_predict(&offline_state(), "{not json").unwrap();
        assert_eq!(reply.status, 400);
        assert_eq!(reply.json_value().unwrap()["kind"], "bad_request");
    }

    #[test]
    fn invalid_code_is_validation_error() {
        let mut input = serde_json::to_value(FormInput::default()).unwrap();
        input["Property_Area"] = 7.into();
        let reply = post_predict(&offline_state(), &input.to_string()).unwrap();
        assert_eq!(reply.status, 400);
        assert_eq!(reply.json_value().unwrap()["kind"], "validation");
    }

    #[test]
    fn unreachable_api_is_bad_gateway() {
        let body = serde_json::to_string(&FormInput::default()).unwrap();
        let reply = post_predict(&offline_state(), &body).unwrap();
        assert_eq!(reply.status, 502);
        let json = reply.json_value().unwrap();
        assert_eq!(json["kind"], "connection");
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with("Erreur de connexion à l'API : ")
        );
    }

    #[test]
    fn missing_test_csv_is_service_unavailable() {
        let state = offline_state();
        let reply = get_clients(&state).unwrap();
        assert_eq!(reply.status, 503);
        let json = reply.json_value().unwrap();
        assert_eq!(json["error"], "Fichier test.csv introuvable.");
        assert!(json.get("ids").is_none());

        assert_eq!(get_client(&state, "LP001").unwrap().status, 503);
        assert_eq!(post_client_predict(&state, "LP001").unwrap().status, 503);
    }

    #[test]
    fn lookup_errors_map_to_statuses() {
        let not_found = ApiError::from(LookupError::ClientNotFound { id: "x".into() });
        assert_eq!(not_found.status, 404);
        assert_eq!(not_found.message, "Client introuvable.");

        let incomplete = ApiError::from(LookupError::IncompleteRecord {
            id: "x".into(),
            fields: vec!["Gender".into()],
        });
        assert_eq!(incomplete.status, 400);

        let missing = ApiError::from(LookupError::Dataset(DatasetError::NotFound {
            file: "test.csv".into(),
        }));
        assert_eq!(missing.status, 503);
    }

    #[test]
    fn status_error_keeps_code_and_detail() {
        let e = ApiError::from(PredictionError::Status {
            code: 422,
            detail: "bad input".into(),
        });
        assert_eq!(e.status, 502);
        assert_eq!(e.kind, "status");
        assert_eq!(
            e.message,
            "Erreur lors de la prédiction. Code: 422 – Détail: bad input"
        );
    }

    #[test]
    fn error_body_has_error_and_kind() {
        let reply = ApiError::bad_request("nope").into_reply();
        let json = reply.json_value().unwrap();
        assert_eq!(json["error"], "nope");
        assert_eq!(json["kind"], "bad_request");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn health_reports_files_and_endpoint() {
        let json = get_health(&offline_state()).unwrap().json_value().unwrap();
        assert_eq!(json["predict_endpoint"], "http://127.0.0.1:1/predict");
        assert_eq!(json["test_csv"]["exists"], false);
        assert_eq!(json["threshold_pct"], 10.0);
    }
}
