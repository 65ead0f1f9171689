/// Integration tests for the Prediction API client.
///
/// A local `tiny_http` server on an ephemeral port stands in for the remote
/// API; each mock answers exactly one request and hands back what it
/// received so the tests can check the wire format.
use std::io::Read;
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use credit_dash::applicant::{
    ApplicantRecord, CreditHistory, Education, FIELD_NAMES, Gender, Married, PropertyArea,
    SelfEmployed,
};
use credit_dash::config::schema::ApiConfig;
use credit_dash::scoring::{self, Decision, PredictionClient, PredictionError};
use tiny_http::{Response, Server, StatusCode};

/// What the mock API saw.
struct Received {
    method: String,
    path: String,
    body: String,
}

/// Start a one-shot mock API answering `status` with `body`.
fn mock_api(status: u16, body: &'static str) -> (String, JoinHandle<Received>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();

    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut received = String::new();
        request.as_reader().read_to_string(&mut received).unwrap();
        let seen = Received {
            method: request.method().to_string(),
            path: request.url().to_string(),
            body: received,
        };
        let response = Response::from_string(body).with_status_code(StatusCode(status));
        request.respond(response).unwrap();
        seen
    });

    (format!("http://{addr}"), handle)
}

fn client_for(url: &str) -> PredictionClient {
    PredictionClient::from_config(&ApiConfig {
        url: url.to_string(),
        timeout_ms: 5_000,
    })
}

fn record() -> ApplicantRecord {
    ApplicantRecord {
        gender: Gender::Male,
        married: Married::Yes,
        dependents: 1,
        education: Education::Graduate,
        self_employed: SelfEmployed::No,
        applicant_income: 4583.0,
        coapplicant_income: 1508.0,
        loan_amount: 128.0,
        loan_amount_term: 360.0,
        credit_history: CreditHistory::Good,
        property_area: PropertyArea::Rural,
    }
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[test]
fn posts_eleven_fields_and_reads_probability() {
    let (url, handle) = mock_api(200, r#"{"Probabilité de défaut": 0.08}"#);

    let probability = client_for(&url).predict(&record()).unwrap();
    assert_eq!(probability, 0.08);

    let seen = handle.join().unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/predict");

    let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 11);
    for name in FIELD_NAMES {
        assert!(object.contains_key(name), "missing {name}");
    }
    assert_eq!(body["Gender"], 1);
    assert_eq!(body["Property_Area"], 0);
    assert_eq!(body["Credit_History"], 1.0);
}

#[test]
fn score_applies_threshold_to_api_result() {
    let (url, handle) = mock_api(200, r#"{"Probabilité de défaut": 0.11}"#);

    let assessment = scoring::score(&client_for(&url), &record()).unwrap();
    handle.join().unwrap();

    assert_eq!(assessment.decision, Decision::Refused);
    assert_eq!(
        assessment.message(),
        "Crédit Refusé (risque 11.00%) – Seuil fixé à 10%"
    );
}

#[test]
fn boundary_probability_is_approved() {
    let (url, handle) = mock_api(200, r#"{"Probabilité de défaut": 0.1}"#);

    let assessment = scoring::score(&client_for(&url), &record()).unwrap();
    handle.join().unwrap();

    assert_eq!(assessment.decision, Decision::Approved);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn non_success_status_carries_code_and_body() {
    let (url, handle) = mock_api(422, r#"{"detail":"champ manquant"}"#);

    let err = client_for(&url).predict(&record()).unwrap_err();
    handle.join().unwrap();

    assert_eq!(
        err,
        PredictionError::Status {
            code: 422,
            detail: r#"{"detail":"champ manquant"}"#.to_string(),
        }
    );
    assert!(
        err.to_string()
            .starts_with("Erreur lors de la prédiction. Code: 422 – Détail: ")
    );
}

#[test]
fn server_error_is_status_error() {
    let (url, handle) = mock_api(500, "Internal Server Error");

    let err = client_for(&url).predict(&record()).unwrap_err();
    handle.join().unwrap();

    assert_eq!(err.kind(), "status");
}

#[test]
fn missing_probability_is_invalid_response() {
    let (url, handle) = mock_api(200, r#"{"score": 0.3}"#);

    let err = client_for(&url).predict(&record()).unwrap_err();
    handle.join().unwrap();

    assert!(matches!(err, PredictionError::InvalidResponse(_)));
    assert!(err.to_string().starts_with("Erreur de connexion à l'API : "));
}

#[test]
fn out_of_range_probability_is_invalid_response() {
    let (url, handle) = mock_api(200, r#"{"Probabilité de défaut": 1.7}"#);

    let err = client_for(&url).predict(&record()).unwrap_err();
    handle.join().unwrap();

    assert!(matches!(err, PredictionError::InvalidResponse(_)));
}

#[test]
fn unreachable_api_is_connection_error() {
    // Reserve a port, then free it so nothing is listening there.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = client_for(&format!("http://127.0.0.1:{port}"))
        .predict(&record())
        .unwrap_err();

    assert!(matches!(err, PredictionError::Connection(_)));
    assert!(err.to_string().starts_with("Erreur de connexion à l'API : "));
}
