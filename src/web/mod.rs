//! Embedded web dashboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The single-page scoring dashboard (prediction form and client lookup)
//! - JSON API endpoints for the form schema, predictions and client records
//!
//! Launched via `credit-dash serve` (default: `http://127.0.0.1:8501`).

pub mod api;
mod frontend;

use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use log::{error, info};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::DashConfig;
use crate::dataset::Datasets;
use crate::scoring::PredictionClient;

pub use api::ApiError;
pub use frontend::INDEX_HTML;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything a request handler needs. Built once, read-only afterwards
/// (datasets fill their caches on first use).
#[derive(Debug)]
pub struct AppState {
    pub config: DashConfig,
    pub client: PredictionClient,
    pub datasets: Datasets,
}

impl AppState {
    pub fn new(config: DashConfig) -> Self {
        let client = PredictionClient::from_config(&config.api);
        let datasets = Datasets::from_config(&config.data);
        Self {
            config,
            client,
            datasets,
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Endpoints listed in the startup log.
const ENDPOINTS: [&str; 6] = [
    "GET /api/form",
    "POST /api/predict",
    "GET /api/clients",
    "GET /api/clients/{id}",
    "POST /api/clients/{id}/predict",
    "GET /api/health",
];

/// Start the dashboard server on `config.server.addr`.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard). Errors are answered per request without
/// stopping the server.
pub fn serve(state: &AppState) -> Result<()> {
    let addr = state.config.server.addr.as_str();
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let url = format!("http://{addr}");
    println!("{} running at {}", "credit-dash".bold(), url.cyan());
    println!("Press Ctrl+C to stop.\n");
    info!("listening on {addr}, prediction API {}", state.client.endpoint());
    for endpoint in ENDPOINTS {
        info!("  {endpoint}");
    }

    if state.config.server.open_browser
        && let Err(e) = open_browser(&url)
    {
        info!("could not open browser: {e:#}");
    }

    for mut request in server.incoming_requests() {
        let started = Instant::now();
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let reply = dispatch(state, &method, &url, body.as_deref());
        let status = reply.status;
        if let Err(e) = request.respond(reply.into_response()) {
            error!("failed to send response for {method} {url}: {e}");
        }

        let path = url.split('?').next().unwrap_or(url.as_str());
        info!(
            "{method} {path} {status} {}ms",
            started.elapsed().as_millis()
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// A fully rendered HTTP reply, independent of the server transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub(crate) fn json(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: JSON,
            body,
        }
    }

    fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: HTML,
            body: body.as_bytes().to_vec(),
        }
    }

    /// Body as UTF-8 text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    pub fn json_value(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("reply body is not JSON")
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        match content_type(self.content_type) {
            Some(header) => response.with_header(header),
            None => response,
        }
    }
}

/// Dispatch an incoming request to the appropriate handler.
///
/// Never fails: handler errors become JSON error replies.
pub fn dispatch(state: &AppState, method: &Method, url: &str, body: Option<&str>) -> Reply {
    match route(state, method, url, body) {
        Ok(reply) => reply,
        Err(e) => {
            error!("{method} {url} failed: {e:#}");
            ApiError::internal(format!("{e:#}")).into_reply()
        }
    }
}

fn route(state: &AppState, method: &Method, url: &str, body: Option<&str>) -> Result<Reply> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    let reply = match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Reply::html(INDEX_HTML),

        // API — prediction tab
        (&Method::Get, "/api/form") => api::get_form()?,
        (&Method::Post, "/api/predict") => api::post_predict(state, body.unwrap_or(""))?,

        // API — client tab
        (&Method::Get, "/api/clients") => api::get_clients(state)?,
        (_, p) if p.starts_with("/api/clients/") => {
            client_route(state, method, &p["/api/clients/".len()..])?
        }

        // API — health
        (&Method::Get, "/api/health") => api::get_health(state)?,

        // 404
        _ => ApiError::route_not_found(path).into_reply(),
    };

    Ok(reply)
}

/// `/api/clients/{id}` and `/api/clients/{id}/predict`.
fn client_route(state: &AppState, method: &Method, rest: &str) -> Result<Reply> {
    let (raw_id, action) = match rest.split_once('/') {
        Some((id, action)) => (id, Some(action)),
        None => (rest, None),
    };

    let id = match urlencoding::decode(raw_id) {
        Ok(id) if !id.trim().is_empty() => id.into_owned(),
        _ => return Ok(ApiError::bad_request("identifiant client invalide").into_reply()),
    };

    match (method, action) {
        (&Method::Get, None) => api::get_client(state, &id),
        (&Method::Post, Some("predict")) => api::post_client_predict(state, &id),
        _ => Ok(ApiError::route_not_found(&format!("/api/clients/{rest}")).into_reply()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";

/// `Content-Type` header for a media type.
fn content_type(value: &str) -> Option<Header> {
    Header::from_bytes("Content-Type", value).ok()
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_state() -> AppState {
        let mut config = DashConfig::default();
        config.api.url = "http://127.0.0.1:1".to_string();
        config.data.train_csv = "does/not/exist/train.csv".to_string();
        config.data.test_csv = "does/not/exist/test.csv".to_string();
        AppState::new(config)
    }

    #[test]
    fn serves_index_page() {
        let state = offline_state();
        for path in ["/", "/index.html", "/?tab=client"] {
            let reply = dispatch(&state, &Method::Get, path, None);
            assert_eq!(reply.status, 200);
            assert_eq!(reply.content_type, HTML);
            assert!(reply.text().contains("Scoring de Crédit"));
        }
    }

    #[test]
    fn unknown_route_is_404_json() {
        let state = offline_state();
        let reply = dispatch(&state, &Method::Get, "/api/nope", None);
        assert_eq!(reply.status, 404);
        let json = reply.json_value().unwrap();
        assert_eq!(json["kind"], "not_found");
    }

    #[test]
    fn wrong_method_on_client_is_404() {
        let state = offline_state();
        let reply = dispatch(&state, &Method::Delete, "/api/clients/LP001", None);
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn empty_client_id_is_rejected() {
        let state = offline_state();
        let reply = dispatch(&state, &Method::Get, "/api/clients/%20", None);
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn reply_converts_to_response_with_status() {
        let reply = Reply::json(418, b"{}".to_vec());
        let response = reply.into_response();
        assert_eq!(response.status_code(), StatusCode(418));
    }
}
