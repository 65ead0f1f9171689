/// Configuration schema and defaults for the dashboard.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[server]`, `[api]`, `[data]` and `[logging]`.
///
/// Every field has a built-in default that reproduces the stock dashboard:
/// local server, the public scoring API, and the two CSV files under
/// `data/`. Users only need to set the values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level dashboard configuration.
///
/// Maps directly to the `~/.credit-dash/config.toml` and `.credit-dash.toml`
/// file schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Embedded web server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8501".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Prediction API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; `/predict` is appended.
    pub url: String,
    /// Request timeout in milliseconds. `0` leaves the HTTP client defaults.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api-scoring-c8xa.onrender.com".to_string(),
            timeout_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Static dataset locations, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Reference population for the income histogram.
    pub train_csv: String,
    /// Client records for the lookup tab.
    pub test_csv: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            train_csv: "data/train.csv".to_string(),
            test_csv: "data/test.csv".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostic logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl DashConfig {
    /// The commented config file written by `credit-dash config init`.
    pub fn default_toml() -> String {
        r#"# credit-dash configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (CREDIT_DASH_*)
#   2. Project config (.credit-dash.toml in current directory)
#   3. User global config (~/.credit-dash/config.toml)
#   4. Built-in defaults

[server]
addr = "127.0.0.1:8501"
open_browser = true

[api]
url = "https://api-scoring-c8xa.onrender.com"   # POST {url}/predict
timeout_ms = 0                                    # 0 = HTTP client default

[data]
train_csv = "data/train.csv"   # income histogram reference
test_csv = "data/test.csv"     # client lookup

[logging]
level = "info"                 # error | warn | info | debug | trace
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
