/// Configuration system for the dashboard.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::DashConfig::default()`]
/// 2. **User global config** — `~/.credit-dash/config.toml`
/// 3. **Project local config** — `.credit-dash.toml` in the current directory
/// 4. **Environment variables** — `CREDIT_DASH_*` overrides (highest precedence)
///
/// Layers are merged key by key: a file that only sets `api.url` leaves every
/// other value from the previous layer in place.
///
/// # Usage
///
/// ```rust,ignore
/// use credit_dash::config;
///
/// let cfg = config::load();
/// let client = PredictionClient::from_config(&cfg.api);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

pub use schema::DashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for everything that needs config.
pub fn load() -> DashConfig {
    let files: Vec<PathBuf> = [global_config_path(), project_config_path()]
        .into_iter()
        .flatten()
        .collect();

    let mut config = load_layers(&files);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files, in order, over the built-in defaults.
///
/// Missing files are skipped. Malformed files are skipped with a warning on
/// stderr so a typo never prevents the dashboard from starting.
pub fn load_layers(files: &[PathBuf]) -> DashConfig {
    let Ok(mut merged) = toml::Value::try_from(DashConfig::default()) else {
        return DashConfig::default();
    };

    for path in files {
        match load_toml_value(path) {
            Ok(Some(layer)) => merge_values(&mut merged, layer),
            Ok(None) => {}
            Err(e) => eprintln!("{} {e:#}", "warning:".yellow().bold()),
        }
    }

    merged.try_into().unwrap_or_else(|e| {
        eprintln!(
            "{} invalid configuration, using defaults: {e}",
            "warning:".yellow().bold()
        );
        DashConfig::default()
    })
}

/// Read a TOML file as a raw value tree. `Ok(None)` if the file is absent.
fn load_toml_value(path: &Path) -> Result<Option<toml::Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let value = toml::from_str(&content)
        .with_context(|| format!("ignoring malformed config file {}", path.display()))?;
    Ok(Some(value))
}

/// Deep-merge `overlay` into `base`: tables merge recursively, any other
/// value in the overlay replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.credit-dash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".credit-dash").join("config.toml"))
}

/// Path to the project local config: `.credit-dash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".credit-dash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `CREDIT_DASH_ADDR` — server listen address
/// - `CREDIT_DASH_OPEN_BROWSER` — open the browser on start (`1`/`true`/`yes`/`on`)
/// - `CREDIT_DASH_API_URL` — Prediction API base URL
/// - `CREDIT_DASH_API_TIMEOUT_MS` — request timeout, `0` for client default
/// - `CREDIT_DASH_TRAIN_CSV` — reference population CSV
/// - `CREDIT_DASH_TEST_CSV` — client lookup CSV
/// - `CREDIT_DASH_LOG_LEVEL` — log level
pub fn apply_env_overrides(config: &mut DashConfig) {
    if let Some(val) = non_empty_var("CREDIT_DASH_ADDR") {
        config.server.addr = val;
    }
    if let Some(val) = non_empty_var("CREDIT_DASH_OPEN_BROWSER") {
        config.server.open_browser = is_truthy(&val);
    }
    if let Some(val) = non_empty_var("CREDIT_DASH_API_URL") {
        config.api.url = val;
    }
    if let Some(val) = non_empty_var("CREDIT_DASH_API_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Some(val) = non_empty_var("CREDIT_DASH_TRAIN_CSV") {
        config.data.train_csv = val;
    }
    if let Some(val) = non_empty_var("CREDIT_DASH_TEST_CSV") {
        config.data.test_csv = val;
    }
    if let Some(val) = non_empty_var("CREDIT_DASH_LOG_LEVEL") {
        config.logging.level = val;
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.credit-dash/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

/// Write the default annotated config to an explicit path.
pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, DashConfig::default_toml()).context("failed to write config file")
}

/// Set a single config key in the global config file.
///
/// Supports dotted keys like `api.url`. The value is parsed according to the
/// type of the existing (or default) value at that key.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

/// Set a single config key in the config file at `path`, creating it from
/// the defaults if needed.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root = toml::Value::try_from(DashConfig::default())
        .context("failed to serialize default config")?;

    if let Some(existing) = load_toml_value(path)? {
        merge_values(&mut root, existing);
    }

    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    let _: DashConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section_path, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must be 'section.key', got '{key}'");
    };

    let mut current = root;
    for part in section_path.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section_path}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn no_files_gives_defaults() {
        assert_eq!(load_layers(&[]), DashConfig::default());
    }

    #[test]
    fn later_layer_overrides_only_its_keys() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(
            dir.path(),
            "global.toml",
            "[api]\nurl = \"http://global:1\"\ntimeout_ms = 500\n",
        );
        let project = write(dir.path(), "project.toml", "[api]\nurl = \"http://project:2\"\n");

        let config = load_layers(&[global, project]);
        assert_eq!(config.api.url, "http://project:2");
        assert_eq!(config.api.timeout_ms, 500);
        assert_eq!(config.data.test_csv, "data/test.csv");
    }

    #[test]
    fn malformed_layer_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.toml", "[api\nurl = ");
        let good = write(dir.path(), "good.toml", "[logging]\nlevel = \"debug\"\n");

        let config = load_layers(&[bad, good]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.api, schema::ApiConfig::default());
    }

    #[test]
    fn missing_layer_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_layers(&[dir.path().join("nope.toml")]);
        assert_eq!(config, DashConfig::default());
    }

    #[test]
    fn is_truthy_accepts_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on", "ON"] {
            assert!(is_truthy(yes), "{yes}");
        }
        for no in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(no), "{no}");
        }
    }

    #[test]
    fn set_toml_value_types_by_existing_value() {
        let mut root = toml::Value::try_from(DashConfig::default()).unwrap();
        set_toml_value(&mut root, "server.open_browser", "false").unwrap();
        set_toml_value(&mut root, "api.timeout_ms", "1500").unwrap();
        set_toml_value(&mut root, "api.url", "http://x").unwrap();

        let config: DashConfig = root.try_into().unwrap();
        assert!(!config.server.open_browser);
        assert_eq!(config.api.timeout_ms, 1500);
        assert_eq!(config.api.url, "http://x");
    }

    #[test]
    fn set_toml_value_rejects_bad_keys_and_values() {
        let mut root = toml::Value::try_from(DashConfig::default()).unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "v").is_err());
        assert!(set_toml_value(&mut root, "api.nope", "v").is_err());
        assert!(set_toml_value(&mut root, "api", "v").is_err());
        assert!(set_toml_value(&mut root, "api.timeout_ms", "soon").is_err());
    }

    #[test]
    fn set_config_value_at_creates_and_updates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        set_config_value_at(&path, "data.test_csv", "clients.csv").unwrap();
        set_config_value_at(&path, "api.timeout_ms", "3000").unwrap();

        let config = load_layers(&[path]);
        assert_eq!(config.data.test_csv, "clients.csv");
        assert_eq!(config.api.timeout_ms, 3000);
    }

    #[test]
    fn set_config_value_at_rejects_negative_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set_config_value_at(&path, "api.timeout_ms", "-5").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn init_config_at_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_config_at(&path, false).unwrap();
        assert!(init_config_at(&path, false).is_err());
        assert!(init_config_at(&path, true).is_ok());
        assert_eq!(load_layers(&[path]), DashConfig::default());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: DashConfig = toml::from_str(&toml_str).unwrap();
    }
}
