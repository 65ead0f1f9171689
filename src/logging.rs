/// Logger setup.
///
/// Everything logs through the `log` facade; the binary installs
/// `env_logger` once at startup. `RUST_LOG`, when set, wins over the
/// configured level.
use env_logger::{Builder, Env};

/// Level used when neither `RUST_LOG` nor the config names a valid one.
pub const DEFAULT_LEVEL: &str = "info";

const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Normalize a configured level, falling back to [`DEFAULT_LEVEL`] for
/// anything `env_logger` would not understand.
pub fn normalize_level(level: &str) -> &'static str {
    let wanted = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .copied()
        .find(|l| *l == wanted)
        .unwrap_or(DEFAULT_LEVEL)
}

/// Install the global logger. Calling it again is a no-op.
pub fn init(level: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(normalize_level(level)))
        .format_timestamp_millis()
        .format_module_path(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
