/// Configuration schema and defaults for actmon.
///
/// Defines the TOML-serializable configuration with sections `[server]`,
/// `[ui]`, `[logging]`, and `[emotion]`. Every field has a built-in
/// default; config files only need the values they override.
use serde::{Deserialize, Serialize};

use crate::activity::DataType;
use crate::notify::Locale;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default seconds between emotion prompts.
pub const DEFAULT_EMOTION_INTERVAL_SECS: u64 = 120;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Maps to `~/.actmon/config.toml` and `.actmon.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActmonConfig {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
    pub emotion: EmotionConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the monitoring backend, without the `/api` suffix.
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// [ui]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub locale: Locale,
    /// Tab shown (and loaded) when the view opens.
    pub default_tab: DataType,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            default_tab: DataType::Mouse,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Diagnostic console output and the `events.jsonl` request log.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// [emotion]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    pub interval_secs: u64,
    /// Directory for `{username}_emotion_performance.csv`. Empty means
    /// `~/.actmon/data`.
    pub data_dir: String,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_EMOTION_INTERVAL_SECS,
            data_dir: String::new(),
        }
    }
}

impl ActmonConfig {
    /// Annotated default config written by `actmon config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# actmon configuration
#
# Precedence: defaults < ~/.actmon/config.toml < ./.actmon.toml < ACTMON_* env vars

[server]
# Monitoring backend (serves /api/start_monitoring, /api/stop_monitoring,
# /api/monitoring_data)
base_url = "{DEFAULT_BASE_URL}"
timeout_ms = {DEFAULT_TIMEOUT_MS}

[ui]
# "en" or "zh"
locale = "en"
# "mouse" or "keyboard"
default_tab = "mouse"

[logging]
# Diagnostic console output and ~/.actmon/events.jsonl
enabled = true

[emotion]
interval_secs = {DEFAULT_EMOTION_INTERVAL_SECS}
# Empty means ~/.actmon/data
data_dir = ""
"#
        )
    }
}
