/// Configuration system for actmon.
///
/// Layered, later layers win at the key level:
///
/// 1. **Built-in defaults**: [`schema::ActmonConfig::default()`]
/// 2. **User global config**: `~/.actmon/config.toml`
/// 3. **Project local config**: `.actmon.toml` in the current directory
/// 4. **Environment variables**: `ACTMON_*` overrides
///
/// Malformed files are skipped rather than failing the command.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::ActmonConfig;

use crate::activity::DataType;
use crate::notify::Locale;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
pub fn load() -> ActmonConfig {
    let mut config = load_layers(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files over the defaults, in order.
///
/// Missing or malformed files are skipped.
pub fn load_layers(paths: &[Option<PathBuf>]) -> ActmonConfig {
    let Ok(mut merged) = toml::Value::try_from(ActmonConfig::default()) else {
        return ActmonConfig::default();
    };

    for path in paths.iter().flatten() {
        if let Some(layer) = read_toml_value(path) {
            merge_values(&mut merged, layer);
        }
    }

    merged.try_into().unwrap_or_default()
}

fn read_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    // Reject files whose values don't fit the schema.
    value.clone().try_into::<ActmonConfig>().ok()?;
    Some(value)
}

/// Overlay `overlay` onto `base`, recursing into tables.
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
        (slot, value) => *slot = value,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.actmon/config.toml`
fn global_config_path() -> Option<PathBuf> {
    actmon_home().map(|dir| dir.join("config.toml"))
}

/// `.actmon.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".actmon.toml"))
}

/// `~/.actmon/`, home of the config, event log, and default data directory.
pub fn actmon_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".actmon"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply `ACTMON_*` overrides:
///
/// - `ACTMON_SERVER_URL`: backend base URL
/// - `ACTMON_TIMEOUT_MS`: request timeout
/// - `ACTMON_LOCALE`: `en` / `zh`
/// - `ACTMON_DEFAULT_TAB`: `mouse` / `keyboard`
/// - `ACTMON_LOGGING`: diagnostics on/off (`1`/`true`/`yes`/`on`)
/// - `ACTMON_EMOTION_INTERVAL`: seconds between emotion prompts
/// - `ACTMON_DATA_DIR`: emotion CSV directory
fn apply_env_overrides(config: &mut ActmonConfig) {
    if let Ok(val) = std::env::var("ACTMON_SERVER_URL")
        && !val.is_empty()
    {
        config.server.base_url = val;
    }
    if let Ok(val) = std::env::var("ACTMON_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.server.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("ACTMON_LOCALE")
        && let Some(locale) = Locale::parse(&val)
    {
        config.ui.locale = locale;
    }
    if let Ok(val) = std::env::var("ACTMON_DEFAULT_TAB")
        && let Ok(tab) = val.parse::<DataType>()
    {
        config.ui.default_tab = tab;
    }
    if let Ok(val) = std::env::var("ACTMON_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("ACTMON_EMOTION_INTERVAL")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.emotion.interval_secs = secs;
    }
    if let Ok(val) = std::env::var("ACTMON_DATA_DIR")
        && !val.is_empty()
    {
        config.emotion.data_dir = val;
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.actmon/config.toml`.
///
/// Fails if the file exists, unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, ActmonConfig::default_toml()).context("failed to write config file")
}

/// Set a dotted key (e.g. `server.base_url`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_in(&path, key, value)
}

fn set_config_value_in(path: &Path, key: &str, value: &str) -> Result<()> {
    // Start from defaults so any schema key can be set even if the file
    // omits its section.
    let mut root = toml::Value::try_from(ActmonConfig::default())
        .context("failed to serialize default config")?;
    if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        let existing: toml::Value =
            toml::from_str(&content).context("failed to parse config as TOML value")?;
        merge_values(&mut root, existing);
    }

    set_toml_value(&mut root, key, value)?;

    root.clone()
        .try_into::<ActmonConfig>()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")
}

/// Set a value in a TOML tree by dotted key, typed after the existing value.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section_path, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must be '<section>.<key>', got '{key}'");
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
        None => anyhow::bail!("config key not found: '{key}'"),
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
