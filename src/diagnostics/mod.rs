//! Diagnostic logging for backend calls.
//!
//! Every request outcome can be written to two sinks:
//!
//! - the diagnostic console (stderr), for failures only
//! - a JSONL event log, one line per request (`~/.actmon/events.jsonl`)
//!
//! Both sinks are best-effort; failures writing them are ignored.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// One backend call, as recorded in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub timestamp: String,
    /// `"start_monitoring"`, `"stop_monitoring"`, or `"load:{type}"`.
    pub operation: String,
    /// `"ok"`, `"application_error"`, `"transport_error"`, or `"stale"`.
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

impl DiagnosticEvent {
    pub fn new(operation: &str, outcome: &str, detail: Option<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            operation: operation.to_string(),
            outcome: outcome.to_string(),
            detail,
        }
    }

    pub fn ok(operation: &str) -> Self {
        Self::new(operation, "ok", None)
    }

    pub fn from_error(operation: &str, err: &ApiError) -> Self {
        let outcome = if err.is_transport() {
            "transport_error"
        } else {
            "application_error"
        };
        Self::new(operation, outcome, Some(err.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    console: bool,
    events_path: Option<PathBuf>,
}

impl Diagnostics {
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            console: true,
            events_path: events_log_path(),
        }
    }

    /// Drop everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Log to a specific file without console output.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            console: false,
            events_path: Some(path.into()),
        }
    }

    pub fn events_path(&self) -> Option<&Path> {
        self.events_path.as_deref()
    }

    /// Log a failed call to the console, then record it.
    pub fn error(&self, operation: &str, err: &ApiError) {
        if self.console {
            eprintln!("{} {operation}: {err}", "Error:".red().dimmed());
        }
        self.record(&DiagnosticEvent::from_error(operation, err));
    }

    pub fn record(&self, event: &DiagnosticEvent) {
        if let Some(path) = &self.events_path {
            let _ = append_event(path, event);
        }
    }
}

fn append_event(path: &Path, event: &DiagnosticEvent) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Read every event from `path`, skipping malformed lines.
pub fn read_events(path: &Path) -> Vec<DiagnosticEvent> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect()
}

/// Default event log location.
pub fn events_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".actmon").join("events.jsonl"))
}
