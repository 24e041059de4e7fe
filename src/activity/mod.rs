//! Activity data model shared by the API client, the view, and the CLI.
//!
//! - [`MonitoringFilter`]: the monitoring scope requested from the backend.
//! - [`DataType`]: which activity stream a tab shows (mouse or keyboard).
//! - [`ActivityRecord`]: one row of fetched activity, tagged by its stream.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Monitoring filter
// ---------------------------------------------------------------------------

/// Monitoring scope sent with `POST /api/start_monitoring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringFilter {
    All,
    Mouse,
    Keyboard,
}

impl MonitoringFilter {
    /// Derive the filter from the two monitoring toggles.
    ///
    /// Only one toggle set narrows the scope. Both set and neither set both
    /// map to [`MonitoringFilter::All`].
    pub fn from_toggles(mouse: bool, keyboard: bool) -> Self {
        match (mouse, keyboard) {
            (true, false) => Self::Mouse,
            (false, true) => Self::Keyboard,
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Mouse => "mouse",
            Self::Keyboard => "keyboard",
        }
    }
}

impl fmt::Display for MonitoringFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of the two monitoring checkboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorToggles {
    pub mouse: bool,
    pub keyboard: bool,
}

impl MonitorToggles {
    pub fn new(mouse: bool, keyboard: bool) -> Self {
        Self { mouse, keyboard }
    }

    pub fn filter(self) -> MonitoringFilter {
        MonitoringFilter::from_toggles(self.mouse, self.keyboard)
    }
}

// ---------------------------------------------------------------------------
// Data type / tab identifier
// ---------------------------------------------------------------------------

/// An activity stream. Doubles as the tab identifier in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Mouse,
    Keyboard,
}

impl DataType {
    /// Every data type, in tab order.
    pub const ALL: [DataType; 2] = [DataType::Mouse, DataType::Keyboard];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Keyboard => "keyboard",
        }
    }

    /// Column headers for this stream's table.
    pub fn columns(self) -> [&'static str; 3] {
        match self {
            Self::Mouse => ["time", "action", "position"],
            Self::Keyboard => ["time", "key", "duration"],
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mouse" | "m" => Ok(Self::Mouse),
            "keyboard" | "k" => Ok(Self::Keyboard),
            other => anyhow::bail!("unknown data type '{other}' (expected mouse or keyboard)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
}

/// One activity entry, tagged by the stream it was fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRecord {
    Mouse(MouseRecord),
    Keyboard(KeyboardRecord),
}

impl ActivityRecord {
    /// Decode a raw JSON record using the column set of `data_type`.
    pub fn from_value(data_type: DataType, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match data_type {
            DataType::Mouse => Self::Mouse(serde_json::from_value(value)?),
            DataType::Keyboard => Self::Keyboard(serde_json::from_value(value)?),
        })
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Mouse(_) => DataType::Mouse,
            Self::Keyboard(_) => DataType::Keyboard,
        }
    }

    /// Cell values in column order.
    pub fn cells(&self) -> [String; 3] {
        match self {
            Self::Mouse(r) => [r.time.clone(), r.action.clone(), r.position.clone()],
            Self::Keyboard(r) => [r.time.clone(), r.key.clone(), r.duration.clone()],
        }
    }
}

/// Accept any JSON scalar for a text cell. Strings pass through, `null`
/// becomes empty, anything else keeps its JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
