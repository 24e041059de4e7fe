//! View model for the two-tab activity display.
//!
//! [`ViewState`] is an immutable value naming the active tab. Panel
//! visibility and button markers are derived from it by [`TabStrip`], so
//! the two can never disagree. [`TableBody`] is the rendered content of one
//! tab's table: either data rows or a single placeholder row.

use serde::Serialize;

use crate::activity::{ActivityRecord, DataType};
use crate::api::{ApiError, DataPayload};
use crate::notify::Messages;

/// Number of columns in every activity table.
pub const COLUMN_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    active_tab: DataType,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DataType::Mouse)
    }
}

impl ViewState {
    pub fn new(active_tab: DataType) -> Self {
        Self { active_tab }
    }

    pub fn active_tab(&self) -> DataType {
        self.active_tab
    }

    /// The state after selecting `tab`. Selecting the active tab is a no-op.
    #[must_use]
    pub fn select(self, tab: DataType) -> Self {
        Self { active_tab: tab }
    }

    pub fn tab_strip(&self) -> TabStrip {
        TabStrip {
            tabs: DataType::ALL
                .iter()
                .map(|&data_type| TabView {
                    data_type,
                    button_active: data_type == self.active_tab,
                    panel_visible: data_type == self.active_tab,
                })
                .collect(),
        }
    }
}

/// Per-tab visual state derived from a [`ViewState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabView {
    pub data_type: DataType,
    pub button_active: bool,
    pub panel_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStrip {
    pub tabs: Vec<TabView>,
}

impl TabStrip {
    pub fn active_buttons(&self) -> usize {
        self.tabs.iter().filter(|t| t.button_active).count()
    }

    pub fn visible_panels(&self) -> usize {
        self.tabs.iter().filter(|t| t.panel_visible).count()
    }
}

// ---------------------------------------------------------------------------
// Table body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub cells: [String; COLUMN_COUNT],
}

/// Content of one tab's table body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableBody {
    /// Nothing has been loaded yet.
    Pending,
    /// One row per record, in response order.
    Rows { rows: Vec<Row> },
    /// A single row spanning every column.
    Placeholder { text: String, colspan: usize },
}

impl TableBody {
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder {
            text: text.into(),
            colspan: COLUMN_COUNT,
        }
    }

    pub fn from_records(records: &[ActivityRecord]) -> Self {
        Self::Rows {
            rows: records
                .iter()
                .map(|record| Row {
                    cells: record.cells(),
                })
                .collect(),
        }
    }

    /// Render a load outcome. Always yields at least one row.
    pub fn from_load(result: &Result<DataPayload, ApiError>, messages: &Messages) -> Self {
        match result {
            Ok(DataPayload::Error(message)) => Self::placeholder(message.clone()),
            Ok(DataPayload::Records(records)) if !records.is_empty() => {
                Self::from_records(records)
            }
            Ok(_) => Self::placeholder(messages.no_activity_data),
            Err(_) => Self::placeholder(messages.load_error),
        }
    }

    /// Number of rendered rows, placeholder included.
    pub fn row_count(&self) -> usize {
        match self {
            Self::Pending => 0,
            Self::Rows { rows } => rows.len(),
            Self::Placeholder { .. } => 1,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}
