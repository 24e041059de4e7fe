//! Terminal rendering of the tab strip and activity tables.

use anyhow::Result;
use colored::Colorize;

use crate::activity::DataType;
use crate::notify::Messages;
use crate::utils::csv::field as csv_field;
use crate::view::{COLUMN_COUNT, TabStrip, TableBody};

/// Output format for `actmon show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// One line with every tab; the active one is bracketed.
pub fn tab_strip(strip: &TabStrip, messages: &Messages) -> String {
    strip
        .tabs
        .iter()
        .map(|tab| {
            let label = messages.tab_label(tab.data_type);
            if tab.button_active {
                format!("[ {} ]", label.bold().cyan())
            } else {
                format!("  {}  ", label.dimmed())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn table(data_type: DataType, body: &TableBody) -> String {
    let headers = data_type.columns();
    let mut widths = headers.map(|h| h.chars().count());

    if let TableBody::Rows { rows } = body {
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_line = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&format!("  {}\n", header_line.bold()));

    let total_width = widths.iter().sum::<usize>() + 2 * (COLUMN_COUNT - 1);
    out.push_str(&format!("  {}\n", "-".repeat(total_width)));

    match body {
        TableBody::Pending => {}
        TableBody::Rows { rows } => {
            for row in rows {
                let line = row
                    .cells
                    .iter()
                    .zip(widths)
                    .map(|(cell, w)| format!("{cell:<w$}"))
                    .collect::<Vec<_>>()
                    .join("  ");
                out.push_str(&format!("  {}\n", line.trim_end()));
            }
        }
        TableBody::Placeholder { text, .. } => {
            out.push_str(&format!("  {}\n", text.as_str().yellow()));
        }
    }

    out
}

pub fn json(data_type: DataType, body: &TableBody) -> Result<String> {
    let value = serde_json::json!({
        "type": data_type,
        "columns": data_type.columns(),
        "body": body,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn csv(data_type: DataType, body: &TableBody) -> String {
    let mut out = data_type.columns().join(",");
    out.push('\n');
    match body {
        TableBody::Pending => {}
        TableBody::Rows { rows } => {
            for row in rows {
                let fields: Vec<String> = row.cells.iter().map(|c| csv_field(c)).collect();
                out.push_str(&fields.join(","));
                out.push('\n');
            }
        }
        TableBody::Placeholder { text, .. } => {
            out.push_str(&csv_field(text));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Locale;
    use crate::view::{Row, ViewState};

    fn keyboard_body() -> TableBody {
        TableBody::Rows {
            rows: vec![
                Row {
                    cells: ["10:00".into(), "A".into(), "50ms".into()],
                },
                Row {
                    cells: ["10:01".into(), "Shift, A".into(), "80ms".into()],
                },
            ],
        }
    }

    #[test]
    fn output_format_defaults_to_table() {
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str_opt(Some("xml")), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
    }

    #[test]
    fn tab_strip_brackets_active_tab_only() {
        let messages = Locale::En.messages();
        let strip = ViewState::new(DataType::Keyboard).tab_strip();
        let line = tab_strip(&strip, &messages);
        assert_eq!(line.matches("[ ").count(), 1);
        assert!(line.contains("Keyboard activity"));
        assert!(line.contains("Mouse activity"));
    }

    #[test]
    fn table_lists_each_row() {
        let out = table(DataType::Keyboard, &keyboard_body());
        assert!(out.contains("duration"));
        assert!(out.contains("10:00"));
        assert!(out.contains("Shift, A"));
        // header, rule, two rows
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn table_shows_placeholder_once() {
        let out = table(DataType::Mouse, &TableBody::placeholder("no activity data"));
        assert_eq!(out.matches("no activity data").count(), 1);
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn csv_quotes_cells_with_commas() {
        let out = csv(DataType::Keyboard, &keyboard_body());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "time,key,duration");
        assert_eq!(lines[1], "10:00,A,50ms");
        assert_eq!(lines[2], "10:01,\"Shift, A\",80ms");
    }

    #[test]
    fn json_tags_body_kind() {
        let out = json(DataType::Mouse, &TableBody::placeholder("x")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["type"], "mouse");
        assert_eq!(value["body"]["kind"], "placeholder");
        assert_eq!(value["body"]["colspan"], 3);
    }
}
