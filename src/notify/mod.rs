//! User-facing notifications and the localized strings behind them.

use std::fmt;

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::activity::DataType;

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn messages(self) -> Messages {
        match self {
            Self::En => EN,
            Self::Zh => ZH,
        }
    }

    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Some(Self::En),
            "zh" | "zh-cn" | "chinese" => Some(Self::Zh),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Zh => write!(f, "zh"),
        }
    }
}

/// Localized user-facing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub monitoring_started: &'static str,
    pub start_failed: &'static str,
    pub start_error: &'static str,
    pub monitoring_stopped: &'static str,
    pub stop_failed: &'static str,
    pub stop_network_error: &'static str,
    pub unknown_error: &'static str,
    pub no_activity_data: &'static str,
    pub load_error: &'static str,
    pub mouse_tab: &'static str,
    pub keyboard_tab: &'static str,
}

const EN: Messages = Messages {
    monitoring_started: "Monitoring started",
    start_failed: "Failed to start monitoring",
    start_error: "An error occurred while starting monitoring",
    monitoring_stopped: "Monitoring stopped",
    stop_failed: "Failed to stop monitoring",
    stop_network_error: "A network error occurred while stopping monitoring",
    unknown_error: "unknown error",
    no_activity_data: "no activity data",
    load_error: "An error occurred while loading data",
    mouse_tab: "Mouse activity",
    keyboard_tab: "Keyboard activity",
};

const ZH: Messages = Messages {
    monitoring_started: "监控已启动",
    start_failed: "启动监控失败",
    start_error: "启动监控时发生错误",
    monitoring_stopped: "监控已停止",
    stop_failed: "停止监控失败",
    stop_network_error: "停止监控时发生网络错误",
    unknown_error: "未知错误",
    no_activity_data: "暂无活动数据",
    load_error: "加载数据时发生错误",
    mouse_tab: "鼠标活动",
    keyboard_tab: "键盘活动",
};

impl Messages {
    pub fn tab_label(&self, data_type: DataType) -> &'static str {
        match data_type {
            DataType::Mouse => self.mouse_tab,
            DataType::Keyboard => self.keyboard_tab,
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }
}

/// Surface for notifications raised by the view controller.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Prints notifications to stdout.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.level {
            Level::Info => println!("{} {}", "●".green().bold(), notification.text),
            Level::Error => println!("{} {}", "●".red().bold(), notification.text.red()),
        }
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub received: Vec<Notification>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.received.push(notification);
    }
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<&Notification> {
        self.received.last()
    }
}
