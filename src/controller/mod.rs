//! The activity view controller.
//!
//! Owns the [`ViewState`] and one [`TableBody`] per tab, issues start/stop
//! commands to the backend, and renders fetched activity into the tables.
//!
//! Loads are split in three steps so they can run off the UI thread:
//!
//! 1. [`begin_load`](ActivityViewController::begin_load) issues a
//!    [`LoadTicket`] carrying a per-data-type generation.
//! 2. [`fetch`] performs the request (any thread).
//! 3. [`complete_load`](ActivityViewController::complete_load) applies the
//!    result only if the ticket is still the newest for its data type.
//!
//! [`load_activity_data`](ActivityViewController::load_activity_data) runs
//! all three in place.

use std::collections::HashMap;

use crate::activity::{DataType, MonitorToggles};
use crate::api::{ActivityApi, ApiError, DataPayload};
use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::notify::{Messages, Notification, Notifier};
use crate::view::{TableBody, TabStrip, ViewState};

pub type LoadResult = Result<DataPayload, ApiError>;

/// Identifies one issued load. Only the latest ticket per data type is
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub data_type: DataType,
    pub generation: u64,
}

/// Result of a start/stop command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    /// Backend accepted the command; the active tab was re-fetched.
    Refreshed,
    /// Backend rejected it or the request failed; nothing changed.
    Failed,
}

/// Perform the request for `ticket`. Safe to call from a worker thread.
pub fn fetch<A: ActivityApi + ?Sized>(api: &A, ticket: LoadTicket) -> LoadResult {
    api.monitoring_data(ticket.data_type)
}

pub struct ActivityViewController<A, N> {
    api: A,
    notifier: N,
    messages: Messages,
    diagnostics: Diagnostics,
    view: ViewState,
    bodies: HashMap<DataType, TableBody>,
    generations: HashMap<DataType, u64>,
}

impl<A: ActivityApi, N: Notifier> ActivityViewController<A, N> {
    pub fn new(api: A, notifier: N, messages: Messages) -> Self {
        Self {
            api,
            notifier,
            messages,
            diagnostics: Diagnostics::disabled(),
            view: ViewState::default(),
            bodies: DataType::ALL
                .iter()
                .map(|&dt| (dt, TableBody::Pending))
                .collect(),
            generations: HashMap::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Set the tab shown before any selection. Does not load.
    pub fn with_initial_tab(mut self, tab: DataType) -> Self {
        self.view = ViewState::new(tab);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn active_tab(&self) -> DataType {
        self.view.active_tab()
    }

    pub fn tab_strip(&self) -> TabStrip {
        self.view.tab_strip()
    }

    pub fn body(&self, data_type: DataType) -> &TableBody {
        // Every data type is seeded in `new`.
        &self.bodies[&data_type]
    }

    /// Startup load of the initially active tab.
    pub fn initialize(&mut self) -> bool {
        self.load_activity_data(self.active_tab())
    }

    // -----------------------------------------------------------------------
    // Monitoring control
    // -----------------------------------------------------------------------

    pub fn start_monitoring(&mut self, toggles: MonitorToggles) -> ControlOutcome {
        let filter = toggles.filter();
        match self.api.start_monitoring(filter) {
            Ok(_) => {
                self.diagnostics
                    .record(&DiagnosticEvent::new("start_monitoring", "ok", Some(filter.to_string())));
                self.notifier
                    .notify(Notification::info(self.messages.monitoring_started));
                self.refresh();
                ControlOutcome::Refreshed
            }
            Err(err) => {
                self.diagnostics.error("start_monitoring", &err);
                let text = if err.is_transport() {
                    self.messages.start_error.to_string()
                } else {
                    format!(
                        "{}: {}",
                        self.messages.start_failed,
                        err.server_message().unwrap_or(self.messages.unknown_error)
                    )
                };
                self.notifier.notify(Notification::error(text));
                ControlOutcome::Failed
            }
        }
    }

    pub fn stop_monitoring(&mut self) -> ControlOutcome {
        match self.api.stop_monitoring() {
            Ok(ack) => {
                self.diagnostics.record(&DiagnosticEvent::ok("stop_monitoring"));
                let text = ack
                    .message
                    .unwrap_or_else(|| self.messages.monitoring_stopped.to_string());
                self.notifier.notify(Notification::info(text));
                self.refresh();
                ControlOutcome::Refreshed
            }
            Err(err) => {
                self.diagnostics.error("stop_monitoring", &err);
                let text = if err.is_transport() {
                    self.messages.stop_network_error.to_string()
                } else {
                    format!(
                        "{}: {}",
                        self.messages.stop_failed,
                        err.server_message().unwrap_or(self.messages.unknown_error)
                    )
                };
                self.notifier.notify(Notification::error(text));
                ControlOutcome::Failed
            }
        }
    }

    /// Re-fetch the active tab.
    pub fn refresh(&mut self) -> bool {
        self.load_activity_data(self.active_tab())
    }

    // -----------------------------------------------------------------------
    // Tabs and loading
    // -----------------------------------------------------------------------

    /// Make `tab` the active tab and issue a load for it.
    ///
    /// The view is updated before this returns; the returned ticket still
    /// has to be fetched and completed.
    pub fn select_tab(&mut self, tab: DataType) -> LoadTicket {
        self.view = self.view.select(tab);
        self.begin_load(tab)
    }

    pub fn begin_load(&mut self, data_type: DataType) -> LoadTicket {
        let generation = self.generations.entry(data_type).or_insert(0);
        *generation += 1;
        LoadTicket {
            data_type,
            generation: *generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generations.get(&ticket.data_type).copied() == Some(ticket.generation)
    }

    /// Apply a finished load. Returns `false` if a newer load for the same
    /// data type was issued after `ticket`.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: LoadResult) -> bool {
        let operation = format!("load:{}", ticket.data_type);

        if !self.is_current(ticket) {
            self.diagnostics.record(&DiagnosticEvent::new(
                &operation,
                "stale",
                Some(format!("generation {}", ticket.generation)),
            ));
            return false;
        }

        match &result {
            Ok(DataPayload::Error(message)) => self.diagnostics.record(&DiagnosticEvent::new(
                &operation,
                "server_error",
                Some(message.clone()),
            )),
            Ok(_) => self.diagnostics.record(&DiagnosticEvent::ok(&operation)),
            Err(err) => self.diagnostics.error(&operation, err),
        }

        let body = TableBody::from_load(&result, &self.messages);
        self.bodies.insert(ticket.data_type, body);
        true
    }

    /// Fetch and render `data_type` in place, replacing its table.
    pub fn load_activity_data(&mut self, data_type: DataType) -> bool {
        let ticket = self.begin_load(data_type);
        let result = fetch(&self.api, ticket);
        self.complete_load(ticket, result)
    }
}
