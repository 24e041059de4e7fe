//! Interactive tab view (`actmon view`).
//!
//! One event loop owns the controller. Two kinds of events feed it over a
//! single channel: lines typed on stdin (read on a worker thread) and
//! finished loads (each fetched on its own worker thread). Loads complete
//! in whatever order the backend answers; the controller discards stale
//! ones by generation.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::Result;
use colored::Colorize;

use super::render;
use crate::activity::{DataType, MonitorToggles};
use crate::api::{ActivityApi, HttpActivityApi};
use crate::config::ActmonConfig;
use crate::controller::{self, ActivityViewController, LoadResult, LoadTicket};
use crate::diagnostics::Diagnostics;
use crate::notify::{Notifier, TerminalNotifier};

/// A parsed line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    Select(DataType),
    Reload,
    Start(MonitorToggles),
    Stop,
    Redraw,
    Quit,
    Unknown,
}

impl ViewCommand {
    /// `m`/`k` select a tab, `r` reloads, `s [m][k]` starts monitoring with
    /// the given toggles, `x` stops, `q` quits, an empty line redraws.
    pub fn parse(line: &str) -> Self {
        let line = line.trim().to_ascii_lowercase();
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Self::Redraw;
        };
        let rest: String = parts.collect();

        match head {
            "m" | "mouse" => Self::Select(DataType::Mouse),
            "k" | "keyboard" => Self::Select(DataType::Keyboard),
            "r" | "reload" => Self::Reload,
            "s" | "start" => Self::Start(MonitorToggles::new(rest.contains('m'), rest.contains('k'))),
            "x" | "stop" => Self::Stop,
            "q" | "quit" => Self::Quit,
            _ => Self::Unknown,
        }
    }
}

enum ViewEvent {
    Input(String),
    InputClosed,
    Loaded(LoadTicket, LoadResult),
}

pub fn run(config: &ActmonConfig) -> Result<()> {
    let api = HttpActivityApi::from_config(&config.server);
    let mut controller =
        ActivityViewController::new(api, TerminalNotifier, config.ui.locale.messages())
            .with_diagnostics(Diagnostics::from_config(&config.logging))
            .with_initial_tab(config.ui.default_tab);

    let (tx, rx) = mpsc::channel();
    spawn_input_reader(tx.clone());

    let initial = controller.begin_load(controller.active_tab());
    spawn_fetch(controller.api().clone(), initial, tx.clone());

    draw(&controller);

    for event in rx {
        match event {
            ViewEvent::Loaded(ticket, result) => {
                if controller.complete_load(ticket, result) && ticket.data_type == controller.active_tab() {
                    draw(&controller);
                }
            }
            ViewEvent::InputClosed => break,
            ViewEvent::Input(line) => match ViewCommand::parse(&line) {
                ViewCommand::Select(tab) => {
                    let ticket = controller.select_tab(tab);
                    spawn_fetch(controller.api().clone(), ticket, tx.clone());
                    draw(&controller);
                }
                ViewCommand::Reload => {
                    let ticket = controller.begin_load(controller.active_tab());
                    spawn_fetch(controller.api().clone(), ticket, tx.clone());
                }
                ViewCommand::Start(toggles) => {
                    controller.start_monitoring(toggles);
                    draw(&controller);
                }
                ViewCommand::Stop => {
                    controller.stop_monitoring();
                    draw(&controller);
                }
                ViewCommand::Redraw => draw(&controller),
                ViewCommand::Quit => break,
                ViewCommand::Unknown => {
                    println!("{}", "unknown command".yellow());
                    print_help();
                }
            },
        }
    }

    Ok(())
}

fn spawn_fetch<A>(api: A, ticket: LoadTicket, tx: Sender<ViewEvent>)
where
    A: ActivityApi + Send + 'static,
{
    thread::spawn(move || {
        let result = controller::fetch(&api, ticket);
        let _ = tx.send(ViewEvent::Loaded(ticket, result));
    });
}

fn spawn_input_reader(tx: Sender<ViewEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(ViewEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(ViewEvent::InputClosed);
    });
}

fn draw<A: ActivityApi, N: Notifier>(controller: &ActivityViewController<A, N>) {
    let tab = controller.active_tab();
    println!();
    println!("{}", render::tab_strip(&controller.tab_strip(), controller.messages()));
    print!("{}", render::table(tab, controller.body(tab)));
    print_help();
    let _ = io::stdout().flush();
}

fn print_help() {
    println!(
        "  {}",
        "m/k switch tab · r reload · s [m][k] start · x stop · q quit".dimmed()
    );
}
