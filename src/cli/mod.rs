//! CLI command implementations.
//!
//! - `actmon start [--mouse] [--keyboard]`: start backend monitoring
//! - `actmon stop`: stop backend monitoring
//! - `actmon show <mouse|keyboard>`: fetch and print one activity table
//! - `actmon view`: interactive tab view
//! - `actmon emotion <username>`: periodic emotion self-report
//! - `actmon health`: config and backend reachability
//! - `actmon config show|init|set|reset`: configuration management

pub mod render;
pub mod view;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::activity::{DataType, MonitorToggles};
use crate::api::{ActivityApi, HttpActivityApi};
use crate::config::{self, ActmonConfig};
use crate::controller::{ActivityViewController, ControlOutcome};
use crate::diagnostics::{self, Diagnostics};
use crate::emotion::{EmotionLog, EmotionMonitor, PromptAnswer, TerminalPrompt};
use crate::notify::TerminalNotifier;

pub use render::OutputFormat;

type TerminalController = ActivityViewController<HttpActivityApi, TerminalNotifier>;

fn terminal_controller(config: &ActmonConfig) -> TerminalController {
    ActivityViewController::new(
        HttpActivityApi::from_config(&config.server),
        TerminalNotifier,
        config.ui.locale.messages(),
    )
    .with_diagnostics(Diagnostics::from_config(&config.logging))
    .with_initial_tab(config.ui.default_tab)
}

fn print_active_table(controller: &TerminalController) {
    let tab = controller.active_tab();
    println!();
    println!(
        "{}",
        render::tab_strip(&controller.tab_strip(), controller.messages())
    );
    print!("{}", render::table(tab, controller.body(tab)));
}

// ---------------------------------------------------------------------------
// actmon start / stop
// ---------------------------------------------------------------------------

/// Returns `true` if the backend accepted the command.
pub fn run_start(config: &ActmonConfig, toggles: MonitorToggles) -> Result<bool> {
    let mut controller = terminal_controller(config);
    let outcome = controller.start_monitoring(toggles);
    if outcome == ControlOutcome::Refreshed {
        print_active_table(&controller);
    }
    Ok(outcome == ControlOutcome::Refreshed)
}

pub fn run_stop(config: &ActmonConfig) -> Result<bool> {
    let mut controller = terminal_controller(config);
    let outcome = controller.stop_monitoring();
    if outcome == ControlOutcome::Refreshed {
        print_active_table(&controller);
    }
    Ok(outcome == ControlOutcome::Refreshed)
}

// ---------------------------------------------------------------------------
// actmon show
// ---------------------------------------------------------------------------

pub fn run_show(config: &ActmonConfig, data_type: DataType, format: OutputFormat) -> Result<()> {
    let mut controller = terminal_controller(config);
    controller.load_activity_data(data_type);
    let body = controller.body(data_type);

    match format {
        OutputFormat::Json => println!("{}", render::json(data_type, body)?),
        OutputFormat::Csv => print!("{}", render::csv(data_type, body)),
        OutputFormat::Table => {
            println!(
                "{}",
                controller.messages().tab_label(data_type).bold().cyan()
            );
            print!("{}", render::table(data_type, body));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// actmon view
// ---------------------------------------------------------------------------

pub fn run_view(config: &ActmonConfig) -> Result<()> {
    view::run(config)
}

// ---------------------------------------------------------------------------
// actmon emotion
// ---------------------------------------------------------------------------

pub fn run_emotion(
    config: &ActmonConfig,
    username: &str,
    interval_secs: Option<u64>,
    once: bool,
) -> Result<()> {
    if username.trim().is_empty() {
        anyhow::bail!("username must not be empty");
    }

    let data_dir = emotion_data_dir(config)?;
    let log = EmotionLog::open(&data_dir, username)?;
    let interval = Duration::from_secs(interval_secs.unwrap_or(config.emotion.interval_secs).max(1));
    let monitor = EmotionMonitor::new(username, interval, config.ui.locale, log);

    println!(
        "{} {} (every {}s) → {}",
        "Emotion check-in for".bold(),
        username,
        interval.as_secs(),
        monitor.log().path().display()
    );

    let stdin = io::stdin();
    let mut prompt = TerminalPrompt::new(stdin.lock(), io::stdout());

    if once {
        if let PromptAnswer::Chose(emotion) = monitor.prompt_once(&mut prompt)? {
            println!("{} {}", "Saved:".green(), emotion.record_text(config.ui.locale));
        }
        return Ok(());
    }

    let saved = monitor.run(&mut prompt)?;
    println!("{} {saved} response(s) saved", "Stopped.".dimmed());
    Ok(())
}

fn emotion_data_dir(config: &ActmonConfig) -> Result<PathBuf> {
    if !config.emotion.data_dir.is_empty() {
        return Ok(PathBuf::from(&config.emotion.data_dir));
    }
    config::actmon_home()
        .map(|home| home.join("data"))
        .context("could not determine home directory")
}

// ---------------------------------------------------------------------------
// actmon health
// ---------------------------------------------------------------------------

pub fn run_health(config: &ActmonConfig) -> Result<()> {
    println!("{}", "actmon Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.actmon/config.toml found"
        } else {
            "not found (run `actmon config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".actmon.toml found"
        } else {
            "none (optional)"
        },
    );

    let api = HttpActivityApi::from_config(&config.server);
    let probe = api.monitoring_data(DataType::Mouse);
    let detail = match &probe {
        Ok(_) => format!("reachable at {}", api.base_url()),
        Err(e) => format!("{} ({e})", api.base_url()),
    };
    print_health_item("Backend", probe.is_ok(), &detail);

    let events = diagnostics::events_log_path();
    let events_exists = events.as_ref().map(|p| p.exists()).unwrap_or(false);
    let events_detail = match (&events, config.logging.enabled) {
        (_, false) => "logging disabled".to_string(),
        (Some(path), true) if events_exists => {
            format!("{} entries", diagnostics::read_events(path).len())
        }
        _ => "no events yet".to_string(),
    };
    print_health_item("Event log", events_exists, &events_detail);

    print_health_item(
        "Locale / default tab",
        true,
        &format!("{} / {}", config.ui.locale, config.ui.default_tab),
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<22} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// actmon config show | init | set | reset
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective actmon Configuration".bold().cyan());
    println!("{}", "=".repeat(40));
    println!();
    println!("{toml_str}");
    Ok(())
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} {key} = {value}", "Set".green());
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!("{} {}", "Reset".green(), path.display());
    Ok(())
}
