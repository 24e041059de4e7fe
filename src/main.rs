use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use actmon::activity::{DataType, MonitorToggles};
use actmon::{cli, config};

#[derive(Debug, Parser)]
#[command(name = "actmon")]
#[command(about = "Control and browse a student activity monitor")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start monitoring. Neither or both flags monitor everything.
    Start {
        #[arg(long)]
        mouse: bool,
        #[arg(long)]
        keyboard: bool,
    },
    /// Stop monitoring
    Stop,
    /// Fetch and print one activity table
    Show {
        /// mouse or keyboard
        data_type: DataType,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Interactive tab view
    View,
    /// Periodically ask for an emotion self-report and save it to CSV
    Emotion {
        username: String,
        /// Seconds between prompts (default from config, 120)
        #[arg(long)]
        interval: Option<u64>,
        /// Prompt a single time and exit
        #[arg(long)]
        once: bool,
    },
    /// Check config files and backend reachability
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default config to ~/.actmon/config.toml
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `server.base_url http://host:5000`
    Set { key: String, value: String },
    /// Overwrite ~/.actmon/config.toml with defaults
    Reset,
}

fn main() -> Result<ExitCode> {
    let app = App::parse();
    let cfg = config::load();

    let ok = match app.command {
        Commands::Start { mouse, keyboard } => {
            cli::run_start(&cfg, MonitorToggles::new(mouse, keyboard))?
        }
        Commands::Stop => cli::run_stop(&cfg)?,
        Commands::Show { data_type, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_show(&cfg, data_type, fmt)?;
            true
        }
        Commands::View => {
            cli::run_view(&cfg)?;
            true
        }
        Commands::Emotion {
            username,
            interval,
            once,
        } => {
            cli::run_emotion(&cfg, &username, interval, once)?;
            true
        }
        Commands::Health => {
            cli::run_health(&cfg)?;
            true
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => cli::run_config_show()?,
                ConfigAction::Init { force } => cli::run_config_init(force)?,
                ConfigAction::Set { key, value } => cli::run_config_set(&key, &value)?,
                ConfigAction::Reset => cli::run_config_reset()?,
            }
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
