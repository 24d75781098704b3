use anyhow::Result;
use clap::{Parser, Subcommand};

use haven::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "haven")]
#[command(about = "Admin dashboard for Haven workplace-safety reports")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch live analytics and show stat cards and the category breakdown
    Dashboard {
        /// Output format: table (default), json. CSV export lives under `reports`
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Enter the admin password, then show the dashboard
    Login {
        /// Password to submit (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Show the recent reports table
    Reports {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check config files, reporting API reachability, and the event log
    Health,
    /// Start the local web dashboard
    Web {
        /// Address to bind (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective merged configuration
    Show,
    /// Write a default config file to ~/.haven/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a single key, e.g. `haven config set api.timeout_ms 5000`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Dashboard { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_dashboard(fmt)
        }
        Commands::Login { password } => cli::run_login(password),
        Commands::Reports { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_reports(fmt)
        }
        Commands::Health => cli::run_health(),
        Commands::Web { addr } => {
            let cfg = config::load();
            let addr = addr.unwrap_or_else(|| cfg.web.addr.clone());
            web::serve(&addr, &cfg)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
