//! CLI command implementations for the Haven dashboard.
//!
//! Provides subcommand handlers for:
//! - `haven dashboard` — fetch analytics and render stat cards and categories
//! - `haven login` — run the login gate, then show the dashboard
//! - `haven reports` — recent reports table (table, JSON, or CSV export)
//! - `haven health` — config, API reachability, event log
//! - `haven config show|init|set|reset` — configuration management

use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::events::EventSink;
use crate::analytics::{CategoryTag, CategoryViewItem, DashboardViewModel, StatCardViewItem};
use crate::api::ApiClient;
use crate::auth::{LoginGate, LoginOutcome, Notification, NotificationVariant};
use crate::config::{self, HavenConfig};
use crate::reports::{self, Priority, RecentReport, ReportStatus};
use crate::view::{DashboardView, LoadStatus};

/// Extra time the CLI waits beyond the request timeout before giving up on
/// a fetch.
const WAIT_MARGIN: Duration = Duration::from_secs(2);

/// Width of the category percentage bar in the terminal.
const BAR_WIDTH: usize = 24;

/// Output format for data commands.
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

// ---------------------------------------------------------------------------
// haven dashboard
// ---------------------------------------------------------------------------

/// Fetch live analytics and render the dashboard.
///
/// A failed fetch renders the empty state; it is not an error. CSV is only
/// offered by `haven reports` and is rejected here.
pub fn run_dashboard(format: OutputFormat) -> Result<()> {
    check_dashboard_format(format)?;
    render_dashboard(&config::load(), format)
}

fn check_dashboard_format(format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Csv {
        anyhow::bail!(
            "`haven dashboard` supports table or json output; use `haven reports --format csv` for CSV"
        );
    }
    Ok(())
}

fn render_dashboard(cfg: &HavenConfig, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&cfg.api);

    let events = EventSink::from_config(&cfg.logging);
    let mut view = DashboardView::mount(Arc::new(client), events);
    let status = view.wait(Duration::from_millis(cfg.api.timeout_ms) + WAIT_MARGIN);
    if status == LoadStatus::Loading {
        view.unmount();
        eprintln!(
            "{}",
            "[haven] analytics request did not finish in time".yellow()
        );
    }

    match format {
        OutputFormat::Json => print_dashboard_json(&view)?,
        OutputFormat::Table | OutputFormat::Csv => print_dashboard_table(view.model()),
    }

    Ok(())
}

fn print_dashboard_table(model: &DashboardViewModel) {
    println!("{}", "Haven Admin Dashboard".bold().magenta());
    println!("{}", "=".repeat(60));
    println!("Here's what's happening with workplace safety today.");
    println!();

    if model.is_empty() {
        println!(
            "{}",
            "No analytics available. Check `haven health` and try again.".yellow()
        );
        return;
    }

    print_stat_cards(&model.stat_cards);
    println!();
    print_categories(&model.categories);
}

fn print_stat_cards(cards: &[StatCardViewItem]) {
    for card in cards {
        println!(
            "  {} {:>8}  {}",
            format!("{:<14}", card.title).bold(),
            card.value,
            card.trend.dimmed()
        );
    }
}

fn print_categories(categories: &[CategoryViewItem]) {
    println!("{}", "Report Categories".bold().cyan());
    if categories.is_empty() {
        println!("  {}", "No categorized reports yet.".dimmed());
        return;
    }

    println!("  {:<18} {:>6} {:>7}", "Category", "Count", "Share");
    println!("  {}", "-".repeat(58));
    for item in categories {
        println!(
            "  {:<18} {:>6} {:>6.1}% {}",
            truncate(&item.name, 18),
            item.count,
            item.percentage,
            colorize_tag(&render_bar(item.percentage, BAR_WIDTH), item.color_tag),
        );
    }
}

fn print_dashboard_json(view: &DashboardView) -> Result<()> {
    let value = serde_json::json!({
        "status": view.status().to_string(),
        "error": view.last_error(),
        "categories": view.model().categories,
        "stat_cards": view.model().stat_cards,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// haven login
// ---------------------------------------------------------------------------

/// Run the login gate. On success the dashboard is rendered; on failure
/// the notification is shown and an error is returned.
pub fn run_login(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let cfg = config::load();
    let gate = LoginGate::from_config(&cfg);
    let outcome = gate.submit(&password);

    print_notification(outcome.notification());

    match outcome {
        LoginOutcome::Granted { .. } => {
            println!();
            render_dashboard(&cfg, OutputFormat::Table)
        }
        LoginOutcome::Denied { .. } => anyhow::bail!("login denied"),
    }
}

fn read_password() -> Result<String> {
    eprint!("Admin password: ");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_notification(notification: &Notification) {
    let title = match notification.variant {
        NotificationVariant::Default => notification.title.green().bold(),
        NotificationVariant::Destructive => notification.title.red().bold(),
    };
    println!("{} {}", title, notification.description.dimmed());
}

// ---------------------------------------------------------------------------
// haven reports
// ---------------------------------------------------------------------------

/// Show the recent reports table.
pub fn run_reports(format: OutputFormat) -> Result<()> {
    let reports = reports::recent_reports();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Csv => print!("{}", reports::to_csv(&reports)),
        OutputFormat::Table => print_reports_table(&reports),
    }

    Ok(())
}

fn print_reports_table(reports: &[RecentReport]) {
    println!("{}", "Recent Reports".bold().cyan());
    println!("{}", "Latest anonymous submissions".dimmed());
    println!(
        "  {:<7} {:<16} {:<10} {:<11} Priority",
        "ID", "Type", "Status", "Date"
    );
    println!("  {}", "-".repeat(56));

    for report in reports {
        println!(
            "  {:<7} {:<16} {:<10} {:<11} {}",
            report.id,
            report.category,
            colorize_status(report.status),
            report.date.format("%Y-%m-%d").to_string(),
            colorize_priority(report.priority),
        );
    }
}

// ---------------------------------------------------------------------------
// haven health
// ---------------------------------------------------------------------------

/// Check config files, API reachability, and the event log.
pub fn run_health() -> Result<()> {
    println!("{}", "Haven Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.haven/config.toml found"
        } else {
            "not found (run `haven config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".haven.toml found"
        } else {
            "none (optional)"
        },
    );

    let client = ApiClient::from_config(&cfg.api);
    let api_ok = client.is_healthy();
    let api_detail = if api_ok {
        format!("reachable at {}", client.base_url())
    } else {
        format!("not reachable at {}", client.base_url())
    };
    print_health_item("Reporting API", api_ok, &api_detail);

    let sink = EventSink::from_config(&cfg.logging);
    let log_exists = sink.path().is_some_and(|p| p.exists());
    let log_detail = if !sink.is_enabled() {
        "disabled".to_string()
    } else if log_exists {
        format!("{} events", sink.read_all().len())
    } else {
        "no log file yet".to_string()
    };
    print_health_item("Event log", sink.is_enabled() && log_exists, &log_detail);

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// haven config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Haven Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.haven/config.toml", global_exists);
    print_source(".haven.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "HAVEN_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.haven/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// A fixed-width bar filled in proportion to `percentage` (clamped 0–100).
fn render_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn colorize_tag(text: &str, tag: CategoryTag) -> colored::ColoredString {
    match tag {
        CategoryTag::Harassment => text.magenta(),
        CategoryTag::Discrimination => text.cyan(),
        CategoryTag::VerbalAbuse => text.yellow(),
        CategoryTag::Bullying => text.bright_magenta(),
        CategoryTag::Neutral => text.dimmed(),
    }
}

fn colorize_status(status: ReportStatus) -> colored::ColoredString {
    let text = format!("{status:<10}");
    match status {
        ReportStatus::Active => text.yellow(),
        ReportStatus::Resolved => text.green(),
    }
}

fn colorize_priority(priority: Priority) -> colored::ColoredString {
    let text = priority.to_string();
    match priority {
        Priority::High => text.red(),
        Priority::Medium => text.yellow(),
        Priority::Low => text.blue(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn test_dashboard_rejects_csv() {
        assert!(check_dashboard_format(OutputFormat::Table).is_ok());
        assert!(check_dashboard_format(OutputFormat::Json).is_ok());
        let err = run_dashboard(OutputFormat::Csv).unwrap_err();
        assert!(err.to_string().contains("haven reports --format csv"));
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0.0, 4), "░░░░");
        assert_eq!(render_bar(50.0, 4), "██░░");
        assert_eq!(render_bar(100.0, 4), "████");
        assert_eq!(render_bar(250.0, 4), "████");
        assert_eq!(render_bar(-5.0, 4), "░░░░");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Bullying", 18), "Bullying");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
    }
}
