//! Dashboard event log: one JSON line per analytics fetch or login attempt.
//!
//! Failures while writing the log are ignored; logging never breaks the
//! dashboard. The log never contains passwords.
//!
//! Default log file: `~/.haven/events.jsonl`

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::LoggingConfig;

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AnalyticsFetch,
    Login,
}

/// How it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
    /// A fetch that resolved after its view was unmounted or superseded.
    Discarded,
}

/// A single event log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardEvent {
    pub timestamp: String,
    pub event: EventKind,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

impl DashboardEvent {
    pub fn new(event: EventKind, outcome: Outcome) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            event,
            outcome,
            detail: None,
            latency_ms: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Destination for event lines, resolved once from `[logging]`.
///
/// A disabled sink drops every event. Views and the login gate hold their
/// own sink, so nothing here reads config files per event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSink {
    path: Option<PathBuf>,
}

impl EventSink {
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: expand_home(&config.path),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Log to an explicit file.
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Resolved log file, `None` when disabled.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an event. Write failures are ignored.
    pub fn log(&self, event: &DashboardEvent) {
        if let Some(path) = self.path() {
            let _ = append_event(event, path);
        }
    }

    /// Log the outcome of an analytics fetch.
    pub fn log_fetch(&self, outcome: Outcome, latency_ms: u64, detail: Option<&str>) {
        let mut event =
            DashboardEvent::new(EventKind::AnalyticsFetch, outcome).with_latency(latency_ms);
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        self.log(&event);
    }

    /// Log a login gate submission. Only the outcome is recorded.
    pub fn log_login(&self, granted: bool) {
        let outcome = if granted {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        self.log(&DashboardEvent::new(EventKind::Login, outcome));
    }

    /// Read every event back, skipping malformed lines.
    pub fn read_all(&self) -> Vec<DashboardEvent> {
        self.path().map(read_events_from).unwrap_or_default()
    }
}

fn append_event(event: &DashboardEvent, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn read_events_from(path: &Path) -> Vec<DashboardEvent> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<DashboardEvent>(&line).ok())
        .collect()
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
