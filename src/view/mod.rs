//! Dashboard view lifecycle.
//!
//! A [`DashboardView`] owns the view model for one mounted dashboard. Each
//! refresh runs the fetch on a worker thread and tags the result with a
//! generation number. Only the latest generation may update the view, and
//! nothing applies once the view is unmounted, so a slow fetch can never
//! overwrite newer data or touch a view that is gone.

pub mod cancel;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;

use crate::analytics::events::{EventSink, Outcome};
use crate::analytics::{AnalyticsReport, DashboardViewModel};
use crate::api::AnalyticsSource;

pub use cancel::CancellationToken;

/// Where the view is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No fetch started yet.
    Idle,
    Loading,
    Loaded,
    /// The latest fetch failed; the view shows the empty state.
    Failed,
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Loaded => write!(f, "loaded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A finished fetch, sent from the worker thread back to the view.
struct FetchMessage {
    generation: u64,
    latency_ms: u64,
    result: Result<AnalyticsReport>,
}

/// One mounted dashboard and its data.
pub struct DashboardView {
    model: DashboardViewModel,
    status: LoadStatus,
    last_error: Option<String>,
    generation: u64,
    token: CancellationToken,
    events: EventSink,
    tx: Sender<FetchMessage>,
    rx: Receiver<FetchMessage>,
}

impl DashboardView {
    /// An unmounted view in the empty state, logging fetch outcomes to
    /// `events`.
    pub fn new(events: EventSink) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            model: DashboardViewModel::default(),
            status: LoadStatus::Idle,
            last_error: None,
            generation: 0,
            token: CancellationToken::new(),
            events,
            tx,
            rx,
        }
    }

    /// Create a view and start its first fetch.
    pub fn mount(source: Arc<dyn AnalyticsSource>, events: EventSink) -> Self {
        let mut view = Self::new(events);
        view.refresh(source);
        view
    }

    /// Start a new fetch, superseding any fetch still in flight.
    pub fn refresh(&mut self, source: Arc<dyn AnalyticsSource>) {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.generation += 1;
        self.status = LoadStatus::Loading;

        let token = self.token.clone();
        let generation = self.generation;
        let tx = self.tx.clone();
        let events = self.events.clone();

        thread::spawn(move || {
            let start = Instant::now();
            let result = source.fetch_analytics();
            let latency_ms = start.elapsed().as_millis() as u64;

            if token.is_cancelled() {
                events.log_fetch(
                    Outcome::Discarded,
                    latency_ms,
                    Some("view unmounted or superseded"),
                );
                return;
            }

            // The view may be dropped between the check and the send; the
            // send error is the only signal and needs no handling.
            let _ = tx.send(FetchMessage {
                generation,
                latency_ms,
                result,
            });
        });
    }

    /// Apply any finished fetches without blocking. Returns `true` if the
    /// view state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(message) = self.rx.try_recv() {
            changed |= self.apply(message);
        }
        changed
    }

    /// Block until the current fetch resolves or `timeout` elapses, and
    /// return the resulting status.
    pub fn wait(&mut self, timeout: Duration) -> LoadStatus {
        let deadline = Instant::now() + timeout;

        while self.status == LoadStatus::Loading {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(message) => {
                    self.apply(message);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.status
    }

    /// Cancel the in-flight fetch. Results arriving later are dropped.
    pub fn unmount(&mut self) {
        self.token.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn model(&self) -> &DashboardViewModel {
        &self.model
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Message of the last failed fetch, cleared by a successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn apply(&mut self, message: FetchMessage) -> bool {
        if message.generation != self.generation || self.token.is_cancelled() {
            self.events
                .log_fetch(Outcome::Discarded, message.latency_ms, Some("stale generation"));
            return false;
        }

        match message.result {
            Ok(report) => {
                self.model = DashboardViewModel::from_report(&report);
                self.status = LoadStatus::Loaded;
                self.last_error = None;
                self.events.log_fetch(Outcome::Success, message.latency_ms, None);
            }
            Err(e) => {
                let detail = format!("{e:#}");
                eprintln!("{} {}", "[haven] analytics fetch failed:".yellow(), detail);
                self.events
                    .log_fetch(Outcome::Failure, message.latency_ms, Some(&detail));
                self.model = DashboardViewModel::default();
                self.status = LoadStatus::Failed;
                self.last_error = Some(detail);
            }
        }
        true
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new(EventSink::disabled())
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
