//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>`.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::analytics::{CategoryViewItem, StatCardViewItem};
use crate::auth::{DASHBOARD_ROUTE, LoginOutcome, Notification};
use crate::config;
use crate::reports::{self, RecentReport};
use crate::view::{DashboardView, LoadStatus};

use super::{ServerState, content_type_csv, content_type_json, json_error};

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    notification: Notification,
}

/// Dashboard API response. A failed fetch still answers 200 with empty
/// sequences and `status: "failed"`.
#[derive(Serialize)]
struct DashboardResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    categories: Vec<CategoryViewItem>,
    stat_cards: Vec<StatCardViewItem>,
}

#[derive(Serialize)]
struct LogoutResponse {
    revoked: bool,
}

/// A report row with its badge classes, so the page keeps no tag tables.
#[derive(Serialize)]
struct ReportRow {
    #[serde(flatten)]
    report: RecentReport,
    status_tag: &'static str,
    priority_tag: &'static str,
}

impl From<RecentReport> for ReportRow {
    fn from(report: RecentReport) -> Self {
        Self {
            status_tag: report.status.tag(),
            priority_tag: report.priority.tag(),
            report,
        }
    }
}

#[derive(Serialize)]
struct ReportsResponse {
    reports: Vec<ReportRow>,
}

#[derive(Serialize)]
struct HealthResponse {
    api_base_url: String,
    api_reachable: bool,
    config_exists: bool,
    active_sessions: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_response<T: Serialize>(data: &T, status: u16) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/login`: submit the login form.
///
/// Expects JSON body: `{ "password": "..." }`. Granted logins get a session
/// token to send back in the `X-Haven-Session` header. A body that is not
/// JSON is a 400.
pub fn post_login(state: &mut ServerState, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: LoginRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => {
            return Ok(json_error(
                400,
                &format!("invalid JSON in login request: {e}"),
            ));
        }
    };

    let (resp, status) = match state.gate.submit(&req.password) {
        LoginOutcome::Granted {
            session,
            notification,
        } => {
            state.sessions.insert(session.token.clone());
            let resp = LoginResponse {
                granted: true,
                redirect: Some(DASHBOARD_ROUTE),
                token: Some(session.token),
                notification,
            };
            (resp, 200)
        }
        LoginOutcome::Denied { notification } => {
            let resp = LoginResponse {
                granted: false,
                redirect: None,
                token: None,
                notification,
            };
            (resp, 401)
        }
    };

    json_response(&resp, status)
}

/// `POST /api/logout`: revoke the caller's session token.
pub fn post_logout(
    state: &mut ServerState,
    token: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let revoked = token.is_some_and(|t| state.sessions.remove(t));
    json_response(&LogoutResponse { revoked }, 200)
}

/// `GET /api/dashboard`: live stat cards and category breakdown.
pub fn get_dashboard(state: &ServerState) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&dashboard_payload(state), 200)
}

fn dashboard_payload(state: &ServerState) -> DashboardResponse {
    let mut view = DashboardView::mount(state.source.clone(), state.events.clone());
    let status = view.wait(state.fetch_timeout);
    let error = match status {
        LoadStatus::Loading => {
            view.unmount();
            Some("analytics request timed out".to_string())
        }
        _ => view.last_error().map(str::to_string),
    };

    let model = view.model().clone();
    DashboardResponse {
        status: view.status().to_string(),
        error,
        categories: model.categories,
        stat_cards: model.stat_cards,
    }
}

/// `GET /api/reports`: recent reports table with badge classes.
pub fn get_reports() -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&reports_payload(), 200)
}

fn reports_payload() -> ReportsResponse {
    ReportsResponse {
        reports: reports::recent_reports()
            .into_iter()
            .map(ReportRow::from)
            .collect(),
    }
}

/// `GET /api/reports.csv`: CSV export of the recent reports table.
pub fn get_reports_csv() -> Response<Cursor<Vec<u8>>> {
    let csv = reports::to_csv(&reports::recent_reports());
    Response::from_data(csv.into_bytes())
        .with_header(content_type_csv())
        .with_status_code(StatusCode(200))
}

/// `GET /api/health`: API reachability and local config summary.
pub fn get_health(state: &ServerState) -> Result<Response<Cursor<Vec<u8>>>> {
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    let resp = HealthResponse {
        api_base_url: state.api_base_url.clone(),
        api_reachable: crate::api::ApiClient::new(&state.api_base_url, state.fetch_timeout)
            .is_healthy(),
        config_exists,
        active_sessions: state.sessions.len(),
    };

    json_response(&resp, 200)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
