//! Embedded web dashboard for Haven.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page app with the login form and the dashboard
//! - JSON API endpoints for login, logout, live analytics, recent reports,
//!   and health
//!
//! Launched via `haven web` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::analytics::events::EventSink;
use crate::api::{AnalyticsSource, ApiClient};
use crate::auth::{LoginGate, PasswordAuthenticator};
use crate::config::HavenConfig;

/// Header carrying the session token issued by `POST /api/login`.
pub const SESSION_HEADER: &str = "X-Haven-Session";

type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// State owned by the request loop.
///
/// Requests are handled one at a time, so the session set needs no lock.
pub struct ServerState {
    source: Arc<dyn AnalyticsSource>,
    gate: LoginGate<PasswordAuthenticator>,
    sessions: HashSet<String>,
    events: EventSink,
    fetch_timeout: Duration,
    api_base_url: String,
}

impl ServerState {
    pub fn from_config(config: &HavenConfig) -> Self {
        let client = ApiClient::from_config(&config.api);
        let api_base_url = client.base_url().to_string();
        Self::new(
            Arc::new(client),
            LoginGate::from_config(config),
            Duration::from_millis(config.api.timeout_ms),
            api_base_url,
        )
        .with_events(EventSink::from_config(&config.logging))
    }

    pub fn new(
        source: Arc<dyn AnalyticsSource>,
        gate: LoginGate<PasswordAuthenticator>,
        fetch_timeout: Duration,
        api_base_url: String,
    ) -> Self {
        Self {
            source,
            gate,
            sessions: HashSet::new(),
            events: EventSink::disabled(),
            fetch_timeout,
            api_base_url,
        }
    }

    /// Sink for the dashboard views this server mounts.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    fn is_authorized(&self, token: Option<&str>) -> bool {
        token.is_some_and(|t| self.sessions.contains(t))
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Handles requests sequentially. A failing
/// handler produces a 500 for that request only.
pub fn serve(addr: &str, config: &HavenConfig) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("Haven dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if config.web.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    let mut state = ServerState::from_config(config);

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();
        let token = session_token(&request);

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let resp = dispatch(&mut state, &method, &url, token.as_deref(), body.as_deref())
            .unwrap_or_else(|e| error_response(&e));
        let _ = request.respond(resp);

        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

fn session_token(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(SESSION_HEADER))
        .map(|h| h.value.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    state: &mut ServerState,
    method: &Method,
    url: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> Result<HttpResponse> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") | (&Method::Get, "/dashboard") => {
            Ok(serve_frontend())
        }

        // API
        (&Method::Post, "/api/login") => api::post_login(state, body.unwrap_or("{}")),
        (&Method::Post, "/api/logout") => api::post_logout(state, token),
        (&Method::Get, "/api/dashboard") => {
            if !state.is_authorized(token) {
                return Ok(unauthorized());
            }
            api::get_dashboard(state)
        }
        (&Method::Get, "/api/reports") => api::get_reports(),
        (&Method::Get, "/api/reports.csv") => Ok(api::get_reports_csv()),
        (&Method::Get, "/api/health") => api::get_health(state),

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

fn not_found() -> HttpResponse {
    json_error(404, "not found")
}

fn unauthorized() -> HttpResponse {
    json_error(401, "login required")
}

fn error_response(e: &anyhow::Error) -> HttpResponse {
    json_error(500, &format!("{e:#}"))
}

pub(crate) fn json_error(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// CSV content type header.
pub(crate) fn content_type_csv() -> Header {
    Header::from_bytes("Content-Type", "text/csv; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsReport;

    struct EmptySource;

    impl AnalyticsSource for EmptySource {
        fn fetch_analytics(&self) -> Result<AnalyticsReport> {
            Ok(AnalyticsReport::default())
        }
    }

    fn test_state() -> ServerState {
        ServerState::new(
            Arc::new(EmptySource),
            LoginGate::new(PasswordAuthenticator::new("secret")),
            Duration::from_secs(5),
            "http://127.0.0.1:9".to_string(),
        )
    }

    fn status_of(resp: Result<HttpResponse>) -> u16 {
        resp.unwrap().status_code().0
    }

    #[test]
    fn unknown_route_is_404() {
        let mut state = test_state();
        assert_eq!(
            status_of(dispatch(&mut state, &Method::Get, "/nope", None, None)),
            404
        );
    }

    #[test]
    fn frontend_is_served_at_root_and_dashboard() {
        let mut state = test_state();
        assert_eq!(status_of(dispatch(&mut state, &Method::Get, "/", None, None)), 200);
        assert_eq!(
            status_of(dispatch(&mut state, &Method::Get, "/dashboard?x=1", None, None)),
            200
        );
    }

    #[test]
    fn dashboard_requires_session() {
        let mut state = test_state();
        assert_eq!(
            status_of(dispatch(&mut state, &Method::Get, "/api/dashboard", None, None)),
            401
        );
        assert_eq!(
            status_of(dispatch(
                &mut state,
                &Method::Get,
                "/api/dashboard",
                Some("forged"),
                None
            )),
            401
        );
    }

    #[test]
    fn issued_session_unlocks_dashboard() {
        let mut state = test_state();
        state.sessions.insert("abc".to_string());
        assert_eq!(
            status_of(dispatch(
                &mut state,
                &Method::Get,
                "/api/dashboard",
                Some("abc"),
                None
            )),
            200
        );
    }

    #[test]
    fn malformed_login_body_is_400() {
        let mut state = test_state();
        assert_eq!(
            status_of(dispatch(
                &mut state,
                &Method::Post,
                "/api/login",
                None,
                Some("not json")
            )),
            400
        );
    }

    #[test]
    fn logout_revokes_session() {
        let mut state = test_state();
        state.sessions.insert("abc".to_string());
        assert_eq!(
            status_of(dispatch(
                &mut state,
                &Method::Post,
                "/api/logout",
                Some("abc"),
                None
            )),
            200
        );
        assert!(state.sessions.is_empty());
        assert_eq!(
            status_of(dispatch(
                &mut state,
                &Method::Get,
                "/api/dashboard",
                Some("abc"),
                None
            )),
            401
        );
    }

    #[test]
    fn reports_routes_respond() {
        let mut state = test_state();
        assert_eq!(
            status_of(dispatch(&mut state, &Method::Get, "/api/reports", None, None)),
            200
        );
        assert_eq!(
            status_of(dispatch(&mut state, &Method::Get, "/api/reports.csv", None, None)),
            200
        );
    }
}
