/// Configuration schema and defaults for the Haven dashboard.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[api]`, `[auth]`, `[web]`, and `[logging]`.
///
/// Every field has a built-in default. Users only set what they want to
/// override.
use serde::{Deserialize, Serialize};

/// Base URL of the hosted reporting API.
pub const DEFAULT_API_BASE_URL: &str = "https://powerhacks-m2qp.onrender.com";

/// Local address for `haven web`.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level Haven configuration.
///
/// Maps directly to the `~/.haven/config.toml` and `.haven.toml` file
/// schemas. Missing sections and fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HavenConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Remote reporting API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [auth]
// ---------------------------------------------------------------------------

/// Login gate settings.
///
/// The password is compared locally and is not a security boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub admin_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: "haven2025".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded web dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Event log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// JSONL file path. A leading `~/` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.haven/events.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl HavenConfig {
    /// Annotated default config file content, written by `haven config init`.
    pub fn default_toml() -> String {
        r#"# Haven dashboard configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (HAVEN_*)
#   2. Project config (.haven.toml in current directory)
#   3. User global config (~/.haven/config.toml)
#   4. Built-in defaults

[api]
base_url = "https://powerhacks-m2qp.onrender.com"
timeout_ms = 10000

[auth]
admin_password = "haven2025"          # Local gate only, not a security boundary

[web]
addr = "127.0.0.1:9747"
open_browser = true

[logging]
enabled = true
path = "~/.haven/events.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
