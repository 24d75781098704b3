/// Configuration system for Haven.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::HavenConfig::default()`]
/// 2. **User global config**: `~/.haven/config.toml`
/// 3. **Project local config**: `.haven.toml` in the current working directory
/// 4. **Environment variables**: `HAVEN_*` overrides (highest precedence)
///
/// File layers are merged key by key, so a project file that only sets
/// `[web]` keeps the global `[api]` and `[auth]` values. Environment
/// variables then override single fields.
///
/// # Usage
///
/// ```rust,ignore
/// use haven::config;
///
/// let cfg = config::load();
/// let client = haven::api::ApiClient::from_config(&cfg.api);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::{ApiConfig, AuthConfig, HavenConfig, LoggingConfig, WebConfig};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> HavenConfig {
    let mut config = load_layers(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge TOML file layers onto the built-in defaults, later layers winning
/// key by key. Environment variables are not consulted.
///
/// Missing paths, unreadable files and files that do not fit the schema are
/// skipped. A broken config file never stops the dashboard.
pub fn load_layers(paths: &[Option<PathBuf>]) -> HavenConfig {
    let Ok(mut merged) = toml::Value::try_from(HavenConfig::default()) else {
        return HavenConfig::default();
    };

    for path in paths.iter().flatten() {
        if let Some(layer) = load_toml_layer(path) {
            merge_toml(&mut merged, layer);
        }
    }

    let config: Result<HavenConfig, _> = merged.try_into();
    config.unwrap_or_default()
}

/// Read one config file as a raw TOML tree, keeping only the keys it sets.
fn load_toml_layer(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    // Reject layers with mistyped values before they can poison the merge.
    toml::from_str::<HavenConfig>(&content).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`. Tables merge per key; any other
/// value replaces the base value.
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.haven/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".haven").join("config.toml"))
}

/// Path to the project local config: `.haven.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".haven.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `HAVEN_API_URL`: reporting API base URL
/// - `HAVEN_API_TIMEOUT_MS`: request timeout
/// - `HAVEN_ADMIN_PASSWORD`: login gate password
/// - `HAVEN_WEB_ADDR`: bind address for `haven web`
/// - `HAVEN_LOGGING`: event log toggle (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut HavenConfig) {
    if let Ok(val) = std::env::var("HAVEN_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("HAVEN_API_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("HAVEN_ADMIN_PASSWORD")
        && !val.is_empty()
    {
        config.auth.admin_password = val;
    }
    if let Ok(val) = std::env::var("HAVEN_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("HAVEN_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.haven/config.toml`.
///
/// Fails if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.haven/ directory")?;
    }

    fs::write(&path, HavenConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key in the global config file.
///
/// Supports dotted keys like `api.base_url`. The new value is parsed to the
/// type of the existing value. When no global file exists yet, the defaults
/// are written out with the key applied.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let source = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&HavenConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&source).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        anyhow::bail!("invalid config key: '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' is a section, not a value"),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_updates_string() {
        let toml_str = r#"
[api]
base_url = "https://example.org"
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "api.base_url", "http://localhost:8000").unwrap();

        let api = root["api"].as_table().unwrap();
        assert_eq!(api["base_url"].as_str(), Some("http://localhost:8000"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let toml_str = r#"
[web]
open_browser = true
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "web.open_browser", "off").unwrap();

        let web = root["web"].as_table().unwrap();
        assert_eq!(web["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let toml_str = r#"
[api]
timeout_ms = 10000
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        set_toml_value(&mut root, "api.timeout_ms", "2500").unwrap();

        let api = root["api"].as_table().unwrap();
        assert_eq!(api["timeout_ms"].as_integer(), Some(2500));
    }

    #[test]
    fn set_toml_value_rejects_bad_integer() {
        let toml_str = r#"
[api]
timeout_ms = 10000
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        assert!(set_toml_value(&mut root, "api.timeout_ms", "soon").is_err());
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let toml_str = r#"
[api]
timeout_ms = 10000
"#;
        let mut root: toml::Value = toml::from_str(toml_str).unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "api.retries", "3").is_err());
        assert!(set_toml_value(&mut root, "api", "x").is_err());
        assert!(set_toml_value(&mut root, "api..timeout_ms", "1").is_err());
    }

    fn write_layer(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("haven-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn project_layer_keeps_global_keys_it_does_not_set() {
        let global = write_layer(
            "global-keep.toml",
            r#"
[api]
base_url = "http://internal:8000"

[auth]
admin_password = "s3cret"
"#,
        );
        let project = write_layer(
            "project-keep.toml",
            r#"
[web]
addr = "127.0.0.1:9999"
"#,
        );

        let cfg = load_layers(&[Some(global), Some(project)]);
        assert_eq!(cfg.web.addr, "127.0.0.1:9999");
        assert_eq!(cfg.auth.admin_password, "s3cret");
        assert_eq!(cfg.api.base_url, "http://internal:8000");
        assert_eq!(cfg.api.timeout_ms, ApiConfig::default().timeout_ms);
        assert!(cfg.web.open_browser);
    }

    #[test]
    fn later_layer_wins_per_key() {
        let global = write_layer(
            "global-win.toml",
            r#"
[api]
base_url = "http://global:8000"
timeout_ms = 3000
"#,
        );
        let project = write_layer(
            "project-win.toml",
            r#"
[api]
timeout_ms = 500
"#,
        );

        let cfg = load_layers(&[Some(global), Some(project)]);
        assert_eq!(cfg.api.base_url, "http://global:8000");
        assert_eq!(cfg.api.timeout_ms, 500);
    }

    #[test]
    fn mistyped_layer_is_skipped() {
        let global = write_layer(
            "global-typed.toml",
            r#"
[auth]
admin_password = "s3cret"
"#,
        );
        let project = write_layer(
            "project-typed.toml",
            r#"
[api]
timeout_ms = "soon"
"#,
        );

        let cfg = load_layers(&[Some(global), Some(project), None]);
        assert_eq!(cfg.auth.admin_password, "s3cret");
        assert_eq!(cfg.api.timeout_ms, ApiConfig::default().timeout_ms);
    }

    #[test]
    fn no_layers_gives_defaults() {
        assert_eq!(load_layers(&[None, None]), HavenConfig::default());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: HavenConfig = toml::from_str(&toml_str).unwrap();
    }
}
