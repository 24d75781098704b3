/// Configuration loading tests.
///
/// Cover the full `load()` path: the global file under `$HOME`, the
/// key-by-key layer merge, and the `HAVEN_*` environment overrides.
///
/// # Safety
///
/// These tests use `std::env::set_var` / `remove_var`, which are `unsafe` in
/// Rust 2024 edition. Every env-mutating assertion lives in a single
/// `#[test]` so nothing else in this binary reads the variables while they
/// change.
use std::fs;
use std::path::PathBuf;

use haven::config::{self, ApiConfig, AuthConfig};

const HAVEN_VARS: [&str; 5] = [
    "HAVEN_API_URL",
    "HAVEN_API_TIMEOUT_MS",
    "HAVEN_ADMIN_PASSWORD",
    "HAVEN_WEB_ADDR",
    "HAVEN_LOGGING",
];

/// Helper: set an env var (wraps the `unsafe` call).
///
/// # Safety
/// Must only be called from single-threaded test contexts.
unsafe fn set_env(key: &str, val: &str) {
    unsafe { std::env::set_var(key, val) }
}

/// Helper: remove an env var (wraps the `unsafe` call).
///
/// # Safety
/// Must only be called from single-threaded test contexts.
unsafe fn remove_env(key: &str) {
    unsafe { std::env::remove_var(key) }
}

fn temp_home() -> PathBuf {
    let home = std::env::temp_dir().join(format!("haven-home-{}", std::process::id()));
    fs::create_dir_all(home.join(".haven")).unwrap();
    fs::write(
        home.join(".haven").join("config.toml"),
        r#"
[api]
base_url = "http://internal:8000"

[auth]
admin_password = "s3cret"
"#,
    )
    .unwrap();
    home
}

// ---------------------------------------------------------------------------
// Layering without env
// ---------------------------------------------------------------------------

#[test]
fn project_web_section_does_not_reset_global_auth() {
    let dir = std::env::temp_dir().join(format!("haven-layers-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let global = dir.join("config.toml");
    let project = dir.join(".haven.toml");
    fs::write(
        &global,
        "[auth]\nadmin_password = \"s3cret\"\n\n[api]\nbase_url = \"http://internal:8000\"\n",
    )
    .unwrap();
    fs::write(&project, "[web]\naddr = \"127.0.0.1:9999\"\n").unwrap();

    let cfg = config::load_layers(&[Some(global), Some(project)]);
    assert_eq!(cfg.web.addr, "127.0.0.1:9999");
    assert_eq!(cfg.auth.admin_password, "s3cret");
    assert_eq!(cfg.api.base_url, "http://internal:8000");
}

// ---------------------------------------------------------------------------
// load() with env overrides
//
// Combined into one #[test] because they mutate process-wide variables.
// ---------------------------------------------------------------------------

#[test]
fn load_applies_global_file_then_env_overrides() {
    let previous_home = std::env::var_os("HOME");
    let home = temp_home();
    unsafe { set_env("HOME", home.to_str().unwrap()) };
    for var in HAVEN_VARS {
        unsafe { remove_env(var) };
    }

    // --- global file under $HOME is honored ---
    let cfg = config::load();
    assert_eq!(cfg.auth.admin_password, "s3cret");
    assert_eq!(cfg.api.base_url, "http://internal:8000");
    assert_eq!(cfg.api.timeout_ms, ApiConfig::default().timeout_ms);
    assert!(cfg.logging.enabled);

    // --- env beats the file ---
    unsafe { set_env("HAVEN_API_URL", "http://127.0.0.1:8000") };
    unsafe { set_env("HAVEN_API_TIMEOUT_MS", "2500") };
    unsafe { set_env("HAVEN_ADMIN_PASSWORD", "from-env") };
    unsafe { set_env("HAVEN_WEB_ADDR", "0.0.0.0:8080") };
    unsafe { set_env("HAVEN_LOGGING", "0") };
    let cfg = config::load();
    assert_eq!(cfg.api.base_url, "http://127.0.0.1:8000");
    assert_eq!(cfg.api.timeout_ms, 2500);
    assert_eq!(cfg.auth.admin_password, "from-env");
    assert_eq!(cfg.web.addr, "0.0.0.0:8080");
    assert!(!cfg.logging.enabled, "HAVEN_LOGGING=0 should disable logging");

    // --- unparseable or empty values leave the layered value alone ---
    unsafe { set_env("HAVEN_API_TIMEOUT_MS", "soon") };
    unsafe { set_env("HAVEN_ADMIN_PASSWORD", "") };
    unsafe { set_env("HAVEN_LOGGING", "yes") };
    let cfg = config::load();
    assert_eq!(cfg.api.timeout_ms, ApiConfig::default().timeout_ms);
    assert_eq!(cfg.auth.admin_password, "s3cret");
    assert!(cfg.logging.enabled);

    // --- without a global file the defaults come back ---
    for var in HAVEN_VARS {
        unsafe { remove_env(var) };
    }
    fs::remove_file(home.join(".haven").join("config.toml")).unwrap();
    let cfg = config::load();
    assert_eq!(cfg.auth.admin_password, AuthConfig::default().admin_password);

    match previous_home {
        Some(prev) => unsafe { set_env("HOME", prev.to_str().unwrap()) },
        None => unsafe { remove_env("HOME") },
    }
}
