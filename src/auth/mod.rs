//! Login gate in front of the dashboard.
//!
//! The gate only decides whether to navigate to the dashboard; the actual
//! check is delegated to an [`Authenticator`]. The bundled
//! [`PasswordAuthenticator`] compares against a configured password and is
//! **not** a security boundary. The analytics derivation does not depend on
//! anything here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analytics::events::EventSink;
use crate::config::{AuthConfig, HavenConfig};

/// Route the gate navigates to on success.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

// ---------------------------------------------------------------------------
// Authenticator
// ---------------------------------------------------------------------------

/// Decides whether a submitted secret grants access.
pub trait Authenticator {
    fn verify(&self, password: &str) -> bool;
}

/// Exact string comparison against a configured password.
#[derive(Debug, Clone)]
pub struct PasswordAuthenticator {
    password: String,
}

impl PasswordAuthenticator {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.admin_password.clone())
    }
}

impl Authenticator for PasswordAuthenticator {
    fn verify(&self, password: &str) -> bool {
        !self.password.is_empty() && password == self.password
    }
}

// ---------------------------------------------------------------------------
// Notifications and sessions
// ---------------------------------------------------------------------------

/// Visual weight of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A transient toast shown after a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    fn welcome() -> Self {
        Self {
            title: "Welcome to Haven".to_string(),
            description: "You're now in a safe space.".to_string(),
            variant: NotificationVariant::Default,
        }
    }

    fn incorrect_password() -> Self {
        Self {
            title: "Incorrect password".to_string(),
            description: "Please try again.".to_string(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Proof of a granted login, handed to the web dashboard as an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    fn issue() -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            issued_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Result of submitting the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Navigate to [`DASHBOARD_ROUTE`].
    Granted {
        session: Session,
        notification: Notification,
    },
    /// Stay on the login form and show the notification.
    Denied { notification: Notification },
}

impl LoginOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    pub fn notification(&self) -> &Notification {
        match self {
            Self::Granted { notification, .. } | Self::Denied { notification } => notification,
        }
    }
}

/// The login form's submit handler.
#[derive(Debug, Clone)]
pub struct LoginGate<A: Authenticator> {
    authenticator: A,
    events: EventSink,
}

impl<A: Authenticator> LoginGate<A> {
    /// A gate that records nothing. Use [`LoginGate::with_events`] to log
    /// submissions.
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            events: EventSink::disabled(),
        }
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn submit(&self, password: &str) -> LoginOutcome {
        let granted = self.authenticator.verify(password);
        self.events.log_login(granted);

        if granted {
            LoginOutcome::Granted {
                session: Session::issue(),
                notification: Notification::welcome(),
            }
        } else {
            LoginOutcome::Denied {
                notification: Notification::incorrect_password(),
            }
        }
    }
}

impl LoginGate<PasswordAuthenticator> {
    /// Password from `[auth]`, event log from `[logging]`.
    pub fn from_config(config: &HavenConfig) -> Self {
        Self::new(PasswordAuthenticator::from_config(&config.auth))
            .with_events(EventSink::from_config(&config.logging))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_is_granted() {
        let gate = LoginGate::new(PasswordAuthenticator::new("haven2025"));
        let outcome = gate.submit("haven2025");
        assert!(outcome.is_granted());
        assert_eq!(outcome.notification().title, "Welcome to Haven");
        assert_eq!(outcome.notification().variant, NotificationVariant::Default);
    }

    #[test]
    fn wrong_password_is_denied_with_destructive_toast() {
        let gate = LoginGate::new(PasswordAuthenticator::new("haven2025"));
        let outcome = gate.submit("Haven2025");
        assert!(!outcome.is_granted());
        assert_eq!(outcome.notification().title, "Incorrect password");
        assert_eq!(
            outcome.notification().variant,
            NotificationVariant::Destructive
        );
    }

    #[test]
    fn empty_configured_password_never_matches() {
        let auth = PasswordAuthenticator::new("");
        assert!(!auth.verify(""));
    }

    #[test]
    fn gate_delegates_to_authenticator() {
        struct AllowAll;
        impl Authenticator for AllowAll {
            fn verify(&self, _password: &str) -> bool {
                true
            }
        }
        assert!(LoginGate::new(AllowAll).submit("anything").is_granted());
    }

    #[test]
    fn sessions_get_distinct_uuid_tokens() {
        let a = Session::issue();
        let b = Session::issue();
        assert_ne!(a.token, b.token);
        let parsed = Uuid::parse_str(&a.token).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn submissions_are_logged_without_the_password() {
        let path = std::env::temp_dir()
            .join(format!("haven-auth-{}", std::process::id()))
            .join("login.jsonl");
        let _ = std::fs::remove_file(&path);
        let sink = EventSink::to_path(&path);

        let gate =
            LoginGate::new(PasswordAuthenticator::new("haven2025")).with_events(sink.clone());
        gate.submit("wrong-guess");
        gate.submit("haven2025");

        let logged = sink.read_all();
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0].outcome, crate::analytics::events::Outcome::Failure);
        assert_eq!(logged[1].outcome, crate::analytics::events::Outcome::Success);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("wrong-guess"));
        assert!(!raw.contains("haven2025"));
    }
}
