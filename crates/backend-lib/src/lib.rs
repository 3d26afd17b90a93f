// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core of the `Gatehouse` server: htpasswd credential verification, the
//! cookie session store, and the axum layer that composes them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod htpasswd;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod sessions;

use crate::config::Settings;
use crate::error::AppError;
use crate::htpasswd::{HashScheme, Htpasswd};
use crate::metrics::{AUTH_FAILED, AUTH_SUCCEEDED};
use crate::sessions::SessionStore;
use ::metrics::counter;
use std::sync::Arc;
use tracing::{info, warn};

/// Identity attached to a request once it passed an authentication gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential table
    pub htpasswd: Arc<Htpasswd>,
    /// Session store
    pub sessions: Arc<SessionStore>,
    /// Configuration settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state
    pub fn new(htpasswd: Htpasswd, settings: Settings) -> Self {
        let sessions = SessionStore::new(
            settings.session.cookie_name.clone(),
            settings.session.timeout(),
        );
        Self::with_sessions(htpasswd, sessions, settings)
    }

    /// Create a new application state around an existing session store
    pub fn with_sessions(htpasswd: Htpasswd, sessions: SessionStore, settings: Settings) -> Self {
        Self {
            htpasswd: Arc::new(htpasswd),
            sessions: Arc::new(sessions),
            settings: Arc::new(settings),
        }
    }

    /// Load the credential file named in the settings. Failure is fatal to startup.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let htpasswd = Htpasswd::from_file(&settings.htpasswd_path).map_err(|e| {
            anyhow::anyhow!(
                "cannot load credentials from {}: {e}",
                settings.htpasswd_path.display()
            )
        })?;
        info!(
            users = htpasswd.len(),
            path = %settings.htpasswd_path.display(),
            "loaded credentials"
        );
        Ok(Self::new(htpasswd, settings))
    }

    /// Verify credentials off the async runtime; bcrypt is deliberately slow
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<(), AppError> {
        let htpasswd = Arc::clone(&self.htpasswd);
        let (user, pass) = (username.to_string(), password.to_string());
        let result = tokio::task::spawn_blocking(move || htpasswd.verify(&user, &pass)).await?;

        match result {
            Ok(()) => {
                counter!(AUTH_SUCCEEDED).increment(1);
                Ok(())
            },
            Err(err) => {
                counter!(AUTH_FAILED).increment(1);
                let scheme = self
                    .htpasswd
                    .scheme(username)
                    .map_or("none", HashScheme::name);
                warn!(username, scheme, "authentication failed: {err}");
                Err(AppError::AccessDenied(err))
            },
        }
    }
}
