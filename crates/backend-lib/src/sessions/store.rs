// ============================
// crates/backend-lib/src/sessions/store.rs
// ============================
//! Cookie-keyed, time-bounded session registry.
use super::Session;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED};
use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{Cookie, SameSite};
use gatehouse_common::{generate_secure_token, Clock, SystemClock};
use metrics::{counter, gauge};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default cookie carrying the session token
pub const DEFAULT_COOKIE_NAME: &str = "SESSIONID";

/// Default fixed session lifetime (5 minutes)
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Result of resolving a request to a session
#[derive(Debug, Clone)]
pub struct SessionLookup {
    /// The live session
    pub session: Arc<Session>,
    /// Cookie the caller must send back when a new session was issued
    pub set_cookie: Option<Cookie<'static>>,
}

impl SessionLookup {
    /// Whether this lookup created the session
    pub fn is_new(&self) -> bool {
        self.set_cookie.is_some()
    }

    /// Append the `Set-Cookie` instruction, if any, to response headers
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        let Some(cookie) = &self.set_cookie else {
            return;
        };
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            },
            Err(err) => warn!("session cookie is not a valid header value: {err}"),
        }
    }
}

/// Session registry. Every registry operation runs under a single mutex, so
/// the presence check and insertion in `get_or_create` are atomic with respect
/// to sweeps and other lookups.
#[derive(Debug)]
pub struct SessionStore {
    cookie_name: String,
    timeout: Duration,
    sessions: Mutex<HashMap<String, Arc<Session>>>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Create a store driven by the system clock
    pub fn new(cookie_name: impl Into<String>, timeout: Duration) -> Self {
        Self::with_clock(cookie_name, timeout, Arc::new(SystemClock))
    }

    /// Create a store driven by the given clock
    pub fn with_clock(
        cookie_name: impl Into<String>,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            timeout,
            sessions: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /** Resolve the session named by `cookie_value`, creating one if the value
    is absent or unknown. Lookups never evict: a session past its timeout is
    still returned until the next `collect_garbage`. */
    pub fn get_or_create(&self, cookie_value: Option<&str>) -> SessionLookup {
        let mut sessions = self.sessions.lock();

        if let Some(session) = cookie_value.and_then(|id| sessions.get(id)) {
            return SessionLookup {
                session: Arc::clone(session),
                set_cookie: None,
            };
        }

        let mut id = generate_secure_token();
        while sessions.contains_key(&id) {
            id = generate_secure_token();
        }

        let session = Arc::new(Session::new(id.clone(), self.clock.now()));
        sessions.insert(id.clone(), Arc::clone(&session));

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        debug!(active = sessions.len(), "created session");

        SessionLookup {
            session,
            set_cookie: Some(self.session_cookie(id)),
        }
    }

    /// Resolve the session named by this store's cookie in request headers
    pub fn get_or_create_from_headers(&self, headers: &HeaderMap) -> SessionLookup {
        let cookie_value = self.cookie_value(headers);
        self.get_or_create(cookie_value.as_deref())
    }

    /// Value of this store's cookie in the request's `Cookie` headers
    pub fn cookie_value(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .flatten()
            .find(|cookie| cookie.name() == self.cookie_name)
            .map(|cookie| cookie.value().to_string())
    }

    /// Look up a session without creating one
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.lock().get(id).cloned()
    }

    /// Drop a session immediately (logout). Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let mut sessions = self.sessions.lock();
        let removed = sessions.remove(id).is_some();
        if removed {
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Remove every session older than the timeout. Returns how many were removed.
    pub fn collect_garbage(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();

        sessions.retain(|_, session| {
            now.saturating_duration_since(session.created_at()) <= self.timeout
        });

        let removed = before - sessions.len();
        debug!(removed, active = sessions.len(), "collected expired sessions");
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
        }
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        removed
    }

    /// Spawn a task that calls `collect_garbage` every `period`
    pub fn spawn_collector(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                self.collect_garbage();
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    fn session_cookie(&self, id: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), id))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .build()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_NAME, DEFAULT_SESSION_TIMEOUT)
    }
}
