//! Per-operator console state.
//!
//! A [`Session`] carries everything the REST client and the views need: the
//! backend base URL, the bearer token from the last successful login, the most
//! recently fetched lists, and the rolling console log. The web console keeps
//! one session per browser cookie in a [`SessionStore`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::config::{normalize_server_url, Config};
use crate::errors::ConsoleError;
use crate::models::{AuthTokenInfo, Entity, EntityKind};
use crate::view::element::Element;

pub mod log;

pub use log::{ConsoleLog, LogLine};

#[derive(Debug)]
pub struct Session {
    pub id: String,
    server_url: String,
    login_user: Option<String>,
    token: Option<AuthTokenInfo>,
    domain_token: Option<String>,
    lists: HashMap<EntityKind, Vec<Entity>>,
    /// Whatever the last operation wants shown in the display area.
    pub view: Option<Element>,
    pub log: ConsoleLog,
}

impl Session {
    pub fn new(server_url: impl Into<String>, log_lines: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            server_url: normalize_base(&server_url.into()),
            login_user: None,
            token: None,
            domain_token: None,
            lists: HashMap::new(),
            view: None,
            log: ConsoleLog::new(log_lines),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.server_url.clone(), cfg.log_lines)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Point the session at another backend. The URL must parse and use http(s).
    pub fn set_server_url(&mut self, raw: &str) -> Result<(), ConsoleError> {
        self.server_url = normalize_server_url(raw)?;
        Ok(())
    }

    /// Absolute URL for a backend path such as `/api/v1/domains`.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.server_url, path)
        } else {
            format!("{}/{}", self.server_url, path)
        }
    }

    /// Replace the live credential. Only called after a successful login.
    pub fn store_login(&mut self, username: &str, info: AuthTokenInfo) {
        self.login_user = Some(username.to_string());
        self.token = Some(info);
    }

    pub fn token(&self) -> Option<&AuthTokenInfo> {
        self.token.as_ref()
    }

    pub fn login_user(&self) -> Option<&str> {
        self.login_user.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.token.is_empty())
    }

    /// `Authorization` header value, or `None` before any login.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(AuthTokenInfo::authorization)
    }

    pub fn store_domain_token(&mut self, token: String) {
        self.domain_token = Some(token);
    }

    pub fn domain_token(&self) -> Option<&str> {
        self.domain_token.as_deref()
    }

    /// Replace the stored list for `kind` wholesale.
    pub fn store_list(&mut self, kind: EntityKind, records: Vec<Entity>) {
        self.lists.insert(kind, records);
    }

    pub fn list(&self, kind: EntityKind) -> &[Entity] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub type SharedSession = Arc<Mutex<Session>>;

struct StoreEntry {
    session: SharedSession,
    last_used: Instant,
}

/// Sessions of all operators using the web console, keyed by cookie value.
/// Sessions idle for longer than the configured TTL are dropped.
pub struct SessionStore {
    sessions: DashMap<String, StoreEntry>,
    server_url: String,
    log_lines: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(cfg: &Config) -> Self {
        Self {
            sessions: DashMap::new(),
            server_url: cfg.server_url.clone(),
            log_lines: cfg.log_lines,
            idle_ttl: Duration::from_secs(cfg.session_idle_secs),
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Look up the session for `id`, creating a fresh one when the id is
    /// absent, unknown or idle past the TTL. Returns the session id and
    /// whether it was created.
    pub fn get_or_create(&self, id: Option<&str>) -> (String, SharedSession, bool) {
        self.get_or_create_at(id, Instant::now())
    }

    fn get_or_create_at(&self, id: Option<&str>, now: Instant) -> (String, SharedSession, bool) {
        if let Some(id) = id {
            if let Some(mut entry) = self.sessions.get_mut(id) {
                if now.saturating_duration_since(entry.last_used) < self.idle_ttl {
                    entry.last_used = now;
                    return (id.to_string(), entry.session.clone(), false);
                }
            }
            // Expired: drop it so the new session does not inherit anything.
            if self.sessions.remove(id).is_some() {
                tracing::debug!(session = %id, "expired console session replaced");
            }
        }

        let session = Session::new(self.server_url.clone(), self.log_lines);
        let id = session.id.clone();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(
            id.clone(),
            StoreEntry {
                session: shared.clone(),
                last_used: now,
            },
        );
        tracing::info!(session = %id, "new console session");
        (id, shared, true)
    }

    /// Remove every session idle for at least the TTL. Returns how many went.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.saturating_duration_since(entry.last_used) < self.idle_ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
