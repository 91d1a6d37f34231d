//! Web console: one page per operator session, operations posted as forms.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};

use crate::client::ApiClient;
use crate::config::Config;
use crate::errors::ConsoleError;
use crate::ops::{OpInput, OpRegistry};
use crate::session::SessionStore;
use crate::view::page;
use crate::view::stats::os_stats_table;

pub mod middleware;

pub const SESSION_COOKIE: &str = "iamus_console_session";

/// Seconds between reloads of the statistics page.
pub const STATS_REFRESH_SECS: u64 = 5;

/// Seconds between sweeps for idle console sessions.
pub const SESSION_SWEEP_SECS: u64 = 60;

/// Shared application state passed to handlers.
pub struct AppState {
    pub client: ApiClient,
    pub sessions: SessionStore,
    pub registry: OpRegistry,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ConsoleError> {
        Ok(Self {
            client: ApiClient::new(&config)?,
            sessions: SessionStore::new(&config),
            registry: OpRegistry::standard(),
            config,
        })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/op", post(run_op))
        .route("/stats", get(stats))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(axum::middleware::from_fn(middleware::security_headers_middleware))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    tracing::info!(backend = %config.server_url, "default Iamus server");
    let state = Arc::new(AppState::new(config)?);
    spawn_session_reaper(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Iamus console listening on {}", addr);
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Periodically drop console sessions nobody has used for a while.
pub fn spawn_session_reaper(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SESSION_SWEEP_SECS));
        loop {
            interval.tick().await;
            let evicted = state.sessions.evict_idle();
            if evicted > 0 {
                tracing::info!(evicted, remaining = state.sessions.len(), "evicted idle console sessions");
            }
        }
    });
}

async fn healthz() -> &'static str {
    "ok"
}

/// Session id from the request's cookies, if any.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn with_session_cookie(mut resp: Response, id: &str, created: bool) -> Response {
    if created {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Strict", SESSION_COOKIE, id);
        if let Ok(val) = HeaderValue::from_str(&cookie) {
            resp.headers_mut().insert(header::SET_COOKIE, val);
        }
    }
    resp
}

async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let cookie = session_cookie(&headers);
    let (id, session, created) = state.sessions.get_or_create(cookie.as_deref());

    let html = {
        let session = session.lock().await;
        page::console_page(&session, &state.registry)
    };
    with_session_cookie(Html(html).into_response(), &id, created)
}

async fn run_op(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let Some(op) = fields.get("op").map(|s| s.trim().to_string()) else {
        return ConsoleError::InvalidInput("form has no 'op' field".into()).into_response();
    };

    let cookie = session_cookie(&headers);
    let (id, session, created) = state.sessions.get_or_create(cookie.as_deref());
    let input = OpInput::from(fields);

    {
        let mut session = session.lock().await;
        // Failures are already in the session log; the page shows them.
        if let Err(e) = state
            .registry
            .dispatch(&op, &state.client, &mut session, &input)
            .await
        {
            tracing::warn!(op = %op, session = %id, kind = e.kind(), error = %e, "operation failed");
        }
    }

    with_session_cookie(Redirect::to("/").into_response(), &id, created)
}

async fn stats(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let cookie = session_cookie(&headers);
    let (id, session, created) = state.sessions.get_or_create(cookie.as_deref());

    let html = {
        let mut session = session.lock().await;
        let table = if session.is_logged_in() {
            match state.client.os_stats(&session).await {
                Ok(s) => Some(os_stats_table(&s)),
                Err(e) => {
                    session.log.error(format!("UpdateOSStats: exception: {}", e));
                    None
                }
            }
        } else {
            None
        };
        page::stats_page(&session, table, STATS_REFRESH_SECS)
    };
    with_session_cookie(Html(html).into_response(), &id, created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; iamus_console_session=abc-123; lang=en"),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_session_cookie_absent() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("iamus_console=x"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn test_cookie_only_set_for_new_sessions() {
        let resp = with_session_cookie("x".into_response(), "id1", true);
        let set = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set.starts_with("iamus_console_session=id1;"));

        let resp = with_session_cookie("x".into_response(), "id1", false);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }
}
