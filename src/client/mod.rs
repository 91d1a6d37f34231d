//! REST client for the Iamus backend.
//!
//! Every call takes the [`Session`] it acts for: the session supplies the base
//! URL and the bearer credential. The client itself is stateless and never
//! writes to the session; callers store results (a login token, a fetched
//! list) themselves. Nothing is retried.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use crate::config::Config;
use crate::errors::ConsoleError;
use crate::models::auth::LoginResponse;
use crate::models::stats::{StatsOs, OS_STATS_PATH};
use crate::models::{AuthTokenInfo, Entity};
use crate::session::Session;

pub mod envelope;

use envelope::{acknowledge, Envelope};

pub const API_ACCOUNT_LOGIN: &str = "/oauth/token";
pub const API_ACCOUNT_CREATE: &str = "/api/v1/users";
pub const API_GET_TOKEN: &str = "/api/v1/token/new";
pub const API_MAINT_RAW: &str = "/api/maint/raw";

/// Header that makes the backend take its error path, for exercising error handling.
pub const ERROR_HANDLE_HEADER: &str = "x-vircadia-error-handle";
pub const ERROR_HANDLE_VALUE: &str = "badrequest";

pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    pub fn new(cfg: &Config) -> Result<Self, ConsoleError> {
        Self::with_timeout(Duration::from_secs(cfg.request_timeout_secs))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ConsoleError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("iamus-console/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Attach the session credential. Before any login the request still goes
    /// out, just without an `Authorization` header.
    fn authorized(&self, req: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.authorization() {
            Some(auth) => req.header(reqwest::header::AUTHORIZATION, auth),
            None => {
                tracing::debug!(session = %session.id, "no session token; sending request without Authorization");
                req
            }
        }
    }

    /// Password login. The caller stores the returned token in the session.
    pub async fn login(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> Result<AuthTokenInfo, ConsoleError> {
        let body = form_encode(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", "owner"),
        ]);

        tracing::debug!(username, "starting fetch of user access token");
        let resp = self
            .http
            .post(session.url_for(API_ACCOUNT_LOGIN))
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            tracing::warn!(username, status = %resp.status(), "login rejected by server");
            return Err(ConsoleError::Authentication("login failed".into()));
        }

        let text = resp.text().await?;
        let parsed: LoginResponse = serde_json::from_str(&text)
            .map_err(|e| ConsoleError::Authentication(format!("malformed login response: {}", e)))?;

        if let Some(err) = parsed.error_message() {
            return Err(ConsoleError::Authentication(err));
        }

        tracing::info!(username, "fetched user access token");
        Ok(parsed.into_token_info())
    }

    /// GET `path` and return the envelope's `data`.
    pub async fn fetch_data(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, ConsoleError> {
        let mut req = self.http.get(session.url_for(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        let resp = self.authorized(req, session).send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ConsoleError::Network(format!(
                "Failure fetching {}: response code={}",
                path,
                status.as_u16()
            )));
        }

        let env = Envelope::parse(resp.text().await?)
            .map_err(|e| ConsoleError::Parse(format!("invalid JSON from {}: {}", path, e)))?;
        if env.is_failure() {
            return Err(ConsoleError::Server(env.raw));
        }

        Ok(env.data().cloned().unwrap_or(Value::Null))
    }

    /// GET a list endpoint and return `data[field_name]` (or `data`) as records.
    pub async fn fetch_entity_list(
        &self,
        session: &Session,
        path: &str,
        field_name: Option<&str>,
        as_admin: bool,
    ) -> Result<Vec<Entity>, ConsoleError> {
        let query: &[(&str, &str)] = if as_admin { &[("asAdmin", "true")] } else { &[] };
        let data = self.fetch_data(session, path, query).await?;

        let selected = match field_name {
            Some(field) => data.get(field).cloned().unwrap_or(Value::Null),
            None => data,
        };
        let records = into_records(selected);
        tracing::debug!(path, count = records.len(), "fetched entity list");
        Ok(records)
    }

    /// DELETE `path`; succeeds only when the backend answers with a success envelope.
    pub async fn delete_entity(&self, session: &Session, path: &str) -> Result<(), ConsoleError> {
        let resp = self
            .authorized(self.http.delete(session.url_for(path)), session)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        acknowledge(text, "Deletion failed").map_err(|msg| {
            tracing::warn!(path, status = %status, "delete not acknowledged");
            ConsoleError::Deletion(msg)
        })?;
        tracing::info!(path, "successful delete");
        Ok(())
    }

    /// Authenticated GET returning the whole parsed body.
    pub async fn raw_get(
        &self,
        session: &Session,
        path: &str,
        inject_error_header: bool,
    ) -> Result<Value, ConsoleError> {
        let req = with_error_header(self.http.get(session.url_for(path)), inject_error_header);
        let resp = self.authorized(req, session).send().await?;
        read_raw_response(resp, path).await
    }

    /// Authenticated POST of caller-supplied JSON text. The text is validated
    /// before anything is sent.
    pub async fn raw_post(
        &self,
        session: &Session,
        path: &str,
        json_body: &str,
        inject_error_header: bool,
    ) -> Result<Value, ConsoleError> {
        let payload: Value = serde_json::from_str(json_body)
            .map_err(|e| ConsoleError::Parse(format!("request body is not valid JSON: {}", e)))?;

        let req = with_error_header(self.http.post(session.url_for(path)), inject_error_header)
            .json(&payload);
        let resp = self.authorized(req, session).send().await?;
        read_raw_response(resp, path).await
    }

    /// Create a user account. Needs no credential.
    pub async fn create_account(
        &self,
        session: &Session,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), ConsoleError> {
        let body = json!({
            "user": {
                "username": username,
                "password": password,
                "email": email,
            }
        });

        tracing::debug!(username, "starting account creation request");
        let resp = self
            .http
            .post(session.url_for(API_ACCOUNT_CREATE))
            .json(&body)
            .send()
            .await?;
        let text = resp.text().await?;

        acknowledge(text, "Account creation failed").map_err(ConsoleError::Server)?;
        tracing::info!(username, "successful account creation");
        Ok(())
    }

    /// Mint a domain token using the given account credential (not the
    /// session's own token).
    pub async fn domain_token(
        &self,
        session: &Session,
        account: &AuthTokenInfo,
    ) -> Result<String, ConsoleError> {
        let resp = self
            .http
            .get(session.url_for(API_GET_TOKEN))
            .query(&[("scope", "domain")])
            .header(reqwest::header::AUTHORIZATION, account.authorization())
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(ConsoleError::Network("Domain token fetch failed".into()));
        }

        let text = resp.text().await?;
        let env = Envelope::parse(text.clone())
            .map_err(|_| ConsoleError::Server(format!("Fetch of domain token failed: {}", text)))?;

        let token = env
            .is_success()
            .then(|| env.data().and_then(|d| d.get("domain_token")).and_then(Value::as_str))
            .flatten()
            .ok_or_else(|| ConsoleError::Server(format!("Fetch of domain token failed: {}", env.compact())))?;

        tracing::info!("successful fetch of domain token");
        Ok(token.to_string())
    }

    /// Operating-system statistics.
    pub async fn os_stats(&self, session: &Session) -> Result<StatsOs, ConsoleError> {
        let data = self.fetch_data(session, OS_STATS_PATH, &[]).await?;
        let os = data
            .get("os")
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| ConsoleError::Server("stats response has no 'os' section".into()))?;
        serde_json::from_value(os).map_err(|e| ConsoleError::Parse(format!("malformed os stats: {}", e)))
    }
}

fn with_error_header(req: RequestBuilder, inject: bool) -> RequestBuilder {
    if inject {
        req.header(ERROR_HANDLE_HEADER, ERROR_HANDLE_VALUE)
    } else {
        req
    }
}

async fn read_raw_response(resp: reqwest::Response, path: &str) -> Result<Value, ConsoleError> {
    let status = resp.status();
    let text = resp.text().await?;

    if status != StatusCode::OK {
        tracing::debug!(path, status = %status, body = %truncate(&text, 200), "raw request failed");
        return Err(ConsoleError::Network(format!(
            "Request failed: response code={}",
            status.as_u16()
        )));
    }

    serde_json::from_str(&text)
        .map_err(|e| ConsoleError::Parse(format!("invalid JSON from {}: {}", path, e)))
}

/// `application/x-www-form-urlencoded` body with spaces written as `+`.
pub fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
        .replace("%20", "+")
}

/// Normalize a list payload: nothing gives no records, an array gives its
/// items, anything else is a single record.
pub fn into_records(data: Value) -> Vec<Entity> {
    match data {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(Entity::from).collect(),
        other => vec![Entity::from(other)],
    }
}

/// Build a backend path from a fixed prefix and operator-supplied segments,
/// percent-encoding each segment.
pub fn join_path(prefix: &str, segments: &[&str]) -> String {
    let mut path = prefix.trim_end_matches('/').to_string();
    for seg in segments {
        path.push('/');
        path.push_str(&urlencoding::encode(seg.trim()));
    }
    path
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_encode_uses_plus_for_space() {
        let body = form_encode(&[("username", "joe user"), ("password", "p&ss=1")]);
        assert_eq!(body, "username=joe+user&password=p%26ss%3D1");
    }

    #[test]
    fn test_into_records_shapes() {
        assert!(into_records(Value::Null).is_empty());
        assert_eq!(into_records(json!([{"a": 1}, {"a": 2}])).len(), 2);
        assert_eq!(into_records(json!({"a": 1})).len(), 1);
    }

    #[test]
    fn test_join_path_encodes_segments() {
        assert_eq!(join_path("/api/v1/domains", &["abc-123"]), "/api/v1/domains/abc-123");
        assert_eq!(
            join_path(API_MAINT_RAW, &["accounts", "username", "joe user"]),
            "/api/maint/raw/accounts/username/joe%20user"
        );
        assert_eq!(join_path("/api/v1/places", &["a/b"]), "/api/v1/places/a%2Fb");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(&Config::default());
        assert!(client.is_ok());
    }
}
