//! Console operations dispatched through the registry against a fake backend.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use iamus_console::client::ApiClient;
use iamus_console::errors::ConsoleError;
use iamus_console::ops::{ids, OpInput, OpRegistry};
use iamus_console::session::Session;
use iamus_console::view::text;

struct Harness {
    server: MockServer,
    client: ApiClient,
    registry: OpRegistry,
    session: Session,
}

impl Harness {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let session = Session::new(server.uri(), 20);
        Self {
            server,
            client: ApiClient::with_timeout(Duration::from_secs(5)).unwrap(),
            registry: OpRegistry::standard(),
            session,
        }
    }

    async fn run(&mut self, op: &str, input: OpInput) -> Result<(), ConsoleError> {
        self.registry
            .dispatch(op, &self.client, &mut self.session, &input)
            .await
    }

    fn last_error(&self) -> Option<String> {
        self.session
            .log
            .lines()
            .rev()
            .find(|l| l.is_error)
            .map(|l| l.message.clone())
    }
}

fn login_body(token: &str, account: &str) -> serde_json::Value {
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "scope": "owner",
        "refresh_token": "r",
        "account_id": account
    })
}

fn credentials(user: &str, pass: &str) -> OpInput {
    OpInput::new().with("username", user).with("password", pass)
}

#[tokio::test]
async fn test_login_op_stores_token_and_view() {
    let mut h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("tok-1", "acct-1")))
        .mount(&h.server)
        .await;

    h.run(ids::LOGIN, credentials("adm", "secret")).await.unwrap();

    assert!(h.session.is_logged_in());
    assert_eq!(h.session.login_user(), Some("adm"));
    assert_eq!(h.session.authorization().as_deref(), Some("Bearer tok-1"));
    let view = h.session.view.as_ref().unwrap();
    assert_eq!(view.class.as_deref(), Some("v-login-table"));
    assert!(text::render(view).contains("acct-1"));
    assert!(h.session.log.lines().any(|l| l.message == "Login successful for adm"));
}

#[tokio::test]
async fn test_failed_login_keeps_previous_token() {
    let mut h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&h.server)
        .await;

    h.session.store_login(
        "old",
        iamus_console::models::AuthTokenInfo {
            token: "tok-old".into(),
            token_type: "Bearer".into(),
            scope: "owner".into(),
            refresh_token: String::new(),
            account_id: "a0".into(),
        },
    );

    let err = h.run(ids::LOGIN, credentials("adm", "wrong")).await.unwrap_err();
    assert!(err.to_string().contains("invalid_grant"));
    assert_eq!(h.session.authorization().as_deref(), Some("Bearer tok-old"));
    assert_eq!(h.last_error().unwrap(), "Failed login: invalid_grant");
}

#[tokio::test]
async fn test_login_validation_sends_nothing() {
    let mut h = Harness::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h.run(ids::LOGIN, credentials("adm", "x")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidInput(_)));
}

#[tokio::test]
async fn test_domain_token_leaves_session_login_alone() {
    let mut h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("tok-dom", "acct-d")))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/token/new"))
        .and(header("authorization", "Bearer tok-dom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"domain_token": "dt-1"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.run(ids::DOMAIN_TOKEN, credentials("domuser", "secret")).await.unwrap();

    assert_eq!(h.session.domain_token(), Some("dt-1"));
    assert!(!h.session.is_logged_in());
}

#[tokio::test]
async fn test_create_account_then_login() {
    let mut h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("tok-new", "acct-new")))
        .expect(1)
        .mount(&h.server)
        .await;

    let input = credentials("newbie", "secret").with("email", "n@example.org");
    h.run(ids::CREATE_ACCOUNT, input).await.unwrap();

    assert_eq!(h.session.login_user(), Some("newbie"));
    assert_eq!(h.session.token().unwrap().account_id, "acct-new");
}

#[tokio::test]
async fn test_delete_token_path_and_view() {
    let mut h = Harness::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/account/a1/tokens/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let input = OpInput::new().with("account-id", "a1").with("token-id", "t1");
    h.run(ids::DELETE_TOKEN, input).await.unwrap();

    let view = h.session.view.as_ref().unwrap();
    assert_eq!(view.text_content(), "Deleted token t1 of account a1");
}

#[tokio::test]
async fn test_list_failure_is_logged_with_context() {
    let mut h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&h.server)
        .await;

    assert!(h.run(ids::LIST_USERS, OpInput::new()).await.is_err());
    assert_eq!(
        h.last_error().unwrap(),
        "Could not fetch users: Failure fetching /api/v1/users: response code=403"
    );
    assert!(h.session.view.is_none());
}

#[tokio::test]
async fn test_raw_maint_encodes_segments() {
    let mut h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/api/maint/raw/accounts/username/a%20b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"username": "a b"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let input = OpInput::new()
        .with("collection", "accounts")
        .with("field", "username")
        .with("value", "a b");
    h.run(ids::RAW_MAINT, input).await.unwrap();

    let view = h.session.view.as_ref().unwrap();
    assert_eq!(view.tag, "pre");
    assert!(view.text_content().contains("\"username\": \"a b\""));
}

#[tokio::test]
async fn test_os_stats_requires_login() {
    let mut h = Harness::start().await;
    let err = h.run(ids::OS_STATS, OpInput::new()).await.unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidInput(_)));
    assert_eq!(h.last_error().unwrap(), "UpdateOSStats: login required to fetch stats");
}
