use async_trait::async_trait;

use crate::client::ApiClient;
use crate::errors::ConsoleError;
use crate::models::AuthTokenInfo;
use crate::session::Session;
use crate::view::element::{make_data, make_row, make_table, Element};

use super::{OpInput, Operation};

const CREDENTIALS_REQUIRED: &str = "You must specify a value for both username and password";
const ACCOUNT_FIELDS_REQUIRED: &str = "You must specify a value for all three account fields";

fn require_credentials(input: &OpInput) -> Result<(&str, &str), ConsoleError> {
    let username = input.get("username");
    let password = input.get("password");
    if username.chars().count() < 1 || password.chars().count() < 2 {
        return Err(ConsoleError::InvalidInput(CREDENTIALS_REQUIRED.into()));
    }
    Ok((username, password))
}

/// Summary of the logged-in operator shown after a login.
pub fn login_summary(username: &str, info: &AuthTokenInfo) -> Element {
    make_table(
        vec![
            make_row(vec![make_data("username", ""), make_data(username, "v-loggedin-username")], ""),
            make_row(vec![make_data("accountId", ""), make_data(info.account_id.as_str(), "v-loggedin-accountid")], ""),
            make_row(vec![make_data("token", ""), make_data(info.token.as_str(), "v-loggedin-authtoken")], ""),
            make_row(vec![make_data("scope", ""), make_data(info.scope.as_str(), "")], ""),
        ],
        "v-login-table",
    )
}

fn complete_login(session: &mut Session, username: &str, info: AuthTokenInfo) {
    session.log.debug(format!("Login successful for {}", username));
    session.view = Some(login_summary(username, &info));
    session.store_login(username, info);
}

pub struct SetServer;

#[async_trait]
impl Operation for SetServer {
    fn failure_context(&self) -> String {
        "Could not set server URL".into()
    }

    async fn run(&self, _client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        session.set_server_url(input.get("server-url"))?;
        session.log.debug(format!("Server set to {}", session.server_url()));
        Ok(())
    }
}

pub struct Login;

#[async_trait]
impl Operation for Login {
    fn failure_context(&self) -> String {
        "Failed login".into()
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let (username, password) = require_credentials(input)?;
        session.log.debug(format!("Start login for {}", username));

        let info = client.login(session, username, password).await?;
        complete_login(session, username, info);
        Ok(())
    }
}

pub struct CreateAccount;

#[async_trait]
impl Operation for CreateAccount {
    fn failure_context(&self) -> String {
        "Could not create account".into()
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let username = input.get("username");
        let password = input.get("password");
        let email = input.get("email");
        session.log.debug(format!("username={}, email={}", username, email));

        if username.chars().count() < 1 || password.chars().count() < 2 || email.chars().count() < 5 {
            return Err(ConsoleError::InvalidInput(ACCOUNT_FIELDS_REQUIRED.into()));
        }

        client.create_account(session, username, password, email).await?;
        session.log.debug(format!("Account created for {}", username));

        let info = client
            .login(session, username, password)
            .await
            .map_err(|e| ConsoleError::Authentication(format!("Could not fetch account token: {}", e)))?;
        complete_login(session, username, info);
        Ok(())
    }
}

/// Log in with separate credentials and mint a domain token with them. The
/// session's own login is left alone.
pub struct DomainToken;

#[async_trait]
impl Operation for DomainToken {
    fn failure_context(&self) -> String {
        "Could not fetch domain token".into()
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let (username, password) = require_credentials(input)?;

        let account = client
            .login(session, username, password)
            .await
            .map_err(|e| ConsoleError::Authentication(format!("Could not fetch account access token: {}", e)))?;
        let token = client.domain_token(session, &account).await?;

        session.log.debug("Successful domain token creation");
        session.view = Some(make_table(
            vec![make_row(vec![make_data("domain token", ""), make_data(token.as_str(), "v-domain-token")], "")],
            "v-domain-token-table",
        ));
        session.store_domain_token(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let short = OpInput::new().with("username", "joe").with("password", "x");
        assert!(matches!(require_credentials(&short), Err(ConsoleError::InvalidInput(_))));

        let empty_user = OpInput::new().with("username", "  ").with("password", "secret");
        assert!(require_credentials(&empty_user).is_err());

        let ok = OpInput::new().with("username", "joe").with("password", "pw");
        assert_eq!(require_credentials(&ok).unwrap(), ("joe", "pw"));
    }

    #[test]
    fn test_login_summary_shows_account() {
        let info = AuthTokenInfo {
            token: "tok".into(),
            token_type: "Bearer".into(),
            scope: "owner".into(),
            refresh_token: "r".into(),
            account_id: "acct-9".into(),
        };
        let text = login_summary("joe", &info).text_content();
        assert!(text.contains("joe"));
        assert!(text.contains("acct-9"));
    }
}
