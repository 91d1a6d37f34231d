use serde::{Deserialize, Serialize};

/// Bearer credential returned by a password login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokenInfo {
    pub token: String,
    pub token_type: String,
    pub scope: String,
    pub refresh_token: String,
    pub account_id: String,
}

impl AuthTokenInfo {
    /// Value for the `Authorization` header: `<token_type> <token>`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

/// Raw body of `POST /oauth/token`. Every field is optional because the
/// backend answers errors with the same 200 status and only an `error` member.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub refresh_token: Option<String>,
    pub account_id: Option<String>,
    pub error: Option<serde_json::Value>,
}

impl LoginResponse {
    /// The server-supplied error message, if the login was refused.
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => None,
            Some(serde_json::Value::String(s)) if s.is_empty() => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    pub fn into_token_info(self) -> AuthTokenInfo {
        AuthTokenInfo {
            token: self.access_token.unwrap_or_default(),
            token_type: self.token_type.unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            refresh_token: self.refresh_token.unwrap_or_default(),
            account_id: self.account_id.unwrap_or_default(),
        }
    }
}
