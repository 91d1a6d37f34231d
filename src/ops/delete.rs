use std::fmt;

use async_trait::async_trait;

use crate::client::{join_path, ApiClient};
use crate::errors::ConsoleError;
use crate::session::Session;
use crate::view::element::{make_div, make_text};

use super::{OpInput, Operation};

/// Records that are deleted by id alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Account,
    Domain,
    Place,
}

impl DeleteTarget {
    pub fn base_path(self) -> &'static str {
        match self {
            DeleteTarget::Account => "/api/v1/account",
            DeleteTarget::Domain => "/api/v1/domains",
            DeleteTarget::Place => "/api/v1/places",
        }
    }

    pub fn path_for(self, id: &str) -> String {
        join_path(self.base_path(), &[id])
    }
}

impl fmt::Display for DeleteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeleteTarget::Account => "account",
            DeleteTarget::Domain => "domain",
            DeleteTarget::Place => "place",
        })
    }
}

/// Path of the token-deletion endpoint.
pub fn token_path(account_id: &str, token_id: &str) -> String {
    let account = join_path("/api/v1/account", &[account_id]);
    join_path(&format!("{}/tokens", account), &[token_id])
}

fn require(input: &OpInput, name: &str) -> Result<String, ConsoleError> {
    let v = input.get(name);
    if v.is_empty() {
        return Err(ConsoleError::InvalidInput(format!("You must specify a value for {}", name)));
    }
    Ok(v.to_string())
}

fn show_deleted(session: &mut Session, what: String) {
    session.log.debug(format!("Deleted {}", what));
    session.view = Some(make_div(vec![make_text(format!("Deleted {}", what))], "v-delete-result"));
}

pub struct DeleteEntity {
    target: DeleteTarget,
}

impl DeleteEntity {
    pub fn new(target: DeleteTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Operation for DeleteEntity {
    fn failure_context(&self) -> String {
        format!("Delete {}", self.target)
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let id = require(input, "id")?;
        client.delete_entity(session, &self.target.path_for(&id)).await?;
        show_deleted(session, format!("{} {}", self.target, id));
        Ok(())
    }
}

pub struct DeleteToken;

#[async_trait]
impl Operation for DeleteToken {
    fn failure_context(&self) -> String {
        "Delete token".into()
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let account_id = require(input, "account-id")?;
        let token_id = require(input, "token-id")?;
        client
            .delete_entity(session, &token_path(&account_id, &token_id))
            .await?;
        show_deleted(session, format!("token {} of account {}", token_id, account_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_paths() {
        assert_eq!(DeleteTarget::Account.path_for("a1"), "/api/v1/account/a1");
        assert_eq!(DeleteTarget::Domain.path_for("d1"), "/api/v1/domains/d1");
        assert_eq!(DeleteTarget::Place.path_for("p 1"), "/api/v1/places/p%201");
        assert_eq!(token_path("a1", "t1"), "/api/v1/account/a1/tokens/t1");
    }

    #[test]
    fn test_require_rejects_blank() {
        let input = OpInput::new().with("id", "   ");
        assert!(matches!(require(&input, "id"), Err(ConsoleError::InvalidInput(_))));
    }
}
