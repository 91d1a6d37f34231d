//! Console operations and their registry.
//!
//! Every action an operator can take (log in, list domains, delete a token, …)
//! is an [`Operation`] registered under a fixed identifier. The web console
//! posts the identifier with its form; the CLI maps each subcommand onto one.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::errors::ConsoleError;
use crate::models::EntityKind;
use crate::session::Session;

pub mod account;
pub mod delete;
pub mod lists;
pub mod raw;
pub mod stats;

/// Form fields submitted with an operation.
#[derive(Debug, Clone, Default)]
pub struct OpInput {
    fields: HashMap<String, String>,
}

impl OpInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Trimmed value of `name`, empty when absent.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }

    /// Checkbox-style flag: present and one of `on`, `true`, `1`, `yes`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.get(name).to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        )
    }
}

impl From<HashMap<String, String>> for OpInput {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

#[async_trait]
pub trait Operation: Send + Sync {
    /// Prefix for the console log line when the operation fails.
    fn failure_context(&self) -> String;

    async fn run(
        &self,
        client: &ApiClient,
        session: &mut Session,
        input: &OpInput,
    ) -> Result<(), ConsoleError>;
}

/// Identifiers of the operations registered by [`OpRegistry::standard`].
pub mod ids {
    pub const SET_SERVER: &str = "set-server";
    pub const LOGIN: &str = "login";
    pub const CREATE_ACCOUNT: &str = "create-account";
    pub const DOMAIN_TOKEN: &str = "domain-token";
    pub const LIST_ACCOUNTS: &str = "list-accounts";
    pub const LIST_USERS: &str = "list-users";
    pub const LIST_DOMAINS: &str = "list-domains";
    pub const LIST_TOKENS: &str = "list-tokens";
    pub const LIST_PLACES: &str = "list-places";
    pub const LIST_REQUESTS: &str = "list-requests";
    pub const DELETE_ACCOUNT: &str = "delete-account";
    pub const DELETE_DOMAIN: &str = "delete-domain";
    pub const DELETE_PLACE: &str = "delete-place";
    pub const DELETE_TOKEN: &str = "delete-token";
    pub const RAW_MAINT: &str = "raw-maint";
    pub const RAW_GET: &str = "raw-get";
    pub const RAW_POST: &str = "raw-post";
    pub const OS_STATS: &str = "os-stats";
}

/// List operation identifier for `kind`.
pub fn list_op_id(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Accounts => ids::LIST_ACCOUNTS,
        EntityKind::Users => ids::LIST_USERS,
        EntityKind::Domains => ids::LIST_DOMAINS,
        EntityKind::Tokens => ids::LIST_TOKENS,
        EntityKind::Places => ids::LIST_PLACES,
        EntityKind::Requests => ids::LIST_REQUESTS,
    }
}

#[derive(Default)]
pub struct OpRegistry {
    ops: HashMap<&'static str, Box<dyn Operation>>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: &'static str, op: impl Operation + 'static) {
        if self.ops.insert(id, Box::new(op)).is_some() {
            tracing::warn!(op = id, "operation registered twice; keeping the later one");
        }
    }

    /// Registry with every console operation.
    pub fn standard() -> Self {
        let mut reg = Self::new();

        reg.register(ids::SET_SERVER, account::SetServer);
        reg.register(ids::LOGIN, account::Login);
        reg.register(ids::CREATE_ACCOUNT, account::CreateAccount);
        reg.register(ids::DOMAIN_TOKEN, account::DomainToken);

        for kind in EntityKind::ALL {
            reg.register(list_op_id(kind), lists::ListEntities::new(kind));
        }

        reg.register(ids::DELETE_ACCOUNT, delete::DeleteEntity::new(delete::DeleteTarget::Account));
        reg.register(ids::DELETE_DOMAIN, delete::DeleteEntity::new(delete::DeleteTarget::Domain));
        reg.register(ids::DELETE_PLACE, delete::DeleteEntity::new(delete::DeleteTarget::Place));
        reg.register(ids::DELETE_TOKEN, delete::DeleteToken);

        reg.register(ids::RAW_MAINT, raw::RawMaint);
        reg.register(ids::RAW_GET, raw::RawGet);
        reg.register(ids::RAW_POST, raw::RawPost);

        reg.register(ids::OS_STATS, stats::OsStats);

        reg
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ops.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.ops.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Prefix put in front of a failure of `id` in the console log.
    pub fn failure_context(&self, id: &str) -> String {
        self.ops
            .get(id)
            .map(|op| op.failure_context())
            .unwrap_or_else(|| "dispatch".to_string())
    }

    /// Run operation `id` for `session`. Failures are written to the session's
    /// console log before being returned.
    pub async fn dispatch(
        &self,
        id: &str,
        client: &ApiClient,
        session: &mut Session,
        input: &OpInput,
    ) -> Result<(), ConsoleError> {
        let Some(op) = self.ops.get(id) else {
            let err = ConsoleError::UnknownOperation(id.to_string());
            session.log.error(format!("{}: {}", self.failure_context(id), err));
            return Err(err);
        };

        tracing::debug!(op = id, session = %session.id, "dispatching operation");
        op.run(client, session, input).await.map_err(|e| {
            session.log.error(format!("{}: {}", op.failure_context(), e));
            e
        })
    }
}
