use async_trait::async_trait;

use crate::client::ApiClient;
use crate::errors::ConsoleError;
use crate::models::EntityKind;
use crate::session::Session;
use crate::view::{build_table_logged, columns_for};

use super::{OpInput, Operation};

/// Fetch one entity list, replace the session's copy, and show it as a table.
pub struct ListEntities {
    kind: EntityKind,
}

impl ListEntities {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Operation for ListEntities {
    fn failure_context(&self) -> String {
        format!("Could not fetch {}", self.kind)
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let as_admin = input.flag("as-admin");
        let records = client
            .fetch_entity_list(session, self.kind.list_path(), Some(self.kind.field_name()), as_admin)
            .await?;

        session
            .log
            .debug(format!("{} fetched: {}", self.kind, records.len()));

        let table = build_table_logged(
            &columns_for(self.kind),
            &records,
            self.kind.table_class(),
            &mut session.log,
        );
        session.store_list(self.kind, records);
        session.view = Some(table);
        Ok(())
    }
}
