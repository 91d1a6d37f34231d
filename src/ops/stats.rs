use async_trait::async_trait;

use crate::client::ApiClient;
use crate::errors::ConsoleError;
use crate::session::Session;
use crate::view::stats::os_stats_table;

use super::{OpInput, Operation};

/// Fetch OS statistics and show them as a key/value table. Needs a login.
pub struct OsStats;

#[async_trait]
impl Operation for OsStats {
    fn failure_context(&self) -> String {
        "UpdateOSStats".into()
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, _input: &OpInput) -> Result<(), ConsoleError> {
        if !session.is_logged_in() {
            return Err(ConsoleError::InvalidInput("login required to fetch stats".into()));
        }
        let stats = client.os_stats(session).await?;
        session.view = Some(os_stats_table(&stats));
        Ok(())
    }
}
