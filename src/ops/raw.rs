use async_trait::async_trait;

use crate::client::{join_path, ApiClient, API_MAINT_RAW};
use crate::errors::ConsoleError;
use crate::session::Session;
use crate::view::json_view;

use super::{OpInput, Operation};

fn require_path(input: &OpInput) -> Result<String, ConsoleError> {
    let path = input.get("path");
    if path.is_empty() {
        return Err(ConsoleError::InvalidInput("You must specify a request path".into()));
    }
    if path.starts_with('/') {
        Ok(path.to_string())
    } else {
        Ok(format!("/{}", path))
    }
}

/// Read a raw record from the maintenance API.
pub struct RawMaint;

#[async_trait]
impl Operation for RawMaint {
    fn failure_context(&self) -> String {
        "Error fetching raw data".into()
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let path = join_path(
            API_MAINT_RAW,
            &[input.get("collection"), input.get("field"), input.get("value")],
        );
        session.log.debug(format!("Fetching {}", path));

        let data = client.fetch_data(session, &path, &[]).await?;
        session.log.debug("Response received");
        session.view = Some(json_view(&data));
        Ok(())
    }
}

pub struct RawGet;

#[async_trait]
impl Operation for RawGet {
    fn failure_context(&self) -> String {
        "Raw GET failed".into()
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let path = require_path(input)?;
        let inject = input.flag("inject-error");
        session.log.debug(format!("GET {}{}", path, if inject { " (error header)" } else { "" }));

        let body = client.raw_get(session, &path, inject).await?;
        session.view = Some(json_view(&body));
        Ok(())
    }
}

pub struct RawPost;

#[async_trait]
impl Operation for RawPost {
    fn failure_context(&self) -> String {
        "Raw POST failed".into()
    }

    async fn run(&self, client: &ApiClient, session: &mut Session, input: &OpInput) -> Result<(), ConsoleError> {
        let path = require_path(input)?;
        let inject = input.flag("inject-error");
        session.log.debug(format!("POST {}{}", path, if inject { " (error header)" } else { "" }));

        let body = client.raw_post(session, &path, input.get("body"), inject).await?;
        session.view = Some(json_view(&body));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_path_adds_leading_slash() {
        let input = OpInput::new().with("path", "api/v1/domains");
        assert_eq!(require_path(&input).unwrap(), "/api/v1/domains");
        assert!(require_path(&OpInput::new()).is_err());
    }
}
