use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iamus_console::client::ApiClient;
use iamus_console::config::{self, Config};
use iamus_console::ops::{ids, list_op_id, OpInput, OpRegistry};
use iamus_console::server;
use iamus_console::session::Session;
use iamus_console::view::text;

mod cli;

use cli::{Commands, RawCommands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let args = cli::Cli::parse();
    let mut cfg = config::load()?;
    if let Some(url) = &args.server_url {
        cfg.server_url = config::normalize_server_url(url).context("invalid --server-url")?;
    }

    let result = match args.command {
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                cfg.port = port;
            }
            server::run_server(cfg).await
        }
        Some(command) => run_command(cfg, args.username, args.password, command).await,
        None => server::run_server(cfg).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::{trace as sdktrace, Resource};

    let telemetry_layer = if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic())
            .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                KeyValue::new("service.name", "iamus-console"),
            ])))
            .install_batch(opentelemetry_sdk::runtime::Tokio)
            .context("failed to install OpenTelemetry tracer")?;
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    let json = std::env::var("ICONSOLE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    // stdout belongs to command output
    let (plain_layer, json_layer) = if json {
        (None, Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "iamus_console=debug,tower_http=debug".into()),
        ))
        .with(plain_layer)
        .with(json_layer)
        .with(telemetry_layer)
        .init();
    Ok(())
}

/// Map a subcommand onto a registered operation. The flag says whether the
/// global credentials should be used to log in first.
fn plan(command: Commands, credentials: OpInput) -> Option<(&'static str, OpInput, bool)> {
    let planned = match command {
        Commands::Login => (ids::LOGIN, credentials, false),
        Commands::CreateAccount { email } => (ids::CREATE_ACCOUNT, credentials.with("email", email), false),
        Commands::DomainToken => (ids::DOMAIN_TOKEN, credentials, false),
        Commands::List { kind, as_admin } => {
            let input = OpInput::new().with("as-admin", if as_admin { "true" } else { "" });
            (list_op_id(kind.into()), input, true)
        }
        Commands::Delete { target, id } => {
            let op = match target {
                cli::DeleteKind::Account => ids::DELETE_ACCOUNT,
                cli::DeleteKind::Domain => ids::DELETE_DOMAIN,
                cli::DeleteKind::Place => ids::DELETE_PLACE,
            };
            (op, OpInput::new().with("id", id), true)
        }
        Commands::DeleteToken { account_id, token_id } => (
            ids::DELETE_TOKEN,
            OpInput::new().with("account-id", account_id).with("token-id", token_id),
            true,
        ),
        Commands::Raw { command } => match command {
            RawCommands::Get { path, inject_error } => (
                ids::RAW_GET,
                OpInput::new()
                    .with("path", path)
                    .with("inject-error", inject_error.to_string()),
                true,
            ),
            RawCommands::Post { path, json, inject_error } => (
                ids::RAW_POST,
                OpInput::new()
                    .with("path", path)
                    .with("body", json)
                    .with("inject-error", inject_error.to_string()),
                true,
            ),
        },
        Commands::Maint { collection, field, value } => (
            ids::RAW_MAINT,
            OpInput::new()
                .with("collection", collection)
                .with("field", field)
                .with("value", value),
            true,
        ),
        Commands::Stats => (ids::OS_STATS, OpInput::new(), true),
        Commands::Serve { .. } => return None,
    };
    Some(planned)
}

async fn dispatch(
    registry: &OpRegistry,
    client: &ApiClient,
    session: &mut Session,
    op: &str,
    input: &OpInput,
) -> anyhow::Result<()> {
    registry
        .dispatch(op, client, session, input)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", registry.failure_context(op), e))
}

async fn run_command(
    cfg: Config,
    username: Option<String>,
    password: Option<String>,
    command: Commands,
) -> anyhow::Result<()> {
    let client = ApiClient::new(&cfg)?;
    let registry = OpRegistry::standard();
    let mut session = Session::from_config(&cfg);

    let has_credentials = username.is_some() && password.is_some();
    let credentials = OpInput::new()
        .with("username", username.unwrap_or_default())
        .with("password", password.unwrap_or_default());

    let (op, input, auto_login) =
        plan(command, credentials.clone()).context("serve is not a console operation")?;

    if auto_login && has_credentials {
        dispatch(&registry, &client, &mut session, ids::LOGIN, &credentials).await?;
        tracing::debug!(user = ?session.login_user(), "logged in before command");
    }

    dispatch(&registry, &client, &mut session, op, &input).await?;

    if let Some(view) = &session.view {
        println!("{}", text::render(view));
    }
    Ok(())
}
