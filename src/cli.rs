use clap::{Parser, Subcommand, ValueEnum};

use iamus_console::models::EntityKind;

/// Iamus Console: administer a metaverse directory server
#[derive(Parser)]
#[command(name = "iamus-console", version, about)]
pub struct Cli {
    /// Base URL of the Iamus server
    #[arg(long, global = true, env = "ICONSOLE_SERVER_URL")]
    pub server_url: Option<String>,

    /// Log in as this user before running the command
    #[arg(long, global = true, env = "ICONSOLE_USERNAME")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "ICONSOLE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web console
    Serve {
        /// Port to bind
        #[arg(short, long, env = "ICONSOLE_PORT")]
        port: Option<u16>,
    },

    /// Log in with --username/--password and show the token
    Login,

    /// Create an account from --username/--password, then log into it
    CreateAccount {
        #[arg(long)]
        email: String,
    },

    /// Fetch a domain token for --username/--password
    DomainToken,

    /// List entities of one kind
    List {
        #[arg(value_enum)]
        kind: ListKind,
        /// Ask for every record, not just the caller's
        #[arg(long)]
        as_admin: bool,
    },

    /// Delete an account, domain or place by id
    Delete {
        #[arg(value_enum)]
        target: DeleteKind,
        id: String,
    },

    /// Delete one access token of an account
    DeleteToken { account_id: String, token_id: String },

    /// Arbitrary requests against the API
    Raw {
        #[command(subcommand)]
        command: RawCommands,
    },

    /// Read a raw record through the maintenance API
    Maint {
        collection: String,
        field: String,
        value: String,
    },

    /// Show server OS statistics
    Stats,
}

#[derive(Subcommand)]
pub enum RawCommands {
    Get {
        path: String,
        /// Ask the server for its diagnostic error handling
        #[arg(long)]
        inject_error: bool,
    },
    Post {
        path: String,
        /// JSON request body
        json: String,
        #[arg(long)]
        inject_error: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ListKind {
    Accounts,
    Users,
    Domains,
    Tokens,
    Places,
    Requests,
}

impl From<ListKind> for EntityKind {
    fn from(k: ListKind) -> Self {
        match k {
            ListKind::Accounts => EntityKind::Accounts,
            ListKind::Users => EntityKind::Users,
            ListKind::Domains => EntityKind::Domains,
            ListKind::Tokens => EntityKind::Tokens,
            ListKind::Places => EntityKind::Places,
            ListKind::Requests => EntityKind::Requests,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DeleteKind {
    Account,
    Domain,
    Place,
}
