use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use staff_session::{
    ConfigError, FileStorage, LogNotifier, MemoryUserStore, NewUser, RestUserStore, Role, SessionConfig,
    SessionError, SessionManager, SessionScope, StoreConfig, StoreError, UserStore,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("missing password; pass --password or set STAFF_SESSION_PASSWORD")]
    MissingPassword,
    #[error("JSON encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "staff-session", about = "Log in, sign up, and inspect the local staff session")]
struct Cli {
    /// Storage key for the session snapshot (overrides `SESSION_STORAGE_KEY`).
    #[arg(long, global = true)]
    storage_key: Option<String>,

    /// Snapshot file path (overrides `SESSION_STORAGE_PATH`).
    #[arg(long, global = true)]
    storage_path: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and persist the session.
    Login {
        username: String,
        #[arg(long, env = "STAFF_SESSION_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account. Does not log in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "staff")]
        role: Role,
    },
    /// Clear the local session.
    Logout,
    /// Print the restored session user.
    Whoami,
}

impl Command {
    fn needs_store(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::Signup { .. })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "staff-session failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool, CliError> {
    let mut config = SessionConfig::from_env();
    if let Some(key) = cli.storage_key {
        config.storage_key = key;
    }
    if let Some(path) = cli.storage_path {
        config.storage_path = path;
    }

    // Logout and whoami never reach the remote store, so they work offline
    // and without store credentials.
    let store: Arc<dyn UserStore> = if cli.command.needs_store() {
        Arc::new(RestUserStore::new(&StoreConfig::from_env()?)?)
    } else {
        Arc::new(MemoryUserStore::new())
    };
    let storage = Arc::new(FileStorage::new(config.storage_path.clone()));
    let scope = SessionScope::provide(SessionManager::start(config, store, storage, Arc::new(LogNotifier)));

    match cli.command {
        Command::Login { username, password } => {
            let password = password.ok_or(CliError::MissingPassword)?;
            run_login(&scope, &username, &password).await
        }
        Command::Signup { name, username, password, role } => {
            run_signup(&scope, NewUser { name, username, password, role }).await
        }
        Command::Logout => {
            scope.session()?.logout();
            println!("logged out");
            Ok(true)
        }
        Command::Whoami => run_whoami(&scope),
    }
}

async fn run_login(scope: &SessionScope, username: &str, password: &str) -> Result<bool, CliError> {
    let session = scope.session()?;
    let ok = session.login(username, password).await;
    if let Some(user) = session.user().filter(|_| ok) {
        println!("{}", serde_json::to_string_pretty(&user)?);
    }
    Ok(ok)
}

async fn run_signup(scope: &SessionScope, new_user: NewUser) -> Result<bool, CliError> {
    Ok(scope.session()?.signup(new_user).await)
}

fn run_whoami(scope: &SessionScope) -> Result<bool, CliError> {
    match scope.session()?.user() {
        Some(user) => {
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(true)
        }
        None => {
            println!("not logged in");
            Ok(false)
        }
    }
}
