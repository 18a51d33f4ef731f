//! CLI command definitions and dispatch.

pub mod employee;
pub mod migrate;
pub mod serve;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use sam_auth::jwt::JwtEncoder;
use sam_auth::password::{PasswordHasher, PasswordValidator};
use sam_core::config::AppConfig;
use sam_core::error::AppError;
use sam_database::{DatabasePool, PgAccountStore};
use sam_service::AccountService;

use crate::output::OutputFormat;

/// SAM: software license asset manager
#[derive(Debug, Parser)]
#[command(name = "sam", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load from `config/{env}.toml`
    #[arg(short, long, env = "SAM_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Employee registry
    Employee(employee::EmployeeArgs),
    /// Login accounts
    User(user::UserArgs),
}

impl Cli {
    /// Whether this invocation starts the long-running server.
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve(_))
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Employee(args) => employee::execute(args, &config, self.format).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
        }
    }
}

/// Load configuration for the selected environment.
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Account service over PostgreSQL, for the commands that manage accounts.
pub fn account_service(config: &AppConfig, db: &DatabasePool) -> AccountService {
    AccountService::new(
        Arc::new(PgAccountStore::new(db.pool().clone())),
        Arc::new(PasswordHasher::new()),
        Arc::new(PasswordValidator::new(&config.auth)),
        Arc::new(JwtEncoder::new(&config.auth)),
    )
}
