//! Login account commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sam_core::config::AppConfig;
use sam_core::error::AppError;
use sam_database::DatabasePool;
use sam_entity::user::{Permission, User};
use sam_service::NewAccount;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a login account for an existing employee
    Create {
        /// Job number of the employee
        employee_id: String,
        /// Grant admin permissions
        #[arg(long)]
        admin: bool,
        /// Password (prompted for when omitted)
        #[arg(long, env = "SAM_USER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    user_id: String,
    employee_id: String,
    permissions: String,
    status: String,
    created_at: String,
}

impl From<User> for UserRow {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id.to_string(),
            employee_id: u.employee_id,
            permissions: u.permissions.as_str().to_string(),
            status: u.status.as_str().to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::Create {
            employee_id,
            admin,
            password,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => prompt_password()?,
            };
            let permissions = if *admin {
                Permission::Admin
            } else {
                Permission::Standard
            };

            let db = DatabasePool::connect(&config.database).await?;
            let accounts = super::account_service(config, &db);
            let result = accounts
                .create_user(NewAccount {
                    employee_id: employee_id.clone(),
                    password,
                    permissions,
                })
                .await;
            db.close().await;
            let user = result?;

            output::print_success(&format!(
                "Account created for employee '{}'",
                user.employee_id
            ));
            output::print_item(&UserRow::from(user), format);
        }
    }

    Ok(())
}

fn prompt_password() -> Result<String, AppError> {
    dialoguer::Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
