//! Employee registry commands.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use sam_core::config::AppConfig;
use sam_core::error::AppError;
use sam_database::DatabasePool;
use sam_entity::employee::{Employee, Gender, NewEmployee};

use crate::output::{self, OutputFormat};

/// Arguments for employee commands
#[derive(Debug, Args)]
pub struct EmployeeArgs {
    /// Employee subcommand
    #[command(subcommand)]
    pub command: EmployeeCommand,
}

/// Employee subcommands
#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    /// Register an employee
    Add {
        /// Job number
        employee_id: String,
        /// Full name
        #[arg(short, long)]
        name: String,
        /// Gender
        #[arg(short, long, value_enum, default_value = "other")]
        gender: GenderArg,
        /// Department
        #[arg(short, long)]
        department: Option<String>,
        /// Job level (0-5)
        #[arg(short, long, default_value_t = 0)]
        level: i16,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    Other,
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Other => Self::Other,
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
        }
    }
}

/// Employee display row for table output
#[derive(Debug, Serialize, Tabled)]
struct EmployeeRow {
    employee_id: String,
    name: String,
    gender: String,
    department: String,
    level: i16,
    status: String,
}

impl From<Employee> for EmployeeRow {
    fn from(e: Employee) -> Self {
        let gender = match e.gender {
            Gender::Other => "other",
            Gender::Male => "male",
            Gender::Female => "female",
        };
        Self {
            employee_id: e.employee_id,
            name: e.name,
            gender: gender.to_string(),
            department: e.department.unwrap_or_default(),
            level: e.level,
            status: e.status.as_str().to_string(),
        }
    }
}

/// Execute employee commands
pub async fn execute(
    args: &EmployeeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    let accounts = super::account_service(config, &db);

    match &args.command {
        EmployeeCommand::Add {
            employee_id,
            name,
            gender,
            department,
            level,
        } => {
            let employee = accounts
                .create_employee(NewEmployee {
                    employee_id: employee_id.clone(),
                    name: name.clone(),
                    gender: (*gender).into(),
                    department: department.clone(),
                    level: *level,
                })
                .await?;

            output::print_success(&format!("Employee '{}' registered", employee.employee_id));
            output::print_item(&EmployeeRow::from(employee), format);
        }
    }

    db.close().await;
    Ok(())
}
