//! Account service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sam_auth::jwt::{AccessToken, JwtEncoder};
use sam_auth::password::{PasswordHasher, PasswordValidator};
use sam_core::error::AppError;
use sam_core::result::AppResult;
use sam_core::types::UserId;
use sam_database::store::AccountStore;
use sam_entity::employee::{Employee, MAX_LEVEL, NewEmployee};
use sam_entity::user::{CreateUser, Permission, User};

use crate::context::RequestContext;

/// Message for every failed credential check, so callers cannot tell an
/// unknown employee from a wrong password.
const INVALID_CREDENTIALS: &str = "Incorrect employee ID or password";

/// A user together with the employee behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user: User,
    pub employee: Employee,
}

/// Input for creating a login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub employee_id: String,
    pub password: String,
    #[serde(default)]
    pub permissions: Permission,
}

/// Handles authentication and account management.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            validator,
            encoder,
        }
    }

    /// Verify credentials and issue an access token.
    pub async fn login(&self, employee_id: &str, password: &str) -> AppResult<(User, AccessToken)> {
        let Some(user) = self.accounts.find_user_by_employee(employee_id).await? else {
            warn!(employee_id, "Login failed: unknown employee");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.hashed_password)? {
            warn!(user_id = %user.user_id, "Login failed: wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if !user.can_login() {
            warn!(user_id = %user.user_id, "Login refused: account disabled");
            return Err(AppError::authentication("Account is disabled"));
        }

        let token = self.encoder.issue_access_token(&user)?;
        info!(user_id = %user.user_id, employee_id, "User logged in");
        Ok((user, token))
    }

    /// Load the account a token was issued for. Disabled or deleted
    /// accounts are rejected even while their tokens are unexpired.
    pub async fn resolve_active_user(&self, user_id: UserId) -> AppResult<User> {
        let user = self
            .accounts
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::authentication("Could not validate credentials"))?;

        if !user.can_login() {
            return Err(AppError::authentication("Account is disabled"));
        }
        Ok(user)
    }

    /// The caller's account and employee record.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<Profile> {
        let user = self
            .accounts
            .find_user(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let employee = self
            .accounts
            .find_employee(&user.employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("No employee record for the current user"))?;
        Ok(Profile { user, employee })
    }

    /// Create a login account for an existing employee.
    pub async fn create_user(&self, new: NewAccount) -> AppResult<User> {
        let employee = self
            .accounts
            .find_employee(&new.employee_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Employee '{}' not found", new.employee_id))
            })?;

        if self
            .accounts
            .find_user_by_employee(&employee.employee_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Employee '{}' already has an account",
                employee.employee_id
            )));
        }

        self.validator.validate(
            &new.password,
            &[employee.employee_id.as_str(), employee.name.as_str()],
        )?;
        let hashed_password = self.hasher.hash_password(&new.password)?;

        let user = self
            .accounts
            .create_user(CreateUser {
                employee_id: employee.employee_id,
                hashed_password,
                permissions: new.permissions,
            })
            .await?;

        info!(
            user_id = %user.user_id,
            employee_id = %user.employee_id,
            permissions = %user.permissions,
            "User created"
        );
        Ok(user)
    }

    /// Register an employee.
    pub async fn create_employee(&self, new: NewEmployee) -> AppResult<Employee> {
        if new.employee_id.trim().is_empty() {
            return Err(AppError::validation("Employee id cannot be empty"));
        }
        if new.name.trim().is_empty() {
            return Err(AppError::validation("Employee name cannot be empty"));
        }
        if !(0..=MAX_LEVEL).contains(&new.level) {
            return Err(AppError::validation(format!(
                "Employee level must be between 0 and {MAX_LEVEL}"
            )));
        }

        let employee = self.accounts.create_employee(new).await?;
        info!(employee_id = %employee.employee_id, level = employee.level, "Employee registered");
        Ok(employee)
    }
}
