//! Employee and user account persistence on PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use sam_core::error::{AppError, ErrorKind};
use sam_core::result::AppResult;
use sam_core::types::UserId;
use sam_entity::employee::{Employee, NewEmployee};
use sam_entity::user::{CreateUser, User};

use super::map_write_error;
use crate::store::AccountStore;

/// Account store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new account store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_user_by_employee(&self, employee_id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE employee_id = $1")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by employee", e)
            })
    }

    async fn find_employee(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find employee", e))
    }

    async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (employee_id, permissions, hashed_password) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.employee_id)
        .bind(data.permissions)
        .bind(&data.hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Failed to create user",
                "Employee already has an account",
            )
        })
    }

    async fn create_employee(&self, data: NewEmployee) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (employee_id, name, gender, department, level) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.employee_id)
        .bind(&data.name)
        .bind(data.gender)
        .bind(&data.department)
        .bind(data.level)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Failed to create employee",
                "Employee id is already registered",
            )
        })
    }
}
