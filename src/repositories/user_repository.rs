use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{NewUser, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> AppResult<User>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
    async fn find_by_regno(&self, regno: &str) -> AppResult<Option<User>>;
    async fn find_all(&self) -> AppResult<Vec<User>>;
    /// Sets the admin flag. Returns `false` when nothing was updated, either
    /// because the user does not exist or because the change would remove
    /// the last remaining admin.
    async fn set_admin(&self, id: i64, is_admin: bool) -> AppResult<bool>;
}

const USER_COLUMNS: &str = "id, regno, name, password_hash, is_admin, created_at";

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (regno, name, password_hash, is_admin, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.regno)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::DuplicateKey(_) => {
                AppError::DuplicateKey("Registration number already used".to_string())
            }
            other => other,
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_regno(&self, regno: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE regno = ?"
        ))
        .bind(regno)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn set_admin(&self, id: i64, is_admin: bool) -> AppResult<bool> {
        // The guard lives in the statement itself so two concurrent
        // demotions cannot both pass a separate count check.
        let result = sqlx::query(
            "UPDATE users SET is_admin = ? WHERE id = ? AND ( \
                ? OR is_admin = 0 \
                OR (SELECT COUNT(*) FROM users WHERE is_admin = 1) > 1 \
             )",
        )
        .bind(is_admin)
        .bind(id)
        .bind(is_admin)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
