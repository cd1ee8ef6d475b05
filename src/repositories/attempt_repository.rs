use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Attempt, NewAttempt, ReportRow},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn create(&self, attempt: NewAttempt) -> AppResult<Attempt>;
    async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Attempt>>;
    async fn report_rows(&self) -> AppResult<Vec<ReportRow>>;
}

pub struct SqliteAttemptRepository {
    pool: SqlitePool,
}

impl SqliteAttemptRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl AttemptRepository for SqliteAttemptRepository {
    async fn create(&self, attempt: NewAttempt) -> AppResult<Attempt> {
        let created = sqlx::query_as::<_, Attempt>(
            "INSERT INTO attempts (user_id, quiz_id, score, taken_at) VALUES (?, ?, ?, ?) \
             RETURNING id, user_id, quiz_id, score, taken_at",
        )
        .bind(attempt.user_id)
        .bind(attempt.quiz_id)
        .bind(attempt.score)
        .bind(attempt.taken_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<Attempt>> {
        let attempts = sqlx::query_as::<_, Attempt>(
            "SELECT id, user_id, quiz_id, score, taken_at FROM attempts \
             WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attempts)
    }

    async fn report_rows(&self) -> AppResult<Vec<ReportRow>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT u.regno AS regno, u.name AS name, q.title AS quiz_title, \
                    a.score AS score, a.taken_at AS taken_at \
             FROM attempts a \
             JOIN users u ON u.id = a.user_id \
             LEFT JOIN quizzes q ON q.id = a.quiz_id \
             ORDER BY a.id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
