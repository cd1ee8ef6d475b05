use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One scored submission. Attempts are append-only.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAttempt {
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
}

impl NewAttempt {
    pub fn now(user_id: i64, quiz_id: i64, score: i64) -> Self {
        NewAttempt {
            user_id,
            quiz_id,
            score,
            taken_at: Utc::now(),
        }
    }
}

/// Attempt joined with its user and quiz for the admin report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromRow)]
pub struct ReportRow {
    pub regno: String,
    pub name: Option<String>,
    pub quiz_title: Option<String>,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
}
