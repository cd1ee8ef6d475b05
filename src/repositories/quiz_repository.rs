use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{NewQuiz, QuestionChoiceRow, Quiz},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// The quiz surfaced to learners: lowest id wins.
    async fn find_first_for_course(&self, course_id: i64) -> AppResult<Option<Quiz>>;
    /// One row per question x choice pair, ordered by question id then choice id.
    async fn find_question_rows(&self, quiz_id: i64) -> AppResult<Vec<QuestionChoiceRow>>;
    async fn find_all(&self) -> AppResult<Vec<Quiz>>;
    /// Inserts the quiz with all its questions and choices atomically.
    async fn create_with_questions(&self, quiz: NewQuiz) -> AppResult<i64>;
}

pub struct SqliteQuizRepository {
    pool: SqlitePool,
}

impl SqliteQuizRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl QuizRepository for SqliteQuizRepository {
    async fn find_first_for_course(&self, course_id: i64) -> AppResult<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT id, course_id, title FROM quizzes WHERE course_id = ? ORDER BY id LIMIT 1",
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quiz)
    }

    async fn find_question_rows(&self, quiz_id: i64) -> AppResult<Vec<QuestionChoiceRow>> {
        let rows = sqlx::query_as::<_, QuestionChoiceRow>(
            "SELECT q.id AS question_id, q.text AS question_text, \
                    c.id AS choice_id, c.text AS choice_text, c.is_correct AS is_correct \
             FROM questions q JOIN choices c ON c.question_id = q.id \
             WHERE q.quiz_id = ? \
             ORDER BY q.id, c.id",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        let quizzes =
            sqlx::query_as::<_, Quiz>("SELECT id, course_id, title FROM quizzes ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(quizzes)
    }

    async fn create_with_questions(&self, quiz: NewQuiz) -> AppResult<i64> {
        // Dropping the transaction on an early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        let quiz_id = sqlx::query("INSERT INTO quizzes (course_id, title) VALUES (?, ?)")
            .bind(quiz.course_id)
            .bind(&quiz.title)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        for question in &quiz.questions {
            let question_id = sqlx::query("INSERT INTO questions (quiz_id, text) VALUES (?, ?)")
                .bind(quiz_id)
                .bind(&question.text)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

            for choice in &question.choices {
                sqlx::query(
                    "INSERT INTO choices (question_id, text, is_correct) VALUES (?, ?, ?)",
                )
                .bind(question_id)
                .bind(&choice.text)
                .bind(choice.is_correct)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(quiz_id)
    }
}
