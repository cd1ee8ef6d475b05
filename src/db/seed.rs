use std::path::Path;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
};

pub const DEMO_MATERIAL_FILE: &str = "welcome.txt";

struct DemoQuestion {
    text: &'static str,
    choices: &'static [(&'static str, bool)],
}

const DEMO_QUESTIONS: &[DemoQuestion] = &[
    DemoQuestion {
        text: "What does this portal offer?",
        choices: &[("Online courses and quizzes", true), ("Hotel bookings", false)],
    },
    DemoQuestion {
        text: "How are quizzes scored?",
        choices: &[("As a percentage of correct answers", true), ("They are not scored", false)],
    },
];

/// Seeds one demo course, material and quiz when the catalog is empty.
/// Returns whether anything was inserted.
pub async fn seed_demo_data(db: &Database, materials_dir: &Path) -> AppResult<bool> {
    let (courses,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM courses")
        .fetch_one(db.pool())
        .await?;
    if courses > 0 {
        return Ok(false);
    }

    tokio::fs::create_dir_all(materials_dir)
        .await
        .map_err(|e| AppError::InternalError(format!(
            "Cannot create materials directory {}: {}",
            materials_dir.display(),
            e
        )))?;
    tokio::fs::write(
        materials_dir.join(DEMO_MATERIAL_FILE),
        "Welcome to the e-learning portal!",
    )
    .await
    .map_err(|e| AppError::InternalError(format!(
        "Cannot write demo material: {}",
        e
    )))?;

    let mut tx = db.pool().begin().await?;

    let course_id = sqlx::query("INSERT INTO courses (title, description) VALUES (?, ?)")
        .bind("Introduction to the Portal")
        .bind("Learn how courses, materials and quizzes work.")
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    sqlx::query("INSERT INTO materials (course_id, filename, original_name) VALUES (?, ?, ?)")
        .bind(course_id)
        .bind(DEMO_MATERIAL_FILE)
        .bind("Welcome.txt")
        .execute(&mut *tx)
        .await?;

    let quiz_id = sqlx::query("INSERT INTO quizzes (course_id, title) VALUES (?, ?)")
        .bind(course_id)
        .bind("Intro Quiz")
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    for question in DEMO_QUESTIONS {
        let question_id = sqlx::query("INSERT INTO questions (quiz_id, text) VALUES (?, ?)")
            .bind(quiz_id)
            .bind(question.text)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        for (text, is_correct) in question.choices {
            sqlx::query("INSERT INTO choices (question_id, text, is_correct) VALUES (?, ?, ?)")
                .bind(question_id)
                .bind(*text)
                .bind(*is_correct)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    log::info!("Seeded demo course {} with quiz {}", course_id, quiz_id);
    Ok(true)
}
