use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Course, NewChoice, NewQuestion, NewQuiz, Quiz, ReportRow},
        dto::request::{CreateCourseRequest, CreateQuestionRequest, CreateQuizRequest},
    },
    repositories::{AttemptRepository, CourseRepository, QuizRepository},
};

pub const REPORT_CSV_HEADER: [&str; 5] = ["regno", "name", "quiz_title", "score", "taken_at"];

pub struct AdminService {
    courses: Arc<dyn CourseRepository>,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn build_question(index: usize, question: CreateQuestionRequest) -> AppResult<NewQuestion> {
    let text = question.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::ValidationError(format!(
            "question {} requires text",
            index + 1
        )));
    }

    if question.choices.iter().any(|c| c.text.trim().is_empty()) {
        return Err(AppError::ValidationError(format!(
            "every choice of question {} requires text",
            index + 1
        )));
    }

    if question.choices.iter().filter(|c| c.is_correct).count() > 1 {
        return Err(AppError::ValidationError(format!(
            "question {} has more than one correct choice",
            index + 1
        )));
    }

    Ok(NewQuestion {
        text,
        choices: question
            .choices
            .into_iter()
            .map(|c| NewChoice {
                text: c.text.trim().to_string(),
                is_correct: c.is_correct,
            })
            .collect(),
    })
}

/// Renders report rows as CSV. Free-text fields are quoted by the writer
/// whenever they contain a delimiter, a quote or a line break.
pub fn render_report_csv(rows: &[ReportRow]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let to_err = |e: csv::Error| AppError::InternalError(format!("CSV export failed: {}", e));

    writer.write_record(REPORT_CSV_HEADER).map_err(to_err)?;
    for row in rows {
        writer
            .write_record([
                row.regno.as_str(),
                row.name.as_deref().unwrap_or(""),
                row.quiz_title.as_deref().unwrap_or(""),
                &row.score.to_string(),
                &row.taken_at.to_rfc3339(),
            ])
            .map_err(to_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalError(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::InternalError(format!("CSV export is not UTF-8: {}", e)))
}

impl AdminService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            courses,
            quizzes,
            attempts,
        }
    }

    pub async fn create_course(&self, request: CreateCourseRequest) -> AppResult<Course> {
        request.validate()?;
        let title = request.title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError("title required".to_string()));
        }

        let course = self
            .courses
            .create(title, trimmed(request.description))
            .await?;

        log::info!("Created course {} ({})", course.id, course.title);
        Ok(course)
    }

    /// Creates the quiz, its questions and their choices in one transaction.
    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<i64> {
        request.validate()?;
        let course_id = request.course_id.unwrap_or_default();
        let questions = request.questions.unwrap_or_default();

        if questions.is_empty() {
            return Err(AppError::ValidationError(
                "a quiz needs at least one question".to_string(),
            ));
        }

        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(index, question)| build_question(index, question))
            .collect::<AppResult<Vec<_>>>()?;

        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        let question_count = questions.len();
        let quiz_id = self
            .quizzes
            .create_with_questions(NewQuiz {
                course_id,
                title: trimmed(request.title),
                questions,
            })
            .await?;

        log::info!(
            "Created quiz {} for course {} with {} questions",
            quiz_id,
            course_id,
            question_count
        );
        Ok(quiz_id)
    }

    pub async fn list_courses(&self) -> AppResult<Vec<Course>> {
        self.courses.find_all().await
    }

    pub async fn list_quizzes(&self) -> AppResult<Vec<Quiz>> {
        self.quizzes.find_all().await
    }

    pub async fn report(&self) -> AppResult<Vec<ReportRow>> {
        self.attempts.report_rows().await
    }
}
