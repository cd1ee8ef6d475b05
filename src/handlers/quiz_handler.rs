use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::SubmitQuizRequest,
};

/// The quiz of a course, without correctness flags.
#[get("/courses/{id}/quiz")]
pub async fn get_course_quiz(
    state: web::Data<AppState>,
    course_id: web::Path<i64>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .get_quiz_for_course(course_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "quiz": quiz })))
}

/// A missing or unreadable body is scored as a submission with no answers.
#[post("/quizzes/{id}/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<i64>,
    auth: AuthenticatedUser,
    request: Result<web::Json<SubmitQuizRequest>, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    let request = match request {
        Ok(request) => request.into_inner(),
        Err(e) => {
            log::debug!("Submission body ignored: {}", e);
            SubmitQuizRequest::default()
        }
    };

    let response = state
        .quiz_service
        .submit_attempt(quiz_id.into_inner(), auth.0.id, &request.answers)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
