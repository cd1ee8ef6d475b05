use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{app_state::AppState, auth::AuthenticatedUser, errors::AppError};

/// The caller's current record. The admin flag comes from the store, not the token.
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(auth.0.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

#[get("/me/attempts")]
pub async fn my_attempts(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempts = state.quiz_service.list_attempts(auth.0.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "attempts": attempts })))
}
