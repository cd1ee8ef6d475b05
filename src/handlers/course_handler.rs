use actix_files::NamedFile;
use actix_web::{
    get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpRequest, HttpResponse,
};
use serde_json::json;

use crate::{app_state::AppState, auth::AuthenticatedUser, errors::AppError};

#[get("/courses")]
pub async fn list_courses(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let courses = state.course_service.list_courses().await?;
    Ok(HttpResponse::Ok().json(json!({ "courses": courses })))
}

#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state.course_service.get_course(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "course": course })))
}

#[get("/courses/{id}/materials")]
pub async fn list_materials(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let materials = state.course_service.list_materials(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "materials": materials })))
}

/// Streams the material file as an attachment named after its original upload.
#[get("/materials/{id}/download")]
pub async fn download_material(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<i64>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let download = state.course_service.resolve_download(id.into_inner()).await?;

    let file = NamedFile::open_async(&download.path).await.map_err(|e| {
        AppError::InternalError(format!(
            "Cannot open material file {}: {}",
            download.path.display(),
            e
        ))
    })?;

    Ok(file
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(download.download_name)],
        })
        .into_response(&req))
}
