use actix_web::{
    get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web, HttpResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AdminUser,
    errors::AppError,
    models::dto::{
        request::{
            CreateCourseRequest, CreateMaterialRequest, CreateQuizRequest, PromoteRequest,
            ReportFormat, ReportQuery,
        },
        response::{CreatedQuizResponse, MaterialDto},
    },
    services::admin_service::render_report_csv,
};

#[post("/course")]
pub async fn create_course(
    state: web::Data<AppState>,
    _admin: AdminUser,
    request: web::Json<CreateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    let course = state.admin_service.create_course(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(course))
}

#[post("/quiz")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    _admin: AdminUser,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz_id = state.admin_service.create_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CreatedQuizResponse { quiz_id }))
}

#[post("/material")]
pub async fn create_material(
    state: web::Data<AppState>,
    _admin: AdminUser,
    request: web::Json<CreateMaterialRequest>,
) -> Result<HttpResponse, AppError> {
    let material = state
        .course_service
        .register_material(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "material": MaterialDto::from(material) })))
}

#[get("/courses")]
pub async fn list_courses(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let courses = state.admin_service.list_courses().await?;
    Ok(HttpResponse::Ok().json(json!({ "courses": courses })))
}

#[get("/quizzes")]
pub async fn list_quizzes(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.admin_service.list_quizzes().await?;
    Ok(HttpResponse::Ok().json(json!({ "quizzes": quizzes })))
}

#[get("/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let users = state.user_service.list_users().await?;
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

#[post("/promote")]
pub async fn promote(
    state: web::Data<AppState>,
    admin: AdminUser,
    request: web::Json<PromoteRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    let (Some(id), Some(is_admin)) = (request.id, request.is_admin) else {
        return Err(AppError::ValidationError("id and is_admin required".to_string()));
    };

    let user = state.user_service.set_admin(id, is_admin).await?;
    log::info!("Admin {} set is_admin={} on user {}", admin.0.regno, is_admin, id);
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

#[get("/report")]
pub async fn report(
    state: web::Data<AppState>,
    _admin: AdminUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let format = query.report_format()?;
    let rows = state.admin_service.report().await?;

    match format {
        ReportFormat::Json => Ok(HttpResponse::Ok().json(json!({ "report": rows }))),
        ReportFormat::Csv => {
            let csv = render_report_csv(&rows)?;
            Ok(HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename("report.csv".to_string())],
                })
                .body(csv))
        }
    }
}
