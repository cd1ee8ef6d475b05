use actix_web::web;

use crate::{auth::AuthMiddleware, errors::AppError};

pub mod admin_handler;
pub mod auth_handler;
pub mod course_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod user_handler;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::NotFound("Not found".to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

/// Full route table. Registration, login and health checks are public;
/// everything else under `/api` passes through [`AuthMiddleware`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(health_handler::health_check)
        .service(health_handler::health_check_ready)
        .service(auth_handler::register)
        .service(auth_handler::login)
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(course_handler::list_courses)
                .service(course_handler::get_course)
                .service(course_handler::list_materials)
                .service(course_handler::download_material)
                .service(quiz_handler::get_course_quiz)
                .service(quiz_handler::submit_quiz)
                .service(user_handler::me)
                .service(user_handler::my_attempts)
                .service(
                    web::scope("/admin")
                        .service(admin_handler::create_course)
                        .service(admin_handler::create_quiz)
                        .service(admin_handler::create_material)
                        .service(admin_handler::list_courses)
                        .service(admin_handler::list_quizzes)
                        .service(admin_handler::list_users)
                        .service(admin_handler::promote)
                        .service(admin_handler::report),
                ),
        );
}
