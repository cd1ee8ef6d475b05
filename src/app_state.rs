use std::sync::Arc;

use crate::{
    auth::{JwtService, PasswordService},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        SqliteAttemptRepository, SqliteCourseRepository, SqliteQuizRepository,
        SqliteUserRepository,
    },
    services::{AdminService, CourseService, QuizService, UserService},
};

/// Everything a request handler needs. The database handle is passed in
/// explicitly, so tests can build as many independent states as they like.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt_service: Arc<JwtService>,
    pub user_service: Arc<UserService>,
    pub course_service: Arc<CourseService>,
    pub quiz_service: Arc<QuizService>,
    pub admin_service: Arc<AdminService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        Self::with_database(config, db)
    }

    pub fn with_database(config: Config, db: Database) -> AppResult<Self> {
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        let passwords = PasswordService::new(&config.password)?;

        let users = Arc::new(SqliteUserRepository::new(&db));
        let courses = Arc::new(SqliteCourseRepository::new(&db));
        let quizzes = Arc::new(SqliteQuizRepository::new(&db));
        let attempts = Arc::new(SqliteAttemptRepository::new(&db));

        let user_service = Arc::new(UserService::new(users, passwords, jwt_service.clone()));
        let course_service = Arc::new(CourseService::new(
            courses.clone(),
            config.materials_dir.clone(),
        ));
        let quiz_service = Arc::new(QuizService::new(quizzes.clone(), attempts.clone()));
        let admin_service = Arc::new(AdminService::new(courses, quizzes, attempts));

        Ok(Self {
            db,
            jwt_service: Arc::new(jwt_service),
            user_service,
            course_service,
            quiz_service,
            admin_service,
            config: Arc::new(config),
        })
    }

    /// Start-up tasks that depend on configuration: demo seed and bootstrap admin.
    pub async fn bootstrap(&self) -> AppResult<()> {
        if self.config.seed_demo_data {
            crate::db::seed::seed_demo_data(&self.db, &self.config.materials_dir).await?;
        }

        if let (Some(regno), Some(password)) =
            (&self.config.admin_regno, &self.config.admin_password)
        {
            use secrecy::ExposeSecret;
            self.user_service
                .ensure_admin(regno, password.expose_secret())
                .await?;
        }

        Ok(())
    }
}
