use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Course, Material, NewMaterial},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Course>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Course>>;
    async fn create(&self, title: &str, description: Option<String>) -> AppResult<Course>;
    async fn find_materials(&self, course_id: i64) -> AppResult<Vec<Material>>;
    async fn find_material(&self, id: i64) -> AppResult<Option<Material>>;
    async fn create_material(&self, material: NewMaterial) -> AppResult<Material>;
}

pub struct SqliteCourseRepository {
    pool: SqlitePool,
}

impl SqliteCourseRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    async fn find_all(&self) -> AppResult<Vec<Course>> {
        let courses =
            sqlx::query_as::<_, Course>("SELECT id, title, description FROM courses ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(courses)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Course>> {
        let course =
            sqlx::query_as::<_, Course>("SELECT id, title, description FROM courses WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(course)
    }

    async fn create(&self, title: &str, description: Option<String>) -> AppResult<Course> {
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (title, description) VALUES (?, ?) \
             RETURNING id, title, description",
        )
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(course)
    }

    async fn find_materials(&self, course_id: i64) -> AppResult<Vec<Material>> {
        let materials = sqlx::query_as::<_, Material>(
            "SELECT id, course_id, filename, original_name FROM materials \
             WHERE course_id = ? ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(materials)
    }

    async fn find_material(&self, id: i64) -> AppResult<Option<Material>> {
        let material = sqlx::query_as::<_, Material>(
            "SELECT id, course_id, filename, original_name FROM materials WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(material)
    }

    async fn create_material(&self, material: NewMaterial) -> AppResult<Material> {
        let created = sqlx::query_as::<_, Material>(
            "INSERT INTO materials (course_id, filename, original_name) VALUES (?, ?, ?) \
             RETURNING id, course_id, filename, original_name",
        )
        .bind(material.course_id)
        .bind(&material.filename)
        .bind(&material.original_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
