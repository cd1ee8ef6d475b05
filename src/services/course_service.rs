use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Course, Material, NewMaterial},
        dto::{request::CreateMaterialRequest, response::MaterialDto},
    },
    repositories::CourseRepository,
};

/// A material resolved to a file on disk, ready to be streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub path: PathBuf,
    pub download_name: String,
}

pub struct CourseService {
    repository: Arc<dyn CourseRepository>,
    materials_dir: PathBuf,
}

/// Stored filenames must name a file directly inside the materials directory.
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('\\')
}

impl CourseService {
    pub fn new(repository: Arc<dyn CourseRepository>, materials_dir: PathBuf) -> Self {
        Self {
            repository,
            materials_dir,
        }
    }

    pub fn materials_dir(&self) -> &Path {
        &self.materials_dir
    }

    pub async fn list_courses(&self) -> AppResult<Vec<Course>> {
        self.repository.find_all().await
    }

    pub async fn get_course(&self, id: i64) -> AppResult<Course> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    pub async fn list_materials(&self, course_id: i64) -> AppResult<Vec<MaterialDto>> {
        let materials = self.repository.find_materials(course_id).await?;
        Ok(materials.into_iter().map(MaterialDto::from).collect())
    }

    async fn file_exists(&self, filename: &str) -> bool {
        if !is_plain_file_name(filename) {
            return false;
        }
        tokio::fs::metadata(self.materials_dir.join(filename))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    pub async fn resolve_download(&self, material_id: i64) -> AppResult<ResolvedDownload> {
        let material = self
            .repository
            .find_material(material_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

        if !self.file_exists(&material.filename).await {
            log::warn!(
                "Material {} points at missing file {}",
                material.id,
                material.filename
            );
            return Err(AppError::NotFound("File missing".to_string()));
        }

        Ok(ResolvedDownload {
            path: self.materials_dir.join(&material.filename),
            download_name: material.download_name().to_string(),
        })
    }

    pub async fn register_material(&self, request: CreateMaterialRequest) -> AppResult<Material> {
        validator::Validate::validate(&request)?;
        let course_id = request.course_id.unwrap_or_default();
        let filename = request.filename.trim().to_string();

        if !is_plain_file_name(&filename) {
            return Err(AppError::ValidationError(
                "filename must be a plain file name".to_string(),
            ));
        }

        self.get_course(course_id).await?;

        if !self.file_exists(&filename).await {
            return Err(AppError::ValidationError(format!(
                "File '{}' is not present in the materials directory",
                filename
            )));
        }

        let original_name = request
            .original_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let material = self
            .repository
            .create_material(NewMaterial {
                course_id,
                filename,
                original_name,
            })
            .await?;

        log::info!(
            "Registered material {} for course {}",
            material.id,
            material.course_id
        );
        Ok(material)
    }
}
