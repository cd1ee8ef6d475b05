use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Material {
    pub id: i64,
    pub course_id: i64,
    #[serde(skip_serializing)]
    pub filename: String,
    pub original_name: Option<String>,
}

impl Material {
    /// Name offered to the browser when the file is downloaded.
    pub fn download_name(&self) -> &str {
        self.original_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.filename)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMaterial {
    pub course_id: i64,
    pub filename: String,
    pub original_name: Option<String>,
}
