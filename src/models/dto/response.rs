use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Attempt, Material, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub regno: String,
    pub name: Option<String>,
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            regno: user.regno,
            name: user.name,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialDto {
    pub id: i64,
    pub original_name: Option<String>,
}

impl From<Material> for MaterialDto {
    fn from(material: Material) -> Self {
        MaterialDto {
            id: material.id,
            original_name: material.original_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptDto {
    pub id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub taken_at: DateTime<Utc>,
}

impl From<Attempt> for AttemptDto {
    fn from(attempt: Attempt) -> Self {
        AttemptDto {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            taken_at: attempt.taken_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreResponse {
    pub score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatedQuizResponse {
    #[serde(rename = "quizId")]
    pub quiz_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_from_user() {
        let mut user = User::test_user(7, "REG/007");
        user.is_admin = true;

        let dto: UserDto = user.into();
        assert_eq!(dto.id, 7);
        assert_eq!(dto.regno, "REG/007");
        assert!(dto.is_admin);
    }

    #[test]
    fn test_material_dto_hides_stored_filename() {
        let material = Material {
            id: 2,
            course_id: 1,
            filename: "stored-name.pdf".to_string(),
            original_name: Some("Notes.pdf".to_string()),
        };

        let json = serde_json::to_value(MaterialDto::from(material)).unwrap();
        assert_eq!(json["original_name"], "Notes.pdf");
        assert!(json.get("filename").is_none());
    }

    #[test]
    fn test_created_quiz_uses_camel_case_key() {
        let json = serde_json::to_value(CreatedQuizResponse { quiz_id: 4 }).unwrap();
        assert_eq!(json["quizId"], 4);
    }
}
