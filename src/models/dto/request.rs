use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

const CREDENTIALS_REQUIRED: &str = "regno and password required";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "regno and password required"))]
    pub regno: String,

    #[validate(length(max = 100, message = "name must be at most 100 characters"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 256, message = "regno and password required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "regno and password required"))]
    pub regno: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "regno and password required"))]
    pub password: String,
}

impl RegisterRequest {
    /// Whitespace-only input counts as missing.
    pub fn check(&self) -> Result<(), crate::errors::AppError> {
        self.validate()?;
        if self.regno.trim().is_empty() {
            return Err(crate::errors::AppError::ValidationError(
                CREDENTIALS_REQUIRED.to_string(),
            ));
        }
        Ok(())
    }
}

impl LoginRequest {
    pub fn check(&self) -> Result<(), crate::errors::AppError> {
        self.validate()?;
        if self.regno.trim().is_empty() {
            return Err(crate::errors::AppError::ValidationError(
                CREDENTIALS_REQUIRED.to_string(),
            ));
        }
        Ok(())
    }
}

/// Map from question id to the chosen choice id, as sent by the browser.
/// Values are kept raw and coerced during scoring.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default, deserialize_with = "answers_or_empty")]
    pub answers: HashMap<String, Value>,
}

/// Anything other than a JSON object counts as no answers at all.
fn answers_or_empty<'de, D>(deserializer: D) -> Result<HashMap<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().collect(),
        _ => HashMap::new(),
    })
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "title required"))]
    pub title: String,

    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateChoiceRequest {
    #[serde(default)]
    pub text: String,

    #[serde(default, deserialize_with = "correct_flag")]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub choices: Vec<CreateChoiceRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(required(message = "course_id and questions required"))]
    pub course_id: Option<i64>,

    pub title: Option<String>,

    #[validate(required(message = "course_id and questions required"))]
    pub questions: Option<Vec<CreateQuestionRequest>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(required(message = "course_id and filename required"))]
    pub course_id: Option<i64>,

    #[serde(default)]
    #[validate(length(min = 1, message = "course_id and filename required"))]
    pub filename: String,

    pub original_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PromoteRequest {
    #[validate(required(message = "id and is_admin required"))]
    pub id: Option<i64>,

    #[validate(required(message = "id and is_admin required"))]
    #[serde(default, deserialize_with = "flag_from_bool_or_int")]
    pub is_admin: Option<bool>,
}

/// Accepts `true`/`false` as well as `1`/`0` for the admin flag.
fn flag_from_bool_or_int<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(flag)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(serde::de::Error::custom("is_admin must be 0 or 1")),
        },
        Some(_) => Err(serde::de::Error::custom("is_admin must be a boolean")),
    }
}

fn correct_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(flag_from_bool_or_int(deserializer)?.unwrap_or(false))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

impl ReportQuery {
    pub fn report_format(&self) -> Result<ReportFormat, crate::errors::AppError> {
        match self.format.as_deref().map(|f| f.trim().to_ascii_lowercase()) {
            None => Ok(ReportFormat::Json),
            Some(f) if f.is_empty() || f == "json" => Ok(ReportFormat::Json),
            Some(f) if f == "csv" => Ok(ReportFormat::Csv),
            Some(_) => Err(crate::errors::AppError::ValidationError(
                "format must be csv or json".to_string(),
            )),
        }
    }
}
