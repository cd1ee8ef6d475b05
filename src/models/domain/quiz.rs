use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Quiz {
    pub id: i64,
    pub course_id: i64,
    pub title: Option<String>,
}

/// One row of the question x choice join, in store order.
#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct QuestionChoiceRow {
    pub question_id: i64,
    pub question_text: String,
    pub choice_id: i64,
    pub choice_text: String,
    pub is_correct: bool,
}

/// A quiz to be created in one transaction, questions and choices included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuiz {
    pub course_id: i64,
    pub title: Option<String>,
    pub questions: Vec<NewQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuestion {
    pub text: String,
    pub choices: Vec<NewChoice>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewChoice {
    pub text: String,
    pub is_correct: bool,
}
