use serde::Serialize;

/// A choice as shown to a learner. It has no correctness field, so a
/// serialized quiz can never reveal the expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: i64,
    pub text: String,
    pub choices: Vec<ChoiceView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub id: i64,
    pub title: Option<String>,
    pub questions: Vec<QuestionView>,
}
