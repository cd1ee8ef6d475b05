use std::{collections::HashMap, sync::Arc};

use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{NewAttempt, QuestionChoiceRow},
        dto::{
            quiz_dto::{ChoiceView, QuestionView, QuizView},
            response::{AttemptDto, ScoreResponse},
        },
    },
    repositories::{AttemptRepository, QuizRepository},
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

/// Groups the flat question x choice relation by question. Questions keep
/// their first-seen order and choices are appended in the order encountered.
/// Correctness flags are dropped here, before anything reaches a client.
pub fn group_questions(rows: Vec<QuestionChoiceRow>) -> Vec<QuestionView> {
    let mut questions: Vec<QuestionView> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let index = *positions.entry(row.question_id).or_insert_with(|| {
            questions.push(QuestionView {
                id: row.question_id,
                text: row.question_text.clone(),
                choices: Vec::new(),
            });
            questions.len() - 1
        });

        questions[index].choices.push(ChoiceView {
            id: row.choice_id,
            text: row.choice_text,
        });
    }

    questions
}

/// Maps each question to its correct choice. When a question has several
/// choices flagged correct, the last one seen wins.
pub fn correct_choices(rows: &[QuestionChoiceRow]) -> HashMap<i64, i64> {
    rows.iter()
        .filter(|row| row.is_correct)
        .map(|row| (row.question_id, row.choice_id))
        .collect()
}

/// Reads a submitted choice id the way a form value would be read as an
/// integer: integers as-is, floats truncated, strings by their leading
/// signed digits. Anything else never matches.
pub fn coerce_choice_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Percentage of questions answered with their correct choice, rounded to
/// the nearest integer. A quiz without any correct choice scores 0.
pub fn score_percent(correct: &HashMap<i64, i64>, answers: &HashMap<String, Value>) -> i64 {
    let total = correct.len().max(1);

    let score = correct
        .iter()
        .filter(|(question_id, choice_id)| {
            answers
                .get(&question_id.to_string())
                .and_then(coerce_choice_id)
                .is_some_and(|chosen| chosen == **choice_id)
        })
        .count();

    ((score as f64 / total as f64) * 100.0).round() as i64
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { quizzes, attempts }
    }

    pub async fn get_quiz_for_course(&self, course_id: i64) -> AppResult<QuizView> {
        let quiz = self
            .quizzes
            .find_first_for_course(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let rows = self.quizzes.find_question_rows(quiz.id).await?;

        Ok(QuizView {
            id: quiz.id,
            title: quiz.title,
            questions: group_questions(rows),
        })
    }

    /// Scores a submission and records the attempt. The computed score is
    /// returned even when the attempt cannot be stored.
    pub async fn submit_attempt(
        &self,
        quiz_id: i64,
        user_id: i64,
        answers: &HashMap<String, Value>,
    ) -> AppResult<ScoreResponse> {
        let rows = self.quizzes.find_question_rows(quiz_id).await?;
        let correct = correct_choices(&rows);
        let percent = score_percent(&correct, answers);

        if let Err(e) = self
            .attempts
            .create(NewAttempt::now(user_id, quiz_id, percent))
            .await
        {
            log::error!(
                "Failed to save attempt for user {} on quiz {}: {}",
                user_id,
                quiz_id,
                e
            );
        }

        Ok(ScoreResponse { score: percent })
    }

    pub async fn list_attempts(&self, user_id: i64) -> AppResult<Vec<AttemptDto>> {
        let attempts = self.attempts.find_by_user(user_id).await?;
        Ok(attempts.into_iter().map(AttemptDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{Attempt, Quiz},
        repositories::{MockAttemptRepository, MockQuizRepository},
    };
    use mockall::predicate::eq;
    use serde_json::json;

    fn row(question_id: i64, choice_id: i64, is_correct: bool) -> QuestionChoiceRow {
        QuestionChoiceRow {
            question_id,
            question_text: format!("Question {}", question_id),
            choice_id,
            choice_text: format!("Choice {}", choice_id),
            is_correct,
        }
    }

    /// Two questions, each with exactly one correct choice (11 and 22).
    fn two_question_rows() -> Vec<QuestionChoiceRow> {
        vec![
            row(1, 11, true),
            row(1, 12, false),
            row(2, 21, false),
            row(2, 22, true),
        ]
    }

    fn answers(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    fn stored_attempt(attempt: NewAttempt) -> Attempt {
        Attempt {
            id: 1,
            user_id: attempt.user_id,
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            taken_at: attempt.taken_at,
        }
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let grouped = group_questions(vec![row(1, 1, false), row(1, 2, true), row(2, 3, false)]);

        let question_ids: Vec<i64> = grouped.iter().map(|q| q.id).collect();
        let first_choices: Vec<i64> = grouped[0].choices.iter().map(|c| c.id).collect();

        assert_eq!(question_ids, vec![1, 2]);
        assert_eq!(first_choices, vec![1, 2]);
        assert_eq!(grouped[1].choices.len(), 1);
    }

    #[test]
    fn test_grouping_handles_interleaved_rows() {
        let grouped = group_questions(vec![
            row(5, 50, false),
            row(3, 30, false),
            row(5, 51, false),
        ]);

        assert_eq!(grouped.iter().map(|q| q.id).collect::<Vec<_>>(), vec![5, 3]);
        assert_eq!(
            grouped[0].choices.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![50, 51]
        );
    }

    #[test]
    fn test_grouped_quiz_never_exposes_correctness() {
        let json = serde_json::to_value(group_questions(two_question_rows())).unwrap();
        for question in json.as_array().unwrap() {
            for choice in question["choices"].as_array().unwrap() {
                let keys: Vec<&String> = choice.as_object().unwrap().keys().collect();
                assert_eq!(keys.len(), 2);
                assert!(choice.get("is_correct").is_none());
            }
        }
    }

    #[test]
    fn test_last_flagged_choice_wins() {
        let correct = correct_choices(&[row(1, 10, true), row(1, 11, true), row(1, 12, false)]);
        assert_eq!(correct.get(&1), Some(&11));
    }

    #[test]
    fn test_score_all_correct() {
        let correct = correct_choices(&two_question_rows());
        assert_eq!(score_percent(&correct, &answers(json!({"1": 11, "2": 22}))), 100);
    }

    #[test]
    fn test_score_half_correct() {
        let correct = correct_choices(&two_question_rows());
        assert_eq!(score_percent(&correct, &answers(json!({"1": "11", "2": "21"}))), 50);
    }

    #[test]
    fn test_score_no_answers() {
        let correct = correct_choices(&two_question_rows());
        assert_eq!(score_percent(&correct, &HashMap::new()), 0);
    }

    #[test]
    fn test_score_without_correct_choices_is_floored() {
        let correct = correct_choices(&[row(1, 10, false), row(1, 11, false)]);
        assert!(correct.is_empty());
        assert_eq!(score_percent(&correct, &answers(json!({"1": 10}))), 0);
    }

    #[test]
    fn test_score_rounds_to_nearest() {
        let rows = vec![row(1, 1, true), row(2, 2, true), row(3, 3, true)];
        let correct = correct_choices(&rows);
        assert_eq!(
            score_percent(&correct, &answers(json!({"1": 1, "2": 2, "3": 0}))),
            67
        );
        assert_eq!(score_percent(&correct, &answers(json!({"1": 1}))), 33);
    }

    #[test]
    fn test_malformed_answers_do_not_match() {
        let correct = correct_choices(&two_question_rows());
        let submitted = answers(json!({"1": null, "2": {"id": 22}, "x": 11}));
        assert_eq!(score_percent(&correct, &submitted), 0);
    }

    #[test]
    fn test_choice_id_coercion() {
        assert_eq!(coerce_choice_id(&json!(7)), Some(7));
        assert_eq!(coerce_choice_id(&json!(7.9)), Some(7));
        assert_eq!(coerce_choice_id(&json!(" 42 ")), Some(42));
        assert_eq!(coerce_choice_id(&json!("42abc")), Some(42));
        assert_eq!(coerce_choice_id(&json!("-3")), Some(-3));
        assert_eq!(coerce_choice_id(&json!("abc")), None);
        assert_eq!(coerce_choice_id(&json!("")), None);
        assert_eq!(coerce_choice_id(&json!(true)), None);
        assert_eq!(coerce_choice_id(&Value::Null), None);
    }

    #[actix_web::test]
    async fn test_get_quiz_for_course() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_first_for_course()
            .with(eq(4))
            .returning(|course_id| {
                Ok(Some(Quiz {
                    id: 9,
                    course_id,
                    title: Some("Intro Quiz".to_string()),
                }))
            });
        quizzes
            .expect_find_question_rows()
            .with(eq(9))
            .returning(|_| Ok(two_question_rows()));

        let service = QuizService::new(Arc::new(quizzes), Arc::new(MockAttemptRepository::new()));
        let quiz = service.get_quiz_for_course(4).await.unwrap();

        assert_eq!(quiz.id, 9);
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[1].choices[1].id, 22);
    }

    #[actix_web::test]
    async fn test_get_quiz_for_course_without_quiz() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_first_for_course().returning(|_| Ok(None));

        let service = QuizService::new(Arc::new(quizzes), Arc::new(MockAttemptRepository::new()));
        assert!(matches!(
            service.get_quiz_for_course(1).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_submit_records_attempt() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_question_rows()
            .returning(|_| Ok(two_question_rows()));
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_create()
            .withf(|a| a.user_id == 3 && a.quiz_id == 9 && a.score == 50)
            .times(1)
            .returning(|a| Ok(stored_attempt(a)));

        let service = QuizService::new(Arc::new(quizzes), Arc::new(attempts));
        let result = service
            .submit_attempt(9, 3, &answers(json!({"1": 11})))
            .await
            .unwrap();

        assert_eq!(result.score, 50);
    }

    #[actix_web::test]
    async fn test_submit_survives_attempt_persistence_failure() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_question_rows()
            .returning(|_| Ok(two_question_rows()));
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_create()
            .returning(|_| Err(AppError::DatabaseError("disk I/O error".to_string())));

        let service = QuizService::new(Arc::new(quizzes), Arc::new(attempts));
        let result = service
            .submit_attempt(9, 3, &answers(json!({"1": 11, "2": 22})))
            .await
            .unwrap();

        assert_eq!(result.score, 100);
    }

    #[actix_web::test]
    async fn test_submit_unknown_quiz_scores_zero() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_question_rows().returning(|_| Ok(vec![]));
        let mut attempts = MockAttemptRepository::new();
        attempts
            .expect_create()
            .withf(|a| a.quiz_id == 404 && a.score == 0)
            .returning(|a| Ok(stored_attempt(a)));

        let service = QuizService::new(Arc::new(quizzes), Arc::new(attempts));
        let result = service
            .submit_attempt(404, 3, &answers(json!({"1": 11})))
            .await
            .unwrap();

        assert_eq!(result.score, 0);
    }
}
