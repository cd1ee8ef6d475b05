pub mod attempt;
pub mod course;
pub mod quiz;
pub mod user;
pub use attempt::{Attempt, NewAttempt, ReportRow};
pub use course::{Course, Material, NewMaterial};
pub use quiz::{NewChoice, NewQuestion, NewQuiz, QuestionChoiceRow, Quiz};
pub use user::{NewUser, User};
