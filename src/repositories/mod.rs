pub mod attempt_repository;
pub mod course_repository;
pub mod quiz_repository;
pub mod user_repository;

pub use attempt_repository::{AttemptRepository, SqliteAttemptRepository};
pub use course_repository::{CourseRepository, SqliteCourseRepository};
pub use quiz_repository::{QuizRepository, SqliteQuizRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};

#[cfg(test)]
pub use attempt_repository::MockAttemptRepository;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
#[cfg(test)]
pub use quiz_repository::MockQuizRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
