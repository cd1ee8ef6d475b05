use elearn_portal::{
    config::Config,
    db::Database,
    errors::AppError,
    models::domain::{NewAttempt, NewChoice, NewMaterial, NewQuestion, NewQuiz, NewUser},
    repositories::{
        AttemptRepository, CourseRepository, QuizRepository, SqliteAttemptRepository,
        SqliteCourseRepository, SqliteQuizRepository, SqliteUserRepository, UserRepository,
    },
};

async fn database() -> Database {
    Database::connect(&Config::test_config())
        .await
        .expect("in-memory database")
}

fn question(text: &str, choices: &[(&str, bool)]) -> NewQuestion {
    NewQuestion {
        text: text.to_string(),
        choices: choices
            .iter()
            .map(|(text, is_correct)| NewChoice {
                text: text.to_string(),
                is_correct: *is_correct,
            })
            .collect(),
    }
}

async fn count(db: &Database, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(db.pool())
        .await
        .unwrap();
    n
}

#[actix_web::test]
async fn test_user_regno_is_unique() {
    let db = database().await;
    let users = SqliteUserRepository::new(&db);

    let first = users
        .create(NewUser::new("REG/001", Some("Jane"), "hash".to_string()))
        .await
        .unwrap();
    assert!(!first.is_admin);
    assert_eq!(first.name.as_deref(), Some("Jane"));

    let duplicate = users
        .create(NewUser::new("REG/001", None, "other".to_string()))
        .await;
    assert!(matches!(duplicate, Err(AppError::DuplicateKey(_))));

    let found = users.find_by_regno("REG/001").await.unwrap().unwrap();
    assert_eq!(found.id, first.id);
    assert!(users.find_by_regno("REG/999").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_set_admin_keeps_one_admin() {
    let db = database().await;
    let users = SqliteUserRepository::new(&db);

    let a = users
        .create(NewUser::new("A", None, "h".to_string()).admin())
        .await
        .unwrap();
    let b = users
        .create(NewUser::new("B", None, "h".to_string()))
        .await
        .unwrap();

    assert!(!users.set_admin(a.id, false).await.unwrap());
    assert!(users.set_admin(b.id, true).await.unwrap());
    assert!(users.set_admin(a.id, false).await.unwrap());
    assert!(!users.set_admin(b.id, false).await.unwrap());
    // Demoting a learner is always allowed.
    assert!(users.set_admin(a.id, false).await.unwrap());
    assert!(!users.set_admin(999, true).await.unwrap());

    let admins: Vec<_> = users
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|u| u.is_admin)
        .collect();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].id, b.id);
}

#[actix_web::test]
async fn test_materials_are_listed_in_insertion_order() {
    let db = database().await;
    let courses = SqliteCourseRepository::new(&db);

    let course = courses.create("Rust", None).await.unwrap();
    for name in ["b.pdf", "a.pdf"] {
        courses
            .create_material(NewMaterial {
                course_id: course.id,
                filename: name.to_string(),
                original_name: None,
            })
            .await
            .unwrap();
    }

    let materials = courses.find_materials(course.id).await.unwrap();
    let names: Vec<_> = materials.iter().map(|m| m.filename.as_str()).collect();
    assert_eq!(names, vec!["b.pdf", "a.pdf"]);
    assert_eq!(materials[0].download_name(), "b.pdf");

    let missing_course = courses
        .create_material(NewMaterial {
            course_id: 999,
            filename: "x.pdf".to_string(),
            original_name: None,
        })
        .await;
    assert!(missing_course.is_err());
}

#[actix_web::test]
async fn test_quiz_rows_are_grouped_by_question_then_choice() {
    let db = database().await;
    let courses = SqliteCourseRepository::new(&db);
    let quizzes = SqliteQuizRepository::new(&db);

    let course = courses.create("Rust", None).await.unwrap();
    let quiz_id = quizzes
        .create_with_questions(NewQuiz {
            course_id: course.id,
            title: Some("Basics".to_string()),
            questions: vec![
                question("Q1", &[("a", false), ("b", true)]),
                question("Q2", &[("c", true), ("d", false), ("e", false)]),
            ],
        })
        .await
        .unwrap();

    let rows = quizzes.find_question_rows(quiz_id).await.unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.windows(2).all(|w| {
        (w[0].question_id, w[0].choice_id) < (w[1].question_id, w[1].choice_id)
    }));
    assert_eq!(rows.iter().filter(|r| r.is_correct).count(), 2);

    let first = quizzes
        .find_first_for_course(course.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.id, quiz_id);
    assert!(quizzes.find_first_for_course(999).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_quiz_creation_rolls_back_on_failure() {
    let db = database().await;
    let courses = SqliteCourseRepository::new(&db);
    let quizzes = SqliteQuizRepository::new(&db);
    let course = courses.create("Rust", None).await.unwrap();

    sqlx::query(
        "CREATE TRIGGER reject_choice BEFORE INSERT ON choices \
         WHEN NEW.text = 'boom' BEGIN SELECT RAISE(ABORT, 'rejected'); END",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let result = quizzes
        .create_with_questions(NewQuiz {
            course_id: course.id,
            title: None,
            questions: vec![
                question("Q1", &[("fine", true)]),
                question("Q2", &[("boom", true)]),
            ],
        })
        .await;

    assert!(result.is_err());
    assert_eq!(count(&db, "quizzes").await, 0);
    assert_eq!(count(&db, "questions").await, 0);
    assert_eq!(count(&db, "choices").await, 0);
}

#[actix_web::test]
async fn test_report_joins_users_and_quizzes() {
    let db = database().await;
    let users = SqliteUserRepository::new(&db);
    let courses = SqliteCourseRepository::new(&db);
    let quizzes = SqliteQuizRepository::new(&db);
    let attempts = SqliteAttemptRepository::new(&db);

    let user = users
        .create(NewUser::new("REG/001", Some("Doe, Jane"), "h".to_string()))
        .await
        .unwrap();
    let course = courses.create("Rust", None).await.unwrap();
    let quiz_id = quizzes
        .create_with_questions(NewQuiz {
            course_id: course.id,
            title: Some("Basics".to_string()),
            questions: vec![question("Q1", &[("a", true)])],
        })
        .await
        .unwrap();

    attempts
        .create(NewAttempt::now(user.id, quiz_id, 100))
        .await
        .unwrap();
    attempts
        .create(NewAttempt::now(user.id, quiz_id, 0))
        .await
        .unwrap();

    let unknown_quiz = attempts.create(NewAttempt::now(user.id, 999, 0)).await;
    assert!(unknown_quiz.is_err());

    let rows = attempts.report_rows().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].regno, "REG/001");
    assert_eq!(rows[0].name.as_deref(), Some("Doe, Jane"));
    assert_eq!(rows[0].quiz_title.as_deref(), Some("Basics"));
    assert_eq!(rows[0].score, 100);
    assert_eq!(rows[1].score, 0);

    let mine = attempts.find_by_user(user.id).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine[0].id < mine[1].id);
}
