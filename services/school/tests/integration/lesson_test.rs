use campus_school::error::SchoolServiceError;
use campus_school::usecase::lesson::{
    AddLessonInput, AddLessonUseCase, DeleteLessonUseCase, EditLessonInput, EditLessonUseCase,
    GetLessonUseCase,
};

use crate::helpers::{MockLessonRepo, MockSubjectRepo, MockUserRepo, TestSchool};

fn add_uc(school: &TestSchool) -> AddLessonUseCase<MockUserRepo, MockSubjectRepo, MockLessonRepo> {
    AddLessonUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
        lessons: school.lesson_repo(),
    }
}

fn edit_uc(
    school: &TestSchool,
) -> EditLessonUseCase<MockUserRepo, MockSubjectRepo, MockLessonRepo> {
    EditLessonUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
        lessons: school.lesson_repo(),
    }
}

fn delete_uc(
    school: &TestSchool,
) -> DeleteLessonUseCase<MockUserRepo, MockSubjectRepo, MockLessonRepo> {
    DeleteLessonUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
        lessons: school.lesson_repo(),
    }
}

#[tokio::test]
async fn should_forbid_lesson_mutation_by_students() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let student = school.add_student("alice");
    let subject = school.add_subject("MAT", "Mathematics", teacher);
    school.enroll(student, subject.id);
    let lesson = school.add_lesson(subject.id, "Fractions");
    let code = "MAT".parse().unwrap();

    let result = add_uc(&school)
        .execute(
            student,
            &code,
            AddLessonInput {
                title: "Decimals".to_owned(),
                content: None,
            },
        )
        .await;
    assert!(
        matches!(result, Err(SchoolServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );

    let result = edit_uc(&school)
        .execute(
            student,
            &code,
            lesson.id,
            EditLessonInput {
                title: Some("Hijacked".to_owned()),
                content: None,
            },
        )
        .await;
    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));

    let result = delete_uc(&school).execute(student, &code, lesson.id).await;
    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));

    let lessons = school.lessons.lock().unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].title, "Fractions");
}

#[tokio::test]
async fn should_forbid_lesson_mutation_by_non_owning_teacher() {
    let school = TestSchool::default();
    let owner = school.add_teacher("prof");
    let other = school.add_teacher("rival");
    let subject = school.add_subject("MAT", "Mathematics", owner);
    let lesson = school.add_lesson(subject.id, "Fractions");
    let code = "MAT".parse().unwrap();

    let result = add_uc(&school)
        .execute(
            other,
            &code,
            AddLessonInput {
                title: "Decimals".to_owned(),
                content: None,
            },
        )
        .await;
    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));

    let result = edit_uc(&school)
        .execute(
            other,
            &code,
            lesson.id,
            EditLessonInput {
                title: Some("Hijacked".to_owned()),
                content: None,
            },
        )
        .await;
    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));

    let result = delete_uc(&school).execute(other, &code, lesson.id).await;
    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));

    let lessons = school.lessons.lock().unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].title, "Fractions");
}

#[tokio::test]
async fn should_let_the_teaching_teacher_manage_lessons() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    school.add_subject("MAT", "Mathematics", teacher);
    let code = "MAT".parse().unwrap();

    let lesson = add_uc(&school)
        .execute(
            teacher,
            &code,
            AddLessonInput {
                title: "Fractions".to_owned(),
                content: Some("Numerators and denominators.".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_eq!(school.lessons.lock().unwrap().len(), 1);

    edit_uc(&school)
        .execute(
            teacher,
            &code,
            lesson.id,
            EditLessonInput {
                title: Some("Fractions and decimals".to_owned()),
                content: Some("Now with decimals.".to_owned()),
            },
        )
        .await
        .unwrap();
    {
        let lessons = school.lessons.lock().unwrap();
        assert_eq!(lessons[0].title, "Fractions and decimals");
        assert_eq!(lessons[0].content.as_deref(), Some("Now with decimals."));
    }

    delete_uc(&school)
        .execute(teacher, &code, lesson.id)
        .await
        .unwrap();
    assert!(school.lessons.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_lessons_without_a_title() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let subject = school.add_subject("MAT", "Mathematics", teacher);
    let lesson = school.add_lesson(subject.id, "Fractions");
    let code = "MAT".parse().unwrap();

    let result = add_uc(&school)
        .execute(
            teacher,
            &code,
            AddLessonInput {
                title: String::new(),
                content: None,
            },
        )
        .await;
    assert!(matches!(result, Err(SchoolServiceError::MissingData)));

    let result = edit_uc(&school)
        .execute(
            teacher,
            &code,
            lesson.id,
            EditLessonInput {
                title: None,
                content: None,
            },
        )
        .await;
    assert!(matches!(result, Err(SchoolServiceError::MissingData)));
}

#[tokio::test]
async fn should_show_lessons_to_enrolled_students_only() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let alice = school.add_student("alice");
    let bob = school.add_student("bob");
    let subject = school.add_subject("MAT", "Mathematics", teacher);
    school.enroll(alice, subject.id);
    let lesson = school.add_lesson(subject.id, "Fractions");
    let code = "MAT".parse().unwrap();

    let uc = GetLessonUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
        lessons: school.lesson_repo(),
        enrollments: school.enrollment_repo(),
    };

    let found = uc.execute(alice, &code, lesson.id).await.unwrap();
    assert_eq!(found.id, lesson.id);
    assert_eq!(found.title, "Fractions");

    let result = uc.execute(bob, &code, lesson.id).await;
    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));
}
