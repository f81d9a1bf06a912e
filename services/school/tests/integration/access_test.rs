use campus_school::error::SchoolServiceError;
use campus_school::usecase::marks::ListMarksUseCase;
use campus_school::usecase::subject::{
    CreateSubjectInput, CreateSubjectUseCase, GetSubjectUseCase, ListSubjectsUseCase,
};

use crate::helpers::TestSchool;

#[tokio::test]
async fn should_forbid_subject_creation_by_students() {
    let school = TestSchool::default();
    let student = school.add_student("alice");

    let uc = CreateSubjectUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
    };
    let result = uc
        .execute(
            student,
            CreateSubjectInput {
                code: "MAT".parse().unwrap(),
                name: "Mathematics".to_owned(),
            },
        )
        .await;

    assert!(
        matches!(result, Err(SchoolServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert!(school.subjects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_subject_detail_for_unenrolled_students() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let student = school.add_student("alice");
    school.add_subject("MAT", "Mathematics", teacher);

    let uc = GetSubjectUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
        lessons: school.lesson_repo(),
        enrollments: school.enrollment_repo(),
    };
    let result = uc.execute(student, &"MAT".parse().unwrap()).await;

    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));
}

#[tokio::test]
async fn should_show_subject_detail_to_enrolled_student_with_own_mark() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let student = school.add_student("alice");
    let subject = school.add_subject("MAT", "Mathematics", teacher);
    let enrollment = school.enroll(student, subject.id);
    school.set_mark(enrollment, 9);

    let uc = GetSubjectUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
        lessons: school.lesson_repo(),
        enrollments: school.enrollment_repo(),
    };
    let detail = uc.execute(student, &"MAT".parse().unwrap()).await.unwrap();

    assert_eq!(detail.subject.id, subject.id);
    assert_eq!(detail.mark.map(|m| m.value()), Some(9));
}

#[tokio::test]
async fn should_forbid_subject_detail_for_other_teachers() {
    let school = TestSchool::default();
    let owner = school.add_teacher("prof");
    let other = school.add_teacher("rival");
    school.add_subject("MAT", "Mathematics", owner);

    let uc = GetSubjectUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
        lessons: school.lesson_repo(),
        enrollments: school.enrollment_repo(),
    };
    let result = uc.execute(other, &"MAT".parse().unwrap()).await;

    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));
}

#[tokio::test]
async fn should_forbid_mark_sheet_for_non_owning_teacher() {
    let school = TestSchool::default();
    let owner = school.add_teacher("prof");
    let other = school.add_teacher("rival");
    school.add_subject("MAT", "Mathematics", owner);

    let uc = ListMarksUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
        enrollments: school.enrollment_repo(),
    };
    let result = uc.execute(other, &"MAT".parse().unwrap()).await;

    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));
}

#[tokio::test]
async fn should_forbid_callers_without_a_profile() {
    let school = TestSchool::default();
    let ghost = uuid::Uuid::now_v7();

    let uc = ListSubjectsUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
    };
    let result = uc.execute(ghost).await;

    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));
}

#[tokio::test]
async fn should_scope_subject_lists_by_role() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let student = school.add_student("alice");
    let mat = school.add_subject("MAT", "Mathematics", teacher);
    school.add_subject("PHY", "Physics", teacher);
    school.enroll(student, mat.id);

    let uc = ListSubjectsUseCase {
        users: school.user_repo(),
        subjects: school.subject_repo(),
    };

    let taught = uc.execute(teacher).await.unwrap();
    assert_eq!(taught.len(), 2);

    let taken = uc.execute(student).await.unwrap();
    assert_eq!(taken.len(), 1);
    assert_eq!(taken[0].code.as_str(), "MAT");
}
