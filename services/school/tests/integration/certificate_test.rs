use campus_school::error::SchoolServiceError;
use campus_school::usecase::certificate::RequestCertificateUseCase;
use campus_school::worker::CertificateWorker;

use crate::helpers::{RecordingMailer, StubRenderer, TestSchool};

const BASE_URL: &str = "http://localhost:3110";

fn request_uc(
    school: &TestSchool,
) -> RequestCertificateUseCase<
    crate::helpers::MockUserRepo,
    crate::helpers::MockEnrollmentRepo,
    crate::helpers::MockCertificateJobRepo,
> {
    RequestCertificateUseCase {
        users: school.user_repo(),
        enrollments: school.enrollment_repo(),
        jobs: school.job_repo(),
    }
}

#[tokio::test]
async fn should_reject_request_while_any_mark_is_missing() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let alice = school.add_student("alice");
    let mat = school.add_subject("MAT", "Mathematics", teacher);
    let phy = school.add_subject("PHY", "Physics", teacher);
    let e_mat = school.enroll(alice, mat.id);
    school.enroll(alice, phy.id);
    school.set_mark(e_mat, 9);

    let result = request_uc(&school).execute(alice, BASE_URL).await;

    assert!(
        matches!(result, Err(SchoolServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert!(school.jobs.lock().unwrap().is_empty(), "no job must be enqueued");
}

#[tokio::test]
async fn should_reject_request_without_enrollments() {
    let school = TestSchool::default();
    let alice = school.add_student("alice");

    let result = request_uc(&school).execute(alice, BASE_URL).await;

    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));
}

#[tokio::test]
async fn should_forbid_certificate_requests_by_teachers() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");

    let result = request_uc(&school).execute(teacher, BASE_URL).await;

    assert!(matches!(result, Err(SchoolServiceError::Forbidden)));
}

#[tokio::test]
async fn should_enqueue_job_once_all_marks_are_set() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let alice = school.add_student("alice");
    let mat = school.add_subject("MAT", "Mathematics", teacher);
    let e_mat = school.enroll(alice, mat.id);
    school.set_mark(e_mat, 9);

    let job_id = request_uc(&school).execute(alice, BASE_URL).await.unwrap();

    let jobs = school.jobs.lock().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, job_id);
    assert_eq!(jobs[0].student_id, alice);
    assert_eq!(jobs[0].idempotency_key, format!("grade_certificate:{job_id}"));
    assert!(jobs[0].processed_at.is_none());
}

#[tokio::test]
async fn should_render_and_mail_certificate_end_to_end() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let alice = school.add_student("alice");
    let mat = school.add_subject("MAT", "Mathematics", teacher);
    let phy = school.add_subject("PHY", "Physics", teacher);
    let e_mat = school.enroll(alice, mat.id);
    let e_phy = school.enroll(alice, phy.id);
    school.set_mark(e_mat, 9);
    school.set_mark(e_phy, 7);

    request_uc(&school).execute(alice, BASE_URL).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let renderer = StubRenderer::default();
    let mailer = RecordingMailer::default();
    let worker = CertificateWorker {
        jobs: school.job_repo(),
        enrollments: school.enrollment_repo(),
        renderer: renderer.clone(),
        mailer: mailer.clone(),
        certificates_dir: dir.path().to_path_buf(),
    };
    worker.tick().await.unwrap();

    let expected_path = dir.path().join("alice_grade_certificate.pdf");
    assert!(expected_path.exists(), "certificate file must be written");

    let rendered = renderer.rendered.lock().unwrap();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].username, "alice");
    assert_eq!(rendered[0].rows.len(), 2);
    assert_eq!(rendered[0].rows[0].subject_code.as_str(), "MAT");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "alice@example.com");
    assert_eq!(sent[0].2, BASE_URL);
    assert_eq!(sent[0].3, expected_path);

    let jobs = school.jobs.lock().unwrap();
    assert!(jobs[0].processed_at.is_some(), "job must be settled");
}

#[tokio::test]
async fn should_park_job_when_marks_regress_before_processing() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let alice = school.add_student("alice");
    let mat = school.add_subject("MAT", "Mathematics", teacher);
    let e_mat = school.enroll(alice, mat.id);
    school.set_mark(e_mat, 9);

    request_uc(&school).execute(alice, BASE_URL).await.unwrap();

    // A new unmarked enrollment appears between request and processing.
    let phy = school.add_subject("PHY", "Physics", teacher);
    school.enroll(alice, phy.id);

    let dir = tempfile::tempdir().unwrap();
    let mailer = RecordingMailer::default();
    let worker = CertificateWorker {
        jobs: school.job_repo(),
        enrollments: school.enrollment_repo(),
        renderer: StubRenderer::default(),
        mailer: mailer.clone(),
        certificates_dir: dir.path().to_path_buf(),
    };
    worker.tick().await.unwrap();

    assert!(mailer.sent.lock().unwrap().is_empty());
    let jobs = school.jobs.lock().unwrap();
    assert!(jobs[0].failed_at.is_some());
    assert_eq!(jobs[0].last_error.as_deref(), Some("marks incomplete"));
}

#[tokio::test]
async fn should_not_claim_already_processed_jobs() {
    let school = TestSchool::default();
    let teacher = school.add_teacher("prof");
    let alice = school.add_student("alice");
    let mat = school.add_subject("MAT", "Mathematics", teacher);
    let e_mat = school.enroll(alice, mat.id);
    school.set_mark(e_mat, 9);

    request_uc(&school).execute(alice, BASE_URL).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mailer = RecordingMailer::default();
    let worker = CertificateWorker {
        jobs: school.job_repo(),
        enrollments: school.enrollment_repo(),
        renderer: StubRenderer::default(),
        mailer: mailer.clone(),
        certificates_dir: dir.path().to_path_buf(),
    };
    worker.tick().await.unwrap();
    worker.tick().await.unwrap();

    assert_eq!(mailer.sent.lock().unwrap().len(), 1, "job must run once");
}
