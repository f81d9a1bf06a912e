#![allow(async_fn_in_trait)]

use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::mark::Mark;

use crate::domain::types::{
    CertificateData, CertificateJob, Enrollment, Lesson, Profile, StudentMark, Subject,
    SubjectMark, User,
};
use crate::error::SchoolServiceError;

/// Repository for user accounts and their profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, SchoolServiceError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, SchoolServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SchoolServiceError>;
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, SchoolServiceError>;

    /// Insert the user and its profile atomically (same transaction), so a
    /// user row is never visible without a profile.
    async fn create_with_profile(
        &self,
        user: &User,
        profile: &Profile,
    ) -> Result<(), SchoolServiceError>;

    async fn update_bio(&self, user_id: Uuid, bio: &str) -> Result<(), SchoolServiceError>;

    /// Delete an account. Returns `true` if a row was deleted. Profiles,
    /// enrollments and owned subjects go with it (cascade).
    async fn delete(&self, id: Uuid) -> Result<bool, SchoolServiceError>;
}

/// Repository for subjects.
pub trait SubjectRepository: Send + Sync {
    async fn find_by_code(&self, code: &SubjectCode)
    -> Result<Option<Subject>, SchoolServiceError>;
    async fn list_taught_by(&self, teacher_id: Uuid) -> Result<Vec<Subject>, SchoolServiceError>;
    async fn list_enrolled_in(&self, student_id: Uuid)
    -> Result<Vec<Subject>, SchoolServiceError>;
    async fn create(&self, subject: &Subject) -> Result<(), SchoolServiceError>;
}

/// Repository for lessons.
pub trait LessonRepository: Send + Sync {
    async fn find(
        &self,
        subject_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<Lesson>, SchoolServiceError>;
    async fn list_for_subject(&self, subject_id: Uuid)
    -> Result<Vec<Lesson>, SchoolServiceError>;
    async fn create(&self, lesson: &Lesson) -> Result<(), SchoolServiceError>;
    async fn update(&self, lesson: &Lesson) -> Result<(), SchoolServiceError>;

    /// Delete a lesson. Returns `true` if a row was deleted.
    async fn delete(&self, subject_id: Uuid, lesson_id: Uuid)
    -> Result<bool, SchoolServiceError>;
}

/// Repository for enrollments and marks.
pub trait EnrollmentRepository: Send + Sync {
    async fn find_for_student_subject(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Option<Enrollment>, SchoolServiceError>;
    async fn list_for_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<Enrollment>, SchoolServiceError>;
    async fn create(&self, enrollment: &Enrollment) -> Result<(), SchoolServiceError>;

    /// Delete an enrollment. Returns `true` if a row was deleted; a missing
    /// row is not an error (unenroll silently ignores it).
    async fn delete(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<bool, SchoolServiceError>;

    /// Mark sheet for a subject, joined with student usernames.
    async fn list_subject_marks(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<SubjectMark>, SchoolServiceError>;

    /// Transcript for a student, joined with subject code and name.
    async fn list_student_marks(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentMark>, SchoolServiceError>;

    /// Persist a batch of mark updates in one transaction: either every
    /// update lands or none does.
    async fn update_marks(&self, updates: &[(Uuid, Mark)]) -> Result<(), SchoolServiceError>;
}

/// Repository for the durable certificate job queue.
pub trait CertificateJobRepository: Send + Sync {
    async fn enqueue(&self, job: &CertificateJob) -> Result<(), SchoolServiceError>;

    /// Jobs due for processing: unprocessed, unfailed, `next_attempt_at <= now`.
    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<CertificateJob>, SchoolServiceError>;

    async fn mark_processed(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError>;

    /// Record a transient failure and schedule the next attempt.
    async fn record_retry(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError>;

    /// Park the job permanently.
    async fn mark_failed(
        &self,
        id: Uuid,
        error: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError>;
}

/// Port for rendering a certificate document to a PDF file.
pub trait CertificateRenderer: Send + Sync {
    /// Render to `path`, overwriting any previous file (retries are safe).
    async fn render(
        &self,
        certificate: &CertificateData,
        path: &Path,
    ) -> Result<(), SchoolServiceError>;
}

/// Port for outbound mail.
pub trait Mailer: Send + Sync {
    /// `base_url` is the public service URL linked from the mail body.
    async fn send_certificate(
        &self,
        to: &str,
        username: &str,
        base_url: &str,
        pdf_path: &Path,
    ) -> Result<(), SchoolServiceError>;
}
