use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::mark::Mark;
use campus_domain::role::Role;

/// Placeholder avatar assigned to every new profile.
pub const DEFAULT_AVATAR: &str = "avatars/noavatar.png";

/// User account row. Authentication is the gateway's problem; this service
/// only stores what the school domain needs.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user profile. Exists from the same transaction that created the user.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user_id: Uuid,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar_path: String,
    pub created_at: DateTime<Utc>,
}

/// Subject owned by one teacher.
#[derive(Debug, Clone)]
pub struct Subject {
    pub id: Uuid,
    pub code: SubjectCode,
    pub name: String,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Lesson inside a subject.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Enrollment join row; the authoritative holder of the mark.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub enrolled_at: NaiveDate,
    pub mark: Option<Mark>,
}

/// One row of a subject's mark sheet, joined with the student account.
#[derive(Debug, Clone)]
pub struct SubjectMark {
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub student_username: String,
    pub enrolled_at: NaiveDate,
    pub mark: Option<Mark>,
}

/// One row of a student's transcript, joined with the subject.
#[derive(Debug, Clone)]
pub struct StudentMark {
    pub subject_code: SubjectCode,
    pub subject_name: String,
    pub mark: Option<Mark>,
}

/// Durable certificate job row (the queue the worker polls).
#[derive(Debug, Clone)]
pub struct CertificateJob {
    pub id: Uuid,
    pub student_id: Uuid,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub next_attempt_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

/// Payload stored inside a certificate job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificatePayload {
    pub student_id: Uuid,
    pub username: String,
    pub email: String,
    pub base_url: String,
}

/// Everything the renderer needs for one certificate document.
#[derive(Debug, Clone)]
pub struct CertificateData {
    pub username: String,
    pub issued_on: NaiveDate,
    pub rows: Vec<CertificateRow>,
}

/// One subject line on a certificate. The mark is guaranteed assigned by the
/// time a job renders.
#[derive(Debug, Clone)]
pub struct CertificateRow {
    pub subject_code: SubjectCode,
    pub subject_name: String,
    pub mark: Mark,
}
