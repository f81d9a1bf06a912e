use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use campus_domain::role::Role;

use crate::domain::repository::{CertificateJobRepository, EnrollmentRepository, UserRepository};
use crate::domain::types::CertificateJob;
use crate::error::SchoolServiceError;
use crate::usecase::access::{current_role, require_role};
use crate::usecase::marks::AllMarksAssignedUseCase;

/// Deterministic location of a student's certificate. Rendering overwrites in
/// place, which is what makes job retries safe.
pub fn certificate_path(certificates_dir: &Path, username: &str) -> PathBuf {
    certificates_dir.join(format!("{username}_grade_certificate.pdf"))
}

// ── RequestCertificate ───────────────────────────────────────────────────────

/// Gate and enqueue. The caller gets 202 as soon as the job row is durable;
/// rendering and mail happen on the worker.
pub struct RequestCertificateUseCase<U, E, J>
where
    U: UserRepository,
    E: EnrollmentRepository + Clone,
    J: CertificateJobRepository,
{
    pub users: U,
    pub enrollments: E,
    pub jobs: J,
}

impl<U, E, J> RequestCertificateUseCase<U, E, J>
where
    U: UserRepository,
    E: EnrollmentRepository + Clone,
    J: CertificateJobRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        base_url: &str,
    ) -> Result<Uuid, SchoolServiceError> {
        let role = current_role(&self.users, user_id).await?;
        require_role(role, Role::Student)?;

        let all_assigned = AllMarksAssignedUseCase {
            enrollments: self.enrollments.clone(),
        }
        .execute(user_id)
        .await?;
        if !all_assigned {
            return Err(SchoolServiceError::Forbidden);
        }

        let student = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(SchoolServiceError::UserNotFound)?;

        let now = Utc::now();
        let job_id = Uuid::new_v4();
        let job = CertificateJob {
            id: job_id,
            student_id: student.id,
            payload: json!({
                "student_id": student.id,
                "username": student.username,
                "email": student.email,
                "base_url": base_url,
            }),
            idempotency_key: format!("grade_certificate:{job_id}"),
            attempts: 0,
            last_error: None,
            created_at: now,
            next_attempt_at: now,
            processed_at: None,
            failed_at: None,
        };
        self.jobs.enqueue(&job).await?;
        Ok(job_id)
    }
}
