use chrono::Utc;
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::role::Role;

use crate::domain::repository::{EnrollmentRepository, SubjectRepository, UserRepository};
use crate::domain::types::Enrollment;
use crate::error::SchoolServiceError;
use crate::usecase::access::{current_role, require_role};

// ── Enroll ───────────────────────────────────────────────────────────────────

/// Student self-service enrollment. Re-enrolling in an already-enrolled
/// subject is a no-op; an unknown code fails the whole request with 404
/// before any row is written.
pub struct EnrollUseCase<U, S, E>
where
    U: UserRepository,
    S: SubjectRepository,
    E: EnrollmentRepository,
{
    pub users: U,
    pub subjects: S,
    pub enrollments: E,
}

impl<U, S, E> EnrollUseCase<U, S, E>
where
    U: UserRepository,
    S: SubjectRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        codes: Vec<SubjectCode>,
    ) -> Result<(), SchoolServiceError> {
        if codes.is_empty() {
            return Err(SchoolServiceError::EmptySelection);
        }
        let role = current_role(&self.users, user_id).await?;
        require_role(role, Role::Student)?;

        let mut targets = Vec::new();
        for code in &codes {
            let subject = self
                .subjects
                .find_by_code(code)
                .await?
                .ok_or(SchoolServiceError::SubjectNotFound)?;
            targets.push(subject);
        }
        for subject in targets {
            let existing = self
                .enrollments
                .find_for_student_subject(user_id, subject.id)
                .await?;
            if existing.is_some() {
                continue;
            }
            let enrollment = Enrollment {
                id: Uuid::now_v7(),
                student_id: user_id,
                subject_id: subject.id,
                enrolled_at: Utc::now().date_naive(),
                mark: None,
            };
            self.enrollments.create(&enrollment).await?;
        }
        Ok(())
    }
}

// ── Unenroll ─────────────────────────────────────────────────────────────────

/// Drop enrollments for the given subjects. Subjects the student was never
/// enrolled in are silently ignored.
pub struct UnenrollUseCase<U, S, E>
where
    U: UserRepository,
    S: SubjectRepository,
    E: EnrollmentRepository,
{
    pub users: U,
    pub subjects: S,
    pub enrollments: E,
}

impl<U, S, E> UnenrollUseCase<U, S, E>
where
    U: UserRepository,
    S: SubjectRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        codes: Vec<SubjectCode>,
    ) -> Result<(), SchoolServiceError> {
        if codes.is_empty() {
            return Err(SchoolServiceError::EmptySelection);
        }
        let role = current_role(&self.users, user_id).await?;
        require_role(role, Role::Student)?;

        for code in &codes {
            let subject = self
                .subjects
                .find_by_code(code)
                .await?
                .ok_or(SchoolServiceError::SubjectNotFound)?;
            self.enrollments.delete(user_id, subject.id).await?;
        }
        Ok(())
    }
}
