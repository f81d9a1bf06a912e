use std::collections::HashSet;

use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::mark::Mark;
use campus_domain::role::Role;

use crate::domain::repository::{EnrollmentRepository, SubjectRepository, UserRepository};
use crate::domain::types::SubjectMark;
use crate::error::SchoolServiceError;
use crate::usecase::access::{authorize_subject_teacher, current_role, require_role};

// ── ListMarks ────────────────────────────────────────────────────────────────

pub struct ListMarksUseCase<U, S, E>
where
    U: UserRepository,
    S: SubjectRepository,
    E: EnrollmentRepository,
{
    pub users: U,
    pub subjects: S,
    pub enrollments: E,
}

impl<U, S, E> ListMarksUseCase<U, S, E>
where
    U: UserRepository,
    S: SubjectRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        code: &SubjectCode,
    ) -> Result<Vec<SubjectMark>, SchoolServiceError> {
        let subject = self
            .subjects
            .find_by_code(code)
            .await?
            .ok_or(SchoolServiceError::SubjectNotFound)?;
        let role = current_role(&self.users, user_id).await?;
        require_role(role, Role::Teacher)?;
        authorize_subject_teacher(user_id, &subject)?;
        self.enrollments.list_subject_marks(subject.id).await
    }
}

// ── SetMarks ─────────────────────────────────────────────────────────────────

/// One row of a batch edit. `mark: None` means "leave unchanged" — there is
/// no path from a set mark back to unset.
pub struct MarkUpdate {
    pub enrollment_id: Uuid,
    pub mark: Option<i16>,
}

pub struct SetMarksUseCase<U, S, E>
where
    U: UserRepository,
    S: SubjectRepository,
    E: EnrollmentRepository,
{
    pub users: U,
    pub subjects: S,
    pub enrollments: E,
}

impl<U, S, E> SetMarksUseCase<U, S, E>
where
    U: UserRepository,
    S: SubjectRepository,
    E: EnrollmentRepository,
{
    /// Validate the whole batch before touching anything, then persist it in
    /// one transaction. One bad row rejects the lot.
    pub async fn execute(
        &self,
        user_id: Uuid,
        code: &SubjectCode,
        rows: Vec<MarkUpdate>,
    ) -> Result<(), SchoolServiceError> {
        let subject = self
            .subjects
            .find_by_code(code)
            .await?
            .ok_or(SchoolServiceError::SubjectNotFound)?;
        let role = current_role(&self.users, user_id).await?;
        require_role(role, Role::Teacher)?;
        authorize_subject_teacher(user_id, &subject)?;

        let known: HashSet<Uuid> = self
            .enrollments
            .list_for_subject(subject.id)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        let mut updates = Vec::new();
        for row in rows {
            if !known.contains(&row.enrollment_id) {
                return Err(SchoolServiceError::EnrollmentNotInSubject);
            }
            if let Some(raw) = row.mark {
                let mark = Mark::new(raw).map_err(|_| SchoolServiceError::InvalidMark)?;
                updates.push((row.enrollment_id, mark));
            }
        }
        if updates.is_empty() {
            return Ok(());
        }
        self.enrollments.update_marks(&updates).await
    }
}

// ── AllMarksAssigned ─────────────────────────────────────────────────────────

/// True iff the student has at least one enrollment and every one of them has
/// a mark. The gate in front of certificate requests.
pub struct AllMarksAssignedUseCase<E: EnrollmentRepository> {
    pub enrollments: E,
}

impl<E: EnrollmentRepository> AllMarksAssignedUseCase<E> {
    pub async fn execute(&self, student_id: Uuid) -> Result<bool, SchoolServiceError> {
        let marks = self.enrollments.list_student_marks(student_id).await?;
        Ok(!marks.is_empty() && marks.iter().all(|m| m.mark.is_some()))
    }
}
