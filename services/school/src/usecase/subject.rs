use chrono::Utc;
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::mark::Mark;
use campus_domain::role::Role;

use crate::domain::repository::{
    EnrollmentRepository, LessonRepository, SubjectRepository, UserRepository,
};
use crate::domain::types::{Lesson, Subject};
use crate::error::SchoolServiceError;
use crate::usecase::access::{authorize_subject_access, current_role, require_role};

// ── ListSubjects ─────────────────────────────────────────────────────────────

/// Subjects relevant to the caller: the ones they take (student) or the ones
/// they teach (teacher).
pub struct ListSubjectsUseCase<U: UserRepository, S: SubjectRepository> {
    pub users: U,
    pub subjects: S,
}

impl<U: UserRepository, S: SubjectRepository> ListSubjectsUseCase<U, S> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Subject>, SchoolServiceError> {
        let role = current_role(&self.users, user_id).await?;
        match role {
            Role::Student => self.subjects.list_enrolled_in(user_id).await,
            Role::Teacher => self.subjects.list_taught_by(user_id).await,
        }
    }
}

// ── GetSubject ───────────────────────────────────────────────────────────────

/// Subject detail as seen by one caller.
pub struct SubjectDetail {
    pub subject: Subject,
    pub lessons: Vec<Lesson>,
    /// The caller's own mark; always `None` for the teacher.
    pub mark: Option<Mark>,
}

pub struct GetSubjectUseCase<U, S, L, E>
where
    U: UserRepository,
    S: SubjectRepository,
    L: LessonRepository,
    E: EnrollmentRepository,
{
    pub users: U,
    pub subjects: S,
    pub lessons: L,
    pub enrollments: E,
}

impl<U, S, L, E> GetSubjectUseCase<U, S, L, E>
where
    U: UserRepository,
    S: SubjectRepository,
    L: LessonRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        code: &SubjectCode,
    ) -> Result<SubjectDetail, SchoolServiceError> {
        let subject = self
            .subjects
            .find_by_code(code)
            .await?
            .ok_or(SchoolServiceError::SubjectNotFound)?;
        let role = current_role(&self.users, user_id).await?;
        let enrollment = self
            .enrollments
            .find_for_student_subject(user_id, subject.id)
            .await?;
        authorize_subject_access(role, user_id, &subject, enrollment.is_some())?;

        let lessons = self.lessons.list_for_subject(subject.id).await?;
        let mark = match role {
            Role::Student => enrollment.and_then(|e| e.mark),
            Role::Teacher => None,
        };
        Ok(SubjectDetail {
            subject,
            lessons,
            mark,
        })
    }
}

// ── CreateSubject ────────────────────────────────────────────────────────────

pub struct CreateSubjectInput {
    pub code: SubjectCode,
    pub name: String,
}

/// Teacher-only subject creation; the caller becomes the owning teacher.
pub struct CreateSubjectUseCase<U: UserRepository, S: SubjectRepository> {
    pub users: U,
    pub subjects: S,
}

impl<U: UserRepository, S: SubjectRepository> CreateSubjectUseCase<U, S> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateSubjectInput,
    ) -> Result<Subject, SchoolServiceError> {
        let role = current_role(&self.users, user_id).await?;
        require_role(role, Role::Teacher)?;
        if input.name.is_empty() {
            return Err(SchoolServiceError::MissingData);
        }
        if self.subjects.find_by_code(&input.code).await?.is_some() {
            return Err(SchoolServiceError::SubjectAlreadyExists);
        }
        let subject = Subject {
            id: Uuid::now_v7(),
            code: input.code,
            name: input.name,
            teacher_id: user_id,
            created_at: Utc::now(),
        };
        self.subjects.create(&subject).await?;
        Ok(subject)
    }
}
