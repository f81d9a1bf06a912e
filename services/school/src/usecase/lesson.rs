use chrono::Utc;
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::role::Role;

use crate::domain::repository::{
    EnrollmentRepository, LessonRepository, SubjectRepository, UserRepository,
};
use crate::domain::types::{Lesson, Subject};
use crate::error::SchoolServiceError;
use crate::usecase::access::{
    authorize_subject_access, authorize_subject_teacher, current_role, require_role,
};

/// Load a subject and check the caller is its teaching teacher. Lesson
/// mutation is teacher-only regardless of enrollment, so the role gate comes
/// first.
async fn teaching_subject<U, S>(
    users: &U,
    subjects: &S,
    user_id: Uuid,
    code: &SubjectCode,
) -> Result<Subject, SchoolServiceError>
where
    U: UserRepository,
    S: SubjectRepository,
{
    let subject = subjects
        .find_by_code(code)
        .await?
        .ok_or(SchoolServiceError::SubjectNotFound)?;
    let role = current_role(users, user_id).await?;
    require_role(role, Role::Teacher)?;
    authorize_subject_teacher(user_id, &subject)?;
    Ok(subject)
}

// ── GetLesson ────────────────────────────────────────────────────────────────

pub struct GetLessonUseCase<U, S, L, E>
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

impl<U, S, L, E> GetLessonUseCase<U, S, L, E>
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
        lesson_id: Uuid,
    ) -> Result<Lesson, SchoolServiceError> {
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

        self.lessons
            .find(subject.id, lesson_id)
            .await?
            .ok_or(SchoolServiceError::LessonNotFound)
    }
}

// ── AddLesson ────────────────────────────────────────────────────────────────

pub struct AddLessonInput {
    pub title: String,
    pub content: Option<String>,
}

pub struct AddLessonUseCase<U, S, L>
where
    U: UserRepository,
    S: SubjectRepository,
    L: LessonRepository,
{
    pub users: U,
    pub subjects: S,
    pub lessons: L,
}

impl<U, S, L> AddLessonUseCase<U, S, L>
where
    U: UserRepository,
    S: SubjectRepository,
    L: LessonRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        code: &SubjectCode,
        input: AddLessonInput,
    ) -> Result<Lesson, SchoolServiceError> {
        let subject = teaching_subject(&self.users, &self.subjects, user_id, code).await?;
        if input.title.is_empty() {
            return Err(SchoolServiceError::MissingData);
        }
        let lesson = Lesson {
            id: Uuid::now_v7(),
            subject_id: subject.id,
            title: input.title,
            content: input.content,
            created_at: Utc::now(),
        };
        self.lessons.create(&lesson).await?;
        Ok(lesson)
    }
}

// ── EditLesson ───────────────────────────────────────────────────────────────

pub struct EditLessonInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub struct EditLessonUseCase<U, S, L>
where
    U: UserRepository,
    S: SubjectRepository,
    L: LessonRepository,
{
    pub users: U,
    pub subjects: S,
    pub lessons: L,
}

impl<U, S, L> EditLessonUseCase<U, S, L>
where
    U: UserRepository,
    S: SubjectRepository,
    L: LessonRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        code: &SubjectCode,
        lesson_id: Uuid,
        input: EditLessonInput,
    ) -> Result<(), SchoolServiceError> {
        let subject = teaching_subject(&self.users, &self.subjects, user_id, code).await?;
        if input.title.is_none() && input.content.is_none() {
            return Err(SchoolServiceError::MissingData);
        }
        let mut lesson = self
            .lessons
            .find(subject.id, lesson_id)
            .await?
            .ok_or(SchoolServiceError::LessonNotFound)?;
        if let Some(title) = input.title {
            if title.is_empty() {
                return Err(SchoolServiceError::MissingData);
            }
            lesson.title = title;
        }
        if let Some(content) = input.content {
            lesson.content = Some(content);
        }
        self.lessons.update(&lesson).await
    }
}

// ── DeleteLesson ─────────────────────────────────────────────────────────────

pub struct DeleteLessonUseCase<U, S, L>
where
    U: UserRepository,
    S: SubjectRepository,
    L: LessonRepository,
{
    pub users: U,
    pub subjects: S,
    pub lessons: L,
}

impl<U, S, L> DeleteLessonUseCase<U, S, L>
where
    U: UserRepository,
    S: SubjectRepository,
    L: LessonRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        code: &SubjectCode,
        lesson_id: Uuid,
    ) -> Result<(), SchoolServiceError> {
        let subject = teaching_subject(&self.users, &self.subjects, user_id, code).await?;
        if self.lessons.delete(subject.id, lesson_id).await? {
            Ok(())
        } else {
            Err(SchoolServiceError::LessonNotFound)
        }
    }
}
