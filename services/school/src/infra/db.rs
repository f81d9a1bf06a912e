use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::mark::Mark;
use campus_domain::role::Role;
use campus_school_schema::{certificate_jobs, enrollments, lessons, profiles, subjects, users};

use crate::domain::repository::{
    CertificateJobRepository, EnrollmentRepository, LessonRepository, SubjectRepository,
    UserRepository,
};
use crate::domain::types::{
    CertificateJob, Enrollment, Lesson, Profile, StudentMark, Subject, SubjectMark, User,
};
use crate::error::SchoolServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, SchoolServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, SchoolServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SchoolServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, SchoolServiceError> {
        let model = profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find profile")?;
        model.map(profile_from_model).transpose()
    }

    async fn create_with_profile(
        &self,
        user: &User,
        profile: &Profile,
    ) -> Result<(), SchoolServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let user = user.clone();
                let profile = profile.clone();
                Box::pin(async move {
                    insert_user(txn, &user).await?;
                    insert_profile(txn, &profile).await?;
                    Ok(())
                })
            })
            .await
            .context("create user with profile")?;
        Ok(())
    }

    async fn update_bio(&self, user_id: Uuid, bio: &str) -> Result<(), SchoolServiceError> {
        profiles::ActiveModel {
            user_id: Set(user_id),
            bio: Set(Some(bio.to_owned())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update profile bio")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SchoolServiceError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

async fn insert_user(txn: &DatabaseTransaction, user: &User) -> Result<(), sea_orm::DbErr> {
    users::ActiveModel {
        id: Set(user.id),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        created_at: Set(user.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_profile(
    txn: &DatabaseTransaction,
    profile: &Profile,
) -> Result<(), sea_orm::DbErr> {
    profiles::ActiveModel {
        user_id: Set(profile.user_id),
        role: Set(profile.role.as_i16()),
        bio: Set(profile.bio.clone()),
        avatar_path: Set(profile.avatar_path.clone()),
        created_at: Set(profile.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        created_at: model.created_at,
    }
}

fn profile_from_model(model: profiles::Model) -> Result<Profile, SchoolServiceError> {
    let role = Role::from_i16(model.role).context("role column out of range")?;
    Ok(Profile {
        user_id: model.user_id,
        role,
        bio: model.bio,
        avatar_path: model.avatar_path,
        created_at: model.created_at,
    })
}

// ── Subject repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubjectRepository {
    pub db: DatabaseConnection,
}

impl SubjectRepository for DbSubjectRepository {
    async fn find_by_code(
        &self,
        code: &SubjectCode,
    ) -> Result<Option<Subject>, SchoolServiceError> {
        let model = subjects::Entity::find()
            .filter(subjects::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await
            .context("find subject by code")?;
        model.map(subject_from_model).transpose()
    }

    async fn list_taught_by(&self, teacher_id: Uuid) -> Result<Vec<Subject>, SchoolServiceError> {
        let models = subjects::Entity::find()
            .filter(subjects::Column::TeacherId.eq(teacher_id))
            .order_by_asc(subjects::Column::Code)
            .all(&self.db)
            .await
            .context("list subjects taught by")?;
        models.into_iter().map(subject_from_model).collect()
    }

    async fn list_enrolled_in(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<Subject>, SchoolServiceError> {
        let models = subjects::Entity::find()
            .inner_join(enrollments::Entity)
            .filter(enrollments::Column::StudentId.eq(student_id))
            .order_by_asc(subjects::Column::Code)
            .all(&self.db)
            .await
            .context("list subjects enrolled in")?;
        models.into_iter().map(subject_from_model).collect()
    }

    async fn create(&self, subject: &Subject) -> Result<(), SchoolServiceError> {
        subjects::ActiveModel {
            id: Set(subject.id),
            code: Set(subject.code.as_str().to_owned()),
            name: Set(subject.name.clone()),
            teacher_id: Set(subject.teacher_id),
            created_at: Set(subject.created_at),
        }
        .insert(&self.db)
        .await
        .context("create subject")?;
        Ok(())
    }
}

fn subject_from_model(model: subjects::Model) -> Result<Subject, SchoolServiceError> {
    let code = model
        .code
        .parse::<SubjectCode>()
        .context("subject code column malformed")?;
    Ok(Subject {
        id: model.id,
        code,
        name: model.name,
        teacher_id: model.teacher_id,
        created_at: model.created_at,
    })
}

// ── Lesson repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLessonRepository {
    pub db: DatabaseConnection,
}

impl LessonRepository for DbLessonRepository {
    async fn find(
        &self,
        subject_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<Lesson>, SchoolServiceError> {
        let model = lessons::Entity::find_by_id(lesson_id)
            .filter(lessons::Column::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .context("find lesson")?;
        Ok(model.map(lesson_from_model))
    }

    async fn list_for_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<Lesson>, SchoolServiceError> {
        let models = lessons::Entity::find()
            .filter(lessons::Column::SubjectId.eq(subject_id))
            .order_by_asc(lessons::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list lessons for subject")?;
        Ok(models.into_iter().map(lesson_from_model).collect())
    }

    async fn create(&self, lesson: &Lesson) -> Result<(), SchoolServiceError> {
        lessons::ActiveModel {
            id: Set(lesson.id),
            subject_id: Set(lesson.subject_id),
            title: Set(lesson.title.clone()),
            content: Set(lesson.content.clone()),
            created_at: Set(lesson.created_at),
        }
        .insert(&self.db)
        .await
        .context("create lesson")?;
        Ok(())
    }

    async fn update(&self, lesson: &Lesson) -> Result<(), SchoolServiceError> {
        lessons::ActiveModel {
            id: Set(lesson.id),
            title: Set(lesson.title.clone()),
            content: Set(lesson.content.clone()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update lesson")?;
        Ok(())
    }

    async fn delete(
        &self,
        subject_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<bool, SchoolServiceError> {
        let result = lessons::Entity::delete_many()
            .filter(lessons::Column::Id.eq(lesson_id))
            .filter(lessons::Column::SubjectId.eq(subject_id))
            .exec(&self.db)
            .await
            .context("delete lesson")?;
        Ok(result.rows_affected > 0)
    }
}

fn lesson_from_model(model: lessons::Model) -> Lesson {
    Lesson {
        id: model.id,
        subject_id: model.subject_id,
        title: model.title,
        content: model.content,
        created_at: model.created_at,
    }
}

// ── Enrollment repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEnrollmentRepository {
    pub db: DatabaseConnection,
}

impl EnrollmentRepository for DbEnrollmentRepository {
    async fn find_for_student_subject(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Option<Enrollment>, SchoolServiceError> {
        let model = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .context("find enrollment")?;
        model.map(enrollment_from_model).transpose()
    }

    async fn list_for_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<Enrollment>, SchoolServiceError> {
        let models = enrollments::Entity::find()
            .filter(enrollments::Column::SubjectId.eq(subject_id))
            .all(&self.db)
            .await
            .context("list enrollments for subject")?;
        models.into_iter().map(enrollment_from_model).collect()
    }

    async fn create(&self, enrollment: &Enrollment) -> Result<(), SchoolServiceError> {
        enrollments::ActiveModel {
            id: Set(enrollment.id),
            student_id: Set(enrollment.student_id),
            subject_id: Set(enrollment.subject_id),
            enrolled_at: Set(enrollment.enrolled_at),
            mark: Set(enrollment.mark.map(Mark::value)),
        }
        .insert(&self.db)
        .await
        .context("create enrollment")?;
        Ok(())
    }

    async fn delete(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<bool, SchoolServiceError> {
        let result = enrollments::Entity::delete_many()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::SubjectId.eq(subject_id))
            .exec(&self.db)
            .await
            .context("delete enrollment")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_subject_marks(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<SubjectMark>, SchoolServiceError> {
        let rows = enrollments::Entity::find()
            .filter(enrollments::Column::SubjectId.eq(subject_id))
            .find_also_related(users::Entity)
            .order_by_asc(enrollments::Column::EnrolledAt)
            .all(&self.db)
            .await
            .context("list subject marks")?;
        rows.into_iter()
            .map(|(enrollment, student)| {
                let student = student.context("enrollment without student row")?;
                let mark = parse_mark(enrollment.mark)?;
                Ok(SubjectMark {
                    enrollment_id: enrollment.id,
                    student_id: student.id,
                    student_username: student.username,
                    enrolled_at: enrollment.enrolled_at,
                    mark,
                })
            })
            .collect()
    }

    async fn list_student_marks(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentMark>, SchoolServiceError> {
        let rows = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .find_also_related(subjects::Entity)
            .order_by_asc(subjects::Column::Code)
            .all(&self.db)
            .await
            .context("list student marks")?;
        rows.into_iter()
            .map(|(enrollment, subject)| {
                let subject = subject.context("enrollment without subject row")?;
                let code = subject
                    .code
                    .parse::<SubjectCode>()
                    .context("subject code column malformed")?;
                let mark = parse_mark(enrollment.mark)?;
                Ok(StudentMark {
                    subject_code: code,
                    subject_name: subject.name,
                    mark,
                })
            })
            .collect()
    }

    async fn update_marks(&self, updates: &[(Uuid, Mark)]) -> Result<(), SchoolServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let updates = updates.to_vec();
                Box::pin(async move {
                    for (enrollment_id, mark) in updates {
                        enrollments::ActiveModel {
                            id: Set(enrollment_id),
                            mark: Set(Some(mark.value())),
                            ..Default::default()
                        }
                        .update(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("update marks batch")?;
        Ok(())
    }
}

fn enrollment_from_model(model: enrollments::Model) -> Result<Enrollment, SchoolServiceError> {
    Ok(Enrollment {
        id: model.id,
        student_id: model.student_id,
        subject_id: model.subject_id,
        enrolled_at: model.enrolled_at,
        mark: parse_mark(model.mark)?,
    })
}

fn parse_mark(raw: Option<i16>) -> Result<Option<Mark>, SchoolServiceError> {
    raw.map(Mark::new)
        .transpose()
        .context("mark column out of range")
        .map_err(Into::into)
}

// ── Certificate job repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCertificateJobRepository {
    pub db: DatabaseConnection,
}

impl CertificateJobRepository for DbCertificateJobRepository {
    async fn enqueue(&self, job: &CertificateJob) -> Result<(), SchoolServiceError> {
        certificate_jobs::ActiveModel {
            id: Set(job.id),
            student_id: Set(job.student_id),
            payload: Set(job.payload.clone()),
            idempotency_key: Set(job.idempotency_key.clone()),
            attempts: Set(job.attempts),
            last_error: Set(job.last_error.clone()),
            created_at: Set(job.created_at),
            next_attempt_at: Set(job.next_attempt_at),
            processed_at: Set(job.processed_at),
            failed_at: Set(job.failed_at),
        }
        .insert(&self.db)
        .await
        .context("enqueue certificate job")?;
        Ok(())
    }

    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<CertificateJob>, SchoolServiceError> {
        let models = certificate_jobs::Entity::find()
            .filter(certificate_jobs::Column::ProcessedAt.is_null())
            .filter(certificate_jobs::Column::FailedAt.is_null())
            .filter(certificate_jobs::Column::NextAttemptAt.lte(now))
            .order_by_asc(certificate_jobs::Column::NextAttemptAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("claim due certificate jobs")?;
        Ok(models.into_iter().map(job_from_model).collect())
    }

    async fn mark_processed(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError> {
        certificate_jobs::ActiveModel {
            id: Set(id),
            processed_at: Set(Some(now)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark certificate job processed")?;
        Ok(())
    }

    async fn record_retry(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError> {
        certificate_jobs::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            last_error: Set(Some(error.to_owned())),
            next_attempt_at: Set(next_attempt_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record certificate job retry")?;
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        error: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SchoolServiceError> {
        certificate_jobs::ActiveModel {
            id: Set(id),
            last_error: Set(Some(error.to_owned())),
            failed_at: Set(Some(now)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark certificate job failed")?;
        Ok(())
    }
}

fn job_from_model(model: certificate_jobs::Model) -> CertificateJob {
    CertificateJob {
        id: model.id,
        student_id: model.student_id,
        payload: model.payload,
        idempotency_key: model.idempotency_key,
        attempts: model.attempts,
        last_error: model.last_error,
        created_at: model.created_at,
        next_attempt_at: model.next_attempt_at,
        processed_at: model.processed_at,
        failed_at: model.failed_at,
    }
}
