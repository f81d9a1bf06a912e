use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::mark::Mark;

use crate::error::SchoolServiceError;
use crate::identity::IdentityHeaders;
use crate::state::AppState;
use crate::usecase::subject::{CreateSubjectInput, CreateSubjectUseCase, GetSubjectUseCase, ListSubjectsUseCase};

// ── GET /subjects ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SubjectResponse {
    pub code: SubjectCode,
    pub name: String,
    #[serde(serialize_with = "crate::serde_ext::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct SubjectListResponse {
    pub subjects: Vec<SubjectResponse>,
    pub total: usize,
}

pub async fn list_subjects(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<SubjectListResponse>, SchoolServiceError> {
    let usecase = ListSubjectsUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
    };
    let subjects = usecase.execute(identity.user_id).await?;
    let subjects: Vec<SubjectResponse> = subjects
        .into_iter()
        .map(|s| SubjectResponse {
            code: s.code,
            name: s.name,
            created_at: s.created_at,
        })
        .collect();
    Ok(Json(SubjectListResponse {
        total: subjects.len(),
        subjects,
    }))
}

// ── POST /subjects ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSubjectRequest {
    pub code: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct CreateSubjectResponse {
    pub id: Uuid,
    pub code: SubjectCode,
}

pub async fn create_subject(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<CreateSubjectResponse>), SchoolServiceError> {
    let code = body
        .code
        .parse::<SubjectCode>()
        .map_err(|_| SchoolServiceError::InvalidSubjectCode)?;
    let usecase = CreateSubjectUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
    };
    let subject = usecase
        .execute(
            identity.user_id,
            CreateSubjectInput {
                code,
                name: body.name,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSubjectResponse {
            id: subject.id,
            code: subject.code,
        }),
    ))
}

// ── GET /subjects/{code} ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LessonSummaryResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(serialize_with = "crate::serde_ext::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct SubjectDetailResponse {
    pub code: SubjectCode,
    pub name: String,
    /// The caller's own mark; `null` for teachers and unmarked students.
    pub mark: Option<Mark>,
    pub lessons: Vec<LessonSummaryResponse>,
    #[serde(serialize_with = "crate::serde_ext::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_subject(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<SubjectDetailResponse>, SchoolServiceError> {
    let code = code
        .parse::<SubjectCode>()
        .map_err(|_| SchoolServiceError::InvalidSubjectCode)?;
    let usecase = GetSubjectUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        lessons: state.lesson_repo(),
        enrollments: state.enrollment_repo(),
    };
    let detail = usecase.execute(identity.user_id, &code).await?;
    Ok(Json(SubjectDetailResponse {
        code: detail.subject.code,
        name: detail.subject.name,
        mark: detail.mark,
        lessons: detail
            .lessons
            .into_iter()
            .map(|l| LessonSummaryResponse {
                id: l.id,
                title: l.title,
                created_at: l.created_at,
            })
            .collect(),
        created_at: detail.subject.created_at,
    }))
}
