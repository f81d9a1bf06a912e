use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::code::SubjectCode;

use crate::error::SchoolServiceError;
use crate::identity::IdentityHeaders;
use crate::state::AppState;
use crate::usecase::lesson::{
    AddLessonInput, AddLessonUseCase, DeleteLessonUseCase, EditLessonInput, EditLessonUseCase,
    GetLessonUseCase,
};

fn parse_code(code: &str) -> Result<SubjectCode, SchoolServiceError> {
    code.parse()
        .map_err(|_| SchoolServiceError::InvalidSubjectCode)
}

// ── GET /subjects/{code}/lessons/{lesson_id} ─────────────────────────────────

#[derive(Serialize)]
pub struct LessonResponse {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    #[serde(serialize_with = "crate::serde_ext::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_lesson(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, lesson_id)): Path<(String, Uuid)>,
) -> Result<Json<LessonResponse>, SchoolServiceError> {
    let code = parse_code(&code)?;
    let usecase = GetLessonUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        lessons: state.lesson_repo(),
        enrollments: state.enrollment_repo(),
    };
    let lesson = usecase.execute(identity.user_id, &code, lesson_id).await?;
    Ok(Json(LessonResponse {
        id: lesson.id,
        title: lesson.title,
        content: lesson.content,
        created_at: lesson.created_at,
    }))
}

// ── POST /subjects/{code}/lessons ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddLessonRequest {
    pub title: String,
    pub content: Option<String>,
}

#[derive(Serialize)]
pub struct AddLessonResponse {
    pub id: Uuid,
}

pub async fn add_lesson(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<AddLessonRequest>,
) -> Result<(StatusCode, Json<AddLessonResponse>), SchoolServiceError> {
    let code = parse_code(&code)?;
    let usecase = AddLessonUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        lessons: state.lesson_repo(),
    };
    let lesson = usecase
        .execute(
            identity.user_id,
            &code,
            AddLessonInput {
                title: body.title,
                content: body.content,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(AddLessonResponse { id: lesson.id })))
}

// ── PATCH /subjects/{code}/lessons/{lesson_id} ───────────────────────────────

#[derive(Deserialize)]
pub struct EditLessonRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn edit_lesson(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, lesson_id)): Path<(String, Uuid)>,
    Json(body): Json<EditLessonRequest>,
) -> Result<StatusCode, SchoolServiceError> {
    let code = parse_code(&code)?;
    let usecase = EditLessonUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        lessons: state.lesson_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            &code,
            lesson_id,
            EditLessonInput {
                title: body.title,
                content: body.content,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /subjects/{code}/lessons/{lesson_id} ──────────────────────────────

pub async fn delete_lesson(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((code, lesson_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, SchoolServiceError> {
    let code = parse_code(&code)?;
    let usecase = DeleteLessonUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        lessons: state.lesson_repo(),
    };
    usecase.execute(identity.user_id, &code, lesson_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
