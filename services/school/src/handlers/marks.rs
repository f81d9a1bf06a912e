use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::code::SubjectCode;
use campus_domain::mark::Mark;

use crate::error::SchoolServiceError;
use crate::identity::IdentityHeaders;
use crate::state::AppState;
use crate::usecase::marks::{ListMarksUseCase, MarkUpdate, SetMarksUseCase};

// ── GET /subjects/{code}/marks ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct SubjectMarkResponse {
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub username: String,
    pub enrolled_at: chrono::NaiveDate,
    pub mark: Option<Mark>,
}

#[derive(Serialize)]
pub struct MarkSheetResponse {
    pub marks: Vec<SubjectMarkResponse>,
}

pub async fn list_marks(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MarkSheetResponse>, SchoolServiceError> {
    let code = code
        .parse::<SubjectCode>()
        .map_err(|_| SchoolServiceError::InvalidSubjectCode)?;
    let usecase = ListMarksUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        enrollments: state.enrollment_repo(),
    };
    let marks = usecase.execute(identity.user_id, &code).await?;
    Ok(Json(MarkSheetResponse {
        marks: marks
            .into_iter()
            .map(|m| SubjectMarkResponse {
                enrollment_id: m.enrollment_id,
                student_id: m.student_id,
                username: m.student_username,
                enrolled_at: m.enrolled_at,
                mark: m.mark,
            })
            .collect(),
    }))
}

// ── PUT /subjects/{code}/marks ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MarkRowRequest {
    pub enrollment_id: Uuid,
    /// `null` leaves the row's mark unchanged.
    pub mark: Option<i16>,
}

#[derive(Deserialize)]
pub struct SetMarksRequest {
    pub marks: Vec<MarkRowRequest>,
}

pub async fn set_marks(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<SetMarksRequest>,
) -> Result<StatusCode, SchoolServiceError> {
    let code = code
        .parse::<SubjectCode>()
        .map_err(|_| SchoolServiceError::InvalidSubjectCode)?;
    let usecase = SetMarksUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        enrollments: state.enrollment_repo(),
    };
    let rows = body
        .marks
        .into_iter()
        .map(|r| MarkUpdate {
            enrollment_id: r.enrollment_id,
            mark: r.mark,
        })
        .collect();
    usecase.execute(identity.user_id, &code, rows).await?;
    Ok(StatusCode::NO_CONTENT)
}
