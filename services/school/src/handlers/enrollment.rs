use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use campus_domain::code::SubjectCode;

use crate::error::SchoolServiceError;
use crate::identity::IdentityHeaders;
use crate::state::AppState;
use crate::usecase::enrollment::{EnrollUseCase, UnenrollUseCase};

#[derive(Deserialize)]
pub struct SubjectSelectionRequest {
    pub subjects: Vec<String>,
}

fn parse_codes(raw: Vec<String>) -> Result<Vec<SubjectCode>, SchoolServiceError> {
    raw.into_iter()
        .map(|code| {
            code.parse()
                .map_err(|_| SchoolServiceError::InvalidSubjectCode)
        })
        .collect()
}

// ── POST /subjects/enroll ────────────────────────────────────────────────────

pub async fn enroll(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<SubjectSelectionRequest>,
) -> Result<StatusCode, SchoolServiceError> {
    let codes = parse_codes(body.subjects)?;
    let usecase = EnrollUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        enrollments: state.enrollment_repo(),
    };
    usecase.execute(identity.user_id, codes).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /subjects/unenroll ──────────────────────────────────────────────────

pub async fn unenroll(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<SubjectSelectionRequest>,
) -> Result<StatusCode, SchoolServiceError> {
    let codes = parse_codes(body.subjects)?;
    let usecase = UnenrollUseCase {
        users: state.user_repo(),
        subjects: state.subject_repo(),
        enrollments: state.enrollment_repo(),
    };
    usecase.execute(identity.user_id, codes).await?;
    Ok(StatusCode::NO_CONTENT)
}
