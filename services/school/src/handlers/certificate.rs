use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::error::SchoolServiceError;
use crate::identity::IdentityHeaders;
use crate::state::AppState;
use crate::usecase::certificate::RequestCertificateUseCase;

// ── POST /subjects/certificate ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct CertificateRequestedResponse {
    pub job_id: Uuid,
}

/// Accepts the request and returns immediately; the worker renders and mails
/// the PDF.
pub async fn request_certificate(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CertificateRequestedResponse>), SchoolServiceError> {
    let usecase = RequestCertificateUseCase {
        users: state.user_repo(),
        enrollments: state.enrollment_repo(),
        jobs: state.certificate_job_repo(),
    };
    let job_id = usecase.execute(identity.user_id, &state.base_url).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(CertificateRequestedResponse { job_id }),
    ))
}
