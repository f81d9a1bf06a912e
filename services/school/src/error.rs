use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// School service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum SchoolServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("subject not found")]
    SubjectNotFound,
    #[error("lesson not found")]
    LessonNotFound,
    #[error("enrollment not found")]
    EnrollmentNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("subject already exists")]
    SubjectAlreadyExists,
    #[error("subject code must be exactly three letters")]
    InvalidSubjectCode,
    #[error("mark out of range 1..=10")]
    InvalidMark,
    #[error("enrollment does not belong to this subject")]
    EnrollmentNotInSubject,
    #[error("select at least one subject")]
    EmptySelection,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SchoolServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::SubjectNotFound => "SUBJECT_NOT_FOUND",
            Self::LessonNotFound => "LESSON_NOT_FOUND",
            Self::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::SubjectAlreadyExists => "SUBJECT_ALREADY_EXISTS",
            Self::InvalidSubjectCode => "INVALID_SUBJECT_CODE",
            Self::InvalidMark => "INVALID_MARK",
            Self::EnrollmentNotInSubject => "ENROLLMENT_NOT_IN_SUBJECT",
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for SchoolServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::SubjectNotFound
            | Self::LessonNotFound
            | Self::EnrollmentNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists | Self::SubjectAlreadyExists => StatusCode::CONFLICT,
            Self::InvalidSubjectCode
            | Self::InvalidMark
            | Self::EnrollmentNotInSubject
            | Self::EmptySelection
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only. 4xx are expected client errors and would be noise here;
        // the trace layer already records method/uri/status per request.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
