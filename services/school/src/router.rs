use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    certificate::request_certificate,
    enrollment::{enroll, unenroll},
    lesson::{add_lesson, delete_lesson, edit_lesson, get_lesson},
    marks::{list_marks, set_marks},
    subject::{create_subject, get_subject, list_subjects},
    user::{get_profile, leave, register, update_me},
};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness check; verifies the database is
/// reachable.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users", post(register))
        .route("/users/@me", patch(update_me))
        .route("/users/@me", delete(leave))
        .route("/users/{username}", get(get_profile))
        // Subjects
        .route("/subjects", get(list_subjects))
        .route("/subjects", post(create_subject))
        .route("/subjects/enroll", post(enroll))
        .route("/subjects/unenroll", post(unenroll))
        .route("/subjects/certificate", post(request_certificate))
        .route("/subjects/{code}", get(get_subject))
        // Lessons
        .route("/subjects/{code}/lessons", post(add_lesson))
        .route("/subjects/{code}/lessons/{lesson_id}", get(get_lesson))
        .route("/subjects/{code}/lessons/{lesson_id}", patch(edit_lesson))
        .route("/subjects/{code}/lessons/{lesson_id}", delete(delete_lesson))
        // Marks
        .route("/subjects/{code}/marks", get(list_marks))
        .route("/subjects/{code}/marks", put(set_marks))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
