use axum::{Json, extract::Path, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_domain::role::Role;

use crate::error::SchoolServiceError;
use crate::identity::IdentityHeaders;
use crate::state::AppState;
use crate::usecase::user::{
    GetProfileUseCase, LeaveUseCase, RegisterUserInput, RegisterUserUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), SchoolServiceError> {
    let usecase = RegisterUserUseCase {
        users: state.user_repo(),
    };
    let id = usecase
        .execute(RegisterUserInput {
            username: body.username,
            email: body.email,
            role: body.role,
            bio: body.bio,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { id })))
}

// ── GET /users/{username} ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar_path: String,
    #[serde(serialize_with = "crate::serde_ext::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_profile(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, SchoolServiceError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let (user, profile) = usecase.execute(&username).await?;
    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: profile.role,
        bio: profile.bio,
        avatar_path: profile.avatar_path,
        created_at: user.created_at,
    }))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub bio: Option<String>,
}

pub async fn update_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<StatusCode, SchoolServiceError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(identity.user_id, UpdateProfileInput { bio: body.bio })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/@me ────────────────────────────────────────────────────────

pub async fn leave(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<StatusCode, SchoolServiceError> {
    let usecase = LeaveUseCase {
        users: state.user_repo(),
    };
    usecase.execute(identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
