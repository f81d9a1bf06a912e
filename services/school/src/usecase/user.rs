use chrono::Utc;
use uuid::Uuid;

use campus_domain::role::Role;

use crate::domain::repository::UserRepository;
use crate::domain::types::{DEFAULT_AVATAR, Profile, User};
use crate::error::SchoolServiceError;

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
}

/// Create the account and its profile in one step. The profile is part of the
/// registration use case itself, not a side effect of a save hook, so "every
/// user has exactly one profile" holds from the first moment the user row is
/// queryable.
pub struct RegisterUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RegisterUserUseCase<U> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<Uuid, SchoolServiceError> {
        if input.username.is_empty() || input.email.is_empty() {
            return Err(SchoolServiceError::MissingData);
        }
        if self.users.find_by_username(&input.username).await?.is_some()
            || self.users.find_by_email(&input.email).await?.is_some()
        {
            return Err(SchoolServiceError::UserAlreadyExists);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            created_at: now,
        };
        let profile = Profile {
            user_id: user.id,
            role: input.role,
            bio: input.bio,
            avatar_path: DEFAULT_AVATAR.to_owned(),
            created_at: now,
        };
        self.users.create_with_profile(&user, &profile).await?;
        Ok(user.id)
    }
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, username: &str) -> Result<(User, Profile), SchoolServiceError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(SchoolServiceError::UserNotFound)?;
        let profile = self
            .users
            .find_profile(user.id)
            .await?
            .ok_or(SchoolServiceError::UserNotFound)?;
        Ok((user, profile))
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub bio: Option<String>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<(), SchoolServiceError> {
        let Some(bio) = input.bio else {
            return Err(SchoolServiceError::MissingData);
        };
        self.users
            .find_profile(user_id)
            .await?
            .ok_or(SchoolServiceError::UserNotFound)?;
        self.users.update_bio(user_id, &bio).await
    }
}

// ── Leave ────────────────────────────────────────────────────────────────────

/// Account deletion. Enrollments, the profile and any owned subjects cascade
/// away in the datastore.
pub struct LeaveUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> LeaveUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), SchoolServiceError> {
        if self.users.delete(user_id).await? {
            Ok(())
        } else {
            Err(SchoolServiceError::UserNotFound)
        }
    }
}
