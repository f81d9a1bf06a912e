//! Composable authorization guards.
//!
//! Every guard fails closed: anything that is not an explicit allow is
//! `Forbidden`. Role checks match exhaustively over [`Role`], so there is no
//! branch a new role value could silently fall through.

use uuid::Uuid;

use campus_domain::role::Role;

use crate::domain::repository::UserRepository;
use crate::domain::types::Subject;
use crate::error::SchoolServiceError;

/// Require an exact role.
pub fn require_role(role: Role, wanted: Role) -> Result<(), SchoolServiceError> {
    if role == wanted {
        Ok(())
    } else {
        Err(SchoolServiceError::Forbidden)
    }
}

/// Subject-scoped read access: a student must be enrolled, a teacher must own
/// the subject.
pub fn authorize_subject_access(
    role: Role,
    user_id: Uuid,
    subject: &Subject,
    enrolled: bool,
) -> Result<(), SchoolServiceError> {
    let allowed = match role {
        Role::Student => enrolled,
        Role::Teacher => subject.teacher_id == user_id,
    };
    if allowed {
        Ok(())
    } else {
        Err(SchoolServiceError::Forbidden)
    }
}

/// Subject-scoped write access: only the teaching teacher.
pub fn authorize_subject_teacher(
    user_id: Uuid,
    subject: &Subject,
) -> Result<(), SchoolServiceError> {
    if subject.teacher_id == user_id {
        Ok(())
    } else {
        Err(SchoolServiceError::Forbidden)
    }
}

/// Load the caller's role from their profile. A missing profile is treated as
/// no access at all.
pub async fn current_role<U: UserRepository>(
    users: &U,
    user_id: Uuid,
) -> Result<Role, SchoolServiceError> {
    let profile = users
        .find_profile(user_id)
        .await?
        .ok_or(SchoolServiceError::Forbidden)?;
    Ok(profile.role)
}
