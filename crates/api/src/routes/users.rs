//! User profile routes.

use axum::Json;
use domain::models::UserResponse;

use crate::extractors::CurrentUser;

/// Profile of the authenticated user.
///
/// GET /api/v1/users/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
