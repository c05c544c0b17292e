//! Feature toggle middleware for optional routes.
//!
//! When a feature is disabled its routes answer 404 "Feature not available",
//! the same as a route that does not exist.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::AppState;

/// Helper to create a feature disabled response (404).
fn feature_disabled_response(feature_name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "feature_disabled",
            "message": format!("{} feature is not available", feature_name)
        })),
    )
        .into_response()
}

/// Middleware that checks if the unscoped contact listing is enabled.
///
/// When `features.all_contacts_enabled` is false, returns 404.
pub async fn require_all_contacts(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.features.all_contacts_enabled {
        return feature_disabled_response("All contacts");
    }
    next.run(req).await
}
