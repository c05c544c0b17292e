//! Credential extractors.
//!
//! Access tokens are read from the `Authorization: Bearer` header first and
//! from the access token cookie second. Refresh tokens are only accepted from
//! the header, and a missing one rejects the request.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use domain::models::User;

use crate::app::AppState;
use crate::error::{ApiError, INVALID_CREDENTIALS_MESSAGE};

async fn bearer_token(parts: &mut Parts, state: &AppState) -> Option<String> {
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

/// Access token if the request carries one. Never rejects.
#[derive(Debug, Clone)]
pub struct AccessCredentials(pub Option<String>);

#[async_trait]
impl FromRequestParts<AppState> for AccessCredentials {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(parts, state).await {
            return Ok(Self(Some(token)));
        }

        let cookie = state
            .cookies
            .extract_access_token(&parts.headers)
            .map(str::to_string);
        Ok(Self(cookie))
    }
}

/// Refresh token from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct RefreshCredentials(pub String);

#[async_trait]
impl FromRequestParts<AppState> for RefreshCredentials {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_token(parts, state)
            .await
            .map(Self)
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string()))
    }
}

/// The user behind the request's access credentials.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AccessCredentials(token) = AccessCredentials::from_request_parts(parts, state).await?;
        let user = state.auth.get_current_user(token.as_deref()).await?;
        Ok(Self(user))
    }
}
