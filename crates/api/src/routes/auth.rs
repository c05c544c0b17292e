//! Authentication routes for signup, login, token refresh and email
//! confirmation.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::models::UserResponse;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, RefreshCredentials};
use crate::middleware::metrics::record_auth_event;
use crate::services::auth::{ConfirmOutcome, TokenPair};

/// Request body for account signup.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 250, message = "Email must be at most 250 characters"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for re-sending the confirmation email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestEmail {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Response body for signup.
#[derive(Debug, Clone, Serialize)]
pub struct SignupResponse {
    pub user: UserResponse,
    pub detail: String,
}

/// Token pair in response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
            expires_in: pair.expires_in,
        }
    }
}

/// Plain message response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Register a new account.
///
/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    request.validate()?;

    let result = state
        .auth
        .signup(&request.username, &request.email, &request.password)
        .await;
    record_auth_event("signup", result.is_ok());
    let user = result?;

    let response = SignupResponse {
        user: user.into(),
        detail: "User successfully created. Check your email for confirmation.".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange email and password for a token pair.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    request.validate()?;

    let result = state.auth.login(&request.email, &request.password).await;
    record_auth_event("login", result.is_ok());
    let pair = result?;

    let mut headers = HeaderMap::new();
    state
        .cookies
        .add_access_token_cookie(&mut headers, &pair.access_token);

    Ok((headers, Json(pair.into())))
}

/// Exchange a refresh token for a new token pair.
///
/// GET /api/v1/auth/refresh_token
pub async fn refresh_token(
    State(state): State<AppState>,
    RefreshCredentials(token): RefreshCredentials,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    let result = state.auth.refresh(&token).await;
    record_auth_event("refresh", result.is_ok());
    let pair = result?;

    let mut headers = HeaderMap::new();
    state
        .cookies
        .add_access_token_cookie(&mut headers, &pair.access_token);

    Ok((headers, Json(pair.into())))
}

/// Confirm an email address from the link sent at signup.
///
/// GET /api/v1/auth/confirmed_email/:token
pub async fn confirmed_email(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = state.auth.confirm_email(&token).await?;
    let message = match outcome {
        ConfirmOutcome::Confirmed => "Email confirmed",
        ConfirmOutcome::AlreadyConfirmed => "Your email is already confirmed",
    };
    Ok(MessageResponse::new(message))
}

/// Re-send the confirmation email.
///
/// POST /api/v1/auth/request_email
pub async fn request_email(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RequestEmail>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    state.auth.request_email(&request.email).await?;
    Ok(MessageResponse::new("Check your email for confirmation."))
}

/// Clear the access token cookie.
///
/// POST /api/v1/auth/logout
///
/// Tokens are not revoked; a copied token stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<MessageResponse>) {
    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookie(&mut headers);
    info!("Access token cookie cleared");
    (headers, MessageResponse::new("Logged out"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let request = SignupRequest {
            username: "oksana".to_string(),
            email: "oksana@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_request_short_password() {
        let request = SignupRequest {
            username: "oksana".to_string(),
            email: "oksana@example.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_request_bad_email() {
        let request = SignupRequest {
            username: "oksana".to_string(),
            email: "oksana".to_string(),
            password: "secret1".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_signup_request_short_username() {
        let request = SignupRequest {
            username: "ok".to_string(),
            email: "oksana@example.com".to_string(),
            password: "secret1".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_login_request_requires_password() {
        let request = LoginRequest {
            email: "oksana@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_token_response_from_pair() {
        let response = TokenResponse::from(TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 3600,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["tokenType"], "bearer");
        assert_eq!(json["expiresIn"], 3600);
    }
}
