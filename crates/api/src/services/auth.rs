//! Authentication service for signup, login, token management and email
//! confirmation.
//!
//! Tokens are stateless. Nothing is recorded server side when a token is
//! issued, so a token stays valid until it expires.

use domain::models::User;
use persistence::repositories::UserRepository;
use serde_json::{Map, Value};
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{self, PasswordError};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::services::email::EmailService;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, invalid or expired credentials, or a token for an unknown user.
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Invalid token for email verification")]
    InvalidEmailToken,

    #[error("Account already exists")]
    EmailAlreadyExists,

    #[error("Email not confirmed")]
    EmailNotConfirmed,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Confirmation token is valid but names no known user.
    #[error("Verification error")]
    VerificationError,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Outcome of an email confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    AlreadyConfirmed,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
    email: EmailService,
}

impl AuthService {
    /// Creates a new AuthService with the given pool, signing keys and mailer.
    pub fn new(pool: PgPool, jwt: JwtConfig, email: EmailService) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt: Arc::new(jwt),
            email,
        }
    }

    /// Signing configuration in use.
    pub fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }

    /// Hashes a plaintext password.
    pub fn hash_password(&self, plain: &str) -> Result<String, AuthError> {
        Ok(password::hash_password(plain)?)
    }

    /// Checks a plaintext password against a stored hash.
    pub fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(password::verify_password(plain, hash)?)
    }

    /// Issues an access token for `email`.
    pub fn create_access_token(&self, email: &str) -> Result<String, AuthError> {
        let (token, _jti) = self.jwt.generate_access_token(email)?;
        Ok(token)
    }

    /// Issues a refresh token for `email`.
    pub fn create_refresh_token(&self, email: &str) -> Result<String, AuthError> {
        let (token, _jti) = self.jwt.generate_refresh_token(email)?;
        Ok(token)
    }

    /// Issues a fresh access/refresh pair for `email`.
    pub fn create_token_pair(&self, email: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.create_access_token(email)?,
            refresh_token: self.create_refresh_token(email)?,
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }

    /// Returns the `jti` claim of any token this service signed.
    pub fn get_jti(&self, token: &str) -> Result<String, AuthError> {
        self.jwt
            .extract_jti(token)
            .map_err(|_| AuthError::Unauthorized)
    }

    /// Signs `claims` with an added `iat` and a 7-day `exp`.
    pub fn create_email_token(&self, claims: &Map<String, Value>) -> Result<String, AuthError> {
        Ok(self.jwt.create_email_token(claims)?)
    }

    /// Returns the `sub` claim of an email token.
    ///
    /// Any decoding failure, including a missing `sub`, is reported as
    /// [`AuthError::InvalidEmailToken`].
    pub fn get_email_from_token(&self, token: &str) -> Result<String, AuthError> {
        self.jwt.decode_email_token(token).map_err(|e| {
            warn!(error = %e, "Rejected email verification token");
            AuthError::InvalidEmailToken
        })
    }

    /// Resolves the user behind an access token.
    ///
    /// Missing credentials, an invalid token and a token naming an unknown
    /// email all produce the same [`AuthError::Unauthorized`].
    pub async fn get_current_user(&self, credentials: Option<&str>) -> Result<User, AuthError> {
        let token = credentials.ok_or(AuthError::Unauthorized)?;
        let claims = self
            .jwt
            .validate_access_token(token)
            .map_err(|_| AuthError::Unauthorized)?;

        self.users
            .get_user_by_email(&claims.sub)
            .await?
            .map(User::from)
            .ok_or(AuthError::Unauthorized)
    }

    /// Registers a new, unconfirmed account and mails a confirmation link.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<User, AuthError> {
        if self.users.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = self.hash_password(plain_password)?;
        // The unique index still guards against a concurrent signup.
        let user = match self.users.create_user(username, email, &password_hash).await {
            Ok(entity) => User::from(entity),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists)
            }
            Err(e) => return Err(e.into()),
        };

        self.send_confirmation(&user).await?;

        info!(user_id = user.id, "User signed up");
        Ok(user)
    }

    /// Checks email and password and issues a token pair.
    pub async fn login(&self, email: &str, plain_password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .users
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(plain_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        if password::needs_rehash(&user.password_hash).unwrap_or(false) {
            let upgraded = self.hash_password(plain_password)?;
            if let Err(e) = self.users.update_password_hash(user.id, &upgraded).await {
                warn!(user_id = user.id, error = %e, "Failed to upgrade password hash");
            }
        }

        info!(user_id = user.id, "User logged in");
        self.create_token_pair(&user.email)
    }

    /// Exchanges a refresh token for a new pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::Unauthorized)?;

        let user = self
            .users
            .get_user_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        self.create_token_pair(&user.email)
    }

    /// Confirms the address named by an email token.
    pub async fn confirm_email(&self, token: &str) -> Result<ConfirmOutcome, AuthError> {
        let email = self.get_email_from_token(token)?;
        let user = self
            .users
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::VerificationError)?;

        if user.confirmed {
            return Ok(ConfirmOutcome::AlreadyConfirmed);
        }

        self.users.confirm_email(&email).await?;
        info!(user_id = user.id, "Email confirmed");
        Ok(ConfirmOutcome::Confirmed)
    }

    /// Re-sends the confirmation link to an unconfirmed account.
    ///
    /// Succeeds silently for unknown or already confirmed addresses so the
    /// caller cannot learn which emails are registered.
    pub async fn request_email(&self, email: &str) -> Result<(), AuthError> {
        match self.users.get_user_by_email(email).await? {
            Some(entity) if !entity.confirmed => self.send_confirmation(&User::from(entity)).await,
            _ => Ok(()),
        }
    }

    async fn send_confirmation(&self, user: &User) -> Result<(), AuthError> {
        let mut claims = Map::new();
        claims.insert("sub".to_string(), Value::from(user.email.clone()));
        let token = self.create_email_token(&claims)?;
        self.email
            .send_confirmation_email(&user.email, &user.username, &token)
            .await;
        Ok(())
    }
}
