//! JWT token utilities.
//!
//! Access and refresh tokens carry the user's email in `sub`, a unique `jti`
//! and a `token_type` discriminator. Email tokens carry caller-supplied claims
//! plus `iat`/`exp` and an `email_verification` scope, and are used for
//! out-of-band flows such as email confirmation links. Decoding an email
//! token requires that scope, so access and refresh tokens never pass.
//!
//! The signing algorithm is deployment configuration: HMAC (`HS256`, `HS384`,
//! `HS512`) with a shared secret, or RSA (`RS256`, `RS384`, `RS512`) with a
//! PEM key pair.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Claims carried by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID (unique token identifier)
    pub jti: String,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Type of JWT token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Deserialize)]
struct JtiClaim {
    jti: String,
}

#[derive(Debug, Deserialize)]
struct EmailClaims {
    sub: String,
    scope: String,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Lifetime of email tokens: 7 days.
pub const EMAIL_TOKEN_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// `scope` claim stamped on every email token.
pub const EMAIL_TOKEN_SCOPE: &str = "email_verification";

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Access token expiration in seconds (default: 3600 = 1 hour)
    pub access_token_expiry_secs: i64,
    /// Refresh token expiration in seconds (default: 2592000 = 30 days)
    pub refresh_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance (default: 30)
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.refresh_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Parses an algorithm name such as `HS256` or `RS256`.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, JwtError> {
    Algorithm::from_str(&name.trim().to_uppercase())
        .map_err(|_| JwtError::UnsupportedAlgorithm(name.to_string()))
}

/// Returns true for the HMAC family, which signs with a shared secret.
pub fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

fn is_rsa(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}

impl JwtConfig {
    /// Creates a JwtConfig signing with an HMAC shared secret.
    ///
    /// # Arguments
    /// * `algorithm` - One of `HS256`, `HS384`, `HS512`
    /// * `secret` - Shared secret, must not be empty
    /// * `access_token_expiry_secs` - Access token expiration in seconds
    /// * `refresh_token_expiry_secs` - Refresh token expiration in seconds
    pub fn from_secret(
        algorithm: Algorithm,
        secret: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Result<Self, JwtError> {
        if !is_hmac(algorithm) {
            return Err(JwtError::UnsupportedAlgorithm(format!(
                "{:?} cannot sign with a shared secret",
                algorithm
            )));
        }
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("Secret key is empty".to_string()));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        })
    }

    /// Creates a JwtConfig from an RSA key pair in PEM format.
    ///
    /// # Arguments
    /// * `algorithm` - One of the `RS*` or `PS*` algorithms
    /// * `private_key_pem` - RSA private key in PEM format
    /// * `public_key_pem` - RSA public key in PEM format
    /// * `access_token_expiry_secs` - Access token expiration in seconds
    /// * `refresh_token_expiry_secs` - Refresh token expiration in seconds
    pub fn from_rsa_pem(
        algorithm: Algorithm,
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Result<Self, JwtError> {
        if !is_rsa(algorithm) {
            return Err(JwtError::UnsupportedAlgorithm(format!(
                "{:?} cannot sign with an RSA key",
                algorithm
            )));
        }

        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            algorithm,
            encoding_key,
            decoding_key,
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        })
    }

    /// Overrides the clock skew leeway.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Returns the signing algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Generates an access token for the given email. Returns `(token, jti)`.
    pub fn generate_access_token(&self, email: &str) -> Result<(String, String), JwtError> {
        self.generate_token(email, TokenType::Access, self.access_token_expiry_secs)
    }

    /// Generates a refresh token for the given email. Returns `(token, jti)`.
    pub fn generate_refresh_token(&self, email: &str) -> Result<(String, String), JwtError> {
        self.generate_token(email, TokenType::Refresh, self.refresh_token_expiry_secs)
    }

    fn generate_token(
        &self,
        email: &str,
        token_type: TokenType,
        expiry_secs: i64,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let exp = (now + Duration::seconds(expiry_secs)).timestamp();

        let claims = Claims {
            sub: email.to_string(),
            exp,
            iat: now.timestamp(),
            jti: jti.clone(),
            token_type,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        validation
    }

    fn decode_as<T: serde::de::DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        decode::<T>(token, &self.decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_as::<Claims>(token)
    }

    /// Validates an access token specifically.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validates a refresh token specifically.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    /// Decodes any signed token and returns its `jti` claim.
    pub fn extract_jti(&self, token: &str) -> Result<String, JwtError> {
        self.decode_as::<JtiClaim>(token).map(|c| c.jti)
    }

    /// Signs arbitrary claims with `iat`, a 7-day `exp` and the email scope
    /// added.
    ///
    /// Caller-supplied `iat`/`exp`/`scope` values are overwritten.
    pub fn create_email_token(&self, data: &Map<String, Value>) -> Result<String, JwtError> {
        let now = Utc::now();
        let expire = now + Duration::seconds(EMAIL_TOKEN_EXPIRY_SECS);

        let mut to_encode = data.clone();
        to_encode.insert("iat".to_string(), Value::from(now.timestamp()));
        to_encode.insert("exp".to_string(), Value::from(expire.timestamp()));
        to_encode.insert("scope".to_string(), Value::from(EMAIL_TOKEN_SCOPE));

        encode(&Header::new(self.algorithm), &to_encode, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Decodes an email token and returns its `sub` claim.
    ///
    /// Tokens without the email scope are rejected as [`JwtError::InvalidToken`].
    pub fn decode_email_token(&self, token: &str) -> Result<String, JwtError> {
        let claims = self.decode_as::<EmailClaims>(token)?;
        if claims.scope != EMAIL_TOKEN_SCOPE {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims.sub)
    }
}
