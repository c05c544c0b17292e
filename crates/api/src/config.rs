use serde::Deserialize;
use shared::jwt::{is_hmac, parse_algorithm, JwtConfig, JwtError};
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    /// JWT signing configuration
    pub jwt: JwtAuthConfig,
    /// Access token cookie configuration
    #[serde(default)]
    pub cookies: CookieConfig,
    /// Optional route groups
    #[serde(default)]
    pub features: FeaturesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Public base URL used to build email confirmation links
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// Signing algorithm: HS256, HS384, HS512 or RS256/RS384/RS512
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,

    /// Shared secret for the HS* algorithms
    #[serde(default)]
    pub secret_key: String,

    /// RSA private key in PEM format for the RS* algorithms
    #[serde(default)]
    pub private_key: String,

    /// RSA public key in PEM format for the RS* algorithms
    #[serde(default)]
    pub public_key: String,

    /// Access token expiration in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,

    /// Refresh token expiration in seconds (default: 2592000 = 30 days)
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: i64,

    /// Leeway in seconds for clock skew tolerance (default: 30)
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

impl JwtAuthConfig {
    /// Builds signing and verification keys for the configured algorithm.
    pub fn to_jwt_config(&self) -> Result<JwtConfig, JwtError> {
        let algorithm = parse_algorithm(&self.algorithm)?;
        let config = if is_hmac(algorithm) {
            JwtConfig::from_secret(
                algorithm,
                &self.secret_key,
                self.access_token_expiry_secs,
                self.refresh_token_expiry_secs,
            )?
        } else {
            JwtConfig::from_rsa_pem(
                algorithm,
                &self.private_key,
                &self.public_key,
                self.access_token_expiry_secs,
                self.refresh_token_expiry_secs,
            )?
        };
        Ok(config.with_leeway(self.leeway_secs))
    }
}

/// Cookie settings for the access token cookie.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    /// Whether login sets the access token cookie
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Adds the `Secure` attribute (HTTPS only)
    #[serde(default)]
    pub secure: bool,

    /// `SameSite` attribute: Strict, Lax or None
    #[serde(default = "default_same_site")]
    pub same_site: String,

    /// `Domain` attribute, omitted when empty
    #[serde(default)]
    pub domain: String,

    #[serde(default = "default_access_token_cookie_name")]
    pub access_token_name: String,

    #[serde(default = "default_access_token_cookie_path")]
    pub access_token_path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            secure: false,
            same_site: default_same_site(),
            domain: String::new(),
            access_token_name: default_access_token_cookie_name(),
            access_token_path: default_access_token_cookie_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturesConfig {
    /// Exposes `GET /api/v1/contacts/all`, which lists every user's contacts
    #[serde(default)]
    pub all_contacts_enabled: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_app_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}
fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}
fn default_refresh_token_expiry() -> i64 {
    2592000 // 30 days
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_same_site() -> String {
    "Lax".to_string()
}
fn default_access_token_cookie_name() -> String {
    "access_token_cookie".to_string()
}
fn default_access_token_cookie_path() -> String {
    "/".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CONTACTS__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CONTACTS").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the config directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            app_base_url = "http://localhost:8080"

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [jwt]
            algorithm = "HS256"
            secret_key = "test-secret-key"
            access_token_expiry_secs = 3600
            refresh_token_expiry_secs = 2592000
            leeway_secs = 30

            [cookies]
            enabled = true
            secure = false
            same_site = "Lax"

            [features]
            all_contacts_enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "CONTACTS__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        let algorithm = parse_algorithm(&self.jwt.algorithm)
            .map_err(|e| ConfigValidationError::InvalidValue(e.to_string()))?;
        if is_hmac(algorithm) {
            if self.jwt.secret_key.is_empty() {
                return Err(ConfigValidationError::MissingRequired(
                    "CONTACTS__JWT__SECRET_KEY must be set for HMAC algorithms".to_string(),
                ));
            }
        } else if self.jwt.private_key.is_empty() || self.jwt.public_key.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "jwt.private_key and jwt.public_key must be set for RSA algorithms".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
