//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account that owns contacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            confirmed: u.confirmed,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "mykola".to_string(),
            email: "mykola@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            confirmed: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_serialization_skips_password_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "mykola@example.com");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_user_response_from_user() {
        let response = UserResponse::from(sample_user());
        assert_eq!(response.id, 1);
        assert_eq!(response.username, "mykola");
        assert!(response.confirmed);
    }
}
