//! Contact domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A contact record owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub city: String,
    pub notes: String,
    pub user_id: i32,
}

/// Payload for creating a contact and for replacing all of its fields.
///
/// Updates are full overwrites, so the same shape serves both.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(min = 1, max = 150, message = "Surname must be 1-150 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub surname: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 150, message = "Email must be at most 150 characters"))]
    pub email: String,

    #[validate(length(max = 150, message = "Phone must be at most 150 characters"))]
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,

    #[validate(custom(function = "shared::validation::validate_birthday"))]
    pub birthday: NaiveDate,

    #[validate(length(min = 1, max = 150, message = "City must be 1-150 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub city: String,

    #[serde(default)]
    #[validate(length(max = 300, message = "Notes must be at most 300 characters"))]
    pub notes: String,
}

/// Response payload for contact operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub city: String,
    pub notes: String,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            surname: c.surname,
            email: c.email,
            phone: c.phone,
            birthday: c.birthday,
            city: c.city,
            notes: c.notes,
        }
    }
}
