//! Contact entity (database row mapping).

use chrono::NaiveDate;
use sqlx::FromRow;

use domain::models::Contact;

/// Database row mapping for the contacts table.
#[derive(Debug, Clone, FromRow)]
pub struct ContactEntity {
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

impl From<ContactEntity> for Contact {
    fn from(entity: ContactEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            surname: entity.surname,
            email: entity.email,
            phone: entity.phone,
            birthday: entity.birthday,
            city: entity.city,
            notes: entity.notes,
            user_id: entity.user_id,
        }
    }
}
