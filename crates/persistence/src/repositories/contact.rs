//! Contact repository for database operations.
//!
//! Every query except [`ContactRepository::get_all_contacts`] carries an
//! explicit `user_id` predicate, so a contact is only visible to its owner.
//! Each call is a single statement and commits on its own.

use domain::models::contact::ContactRequest;
use sqlx::PgPool;

use crate::entities::ContactEntity;
use crate::metrics::QueryTimer;

/// Repository for contact-related database operations.
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    /// Creates a new ContactRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Page of contacts owned by `user_id`.
    pub async fn get_contacts(
        &self,
        limit: i64,
        offset: i64,
        user_id: i32,
    ) -> Result<Vec<ContactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_contacts");
        let result = sqlx::query_as::<_, ContactEntity>(
            r#"
            SELECT id, name, surname, email, phone, birthday, city, notes, user_id
            FROM contacts
            WHERE user_id = $1
            ORDER BY id
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Page of contacts across all users, without an ownership filter.
    pub async fn get_all_contacts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_all_contacts");
        let result = sqlx::query_as::<_, ContactEntity>(
            r#"
            SELECT id, name, surname, email, phone, birthday, city, notes, user_id
            FROM contacts
            ORDER BY id
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a contact by ID owned by `user_id`.
    pub async fn get_contact(
        &self,
        contact_id: i32,
        user_id: i32,
    ) -> Result<Option<ContactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_contact");
        let result = sqlx::query_as::<_, ContactEntity>(
            r#"
            SELECT id, name, surname, email, phone, birthday, city, notes, user_id
            FROM contacts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(contact_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new contact owned by `user_id` and return the stored row.
    pub async fn create_contact(
        &self,
        body: &ContactRequest,
        user_id: i32,
    ) -> Result<ContactEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_contact");
        let result = sqlx::query_as::<_, ContactEntity>(
            r#"
            INSERT INTO contacts (name, surname, email, phone, birthday, city, notes, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, surname, email, phone, birthday, city, notes, user_id
            "#,
        )
        .bind(&body.name)
        .bind(&body.surname)
        .bind(&body.email)
        .bind(&body.phone)
        .bind(body.birthday)
        .bind(&body.city)
        .bind(&body.notes)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Overwrite every field of the contact matching (`contact_id`, `user_id`).
    /// Returns `None` without touching any row when nothing matches.
    pub async fn update_contact(
        &self,
        contact_id: i32,
        body: &ContactRequest,
        user_id: i32,
    ) -> Result<Option<ContactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_contact");
        let result = sqlx::query_as::<_, ContactEntity>(
            r#"
            UPDATE contacts SET
                name = $3,
                surname = $4,
                email = $5,
                phone = $6,
                birthday = $7,
                city = $8,
                notes = $9
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, surname, email, phone, birthday, city, notes, user_id
            "#,
        )
        .bind(contact_id)
        .bind(user_id)
        .bind(&body.name)
        .bind(&body.surname)
        .bind(&body.email)
        .bind(&body.phone)
        .bind(body.birthday)
        .bind(&body.city)
        .bind(&body.notes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete the contact matching (`contact_id`, `user_id`).
    /// Returns the row as it was before deletion, or `None`.
    pub async fn remove_contact(
        &self,
        contact_id: i32,
        user_id: i32,
    ) -> Result<Option<ContactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("remove_contact");
        let result = sqlx::query_as::<_, ContactEntity>(
            r#"
            DELETE FROM contacts
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, surname, email, phone, birthday, city, notes, user_id
            "#,
        )
        .bind(contact_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
