//! Contact CRUD routes.
//!
//! Every route except `GET /api/v1/contacts/all` is scoped to the
//! authenticated user; another user's contact id answers 404.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{Contact, ContactRequest, ContactResponse};
use persistence::repositories::ContactRepository;
use shared::pagination::PageParams;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery, CurrentUser};

fn contact_not_found() -> ApiError {
    ApiError::NotFound("Contact not found".to_string())
}

/// Maps the unique email index violation to a contact-specific conflict.
fn write_error(err: sqlx::Error) -> ApiError {
    match ApiError::from(err) {
        ApiError::Conflict(_) => {
            ApiError::Conflict("A contact with this email already exists".to_string())
        }
        other => other,
    }
}

fn to_responses(entities: Vec<persistence::entities::ContactEntity>) -> Vec<ContactResponse> {
    entities
        .into_iter()
        .map(|e| ContactResponse::from(Contact::from(e)))
        .collect()
}

/// List the caller's contacts.
///
/// GET /api/v1/contacts?limit=&offset=
pub async fn list_contacts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    page.validate()?;

    let repo = ContactRepository::new(state.pool.clone());
    let contacts = repo.get_contacts(page.limit, page.offset, user.id).await?;

    Ok(Json(to_responses(contacts)))
}

/// List contacts across every user.
///
/// GET /api/v1/contacts/all?limit=&offset=
///
/// Only routed when `features.all_contacts_enabled` is set.
pub async fn list_all_contacts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    page.validate()?;

    let repo = ContactRepository::new(state.pool.clone());
    let contacts = repo.get_all_contacts(page.limit, page.offset).await?;

    info!(
        user_id = user.id,
        count = contacts.len(),
        "Unscoped contact listing served"
    );

    Ok(Json(to_responses(contacts)))
}

/// Fetch one of the caller's contacts.
///
/// GET /api/v1/contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(contact_id): ApiPath<i32>,
) -> Result<Json<ContactResponse>, ApiError> {
    let repo = ContactRepository::new(state.pool.clone());
    let contact = repo
        .get_contact(contact_id, user.id)
        .await?
        .ok_or_else(contact_not_found)?;

    Ok(Json(Contact::from(contact).into()))
}

/// Create a contact owned by the caller.
///
/// POST /api/v1/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    request.validate()?;

    let repo = ContactRepository::new(state.pool.clone());
    let contact = repo
        .create_contact(&request, user.id)
        .await
        .map_err(write_error)?;

    info!(contact_id = contact.id, user_id = user.id, "Contact created");

    Ok((StatusCode::CREATED, Json(Contact::from(contact).into())))
}

/// Replace every field of one of the caller's contacts.
///
/// PUT /api/v1/contacts/:id
pub async fn update_contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(contact_id): ApiPath<i32>,
    ApiJson(request): ApiJson<ContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    request.validate()?;

    let repo = ContactRepository::new(state.pool.clone());
    let contact = repo
        .update_contact(contact_id, &request, user.id)
        .await
        .map_err(write_error)?
        .ok_or_else(contact_not_found)?;

    info!(contact_id = contact.id, user_id = user.id, "Contact updated");

    Ok(Json(Contact::from(contact).into()))
}

/// Delete one of the caller's contacts and return it as it was.
///
/// DELETE /api/v1/contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(contact_id): ApiPath<i32>,
) -> Result<Json<ContactResponse>, ApiError> {
    let repo = ContactRepository::new(state.pool.clone());
    let contact = repo
        .remove_contact(contact_id, user.id)
        .await?
        .ok_or_else(contact_not_found)?;

    info!(contact_id = contact.id, user_id = user.id, "Contact deleted");

    Ok(Json(Contact::from(contact).into()))
}
