//! Custom Axum extractors.
//!
//! Extractors for credentials, the authenticated user, and request bodies,
//! queries and paths that reject with `ApiError`.

pub mod auth;
pub mod request;

pub use auth::{AccessCredentials, CurrentUser, RefreshCredentials};
pub use request::{ApiJson, ApiPath, ApiQuery};
