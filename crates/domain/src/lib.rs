//! Domain layer for the Contacts API.
//!
//! This crate contains the domain models (Contact, User) together with the
//! request payloads and response shapes the HTTP layer exchanges.

pub mod models;
