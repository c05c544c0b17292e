//! Domain models for the Contacts API.

pub mod contact;
pub mod user;

pub use contact::{Contact, ContactRequest, ContactResponse};
pub use user::{User, UserResponse};
