//! Shared utilities and common types for the Contacts API.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT issuing and validation (access, refresh and email tokens)
//! - Password hashing with Argon2id
//! - Offset pagination parameters
//! - Common validation logic

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
