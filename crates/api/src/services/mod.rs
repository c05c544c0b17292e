//! Application services used by the route handlers.

pub mod auth;
pub mod cookies;
pub mod email;

pub use auth::AuthService;
pub use cookies::CookieHelper;
pub use email::EmailService;
