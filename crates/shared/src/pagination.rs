//! Offset pagination parameters.

use serde::Deserialize;
use validator::Validate;

/// Default page size when `limit` is omitted.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 500;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// `?limit=&offset=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize, Validate, PartialEq, Eq)]
pub struct PageParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT, message = "limit must be between 1 and 500"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: i64,
}
