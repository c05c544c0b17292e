//! Cookie helper for the httpOnly access token cookie.
//!
//! Login sets the cookie alongside the JSON token pair so browser clients can
//! authenticate without handling the token. Refresh tokens are never placed
//! in a cookie.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::config::CookieConfig;

/// Cookie helper for managing the access token cookie.
#[derive(Debug, Clone)]
pub struct CookieHelper {
    config: CookieConfig,
    /// Access token expiry in seconds (from JWT config)
    access_token_expiry_secs: i64,
}

impl CookieHelper {
    /// Create a new cookie helper with configuration.
    pub fn new(config: CookieConfig, access_token_expiry_secs: i64) -> Self {
        Self {
            config,
            access_token_expiry_secs,
        }
    }

    /// Check if cookie authentication is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Build a Set-Cookie header value for the access token.
    pub fn build_access_token_cookie(&self, token: &str) -> String {
        let cookie = format!(
            "{}={}; Path={}; Max-Age={}",
            self.config.access_token_name,
            token,
            self.config.access_token_path,
            self.access_token_expiry_secs
        );
        self.with_attributes(cookie)
    }

    /// Build a Set-Cookie header that clears the access token cookie.
    pub fn build_clear_access_token_cookie(&self) -> String {
        let cookie = format!(
            "{}=; Path={}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            self.config.access_token_name, self.config.access_token_path
        );
        self.with_attributes(cookie)
    }

    /// Append the access token cookie to a HeaderMap.
    pub fn add_access_token_cookie(&self, headers: &mut HeaderMap, access_token: &str) {
        if !self.is_enabled() {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(&self.build_access_token_cookie(access_token)) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Append a clearing cookie to a HeaderMap (for logout).
    pub fn add_clear_cookie(&self, headers: &mut HeaderMap) {
        if !self.is_enabled() {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(&self.build_clear_access_token_cookie()) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Extract a cookie value from request headers by name.
    ///
    /// Every `Cookie` header is searched, since HTTP/2 clients may split them.
    pub fn extract_cookie<'a>(&self, headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|cookie_header| cookie_header.split(';').map(|s| s.trim()))
            .find_map(|cookie| {
                let (cookie_name, cookie_value) = cookie.split_once('=')?;
                (cookie_name == name && !cookie_value.is_empty()).then_some(cookie_value)
            })
    }

    /// Extract the access token from request cookies.
    ///
    /// Returns `None` when cookie authentication is disabled.
    pub fn extract_access_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        if !self.is_enabled() {
            return None;
        }
        self.extract_cookie(headers, &self.config.access_token_name)
    }

    fn with_attributes(&self, mut cookie: String) -> String {
        cookie.push_str("; HttpOnly");

        if self.config.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.config.same_site));

        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }

        cookie
    }
}
