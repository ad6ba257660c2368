//! Session cookie lifecycle.
//!
//! The cookie carries the upstream-issued token untouched. It is set after a
//! successful login, cleared after a successful logout, and otherwise only
//! read so the token can be relayed as a bearer credential.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

use crate::config::SessionConfig;

/// Cookie policy derived from the session config.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    max_age: Duration,
    secure: bool,
}

impl SessionCookies {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            max_age: Duration::seconds(i64::try_from(config.max_age_secs).unwrap_or(i64::MAX)),
            secure: config.secure,
        }
    }

    /// Raw cookie value, empty string included.
    pub fn token(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name).map(|cookie| cookie.value().to_owned())
    }

    /// Store `token` for the configured lifetime.
    pub fn establish(&self, jar: CookieJar, token: &str) -> CookieJar {
        let cookie = Cookie::build((self.name.clone(), token.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(self.max_age);
        jar.add(cookie)
    }

    /// Blank the cookie and expire it immediately.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let cookie = Cookie::build((self.name.clone(), String::new()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH);
        jar.add(cookie)
    }
}
