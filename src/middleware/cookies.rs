use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Attributes shared by every cookie the app sets.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
}

impl CookieSettings {
    pub fn new(insecure_cookie: bool) -> Self {
        Self {
            secure: !insecure_cookie,
        }
    }

    /// Cookie with no Max-Age; it lives until removed or the browser session ends.
    pub fn build(&self, name: &str, value: String) -> Cookie<'static> {
        Cookie::build(Cookie::new(name.to_string(), value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build()
    }

    pub fn build_short_lived(&self, name: &str, value: String) -> Cookie<'static> {
        Cookie::build(Cookie::new(name.to_string(), value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::minutes(15))
            .build()
    }
}

/// Removal cookie; path must match the one the cookie was set with.
pub fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .build()
}
