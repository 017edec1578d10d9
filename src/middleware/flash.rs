//! One-shot user notices carried between a redirect and the next rendered page.
//!
//! Messages are kept as a JSON array in a private cookie, so they are
//! tamper-proof and unreadable to the client like the session itself.

use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::warn;

use crate::middleware::cookies::{CookieSettings, clear_cookie};

pub const FLASH_COOKIE: &str = "flash";

/// Only the most recent messages are kept so the cookie stays well under 4 KiB.
pub const MAX_MESSAGES: usize = 8;

pub const DATABASE_ERROR: &str = "Database error occurred. Please try again later.";

/// Append `message` to the pending flash messages, dropping the oldest beyond [`MAX_MESSAGES`].
pub fn push(jar: PrivateCookieJar, cookies: CookieSettings, message: &str) -> PrivateCookieJar {
    let mut messages = pending(&jar);
    messages.push(message.to_string());
    if messages.len() > MAX_MESSAGES {
        messages.drain(..messages.len() - MAX_MESSAGES);
    }
    match serde_json::to_string(&messages) {
        Ok(value) => jar.add(cookies.build_short_lived(FLASH_COOKIE, value)),
        Err(e) => {
            warn!(error = %e, "failed to encode flash messages");
            jar
        }
    }
}

/// Drain every pending message, removing the cookie.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<String>) {
    let messages = pending(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    (jar.remove(clear_cookie(FLASH_COOKIE)), messages)
}

fn pending(jar: &PrivateCookieJar) -> Vec<String> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };
    serde_json::from_str(cookie.value()).unwrap_or_else(|e| {
        warn!(error = %e, "discarding malformed flash cookie");
        Vec::new()
    })
}
