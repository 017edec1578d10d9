use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Key, PrivateCookieJar};

use crate::middleware::cookies::{CookieSettings, clear_cookie};

/// Private cookie holding the authenticated user's id.
pub const SESSION_COOKIE: &str = "user_id";

/// Read the session user id, if the cookie is present and decrypts.
pub fn session_user_id(jar: &PrivateCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| c.value().parse::<i64>().ok())
}

pub fn start_session(
    jar: PrivateCookieJar,
    cookies: CookieSettings,
    user_id: i64,
) -> PrivateCookieJar {
    jar.add(cookies.build(SESSION_COOKIE, user_id.to_string()))
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(SESSION_COOKIE))
}

/// Extractor for routes that need a logged-in user.
/// Anonymous requests (no cookie, or one that fails to decrypt) are redirected to `/login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser(pub i64);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(jar) = PrivateCookieJar::<Key>::from_request_parts(parts, state).await;
        session_user_id(&jar)
            .map(SessionUser)
            .ok_or_else(|| Redirect::to("/login"))
    }
}
