use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::middleware::cookies::CookieSettings;
use crate::middleware::flash;

pub mod accounts;
pub mod entries;

fn redirect_with_flash(
    jar: PrivateCookieJar,
    cookies: CookieSettings,
    message: &str,
    to: &str,
) -> Response {
    (flash::push(jar, cookies, message), Redirect::to(to)).into_response()
}
