use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{error, info};

use super::redirect_with_flash;
use crate::middleware::auth::{end_session, start_session};
use crate::middleware::flash::{self, DATABASE_ERROR};
use crate::service::password::{hash_password_off_runtime, verify_password_off_runtime};
use crate::{PasskeepError, pages, server::router::PasskeepState};

#[derive(Debug, Deserialize)]
pub struct AccountForm {
    pub username: String,
    pub password: String,
}

/// GET / -> the registration page is the landing page.
pub async fn index() -> Redirect {
    Redirect::to("/register")
}

pub async fn register_page(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, messages) = flash::take(jar);
    (jar, Html(pages::register(&messages)))
}

/// POST /register -> one insert; the unique username constraint is the only validation.
pub async fn register(
    State(state): State<PasskeepState>,
    jar: PrivateCookieJar,
    Form(form): Form<AccountForm>,
) -> Response {
    let hashed = match hash_password_off_runtime(form.password).await {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "failed to hash password");
            return redirect_with_flash(jar, state.cookies, DATABASE_ERROR, "/register");
        }
    };

    match state.storage.create_user(&form.username, &hashed).await {
        Ok(user_id) => {
            info!(user_id, "registered new user");
            redirect_with_flash(
                jar,
                state.cookies,
                "Registered successfully! Please login.",
                "/login",
            )
        }
        Err(PasskeepError::UsernameTaken) => {
            redirect_with_flash(jar, state.cookies, "Username already exists", "/register")
        }
        Err(e) => {
            error!(error = %e, "registration failed");
            redirect_with_flash(jar, state.cookies, DATABASE_ERROR, "/register")
        }
    }
}

pub async fn login_page(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, messages) = flash::take(jar);
    (jar, Html(pages::login(&messages)))
}

/// POST /login -> unknown user and wrong password are reported identically.
pub async fn login(
    State(state): State<PasskeepState>,
    jar: PrivateCookieJar,
    Form(form): Form<AccountForm>,
) -> Response {
    let user = match state.storage.find_user(&form.username).await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "login lookup failed");
            return redirect_with_flash(jar, state.cookies, DATABASE_ERROR, "/login");
        }
    };

    let verified = match user {
        Some(user) => match verify_password_off_runtime(form.password, user.password).await {
            Ok(true) => Some(user.id),
            Ok(false) => None,
            Err(e) => {
                error!(error = %e, "password verification failed");
                return redirect_with_flash(jar, state.cookies, DATABASE_ERROR, "/login");
            }
        },
        None => None,
    };

    match verified {
        Some(user_id) => {
            info!(user_id, "user logged in");
            let jar = start_session(jar, state.cookies, user_id);
            (jar, Redirect::to("/dashboard")).into_response()
        }
        None => redirect_with_flash(
            jar,
            state.cookies,
            "Invalid username or password",
            "/login",
        ),
    }
}

pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (end_session(jar), Redirect::to("/"))
}
