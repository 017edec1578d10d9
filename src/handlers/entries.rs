use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::{error, info, warn};

use super::redirect_with_flash;
use crate::db::SiteCredential;
use crate::middleware::auth::SessionUser;
use crate::middleware::flash::{self, DATABASE_ERROR};
use crate::{pages, server::router::PasskeepState};

/// GET /dashboard -> every entry owned by the session user.
pub async fn dashboard(
    State(state): State<PasskeepState>,
    SessionUser(user_id): SessionUser,
    jar: PrivateCookieJar,
) -> Response {
    let entries = match state.storage.list_entries(user_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(user_id, error = %e, "failed to list entries");
            return redirect_with_flash(jar, state.cookies, DATABASE_ERROR, "/login");
        }
    };
    let (jar, messages) = flash::take(jar);
    (jar, Html(pages::dashboard(&messages, &entries))).into_response()
}

pub async fn add_password(
    State(state): State<PasskeepState>,
    SessionUser(user_id): SessionUser,
    jar: PrivateCookieJar,
    Form(entry): Form<SiteCredential>,
) -> Response {
    match state.storage.add_entry(user_id, &entry).await {
        Ok(id) => {
            info!(user_id, entry_id = id, "added password entry");
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            error!(user_id, error = %e, "failed to add entry");
            redirect_with_flash(jar, state.cookies, DATABASE_ERROR, "/dashboard")
        }
    }
}

/// POST /update_password/{id} -> only touches the row when it belongs to the session user.
pub async fn update_password(
    State(state): State<PasskeepState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<i64>,
    jar: PrivateCookieJar,
    Form(entry): Form<SiteCredential>,
) -> Response {
    match state.storage.update_entry(id, user_id, &entry).await {
        Ok(true) => {
            info!(user_id, entry_id = id, "updated password entry");
            Redirect::to("/dashboard").into_response()
        }
        Ok(false) => {
            warn!(user_id, entry_id = id, "update matched no entry owned by user");
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            error!(user_id, entry_id = id, error = %e, "failed to update entry");
            redirect_with_flash(jar, state.cookies, DATABASE_ERROR, "/dashboard")
        }
    }
}
