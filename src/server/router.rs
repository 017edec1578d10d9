use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use crate::db::VaultStorage;
use crate::handlers::accounts::{index, login, login_page, logout, register, register_page};
use crate::handlers::entries::{add_password, dashboard, update_password};
use crate::middleware::cookies::CookieSettings;

/// Request-scoped context shared by every handler.
#[derive(Clone)]
pub struct PasskeepState {
    pub storage: VaultStorage,
    pub key: Key,
    pub cookies: CookieSettings,
}

impl PasskeepState {
    pub fn new(storage: VaultStorage, key: Key, insecure_cookie: bool) -> Self {
        Self {
            storage,
            key,
            cookies: CookieSettings::new(insecure_cookie),
        }
    }
}

impl FromRef<PasskeepState> for Key {
    fn from_ref(state: &PasskeepState) -> Self {
        state.key.clone()
    }
}

pub fn passkeep_router(state: PasskeepState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
        .route("/dashboard", get(dashboard))
        .route("/add_password", post(add_password))
        .route("/update_password/{id}", post(update_password))
        .with_state(state)
}
