use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PasskeepError;

/// Environment variables with this prefix override the defaults, e.g. `PASSKEEP_DATABASE_URL`.
pub const ENV_PREFIX: &str = "PASSKEEP_";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Master key for the private cookie jar. At least 64 bytes.
    pub cookie_secret: Option<String>,
    /// Drop the `Secure` attribute from cookies (plain-http deployments).
    pub insecure_cookie: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://database.db".to_string(),
            listen_addr: "127.0.0.1:5000".to_string(),
            loglevel: "info".to_string(),
            cookie_secret: None,
            insecure_cookie: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, PasskeepError> {
        Self::from_figment(Figment::from(Serialized::defaults(Config::default())))
    }

    fn from_figment(base: Figment) -> Result<Self, PasskeepError> {
        Ok(base.merge(Env::prefixed(ENV_PREFIX)).extract()?)
    }

    /// Cookie key derived from `cookie_secret`, or a random per-process key when unset.
    pub fn cookie_key(&self) -> Result<Key, PasskeepError> {
        match self.cookie_secret.as_deref() {
            Some(secret) => {
                Key::try_from(secret.as_bytes()).map_err(|_| PasskeepError::CookieSecret)
            }
            None => {
                warn!("cookie_secret not set; sessions will not survive a restart");
                Ok(Key::generate())
            }
        }
    }
}
