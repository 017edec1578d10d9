use serde::Deserialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    /// Salted hash, never the plaintext.
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbPasswordEntry {
    pub id: i64,
    pub user_id: i64,
    pub site_name: String,
    pub site_url: String,
    pub site_password: String,
}

/// The mutable fields of a password entry, as submitted by the add and update forms.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SiteCredential {
    pub site_name: String,
    pub site_url: String,
    pub site_password: String,
}
