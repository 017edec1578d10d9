use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PasskeepError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] figment::Error),

    #[error("Cookie secret must be at least 64 bytes")]
    CookieSecret,

    #[error("Blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl PasskeepError {
    /// Map a unique-constraint violation to `UsernameTaken`, passing every other error through.
    pub(crate) fn from_user_insert(e: SqlxError) -> Self {
        match &e {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                PasskeepError::UsernameTaken
            }
            _ => PasskeepError::DatabaseError(e),
        }
    }
}

impl From<argon2::password_hash::Error> for PasskeepError {
    fn from(e: argon2::password_hash::Error) -> Self {
        PasskeepError::PasswordHash(e.to_string())
    }
}
