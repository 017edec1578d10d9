use crate::db::models::{DbPasswordEntry, DbUser, SiteCredential};
use crate::db::schema::{SQLITE_DROP, SQLITE_INIT};
use crate::error::PasskeepError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Connect to `database_url`, creating the file if needed, and ensure the schema exists.
pub async fn open(database_url: &str) -> Result<VaultStorage, PasskeepError> {
    // Foreign keys stay declarative only; sqlx turns enforcement on by default.
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    let storage = VaultStorage::new(pool);
    storage.init_schema().await?;
    info!(database_url = %database_url, "database ready");
    Ok(storage)
}

#[derive(Clone)]
pub struct VaultStorage {
    pool: SqlitePool,
}

impl VaultStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), PasskeepError> {
        self.execute_script(SQLITE_INIT).await
    }

    /// Drop both tables and reclaim the file space.
    pub async fn clear_schema(&self) -> Result<(), PasskeepError> {
        self.execute_script(SQLITE_DROP).await?;
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<(), PasskeepError> {
        // sqlx::query runs a single statement at a time
        for stmt in script.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new user. Returns the row id, or `UsernameTaken` when the
    /// unique constraint on `username` rejects the insert.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, PasskeepError> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(PasskeepError::from_user_insert)?;
        Ok(result.last_insert_rowid())
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<DbUser>, PasskeepError> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn list_entries(&self, user_id: i64) -> Result<Vec<DbPasswordEntry>, PasskeepError> {
        let rows = sqlx::query_as::<_, DbPasswordEntry>(
            r#"SELECT id, user_id, site_name, site_url, site_password
               FROM passwords WHERE user_id = ? ORDER BY id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert an entry owned by `user_id`. Returns the row id.
    pub async fn add_entry(
        &self,
        user_id: i64,
        entry: &SiteCredential,
    ) -> Result<i64, PasskeepError> {
        let result = sqlx::query(
            r#"INSERT INTO passwords (user_id, site_name, site_url, site_password)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(user_id)
        .bind(&entry.site_name)
        .bind(&entry.site_url)
        .bind(&entry.site_password)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Update entry `id` only if it belongs to `user_id`.
    /// Returns false when no row matched (unknown id or someone else's entry).
    pub async fn update_entry(
        &self,
        id: i64,
        user_id: i64,
        entry: &SiteCredential,
    ) -> Result<bool, PasskeepError> {
        let result = sqlx::query(
            r#"UPDATE passwords SET
                site_name = ?,
                site_url = ?,
                site_password = ?
              WHERE id = ? AND user_id = ?"#,
        )
        .bind(&entry.site_name)
        .bind(&entry.site_url)
        .bind(&entry.site_password)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
