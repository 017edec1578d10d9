//! SQL DDL for the account and password-entry tables.

/// SQLite schema with:
/// - `users.username` UNIQUE; registration relies on this constraint alone
/// - `users.password` holding the PHC-format salted hash
/// - `passwords.user_id` declared as a reference to `users(id)`, no cascade
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS passwords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    site_name TEXT NOT NULL,
    site_url TEXT NOT NULL,
    site_password TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
"#;

/// Drops every table created by [`SQLITE_INIT`]. Children first.
pub const SQLITE_DROP: &str = r#"
DROP TABLE IF EXISTS passwords;
DROP TABLE IF EXISTS users;
"#;
