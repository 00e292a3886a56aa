//! Contact storage: the one durable fact the bot keeps about a user.
//!
//! `ContactStore` is what the navigation core depends on; `SqliteContactStore`
//! is the production implementation on top of the shared r2d2 pool.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

use crate::core::error::AppResult;
use crate::navigation::UserId;
use crate::storage::db::{self, DbPool};

/// A stored e-mail for a Telegram user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub user_id: i64,
    pub email: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`
    pub last_updated: String,
}

/// Persistence for captured e-mails.
///
/// Writes are upserts keyed on the user id, last write wins. Nothing in the
/// bot ever deletes a record.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Returns the stored e-mail, if the user ever left one.
    async fn get_email(&self, user: UserId) -> AppResult<Option<String>>;

    /// Stores (or replaces) the user's e-mail.
    async fn save_email(&self, user: UserId, email: &str) -> AppResult<()>;
}

/// SQLite-backed contact store.
#[derive(Clone)]
pub struct SqliteContactStore {
    db_pool: Arc<DbPool>,
}

impl SqliteContactStore {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    async fn get_email(&self, user: UserId) -> AppResult<Option<String>> {
        let db_pool = Arc::clone(&self.db_pool);
        tokio::task::spawn_blocking(move || -> AppResult<Option<String>> {
            let conn = db::get_connection(&db_pool)?;
            Ok(get_email(&conn, user)?)
        })
        .await?
    }

    async fn save_email(&self, user: UserId, email: &str) -> AppResult<()> {
        let db_pool = Arc::clone(&self.db_pool);
        let email = email.to_string();
        tokio::task::spawn_blocking(move || -> AppResult<()> {
            let conn = db::get_connection(&db_pool)?;
            upsert_email(&conn, user, &email)?;
            Ok(())
        })
        .await?
    }
}

/// Gets the stored e-mail for a user.
pub fn get_email(conn: &Connection, user_id: i64) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT email FROM contacts WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .optional()
}

/// Inserts the e-mail or replaces the existing one, refreshing `last_updated`.
pub fn upsert_email(conn: &Connection, user_id: i64, email: &str) -> rusqlite::Result<()> {
    let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    conn.execute(
        "INSERT INTO contacts (user_id, email, last_updated) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id) DO UPDATE SET email = excluded.email, last_updated = excluded.last_updated",
        params![user_id, email, now],
    )?;
    Ok(())
}

/// Returns every contact, oldest update first.
pub fn get_all_contacts(conn: &Connection) -> rusqlite::Result<Vec<ContactRecord>> {
    let mut stmt =
        conn.prepare("SELECT user_id, email, last_updated FROM contacts ORDER BY last_updated ASC, user_id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(ContactRecord {
            user_id: row.get(0)?,
            email: row.get(1)?,
            last_updated: row.get(2)?,
        })
    })?;

    rows.collect()
}
