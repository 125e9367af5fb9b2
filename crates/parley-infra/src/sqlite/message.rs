//! SQLite message repository implementation.
//!
//! Mirrors `SqliteChatRepository`: raw queries, a private Row struct,
//! rows_affected checks for NotFound. Adds the `recent` window query the
//! orchestrator uses for context assembly.

use chrono::{DateTime, Utc};
use sqlx::Row;

use parley_core::message::repository::MessageRepository;
use parley_types::chat::{Message, MessageRole, NewMessage};
use parley_types::error::StoreError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    chat_id: i64,
    author_id: Option<String>,
    role: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            author_id: row.try_get("author_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_message(self) -> Result<Message, StoreError> {
        let role: MessageRole = self.role.parse().map_err(StoreError::Query)?;

        Ok(Message {
            id: self.id,
            chat_id: self.chat_id,
            author_id: self.author_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Conflict(db.to_string()),
        _ => StoreError::Query(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// MessageRepository implementation
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, new: NewMessage) -> Result<Message, StoreError> {
        let now = Utc::now();
        let stamp = format_datetime(&now);

        let result = sqlx::query(
            "INSERT INTO messages (chat_id, author_id, role, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new.chat_id)
        .bind(&new.author_id)
        .bind(new.role.to_string())
        .bind(&new.content)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;

        Ok(Message {
            id: result.last_insert_rowid(),
            chat_id: new.chat_id,
            author_id: new.author_id,
            role: new.role,
            content: new.content,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: i64) -> Result<Message, StoreError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        match row {
            Some(row) => MessageRow::from_row(&row)
                .map_err(|e| StoreError::Query(e.to_string()))?
                .into_message(),
            None => Err(StoreError::NotFound),
        }
    }

    async fn get_by_chat(
        &self,
        chat_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Message>, i64), StoreError> {
        let count_row = sqlx::query("SELECT COUNT(*) AS cnt FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;
        let total: i64 = count_row
            .try_get("cnt")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = sqlx::query(
            "SELECT * FROM messages WHERE chat_id = ? ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
        )
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(
                MessageRow::from_row(row)
                    .map_err(|e| StoreError::Query(e.to_string()))?
                    .into_message()?,
            );
        }

        Ok((messages, total))
    }

    async fn recent(&self, chat_id: i64, limit: i64) -> Result<Vec<Message>, StoreError> {
        // Newest first to bound the scan, then reversed so callers get
        // the window oldest-first.
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE chat_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(
                MessageRow::from_row(row)
                    .map_err(|e| StoreError::Query(e.to_string()))?
                    .into_message()?,
            );
        }
        messages.reverse();

        Ok(messages)
    }

    async fn update_content(&self, id: i64, content: &str) -> Result<Message, StoreError> {
        let result = sqlx::query("UPDATE messages SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(format_datetime(&Utc::now()))
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
