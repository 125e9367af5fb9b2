//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct for
//! SQLite-to-domain mapping, rows_affected checks for NotFound.

use chrono::{DateTime, Utc};
use sqlx::Row;

use parley_core::chat::repository::ChatRepository;
use parley_types::chat::{Chat, NewChat};
use parley_types::error::StoreError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatRow {
    id: i64,
    owner_id: String,
    title: String,
    created_at: String,
    updated_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, StoreError> {
        Ok(Chat {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
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
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create(&self, new: NewChat) -> Result<Chat, StoreError> {
        let now = Utc::now();
        let stamp = format_datetime(&now);

        let result = sqlx::query(
            "INSERT INTO chats (owner_id, title, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&new.owner_id)
        .bind(&new.title)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;

        Ok(Chat {
            id: result.last_insert_rowid(),
            owner_id: new.owner_id,
            title: new.title,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: i64) -> Result<Chat, StoreError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        match row {
            Some(row) => ChatRow::from_row(&row)
                .map_err(|e| StoreError::Query(e.to_string()))?
                .into_chat(),
            None => Err(StoreError::NotFound),
        }
    }

    async fn get_by_owner(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Chat>, i64), StoreError> {
        let count_row = sqlx::query("SELECT COUNT(*) AS cnt FROM chats WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;
        let total: i64 = count_row
            .try_get("cnt")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = sqlx::query(
            "SELECT * FROM chats WHERE owner_id = ? ORDER BY updated_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            chats.push(
                ChatRow::from_row(row)
                    .map_err(|e| StoreError::Query(e.to_string()))?
                    .into_chat()?,
            );
        }

        Ok((chats, total))
    }

    async fn search(
        &self,
        owner_id: &str,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Chat>, i64), StoreError> {
        // LIKE is case-insensitive for ASCII in SQLite.
        let pattern = format!("%{query}%");

        let count_row =
            sqlx::query("SELECT COUNT(*) AS cnt FROM chats WHERE owner_id = ? AND title LIKE ?")
                .bind(owner_id)
                .bind(&pattern)
                .fetch_one(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;
        let total: i64 = count_row
            .try_get("cnt")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = sqlx::query(
            "SELECT * FROM chats WHERE owner_id = ? AND title LIKE ? ORDER BY updated_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(owner_id)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            chats.push(
                ChatRow::from_row(row)
                    .map_err(|e| StoreError::Query(e.to_string()))?
                    .into_chat()?,
            );
        }

        Ok((chats, total))
    }

    async fn update(&self, id: i64, title: &str) -> Result<Chat, StoreError> {
        let result = sqlx::query("UPDATE chats SET title = ?, updated_at = ? WHERE id = ?")
            .bind(title)
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
        // Messages go with the chat via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::message::SqliteMessageRepository;
    use parley_core::message::repository::MessageRepository;
    use parley_types::chat::NewMessage;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn new_chat(owner: &str, title: &str) -> NewChat {
        NewChat {
            owner_id: owner.to_string(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_chat() {
        let repo = SqliteChatRepository::new(test_pool().await);

        let created = repo.create(new_chat("u1", "demo")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.created_at, created.updated_at);

        let found = repo.get(created.id).await.unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.owner_id, "u1");
        assert_eq!(found.title, "demo");
    }

    #[tokio::test]
    async fn test_get_missing_chat_is_not_found() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let result = repo.get(999).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let first = repo.create(new_chat("u1", "first")).await.unwrap();
        let second = repo.create(new_chat("u1", "second")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_list_by_owner_orders_by_recent_update() {
        let repo = SqliteChatRepository::new(test_pool().await);

        let a = repo.create(new_chat("u1", "first")).await.unwrap();
        let b = repo.create(new_chat("u1", "second")).await.unwrap();
        repo.create(new_chat("u2", "other owner")).await.unwrap();

        // Touch the older chat so it becomes the most recently updated.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.update(a.id, "first, renamed").await.unwrap();

        let (page, total) = repo.get_by_owner("u1", 10, 0).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, a.id);
        assert_eq!(page[1].id, b.id);

        let (page, total) = repo.get_by_owner("u1", 1, 1).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, b.id);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_owner_scoped() {
        let repo = SqliteChatRepository::new(test_pool().await);

        repo.create(new_chat("u1", "Rust questions")).await.unwrap();
        repo.create(new_chat("u1", "Dinner plans")).await.unwrap();
        repo.create(new_chat("u2", "rust for someone else"))
            .await
            .unwrap();

        let (page, total) = repo.search("u1", "rust", 10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].title, "Rust questions");

        let (page, total) = repo.search("u1", "missing", 10, 0).await.unwrap();
        assert_eq!(total, 0);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let chat = repo.create(new_chat("u1", "before")).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let updated = repo.update(chat.id, "after").await.unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.created_at, chat.created_at);
        assert!(updated.updated_at > chat.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_chat_is_not_found() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let result = repo.update(999, "title").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_messages() {
        let pool = test_pool().await;
        let chats = SqliteChatRepository::new(pool.clone());
        let messages = SqliteMessageRepository::new(pool.clone());

        let chat = chats.create(new_chat("u1", "demo")).await.unwrap();
        let msg = messages
            .create(NewMessage::user(chat.id, "u1", "hello"))
            .await
            .unwrap();
        messages
            .create(NewMessage::assistant(chat.id, "hi"))
            .await
            .unwrap();

        chats.delete(chat.id).await.unwrap();

        assert!(matches!(chats.get(chat.id).await, Err(StoreError::NotFound)));
        assert!(matches!(messages.get(msg.id).await, Err(StoreError::NotFound)));

        let (page, total) = messages.get_by_chat(chat.id, 10, 0).await.unwrap();
        assert_eq!(total, 0);
        assert!(page.is_empty());

        let result = chats.delete(chat.id).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
