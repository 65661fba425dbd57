//! Database setup / 数据库初始化
//!
//! Opens the SQLite pool in WAL mode and creates the translation memory
//! schema. Two logical tables:
//! - entries:  (id, source_text, context) with UNIQUE (source_text, context)
//! - versions: (entry_id, version_id, text, source_label, created_at) with
//!   UNIQUE (entry_id, version_id) and UNIQUE (entry_id, text)
//!
//! Entry ids use AUTOINCREMENT so an id is never reused after deletion.
//! The per-entry `next_version` counter backs version sequence numbers that
//! survive version deletion without renumbering.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Open the database pool / 打开数据库连接池
pub async fn open_pool(db_path: impl AsRef<Path>) -> Result<SqlitePool> {
    let db_path = db_path.as_ref();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.to_string_lossy());

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect(&db_url)
        .await?;

    // WAL mode for concurrent readers / WAL 模式提高并发读性能
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout=5000").execute(&pool).await?;
    sqlx::query("PRAGMA synchronous=NORMAL").execute(&pool).await?;
    sqlx::query("PRAGMA foreign_keys=ON").execute(&pool).await?;

    tracing::info!("Translation memory database opened: {:?} (WAL mode)", db_path);
    Ok(pool)
}

/// Open an in-memory pool, mainly for tests / 打开内存数据库（测试用）
pub async fn open_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::query("PRAGMA foreign_keys=ON").execute(&pool).await?;
    Ok(pool)
}

/// Run database migrations / 运行数据库迁移
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_text TEXT NOT NULL CHECK (length(source_text) > 0),
            context TEXT,
            next_version INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            UNIQUE (source_text, context)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS versions (
            entry_id INTEGER NOT NULL,
            version_id INTEGER NOT NULL,
            text TEXT NOT NULL CHECK (length(text) > 0),
            source_label TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (entry_id, version_id),
            UNIQUE (entry_id, text),
            FOREIGN KEY (entry_id) REFERENCES entries(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_source ON entries(source_text)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_versions_text ON versions(text)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_versions_entry ON versions(entry_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = open_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_open_pool_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open_pool(dir.path().join("tm.db")).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool.close().await;
        assert!(dir.path().join("tm.db").exists());
    }
}
