//! Entry CRUD / 条目增删查
//!
//! The `(source_text, context)` pair is unique across live entries. SQLite's
//! UNIQUE constraint treats NULLs as distinct values, so the duplicate probe
//! uses null-safe `IS` matching inside the insert transaction.

use chrono::Utc;
use sqlx::Row;

use super::{order_clause, row_to_entry_with_latest, TmStore};
use crate::error::{EngineError, EngineResult};
use crate::models::{SourceEntry, SortKey, TranslationVersion};

impl TmStore {
    /// Create a new entry / 创建条目
    ///
    /// Fails with `DuplicateEntry` when the `(source_text, context)` pair
    /// already exists among live entries.
    pub async fn create_entry(
        &self,
        source_text: &str,
        context: Option<&str>,
    ) -> EngineResult<i64> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query("SELECT id FROM entries WHERE source_text = ? AND context IS ?")
            .bind(source_text)
            .bind(context)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(EngineError::DuplicateEntry {
                source_text: source_text.to_string(),
                context: context.map(|s| s.to_string()),
            });
        }

        let result = sqlx::query(
            "INSERT INTO entries (source_text, context, created_at) VALUES (?, ?, ?)",
        )
        .bind(source_text)
        .bind(context)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        tracing::debug!("Entry created: id={}, source_text={:?}", id, source_text);
        Ok(id)
    }

    /// Look up an entry by its unique pair / 按唯一键查找条目
    pub async fn get_entry(
        &self,
        source_text: &str,
        context: Option<&str>,
    ) -> EngineResult<Option<SourceEntry>> {
        let entry = sqlx::query_as::<_, SourceEntry>(
            "SELECT id, source_text, context, created_at FROM entries \
             WHERE source_text = ? AND context IS ?",
        )
        .bind(source_text)
        .bind(context)
        .fetch_optional(&self.db)
        .await?;
        Ok(entry)
    }

    /// Look up an entry by id / 按 id 查找条目
    pub async fn get_entry_by_id(&self, id: i64) -> EngineResult<SourceEntry> {
        sqlx::query_as::<_, SourceEntry>(
            "SELECT id, source_text, context, created_at FROM entries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("entry {}", id)))
    }

    /// Delete an entry and all of its versions / 删除条目并级联删除全部版本
    pub async fn delete_entry(&self, id: i64) -> EngineResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM versions WHERE entry_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(EngineError::not_found(format!("entry {}", id)));
        }

        tx.commit().await?;
        tracing::debug!("Entry deleted: id={}", id);
        Ok(())
    }

    /// Count live entries / 统计条目总数
    pub async fn count_entries(&self) -> EngineResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM entries")
            .fetch_one(&self.db)
            .await?;
        let n: i64 = row.try_get("n")?;
        Ok(n as u64)
    }

    /// List entries in the given sort order / 按排序键列出条目
    pub async fn list_entries(
        &self,
        sort: SortKey,
        limit: u32,
        offset: u32,
    ) -> EngineResult<Vec<SourceEntry>> {
        let rows = self
            .list_entries_with_latest(sort, limit, offset)
            .await?
            .into_iter()
            .map(|(entry, _)| entry)
            .collect();
        Ok(rows)
    }

    /// List entries joined with each one's latest version / 列出条目及其最新版本
    pub async fn list_entries_with_latest(
        &self,
        sort: SortKey,
        limit: u32,
        offset: u32,
    ) -> EngineResult<Vec<(SourceEntry, Option<TranslationVersion>)>> {
        let sql = format!(
            "SELECT e.id, e.source_text, e.context, e.created_at, \
                    v.version_id, v.text, v.source_label, v.created_at AS version_created_at \
             FROM entries e \
             LEFT JOIN versions v ON v.entry_id = e.id AND v.version_id = \
                 (SELECT MAX(version_id) FROM versions WHERE entry_id = e.id) \
             ORDER BY {} LIMIT ? OFFSET ?",
            order_clause(sort)
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        rows.iter()
            .map(|row| row_to_entry_with_latest(row).map_err(EngineError::from))
            .collect()
    }

    /// Full scan in id order, for search and suggestion / 全量扫描（搜索与建议用）
    pub async fn scan_all_with_latest(
        &self,
    ) -> EngineResult<Vec<(SourceEntry, Option<TranslationVersion>)>> {
        let rows = sqlx::query(
            "SELECT e.id, e.source_text, e.context, e.created_at, \
                    v.version_id, v.text, v.source_label, v.created_at AS version_created_at \
             FROM entries e \
             LEFT JOIN versions v ON v.entry_id = e.id AND v.version_id = \
                 (SELECT MAX(version_id) FROM versions WHERE entry_id = e.id) \
             ORDER BY e.id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        rows.iter()
            .map(|row| row_to_entry_with_latest(row).map_err(EngineError::from))
            .collect()
    }
}
