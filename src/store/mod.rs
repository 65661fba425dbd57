//! Entry/Version store / 条目与版本存储
//!
//! Architecture principle: only expose primitive operations, do not control
//! flow / 架构原则：仅暴露原语操作，不控制流程
//! - entry ops: create / get / delete / list (entries.rs)
//! - version ops: add / delete / list / latest (versions.rs)
//!
//! Every mutating operation runs inside one transaction; an error path
//! drops the transaction before propagating, so readers never observe a
//! partially-applied mutation.

mod entries;
mod versions;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::{SourceEntry, SortKey, TranslationVersion};

/// Store handle over the shared pool; cheap to clone, passed explicitly
/// into every component / 存储句柄，显式传入各组件，无全局单例
#[derive(Clone)]
pub struct TmStore {
    db: SqlitePool,
}

impl TmStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    /// Close the underlying pool / 关闭连接池
    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// ORDER BY clause for a browse sort key; entry id breaks ties so listing
/// order stays deterministic / 排序子句，id 兜底保证确定性
pub(crate) fn order_clause(sort: SortKey) -> &'static str {
    match sort {
        SortKey::ById => "e.id ASC",
        SortKey::BySource => "e.source_text ASC, e.id ASC",
        SortKey::ByTranslation => "v.text ASC, e.id ASC",
        SortKey::ByContext => "e.context ASC, e.id ASC",
    }
}

/// Map a joined entry+latest-version row / 映射条目与最新版本的联接行
pub(crate) fn row_to_entry_with_latest(
    row: &SqliteRow,
) -> Result<(SourceEntry, Option<TranslationVersion>), sqlx::Error> {
    let entry = SourceEntry {
        id: row.try_get("id")?,
        source_text: row.try_get("source_text")?,
        context: row.try_get("context")?,
        created_at: row.try_get("created_at")?,
    };
    let version_id: Option<i64> = row.try_get("version_id")?;
    let latest = match version_id {
        Some(version_id) => Some(TranslationVersion {
            entry_id: entry.id,
            version_id,
            text: row.try_get("text")?,
            source_label: row.try_get("source_label")?,
            created_at: row.try_get("version_created_at")?,
        }),
        None => None,
    };
    Ok((entry, latest))
}

#[cfg(test)]
pub(crate) async fn test_store() -> TmStore {
    let pool = crate::db::open_memory_pool().await.unwrap();
    crate::db::run_migrations(&pool).await.unwrap();
    TmStore::new(pool)
}
