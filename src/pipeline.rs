//! Bulk import/export pipeline / 批量导入导出管道
//!
//! Import runs the whole batch inside a single transaction: a fatal
//! storage error (or cancellation) drops the transaction and nothing is
//! applied, while per-record duplicate conflicts are counted and the batch
//! continues. The catalog file format itself is parsed elsewhere; the
//! pipeline consumes and produces plain record sequences.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::error::{EngineError, EngineResult};
use crate::models::{ExportRow, ImportRecord, ImportReport};
use crate::progress::ScanState;
use crate::search::{SearchEngine, SearchQuery};
use crate::store::TmStore;

/// Conflict policy for records whose entry already exists / 冲突策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Append a new version unless the text is a live duplicate
    /// 追加新版本，文本重复则跳过
    NewVersion,
    /// Leave entries that already have any translation untouched
    /// 已有译文的条目整条跳过
    SkipExisting,
}

/// Import/export pipeline / 导入导出管道
pub struct Pipeline {
    store: TmStore,
    search: SearchEngine,
}

impl Pipeline {
    pub fn new(store: TmStore) -> Self {
        let search = SearchEngine::new(store.clone());
        Self { store, search }
    }

    /// Batch-load records into the store / 批量载入记录
    ///
    /// Get-or-create each entry, then attempt a version insert. Duplicate
    /// translations are counted as skipped, never raised. Records with an
    /// empty source or translation are skipped as well. The batch is one
    /// transaction; `Cancelled` or a storage error rolls all of it back.
    pub async fn import_batch(
        &self,
        records: &[ImportRecord],
        policy: ImportPolicy,
        scan: Option<&ScanState>,
    ) -> EngineResult<ImportReport> {
        let mut tx = self.store.pool().begin().await?;
        let mut report = ImportReport::default();
        let now = Utc::now().to_rfc3339();

        for record in records {
            if let Some(scan) = scan {
                if scan.is_cancelled() {
                    // Dropping the transaction rolls everything back
                    // 丢弃事务即回滚全部
                    return Err(EngineError::Cancelled);
                }
            }

            if record.source_text.is_empty() || record.translated_text.is_empty() {
                report.skipped_duplicates += 1;
                continue;
            }

            // Get-or-create the entry / 查找或创建条目
            let existing = sqlx::query(
                "SELECT id, next_version FROM entries WHERE source_text = ? AND context IS ?",
            )
            .bind(&record.source_text)
            .bind(record.context.as_deref())
            .fetch_optional(&mut *tx)
            .await?;

            let (entry_id, next_version) = match existing {
                Some(row) => {
                    let entry_id: i64 = row.try_get("id")?;
                    let next_version: i64 = row.try_get("next_version")?;
                    (entry_id, next_version)
                }
                None => {
                    let result = sqlx::query(
                        "INSERT INTO entries (source_text, context, created_at) VALUES (?, ?, ?)",
                    )
                    .bind(&record.source_text)
                    .bind(record.context.as_deref())
                    .bind(&now)
                    .execute(&mut *tx)
                    .await?;
                    report.inserted_entries += 1;
                    (result.last_insert_rowid(), 1)
                }
            };

            if policy == ImportPolicy::SkipExisting && next_version > 1 {
                let translated = sqlx::query("SELECT 1 FROM versions WHERE entry_id = ? LIMIT 1")
                    .bind(entry_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                if translated.is_some() {
                    report.skipped_duplicates += 1;
                    continue;
                }
            }

            let duplicate = sqlx::query("SELECT 1 FROM versions WHERE entry_id = ? AND text = ?")
                .bind(entry_id)
                .bind(&record.translated_text)
                .fetch_optional(&mut *tx)
                .await?;
            if duplicate.is_some() {
                report.skipped_duplicates += 1;
                continue;
            }

            sqlx::query(
                "INSERT INTO versions (entry_id, version_id, text, source_label, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(entry_id)
            .bind(next_version)
            .bind(&record.translated_text)
            .bind(&record.source_label)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
            sqlx::query("UPDATE entries SET next_version = next_version + 1 WHERE id = ?")
                .bind(entry_id)
                .execute(&mut *tx)
                .await?;
            report.inserted_versions += 1;

            if let Some(scan) = scan {
                scan.advance(1);
            }
        }

        tx.commit().await?;
        tracing::info!(
            "Import finished: {} entries, {} versions, {} skipped",
            report.inserted_entries,
            report.inserted_versions,
            report.skipped_duplicates
        );
        Ok(report)
    }

    /// Export every translated entry's latest text, optionally restricted
    /// to entries matching a search query / 导出最新译文，可按查询过滤
    ///
    /// Entries without any version are excluded.
    pub async fn export_all(
        &self,
        filter: Option<&SearchQuery>,
    ) -> EngineResult<Vec<ExportRow>> {
        let rows = match filter {
            Some(query) => self
                .search
                .search(query, None)
                .await?
                .into_iter()
                .map(|result| (result.entry, result.latest_version))
                .collect(),
            None => self.store.scan_all_with_latest().await?,
        };

        let exported: Vec<ExportRow> = rows
            .into_iter()
            .filter_map(|(entry, latest)| {
                latest.map(|version| ExportRow {
                    source_text: entry.source_text,
                    context: entry.context,
                    latest_translated_text: version.text,
                })
            })
            .collect();

        tracing::debug!("Exported {} rows", exported.len());
        Ok(exported)
    }
}
