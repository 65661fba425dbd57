//! Version CRUD / 版本增删查
//!
//! Sequence numbers come from the entry's `next_version` counter, read and
//! bumped inside the insert transaction. Deleting a version leaves a gap;
//! numbers are never reassigned.

use chrono::Utc;
use sqlx::Row;

use super::TmStore;
use crate::error::{EngineError, EngineResult};
use crate::models::TranslationVersion;

impl TmStore {
    /// Add a new translation version / 新增翻译版本
    ///
    /// Fails with `DuplicateVersion` when `text` already exists among the
    /// entry's live versions, `NotFound` when the entry does not exist.
    pub async fn add_version(
        &self,
        entry_id: i64,
        text: &str,
        source_label: &str,
    ) -> EngineResult<i64> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query("SELECT next_version FROM entries WHERE id = ?")
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("entry {}", entry_id)))?;
        let version_id: i64 = row.try_get("next_version")?;

        let duplicate = sqlx::query("SELECT 1 FROM versions WHERE entry_id = ? AND text = ?")
            .bind(entry_id)
            .bind(text)
            .fetch_optional(&mut *tx)
            .await?;
        if duplicate.is_some() {
            return Err(EngineError::DuplicateVersion { entry_id });
        }

        sqlx::query(
            "INSERT INTO versions (entry_id, version_id, text, source_label, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry_id)
        .bind(version_id)
        .bind(text)
        .bind(source_label)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE entries SET next_version = next_version + 1 WHERE id = ?")
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(
            "Version added: entry_id={}, version_id={}, label={}",
            entry_id,
            version_id,
            source_label
        );
        Ok(version_id)
    }

    /// Delete one version; no renumbering happens / 删除单个版本，不重新编号
    pub async fn delete_version(&self, entry_id: i64, version_id: i64) -> EngineResult<()> {
        let result = sqlx::query("DELETE FROM versions WHERE entry_id = ? AND version_id = ?")
            .bind(entry_id)
            .bind(version_id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(EngineError::not_found(format!(
                "version {} of entry {}",
                version_id, entry_id
            )));
        }
        tracing::debug!("Version deleted: entry_id={}, version_id={}", entry_id, version_id);
        Ok(())
    }

    /// List versions ascending by version_id / 按版本号升序列出
    ///
    /// A deleted entry yields `NotFound`, distinguishing "entry without
    /// versions" from "no such entry".
    pub async fn list_versions(&self, entry_id: i64) -> EngineResult<Vec<TranslationVersion>> {
        self.get_entry_by_id(entry_id).await?;

        let versions = sqlx::query_as::<_, TranslationVersion>(
            "SELECT entry_id, version_id, text, source_label, created_at \
             FROM versions WHERE entry_id = ? ORDER BY version_id ASC",
        )
        .bind(entry_id)
        .fetch_all(&self.db)
        .await?;
        Ok(versions)
    }

    /// Latest live version, the entry's representative translation
    /// 最新版本（条目的代表译文）
    pub async fn latest_version(&self, entry_id: i64) -> EngineResult<Option<TranslationVersion>> {
        self.get_entry_by_id(entry_id).await?;

        let version = sqlx::query_as::<_, TranslationVersion>(
            "SELECT entry_id, version_id, text, source_label, created_at \
             FROM versions WHERE entry_id = ? ORDER BY version_id DESC LIMIT 1",
        )
        .bind(entry_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_store;
    use crate::error::EngineError;

    #[tokio::test]
    async fn test_sequence_increases_and_never_reuses() {
        let store = test_store().await;
        let id = store.create_entry("Hello", None).await.unwrap();

        let v1 = store.add_version(id, "Hola", "manual").await.unwrap();
        let v2 = store.add_version(id, "Bonjour", "manual").await.unwrap();
        assert_eq!((v1, v2), (1, 2));

        // Deleting the newest version leaves a gap / 删除最新版本留下空洞
        store.delete_version(id, v2).await.unwrap();
        let v3 = store.add_version(id, "Ciao", "imported-file").await.unwrap();
        assert_eq!(v3, 3);

        let versions = store.list_versions(id).await.unwrap();
        let ids: Vec<i64> = versions.iter().map(|v| v.version_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_duplicate_text_rejected() {
        let store = test_store().await;
        let id = store.create_entry("Hello", None).await.unwrap();
        store.add_version(id, "Hola", "manual").await.unwrap();

        let err = store.add_version(id, "Hola", "machine").await.unwrap_err();
        assert!(matches!(err, EngineError::DuplicateVersion { entry_id } if entry_id == id));

        // Deleting the duplicate frees the text again / 删除后文本可再次入库
        store.delete_version(id, 1).await.unwrap();
        let v = store.add_version(id, "Hola", "machine").await.unwrap();
        assert_eq!(v, 2);
    }

    #[tokio::test]
    async fn test_not_found_paths() {
        let store = test_store().await;
        let err = store.add_version(99, "Hola", "manual").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let id = store.create_entry("Hello", None).await.unwrap();
        let err = store.delete_version(id, 7).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        assert!(store.latest_version(id).await.unwrap().is_none());
        assert!(store.list_versions(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_version_tracks_highest_id() {
        let store = test_store().await;
        let id = store.create_entry("Hello", None).await.unwrap();
        store.add_version(id, "Hola", "manual").await.unwrap();
        store.add_version(id, "Bonjour", "machine").await.unwrap();

        let latest = store.latest_version(id).await.unwrap().unwrap();
        assert_eq!(latest.text, "Bonjour");

        store.delete_version(id, 2).await.unwrap();
        let latest = store.latest_version(id).await.unwrap().unwrap();
        assert_eq!(latest.text, "Hola");
    }
}
