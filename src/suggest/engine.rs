//! Suggestion engine / 建议引擎
//!
//! Retrieves candidate translations for a query source text: an identical
//! `(source_text, context)` pair short-circuits as an exact hit, otherwise
//! a full-corpus fuzzy scan ranks entries by similarity score.

use serde::{Deserialize, Serialize};

use super::similarity::similarity;
use crate::config::SuggestConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{SourceEntry, TranslationVersion};
use crate::progress::ScanState;
use crate::store::TmStore;

/// Entries scanned between cancellation checks / 两次取消检查之间的扫描条数
const SCAN_CHUNK: usize = 256;

/// One ranked candidate / 一个排序后的候选
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub entry: SourceEntry,
    /// Representative translation, absent when the entry has no versions
    /// 代表译文，条目无版本时为空
    pub latest_version: Option<TranslationVersion>,
    /// Final score including the context bonus, in `[0, 1]` / 含上下文加成的最终分数
    pub score: f64,
}

/// Suggestion engine / 建议引擎
pub struct SuggestEngine {
    store: TmStore,
    threshold: f64,
    context_bonus: f64,
}

impl SuggestEngine {
    pub fn new(store: TmStore, config: &SuggestConfig) -> Self {
        Self {
            store,
            threshold: config.threshold,
            context_bonus: config.context_bonus,
        }
    }

    /// Suggest with the configured threshold / 使用配置阈值检索建议
    pub async fn suggest(
        &self,
        source_text: &str,
        context: Option<&str>,
        scan: Option<&ScanState>,
    ) -> EngineResult<Vec<Suggestion>> {
        self.suggest_with_threshold(source_text, context, self.threshold, scan)
            .await
    }

    /// Suggest with a per-call threshold override / 按调用覆盖阈值
    ///
    /// Most-similar first; ties broken by entry creation order (oldest
    /// first). No candidate meeting the threshold is an empty result, not
    /// an error.
    pub async fn suggest_with_threshold(
        &self,
        source_text: &str,
        context: Option<&str>,
        threshold: f64,
        scan: Option<&ScanState>,
    ) -> EngineResult<Vec<Suggestion>> {
        // Exact (source_text, context) hit wins outright / 精确命中直接返回
        if let Some(entry) = self.store.get_entry(source_text, context).await? {
            let latest_version = self.store.latest_version(entry.id).await?;
            return Ok(vec![Suggestion {
                entry,
                latest_version,
                score: 1.0,
            }]);
        }

        let rows = self.store.scan_all_with_latest().await?;
        let mut candidates: Vec<Suggestion> = Vec::new();

        for (index, (entry, latest_version)) in rows.into_iter().enumerate() {
            if index % SCAN_CHUNK == 0 {
                if let Some(scan) = scan {
                    if scan.is_cancelled() {
                        return Err(EngineError::Cancelled);
                    }
                    if index > 0 {
                        scan.advance(SCAN_CHUNK as u64);
                    }
                }
            }

            let mut score = similarity(source_text, &entry.source_text);
            if context.is_some() && context.map(|c| c.to_string()) == entry.context {
                score = (score + self.context_bonus).min(1.0);
            }
            if score >= threshold {
                candidates.push(Suggestion {
                    entry,
                    latest_version,
                    score,
                });
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.entry.id.cmp(&b.entry.id))
        });

        tracing::debug!(
            "Suggest: query={:?}, threshold={}, candidates={}",
            source_text,
            threshold,
            candidates.len()
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_store;

    async fn engine_with_corpus() -> SuggestEngine {
        let store = test_store().await;
        let a = store.create_entry("Hello there", None).await.unwrap();
        store.add_version(a, "Hola amigo", "manual").await.unwrap();
        let b = store.create_entry("Goodbye", None).await.unwrap();
        store.add_version(b, "Adios", "manual").await.unwrap();
        store.create_entry("Open file", Some("menu")).await.unwrap();
        SuggestEngine::new(store, &SuggestConfig::default())
    }

    #[tokio::test]
    async fn test_exact_match_short_circuits() {
        let engine = engine_with_corpus().await;
        let hits = engine.suggest("Hello there", None, None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 1.0);
        assert_eq!(hits[0].latest_version.as_ref().unwrap().text, "Hola amigo");
    }

    #[tokio::test]
    async fn test_fuzzy_scan_filters_by_threshold() {
        let engine = engine_with_corpus().await;
        let hits = engine.suggest("Hello ther", None, None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.source_text, "Hello there");
        assert!(hits[0].score >= 0.9);
    }

    #[tokio::test]
    async fn test_context_bonus_capped() {
        let store = test_store().await;
        store.create_entry("Save file", Some("menu")).await.unwrap();
        store.create_entry("Save file now", None).await.unwrap();
        let engine = SuggestEngine::new(store, &SuggestConfig::default());

        let hits = engine.suggest("Save files", Some("menu"), None).await.unwrap();
        assert_eq!(hits[0].entry.source_text, "Save file");
        assert!(hits[0].score <= 1.0);

        // No bonus without a query context / 无查询上下文则无加成
        let hits = engine.suggest("Save files", None, None).await.unwrap();
        let menu_hit = hits
            .iter()
            .find(|s| s.entry.source_text == "Save file")
            .unwrap();
        assert!(menu_hit.score < 1.0);
    }

    #[tokio::test]
    async fn test_empty_corpus_and_no_hits() {
        let store = test_store().await;
        let engine = SuggestEngine::new(store, &SuggestConfig::default());
        assert!(engine.suggest("anything", None, None).await.unwrap().is_empty());

        let engine = engine_with_corpus().await;
        assert!(engine
            .suggest("zzzzzzzzzz", None, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_cancellation() {
        let engine = engine_with_corpus().await;
        let scan = ScanState::new();
        scan.start();
        scan.cancel();
        let err = engine
            .suggest("Hello ther", None, Some(&scan))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Cancelled));
    }

    #[tokio::test]
    async fn test_tie_break_is_creation_order() {
        let store = test_store().await;
        store.create_entry("color", None).await.unwrap();
        store.create_entry("colour", Some("uk")).await.unwrap();
        let engine = SuggestEngine::new(store, &SuggestConfig::default());

        // Both score below 1.0 but above threshold; equal scores keep the
        // older entry first / 分数相同时较早创建的条目在前
        let hits = engine
            .suggest_with_threshold("colors", None, 0.5, None)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].score >= hits[1].score);
        if (hits[0].score - hits[1].score).abs() < f64::EPSILON {
            assert!(hits[0].entry.id < hits[1].entry.id);
        }
    }
}
