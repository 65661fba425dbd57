//! Search engine / 搜索引擎
//!
//! Evaluates a structured multi-field boolean query against the whole
//! store. Results come back in entry id order (creation order), so the
//! same query over unchanged data always returns the identical sequence.

use super::matcher::FieldMatcher;
use super::query::{Combinator, SearchQuery, SearchResult};
use crate::error::{EngineError, EngineResult};
use crate::progress::ScanState;
use crate::store::TmStore;

/// Entries scanned between cancellation checks / 两次取消检查之间的扫描条数
const SCAN_CHUNK: usize = 256;

/// Search engine over the store handle / 基于存储句柄的搜索引擎
#[derive(Clone)]
pub struct SearchEngine {
    store: TmStore,
}

impl SearchEngine {
    pub fn new(store: TmStore) -> Self {
        Self { store }
    }

    /// Evaluate a query / 执行查询
    ///
    /// An invalid regex fails the whole call with `InvalidPattern` before
    /// any entry is examined. An inactive field predicate is excluded from
    /// the boolean combination; the context filter is AND-ed independently.
    pub async fn search(
        &self,
        query: &SearchQuery,
        scan: Option<&ScanState>,
    ) -> EngineResult<Vec<SearchResult>> {
        let source_matcher = FieldMatcher::compile(&query.source)?;
        let translation_matcher = FieldMatcher::compile(&query.translation)?;

        let context_filter = query
            .context_filter
            .as_deref()
            .filter(|f| !f.is_empty());

        let rows = self.store.scan_all_with_latest().await?;
        let mut results = Vec::new();

        for (index, (entry, latest)) in rows.into_iter().enumerate() {
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

            if let Some(filter) = context_filter {
                let context = entry.context.as_deref().unwrap_or("");
                if !context.contains(filter) {
                    continue;
                }
            }

            let translation_text = latest.as_ref().map(|v| v.text.as_str());
            let source_active = source_matcher.is_active();
            let translation_active = translation_matcher.is_active();
            let source_hit = source_matcher.matches(Some(&entry.source_text));
            let translation_hit = translation_matcher.matches(translation_text);

            let qualifies = match query.combinator {
                Combinator::And => {
                    (!source_active || source_hit) && (!translation_active || translation_hit)
                }
                Combinator::Or => {
                    if !source_active && !translation_active {
                        true
                    } else {
                        (source_active && source_hit) || (translation_active && translation_hit)
                    }
                }
            };
            if !qualifies {
                continue;
            }

            let source_spans = if source_active && source_hit {
                source_matcher.spans(&entry.source_text)
            } else {
                Vec::new()
            };
            let translation_spans = match translation_text {
                Some(text) if translation_active && translation_hit => {
                    translation_matcher.spans(text)
                }
                _ => Vec::new(),
            };
            let matched_version = if translation_active && translation_hit {
                latest.clone()
            } else {
                None
            };

            results.push(SearchResult {
                entry,
                matched_version,
                latest_version: latest,
                source_spans,
                translation_spans,
            });
        }

        tracing::debug!("Search returned {} results", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::{EmptyMode, FieldQuery, MatchSpan};
    use crate::store::test_store;

    async fn engine_with_corpus() -> SearchEngine {
        let store = test_store().await;
        let a = store.create_entry("foo bar", None).await.unwrap();
        store.add_version(a, "x", "manual").await.unwrap();
        let b = store.create_entry("baz", None).await.unwrap();
        store.add_version(b, "y", "manual").await.unwrap();
        let c = store.create_entry("foo baz", Some("menu")).await.unwrap();
        store.add_version(c, "old", "manual").await.unwrap();
        store.add_version(c, "fresh foo", "machine").await.unwrap();
        store.create_entry("untranslated foo", None).await.unwrap();
        SearchEngine::new(store)
    }

    #[tokio::test]
    async fn test_source_literal_and() {
        let engine = engine_with_corpus().await;
        let query = SearchQuery::source(FieldQuery::literal("foo"));
        let results = engine.search(&query, None).await.unwrap();
        let sources: Vec<&str> = results.iter().map(|r| r.entry.source_text.as_str()).collect();
        assert_eq!(sources, vec!["foo bar", "foo baz", "untranslated foo"]);
        assert_eq!(results[0].source_spans, vec![MatchSpan { start: 0, end: 3 }]);
        // Source-only match carries no matched_version / 仅源命中不带版本
        assert!(results[0].matched_version.is_none());
    }

    #[tokio::test]
    async fn test_and_requires_both_fields() {
        let engine = engine_with_corpus().await;
        let query = SearchQuery::source(FieldQuery::literal("foo"))
            .with_translation(FieldQuery::literal("foo"));
        let results = engine.search(&query, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.source_text, "foo baz");
        // Translation predicate evaluates the latest version / 针对最新版本
        assert_eq!(results[0].matched_version.as_ref().unwrap().text, "fresh foo");
    }

    #[tokio::test]
    async fn test_or_combinator() {
        let engine = engine_with_corpus().await;
        let query = SearchQuery::source(FieldQuery::literal("baz"))
            .with_translation(FieldQuery::literal("x"))
            .combinator(Combinator::Or);
        let results = engine.search(&query, None).await.unwrap();
        let sources: Vec<&str> = results.iter().map(|r| r.entry.source_text.as_str()).collect();
        assert_eq!(sources, vec!["foo bar", "baz", "foo baz"]);
    }

    #[tokio::test]
    async fn test_context_filter_independent_of_combinator() {
        let engine = engine_with_corpus().await;
        let query = SearchQuery::source(FieldQuery::literal("foo"))
            .with_context_filter("men");
        let results = engine.search(&query, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.source_text, "foo baz");
    }

    #[tokio::test]
    async fn test_empty_translation_mode_finds_untranslated() {
        let engine = engine_with_corpus().await;
        let query = SearchQuery::translation(
            FieldQuery::literal("").empty_mode(EmptyMode::OnlyEmpty),
        );
        let results = engine.search(&query, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.source_text, "untranslated foo");
        assert!(results[0].latest_version.is_none());
    }

    #[tokio::test]
    async fn test_invalid_regex_fails_whole_call() {
        let engine = engine_with_corpus().await;
        let query = SearchQuery::source(FieldQuery::regex("f[oo"));
        let err = engine.search(&query, None).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern(_)));
    }

    #[tokio::test]
    async fn test_deterministic_results() {
        let engine = engine_with_corpus().await;
        let query = SearchQuery::source(FieldQuery::literal("foo"));
        let first = engine.search(&query, None).await.unwrap();
        let second = engine.search(&query, None).await.unwrap();
        let ids = |rs: &[SearchResult]| rs.iter().map(|r| r.entry.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn test_no_active_predicates_returns_everything() {
        let engine = engine_with_corpus().await;
        let results = engine.search(&SearchQuery::default(), None).await.unwrap();
        assert_eq!(results.len(), 4);
    }
}
