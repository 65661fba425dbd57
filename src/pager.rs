//! Pagination controller / 分页控制器
//!
//! A small state machine with two modes:
//! - Browse mode serves fixed-size pages over the store's natural order
//!   under a configurable sort key / 浏览模式：按排序键翻阅全库
//! - Search mode serves pages over one materialized search result
//!   sequence / 搜索模式：翻阅一次 search() 的物化结果
//!
//! Navigation never wraps: a boundary call returns the current page
//! unchanged. The controller holds no text-editing state; rows are
//! immutable snapshots and callers commit edits through store calls
//! before requesting another page.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{SortKey, SourceEntry, TranslationVersion};
use crate::search::{MatchSpan, SearchEngine, SearchQuery, SearchResult};
use crate::store::TmStore;

/// One display row / 一条展示行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRow {
    pub entry: SourceEntry,
    pub latest_version: Option<TranslationVersion>,
    /// Highlight spans, populated in search mode only / 高亮区间（仅搜索模式）
    pub source_spans: Vec<MatchSpan>,
    pub translation_spans: Vec<MatchSpan>,
}

/// One served page / 一页内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub rows: Vec<PageRow>,
}

enum Mode {
    Browse,
    Search(Vec<SearchResult>),
}

/// Pagination controller / 分页控制器
pub struct Pager {
    store: TmStore,
    search: SearchEngine,
    page_size: usize,
    sort: SortKey,
    mode: Mode,
    index: usize,
    saved_browse_index: usize,
    cached: Option<Page>,
}

impl Pager {
    pub fn new(store: TmStore, page_size: usize) -> Self {
        let search = SearchEngine::new(store.clone());
        Self {
            store,
            search,
            page_size: page_size.max(1),
            sort: SortKey::default(),
            mode: Mode::Browse,
            index: 0,
            saved_browse_index: 0,
            cached: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.mode, Mode::Search(_))
    }

    /// The active page, loading and caching it on demand / 当前页（按需加载并缓存）
    pub async fn current(&mut self) -> EngineResult<Page> {
        if let Some(page) = &self.cached {
            return Ok(page.clone());
        }
        let page = self.load_page().await?;
        self.index = page.index;
        self.cached = Some(page.clone());
        Ok(page)
    }

    /// Drop the cached page after external data changes / 数据变更后丢弃缓存
    pub fn refresh(&mut self) {
        self.cached = None;
    }

    /// Run one search and switch to Search mode at page 0, remembering the
    /// browse position / 执行搜索并切到搜索模式第 0 页，记住浏览位置
    pub async fn enter_search(&mut self, query: &SearchQuery) -> EngineResult<Page> {
        let results = self.search.search(query, None).await?;
        if !self.is_searching() {
            self.saved_browse_index = self.index;
        }
        self.mode = Mode::Search(results);
        self.index = 0;
        self.cached = None;
        self.current().await
    }

    /// Discard search results and restore the browse position held before
    /// entering search / 退出搜索，恢复进入前的浏览位置
    pub async fn exit_search(&mut self) -> EngineResult<Page> {
        if self.is_searching() {
            self.mode = Mode::Browse;
            self.index = self.saved_browse_index;
            self.cached = None;
        }
        self.current().await
    }

    /// Jump to page `n`; out-of-range is a no-op / 跳页，越界为空操作
    pub async fn go_to_page(&mut self, n: usize) -> EngineResult<Page> {
        let page = self.current().await?;
        if n != page.index && n < page.total_pages {
            self.move_to(n);
            return self.current().await;
        }
        Ok(page)
    }

    pub async fn next(&mut self) -> EngineResult<Page> {
        let page = self.current().await?;
        if page.index + 1 < page.total_pages {
            self.move_to(page.index + 1);
            return self.current().await;
        }
        Ok(page)
    }

    pub async fn prev(&mut self) -> EngineResult<Page> {
        let page = self.current().await?;
        if page.index > 0 {
            self.move_to(page.index - 1);
            return self.current().await;
        }
        Ok(page)
    }

    pub async fn first(&mut self) -> EngineResult<Page> {
        self.go_to_page(0).await
    }

    pub async fn last(&mut self) -> EngineResult<Page> {
        let page = self.current().await?;
        if page.total_pages > 0 {
            return self.go_to_page(page.total_pages - 1).await;
        }
        Ok(page)
    }

    /// Change the page size; the current index is clamped back into range
    /// on the next load / 修改每页行数，页号在下次加载时收敛到范围内
    pub fn set_page_size(&mut self, n: usize) {
        self.page_size = n.max(1);
        self.cached = None;
    }

    /// Change the browse sort key and rewind to page 0 / 修改排序键并回到第 0 页
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        if !self.is_searching() {
            self.index = 0;
        }
        self.cached = None;
    }

    fn move_to(&mut self, index: usize) {
        self.index = index;
        self.cached = None;
    }

    async fn load_page(&self) -> EngineResult<Page> {
        match &self.mode {
            Mode::Browse => {
                let total_items = self.store.count_entries().await? as usize;
                let total_pages = total_items.div_ceil(self.page_size);
                let index = self.index.min(total_pages.saturating_sub(1));
                let rows = self
                    .store
                    .list_entries_with_latest(
                        self.sort,
                        self.page_size as u32,
                        (index * self.page_size) as u32,
                    )
                    .await?
                    .into_iter()
                    .map(|(entry, latest_version)| PageRow {
                        entry,
                        latest_version,
                        source_spans: Vec::new(),
                        translation_spans: Vec::new(),
                    })
                    .collect();
                Ok(Page {
                    index,
                    total_pages,
                    total_items,
                    rows,
                })
            }
            Mode::Search(results) => {
                let total_items = results.len();
                let total_pages = total_items.div_ceil(self.page_size);
                let index = self.index.min(total_pages.saturating_sub(1));
                let start = index * self.page_size;
                let end = (start + self.page_size).min(total_items);
                let rows = results[start..end]
                    .iter()
                    .map(|result| PageRow {
                        entry: result.entry.clone(),
                        latest_version: result.latest_version.clone(),
                        source_spans: result.source_spans.clone(),
                        translation_spans: result.translation_spans.clone(),
                    })
                    .collect();
                Ok(Page {
                    index,
                    total_pages,
                    total_items,
                    rows,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FieldQuery;
    use crate::store::test_store;

    async fn pager_with_entries(count: usize, page_size: usize) -> Pager {
        let store = test_store().await;
        for i in 0..count {
            let id = store
                .create_entry(&format!("source {:02}", i), None)
                .await
                .unwrap();
            store
                .add_version(id, &format!("target {:02}", i), "manual")
                .await
                .unwrap();
        }
        Pager::new(store, page_size)
    }

    fn sources(page: &Page) -> Vec<String> {
        page.rows.iter().map(|r| r.entry.source_text.clone()).collect()
    }

    #[tokio::test]
    async fn test_browse_paging_and_boundaries() {
        let mut pager = pager_with_entries(5, 2).await;

        let page = pager.current().await.unwrap();
        assert_eq!((page.index, page.total_pages, page.total_items), (0, 3, 5));
        assert_eq!(sources(&page), vec!["source 00", "source 01"]);

        let page = pager.next().await.unwrap();
        assert_eq!(sources(&page), vec!["source 02", "source 03"]);

        let page = pager.last().await.unwrap();
        assert_eq!(page.index, 2);
        assert_eq!(sources(&page), vec!["source 04"]);

        // Boundary calls never wrap / 边界调用不回绕
        let same = pager.next().await.unwrap();
        assert_eq!(same.index, 2);
        let page = pager.first().await.unwrap();
        assert_eq!(page.index, 0);
        let same = pager.prev().await.unwrap();
        assert_eq!(same.index, 0);
    }

    #[tokio::test]
    async fn test_next_prev_round_trip() {
        let mut pager = pager_with_entries(7, 3).await;
        let original = pager.go_to_page(1).await.unwrap();
        pager.next().await.unwrap();
        let back = pager.prev().await.unwrap();
        assert_eq!(sources(&back), sources(&original));
    }

    #[tokio::test]
    async fn test_search_mode_and_position_restore() {
        let mut pager = pager_with_entries(6, 2).await;
        pager.go_to_page(2).await.unwrap();

        let query = SearchQuery::source(FieldQuery::literal("source 0"));
        let page = pager.enter_search(&query).await.unwrap();
        assert!(pager.is_searching());
        assert_eq!(page.index, 0);
        assert_eq!(page.total_items, 6);
        assert!(!page.rows[0].source_spans.is_empty());

        let page = pager.exit_search().await.unwrap();
        assert!(!pager.is_searching());
        assert_eq!(page.index, 2);
        // Browse rows carry no highlight spans / 浏览行无高亮
        assert!(page.rows[0].source_spans.is_empty());
    }

    #[tokio::test]
    async fn test_set_page_size_clamps_index() {
        let mut pager = pager_with_entries(10, 2).await;
        pager.last().await.unwrap(); // page 4 of 5

        pager.set_page_size(5);
        let page = pager.current().await.unwrap();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.index, 1);
        assert_eq!(page.rows.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let mut pager = pager_with_entries(0, 2).await;
        let page = pager.current().await.unwrap();
        assert_eq!((page.index, page.total_pages, page.total_items), (0, 0, 0));
        assert!(page.rows.is_empty());
        let page = pager.next().await.unwrap();
        assert_eq!(page.index, 0);
    }

    #[tokio::test]
    async fn test_set_sort_rewinds() {
        let mut pager = pager_with_entries(4, 2).await;
        pager.next().await.unwrap();
        pager.set_sort(SortKey::BySource);
        let page = pager.current().await.unwrap();
        assert_eq!(page.index, 0);
    }
}
