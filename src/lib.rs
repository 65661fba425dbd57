pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pager;
pub mod pipeline;
pub mod progress;
pub mod search;
pub mod store;
pub mod suggest;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use models::{ExportRow, ImportRecord, ImportReport, SortKey, SourceEntry, TranslationVersion};
pub use pager::{Page, PageRow, Pager};
pub use pipeline::{ImportPolicy, Pipeline};
pub use progress::{ScanProgress, ScanState};
pub use search::{
    Combinator, EmptyMode, FieldQuery, MatchMode, MatchSpan, SearchEngine, SearchQuery,
    SearchResult,
};
pub use store::TmStore;
pub use suggest::{similarity, SuggestEngine, Suggestion};

/// Engine facade bundling every component over one shared store handle
/// 引擎门面：共享同一存储句柄的全部组件
///
/// Open on startup, close on shutdown; the lifetime of the pool is
/// explicit, never ambient.
pub struct TmEngine {
    pub store: TmStore,
    pub search: SearchEngine,
    pub suggest: SuggestEngine,
    pub pipeline: Pipeline,
    config: EngineConfig,
}

impl TmEngine {
    /// Open the database named by the config and build all components
    /// 按配置打开数据库并构建全部组件
    pub async fn open(config: EngineConfig) -> anyhow::Result<Self> {
        let pool = db::open_pool(config.db_path()).await?;
        db::run_migrations(&pool).await?;
        Ok(Self::from_pool(pool, config))
    }

    /// Build over an already opened pool (tests, custom setups)
    /// 基于已打开的连接池构建
    pub fn from_pool(pool: sqlx::SqlitePool, config: EngineConfig) -> Self {
        let store = TmStore::new(pool);
        let search = SearchEngine::new(store.clone());
        let suggest = SuggestEngine::new(store.clone(), &config.suggest);
        let pipeline = Pipeline::new(store.clone());
        Self {
            store,
            search,
            suggest,
            pipeline,
            config,
        }
    }

    /// A fresh pagination controller with the configured page size
    /// 按配置页大小新建分页控制器
    pub fn pager(&self) -> Pager {
        Pager::new(self.store.clone(), self.config.pager.page_size)
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}
