//! Engine configuration module / 引擎配置模块
//!
//! Loaded from a JSON file (created with defaults on first run) or built
//! directly by the embedding application. The config is constructed once
//! and passed into engine components explicitly; there is no global
//! configuration singleton.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine configuration / 引擎配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Database configuration / 数据库配置
    pub database: DatabaseConfig,
    /// Fuzzy suggestion configuration / 模糊建议配置
    pub suggest: SuggestConfig,
    /// Pagination configuration / 分页配置
    pub pager: PagerConfig,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
    /// Database file path (relative to data_dir) / 数据库文件路径
    pub db_file: String,
}

/// Fuzzy suggestion configuration / 模糊建议配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Minimum similarity score for a candidate / 候选最低相似度
    pub threshold: f64,
    /// Additive bonus when contexts match, capped at 1.0 / 上下文加成
    pub context_bonus: f64,
}

/// Pagination configuration / 分页配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Rows per page / 每页行数
    pub page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            suggest: SuggestConfig::default(),
            pager: PagerConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "transmem.db".to_string(),
        }
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            context_bonus: 0.1,
        }
    }
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self { page_size: 30 }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file, creating it with defaults if
    /// missing / 从 JSON 文件加载配置，不存在则写入默认配置
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            let config: EngineConfig = serde_json::from_str(&raw)?;
            Ok(config)
        } else {
            let config = EngineConfig::default();
            config.save(path)?;
            tracing::info!("Default config written to {:?}", path);
            Ok(config)
        }
    }

    /// Save configuration to a JSON file / 保存配置
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Resolve the database file path / 解析数据库文件路径
    pub fn db_path(&self) -> PathBuf {
        Path::new(&self.database.data_dir).join(&self.database.db_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.suggest.threshold, 0.7);
        assert_eq!(config.suggest.context_bonus, 0.1);
        assert_eq!(config.pager.page_size, 30);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = EngineConfig::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.pager.page_size, 30);

        // Reload reads the same values back / 重新加载读取相同值
        let reloaded = EngineConfig::load(&path).unwrap();
        assert_eq!(reloaded.suggest.threshold, config.suggest.threshold);
    }
}
