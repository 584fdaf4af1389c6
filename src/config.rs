//! # 配置模块
//!
//! 知识图谱生成的可配置项，可从 TOML 文件加载。
//!
//! ```toml
//! base_iri = "https://w3id.org/gaussian-kg/"
//! parser_name = "gaussian-kg"
//! jobs = 0
//! pattern = "*.log,*.out"
//! ```
//!
//! ## 依赖关系
//! - 被 `ontology/mapper.rs`, `parsers/mod.rs`, `batch/runner.rs`, `commands/` 使用
//! - 使用 `serde` + `toml`

use crate::error::{KgError, Result};
use crate::models::NamedNode;
use crate::parsers;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认实例 IRI 前缀
pub const DEFAULT_BASE_IRI: &str = "https://w3id.org/gaussian-kg/";

/// 知识图谱配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KgConfig {
    /// 生成实例 IRI 的前缀，必须以 `/` 或 `#` 结尾
    pub base_iri: String,

    /// 写入 provenance 的解析器名称
    pub parser_name: String,

    /// 批量解析的并行作业数（0 = 自动）
    pub jobs: usize,

    /// 批量解析的文件匹配模式（逗号分隔）
    pub pattern: String,
}

/// 由支持的扩展名生成默认匹配模式，如 `*.log,*.out`
fn default_pattern() -> String {
    parsers::supported_extensions()
        .iter()
        .map(|ext| format!("*.{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

impl Default for KgConfig {
    fn default() -> Self {
        KgConfig {
            base_iri: DEFAULT_BASE_IRI.to_string(),
            parser_name: env!("CARGO_PKG_NAME").to_string(),
            jobs: 0,
            pattern: default_pattern(),
        }
    }
}

impl KgConfig {
    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| KgError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|reason| KgError::ConfigError {
            path: path.display().to_string(),
            reason,
        })
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        let config: KgConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !(self.base_iri.ends_with('/') || self.base_iri.ends_with('#')) {
            return Err(format!(
                "base_iri must end with '/' or '#': {}",
                self.base_iri
            ));
        }
        if let Err(e) = NamedNode::new(self.base_iri.as_str()) {
            return Err(format!("base_iri is not a valid IRI: {}: {}", self.base_iri, e));
        }
        if self.parser_name.trim().is_empty() {
            return Err("parser_name must not be empty".to_string());
        }
        Ok(())
    }

    /// 覆盖实例 IRI 前缀（命令行 `--base-iri`）
    pub fn with_base_iri(mut self, base_iri: &str) -> Result<Self> {
        self.base_iri = base_iri.to_string();
        self.validate().map_err(KgError::InvalidArgument)?;
        Ok(self)
    }

    /// 解析器标识，例如 `gaussian-kg/0.1.0`
    pub fn parser_id(&self) -> String {
        format!("{}/{}", self.parser_name, env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = KgConfig::default();
        assert_eq!(config.base_iri, DEFAULT_BASE_IRI);
        assert!(config.parser_id().starts_with("gaussian-kg/"));
        assert_eq!(config.pattern, "*.log,*.out");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = KgConfig::from_toml("jobs = 4\n").unwrap();
        assert_eq!(config.jobs, 4);
        assert_eq!(config.base_iri, DEFAULT_BASE_IRI);
    }

    #[test]
    fn test_invalid_base_iri() {
        let result = KgConfig::from_toml("base_iri = \"https://example.org/kg\"\n");
        assert!(result.is_err());

        assert!(KgConfig::default().with_base_iri("urn:x").is_err());
        let config = KgConfig::default().with_base_iri("urn:x#").unwrap();
        assert_eq!(config.base_iri, "urn:x#");

        assert!(KgConfig::default().with_base_iri("not an iri/").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_iri = \"https://example.org/kg#\"").unwrap();
        writeln!(file, "pattern = \"*.log\"").unwrap();

        let config = KgConfig::load(file.path()).unwrap();
        assert_eq!(config.base_iri, "https://example.org/kg#");
        assert_eq!(config.pattern, "*.log");
    }
}
