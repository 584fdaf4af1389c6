//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `ontology/`, `store/`, `query/`, `batch/`, `utils/`
//! - 子模块: validate, parse, ingest, query

pub mod ingest;
pub mod parse;
pub mod query;
pub mod validate;

use crate::batch::FileCollector;
use crate::cli::{Cli, Commands, InputArgs};
use crate::config::KgConfig;
use crate::error::Result;

use std::path::{Path, PathBuf};
use tracing::debug;

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), cli.base_iri.as_deref())?;
    debug!(?config, "effective configuration");

    match cli.command {
        Commands::Validate(args) => validate::execute(args, &config),
        Commands::Parse(args) => parse::execute(args, &config),
        Commands::Ingest(args) => ingest::execute(args, &config),
        Commands::Query(args) => query::execute(args, &config),
    }
}

/// 配置文件 + 命令行覆盖
pub fn load_config(path: Option<&Path>, base_iri: Option<&str>) -> Result<KgConfig> {
    let config = match path {
        Some(path) => KgConfig::load(path)?,
        None => KgConfig::default(),
    };
    match base_iri {
        Some(iri) => config.with_base_iri(iri),
        None => Ok(config),
    }
}

/// 按输入参数收集日志文件（模式缺省取配置）
fn collect_inputs(input: &InputArgs, config: &KgConfig) -> Result<Vec<PathBuf>> {
    let pattern = input.pattern.as_deref().unwrap_or(&config.pattern);
    FileCollector::new(input.input.clone())
        .with_pattern(pattern)?
        .recursive(input.recursive)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_with_override() {
        let config = load_config(None, Some("https://example.org/g/")).unwrap();
        assert_eq!(config.base_iri, "https://example.org/g/");
        assert!(load_config(None, Some("no-separator")).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "jobs = 3").unwrap();
        let config = load_config(Some(file.path()), None).unwrap();
        assert_eq!(config.jobs, 3);
    }
}
