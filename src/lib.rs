//! # gaussian-kg
//!
//! 将 Gaussian 量子化学日志转换为可查询的知识图谱。
//!
//! ```text
//! 日志文本 -> parsers::sections -> parsers::gaussian -> Calculation
//!          -> ontology::map -> 三元组 -> store::GraphStore <- query::QueryEngine
//! ```
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── parsers/    (分段状态机 + 结构化提取)
//!   ├── ontology/   (词汇表、映射、Turtle)
//!   ├── store/      (三元组库与模式匹配)
//!   ├── query/      (模式查询与固定意图)
//!   ├── batch/      (并行批量导入)
//!   ├── cli/ + commands/ (命令行)
//!   ├── config.rs   (配置)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod ontology;
pub mod parsers;
pub mod query;
pub mod store;
pub mod utils;

pub use config::KgConfig;
pub use error::{KgError, ParseError, QueryError, Result, StoreError};
pub use models::{Calculation, Term, TermExt, Triple};
pub use parsers::{parse, parse_with, ParseOptions};
pub use query::{Answer, Intent, QueryEngine};
pub use store::{CalculationRef, GraphStore, InsertOutcome, TriplePattern};

use tracing::warn;

/// 解析 -> 映射 -> 插入
///
/// 任何致命解析错误都发生在插入之前，存储保持不变。
pub fn ingest(
    store: &GraphStore,
    source: &[u8],
    options: &ParseOptions,
    config: &KgConfig,
) -> Result<InsertOutcome> {
    let calc = parse_with(source, options)?;
    for warning in &calc.warnings {
        warn!(fingerprint = %calc.fingerprint, "{}", warning);
    }
    let mapped = ontology::map(&calc, config);
    Ok(store.insert_mapped(&mapped)?)
}

/// 重新导入规范 Turtle，每个计算节点（指纹取自 `dcterms:identifier`）各插入一次
pub fn ingest_turtle(store: &GraphStore, text: &str) -> Result<Vec<InsertOutcome>> {
    let triples = ontology::parse_turtle(text)?;
    let calculations = ontology::MappedCalculation::split_graph(triples);
    if calculations.is_empty() {
        return Err(KgError::InvalidArgument(
            "no calculation node with an identifier found".to_string(),
        ));
    }
    calculations
        .iter()
        .map(|mapped| store.insert_mapped(mapped).map_err(KgError::from))
        .collect()
}
