//! # query 子命令 CLI 定义
//!
//! 三种查询方式（互斥）：
//! - `--pattern`：一个或多个三元组模式（合取）
//! - `--ask`：自然语言问题，匹配固定意图
//! - `--intent`：直接指定意图名称
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/query.rs`

use super::OutputFormat;
use crate::query::intent::DEFAULT_TOP_N;
use clap::{ArgGroup, Args};
use std::path::PathBuf;

/// query 子命令参数
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("request")
        .required(true)
        .args(["pattern", "ask", "intent"]),
))]
pub struct QueryArgs {
    /// Log files, directories of logs, or exported .ttl graphs
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Triple pattern, e.g. "?c ontocompchem:hasSCFEnergy ?e" (repeat to join)
    #[arg(short, long)]
    pub pattern: Vec<String>,

    /// Natural-language question, e.g. "what is the SCF energy"
    #[arg(short, long)]
    pub ask: Option<String>,

    /// Intent name: scf-energy, atom-count, method-basis, homo-lumo-gap, top-frequencies
    #[arg(short, long)]
    pub intent: Option<String>,

    /// N for top-frequencies
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Restrict the query to one calculation (fingerprint prefix, e.g. "sha256:3f2a")
    #[arg(long)]
    pub calculation: Option<String>,

    /// Glob pattern(s) for directory inputs, comma separated
    #[arg(long)]
    pub file_pattern: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}
