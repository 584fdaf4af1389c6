//! # parse 子命令 CLI 定义
//!
//! 解析单个日志文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/parse.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// parse 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ParseFormat {
    /// Canonical Turtle
    Turtle,
    /// Triples as JSON
    Json,
    /// Human-readable summary table
    Summary,
}

/// parse 子命令参数
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Gaussian log file
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "turtle")]
    pub format: ParseFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Record the extraction time in provenance (makes output time-dependent)
    #[arg(long, default_value_t = false)]
    pub timestamp: bool,
}
