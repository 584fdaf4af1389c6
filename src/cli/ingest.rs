//! # ingest 子命令 CLI 定义
//!
//! 批量导入日志并导出整个图
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/ingest.rs`

use super::InputArgs;
use clap::Args;
use std::path::PathBuf;

/// ingest 子命令参数
#[derive(Args, Debug)]
pub struct IngestArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the whole graph as canonical Turtle to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto, default from config)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}
