//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `validate`: 预检文件是否为 Gaussian 日志
//! - `parse`: 解析单个日志并输出规范 Turtle / JSON / 摘要
//! - `ingest`: 批量导入目录中的日志，导出整个图
//! - `query`: 模式查询或固定意图查询
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: validate, parse, ingest, query

pub mod ingest;
pub mod parse;
pub mod query;
pub mod validate;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gaussian-kg - Gaussian 日志知识图谱工具
#[derive(Parser)]
#[command(name = "gaussian-kg")]
#[command(version)]
#[command(about = "Turn Gaussian quantum-chemistry logs into a queryable knowledge graph", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML configuration file (base IRI, parser name, jobs, pattern)
    #[arg(long, global = true, env = "GAUSSIAN_KG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the base IRI for generated instance nodes
    #[arg(long, global = true)]
    pub base_iri: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Check whether files look like Gaussian logs (signature probe, no full parse)
    Validate(validate::ValidateArgs),

    /// Parse one log and print its triples
    Parse(parse::ParseArgs),

    /// Ingest logs into a graph and export it as Turtle
    Ingest(ingest::IngestArgs),

    /// Query logs or exported graphs with triple patterns or fixed intents
    Query(query::QueryArgs),
}

// ─────────────────────────────────────────────────────────────
// 共享参数
// ─────────────────────────────────────────────────────────────

/// 文件或目录输入
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input: a log file or a directory containing logs
    pub input: PathBuf,

    /// Glob pattern(s) for directory input, comma separated (default from config: "*.log,*.out")
    #[arg(long)]
    pub pattern: Option<String>,

    /// Recurse into subdirectories
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
}

/// 表格类输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Terminal table
    #[default]
    Table,
    /// CSV on stdout
    Csv,
    /// JSON on stdout
    Json,
}
