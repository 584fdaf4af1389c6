//! # 批量导入模块
//!
//! 提供日志文件的批量收集与并行导入。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录）
//! - 收集匹配文件列表
//! - 并行解析，统一插入共享图
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/ingest.rs`, `commands/query.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
