//! # 统一错误处理模块
//!
//! 定义 gaussian-kg 的所有错误类型，使用 `thiserror` 派生。
//!
//! - `ParseError`: 日志解析的致命错误（不会产生任何 Calculation）
//! - `ParseWarning`: 非致命的降级情况，记录在 Calculation 上
//! - `StoreError`: 图存储插入校验失败
//! - `QueryError`: 查询错误（从不修改图状态）
//! - `KgError`: 应用层错误，包装以上所有类型与 I/O
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────
// 解析错误
// ─────────────────────────────────────────────────────────────

/// 日志解析致命错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unrecognized format: no Gaussian section markers found")]
    UnrecognizedFormat,

    #[error("Malformed numeric field in {section} section, row {row}: '{value}'")]
    MalformedNumericField {
        section: String,
        row: usize,
        value: String,
    },

    #[error("Missing required section: {section}")]
    MissingRequiredSection { section: String },
}

/// 非致命解析警告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseWarning {
    /// 未观察到 "Normal termination" 标志
    IncompleteTermination,
    /// 未能从 route 行识别计算方法
    UnknownMethod,
    /// 未能从 route 行识别基组
    UnknownBasisSet,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::IncompleteTermination => {
                write!(f, "no normal termination marker; convergence recorded as false")
            }
            ParseWarning::UnknownMethod => write!(f, "computational method not found in route"),
            ParseWarning::UnknownBasisSet => write!(f, "basis set not found in route"),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 存储错误
// ─────────────────────────────────────────────────────────────

/// 图存储错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Refusing to insert an empty triple set for {fingerprint}")]
    EmptyTripleSet { fingerprint: String },

    #[error("Invalid triple: {reason}")]
    InvalidTriple { reason: String },
}

// ─────────────────────────────────────────────────────────────
// 查询错误
// ─────────────────────────────────────────────────────────────

/// 查询错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unsupported query: '{input}'")]
    UnsupportedQuery { input: String },

    #[error("Invalid pattern: {reason}")]
    InvalidPattern { reason: String },
}

// ─────────────────────────────────────────────────────────────
// 应用层错误
// ─────────────────────────────────────────────────────────────

/// gaussian-kg 应用层统一错误类型
#[derive(Error, Debug)]
pub enum KgError {
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Failed to parse {path}: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Invalid turtle at line {line}: {reason}")]
    TurtleSyntax { line: usize, reason: String },

    #[error("Failed to serialize turtle: {reason}")]
    TurtleWrite { reason: String },

    #[error("Invalid configuration in {path}\nReason: {reason}")]
    ConfigError { path: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, KgError>;
