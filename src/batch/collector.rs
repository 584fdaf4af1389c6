//! # 日志文件收集器
//!
//! 根据输入路径和文件名模式收集待导入的日志文件。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - 逗号分隔的多个 glob 模式（如 `*.log,*.out`）
//! - 可选递归搜索
//! - 结果按路径排序，保证导入顺序稳定
//!
//! ## 依赖关系
//! - 被 `commands/ingest.rs`, `commands/validate.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob::Pattern` 匹配文件名

use crate::error::{KgError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 原始模式文本（用于错误信息）
    pattern_text: String,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: Vec::new(),
            pattern_text: "*".to_string(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）；非法模式返回 `InvalidArgument`
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Pattern::new(s).map_err(|e| {
                    KgError::InvalidArgument(format!("invalid file pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.pattern_text = pattern.to_string();
        Ok(self)
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件
    ///
    /// 单文件输入不做模式过滤；目录中无匹配文件时返回 `NoFilesFound`。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(KgError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(KgError::NoFilesFound {
                pattern: format!("{}/{}", self.input.display(), self.pattern_text),
            });
        }
        Ok(files)
    }

    /// 检查文件名是否匹配任一模式（无模式时全部匹配）
    fn matches_patterns(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(filename))
    }
}
