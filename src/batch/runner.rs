//! # 批量导入执行器
//!
//! 并行解析多个日志文件，并插入共享的 `GraphStore`。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代（解析阶段无共享可变状态）
//! - 插入是唯一的共享写入点，由 `GraphStore` 自身串行化
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/ingest.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::config::KgConfig;
use crate::error::{KgError, Result};
use crate::ontology;
use crate::parsers::{self, ParseOptions};
use crate::store::GraphStore;
use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// 单个文件处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 新插入一次计算
    Success(String),
    /// 跳过（指纹已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 失败详情（按输入顺序）
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建执行器，`jobs = 0` 时使用全部 CPU 核心
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理文件列表，结果按输入顺序汇总
    pub fn run<F>(&self, files: &[PathBuf], processor: F) -> Result<BatchResult>
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Ingesting");

        let success_count = AtomicUsize::new(0);
        let skipped_count = AtomicUsize::new(0);
        let failed_count = AtomicUsize::new(0);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| KgError::InvalidArgument(format!("cannot build thread pool: {}", e)))?;

        let results: Vec<ProcessResult> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);

                    let counter = match &result {
                        ProcessResult::Success(_) => &success_count,
                        ProcessResult::Skipped(_) => &skipped_count,
                        ProcessResult::Failed(_, _) => &failed_count,
                    };
                    counter.fetch_add(1, Ordering::Relaxed);

                    pb.set_message(format!(
                        "new {} / dup {} / err {}",
                        success_count.load(Ordering::Relaxed),
                        skipped_count.load(Ordering::Relaxed),
                        failed_count.load(Ordering::Relaxed)
                    ));
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }
        Ok(batch_result)
    }

    /// 解析、映射并插入每个文件
    ///
    /// 单个文件的致命错误只记为失败，不影响其他文件，也不会留下部分插入。
    pub fn ingest(
        &self,
        files: &[PathBuf],
        store: &GraphStore,
        config: &KgConfig,
    ) -> Result<BatchResult> {
        let options = ParseOptions::from_config(config);
        self.run(files, |path| {
            let shown = path.display().to_string();
            let calc = match parsers::parse_file(path, &options) {
                Ok(calc) => calc,
                Err(e) => {
                    warn!(path = %shown, error = %e, "skipping unparsable log");
                    return ProcessResult::Failed(shown, e.to_string());
                }
            };
            for warning in &calc.warnings {
                warn!(path = %shown, "{}", warning);
            }

            let mapped = ontology::map(&calc, config);
            match store.insert_mapped(&mapped) {
                Ok(outcome) if outcome.inserted => ProcessResult::Success(shown),
                Ok(_) => {
                    debug!(path = %shown, "duplicate content");
                    ProcessResult::Skipped(shown)
                }
                Err(e) => ProcessResult::Failed(shown, e.to_string()),
            }
        })
    }
}
