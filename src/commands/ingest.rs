//! # ingest 子命令实现
//!
//! 并行解析目录中的日志，插入同一个图，并可导出为规范 Turtle。
//!
//! ## 依赖关系
//! - 使用 `cli/ingest.rs` 定义的参数
//! - 使用 `batch/`, `store/`, `ontology/turtle.rs`, `utils/output.rs`

use crate::batch::BatchRunner;
use crate::cli::ingest::IngestArgs;
use crate::config::KgConfig;
use crate::error::{KgError, Result};
use crate::ontology;
use crate::store::GraphStore;
use crate::utils::output::{self, Status};

use std::fs;

/// 执行批量导入
pub fn execute(args: IngestArgs, config: &KgConfig) -> Result<()> {
    let files = super::collect_inputs(&args.input, config)?;
    let runner = BatchRunner::new(args.jobs.unwrap_or(config.jobs));
    output::status(
        Status::Info,
        format!(
            "Found {} file(s), using {} worker(s)",
            files.len(),
            runner.jobs()
        ),
    );

    let store = GraphStore::new();
    let result = runner.ingest(&files, &store, config)?;

    for (path, err) in &result.failures {
        output::status(Status::Error, format!("{}: {}", path, err));
    }
    if result.skipped > 0 {
        output::status(
            Status::Skip,
            format!("{} duplicate file(s) by content", result.skipped),
        );
    }
    output::status(
        Status::Done,
        format!(
            "{} of {} file(s) ingested: {} calculation(s), {} triple(s)",
            result.success,
            result.total(),
            store.calculation_count(),
            store.len()
        ),
    );

    if let Some(path) = &args.output {
        let text = ontology::to_turtle(&store.triples(), &ontology::prefixes(&config.base_iri))?;
        fs::write(path, text).map_err(|e| KgError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        output::status(Status::Ok, format!("Graph written to '{}'", path.display()));
    }

    Ok(())
}
