//! # query 子命令实现
//!
//! 从日志或已导出的 `.ttl` 图构建内存图，然后执行模式查询或意图查询。
//!
//! ## 依赖关系
//! - 使用 `cli/query.rs` 定义的参数
//! - 使用 `store/`, `query/`, `batch/`, `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector};
use crate::cli::query::QueryArgs;
use crate::cli::OutputFormat;
use crate::config::KgConfig;
use crate::error::{KgError, QueryError, Result};
use crate::ontology;
use crate::query::{Intent, QueryEngine};
use crate::store::{GraphStore, TriplePattern};
use crate::utils::output::{self, Status};

use std::fs;
use std::path::{Path, PathBuf};

/// 执行查询
pub fn execute(args: QueryArgs, config: &KgConfig) -> Result<()> {
    let store = load_graph(&args.inputs, args.file_pattern.as_deref(), config)?;
    let prefixes = ontology::prefixes(&config.base_iri);

    let mut engine = QueryEngine::new(&store);
    if let Some(prefix) = &args.calculation {
        let calculation = store
            .calculations()
            .into_iter()
            .find(|c| c.fingerprint.starts_with(prefix.as_str()))
            .ok_or_else(|| {
                KgError::InvalidArgument(format!("no calculation with fingerprint '{}'", prefix))
            })?;
        engine = engine.scoped(calculation);
    }

    if !args.pattern.is_empty() {
        let patterns = args
            .pattern
            .iter()
            .map(|p| TriplePattern::parse(p, &prefixes))
            .collect::<std::result::Result<Vec<_>, QueryError>>()?;
        let rows = engine.select(&patterns);
        return output::print_bindings(&rows, args.format, &prefixes);
    }

    let intent = match (&args.ask, &args.intent) {
        (Some(question), _) => Intent::from_text(question)?,
        (None, Some(name)) => Intent::from_name(name, args.top)?,
        (None, None) => {
            return Err(KgError::InvalidArgument(
                "one of --pattern, --ask or --intent is required".to_string(),
            ))
        }
    };

    let answer = engine.answer(&intent)?;
    match args.format {
        OutputFormat::Table => {
            output::status(Status::Info, format!("Intent: {}", answer.intent));
            println!("{}", answer.text);
        }
        OutputFormat::Csv => output::print_bindings(&answer.rows, args.format, &prefixes)?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&answer)?),
    }
    Ok(())
}

fn is_turtle(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("ttl")
}

/// 构建查询用的内存图：`.ttl` 直接回读，其余按日志解析
pub fn load_graph(
    inputs: &[PathBuf],
    file_pattern: Option<&str>,
    config: &KgConfig,
) -> Result<GraphStore> {
    let store = GraphStore::new();
    let mut logs = Vec::new();

    for input in inputs {
        if input.is_file() && is_turtle(input) {
            let text = fs::read_to_string(input).map_err(|e| KgError::FileReadError {
                path: input.display().to_string(),
                source: e,
            })?;
            crate::ingest_turtle(&store, &text)?;
            continue;
        }
        let files = FileCollector::new(input.clone())
            .with_pattern(file_pattern.unwrap_or(&config.pattern))?
            .collect()?;
        logs.extend(files);
    }

    if !logs.is_empty() {
        let result = BatchRunner::new(config.jobs).ingest(&logs, &store, config)?;
        for (path, err) in &result.failures {
            output::status(Status::Warning, format!("{}: {}", path, err));
        }
    }

    if store.is_empty() {
        return Err(KgError::InvalidArgument(
            "no calculations could be loaded from the inputs".to_string(),
        ));
    }
    Ok(store)
}
