//! # validate 子命令实现
//!
//! 对每个文件做签名预检，不做完整解析。
//!
//! ## 依赖关系
//! - 使用 `cli/validate.rs` 定义的参数
//! - 使用 `parsers::validate_file`, `utils/output.rs`

use crate::cli::validate::ValidateArgs;
use crate::cli::OutputFormat;
use crate::config::KgConfig;
use crate::error::Result;
use crate::parsers;
use crate::utils::output::{self, Status};

use serde::Serialize;
use tabled::{Table, Tabled};

/// 预检结果行
#[derive(Debug, Clone, Serialize, Tabled)]
struct ProbeRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Recognized")]
    recognized: bool,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Signatures")]
    signatures: String,
}

/// 执行预检
pub fn execute(args: ValidateArgs, config: &KgConfig) -> Result<()> {
    let files = super::collect_inputs(&args.input, config)?;

    let mut rows = Vec::with_capacity(files.len());
    for file in &files {
        let probe = parsers::validate_file(file)?;
        rows.push(ProbeRow {
            file: file.display().to_string(),
            recognized: probe.is_recognized(),
            score: format!("{:.2}", probe.score),
            signatures: probe.matched.join(","),
        });
    }
    let recognized = rows.iter().filter(|r| r.recognized).count();

    match args.format {
        OutputFormat::Table => {
            println!("{}", Table::new(&rows));
            if recognized == rows.len() {
                output::status(
                    Status::Ok,
                    format!("{} file(s) look like Gaussian logs", recognized),
                );
            } else {
                output::status(
                    Status::Warning,
                    format!(
                        "{} of {} file(s) not recognized",
                        rows.len() - recognized,
                        rows.len()
                    ),
                );
            }
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush().map_err(|e| crate::error::KgError::FileWriteError {
                path: "<stdout>".to_string(),
                source: e,
            })?;
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}
