//! # parse 子命令实现
//!
//! 解析单个日志，输出规范 Turtle、JSON 三元组或摘要表。
//!
//! ## 依赖关系
//! - 使用 `cli/parse.rs` 定义的参数
//! - 使用 `parsers/`, `ontology/`, `utils/output.rs`

use crate::cli::parse::{ParseArgs, ParseFormat};
use crate::config::KgConfig;
use crate::error::{KgError, Result};
use crate::models::Calculation;
use crate::ontology;
use crate::parsers::{self, ParseOptions};
use crate::utils::output::{self, Status};

use chrono::Utc;
use std::fs;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// 执行解析
pub fn execute(args: ParseArgs, config: &KgConfig) -> Result<()> {
    let mut options = ParseOptions::from_config(config);
    if args.timestamp {
        options = options.with_extracted_at(Utc::now());
    }

    let calc = parsers::parse_file(&args.file, &options)?;
    for warning in &calc.warnings {
        output::status(Status::Warning, warning);
    }

    let text = match args.format {
        ParseFormat::Turtle => ontology::serialize(&calc, config)?,
        ParseFormat::Json => {
            let mapped = ontology::map(&calc, config);
            serde_json::to_string_pretty(&mapped.triples)? + "\n"
        }
        ParseFormat::Summary => format!("{}\n", summary_table(&calc)),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &text).map_err(|e| KgError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::status(
                Status::Ok,
                format!("{} -> {}", args.file.display(), path.display()),
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn summary_table(calc: &Calculation) -> Table {
    let optional = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    let rows = vec![
        SummaryRow {
            field: "Fingerprint",
            value: calc.fingerprint.clone(),
        },
        SummaryRow {
            field: "Program",
            value: format!("{} {}", calc.software, calc.software_version),
        },
        SummaryRow {
            field: "Run date",
            value: optional(calc.run_timestamp.map(|t| t.to_string())),
        },
        SummaryRow {
            field: "Termination",
            value: calc.termination.to_string(),
        },
        SummaryRow {
            field: "Converged",
            value: calc.converged.to_string(),
        },
        SummaryRow {
            field: "Method / basis",
            value: format!("{} / {}", calc.method, calc.basis_set),
        },
        SummaryRow {
            field: "Charge / mult.",
            value: format!(
                "{} / {}",
                optional(calc.charge.map(|c| c.to_string())),
                optional(calc.multiplicity.map(|m| m.to_string()))
            ),
        },
        SummaryRow {
            field: "Formula",
            value: format!("{} ({} atoms)", calc.formula(), calc.atom_count()),
        },
        SummaryRow {
            field: "SCF energy",
            value: format!("{} {}", calc.total_energy.value, calc.total_energy.unit),
        },
        SummaryRow {
            field: "HOMO-LUMO gap",
            value: optional(
                calc.homo_lumo_gap
                    .as_ref()
                    .map(|g| format!("{} {}", g.value, g.unit)),
            ),
        },
        SummaryRow {
            field: "Frequencies",
            value: format!(
                "{} (max {}, imaginary {})",
                calc.frequencies.len(),
                optional(calc.max_frequency().map(|f| f.to_string())),
                calc.imaginary_frequency_count()
            ),
        },
    ];
    Table::new(rows)
}
