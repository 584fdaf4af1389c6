//! # 美化输出工具
//!
//! 状态行（stderr）与查询结果的 table / csv / json 输出（stdout）。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored`, `tabled`, `csv`, `serde_json`

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::models::Term;
use crate::ontology::render_term;
use crate::store::{Bindings, RowsJson};

use colored::{ColoredString, Colorize};
use std::fmt::Display;
use std::io;
use tabled::builder::Builder;

/// 状态行的种类
///
/// 状态行一律写到 stderr；stdout 只输出 Turtle、JSON、CSV 与查询结果，
/// 便于管道重定向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    Warning,
    Info,
    Skip,
    Done,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Error => "[ERR]",
            Status::Warning => "[WARN]",
            Status::Info => "[*]",
            Status::Skip => "[SKIP]",
            Status::Done => "[DONE]",
        }
    }

    fn styled(self) -> ColoredString {
        let label = self.label();
        match self {
            Status::Ok | Status::Done => label.green().bold(),
            Status::Error => label.red().bold(),
            Status::Warning => label.yellow().bold(),
            Status::Info => label.blue().bold(),
            Status::Skip => label.dimmed(),
        }
    }
}

/// 打印一行状态
pub fn status(kind: Status, msg: impl Display) {
    eprintln!("{} {}", kind.styled(), msg);
}

// ─────────────────────────────────────────────────────────────
// 查询结果
// ─────────────────────────────────────────────────────────────

/// 列名：按首次出现顺序合并所有行的变量
pub fn binding_columns(rows: &[Bindings]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for name in row.keys() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }
    columns
}

fn cell(term: Option<&Term>, prefixes: &[(String, String)]) -> String {
    match term {
        Some(term) => render_term(term, prefixes),
        None => String::new(),
    }
}

/// 按指定格式输出绑定结果
pub fn print_bindings(
    rows: &[Bindings],
    format: OutputFormat,
    prefixes: &[(String, String)],
) -> Result<()> {
    let columns = binding_columns(rows);
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                status(Status::Warning, "No matching triples.");
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(columns.iter().map(|c| format!("?{}", c)));
            for row in rows {
                builder.push_record(columns.iter().map(|c| cell(row.get(c), prefixes)));
            }
            println!("{}", builder.build());
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            wtr.write_record(&columns)?;
            for row in rows {
                wtr.write_record(columns.iter().map(|c| cell(row.get(c), prefixes)))?;
            }
            wtr.flush().map_err(|e| crate::error::KgError::FileWriteError {
                path: "<stdout>".to_string(),
                source: e,
            })?;
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&RowsJson(rows))?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TermExt;

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Ok.label(), "[OK]");
        assert_eq!(Status::Warning.label(), "[WARN]");
        assert_eq!(Status::Skip.label(), "[SKIP]");
    }

    #[test]
    fn test_binding_columns_keep_first_seen_order() {
        let mut a = Bindings::new();
        a.insert("value".to_string(), Term::literal("1"));
        let mut b = Bindings::new();
        b.insert("calc".to_string(), Term::iri("urn:c"));
        b.insert("value".to_string(), Term::literal("2"));
        assert_eq!(binding_columns(&[a, b]), vec!["value", "calc"]);
    }

    #[test]
    fn test_cell_rendering() {
        let prefixes = vec![("ex".to_string(), "http://example.org/".to_string())];
        assert_eq!(cell(Some(&Term::iri("http://example.org/a")), &prefixes), "ex:a");
        assert_eq!(cell(Some(&Term::typed("1.5", "urn:dt")), &prefixes), "1.5");
        assert_eq!(cell(None, &prefixes), "");
    }
}
