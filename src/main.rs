//! # gaussian-kg - Gaussian 日志知识图谱工具
//!
//! 将 Gaussian 输出日志解析为符合本体的三元组，并提供查询入口。
//!
//! ## 子命令
//! - `validate` - 签名预检
//! - `parse`    - 解析单个日志，输出 Turtle / JSON / 摘要
//! - `ingest`   - 批量导入并导出整个图
//! - `query`    - 模式查询与固定意图
//!
//! 日志级别由 `RUST_LOG` 控制（默认 `warn`）。

use clap::Parser;
use gaussian_kg::cli::Cli;
use gaussian_kg::commands;
use gaussian_kg::utils::output::{self, Status};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        output::status(Status::Error, e);
        std::process::exit(1);
    }
}
