//! # validate 子命令 CLI 定义
//!
//! 基于签名子串的快速预检
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/validate.rs`

use super::{InputArgs, OutputFormat};
use clap::Args;

/// validate 子命令参数
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}
