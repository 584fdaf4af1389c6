//! # 本体映射模块
//!
//! `Calculation` -> 三元组 -> 规范 Turtle。
//!
//! ## 功能
//! - 表驱动的概念映射（vocab）
//! - 基于内容哈希的确定性标识符（mapper）
//! - 规范序列化与回读（turtle，基于 `oxttl`）
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `lib.rs` 使用
//! - 使用 `models/`, `config.rs`
//! - 子模块: mapper, turtle, vocab

pub mod mapper;
pub mod turtle;
pub mod vocab;

pub use mapper::{calculation_iri, map_calculation, MappedCalculation};
pub use turtle::{parse_turtle, prefixes, render_term, to_turtle};

use crate::config::KgConfig;
use crate::error::Result;
use crate::models::Calculation;

/// 映射一次计算（`map_calculation` 的简写）
pub fn map(calc: &Calculation, config: &KgConfig) -> MappedCalculation {
    map_calculation(calc, config)
}

/// 直接序列化一次计算
pub fn serialize(calc: &Calculation, config: &KgConfig) -> Result<String> {
    let mapped = map_calculation(calc, config);
    to_turtle(&mapped.triples, &prefixes(&config.base_iri))
}
