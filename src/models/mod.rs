//! # 数据模型模块
//!
//! 定义计算结果与知识图谱三元组的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `ontology/`, `store/`, `query/` 使用
//! - 子模块: calculation, triple

pub mod calculation;
pub mod triple;

pub use calculation::{
    Atom, Calculation, EnergyUnit, EnergyValue, Frequency, Provenance, TerminationStatus,
};
pub use triple::{Literal, NamedNode, Term, TermExt, Triple};
