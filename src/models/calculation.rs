//! # 量子化学计算数据模型
//!
//! 存储从 Gaussian 日志中提取的一次计算的全部信息。
//!
//! ## 依赖关系
//! - 被 `parsers/gaussian.rs` 构建
//! - 被 `ontology/mapper.rs` 映射为三元组

use crate::error::ParseWarning;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 无法识别时使用的占位值
pub const UNKNOWN: &str = "unknown";

/// 能量单位（提取时固定，不做单位换算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnit {
    Hartree,
    ElectronVolt,
}

impl std::fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnergyUnit::Hartree => write!(f, "Hartree"),
            EnergyUnit::ElectronVolt => write!(f, "eV"),
        }
    }
}

/// 带单位的能量值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyValue {
    pub value: f64,
    pub unit: EnergyUnit,
}

impl EnergyValue {
    pub fn hartree(value: f64) -> Self {
        EnergyValue {
            value,
            unit: EnergyUnit::Hartree,
        }
    }
}

/// 原子信息（最终几何结构中的一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 在最终几何块中的序号，从 0 开始连续
    pub index: usize,

    /// 元素符号
    pub element: String,

    /// 原子序数
    pub atomic_number: u32,

    /// 笛卡尔坐标 (Å)
    pub position: [f64; 3],
}

/// 振动频率 (cm⁻¹)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency {
    /// 文件中出现的顺序
    pub index: usize,
    pub value: f64,
}

/// 程序结束状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationStatus {
    Normal,
    Error,
    Missing,
}

impl std::fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationStatus::Normal => write!(f, "normal"),
            TerminationStatus::Error => write!(f, "error"),
            TerminationStatus::Missing => write!(f, "missing"),
        }
    }
}

/// 来源信息，仅挂在 Calculation 节点上
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// 源文件标识（已知时为路径，否则为指纹）
    pub source: String,

    /// 解析器名称与版本，例如 `gaussian-kg/0.1.0`
    pub parser: String,

    /// 提取时间，由调用者提供
    pub extracted_at: Option<DateTime<Utc>>,
}

/// 一次 Gaussian 计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    /// 原始字节的内容哈希 `sha256:<hex>`
    pub fingerprint: String,

    pub software: String,
    pub software_version: String,

    /// 结束行中记录的运行时间
    pub run_timestamp: Option<NaiveDateTime>,

    pub termination: TerminationStatus,

    /// 仅当观察到正常结束标志时为 true
    pub converged: bool,

    /// 最后一个收敛的 SCF 能量
    pub total_energy: EnergyValue,

    pub homo_lumo_gap: Option<EnergyValue>,

    pub method: String,
    pub basis_set: String,

    pub charge: Option<i32>,
    pub multiplicity: Option<u32>,

    pub atoms: Vec<Atom>,

    /// 按文件顺序保存，不排序
    pub frequencies: Vec<Frequency>,

    pub provenance: Provenance,

    pub warnings: Vec<ParseWarning>,
}

impl Calculation {
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Hill 顺序的分子式（有碳时 C、H 在前，其余按字母序）
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        let mut formula = String::new();
        let mut push = |element: &str, count: usize| {
            formula.push_str(element);
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        };

        if let Some(c) = counts.remove("C") {
            push("C", c);
            if let Some(h) = counts.remove("H") {
                push("H", h);
            }
        }
        for (element, count) in counts {
            push(element, count);
        }
        formula
    }

    /// 最大振动频率
    pub fn max_frequency(&self) -> Option<f64> {
        self.frequencies
            .iter()
            .map(|f| f.value)
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    /// 虚频数量（负频率）
    pub fn imaginary_frequency_count(&self) -> usize {
        self.frequencies.iter().filter(|f| f.value < 0.0).count()
    }
}
