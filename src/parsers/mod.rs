//! # 解析器模块
//!
//! Gaussian 日志 -> `Calculation` 的同步、纯函数式解析流水线。
//!
//! ```text
//! raw bytes ──sha256──> fingerprint
//!     └──> sections::extract_sections ──> gaussian::extract ──> Calculation
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `lib.rs` 使用
//! - 使用 `models/`
//! - 子模块: sections, gaussian, elements

pub mod elements;
pub mod gaussian;
pub mod sections;

pub use sections::{probe, Probe};

use crate::config::KgConfig;
use crate::error::{KgError, ParseError, Result};
use crate::models::{Calculation, EnergyValue, Provenance};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;

/// 解析选项（不影响指纹，仅写入 provenance）
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// 源文件路径
    pub source_path: Option<String>,

    /// 提取时间；为 None 时输出完全由输入字节决定
    pub extracted_at: Option<DateTime<Utc>>,

    /// 解析器标识
    pub parser_id: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::from_config(&KgConfig::default())
    }
}

impl ParseOptions {
    pub fn from_config(config: &KgConfig) -> Self {
        ParseOptions {
            source_path: None,
            extracted_at: None,
            parser_id: config.parser_id(),
        }
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_extracted_at(mut self, at: DateTime<Utc>) -> Self {
        self.extracted_at = Some(at);
        self
    }
}

/// 原始字节的内容指纹 `sha256:<hex>`
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// 使用默认选项解析日志文本
pub fn parse(source: &str) -> std::result::Result<Calculation, ParseError> {
    parse_with(source.as_bytes(), &ParseOptions::default())
}

/// 解析日志字节（非 UTF-8 字节按有损方式解码）
pub fn parse_with(
    bytes: &[u8],
    options: &ParseOptions,
) -> std::result::Result<Calculation, ParseError> {
    let fingerprint = fingerprint(bytes);
    let text = String::from_utf8_lossy(bytes);

    let sections = sections::extract_sections(&text)?;
    debug!(%fingerprint, sections = sections.len(), "extracted sections");

    let log = gaussian::extract(&sections)?;

    let provenance = Provenance {
        source: options
            .source_path
            .clone()
            .unwrap_or_else(|| fingerprint.clone()),
        parser: options.parser_id.clone(),
        extracted_at: options.extracted_at,
    };

    Ok(Calculation {
        fingerprint,
        software: log.software,
        software_version: log.software_version,
        run_timestamp: log.run_timestamp,
        converged: log.termination == crate::models::TerminationStatus::Normal,
        termination: log.termination,
        total_energy: EnergyValue::hartree(log.total_energy),
        homo_lumo_gap: log.homo_lumo_gap.map(EnergyValue::hartree),
        method: log.method,
        basis_set: log.basis_set,
        charge: log.charge,
        multiplicity: log.multiplicity,
        atoms: log.atoms,
        frequencies: log.frequencies,
        provenance,
        warnings: log.warnings,
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| KgError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 读取并解析日志文件，路径写入 provenance
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<Calculation> {
    let bytes = read_bytes(path)?;
    let options = options.clone().with_source_path(path.display().to_string());
    parse_with(&bytes, &options).map_err(|e| KgError::ParseFailed {
        path: path.display().to_string(),
        source: e,
    })
}

/// 预检文件是否为可识别的 Gaussian 日志（不做完整解析）
pub fn validate_file(path: &Path) -> Result<Probe> {
    let bytes = read_bytes(path)?;
    Ok(probe(&String::from_utf8_lossy(&bytes)))
}

/// 支持的扩展名
pub fn supported_extensions() -> &'static [&'static str] {
    &["log", "out"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseWarning;
    use crate::models::TerminationStatus;
    use std::io::Write;

    const WATER: &str = include_str!("../../tests/data/water_hf.log");

    #[test]
    fn test_fingerprint_is_content_hash() {
        assert_eq!(fingerprint(b"abc"), fingerprint(b"abc"));
        assert_ne!(fingerprint(b"abc"), fingerprint(b"abd"));
        assert!(fingerprint(b"").starts_with("sha256:e3b0c442"));
    }

    #[test]
    fn test_parse_water() {
        let calc = parse(WATER).unwrap();
        assert_eq!(calc.software, "Gaussian");
        assert_eq!(calc.software_version, "G09RevD.01");
        assert_eq!(calc.method, "HF");
        assert_eq!(calc.basis_set, "STO-3G");
        assert_eq!(calc.charge, Some(0));
        assert_eq!(calc.multiplicity, Some(1));
        assert_eq!(calc.atom_count(), 3);
        assert_eq!(calc.formula(), "H2O");
        assert_eq!(calc.total_energy, EnergyValue::hartree(-74.9659011));
        assert!(calc.converged);
        assert_eq!(calc.termination, TerminationStatus::Normal);
        assert_eq!(calc.frequencies.len(), 3);
        assert!(calc.homo_lumo_gap.is_some());
        assert!(calc.warnings.is_empty());
        assert_eq!(calc.provenance.source, calc.fingerprint);
    }

    #[test]
    fn test_missing_termination_is_not_fatal() {
        let truncated: String = WATER
            .lines()
            .filter(|l| !l.contains("Normal termination"))
            .map(|l| format!("{}\n", l))
            .collect();
        let calc = parse(&truncated).unwrap();
        assert!(!calc.converged);
        assert_eq!(calc.termination, TerminationStatus::Missing);
        assert!(calc.warnings.contains(&ParseWarning::IncompleteTermination));
    }

    #[test]
    fn test_missing_geometry_is_fatal() {
        let text = " Entering Gaussian System, Link 0=g16\n SCF Done:  E(RHF) =  -1.0 A.U.\n";
        assert_eq!(
            parse(text),
            Err(ParseError::MissingRequiredSection {
                section: "geometry".to_string()
            })
        );
    }

    #[test]
    fn test_missing_energy_is_fatal() {
        let text: String = WATER
            .lines()
            .filter(|l| !l.contains("SCF Done"))
            .map(|l| format!("{}\n", l))
            .collect();
        assert_eq!(
            parse(&text),
            Err(ParseError::MissingRequiredSection {
                section: "scf".to_string()
            })
        );
    }

    #[test]
    fn test_parse_file_records_path() {
        let mut file = tempfile::Builder::new().suffix(".log").tempfile().unwrap();
        file.write_all(WATER.as_bytes()).unwrap();

        let calc = parse_file(file.path(), &ParseOptions::default()).unwrap();
        assert_eq!(calc.provenance.source, file.path().display().to_string());
        assert_eq!(calc.fingerprint, fingerprint(WATER.as_bytes()));

        let probe = validate_file(file.path()).unwrap();
        assert!(probe.is_recognized());
    }
}
