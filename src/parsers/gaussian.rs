//! # Gaussian 段内容解析器
//!
//! 将 `sections.rs` 切分出的各段解析为带类型的记录。
//!
//! ## 各段规则
//! ```text
//! Geometry      -> (原子序数, x, y, z) 表格行；任一数值错误即整体失败，取最后一个几何块
//! ScfIterations -> "SCF Done:  E(RB3LYP) =  -271.020456  A.U. after 12 cycles"，取最后一个收敛值
//!                  以及轨道本征值块 -> HOMO-LUMO gap (Hartree)
//! Frequencies   -> " Frequencies --  216.3051  345.2310  409.8790"，保持文件顺序
//! Route         -> "#p B3LYP/6-31G(d) opt freq"，方法/基组缺失时记为 "unknown"
//! Banner        -> "Gaussian 16:  ES64L-G16RevA.03 25-Dec-2016"
//! Termination   -> "Normal termination of Gaussian 16 at Thu Feb 23 14:06:39 2017."
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `parsers/sections.rs`, `parsers/elements.rs`, `models/calculation.rs`

use super::elements;
use super::sections::{is_version_banner, Section, SectionKind};
use crate::error::{ParseError, ParseWarning};
use crate::models::calculation::UNKNOWN;
use crate::models::{Atom, Frequency, TerminationStatus};

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// 不属于方法/基组的 route 关键字（比较 `=` 或 `(` 之前的部分，小写）
const JOB_KEYWORDS: &[&str] = &[
    "opt", "freq", "sp", "irc", "ircmax", "scan", "stable", "nmr", "polar", "force", "geom",
    "guess", "pop", "population", "scf", "scrf", "integral", "int", "nosymm", "nosymmetry",
    "symmetry", "symm", "test", "units", "iop", "output", "density", "td", "counterpoise",
    "empiricaldispersion", "temperature", "pressure", "gfinput", "gfprint", "volume", "prop",
    "formcheck", "fchk", "maxdisk", "punch", "sparse", "transformation", "charge", "field",
    "cphf", "nmr", "name", "restart", "window", "fmm", "chkbasis", "genchk", "archive",
];

/// 从各段提取出的原始记录（尚未附加指纹与来源信息）
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedLog {
    pub software: String,
    pub software_version: String,
    pub run_timestamp: Option<NaiveDateTime>,
    pub termination: TerminationStatus,
    pub total_energy: f64,
    pub homo_lumo_gap: Option<f64>,
    pub method: String,
    pub basis_set: String,
    pub charge: Option<i32>,
    pub multiplicity: Option<u32>,
    pub atoms: Vec<Atom>,
    pub frequencies: Vec<Frequency>,
    pub warnings: Vec<ParseWarning>,
}

/// 解析全部段
pub fn extract(sections: &[Section<'_>]) -> Result<ExtractedLog, ParseError> {
    let mut warnings = Vec::new();

    let (software, software_version) = parse_banner(sections);

    let route = sections.iter().find(|s| s.kind == SectionKind::Route);
    let (method, basis_set) = match route {
        Some(section) => parse_route(section),
        None => (None, None),
    };
    let method = method.unwrap_or_else(|| {
        warn!("no computational method found in route section");
        warnings.push(ParseWarning::UnknownMethod);
        UNKNOWN.to_string()
    });
    let basis_set = basis_set.unwrap_or_else(|| {
        warn!("no basis set found in route section");
        warnings.push(ParseWarning::UnknownBasisSet);
        UNKNOWN.to_string()
    });
    let (charge, multiplicity) = route.map(parse_charge_multiplicity).unwrap_or((None, None));

    // 所有几何块都要校验，最后一个给出原子
    let mut atoms = None;
    for section in sections.iter().filter(|s| s.kind == SectionKind::Geometry) {
        atoms = Some(parse_geometry(section)?);
    }
    let atoms = match atoms {
        Some(atoms) if !atoms.is_empty() => atoms,
        _ => {
            return Err(ParseError::MissingRequiredSection {
                section: SectionKind::Geometry.to_string(),
            })
        }
    };

    let scf_sections: Vec<&Section> = sections
        .iter()
        .filter(|s| s.kind == SectionKind::ScfIterations)
        .collect();
    let total_energy =
        parse_scf_energy(&scf_sections)?.ok_or_else(|| ParseError::MissingRequiredSection {
            section: SectionKind::ScfIterations.to_string(),
        })?;
    let homo_lumo_gap = parse_homo_lumo_gap(&scf_sections);

    let mut frequencies = Vec::new();
    for section in sections.iter().filter(|s| s.kind == SectionKind::Frequencies) {
        frequencies = parse_frequencies(section)?;
    }

    let (termination, run_timestamp) = parse_termination(sections);
    if termination != TerminationStatus::Normal {
        warn!(status = %termination, "no normal termination marker observed");
        warnings.push(ParseWarning::IncompleteTermination);
    }

    Ok(ExtractedLog {
        software,
        software_version,
        run_timestamp,
        termination,
        total_energy,
        homo_lumo_gap,
        method,
        basis_set,
        charge,
        multiplicity,
        atoms,
        frequencies,
        warnings,
    })
}

// ─────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────

/// 返回 (程序名, 版本)，优先使用修订号，例如 `G16RevA.03`
fn parse_banner(sections: &[Section<'_>]) -> (String, String) {
    let line = sections
        .iter()
        .filter(|s| s.kind == SectionKind::Banner)
        .flat_map(|s| s.lines.iter())
        .map(|l| l.trim())
        .find(|l| is_version_banner(l));

    let Some(line) = line else {
        return (UNKNOWN.to_string(), UNKNOWN.to_string());
    };

    // "Gaussian 16:  ES64L-G16RevA.03 25-Dec-2016"
    let (head, tail) = line.split_once(':').unwrap_or((line, ""));
    let major = head.trim_start_matches("Gaussian").trim();
    let version = tail
        .split_whitespace()
        .next()
        .and_then(|build| build.rsplit_once('-').map(|(_, rev)| rev))
        .filter(|rev| !rev.is_empty())
        .unwrap_or(major);

    ("Gaussian".to_string(), version.to_string())
}

// ─────────────────────────────────────────────────────────────
// Route
// ─────────────────────────────────────────────────────────────

/// 合并 route 行（直到结束的虚线），返回去掉 `#`/`#p`/`#n`/`#t` 前缀的文本
fn route_text(section: &Section<'_>) -> String {
    let mut text = String::new();
    for line in &section.lines {
        if is_rule(line.trim()) {
            break;
        }
        // 续行按列宽折断：只去掉行首的一个输出空格，其余原样拼接
        text.push_str(line.strip_prefix(' ').unwrap_or(line));
    }

    let body = text.trim().trim_start_matches('#');
    let mut chars = body.chars();
    match (chars.next(), chars.next()) {
        (Some(c), Some(next))
            if matches!(c.to_ascii_lowercase(), 'p' | 'n' | 't') && next.is_whitespace() =>
        {
            body[1..].trim().to_string()
        }
        _ => body.trim().to_string(),
    }
}

/// 按空白切分，忽略括号内的空白
fn route_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_job_keyword(token: &str) -> bool {
    let key = token
        .split(['=', '('])
        .next()
        .unwrap_or(token)
        .to_ascii_lowercase();
    JOB_KEYWORDS.contains(&key.as_str())
}

/// 返回 (方法, 基组)，缺失的为 None
fn parse_route(section: &Section<'_>) -> (Option<String>, Option<String>) {
    let text = route_text(section);
    let mut candidates = route_tokens(&text)
        .into_iter()
        .filter(|t| !is_job_keyword(t));

    let Some(first) = candidates.next() else {
        return (None, None);
    };

    // "B3LYP/6-31G(d)" 或 "B3LYP/6-31G(d)/Auto"
    if let Some((method, rest)) = first.split_once('/') {
        let basis = rest.split('/').next().unwrap_or(rest);
        let method = (!method.is_empty()).then(|| method.to_string());
        let basis = (!basis.is_empty()).then(|| basis.to_string());
        return (method, basis);
    }

    (Some(first), candidates.next())
}

fn charge_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Charge\s*=\s*(-?\d+)\s+Multiplicity\s*=\s*(\d+)").expect("valid regex")
    })
}

fn parse_charge_multiplicity(section: &Section<'_>) -> (Option<i32>, Option<u32>) {
    section
        .lines
        .iter()
        .find_map(|line| charge_regex().captures(line))
        .map(|caps| (caps[1].parse().ok(), caps[2].parse().ok()))
        .unwrap_or((None, None))
}

// ─────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────

/// 虚线分隔行
fn is_rule(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

fn malformed(section: &Section<'_>, row: usize, value: &str) -> ParseError {
    ParseError::MalformedNumericField {
        section: section.kind.to_string(),
        row,
        value: value.to_string(),
    }
}

/// 解析一个几何表
/// ```text
///  ---------------------------------------------------------------------
///  Center     Atomic      Atomic             Coordinates (Angstroms)
///  Number     Number       Type             X           Y           Z
///  ---------------------------------------------------------------------
///       1          6           0        0.000000    0.000000    0.000000
///  ---------------------------------------------------------------------
/// ```
fn parse_geometry(section: &Section<'_>) -> Result<Vec<Atom>, ParseError> {
    let mut atoms = Vec::new();
    let mut rules_seen = 0;

    for line in section.lines.iter().skip(1) {
        let trimmed = line.trim();
        if is_rule(trimmed) {
            rules_seen += 1;
            if rules_seen == 3 {
                break;
            }
            continue;
        }
        if rules_seen < 2 || trimmed.is_empty() {
            continue;
        }

        let row = atoms.len();
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        // 6 列带 Atomic Type，旧版输出只有 5 列
        let (z_field, coords) = match parts.len() {
            6 => (parts[1], &parts[3..6]),
            5 => (parts[1], &parts[2..5]),
            _ => return Err(malformed(section, row, trimmed)),
        };

        let atomic_number: i64 = z_field
            .parse()
            .map_err(|_| malformed(section, row, z_field))?;
        let element =
            elements::symbol_for(atomic_number).ok_or_else(|| malformed(section, row, z_field))?;

        let mut position = [0.0; 3];
        for (slot, field) in position.iter_mut().zip(coords) {
            *slot = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| malformed(section, row, field))?;
        }

        atoms.push(Atom {
            index: row,
            element: element.to_string(),
            atomic_number: atomic_number.max(0) as u32,
            position,
        });
    }

    Ok(atoms)
}

// ─────────────────────────────────────────────────────────────
// SCF
// ─────────────────────────────────────────────────────────────

/// 文件顺序中最后一个收敛的 SCF 能量；中间值直接丢弃
fn parse_scf_energy(sections: &[&Section<'_>]) -> Result<Option<f64>, ParseError> {
    let mut last = None;

    for section in sections {
        let mut unconverged = false;
        let mut row = 0;
        for line in &section.lines {
            let trimmed = line.trim();
            if trimmed.contains("Convergence criterion not met") {
                unconverged = true;
                continue;
            }
            let Some(rest) = trimmed.strip_prefix("SCF Done:") else {
                continue;
            };

            // "E(RB3LYP) =  -271.020456     A.U. after   12 cycles"
            let field = rest
                .split_once('=')
                .map(|(_, after)| after)
                .and_then(|after| after.split_whitespace().next())
                .unwrap_or(rest.trim());
            let value: f64 = field
                .replace(['D', 'd'], "E")
                .parse()
                .map_err(|_| malformed(section, row, field))?;
            row += 1;

            if std::mem::take(&mut unconverged) {
                warn!(value, "skipping unconverged SCF energy");
                continue;
            }
            last = Some(value);
        }
    }

    Ok(last)
}

fn eigenvalue_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+\.\d+").expect("valid regex"))
}

/// 最后一个 Alpha 本征值块的 HOMO-LUMO gap (Hartree)，保留 5 位小数
fn parse_homo_lumo_gap(sections: &[&Section<'_>]) -> Option<f64> {
    let mut occupied: Vec<f64> = Vec::new();
    let mut virtual_: Vec<f64> = Vec::new();

    for section in sections {
        let mut in_block = false;
        for line in &section.lines {
            let trimmed = line.trim();
            let values = |text: &str| -> Vec<f64> {
                let after = text.split_once("--").map(|(_, v)| v).unwrap_or("");
                // F10.5 列可能粘连，如 "-100.12345-10.12345"
                eigenvalue_regex()
                    .find_iter(after)
                    .filter_map(|m| m.as_str().parse().ok())
                    .collect()
            };

            if trimmed.starts_with("Alpha  occ. eigenvalues") {
                if !in_block {
                    occupied.clear();
                    virtual_.clear();
                    in_block = true;
                }
                occupied.extend(values(trimmed));
            } else if trimmed.starts_with("Alpha virt. eigenvalues") {
                virtual_.extend(values(trimmed));
            } else {
                in_block = false;
            }
        }
    }

    let homo = occupied.iter().copied().reduce(f64::max)?;
    let lumo = virtual_.iter().copied().reduce(f64::min)?;
    Some(((lumo - homo) * 1e5).round() / 1e5)
}

// ─────────────────────────────────────────────────────────────
// Frequencies
// ─────────────────────────────────────────────────────────────

/// " Frequencies --    216.3051               345.2310               409.8790"
fn parse_frequencies(section: &Section<'_>) -> Result<Vec<Frequency>, ParseError> {
    let mut frequencies = Vec::new();

    for (row, line) in section
        .lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.starts_with("Frequencies --") && !l.starts_with("Frequencies ---"))
        .enumerate()
    {
        let values = &line["Frequencies --".len()..];
        for field in values.split_whitespace() {
            let value: f64 = field.parse().map_err(|_| malformed(section, row, field))?;
            frequencies.push(Frequency {
                index: frequencies.len(),
                value,
            });
        }
    }

    Ok(frequencies)
}

// ─────────────────────────────────────────────────────────────
// Termination
// ─────────────────────────────────────────────────────────────

/// 以最后一个结束段为准
fn parse_termination(sections: &[Section<'_>]) -> (TerminationStatus, Option<NaiveDateTime>) {
    let Some(section) = sections
        .iter()
        .rev()
        .find(|s| s.kind == SectionKind::Termination)
    else {
        return (TerminationStatus::Missing, None);
    };

    let marker = section.lines[0].trim();
    if !marker.starts_with("Normal termination") {
        return (TerminationStatus::Error, None);
    }

    // "Normal termination of Gaussian 16 at Thu Feb 23 14:06:39 2017."
    let timestamp = marker.split_once(" at ").and_then(|(_, date)| {
        let date = date.trim().trim_end_matches('.');
        let normalized = date.split_whitespace().collect::<Vec<_>>().join(" ");
        NaiveDateTime::parse_from_str(&normalized, "%a %b %d %H:%M:%S %Y").ok()
    });

    (TerminationStatus::Normal, timestamp)
}
