//! # 日志分段器
//!
//! 将 Gaussian 日志按行驱动的状态机切分为有序的逻辑段。
//!
//! ## 状态机
//! ```text
//! Seeking ──marker──> Banner | Route | Geometry | ScfIterations | Frequencies | Termination
//!    任意状态遇到 "开启" 标志行 -> 关闭当前段，开启新段
//!    "延续" 标志行（SCF Done / 收敛失败 / 版本行）在同类段中不开新段
//!    非 Seeking 状态下的未识别行 -> 缓存到当前段
//!    `#` 行只有在 Banner 之后才是 route 卡片，否则按普通行处理
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `parsers/gaussian.rs` 使用

use crate::error::ParseError;
use tracing::debug;

/// 段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Banner,
    Route,
    Geometry,
    ScfIterations,
    Frequencies,
    Termination,
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Banner => write!(f, "banner"),
            SectionKind::Route => write!(f, "route"),
            SectionKind::Geometry => write!(f, "geometry"),
            SectionKind::ScfIterations => write!(f, "scf"),
            SectionKind::Frequencies => write!(f, "frequencies"),
            SectionKind::Termination => write!(f, "termination"),
        }
    }
}

/// 状态机状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Seeking,
    In(SectionKind),
}

/// 一个逻辑段，`lines[0]` 为触发它的标志行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub kind: SectionKind,
    /// 标志行的行号（从 1 开始）
    pub start_line: usize,
    pub lines: Vec<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// 总是开启新段
    Open,
    /// 已处于同类段时并入当前段
    Continue,
}

/// 识别标志行
fn classify(line: &str) -> Option<(SectionKind, Role)> {
    let trimmed = line.trim_start();

    if trimmed.starts_with("Entering Gaussian System") {
        return Some((SectionKind::Banner, Role::Open));
    }
    if is_version_banner(trimmed) {
        return Some((SectionKind::Banner, Role::Continue));
    }
    if trimmed.starts_with('#') {
        return Some((SectionKind::Route, Role::Open));
    }
    if trimmed.starts_with("Standard orientation:")
        || trimmed.starts_with("Input orientation:")
        || trimmed.starts_with("Z-Matrix orientation:")
    {
        return Some((SectionKind::Geometry, Role::Open));
    }
    if trimmed.starts_with("Requested convergence on RMS density matrix") {
        return Some((SectionKind::ScfIterations, Role::Open));
    }
    if trimmed.starts_with("SCF Done:") || trimmed.contains("Convergence criterion not met") {
        return Some((SectionKind::ScfIterations, Role::Continue));
    }
    if trimmed.starts_with("Harmonic frequencies (cm**-1)") {
        return Some((SectionKind::Frequencies, Role::Open));
    }
    if trimmed.starts_with("Normal termination of Gaussian") || trimmed.starts_with("Error termination")
    {
        return Some((SectionKind::Termination, Role::Open));
    }
    None
}

/// `Gaussian 16:  ES64L-G16RevA.03 25-Dec-2016`
pub(crate) fn is_version_banner(trimmed: &str) -> bool {
    let Some(rest) = trimmed.strip_prefix("Gaussian ") else {
        return false;
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    !digits.is_empty() && rest[digits.len()..].starts_with(':')
}

/// 行驱动的分段状态机
#[derive(Debug)]
pub struct SectionExtractor<'a> {
    state: State,
    seen_banner: bool,
    sections: Vec<Section<'a>>,
}

impl<'a> Default for SectionExtractor<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SectionExtractor<'a> {
    pub fn new() -> Self {
        SectionExtractor {
            state: State::Seeking,
            seen_banner: false,
            sections: Vec::new(),
        }
    }

    /// 处理一行，`line_no` 从 1 开始
    pub fn feed(&mut self, line_no: usize, line: &'a str) {
        let marker = match classify(line) {
            Some((SectionKind::Route, _)) if !self.seen_banner => None,
            other => other,
        };
        match marker {
            Some((kind, Role::Continue)) if self.state == State::In(kind) => {
                self.push_line(line);
            }
            Some((kind, _)) => {
                if kind == SectionKind::Banner {
                    self.seen_banner = true;
                }
                debug!(line = line_no, from = ?self.state, to = %kind, "section transition");
                self.state = State::In(kind);
                self.sections.push(Section {
                    kind,
                    start_line: line_no,
                    lines: vec![line],
                });
            }
            None => self.push_line(line),
        }
    }

    fn push_line(&mut self, line: &'a str) {
        if self.state == State::Seeking {
            return;
        }
        if let Some(section) = self.sections.last_mut() {
            section.lines.push(line);
        }
    }

    /// 结束输入；没有识别到任何 Gaussian 标志时返回 `UnrecognizedFormat`
    pub fn finish(self) -> Result<Vec<Section<'a>>, ParseError> {
        if self.sections.iter().all(|s| s.kind == SectionKind::Route) {
            return Err(ParseError::UnrecognizedFormat);
        }
        Ok(self.sections)
    }
}

/// 将整段文本切分为有序的段列表
pub fn extract_sections(text: &str) -> Result<Vec<Section<'_>>, ParseError> {
    let mut extractor = SectionExtractor::new();
    for (i, line) in text.lines().enumerate() {
        extractor.feed(i + 1, line);
    }
    extractor.finish()
}

// ─────────────────────────────────────────────────────────────
// 轻量级预检
// ─────────────────────────────────────────────────────────────

/// 签名组：任一子串出现即视为该组命中
const SIGNATURES: [(&str, &[&str]); 4] = [
    ("banner", &["Entering Gaussian"]),
    ("version", &["Gaussian 16", "Gaussian 09", "Gaussian 03"]),
    ("scf", &["SCF Done"]),
    ("termination", &["Normal termination", "Error termination"]),
];

/// 预检结果
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    /// 命中签名组的比例 (0.0 - 1.0)
    pub score: f64,
    /// 命中的签名组名称
    pub matched: Vec<&'static str>,
}

impl Probe {
    pub fn is_recognized(&self) -> bool {
        !self.matched.is_empty()
    }
}

/// 不做完整解析，仅检查签名子串
pub fn probe(text: &str) -> Probe {
    let matched: Vec<&'static str> = SIGNATURES
        .iter()
        .filter(|(_, needles)| needles.iter().any(|n| text.contains(n)))
        .map(|(name, _)| *name)
        .collect();

    Probe {
        score: matched.len() as f64 / SIGNATURES.len() as f64,
        matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#" Entering Gaussian System, Link 0=g16
 ******************************************
 Gaussian 16:  ES64L-G16RevA.03 25-Dec-2016
 ******************************************
 ---------
 #p HF/STO-3G
 ---------
                          Input orientation:
 some table
 Requested convergence on RMS density matrix=1.00D-08 within 128 cycles.
 Cycle   1  Pass 1  IDiag  1:
 SCF Done:  E(RHF) =  -74.9659011     A.U. after    6 cycles
 Normal termination of Gaussian 16 at Thu Feb 23 14:06:39 2017.
"#;

    #[test]
    fn test_sections_in_order() {
        let sections = extract_sections(SAMPLE).unwrap();
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Banner,
                SectionKind::Route,
                SectionKind::Geometry,
                SectionKind::ScfIterations,
                SectionKind::Termination,
            ]
        );
    }

    #[test]
    fn test_continue_marker_stays_in_section() {
        let sections = extract_sections(SAMPLE).unwrap();
        // 版本行并入 Banner 段，SCF Done 并入 SCF 段
        assert!(sections[0].lines.iter().any(|l| l.contains("Gaussian 16:")));
        let scf = &sections[3];
        assert_eq!(scf.start_line, 10);
        assert!(scf.lines.last().unwrap().contains("SCF Done"));
    }

    #[test]
    fn test_unrecognized_lines_buffered() {
        let sections = extract_sections(SAMPLE).unwrap();
        let route = &sections[1];
        assert_eq!(route.lines.len(), 2);
        assert_eq!(route.lines[1].trim(), "---------");
    }

    #[test]
    fn test_scf_done_opens_section_from_other_state() {
        let text = " Standard orientation:\n SCF Done:  E(RHF) = -1.0 A.U.\n";
        let sections = extract_sections(text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].kind, SectionKind::ScfIterations);
    }

    #[test]
    fn test_no_markers_is_unrecognized() {
        let result = extract_sections("hello\nworld\n");
        assert_eq!(result, Err(ParseError::UnrecognizedFormat));
    }

    #[test]
    fn test_hash_lines_without_banner_are_unrecognized() {
        for text in [
            "#!/bin/bash\necho hello\n",
            "# Meeting notes\n- agenda\n# Action items\n",
        ] {
            assert_eq!(extract_sections(text), Err(ParseError::UnrecognizedFormat));
            assert!(!probe(text).is_recognized());
        }
    }

    #[test]
    fn test_route_requires_banner() {
        let text = " # comment\n Standard orientation:\n";
        let sections = extract_sections(text).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Geometry);
    }

    #[test]
    fn test_probe() {
        let p = probe(SAMPLE);
        assert!(p.is_recognized());
        assert!((p.score - 1.0).abs() < 1e-12);

        let p = probe("just a shopping list\nmilk\neggs\n");
        assert!(!p.is_recognized());
        assert_eq!(p.score, 0.0);
    }

    #[test]
    fn test_version_banner() {
        assert!(is_version_banner("Gaussian 09:  EM64L-G09RevD.01 24-Apr-2013"));
        assert!(!is_version_banner("Gaussian basis set"));
        assert!(!is_version_banner("Gaussian 16 at Thu"));
    }
}
