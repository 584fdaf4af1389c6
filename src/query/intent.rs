//! # 固定意图
//!
//! 自然语言问题 -> 封闭枚举 `Intent`。
//! 每个意图对应一条预置模式查询和一个确定性的回答模板；
//! 扩展时在 `TEMPLATES` 中增加一行，而不是增加字符串匹配分支。
//!
//! ## 依赖关系
//! - 被 `query/mod.rs`, `commands/query.rs` 使用
//! - 使用 `store/pattern.rs`, `ontology/vocab.rs`

use crate::error::QueryError;
use crate::ontology::vocab;
use crate::store::{PatternTerm, TriplePattern};

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

/// 支持的意图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "kebab-case")]
pub enum Intent {
    ScfEnergy,
    AtomCount,
    MethodBasis,
    HomoLumoGap,
    TopFrequencies { n: usize },
}

/// 问题中未给出 N 且名词为复数时的默认值
pub const DEFAULT_TOP_N: usize = 5;

type Builder = fn(&Captures) -> Option<Intent>;

/// 意图模板表：按顺序尝试，首个命中者生效
const TEMPLATES: &[(&str, Builder)] = &[
    (
        r"(?i)\btop\s*(\d+)?\s+(?:vibrational\s+)?(frequenc(?:y|ies)|freqs?)\b",
        top_frequencies,
    ),
    (
        r"(?i)\b(\d+)?\s*(?:highest|largest|max(?:imum)?)\s+(?:vibrational\s+)?(frequenc(?:y|ies)|freqs?)\b",
        top_frequencies,
    ),
    (r"(?i)homo\s*-?\s*lumo|\bband\s*gap\b|\bgap\b", homo_lumo_gap),
    (
        r"(?i)how\s+many\s+atoms|\bnumber\s+of\s+atoms\b|\batom\s*count\b",
        atom_count,
    ),
    (
        r"(?i)\bmethod\b|\bbasis(?:\s*set)?\b|\bfunctional\b|level\s+of\s+theory",
        method_basis,
    ),
    (r"(?i)\bscf\b|\btotal\s+energy\b|\benergy\b", scf_energy),
];

fn top_frequencies(caps: &Captures) -> Option<Intent> {
    let singular = caps.get(2).map_or(false, |noun| {
        let noun = noun.as_str().to_ascii_lowercase();
        noun == "frequency" || noun == "freq"
    });
    let n = match caps.get(1) {
        Some(digits) => digits.as_str().parse().ok()?,
        None if singular => 1,
        None => DEFAULT_TOP_N,
    };
    (n > 0).then_some(Intent::TopFrequencies { n })
}

fn homo_lumo_gap(_: &Captures) -> Option<Intent> {
    Some(Intent::HomoLumoGap)
}

fn atom_count(_: &Captures) -> Option<Intent> {
    Some(Intent::AtomCount)
}

fn method_basis(_: &Captures) -> Option<Intent> {
    Some(Intent::MethodBasis)
}

fn scf_energy(_: &Captures) -> Option<Intent> {
    Some(Intent::ScfEnergy)
}

fn templates() -> &'static [(Regex, Builder)] {
    static COMPILED: OnceLock<Vec<(Regex, Builder)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        TEMPLATES
            .iter()
            .filter_map(|(pattern, build)| Regex::new(pattern).ok().map(|re| (re, *build)))
            .collect()
    })
}

fn var(name: &str) -> PatternTerm {
    PatternTerm::var(name)
}

fn pattern(s: &str, predicate: &str, o: &str) -> TriplePattern {
    TriplePattern::new(var(s), PatternTerm::iri(predicate), var(o))
}

impl Intent {
    /// 匹配自然语言问题；未命中返回 `UnsupportedQuery`
    pub fn from_text(text: &str) -> Result<Intent, QueryError> {
        templates()
            .iter()
            .find_map(|(re, build)| re.captures(text).and_then(|caps| build(&caps)))
            .ok_or_else(|| QueryError::UnsupportedQuery {
                input: text.to_string(),
            })
    }

    /// 按名称构造（命令行 `--intent`）
    pub fn from_name(name: &str, n: usize) -> Result<Intent, QueryError> {
        let intent = match name {
            "scf-energy" => Intent::ScfEnergy,
            "atom-count" => Intent::AtomCount,
            "method-basis" => Intent::MethodBasis,
            "homo-lumo-gap" => Intent::HomoLumoGap,
            "top-frequencies" if n > 0 => Intent::TopFrequencies { n },
            _ => {
                return Err(QueryError::UnsupportedQuery {
                    input: name.to_string(),
                })
            }
        };
        Ok(intent)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intent::ScfEnergy => "scf-energy",
            Intent::AtomCount => "atom-count",
            Intent::MethodBasis => "method-basis",
            Intent::HomoLumoGap => "homo-lumo-gap",
            Intent::TopFrequencies { .. } => "top-frequencies",
        }
    }

    pub fn names() -> &'static [&'static str] {
        &[
            "scf-energy",
            "atom-count",
            "method-basis",
            "homo-lumo-gap",
            "top-frequencies",
        ]
    }

    /// 预置的模式查询（变量 `calc` 总是绑定计算节点）
    pub fn patterns(&self) -> Vec<TriplePattern> {
        match self {
            Intent::ScfEnergy => vec![
                pattern("calc", vocab::HAS_SCF_ENERGY, "node"),
                pattern("node", vocab::HAS_VALUE, "value"),
                pattern("node", vocab::HAS_UNIT, "unit"),
            ],
            Intent::AtomCount => vec![
                pattern("calc", vocab::HAS_MOLECULAR_STRUCTURE, "structure"),
                pattern("structure", vocab::HAS_ATOM, "atom"),
            ],
            Intent::MethodBasis => vec![
                pattern("calc", vocab::HAS_COMPUTATIONAL_METHOD, "m"),
                pattern("m", vocab::RDFS_LABEL, "method"),
                pattern("calc", vocab::HAS_BASIS_SET, "b"),
                pattern("b", vocab::RDFS_LABEL, "basis"),
            ],
            Intent::HomoLumoGap => vec![
                pattern("calc", vocab::HAS_HOMO_LUMO_GAP, "node"),
                pattern("node", vocab::HAS_VALUE, "value"),
                pattern("node", vocab::HAS_UNIT, "unit"),
            ],
            Intent::TopFrequencies { .. } => vec![
                pattern("calc", vocab::HAS_VIBRATIONAL_FREQUENCIES, "vib"),
                pattern("vib", vocab::HAS_FREQUENCY, "freq"),
                pattern("freq", vocab::HAS_INDEX, "index"),
                pattern("freq", vocab::HAS_VALUE, "value"),
            ],
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::TopFrequencies { n } => write!(f, "{} (n = {})", self.name(), n),
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        assert_eq!(Intent::from_text("What is the SCF energy?"), Ok(Intent::ScfEnergy));
        assert_eq!(Intent::from_text("How many atoms are there"), Ok(Intent::AtomCount));
        assert_eq!(
            Intent::from_text("which method and basis set were used"),
            Ok(Intent::MethodBasis)
        );
        assert_eq!(Intent::from_text("HOMO-LUMO gap energy"), Ok(Intent::HomoLumoGap));
        assert_eq!(
            Intent::from_text("show the top 5 frequencies"),
            Ok(Intent::TopFrequencies { n: 5 })
        );
        assert_eq!(
            Intent::from_text("highest vibrational frequency"),
            Ok(Intent::TopFrequencies { n: 1 })
        );
        assert_eq!(
            Intent::from_text("3 largest frequencies"),
            Ok(Intent::TopFrequencies { n: 3 })
        );
    }

    #[test]
    fn test_plural_without_count_uses_default() {
        assert_eq!(
            Intent::from_text("What are the highest vibrational frequencies?"),
            Ok(Intent::TopFrequencies { n: DEFAULT_TOP_N })
        );
        assert_eq!(
            Intent::from_text("top frequencies please"),
            Ok(Intent::TopFrequencies { n: DEFAULT_TOP_N })
        );
        assert_eq!(
            Intent::from_text("top 2 freqs"),
            Ok(Intent::TopFrequencies { n: 2 })
        );
    }

    #[test]
    fn test_unmatched_text_is_unsupported() {
        assert_eq!(
            Intent::from_text("what's the weather like"),
            Err(QueryError::UnsupportedQuery {
                input: "what's the weather like".to_string()
            })
        );
        assert!(Intent::from_text("top 0 frequencies").is_err());
    }

    #[test]
    fn test_all_templates_compile() {
        assert_eq!(templates().len(), TEMPLATES.len());
    }

    #[test]
    fn test_from_name_round_trip() {
        for name in Intent::names() {
            let intent = Intent::from_name(name, 2).unwrap();
            assert_eq!(intent.name(), *name);
        }
        assert!(Intent::from_name("dipole", 1).is_err());
        assert!(Intent::from_name("top-frequencies", 0).is_err());
    }

    #[test]
    fn test_patterns_bind_calculation() {
        for name in Intent::names() {
            let intent = Intent::from_name(name, 1).unwrap();
            assert!(intent.patterns()[0].variables().contains(&"calc"));
        }
    }
}
