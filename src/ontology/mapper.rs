//! # 本体映射器
//!
//! 将 `Calculation` 确定性地映射为三元组。
//!
//! ## 标识符
//! ```text
//! calc   = <base>calculation-<sha256 前 16 位>
//! 子节点 = <calc>-atom-<i> | <calc>-frequency-<i> | <calc>-structure | ...
//! ```
//! 输出顺序固定：计算元数据与来源 -> 方法/基组 -> 几何 -> 能量 -> 频率。
//!
//! ## 依赖关系
//! - 被 `ontology/mod.rs`, `lib.rs` 使用
//! - 使用 `ontology/vocab.rs`, `models/`, `config.rs`

use super::vocab::{self, Concept, ObjectKind};
use crate::config::KgConfig;
use crate::models::{Calculation, EnergyValue, Term, TermExt, Triple};

use chrono::SecondsFormat;
use std::collections::HashSet;

/// 已映射的计算：指纹 + 计算节点 + 规范顺序的三元组
#[derive(Debug, Clone, PartialEq)]
pub struct MappedCalculation {
    pub fingerprint: String,
    pub subject: Term,
    pub triples: Vec<Triple>,
}

impl MappedCalculation {
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// 统计某谓词出现次数
    pub fn count_predicate(&self, predicate: &str) -> usize {
        self.triples
            .iter()
            .filter(|t| t.predicate.as_iri() == Some(predicate))
            .count()
    }

    /// 把整个图按计算拆分（用于重新导入序列化结果）
    ///
    /// 计算节点由 `rdf:type` + `dcterms:identifier` 识别；
    /// 子节点 IRI 以 `<calc>-` 开头，归属对应计算。其余三元组被丢弃。
    pub fn split_graph(triples: Vec<Triple>) -> Vec<Self> {
        let calc_type = Term::iri(vocab::CALCULATION);
        let mut roots: Vec<(Term, String)> = Vec::new();
        for t in &triples {
            if t.predicate.as_iri() != Some(vocab::RDF_TYPE) || t.object != calc_type {
                continue;
            }
            if roots.iter().any(|(root, _)| *root == t.subject) {
                continue;
            }
            let identifier = triples.iter().find(|u| {
                u.subject == t.subject && u.predicate.as_iri() == Some(vocab::DCTERMS_IDENTIFIER)
            });
            if let Some(id) = identifier {
                roots.push((t.subject.clone(), id.object.value().to_string()));
            }
        }

        let mut groups: Vec<Vec<Triple>> = vec![Vec::new(); roots.len()];
        for triple in triples {
            let subject = triple.subject.value();
            let owner = roots.iter().position(|(root, _)| {
                let root = root.value();
                subject == root
                    || subject
                        .strip_prefix(root)
                        .map_or(false, |rest| rest.starts_with('-'))
            });
            if let Some(i) = owner {
                groups[i].push(triple);
            }
        }

        roots
            .into_iter()
            .zip(groups)
            .map(|((subject, fingerprint), triples)| MappedCalculation {
                fingerprint,
                subject,
                triples,
            })
            .collect()
    }
}

/// 计算节点的 IRI
pub fn calculation_iri(base_iri: &str, fingerprint: &str) -> String {
    let hash = fingerprint.strip_prefix("sha256:").unwrap_or(fingerprint);
    let short: String = hash.chars().take(16).collect();
    format!("{}calculation-{}", base_iri, short)
}

/// 浮点数的规范词法形式（最短往返表示）
fn lexical_f64(value: f64) -> String {
    format!("{}", value)
}

/// 去重并保持首次出现顺序的三元组收集器
struct Emitter {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl Emitter {
    fn new() -> Self {
        Emitter {
            triples: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, triple: Triple) {
        if self.seen.insert(triple.clone()) {
            self.triples.push(triple);
        }
    }

    /// 节点边
    fn link(&mut self, subject: &Term, concept: Concept, object: &Term) {
        self.push(Triple::new(
            subject.clone(),
            Term::iri(concept.predicate()),
            object.clone(),
        ));
    }

    /// 字面量，按映射表决定数据类型
    fn value(&mut self, subject: &Term, concept: Concept, lexical: impl Into<String>) {
        let (predicate, kind) = concept.mapping();
        let object = match kind {
            ObjectKind::Typed(datatype) => Term::typed(lexical, datatype),
            ObjectKind::Plain => Term::literal(lexical),
            ObjectKind::Node => Term::iri(lexical),
        };
        self.push(Triple::new(subject.clone(), Term::iri(predicate), object));
    }

    fn typed_node(&mut self, node: &Term, class: &str) {
        self.link(node, Concept::Type, &Term::iri(class));
    }

    fn energy(&mut self, calc: &Term, concept: Concept, node: Term, class: &str, energy: &EnergyValue) {
        self.link(calc, concept, &node);
        self.typed_node(&node, class);
        self.value(&node, Concept::Value, lexical_f64(energy.value));
        self.value(&node, Concept::Unit, energy.unit.to_string());
    }
}

/// 映射一次计算
pub fn map_calculation(calc: &Calculation, config: &KgConfig) -> MappedCalculation {
    let calc_iri = calculation_iri(&config.base_iri, &calc.fingerprint);
    let subject = Term::iri(calc_iri.clone());
    let child = |suffix: &str| Term::iri(format!("{}-{}", calc_iri, suffix));

    let mut out = Emitter::new();

    // 计算元数据与来源
    out.typed_node(&subject, vocab::CALCULATION);
    out.value(&subject, Concept::Identifier, calc.fingerprint.as_str());
    out.value(&subject, Concept::Program, calc.software.as_str());
    out.value(&subject, Concept::ProgramVersion, calc.software_version.as_str());
    if let Some(ts) = calc.run_timestamp {
        out.value(
            &subject,
            Concept::RunDate,
            ts.format("%Y-%m-%dT%H:%M:%S").to_string(),
        );
    }
    out.value(&subject, Concept::Convergence, calc.converged.to_string());
    out.value(&subject, Concept::Termination, calc.termination.to_string());
    out.value(&subject, Concept::DerivedFrom, calc.provenance.source.as_str());
    out.value(&subject, Concept::GeneratedBy, calc.provenance.parser.as_str());
    if let Some(at) = calc.provenance.extracted_at {
        out.value(
            &subject,
            Concept::GeneratedAt,
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    // 方法与基组
    let method = child("method");
    out.link(&subject, Concept::Method, &method);
    out.typed_node(&method, vocab::COMPUTATIONAL_METHOD);
    out.value(&method, Concept::Label, calc.method.as_str());

    let basis = child("basis-set");
    out.link(&subject, Concept::BasisSet, &basis);
    out.typed_node(&basis, vocab::BASIS_SET);
    out.value(&basis, Concept::Label, calc.basis_set.as_str());

    if let Some(charge) = calc.charge {
        out.value(&subject, Concept::Charge, charge.to_string());
    }
    if let Some(multiplicity) = calc.multiplicity {
        out.value(&subject, Concept::Multiplicity, multiplicity.to_string());
    }

    // 几何结构
    let structure = child("structure");
    out.link(&subject, Concept::Structure, &structure);
    out.typed_node(&structure, vocab::MOLECULAR_STRUCTURE);
    out.value(&structure, Concept::Formula, calc.formula());
    for atom in &calc.atoms {
        let node = child(&format!("atom-{}", atom.index));
        out.link(&structure, Concept::Atom, &node);
        out.typed_node(&node, vocab::ATOM);
        out.value(&node, Concept::Index, atom.index.to_string());
        out.value(&node, Concept::Element, atom.element.as_str());
        out.value(&node, Concept::AtomicNumber, atom.atomic_number.to_string());
        out.value(&node, Concept::X, lexical_f64(atom.position[0]));
        out.value(&node, Concept::Y, lexical_f64(atom.position[1]));
        out.value(&node, Concept::Z, lexical_f64(atom.position[2]));
    }

    // 能量
    out.energy(
        &subject,
        Concept::ScfEnergy,
        child("scf-energy"),
        vocab::SCF_ENERGY,
        &calc.total_energy,
    );
    if let Some(gap) = &calc.homo_lumo_gap {
        out.energy(
            &subject,
            Concept::HomoLumoGap,
            child("homo-lumo-gap"),
            vocab::HOMO_LUMO_GAP,
            gap,
        );
    }

    // 振动频率
    if !calc.frequencies.is_empty() {
        let vibrations = child("vibrations");
        out.link(&subject, Concept::Vibrations, &vibrations);
        out.typed_node(&vibrations, vocab::VIBRATIONAL_ANALYSIS);
        for freq in &calc.frequencies {
            let node = child(&format!("frequency-{}", freq.index));
            out.link(&vibrations, Concept::Frequency, &node);
            out.typed_node(&node, vocab::FREQUENCY);
            out.value(&node, Concept::Index, freq.index.to_string());
            out.value(&node, Concept::Value, lexical_f64(freq.value));
        }
    }

    MappedCalculation {
        fingerprint: calc.fingerprint.clone(),
        subject,
        triples: out.triples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers;

    const WATER: &str = include_str!("../../tests/data/water_hf.log");

    fn mapped() -> MappedCalculation {
        let calc = parsers::parse(WATER).unwrap();
        map_calculation(&calc, &KgConfig::default())
    }

    #[test]
    fn test_identifier_from_content_hash() {
        let m = mapped();
        let expected = calculation_iri(
            crate::config::DEFAULT_BASE_IRI,
            &parsers::fingerprint(WATER.as_bytes()),
        );
        assert_eq!(m.subject, Term::iri(expected));
        assert!(m.subject.value().ends_with(&m.fingerprint[7..23]));
    }

    #[test]
    fn test_counts() {
        let m = mapped();
        assert_eq!(m.count_predicate(vocab::HAS_ATOM), 3);
        assert_eq!(m.count_predicate(vocab::HAS_SCF_ENERGY), 1);
        assert_eq!(m.count_predicate(vocab::HAS_FREQUENCY), 3);
        assert_eq!(m.count_predicate(vocab::HAS_HOMO_LUMO_GAP), 1);
    }

    #[test]
    fn test_canonical_order() {
        let m = mapped();
        let position = |pred: &str| {
            m.triples
                .iter()
                .position(|t| t.predicate.as_iri() == Some(pred))
                .unwrap()
        };
        assert_eq!(position(vocab::RDF_TYPE), 0);
        assert!(position(vocab::DCTERMS_IDENTIFIER) < position(vocab::HAS_COMPUTATIONAL_METHOD));
        assert!(position(vocab::HAS_COMPUTATIONAL_METHOD) < position(vocab::HAS_ATOM));
        assert!(position(vocab::HAS_ATOM) < position(vocab::HAS_SCF_ENERGY));
        assert!(position(vocab::HAS_SCF_ENERGY) < position(vocab::HAS_FREQUENCY));
    }

    #[test]
    fn test_no_duplicate_triples() {
        let m = mapped();
        let unique: HashSet<&Triple> = m.triples.iter().collect();
        assert_eq!(unique.len(), m.triples.len());
    }

    #[test]
    fn test_energy_literal() {
        let m = mapped();
        let value = m
            .triples
            .iter()
            .find(|t| {
                t.subject.value().ends_with("-scf-energy")
                    && t.predicate.as_iri() == Some(vocab::HAS_VALUE)
            })
            .map(|t| t.object.clone())
            .unwrap();
        assert_eq!(value, Term::typed("-74.9659011", vocab::XSD_DOUBLE));
    }

    #[test]
    fn test_split_graph_recovers_calculations() {
        let m = mapped();
        let recovered = MappedCalculation::split_graph(m.triples.clone());
        assert_eq!(recovered, vec![m.clone()]);

        let config = KgConfig::default();
        let other_fp = "sha256:ffff".to_string();
        let other_iri = calculation_iri(&config.base_iri, &other_fp);
        let old_iri = m.subject.value().to_string();
        let rename = |t: &Term| match t {
            Term::NamedNode(node) if node.as_str().starts_with(&old_iri) => {
                Term::iri(node.as_str().replacen(&old_iri, &other_iri, 1))
            }
            Term::Literal(lit) if lit.value() == m.fingerprint => Term::literal(other_fp.clone()),
            _ => t.clone(),
        };
        let other_triples: Vec<Triple> = m
            .triples
            .iter()
            .map(|t| Triple::new(rename(&t.subject), t.predicate.clone(), rename(&t.object)))
            .collect();

        let mut graph = m.triples.clone();
        graph.extend(other_triples);
        let split = MappedCalculation::split_graph(graph);
        assert_eq!(split.len(), 2);
        assert_eq!(split[0], m);
        assert_eq!(split[1].fingerprint, "sha256:ffff");
        assert_eq!(split[1].len(), m.len());
    }
}
