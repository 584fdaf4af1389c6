//! # 查询引擎
//!
//! 两个入口：
//! - `select`：合取模式查询，单模式直接交给 `GraphStore::query`
//! - `answer`：固定意图 -> 预置模式 -> 确定性回答模板
//!
//! 未作用域时对存储中的每个计算分别作答，按插入顺序排列。
//!
//! ## 依赖关系
//! - 被 `commands/query.rs` 使用
//! - 使用 `store/`, `ontology/vocab.rs`
//! - 子模块: intent

pub mod intent;

pub use intent::Intent;

use crate::error::QueryError;
use crate::models::{Term, TermExt};
use crate::ontology::vocab;
use crate::store::pattern::serialize_rows;
use crate::store::{Bindings, CalculationRef, GraphStore, TriplePattern};

use serde::Serialize;
use std::cmp::Ordering;

/// 意图的回答
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub intent: Intent,
    #[serde(serialize_with = "serialize_rows")]
    pub rows: Vec<Bindings>,
    pub text: String,
}

/// 只读查询引擎
#[derive(Debug, Clone)]
pub struct QueryEngine<'s> {
    store: &'s GraphStore,
    scope: Option<CalculationRef>,
}

impl<'s> QueryEngine<'s> {
    pub fn new(store: &'s GraphStore) -> Self {
        QueryEngine { store, scope: None }
    }

    /// 限定到单个计算
    pub fn scoped(mut self, calculation: CalculationRef) -> Self {
        self.scope = Some(calculation);
        self
    }

    fn run(&self, pattern: &TriplePattern) -> Vec<Bindings> {
        match &self.scope {
            Some(calculation) => self.store.query_within(calculation, pattern),
            None => self.store.query(pattern),
        }
    }

    /// 合取查询：依次代入已有绑定求解后续模式
    pub fn select(&self, patterns: &[TriplePattern]) -> Vec<Bindings> {
        let Some((first, rest)) = patterns.split_first() else {
            return Vec::new();
        };

        let mut rows = self.run(first);
        for pattern in rest {
            let mut joined = Vec::new();
            for row in &rows {
                for extra in self.run(&pattern.substitute(row)) {
                    let mut merged = row.clone();
                    merged.extend(extra);
                    joined.push(merged);
                }
            }
            rows = joined;
            if rows.is_empty() {
                break;
            }
        }
        rows
    }

    /// 回答固定意图
    pub fn answer(&self, intent: &Intent) -> Result<Answer, QueryError> {
        if let Intent::TopFrequencies { n: 0 } = intent {
            return Err(QueryError::UnsupportedQuery {
                input: intent.to_string(),
            });
        }

        let targets = match &self.scope {
            Some(calculation) => vec![calculation.clone()],
            None => self.store.calculations(),
        };

        let mut rows = Vec::new();
        let mut lines = Vec::new();
        for calculation in &targets {
            let engine = QueryEngine::new(self.store).scoped(calculation.clone());
            let (calc_rows, line) = engine.answer_one(intent);
            if targets.len() > 1 {
                lines.push(format!("{}: {}", calculation.subject.value(), line));
            } else {
                lines.push(line);
            }
            rows.extend(calc_rows);
        }
        if lines.is_empty() {
            lines.push("No calculations in the graph".to_string());
        }

        Ok(Answer {
            intent: *intent,
            rows,
            text: lines.join("\n"),
        })
    }

    fn answer_one(&self, intent: &Intent) -> (Vec<Bindings>, String) {
        let rows = self.select(&intent.patterns());
        match intent {
            Intent::ScfEnergy => {
                let text = energy_text("SCF energy", &rows);
                (project(rows, &["calc", "value", "unit"]), text)
            }
            Intent::HomoLumoGap => {
                let text = energy_text("HOMO-LUMO gap", &rows);
                (project(rows, &["calc", "value", "unit"]), text)
            }
            Intent::AtomCount => {
                let count = rows.len();
                let mut row = Bindings::new();
                if let Some(scope) = &self.scope {
                    row.insert("calc".to_string(), scope.subject.clone());
                }
                row.insert(
                    "count".to_string(),
                    Term::typed(count.to_string(), vocab::XSD_INTEGER),
                );
                (vec![row], format!("Atom count: {}", count))
            }
            Intent::MethodBasis => {
                let text = match rows.first() {
                    Some(row) => format!(
                        "Method: {}, basis set: {}",
                        lexical(row, "method"),
                        lexical(row, "basis")
                    ),
                    None => "Method: not recorded".to_string(),
                };
                (project(rows, &["calc", "method", "basis"]), text)
            }
            Intent::TopFrequencies { n } => {
                let top = top_frequencies(rows, *n);
                let values: Vec<&str> = top.iter().map(|row| lexical(row, "value")).collect();
                let text = if values.is_empty() {
                    "No vibrational frequencies recorded".to_string()
                } else {
                    format!("Top {} frequencies (cm^-1): {}", n, values.join(", "))
                };
                (project(top, &["calc", "index", "value"]), text)
            }
        }
    }
}

fn lexical<'r>(row: &'r Bindings, var: &str) -> &'r str {
    row.get(var).map(Term::value).unwrap_or("?")
}

fn energy_text(label: &str, rows: &[Bindings]) -> String {
    match rows.first() {
        Some(row) => format!("{}: {} {}", label, lexical(row, "value"), lexical(row, "unit")),
        None => format!("{}: not recorded", label),
    }
}

/// 只保留回答相关的变量
fn project(rows: Vec<Bindings>, vars: &[&str]) -> Vec<Bindings> {
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .filter(|(name, _)| vars.contains(&name.as_str()))
                .collect()
        })
        .collect()
}

/// 按数值降序，数值相同按序号升序
fn top_frequencies(mut rows: Vec<Bindings>, n: usize) -> Vec<Bindings> {
    let key = |row: &Bindings| {
        let value = row.get("value").and_then(Term::as_f64).unwrap_or(f64::NEG_INFINITY);
        let index = row
            .get("index")
            .and_then(|t| t.value().parse::<u64>().ok())
            .unwrap_or(u64::MAX);
        (value, index)
    };
    rows.sort_by(|a, b| {
        let (va, ia) = key(a);
        let (vb, ib) = key(b);
        match vb.total_cmp(&va) {
            Ordering::Equal => ia.cmp(&ib),
            other => other,
        }
    });
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KgConfig;
    use crate::models::Triple;
    use crate::ontology::map_calculation;
    use crate::parsers;
    use crate::store::PatternTerm;

    const WATER: &str = include_str!("../../tests/data/water_hf.log");

    fn water_store() -> (GraphStore, CalculationRef) {
        let store = GraphStore::new();
        let mapped = map_calculation(&parsers::parse(WATER).unwrap(), &KgConfig::default());
        let outcome = store.insert_mapped(&mapped).unwrap();
        (store, outcome.calculation)
    }

    #[test]
    fn test_select_joins_patterns() {
        let (store, _) = water_store();
        let engine = QueryEngine::new(&store);
        let rows = engine.select(&Intent::ScfEnergy.patterns());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["value"], Term::typed("-74.9659011", vocab::XSD_DOUBLE));
        assert_eq!(rows[0]["unit"], Term::literal("Hartree"));
    }

    #[test]
    fn test_select_empty_patterns() {
        let (store, _) = water_store();
        assert!(QueryEngine::new(&store).select(&[]).is_empty());
    }

    #[test]
    fn test_answers() {
        let (store, calc) = water_store();
        let engine = QueryEngine::new(&store).scoped(calc);

        let scf = engine.answer(&Intent::ScfEnergy).unwrap();
        assert_eq!(scf.text, "SCF energy: -74.9659011 Hartree");

        let atoms = engine.answer(&Intent::AtomCount).unwrap();
        assert_eq!(atoms.text, "Atom count: 3");

        let method = engine.answer(&Intent::MethodBasis).unwrap();
        assert_eq!(method.text, "Method: HF, basis set: STO-3G");

        let top = engine.answer(&Intent::TopFrequencies { n: 2 }).unwrap();
        assert_eq!(top.text, "Top 2 frequencies (cm^-1): 4391.396, 4140.1325");
        assert_eq!(top.rows.len(), 2);
    }

    #[test]
    fn test_top_frequencies_tie_break_by_index() {
        let row = |index: u64, value: &str| {
            let mut b = Bindings::new();
            b.insert("index".to_string(), Term::typed(index.to_string(), vocab::XSD_INTEGER));
            b.insert("value".to_string(), Term::typed(value, vocab::XSD_DOUBLE));
            b
        };
        let rows = vec![row(3, "10.0"), row(1, "20.0"), row(2, "10.0"), row(0, "5.0")];
        let top = top_frequencies(rows, 3);
        let order: Vec<&str> = top.iter().map(|b| b["index"].value()).collect();
        assert_eq!(order, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_unscoped_answer_covers_every_calculation() {
        let (store, _) = water_store();
        store
            .insert(
                "sha256:other",
                Term::iri("urn:other"),
                vec![Triple::new(
                    Term::iri("urn:other"),
                    Term::iri(vocab::RDF_TYPE),
                    Term::iri(vocab::CALCULATION),
                )],
            )
            .unwrap();

        let answer = QueryEngine::new(&store).answer(&Intent::ScfEnergy).unwrap();
        let lines: Vec<&str> = answer.text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("SCF energy: -74.9659011 Hartree"));
        assert_eq!(lines[1], "urn:other: SCF energy: not recorded");
    }

    #[test]
    fn test_direct_pattern_passthrough() {
        let (store, calc) = water_store();
        let pattern = TriplePattern::new(
            PatternTerm::var("s"),
            PatternTerm::iri(vocab::HAS_ELEMENT),
            PatternTerm::var("e"),
        );
        let engine = QueryEngine::new(&store).scoped(calc);
        assert_eq!(engine.select(&[pattern.clone()]), store.query(&pattern));
    }
}
