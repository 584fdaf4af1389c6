//! # 三元组数据模型
//!
//! RDF 项直接使用 `oxrdf`；`Triple` 是三个位置都为 `Term` 的广义三元组，
//! 方便模式匹配时统一绑定。合法性（主语非字面量、谓词为 IRI）由存储层校验，
//! 序列化时再转换为 `oxrdf::TripleRef`。
//!
//! ## 依赖关系
//! - 被 `ontology/`, `store/`, `query/` 使用
//! - 使用 `oxrdf`

pub use oxrdf::{BlankNode, Literal, NamedNode, Term};

use oxrdf::TripleRef;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// `oxrdf::Term` 的便捷构造与读取
pub trait TermExt: Sized {
    fn iri(iri: impl Into<String>) -> Self;
    fn literal(lexical: impl Into<String>) -> Self;
    fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self;

    /// 人类可读的值：字面量取词法形式，IRI 取完整 IRI
    fn value(&self) -> &str;
    fn as_iri(&self) -> Option<&str>;

    /// 字面量的数值，或 None
    fn as_f64(&self) -> Option<f64>;
}

impl TermExt for Term {
    fn iri(iri: impl Into<String>) -> Self {
        NamedNode::new_unchecked(iri).into()
    }

    fn literal(lexical: impl Into<String>) -> Self {
        Literal::new_simple_literal(lexical).into()
    }

    fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Literal::new_typed_literal(lexical, NamedNode::new_unchecked(datatype)).into()
    }

    fn value(&self) -> &str {
        match self {
            Term::NamedNode(node) => node.as_str(),
            Term::BlankNode(node) => node.as_str(),
            Term::Literal(lit) => lit.value(),
        }
    }

    fn as_iri(&self) -> Option<&str> {
        match self {
            Term::NamedNode(node) => Some(node.as_str()),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Term::Literal(lit) => lit.value().parse().ok(),
            _ => None,
        }
    }
}

/// 知识图谱语句
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }

    /// 转换为 RDF 三元组；主语为字面量或谓词非 IRI 时为 None
    pub fn as_rdf(&self) -> Option<TripleRef<'_>> {
        let Term::NamedNode(predicate) = &self.predicate else {
            return None;
        };
        let object = self.object.as_ref();
        match &self.subject {
            Term::NamedNode(s) => Some(TripleRef::new(s.as_ref(), predicate.as_ref(), object)),
            Term::BlankNode(s) => Some(TripleRef::new(s.as_ref(), predicate.as_ref(), object)),
            Term::Literal(_) => None,
        }
    }
}

impl From<oxrdf::Triple> for Triple {
    fn from(triple: oxrdf::Triple) -> Self {
        Triple {
            subject: triple.subject.into(),
            predicate: triple.predicate.into(),
            object: triple.object,
        }
    }
}

/// N-Triples 风格输出
impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

// ─────────────────────────────────────────────────────────────
// JSON 形式（SPARQL results 风格）
// ─────────────────────────────────────────────────────────────

/// `{"type": "uri" | "bnode" | "literal", "value": ..., "datatype": ...}`
pub struct TermJson<'a>(pub &'a Term);

impl Serialize for TermJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Term::NamedNode(node) => {
                let mut s = serializer.serialize_struct("Term", 2)?;
                s.serialize_field("type", "uri")?;
                s.serialize_field("value", node.as_str())?;
                s.end()
            }
            Term::BlankNode(node) => {
                let mut s = serializer.serialize_struct("Term", 2)?;
                s.serialize_field("type", "bnode")?;
                s.serialize_field("value", node.as_str())?;
                s.end()
            }
            Term::Literal(lit) => {
                let mut s = serializer.serialize_struct("Term", 3)?;
                s.serialize_field("type", "literal")?;
                s.serialize_field("value", lit.value())?;
                s.serialize_field("datatype", lit.datatype().as_str())?;
                s.end()
            }
        }
    }
}

/// 供 `#[serde(serialize_with)]` 使用
pub fn serialize_term<S: Serializer>(term: &Term, serializer: S) -> Result<S::Ok, S::Error> {
    TermJson(term).serialize(serializer)
}

impl Serialize for Triple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("subject", &TermJson(&self.subject))?;
        map.serialize_entry("predicate", &TermJson(&self.predicate))?;
        map.serialize_entry("object", &TermJson(&self.object))?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_display() {
        let t = Triple::new(
            Term::iri("http://ex.org/a"),
            Term::iri("http://ex.org/p"),
            Term::typed("1.5", "http://www.w3.org/2001/XMLSchema#double"),
        );
        assert_eq!(
            t.to_string(),
            "<http://ex.org/a> <http://ex.org/p> \"1.5\"^^<http://www.w3.org/2001/XMLSchema#double> ."
        );
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(Term::literal("-271.020456").as_f64(), Some(-271.020456));
        assert_eq!(Term::iri("http://ex.org/a").as_f64(), None);
    }

    #[test]
    fn test_as_rdf_rejects_literal_subject() {
        let ok = Triple::new(Term::iri("urn:s"), Term::iri("urn:p"), Term::literal("x"));
        assert!(ok.as_rdf().is_some());
        let bad = Triple::new(Term::literal("s"), Term::iri("urn:p"), Term::literal("x"));
        assert!(bad.as_rdf().is_none());
        let bad = Triple::new(Term::iri("urn:s"), Term::literal("p"), Term::literal("x"));
        assert!(bad.as_rdf().is_none());
    }

    #[test]
    fn test_json_form() {
        let json = serde_json::to_value(TermJson(&Term::typed("3", "urn:int"))).unwrap();
        assert_eq!(json["type"], "literal");
        assert_eq!(json["value"], "3");
        assert_eq!(json["datatype"], "urn:int");
        let json = serde_json::to_value(TermJson(&Term::iri("urn:a"))).unwrap();
        assert_eq!(json["type"], "uri");
    }
}
