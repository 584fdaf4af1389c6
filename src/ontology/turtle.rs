//! # 规范 Turtle 序列化
//!
//! ## 输出格式
//! ```text
//! @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
//! ...
//! @prefix kg: <https://w3id.org/gaussian-kg/> .
//!
//! kg:calculation-0123456789abcdef a ontocompchem:G16Calculation ;
//!     dcterms:identifier "sha256:..." ;
//!     ontocompchem:hasConvergence true .
//! ```
//! 三元组先按主语首次出现分组（组内保持输出顺序），再交给 `oxttl` 写出，
//! 因此每个主语一个语句块，相同输入的序列化结果逐字节一致。
//!
//! 读取使用 `oxttl::TurtleParser`，语法错误带行号返回。
//!
//! ## 依赖关系
//! - 被 `ontology/mod.rs`, `commands/`, `lib.rs` 使用
//! - 使用 `models/triple.rs`, `ontology/vocab.rs`
//! - 使用 `oxttl`

use super::vocab;
use crate::error::{KgError, Result};
use crate::models::{Term, Triple};

use oxttl::{TurtleParser, TurtleSerializer};
use std::collections::HashMap;

/// 固定前缀 + 实例前缀 `kg`
pub fn prefixes(base_iri: &str) -> Vec<(String, String)> {
    vocab::PREFIXES
        .iter()
        .map(|(p, ns)| (p.to_string(), ns.to_string()))
        .chain(std::iter::once(("kg".to_string(), base_iri.to_string())))
        .collect()
}

fn is_local_name(local: &str) -> bool {
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !local.starts_with('-')
}

/// 尽量压缩为 `prefix:local`，否则输出 `<iri>`
fn compact(iri: &str, prefixes: &[(String, String)]) -> String {
    // 取最长命名空间匹配
    prefixes
        .iter()
        .filter(|(_, ns)| iri.starts_with(ns.as_str()))
        .max_by_key(|(_, ns)| ns.len())
        .and_then(|(p, ns)| {
            let local = &iri[ns.len()..];
            is_local_name(local).then(|| format!("{}:{}", p, local))
        })
        .unwrap_or_else(|| format!("<{}>", iri))
}

/// 单个项的显示形式（用于结果表格，IRI 尽量压缩为前缀名）
pub fn render_term(term: &Term, prefixes: &[(String, String)]) -> String {
    match term {
        Term::NamedNode(node) => compact(node.as_str(), prefixes),
        Term::BlankNode(node) => node.to_string(),
        Term::Literal(lit) => lit.value().to_string(),
    }
}

/// 按主语首次出现顺序分组，组内保持原顺序
fn group_by_subject(triples: &[Triple]) -> Vec<&Triple> {
    let mut order: Vec<&Term> = Vec::new();
    let mut groups: HashMap<&Term, Vec<&Triple>> = HashMap::new();
    for triple in triples {
        groups
            .entry(&triple.subject)
            .or_insert_with(|| {
                order.push(&triple.subject);
                Vec::new()
            })
            .push(triple);
    }
    order
        .into_iter()
        .filter_map(|subject| groups.remove(subject))
        .flatten()
        .collect()
}

fn write_error(reason: impl std::fmt::Display) -> KgError {
    KgError::TurtleWrite {
        reason: reason.to_string(),
    }
}

/// 序列化为规范 Turtle
pub fn to_turtle(triples: &[Triple], prefixes: &[(String, String)]) -> Result<String> {
    let mut serializer = TurtleSerializer::new();
    for (name, ns) in prefixes {
        serializer = serializer
            .with_prefix(name.as_str(), ns.as_str())
            .map_err(|e| write_error(format!("prefix {}: <{}>: {}", name, ns, e)))?;
    }

    let mut writer = serializer.for_writer(Vec::new());
    for triple in group_by_subject(triples) {
        let rdf = triple
            .as_rdf()
            .ok_or_else(|| write_error(format!("not an RDF triple: {}", triple)))?;
        writer.serialize_triple(rdf).map_err(write_error)?;
    }
    let bytes = writer.finish().map_err(write_error)?;
    String::from_utf8(bytes).map_err(write_error)
}

/// 读取 Turtle 文档
pub fn parse_turtle(text: &str) -> Result<Vec<Triple>> {
    TurtleParser::new()
        .for_slice(text.as_bytes())
        .map(|item| {
            item.map(Triple::from).map_err(|e| KgError::TurtleSyntax {
                line: e.location().start.line as usize + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}
