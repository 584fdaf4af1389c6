//! # 三元组模式
//!
//! 每个位置为变量 `?name` 或绑定项的三元组模板。
//!
//! ```text
//! ?calc ontocompchem:hasSCFEnergy ?node
//! ?node ontocompchem:hasValue ?value
//! ```
//!
//! ## 依赖关系
//! - 被 `store/mod.rs`, `query/` 使用
//! - 使用 `models/triple.rs`, `ontology/vocab.rs`

use crate::error::QueryError;
use crate::models::triple::TermJson;
use crate::models::{Literal, NamedNode, Term, TermExt, Triple};
use crate::ontology::vocab::RDF_TYPE;

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// 变量名 -> 绑定值
pub type Bindings = BTreeMap<String, Term>;

/// 绑定结果的 JSON 形式：每行一个 `{变量: 项}` 对象
pub struct RowsJson<'a>(pub &'a [Bindings]);

impl Serialize for RowsJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|row| {
            row.iter()
                .map(|(name, term)| (name.as_str(), TermJson(term)))
                .collect::<BTreeMap<_, _>>()
        }))
    }
}

/// 供 `#[serde(serialize_with)]` 使用
pub fn serialize_rows<S: Serializer>(rows: &[Bindings], serializer: S) -> Result<S::Ok, S::Error> {
    RowsJson(rows).serialize(serializer)
}

/// 模式中的一个位置
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    Var(String),
    Bound(Term),
}

impl PatternTerm {
    pub fn var(name: impl Into<String>) -> Self {
        PatternTerm::Var(name.into())
    }

    pub fn iri(iri: impl Into<String>) -> Self {
        PatternTerm::Bound(Term::iri(iri))
    }

    pub fn as_bound(&self) -> Option<&Term> {
        match self {
            PatternTerm::Bound(term) => Some(term),
            PatternTerm::Var(_) => None,
        }
    }

    /// 用已有绑定替换变量
    fn resolve(&self, bindings: &Bindings) -> PatternTerm {
        match self {
            PatternTerm::Var(name) => bindings
                .get(name)
                .map(|term| PatternTerm::Bound(term.clone()))
                .unwrap_or_else(|| self.clone()),
            PatternTerm::Bound(_) => self.clone(),
        }
    }

    /// 尝试把 `term` 合并进绑定；重复变量必须绑定相同的值
    fn unify(&self, term: &Term, bindings: &mut Bindings) -> bool {
        match self {
            PatternTerm::Bound(expected) => expected == term,
            PatternTerm::Var(name) => match bindings.get(name) {
                Some(existing) => existing == term,
                None => {
                    bindings.insert(name.clone(), term.clone());
                    true
                }
            },
        }
    }
}

impl From<Term> for PatternTerm {
    fn from(term: Term) -> Self {
        PatternTerm::Bound(term)
    }
}

impl std::fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternTerm::Var(name) => write!(f, "?{}", name),
            PatternTerm::Bound(term) => write!(f, "{}", term),
        }
    }
}

/// 三元组模板
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        TriplePattern {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// 解析 `s p o` 形式的文本模式，前缀名按 `prefixes` 展开
    ///
    /// 支持 `?var`、`<iri>`、`prefix:local`、`a`、`"literal"` 与
    /// `"literal"^^datatype`；末尾的 `.` 可省略。
    pub fn parse(text: &str, prefixes: &[(String, String)]) -> Result<Self, QueryError> {
        let tokens = split_tokens(text)?;
        let tokens: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| *t != ".")
            .collect();
        if tokens.len() != 3 {
            return Err(invalid(format!(
                "expected 3 terms (subject predicate object), found {}",
                tokens.len()
            )));
        }

        let subject = parse_term(tokens[0], prefixes)?;
        let predicate = parse_term(tokens[1], prefixes)?;
        let object = parse_term(tokens[2], prefixes)?;

        if let PatternTerm::Bound(Term::Literal(_)) = subject {
            return Err(invalid("literal in subject position"));
        }
        if let PatternTerm::Bound(term) = &predicate {
            if term.as_iri().is_none() {
                return Err(invalid("predicate must be an IRI or a variable"));
            }
        }

        Ok(TriplePattern {
            subject,
            predicate,
            object,
        })
    }

    /// 变量名（按出现顺序，不重复）
    pub fn variables(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = Vec::new();
        for slot in [&self.subject, &self.predicate, &self.object] {
            if let PatternTerm::Var(name) = slot {
                if !vars.contains(&name.as_str()) {
                    vars.push(name);
                }
            }
        }
        vars
    }

    /// 匹配单个三元组，返回新增绑定
    pub fn matches(&self, triple: &Triple) -> Option<Bindings> {
        let mut bindings = Bindings::new();
        (self.subject.unify(&triple.subject, &mut bindings)
            && self.predicate.unify(&triple.predicate, &mut bindings)
            && self.object.unify(&triple.object, &mut bindings))
        .then_some(bindings)
    }

    /// 代入已有绑定，得到更具体的模式
    pub fn substitute(&self, bindings: &Bindings) -> TriplePattern {
        TriplePattern {
            subject: self.subject.resolve(bindings),
            predicate: self.predicate.resolve(bindings),
            object: self.object.resolve(bindings),
        }
    }
}

impl std::fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

fn invalid(reason: impl Into<String>) -> QueryError {
    QueryError::InvalidPattern {
        reason: reason.into(),
    }
}

/// 按空白切分，保留引号内的空白
fn split_tokens(text: &str) -> Result<Vec<String>, QueryError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_quotes {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
        } else if c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            if c == '"' {
                in_quotes = true;
            }
            current.push(c);
        }
    }

    if in_quotes {
        return Err(invalid("unterminated string literal"));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn expand(name: &str, prefixes: &[(String, String)]) -> Result<NamedNode, QueryError> {
    let iri = if let Some(iri) = name.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        iri.to_string()
    } else {
        let (prefix, local) = name
            .split_once(':')
            .ok_or_else(|| invalid(format!("cannot interpret '{}'", name)))?;
        prefixes
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| format!("{}{}", ns, local))
            .ok_or_else(|| invalid(format!("undeclared prefix '{}:'", prefix)))?
    };
    NamedNode::new(iri).map_err(|e| invalid(format!("invalid IRI '{}': {}", name, e)))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn parse_term(token: &str, prefixes: &[(String, String)]) -> Result<PatternTerm, QueryError> {
    if let Some(name) = token.strip_prefix('?') {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid(format!("invalid variable name '{}'", token)));
        }
        return Ok(PatternTerm::var(name));
    }

    if token == "a" {
        return Ok(PatternTerm::iri(RDF_TYPE));
    }

    if let Some(rest) = token.strip_prefix('"') {
        let close = rest
            .rfind('"')
            .ok_or_else(|| invalid("unterminated string literal"))?;
        let lexical = unescape(&rest[..close]);
        let suffix = &rest[close + 1..];
        let literal = if let Some(datatype) = suffix.strip_prefix("^^") {
            Literal::new_typed_literal(lexical, expand(datatype, prefixes)?)
        } else if let Some(language) = suffix.strip_prefix('@') {
            Literal::new_language_tagged_literal(lexical, language)
                .map_err(|e| invalid(format!("invalid language tag '{}': {}", language, e)))?
        } else if suffix.is_empty() {
            Literal::new_simple_literal(lexical)
        } else {
            return Err(invalid(format!("unexpected '{}' after literal", suffix)));
        };
        return Ok(PatternTerm::Bound(literal.into()));
    }

    Ok(PatternTerm::Bound(expand(token, prefixes)?.into()))
}
