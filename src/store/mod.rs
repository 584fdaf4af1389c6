//! # 图存储模块
//!
//! 只追加的内存三元组库，按内容指纹去重。
//!
//! ## 并发模型
//! 所有状态位于一把 `parking_lot::RwLock` 之下：
//! - 插入：锁外校验，锁内完成 "指纹检查 + 全部提交"
//! - 查询：持读锁，总是看到完整提交后的快照
//!
//! ## 索引
//! - subject -> 三元组位置
//! - predicate -> 三元组位置
//! - fingerprint -> 计算条目
//!
//! ## 依赖关系
//! - 被 `query/`, `batch/runner.rs`, `commands/`, `lib.rs` 使用
//! - 使用 `models/triple.rs`, `ontology/mapper.rs`
//! - 子模块: pattern

pub mod pattern;

pub use pattern::{Bindings, PatternTerm, RowsJson, TriplePattern};

use crate::error::StoreError;
use crate::models::triple::serialize_term;
use crate::models::{Term, TermExt, Triple};
use crate::ontology::MappedCalculation;

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use tracing::{debug, info};

/// 已存储计算的引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CalculationRef {
    pub fingerprint: String,
    #[serde(serialize_with = "serialize_term")]
    pub subject: Term,
}

/// 插入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    pub calculation: CalculationRef,
    /// false 表示指纹已存在，本次为空操作
    pub inserted: bool,
    /// 本次写入的三元组数
    pub triples: usize,
}

#[derive(Debug)]
struct Entry {
    calculation: CalculationRef,
    range: Range<usize>,
}

#[derive(Debug, Default)]
struct Inner {
    triples: Vec<Triple>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<Term, Vec<usize>>,
    by_fingerprint: HashMap<String, usize>,
    entries: Vec<Entry>,
}

impl Inner {
    fn commit(&mut self, calculation: CalculationRef, triples: Vec<Triple>) -> usize {
        let start = self.triples.len();
        for triple in triples {
            let pos = self.triples.len();
            self.by_subject
                .entry(triple.subject.clone())
                .or_default()
                .push(pos);
            self.by_predicate
                .entry(triple.predicate.clone())
                .or_default()
                .push(pos);
            self.triples.push(triple);
        }
        let end = self.triples.len();

        self.by_fingerprint
            .insert(calculation.fingerprint.clone(), self.entries.len());
        self.entries.push(Entry {
            calculation,
            range: start..end,
        });
        end - start
    }

    /// 候选位置：主语与谓词都已绑定时取两者中较短的倒排表，
    /// 只绑定其一时走对应索引，否则全表
    fn candidates(&self, pattern: &TriplePattern, scope: Option<&Range<usize>>) -> Vec<usize> {
        let by_subject = pattern.subject.as_bound().map(|s| self.by_subject.get(s));
        let by_predicate = pattern.predicate.as_bound().map(|p| self.by_predicate.get(p));
        let indexed = match (by_subject, by_predicate) {
            (Some(s), Some(p)) => Some(match (s, p) {
                (Some(s), Some(p)) => Some(if s.len() <= p.len() { s } else { p }),
                _ => None,
            }),
            (Some(s), None) => Some(s),
            (None, Some(p)) => Some(p),
            (None, None) => None,
        };

        let in_scope = |pos: &usize| scope.map_or(true, |r| r.contains(pos));
        match indexed {
            Some(Some(positions)) => positions.iter().copied().filter(in_scope).collect(),
            Some(None) => Vec::new(),
            None => match scope {
                Some(range) => range.clone().collect(),
                None => (0..self.triples.len()).collect(),
            },
        }
    }

    fn query(&self, pattern: &TriplePattern, scope: Option<&Range<usize>>) -> Vec<Bindings> {
        let mut seen = HashSet::new();
        self.candidates(pattern, scope)
            .into_iter()
            .filter_map(|pos| pattern.matches(&self.triples[pos]))
            .filter(|bindings| seen.insert(bindings.clone()))
            .collect()
    }
}

/// 线程安全的三元组库
#[derive(Debug, Default)]
pub struct GraphStore {
    inner: RwLock<Inner>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 原子插入一次计算的全部三元组
    ///
    /// 指纹已存在时返回已有引用（`inserted = false`）。
    /// 校验失败时不留下任何状态。
    pub fn insert(
        &self,
        fingerprint: &str,
        subject: Term,
        triples: Vec<Triple>,
    ) -> Result<InsertOutcome, StoreError> {
        let triples = validate(fingerprint, &subject, triples)?;

        let mut inner = self.inner.write();
        if let Some(&idx) = inner.by_fingerprint.get(fingerprint) {
            let calculation = inner.entries[idx].calculation.clone();
            debug!(%fingerprint, "fingerprint already stored, skipping");
            return Ok(InsertOutcome {
                calculation,
                inserted: false,
                triples: 0,
            });
        }

        let calculation = CalculationRef {
            fingerprint: fingerprint.to_string(),
            subject,
        };
        let count = inner.commit(calculation.clone(), triples);
        info!(%fingerprint, triples = count, "inserted calculation");

        Ok(InsertOutcome {
            calculation,
            inserted: true,
            triples: count,
        })
    }

    pub fn insert_mapped(&self, mapped: &MappedCalculation) -> Result<InsertOutcome, StoreError> {
        self.insert(
            &mapped.fingerprint,
            mapped.subject.clone(),
            mapped.triples.clone(),
        )
    }

    /// 在全部三元组上匹配模式
    pub fn query(&self, pattern: &TriplePattern) -> Vec<Bindings> {
        self.inner.read().query(pattern, None)
    }

    /// 仅在一次计算的三元组内匹配模式
    pub fn query_within(&self, calculation: &CalculationRef, pattern: &TriplePattern) -> Vec<Bindings> {
        let inner = self.inner.read();
        match inner.by_fingerprint.get(&calculation.fingerprint) {
            Some(&idx) => {
                let range = inner.entries[idx].range.clone();
                inner.query(pattern, Some(&range))
            }
            None => Vec::new(),
        }
    }

    /// 按插入顺序列出所有计算
    pub fn calculations(&self) -> Vec<CalculationRef> {
        self.inner
            .read()
            .entries
            .iter()
            .map(|e| e.calculation.clone())
            .collect()
    }

    pub fn calculation(&self, fingerprint: &str) -> Option<CalculationRef> {
        let inner = self.inner.read();
        inner
            .by_fingerprint
            .get(fingerprint)
            .map(|&idx| inner.entries[idx].calculation.clone())
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.inner.read().by_fingerprint.contains_key(fingerprint)
    }

    /// 一次计算的三元组（插入顺序）
    pub fn triples_of(&self, calculation: &CalculationRef) -> Vec<Triple> {
        let inner = self.inner.read();
        inner
            .by_fingerprint
            .get(&calculation.fingerprint)
            .map(|&idx| inner.triples[inner.entries[idx].range.clone()].to_vec())
            .unwrap_or_default()
    }

    /// 全部三元组（插入顺序）
    pub fn triples(&self) -> Vec<Triple> {
        self.inner.read().triples.clone()
    }

    /// 三元组总数
    pub fn len(&self) -> usize {
        self.inner.read().triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().triples.is_empty()
    }

    pub fn calculation_count(&self) -> usize {
        self.inner.read().entries.len()
    }
}

/// 校验并在计算内部去重（保持首次出现顺序）
fn validate(
    fingerprint: &str,
    subject: &Term,
    triples: Vec<Triple>,
) -> Result<Vec<Triple>, StoreError> {
    if triples.is_empty() {
        return Err(StoreError::EmptyTripleSet {
            fingerprint: fingerprint.to_string(),
        });
    }
    if fingerprint.trim().is_empty() {
        return Err(StoreError::InvalidTriple {
            reason: "empty fingerprint".to_string(),
        });
    }
    if subject.is_literal() {
        return Err(StoreError::InvalidTriple {
            reason: format!("calculation subject is a literal: {}", subject),
        });
    }

    let mut seen = HashSet::with_capacity(triples.len());
    let mut unique = Vec::with_capacity(triples.len());
    for triple in triples {
        if triple.subject.is_literal() {
            return Err(StoreError::InvalidTriple {
                reason: format!("literal in subject position: {}", triple),
            });
        }
        if triple.predicate.as_iri().is_none() {
            return Err(StoreError::InvalidTriple {
                reason: format!("predicate is not an IRI: {}", triple),
            });
        }
        if seen.insert(triple.clone()) {
            unique.push(triple);
        }
    }
    Ok(unique)
}
