//! Double-Array Trie routing engine — the centerpiece.
//!
//! Records are split at build time into a `statics` table (patterns with no
//! `:` or `*` anywhere) and a `params` table (everything else), each an
//! independent BASE/CHECK trie. `Lookup` always probes `statics` first —
//! a hit there is definitionally the literal match, so a literal pattern
//! always wins over an overlapping parameterized one without the lookup
//! path needing to compare specificity.
//!
//! Within a table, a named-parameter or wildcard continuation hangs off the
//! BASE/CHECK cell where it forks, in a sparse sidecar map rather than as
//! array cells of their own — `:`/`*` have no stable byte to address with
//! `next(base, c)`. A parameter continuation is itself a nested
//! `DoubleArrayTable`, so "/:a/:b" builds an outer table for the literal
//! `/` prefix (none here) whose root cell carries a `param_tree` which is
//! in turn a complete two-cell table for `/:b`.

use crate::engine::RouteEngine;
use crate::error::RouterError;
use crate::pattern::{is_meta_char, is_separator, next_separator};
use crate::record::{Matched, Param, Record};
use std::collections::HashMap;
use std::rc::Rc;

const EMPTY_CHECK: i64 = -1;
const GROWTH_BLOCK: usize = 256;

/// One BASE/CHECK cell. `check == EMPTY_CHECK` marks a free slot; otherwise
/// `check` holds the parent cell's index. `has_params` flags that this
/// cell's node carries a parameter and/or wildcard continuation, so the
/// lookup walk must record it on the fallback stack.
#[derive(Clone, Copy)]
struct Cell {
    base: i64,
    check: i64,
    has_params: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            base: 0,
            check: EMPTY_CHECK,
            has_params: false,
        }
    }
}

struct Leaf<V> {
    value: V,
    param_names: Vec<String>,
}

/// Sparse per-cell sidecar: only cells with a leaf, a parameter
/// continuation, or a wildcard continuation get an entry.
#[derive(Default)]
struct NodeAux<V> {
    leaf: Option<Leaf<V>>,
    param_tree: Option<Box<DoubleArrayTable<V>>>,
    wildcard_leaf: Option<Leaf<V>>,
}

/// A record mid-construction: `key` is the slice relevant to whichever
/// table is currently being built (the full pattern at the top level, the
/// tail from a separator for a nested parameter table), `pattern` is kept
/// around only for error messages.
struct PreparedRecord<V> {
    pattern: Rc<str>,
    key: String,
    value: V,
    param_names: Vec<String>,
}

/// One BASE/CHECK trie, either a top-level `statics`/`params` table or a
/// nested parameter continuation.
struct DoubleArrayTable<V> {
    cells: Vec<Cell>,
    nodes: HashMap<usize, NodeAux<V>>,
    search_cursor: usize,
}

impl<V> DoubleArrayTable<V> {
    fn new() -> Self {
        Self {
            cells: vec![Cell {
                base: 0,
                check: 0,
                has_params: false,
            }],
            nodes: HashMap::new(),
            search_cursor: 1,
        }
    }

    fn ensure_len(&mut self, min_len: usize) {
        while self.cells.len() < min_len {
            let grow_to = self.cells.len() + GROWTH_BLOCK;
            self.cells.resize_with(grow_to, Cell::default);
        }
    }

    /// Find a `base` such that `next(base, c) = base ^ c` lands in a free
    /// cell for every byte `c` in `siblings`, growing the table in fixed
    /// blocks when the current search cursor runs off the end.
    fn find_base(&mut self, siblings: &[u8]) -> i64 {
        loop {
            while self.search_cursor < self.cells.len() && self.cells[self.search_cursor].check != EMPTY_CHECK {
                self.search_cursor += 1;
            }
            if self.search_cursor >= self.cells.len() {
                self.ensure_len(self.search_cursor + 1);
            }
            let empty_idx = self.search_cursor;
            let base = (empty_idx as i64) ^ (siblings[0] as i64);
            if base < 1 {
                self.search_cursor += 1;
                continue;
            }

            let mut max_needed = 0usize;
            let mut conflict = false;
            for &c in siblings {
                let next = (base ^ (c as i64)) as usize;
                max_needed = max_needed.max(next);
                if next < self.cells.len() && self.cells[next].check != EMPTY_CHECK {
                    conflict = true;
                    break;
                }
            }
            if conflict {
                self.search_cursor += 1;
                continue;
            }

            self.ensure_len(max_needed + 1);
            return base;
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut NodeAux<V> {
        self.nodes.entry(idx).or_default()
    }

    /// Build this table from `records`, which must already be sorted
    /// lexicographically by `key`.
    fn build(&mut self, records: Vec<PreparedRecord<V>>) -> Result<(), RouterError> {
        build_node(self, 0, 0, records)
    }

    /// Walk literal cells from the root, pushing `(cell, path-index)` onto
    /// `stack` at every cell flagged `has_params`. Returns the leaf reached
    /// by a pure literal match, if the walk runs to the end of `path`.
    fn walk_literal<'a>(&'a self, path: &str, start: usize, stack: &mut Vec<(usize, usize)>) -> Option<&'a Leaf<V>> {
        let bytes = path.as_bytes();
        let mut idx = 0usize;
        let mut p = start;
        loop {
            if self.cells[idx].has_params {
                stack.push((idx, p));
            }
            if p == bytes.len() {
                return self.nodes.get(&idx).and_then(|n| n.leaf.as_ref());
            }
            let cell = self.cells[idx];
            let next = (cell.base ^ (bytes[p] as i64)) as usize;
            if next < self.cells.len() && self.cells[next].check == idx as i64 {
                idx = next;
                p += 1;
            } else {
                return None;
            }
        }
    }

    /// Full lookup from `start`: literal walk first, then unwind the
    /// fallback stack newest-first, recording each captured segment/tail
    /// onto `captures` in the order its placeholder will appear in
    /// `leaf.param_names`.
    fn lookup_from<'a>(&'a self, path: &str, start: usize, captures: &mut Vec<String>) -> Option<&'a Leaf<V>> {
        let mut stack: Vec<(usize, usize)> = Vec::new();
        if let Some(leaf) = self.walk_literal(path, start, &mut stack) {
            return Some(leaf);
        }

        while let Some((node_idx, p)) = stack.pop() {
            let aux = match self.nodes.get(&node_idx) {
                Some(aux) => aux,
                None => continue,
            };
            if let Some(sub) = &aux.param_tree {
                let sep = next_separator(path, p);
                captures.push(path[p..sep].to_string());
                if let Some(leaf) = sub.lookup_from(path, sep, captures) {
                    return Some(leaf);
                }
                captures.pop();
            }
            if let Some(leaf) = &aux.wildcard_leaf {
                captures.push(path[p..].to_string());
                return Some(leaf);
            }
        }
        None
    }

    /// Static-table lookup: a plain literal walk, no fallback stack — the
    /// statics table never carries parameter or wildcard continuations.
    fn lookup_static<'a>(&'a self, path: &str) -> Option<Matched<'a, V>> {
        let bytes = path.as_bytes();
        let mut idx = 0usize;
        for &b in bytes {
            let cell = self.cells[idx];
            let next = (cell.base ^ (b as i64)) as usize;
            if next < self.cells.len() && self.cells[next].check == idx as i64 {
                idx = next;
            } else {
                return None;
            }
        }
        self.nodes
            .get(&idx)
            .and_then(|n| n.leaf.as_ref())
            .map(|leaf| Matched::new(&leaf.value, Vec::new()))
    }
}

/// Recursively place `records` (all sharing the same prefix through `depth`
/// of `key`) under cell `idx`, computing sibling cohorts and recursing one
/// byte deeper per literal sibling.
fn build_node<V>(
    table: &mut DoubleArrayTable<V>,
    idx: usize,
    depth: usize,
    records: Vec<PreparedRecord<V>>,
) -> Result<(), RouterError> {
    let mut leaf_record: Option<PreparedRecord<V>> = None;
    let mut literal_records: Vec<PreparedRecord<V>> = Vec::new();
    let mut param_records: Vec<PreparedRecord<V>> = Vec::new();
    let mut wildcard_records: Vec<PreparedRecord<V>> = Vec::new();

    for rec in records {
        let bytes = rec.key.as_bytes();
        if depth == bytes.len() {
            leaf_record = Some(rec);
        } else {
            match bytes[depth] {
                b':' => param_records.push(rec),
                b'*' => wildcard_records.push(rec),
                _ => literal_records.push(rec),
            }
        }
    }

    if !literal_records.is_empty() {
        let mut ranges: Vec<(u8, usize, usize)> = Vec::new();
        let mut start = 0usize;
        for i in 1..=literal_records.len() {
            let boundary = i == literal_records.len()
                || literal_records[i].key.as_bytes()[depth] != literal_records[start].key.as_bytes()[depth];
            if boundary {
                ranges.push((literal_records[start].key.as_bytes()[depth], start, i));
                start = i;
            }
        }
        for w in ranges.windows(2) {
            if w[1].0 <= w[0].0 {
                return Err(RouterError::UnsortedInternal {
                    pattern: literal_records[w[1].1].pattern.to_string(),
                    depth,
                });
            }
        }

        let siblings: Vec<u8> = ranges.iter().map(|r| r.0).collect();
        let base = table.find_base(&siblings);
        table.cells[idx].base = base;

        let mut iter = literal_records.into_iter();
        for (byte, start, end) in ranges {
            let count = end - start;
            let chunk: Vec<PreparedRecord<V>> = (&mut iter).take(count).collect();
            let child_idx = (base ^ (byte as i64)) as usize;
            table.cells[child_idx].check = idx as i64;
            build_node(table, child_idx, depth + 1, chunk)?;
        }
    }

    if !param_records.is_empty() {
        table.cells[idx].has_params = true;
        let mut sub_records = Vec::with_capacity(param_records.len());
        for mut rec in param_records {
            let sep = next_separator(&rec.key, depth + 1);
            let name = rec.key[depth + 1..sep].to_string();
            if rec.param_names.contains(&name) {
                return Err(RouterError::DuplicateParamName {
                    pattern: rec.pattern.to_string(),
                    name,
                });
            }
            rec.param_names.push(name);
            let new_key = rec.key[sep..].to_string();
            sub_records.push(PreparedRecord {
                pattern: rec.pattern,
                key: new_key,
                value: rec.value,
                param_names: rec.param_names,
            });
        }
        let mut sub_table = DoubleArrayTable::new();
        sub_table.build(sub_records)?;
        table.node_mut(idx).param_tree = Some(Box::new(sub_table));
    }

    if !wildcard_records.is_empty() {
        table.cells[idx].has_params = true;
        let rec = wildcard_records
            .into_iter()
            .next()
            .expect("non-empty wildcard_records");
        let name = rec.key[depth + 1..].to_string();
        if rec.param_names.contains(&name) {
            return Err(RouterError::DuplicateParamName {
                pattern: rec.pattern.to_string(),
                name,
            });
        }
        let mut param_names = rec.param_names;
        param_names.push(name);
        table.node_mut(idx).wildcard_leaf = Some(Leaf {
            value: rec.value,
            param_names,
        });
    }

    if let Some(rec) = leaf_record {
        table.node_mut(idx).leaf = Some(Leaf {
            value: rec.value,
            param_names: rec.param_names,
        });
    }

    Ok(())
}

/// True iff `pattern` has a named-parameter or wildcard segment anywhere —
/// the partition test between the `statics` and `params` top-level tables.
fn has_placeholder(pattern: &str) -> bool {
    let bytes = pattern.as_bytes();
    if bytes.first().is_some_and(|&c| is_meta_char(c)) {
        return true;
    }
    bytes
        .windows(2)
        .any(|w| is_separator(w[0]) && is_meta_char(w[1]))
}

fn prepare<V>(records: Vec<Record<V>>) -> Vec<PreparedRecord<V>> {
    let mut prepared: Vec<PreparedRecord<V>> = records
        .into_iter()
        .filter(|r| !r.pattern.is_empty())
        .map(|r| {
            let pattern: Rc<str> = Rc::from(r.pattern.as_str());
            PreparedRecord {
                key: pattern.to_string(),
                pattern,
                value: r.value,
                param_names: Vec::new(),
            }
        })
        .collect();
    prepared.sort_by(|a, b| a.key.cmp(&b.key));
    prepared
}

/// Double-Array Trie engine: a `statics` table probed first, falling back
/// to a `params` table whose parameter/wildcard continuations are nested
/// sub-tables of the same kind.
pub struct DoubleArrayEngine<V> {
    statics: DoubleArrayTable<V>,
    params: DoubleArrayTable<V>,
}

impl<V> DoubleArrayEngine<V> {
    pub fn new() -> Self {
        Self {
            statics: DoubleArrayTable::new(),
            params: DoubleArrayTable::new(),
        }
    }
}

impl<V> Default for DoubleArrayEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync> RouteEngine<V> for DoubleArrayEngine<V> {
    fn build(&mut self, records: Vec<Record<V>>) -> Result<(), RouterError> {
        let mut static_records = Vec::new();
        let mut param_records = Vec::new();
        for record in records {
            if has_placeholder(&record.pattern) {
                param_records.push(record);
            } else {
                static_records.push(record);
            }
        }
        tracing::debug!(
            engine = "double_array",
            statics = static_records.len(),
            params = param_records.len(),
            "building route tables"
        );

        let mut statics = DoubleArrayTable::new();
        statics.build(prepare(static_records))?;
        let mut params = DoubleArrayTable::new();
        params.build(prepare(param_records))?;

        self.statics = statics;
        self.params = params;
        Ok(())
    }

    fn lookup<'a>(&'a self, path: &str) -> Option<Matched<'a, V>> {
        if let Some(matched) = self.statics.lookup_static(path) {
            return Some(matched);
        }
        let mut captures = Vec::new();
        let leaf = self.params.lookup_from(path, 0, &mut captures)?;
        let params = leaf
            .param_names
            .iter()
            .cloned()
            .zip(captures)
            .map(|(name, value)| Param::new(name, value))
            .collect();
        Some(Matched::new(&leaf.value, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(records: Vec<(&str, &'static str)>) -> DoubleArrayEngine<&'static str> {
        let mut engine = DoubleArrayEngine::new();
        engine
            .build(records.into_iter().map(|(p, v)| Record::new(p, v)).collect())
            .expect("build should succeed");
        engine
    }

    #[test]
    fn literal_round_trip() {
        let engine = build(vec![("/path/to/route", "r1")]);
        let m = engine.lookup("/path/to/route").unwrap();
        assert_eq!(*m.value, "r1");
        assert!(m.params.is_empty());
    }

    #[test]
    fn param_capture_order() {
        let engine = build(vec![("/:year/:month/:day", "r8")]);
        let m = engine.lookup("/2014/01/06").unwrap();
        assert_eq!(*m.value, "r8");
        assert_eq!(
            m.params,
            vec![
                Param::new("year", "2014"),
                Param::new("month", "01"),
                Param::new("day", "06"),
            ]
        );
    }

    #[test]
    fn wildcard_captures_tail_with_separators() {
        let engine = build(vec![("/path/to/wildcard/*routepath", "r5")]);
        let m = engine.lookup("/path/to/wildcard/some/params").unwrap();
        assert_eq!(*m.value, "r5");
        assert_eq!(m.params, vec![Param::new("routepath", "some/params")]);
    }

    #[test]
    fn static_wins_over_param() {
        let engine = build(vec![("/path/to/:param", "r4"), ("/path/to/route", "r1")]);
        let m = engine.lookup("/path/to/route").unwrap();
        assert_eq!(*m.value, "r1");
        assert!(m.params.is_empty());
    }

    #[test]
    fn sibling_params_then_literal_tail() {
        let engine = build(vec![
            ("/path/to/:param1/:param2", "r6"),
            ("/path/to/:param1/sep/:param2", "r7"),
        ]);
        let m6 = engine.lookup("/path/to/o1/o2").unwrap();
        assert_eq!(*m6.value, "r6");
        assert_eq!(m6.params, vec![Param::new("param1", "o1"), Param::new("param2", "o2")]);

        let m7 = engine.lookup("/path/to/p1/sep/p2").unwrap();
        assert_eq!(*m7.value, "r7");
        assert_eq!(m7.params, vec![Param::new("param1", "p1"), Param::new("param2", "p2")]);
    }

    #[test]
    fn mixed_param_and_wildcard_tail() {
        let engine = build(vec![("/a/to/b/:param/*routepath", "r10")]);
        let m = engine.lookup("/a/to/b/p1/some/wildcard/params").unwrap();
        assert_eq!(*m.value, "r10");
        assert_eq!(
            m.params,
            vec![Param::new("param", "p1"), Param::new("routepath", "some/wildcard/params")]
        );
    }

    #[test]
    fn miss_returns_none() {
        let engine = build(vec![("/path/to/route", "r1")]);
        assert!(engine.lookup("/missing").is_none());
    }

    #[test]
    fn duplicate_param_name_is_build_error() {
        let mut engine = DoubleArrayEngine::new();
        let err = engine
            .build(vec![Record::new("/:user/:id/:id", "v")])
            .unwrap_err();
        assert!(matches!(err, RouterError::DuplicateParamName { .. }));
    }

    #[test]
    fn many_siblings_force_table_growth() {
        // Enough distinct single-byte first segments to exercise find_base
        // growing the cell array past its initial block.
        let records: Vec<(String, &'static str)> = (0u8..64)
            .map(|i| (format!("/{}", (b'a' + (i % 26)) as char), "v"))
            .collect();
        let mut engine = DoubleArrayEngine::new();
        engine
            .build(records.iter().map(|(p, v)| Record::new(p.clone(), *v)).collect())
            .expect("build should succeed");
        for (pattern, _) in &records {
            assert!(engine.lookup(pattern).is_some(), "missed {pattern}");
        }
    }
}
