//! Ternary Search Tree routing engine.
//!
//! A simpler comparison implementation of the same `Build`/`Lookup`
//! contract as the Double-Array engine. Each pattern is inserted one byte
//! at a time into a classic left/mid/right ternary tree; at a segment
//! boundary a pattern can fork into a literal continuation, a named
//! parameter continuation, or a terminal wildcard, mirroring the
//! Double-Array engine's `paramTree`/`wildcardTree` split without needing
//! a BASE/CHECK table.

use crate::engine::RouteEngine;
use crate::error::RouterError;
use crate::pattern::next_separator;
use crate::record::{Matched, Param, Record};

struct Leaf<V> {
    value: V,
    param_names: Vec<String>,
}

/// One byte of a literal run, ordered for binary search against siblings
/// via `left`/`right`; `next` is what follows after this byte matches.
struct TstNode<V> {
    c: u8,
    left: Option<Box<TstNode<V>>>,
    right: Option<Box<TstNode<V>>>,
    next: Fork<V>,
}

impl<V> TstNode<V> {
    fn new(c: u8) -> Self {
        Self {
            c,
            left: None,
            right: None,
            next: Fork::default(),
        }
    }
}

/// A branch point: a pattern's remaining suffix at this position is either
/// nothing left (`leaf`), more literal bytes (`literal`), a named parameter
/// (`param`), or a wildcard (`wildcard`). Used both as the tree root and as
/// the continuation hanging off every [`TstNode`], exactly as the
/// Double-Array engine's root cell and interior cells both carry
/// `hasParams`/`wildcardTree`.
struct Fork<V> {
    leaf: Option<Leaf<V>>,
    literal: Option<Box<TstNode<V>>>,
    param: Option<Box<Fork<V>>>,
    wildcard: Option<Leaf<V>>,
}

impl<V> Default for Fork<V> {
    fn default() -> Self {
        Self {
            leaf: None,
            literal: None,
            param: None,
            wildcard: None,
        }
    }
}

impl<V> Fork<V> {
    fn insert(
        &mut self,
        full: &str,
        bytes: &[u8],
        d: usize,
        value: V,
        mut names: Vec<String>,
    ) -> Result<(), RouterError> {
        if d == bytes.len() {
            self.leaf = Some(Leaf {
                value,
                param_names: names,
            });
            return Ok(());
        }

        match bytes[d] {
            b':' => {
                let sep = next_separator(full, d + 1);
                let name = full[d + 1..sep].to_string();
                if names.contains(&name) {
                    return Err(RouterError::DuplicateParamName {
                        pattern: full.to_string(),
                        name,
                    });
                }
                names.push(name);
                let param = self.param.get_or_insert_with(|| Box::new(Fork::default()));
                param.insert(full, bytes, sep, value, names)
            }
            b'*' => {
                let name = full[d + 1..].to_string();
                if names.contains(&name) {
                    return Err(RouterError::DuplicateParamName {
                        pattern: full.to_string(),
                        name,
                    });
                }
                names.push(name);
                self.wildcard = Some(Leaf {
                    value,
                    param_names: names,
                });
                Ok(())
            }
            c => insert_literal(&mut self.literal, full, bytes, d, c, value, names),
        }
    }

    /// Walk literal bytes from `idx`, recording every fork with a param or
    /// wildcard continuation onto `stack` as we pass it. Returns the leaf
    /// reached by a pure literal match, if any.
    fn walk_literal<'a>(
        &'a self,
        path: &str,
        idx: usize,
        stack: &mut Vec<(&'a Fork<V>, usize)>,
    ) -> Option<&'a Leaf<V>> {
        if self.param.is_some() || self.wildcard.is_some() {
            stack.push((self, idx));
        }
        if idx == path.len() {
            return self.leaf.as_ref();
        }
        let c = path.as_bytes()[idx];
        find_literal_child(&self.literal, c).and_then(|node| node.next.walk_literal(path, idx + 1, stack))
    }
}

fn insert_literal<V>(
    slot: &mut Option<Box<TstNode<V>>>,
    full: &str,
    bytes: &[u8],
    d: usize,
    c: u8,
    value: V,
    names: Vec<String>,
) -> Result<(), RouterError> {
    if slot.is_none() {
        *slot = Some(Box::new(TstNode::new(c)));
    }
    let node = slot.as_mut().expect("just inserted");
    if c < node.c {
        insert_literal(&mut node.left, full, bytes, d, c, value, names)
    } else if c > node.c {
        insert_literal(&mut node.right, full, bytes, d, c, value, names)
    } else {
        node.next.insert(full, bytes, d + 1, value, names)
    }
}

fn find_literal_child<V>(mut slot: &Option<Box<TstNode<V>>>, c: u8) -> Option<&TstNode<V>> {
    loop {
        match slot {
            None => return None,
            Some(node) => {
                if c < node.c {
                    slot = &node.left;
                } else if c > node.c {
                    slot = &node.right;
                } else {
                    return Some(node);
                }
            }
        }
    }
}

/// Recursively find a match within `fork`, appending each captured
/// parameter/wildcard value (in the order encountered) to `captures`.
/// Mirrors the Double-Array engine's `paramTree.lookupParam` recursion:
/// every fallback attempt is itself a full walk-plus-unwind, not a single
/// probe.
fn find_in_fork<'a, V>(fork: &'a Fork<V>, path: &str, idx: usize, captures: &mut Vec<String>) -> Option<&'a Leaf<V>> {
    let mut stack: Vec<(&Fork<V>, usize)> = Vec::new();
    if let Some(leaf) = fork.walk_literal(path, idx, &mut stack) {
        return Some(leaf);
    }

    while let Some((f, i)) = stack.pop() {
        if let Some(param) = &f.param {
            let sep = next_separator(path, i);
            captures.push(path[i..sep].to_string());
            if let Some(leaf) = find_in_fork(param, path, sep, captures) {
                return Some(leaf);
            }
            captures.pop();
        }
        if let Some(leaf) = &f.wildcard {
            captures.push(path[i..].to_string());
            return Some(leaf);
        }
    }
    None
}

/// Ternary Search Tree engine: byte-by-byte comparison trie with
/// named-parameter and wildcard forks at segment boundaries.
pub struct TstEngine<V> {
    root: Fork<V>,
}

impl<V> TstEngine<V> {
    pub fn new() -> Self {
        Self {
            root: Fork::default(),
        }
    }
}

impl<V> Default for TstEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync> RouteEngine<V> for TstEngine<V> {
    fn build(&mut self, records: Vec<Record<V>>) -> Result<(), RouterError> {
        tracing::debug!(engine = "tst", routes = records.len(), "building route table");
        let mut root = Fork::default();
        for record in records {
            let bytes = record.pattern.as_bytes();
            if bytes.is_empty() {
                continue;
            }
            root.insert(&record.pattern, bytes, 0, record.value, Vec::new())?;
        }
        self.root = root;
        Ok(())
    }

    fn lookup<'a>(&'a self, path: &str) -> Option<Matched<'a, V>> {
        let mut captures = Vec::new();
        let leaf = find_in_fork(&self.root, path, 0, &mut captures)?;
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
