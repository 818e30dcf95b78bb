//! Regular-expression routing engine — the correctness baseline.
//!
//! Each pattern compiles to one anchored regular expression with a named
//! capture group per placeholder; `Lookup` walks the compiled list in
//! insertion order and returns the first match. Simple, and quadratic-ish
//! in the number of registered routes, which is exactly why it exists
//! alongside the Double-Array and TST engines rather than instead of them.

use crate::engine::RouteEngine;
use crate::error::RouterError;
use crate::pattern::{classify_segment, is_separator, next_separator, SegmentKind};
use crate::record::{Matched, Param, Record};
use regex::Regex;

struct CompiledRoute<V> {
    regex: Regex,
    param_names: Vec<String>,
    value: V,
}

/// Compile a pattern into an anchored regex plus the ordered list of
/// parameter names it binds. Literal runs are regex-quoted; `:name` becomes
/// a named single-segment group, `*name` a named rest-of-path group.
fn compile_pattern(pattern: &str) -> Result<(Regex, Vec<String>), RouterError> {
    let mut out = String::from("^");
    let mut names: Vec<String> = Vec::new();
    let bytes = pattern.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if is_separator(bytes[i]) {
            out.push_str(&regex::escape(&pattern[i..i + 1]));
            i += 1;
            continue;
        }

        match classify_segment(pattern, i) {
            SegmentKind::Param => {
                let sep = next_separator(pattern, i + 1);
                let name = pattern[i + 1..sep].to_string();
                if names.contains(&name) {
                    return Err(RouterError::DuplicateParamName {
                        pattern: pattern.to_string(),
                        name,
                    });
                }
                out.push_str(&format!("(?P<{}>[\\w-]+)", name));
                names.push(name);
                i = sep;
            }
            SegmentKind::Wildcard => {
                let name = pattern[i + 1..].to_string();
                if names.contains(&name) {
                    return Err(RouterError::DuplicateParamName {
                        pattern: pattern.to_string(),
                        name,
                    });
                }
                out.push_str(&format!("(?P<{}>[\\w\\-/.]+)", name));
                names.push(name);
                i = bytes.len();
            }
            SegmentKind::Literal => {
                let sep = next_separator(pattern, i);
                out.push_str(&regex::escape(&pattern[i..sep]));
                i = sep;
            }
        }
    }
    out.push('$');

    let regex = Regex::new(&out).map_err(|source| RouterError::PatternCompile {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok((regex, names))
}

/// Regular-expression engine: a flat, insertion-ordered list of compiled
/// per-pattern regexes, probed linearly.
pub struct RegexpEngine<V> {
    routes: Vec<CompiledRoute<V>>,
}

impl<V> RegexpEngine<V> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<V> Default for RegexpEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync> RouteEngine<V> for RegexpEngine<V> {
    fn build(&mut self, records: Vec<Record<V>>) -> Result<(), RouterError> {
        tracing::debug!(engine = "regexp", routes = records.len(), "compiling route table");
        let mut routes = Vec::with_capacity(records.len());
        for record in records {
            let (regex, param_names) = compile_pattern(&record.pattern).map_err(|e| {
                tracing::error!(pattern = %record.pattern, error = %e, "pattern failed to compile");
                e
            })?;
            routes.push(CompiledRoute {
                regex,
                param_names,
                value: record.value,
            });
        }
        self.routes = routes;
        Ok(())
    }

    fn lookup<'a>(&'a self, path: &str) -> Option<Matched<'a, V>> {
        for route in &self.routes {
            if let Some(caps) = route.regex.captures(path) {
                let params = route
                    .param_names
                    .iter()
                    .map(|name| {
                        let value = caps.name(name).map(|m| m.as_str()).unwrap_or("");
                        Param::new(name.clone(), value)
                    })
                    .collect();
                return Some(Matched::new(&route.value, params));
            }
        }
        None
    }
}
