//! The `(pattern, value)` record model and the parameter bindings a
//! successful lookup returns.

/// A `(Key, Value)` pair submitted to an engine's `Build`. Value ownership
/// transfers to the engine; the engine returns it by reference at lookup.
#[derive(Debug, Clone)]
pub struct Record<V> {
    pub pattern: String,
    pub value: V,
}

impl<V> Record<V> {
    pub fn new(pattern: impl Into<String>, value: V) -> Self {
        Self {
            pattern: pattern.into(),
            value,
        }
    }
}

/// One captured parameter: the placeholder's name and the substring it
/// matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The ordered parameter bindings for a match, in the order the
/// placeholders appear in the matched pattern.
pub type Params = Vec<Param>;

/// A successful lookup: the bound value plus its parameter bindings.
#[derive(Debug)]
pub struct Matched<'a, V> {
    pub value: &'a V,
    pub params: Params,
}

impl<'a, V> Matched<'a, V> {
    pub fn new(value: &'a V, params: Params) -> Self {
        Self { value, params }
    }
}
