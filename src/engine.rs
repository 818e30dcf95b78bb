//! The uniform engine contract every routing-table implementation satisfies.

use crate::error::RouterError;
use crate::record::{Matched, Record};

/// A routing-table engine: built once from a record set, then queried an
/// unbounded number of times from an unbounded number of threads.
///
/// `build` is not reentrant — only one builder per engine instance, and it
/// must be called exactly once before `lookup` is meaningful. Implementors
/// must leave the engine in a usable-but-empty state (every lookup misses)
/// if `build` has not yet been called, and must discard partial state if
/// `build` returns an error.
pub trait RouteEngine<V>: Send + Sync {
    /// One-shot construction from the given records. Returns the first
    /// error encountered (duplicate parameter name, or an engine-specific
    /// structural error such as a regex compile failure).
    fn build(&mut self, records: Vec<Record<V>>) -> Result<(), RouterError>;

    /// Pure, side-effect-free, concurrency-safe lookup. Never errors — a
    /// non-match is `None`, not a `RouterError`.
    fn lookup<'a>(&'a self, path: &str) -> Option<Matched<'a, V>>;
}

/// A factory that produces a fresh, empty engine instance ready for
/// `build`. Stored in the registry under an engine name.
pub trait EngineFactory<V>: Send + Sync {
    fn create(&self) -> Box<dyn RouteEngine<V>>;
}

impl<V, F> EngineFactory<V> for F
where
    F: Fn() -> Box<dyn RouteEngine<V>> + Send + Sync,
{
    fn create(&self) -> Box<dyn RouteEngine<V>> {
        (self)()
    }
}
