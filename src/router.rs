//! A thin convenience wrapper around the registry + engine contract.
//!
//! Most callers don't want to hold a `Box<dyn RouteEngine<V>>` and thread
//! the registry lookup and the build call through their own code every time
//! they wire up a route table; `Router::build` does both in one call and
//! hands back something with a plain `lookup`. Grounded in the teacher's own
//! `RouteTable`, a convenience wrapper over several `RadixTree`s that callers
//! use instead of reaching for the underlying matcher type directly.

use crate::engine::RouteEngine;
use crate::error::RouterError;
use crate::record::{Matched, Record};
use crate::registry;

/// A built engine, selected by name at construction. `Router` owns the
/// engine and is itself `Send + Sync`, so it can be shared behind an `Arc`
/// across reader threads the same way the engine it wraps can.
pub struct Router<V> {
    engine: Box<dyn RouteEngine<V>>,
}

impl<V: 'static> Router<V> {
    /// Resolve `engine_name` in the registry, build it from `records`, and
    /// return the ready-to-query router. Fails with
    /// [`RouterError::UnknownEngine`] if `engine_name` isn't registered for
    /// `V`, or with whatever error the engine's `Build` raises.
    pub fn build(engine_name: &str, records: Vec<Record<V>>) -> Result<Self, RouterError> {
        let mut engine = registry::new_url_router::<V>(engine_name)?;
        engine.build(records)?;
        Ok(Self { engine })
    }

    /// Delegate to the wrapped engine's `lookup`.
    pub fn lookup<'a>(&'a self, path: &str) -> Option<Matched<'a, V>> {
        self.engine.lookup(path)
    }
}
