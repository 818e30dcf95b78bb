//! Process-wide name → factory registry.
//!
//! Populated once (typically via [`register_builtin_engines`], called
//! lazily on first use) and read-only thereafter, mirroring the teacher's
//! rule that the only shared mutable state across instances is set up once
//! at startup. Rust gives us no cross-module static-initialization
//! ordering guarantee, so — per the spec's own design note — we expose an
//! explicit entry point rather than relying on it.
//!
//! The registry is generic over the value type `V` stored in routes. Since
//! a single process-wide `static` cannot itself be generic, the map is
//! keyed by `(name, TypeId::of::<V>())` and factories are type-erased via
//! `Any`, then downcast back to the caller's concrete `V` on lookup.

use crate::engine::{EngineFactory, RouteEngine};
use crate::error::RouterError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

type ErasedFactory = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;

fn registry() -> &'static RwLock<HashMap<(String, TypeId), ErasedFactory>> {
    static REGISTRY: OnceLock<RwLock<HashMap<(String, TypeId), ErasedFactory>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register a factory under `name` for the value type `V`. Re-registering
/// the same `(name, V)` pair replaces the previous factory.
pub fn register<V, F>(name: &str, factory: F)
where
    V: 'static,
    F: EngineFactory<V> + 'static,
{
    let key = (name.to_string(), TypeId::of::<V>());
    let erased: ErasedFactory = Box::new(move || {
        let engine: Box<dyn RouteEngine<V>> = factory.create();
        Box::new(engine) as Box<dyn Any>
    });
    registry()
        .write()
        .expect("waytrie registry lock poisoned")
        .insert(key, erased);
    tracing::debug!(engine = name, "registered routing engine factory");
}

/// Construct a fresh, empty engine instance registered under `name` for the
/// value type `V`. Fails with [`RouterError::UnknownEngine`] if nothing was
/// registered under that `(name, V)` pair.
pub fn new_url_router<V: 'static>(name: &str) -> Result<Box<dyn RouteEngine<V>>, RouterError> {
    let key = (name.to_string(), TypeId::of::<V>());
    let guard = registry().read().expect("waytrie registry lock poisoned");
    let factory = guard
        .get(&key)
        .ok_or_else(|| RouterError::UnknownEngine(name.to_string()))?;
    let erased = factory();
    let engine = erased
        .downcast::<Box<dyn RouteEngine<V>>>()
        .expect("registry factory returned a mismatched engine type");
    Ok(*engine)
}

/// Register the three built-in engines ("double_array", "tst", "regexp")
/// for the value type `V`. Idempotent — safe to call more than once (e.g.
/// once per distinct `V` the caller uses).
pub fn register_builtin_engines<V: 'static + Send + Sync>() {
    register::<V, _>("double_array", || {
        Box::new(crate::engines::double_array::DoubleArrayEngine::new()) as Box<dyn RouteEngine<V>>
    });
    register::<V, _>("tst", || {
        Box::new(crate::engines::tst::TstEngine::new()) as Box<dyn RouteEngine<V>>
    });
    register::<V, _>("regexp", || {
        Box::new(crate::engines::regexp::RegexpEngine::new()) as Box<dyn RouteEngine<V>>
    });
}
