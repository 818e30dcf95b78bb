//! Scenario coverage against the standard route set, run identically
//! against all three engines, plus the deterministic precedence rule the
//! Double-Array engine's fallback-stack unwinding pins down.

mod support;

use waytrie::record::Record;
use waytrie::{registry, RouterError};

fn build_engine(name: &str, records: Vec<Record<&'static str>>) -> Box<dyn waytrie::RouteEngine<&'static str>> {
    registry::register_builtin_engines::<&'static str>();
    let mut engine = registry::new_url_router::<&'static str>(name).expect("engine should be registered");
    engine.build(records).expect("build should succeed");
    engine
}

#[test]
fn standard_route_set_matches_across_all_engines() {
    for &name in &support::ENGINE_NAMES {
        let engine = build_engine(name, support::route_set());
        for (input, expected_value, expected_params) in support::expected_lookups() {
            let matched = engine.lookup(input);
            match (matched, expected_value) {
                (Some(m), Some(expected)) => {
                    assert_eq!(*m.value, expected, "engine {name} path {input}");
                    let actual: Vec<(&str, &str)> = m
                        .params
                        .iter()
                        .map(|p| (p.name.as_str(), p.value.as_str()))
                        .collect();
                    assert_eq!(actual, expected_params, "engine {name} path {input} params");
                }
                (None, None) => {}
                (got, want) => panic!("engine {name} path {input}: got {got:?}, want {want:?}"),
            }
        }
    }
}

#[test]
fn duplicate_param_name_fails_build_on_every_engine() {
    for &name in &support::ENGINE_NAMES {
        registry::register_builtin_engines::<&'static str>();
        let mut engine = registry::new_url_router::<&'static str>(name).unwrap();
        let err = engine
            .build(vec![Record::new("/:user/:id/:id", "v")])
            .expect_err("duplicate param name should fail build");
        assert!(matches!(err, RouterError::DuplicateParamName { .. }), "engine {name}");
    }
}

#[test]
fn build_is_idempotent_across_independent_instances() {
    for &name in &support::ENGINE_NAMES {
        let a = build_engine(name, support::route_set());
        let b = build_engine(name, support::route_set());
        for (input, _, _) in support::expected_lookups() {
            let ra = a.lookup(input).map(|m| (*m.value, m.params));
            let rb = b.lookup(input).map(|m| (*m.value, m.params));
            assert_eq!(ra, rb, "engine {name} path {input}");
        }
    }
}

/// Open Question (precedence between two overlapping parameterized
/// patterns): the fallback stack unwinds newest-first, so the pattern
/// whose static prefix dead-ends deepest in the walk wins. Here `/x/:c`
/// dead-ends one cell deeper than `/:a/b`, so it is tried first and wins.
#[test]
fn double_array_precedence() {
    let mut engine = waytrie::engines::double_array::DoubleArrayEngine::new();
    waytrie::RouteEngine::build(
        &mut engine,
        vec![Record::new("/:a/b", "generic"), Record::new("/x/:c", "specific")],
    )
    .unwrap();
    let m = waytrie::RouteEngine::lookup(&engine, "/x/b").expect("should match");
    assert_eq!(*m.value, "specific");
    assert_eq!(m.params, vec![waytrie::Param::new("c", "b")]);
}

#[test]
fn tst_matches_double_array_precedence() {
    // TST shares the same fallback-stack structure as the Double-Array
    // engine (push on every param/wildcard fork, unwind newest-first), so
    // it resolves this overlap identically.
    let engine = build_engine(
        "tst",
        vec![Record::new("/:a/b", "generic"), Record::new("/x/:c", "specific")],
    );
    let m = engine.lookup("/x/b").expect("should match");
    assert_eq!(*m.value, "specific");
}

#[test]
fn regexp_precedence_is_insertion_order_not_depth() {
    // The Regexp engine has no concept of fallback depth — it probes
    // compiled patterns linearly in insertion order, so whichever pattern
    // was registered first wins when both match, independent of how
    // "specific" either one is. This is the one documented divergence
    // point for invariant 7 (engine equivalence only holds for route sets
    // with no such overlap, like the standard fixture set).
    let engine = build_engine(
        "regexp",
        vec![Record::new("/:a/b", "generic"), Record::new("/x/:c", "specific")],
    );
    let m = engine.lookup("/x/b").expect("should match");
    assert_eq!(*m.value, "generic");
}
