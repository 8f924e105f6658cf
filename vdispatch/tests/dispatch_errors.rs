//! Registration errors and the guarantees around them.

use std::sync::Arc;
use vdispatch::{
    DispatchError, Operator, PredicateError, VdispatchError,
    testing::CountingLookup,
};

mod common;
use common::{constant, environment, formatting, point};

#[test]
fn test_nested_dispatch_points_raise() {
    let env = environment();
    let mut func = point(&env, constant("func"));
    let inner = point(&env, constant("bar"));

    let err = func
        .register("rich<1.0", inner.into_implementation())
        .unwrap_err();
    assert!(matches!(err, DispatchError::Nesting { .. }));
    assert!(err.to_string().contains("nesting dispatch points is not supported"));
    assert!(func.registrations().is_empty());
    assert_eq!(func.call(()), "func");
}

#[test]
fn test_nesting_keeps_active_implementation() {
    let env = environment();
    let _guard = env.pretend([("rich", "0.1")]);
    let mut func = point(&env, constant("default"));
    func.register("rich<1.0", constant("old")).unwrap();

    let default = func.default_implementation().clone();
    assert!(matches!(
        func.register("rich<2.0", default),
        Err(DispatchError::Nesting { .. })
    ));
    assert_eq!(func.call(()), "old");
    assert_eq!(func.matched_predicate(), "rich<1.0");
}

#[test]
fn test_invalid_operator_spelling() {
    let env = environment();
    let mut func = point(&env, formatting("foo"));
    let err = func.register("rich=1.0", formatting("bar")).unwrap_err();
    assert!(matches!(err.as_predicate(), Some(PredicateError::Format { .. })));
    assert!(err.to_string().contains("should be like 'foo<=1.2.3'"));
    assert!(func.registrations().is_empty());
}

#[test]
fn test_malformed_predicates() {
    let env = environment();
    let mut func = point(&env, constant("foo"));
    for predicate in ["rich", "rich<=", "==1.0", "rich<1.0,", "rich<1.0<2.0", "rich==1.0;;pytest==1"] {
        let err = func.register(predicate, constant("bar")).unwrap_err();
        assert!(
            matches!(err.as_predicate(), Some(PredicateError::Format { .. })),
            "{predicate}: {err}"
        );
    }
    assert!(func.registrations().is_empty());
}

#[test]
fn test_invalid_version_spec() {
    let env = environment();
    let mut func = point(&env, constant("func"));
    let err = func.register("rich==1.foo.0", constant("bar")).unwrap_err();
    assert!(matches!(
        err.as_predicate(),
        Some(PredicateError::InvalidTarget { .. })
    ));
    assert!(err.to_string().starts_with("func uses an incorrect version spec"));
    assert!(err.to_string().contains("1.foo.0"));
}

#[test]
fn test_invalid_package() {
    let env = environment();
    let mut func = point(&env, constant("func"));
    let err = func.register("rich kid==1.0", constant("bar")).unwrap_err();
    match err.as_predicate() {
        Some(PredicateError::UnresolvedSubject { subject, .. }) => assert_eq!(subject, "rich kid"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_os_only_compares_with_eq() {
    let env = environment();
    for op in ["<", "<=", ">", ">="] {
        let mut func = point(&env, constant("Linux"));
        let err = func.register(&format!("os{op}win32"), constant("Windows")).unwrap_err();
        assert!(
            err.to_string().contains("string comparison only possible with =="),
            "{op}: {err}"
        );
        let operator: Operator = op.parse().unwrap();
        assert!(matches!(
            err.as_predicate(),
            Some(PredicateError::Operator { operator: found, .. }) if *found == operator
        ));
    }
}

#[test]
fn test_version_check_performed_only_once() {
    let env = environment();
    let lookup = Arc::new(CountingLookup::new(env.clone()));
    let mut func = vdispatch::DispatchPoint::builder(constant("0"))
        .shared_lookup(lookup.clone())
        .build();

    func.register("rich<1.0", constant("1")).unwrap();
    for _ in 0..10 {
        func.call(());
    }
    assert_eq!(lookup.calls(), 1);

    func.register("rich>=1000", constant("2")).unwrap();
    for _ in 0..10 {
        func.call(());
    }
    assert_eq!(lookup.calls(), 2);
}

#[test]
fn test_errors_convert_to_top_level() {
    fn register_bad() -> Result<(), VdispatchError> {
        let env = environment();
        let mut func = point(&env, constant("func"));
        func.register("rich>>1", constant("bar"))?;
        Ok(())
    }

    let err = register_bad().unwrap_err();
    assert!(matches!(err, VdispatchError::Dispatch(DispatchError::Predicate { .. })));
    assert!(std::error::Error::source(&err).is_some());
}
