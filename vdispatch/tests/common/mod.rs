#![allow(dead_code)]

use std::sync::Arc;
use vdispatch::{
    DispatchPoint, Implementation,
    lookups::{MapLookup, PlatformLookup, ScopedLookup},
};

// ============================================================================
// Test Environment
// ============================================================================

/// Installed versions every test starts from: nothing below 1.0, nothing
/// at or above 1000, and a Python that matches none of the runtime checks.
pub fn environment() -> Arc<ScopedLookup> {
    let installed = MapLookup::new().with("rich", "13.7.1").with("pytest", "8.3.2");
    Arc::new(ScopedLookup::new(
        PlatformLookup::new(installed)
            .with_subject("os", "linux")
            .with_runtime("python", "3.11.4"),
    ))
}

// ============================================================================
// Test Implementations
// ============================================================================

/// Arguments of the `func(bar, baz)` style test functions.
pub type Args = (&'static str, &'static str);

pub type Func = DispatchPoint<Args, String>;

pub fn formatting(label: &'static str) -> Implementation<Args, String> {
    Implementation::named(label, move |(bar, baz): Args| format!("{label} {bar}-{baz}"))
}

pub fn constant(label: &'static str) -> Implementation<(), &'static str> {
    Implementation::named(label, move |_: ()| label)
}

pub fn point<A, O>(env: &Arc<ScopedLookup>, default: Implementation<A, O>) -> DispatchPoint<A, O> {
    DispatchPoint::builder(default).shared_lookup(env.clone()).build()
}

/// `rich<1.0`, `rich>=1000` and `rich==1.2.3` alternatives over a default.
pub fn one_check(env: &Arc<ScopedLookup>) -> Func {
    let mut func = point(env, formatting("default"));
    func.register("rich<1.0", formatting("old")).unwrap();
    func.register("rich>=1000", formatting("new")).unwrap();
    func.register("rich==1.2.3", formatting("exact")).unwrap();
    func
}
