//! Dispatching on the host runtime and the operating system.

use std::sync::Arc;
use vdispatch::{
    DispatchPoint, SubjectRules, VersionLookup,
    lookups::{MapLookup, PlatformLookup, ScopedLookup},
};

mod common;
use common::{constant, environment, point};

fn python_checks(env: &Arc<ScopedLookup>) -> DispatchPoint<(), &'static str> {
    let mut func = point(env, constant("default"));
    func.register("Python<3.8", constant("old")).unwrap();
    func.register("Python>=4", constant("new")).unwrap();
    func.register("Python==3.11.12", constant("exact")).unwrap();
    func
}

#[test]
fn test_python_no_match() {
    let env = environment();
    assert_eq!(python_checks(&env).call(()), "default");
}

#[test]
fn test_python_pretended() {
    let env = environment();
    for (version, expected) in [("2.7", "old"), ("4", "new"), ("3.11.12", "exact")] {
        let _guard = env.pretend([("Python", version)]);
        assert_eq!(python_checks(&env).call(()), expected, "Python {version}");
    }
}

#[test]
fn test_runtime_name_is_case_insensitive() {
    let env = environment();
    let mut func = point(&env, constant("default"));
    func.register("python==3.11.4", constant("lower")).unwrap();
    assert_eq!(func.call(()), "lower");
    func.register("PYTHON>3.11", constant("upper")).unwrap();
    assert_eq!(func.call(()), "upper");
}

fn os_checks(env: &Arc<ScopedLookup>) -> DispatchPoint<(), &'static str> {
    let mut func = point(env, constant("Linux"));
    func.register("os==win32", constant("Windows")).unwrap();
    func.register("os==Darwin", constant("MacOS")).unwrap();
    func
}

#[test]
fn test_os_default() {
    let env = environment();
    assert_eq!(os_checks(&env).call(()), "Linux");
}

#[test]
fn test_os_pretended() {
    let env = environment();
    {
        let _guard = env.pretend([("os", "win32")]);
        assert_eq!(os_checks(&env).call(()), "Windows");
    }
    {
        let _guard = env.pretend([("os", "Darwin")]);
        assert_eq!(os_checks(&env).call(()), "MacOS");
    }
    assert_eq!(os_checks(&env).call(()), "Linux");
}

#[test]
fn test_real_platform_defaults() {
    let lookup = PlatformLookup::new(MapLookup::new());
    let mut func = DispatchPoint::new(constant("elsewhere"), lookup);
    let predicate = format!("os=={}, arch=={}", std::env::consts::OS, std::env::consts::ARCH);
    func.register(&predicate, constant("here")).unwrap();
    assert_eq!(func.call(()), "here");
}

#[test]
fn test_custom_label_subject() {
    // "distro" resolves to something that parses as a version; declaring it
    // a label keeps it a plain string comparison.
    let lookup = PlatformLookup::new(MapLookup::new()).with_subject("distro", "1.0");
    assert_eq!(lookup.resolve("distro").unwrap(), "1.0");

    let mut func = DispatchPoint::builder(constant("default"))
        .lookup(lookup)
        .subject_rules(SubjectRules::new().with_label("distro"))
        .build();
    func.register("distro==1", constant("version")).unwrap();
    assert_eq!(func.call(()), "default");
    func.register("distro==1.0", constant("label")).unwrap();
    assert_eq!(func.call(()), "label");
    assert!(func.register("distro>=1", constant("ordered")).is_err());
}

#[test]
fn test_unparseable_value_is_a_label() {
    let lookup = MapLookup::new().with("channel", "nightly");
    let mut func = DispatchPoint::new(constant("stable"), lookup);
    func.register("channel==nightly", constant("nightly")).unwrap();
    assert_eq!(func.call(()), "nightly");
    assert!(func.register("channel<2", constant("never")).is_err());
}
