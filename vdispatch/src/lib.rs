//! # vdispatch - Version-Selected Function Implementations
//!
//! `vdispatch` picks between alternative implementations of a function by
//! comparing installed versions against predicates such as `rich<1.0` or
//! `numpy>=1.20, python<3.12`. Versions follow PEP 440 parsing and ordering
//! rules. Predicates are evaluated when an alternative is registered, so a
//! call is just a call.
//!
//! ## Quick Start
//!
//! ```rust
//! use vdispatch::prelude::*;
//!
//! # fn main() -> Result<(), VdispatchError> {
//! let lookup = PlatformLookup::new(MapLookup::new().with("rich", "0.5"))
//!     .with_runtime("python", "3.11.4");
//!
//! let mut render = DispatchPoint::new(
//!     Implementation::named("render", |text: String| format!("[new] {text}")),
//!     lookup,
//! );
//! render.register(
//!     "rich<1.0, python>=3.8",
//!     Implementation::named("render_legacy", |text: String| format!("[old] {text}")),
//! )?;
//!
//! assert_eq!(render.call("hi".to_string()), "[old] hi");
//! assert!(Version::parse("1.0")? == Version::parse("1.0.0")?);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use vdispatch_core::{
    // Errors
    BoxError,
    // Predicates
    Clause,
    // Ordering
    ComparisonKey,
    // Lookup
    FnLookup,
    // Callable
    Invoke,
    LocalSegment,
    LookupError,
    Operator,
    ParseError,
    PreRelease,
    PreTag,
    PredicateError,
    PredicateEvaluator,
    PredicateSet,
    SubjectRules,
    SubjectValue,
    // Versions
    VERSION_PATTERN,
    Version,
    VersionLookup,
};

// Dispatch
pub use vdispatch_std::{
    Bound, DispatchError, DispatchPoint, DispatchPointBuilder, Implementation, PersistError,
    Registration, VdispatchError,
};

// Notices and persistence
pub use vdispatch_std::{
    IgnoreNotices, ImplementationTable, LogNotices, Notice, NoticeHandler, NoticeKind,
    PersistedDispatch, PersistedRegistration,
};

/// Sort keys behind version ordering.
pub mod ordering {
    pub use vdispatch_core::{ComparisonKey, DevKey, LocalKey, LocalPart, PostKey, PreKey};
}

/// Standard lookup implementations.
pub mod lookups {
    #![allow(clippy::wildcard_imports)]
    pub use vdispatch_std::lookups::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use vdispatch_std::testing::*;
}

/// Prelude module - common imports for vdispatch.
///
/// # Usage
///
/// ```rust,ignore
/// use vdispatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DispatchError,
        DispatchPoint,
        Implementation,
        Invoke,
        Notice,
        Version,
        VdispatchError,
        VersionLookup,
        lookups::{MapLookup, PlatformLookup, ScopedLookup},
    };
}
