//! The version lookup capability.
//!
//! vdispatch never decides on its own what version of a component is
//! installed. It asks a [`VersionLookup`], which the embedding application
//! supplies (and which tests replace with a fixed table).

use crate::error::LookupError;
use std::sync::Arc;

/// Resolves a subject name (a package, a runtime, a platform fact) to its
/// current value.
///
/// Implementations should be side-effect free: the dispatch machinery
/// resolves each subject once per registration and once per replay, and
/// never caches answers across calls.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot resolve versions",
    label = "missing `VersionLookup` implementation",
    note = "Implement `VersionLookup`, or wrap a closure in `FnLookup`."
)]
pub trait VersionLookup: Send + Sync {
    /// Return the current value for `subject`.
    fn resolve(&self, subject: &str) -> Result<String, LookupError>;
}

impl<T: VersionLookup + ?Sized> VersionLookup for &T {
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        (**self).resolve(subject)
    }
}

impl<T: VersionLookup + ?Sized> VersionLookup for Box<T> {
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        (**self).resolve(subject)
    }
}

impl<T: VersionLookup + ?Sized> VersionLookup for Arc<T> {
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        (**self).resolve(subject)
    }
}

/// Adapts a closure into a [`VersionLookup`].
///
/// # Example
///
/// ```rust
/// use vdispatch_core::{FnLookup, LookupError, VersionLookup};
///
/// let lookup = FnLookup(|subject: &str| match subject {
///     "serde" => Ok("1.0.200".to_string()),
///     other => Err(LookupError::NotFound(other.to_string())),
/// });
/// assert_eq!(lookup.resolve("serde").unwrap(), "1.0.200");
/// ```
#[derive(Clone, Copy)]
pub struct FnLookup<F>(pub F);

impl<F> VersionLookup for FnLookup<F>
where
    F: Fn(&str) -> Result<String, LookupError> + Send + Sync,
{
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        (self.0)(subject)
    }
}
