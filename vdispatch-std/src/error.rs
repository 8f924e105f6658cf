//! Error types for dispatch points.
//!
//! - [`VdispatchError`] - Top-level error type
//! - [`DispatchError`] - Registration and replay errors
//! - [`PersistError`] - Saving and restoring dispatch points

use thiserror::Error;
use vdispatch_core::{LookupError, ParseError, PredicateError};

/// Top-level error type for all vdispatch operations.
#[derive(Error, Debug)]
pub enum VdispatchError {
    /// A version string did not parse.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A lookup failed outside of predicate evaluation.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// A registration or replay failed.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Saving or restoring a dispatch point failed.
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Errors raised by [`DispatchPoint`](crate::DispatchPoint) registration and replay.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The predicate set is malformed or cannot be evaluated.
    #[error("{point} uses an incorrect version spec: {source}")]
    Predicate {
        /// Name of the dispatch point.
        point: String,
        /// The underlying failure.
        #[source]
        source: PredicateError,
    },

    /// The implementation is itself a dispatch slot.
    #[error(
        "{point}: '{implementation}' is already managed by a dispatch point; nesting dispatch \
         points is not supported, register one predicate set like 'foo==1.0, bar==2.0' instead"
    )]
    Nesting {
        /// Name of the dispatch point.
        point: String,
        /// Name of the rejected implementation.
        implementation: String,
    },
}

impl DispatchError {
    /// The predicate error, if this is one.
    pub fn as_predicate(&self) -> Option<&PredicateError> {
        match self {
            DispatchError::Predicate { source, .. } => Some(source),
            DispatchError::Nesting { .. } => None,
        }
    }
}

/// Errors raised while saving or restoring a dispatch point.
#[derive(Error, Debug)]
pub enum PersistError {
    /// An implementation has no name to be saved under.
    #[error("{point}: implementation has no name (registration {index:?})")]
    Unnamed {
        /// Name of the dispatch point.
        point: String,
        /// Position in the registration log, `None` for the default.
        index: Option<usize>,
    },

    /// A saved name has no implementation in the table.
    #[error("no implementation named '{0}'")]
    MissingImplementation(String),

    /// Replaying the restored log failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
