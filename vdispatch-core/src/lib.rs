//! # vdispatch-core
//!
//! Core types for the vdispatch version dispatch framework.
//!
//! This crate has minimal dependencies and is designed to be imported by code
//! that only needs to parse, compare or test versions, without the dispatch
//! machinery of `vdispatch-std`.
//!
//! # Layers
//!
//! ## Version Parser ([`Version`])
//!
//! Parses a version string into epoch, release, pre-, post-, dev-release and
//! local label, normalizing alternate spellings. A [`Version`] always renders
//! in canonical form.
//!
//! ## Version Comparator ([`ComparisonKey`])
//!
//! Derives the sortable key that gives versions their strict total order.
//! All comparisons of [`Version`] go through it, so `1.0 == 1.0.0`.
//!
//! ## Predicate Evaluation ([`PredicateSet`], [`PredicateEvaluator`])
//!
//! Parses `name<op>version` clauses, resolves names through a
//! [`VersionLookup`] and evaluates the conjunction.
//!
//! ## Callable Layer ([`Invoke`])
//!
//! The call capability shared by plain functions and dispatch points.
//!
//! # Error Types
//!
//! - [`ParseError`] - Invalid version string
//! - [`LookupError`] - Subject could not be resolved
//! - [`PredicateError`] - Malformed or unevaluable predicate

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod invoke;
mod lookup;
mod ordering;
mod predicate;
mod version;

// Re-exports
pub use error::{BoxError, LookupError, ParseError, PredicateError};
pub use invoke::Invoke;
pub use lookup::{FnLookup, VersionLookup};
pub use ordering::{ComparisonKey, DevKey, LocalKey, LocalPart, PostKey, PreKey};
pub use predicate::{Clause, Operator, PredicateEvaluator, PredicateSet, SubjectRules, SubjectValue};
pub use version::{LocalSegment, PreRelease, PreTag, VERSION_PATTERN, Version};
