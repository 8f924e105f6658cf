//! Error types for vdispatch.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`ParseError`] - A version string does not match the grammar
//! - [`LookupError`] - A subject could not be resolved to a value
//! - [`PredicateError`] - A predicate clause is malformed or cannot be evaluated

use crate::predicate::Operator;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A version string that does not match the version grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version: '{input}'")]
pub struct ParseError {
    input: String,
}

impl ParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The offending input, exactly as given.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Errors returned by a [`VersionLookup`](crate::VersionLookup).
#[derive(Error, Debug)]
pub enum LookupError {
    /// Nothing is known about the subject.
    #[error("no version found for '{0}'")]
    NotFound(String),

    /// The lookup itself failed.
    #[error(transparent)]
    Custom(BoxError),
}

impl From<BoxError> for LookupError {
    fn from(err: BoxError) -> Self {
        LookupError::Custom(err)
    }
}

/// Errors that can occur while parsing or evaluating a predicate.
#[derive(Error, Debug)]
pub enum PredicateError {
    /// The clause has no (or more than one) comparison operator, or an empty side.
    #[error("malformed predicate '{clause}': {reason}, should be like 'foo<=1.2.3'")]
    Format {
        /// The offending clause text.
        clause: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The subject could not be resolved to a current value.
    #[error("cannot resolve '{subject}'")]
    UnresolvedSubject {
        /// The subject name as written in the clause.
        subject: String,
        /// The lookup failure.
        #[source]
        source: LookupError,
    },

    /// An ordering operator was used against a non-version subject.
    #[error("'{subject}' resolves to '{value}', string comparison only possible with ==, not {operator}")]
    Operator {
        /// The subject name.
        subject: String,
        /// The rejected operator.
        operator: Operator,
        /// The value the subject resolved to.
        value: String,
    },

    /// The target of a clause is not a valid version.
    #[error("invalid version in predicate '{clause}'")]
    InvalidTarget {
        /// The offending clause text.
        clause: String,
        /// The parse failure.
        #[source]
        source: ParseError,
    },
}

impl PredicateError {
    pub(crate) fn format(clause: &str, reason: &'static str) -> Self {
        PredicateError::Format {
            clause: clause.to_string(),
            reason,
        }
    }
}
