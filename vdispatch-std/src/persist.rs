//! Saving and restoring dispatch points.
//!
//! Functions cannot be serialized, so a saved dispatch point refers to its
//! implementations by name. [`DispatchPoint::persist`] captures the
//! registration log as a [`PersistedDispatch`]; restoring it looks every name
//! up in an [`ImplementationTable`] and replays the log against the lookup
//! of the process doing the restore. The active implementation is therefore
//! never taken from the saved state: a dispatch point saved where `rich` was
//! 13.0 and restored where it is 0.1 selects the 0.1 alternative.
//!
//! With the `serde` feature the saved types implement `Serialize` and
//! `Deserialize`.

use crate::{
    dispatch::{DispatchPoint, DispatchPointBuilder, Registration},
    error::{DispatchError, PersistError},
    implementation::Implementation,
    notice::Notice,
};
use std::collections::HashMap;
use vdispatch_core::VersionLookup;

/// One saved registration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistedRegistration {
    /// The predicate set text as registered.
    pub predicate: String,
    /// Name of the alternative implementation.
    pub implementation: String,
    /// The attached notice.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub notice: Option<Notice>,
}

/// A saved dispatch point: its name, default, and registration log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistedDispatch {
    /// Name of the dispatch point.
    pub name: String,
    /// Name of the default implementation.
    pub default: String,
    /// The registration log, in registration order.
    pub registrations: Vec<PersistedRegistration>,
}

impl PersistedDispatch {
    /// Rebuild the dispatch point, resolving subjects with `lookup`.
    pub fn restore<A, O, L>(
        &self,
        table: &ImplementationTable<A, O>,
        lookup: L,
    ) -> Result<DispatchPoint<A, O>, PersistError>
    where
        L: VersionLookup + 'static,
    {
        self.restore_with(table, |builder| builder.lookup(lookup))
    }

    /// Rebuild the dispatch point, configuring it with `configure` before
    /// the log is replayed.
    ///
    /// The name is always taken from the saved state.
    pub fn restore_with<A, O, F>(
        &self,
        table: &ImplementationTable<A, O>,
        configure: F,
    ) -> Result<DispatchPoint<A, O>, PersistError>
    where
        F: FnOnce(DispatchPointBuilder<A, O>) -> DispatchPointBuilder<A, O>,
    {
        let default = table.require(&self.default)?;
        let log = self
            .registrations
            .iter()
            .map(|saved| {
                let implementation = table.require(&saved.implementation)?;
                Registration::new(&saved.predicate, implementation, saved.notice.clone()).map_err(
                    |source| {
                        PersistError::Dispatch(DispatchError::Predicate {
                            point: self.name.clone(),
                            source,
                        })
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let point = configure(DispatchPoint::builder(default))
            .name(self.name.clone())
            .replay(log)?;

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                point = %point.name(),
                matched = %point.matched_predicate(),
                "restored dispatch point"
            );
        }

        Ok(point)
    }
}

impl<A, O> DispatchPoint<A, O> {
    /// Capture the registration log by implementation name.
    ///
    /// Every implementation, the default included, must be named.
    pub fn persist(&self) -> Result<PersistedDispatch, PersistError> {
        let default = self
            .default_implementation()
            .name()
            .ok_or_else(|| PersistError::Unnamed {
                point: self.name().to_string(),
                index: None,
            })?
            .to_string();

        let registrations = self
            .registrations()
            .iter()
            .enumerate()
            .map(|(index, registration)| {
                let implementation = registration.implementation().name().ok_or_else(|| {
                    PersistError::Unnamed {
                        point: self.name().to_string(),
                        index: Some(index),
                    }
                })?;
                Ok(PersistedRegistration {
                    predicate: registration.predicate().text().to_string(),
                    implementation: implementation.to_string(),
                    notice: registration.notice().cloned(),
                })
            })
            .collect::<Result<Vec<_>, PersistError>>()?;

        Ok(PersistedDispatch {
            name: self.name().to_string(),
            default,
            registrations,
        })
    }
}

/// Implementations available to a restore, by name.
pub struct ImplementationTable<A, O> {
    entries: HashMap<String, Implementation<A, O>>,
}

impl<A, O> ImplementationTable<A, O> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add a named implementation (builder style).
    pub fn with(mut self, implementation: Implementation<A, O>) -> Result<Self, PersistError> {
        self.insert(implementation)?;
        Ok(self)
    }

    /// Add a named implementation, replacing one with the same name.
    ///
    /// Unnamed implementations are rejected.
    pub fn insert(&mut self, implementation: Implementation<A, O>) -> Result<(), PersistError> {
        let name = implementation
            .name()
            .ok_or_else(|| PersistError::Unnamed {
                point: "implementation table".to_string(),
                index: None,
            })?
            .to_string();
        self.entries.insert(name, implementation);
        Ok(())
    }

    /// Look up an implementation.
    pub fn get(&self, name: &str) -> Option<&Implementation<A, O>> {
        self.entries.get(name)
    }

    /// Number of implementations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require(&self, name: &str) -> Result<Implementation<A, O>, PersistError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| PersistError::MissingImplementation(name.to_string()))
    }
}

impl<A, O> Default for ImplementationTable<A, O> {
    fn default() -> Self {
        Self::new()
    }
}
