//! Temporary overrides of a lookup.
//!
//! [`OverrideLookup`] is an immutable composition: fixed answers first, the
//! wrapped lookup for everything else. [`ScopedLookup`] keeps a stack of
//! such layers; [`ScopedLookup::pretend`] pushes one and returns a guard that
//! removes it when dropped, so the previous answers come back on every exit
//! path (normal return, `?`, or unwinding). Each guard owns exactly its own
//! layer, whatever order guards are dropped in.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vdispatch_core::VersionLookup;
//! use vdispatch_std::lookups::{MapLookup, ScopedLookup};
//!
//! let lookup = Arc::new(ScopedLookup::new(MapLookup::new().with("rich", "13.0")));
//! {
//!     let _guard = lookup.pretend([("rich", "0.1")]);
//!     assert_eq!(lookup.resolve("rich").unwrap(), "0.1");
//! }
//! assert_eq!(lookup.resolve("rich").unwrap(), "13.0");
//! ```

use super::map::MapLookup;
use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};
use vdispatch_core::{LookupError, VersionLookup};

/// Fixed answers layered over another lookup.
#[derive(Debug, Clone)]
pub struct OverrideLookup<L> {
    overrides: MapLookup,
    base: L,
}

impl<L: VersionLookup> OverrideLookup<L> {
    /// Answer from `overrides` first, then from `base`.
    pub fn new(base: L, overrides: MapLookup) -> Self {
        Self { overrides, base }
    }

    /// The wrapped lookup.
    pub fn base(&self) -> &L {
        &self.base
    }

    /// Unwrap into the base lookup.
    pub fn into_base(self) -> L {
        self.base
    }
}

impl<L: VersionLookup> VersionLookup for OverrideLookup<L> {
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        match self.overrides.get(subject) {
            Some(version) => Ok(version.to_string()),
            None => self.base.resolve(subject),
        }
    }
}

/// A lookup with a stack of temporary overrides.
///
/// Layers pushed later shadow earlier ones.
pub struct ScopedLookup {
    base: Arc<dyn VersionLookup>,
    layers: RwLock<Vec<(u64, MapLookup)>>,
    next_id: AtomicU64,
}

impl ScopedLookup {
    /// Wrap `base` with an empty override stack.
    pub fn new<L: VersionLookup + 'static>(base: L) -> Self {
        Self::from_arc(Arc::new(base))
    }

    /// Wrap an already shared lookup.
    pub fn from_arc(base: Arc<dyn VersionLookup>) -> Self {
        Self {
            base,
            layers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Pretend the given versions are installed until the guard is dropped.
    pub fn pretend<I, K, V>(&self, versions: I) -> PretendGuard<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let layer = versions.into_iter().collect();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.layers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, layer));
        PretendGuard { scope: self, id }
    }

    /// Run `f` with the given versions pretended, restoring afterwards.
    pub fn with_pretend<I, K, V, R>(&self, versions: I, f: impl FnOnce() -> R) -> R
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let _guard = self.pretend(versions);
        f()
    }

    /// Number of active override layers.
    pub fn depth(&self) -> usize {
        self.layers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn remove(&self, id: u64) {
        self.layers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(layer_id, _)| *layer_id != id);
    }
}

impl VersionLookup for ScopedLookup {
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        {
            let layers = self.layers.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(version) = layers.iter().rev().find_map(|(_, layer)| layer.get(subject)) {
                return Ok(version.to_string());
            }
        }
        self.base.resolve(subject)
    }
}

/// Removes its override layer from a [`ScopedLookup`] when dropped.
///
/// Layers pushed after it, and owned by other guards, stay in place.
#[must_use = "the override is removed as soon as the guard is dropped"]
pub struct PretendGuard<'a> {
    scope: &'a ScopedLookup,
    id: u64,
}

impl Drop for PretendGuard<'_> {
    fn drop(&mut self) {
        self.scope.remove(self.id);
    }
}
