//! Testing utilities for vdispatch.
//!
//! This module provides utilities to make testing dispatch points easier.
//!
//! # Features
//!
//! - [`CountingLookup`]: A lookup wrapper that counts how often subjects are resolved
//! - [`RecordingNotices`]: A notice handler that records every notice it receives

use crate::notice::{Notice, NoticeHandler};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use vdispatch_core::{LookupError, VersionLookup};

// ============================================================================
// Counting Lookup
// ============================================================================

/// A lookup that counts resolve calls before delegating.
///
/// Useful for verifying that predicates are evaluated at registration time
/// and not on every call.
///
/// # Example
///
/// ```rust,ignore
/// let lookup = Arc::new(CountingLookup::new(MapLookup::new().with("rich", "13.0")));
/// let mut point = DispatchPoint::builder(default_impl)
///     .shared_lookup(lookup.clone())
///     .build();
///
/// point.register("rich<1.0", old_impl)?;
/// point.call(());
/// point.call(());
///
/// assert_eq!(lookup.calls(), 1);
/// ```
pub struct CountingLookup<L> {
    inner: L,
    calls: AtomicUsize,
}

impl<L: VersionLookup> CountingLookup<L> {
    /// Wrap `inner`.
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of resolve calls so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

impl<L: VersionLookup> VersionLookup for CountingLookup<L> {
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(subject)
    }
}

// ============================================================================
// Recording Notices
// ============================================================================

/// A notice handler that records every notice with the point that raised it.
///
/// Clones share the same record.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingNotices::new();
/// let mut point = DispatchPoint::builder(default_impl)
///     .notice_handler(recorder.clone())
///     .build();
///
/// point.call(());
/// assert_eq!(recorder.count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct RecordingNotices {
    notices: Arc<Mutex<Vec<(String, Notice)>>>,
}

impl RecordingNotices {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded `(point, notice)` pairs.
    pub fn notices(&self) -> Vec<(String, Notice)> {
        self.notices.lock().unwrap().clone()
    }

    /// Get the recorded messages only.
    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|(_, notice)| notice.message.clone())
            .collect()
    }

    /// Get the number of recorded notices.
    pub fn count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }

    /// Clear all recorded notices.
    pub fn clear(&self) {
        self.notices.lock().unwrap().clear();
    }
}

impl NoticeHandler for RecordingNotices {
    fn notify(&self, point: &str, notice: &Notice) {
        self.notices
            .lock()
            .unwrap()
            .push((point.to_string(), notice.clone()));
    }
}
