//! # Dispatch Points
//!
//! A [`DispatchPoint`] stands in for a function that has several
//! implementations, one per range of installed versions. It starts out with
//! a default implementation; each [`register`](DispatchPoint::register) call
//! adds an alternative guarded by a predicate set, evaluates the predicate
//! immediately, and makes the alternative active if it matches. The most
//! recently registered matching alternative wins.
//!
//! Predicates are evaluated once per registration (and once per
//! [`reset`](DispatchPoint::reset)), never per call: calling a dispatch point
//! is a plain call of the active implementation.
//!
//! # Example
//!
//! ```rust
//! use vdispatch_std::{DispatchPoint, Implementation, lookups::MapLookup};
//!
//! let lookup = MapLookup::new().with("rich", "0.5");
//! let mut greet = DispatchPoint::new(
//!     Implementation::named("greet", |name: &str| format!("hello {name}")),
//!     lookup,
//! );
//! greet
//!     .register("rich<1.0", Implementation::new(|name: &str| format!("hi {name}")))
//!     .unwrap();
//!
//! assert_eq!(greet.call("you"), "hi you");
//! assert_eq!(greet.matched_predicate(), "rich<1.0");
//! ```
//!
//! # Concurrency
//!
//! `register` and `reset` take `&mut self`, `call` takes `&self`. A dispatch
//! point shared between threads must be wrapped in a lock by its owner.

use crate::{
    error::DispatchError,
    implementation::Implementation,
    lookups::{MapLookup, PlatformLookup},
    notice::{LogNotices, Notice, NoticeHandler},
};
use std::{fmt, sync::Arc};
use vdispatch_core::{
    Invoke, PredicateError, PredicateEvaluator, PredicateSet, SubjectRules, VersionLookup,
};

/// One entry of a dispatch point's registration log.
pub struct Registration<A, O> {
    predicate: PredicateSet,
    implementation: Implementation<A, O>,
    notice: Option<Notice>,
}

impl<A, O> Registration<A, O> {
    /// Parse `predicate` and pair it with an implementation.
    pub fn new(
        predicate: &str,
        implementation: Implementation<A, O>,
        notice: Option<Notice>,
    ) -> Result<Self, PredicateError> {
        Ok(Self {
            predicate: PredicateSet::parse(predicate)?,
            implementation,
            notice,
        })
    }

    /// The guarding predicate set.
    pub fn predicate(&self) -> &PredicateSet {
        &self.predicate
    }

    /// The alternative implementation.
    pub fn implementation(&self) -> &Implementation<A, O> {
        &self.implementation
    }

    /// The notice raised while this registration is active.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

impl<A, O> Clone for Registration<A, O> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            implementation: self.implementation.clone(),
            notice: self.notice.clone(),
        }
    }
}

impl<A, O> fmt::Debug for Registration<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("predicate", &self.predicate.text())
            .field("implementation", &self.implementation)
            .field("notice", &self.notice)
            .finish()
    }
}

// ============================================================================
// DispatchPointBuilder - for configuring dispatch points
// ============================================================================

/// Builder for a [`DispatchPoint`].
///
/// # Example
/// ```ignore
/// let point = DispatchPoint::builder(default_impl)
///     .name("load")
///     .lookup(my_lookup)
///     .subject_rules(SubjectRules::new().with_label("distro"))
///     .notice_handler(RecordingNotices::new())
///     .build();
/// ```
pub struct DispatchPointBuilder<A, O> {
    name: Option<String>,
    default: Implementation<A, O>,
    lookup: Option<Arc<dyn VersionLookup>>,
    rules: SubjectRules,
    notices: Arc<dyn NoticeHandler>,
}

impl<A, O> DispatchPointBuilder<A, O> {
    /// Start from the default implementation.
    pub fn new(default: Implementation<A, O>) -> Self {
        Self {
            name: None,
            default,
            lookup: None,
            rules: SubjectRules::new(),
            notices: Arc::new(LogNotices),
        }
    }

    /// Name used in messages; defaults to the default implementation's name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The lookup that answers subject versions.
    ///
    /// Without one, only the platform subjects (`os`, `arch`) resolve.
    pub fn lookup<L: VersionLookup + 'static>(self, lookup: L) -> Self {
        self.shared_lookup(Arc::new(lookup))
    }

    /// Share an existing lookup.
    pub fn shared_lookup(mut self, lookup: Arc<dyn VersionLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Which subjects are compared as plain strings.
    pub fn subject_rules(mut self, rules: SubjectRules) -> Self {
        self.rules = rules;
        self
    }

    /// Where notices go; defaults to [`LogNotices`].
    pub fn notice_handler<H: NoticeHandler + 'static>(mut self, handler: H) -> Self {
        self.notices = Arc::new(handler);
        self
    }

    /// Build a dispatch point with an empty registration log.
    pub fn build(self) -> DispatchPoint<A, O> {
        let name = self
            .name
            .or_else(|| self.default.name().map(str::to_string))
            .unwrap_or_else(|| "dispatch point".to_string());
        let lookup = self
            .lookup
            .unwrap_or_else(|| Arc::new(PlatformLookup::new(MapLookup::new())));

        self.default.mark_dispatch_slot();
        DispatchPoint {
            name,
            active: self.default.clone(),
            default: self.default,
            registrations: Vec::new(),
            matched: None,
            lookup,
            rules: self.rules,
            notices: self.notices,
        }
    }

    /// Build a dispatch point from an existing registration log.
    ///
    /// The log is replayed in order against the configured lookup, exactly
    /// as if every entry had been registered on a fresh point.
    pub fn replay(
        self,
        log: impl IntoIterator<Item = Registration<A, O>>,
    ) -> Result<DispatchPoint<A, O>, DispatchError> {
        let mut point = self.build();
        for registration in log {
            point.check_nesting(&registration.implementation)?;
            point.registrations.push(registration);
        }
        point.reset()?;
        Ok(point)
    }
}

// ============================================================================
// DispatchPoint - version-selected implementation
// ============================================================================

/// A function whose implementation is chosen by installed versions.
///
/// `A` is the argument type (use a tuple for several arguments) and `O` the
/// return type.
pub struct DispatchPoint<A, O> {
    name: String,
    default: Implementation<A, O>,
    registrations: Vec<Registration<A, O>>,
    active: Implementation<A, O>,
    matched: Option<usize>,
    lookup: Arc<dyn VersionLookup>,
    rules: SubjectRules,
    notices: Arc<dyn NoticeHandler>,
}

impl<A, O> DispatchPoint<A, O> {
    /// Create a dispatch point over `default`, resolving subjects with `lookup`.
    pub fn new<L: VersionLookup + 'static>(default: Implementation<A, O>, lookup: L) -> Self {
        DispatchPointBuilder::new(default).lookup(lookup).build()
    }

    /// Configure a dispatch point step by step.
    pub fn builder(default: Implementation<A, O>) -> DispatchPointBuilder<A, O> {
        DispatchPointBuilder::new(default)
    }

    /// Register `implementation` for the versions matched by `predicate`.
    ///
    /// `predicate` is one or more `subject<op>version` clauses separated by
    /// `,` or `;`, all of which must hold. On success the registration is
    /// logged and, if it matches, becomes active. Returns the implementation
    /// that is active afterwards.
    ///
    /// Nothing changes when an error is returned.
    pub fn register(
        &mut self,
        predicate: &str,
        implementation: Implementation<A, O>,
    ) -> Result<Implementation<A, O>, DispatchError> {
        self.register_entry(predicate, implementation, None)
    }

    /// Like [`register`](Self::register), raising `notice` on every call
    /// while this registration is the active one.
    pub fn register_with_notice(
        &mut self,
        predicate: &str,
        implementation: Implementation<A, O>,
        notice: Notice,
    ) -> Result<Implementation<A, O>, DispatchError> {
        self.register_entry(predicate, implementation, Some(notice))
    }

    fn register_entry(
        &mut self,
        predicate: &str,
        implementation: Implementation<A, O>,
        notice: Option<Notice>,
    ) -> Result<Implementation<A, O>, DispatchError> {
        let registration = Registration::new(predicate, implementation, notice)
            .map_err(|source| self.predicate_error(source))?;
        let matched = self.evaluate(&registration.predicate)?;
        self.check_nesting(&registration.implementation)?;

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                point = %self.name,
                predicate = %registration.predicate,
                matched,
                "registered implementation"
            );
        }

        self.registrations.push(registration);
        if matched {
            self.select(Some(self.registrations.len() - 1));
        }
        Ok(self.active.clone())
    }

    /// Re-evaluate every registration against the current lookup answers.
    ///
    /// Replays the log in registration order starting from the default, so
    /// the last matching registration wins, as it would on a freshly built
    /// point. On error the previous selection is kept.
    pub fn reset(&mut self) -> Result<(), DispatchError> {
        let mut matched = None;
        for (index, registration) in self.registrations.iter().enumerate() {
            if self.evaluate(&registration.predicate)? {
                matched = Some(index);
            }
        }

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                point = %self.name,
                registrations = self.registrations.len(),
                matched = ?matched.map(|index| self.registrations[index].predicate.text()),
                "replayed registrations"
            );
        }

        self.select(matched);
        Ok(())
    }

    /// Replace the lookup, then [`reset`](Self::reset).
    pub fn reset_with<L: VersionLookup + 'static>(&mut self, lookup: L) -> Result<(), DispatchError> {
        let previous = std::mem::replace(&mut self.lookup, Arc::new(lookup));
        self.reset().inspect_err(|_| self.lookup = previous)
    }

    /// Call the active implementation.
    ///
    /// If the active registration carries a notice, it is reported first.
    pub fn call(&self, args: A) -> O {
        if let Some(notice) = self.pending_notice() {
            self.notices.notify(&self.name, notice);
        }
        self.active.call(args)
    }

    /// The name used in messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The implementation given at construction.
    pub fn default_implementation(&self) -> &Implementation<A, O> {
        &self.default
    }

    /// The implementation that [`call`](Self::call) currently runs.
    pub fn active(&self) -> &Implementation<A, O> {
        &self.active
    }

    /// Whether no registration matched.
    pub fn is_default_active(&self) -> bool {
        self.matched.is_none()
    }

    /// Predicate text of the active registration, empty when the default is active.
    pub fn matched_predicate(&self) -> &str {
        self.matched_registration()
            .map_or("", |registration| registration.predicate.text())
    }

    /// The notice raised by calls, if any.
    pub fn pending_notice(&self) -> Option<&Notice> {
        self.matched_registration()
            .and_then(|registration| registration.notice.as_ref())
    }

    /// The registration log, in registration order.
    pub fn registrations(&self) -> &[Registration<A, O>] {
        &self.registrations
    }

    /// The lookup in use.
    pub fn lookup(&self) -> &Arc<dyn VersionLookup> {
        &self.lookup
    }

    /// The subject rules in use.
    pub fn subject_rules(&self) -> &SubjectRules {
        &self.rules
    }

    /// Turn this dispatch point into a plain implementation.
    ///
    /// The result is a dispatch slot: it cannot be registered on another
    /// dispatch point.
    pub fn into_implementation(self) -> Implementation<A, O>
    where
        A: 'static,
        O: 'static,
    {
        let implementation = Implementation::named(self.name.clone(), move |args| self.call(args));
        implementation.mark_dispatch_slot();
        implementation
    }

    fn matched_registration(&self) -> Option<&Registration<A, O>> {
        self.matched.map(|index| &self.registrations[index])
    }

    fn select(&mut self, matched: Option<usize>) {
        self.active = match matched {
            Some(index) => self.registrations[index].implementation.clone(),
            None => self.default.clone(),
        };
        self.matched = matched;
    }

    fn evaluate(&self, predicate: &PredicateSet) -> Result<bool, DispatchError> {
        PredicateEvaluator::new(self.lookup.as_ref(), &self.rules)
            .evaluate(predicate)
            .map_err(|source| self.predicate_error(source))
    }

    fn check_nesting(&self, implementation: &Implementation<A, O>) -> Result<(), DispatchError> {
        if implementation.is_dispatch_slot() {
            return Err(DispatchError::Nesting {
                point: self.name.clone(),
                implementation: implementation.describe(),
            });
        }
        Ok(())
    }

    fn predicate_error(&self, source: PredicateError) -> DispatchError {
        DispatchError::Predicate {
            point: self.name.clone(),
            source,
        }
    }
}

impl<A, O> Invoke<A> for DispatchPoint<A, O> {
    type Output = O;

    fn invoke(&self, args: A) -> O {
        self.call(args)
    }
}

impl<A, O> fmt::Debug for DispatchPoint<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchPoint")
            .field("name", &self.name)
            .field("matched", &self.matched_predicate())
            .field("registrations", &self.registrations)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Bound - explicit receiver binding
// ============================================================================

/// A dispatch point with its first argument fixed.
///
/// Dispatch points standing in for methods take the receiver as the first
/// element of their argument tuple; [`DispatchPoint::bind`] fixes it.
pub struct Bound<'a, C, A, O> {
    point: &'a DispatchPoint<(C, A), O>,
    context: C,
}

impl<C, A, O> DispatchPoint<(C, A), O> {
    /// Fix the receiver.
    pub fn bind(&self, context: C) -> Bound<'_, C, A, O> {
        Bound {
            point: self,
            context,
        }
    }
}

impl<C: Clone, A, O> Bound<'_, C, A, O> {
    /// Call the active implementation with the bound receiver.
    pub fn call(&self, args: A) -> O {
        self.point.call((self.context.clone(), args))
    }

    /// The bound receiver.
    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<C, A, O> Invoke<A> for Bound<'_, C, A, O>
where
    C: Clone + Send + Sync,
{
    type Output = O;

    fn invoke(&self, args: A) -> O {
        self.call(args)
    }
}
