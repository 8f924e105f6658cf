//! Shareable implementation handles.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use vdispatch_core::Invoke;

type BoxFn<A, O> = Box<dyn Fn(A) -> O + Send + Sync + 'static>;

struct Inner<A, O> {
    name: Option<String>,
    func: BoxFn<A, O>,
    slot: AtomicBool,
}

/// A cheaply cloneable handle to one implementation of a function.
///
/// Clones share identity: [`ptr_eq`](Self::ptr_eq) tells whether two handles
/// point at the same implementation. A handle becomes a *dispatch slot* once
/// it is the default of a [`DispatchPoint`](crate::DispatchPoint) or wraps a
/// whole dispatch point; slots cannot be registered as alternatives.
pub struct Implementation<A, O> {
    inner: Arc<Inner<A, O>>,
}

impl<A, O> Implementation<A, O> {
    /// Wrap a function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(A) -> O + Send + Sync + 'static,
    {
        Self::build(None, Box::new(func))
    }

    /// Wrap a function under a name.
    ///
    /// Names show up in error messages and are required for persistence.
    pub fn named<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(A) -> O + Send + Sync + 'static,
    {
        Self::build(Some(name.into()), Box::new(func))
    }

    fn build(name: Option<String>, func: BoxFn<A, O>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                func,
                slot: AtomicBool::new(false),
            }),
        }
    }

    /// The name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Call the implementation.
    pub fn call(&self, args: A) -> O {
        (self.inner.func)(args)
    }

    /// Whether both handles refer to the same implementation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether this implementation is managed by a dispatch point.
    pub fn is_dispatch_slot(&self) -> bool {
        self.inner.slot.load(Ordering::Acquire)
    }

    pub(crate) fn mark_dispatch_slot(&self) {
        self.inner.slot.store(true, Ordering::Release);
    }

    pub(crate) fn describe(&self) -> String {
        self.name().unwrap_or("<anonymous>").to_string()
    }
}

impl<A, O> Clone for Implementation<A, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, O> fmt::Debug for Implementation<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("name", &self.inner.name)
            .field("dispatch_slot", &self.is_dispatch_slot())
            .finish()
    }
}

impl<A, O> Invoke<A> for Implementation<A, O> {
    type Output = O;

    fn invoke(&self, args: A) -> O {
        self.call(args)
    }
}
