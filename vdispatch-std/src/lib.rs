//! # vdispatch-std
//!
//! Dispatch points and standard lookups for the vdispatch framework.
//!
//! This crate provides:
//! - **Dispatch points**: [`DispatchPoint`], [`DispatchPointBuilder`], [`Implementation`]
//! - **Lookups**: [`MapLookup`](lookups::MapLookup), [`PlatformLookup`](lookups::PlatformLookup),
//!   [`ScopedLookup`](lookups::ScopedLookup) with pretend guards
//! - **Notices**: [`Notice`], [`NoticeHandler`], [`LogNotices`]
//! - **Persistence**: [`PersistedDispatch`], [`ImplementationTable`]
//!
//! # Features
//!
//! - `tracing` (default): debug logs for registration and replay, notices
//!   logged as warnings
//! - `serde`: `Serialize`/`Deserialize` for versions, notices and saved
//!   dispatch points

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use vdispatch_core;

// Modules
pub mod dispatch;
pub mod error;
pub mod implementation;
pub mod lookups;
pub mod notice;
pub mod persist;
pub mod testing;

pub use dispatch::{Bound, DispatchPoint, DispatchPointBuilder, Registration};
pub use error::{DispatchError, PersistError, VdispatchError};
pub use implementation::Implementation;
pub use notice::{IgnoreNotices, LogNotices, Notice, NoticeHandler, NoticeKind};
pub use persist::{ImplementationTable, PersistedDispatch, PersistedRegistration};
