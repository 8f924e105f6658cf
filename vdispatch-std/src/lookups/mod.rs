//! # Lookup Implementations
//!
//! Ready-made [`VersionLookup`](vdispatch_core::VersionLookup)s:
//!
//! | Lookup | Use Case |
//! |--------|----------|
//! | [`MapLookup`] | Fixed table of subject versions |
//! | [`PlatformLookup`] | Reserved subjects (`os`, `arch`, host runtime) before a fallback |
//! | [`OverrideLookup`] | A fixed set of answers layered over another lookup |
//! | [`ScopedLookup`] | Stack of temporary overrides, each removed by its guard |

pub mod map;
pub mod overlay;
pub mod platform;

pub use map::MapLookup;
pub use overlay::{OverrideLookup, PretendGuard, ScopedLookup};
pub use platform::PlatformLookup;
