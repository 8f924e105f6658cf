//! Notices attached to registrations.
//!
//! A registration may carry a [`Notice`], typically a deprecation warning
//! for code paths kept only for old versions of a dependency. The notice is
//! reported on every call while that registration is the active one, and
//! never otherwise.

use std::fmt::{self, Display, Formatter};

/// The category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoticeKind {
    /// The active implementation is scheduled for removal.
    Deprecation,
    /// Anything else worth telling the caller.
    Warning,
}

/// A message reported when a noticed registration is called.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notice {
    /// The category.
    pub kind: NoticeKind,
    /// The message shown to the caller.
    pub message: String,
}

impl Notice {
    /// A deprecation notice.
    pub fn deprecation(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Deprecation,
            message: message.into(),
        }
    }

    /// A generic warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receives notices as they are raised.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot receive notices",
    label = "missing `NoticeHandler` implementation",
    note = "Implement `NoticeHandler::notify`."
)]
pub trait NoticeHandler: Send + Sync {
    /// Called once per call of a dispatch point whose active registration
    /// carries a notice.
    fn notify(&self, point: &str, notice: &Notice);
}

/// The default handler: logs notices as warnings.
///
/// Uses `tracing` when the feature is enabled, otherwise drops them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotices;

impl NoticeHandler for LogNotices {
    fn notify(&self, point: &str, notice: &Notice) {
        #[cfg(feature = "tracing")]
        {
            tracing::warn!(point = %point, kind = ?notice.kind, "{}", notice.message);
        }

        #[cfg(not(feature = "tracing"))]
        {
            let _ = (point, notice);
        }
    }
}

/// Discards every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreNotices;

impl NoticeHandler for IgnoreNotices {
    fn notify(&self, _point: &str, _notice: &Notice) {}
}
