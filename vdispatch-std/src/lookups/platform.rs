//! Reserved subjects answered without the generic lookup.
//!
//! Some subjects are facts about the running process rather than installed
//! components: the operating system, the CPU architecture, the version of a
//! host runtime. [`PlatformLookup`] answers those itself (matching names
//! case-insensitively) and hands everything else to a fallback lookup.

use vdispatch_core::{LookupError, VersionLookup};

/// Answers reserved subjects, delegates the rest.
///
/// By default `os` resolves to [`std::env::consts::OS`], `arch` to
/// [`std::env::consts::ARCH`] and `platform` to [`std::env::consts::FAMILY`].
/// These are the label subjects of [`SubjectRules::new`](vdispatch_core::SubjectRules::new).
///
/// # Example
///
/// ```rust
/// use vdispatch_core::VersionLookup;
/// use vdispatch_std::lookups::{MapLookup, PlatformLookup};
///
/// let lookup = PlatformLookup::new(MapLookup::new()).with_runtime("python", "3.11.4");
/// assert_eq!(lookup.resolve("Python").unwrap(), "3.11.4");
/// assert_eq!(lookup.resolve("os").unwrap(), std::env::consts::OS);
/// ```
#[derive(Debug, Clone)]
pub struct PlatformLookup<L> {
    reserved: Vec<(String, String)>,
    fallback: L,
}

impl<L: VersionLookup> PlatformLookup<L> {
    /// Reserve `os`, `arch` and `platform` in front of `fallback`.
    pub fn new(fallback: L) -> Self {
        Self::without_defaults(fallback)
            .with_subject("os", std::env::consts::OS)
            .with_subject("arch", std::env::consts::ARCH)
            .with_subject("platform", std::env::consts::FAMILY)
    }

    /// No reserved subjects; add them with [`with_subject`](Self::with_subject).
    pub fn without_defaults(fallback: L) -> Self {
        Self {
            reserved: Vec::new(),
            fallback,
        }
    }

    /// Reserve `name` with a fixed value, replacing any previous value.
    pub fn with_subject(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.reserved.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.reserved.push((name, value)),
        }
        self
    }

    /// Reserve the name of a host runtime (e.g. `python`) with its version.
    ///
    /// Same as [`with_subject`](Self::with_subject); the version is expected
    /// to be a valid version so that ordering operators work on it.
    pub fn with_runtime(self, name: &str, version: impl Into<String>) -> Self {
        self.with_subject(name, version)
    }

    /// Whether `name` is reserved.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_value(name).is_some()
    }

    /// The fallback lookup.
    pub fn fallback(&self) -> &L {
        &self.fallback
    }

    fn reserved_value(&self, name: &str) -> Option<&str> {
        self.reserved
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl<L: VersionLookup> VersionLookup for PlatformLookup<L> {
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        match self.reserved_value(subject) {
            Some(value) => Ok(value.to_string()),
            None => self.fallback.resolve(subject),
        }
    }
}
