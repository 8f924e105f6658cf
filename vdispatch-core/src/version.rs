//! # Version Parser
//!
//! Parses version strings following the PEP 440 grammar:
//!
//! ```text
//! [N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]
//! ```
//!
//! Parsing is lenient the same way the standard is: the input is
//! case-insensitive, may be surrounded by whitespace, may start with a `v`,
//! and accepts alternate spellings (`alpha`, `beta`, `c`, `pre`, `preview`,
//! `rev`, `r`) and separators (`-`, `_`, `.`). A parsed [`Version`] always
//! renders back in its normalized form.
//!
//! # Example
//!
//! ```rust
//! use vdispatch_core::Version;
//!
//! let v: Version = "V1.0-Alpha_2.r3-DEV".parse().unwrap();
//! assert_eq!(v.to_string(), "1.0a2.post3.dev0");
//! ```

use crate::{error::ParseError, ordering::ComparisonKey};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

/// The version grammar, not anchored so that it can be embedded.
pub const VERSION_PATTERN: &str = r"
    v?
    (?:
        (?:(?P<epoch>[0-9]+)!)?                           # epoch
        (?P<release>[0-9]+(?:\.[0-9]+)*)                  # release segment
        (?P<pre>                                          # pre-release
            [-_\.]?
            (?P<pre_l>(a|b|c|rc|alpha|beta|pre|preview))
            [-_\.]?
            (?P<pre_n>[0-9]+)?
        )?
        (?P<post>                                         # post release
            (?:-(?P<post_n1>[0-9]+))
            |
            (?:
                [-_\.]?
                (?P<post_l>post|rev|r)
                [-_\.]?
                (?P<post_n2>[0-9]+)?
            )
        )?
        (?P<dev>                                          # dev release
            [-_\.]?
            (?P<dev_l>dev)
            [-_\.]?
            (?P<dev_n>[0-9]+)?
        )?
    )
    (?:\+(?P<local>[a-z0-9]+(?:[-_\.][a-z0-9]+)*))?       # local version
";

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?xi)^\s*{VERSION_PATTERN}\s*$"))
        .expect("version pattern is a valid regex")
});

/// The kind of a pre-release, in release order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PreTag {
    /// `a`, also spelled `alpha`.
    Alpha,
    /// `b`, also spelled `beta`.
    Beta,
    /// `rc`, also spelled `c`, `pre` or `preview`.
    Rc,
}

impl PreTag {
    /// The normalized spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            PreTag::Alpha => "a",
            PreTag::Beta => "b",
            PreTag::Rc => "rc",
        }
    }

    fn from_spelling(spelling: &str) -> Option<Self> {
        match spelling.to_lowercase().as_str() {
            "a" | "alpha" => Some(PreTag::Alpha),
            "b" | "beta" => Some(PreTag::Beta),
            "c" | "rc" | "pre" | "preview" => Some(PreTag::Rc),
            _ => None,
        }
    }
}

impl Display for PreTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pre-release segment such as `rc1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreRelease {
    /// The normalized tag.
    pub tag: PreTag,
    /// The pre-release number, 0 when omitted.
    pub number: u64,
}

impl Display for PreRelease {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag, self.number)
    }
}

/// One dot-separated piece of a local version label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalSegment {
    /// A purely numeric segment.
    Numeric(u64),
    /// Any other segment, lowercased.
    Alpha(String),
}

impl Display for LocalSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Numeric(n) => write!(f, "{n}"),
            LocalSegment::Alpha(s) => f.write_str(s),
        }
    }
}

/// A parsed, normalized version.
///
/// Equality, hashing and ordering go through the version's
/// [`ComparisonKey`], so two versions compare equal when they mean the same
/// thing (`1.0 == 1.0.0`), not when they are spelled the same.
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<PreRelease>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<Vec<LocalSegment>>,
    key: ComparisonKey,
}

impl Version {
    /// Parse a version string.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let captures = VERSION_RE
            .captures(input)
            .ok_or_else(|| ParseError::new(input))?;
        Self::from_captures(input, &captures)
    }

    /// Build a plain release version such as `1.2.3`.
    ///
    /// Fails if `release` is empty.
    pub fn from_release(release: impl Into<Vec<u64>>) -> Result<Self, ParseError> {
        let release = release.into();
        if release.is_empty() {
            return Err(ParseError::new(""));
        }
        Ok(Self::assemble(0, release, None, None, None, None))
    }

    fn from_captures(input: &str, captures: &Captures<'_>) -> Result<Self, ParseError> {
        let number = |text: &str| text.parse::<u64>().map_err(|_| ParseError::new(input));
        let group = |name: &str| captures.name(name).map(|m| m.as_str());

        let epoch = group("epoch").map(number).transpose()?.unwrap_or(0);

        let release = group("release")
            .ok_or_else(|| ParseError::new(input))?
            .split('.')
            .map(number)
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match group("pre_l") {
            Some(spelling) => {
                let tag = PreTag::from_spelling(spelling).ok_or_else(|| ParseError::new(input))?;
                let number = group("pre_n").map(number).transpose()?.unwrap_or(0);
                Some(PreRelease { tag, number })
            }
            None => None,
        };

        // The implicit `-N` form takes precedence over the lettered form.
        let post = match (group("post_n1"), group("post_l")) {
            (Some(implicit), _) => Some(number(implicit)?),
            (None, Some(_)) => Some(group("post_n2").map(number).transpose()?.unwrap_or(0)),
            (None, None) => None,
        };

        let dev = match group("dev_l") {
            Some(_) => Some(group("dev_n").map(number).transpose()?.unwrap_or(0)),
            None => None,
        };

        let local = group("local")
            .map(|label| parse_local(input, label))
            .transpose()?;

        Ok(Self::assemble(epoch, release, pre, post, dev, local))
    }

    fn assemble(
        epoch: u64,
        release: Vec<u64>,
        pre: Option<PreRelease>,
        post: Option<u64>,
        dev: Option<u64>,
        local: Option<Vec<LocalSegment>>,
    ) -> Self {
        let key = ComparisonKey::new(epoch, &release, pre, post, dev, local.as_deref());
        Self {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
            key,
        }
    }

    /// The epoch, 0 when absent.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The release numbers, never empty.
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// The pre-release segment, if any.
    pub fn pre(&self) -> Option<PreRelease> {
        self.pre
    }

    /// The post-release number, if any.
    pub fn post(&self) -> Option<u64> {
        self.post
    }

    /// The dev-release number, if any.
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// The local version segments, if any.
    pub fn local(&self) -> Option<&[LocalSegment]> {
        self.local.as_deref()
    }

    /// The local version label rendered with `.` separators.
    pub fn local_label(&self) -> Option<String> {
        self.local.as_deref().map(join_local)
    }

    /// First release number.
    pub fn major(&self) -> u64 {
        self.release_at(0)
    }

    /// Second release number, 0 when absent.
    pub fn minor(&self) -> u64 {
        self.release_at(1)
    }

    /// Third release number, 0 when absent.
    pub fn micro(&self) -> u64 {
        self.release_at(2)
    }

    fn release_at(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Whether this is a pre-release or a dev-release.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Whether this has a post-release segment.
    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    /// Whether this has a dev-release segment.
    pub fn is_devrelease(&self) -> bool {
        self.dev.is_some()
    }

    /// Whether this has a local version label.
    pub fn is_local(&self) -> bool {
        self.local.is_some()
    }

    /// The normalized version without its local label.
    pub fn public(&self) -> String {
        let mut rendered = self.to_string();
        if let Some(plus) = rendered.find('+') {
            rendered.truncate(plus);
        }
        rendered
    }

    /// Epoch and release only, e.g. `1!2.0` for `1!2.0rc1.post3`.
    pub fn base_version(&self) -> String {
        let mut rendered = String::new();
        if self.epoch != 0 {
            rendered.push_str(&format!("{}!", self.epoch));
        }
        rendered.push_str(&join_release(&self.release));
        rendered
    }

    /// The key used for all comparisons.
    pub fn key(&self) -> &ComparisonKey {
        &self.key
    }
}

fn parse_local(input: &str, label: &str) -> Result<Vec<LocalSegment>, ParseError> {
    label
        .split(['.', '_', '-'])
        .map(|part| {
            if part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse()
                    .map(LocalSegment::Numeric)
                    .map_err(|_| ParseError::new(input))
            } else {
                Ok(LocalSegment::Alpha(part.to_lowercase()))
            }
        })
        .collect()
}

fn join_release(release: &[u64]) -> String {
    release
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn join_local(local: &[LocalSegment]) -> String {
    local
        .iter()
        .map(LocalSegment::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_version())?;
        if let Some(pre) = self.pre {
            write!(f, "{pre}")?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{post}")?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{dev}")?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", join_local(local))?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl TryFrom<&str> for Version {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Version::parse(value)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Version::parse(&text).map_err(serde::de::Error::custom)
    }
}
