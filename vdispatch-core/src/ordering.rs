//! # Version Comparator
//!
//! Every [`Version`](crate::Version) carries a [`ComparisonKey`], a tuple whose
//! derived ordering is the total order of the standard:
//!
//! | position | absent                                  | present            |
//! |----------|-----------------------------------------|--------------------|
//! | epoch    | 0                                       | the number         |
//! | release  | -                                       | trailing zeros cut |
//! | pre      | before everything if dev-only, else after everything | `(tag, n)` |
//! | post     | before any post                         | `n`                |
//! | dev      | after any dev                           | `n`                |
//! | local    | before any local                        | segment-wise       |
//!
//! The infinities are encoded as enum variants declared first or last, so
//! that `#[derive(Ord)]` does the work.

use crate::version::{LocalSegment, PreRelease, PreTag};

/// Sort position of the pre-release segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreKey {
    /// Dev-only release: sorts before every pre-release of the same release.
    NegInfinity,
    /// An actual pre-release.
    Tagged(PreTag, u64),
    /// No pre-release: sorts after every pre-release.
    Infinity,
}

/// Sort position of the post-release segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PostKey {
    /// No post-release.
    Absent,
    /// `.postN`
    Tagged(u64),
}

/// Sort position of the dev-release segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DevKey {
    /// `.devN`
    Tagged(u64),
    /// No dev-release: more final than any dev-release.
    Absent,
}

/// One local segment inside a [`LocalKey`].
///
/// Alphanumeric segments sort before numeric ones at the same position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalPart {
    /// Lowercase alphanumeric segment, compared lexicographically.
    Alpha(String),
    /// Numeric segment, compared numerically.
    Numeric(u64),
}

/// Sort position of the local label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalKey {
    /// No local label.
    Absent,
    /// Segment-wise comparison, a shorter shared prefix sorts first.
    Segments(Vec<LocalPart>),
}

/// The sortable form of a version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComparisonKey {
    epoch: u64,
    release: Vec<u64>,
    pre: PreKey,
    post: PostKey,
    dev: DevKey,
    local: LocalKey,
}

impl ComparisonKey {
    pub(crate) fn new(
        epoch: u64,
        release: &[u64],
        pre: Option<PreRelease>,
        post: Option<u64>,
        dev: Option<u64>,
        local: Option<&[LocalSegment]>,
    ) -> Self {
        let significant = release
            .iter()
            .rposition(|&n| n != 0)
            .map_or(0, |last| last + 1);

        let pre = match (pre, post, dev) {
            (None, None, Some(_)) => PreKey::NegInfinity,
            (None, _, _) => PreKey::Infinity,
            (Some(pre), _, _) => PreKey::Tagged(pre.tag, pre.number),
        };

        let local = match local {
            None => LocalKey::Absent,
            Some(segments) => LocalKey::Segments(
                segments
                    .iter()
                    .map(|segment| match segment {
                        LocalSegment::Numeric(n) => LocalPart::Numeric(*n),
                        LocalSegment::Alpha(s) => LocalPart::Alpha(s.clone()),
                    })
                    .collect(),
            ),
        };

        Self {
            epoch,
            release: release[..significant].to_vec(),
            pre,
            post: post.map_or(PostKey::Absent, PostKey::Tagged),
            dev: dev.map_or(DevKey::Absent, DevKey::Tagged),
            local,
        }
    }

    /// Compute the key of a version.
    pub fn from_version(version: &crate::Version) -> Self {
        version.key().clone()
    }

    /// The epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Release numbers with trailing zeros removed.
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// The pre-release position.
    pub fn pre(&self) -> PreKey {
        self.pre
    }

    /// The post-release position.
    pub fn post(&self) -> PostKey {
        self.post
    }

    /// The dev-release position.
    pub fn dev(&self) -> DevKey {
        self.dev
    }

    /// The local label position.
    pub fn local(&self) -> &LocalKey {
        &self.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Version;
    use pretty_assertions::assert_eq;
    use std::cmp::Ordering;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_trailing_zeros_are_equal() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert_eq!(v("0"), v("0.0"));
        assert_eq!(v("1.0").key().release(), &[1]);
        assert_eq!(v("0.0").key().release(), &[] as &[u64]);
        assert!(v("1.0") < v("1.0.1"));
    }

    #[test]
    fn test_dev_sorts_before_pre() {
        assert!(v("1.0.dev0") < v("1.0a0"));
        assert_eq!(v("1.0.dev0").key().pre(), PreKey::NegInfinity);
        // With a pre segment the dev rule applies inside the pre-release.
        assert!(v("1.0a1.dev1") < v("1.0a1"));
    }

    #[test]
    fn test_release_sorts_before_post() {
        assert!(v("1.0") < v("1.0.post0"));
        assert!(v("1.0.post0") < v("1.0.post1"));
        // A dev of a post release sorts between the release and the post.
        assert!(v("1.0") < v("1.0.post1.dev0"));
        assert!(v("1.0.post1.dev0") < v("1.0.post1"));
    }

    #[test]
    fn test_pre_tag_order() {
        assert!(v("1.0a9") < v("1.0b0"));
        assert!(v("1.0b9") < v("1.0rc0"));
        assert!(v("1.0rc9") < v("1.0"));
        assert_eq!(v("1.0c1"), v("1.0rc1"));
    }

    #[test]
    fn test_local_ordering() {
        assert!(v("1.0+abc") < v("1.0+1"));
        assert!(v("1.0") < v("1.0+abc"));
        assert!(v("1.0+1") < v("1.0+2"));
        assert!(v("1.0+2") < v("1.0+10"));
        assert!(v("1.0+abc") < v("1.0+abd"));
        assert!(v("1.0+abc") < v("1.0+abc.1"));
        assert!(v("1.0+1.abc") < v("1.0+1.1"));
        assert_eq!(v("1.0+ABC-01"), v("1.0+abc.1"));
    }

    #[test]
    fn test_epoch_outranks_release() {
        assert!(v("1!0.1") > v("999.0"));
        assert!(v("0!2.0") == v("2.0"));
    }

    #[test]
    fn test_full_sort_order() {
        // The canonical ordering example from the standard.
        let ordered = [
            "1.0.dev456",
            "1.0a1",
            "1.0a2.dev456",
            "1.0a12.dev456",
            "1.0a12",
            "1.0b1.dev456",
            "1.0b2",
            "1.0b2.post345.dev456",
            "1.0b2.post345",
            "1.0rc1.dev456",
            "1.0rc1",
            "1.0",
            "1.0+abc.5",
            "1.0+abc.7",
            "1.0+5",
            "1.0.post456.dev34",
            "1.0.post456",
            "1.0.15",
            "1.1.dev1",
        ];
        let versions: Vec<Version> = ordered.iter().map(|s| v(s)).collect();
        for pair in versions.windows(2) {
            assert_eq!(
                pair[0].cmp(&pair[1]),
                Ordering::Less,
                "{} should sort before {}",
                pair[0],
                pair[1]
            );
        }

        let mut shuffled = versions.clone();
        shuffled.reverse();
        shuffled.sort();
        let rendered: Vec<String> = shuffled.iter().map(Version::to_string).collect();
        assert_eq!(rendered, ordered);
    }

    #[test]
    fn test_from_version_matches_cached_key() {
        let version = v("2!1.0rc1.post2.dev3+x.4");
        assert_eq!(&ComparisonKey::from_version(&version), version.key());
        assert_eq!(version.key().epoch(), 2);
        assert_eq!(version.key().post(), PostKey::Tagged(2));
        assert_eq!(version.key().dev(), DevKey::Tagged(3));
        assert_eq!(
            version.key().local(),
            &LocalKey::Segments(vec![LocalPart::Alpha("x".into()), LocalPart::Numeric(4)])
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn separator() -> impl Strategy<Value = &'static str> {
            prop::sample::select(vec!["", ".", "-", "_"])
        }

        fn number() -> impl Strategy<Value = Option<u64>> {
            prop::option::of(0u64..3)
        }

        fn render_number(n: Option<u64>) -> String {
            n.map(|n| n.to_string()).unwrap_or_default()
        }

        fn pre_segment() -> impl Strategy<Value = String> {
            let spelling = prop::sample::select(vec![
                "a", "A", "alpha", "b", "Beta", "c", "rc", "RC", "pre", "preview",
            ]);
            (separator(), spelling, separator(), number())
                .prop_map(|(lead, tag, gap, n)| format!("{lead}{tag}{gap}{}", render_number(n)))
        }

        fn post_segment() -> impl Strategy<Value = String> {
            let lettered = (
                separator(),
                prop::sample::select(vec!["post", "POST", "rev", "r"]),
                separator(),
                number(),
            )
                .prop_map(|(lead, tag, gap, n)| format!("{lead}{tag}{gap}{}", render_number(n)));
            prop_oneof![
                (0u64..3).prop_map(|n| format!("-{n}")),
                lettered,
            ]
        }

        fn dev_segment() -> impl Strategy<Value = String> {
            (separator(), prop::sample::select(vec!["dev", "DEV"]), separator(), number())
                .prop_map(|(lead, tag, gap, n)| format!("{lead}{tag}{gap}{}", render_number(n)))
        }

        fn local_segment() -> impl Strategy<Value = String> {
            let part = prop_oneof![
                Just("abc".to_string()),
                Just("Z".to_string()),
                Just("z".to_string()),
                (0u64..12).prop_map(|n| n.to_string()),
            ];
            (part.clone(), prop::collection::vec((separator(), part), 0..2)).prop_map(
                |(first, rest)| {
                    let mut label = format!("+{first}");
                    for (sep, part) in rest {
                        // An empty separator would merge two parts into one.
                        label.push_str(if sep.is_empty() { "." } else { sep });
                        label.push_str(&part);
                    }
                    label
                },
            )
        }

        /// Grammar-conformant spellings, canonical or not.
        fn version_string() -> impl Strategy<Value = String> {
            (
                prop::sample::select(vec!["", "v", "V"]),
                prop::option::of(0u64..3),
                prop::collection::vec(0u64..4, 1..4),
                prop::option::of(pre_segment()),
                prop::option::of(post_segment()),
                prop::option::of(dev_segment()),
                prop::option::of(local_segment()),
            )
                .prop_map(|(prefix, epoch, release, pre, post, dev, local)| {
                    let mut s = prefix.to_string();
                    if let Some(e) = epoch {
                        s.push_str(&format!("{e}!"));
                    }
                    s.push_str(
                        &release
                            .iter()
                            .map(u64::to_string)
                            .collect::<Vec<_>>()
                            .join("."),
                    );
                    for segment in [pre, post, dev, local].into_iter().flatten() {
                        s.push_str(&segment);
                    }
                    s
                })
        }

        proptest! {
            #[test]
            fn canonical_form_reparses_equal(s in version_string()) {
                let parsed = Version::parse(&s).unwrap();
                let canonical = parsed.to_string();
                let reparsed = Version::parse(&canonical).unwrap();
                prop_assert_eq!(parsed.key(), reparsed.key());
                prop_assert_eq!(&canonical, &reparsed.to_string());
                prop_assert!(!canonical.starts_with('v'), "{}", canonical);
                prop_assert!(
                    !canonical.contains(['-', '_']) && canonical == canonical.to_lowercase(),
                    "{} -> {}",
                    s,
                    canonical
                );
            }

            #[test]
            fn exactly_one_relation_holds(a in version_string(), b in version_string()) {
                let a = Version::parse(&a).unwrap();
                let b = Version::parse(&b).unwrap();
                let relations = [a < b, a == b, a > b];
                prop_assert_eq!(relations.iter().filter(|r| **r).count(), 1);
                prop_assert_eq!(a <= b, a < b || a == b);
                prop_assert_eq!(a >= b, a > b || a == b);
            }

            #[test]
            fn ordering_is_transitive(a in version_string(), b in version_string(), c in version_string()) {
                let mut versions = [
                    Version::parse(&a).unwrap(),
                    Version::parse(&b).unwrap(),
                    Version::parse(&c).unwrap(),
                ];
                versions.sort();
                prop_assert!(versions[0] <= versions[1]);
                prop_assert!(versions[1] <= versions[2]);
                prop_assert!(versions[0] <= versions[2]);
            }
        }
    }
}
