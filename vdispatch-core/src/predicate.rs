//! # Predicate Evaluation
//!
//! A predicate clause compares one subject against a target version:
//! `numpy>=1.22`. A predicate set joins clauses with `,` or `;` and matches
//! only when every clause matches: `numpy>=1.22, scipy<2`.
//!
//! Subjects resolve through a [`VersionLookup`]. A subject whose value is
//! not a version (an operating system name, say) is a *label*; labels can
//! only be compared with `==`.

use crate::{
    error::{LookupError, PredicateError},
    lookup::VersionLookup,
    version::Version,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Display, Formatter},
    str::FromStr,
};

// Two-character tokens come first so `<=` is never read as `<`.
static OPERATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("==|>=|<=|>|<").expect("operator pattern is a valid regex"));

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// `==`
    Eq,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

impl Operator {
    /// The operator as written in a clause.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Lt => "<",
        }
    }

    /// Whether this operator needs an ordering (anything but `==`).
    pub fn is_ordering(self) -> bool {
        self != Operator::Eq
    }

    /// Apply the operator to two ordered values.
    pub fn compare<T: Ord + ?Sized>(self, left: &T, right: &T) -> bool {
        match self {
            Operator::Eq => left == right,
            Operator::Ge => left >= right,
            Operator::Le => left <= right,
            Operator::Gt => left > right,
            Operator::Lt => left < right,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Operator::Eq),
            ">=" => Ok(Operator::Ge),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            other => Err(PredicateError::format(other, "unknown operator")),
        }
    }
}

/// The resolved value of a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectValue {
    /// The subject resolved to a valid version.
    Version(Version),
    /// The subject resolved to an arbitrary string.
    Label(String),
}

impl SubjectValue {
    /// Classify a raw resolved value.
    ///
    /// `force_label` comes from [`SubjectRules`]; otherwise any value that
    /// does not parse as a version is a label.
    pub fn classify(raw: &str, force_label: bool) -> Self {
        if force_label {
            return SubjectValue::Label(raw.trim().to_string());
        }
        match Version::parse(raw) {
            Ok(version) => SubjectValue::Version(version),
            Err(_) => SubjectValue::Label(raw.trim().to_string()),
        }
    }
}

impl Display for SubjectValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SubjectValue::Version(v) => write!(f, "{v}"),
            SubjectValue::Label(s) => f.write_str(s),
        }
    }
}

/// One `subject<op>target` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    subject: String,
    operator: Operator,
    target: String,
}

impl Clause {
    /// Parse a single clause such as `scipy >= 1.10`.
    pub fn parse(text: &str) -> Result<Self, PredicateError> {
        let mut tokens = OPERATOR_RE.find_iter(text);
        let Some(token) = tokens.next() else {
            return Err(PredicateError::format(text, "no comparison operator"));
        };
        if tokens.next().is_some() {
            return Err(PredicateError::format(text, "more than one comparison operator"));
        }

        let subject = text[..token.start()].trim();
        let target = text[token.end()..].trim();
        if subject.is_empty() {
            return Err(PredicateError::format(text, "missing subject"));
        }
        if target.is_empty() {
            return Err(PredicateError::format(text, "missing version"));
        }

        Ok(Self {
            subject: subject.to_string(),
            operator: token.as_str().parse()?,
            target: target.to_string(),
        })
    }

    /// The subject name.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The target, as written.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Check that this clause can be evaluated against `value`.
    ///
    /// Labels only support `==`; versions need a target that parses.
    pub fn validate(&self, value: &SubjectValue) -> Result<(), PredicateError> {
        match value {
            SubjectValue::Label(label) if self.operator.is_ordering() => {
                Err(PredicateError::Operator {
                    subject: self.subject.clone(),
                    operator: self.operator,
                    value: label.clone(),
                })
            }
            SubjectValue::Label(_) => Ok(()),
            SubjectValue::Version(_) => self.target_version().map(drop),
        }
    }

    /// Evaluate this clause against an already resolved subject value.
    pub fn matches(&self, value: &SubjectValue) -> Result<bool, PredicateError> {
        self.validate(value)?;
        match value {
            SubjectValue::Label(label) => Ok(label.as_str() == self.target),
            SubjectValue::Version(current) => {
                let target = self.target_version()?;
                Ok(self.operator.compare(current, &target))
            }
        }
    }

    fn target_version(&self) -> Result<Version, PredicateError> {
        Version::parse(&self.target).map_err(|source| PredicateError::InvalidTarget {
            clause: self.to_string(),
            source,
        })
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.subject, self.operator, self.target)
    }
}

impl FromStr for Clause {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Clause::parse(s)
    }
}

/// A conjunction of clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateSet {
    text: String,
    clauses: Vec<Clause>,
}

impl PredicateSet {
    /// Parse clauses separated by `,` or `;`.
    pub fn parse(text: &str) -> Result<Self, PredicateError> {
        let clauses = text
            .split([',', ';'])
            .map(str::trim)
            .map(|clause| {
                if clause.is_empty() {
                    Err(PredicateError::format(text, "empty clause"))
                } else {
                    Clause::parse(clause)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            text: text.trim().to_string(),
            clauses,
        })
    }

    /// The predicate text as registered (surrounding whitespace removed).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The clauses, in written order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Distinct subject names, in first-mention order.
    pub fn subjects(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.clauses
            .iter()
            .map(Clause::subject)
            .filter(|subject| seen.insert(*subject))
            .collect()
    }
}

impl Display for PredicateSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for PredicateSet {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PredicateSet::parse(s)
    }
}

/// Which subjects are always treated as labels, whatever they resolve to.
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRules {
    labels: HashSet<String>,
}

impl Default for SubjectRules {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectRules {
    /// Rules with the platform subjects `os`, `arch` and `platform` as labels.
    pub fn new() -> Self {
        Self::empty()
            .with_label("os")
            .with_label("arch")
            .with_label("platform")
    }

    /// Rules with no forced labels.
    pub fn empty() -> Self {
        Self {
            labels: HashSet::new(),
        }
    }

    /// Treat `subject` as a label.
    pub fn with_label(mut self, subject: &str) -> Self {
        self.labels.insert(subject.to_ascii_lowercase());
        self
    }

    /// Whether `subject` is a forced label.
    pub fn is_label(&self, subject: &str) -> bool {
        self.labels.contains(&subject.to_ascii_lowercase())
    }
}

/// Evaluates predicate sets against a lookup.
pub struct PredicateEvaluator<'a> {
    lookup: &'a dyn VersionLookup,
    rules: &'a SubjectRules,
}

impl<'a> PredicateEvaluator<'a> {
    /// Create an evaluator over `lookup`.
    pub fn new(lookup: &'a dyn VersionLookup, rules: &'a SubjectRules) -> Self {
        Self { lookup, rules }
    }

    /// Resolve and classify one subject.
    pub fn resolve(&self, subject: &str) -> Result<SubjectValue, PredicateError> {
        let raw = self
            .lookup
            .resolve(subject)
            .map_err(|source| PredicateError::UnresolvedSubject {
                subject: subject.to_string(),
                source,
            })?;
        Ok(SubjectValue::classify(&raw, self.rules.is_label(subject)))
    }

    /// Evaluate a predicate set.
    ///
    /// Every distinct subject is resolved exactly once and every clause is
    /// validated and evaluated, so a malformed later clause is reported even
    /// when an earlier one already failed to match.
    pub fn evaluate(&self, predicate: &PredicateSet) -> Result<bool, PredicateError> {
        let mut values: HashMap<&str, SubjectValue> = HashMap::new();
        for subject in predicate.subjects() {
            values.insert(subject, self.resolve(subject)?);
        }

        let mut all = true;
        for clause in predicate.clauses() {
            let value = values.get(clause.subject()).ok_or_else(|| {
                PredicateError::UnresolvedSubject {
                    subject: clause.subject().to_string(),
                    source: LookupError::NotFound(clause.subject().to_string()),
                }
            })?;
            all &= clause.matches(value)?;
        }
        Ok(all)
    }
}
