//! Glob matching for attribute and operation names.
//!
//! Policy entries may contain `*`, meaning "any run of characters". Globs are
//! compiled to anchored regexes once, when the policy is compiled, so a
//! decision never compiles anything.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

// =============================================================================
// Glob Compilation
// =============================================================================

/// Translate a `*` glob into an anchored regex source. All other characters
/// are matched literally.
#[must_use]
pub fn glob_to_regex(glob: &str) -> String {
    let body = glob
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!("^{body}$")
}

/// Compile a glob into a regex, optionally ignoring case.
pub fn compile_glob(glob: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&glob_to_regex(glob))
        .case_insensitive(case_insensitive)
        .build()
}

// =============================================================================
// Name Pattern
// =============================================================================

/// A compiled wildcard name such as `get*`.
#[derive(Debug, Clone)]
pub struct NamePattern {
    raw: String,
    regex: Regex,
}

impl NamePattern {
    pub fn compile(glob: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            raw: glob.to_string(),
            regex: compile_glob(glob, false)?,
        })
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The glob as written in the policy.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

// =============================================================================
// Name Set
// =============================================================================

/// Set of attribute or operation names, some of which may be wildcards.
///
/// Exact members are checked first; wildcard members only when no exact
/// member equals the name.
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    exact: HashSet<String>,
    wildcards: Vec<NamePattern>,
}

impl NameSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name; names containing `*` are compiled as globs.
    pub(crate) fn insert(&mut self, name: &str) -> Result<(), regex::Error> {
        if !name.contains('*') {
            self.exact.insert(name.to_string());
        } else if !self.wildcards.iter().any(|p| p.as_str() == name) {
            self.wildcards.push(NamePattern::compile(name)?);
        }
        Ok(())
    }

    /// Merge all members of `other` into this set.
    pub(crate) fn extend(&mut self, other: NameSet) {
        self.exact.extend(other.exact);
        for pattern in other.wildcards {
            if !self.wildcards.iter().any(|p| p.as_str() == pattern.as_str()) {
                self.wildcards.push(pattern);
            }
        }
    }

    /// Check whether `name` is a member, exactly or through a wildcard.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.exact.contains(name) || self.wildcards.iter().any(|p| p.matches(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.wildcards.is_empty()
    }
}
