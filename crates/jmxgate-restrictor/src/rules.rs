//! Per-MBean rule storage.
//!
//! A [`ResourceRuleIndex`] maps object names to the attribute and operation
//! names a policy section lists for them. Exact names are found by hash
//! lookup; pattern names are additionally kept in insertion order and scanned
//! when no exact entry exists. When several patterns match a name, the one
//! declared first in the policy wins.

use std::collections::HashMap;

use indexmap::IndexSet;
use jmxgate_core::{ObjectName, RequestType};

use crate::matcher::NameSet;

// =============================================================================
// Axis
// =============================================================================

/// One of the three capabilities that can be checked against an MBean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Reading an attribute.
    Read,
    /// Writing an attribute.
    Write,
    /// Executing an operation.
    Exec,
}

impl Axis {
    /// The request type whose allowlist entry governs the default for this axis.
    #[must_use]
    pub fn request_type(self) -> RequestType {
        match self {
            Axis::Read => RequestType::Read,
            Axis::Write => RequestType::Write,
            Axis::Exec => RequestType::Exec,
        }
    }
}

// =============================================================================
// Rule Entry
// =============================================================================

/// Attribute and operation names listed for one MBean name.
#[derive(Debug, Clone, Default)]
pub struct RuleEntry {
    read_attributes: NameSet,
    write_attributes: NameSet,
    operations: NameSet,
}

impl RuleEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute. Read-only attributes are not added to the
    /// write set.
    pub(crate) fn add_attribute(&mut self, name: &str, read_only: bool) -> Result<(), regex::Error> {
        self.read_attributes.insert(name)?;
        if !read_only {
            self.write_attributes.insert(name)?;
        }
        Ok(())
    }

    pub(crate) fn add_operation(&mut self, name: &str) -> Result<(), regex::Error> {
        self.operations.insert(name)
    }

    pub(crate) fn merge(&mut self, other: RuleEntry) {
        self.read_attributes.extend(other.read_attributes);
        self.write_attributes.extend(other.write_attributes);
        self.operations.extend(other.operations);
    }

    /// The name set consulted for `axis`.
    #[must_use]
    pub fn names(&self, axis: Axis) -> &NameSet {
        match axis {
            Axis::Read => &self.read_attributes,
            Axis::Write => &self.write_attributes,
            Axis::Exec => &self.operations,
        }
    }

    /// Whether `name` is listed, exactly or by wildcard, for `axis`.
    #[must_use]
    pub fn lists(&self, axis: Axis, name: &str) -> bool {
        self.names(axis).matches(name)
    }
}

// =============================================================================
// Resource Rule Index
// =============================================================================

/// Rules of one policy section (`allow` or `deny`), keyed by MBean name.
#[derive(Debug, Clone, Default)]
pub struct ResourceRuleIndex {
    entries: HashMap<ObjectName, RuleEntry>,
    patterns: IndexSet<ObjectName>,
}

impl ResourceRuleIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry, merging with any entry already present for `name`.
    pub(crate) fn insert(&mut self, name: ObjectName, entry: RuleEntry) {
        if name.is_pattern() {
            self.patterns.insert(name.clone());
        }
        match self.entries.get_mut(&name) {
            Some(existing) => existing.merge(entry),
            None => {
                self.entries.insert(name, entry);
            }
        }
    }

    /// Find the entry governing `resource`: its own entry if one exists,
    /// otherwise the entry of the first declared pattern matching it.
    #[must_use]
    pub fn entry_for(&self, resource: &ObjectName) -> Option<&RuleEntry> {
        if let Some(entry) = self.entries.get(resource) {
            return Some(entry);
        }
        self.patterns
            .iter()
            .find(|pattern| pattern.matches(resource))
            .and_then(|pattern| self.entries.get(pattern))
    }

    /// Check whether this index lists `name` for `resource` on `axis`.
    #[must_use]
    pub fn matches(&self, axis: Axis, resource: &ObjectName, name: &str) -> bool {
        self.entry_for(resource)
            .is_some_and(|entry| entry.lists(axis, name))
    }

    /// Number of distinct MBean names (exact and pattern).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pattern names in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = &ObjectName> {
        self.patterns.iter()
    }
}
