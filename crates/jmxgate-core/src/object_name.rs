//! Hierarchical MBean names.
//!
//! An [`ObjectName`] is a domain plus an unordered set of key properties,
//! written `domain:key=value[,key=value]*`. Names may be patterns:
//!
//! - the domain is empty or contains `*` / `?`
//! - an unquoted property value contains `*` / `?`
//! - the key list carries a `*` group (`java.lang:type=Memory,*`), which makes
//!   the pattern match any name whose properties are a superset of its own
//!
//! Two names are equal when their domains and property sets are equal, no
//! matter the order properties were written in.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::wildcard::wildcard_match;

/// A parsed MBean name, exact or pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectName {
    domain: String,
    properties: BTreeMap<String, String>,
    property_list_pattern: bool,
}

impl ObjectName {
    /// The domain part (before the first `:`).
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Value of a single key property, quotes included when the value was quoted.
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn is_pattern(&self) -> bool {
        self.is_domain_pattern() || self.is_property_pattern()
    }

    pub fn is_domain_pattern(&self) -> bool {
        self.domain.is_empty() || has_wildcard(&self.domain)
    }

    pub fn is_property_pattern(&self) -> bool {
        self.property_list_pattern || self.is_property_value_pattern()
    }

    /// True when the key list ends in (or contains) a `*` group.
    pub fn is_property_list_pattern(&self) -> bool {
        self.property_list_pattern
    }

    pub fn is_property_value_pattern(&self) -> bool {
        self.properties.values().any(|v| is_value_pattern(v))
    }

    /// Structural match of this name (usually a pattern) against `name`.
    ///
    /// A pattern never matches another pattern; an exact name matches only
    /// itself.
    pub fn matches(&self, name: &ObjectName) -> bool {
        if name.is_pattern() {
            return false;
        }
        self.matches_domain(&name.domain) && self.matches_properties(name)
    }

    /// Canonical textual form with properties sorted by key.
    pub fn canonical_name(&self) -> String {
        self.to_string()
    }

    fn matches_domain(&self, domain: &str) -> bool {
        if self.domain.is_empty() {
            true
        } else if has_wildcard(&self.domain) {
            wildcard_match(&self.domain, domain)
        } else {
            self.domain == domain
        }
    }

    fn matches_properties(&self, name: &ObjectName) -> bool {
        if !self.property_list_pattern && self.properties.len() != name.properties.len() {
            return false;
        }
        self.properties.iter().all(|(key, expected)| {
            name.properties.get(key).is_some_and(|actual| {
                if is_value_pattern(expected) {
                    wildcard_match(expected, actual)
                } else {
                    expected == actual
                }
            })
        })
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        let mut first = true;
        for (key, value) in &self.properties {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        if self.property_list_pattern {
            if !first {
                f.write_str(",")?;
            }
            f.write_str("*")?;
        }
        Ok(())
    }
}

impl FromStr for ObjectName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let Some((domain, key_list)) = name.split_once(':') else {
            return Err(CoreError::invalid_object_name(
                name,
                "domain must be followed by ':'",
            ));
        };
        if domain.contains('\n') {
            return Err(CoreError::invalid_object_name(
                name,
                "domain contains a newline",
            ));
        }
        if key_list.is_empty() {
            return Err(CoreError::invalid_object_name(
                name,
                "key properties cannot be empty",
            ));
        }

        let mut properties = BTreeMap::new();
        let mut property_list_pattern = false;

        for part in split_key_list(name, key_list)? {
            if part == "*" {
                if property_list_pattern {
                    return Err(CoreError::invalid_object_name(
                        name,
                        "'*' may appear only once in the key properties",
                    ));
                }
                property_list_pattern = true;
                continue;
            }

            let Some((key, value)) = part.split_once('=') else {
                return Err(CoreError::invalid_object_name(
                    name,
                    format!("key property '{part}' is missing '='"),
                ));
            };
            validate_key(name, key)?;
            validate_value(name, value)?;

            if properties
                .insert(key.to_string(), value.to_string())
                .is_some()
            {
                return Err(CoreError::invalid_object_name(
                    name,
                    format!("duplicate key '{key}'"),
                ));
            }
        }

        Ok(Self {
            domain: domain.to_string(),
            properties,
            property_list_pattern,
        })
    }
}

impl Serialize for ObjectName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn has_wildcard(s: &str) -> bool {
    s.contains('*') || s.contains('?')
}

fn is_value_pattern(value: &str) -> bool {
    !value.starts_with('"') && has_wildcard(value)
}

/// Split a key list on commas, ignoring commas inside quoted values.
fn split_key_list<'a>(name: &str, key_list: &'a str) -> crate::Result<Vec<&'a str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (idx, ch) in key_list.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&key_list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if in_quotes {
        return Err(CoreError::invalid_object_name(name, "unterminated quote"));
    }
    parts.push(&key_list[start..]);

    if parts.iter().any(|p| p.is_empty()) {
        return Err(CoreError::invalid_object_name(
            name,
            "empty key property",
        ));
    }
    Ok(parts)
}

fn validate_key(name: &str, key: &str) -> crate::Result<()> {
    if key.is_empty() {
        return Err(CoreError::invalid_object_name(name, "empty key"));
    }
    if key.contains([':', ',', '=', '*', '?', '"', '\n']) {
        return Err(CoreError::invalid_object_name(
            name,
            format!("invalid character in key '{key}'"),
        ));
    }
    Ok(())
}

fn validate_value(name: &str, value: &str) -> crate::Result<()> {
    if value.is_empty() {
        return Err(CoreError::invalid_object_name(name, "empty value"));
    }

    if let Some(inner) = value.strip_prefix('"') {
        let Some(inner) = inner.strip_suffix('"') else {
            return Err(CoreError::invalid_object_name(
                name,
                format!("badly quoted value {value}"),
            ));
        };
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some('\\' | '"' | '*' | '?' | 'n') => {}
                    _ => {
                        return Err(CoreError::invalid_object_name(
                            name,
                            format!("invalid escape in quoted value {value}"),
                        ));
                    }
                },
                '"' | '\n' => {
                    return Err(CoreError::invalid_object_name(
                        name,
                        format!("badly quoted value {value}"),
                    ));
                }
                _ => {}
            }
        }
        return Ok(());
    }

    if value.contains([',', '=', ':', '"', '\n']) {
        return Err(CoreError::invalid_object_name(
            name,
            format!("invalid character in value '{value}'"),
        ));
    }
    Ok(())
}
