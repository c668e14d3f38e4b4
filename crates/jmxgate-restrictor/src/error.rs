//! Restrictor error types.
//!
//! [`PolicyFormatError`] is the only failure a policy compilation can produce.
//! [`RestrictorError`] covers everything that can go wrong while building a
//! restrictor from configuration.

use jmxgate_core::CoreError;

use crate::config::ConfigError;

/// A policy document that cannot be compiled.
///
/// Always fatal: the caller must refuse to serve requests rather than fall
/// back to a permissive default.
#[derive(Debug, thiserror::Error)]
pub enum PolicyFormatError {
    /// The document has no root element.
    #[error("No policy document given")]
    MissingDocument,

    /// A section contains a child element other than the one it requires.
    #[error("Tag <{expected}> expected, got <{found}>")]
    UnexpectedTag {
        /// The tag required at this position.
        expected: &'static str,
        /// The tag that was found instead.
        found: String,
    },

    /// An `<mbean>` block contains an element it does not support.
    #[error("Tag <{tag}> not allowed in <mbean> (only <name>, <attribute>, <operation>)")]
    TagNotAllowed {
        /// The offending tag.
        tag: String,
    },

    /// An `<mbean>` block has no `<name>`.
    #[error("No name given for <mbean>")]
    MissingName,

    /// An `<mbean>` block declares `<name>` more than once.
    #[error("<name> given more than once for <mbean> (already set to '{existing}')")]
    DuplicateName {
        /// The name declared first.
        existing: String,
    },

    /// An `<http>` section lists a method other than get/post.
    #[error("Invalid HTTP method '{0}', only 'get' and 'post' are allowed")]
    InvalidHttpMethod(String),

    /// A `<command>` names an unknown request type.
    #[error("Invalid command type: {0}")]
    InvalidCommand(#[source] CoreError),

    /// An `<mbean>` name cannot be parsed.
    #[error("Invalid object name: {0}")]
    InvalidObjectName(#[source] CoreError),

    /// A `<host>` entry looks like a subnet but cannot be parsed as one.
    #[error("Invalid subnet specification '{0}'")]
    InvalidSubnet(String),

    /// An attribute, operation or origin glob cannot be compiled.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The glob as written in the policy.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// An element that requires a value is empty.
    #[error("Empty value in <{0}>")]
    EmptyValue(&'static str),
}

impl PolicyFormatError {
    /// Creates a new `UnexpectedTag` error.
    #[must_use]
    pub fn unexpected_tag(expected: &'static str, found: impl Into<String>) -> Self {
        Self::UnexpectedTag {
            expected,
            found: found.into(),
        }
    }

    /// Creates a new `InvalidPattern` error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}

/// Errors raised while building a restrictor from configuration.
#[derive(Debug, thiserror::Error)]
pub enum RestrictorError {
    /// The policy document is malformed.
    #[error(transparent)]
    Format(#[from] PolicyFormatError),

    /// The restrictor configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The policy file could not be read.
    #[error("Failed to read policy '{location}': {source}")]
    Io {
        /// The configured policy location.
        location: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The policy file is not a valid serialized policy tree.
    #[error("Failed to decode policy '{location}': {source}")]
    Decode {
        /// The configured policy location.
        location: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl RestrictorError {
    /// Returns `true` if the error stems from the policy content itself
    /// rather than from reading it.
    #[must_use]
    pub fn is_policy_error(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Decode { .. })
    }
}
