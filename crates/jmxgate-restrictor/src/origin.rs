//! Cross-origin allowlist.

use regex::Regex;

use crate::matcher::compile_glob;

/// A compiled `allow-origin` entry.
///
/// The glob is matched case-insensitively against the whole origin; `*`
/// stands for any run of characters.
#[derive(Debug, Clone)]
pub struct OriginPattern {
    raw: String,
    regex: Regex,
}

impl OriginPattern {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let raw = pattern.trim().to_lowercase();
        let regex = compile_glob(&raw, true)?;
        Ok(Self { raw, regex })
    }

    #[must_use]
    pub fn matches(&self, origin: &str) -> bool {
        self.regex.is_match(origin)
    }

    /// The lower-cased glob.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Check an origin against an allowlist. An empty list allows every origin.
#[must_use]
pub fn is_origin_allowed(patterns: &[OriginPattern], origin: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| p.matches(origin))
}
