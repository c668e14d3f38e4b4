//! Read-only attributed tree a policy is compiled from.
//!
//! Markup parsing happens elsewhere; the restrictor only walks an already
//! parsed tree of named elements with attributes, text and ordered children.
//! The tree also has a serde form so hosts can hand it over as JSON:
//!
//! ```json
//! {
//!   "root": {
//!     "name": "restrict",
//!     "children": [
//!       { "name": "commands", "children": [ { "name": "command", "text": "read" } ] }
//!     ]
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A parsed policy document. `root` is `None` for an absent document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// The document element.
    #[serde(default)]
    pub root: Option<PolicyElement>,
}

impl PolicyDocument {
    /// Create a document around a root element.
    #[must_use]
    pub fn new(root: PolicyElement) -> Self {
        Self { root: Some(root) }
    }

    /// Decode a document from its JSON tree form.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// All elements with the given tag, anywhere in the document, in document
    /// order. The root element itself is included when it matches.
    #[must_use]
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&PolicyElement> {
        self.elements_by_tag_names(&[name])
    }

    /// Like [`elements_by_tag_name`](Self::elements_by_tag_name) for several
    /// synonymous tags; the result keeps document order across all of them.
    #[must_use]
    pub fn elements_by_tag_names(&self, names: &[&str]) -> Vec<&PolicyElement> {
        let mut found = Vec::new();
        if let Some(root) = &self.root {
            root.collect_by_tag_names(names, &mut found);
        }
        found
    }
}

/// One element of the policy tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyElement {
    /// Tag name.
    pub name: String,

    /// Attributes in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,

    /// Text content, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Child elements in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PolicyElement>,
}

impl PolicyElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Shorthand for an element that only carries text.
    #[must_use]
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: PolicyElement) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = PolicyElement>) -> Self {
        self.children.extend(children);
        self
    }

    /// Trimmed text content, empty when the element has none.
    #[must_use]
    pub fn text_content(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn collect_by_tag_names<'a>(&'a self, names: &[&str], found: &mut Vec<&'a PolicyElement>) {
        if names.iter().any(|name| *name == self.name) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_tag_names(names, found);
        }
    }
}
