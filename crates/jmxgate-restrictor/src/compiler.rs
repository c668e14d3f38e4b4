//! Policy compilation.
//!
//! Turns a [`PolicyDocument`] into a [`PolicyModel`]. Sections are found by
//! tag name anywhere in the document and repeated sections are merged:
//!
//! | Section                      | Model field                |
//! |------------------------------|----------------------------|
//! | `commands/command`           | `allowed_types`            |
//! | `http/method`                | `allowed_http_methods`     |
//! | `allow/mbean`, `mbeans/mbean`| `allow_rules`              |
//! | `deny/mbean`                 | `deny_rules`               |
//! | `remote/host`                | `allowed_hosts`, `allowed_subnets` |
//! | `allow-origin`               | `allowed_origins`          |
//! | `strict-checking`            | `strict_origin_checking`   |
//!
//! Compilation is all-or-nothing: the first format error aborts it and no
//! model is returned.

use std::collections::HashSet;

use jmxgate_core::{HttpMethod, ObjectName, RequestType};

use crate::document::{PolicyDocument, PolicyElement};
use crate::error::PolicyFormatError;
use crate::model::PolicyModel;
use crate::network::{Subnet, is_subnet_spec};
use crate::origin::OriginPattern;
use crate::rules::{ResourceRuleIndex, RuleEntry};

const ALLOW_SECTIONS: &[&str] = &["allow", "mbeans"];
const DENY_SECTIONS: &[&str] = &["deny"];

/// Compiles policy documents into [`PolicyModel`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyCompiler;

impl PolicyCompiler {
    /// Compile a policy document.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyFormatError`] if the document is absent or any
    /// section is malformed.
    pub fn compile(doc: &PolicyDocument) -> Result<PolicyModel, PolicyFormatError> {
        if doc.root.is_none() {
            return Err(PolicyFormatError::MissingDocument);
        }

        let (allowed_hosts, allowed_subnets) = compile_remote(doc)?;
        let model = PolicyModel {
            allowed_types: compile_commands(doc)?,
            allowed_http_methods: compile_http_methods(doc)?,
            allow_rules: compile_rules(doc, ALLOW_SECTIONS)?,
            deny_rules: compile_rules(doc, DENY_SECTIONS)?,
            allowed_hosts,
            allowed_subnets,
            allowed_origins: compile_origins(doc)?,
            strict_origin_checking: !doc.elements_by_tag_name("strict-checking").is_empty(),
        };

        tracing::info!(
            commands = ?model.allowed_types.as_ref().map(HashSet::len),
            http_methods = ?model.allowed_http_methods.as_ref().map(HashSet::len),
            allow_rules = ?model.allow_rules.as_ref().map(ResourceRuleIndex::len),
            deny_rules = ?model.deny_rules.as_ref().map(ResourceRuleIndex::len),
            hosts = ?model.allowed_hosts.as_ref().map(HashSet::len),
            subnets = ?model.allowed_subnets.as_ref().map(Vec::len),
            origins = model.allowed_origins.len(),
            strict_origin_checking = model.strict_origin_checking,
            "Compiled access policy"
        );

        Ok(model)
    }
}

// =============================================================================
// Sections
// =============================================================================

fn compile_commands(
    doc: &PolicyDocument,
) -> Result<Option<HashSet<RequestType>>, PolicyFormatError> {
    let sections = doc.elements_by_tag_name("commands");
    if sections.is_empty() {
        return Ok(None);
    }

    let mut types = HashSet::new();
    for child in sections.iter().flat_map(|s| &s.children) {
        expect_tag(child, "command")?;
        let request_type = child
            .text_content()
            .parse::<RequestType>()
            .map_err(PolicyFormatError::InvalidCommand)?;
        types.insert(request_type);
    }
    Ok(Some(types))
}

fn compile_http_methods(
    doc: &PolicyDocument,
) -> Result<Option<HashSet<HttpMethod>>, PolicyFormatError> {
    let sections = doc.elements_by_tag_name("http");
    if sections.is_empty() {
        return Ok(None);
    }

    let mut methods = HashSet::new();
    for child in sections.iter().flat_map(|s| &s.children) {
        expect_tag(child, "method")?;
        let raw = child.text_content().to_lowercase();
        let method = raw
            .parse::<HttpMethod>()
            .map_err(|_| PolicyFormatError::InvalidHttpMethod(raw.clone()))?;
        methods.insert(method);
    }
    Ok(Some(methods))
}

fn compile_rules(
    doc: &PolicyDocument,
    section_tags: &[&str],
) -> Result<Option<ResourceRuleIndex>, PolicyFormatError> {
    let sections = doc.elements_by_tag_names(section_tags);
    if sections.is_empty() {
        return Ok(None);
    }

    let mut index = ResourceRuleIndex::new();
    for child in sections.iter().flat_map(|s| &s.children) {
        expect_tag(child, "mbean")?;
        let (name, entry) = compile_mbean(child)?;
        tracing::debug!(
            section = ?section_tags,
            mbean = %name,
            pattern = name.is_pattern(),
            "Registered MBean rule"
        );
        index.insert(name, entry);
    }
    Ok(Some(index))
}

fn compile_mbean(element: &PolicyElement) -> Result<(ObjectName, RuleEntry), PolicyFormatError> {
    let mut name: Option<ObjectName> = None;
    let mut entry = RuleEntry::new();

    for child in &element.children {
        match child.name.as_str() {
            "name" => {
                if let Some(existing) = &name {
                    return Err(PolicyFormatError::DuplicateName {
                        existing: existing.to_string(),
                    });
                }
                let parsed = child
                    .text_content()
                    .parse::<ObjectName>()
                    .map_err(PolicyFormatError::InvalidObjectName)?;
                name = Some(parsed);
            }
            "attribute" => {
                let attribute = required_text(child, "attribute")?;
                let read_only = child
                    .attribute("mode")
                    .is_some_and(|mode| mode.trim().eq_ignore_ascii_case("read"));
                entry
                    .add_attribute(attribute, read_only)
                    .map_err(|e| PolicyFormatError::invalid_pattern(attribute, e))?;
            }
            "operation" => {
                let operation = required_text(child, "operation")?;
                entry
                    .add_operation(operation)
                    .map_err(|e| PolicyFormatError::invalid_pattern(operation, e))?;
            }
            other => {
                return Err(PolicyFormatError::TagNotAllowed {
                    tag: other.to_string(),
                });
            }
        }
    }

    let name = name.ok_or(PolicyFormatError::MissingName)?;
    Ok((name, entry))
}

type RemoteSections = (Option<HashSet<String>>, Option<Vec<Subnet>>);

fn compile_remote(doc: &PolicyDocument) -> Result<RemoteSections, PolicyFormatError> {
    let sections = doc.elements_by_tag_name("remote");
    if sections.is_empty() {
        return Ok((None, None));
    }

    let mut hosts = HashSet::new();
    let mut subnets: Option<Vec<Subnet>> = None;
    for child in sections.iter().flat_map(|s| &s.children) {
        expect_tag(child, "host")?;
        let host = required_text(child, "host")?.to_lowercase();
        if is_subnet_spec(&host) {
            let subnet = host
                .parse::<Subnet>()
                .map_err(|_| PolicyFormatError::InvalidSubnet(host.clone()))?;
            subnets.get_or_insert_with(Vec::new).push(subnet);
        } else {
            hosts.insert(host);
        }
    }
    Ok((Some(hosts), subnets))
}

fn compile_origins(doc: &PolicyDocument) -> Result<Vec<OriginPattern>, PolicyFormatError> {
    doc.elements_by_tag_name("allow-origin")
        .into_iter()
        .map(|element| {
            let glob = required_text(element, "allow-origin")?;
            OriginPattern::compile(glob).map_err(|e| PolicyFormatError::invalid_pattern(glob, e))
        })
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

fn expect_tag(element: &PolicyElement, expected: &'static str) -> Result<(), PolicyFormatError> {
    if element.name == expected {
        Ok(())
    } else {
        Err(PolicyFormatError::unexpected_tag(expected, &element.name))
    }
}

fn required_text<'a>(
    element: &'a PolicyElement,
    tag: &'static str,
) -> Result<&'a str, PolicyFormatError> {
    let text = element.text_content();
    if text.is_empty() {
        Err(PolicyFormatError::EmptyValue(tag))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Axis;

    fn restrict(children: Vec<PolicyElement>) -> PolicyDocument {
        PolicyDocument::new(PolicyElement::new("restrict").with_children(children))
    }

    fn section(name: &str, tag: &str, values: &[&str]) -> PolicyElement {
        PolicyElement::new(name).with_children(values.iter().map(|v| PolicyElement::leaf(tag, *v)))
    }

    fn mbean(name: &str) -> PolicyElement {
        PolicyElement::new("mbean").with_child(PolicyElement::leaf("name", name))
    }

    // -------------------------------------------------------------------------
    // Document-level
    // -------------------------------------------------------------------------

    #[test]
    fn test_absent_document_fails() {
        let err = PolicyCompiler::compile(&PolicyDocument::default()).unwrap_err();
        assert!(matches!(err, PolicyFormatError::MissingDocument));
    }

    #[test]
    fn test_empty_document_is_unrestricted() {
        let model = PolicyCompiler::compile(&restrict(vec![])).unwrap();
        assert!(model.allowed_types().is_none());
        assert!(model.allowed_http_methods().is_none());
        assert!(model.allow_rules().is_none());
        assert!(model.deny_rules().is_none());
        assert!(model.allowed_hosts().is_none());
        assert!(model.allowed_subnets().is_none());
        assert!(model.allowed_origins().is_empty());
        assert!(!model.strict_origin_checking());
    }

    // -------------------------------------------------------------------------
    // Commands and HTTP methods
    // -------------------------------------------------------------------------

    #[test]
    fn test_commands() {
        let doc = restrict(vec![section("commands", "command", &["read", " list "])]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        let types = model.allowed_types().unwrap();
        assert_eq!(types.len(), 2);
        assert!(types.contains(&RequestType::Read));
        assert!(types.contains(&RequestType::List));
    }

    #[test]
    fn test_empty_commands_section_allows_nothing() {
        let doc = restrict(vec![PolicyElement::new("commands")]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        assert_eq!(model.allowed_types().map(HashSet::len), Some(0));
    }

    #[test]
    fn test_repeated_sections_merge() {
        let doc = restrict(vec![
            section("commands", "command", &["read"]),
            PolicyElement::new("nested").with_child(section("commands", "command", &["exec"])),
        ]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        let types = model.allowed_types().unwrap();
        assert!(types.contains(&RequestType::Read));
        assert!(types.contains(&RequestType::Exec));
    }

    #[test]
    fn test_unknown_command_fails() {
        let doc = restrict(vec![section("commands", "command", &["delete"])]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_wrong_tag_in_commands_fails() {
        let doc = restrict(vec![section("commands", "cmd", &["read"])]);
        let err = PolicyCompiler::compile(&doc).unwrap_err();
        assert_eq!(err.to_string(), "Tag <command> expected, got <cmd>");
    }

    #[test]
    fn test_http_methods_are_lower_cased() {
        let doc = restrict(vec![section("http", "method", &["GET", "Post"])]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        let methods = model.allowed_http_methods().unwrap();
        assert!(methods.contains(&HttpMethod::Get));
        assert!(methods.contains(&HttpMethod::Post));
    }

    #[test]
    fn test_invalid_http_method_fails() {
        let doc = restrict(vec![section("http", "method", &["delete"])]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::InvalidHttpMethod(m)) if m == "delete"
        ));
    }

    // -------------------------------------------------------------------------
    // MBean sections
    // -------------------------------------------------------------------------

    #[test]
    fn test_mbean_rules() {
        let doc = restrict(vec![PolicyElement::new("allow").with_child(
            mbean("java.lang:type=Memory")
                .with_child(PolicyElement::leaf("attribute", "HeapMemoryUsage").with_attribute("mode", "read"))
                .with_child(PolicyElement::leaf("attribute", "Verbose"))
                .with_child(PolicyElement::leaf("operation", "gc")),
        )]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        let rules = model.allow_rules().unwrap();
        let memory: ObjectName = "java.lang:type=Memory".parse().unwrap();

        assert!(rules.matches(Axis::Read, &memory, "HeapMemoryUsage"));
        assert!(!rules.matches(Axis::Write, &memory, "HeapMemoryUsage"));
        assert!(rules.matches(Axis::Write, &memory, "Verbose"));
        assert!(rules.matches(Axis::Exec, &memory, "gc"));
        assert!(model.deny_rules().is_none());
    }

    #[test]
    fn test_mode_read_is_case_insensitive() {
        let doc = restrict(vec![PolicyElement::new("allow").with_child(
            mbean("java.lang:type=Memory")
                .with_child(PolicyElement::leaf("attribute", "Verbose").with_attribute("mode", "READ")),
        )]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        let memory: ObjectName = "java.lang:type=Memory".parse().unwrap();
        assert!(!model.allow_rules().unwrap().matches(Axis::Write, &memory, "Verbose"));
    }

    #[test]
    fn test_mbeans_and_allow_are_synonyms() {
        let doc = restrict(vec![
            PolicyElement::new("mbeans").with_child(
                mbean("java.lang:type=Memory").with_child(PolicyElement::leaf("operation", "gc")),
            ),
            PolicyElement::new("allow").with_child(
                mbean("java.lang:type=Threading")
                    .with_child(PolicyElement::leaf("operation", "dumpAllThreads")),
            ),
        ]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        assert_eq!(model.allow_rules().unwrap().len(), 2);
    }

    #[test]
    fn test_pattern_mbean_is_registered() {
        let doc = restrict(vec![PolicyElement::new("deny").with_child(
            mbean("*:type=Memory").with_child(PolicyElement::leaf("operation", "gc")),
        )]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        let deny = model.deny_rules().unwrap();
        assert_eq!(deny.patterns().count(), 1);
    }

    #[test]
    fn test_mbean_without_name_fails() {
        let doc = restrict(vec![PolicyElement::new("allow").with_child(
            PolicyElement::new("mbean").with_child(PolicyElement::leaf("operation", "gc")),
        )]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::MissingName)
        ));
    }

    #[test]
    fn test_mbean_with_two_names_fails() {
        let doc = restrict(vec![PolicyElement::new("allow").with_child(
            mbean("java.lang:type=Memory").with_child(PolicyElement::leaf("name", "java.lang:type=Runtime")),
        )]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_unsupported_mbean_child_fails() {
        let doc = restrict(vec![PolicyElement::new("allow").with_child(
            mbean("java.lang:type=Memory").with_child(PolicyElement::leaf("notification", "x")),
        )]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::TagNotAllowed { tag }) if tag == "notification"
        ));
    }

    #[test]
    fn test_invalid_object_name_fails() {
        let doc = restrict(vec![PolicyElement::new("allow").with_child(mbean("no-colon"))]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::InvalidObjectName(_))
        ));
    }

    #[test]
    fn test_non_mbean_in_rule_section_fails() {
        let doc = restrict(vec![section("deny", "name", &["java.lang:type=Memory"])]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::UnexpectedTag { expected: "mbean", .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Remote and origins
    // -------------------------------------------------------------------------

    #[test]
    fn test_remote_hosts_and_subnets() {
        let doc = restrict(vec![section(
            "remote",
            "host",
            &["LocalHost", "127.0.0.1", "10.0.0.0/16", "192.168.1.0/255.255.255.0"],
        )]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        let hosts = model.allowed_hosts().unwrap();
        assert!(hosts.contains("localhost"));
        assert!(hosts.contains("127.0.0.1"));
        assert_eq!(hosts.len(), 2);
        assert_eq!(model.allowed_subnets().map(<[Subnet]>::len), Some(2));
    }

    #[test]
    fn test_remote_without_subnets() {
        let doc = restrict(vec![section("remote", "host", &["localhost"])]);
        let model = PolicyCompiler::compile(&doc).unwrap();
        assert!(model.allowed_hosts().is_some());
        assert!(model.allowed_subnets().is_none());
    }

    #[test]
    fn test_invalid_subnet_fails() {
        let doc = restrict(vec![section("remote", "host", &["10.0.0.0/40"])]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::InvalidSubnet(s)) if s == "10.0.0.0/40"
        ));
    }

    #[test]
    fn test_malformed_subnet_suffix_is_not_a_host() {
        for spec in ["10.0.0.0/100", "10.0.0.0/255.255.255", "10.0.0.0/"] {
            let doc = restrict(vec![section("remote", "host", &["localhost", spec])]);
            assert!(
                matches!(
                    PolicyCompiler::compile(&doc),
                    Err(PolicyFormatError::InvalidSubnet(ref s)) if s == spec
                ),
                "{spec} should fail compilation"
            );
        }
    }

    #[test]
    fn test_origins_and_strict_checking() {
        let doc = PolicyDocument::new(
            PolicyElement::new("policy")
                .with_child(restrict(vec![]).root.unwrap())
                .with_child(
                    PolicyElement::new("cors")
                        .with_child(PolicyElement::leaf("allow-origin", "*.Example.com"))
                        .with_child(PolicyElement::new("strict-checking")),
                )
                .with_child(PolicyElement::leaf("allow-origin", "http://localhost:*")),
        );
        let model = PolicyCompiler::compile(&doc).unwrap();
        let origins: Vec<_> = model.allowed_origins().iter().map(OriginPattern::as_str).collect();
        assert_eq!(origins, vec!["*.example.com", "http://localhost:*"]);
        assert!(model.strict_origin_checking());
    }

    #[test]
    fn test_empty_origin_fails() {
        let doc = restrict(vec![PolicyElement::leaf("allow-origin", "  ")]);
        assert!(matches!(
            PolicyCompiler::compile(&doc),
            Err(PolicyFormatError::EmptyValue("allow-origin"))
        ));
    }
}
