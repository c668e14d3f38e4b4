//! The compiled, immutable policy.

use std::collections::HashSet;

use jmxgate_core::{HttpMethod, RequestType};

use crate::network::Subnet;
use crate::origin::OriginPattern;
use crate::rules::ResourceRuleIndex;

/// Everything a policy document restricts, in query-ready form.
///
/// `None` for an optional section means the section was absent and the
/// corresponding axis is unrestricted. The model is built once by
/// [`PolicyCompiler`](crate::compiler::PolicyCompiler) and exposes read-only
/// accessors only.
#[derive(Debug, Clone, Default)]
pub struct PolicyModel {
    pub(crate) allowed_types: Option<HashSet<RequestType>>,
    pub(crate) allowed_http_methods: Option<HashSet<HttpMethod>>,
    pub(crate) allow_rules: Option<ResourceRuleIndex>,
    pub(crate) deny_rules: Option<ResourceRuleIndex>,
    pub(crate) allowed_hosts: Option<HashSet<String>>,
    pub(crate) allowed_subnets: Option<Vec<Subnet>>,
    pub(crate) allowed_origins: Vec<OriginPattern>,
    pub(crate) strict_origin_checking: bool,
}

impl PolicyModel {
    #[must_use]
    pub fn allowed_types(&self) -> Option<&HashSet<RequestType>> {
        self.allowed_types.as_ref()
    }

    #[must_use]
    pub fn allowed_http_methods(&self) -> Option<&HashSet<HttpMethod>> {
        self.allowed_http_methods.as_ref()
    }

    /// Rules from `<allow>` and `<mbeans>` sections.
    #[must_use]
    pub fn allow_rules(&self) -> Option<&ResourceRuleIndex> {
        self.allow_rules.as_ref()
    }

    /// Rules from `<deny>` sections.
    #[must_use]
    pub fn deny_rules(&self) -> Option<&ResourceRuleIndex> {
        self.deny_rules.as_ref()
    }

    #[must_use]
    pub fn allowed_hosts(&self) -> Option<&HashSet<String>> {
        self.allowed_hosts.as_ref()
    }

    #[must_use]
    pub fn allowed_subnets(&self) -> Option<&[Subnet]> {
        self.allowed_subnets.as_deref()
    }

    #[must_use]
    pub fn allowed_origins(&self) -> &[OriginPattern] {
        &self.allowed_origins
    }

    #[must_use]
    pub fn strict_origin_checking(&self) -> bool {
        self.strict_origin_checking
    }
}
