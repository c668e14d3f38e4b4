//! Access decisions.
//!
//! The [`Restrictor`] trait is the query surface the request handler calls,
//! once per request and axis. Every method is a total, side-effect-free
//! function of its arguments and the restrictor's immutable state, so a
//! restrictor can be shared across threads as `Arc<dyn Restrictor>` without
//! locking.
//!
//! # Decision rules for MBean access
//!
//! Reading, writing and executing are each governed by the command allowlist:
//!
//! 1. If the command type is allowed, access is allowed unless a `<deny>`
//!    rule lists the attribute/operation for the MBean.
//! 2. If the command type is not allowed, access is denied unless an
//!    `<allow>` rule lists the attribute/operation for the MBean.

use jmxgate_core::{HttpMethod, ObjectName, RequestType};

use crate::compiler::PolicyCompiler;
use crate::document::PolicyDocument;
use crate::error::PolicyFormatError;
use crate::model::PolicyModel;
use crate::network::is_ipv4_literal;
use crate::origin;
use crate::rules::Axis;

// =============================================================================
// Restrictor Trait
// =============================================================================

/// Decides which requests the bridge may serve.
pub trait Restrictor: Send + Sync {
    /// Check whether the HTTP method may be used at all.
    fn is_http_method_allowed(&self, method: HttpMethod) -> bool;

    /// Check whether a command type may be used at all.
    fn is_type_allowed(&self, request_type: RequestType) -> bool;

    /// Check whether `attribute` of `mbean` may be read.
    fn is_attribute_read_allowed(&self, mbean: &ObjectName, attribute: &str) -> bool;

    /// Check whether `attribute` of `mbean` may be written.
    fn is_attribute_write_allowed(&self, mbean: &ObjectName, attribute: &str) -> bool;

    /// Check whether `operation` of `mbean` may be executed.
    fn is_operation_allowed(&self, mbean: &ObjectName, operation: &str) -> bool;

    /// Check whether a remote peer may access the bridge.
    ///
    /// `hosts_or_addresses` are alternative identifications of the same peer
    /// (usually its host name, then its IP address); one match is enough.
    fn is_remote_access_allowed(&self, hosts_or_addresses: &[&str]) -> bool;

    /// Check whether a cross-origin request from `origin` may be answered.
    fn is_origin_allowed(&self, origin: &str) -> bool;

    /// Whether the origin allowlist must also be enforced on the server side.
    fn is_strict_origin_checking(&self) -> bool {
        false
    }

    /// Server-side origin check: passes when strict checking is off,
    /// otherwise defers to [`is_origin_allowed`](Self::is_origin_allowed).
    fn is_origin_allowed_strict(&self, origin: &str) -> bool {
        !self.is_strict_origin_checking() || self.is_origin_allowed(origin)
    }
}

// =============================================================================
// Policy Restrictor
// =============================================================================

/// Restrictor backed by a compiled policy.
#[derive(Debug, Clone)]
pub struct PolicyRestrictor {
    model: PolicyModel,
}

impl PolicyRestrictor {
    #[must_use]
    pub fn new(model: PolicyModel) -> Self {
        Self { model }
    }

    /// Compile `doc` and wrap the result.
    ///
    /// # Errors
    ///
    /// Returns the compiler's [`PolicyFormatError`]; no restrictor exists
    /// for a malformed policy.
    pub fn from_document(doc: &PolicyDocument) -> Result<Self, PolicyFormatError> {
        PolicyCompiler::compile(doc).map(Self::new)
    }

    /// The compiled policy.
    #[must_use]
    pub fn model(&self) -> &PolicyModel {
        &self.model
    }

    fn check_resource_access(&self, axis: Axis, mbean: &ObjectName, name: &str) -> bool {
        if self.is_type_allowed(axis.request_type()) {
            let denied = self
                .model
                .deny_rules
                .as_ref()
                .is_some_and(|rules| rules.matches(axis, mbean, name));
            if denied {
                tracing::debug!(?axis, mbean = %mbean, name, "Access denied by deny rule");
            }
            !denied
        } else {
            let allowed = self
                .model
                .allow_rules
                .as_ref()
                .is_some_and(|rules| rules.matches(axis, mbean, name));
            if !allowed {
                tracing::debug!(?axis, mbean = %mbean, name, "Access not granted by any allow rule");
            }
            allowed
        }
    }

    // Shape-only literals that do not parse (e.g. `010.0.0.5`) are never members.
    fn is_subnet_member(&self, candidate: &str) -> bool {
        is_ipv4_literal(candidate)
            && self
                .model
                .allowed_subnets
                .as_ref()
                .is_some_and(|subnets| subnets.iter().any(|s| s.contains_str(candidate)))
    }
}

impl Restrictor for PolicyRestrictor {
    fn is_http_method_allowed(&self, method: HttpMethod) -> bool {
        self.model
            .allowed_http_methods
            .as_ref()
            .is_none_or(|methods| methods.contains(&method))
    }

    fn is_type_allowed(&self, request_type: RequestType) -> bool {
        self.model
            .allowed_types
            .as_ref()
            .is_none_or(|types| types.contains(&request_type))
    }

    fn is_attribute_read_allowed(&self, mbean: &ObjectName, attribute: &str) -> bool {
        self.check_resource_access(Axis::Read, mbean, attribute)
    }

    fn is_attribute_write_allowed(&self, mbean: &ObjectName, attribute: &str) -> bool {
        self.check_resource_access(Axis::Write, mbean, attribute)
    }

    fn is_operation_allowed(&self, mbean: &ObjectName, operation: &str) -> bool {
        self.check_resource_access(Axis::Exec, mbean, operation)
    }

    fn is_remote_access_allowed(&self, hosts_or_addresses: &[&str]) -> bool {
        let Some(ref hosts) = self.model.allowed_hosts else {
            return true;
        };
        let allowed = hosts_or_addresses.iter().any(|candidate| {
            let candidate = candidate.trim().to_lowercase();
            hosts.contains(&candidate) || self.is_subnet_member(&candidate)
        });
        if !allowed {
            tracing::debug!(candidates = ?hosts_or_addresses, "Remote access denied");
        }
        allowed
    }

    fn is_origin_allowed(&self, origin: &str) -> bool {
        origin::is_origin_allowed(&self.model.allowed_origins, origin)
    }

    fn is_strict_origin_checking(&self) -> bool {
        self.model.strict_origin_checking
    }
}

// =============================================================================
// Fixed Restrictors
// =============================================================================

/// Allows every request. Used when no policy is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllRestrictor;

impl Restrictor for AllowAllRestrictor {
    fn is_http_method_allowed(&self, _method: HttpMethod) -> bool {
        true
    }

    fn is_type_allowed(&self, _request_type: RequestType) -> bool {
        true
    }

    fn is_attribute_read_allowed(&self, _mbean: &ObjectName, _attribute: &str) -> bool {
        true
    }

    fn is_attribute_write_allowed(&self, _mbean: &ObjectName, _attribute: &str) -> bool {
        true
    }

    fn is_operation_allowed(&self, _mbean: &ObjectName, _operation: &str) -> bool {
        true
    }

    fn is_remote_access_allowed(&self, _hosts_or_addresses: &[&str]) -> bool {
        true
    }

    fn is_origin_allowed(&self, _origin: &str) -> bool {
        true
    }
}

/// Denies every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllRestrictor;

impl Restrictor for DenyAllRestrictor {
    fn is_http_method_allowed(&self, _method: HttpMethod) -> bool {
        false
    }

    fn is_type_allowed(&self, _request_type: RequestType) -> bool {
        false
    }

    fn is_attribute_read_allowed(&self, _mbean: &ObjectName, _attribute: &str) -> bool {
        false
    }

    fn is_attribute_write_allowed(&self, _mbean: &ObjectName, _attribute: &str) -> bool {
        false
    }

    fn is_operation_allowed(&self, _mbean: &ObjectName, _operation: &str) -> bool {
        false
    }

    fn is_remote_access_allowed(&self, _hosts_or_addresses: &[&str]) -> bool {
        false
    }

    fn is_origin_allowed(&self, _origin: &str) -> bool {
        false
    }

    fn is_strict_origin_checking(&self) -> bool {
        true
    }
}
