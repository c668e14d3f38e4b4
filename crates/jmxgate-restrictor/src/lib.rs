//! # jmxgate-restrictor
//!
//! Policy-based access restriction for the jmxgate management bridge.
//!
//! A policy document is compiled once, at startup, into an immutable
//! [`PolicyModel`]. The resulting [`Restrictor`] then answers, for every
//! request, whether its HTTP method, command type, MBean attribute or
//! operation, remote peer and origin are permitted.
//!
//! ## Modules
//!
//! - [`document`] - The parsed policy tree consumed by the compiler
//! - [`compiler`] - Policy document to [`PolicyModel`] compilation
//! - [`restrictor`] - The [`Restrictor`] trait and its implementations
//! - [`rules`] - Per-MBean rule index with pattern fallback
//! - [`matcher`] - Wildcard matching for attribute and operation names
//! - [`network`] - Host and subnet matching
//! - [`origin`] - Cross-origin allowlist
//! - [`config`] - Restrictor configuration and loading
//! - [`factory`] - Restrictor construction from configuration
//!
//! ## Example
//!
//! ```
//! use jmxgate_core::{ObjectName, RequestType};
//! use jmxgate_restrictor::{PolicyDocument, PolicyElement, PolicyRestrictor, Restrictor};
//!
//! let doc = PolicyDocument::new(
//!     PolicyElement::new("restrict")
//!         .with_child(PolicyElement::new("commands").with_child(PolicyElement::leaf("command", "read"))),
//! );
//! let restrictor = PolicyRestrictor::from_document(&doc).unwrap();
//! let memory: ObjectName = "java.lang:type=Memory".parse().unwrap();
//!
//! assert!(restrictor.is_type_allowed(RequestType::Read));
//! assert!(restrictor.is_attribute_read_allowed(&memory, "HeapMemoryUsage"));
//! assert!(!restrictor.is_operation_allowed(&memory, "gc"));
//! ```

pub mod compiler;
pub mod config;
pub mod document;
pub mod error;
pub mod factory;
pub mod matcher;
pub mod model;
pub mod network;
pub mod origin;
pub mod restrictor;
pub mod rules;

pub use compiler::PolicyCompiler;
pub use config::{AppConfig, ConfigError, RestrictorConfig, RestrictorMode};
pub use document::{PolicyDocument, PolicyElement};
pub use error::{PolicyFormatError, RestrictorError};
pub use factory::{create_restrictor, load_policy};
pub use matcher::{NamePattern, NameSet};
pub use model::PolicyModel;
pub use network::{Subnet, is_subnet_member};
pub use origin::OriginPattern;
pub use restrictor::{AllowAllRestrictor, DenyAllRestrictor, PolicyRestrictor, Restrictor};
pub use rules::{Axis, ResourceRuleIndex, RuleEntry};
