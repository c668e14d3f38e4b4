//! Restrictor construction from configuration.

use std::path::Path;
use std::sync::Arc;

use crate::config::{RestrictorConfig, RestrictorMode};
use crate::document::PolicyDocument;
use crate::error::RestrictorError;
use crate::restrictor::{AllowAllRestrictor, DenyAllRestrictor, PolicyRestrictor, Restrictor};

/// Build the restrictor selected by `config`.
///
/// A configured policy that cannot be read, decoded or compiled is an error;
/// the caller is expected to refuse to start. Only a `policy` mode without
/// any location (and without `require_policy`) falls back to allowing every
/// request.
///
/// # Errors
///
/// Returns a [`RestrictorError`] for invalid configuration or an unusable
/// policy.
pub fn create_restrictor(config: &RestrictorConfig) -> Result<Arc<dyn Restrictor>, RestrictorError> {
    config.validate()?;

    match config.mode {
        RestrictorMode::AllowAll => {
            tracing::debug!("Using allow-all restrictor");
            Ok(Arc::new(AllowAllRestrictor))
        }
        RestrictorMode::DenyAll => {
            tracing::debug!("Using deny-all restrictor");
            Ok(Arc::new(DenyAllRestrictor))
        }
        RestrictorMode::Policy => match &config.policy_location {
            Some(location) => {
                let restrictor = load_policy(location)?;
                tracing::info!(location = %location.display(), "Access restricted by policy");
                Ok(Arc::new(restrictor))
            }
            None => {
                tracing::warn!("No access policy configured, access to any MBean is allowed");
                Ok(Arc::new(AllowAllRestrictor))
            }
        },
    }
}

/// Read, decode and compile the policy document at `location`.
///
/// # Errors
///
/// Returns `RestrictorError::Io`, `RestrictorError::Decode` or
/// `RestrictorError::Format`.
pub fn load_policy(location: &Path) -> Result<PolicyRestrictor, RestrictorError> {
    let raw = std::fs::read_to_string(location).map_err(|source| RestrictorError::Io {
        location: location.display().to_string(),
        source,
    })?;
    let doc = PolicyDocument::from_json_str(&raw).map_err(|source| RestrictorError::Decode {
        location: location.display().to_string(),
        source,
    })?;
    Ok(PolicyRestrictor::from_document(&doc)?)
}
