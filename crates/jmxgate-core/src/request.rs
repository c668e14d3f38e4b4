use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Kind of command carried by a bridge request.
///
/// Only `Read`, `Write` and `Exec` address attributes or operations of a
/// concrete MBean; the others are gated solely by the command allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Read,
    Write,
    Exec,
    List,
    Search,
    Version,
    Notification,
}

impl RequestType {
    /// Every request type, in declaration order.
    pub const ALL: [RequestType; 7] = [
        RequestType::Read,
        RequestType::Write,
        RequestType::Exec,
        RequestType::List,
        RequestType::Search,
        RequestType::Version,
        RequestType::Notification,
    ];

    /// Wire name of the request type, as used in policy documents.
    pub fn name(self) -> &'static str {
        match self {
            RequestType::Read => "read",
            RequestType::Write => "write",
            RequestType::Exec => "exec",
            RequestType::List => "list",
            RequestType::Search => "search",
            RequestType::Version => "version",
            RequestType::Notification => "notification",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RequestType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        RequestType::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| CoreError::unknown_request_type(s.trim()))
    }
}

/// HTTP methods accepted by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Lower-case method name, as written in policy documents.
    pub fn name(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            _ => Err(CoreError::unsupported_http_method(s.trim())),
        }
    }
}
