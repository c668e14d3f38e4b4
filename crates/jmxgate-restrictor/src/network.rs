//! Remote host and subnet matching.
//!
//! A subnet is written `ip/prefix` (`10.0.0.0/24`) or `ip/netmask`
//! (`192.168.1.0/255.255.255.0`). Only IPv4 is supported for subnets; any
//! other host entry is compared literally.

use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock;

use ipnetwork::{Ipv4Network, ipv4_mask_to_prefix};
use regex::Regex;

// Any suffix after `ip/` makes an entry a subnet; `Subnet::from_str` decides
// whether the suffix is valid.
static SUBNET_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(\.\d{1,3}){3}/").expect("subnet grammar is a valid regex")
});

static IPV4_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").expect("ipv4 grammar is a valid regex")
});

/// Whether `value` is shaped like a subnet specification (`ipv4-literal/...`),
/// valid or not.
#[must_use]
pub fn is_subnet_spec(value: &str) -> bool {
    SUBNET_SPEC.is_match(value)
}

/// Whether `value` is shaped like a dotted IPv4 literal.
///
/// Only the shape is checked: `010.0.0.5` passes here but is rejected by
/// `Ipv4Addr` parsing, so such an address is never a subnet member.
#[must_use]
pub fn is_ipv4_literal(value: &str) -> bool {
    IPV4_LITERAL.is_match(value)
}

/// A parsed IPv4 subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    network: Ipv4Network,
}

impl Subnet {
    /// Check whether an address lies inside this subnet.
    #[must_use]
    pub fn contains(&self, address: Ipv4Addr) -> bool {
        self.network.contains(address)
    }

    /// Like [`Subnet::contains`] for an address in text form; unparseable
    /// addresses are never members.
    #[must_use]
    pub fn contains_str(&self, address: &str) -> bool {
        address
            .trim()
            .parse::<Ipv4Addr>()
            .is_ok_and(|ip| self.contains(ip))
    }

    #[must_use]
    pub fn network(&self) -> Ipv4Network {
        self.network
    }
}

/// A host entry that looks like a subnet but is not a valid one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid subnet specification '{0}'")]
pub struct InvalidSubnet(pub String);

impl FromStr for Subnet {
    type Err = InvalidSubnet;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSubnet(spec.to_string());

        let (addr, suffix) = spec.trim().split_once('/').ok_or_else(invalid)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;

        let prefix = if suffix.contains('.') {
            let mask: Ipv4Addr = suffix.parse().map_err(|_| invalid())?;
            // Non-contiguous netmasks are rejected here
            ipv4_mask_to_prefix(mask).map_err(|_| invalid())?
        } else {
            suffix.parse::<u8>().map_err(|_| invalid())?
        };

        let network = Ipv4Network::new(addr, prefix).map_err(|_| invalid())?;
        Ok(Self { network })
    }
}

/// Check whether `address` lies inside `subnet_spec`.
///
/// Malformed specs or addresses are never members.
#[must_use]
pub fn is_subnet_member(subnet_spec: &str, address: &str) -> bool {
    subnet_spec
        .parse::<Subnet>()
        .is_ok_and(|subnet| subnet.contains_str(address))
}
