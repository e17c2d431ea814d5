//! IPv6 address assignment over the route socket.
//!
//! # Example
//!
//! ```ignore
//! use ifctl::IfControl;
//! use ifctl::netlink::{Connection, DEFAULT_IPV6_PREFIX_LEN, Ipv6Assignment};
//!
//! let index = IfControl::new().resolve_index("eth0")?;
//! let conn = Connection::new()?;
//!
//! let req = Ipv6Assignment::new(index, "2001:db8::1".parse()?, DEFAULT_IPV6_PREFIX_LEN)?;
//! conn.assign_ipv6_address(&req).await?;
//! ```

use std::fmt;
use std::net::Ipv6Addr;

use super::builder::MessageBuilder;
use super::connection::{Connection, Transport};
use super::message::{NLM_F_ACK, NLM_F_CREATE, NLM_F_EXCL, NLM_F_REQUEST, NlMsgType};
use super::types::{IfAddrMsg, ifa};
use crate::error::{Error, Result};

/// Prefix length for callers that want the conventional /64.
pub const DEFAULT_IPV6_PREFIX_LEN: u8 = 64;

/// Longest valid IPv6 prefix.
pub const MAX_IPV6_PREFIX_LEN: u8 = 128;

/// One IPv6 address on one interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Assignment {
    index: u32,
    address: Ipv6Addr,
    prefix_len: u8,
}

impl Ipv6Assignment {
    /// Describe `address/prefix_len` on interface `index`.
    ///
    /// Prefix lengths above 128 are rejected.
    pub fn new(index: u32, address: Ipv6Addr, prefix_len: u8) -> Result<Self> {
        if prefix_len > MAX_IPV6_PREFIX_LEN {
            return Err(Error::InvalidPrefixLength {
                prefix_len,
                max: MAX_IPV6_PREFIX_LEN,
            });
        }

        Ok(Self {
            index,
            address,
            prefix_len,
        })
    }

    /// Interface index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The address.
    pub fn address(&self) -> Ipv6Addr {
        self.address
    }

    /// Prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Build the `RTM_NEWADDR` request.
    pub fn add_request(&self) -> MessageBuilder {
        let mut builder = MessageBuilder::new(
            NlMsgType::RTM_NEWADDR,
            NLM_F_REQUEST | NLM_F_ACK | NLM_F_CREATE | NLM_F_EXCL,
        );
        builder.append(&IfAddrMsg::ipv6(self.index, self.prefix_len));
        builder.append_attr(ifa::LOCAL, &self.address.octets());
        builder.append_attr(ifa::ADDRESS, &self.address.octets());
        builder
    }

    /// Build the `RTM_DELADDR` request.
    pub fn delete_request(&self) -> MessageBuilder {
        let mut builder = MessageBuilder::new(NlMsgType::RTM_DELADDR, NLM_F_REQUEST | NLM_F_ACK);
        builder.append(&IfAddrMsg::ipv6(self.index, self.prefix_len));
        builder.append_attr(ifa::LOCAL, &self.address.octets());
        builder
    }
}

impl fmt::Display for Ipv6Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} on ifindex {}", self.address, self.prefix_len, self.index)
    }
}

impl<T: Transport> Connection<T> {
    /// Add an IPv6 address to an interface.
    ///
    /// Succeeds only if the kernel acknowledged the request with status 0;
    /// any other status is returned with its errno.
    pub async fn assign_ipv6_address(&self, assignment: &Ipv6Assignment) -> Result<()> {
        tracing::debug!(%assignment, "assigning address");
        self.request_ack(assignment.add_request())
            .await
            .map_err(|e| e.with_context(format!("adding {}", assignment)))
            .inspect_err(|e| tracing::error!(error = %e, "address assignment failed"))
    }

    /// Remove an IPv6 address from an interface.
    pub async fn remove_ipv6_address(&self, assignment: &Ipv6Assignment) -> Result<()> {
        tracing::debug!(%assignment, "removing address");
        self.request_ack(assignment.delete_request())
            .await
            .map_err(|e| e.with_context(format!("removing {}", assignment)))
            .inspect_err(|e| tracing::error!(error = %e, "address removal failed"))
    }
}
