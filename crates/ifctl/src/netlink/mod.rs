//! Async route-socket (rtnetlink) support.
//!
//! Only what address assignment needs: a bound `NETLINK_ROUTE` socket, a
//! message builder, and a [`Connection`] that sends one request at a time and
//! waits for the kernel's status.
//!
//! # Quick Start
//!
//! ```ignore
//! use ifctl::netlink::{Connection, Ipv6Assignment};
//!
//! let conn = Connection::new()?;
//! let req = Ipv6Assignment::new(2, "fd00::1".parse()?, 64)?;
//! conn.assign_ipv6_address(&req).await?;
//! conn.remove_ipv6_address(&req).await?;
//! ```

pub mod addr;
pub mod attr;
pub mod builder;
pub mod connection;
pub mod message;
pub mod socket;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use addr::{DEFAULT_IPV6_PREFIX_LEN, Ipv6Assignment, MAX_IPV6_PREFIX_LEN};
pub use builder::MessageBuilder;
pub use connection::{Connection, Transport};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgError, NlMsgHdr, NlMsgType};
pub use socket::NetlinkSocket;
