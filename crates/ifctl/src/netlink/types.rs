//! Address message body (`<linux/if_addr.h>`).

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

pub const AF_INET6: u8 = libc::AF_INET6 as u8;

/// `IFA_*` attribute types used in address requests.
pub mod ifa {
    /// Peer address; equal to the local one on broadcast links.
    pub const ADDRESS: u16 = 1;
    /// Address configured on the interface.
    pub const LOCAL: u16 = 2;
}

/// `struct ifaddrmsg`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct IfAddrMsg {
    pub ifa_family: u8,
    pub ifa_prefixlen: u8,
    /// `IFA_F_*`
    pub ifa_flags: u8,
    pub ifa_scope: u8,
    pub ifa_index: u32,
}

impl IfAddrMsg {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Body for an IPv6 address request on interface `index`.
    ///
    /// Flags and scope are left at zero so the kernel derives the scope
    /// from the address.
    pub fn ipv6(index: u32, prefix_len: u8) -> Self {
        Self {
            ifa_family: AF_INET6,
            ifa_prefixlen: prefix_len,
            ifa_index: index,
            ..Default::default()
        }
    }
}
