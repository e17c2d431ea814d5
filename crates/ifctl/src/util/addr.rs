//! Hardware and IP address helpers.

use std::fmt::{self, Write as _};
use std::net::Ipv6Addr;
use std::str::FromStr;

/// Rejected address text.
#[derive(Debug, thiserror::Error)]
pub enum AddrError {
    #[error("{0:?} is not an IPv6 address")]
    NotIpv6(String),

    #[error("bad prefix length {0:?} (expected 0..=128)")]
    BadPrefix(String),

    #[error("{0:?} is not a MAC address")]
    BadMac(String),
}

pub type Result<T> = std::result::Result<T, AddrError>;

/// Length of an Ethernet hardware address.
pub const ETH_ALEN: usize = 6;

/// A 6-byte link-layer (MAC) address.
///
/// Only produced by a successful query; an all-zero value is a real
/// address (e.g. loopback), not a failure marker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress([u8; ETH_ALEN]);

impl MacAddress {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; ETH_ALEN]) -> Self {
        Self(bytes)
    }

    /// Copy the first six bytes of a kernel `sa_data` buffer.
    ///
    /// Returns `None` if fewer than six bytes are available.
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        let bytes: [u8; ETH_ALEN] = data.get(..ETH_ALEN)?.try_into().ok()?;
        Some(Self(bytes))
    }

    /// The raw address bytes.
    pub const fn octets(&self) -> [u8; ETH_ALEN] {
        self.0
    }

    /// Check if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; ETH_ALEN]
    }

    /// Check the multicast (group) bit.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Check the locally-administered bit.
    pub fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_mac(&self.0))
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({})", self)
    }
}

impl FromStr for MacAddress {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self> {
        parse_mac(s).map(Self)
    }
}

impl From<[u8; ETH_ALEN]> for MacAddress {
    fn from(bytes: [u8; ETH_ALEN]) -> Self {
        Self(bytes)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MacAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse `addr[/prefix]`, using `default_prefix` when no prefix is given.
///
/// ```ignore
/// let (addr, len) = parse_ipv6_cidr("2001:db8::1", 64)?;
/// assert_eq!(len, 64);
/// ```
pub fn parse_ipv6_cidr(s: &str, default_prefix: u8) -> Result<(Ipv6Addr, u8)> {
    let (addr, prefix) = match s.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (s, None),
    };

    let addr: Ipv6Addr = addr
        .parse()
        .map_err(|_| AddrError::NotIpv6(addr.to_string()))?;

    let prefix_len = match prefix {
        None => default_prefix,
        Some(p) => p
            .parse::<u8>()
            .ok()
            .filter(|&len| len <= 128)
            .ok_or_else(|| AddrError::BadPrefix(p.to_string()))?,
    };

    Ok((addr, prefix_len))
}

/// Parse colon-separated hex octets (`aa:bb:cc:dd:ee:ff`).
pub fn parse_mac(s: &str) -> Result<[u8; ETH_ALEN]> {
    let bad = || AddrError::BadMac(s.to_string());

    let mut mac = [0u8; ETH_ALEN];
    let mut octets = s.split(':');
    for slot in mac.iter_mut() {
        let octet = octets
            .next()
            .filter(|o| (1..=2).contains(&o.len()))
            .ok_or_else(bad)?;
        *slot = u8::from_str_radix(octet, 16).map_err(|_| bad())?;
    }
    if octets.next().is_some() {
        return Err(bad());
    }

    Ok(mac)
}

/// Lowercase colon-separated hex.
pub fn format_mac(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        let _ = write!(out, "{:02x}", b);
    }
    out
}
