//! Shared utilities for ifctl.

pub mod addr;
pub mod ifname;

pub use addr::{MacAddress, format_mac, parse_ipv6_cidr, parse_mac};
pub use ifname::{IFNAMSIZ, InterfaceName};
