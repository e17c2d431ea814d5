//! Legacy `SIOCETHTOOL` command codes and request layouts.
//!
//! These mirror `struct ethtool_value` and `struct ethtool_cmd` from
//! `<linux/ethtool.h>`. Both are plain `u32`/`u16`/`u8` aggregates with no
//! implicit padding, so they are passed to the kernel as their raw bytes.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Error, Result};

/// Get settings (`struct ethtool_cmd`).
pub const ETHTOOL_GSET: u32 = 0x0000_0001;
/// Get RX hw csum enable.
pub const ETHTOOL_GRXCSUM: u32 = 0x0000_0014;
/// Set RX hw csum enable.
pub const ETHTOOL_SRXCSUM: u32 = 0x0000_0015;
/// Get TX hw csum enable.
pub const ETHTOOL_GTXCSUM: u32 = 0x0000_0016;
/// Set TX hw csum enable.
pub const ETHTOOL_STXCSUM: u32 = 0x0000_0017;
/// Get scatter-gather enable.
pub const ETHTOOL_GSG: u32 = 0x0000_0018;
/// Set scatter-gather enable.
pub const ETHTOOL_SSG: u32 = 0x0000_0019;
/// Get TSO enable.
pub const ETHTOOL_GTSO: u32 = 0x0000_001e;
/// Set TSO enable.
pub const ETHTOOL_STSO: u32 = 0x0000_001f;
/// Get UFO enable.
pub const ETHTOOL_GUFO: u32 = 0x0000_0021;
/// Set UFO enable.
pub const ETHTOOL_SUFO: u32 = 0x0000_0022;
/// Get GSO enable.
pub const ETHTOOL_GGSO: u32 = 0x0000_0023;
/// Set GSO enable.
pub const ETHTOOL_SGSO: u32 = 0x0000_0024;

/// Speed reported when the link speed is unknown (`SPEED_UNKNOWN`).
pub const SPEED_UNKNOWN: u32 = u32::MAX;
/// Same, as seen through the 16-bit legacy field alone.
pub const SPEED_UNKNOWN_LEGACY: u32 = 0xffff;

/// Human-readable name of an ethtool sub-command, for error messages.
pub fn cmd_name(cmd: u32) -> &'static str {
    match cmd {
        ETHTOOL_GSET => "ETHTOOL_GSET",
        ETHTOOL_GRXCSUM => "ETHTOOL_GRXCSUM",
        ETHTOOL_SRXCSUM => "ETHTOOL_SRXCSUM",
        ETHTOOL_GTXCSUM => "ETHTOOL_GTXCSUM",
        ETHTOOL_STXCSUM => "ETHTOOL_STXCSUM",
        ETHTOOL_GSG => "ETHTOOL_GSG",
        ETHTOOL_SSG => "ETHTOOL_SSG",
        ETHTOOL_GTSO => "ETHTOOL_GTSO",
        ETHTOOL_STSO => "ETHTOOL_STSO",
        ETHTOOL_GUFO => "ETHTOOL_GUFO",
        ETHTOOL_SUFO => "ETHTOOL_SUFO",
        ETHTOOL_GGSO => "ETHTOOL_GGSO",
        ETHTOOL_SGSO => "ETHTOOL_SGSO",
        _ => "SIOCETHTOOL",
    }
}

/// Size of the request the kernel reads and writes for `cmd`.
///
/// `None` for sub-commands outside the set this crate issues; their
/// kernel-side layouts are unknown here.
pub fn request_len(cmd: u32) -> Option<usize> {
    match cmd {
        ETHTOOL_GSET => Some(size_of::<EthtoolCmd>()),
        ETHTOOL_GRXCSUM | ETHTOOL_SRXCSUM | ETHTOOL_GTXCSUM | ETHTOOL_STXCSUM | ETHTOOL_GSG
        | ETHTOOL_SSG | ETHTOOL_GTSO | ETHTOOL_STSO | ETHTOOL_GUFO | ETHTOOL_SUFO
        | ETHTOOL_GGSO | ETHTOOL_SGSO => Some(size_of::<EthtoolValue>()),
        _ => None,
    }
}

/// Check a raw request buffer before handing it to the kernel.
///
/// The leading `u32` must be a known sub-command and the buffer exactly
/// as long as that sub-command's request. Returns the sub-command code.
pub fn check_request(data: &[u8]) -> Result<u32> {
    let Some(head) = data.first_chunk::<4>() else {
        return Err(Error::InvalidEthtoolRequest {
            cmd: 0,
            reason: "request shorter than its command word",
        });
    };
    let cmd = u32::from_ne_bytes(*head);

    match request_len(cmd) {
        None => Err(Error::InvalidEthtoolRequest {
            cmd,
            reason: "unsupported sub-command",
        }),
        Some(len) if len != data.len() => Err(Error::InvalidEthtoolRequest {
            cmd,
            reason: "buffer size does not match the sub-command",
        }),
        Some(_) => Ok(cmd),
    }
}

/// Generic value request (mirrors `struct ethtool_value`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolValue {
    /// Sub-command code.
    pub cmd: u32,
    /// Value read or written.
    pub data: u32,
}

impl EthtoolValue {
    /// A "get" request for `cmd`.
    pub fn get(cmd: u32) -> Self {
        Self { cmd, data: 0 }
    }

    /// A "set" request for `cmd` carrying `data`.
    pub fn set(cmd: u32, data: u32) -> Self {
        Self { cmd, data }
    }
}

/// Link settings request (mirrors the deprecated `struct ethtool_cmd`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EthtoolCmd {
    pub cmd: u32,
    pub supported: u32,
    pub advertising: u32,
    /// Low 16 bits of the speed in Mb/s.
    pub speed: u16,
    pub duplex: u8,
    pub port: u8,
    pub phy_address: u8,
    pub transceiver: u8,
    pub autoneg: u8,
    pub mdio_support: u8,
    pub maxtxpkt: u32,
    pub maxrxpkt: u32,
    /// High 16 bits of the speed in Mb/s.
    pub speed_hi: u16,
    pub eth_tp_mdix: u8,
    pub eth_tp_mdix_ctrl: u8,
    pub lp_advertising: u32,
    pub reserved: [u32; 2],
}

impl EthtoolCmd {
    /// A zeroed `ETHTOOL_GSET` request.
    pub fn gset() -> Self {
        Self {
            cmd: ETHTOOL_GSET,
            ..Default::default()
        }
    }

    /// Combined speed in Mb/s, `None` if the kernel reports it unknown.
    pub fn speed_mbps(&self) -> Option<u32> {
        let speed = ((self.speed_hi as u32) << 16) | self.speed as u32;
        match speed {
            0 | SPEED_UNKNOWN | SPEED_UNKNOWN_LEGACY => None,
            s => Some(s),
        }
    }

    /// Store a speed in Mb/s across the split legacy fields.
    pub fn set_speed_mbps(&mut self, speed: u32) {
        self.speed = (speed & 0xffff) as u16;
        self.speed_hi = (speed >> 16) as u16;
    }
}
