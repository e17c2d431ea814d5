//! Link settings (speed, duplex, port) and the cached interface entity.
//!
//! [`IfControl::link_settings`] issues a one-shot `ETHTOOL_GSET`.
//! [`Interface`] keeps the last result so readers can look at it without
//! touching the kernel:
//!
//! ```ignore
//! use ifctl::{IfControl, Interface};
//!
//! let ctl = IfControl::new();
//! let eth0 = Interface::new("eth0");
//! eth0.fetch_settings(&ctl)?;
//! if let Some(s) = eth0.settings().current() {
//!     println!("{:?} Mb/s {}", s.speed, s.duplex);
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;
use zerocopy::IntoBytes;

use crate::error::Result;
use crate::ioctl::ethtool::{self, EthtoolCmd};
use crate::ioctl::{IfControl, IoctlBackend};
use crate::util::InterfaceName;

/// Duplex mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Duplex {
    /// Half duplex.
    Half,
    /// Full duplex.
    Full,
    /// Unknown.
    #[default]
    Unknown,
}

impl Duplex {
    /// Parse from kernel value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Duplex::Half,
            0x01 => Duplex::Full,
            _ => Duplex::Unknown,
        }
    }
}

impl fmt::Display for Duplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Duplex::Half => "half",
            Duplex::Full => "full",
            Duplex::Unknown => "unknown",
        })
    }
}

/// Physical port type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Port {
    /// Twisted pair (RJ45).
    Tp,
    /// Attachment Unit Interface.
    Aui,
    /// Media Independent Interface.
    Mii,
    /// Fibre.
    Fibre,
    /// BNC.
    Bnc,
    /// Direct attach copper.
    Da,
    /// No physical port.
    None,
    /// Anything else.
    #[default]
    Other,
}

impl Port {
    /// Parse from kernel value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Port::Tp,
            0x01 => Port::Aui,
            0x02 => Port::Mii,
            0x03 => Port::Fibre,
            0x04 => Port::Bnc,
            0x05 => Port::Da,
            0xef => Port::None,
            _ => Port::Other,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Port::Tp => "Twisted Pair",
            Port::Aui => "AUI",
            Port::Mii => "MII",
            Port::Fibre => "FIBRE",
            Port::Bnc => "BNC",
            Port::Da => "Direct Attach Copper",
            Port::None => "None",
            Port::Other => "Other",
        })
    }
}

/// One consistent reading of a link's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkSettings {
    /// Speed in Mb/s, `None` when unknown (no carrier, virtual device).
    pub speed: Option<u32>,
    pub duplex: Duplex,
    pub port: Port,
    /// Autonegotiation enabled.
    pub autoneg: bool,
}

impl From<&EthtoolCmd> for LinkSettings {
    fn from(cmd: &EthtoolCmd) -> Self {
        Self {
            speed: cmd.speed_mbps(),
            duplex: Duplex::from_u8(cmd.duplex),
            port: Port::from_u8(cmd.port),
            autoneg: cmd.autoneg != 0,
        }
    }
}

/// Cached settings of an [`Interface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", content = "settings", rename_all = "lowercase"))]
pub enum SettingsState {
    /// Never fetched, or explicitly invalidated.
    #[default]
    Unfetched,
    /// From the last successful fetch.
    Fresh(LinkSettings),
    /// From an earlier fetch; the latest one failed.
    Stale(LinkSettings),
}

impl SettingsState {
    /// The last known settings, fresh or stale.
    pub fn current(&self) -> Option<&LinkSettings> {
        match self {
            SettingsState::Unfetched => None,
            SettingsState::Fresh(s) | SettingsState::Stale(s) => Some(s),
        }
    }

    /// Whether the cached settings came from the last fetch.
    pub fn is_fresh(&self) -> bool {
        matches!(self, SettingsState::Fresh(_))
    }

    /// Whether the last fetch failed after an earlier success.
    pub fn is_stale(&self) -> bool {
        matches!(self, SettingsState::Stale(_))
    }

    fn into_stale(self) -> Self {
        match self {
            SettingsState::Fresh(s) => SettingsState::Stale(s),
            other => other,
        }
    }
}

impl<B: IoctlBackend> IfControl<B> {
    /// Read speed, duplex, port and autonegotiation (`ETHTOOL_GSET`).
    pub fn link_settings(&self, name: impl Into<InterfaceName>) -> Result<LinkSettings> {
        let name = name.into();
        let mut cmd = EthtoolCmd::gset();

        self.backend()
            .ethtool(&name, ethtool::cmd_name(ethtool::ETHTOOL_GSET), cmd.as_mut_bytes())?;

        let settings = LinkSettings::from(&cmd);
        tracing::trace!(interface = %name, ?settings, "link settings");
        Ok(settings)
    }
}

/// A named interface with a settings cache.
///
/// The cache is shared: `fetch_settings` takes `&self` and may run while
/// other threads read [`settings`](Self::settings). Every update replaces the
/// whole snapshot, so a reader never sees speed from one fetch and duplex
/// from another.
#[derive(Debug)]
pub struct Interface {
    name: InterfaceName,
    settings: RwLock<SettingsState>,
}

impl Interface {
    /// An interface with nothing fetched yet.
    pub fn new(name: impl Into<InterfaceName>) -> Self {
        Self {
            name: name.into(),
            settings: RwLock::new(SettingsState::Unfetched),
        }
    }

    /// The interface name.
    pub fn name(&self) -> InterfaceName {
        self.name
    }

    /// Snapshot of the cached settings.
    pub fn settings(&self) -> SettingsState {
        *self.settings.read()
    }

    /// Query the kernel and refresh the cache.
    ///
    /// On failure the error is logged and returned; previously fetched
    /// values are kept but marked [`SettingsState::Stale`].
    pub fn fetch_settings<B: IoctlBackend>(&self, ctl: &IfControl<B>) -> Result<LinkSettings> {
        match ctl.link_settings(self.name) {
            Ok(settings) => {
                *self.settings.write() = SettingsState::Fresh(settings);
                Ok(settings)
            }
            Err(e) => {
                tracing::error!(interface = %self.name, error = %e, "cannot read link settings");
                let mut state = self.settings.write();
                *state = state.into_stale();
                Err(e)
            }
        }
    }

    /// Forget the cached settings.
    pub fn invalidate_settings(&self) {
        *self.settings.write() = SettingsState::Unfetched;
    }
}
