//! Offload feature control over the legacy ethtool ioctl.
//!
//! All six boolean offloads share one get and one set primitive
//! ([`IfControl::get_offload_feature`] / [`IfControl::set_offload_feature`]),
//! parameterized by the ethtool command code. The per-feature accessors are
//! thin specializations that only fix the code.
//!
//! # Example
//!
//! ```ignore
//! use ifctl::{IfControl, OffloadFeature};
//!
//! let ctl = IfControl::new();
//! if ctl.tso("eth0")? {
//!     ctl.set_tso("eth0", false)?;
//! }
//! ctl.set_feature("eth0", OffloadFeature::Gso, true)?;
//!
//! let state = ctl.offload_state("eth0")?;
//! println!("{state:?}");
//! ```

use std::fmt;
use std::str::FromStr;

use zerocopy::IntoBytes;

use crate::error::{Error, Result};
use crate::ioctl::ethtool::{self, EthtoolValue};
use crate::ioctl::{IfControl, IoctlBackend};
use crate::util::InterfaceName;

/// A boolean hardware offload reachable through the legacy ethtool ioctl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OffloadFeature {
    /// Receive checksum offload.
    RxChecksum,
    /// Transmit checksum offload.
    TxChecksum,
    /// Scatter-gather.
    ScatterGather,
    /// TCP segmentation offload.
    Tso,
    /// UDP fragmentation offload.
    Ufo,
    /// Generic segmentation offload.
    Gso,
}

impl OffloadFeature {
    /// Every feature, in ethtool display order.
    pub const ALL: [OffloadFeature; 6] = [
        OffloadFeature::RxChecksum,
        OffloadFeature::TxChecksum,
        OffloadFeature::ScatterGather,
        OffloadFeature::Tso,
        OffloadFeature::Ufo,
        OffloadFeature::Gso,
    ];

    /// The ethtool command that reads this feature.
    pub const fn get_cmd(self) -> u32 {
        match self {
            OffloadFeature::RxChecksum => ethtool::ETHTOOL_GRXCSUM,
            OffloadFeature::TxChecksum => ethtool::ETHTOOL_GTXCSUM,
            OffloadFeature::ScatterGather => ethtool::ETHTOOL_GSG,
            OffloadFeature::Tso => ethtool::ETHTOOL_GTSO,
            OffloadFeature::Ufo => ethtool::ETHTOOL_GUFO,
            OffloadFeature::Gso => ethtool::ETHTOOL_GGSO,
        }
    }

    /// The ethtool command that writes this feature.
    pub const fn set_cmd(self) -> u32 {
        match self {
            OffloadFeature::RxChecksum => ethtool::ETHTOOL_SRXCSUM,
            OffloadFeature::TxChecksum => ethtool::ETHTOOL_STXCSUM,
            OffloadFeature::ScatterGather => ethtool::ETHTOOL_SSG,
            OffloadFeature::Tso => ethtool::ETHTOOL_STSO,
            OffloadFeature::Ufo => ethtool::ETHTOOL_SUFO,
            OffloadFeature::Gso => ethtool::ETHTOOL_SGSO,
        }
    }

    /// The feature `cmd` reads, if it is one of the six get commands.
    pub fn from_get_cmd(cmd: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.get_cmd() == cmd)
    }

    /// The feature `cmd` writes, if it is one of the six set commands.
    pub fn from_set_cmd(cmd: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.set_cmd() == cmd)
    }

    /// The name `ethtool -k` uses for this feature.
    pub fn name(self) -> &'static str {
        match self {
            OffloadFeature::RxChecksum => "rx-checksumming",
            OffloadFeature::TxChecksum => "tx-checksumming",
            OffloadFeature::ScatterGather => "scatter-gather",
            OffloadFeature::Tso => "tcp-segmentation-offload",
            OffloadFeature::Ufo => "udp-fragmentation-offload",
            OffloadFeature::Gso => "generic-segmentation-offload",
        }
    }
}

impl fmt::Display for OffloadFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OffloadFeature {
    type Err = Error;

    /// Accepts the `ethtool -K` short names (`rx`, `tx`, `sg`, `tso`,
    /// `ufo`, `gso`) as well as the long names.
    fn from_str(s: &str) -> Result<Self> {
        let feature = match s {
            "rx" => OffloadFeature::RxChecksum,
            "tx" => OffloadFeature::TxChecksum,
            "sg" => OffloadFeature::ScatterGather,
            "tso" => OffloadFeature::Tso,
            "ufo" => OffloadFeature::Ufo,
            "gso" => OffloadFeature::Gso,
            other => Self::ALL
                .into_iter()
                .find(|f| f.name() == other)
                .ok_or_else(|| Error::UnknownFeature(other.to_string()))?,
        };
        Ok(feature)
    }
}

/// Snapshot of all six offloads on one interface.
///
/// `None` means the device does not support querying that feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OffloadState {
    pub rx_checksum: Option<bool>,
    pub tx_checksum: Option<bool>,
    pub scatter_gather: Option<bool>,
    pub tso: Option<bool>,
    pub ufo: Option<bool>,
    pub gso: Option<bool>,
}

impl OffloadState {
    /// The recorded value of one feature.
    pub fn get(&self, feature: OffloadFeature) -> Option<bool> {
        match feature {
            OffloadFeature::RxChecksum => self.rx_checksum,
            OffloadFeature::TxChecksum => self.tx_checksum,
            OffloadFeature::ScatterGather => self.scatter_gather,
            OffloadFeature::Tso => self.tso,
            OffloadFeature::Ufo => self.ufo,
            OffloadFeature::Gso => self.gso,
        }
    }

    fn slot(&mut self, feature: OffloadFeature) -> &mut Option<bool> {
        match feature {
            OffloadFeature::RxChecksum => &mut self.rx_checksum,
            OffloadFeature::TxChecksum => &mut self.tx_checksum,
            OffloadFeature::ScatterGather => &mut self.scatter_gather,
            OffloadFeature::Tso => &mut self.tso,
            OffloadFeature::Ufo => &mut self.ufo,
            OffloadFeature::Gso => &mut self.gso,
        }
    }

    /// Iterate over `(feature, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (OffloadFeature, Option<bool>)> + '_ {
        OffloadFeature::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

impl<B: IoctlBackend> IfControl<B> {
    // ========================================================================
    // Generic primitives
    // ========================================================================

    /// Read an offload value with ethtool command `cmd`.
    ///
    /// `cmd` must be one of the six offload get commands; anything else is
    /// refused with [`Error::InvalidEthtoolRequest`] without an ioctl.
    pub fn get_offload_feature(&self, name: impl Into<InterfaceName>, cmd: u32) -> Result<u32> {
        let name = name.into();
        if OffloadFeature::from_get_cmd(cmd).is_none() {
            return Err(Error::InvalidEthtoolRequest {
                cmd,
                reason: "not an offload get command",
            });
        }
        let mut req = EthtoolValue::get(cmd);

        self.backend()
            .ethtool(&name, ethtool::cmd_name(cmd), req.as_mut_bytes())
            .inspect_err(|e| {
                tracing::debug!(interface = %name, cmd = ethtool::cmd_name(cmd), error = %e, "offload query failed");
            })?;

        Ok(req.data)
    }

    /// Write an offload value with ethtool command `cmd`.
    ///
    /// `cmd` must be one of the six offload set commands. Failures are
    /// logged at error level and returned.
    pub fn set_offload_feature(
        &self,
        name: impl Into<InterfaceName>,
        cmd: u32,
        value: u32,
    ) -> Result<()> {
        let name = name.into();
        if OffloadFeature::from_set_cmd(cmd).is_none() {
            return Err(Error::InvalidEthtoolRequest {
                cmd,
                reason: "not an offload set command",
            });
        }
        let mut req = EthtoolValue::set(cmd, value);

        self.backend()
            .ethtool(&name, ethtool::cmd_name(cmd), req.as_mut_bytes())
            .inspect_err(|e| {
                tracing::error!(interface = %name, cmd = ethtool::cmd_name(cmd), value, error = %e, "cannot set offload");
            })
    }

    /// Read one feature as a boolean.
    pub fn feature(&self, name: impl Into<InterfaceName>, feature: OffloadFeature) -> Result<bool> {
        Ok(self.get_offload_feature(name, feature.get_cmd())? != 0)
    }

    /// Enable or disable one feature.
    pub fn set_feature(
        &self,
        name: impl Into<InterfaceName>,
        feature: OffloadFeature,
        enabled: bool,
    ) -> Result<()> {
        self.set_offload_feature(name, feature.set_cmd(), u32::from(enabled))
    }

    /// Read all six features.
    ///
    /// Features the device does not support are reported as `None`; any
    /// other failure aborts the snapshot.
    pub fn offload_state(&self, name: impl Into<InterfaceName>) -> Result<OffloadState> {
        let name = name.into();
        let mut state = OffloadState::default();

        for feature in OffloadFeature::ALL {
            match self.feature(name, feature) {
                Ok(v) => *state.slot(feature) = Some(v),
                Err(e) if e.is_not_supported() => {}
                Err(e) => return Err(e),
            }
        }

        Ok(state)
    }

    // ========================================================================
    // Per-feature accessors
    // ========================================================================

    /// Receive checksum offload state.
    pub fn rx_checksum(&self, name: impl Into<InterfaceName>) -> Result<bool> {
        self.feature(name, OffloadFeature::RxChecksum)
    }

    /// Enable or disable receive checksum offload.
    pub fn set_rx_checksum(&self, name: impl Into<InterfaceName>, enabled: bool) -> Result<()> {
        self.set_feature(name, OffloadFeature::RxChecksum, enabled)
    }

    /// Transmit checksum offload state.
    pub fn tx_checksum(&self, name: impl Into<InterfaceName>) -> Result<bool> {
        self.feature(name, OffloadFeature::TxChecksum)
    }

    /// Enable or disable transmit checksum offload.
    pub fn set_tx_checksum(&self, name: impl Into<InterfaceName>, enabled: bool) -> Result<()> {
        self.set_feature(name, OffloadFeature::TxChecksum, enabled)
    }

    /// Scatter-gather state.
    pub fn scatter_gather(&self, name: impl Into<InterfaceName>) -> Result<bool> {
        self.feature(name, OffloadFeature::ScatterGather)
    }

    /// Enable or disable scatter-gather.
    pub fn set_scatter_gather(&self, name: impl Into<InterfaceName>, enabled: bool) -> Result<()> {
        self.set_feature(name, OffloadFeature::ScatterGather, enabled)
    }

    /// TCP segmentation offload state.
    pub fn tso(&self, name: impl Into<InterfaceName>) -> Result<bool> {
        self.feature(name, OffloadFeature::Tso)
    }

    /// Enable or disable TCP segmentation offload.
    pub fn set_tso(&self, name: impl Into<InterfaceName>, enabled: bool) -> Result<()> {
        self.set_feature(name, OffloadFeature::Tso, enabled)
    }

    /// UDP fragmentation offload state.
    pub fn ufo(&self, name: impl Into<InterfaceName>) -> Result<bool> {
        self.feature(name, OffloadFeature::Ufo)
    }

    /// Enable or disable UDP fragmentation offload.
    pub fn set_ufo(&self, name: impl Into<InterfaceName>, enabled: bool) -> Result<()> {
        self.set_feature(name, OffloadFeature::Ufo, enabled)
    }

    /// Generic segmentation offload state.
    pub fn gso(&self, name: impl Into<InterfaceName>) -> Result<bool> {
        self.feature(name, OffloadFeature::Gso)
    }

    /// Enable or disable generic segmentation offload.
    pub fn set_gso(&self, name: impl Into<InterfaceName>, enabled: bool) -> Result<()> {
        self.set_feature(name, OffloadFeature::Gso, enabled)
    }
}
