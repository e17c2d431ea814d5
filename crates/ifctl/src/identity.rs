//! Interface identity: index, name and hardware address lookups.

use crate::error::{Error, Result};
use crate::ioctl::{IfControl, IoctlBackend};
use crate::util::{InterfaceName, MacAddress};

impl<B: IoctlBackend> IfControl<B> {
    /// Resolve an interface name to its kernel index (`SIOCGIFINDEX`).
    ///
    /// Failures are only logged at debug level (or warn, with
    /// [`Config::warn_on_query_failure`](crate::Config)); the caller decides
    /// whether a missing interface is worth reporting.
    pub fn resolve_index(&self, name: impl Into<InterfaceName>) -> Result<u32> {
        let name = name.into();
        self.backend().if_index(&name).inspect_err(|e| {
            if self.config().warn_on_query_failure {
                tracing::warn!(interface = %name, error = %e, "index lookup failed");
            } else {
                tracing::debug!(interface = %name, error = %e, "index lookup failed");
            }
        })
    }

    /// Resolve an interface index back to its name (`SIOCGIFNAME`).
    pub fn resolve_name(&self, index: u32) -> Result<InterfaceName> {
        if index == 0 {
            return Err(Error::InterfaceNotFound {
                name: "ifindex 0".to_string(),
            });
        }

        self.backend().if_name(index).inspect_err(|e| {
            if self.config().warn_on_query_failure {
                tracing::warn!(index, error = %e, "name lookup failed");
            } else {
                tracing::debug!(index, error = %e, "name lookup failed");
            }
        })
    }

    /// Read an interface's hardware address (`SIOCGIFHWADDR`).
    ///
    /// A failed query is logged as a warning and returned as an error; it is
    /// never reported as an all-zero address.
    pub fn resolve_mac(&self, name: impl Into<InterfaceName>) -> Result<MacAddress> {
        let name = name.into();
        let hw = self.backend().hw_addr(&name).inspect_err(|e| {
            tracing::warn!(interface = %name, error = %e, "cannot read hardware address");
        })?;

        let mac = MacAddress::from_slice(&hw.data).ok_or_else(|| {
            Error::InvalidMessage(format!("short hardware address for {}", name))
        })?;
        tracing::trace!(interface = %name, family = hw.family, %mac, "hardware address");
        Ok(mac)
    }
}
