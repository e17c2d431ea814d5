//! Interface ioctls: identity lookups and the legacy ethtool interface.
//!
//! Every operation goes through an [`IoctlBackend`]. The production backend,
//! [`SystemBackend`], opens a fresh socket per call and closes it before
//! returning, whatever the outcome. Tests substitute an in-memory backend.
//!
//! The user-facing entry point is [`IfControl`]; its operations live in
//! [`crate::identity`], [`crate::offload`] and [`crate::settings`].

pub mod ethtool;
mod socket;
mod system;

#[cfg(test)]
pub(crate) mod mock;

pub use socket::{IoctlSocket, SocketKind};
pub use system::SystemBackend;

use crate::config::Config;
use crate::error::Result;
use crate::util::InterfaceName;

/// Raw link-layer address as returned by `SIOCGIFHWADDR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwAddr {
    /// Address family (`ARPHRD_*`).
    pub family: u16,
    /// The `sa_data` bytes.
    pub data: [u8; 14],
}

/// The kernel requests the control components are built on.
///
/// Implementations report socket failures as [`Error::Socket`] and rejected
/// requests as [`Error::Ioctl`].
///
/// [`Error::Socket`]: crate::Error::Socket
/// [`Error::Ioctl`]: crate::Error::Ioctl
pub trait IoctlBackend {
    /// `SIOCGIFINDEX`: interface name to index.
    fn if_index(&self, name: &InterfaceName) -> Result<u32>;

    /// `SIOCGIFNAME`: interface index to name.
    fn if_name(&self, index: u32) -> Result<InterfaceName>;

    /// `SIOCGIFHWADDR`: link-layer address.
    fn hw_addr(&self, name: &InterfaceName) -> Result<HwAddr>;

    /// `SIOCETHTOOL`: `data` is the ethtool request buffer, updated in place.
    ///
    /// `cmd` names the sub-command for error reporting. Implementations
    /// must refuse, with [`Error::InvalidEthtoolRequest`], any buffer that
    /// [`ethtool::check_request`] rejects, before the kernel sees it.
    ///
    /// [`Error::InvalidEthtoolRequest`]: crate::Error::InvalidEthtoolRequest
    fn ethtool(&self, name: &InterfaceName, cmd: &'static str, data: &mut [u8]) -> Result<()>;
}

impl<B: IoctlBackend + ?Sized> IoctlBackend for &B {
    fn if_index(&self, name: &InterfaceName) -> Result<u32> {
        (**self).if_index(name)
    }

    fn if_name(&self, index: u32) -> Result<InterfaceName> {
        (**self).if_name(index)
    }

    fn hw_addr(&self, name: &InterfaceName) -> Result<HwAddr> {
        (**self).hw_addr(name)
    }

    fn ethtool(&self, name: &InterfaceName, cmd: &'static str, data: &mut [u8]) -> Result<()> {
        (**self).ethtool(name, cmd, data)
    }
}

/// Stateless interface control over an ioctl backend.
///
/// # Example
///
/// ```ignore
/// use ifctl::IfControl;
///
/// let ctl = IfControl::new();
/// let index = ctl.resolve_index("eth0")?;
/// let mac = ctl.resolve_mac("eth0")?;
/// ctl.set_tso("eth0", false)?;
/// println!("{index}: {mac}, tso={}", ctl.tso("eth0")?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IfControl<B = SystemBackend> {
    backend: B,
    config: Config,
}

impl IfControl<SystemBackend> {
    /// Control the interfaces of the caller's network namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`new`](Self::new), with an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            backend: SystemBackend,
            config,
        }
    }
}

impl<B: IoctlBackend> IfControl<B> {
    /// Build on a custom backend.
    pub fn with_backend(backend: B, config: Config) -> Self {
        Self { backend, config }
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
