//! The kernel-backed ioctl backend.

use crate::error::{Error, Result};
use crate::util::InterfaceName;

use super::ethtool;
use super::socket::{IoctlSocket, SocketKind};
use super::{HwAddr, IoctlBackend};

// Interface ioctl numbers (from linux/sockios.h)
const SIOCGIFNAME: libc::c_ulong = 0x8910;
const SIOCGIFHWADDR: libc::c_ulong = 0x8927;
const SIOCGIFINDEX: libc::c_ulong = 0x8933;
const SIOCETHTOOL: libc::c_ulong = 0x8946;

/// Issues real ioctls, one freshly opened socket per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBackend;

impl SystemBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

/// A zeroed `ifreq` carrying `name`.
fn ifreq_for(name: &InterfaceName) -> libc::ifreq {
    // SAFETY: ifreq is plain old data; all-zero is a valid value.
    let mut ifr: libc::ifreq = unsafe { std::mem::zeroed() };
    ifr.ifr_name = name.to_c_name();
    ifr
}

impl IoctlBackend for SystemBackend {
    fn if_index(&self, name: &InterfaceName) -> Result<u32> {
        let sock = IoctlSocket::open(SocketKind::PacketRaw)?;
        let mut ifr = ifreq_for(name);

        sock.ifreq(SIOCGIFINDEX, &mut ifr)
            .map_err(|e| Error::ioctl("SIOCGIFINDEX", name.as_str(), e))?;

        // SAFETY: SIOCGIFINDEX fills ifru_ifindex on success.
        let index = unsafe { ifr.ifr_ifru.ifru_ifindex };
        u32::try_from(index).map_err(|_| Error::InterfaceNotFound {
            name: name.to_string(),
        })
    }

    fn if_name(&self, index: u32) -> Result<InterfaceName> {
        let label = format!("ifindex {}", index);
        let raw_index = libc::c_int::try_from(index).map_err(|_| Error::InterfaceNotFound {
            name: label.clone(),
        })?;

        let sock = IoctlSocket::open(SocketKind::InetDgram)?;
        // SAFETY: ifreq is plain old data; all-zero is a valid value.
        let mut ifr: libc::ifreq = unsafe { std::mem::zeroed() };
        ifr.ifr_ifru.ifru_ifindex = raw_index;

        sock.ifreq(SIOCGIFNAME, &mut ifr)
            .map_err(|e| Error::ioctl("SIOCGIFNAME", label, e))?;

        Ok(InterfaceName::from_c_name(&ifr.ifr_name))
    }

    fn hw_addr(&self, name: &InterfaceName) -> Result<HwAddr> {
        let sock = IoctlSocket::open(SocketKind::InetStream)?;
        let mut ifr = ifreq_for(name);

        sock.ifreq(SIOCGIFHWADDR, &mut ifr)
            .map_err(|e| Error::ioctl("SIOCGIFHWADDR", name.as_str(), e))?;

        // SAFETY: SIOCGIFHWADDR fills ifru_hwaddr on success.
        let sa = unsafe { ifr.ifr_ifru.ifru_hwaddr };
        let mut data = [0u8; 14];
        for (dst, &src) in data.iter_mut().zip(sa.sa_data.iter()) {
            *dst = src as u8;
        }

        Ok(HwAddr {
            family: sa.sa_family,
            data,
        })
    }

    fn ethtool(&self, name: &InterfaceName, cmd: &'static str, data: &mut [u8]) -> Result<()> {
        // The kernel sizes its copy by the sub-command, not by `data`.
        ethtool::check_request(data)?;

        let sock = IoctlSocket::open(SocketKind::InetDgram)?;
        let mut ifr = ifreq_for(name);
        ifr.ifr_ifru.ifru_data = data.as_mut_ptr() as *mut libc::c_char;

        sock.ifreq(SIOCETHTOOL, &mut ifr)
            .map_err(|e| Error::ioctl(cmd, name.as_str(), e))
    }
}
