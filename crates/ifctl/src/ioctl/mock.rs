//! In-memory ioctl backend for unit tests.

use std::collections::HashMap;
use std::io;

use parking_lot::Mutex;
use zerocopy::{FromBytes, IntoBytes};

use super::ethtool::{self, EthtoolCmd, EthtoolValue};
use super::{HwAddr, IoctlBackend};
use crate::error::{Error, Result};
use crate::offload::OffloadFeature;
use crate::util::InterfaceName;

/// ARPHRD_ETHER
pub const ARPHRD_ETHER: u16 = 1;

#[derive(Debug, Clone, Default)]
pub struct MockIface {
    pub index: u32,
    pub mac: [u8; 6],
    /// Feature values keyed by their *get* command.
    pub features: HashMap<u32, u32>,
    pub settings: Option<EthtoolCmd>,
}

#[derive(Debug, Default)]
pub struct MockBackend {
    ifaces: Mutex<HashMap<String, MockIface>>,
    /// Every ethtool sub-command seen, in order.
    pub calls: Mutex<Vec<u32>>,
    /// Names exactly as they reached the backend.
    pub seen_names: Mutex<Vec<String>>,
}

fn errno(code: i32) -> io::Error {
    io::Error::from_raw_os_error(code)
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// An Ethernet-like interface with every offload enabled.
    pub fn with_iface(self, name: &str, index: u32, mac: [u8; 6]) -> Self {
        let features = OffloadFeature::ALL
            .iter()
            .map(|f| (f.get_cmd(), 1))
            .collect();
        self.ifaces.lock().insert(
            name.to_string(),
            MockIface {
                index,
                mac,
                features,
                settings: None,
            },
        );
        self
    }

    pub fn update(&self, name: &str, f: impl FnOnce(&mut MockIface)) {
        if let Some(iface) = self.ifaces.lock().get_mut(name) {
            f(iface);
        }
    }

    pub fn feature(&self, name: &str, get_cmd: u32) -> Option<u32> {
        self.ifaces
            .lock()
            .get(name)
            .and_then(|i| i.features.get(&get_cmd).copied())
    }

    fn lookup(&self, name: &InterfaceName, what: &'static str) -> Result<MockIface> {
        self.seen_names.lock().push(name.to_string());
        self.ifaces
            .lock()
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| Error::ioctl(what, name.as_str(), errno(libc::ENODEV)))
    }
}

impl IoctlBackend for MockBackend {
    fn if_index(&self, name: &InterfaceName) -> Result<u32> {
        Ok(self.lookup(name, "SIOCGIFINDEX")?.index)
    }

    fn if_name(&self, index: u32) -> Result<InterfaceName> {
        self.ifaces
            .lock()
            .iter()
            .find(|(_, i)| i.index == index)
            .map(|(n, _)| InterfaceName::new(n))
            .ok_or_else(|| Error::ioctl("SIOCGIFNAME", format!("ifindex {}", index), errno(libc::ENODEV)))
    }

    fn hw_addr(&self, name: &InterfaceName) -> Result<HwAddr> {
        let iface = self.lookup(name, "SIOCGIFHWADDR")?;
        let mut data = [0u8; 14];
        data[..6].copy_from_slice(&iface.mac);
        Ok(HwAddr {
            family: ARPHRD_ETHER,
            data,
        })
    }

    fn ethtool(&self, name: &InterfaceName, cmd: &'static str, data: &mut [u8]) -> Result<()> {
        let code = ethtool::check_request(data)?;
        self.lookup(name, cmd)?;
        self.calls.lock().push(code);

        let mut ifaces = self.ifaces.lock();
        let iface = ifaces
            .get_mut(name.as_str())
            .ok_or_else(|| Error::ioctl(cmd, name.as_str(), errno(libc::ENODEV)))?;

        if code == ethtool::ETHTOOL_GSET {
            let settings = iface
                .settings
                .ok_or_else(|| Error::ioctl(cmd, name.as_str(), errno(libc::EOPNOTSUPP)))?;
            let reply = EthtoolCmd {
                cmd: code,
                ..settings
            };
            data.copy_from_slice(reply.as_bytes());
            return Ok(());
        }

        let feature = OffloadFeature::from_get_cmd(code)
            .or_else(|| OffloadFeature::from_set_cmd(code))
            .ok_or_else(|| Error::ioctl(cmd, name.as_str(), errno(libc::EINVAL)))?;
        let mut req = EthtoolValue::read_from_bytes(data)
            .map_err(|_| Error::ioctl(cmd, name.as_str(), errno(libc::EFAULT)))?;

        let Some(current) = iface.features.get_mut(&feature.get_cmd()) else {
            return Err(Error::ioctl(cmd, name.as_str(), errno(libc::EOPNOTSUPP)));
        };

        if code == feature.get_cmd() {
            req.data = *current;
            data.copy_from_slice(req.as_bytes());
        } else {
            *current = u32::from(req.data != 0);
        }
        Ok(())
    }
}
