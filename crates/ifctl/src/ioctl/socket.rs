//! Throwaway sockets used as ioctl handles.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use crate::error::{Error, Result};

/// Socket flavours the interface ioctls are issued on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    /// `AF_PACKET` / `SOCK_RAW` (index lookup; needs `CAP_NET_RAW`).
    PacketRaw,
    /// `AF_INET` / `SOCK_STREAM` (hardware address lookup).
    InetStream,
    /// `AF_INET` / `SOCK_DGRAM` (ethtool and name lookup).
    InetDgram,
}

impl SocketKind {
    fn args(self) -> (libc::c_int, libc::c_int) {
        match self {
            SocketKind::PacketRaw => (libc::AF_PACKET, libc::SOCK_RAW),
            SocketKind::InetStream => (libc::AF_INET, libc::SOCK_STREAM),
            SocketKind::InetDgram => (libc::AF_INET, libc::SOCK_DGRAM),
        }
    }

    /// Label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            SocketKind::PacketRaw => "AF_PACKET/SOCK_RAW",
            SocketKind::InetStream => "AF_INET/SOCK_STREAM",
            SocketKind::InetDgram => "AF_INET/SOCK_DGRAM",
        }
    }
}

/// A socket owned for the duration of one ioctl round trip.
///
/// The descriptor is closed when the value is dropped, on every exit path.
#[derive(Debug)]
pub struct IoctlSocket {
    fd: OwnedFd,
    kind: SocketKind,
}

impl IoctlSocket {
    /// Open a socket of the given kind.
    pub fn open(kind: SocketKind) -> Result<Self> {
        let (domain, ty) = kind.args();
        // SAFETY: plain socket(2) call; the result is checked before use.
        let fd = unsafe { libc::socket(domain, ty | libc::SOCK_CLOEXEC, 0) };
        if fd < 0 {
            return Err(Error::socket(kind.label(), io::Error::last_os_error()));
        }

        // SAFETY: fd is a freshly created descriptor that nothing else owns.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { fd, kind })
    }

    /// The kind of socket this is.
    pub fn kind(&self) -> SocketKind {
        self.kind
    }

    /// Issue an interface ioctl carrying an `ifreq`.
    pub fn ifreq(&self, request: libc::c_ulong, ifr: &mut libc::ifreq) -> io::Result<()> {
        // SAFETY: every request issued through here takes a `struct ifreq`
        // argument, and `ifr` is a valid, exclusively borrowed ifreq.
        let ret = unsafe { libc::ioctl(self.fd.as_raw_fd(), request as _, ifr as *mut libc::ifreq) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl AsRawFd for IoctlSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}
