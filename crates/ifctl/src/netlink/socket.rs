//! Low-level async route socket.

use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::BytesMut;
use netlink_sys::{Socket, SocketAddr, protocols};
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;

use crate::config::{Config, MIN_RECV_BUFFER};
use crate::error::{Error, Result};

/// Async `NETLINK_ROUTE` socket.
pub struct NetlinkSocket {
    /// The underlying async file descriptor.
    fd: AsyncFd<Socket>,
    /// Sequence number counter.
    seq: AtomicU32,
    /// Local port ID (assigned by kernel).
    pid: u32,
    /// Receive buffer size.
    recv_buffer_size: usize,
}

impl NetlinkSocket {
    /// Open and bind a route socket.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &Config) -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_ROUTE)
            .map_err(|e| Error::socket("NETLINK_ROUTE", e))?;
        socket.set_non_blocking(true)?;

        // Bind to get a port ID
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let pid = addr.port_number();

        // Extended ACK is optional
        socket.set_ext_ack(true).ok();

        let fd = AsyncFd::new(socket)?;
        tracing::trace!(pid, "route socket bound");

        Ok(Self {
            fd,
            seq: AtomicU32::new(1),
            pid,
            recv_buffer_size: config.recv_buffer_size.max(MIN_RECV_BUFFER),
        })
    }

    /// Get the next sequence number.
    pub fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Get the local port ID.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Send one message.
    pub async fn send(&self, msg: &[u8]) -> Result<()> {
        self.fd
            .async_io(Interest::WRITABLE, |sock| sock.send(msg, 0))
            .await?;
        Ok(())
    }

    /// Receive one datagram.
    ///
    /// A datagram larger than the receive buffer is an
    /// [`Error::Truncated`]; its tail is gone.
    pub async fn recv_msg(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(self.recv_buffer_size);
        // With MSG_TRUNC recv reports the full datagram length while only
        // advancing `buf` past the bytes that fit.
        let len = self
            .fd
            .async_io(Interest::READABLE, |sock| sock.recv(&mut buf, libc::MSG_TRUNC))
            .await?;
        if len > buf.len() {
            tracing::warn!(len, capacity = buf.len(), "route socket reply truncated");
            return Err(Error::Truncated {
                expected: len,
                actual: buf.len(),
            });
        }
        Ok(buf.to_vec())
    }
}

impl std::fmt::Debug for NetlinkSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetlinkSocket")
            .field("fd", &self.as_raw_fd())
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl AsRawFd for NetlinkSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.get_ref().as_raw_fd()
    }
}
