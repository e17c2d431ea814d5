//! Route-socket connection with request/ACK handling.

use std::future::Future;
use std::time::Duration;

use super::builder::MessageBuilder;
use super::message::{MessageIter, NlMsgError};
use super::socket::NetlinkSocket;
use crate::config::Config;
use crate::error::{Error, Result};

/// A datagram transport carrying netlink messages.
///
/// [`NetlinkSocket`] is the production implementation; anything else that can
/// hand out sequence numbers and move whole datagrams can stand in for it.
pub trait Transport {
    /// Get the next sequence number.
    fn next_seq(&self) -> u32;

    /// The local port ID stamped into outgoing headers.
    fn pid(&self) -> u32;

    /// Send one complete message.
    fn send(&self, msg: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Receive one datagram (possibly several messages).
    fn recv_msg(&self) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

impl Transport for NetlinkSocket {
    fn next_seq(&self) -> u32 {
        NetlinkSocket::next_seq(self)
    }

    fn pid(&self) -> u32 {
        NetlinkSocket::pid(self)
    }

    fn send(&self, msg: &[u8]) -> impl Future<Output = Result<()>> + Send {
        NetlinkSocket::send(self, msg)
    }

    fn recv_msg(&self) -> impl Future<Output = Result<Vec<u8>>> + Send {
        NetlinkSocket::recv_msg(self)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn next_seq(&self) -> u32 {
        (**self).next_seq()
    }

    fn pid(&self) -> u32 {
        (**self).pid()
    }

    fn send(&self, msg: &[u8]) -> impl Future<Output = Result<()>> + Send {
        (**self).send(msg)
    }

    fn recv_msg(&self) -> impl Future<Output = Result<Vec<u8>>> + Send {
        (**self).recv_msg()
    }
}

/// Route-socket connection.
///
/// Requests are sent one at a time: each waits for the `NLMSG_ERROR` that
/// carries its own sequence number, skipping anything else that arrives.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use ifctl::netlink::{Connection, Ipv6Assignment};
///
/// let conn = Connection::new()?.with_timeout(Duration::from_secs(1));
/// let req = Ipv6Assignment::new(2, "2001:db8::1".parse()?, 64)?;
/// conn.assign_ipv6_address(&req).await?;
/// ```
#[derive(Debug)]
pub struct Connection<T = NetlinkSocket> {
    transport: T,
    timeout: Option<Duration>,
}

impl Connection<NetlinkSocket> {
    /// Open a route socket with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Open a route socket with an explicit configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        let socket = NetlinkSocket::new(&config)?;
        Ok(Self::with_transport(socket, &config))
    }

    /// Get the underlying socket.
    pub fn socket(&self) -> &NetlinkSocket {
        &self.transport
    }
}

impl<T: Transport> Connection<T> {
    /// Build a connection on a custom transport.
    pub fn with_transport(transport: T, config: &Config) -> Self {
        Self {
            transport,
            timeout: config.request_timeout,
        }
    }

    /// Bound every request by `timeout`, overriding the configuration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The request timeout in effect.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The transport in use.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and return the kernel's raw status code.
    ///
    /// `0` means success; anything else is a negative errno. The request
    /// should carry `NLM_F_ACK`, otherwise the kernel only answers failures
    /// and a successful request waits until the timeout.
    pub async fn request_status(&self, builder: MessageBuilder) -> Result<i32> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(builder))
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => self.exchange(builder).await,
        }
    }

    /// Send a request that expects an ACK only.
    pub async fn request_ack(&self, builder: MessageBuilder) -> Result<()> {
        match self.request_status(builder).await? {
            0 => Ok(()),
            code => Err(Error::from_errno(code)),
        }
    }

    async fn exchange(&self, mut builder: MessageBuilder) -> Result<i32> {
        let seq = self.transport.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.transport.pid());

        let msg = builder.finish();
        tracing::trace!(seq, len = msg.len(), "sending request");
        self.transport.send(&msg).await?;

        loop {
            let data = self.transport.recv_msg().await?;

            for result in MessageIter::new(&data) {
                let (header, payload) = result?;

                if header.nlmsg_seq != seq {
                    tracing::trace!(seq = header.nlmsg_seq, expected = seq, "skipping message");
                    continue;
                }

                if header.is_error() {
                    let err = NlMsgError::from_bytes(payload)?;
                    tracing::trace!(seq, code = err.error, "received status");
                    return Ok(err.error);
                }
            }
        }
    }
}
