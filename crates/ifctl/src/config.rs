//! Explicit configuration for the control components.
//!
//! A [`Config`] is handed to [`IfControl`](crate::IfControl) and
//! [`Connection`](crate::netlink::Connection) at construction time. There
//! are no process-wide toggles: two components built from different
//! configs behave independently.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use ifctl::{Config, IfControl};
//! use ifctl::netlink::Connection;
//!
//! let config = Config::new().request_timeout(Duration::from_secs(2));
//!
//! let ctl = IfControl::with_config(config.clone());
//! let conn = Connection::with_config(config)?;
//! ```

use std::time::Duration;

/// Default receive buffer size for route socket responses.
pub const DEFAULT_RECV_BUFFER: usize = 32 * 1024;

/// Smallest accepted receive buffer: one page, enough for any status reply
/// including the echoed request and extended-ack attributes.
pub const MIN_RECV_BUFFER: usize = 4096;

/// Configuration shared by the ioctl and route-socket components.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Upper bound on how long a route-socket request waits for its
    /// response. `None` waits forever.
    pub request_timeout: Option<Duration>,
    /// Receive buffer size used for route-socket responses. Values below
    /// [`MIN_RECV_BUFFER`] are raised to it.
    pub recv_buffer_size: usize,
    /// Log a warning when an ioctl query fails (index/name lookups are
    /// otherwise logged at debug level only).
    pub warn_on_query_failure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: None,
            recv_buffer_size: DEFAULT_RECV_BUFFER,
            warn_on_query_failure: false,
        }
    }
}

impl Config {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound route-socket requests by `timeout`.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Wait for route-socket responses without a bound.
    pub fn unbounded(mut self) -> Self {
        self.request_timeout = None;
        self
    }

    /// Set the route-socket receive buffer size, at least [`MIN_RECV_BUFFER`].
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size.max(MIN_RECV_BUFFER);
        self
    }

    /// Log failed index/name lookups at warn level.
    pub fn warn_on_query_failure(mut self, value: bool) -> Self {
        self.warn_on_query_failure = value;
        self
    }
}
