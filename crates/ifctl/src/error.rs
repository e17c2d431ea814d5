//! Error types for interface control operations.

use std::io;
use std::time::Duration;

/// Result type for interface control operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while querying or mutating interface state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Socket or file I/O outside of a specific ioctl.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A control socket could not be created.
    #[error("cannot open {context} socket: {source}")]
    Socket {
        /// Which socket was being opened (e.g. "AF_PACKET/SOCK_RAW").
        context: &'static str,
        /// Why socket(2) failed.
        source: io::Error,
    },

    /// An interface ioctl was rejected by the kernel.
    #[error("ioctl {name} on {interface} failed: {source}")]
    Ioctl {
        /// The ioctl (or ethtool sub-command) name.
        name: &'static str,
        /// The interface the ioctl was issued against.
        interface: String,
        /// The errno the ioctl failed with.
        source: io::Error,
    },

    /// Nonzero status from the route socket.
    #[error("kernel rejected request: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel (positive).
        errno: i32,
        /// `strerror` text for `errno`.
        message: String,
    },

    /// A route-socket status tagged with the request that caused it.
    #[error("{operation}: {message} (errno {errno})")]
    KernelWithContext {
        /// What was being attempted.
        operation: String,
        /// The errno value from the kernel (positive).
        errno: i32,
        /// `strerror` text for `errno`.
        message: String,
    },

    /// No response arrived within the configured timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// A reply shorter than the structure it must contain.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Framing that does not add up, or any other malformed data.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// No interface with that name or index.
    #[error("interface not found: {name}")]
    InterfaceNotFound {
        /// The interface name (or index) that was not found.
        name: String,
    },

    /// Interface name rejected by strict validation.
    #[error("invalid interface name {name:?}: {reason}")]
    InvalidInterfaceName {
        /// The offending name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Prefix length outside the range of the address family.
    #[error("invalid prefix length {prefix_len} (max {max})")]
    InvalidPrefixLength {
        /// The requested prefix length.
        prefix_len: u8,
        /// The maximum for the address family.
        max: u8,
    },

    /// An ethtool request refused before reaching the kernel.
    #[error("invalid ethtool request {cmd:#x}: {reason}")]
    InvalidEthtoolRequest {
        /// The sub-command code.
        cmd: u32,
        /// Why it was refused.
        reason: &'static str,
    },

    /// Offload feature name that matches no known feature.
    #[error("unknown offload feature: {0}")]
    UnknownFeature(String),
}

impl Error {
    /// Create a kernel error from a (negative) netlink error code.
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Like [`from_errno`](Self::from_errno), tagged with `operation`.
    pub fn from_errno_with_context(errno: i32, operation: impl Into<String>) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::KernelWithContext {
            operation: operation.into(),
            errno: -errno,
            message,
        }
    }

    /// An ioctl failure on `interface`.
    pub fn ioctl(name: &'static str, interface: impl Into<String>, source: io::Error) -> Self {
        Self::Ioctl {
            name,
            interface: interface.into(),
            source,
        }
    }

    /// Create a socket acquisition error.
    pub fn socket(context: &'static str, source: io::Error) -> Self {
        Self::Socket { context, source }
    }

    /// Tag a route-socket status with the request that produced it.
    ///
    /// Only [`Error::Kernel`] changes; everything else passes through.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Kernel { errno, message } => Self::KernelWithContext {
                operation: operation.into(),
                errno,
                message,
            },
            other => other,
        }
    }

    /// Get the errno value, for kernel, ioctl and socket errors.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => Some(*errno),
            Self::Ioctl { source, .. } | Self::Socket { source, .. } | Self::Io(source) => {
                source.raw_os_error()
            }
            _ => None,
        }
    }

    /// The interface (or object) does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::InterfaceNotFound { .. } => true,
            _ => matches!(self.errno(), Some(libc::ENOENT | libc::ENODEV)),
        }
    }

    /// Missing capability.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.errno(), Some(libc::EPERM | libc::EACCES))
    }

    /// Check if the device does not support the operation (EOPNOTSUPP).
    pub fn is_not_supported(&self) -> bool {
        self.errno() == Some(libc::EOPNOTSUPP)
    }

    /// Check if this is an "already exists" error (EEXIST).
    pub fn is_already_exists(&self) -> bool {
        self.errno() == Some(libc::EEXIST)
    }

    /// Check if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
