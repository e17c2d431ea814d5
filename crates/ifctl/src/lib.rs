//! Linux network interface control.
//!
//! This crate covers the small set of kernel interfaces a NIC management
//! daemon needs on the hot path:
//!
//! - interface identity lookups (name to index, index to name, hardware
//!   address) via interface ioctls,
//! - hardware offload control (checksums, scatter-gather, TSO, UFO, GSO)
//!   via the legacy ethtool ioctl,
//! - link settings (speed, duplex, port) with a shared per-interface cache,
//! - IPv6 address assignment and removal over an async route socket.
//!
//! # Features
//!
//! - `serde` - `Serialize`/`Deserialize` for [`Config`] and the query results
//!
//! # Example
//!
//! ```ignore
//! use ifctl::{IfControl, Interface};
//! use ifctl::netlink::{Connection, Ipv6Assignment};
//!
//! #[tokio::main]
//! async fn main() -> ifctl::Result<()> {
//!     let ctl = IfControl::new();
//!
//!     let index = ctl.resolve_index("eth0")?;
//!     println!("eth0 is {} ({})", index, ctl.resolve_mac("eth0")?);
//!
//!     ctl.set_gso("eth0", true)?;
//!
//!     let eth0 = Interface::new("eth0");
//!     let settings = eth0.fetch_settings(&ctl)?;
//!     println!("{:?} Mb/s, {} duplex", settings.speed, settings.duplex);
//!
//!     let conn = Connection::new()?;
//!     conn.assign_ipv6_address(&Ipv6Assignment::new(index, "fd00::1".parse().unwrap(), 64)?)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! # Privileges
//!
//! Index lookups open an `AF_PACKET` socket and need `CAP_NET_RAW`. Offload
//! changes and address assignment need `CAP_NET_ADMIN`.

pub mod config;
pub mod error;
pub mod identity;
pub mod ioctl;
pub mod netlink;
pub mod offload;
pub mod settings;
pub mod util;

// Re-export common types at crate root for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use ioctl::{IfControl, IoctlBackend, SystemBackend};
pub use offload::{OffloadFeature, OffloadState};
pub use settings::{Duplex, Interface, LinkSettings, Port, SettingsState};
pub use util::{InterfaceName, MacAddress};
