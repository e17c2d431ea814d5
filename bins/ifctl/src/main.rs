//! ifctl: query and control network interfaces.
//!
//! Proof-of-concept front end for the `ifctl` library. Every subcommand maps
//! onto one library operation.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ifctl::netlink::{Connection, DEFAULT_IPV6_PREFIX_LEN, Ipv6Assignment};
use ifctl::util::parse_ipv6_cidr;
use ifctl::{Config, IfControl, Interface, OffloadFeature};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "ifctl", version, about = "Network interface control tool")]
struct Cli {
    /// Output JSON.
    #[arg(short = 'j', long, global = true)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long, global = true)]
    pretty: bool,

    /// Give up on route-socket requests after this many milliseconds.
    #[arg(long, value_name = "MS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the kernel index of an interface.
    Index {
        /// Interface name.
        dev: String,
    },

    /// Print the name of the interface with the given index.
    Name {
        /// Interface index.
        index: u32,
    },

    /// Print the hardware address of an interface.
    Mac {
        /// Interface name.
        dev: String,
    },

    /// Show offload features.
    #[command(visible_alias = "k")]
    Features {
        /// Interface name.
        dev: String,
    },

    /// Show or change one offload feature.
    Feature(FeatureArgs),

    /// Show speed, duplex and port.
    Settings {
        /// Interface name.
        dev: String,
    },

    /// Manage IPv6 addresses.
    #[command(visible_alias = "a", visible_alias = "address")]
    Addr {
        #[command(subcommand)]
        action: AddrAction,
    },
}

#[derive(Args)]
struct FeatureArgs {
    /// Interface name.
    dev: String,

    /// Feature (rx, tx, sg, tso, ufo, gso).
    feature: OffloadFeature,

    /// New state; omit to show the current one.
    state: Option<Toggle>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
enum AddrAction {
    /// Add an IPv6 address.
    Add {
        /// Address with optional prefix (default /64).
        address: String,

        /// Device name.
        #[arg(long, short)]
        dev: String,
    },

    /// Delete an IPv6 address.
    Del {
        /// Address with optional prefix (default /64).
        address: String,

        /// Device name.
        #[arg(long, short)]
        dev: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::new();
    if let Some(ms) = cli.timeout {
        config = config.request_timeout(Duration::from_millis(ms));
    }

    let out = Output {
        json: cli.json,
        pretty: cli.pretty,
    };
    let ctl = IfControl::with_config(config.clone());

    match cli.command {
        Command::Index { dev } => {
            let index = ctl.resolve_index(dev.as_str())?;
            out.value(&index, || index.to_string())?;
        }
        Command::Name { index } => {
            let name = ctl.resolve_name(index)?;
            out.value(&name, || name.to_string())?;
        }
        Command::Mac { dev } => {
            let mac = ctl.resolve_mac(dev.as_str())?;
            out.value(&mac, || mac.to_string())?;
        }
        Command::Features { dev } => {
            let state = ctl.offload_state(dev.as_str())?;
            out.value(&state, || {
                state
                    .iter()
                    .map(|(feature, value)| {
                        let value = match value {
                            Some(true) => "on",
                            Some(false) => "off",
                            None => "n/a",
                        };
                        format!("{}: {}", feature, value)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Feature(args) => match args.state {
            Some(toggle) => {
                ctl.set_feature(args.dev.as_str(), args.feature, matches!(toggle, Toggle::On))?;
            }
            None => {
                let enabled = ctl.feature(args.dev.as_str(), args.feature)?;
                out.value(&enabled, || {
                    format!("{}: {}", args.feature, if enabled { "on" } else { "off" })
                })?;
            }
        },
        Command::Settings { dev } => {
            let iface = Interface::new(dev.as_str());
            let settings = iface.fetch_settings(&ctl)?;
            out.value(&settings, || {
                let speed = match settings.speed {
                    Some(mbps) => format!("{}Mb/s", mbps),
                    None => "Unknown!".to_string(),
                };
                format!(
                    "Settings for {}:\n\tSpeed: {}\n\tDuplex: {}\n\tPort: {}\n\tAuto-negotiation: {}",
                    iface.name(),
                    speed,
                    settings.duplex,
                    settings.port,
                    if settings.autoneg { "on" } else { "off" }
                )
            })?;
        }
        Command::Addr { action } => {
            let conn = Connection::with_config(config)?;
            match action {
                AddrAction::Add { address, dev } => {
                    let req = assignment(&ctl, &address, &dev)?;
                    conn.assign_ipv6_address(&req).await?;
                }
                AddrAction::Del { address, dev } => {
                    let req = assignment(&ctl, &address, &dev)?;
                    conn.remove_ipv6_address(&req).await?;
                }
            }
        }
    }

    Ok(())
}

/// Resolve `dev` and parse `address[/prefix]` into an assignment.
fn assignment(ctl: &IfControl, address: &str, dev: &str) -> anyhow::Result<Ipv6Assignment> {
    let (addr, prefix_len) = parse_ipv6_cidr(address, DEFAULT_IPV6_PREFIX_LEN)?;

    let index = ctl
        .resolve_index(dev)
        .with_context(|| format!("cannot find device \"{}\"", dev))?;

    Ok(Ipv6Assignment::new(index, addr, prefix_len)?)
}

/// Text or JSON output.
struct Output {
    json: bool,
    pretty: bool,
}

impl Output {
    fn value<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if self.json {
            if self.pretty {
                serde_json::to_writer_pretty(&mut stdout, value)?;
            } else {
                serde_json::to_writer(&mut stdout, value)?;
            }
            writeln!(stdout)
        } else {
            writeln!(stdout, "{}", text())
        }
    }
}
