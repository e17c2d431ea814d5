//! Shared fixtures for the namespace-backed tests.

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;
use std::process::Command;
use std::sync::atomic::{AtomicU32, Ordering};

use ifctl::{Error, Result};

static NEXT_ID: AtomicU32 = AtomicU32::new(0);

fn namespace_name(prefix: &str) -> String {
    format!(
        "ifctl-test-{}-{}-{}",
        prefix,
        std::process::id(),
        NEXT_ID.fetch_add(1, Ordering::SeqCst)
    )
}

/// Run `ip` with `args`, returning stdout.
fn ip(args: &[&str]) -> Result<String> {
    let output = Command::new("ip").args(args).output()?;
    if !output.status.success() {
        return Err(Error::InvalidMessage(format!(
            "ip {}: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// A throwaway network namespace, deleted on drop.
///
/// Ioctls and route sockets act on the namespace of the calling thread,
/// so test bodies go through [`run`](Self::run), which spawns a thread
/// that has joined the namespace.
///
/// ```ignore
/// let ns = TestNamespace::new("mytest")?;
/// ns.add_dummy("dummy0")?;
/// let index = ns.run(|| IfControl::new().resolve_index("dummy0"))?;
/// ```
pub struct TestNamespace {
    name: String,
}

impl TestNamespace {
    pub fn new(prefix: &str) -> Result<Self> {
        let name = namespace_name(prefix);
        ip(&["netns", "add", &name])?;
        Ok(Self { name })
    }

    #[allow(dead_code)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `f` on a fresh thread inside this namespace.
    pub fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let path = format!("/var/run/netns/{}", self.name);
        std::thread::spawn(move || -> Result<T> {
            let ns = File::open(&path)?;
            // SAFETY: setns only affects the spawned thread.
            if unsafe { libc::setns(ns.as_raw_fd(), libc::CLONE_NEWNET) } < 0 {
                return Err(Error::Io(io::Error::last_os_error()));
            }
            f()
        })
        .join()
        .map_err(|_| Error::InvalidMessage("namespace thread panicked".into()))?
    }

    /// [`run`](Self::run) with a current-thread tokio runtime.
    #[allow(dead_code)]
    pub fn run_async<T, F, Fut>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T>>,
    {
        self.run(move || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(f())
        })
    }

    /// `ip <args>` executed inside the namespace.
    pub fn ip(&self, args: &[&str]) -> Result<String> {
        let mut full = vec!["-n", self.name.as_str()];
        full.extend_from_slice(args);
        ip(&full)
    }

    #[allow(dead_code)]
    pub fn add_dummy(&self, dev: &str) -> Result<()> {
        self.ip(&["link", "add", dev, "type", "dummy"]).map(drop)
    }

    #[allow(dead_code)]
    pub fn add_veth(&self, dev: &str, peer: &str) -> Result<()> {
        self.ip(&["link", "add", dev, "type", "veth", "peer", "name", peer])
            .map(drop)
    }

    #[allow(dead_code)]
    pub fn set_mac(&self, dev: &str, mac: &str) -> Result<()> {
        self.ip(&["link", "set", dev, "address", mac]).map(drop)
    }

    #[allow(dead_code)]
    pub fn link_up(&self, dev: &str) -> Result<()> {
        self.ip(&["link", "set", dev, "up"]).map(drop)
    }

    #[allow(dead_code)]
    pub fn ipv6_addrs(&self, dev: &str) -> Result<String> {
        self.ip(&["-6", "addr", "show", "dev", dev])
    }
}

impl Drop for TestNamespace {
    fn drop(&mut self) {
        let _ = ip(&["netns", "del", &self.name]);
    }
}

pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Return early from a test that needs root.
#[macro_export]
macro_rules! require_root {
    () => {
        if !crate::common::is_root() {
            eprintln!("Skipping test: requires root");
            return Ok(());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_names_are_unique() {
        let a = namespace_name("x");
        let b = namespace_name("x");
        assert_ne!(a, b);
        assert!(a.starts_with("ifctl-test-x-"));
    }
}
