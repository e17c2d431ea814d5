//! Address integration tests.
//!
//! Tests for IPv6 address assignment using network namespaces.

use std::net::Ipv6Addr;
use std::time::Duration;

use ifctl::netlink::{Connection, DEFAULT_IPV6_PREFIX_LEN, Ipv6Assignment};
use ifctl::{Config, Error, IfControl, Result};

use crate::common::TestNamespace;

#[test]
fn test_assign_ipv6_address() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("addr6")?;
    ns.add_dummy("dummy0")?;
    ns.link_up("dummy0")?;

    ns.run_async(|| async {
        let index = IfControl::new().resolve_index("dummy0")?;
        let conn = Connection::with_config(
            Config::new().request_timeout(Duration::from_secs(5)),
        )?;

        let ipv6: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let req = Ipv6Assignment::new(index, ipv6, DEFAULT_IPV6_PREFIX_LEN)?;
        conn.assign_ipv6_address(&req).await
    })?;

    let out = ns.ipv6_addrs("dummy0")?;
    assert!(out.contains("2001:db8::1/64"), "address should exist: {out}");

    Ok(())
}

#[test]
fn test_assign_custom_prefix_and_remove() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("addr6-prefix")?;
    ns.add_dummy("dummy0")?;
    ns.link_up("dummy0")?;

    let req = ns.run_async(|| async {
        let index = IfControl::new().resolve_index("dummy0")?;
        let conn = Connection::new()?.with_timeout(Duration::from_secs(5));

        let req = Ipv6Assignment::new(index, "fd00:1::5".parse().unwrap(), 56)?;
        conn.assign_ipv6_address(&req).await?;
        Ok::<_, Error>(req)
    })?;

    let out = ns.ipv6_addrs("dummy0")?;
    assert!(out.contains("fd00:1::5/56"), "address should exist: {out}");

    ns.run_async(move || async move {
        let conn = Connection::new()?.with_timeout(Duration::from_secs(5));
        conn.remove_ipv6_address(&req).await
    })?;

    let out = ns.ipv6_addrs("dummy0")?;
    assert!(!out.contains("fd00:1::5"), "address should be gone: {out}");

    Ok(())
}

#[test]
fn test_duplicate_assignment_reports_eexist() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("addr6-dup")?;
    ns.add_dummy("dummy0")?;
    ns.link_up("dummy0")?;

    let err = ns.run_async(|| async {
        let index = IfControl::new().resolve_index("dummy0")?;
        let conn = Connection::new()?.with_timeout(Duration::from_secs(5));

        let req = Ipv6Assignment::new(index, "2001:db8::2".parse().unwrap(), 64)?;
        conn.assign_ipv6_address(&req).await?;
        Ok::<_, Error>(conn.assign_ipv6_address(&req).await.unwrap_err())
    })?;

    assert!(err.is_already_exists(), "{err}");
    assert_eq!(err.errno(), Some(libc::EEXIST));

    Ok(())
}

#[test]
fn test_unknown_index_is_rejected() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("addr6-noindex")?;

    let err = ns.run_async(|| async {
        let conn = Connection::new()?.with_timeout(Duration::from_secs(5));
        let req = Ipv6Assignment::new(9999, "2001:db8::3".parse().unwrap(), 64)?;
        Ok::<_, Error>(conn.assign_ipv6_address(&req).await.unwrap_err())
    })?;

    assert!(err.errno().is_some(), "{err}");

    Ok(())
}

#[test]
fn test_small_recv_buffer_keeps_kernel_status() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("addr6-smallbuf")?;

    let err = ns.run_async(|| async {
        let config = Config::new()
            .recv_buffer_size(0)
            .request_timeout(Duration::from_secs(5));
        let conn = Connection::with_config(config)?;
        let req = Ipv6Assignment::new(99999, "2001:db8::4".parse().unwrap(), 64)?;
        Ok::<_, Error>(conn.assign_ipv6_address(&req).await.unwrap_err())
    })?;

    assert_eq!(err.errno(), Some(libc::ENODEV), "{err}");

    Ok(())
}
