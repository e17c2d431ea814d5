//! Identity lookup integration tests.

use ifctl::{IfControl, MacAddress, Result};

use crate::common::TestNamespace;

#[test]
fn test_resolve_loopback() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("ident-lo")?;
    let (index, name, mac) = ns.run(|| {
        let ctl = IfControl::new();
        Ok((
            ctl.resolve_index("lo")?,
            ctl.resolve_name(1)?,
            ctl.resolve_mac("lo")?,
        ))
    })?;

    assert_eq!(index, 1);
    assert_eq!(name, "lo");
    assert!(mac.is_zero());

    Ok(())
}

#[test]
fn test_resolve_dummy() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("ident-dummy")?;
    ns.add_dummy("dummy0")?;
    ns.set_mac("dummy0", "02:00:5e:10:20:30")?;

    let (index, name, mac) = ns.run(|| {
        let ctl = IfControl::new();
        let index = ctl.resolve_index("dummy0")?;
        Ok((index, ctl.resolve_name(index)?, ctl.resolve_mac("dummy0")?))
    })?;

    assert!(index > 1);
    assert_eq!(name, "dummy0");
    assert_eq!(mac, "02:00:5e:10:20:30".parse::<MacAddress>().unwrap());

    Ok(())
}

#[test]
fn test_missing_interface() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("ident-missing")?;
    let (index_err, mac_err) = ns.run(|| {
        let ctl = IfControl::new();
        Ok((
            ctl.resolve_index("nosuchdev0").unwrap_err(),
            ctl.resolve_mac("nosuchdev0").unwrap_err(),
        ))
    })?;

    assert!(index_err.is_not_found(), "{index_err}");
    assert!(mac_err.is_not_found(), "{mac_err}");

    Ok(())
}
