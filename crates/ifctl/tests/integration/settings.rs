//! Link settings integration tests.

use ifctl::{Duplex, IfControl, Interface, Result, SettingsState};

use crate::common::TestNamespace;

#[test]
fn test_veth_settings() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("settings")?;
    ns.add_veth("veth0", "veth1")?;
    ns.link_up("veth1")?;
    ns.link_up("veth0")?;

    let (settings, state) = ns.run(|| {
        let ctl = IfControl::new();
        let veth0 = Interface::new("veth0");
        let settings = veth0.fetch_settings(&ctl)?;
        Ok((settings, veth0.settings()))
    })?;

    assert_eq!(state, SettingsState::Fresh(settings));
    assert_eq!(settings.duplex, Duplex::Full);
    assert!(settings.speed.is_some());

    Ok(())
}

#[test]
fn test_stale_after_interface_removed() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("settings-stale")?;
    ns.add_veth("veth0", "veth1")?;

    let veth0 = Interface::new("veth0");
    let veth0 = ns.run(move || {
        veth0.fetch_settings(&IfControl::new())?;
        Ok(veth0)
    })?;
    let before = veth0.settings();
    assert!(before.is_fresh());

    ns.ip(&["link", "del", "veth0"])?;

    let veth0 = ns.run(move || {
        assert!(veth0.fetch_settings(&IfControl::new()).is_err());
        Ok(veth0)
    })?;

    let after = veth0.settings();
    assert!(after.is_stale());
    assert_eq!(after.current(), before.current());

    Ok(())
}
