//! Offload feature integration tests.

use ifctl::{Error, IfControl, OffloadFeature, Result};

use crate::common::TestNamespace;

#[test]
fn test_toggle_features_on_veth() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("offload")?;
    ns.add_veth("veth0", "veth1")?;

    ns.run(|| {
        let ctl = IfControl::new();

        for feature in [
            OffloadFeature::ScatterGather,
            OffloadFeature::Tso,
            OffloadFeature::Gso,
        ] {
            ctl.set_feature("veth0", feature, false)?;
            assert!(!ctl.feature("veth0", feature)?, "{feature} still on");

            ctl.set_feature("veth0", feature, true)?;
            assert!(ctl.feature("veth0", feature)?, "{feature} still off");
        }

        ctl.set_gso("veth0", false)?;
        assert!(!ctl.gso("veth0")?);
        Ok(())
    })
}

#[test]
fn test_offload_state_snapshot() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("offload-state")?;
    ns.add_veth("veth0", "veth1")?;

    let state = ns.run(|| IfControl::new().offload_state("veth0"))?;
    assert!(state.gso.is_some());
    assert!(state.scatter_gather.is_some());

    Ok(())
}

#[test]
fn test_set_on_missing_interface() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("offload-missing")?;
    let err = ns.run(|| Ok(IfControl::new().set_tso("nosuchdev0", true).unwrap_err()))?;
    assert!(err.is_not_found(), "{err}");

    Ok(())
}

#[test]
fn test_foreign_command_never_reaches_kernel() -> Result<()> {
    require_root!();

    let ns = TestNamespace::new("offload-drvinfo")?;
    ns.add_dummy("dummy0")?;

    // ETHTOOL_GDRVINFO would write its 196-byte reply into the 8-byte value.
    let err = ns.run(|| Ok(IfControl::new().get_offload_feature("dummy0", 0x3).unwrap_err()))?;
    assert!(
        matches!(err, Error::InvalidEthtoolRequest { cmd: 0x3, .. }),
        "{err}"
    );

    Ok(())
}
