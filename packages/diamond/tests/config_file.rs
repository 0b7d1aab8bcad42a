use std::io::Write;

use diamond::calls;
use diamond::{Bytes, ConfigError, Diamond, DiamondConfig, Error, FacetAddress, MemoryHost, Selector};

const CONFIG: &str = r#"{
    "address": "0x00000000000000000000000000000000000000d1",
    "builtins": {
        "cut": "0x00000000000000000000000000000000000000c0",
        "loupe": "0x00000000000000000000000000000000000000c1",
        "introspection": "0x00000000000000000000000000000000000000c2"
    },
    "facets": [
        { "facet": "0x0000000000000000000000000000000000000101", "selectors": ["0xa9059cbb", "0x70a08231"] },
        { "facet": "0x0000000000000000000000000000000000000102", "selectors": ["0x095ea7b3"] }
    ],
    "interfaces": ["0x36372b07"]
}"#;

fn host() -> MemoryHost {
    MemoryHost::new()
        .with_fn(FacetAddress::from_low_u64(0x101), |_, _| Ok(Bytes::new()))
        .with_fn(FacetAddress::from_low_u64(0x102), |_, _| Ok(Bytes::new()))
}

#[test]
fn diamond_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = DiamondConfig::load(file.path()).unwrap();
    let d = Diamond::new(config, host()).unwrap();

    assert_eq!(d.address(), FacetAddress::from_low_u64(0xd1));
    assert_eq!(d.loupe().facet_addresses().len(), 5);
    assert_eq!(
        d.loupe().facet_address(Selector::from_u32(0x095ea7b3)),
        FacetAddress::from_low_u64(0x102)
    );
    assert!(d.supports_interface([0x36, 0x37, 0x2b, 0x07]));
    assert!(d.supports_interface(calls::ERC165_INTERFACE));

    let events = d.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].changes.len(), 5);
}

#[test]
fn constructor_conflicts_fail_construction() {
    let mut config = DiamondConfig::from_json(CONFIG).unwrap();
    config.facets[1].selectors.push(Selector::from_u32(0xa9059cbb));

    let err = Diamond::new(config, host()).unwrap_err();
    assert!(matches!(err, Error::AlreadyRegistered { index: 4, .. }));
}

#[test]
fn invalid_builtins_fail_construction() {
    let mut config = DiamondConfig::from_json(CONFIG).unwrap();
    if let Some(builtins) = config.builtins.as_mut() {
        builtins.introspection = builtins.loupe;
    }

    let err = Diamond::new(config, host()).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::DuplicateBuiltin(_))
    ));
}

#[test]
fn diamond_without_builtins_declares_only_configured_interfaces() {
    let mut config = DiamondConfig::from_json(CONFIG).unwrap();
    config.builtins = None;
    let d = Diamond::new(config, host()).unwrap();

    assert_eq!(d.loupe().facet_addresses().len(), 2);
    assert!(!d.supports_interface(calls::ERC165_INTERFACE));
    assert!(d.supports_interface([0x36, 0x37, 0x2b, 0x07]));
}
