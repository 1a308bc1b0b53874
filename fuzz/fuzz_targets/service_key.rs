#![no_main]

use ferrous_ioc::{Container, ContractId, Resolver, ServiceKey};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let (name, version) = match text.find('|') {
        Some(split) => (&text[..split], &text[split + 1..]),
        None => (&text[..], ""),
    };

    let contract = ContractId::of::<u32>();
    let key = ServiceKey::versioned(contract, name, version);
    let upper = ServiceKey::versioned(contract, &name.to_uppercase(), version);

    // Keys differing only in case share a slot
    if name.to_uppercase().to_lowercase() == name.to_lowercase() {
        assert_eq!(key, upper);
    }
    assert_eq!(ServiceKey::versioned(contract, key.name(), key.version()).contract(), contract);
    let _ = key.to_string();

    let container = Container::new();
    if container.apply_instance::<u32>(Arc::new(7), Some(name), Some(version)).is_ok() {
        let found = container.get_keyed::<u32>(&key).expect("same contract");
        assert_eq!(found.map(|v| *v), Some(7));
    }
});
