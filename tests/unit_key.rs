/// Unit tests for ServiceKey and ContractId

use ferrous_ioc::{ContractId, IocError, ServiceKey};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

trait Plugin: Send + Sync {}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_key_display() {
    let key = ServiceKey::versioned(ContractId::of::<String>(), "Main", "V1");
    assert_eq!(key.to_string(), "Type:alloc::string::String, Name:main, Version:v1");

    let bare = ServiceKey::of::<dyn Plugin>();
    assert!(bare.to_string().ends_with("Plugin, Name:, Version:"));
}

#[test]
fn test_key_defaults_are_empty() {
    let key = ServiceKey::of::<u32>();
    assert_eq!(key.name(), "");
    assert_eq!(key.version(), "");
    assert_eq!(key.contract(), ContractId::of::<u32>());
}

#[test]
fn test_contract_distinguishes_types() {
    assert_ne!(ServiceKey::of::<u32>(), ServiceKey::of::<u64>());
    assert_ne!(ServiceKey::of::<dyn Plugin>(), ServiceKey::of::<Box<dyn Plugin>>());
    assert_eq!(ContractId::of::<dyn Plugin>().type_id(), std::any::TypeId::of::<dyn Plugin>());
}

#[test]
fn test_name_and_version_are_distinct_slots() {
    let contract = ContractId::of::<String>();
    let named = ServiceKey::named(contract, "1.0");
    let versioned = ServiceKey::versioned(contract, "", "1.0");
    assert_ne!(named, versioned);
    assert_eq!(named.contract_only(), versioned.contract_only());
}

#[test]
fn test_create_requires_contract() {
    let err = ServiceKey::create(None, None, None).unwrap_err();
    assert!(matches!(err, IocError::InvalidArgument(_)));

    let key = ServiceKey::create(Some(ContractId::of::<String>()), None, Some("X")).unwrap();
    assert_eq!(key.version(), "x");
    assert_eq!(key.name(), "");
}

#[test]
fn test_keys_work_in_hash_sets() {
    let contract = ContractId::of::<dyn Plugin>();
    let mut set = HashSet::new();
    set.insert(ServiceKey::named(contract, "Alpha"));
    set.insert(ServiceKey::named(contract, "ALPHA"));
    set.insert(ServiceKey::named(contract, "beta"));
    assert_eq!(set.len(), 2);
}

proptest! {
    #[test]
    fn prop_case_folding_is_invisible(name in "[a-zA-Z0-9._-]{0,16}", version in "[a-zA-Z0-9.]{0,8}") {
        let contract = ContractId::of::<String>();
        let lower = ServiceKey::versioned(contract, &name.to_lowercase(), &version.to_lowercase());
        let upper = ServiceKey::versioned(contract, &name.to_uppercase(), &version.to_uppercase());
        prop_assert_eq!(&lower, &upper);
        prop_assert_eq!(hash_of(&lower), hash_of(&upper));
    }

    #[test]
    fn prop_different_names_never_collide(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        prop_assume!(a != b);
        let contract = ContractId::of::<String>();
        prop_assert_ne!(ServiceKey::named(contract, &a), ServiceKey::named(contract, &b));
    }
}
