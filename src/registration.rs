//! Service registration types.

use std::any::Any;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::builder::ObjectBuilder;
use crate::descriptors::ViewFn;
use crate::error::{IocError, IocResult};
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;

/// Type-erased shared instance.
///
/// Builders hand out the concrete implementation as an `AnyArc`; a
/// registration's view turns it into an `Arc<Arc<C>>` for its contract `C`,
/// again erased as an `AnyArc`.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

// Owned instance straight out of a constructor, before injection
pub(crate) type AnyBox = Box<dyn Any + Send + Sync>;

/// Unwraps a contract view produced by a registration.
pub(crate) fn downcast_service<C: ?Sized + Send + Sync + 'static>(any: AnyArc) -> IocResult<Arc<C>> {
    any.downcast::<Arc<C>>()
        .map(|outer| Arc::clone(&*outer))
        .map_err(|_| IocError::TypeMismatch {
            expected: std::any::type_name::<C>(),
        })
}

/// One registry entry: the builder shared by every contract of an applied
/// implementation, plus the view that upcasts built instances to this
/// entry's contract.
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) builder: Arc<dyn ObjectBuilder>,
    pub(crate) view: ViewFn,
}

impl Registration {
    pub(crate) fn new(builder: Arc<dyn ObjectBuilder>, view: ViewFn) -> Self {
        Self { builder, view }
    }

    /// Builds (or fetches) the instance and views it as the contract.
    pub(crate) fn instance(&self) -> IocResult<AnyArc> {
        let built = self.builder.build()?;
        (self.view)(built)
    }

    pub(crate) fn lifetime(&self) -> Lifetime {
        self.builder.lifetime()
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.builder.type_name()
    }
}

/// Registry of one container.
///
/// Lookups clone the registration out so no shard lock is held while the
/// instance is built; building may re-enter the same registry.
pub(crate) struct Registry {
    entries: DashMap<ServiceKey, Registration, ahash::RandomState>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    #[inline]
    pub(crate) fn try_get(&self, key: &ServiceKey) -> Option<Registration> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    #[inline]
    pub(crate) fn contains(&self, key: &ServiceKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts unless the key is taken; returns whether the insert happened.
    pub(crate) fn try_insert(&self, key: ServiceKey, registration: Registration) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(registration);
                true
            }
        }
    }

    /// Inserts a batch or nothing.
    ///
    /// On failure returns the first key that was already present (or repeated
    /// within the batch). Callers serialize batches per registry, so the
    /// pre-check only races with single inserts; those are rolled back.
    pub(crate) fn try_insert_all(
        &self,
        batch: Vec<(ServiceKey, Registration)>,
    ) -> Result<(), ServiceKey> {
        for (index, (key, _)) in batch.iter().enumerate() {
            if self.contains(key) || batch[..index].iter().any(|(k, _)| k == key) {
                return Err(key.clone());
            }
        }

        let mut inserted: Vec<ServiceKey> = Vec::with_capacity(batch.len());
        for (key, registration) in batch {
            if self.try_insert(key.clone(), registration) {
                inserted.push(key);
            } else {
                for done in &inserted {
                    self.entries.remove(done);
                }
                return Err(key);
            }
        }
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot of the registered keys.
    pub(crate) fn keys(&self) -> Vec<ServiceKey> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Snapshot of keys with the registration's implementation and lifetime.
    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    pub(crate) fn describe(&self) -> Vec<(ServiceKey, &'static str, Lifetime)> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().type_name(), entry.value().lifetime()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SingletonBuilder;
    use crate::key::ContractId;

    trait Marker: Send + Sync {}
    struct Impl;
    impl Marker for Impl {}

    fn registration() -> Registration {
        let builder: Arc<dyn ObjectBuilder> = Arc::new(SingletonBuilder::from_instance(
            std::any::type_name::<Impl>(),
            Arc::new(Impl) as AnyArc,
        ));
        let view: ViewFn = Arc::new(|any: AnyArc| {
            let concrete = any.downcast::<Impl>().map_err(|_| IocError::TypeMismatch { expected: "Impl" })?;
            Ok(Arc::new(concrete as Arc<dyn Marker>) as AnyArc)
        });
        Registration::new(builder, view)
    }

    #[test]
    fn duplicate_insert_is_refused() {
        let registry = Registry::new();
        let key = ServiceKey::of::<dyn Marker>();
        assert!(registry.try_insert(key.clone(), registration()));
        assert!(!registry.try_insert(key.clone(), registration()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let registry = Registry::new();
        let taken = ServiceKey::named(ContractId::of::<dyn Marker>(), "taken");
        assert!(registry.try_insert(taken.clone(), registration()));

        let fresh = ServiceKey::of::<dyn Marker>();
        let err = registry
            .try_insert_all(vec![(fresh.clone(), registration()), (taken.clone(), registration())])
            .unwrap_err();
        assert_eq!(err, taken);
        assert!(!registry.contains(&fresh));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn batch_rejects_repeated_keys() {
        let registry = Registry::new();
        let key = ServiceKey::of::<dyn Marker>();
        let err = registry
            .try_insert_all(vec![(key.clone(), registration()), (key.clone(), registration())])
            .unwrap_err();
        assert_eq!(err, key);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn instance_is_viewed_as_contract() {
        let registration = registration();
        let first = downcast_service::<dyn Marker>(registration.instance().unwrap()).unwrap();
        let second = downcast_service::<dyn Marker>(registration.instance().unwrap()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registration.lifetime(), Lifetime::Singleton);
        assert!(downcast_service::<String>(registration.instance().unwrap()).is_err());
    }
}
