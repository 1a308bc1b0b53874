//! Diagnostic observers for container traceability.
//!
//! This module provides hooks for observing registration and resolution
//! events. Observers are installed through
//! [`ContainerOptions`](crate::ContainerOptions) and are shared by a container
//! and every child created from it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::key::ServiceKey;
use crate::lifetime::Lifetime;

/// Observer trait for container events.
///
/// Observer calls are made synchronously on the registering or resolving
/// thread. Keep implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ContainerObserver, ContainerOptions, Lifetime, ServiceKey};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct MissCounter(AtomicUsize);
///
/// impl ContainerObserver for MissCounter {
///     fn missed(&self, _container: &str, _key: &ServiceKey) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let counter = Arc::new(MissCounter::default());
/// let mut options = ContainerOptions::default();
/// options.observers.add(counter.clone());
///
/// let container = Container::with_options(options);
/// assert!(container.get_service(&ServiceKey::of::<String>()).unwrap().is_none());
/// assert_eq!(counter.0.load(Ordering::Relaxed), 1);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// A key was inserted into a container's registry.
    fn registered(&self, _container: &str, _key: &ServiceKey, _lifetime: Lifetime) {}

    /// A container found a registration for `key` and is about to build it.
    fn resolving(&self, _container: &str, _key: &ServiceKey) {}

    /// The build started by `resolving` finished, successfully or not.
    fn resolved(&self, _container: &str, _key: &ServiceKey, _duration: Duration, _success: bool) {}

    /// A root container found nothing for `key`.
    fn missed(&self, _container: &str, _key: &ServiceKey) {}
}

/// Collection of observers.
#[derive(Clone, Default)]
pub struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    /// Creates a new empty observer collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer to the collection.
    pub fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    /// Returns true if any observers are registered.
    #[inline]
    pub fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn registered(&self, container: &str, key: &ServiceKey, lifetime: Lifetime) {
        for observer in &self.observers {
            observer.registered(container, key, lifetime);
        }
    }

    #[inline]
    pub(crate) fn resolving(&self, container: &str, key: &ServiceKey) {
        for observer in &self.observers {
            observer.resolving(container, key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, container: &str, key: &ServiceKey, duration: Duration, success: bool) {
        for observer in &self.observers {
            observer.resolved(container, key, duration, success);
        }
    }

    #[inline]
    pub(crate) fn missed(&self, container: &str, key: &ServiceKey) {
        for observer in &self.observers {
            observer.missed(container, key);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("count", &self.observers.len()).finish()
    }
}

/// Observer that forwards every event to `tracing` at debug level.
///
/// ```
/// use ferrous_ioc::{ContainerOptions, TracingObserver};
/// use std::sync::Arc;
///
/// let mut options = ContainerOptions::default();
/// options.observers.add(Arc::new(TracingObserver::with_prefix("[app]")));
/// ```
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    /// Creates a new tracing observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-ioc]".to_string(),
        }
    }

    /// Creates a new tracing observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for TracingObserver {
    fn registered(&self, container: &str, key: &ServiceKey, lifetime: Lifetime) {
        tracing::debug!(prefix = %self.prefix, container, %key, %lifetime, "registered");
    }

    fn resolving(&self, container: &str, key: &ServiceKey) {
        tracing::debug!(prefix = %self.prefix, container, %key, "resolving");
    }

    fn resolved(&self, container: &str, key: &ServiceKey, duration: Duration, success: bool) {
        if success {
            tracing::debug!(prefix = %self.prefix, container, %key, ?duration, "resolved");
        } else {
            tracing::debug!(prefix = %self.prefix, container, %key, ?duration, "resolution failed");
        }
    }

    fn missed(&self, container: &str, key: &ServiceKey) {
        tracing::debug!(prefix = %self.prefix, container, %key, "no registration found");
    }
}
