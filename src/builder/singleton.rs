//! Singleton builder: one cached instance per builder.

use once_cell::sync::OnceCell;
use parking_lot::ReentrantMutex;

use crate::container::WeakContainer;
use crate::error::{IocError, IocResult};
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;

use super::{ObjectBuilder, TransientBuilder};

/// Wraps the transient algorithm with double-checked locking.
///
/// The fast path is a lock-free `OnceCell` read. The slow path takes a
/// per-builder reentrant lock, re-checks the cell and only then builds, so
/// the construction algorithm runs at most once even under contention.
pub(crate) struct SingletonBuilder {
    type_name: &'static str,
    inner: Option<TransientBuilder>,
    instance: OnceCell<AnyArc>,
    lock: ReentrantMutex<()>,
}

impl SingletonBuilder {
    pub(crate) fn new(inner: TransientBuilder) -> Self {
        Self {
            type_name: inner.type_name(),
            inner: Some(inner),
            instance: OnceCell::new(),
            lock: ReentrantMutex::new(()),
        }
    }

    /// Pre-seeded builder for an already constructed instance.
    pub(crate) fn from_instance(type_name: &'static str, instance: AnyArc) -> Self {
        Self {
            type_name,
            inner: None,
            instance: OnceCell::with_value(instance),
            lock: ReentrantMutex::new(()),
        }
    }
}

impl ObjectBuilder for SingletonBuilder {
    #[inline]
    fn build(&self) -> IocResult<AnyArc> {
        if let Some(instance) = self.instance.get() {
            return Ok(instance.clone());
        }

        let _guard = self.lock.lock();
        if let Some(instance) = self.instance.get() {
            return Ok(instance.clone());
        }

        let inner = self.inner.as_ref().ok_or(IocError::Disconnected {
            type_name: self.type_name,
        })?;
        let built = inner.build_instance()?;
        tracing::trace!(implementation = self.type_name, "singleton instance created");
        Ok(self.instance.get_or_init(|| built).clone())
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn connect(&self, container: WeakContainer) -> IocResult<()> {
        match &self.inner {
            Some(inner) => inner.connect(container),
            None => Ok(()),
        }
    }
}
