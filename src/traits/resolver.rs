//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{IocError, IocResult};
use crate::key::{ContractId, ServiceKey};
use crate::registration::{downcast_service, AnyArc};

/// Core resolver trait for object-safe service resolution.
///
/// Implemented by [`Container`](crate::Container) and
/// [`WeakContainer`](crate::WeakContainer). Most users should use the
/// [`Resolver`] trait instead, which provides typed generic methods built on
/// top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a key through the container tree.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(AnyArc))` - The service, stored as an `Arc<C>` for the key's contract `C`
    /// * `Ok(None)` - No container in the tree has a registration for the key
    /// * `Err(IocError)` - A configuration or programming defect surfaced while building
    fn resolve_any(&self, key: &ServiceKey) -> IocResult<Option<AnyArc>>;
}

/// Typed resolution interface.
///
/// Every method returns `Ok(None)` when nothing in the container tree is
/// registered under the requested key, and an error only for real defects.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String {
///         format!("LOG: {}", msg)
///     }
/// }
///
/// let container = Container::new();
/// container.register_instance::<dyn Logger>(Arc::new(ConsoleLogger)).unwrap();
///
/// let logger = container.get::<dyn Logger>().unwrap().unwrap();
/// assert_eq!(logger.log("ready"), "LOG: ready");
/// assert!(container.get_named::<dyn Logger>("audit").unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the unnamed, unversioned registration of contract `C`.
    fn get<C: ?Sized + Send + Sync + 'static>(&self) -> IocResult<Option<Arc<C>>> {
        self.get_keyed::<C>(&ServiceKey::of::<C>())
    }

    /// Resolves contract `C` registered under `name`.
    fn get_named<C: ?Sized + Send + Sync + 'static>(&self, name: &str) -> IocResult<Option<Arc<C>>> {
        self.get_keyed::<C>(&ServiceKey::named(ContractId::of::<C>(), name))
    }

    /// Resolves contract `C` registered under `name` and `version`.
    fn get_versioned<C: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
        version: &str,
    ) -> IocResult<Option<Arc<C>>> {
        self.get_keyed::<C>(&ServiceKey::versioned(ContractId::of::<C>(), name, version))
    }

    /// Resolves an explicit key as contract `C`.
    ///
    /// Fails with [`IocError::TypeMismatch`] when the key's contract is not `C`.
    fn get_keyed<C: ?Sized + Send + Sync + 'static>(&self, key: &ServiceKey) -> IocResult<Option<Arc<C>>> {
        match self.resolve_any(key)? {
            Some(any) => downcast_service::<C>(any).map(Some),
            None => Ok(None),
        }
    }

    /// Resolves contract `C`, treating a miss as an error.
    ///
    /// ```
    /// use ferrous_ioc::{Container, IocError, Resolver};
    ///
    /// let container = Container::new();
    /// let err = container.get_required::<String>().unwrap_err();
    /// assert!(matches!(err, IocError::DependencyNotFound { .. }));
    /// ```
    fn get_required<C: ?Sized + Send + Sync + 'static>(&self) -> IocResult<Arc<C>> {
        let key = ServiceKey::of::<C>();
        self.get_keyed::<C>(&key)?.ok_or_else(|| IocError::DependencyNotFound {
            key: key.to_string(),
            type_name: std::any::type_name::<C>(),
        })
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
