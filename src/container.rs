//! The container: registration, resolution and the container tree.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use crate::builder::{create_builder, ObjectBuilder, SingletonBuilder};
use crate::descriptors::{ImplementationType, ViewFn};
use crate::error::{IocError, IocResult};
use crate::internal::DepthGuard;
use crate::key::{ContractId, ServiceKey};
use crate::lifetime::Lifetime;
use crate::options::{ContainerOptions, ParentLookup};
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::ResolverCore;

/// Hierarchical inversion-of-control container.
///
/// A `Container` owns a registry of builders keyed by [`ServiceKey`]. Lookups
/// that miss locally are forwarded to the parent container, if any, so a
/// child can override some registrations and inherit the rest.
///
/// The handle is cheap to clone; all clones share the same registry.
///
/// # Thread Safety
///
/// Registration and resolution may run concurrently from any number of
/// threads. Singleton builders construct their instance at most once.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Constructor, Container, Parameter, Resolver, ServiceType};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// trait Message: Send + Sync {
///     fn message(&self) -> &str;
/// }
///
/// struct MessageService {
///     message: String,
/// }
///
/// impl Message for MessageService {
///     fn message(&self) -> &str {
///         &self.message
///     }
/// }
///
/// let message_service = ServiceType::<MessageService>::new()
///     .singleton_contract::<dyn Message>(|s| s)
///     .constructor(
///         Constructor::new(|args| MessageService {
///             message: args.scalar::<String>("message").unwrap_or_default(),
///         })
///         .param(Parameter::scalar::<String>("message")),
///     );
///
/// let root = Container::new();
/// let parameters = HashMap::from([("message".to_string(), "foobar".to_string())]);
/// root.apply(message_service, parameters, HashMap::new(), None, None).unwrap();
///
/// let child = root.create_child(Some("request"));
/// let first = child.get::<dyn Message>().unwrap().unwrap();
/// let second = root.get::<dyn Message>().unwrap().unwrap();
/// assert_eq!(first.message(), "foobar");
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    parent: Option<Container>,
    registry: Registry,
    description: RwLock<Option<String>>,
    options: Arc<ContainerOptions>,
    // Serializes registry inserts so a multi-contract apply is all-or-nothing
    apply_lock: Mutex<()>,
}

impl Container {
    /// Creates a root container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates a root container with the given options.
    pub fn with_options(options: ContainerOptions) -> Self {
        Self::from_parts(None, None, Arc::new(options))
    }

    fn from_parts(parent: Option<Container>, description: Option<&str>, options: Arc<ContainerOptions>) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                parent,
                registry: Registry::new(),
                description: RwLock::new(description.map(str::to_string)),
                options,
                apply_lock: Mutex::new(()),
            }),
        }
    }

    /// Creates a child whose lookups fall back to this container.
    ///
    /// The child starts with an empty registry and shares this container's
    /// options. This container keeps no reference to the child.
    pub fn create_child(&self, description: Option<&str>) -> Container {
        tracing::debug!(parent = %self.label(), child = description.unwrap_or_default(), "child container created");
        Self::from_parts(Some(self.clone()), description, Arc::clone(&self.inner.options))
    }

    /// Registers an implementation type under each of its declared contracts.
    ///
    /// One builder is created for the registration and shared by all of its
    /// contracts; it is a singleton builder when any contract is declared
    /// [`Lifetime::Singleton`]. `parameters` feeds scalar constructor
    /// parameters and `properties` feeds scalar properties, both by name.
    ///
    /// # Errors
    ///
    /// * [`IocError::InvalidArgument`] when the type declares no constructor
    /// * [`IocError::NotAnnotated`] when the type declares no contract
    /// * [`IocError::DuplicateRegistration`] when any resulting key is already
    ///   registered in this container; nothing is registered in that case
    pub fn apply(
        &self,
        ty: impl Into<ImplementationType>,
        parameters: HashMap<String, String>,
        properties: HashMap<String, String>,
        name: Option<&str>,
        version: Option<&str>,
    ) -> IocResult<&Self> {
        let ty = ty.into();
        if !ty.is_concrete() {
            return Err(IocError::invalid_argument(format!(
                "{} is not a concrete type: no constructor declared",
                ty.type_name()
            )));
        }
        if ty.info.contracts.is_empty() {
            return Err(IocError::NotAnnotated(ty.type_name()));
        }

        let builder = create_builder(&ty, parameters.into_iter().collect(), properties.into_iter().collect());
        builder.connect(self.downgrade())?;

        let batch = ty
            .info
            .contracts
            .iter()
            .map(|decl| {
                let key = ServiceKey::from_parts(decl.contract, name, version);
                (key, Registration::new(Arc::clone(&builder), Arc::clone(&decl.view)))
            })
            .collect();
        self.insert(batch, builder.lifetime())?;

        tracing::debug!(
            container = %self.label(),
            implementation = ty.type_name(),
            lifetime = %builder.lifetime(),
            contracts = ty.info.contracts.len(),
            "implementation registered"
        );
        Ok(self)
    }

    /// Registers an implementation type with no configuration, name or version.
    pub fn register(&self, ty: impl Into<ImplementationType>) -> IocResult<&Self> {
        self.apply(ty, HashMap::new(), HashMap::new(), None, None)
    }

    /// Registers an implementation type under a name.
    pub fn register_named(&self, ty: impl Into<ImplementationType>, name: &str) -> IocResult<&Self> {
        self.apply(ty, HashMap::new(), HashMap::new(), Some(name), None)
    }

    /// Registers an already built instance as a singleton of contract `C`.
    ///
    /// The construction algorithm never runs for this registration; every
    /// resolution returns `instance` itself.
    pub fn apply_instance<C: ?Sized + Send + Sync + 'static>(
        &self,
        instance: Arc<C>,
        name: Option<&str>,
        version: Option<&str>,
    ) -> IocResult<&Self> {
        let type_name = std::any::type_name::<C>();
        let builder: Arc<dyn ObjectBuilder> =
            Arc::new(SingletonBuilder::from_instance(type_name, Arc::new(instance) as AnyArc));
        let view: ViewFn = Arc::new(|any: AnyArc| -> IocResult<AnyArc> { Ok(any) });
        let key = ServiceKey::from_parts(ContractId::of::<C>(), name, version);
        self.insert(vec![(key, Registration::new(builder, view))], Lifetime::Singleton)?;

        tracing::debug!(container = %self.label(), contract = type_name, "instance registered");
        Ok(self)
    }

    /// Registers an already built instance of contract `C` with no name or version.
    pub fn register_instance<C: ?Sized + Send + Sync + 'static>(&self, instance: Arc<C>) -> IocResult<&Self> {
        self.apply_instance::<C>(instance, None, None)
    }

    fn insert(&self, batch: Vec<(ServiceKey, Registration)>, lifetime: Lifetime) -> IocResult<()> {
        let keys: Vec<ServiceKey> = if self.inner.options.observers.has_observers() {
            batch.iter().map(|(key, _)| key.clone()).collect()
        } else {
            Vec::new()
        };

        {
            let _guard = self.inner.apply_lock.lock();
            self.inner
                .registry
                .try_insert_all(batch)
                .map_err(|key| IocError::DuplicateRegistration {
                    key: key.to_string(),
                    container: self.description().unwrap_or_default(),
                })?;
        }

        if !keys.is_empty() {
            let label = self.label();
            for key in &keys {
                self.inner.options.observers.registered(&label, key, lifetime);
            }
        }
        Ok(())
    }

    /// Resolves `key` in this container, falling back to the parent chain.
    ///
    /// The returned value holds an `Arc<C>` for the key's contract `C`; the
    /// [`Resolver`](crate::Resolver) methods unwrap it for you. `Ok(None)`
    /// means no container in the tree has a registration for the key.
    pub fn get_service(&self, key: &ServiceKey) -> IocResult<Option<AnyArc>> {
        let _depth = DepthGuard::enter(key.contract().type_name(), self.inner.options.max_depth)?;
        self.lookup(key)
    }

    /// Resolves by contract with an optional name and version.
    pub fn get_service_of(
        &self,
        contract: ContractId,
        name: Option<&str>,
        version: Option<&str>,
    ) -> IocResult<Option<AnyArc>> {
        self.get_service(&ServiceKey::from_parts(contract, name, version))
    }

    fn lookup(&self, key: &ServiceKey) -> IocResult<Option<AnyArc>> {
        if let Some(registration) = self.inner.registry.try_get(key) {
            tracing::trace!(container = %self.label(), %key, "resolving");
            return self.build(key, &registration).map(Some);
        }

        match &self.inner.parent {
            Some(parent) => {
                let forwarded = match self.inner.options.parent_lookup {
                    ParentLookup::FullKey => key.clone(),
                    ParentLookup::ContractOnly => key.contract_only(),
                };
                tracing::trace!(container = %self.label(), key = %forwarded, "forwarding to parent");
                parent.lookup(&forwarded)
            }
            None => {
                tracing::trace!(container = %self.label(), %key, "no registration found");
                if self.inner.options.observers.has_observers() {
                    self.inner.options.observers.missed(&self.label(), key);
                }
                Ok(None)
            }
        }
    }

    fn build(&self, key: &ServiceKey, registration: &Registration) -> IocResult<AnyArc> {
        let observers = &self.inner.options.observers;
        if !observers.has_observers() {
            return registration.instance();
        }

        let label = self.label();
        let start = Instant::now();
        observers.resolving(&label, key);
        let result = registration.instance();
        observers.resolved(&label, key, start.elapsed(), result.is_ok());
        result
    }

    /// Human-readable description, used in error messages.
    pub fn description(&self) -> Option<String> {
        self.inner.description.read().clone()
    }

    pub fn set_description(&self, description: Option<&str>) {
        *self.inner.description.write() = description.map(str::to_string);
    }

    fn label(&self) -> String {
        self.description().unwrap_or_default()
    }

    /// The container this one falls back to.
    pub fn parent(&self) -> Option<&Container> {
        self.inner.parent.as_ref()
    }

    /// Options shared with this container's children.
    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// Whether this container (not its parents) has a registration for `key`.
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.inner.registry.contains(key)
    }

    /// Snapshot of the keys registered in this container.
    pub fn keys(&self) -> Vec<ServiceKey> {
        self.inner.registry.keys()
    }

    /// Number of keys registered in this container.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weak handle to this container.
    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same container.
    pub fn ptr_eq(a: &Container, b: &Container) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut entries = self.inner.registry.describe();
        entries.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));

        let mut s = String::new();
        s.push_str(&format!("=== Container \"{}\" ===\n", self.label()));
        for (key, implementation, lifetime) in entries {
            s.push_str(&format!("  {}: {} ({})\n", key, lifetime, implementation));
        }
        if let Some(parent) = self.parent() {
            s.push_str(&format!("Parent: \"{}\"\n", parent.label()));
        }
        s
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("description", &self.description())
            .field("registrations", &self.len())
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &ServiceKey) -> IocResult<Option<AnyArc>> {
        self.get_service(key)
    }
}

/// Non-owning handle to a [`Container`].
///
/// Builders and connected services hold this instead of a `Container` so a
/// singleton that keeps its container around does not keep itself alive.
#[derive(Clone)]
pub struct WeakContainer {
    inner: Weak<ContainerInner>,
}

impl WeakContainer {
    /// The container, if it is still alive.
    pub fn upgrade(&self) -> Option<Container> {
        self.inner.upgrade().map(|inner| Container { inner })
    }
}

impl fmt::Debug for WeakContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakContainer")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl ResolverCore for WeakContainer {
    fn resolve_any(&self, key: &ServiceKey) -> IocResult<Option<AnyArc>> {
        let container = self.upgrade().ok_or(IocError::Disconnected {
            type_name: std::any::type_name::<Container>(),
        })?;
        container.get_service(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_handle_reports_dropped_container() {
        let container = Container::new();
        let weak = container.downgrade();
        assert!(weak.upgrade().is_some());
        drop(container);
        assert!(weak.upgrade().is_none());
        assert!(matches!(
            weak.resolve_any(&ServiceKey::of::<String>()),
            Err(IocError::Disconnected { .. })
        ));
    }

    #[test]
    fn children_share_options() {
        let root = Container::with_options(ContainerOptions::new().max_depth(8));
        let child = root.create_child(Some("child"));
        assert_eq!(child.options().max_depth, 8);
        assert!(Container::ptr_eq(child.parent().unwrap(), &root));
        assert_eq!(child.description().as_deref(), Some("child"));
        assert!(root.description().is_none());
    }

    #[test]
    fn instance_registration_is_local_to_the_container() {
        let root = Container::new();
        let child = root.create_child(None);
        child.register_instance::<String>(Arc::new("local".to_string())).unwrap();
        let key = ServiceKey::of::<String>();
        assert!(child.contains(&key));
        assert!(!root.contains(&key));
        assert_eq!(child.len(), 1);
        assert!(root.is_empty());
        assert!(root.get_service(&key).unwrap().is_none());
    }

    #[cfg(feature = "diagnostics")]
    #[test]
    fn debug_string_lists_local_registrations() {
        let root = Container::new();
        root.set_description(Some("root"));
        let child = root.create_child(Some("child"));
        child
            .apply_instance::<String>(Arc::new("x".to_string()), Some("Main"), Some("1.0"))
            .unwrap();

        let dump = child.to_debug_string();
        assert!(dump.starts_with("=== Container \"child\" ==="));
        assert!(dump.contains("Name:main, Version:1.0: singleton"), "{}", dump);
        assert!(dump.ends_with("Parent: \"root\"\n"));
        assert!(root.to_debug_string().lines().count() == 1);
    }
}
