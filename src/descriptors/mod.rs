//! Implementation descriptors.
//!
//! The container never inspects types at runtime. Instead every implementation
//! type is described once with a [`ServiceType`]: which contracts it serves
//! and with which lifetime, which constructors it offers, which properties
//! take injected services or configured scalars, and whether it wants the
//! container handed to it after construction.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::container::WeakContainer;
use crate::error::{IocError, IocResult};
use crate::key::{ContractId, ServiceKey};
use crate::lifetime::Lifetime;
use crate::registration::{downcast_service, AnyArc};
use crate::scalar::{Scalar, ScalarKind, ScalarValue};
use crate::traits::ContainerConnector;

mod constructor;

pub use constructor::{Arguments, Constructor, Parameter};
pub(crate) use constructor::{Argument, ErasedConstructor, ParameterBinding};

pub(crate) type AnyInstance = dyn Any + Send + Sync;
pub(crate) type ViewFn = Arc<dyn Fn(AnyArc) -> IocResult<AnyArc> + Send + Sync>;
type AssignServiceFn = Arc<dyn Fn(&mut AnyInstance, AnyArc) -> IocResult<()> + Send + Sync>;
type AssignScalarFn = Arc<dyn Fn(&mut AnyInstance, ScalarValue) -> IocResult<()> + Send + Sync>;
type ConnectFn = Arc<dyn Fn(&mut AnyInstance, WeakContainer) -> IocResult<()> + Send + Sync>;

/// Dependency marker metadata.
///
/// Marks a constructor parameter or property as filled by the container. The
/// contract is always the declared Rust type of the slot; the marker only
/// narrows the lookup with a name and/or version.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Dependency;
///
/// let marker = Dependency::new().named("primary").version("2.0");
/// assert_eq!(marker.name(), Some("primary"));
/// assert_eq!(marker.version_str(), Some("2.0"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency {
    name: Option<String>,
    version: Option<String>,
}

impl Dependency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version_str(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub(crate) fn key(&self, contract: ContractId) -> ServiceKey {
        ServiceKey::from_parts(contract, self.name.as_deref(), self.version.as_deref())
    }
}

pub(crate) struct ContractDecl {
    pub(crate) contract: ContractId,
    pub(crate) lifetime: Lifetime,
    pub(crate) view: ViewFn,
}

pub(crate) struct DependencyProperty {
    pub(crate) name: &'static str,
    pub(crate) key: ServiceKey,
    pub(crate) assign: AssignServiceFn,
}

pub(crate) struct ScalarProperty {
    pub(crate) name: &'static str,
    pub(crate) kind: ScalarKind,
    pub(crate) assign: AssignScalarFn,
}

/// Everything the builders need to know about one implementation type.
pub(crate) struct TypeInfo {
    pub(crate) type_name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) contracts: SmallVec<[ContractDecl; 2]>,
    pub(crate) constructors: Vec<ErasedConstructor>,
    pub(crate) dependencies: Vec<DependencyProperty>,
    pub(crate) properties: Vec<ScalarProperty>,
    pub(crate) connector: Option<ConnectFn>,
}

impl TypeInfo {
    pub(crate) fn property(&self, name: &str) -> Option<&ScalarProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Typed declaration of an implementation type `T`.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Constructor, Container, Dependency, Resolver, ServiceType};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// trait Addition: Send + Sync {
///     fn add(&self, x: i32, y: i32) -> i32;
/// }
///
/// trait Calculator: Send + Sync {
///     fn add(&self, x: i32, y: i32) -> i32;
/// }
///
/// #[derive(Default)]
/// struct AdditionService;
/// impl Addition for AdditionService {
///     fn add(&self, x: i32, y: i32) -> i32 { x + y }
/// }
///
/// #[derive(Default)]
/// struct CalculatorService {
///     addition: Option<Arc<dyn Addition>>,
///     x: i32,
/// }
/// impl Calculator for CalculatorService {
///     fn add(&self, x: i32, y: i32) -> i32 {
///         self.addition.as_ref().map(|a| a.add(x, y)).unwrap_or_default()
///     }
/// }
///
/// let container = Container::new();
/// container.register(
///     ServiceType::<AdditionService>::new()
///         .contract::<dyn Addition>(|s| s)
///         .constructor(Constructor::default_ctor()),
/// ).unwrap();
///
/// let calculator = ServiceType::<CalculatorService>::new()
///     .contract::<dyn Calculator>(|s| s)
///     .constructor(Constructor::default_ctor())
///     .dependency::<dyn Addition>("addition", Dependency::new(), |c, a| c.addition = Some(a))
///     .property::<i32>("x", |c, x| c.x = x);
///
/// let properties = HashMap::from([("x".to_string(), "100".to_string())]);
/// container.apply(calculator, HashMap::new(), properties, None, None).unwrap();
///
/// let calc = container.get::<dyn Calculator>().unwrap().unwrap();
/// assert_eq!(calc.add(1, 1), 2);
/// ```
pub struct ServiceType<T> {
    contracts: SmallVec<[ContractDecl; 2]>,
    constructors: Vec<ErasedConstructor>,
    dependencies: Vec<DependencyProperty>,
    properties: Vec<ScalarProperty>,
    connector: Option<ConnectFn>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ServiceType<T> {
    /// Empty declaration: no contracts, no constructors.
    pub fn new() -> Self {
        Self {
            contracts: SmallVec::new(),
            constructors: Vec::new(),
            dependencies: Vec::new(),
            properties: Vec::new(),
            connector: None,
            _marker: PhantomData,
        }
    }

    /// Declares contract `C` with the default (transient) lifetime.
    ///
    /// `cast` upcasts the built instance to the contract, usually `|s| s`.
    pub fn contract<C: ?Sized + Send + Sync + 'static>(
        self,
        cast: impl Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static,
    ) -> Self {
        self.contract_with::<C>(Lifetime::Transient, cast)
    }

    /// Declares contract `C` with the singleton lifetime.
    pub fn singleton_contract<C: ?Sized + Send + Sync + 'static>(
        self,
        cast: impl Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static,
    ) -> Self {
        self.contract_with::<C>(Lifetime::Singleton, cast)
    }

    /// Declares contract `C` with an explicit lifetime.
    pub fn contract_with<C: ?Sized + Send + Sync + 'static>(
        mut self,
        lifetime: Lifetime,
        cast: impl Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static,
    ) -> Self {
        let view: ViewFn = Arc::new(move |any: AnyArc| {
            let concrete = any.downcast::<T>().map_err(|_| IocError::TypeMismatch {
                expected: std::any::type_name::<T>(),
            })?;
            Ok(Arc::new(cast(concrete)) as AnyArc)
        });
        self.contracts.push(ContractDecl {
            contract: ContractId::of::<C>(),
            lifetime,
            view,
        });
        self
    }

    /// Adds an eligible constructor.
    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor.erase());
        self
    }

    /// Declares a property filled by resolving contract `C`.
    ///
    /// Unlike constructor dependencies, a property dependency that resolves
    /// to nothing fails the build with `DependencyNotFound`.
    pub fn dependency<C: ?Sized + Send + Sync + 'static>(
        mut self,
        property: &'static str,
        marker: Dependency,
        set: impl Fn(&mut T, Arc<C>) + Send + Sync + 'static,
    ) -> Self {
        let assign: AssignServiceFn = Arc::new(move |target: &mut AnyInstance, service: AnyArc| {
            let target = downcast_target::<T>(target)?;
            set(target, downcast_service::<C>(service)?);
            Ok(())
        });
        self.dependencies.push(DependencyProperty {
            name: property,
            key: marker.key(ContractId::of::<C>()),
            assign,
        });
        self
    }

    /// Declares a property settable from the property map.
    pub fn property<V: Scalar>(
        mut self,
        property: &'static str,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        let assign: AssignScalarFn = Arc::new(move |target: &mut AnyInstance, value: ScalarValue| {
            let target = downcast_target::<T>(target)?;
            let value = V::from_scalar(value).ok_or(IocError::TypeMismatch {
                expected: std::any::type_name::<V>(),
            })?;
            set(target, value);
            Ok(())
        });
        self.properties.push(ScalarProperty {
            name: property,
            kind: V::KIND,
            assign,
        });
        self
    }

    /// Hands built instances the owning container through [`ContainerConnector`].
    pub fn connector(mut self) -> Self
    where
        T: ContainerConnector,
    {
        let connect: ConnectFn = Arc::new(|target: &mut AnyInstance, container: WeakContainer| {
            downcast_target::<T>(target)?.connect(container);
            Ok(())
        });
        self.connector = Some(connect);
        self
    }

    /// Finishes the declaration.
    pub fn build(self) -> ImplementationType {
        ImplementationType {
            info: Arc::new(TypeInfo {
                type_name: std::any::type_name::<T>(),
                type_id: TypeId::of::<T>(),
                contracts: self.contracts,
                constructors: self.constructors,
                dependencies: self.dependencies,
                properties: self.properties,
                connector: self.connector,
            }),
        }
    }
}

impl<T: Send + Sync + 'static> Default for ServiceType<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast_target<T: 'static>(target: &mut AnyInstance) -> IocResult<&mut T> {
    target.downcast_mut::<T>().ok_or(IocError::TypeMismatch {
        expected: std::any::type_name::<T>(),
    })
}

/// A finished, type-erased implementation declaration.
///
/// This is the type handle [`Container::apply`](crate::Container::apply)
/// receives. Cloning is cheap; one handle can be applied to any number of
/// containers.
#[derive(Clone)]
pub struct ImplementationType {
    pub(crate) info: Arc<TypeInfo>,
}

impl ImplementationType {
    /// Type name of the implementation.
    pub fn type_name(&self) -> &'static str {
        self.info.type_name
    }

    /// `TypeId` of the implementation.
    pub fn type_id(&self) -> TypeId {
        self.info.type_id
    }

    /// Declared contracts with their lifetimes, in declaration order.
    pub fn contracts(&self) -> impl Iterator<Item = (ContractId, Lifetime)> + '_ {
        self.info.contracts.iter().map(|c| (c.contract, c.lifetime))
    }

    /// Whether the type declares at least one constructor.
    pub fn is_concrete(&self) -> bool {
        !self.info.constructors.is_empty()
    }
}

impl<T: Send + Sync + 'static> From<ServiceType<T>> for ImplementationType {
    fn from(service_type: ServiceType<T>) -> Self {
        service_type.build()
    }
}

impl fmt::Debug for ImplementationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationType")
            .field("type_name", &self.info.type_name)
            .field(
                "contracts",
                &self.info.contracts.iter().map(|c| (c.contract.type_name(), c.lifetime)).collect::<Vec<_>>(),
            )
            .field("constructors", &self.info.constructors.len())
            .field("dependencies", &self.info.dependencies.iter().map(|d| d.name).collect::<Vec<_>>())
            .field("properties", &self.info.properties.iter().map(|p| p.name).collect::<Vec<_>>())
            .field("connector", &self.info.connector.is_some())
            .finish()
    }
}
