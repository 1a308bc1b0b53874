//! Constructor declarations and the arguments bound to them.

use std::sync::Arc;

use crate::key::{ContractId, ServiceKey};
use crate::registration::{downcast_service, AnyArc, AnyBox};
use crate::scalar::{Scalar, ScalarKind, ScalarValue};

use super::Dependency;

/// One constructor of an implementation type.
///
/// A constructor lists its parameters in declaration order and carries the
/// factory that turns the bound [`Arguments`] into an instance. When a type
/// declares several constructors exactly one of them must be marked with
/// [`preferred`](Constructor::preferred).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Constructor, Parameter};
///
/// struct Greeter {
///     greeting: String,
///     repeat: i32,
/// }
///
/// let ctor = Constructor::new(|args| Greeter {
///     greeting: args.scalar::<String>("greeting").unwrap_or_default(),
///     repeat: args.scalar::<i32>("repeat").unwrap_or(1),
/// })
/// .param(Parameter::scalar::<String>("greeting"))
/// .param(Parameter::scalar::<i32>("repeat").with_default(1))
/// .preferred();
///
/// assert_eq!(ctor.parameters().len(), 2);
/// assert!(ctor.is_preferred());
/// ```
pub struct Constructor<T> {
    parameters: Vec<Parameter>,
    preferred: bool,
    factory: Arc<dyn Fn(&Arguments) -> T + Send + Sync>,
}

impl<T: Send + Sync + 'static> Constructor<T> {
    /// Constructor with no parameters yet.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&Arguments) -> T + Send + Sync + 'static,
    {
        Self {
            parameters: Vec::new(),
            preferred: false,
            factory: Arc::new(factory),
        }
    }

    /// Parameterless constructor backed by `T::default()`.
    pub fn default_ctor() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Appends a parameter.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Marks this constructor as the one to use when the type has several.
    pub fn preferred(mut self) -> Self {
        self.preferred = true;
        self
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn is_preferred(&self) -> bool {
        self.preferred
    }

    pub(crate) fn erase(self) -> ErasedConstructor {
        let factory = self.factory;
        ErasedConstructor {
            parameters: self.parameters,
            preferred: self.preferred,
            invoke: Arc::new(move |args| Box::new(factory(args)) as AnyBox),
        }
    }
}

/// Type-erased constructor stored in an implementation type.
pub(crate) struct ErasedConstructor {
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) preferred: bool,
    pub(crate) invoke: Arc<dyn Fn(&Arguments) -> AnyBox + Send + Sync>,
}

/// A constructor parameter and how it gets its value.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: &'static str,
    binding: ParameterBinding,
}

#[derive(Debug, Clone)]
pub(crate) enum ParameterBinding {
    /// Resolved through the owning container; a miss binds `None`.
    Dependency(ServiceKey),
    /// Parsed from the parameter map, falling back to the default.
    Scalar {
        kind: ScalarKind,
        default: Option<ScalarValue>,
    },
}

impl Parameter {
    /// Parameter carrying a dependency marker; the contract is `C`.
    pub fn dependency<C: ?Sized + Send + Sync + 'static>(name: &'static str) -> Self {
        Self::dependency_with::<C>(name, Dependency::new())
    }

    /// Parameter carrying a dependency marker with a name and/or version.
    pub fn dependency_with<C: ?Sized + Send + Sync + 'static>(
        name: &'static str,
        marker: Dependency,
    ) -> Self {
        Self {
            name,
            binding: ParameterBinding::Dependency(marker.key(ContractId::of::<C>())),
        }
    }

    /// Scalar parameter of Rust type `V`.
    pub fn scalar<V: Scalar>(name: &'static str) -> Self {
        Self::scalar_kind(name, V::KIND)
    }

    /// Scalar parameter with an explicit kind.
    pub fn scalar_kind(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            binding: ParameterBinding::Scalar { kind, default: None },
        }
    }

    /// Default used when the parameter map has no entry for this parameter.
    ///
    /// Only scalar parameters take defaults; dependency parameters ignore it.
    /// A default whose kind differs from the parameter's declared kind is
    /// dropped, so the parameter stays required.
    pub fn with_default<V: Scalar>(mut self, value: V) -> Self {
        if let ParameterBinding::Scalar { kind, default } = &mut self.binding {
            if V::KIND == *kind {
                *default = Some(value.into_scalar());
            } else {
                tracing::warn!(
                    parameter = self.name,
                    declared = ?kind,
                    given = ?V::KIND,
                    "default value kind does not match parameter, ignoring it"
                );
            }
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the parameter carries a dependency marker.
    pub fn is_dependency(&self) -> bool {
        matches!(self.binding, ParameterBinding::Dependency(_))
    }

    pub(crate) fn binding(&self) -> &ParameterBinding {
        &self.binding
    }
}

/// Arguments bound to a constructor's parameters, looked up by name.
#[derive(Default)]
pub struct Arguments {
    values: Vec<(&'static str, Argument)>,
}

pub(crate) enum Argument {
    Service(Option<AnyArc>),
    Scalar(ScalarValue),
}

impl Arguments {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, argument: Argument) {
        self.values.push((name, argument));
    }

    fn find(&self, name: &str) -> Option<&Argument> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, a)| a)
    }

    /// Service bound to a dependency parameter.
    ///
    /// `None` when the dependency was not registered anywhere in the container
    /// tree, when `name` is not a dependency parameter, or when the stored
    /// service is not an `Arc<C>`.
    pub fn service<C: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Option<Arc<C>> {
        match self.find(name)? {
            Argument::Service(Some(any)) => downcast_service::<C>(Arc::clone(any)).ok(),
            _ => None,
        }
    }

    /// Scalar bound to a scalar parameter, when its kind matches `V`.
    pub fn scalar<V: Scalar>(&self, name: &str) -> Option<V> {
        self.value(name).cloned().and_then(V::from_scalar)
    }

    /// Raw scalar bound to a scalar parameter.
    pub fn value(&self, name: &str) -> Option<&ScalarValue> {
        match self.find(name)? {
            Argument::Scalar(value) => Some(value),
            Argument::Service(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_map();
        for (name, argument) in &self.values {
            match argument {
                Argument::Service(Some(_)) => list.entry(name, &"<service>"),
                Argument::Service(None) => list.entry(name, &"<missing service>"),
                Argument::Scalar(value) => list.entry(name, value),
            };
        }
        list.finish()
    }
}
