//! Type catalog: implementation types addressable by identifier.

use std::collections::HashMap;

use crate::descriptors::{ImplementationType, ServiceType};
use crate::error::{IocError, IocResult};

/// Maps identifier strings to implementation types.
///
/// Registration documents name implementations by string; the catalog is
/// where those strings are turned into [`ImplementationType`] handles.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Constructor, IocError, ServiceType, TypeCatalog};
///
/// #[derive(Default)]
/// struct Clock;
///
/// let mut catalog = TypeCatalog::new();
/// catalog.add_as(
///     "app.Clock",
///     ServiceType::<Clock>::new()
///         .contract::<Clock>(|s| s)
///         .constructor(Constructor::default_ctor()),
/// );
///
/// assert!(catalog.resolve("app.Clock").is_ok());
/// assert_eq!(
///     catalog.resolve("app.Missing").unwrap_err(),
///     IocError::TypeLoadFailure { type_name: "app.Missing".to_string() }
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, ImplementationType>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `ty` under `std::any::type_name::<T>()`.
    pub fn add<T: Send + Sync + 'static>(&mut self, ty: ServiceType<T>) -> &mut Self {
        self.add_as(std::any::type_name::<T>(), ty)
    }

    /// Adds `ty` under an explicit identifier, replacing any previous entry.
    pub fn add_as(&mut self, id: impl Into<String>, ty: impl Into<ImplementationType>) -> &mut Self {
        self.types.insert(id.into(), ty.into());
        self
    }

    /// Looks an identifier up.
    pub fn resolve(&self, id: &str) -> IocResult<ImplementationType> {
        self.types.get(id).cloned().ok_or_else(|| IocError::TypeLoadFailure {
            type_name: id.to_string(),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
