//! Service key types for the inversion-of-control container.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{IocError, IocResult};

/// Identifier of a service contract.
///
/// A contract is whatever type callers ask the container for: usually a trait
/// object such as `dyn Calculator`, but any `'static` type works. Equality and
/// hashing use the `TypeId` only; the type name is kept for diagnostics.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::ContractId;
///
/// trait Addition: Send + Sync {}
///
/// let a = ContractId::of::<dyn Addition>();
/// let b = ContractId::of::<dyn Addition>();
/// assert_eq!(a, b);
/// assert!(a.type_name().contains("Addition"));
/// assert_ne!(a, ContractId::of::<String>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ContractId {
    id: TypeId,
    name: &'static str,
}

impl ContractId {
    /// Contract identifier for `C`.
    #[inline(always)]
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }

    /// The `TypeId` of the contract.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The contract's type name as reported by `std::any::type_name`.
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ContractId {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContractId {}

impl Hash for ContractId {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Key addressing one registration: contract, name and version.
///
/// Name and version are optional and compared case-insensitively. They are
/// folded to lower case when the key is built, so equality and hashing only
/// ever see the folded text and two keys that differ in case alone land in the
/// same registry slot.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ContractId, ServiceKey};
///
/// trait Message: Send + Sync {}
///
/// let contract = ContractId::of::<dyn Message>();
/// let registered = ServiceKey::versioned(contract, "svc", "1.0");
/// let requested = ServiceKey::versioned(contract, "SVC", "1.0");
/// assert_eq!(registered, requested);
///
/// let other = ServiceKey::named(contract, "other");
/// assert_ne!(registered, other);
///
/// assert_eq!(ServiceKey::new(contract).name(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    contract: ContractId,
    name: String,
    version: String,
}

impl ServiceKey {
    /// Key with no name and no version.
    pub fn new(contract: ContractId) -> Self {
        Self::from_parts(contract, None, None)
    }

    /// Key with a name and no version.
    pub fn named(contract: ContractId, name: &str) -> Self {
        Self::from_parts(contract, Some(name), None)
    }

    /// Key with both a name and a version.
    pub fn versioned(contract: ContractId, name: &str, version: &str) -> Self {
        Self::from_parts(contract, Some(name), Some(version))
    }

    /// Unnamed, unversioned key for contract `C`.
    #[inline]
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self::new(ContractId::of::<C>())
    }

    /// Builds a key from optional parts.
    ///
    /// Fails with [`IocError::InvalidArgument`] when the contract is absent,
    /// which is how registration documents surface a missing contract type.
    ///
    /// ```rust
    /// use ferrous_ioc::{ContractId, IocError, ServiceKey};
    ///
    /// let key = ServiceKey::create(Some(ContractId::of::<String>()), Some("Main"), None).unwrap();
    /// assert_eq!(key.name(), "main");
    ///
    /// let err = ServiceKey::create(None, Some("main"), None).unwrap_err();
    /// assert!(matches!(err, IocError::InvalidArgument(_)));
    /// ```
    pub fn create(
        contract: Option<ContractId>,
        name: Option<&str>,
        version: Option<&str>,
    ) -> IocResult<Self> {
        let contract = contract.ok_or_else(|| IocError::invalid_argument("contract type is required"))?;
        Ok(Self::from_parts(contract, name, version))
    }

    pub(crate) fn from_parts(contract: ContractId, name: Option<&str>, version: Option<&str>) -> Self {
        Self {
            contract,
            name: fold(name),
            version: fold(version),
        }
    }

    /// The contract this key addresses.
    pub fn contract(&self) -> ContractId {
        self.contract
    }

    /// Folded name; empty when the key is unnamed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folded version; empty when the key is unversioned.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The same contract with name and version dropped.
    pub fn contract_only(&self) -> Self {
        Self::new(self.contract)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type:{}, Name:{}, Version:{}",
            self.contract.type_name(),
            self.name,
            self.version
        )
    }
}

fn fold(part: Option<&str>) -> String {
    part.map(str::to_lowercase).unwrap_or_default()
}
