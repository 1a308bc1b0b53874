//! Container options.

use crate::observer::Observers;

/// Default limit on nested resolutions per thread.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Which key a container forwards to its parent after a local miss.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::ParentLookup;
///
/// assert_eq!(ParentLookup::default(), ParentLookup::FullKey);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ParentLookup {
    /// Forward the requested contract, name and version unchanged.
    #[default]
    FullKey,
    /// Forward the contract alone, dropping name and version.
    ContractOnly,
}

/// Options shared by a container and the children it creates.
///
/// Deserializable from configuration under the `config` feature; observers
/// are never read from configuration and start out empty.
///
/// ```rust
/// # #[cfg(feature = "config")]
/// # {
/// use ferrous_ioc::{ContainerOptions, ParentLookup};
///
/// let options: ContainerOptions =
///     serde_json::from_str(r#"{ "parent_lookup": "contract_only", "max_depth": 32 }"#).unwrap();
/// assert_eq!(options.parent_lookup, ParentLookup::ContractOnly);
/// assert_eq!(options.max_depth, 32);
/// # }
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Key forwarded to the parent on a local miss
    pub parent_lookup: ParentLookup,
    /// Nested resolution limit per thread
    pub max_depth: usize,
    /// Registration and resolution observers
    #[cfg_attr(feature = "config", serde(skip))]
    pub observers: Observers,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            parent_lookup: ParentLookup::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            observers: Observers::new(),
        }
    }
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent_lookup(mut self, lookup: ParentLookup) -> Self {
        self.parent_lookup = lookup;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn observer(mut self, observer: std::sync::Arc<dyn crate::observer::ContainerObserver>) -> Self {
        self.observers.add(observer);
        self
    }
}
