//! Service lifetime definitions.

use std::fmt;

/// Lifecycle tag attached to each declared contract.
///
/// A registration gets a single builder shared by all of its contracts. When
/// any of those contracts is declared [`Lifetime::Singleton`] the builder
/// caches its first instance forever; otherwise every resolution constructs a
/// fresh instance.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Lifetime;
///
/// assert_eq!(Lifetime::default(), Lifetime::Transient);
/// assert_eq!(Lifetime::Singleton.to_string(), "singleton");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// New instance per resolution, never cached (the default "strong" reference type)
    #[default]
    Transient,
    /// One instance per builder, created lazily and shared by every resolver
    Singleton,
}

impl Lifetime {
    /// Lifetime of a builder serving all of `declared`.
    ///
    /// Singleton wins as soon as one contract asks for it.
    pub(crate) fn for_contracts<I>(declared: I) -> Lifetime
    where
        I: IntoIterator<Item = Lifetime>,
    {
        if declared.into_iter().any(|l| l == Lifetime::Singleton) {
            Lifetime::Singleton
        } else {
            Lifetime::Transient
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Transient => f.write_str("transient"),
            Lifetime::Singleton => f.write_str("singleton"),
        }
    }
}
