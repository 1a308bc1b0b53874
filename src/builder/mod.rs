//! Builders: how one registration produces its instances.
//!
//! Every applied implementation gets exactly one builder, shared by all of the
//! registry entries created for its contracts. [`TransientBuilder`] runs the
//! construction algorithm on every call; [`SingletonBuilder`] runs it at most
//! once and caches the result.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::container::WeakContainer;
use crate::descriptors::ImplementationType;
use crate::error::IocResult;
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;

mod singleton;
mod transient;

pub(crate) use singleton::SingletonBuilder;
pub(crate) use transient::TransientBuilder;

/// Produces instances of one implementation type.
pub(crate) trait ObjectBuilder: Send + Sync {
    /// Returns an instance holding the concrete implementation.
    fn build(&self) -> IocResult<AnyArc>;

    fn lifetime(&self) -> Lifetime;

    fn type_name(&self) -> &'static str;

    /// Sets the owning container. Only the first call succeeds.
    fn connect(&self, container: WeakContainer) -> IocResult<()>;
}

/// Picks the builder variant for `ty` from its declared contract lifetimes.
pub(crate) fn create_builder(
    ty: &ImplementationType,
    parameters: BTreeMap<String, String>,
    properties: BTreeMap<String, String>,
) -> Arc<dyn ObjectBuilder> {
    let transient = TransientBuilder::new(Arc::clone(&ty.info), parameters, properties);
    match Lifetime::for_contracts(ty.contracts().map(|(_, lifetime)| lifetime)) {
        Lifetime::Singleton => Arc::new(SingletonBuilder::new(transient)),
        Lifetime::Transient => Arc::new(transient),
    }
}
