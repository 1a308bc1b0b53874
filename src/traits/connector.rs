//! Container-connector capability.

use crate::container::WeakContainer;

/// Implemented by services that want the container that built them.
///
/// Declare the capability with
/// [`ServiceType::connector`](crate::ServiceType::connector). Right after
/// construction, before property injection, the builder hands the instance a
/// weak handle to its owning container. The handle implements
/// [`Resolver`](crate::Resolver), so the service can look up further services
/// later on without keeping the container alive.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Constructor, Container, ContainerConnector, Resolver, ServiceType, WeakContainer};
///
/// #[derive(Default)]
/// struct Locator {
///     container: Option<WeakContainer>,
/// }
///
/// impl ContainerConnector for Locator {
///     fn connect(&mut self, container: WeakContainer) {
///         self.container = Some(container);
///     }
/// }
///
/// let container = Container::new();
/// container.register(
///     ServiceType::<Locator>::new()
///         .contract::<Locator>(|s| s)
///         .constructor(Constructor::default_ctor())
///         .connector(),
/// ).unwrap();
///
/// let locator = container.get::<Locator>().unwrap().unwrap();
/// assert!(locator.container.is_some());
/// ```
pub trait ContainerConnector: Send + Sync + 'static {
    fn connect(&mut self, container: WeakContainer);
}
