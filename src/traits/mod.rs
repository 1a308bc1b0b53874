//! Core traits for the inversion-of-control container.

mod connector;
mod resolver;

pub use connector::ContainerConnector;
pub use resolver::{Resolver, ResolverCore};
