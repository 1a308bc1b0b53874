//! # ferrous-ioc
//!
//! Hierarchical inversion-of-control container for Rust: keyed, versioned
//! registrations, explicit constructor wiring and parent/child fallback.
//!
//! ## Features
//!
//! - **Keyed registrations**: services are addressed by contract, name and
//!   version; name and version compare case-insensitively
//! - **Two lifecycles**: a new instance per resolution, or one instance per
//!   registration built lazily under double-checked locking
//! - **Explicit wiring**: constructors, dependency markers and scalar
//!   configuration are declared with typed descriptors, no reflection
//! - **Container trees**: a child resolves locally first and falls back to its
//!   parent, so overrides stay scoped to the child
//! - **Registration documents**: JSON or YAML service lists applied through a
//!   type catalog (feature `config`)
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{Constructor, Container, Dependency, Resolver, ServiceType};
//! use std::sync::Arc;
//!
//! trait Addition: Send + Sync {
//!     fn add(&self, x: i32, y: i32) -> i32;
//! }
//!
//! trait Calculator: Send + Sync {
//!     fn add(&self, x: i32, y: i32) -> i32;
//! }
//!
//! #[derive(Default)]
//! struct AdditionService;
//!
//! impl Addition for AdditionService {
//!     fn add(&self, x: i32, y: i32) -> i32 {
//!         x + y
//!     }
//! }
//!
//! #[derive(Default)]
//! struct CalculatorService {
//!     addition: Option<Arc<dyn Addition>>,
//! }
//!
//! impl Calculator for CalculatorService {
//!     fn add(&self, x: i32, y: i32) -> i32 {
//!         self.addition.as_ref().map_or(0, |a| a.add(x, y))
//!     }
//! }
//!
//! let container = Container::new();
//! container
//!     .register(
//!         ServiceType::<AdditionService>::new()
//!             .contract::<dyn Addition>(|s| s)
//!             .constructor(Constructor::default_ctor()),
//!     )?
//!     .register(
//!         ServiceType::<CalculatorService>::new()
//!             .contract::<dyn Calculator>(|s| s)
//!             .constructor(Constructor::default_ctor())
//!             .dependency::<dyn Addition>("addition", Dependency::new(), |c, a| c.addition = Some(a)),
//!     )?;
//!
//! let calculator = container.get_required::<dyn Calculator>()?;
//! assert_eq!(calculator.add(1, 1), 2);
//! # Ok::<(), ferrous_ioc::IocError>(())
//! ```
//!
//! ## Lifecycles
//!
//! - **Transient** (default): a new instance on every resolution
//! - **Singleton**: created once per registration and shared by every
//!   contract the registration declares
//!
//! ## Container Trees
//!
//! ```rust
//! use ferrous_ioc::{Container, Resolver};
//! use std::sync::Arc;
//!
//! let root = Container::new();
//! root.register_instance::<String>(Arc::new("root".to_string()))?;
//!
//! let child = root.create_child(Some("child"));
//! assert_eq!(*child.get_required::<String>()?, "root");
//!
//! child.register_instance::<String>(Arc::new("child".to_string()))?;
//! assert_eq!(*child.get_required::<String>()?, "child");
//! assert_eq!(*root.get_required::<String>()?, "root");
//! # Ok::<(), ferrous_ioc::IocError>(())
//! ```

pub mod catalog;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod options;
pub mod scalar;
pub mod traits;

#[cfg(feature = "config")]
pub mod config;

// Internal modules
mod builder;
mod internal;
mod registration;

pub use catalog::TypeCatalog;
pub use container::{Container, WeakContainer};
pub use descriptors::{Arguments, Constructor, Dependency, ImplementationType, Parameter, ServiceType};
pub use error::{IocError, IocResult};
pub use key::{ContractId, ServiceKey};
pub use lifetime::Lifetime;
pub use observer::{ContainerObserver, Observers, TracingObserver};
pub use options::{ContainerOptions, ParentLookup, DEFAULT_MAX_DEPTH};
pub use registration::AnyArc;
pub use scalar::{Scalar, ScalarKind, ScalarValue};
pub use traits::{ContainerConnector, Resolver, ResolverCore};

#[cfg(feature = "config")]
pub use config::{ContainerDocument, ServiceEntry};
