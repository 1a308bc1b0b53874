//! Error types for the inversion-of-control container.

use thiserror::Error;

use crate::scalar::ScalarKind;

/// Container errors
///
/// Every condition the container raises while registering or building
/// services. A lookup that simply finds nothing is *not* an error: resolution
/// returns `Ok(None)` for that case, so an `IocError` always signals a
/// configuration or programming defect.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::IocError;
///
/// let missing = IocError::MissingParameter {
///     parameter: "message".to_string(),
///     type_name: "app::MessageService",
/// };
/// assert_eq!(
///     missing.to_string(),
///     "Parameter \"message\" must be provided. Type: app::MessageService"
/// );
///
/// let depth = IocError::DepthExceeded(256);
/// assert_eq!(depth.to_string(), "Max resolution depth 256 exceeded");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IocError {
    /// A required input was absent or failed a structural precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The implementation type declares no contract
    #[error("{0} should be annotated with at least one service contract")]
    NotAnnotated(&'static str),

    /// A key is already present in the container's registry
    #[error("An element with the same key:\"{key}\", already exists in the container:\"{container}\"")]
    DuplicateRegistration { key: String, container: String },

    /// Zero or several constructors carry the preferred marker
    #[error("{}", ambiguous_message(type_name, *marked))]
    AmbiguousConstructor { type_name: &'static str, marked: usize },

    /// A scalar constructor parameter has neither a configured value nor a default
    #[error("Parameter \"{parameter}\" must be provided. Type: {type_name}")]
    MissingParameter { parameter: String, type_name: &'static str },

    /// A property-level dependency resolved to nothing
    #[error("The specified dependency service with a key '{key}' could not be found. Type: {type_name}")]
    DependencyNotFound { key: String, type_name: &'static str },

    /// A configured property name is not declared by the implementation type
    #[error("Invalid property configuration: could not find a property with the specified name '{property}'. Type: {type_name}")]
    UnknownProperty { property: String, type_name: &'static str },

    /// A configured scalar could not be parsed into its declared kind
    #[error("Value \"{value}\" for \"{name}\" is not a valid {kind}")]
    InvalidScalar { name: String, kind: ScalarKind, value: String },

    /// A resolved service was not stored as the requested contract
    #[error("Type mismatch for: {expected}")]
    TypeMismatch { expected: &'static str },

    /// A type identifier from a registration document is unknown
    #[error("Type load failure, '{type_name}'")]
    TypeLoadFailure { type_name: String },

    /// A registration document could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The builder's owning container has been dropped
    #[error("The container owning {type_name} has been dropped")]
    Disconnected { type_name: &'static str },

    /// Nested resolution went deeper than the configured limit
    #[error("Max resolution depth {0} exceeded")]
    DepthExceeded(usize),
}

fn ambiguous_message(type_name: &str, marked: usize) -> String {
    if marked == 0 {
        format!("Too many constructors but no one is marked as preferred. Type: {}", type_name)
    } else {
        format!("Too many constructors marked as preferred ({}). Type: {}", marked, type_name)
    }
}

impl IocError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        IocError::InvalidArgument(message.into())
    }

    pub(crate) fn config(message: impl std::fmt::Display) -> Self {
        IocError::Config { message: message.to_string() }
    }
}

/// Result type for container operations
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{IocError, IocResult};
///
/// fn load() -> IocResult<u32> {
///     Err(IocError::DepthExceeded(8))
/// }
///
/// assert!(load().is_err());
/// ```
pub type IocResult<T> = Result<T, IocError>;
