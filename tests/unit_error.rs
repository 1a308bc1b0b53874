/// Unit tests for IocError and IocResult types

use ferrous_ioc::{IocError, IocResult, ScalarKind};
use std::error::Error;

#[test]
fn test_error_display_duplicate_registration() {
    let error = IocError::DuplicateRegistration {
        key: "Type:dyn app::Reader, Name:, Version:".to_string(),
        container: "demo1".to_string(),
    };
    let display_str = format!("{}", error);
    assert_eq!(
        display_str,
        "An element with the same key:\"Type:dyn app::Reader, Name:, Version:\", already exists in the container:\"demo1\""
    );
}

#[test]
fn test_error_display_ambiguous_constructor() {
    let none = IocError::AmbiguousConstructor { type_name: "app::Worker", marked: 0 };
    assert_eq!(
        none.to_string(),
        "Too many constructors but no one is marked as preferred. Type: app::Worker"
    );

    let many = IocError::AmbiguousConstructor { type_name: "app::Worker", marked: 3 };
    assert_eq!(
        many.to_string(),
        "Too many constructors marked as preferred (3). Type: app::Worker"
    );
}

#[test]
fn test_error_display_missing_parameter() {
    let error = IocError::MissingParameter {
        parameter: "message".to_string(),
        type_name: "app::MessageService",
    };
    assert_eq!(error.to_string(), "Parameter \"message\" must be provided. Type: app::MessageService");
}

#[test]
fn test_error_display_property_failures() {
    let missing = IocError::DependencyNotFound {
        key: "Type:dyn app::Clock, Name:, Version:".to_string(),
        type_name: "app::Scheduler",
    };
    assert!(missing.to_string().contains("'Type:dyn app::Clock, Name:, Version:'"));
    assert!(missing.to_string().ends_with("Type: app::Scheduler"));

    let unknown = IocError::UnknownProperty {
        property: "Retries".to_string(),
        type_name: "app::Scheduler",
    };
    assert!(unknown.to_string().contains("'Retries'"));
}

#[test]
fn test_error_display_scalar_and_loading() {
    let scalar = IocError::InvalidScalar {
        name: "x".to_string(),
        kind: ScalarKind::U16,
        value: "-1".to_string(),
    };
    assert_eq!(scalar.to_string(), "Value \"-1\" for \"x\" is not a valid u16");

    let load = IocError::TypeLoadFailure { type_name: "Demo.Missing".to_string() };
    assert_eq!(load.to_string(), "Type load failure, 'Demo.Missing'");

    let config = IocError::Config { message: "bad".to_string() };
    assert_eq!(config.to_string(), "Configuration error: bad");
}

#[test]
fn test_error_display_misc() {
    assert_eq!(IocError::InvalidArgument("x".to_string()).to_string(), "Invalid argument: x");
    assert_eq!(
        IocError::NotAnnotated("app::Store").to_string(),
        "app::Store should be annotated with at least one service contract"
    );
    assert_eq!(
        IocError::TypeMismatch { expected: "dyn app::Reader" }.to_string(),
        "Type mismatch for: dyn app::Reader"
    );
    assert!(IocError::Disconnected { type_name: "app::Store" }
        .to_string()
        .contains("app::Store"));
    assert_eq!(IocError::DepthExceeded(4).to_string(), "Max resolution depth 4 exceeded");
}

#[test]
fn test_error_is_std_error() {
    let error: Box<dyn Error + Send + Sync> = Box::new(IocError::DepthExceeded(1));
    assert!(error.source().is_none());
}

#[test]
fn test_error_clone_and_eq() {
    let error = IocError::TypeLoadFailure { type_name: "a".to_string() };
    assert_eq!(error.clone(), error);
    assert_ne!(error, IocError::TypeLoadFailure { type_name: "b".to_string() });
}

#[test]
fn test_result_alias() {
    fn ok() -> IocResult<u8> {
        Ok(1)
    }
    fn fail() -> IocResult<u8> {
        Err(IocError::InvalidArgument("nope".to_string()))
    }
    assert_eq!(ok(), Ok(1));
    assert!(fail().is_err());
}
