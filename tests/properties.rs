use ferrous_ioc::{
    Constructor, Container, ContainerConnector, Dependency, IocError, Resolver, ServiceType, WeakContainer,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

trait Clock: Send + Sync {
    fn now(&self) -> &'static str;
}

struct FixedClock(&'static str);

impl Clock for FixedClock {
    fn now(&self) -> &'static str {
        self.0
    }
}

#[derive(Default)]
struct Scheduler {
    clock: Option<Arc<dyn Clock>>,
    enabled: bool,
    budget: Decimal,
    start: Option<chrono::NaiveDateTime>,
}

fn scheduler() -> ServiceType<Scheduler> {
    ServiceType::<Scheduler>::new()
        .contract::<Scheduler>(|s| s)
        .constructor(Constructor::default_ctor())
        .dependency::<dyn Clock>("clock", Dependency::new(), |s, c| s.clock = Some(c))
        .property::<bool>("Enabled", |s, v| s.enabled = v)
        .property::<Decimal>("Budget", |s, v| s.budget = v)
        .property::<chrono::NaiveDateTime>("Start", |s, v| s.start = Some(v))
}

fn props(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_property_dependency_miss_is_an_error() {
    let container = Container::new();
    container.register(scheduler()).unwrap();

    let err = container.get::<Scheduler>().err().expect("clock is not registered");
    match err {
        IocError::DependencyNotFound { key, type_name } => {
            assert!(key.contains("Clock"), "{}", key);
            assert!(type_name.contains("Scheduler"));
        }
        other => panic!("Expected DependencyNotFound, got {:?}", other),
    }
}

#[test]
fn test_scalar_properties_are_parsed_by_kind() {
    let container = Container::new();
    container.register_instance::<dyn Clock>(Arc::new(FixedClock("noon"))).unwrap();
    container
        .apply(
            scheduler(),
            HashMap::new(),
            props(&[("Enabled", "True"), ("Budget", "12.50"), ("Start", "2016-05-04 10:30:00")]),
            None,
            None,
        )
        .unwrap();

    let scheduler = container.get_required::<Scheduler>().unwrap();
    assert_eq!(scheduler.clock.as_ref().map(|c| c.now()), Some("noon"));
    assert!(scheduler.enabled);
    assert_eq!(scheduler.budget, Decimal::new(1250, 2));
    assert_eq!(
        scheduler.start,
        NaiveDate::from_ymd_opt(2016, 5, 4).and_then(|d| d.and_hms_opt(10, 30, 0))
    );
}

#[test]
fn test_unknown_property_is_an_error() {
    let container = Container::new();
    container.register_instance::<dyn Clock>(Arc::new(FixedClock("noon"))).unwrap();
    container
        .apply(scheduler(), HashMap::new(), props(&[("Missing", "1")]), None, None)
        .unwrap();

    let err = container.get::<Scheduler>().err().expect("no property named Missing");
    assert!(matches!(err, IocError::UnknownProperty { ref property, .. } if property == "Missing"));
}

#[test]
fn test_property_names_are_case_sensitive() {
    let container = Container::new();
    container.register_instance::<dyn Clock>(Arc::new(FixedClock("noon"))).unwrap();
    container
        .apply(scheduler(), HashMap::new(), props(&[("enabled", "true")]), None, None)
        .unwrap();

    assert!(matches!(
        container.get::<Scheduler>(),
        Err(IocError::UnknownProperty { .. })
    ));
}

#[test]
fn test_invalid_property_value() {
    let container = Container::new();
    container.register_instance::<dyn Clock>(Arc::new(FixedClock("noon"))).unwrap();
    container
        .apply(scheduler(), HashMap::new(), props(&[("Enabled", "sometimes")]), None, None)
        .unwrap();

    assert!(matches!(
        container.get::<Scheduler>(),
        Err(IocError::InvalidScalar { ref name, .. }) if name == "Enabled"
    ));
}

#[test]
fn test_versioned_property_dependency() {
    let container = Container::new();
    container
        .apply_instance::<dyn Clock>(Arc::new(FixedClock("v2")), Some("system"), Some("2.0"))
        .unwrap();

    let ty = ServiceType::<Scheduler>::new()
        .contract::<Scheduler>(|s| s)
        .constructor(Constructor::default_ctor())
        .dependency::<dyn Clock>("clock", Dependency::new().named("System").version("2.0"), |s, c| {
            s.clock = Some(c)
        });
    container.register(ty).unwrap();

    let scheduler = container.get_required::<Scheduler>().unwrap();
    assert_eq!(scheduler.clock.as_ref().map(|c| c.now()), Some("v2"));
}

#[derive(Default)]
struct Locator {
    container: Option<WeakContainer>,
    clock_at_connect: Option<&'static str>,
}

impl ContainerConnector for Locator {
    fn connect(&mut self, container: WeakContainer) {
        self.clock_at_connect = container
            .get::<dyn Clock>()
            .ok()
            .flatten()
            .map(|c| c.now());
        self.container = Some(container);
    }
}

#[test]
fn test_connector_receives_owning_container() {
    let root = Container::new();
    root.register_instance::<dyn Clock>(Arc::new(FixedClock("root"))).unwrap();
    let child = root.create_child(Some("child"));
    child
        .register(
            ServiceType::<Locator>::new()
                .contract::<Locator>(|s| s)
                .constructor(Constructor::default_ctor())
                .connector(),
        )
        .unwrap();

    let locator = child.get_required::<Locator>().unwrap();
    assert_eq!(locator.clock_at_connect, Some("root"));

    let handle = locator.container.as_ref().and_then(|weak| weak.upgrade()).expect("child alive");
    assert!(Container::ptr_eq(&handle, &child));
}

#[test]
fn test_connector_does_not_keep_container_alive() {
    let container = Container::new();
    container
        .register(
            ServiceType::<Locator>::new()
                .singleton_contract::<Locator>(|s| s)
                .constructor(Constructor::default_ctor())
                .connector(),
        )
        .unwrap();

    let locator = container.get_required::<Locator>().unwrap();
    drop(container);
    let weak = locator.container.clone().expect("connected");
    assert!(weak.upgrade().is_none());
    assert!(matches!(weak.get::<dyn Clock>(), Err(IocError::Disconnected { .. })));
}
