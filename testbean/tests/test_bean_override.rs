mod components;

use std::{
    any::Any,
    collections::{hash_map::DefaultHasher, HashMap},
    error::Error,
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use testbean::{
    BeanOverride, BeanOverrideStrategy, FactoryMethod, Field, OverrideError, TestBeanOverride,
    Type,
};

use crate::components::{Greeting, Service, Stub};

struct MyTest;

thread_local! {
    static SENTINEL: Rc<dyn Greeting> = Rc::new(Stub("sentinel"));
}

impl MyTest {
    fn service() -> Service {
        Service("stub")
    }

    fn other_service() -> Service {
        Service("other")
    }

    fn greeting() -> Rc<dyn Greeting> {
        SENTINEL.with(Rc::clone)
    }

    fn broken() -> Service {
        panic!("database is down")
    }

    fn failing() -> Result<Service, Failure> {
        Err(Failure)
    }
}

#[derive(Debug)]
struct Failure;

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no service today")
    }
}

impl Error for Failure {}

fn service_override() -> TestBeanOverride {
    TestBeanOverride::new(
        Field::new::<MyTest, Service>("service"),
        FactoryMethod::new::<MyTest, _>("service", MyTest::service),
    )
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn create_override_returns_factory_value() {
    let value = service_override()
        .create_override("", None, None)
        .unwrap();

    assert_eq!(value.downcast_ref::<Service>(), Some(&Service("stub")));
}

#[test]
fn create_override_preserves_identity() {
    let o = TestBeanOverride::new(
        Field::new::<MyTest, Rc<dyn Greeting>>("greeting"),
        FactoryMethod::new::<MyTest, _>("greeting", MyTest::greeting),
    );

    let value = o.create_override("", None, None).unwrap();
    let value = value.downcast_ref::<Rc<dyn Greeting>>().unwrap();

    SENTINEL.with(|sentinel| assert!(Rc::ptr_eq(value, sentinel)));
    assert_eq!(value.greet(), "sentinel");
}

#[test]
fn create_override_ignores_existing_bean() {
    let existing = Service("real");

    let value = service_override()
        .create_override("service", None, Some(&existing as &dyn Any))
        .unwrap();

    assert_eq!(value.downcast_ref::<Service>(), Some(&Service("stub")));
}

#[test]
fn panicking_factory_is_reported() {
    let o = TestBeanOverride::new(
        Field::new::<MyTest, Service>("service"),
        FactoryMethod::new::<MyTest, _>("broken", MyTest::broken),
    );

    let err = o.create_override("", None, None).unwrap_err();

    assert!(matches!(
        &err,
        OverrideError::FactoryInvocation { method, .. } if method == "broken"
    ));
    assert_eq!(
        err.to_string(),
        "failed to invoke bean overriding method `broken`; \
        a static method with no formal parameters is expected"
    );
    assert!(err
        .source()
        .unwrap()
        .to_string()
        .contains("database is down"));
}

#[test]
fn failing_factory_is_reported() {
    let o = TestBeanOverride::new(
        Field::new::<MyTest, Service>("service"),
        FactoryMethod::fallible::<MyTest, _, _>("failing", MyTest::failing),
    );

    let err = o.create_override("", None, None).unwrap_err();

    assert!(err.to_string().contains("`failing`"));
    assert_eq!(err.source().unwrap().to_string(), "no service today");
}

#[test]
fn explicit_name_is_returned_verbatim() {
    let o = service_override().name("primaryService");

    assert_eq!(o.bean_name().as_deref(), Some("primaryService"));
}

#[test]
fn blank_or_absent_name_falls_back_to_default() {
    let absent = service_override();
    let empty = service_override().name("");
    let blank = service_override().name("  \t");

    let default = absent.metadata().default_bean_name();

    assert_eq!(absent.bean_name(), default);
    assert_eq!(empty.bean_name(), default);
    assert_eq!(blank.bean_name(), default);
    assert_eq!(blank.declared_name(), Some("  \t"));
}

#[test]
fn metadata_describes_field() {
    let o = service_override();
    let metadata = o.metadata();

    assert_eq!(metadata.field().name(), "service");
    assert_eq!(metadata.field().owner(), Type::new::<MyTest>());
    assert_eq!(metadata.bean_type(), Type::new::<Service>());
    assert_eq!(metadata.strategy(), BeanOverrideStrategy::ReplaceDefinition);

    assert_eq!(o.method().name(), "service");
    assert_eq!(o.method().declaring_type(), Type::new::<MyTest>());
    assert_eq!(o.method().return_type(), Type::new::<Service>());
}

#[test]
fn equal_descriptors_share_hash() {
    let a = service_override().name("svc");
    let b = service_override().name("svc");

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    assert_eq!(service_override(), service_override());
    assert_eq!(hash_of(&service_override()), hash_of(&service_override()));
}

#[test]
fn changing_any_component_breaks_equality() {
    let base = service_override().name("svc");

    let other_field = TestBeanOverride::new(
        Field::new::<MyTest, Service>("backup"),
        FactoryMethod::new::<MyTest, _>("service", MyTest::service),
    )
    .name("svc");

    let other_method = TestBeanOverride::new(
        Field::new::<MyTest, Service>("service"),
        FactoryMethod::new::<MyTest, _>("other_service", MyTest::other_service),
    )
    .name("svc");

    let other_name = service_override().name("svc2");
    let no_name = service_override();

    let other_strategy = service_override()
        .name("svc")
        .strategy(BeanOverrideStrategy::ReplaceOrCreateDefinition);

    assert_ne!(base, other_field);
    assert_ne!(base, other_method);
    assert_ne!(base, other_name);
    assert_ne!(base, no_name);
    assert_ne!(base, other_strategy);
}

#[test]
fn usable_as_map_key() {
    let mut resolved = HashMap::new();

    resolved.insert(service_override(), "first");
    resolved.insert(service_override(), "second");
    resolved.insert(service_override().name("svc"), "named");

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[&service_override()], "second");
}

#[test]
fn each_call_invokes_factory_again() {
    let o = TestBeanOverride::new(
        Field::new::<MyTest, Rc<dyn Greeting>>("greeting"),
        FactoryMethod::new::<MyTest, _>("greeting", MyTest::greeting),
    );

    let before = SENTINEL.with(Rc::strong_count);

    let first = o.create_override("", None, None).unwrap();
    let second = o.create_override("", None, None).unwrap();

    assert_eq!(SENTINEL.with(Rc::strong_count), before + 2);

    drop((first, second));
    assert_eq!(SENTINEL.with(Rc::strong_count), before);
}
