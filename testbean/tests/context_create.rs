mod components;

use std::{cell::Cell, rc::Rc};

use testbean::{modules, providers, singleton, Context, DynProvider, Key, Module, Source, Type};

use crate::components::{AppModule, Greeter, Greeting, Service};

thread_local! {
    static BUILT: Cell<u32> = const { Cell::new(0) };
}

#[derive(Clone, Debug, PartialEq)]
struct Port(u16);

struct Counted;

impl Module for Counted {
    fn providers() -> Vec<DynProvider> {
        providers![singleton(|_| {
            BUILT.with(|c| c.set(c.get() + 1));
            Port(80)
        })]
    }
}

struct Ports;

impl Module for Ports {
    fn providers() -> Vec<DynProvider> {
        providers![
            singleton(|_| Port(443)).name("https"),
            singleton(|_| Port(8080)).name("admin"),
        ]
    }
}

#[test]
fn bean_is_built_on_first_resolve_only() {
    let mut cx = Context::create(modules![Counted]);
    assert_eq!(BUILT.with(Cell::get), 0);

    assert_eq!(cx.resolve::<Port>(), Port(80));
    assert_eq!(cx.resolve::<Port>(), Port(80));
    assert_eq!(BUILT.with(Cell::get), 1);
}

#[test]
fn eager_create_builds_every_bean() {
    let _cx = Context::options()
        .eager_create(true)
        .create(modules![Counted]);

    assert_eq!(BUILT.with(Cell::get), 1);
}

#[test]
fn dependencies_share_one_instance() {
    let mut cx = Context::create(modules![AppModule]);

    let greeter = cx.resolve::<Greeter>();
    let greeting = cx.resolve::<Rc<dyn Greeting>>();

    assert!(Rc::ptr_eq(&greeter.greeting, &greeting));
    assert_eq!(greeting.greet(), "hello");
}

#[test]
fn beans_are_told_apart_by_name() {
    let mut cx = Context::create(modules![Ports]);

    assert_eq!(cx.resolve_with_name::<Port>("https"), Port(443));
    assert_eq!(cx.resolve_option_with_name::<Port>("admin"), Some(Port(8080)));
    assert_eq!(cx.resolve_option::<Port>(), None);
    assert!(cx.contains(&Key::new::<Port>("https")));
    assert_eq!(cx.definitions().count(), 2);
}

#[test]
fn modules_are_recorded_in_load_order() {
    let mut cx = Context::create(modules![Ports, AppModule]);
    cx.load_modules(modules![Counted]);

    assert_eq!(
        cx.loaded_modules(),
        [
            Type::new::<Ports>(),
            Type::new::<AppModule>(),
            Type::new::<Counted>()
        ]
    );
}

#[test]
#[should_panic(expected = "no provider registered for")]
fn unknown_bean_panics() {
    let mut cx = Context::create(modules![Ports]);
    cx.resolve::<Service>();
}

#[test]
fn later_module_wins_by_default() {
    struct Fallback;

    impl Module for Fallback {
        fn providers() -> Vec<DynProvider> {
            providers![singleton(|_| Port(1)).name("https")]
        }
    }

    let mut cx = Context::create(modules![Ports, Fallback]);

    assert_eq!(cx.resolve_with_name::<Port>("https"), Port(1));
    assert_eq!(cx.definitions().count(), 2);
}

#[test]
#[should_panic(expected = "already existing a provider with the same `key`")]
fn same_key_is_rejected_without_allow_override() {
    struct Fallback;

    impl Module for Fallback {
        fn providers() -> Vec<DynProvider> {
            providers![singleton(|_| Port(1)).name("admin")]
        }
    }

    Context::options()
        .allow_override(false)
        .create(modules![Ports, Fallback]);
}

#[test]
fn instances_are_registered_before_modules() {
    let mut cx = Context::options()
        .instance(Service("standalone"))
        .instance_with_name(Port(22), "ssh")
        .create(modules![AppModule]);

    assert_eq!(cx.resolve_with_name::<Port>("ssh"), Port(22));
    assert_eq!(
        cx.get_definition(&Key::new::<Port>("ssh")).unwrap().source,
        Source::Instance
    );

    // The module provides the same key and replaces the standalone instance.
    assert_eq!(cx.resolve::<Service>(), Service("real"));
    assert_eq!(
        cx.get_definition(&Key::new::<Service>("")).unwrap().source,
        Source::Constructor
    );
}

#[test]
#[should_panic(expected = "circular dependency detected")]
fn self_dependency_panics() {
    #[derive(Clone)]
    struct Left(#[allow(dead_code)] Rc<Right>);

    #[derive(Clone)]
    struct Right(#[allow(dead_code)] Rc<Left>);

    struct Cycle;

    impl Module for Cycle {
        fn providers() -> Vec<DynProvider> {
            providers![
                singleton(|cx| Left(Rc::new(cx.resolve()))),
                singleton(|cx| Right(Rc::new(cx.resolve()))),
            ]
        }
    }

    let mut cx = Context::create(modules![Cycle]);
    cx.resolve::<Left>();
}
