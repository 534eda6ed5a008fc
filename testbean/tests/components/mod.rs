use std::rc::Rc;

use testbean::{providers, singleton, DynProvider, Module};

pub(crate) trait Greeting {
    fn greet(&self) -> String;
}

pub(crate) struct English;

impl Greeting for English {
    fn greet(&self) -> String {
        "hello".to_owned()
    }
}

pub(crate) struct Stub(pub(crate) &'static str);

impl Greeting for Stub {
    fn greet(&self) -> String {
        self.0.to_owned()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Service(pub(crate) &'static str);

#[derive(Clone)]
pub(crate) struct Greeter {
    pub(crate) greeting: Rc<dyn Greeting>,
}

pub(crate) struct AppModule;

impl Module for AppModule {
    fn providers() -> Vec<DynProvider> {
        providers![
            singleton(|_| Service("real")),
            singleton(|_| Rc::new(English) as Rc<dyn Greeting>),
            singleton(|cx| Greeter {
                greeting: cx.resolve()
            }),
        ]
    }
}

#[allow(dead_code)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
