use std::{any::Any, borrow::Cow, fmt, rc::Rc};

use crate::{Context, Definition, Key, Source};

pub(crate) type Constructor = Rc<dyn Fn(&mut Context) -> Box<dyn Any>>;

/// Provides one bean to a [`Context`].
///
/// A provider built with [`singleton`] constructs its instance the first time the bean is
/// resolved and keeps it; every resolution hands out a clone of that instance.
/// Standalone instances and bean overrides are providers without constructor.
pub struct DynProvider {
    definition: Definition,
    constructor: Option<Constructor>,
}

impl DynProvider {
    pub(crate) fn without_constructor(key: Key, source: Source) -> Self {
        Self {
            definition: Definition { key, source },
            constructor: None,
        }
    }

    /// Sets the name of the bean, default is `""`.
    pub fn name<N>(mut self, name: N) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        self.definition.key.name = name.into();
        self
    }

    /// Returns the [`Definition`] of the bean.
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub(crate) fn key(&self) -> &Key {
        &self.definition.key
    }

    pub(crate) fn constructor(&self) -> Option<Constructor> {
        self.constructor.clone()
    }
}

impl fmt::Debug for DynProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynProvider")
            .field("definition", &self.definition)
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Creates the provider of a bean of type `T`, built by `constructor` on first use.
///
/// # Example
///
/// ```rust
/// use testbean::{singleton, DynProvider};
///
/// #[derive(Clone)]
/// struct Port(u16);
///
/// #[derive(Clone)]
/// struct Server {
///     port: Port,
/// }
///
/// # fn main() {
/// let _: DynProvider = singleton(|cx| Server { port: cx.resolve() }).name("http");
/// # }
/// ```
pub fn singleton<T, C>(constructor: C) -> DynProvider
where
    T: 'static + Clone,
    C: Fn(&mut Context) -> T + 'static,
{
    DynProvider {
        definition: Definition {
            key: Key::new::<T>(""),
            source: Source::Constructor,
        },
        constructor: Some(Rc::new(move |cx| Box::new(constructor(cx)) as Box<dyn Any>)),
    }
}
