use crate::{DynProvider, Type};

/// A group of providers loaded into a [`Context`](crate::Context) together.
///
/// # Example
///
/// ```rust
/// use testbean::{modules, providers, singleton, Context, DynProvider, Module};
///
/// #[derive(Clone)]
/// struct Database(&'static str);
///
/// struct Storage;
///
/// impl Module for Storage {
///     fn providers() -> Vec<DynProvider> {
///         providers![
///             singleton(|_| Database("primary")),
///             singleton(|_| Database("replica")).name("replica"),
///         ]
///     }
/// }
///
/// # fn main() {
/// let mut cx = Context::create(modules![Storage]);
/// assert_eq!(cx.resolve_with_name::<Database>("replica").0, "replica");
/// # }
/// ```
pub trait Module {
    /// The providers of the module.
    fn providers() -> Vec<DynProvider>;
}

/// The providers of a [`Module`], ready to be loaded.
pub struct ResolveModule {
    ty: Type,
    providers: Vec<DynProvider>,
}

impl ResolveModule {
    /// Collects the providers of `M`.
    pub fn new<M: Module + 'static>() -> Self {
        Self {
            ty: Type::new::<M>(),
            providers: M::providers(),
        }
    }

    /// The module type.
    pub fn ty(&self) -> Type {
        self.ty
    }

    pub(crate) fn into_providers(self) -> Vec<DynProvider> {
        self.providers
    }
}

/// Builds a `Vec<ResolveModule>` from module types.
///
/// ```rust
/// use testbean::{modules, Context};
///
/// # fn main() {
/// let cx = Context::create(modules![]);
/// assert!(cx.loaded_modules().is_empty());
/// # }
/// ```
#[macro_export]
macro_rules! modules {
    ($($module:ty),* $(,)?) => {
        ::std::vec![$($crate::ResolveModule::new::<$module>()),*]
    };
}

/// Builds a `Vec<DynProvider>`; a shorthand for `vec!` in [`Module::providers`].
#[macro_export]
macro_rules! providers {
    ($($provider:expr),* $(,)?) => {
        ::std::vec![$($provider),*]
    };
}
