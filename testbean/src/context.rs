use std::{any::Any, borrow::Cow, error::Error as StdError, mem};

use crate::{
    provider::Constructor, registry::Registry, BeanOverrideRegistrar, Definition, DynProvider,
    Field, Key, OverrideError, ResolveModule, Source, TestBeanOverride, TestBeans, Type,
};

/// A container of beans, where bean overrides are applied.
///
/// Every bean is a singleton: it is constructed the first time it is resolved, and each
/// resolution returns a clone of it.
///
/// When creating a `Context`, you can use options to change the
/// default creation behavior, see [`ContextOptions`] for details.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
///
/// use testbean::{modules, providers, singleton, Context, DynProvider, Module};
///
/// #[derive(Clone)]
/// struct Config {
///     url: &'static str,
/// }
///
/// #[derive(Clone)]
/// struct Client {
///     config: Rc<Config>,
/// }
///
/// struct MyModule;
///
/// impl Module for MyModule {
///     fn providers() -> Vec<DynProvider> {
///         providers![
///             singleton(|_| Rc::new(Config { url: "localhost" })),
///             singleton(|cx| Client { config: cx.resolve() }),
///         ]
///     }
/// }
///
/// # fn main() {
/// let mut cx = Context::create(modules![MyModule]);
///
/// let client = cx.resolve::<Client>();
/// let config = cx.resolve::<Rc<Config>>();
///
/// assert_eq!(client.config.url, "localhost");
/// assert!(Rc::ptr_eq(&client.config, &config));
/// # }
/// ```
pub struct Context {
    allow_override: bool,
    registry: Registry,
    loaded_modules: Vec<Type>,
    bean_overrides: BeanOverrideRegistrar,
    resolving: Vec<Key>,
}

impl Context {
    /// Creates a context with the given modules and default options.
    ///
    /// # Panics
    ///
    /// - Panics if two modules provide the same bean.
    #[track_caller]
    pub fn create(modules: Vec<ResolveModule>) -> Context {
        ContextOptions::default().create(modules)
    }

    /// Returns a new [`ContextOptions`], without having to import it.
    pub fn options() -> ContextOptions {
        ContextOptions::default()
    }

    fn new(allow_override: bool) -> Self {
        Self {
            allow_override,
            registry: Registry::default(),
            loaded_modules: Vec::new(),
            bean_overrides: BeanOverrideRegistrar::new(),
            resolving: Vec::new(),
        }
    }

    /// Returns whether a provider may replace another one with the same key.
    ///
    /// Bean overrides are installed regardless of this option.
    pub fn allow_override(&self) -> bool {
        self.allow_override
    }

    /// Returns the modules loaded so far, in load order.
    pub fn loaded_modules(&self) -> &[Type] {
        &self.loaded_modules
    }

    /// Returns the registrar that applied the bean overrides of this context.
    pub fn bean_overrides(&self) -> &BeanOverrideRegistrar {
        &self.bean_overrides
    }

    /// Returns the definitions of all registered beans, in no particular order.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.registry.definitions()
    }

    /// Returns the definition of the bean registered under `key`.
    pub fn get_definition(&self, key: &Key) -> Option<&Definition> {
        self.registry.definition(key)
    }

    /// Returns true if a bean is registered under `key`.
    pub fn contains(&self, key: &Key) -> bool {
        self.registry.contains(key)
    }

    /// Loads the providers of the given modules.
    ///
    /// A provider whose key is taken by a bean override is ignored: the override stays.
    ///
    /// # Panics
    ///
    /// - Panics if a provider has the key of another one and [`allow_override`](Context::allow_override) is false.
    #[track_caller]
    pub fn load_modules(&mut self, modules: Vec<ResolveModule>) {
        for module in modules {
            self.loaded_modules.push(module.ty());

            for provider in module.into_providers() {
                self.register(provider, None);
            }
        }
    }

    /// Returns the bean of type `T` with default name `""`.
    ///
    /// # Panics
    ///
    /// - Panics if no such bean is registered.
    /// - Panics if the bean depends on itself.
    #[track_caller]
    pub fn resolve<T: 'static + Clone>(&mut self) -> T {
        self.resolve_with_name("")
    }

    /// Returns the bean of type `T` named `name`.
    ///
    /// # Panics
    ///
    /// - Panics if no such bean is registered.
    /// - Panics if the bean depends on itself.
    #[track_caller]
    pub fn resolve_with_name<T: 'static + Clone>(&mut self, name: impl Into<Cow<'static, str>>) -> T {
        let key = Key::new::<T>(name);

        match self.lookup(&key) {
            Some(instance) => instance,
            None => panic!("no provider registered for: {}", key),
        }
    }

    /// Returns the bean of type `T` with default name `""`, if one is registered.
    #[track_caller]
    pub fn resolve_option<T: 'static + Clone>(&mut self) -> Option<T> {
        self.resolve_option_with_name("")
    }

    /// Returns the bean of type `T` named `name`, if one is registered.
    #[track_caller]
    pub fn resolve_option_with_name<T: 'static + Clone>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
    ) -> Option<T> {
        self.lookup(&Key::new::<T>(name))
    }

    /// Returns the value installed by the bean override declared on `field`.
    ///
    /// # Panics
    ///
    /// - Panics if no override declared on `field` was applied to the context.
    ///
    /// # Example
    ///
    /// ```rust
    /// use testbean::{modules, providers, singleton, Context, DynProvider, Field, Module, TestBeans};
    ///
    /// struct MyModule;
    ///
    /// impl Module for MyModule {
    ///     fn providers() -> Vec<DynProvider> {
    ///         providers![singleton(|_| 1u8)]
    ///     }
    /// }
    ///
    /// #[derive(TestBeans)]
    /// struct MyTest {
    ///     #[test_bean]
    ///     number: u8,
    /// }
    ///
    /// impl MyTest {
    ///     fn number() -> u8 {
    ///         2
    ///     }
    /// }
    ///
    /// # fn main() {
    /// let mut cx = Context::options()
    ///     .test_beans::<MyTest>()
    ///     .create(modules![MyModule]);
    ///
    /// let field = Field::new::<MyTest, u8>("number");
    /// assert_eq!(cx.resolve_test_bean::<u8>(&field), 2);
    /// # }
    /// ```
    #[track_caller]
    pub fn resolve_test_bean<T: 'static + Clone>(&mut self, field: &Field) -> T {
        let name = match self.bean_overrides.key_for_field(field) {
            Some(key) => key.name.clone(),
            None => panic!("no bean override applied for field `{}`", field),
        };

        self.resolve_with_name(name)
    }

    pub(crate) fn names_by_type(&self, ty: Type) -> Vec<Cow<'static, str>> {
        self.registry
            .definitions()
            .filter(|definition| definition.key.ty == ty)
            .map(|definition| definition.key.name.clone())
            .collect()
    }

    pub(crate) fn get_instance(&self, key: &Key) -> Option<&dyn Any> {
        self.registry.instance(key)
    }

    /// Replaces the bean under `key`, or creates it, with `instance`.
    pub(crate) fn install_override(&mut self, key: Key, instance: Box<dyn Any>) {
        let provider = DynProvider::without_constructor(key, Source::BeanOverride);
        self.registry.insert(provider, Some(instance));
    }

    #[track_caller]
    fn register(&mut self, provider: DynProvider, instance: Option<Box<dyn Any>>) {
        let definition = provider.definition();

        match self.registry.definition(&definition.key).map(|d| d.source) {
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!("(+) insert new: {:?}", definition);
            }
            Some(Source::BeanOverride) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("(=) keep bean override, ignore: {:?}", definition);

                return;
            }
            Some(_) if self.allow_override => {
                #[cfg(feature = "tracing")]
                tracing::warn!("(!) override by `key`: {:?}", definition);
            }
            Some(_) => panic!(
                "already existing a provider with the same `key`: {:?}",
                definition
            ),
        }

        self.registry.insert(provider, instance);
    }

    #[track_caller]
    fn lookup<T: 'static + Clone>(&mut self, key: &Key) -> Option<T> {
        if self.registry.instance(key).is_none() {
            let constructor = self.registry.constructor(key)?;
            self.construct(key, constructor);
        }

        self.registry.instance(key)?.downcast_ref::<T>().cloned()
    }

    #[track_caller]
    fn construct(&mut self, key: &Key, constructor: Constructor) {
        if self.resolving.contains(key) {
            let cycle = self
                .resolving
                .iter()
                .chain([key])
                .map(Key::to_string)
                .collect::<Vec<_>>();

            panic!("circular dependency detected: {}", cycle.join(" -> "));
        }

        self.resolving.push(key.clone());
        let instance = constructor(self);
        self.resolving.pop();

        self.registry.store(key, instance);
    }

    /// Constructs every bean that has no instance yet.
    #[track_caller]
    fn construct_all(&mut self) {
        for key in self.registry.pending() {
            // An earlier constructor may have built it as a dependency.
            if self.registry.instance(&key).is_some() {
                continue;
            }

            if let Some(constructor) = self.registry.constructor(&key) {
                self.construct(&key, constructor);
            }
        }
    }
}

/// Options and flags which can be used to configure how a context is created.
///
/// Creation runs in this order: standalone instances are registered, modules are loaded,
/// bean overrides are applied, and, with [`eager_create`](ContextOptions::eager_create),
/// every bean is constructed. So no constructor ever sees a bean that is about to be overridden.
///
/// # Example
///
/// ```rust
/// use testbean::{modules, Context};
///
/// # fn main() {
/// let mut cx = Context::options()
///     .allow_override(false)
///     .instance(42i32)
///     .instance_with_name("Hello", "greeting")
///     .create(modules![]);
///
/// assert_eq!(cx.resolve::<i32>(), 42);
/// assert_eq!(cx.resolve_with_name::<&str>("greeting"), "Hello");
/// # }
/// ```
pub struct ContextOptions {
    allow_override: bool,
    eager_create: bool,
    instances: Vec<(DynProvider, Box<dyn Any>)>,
    bean_overrides: Vec<TestBeanOverride>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            allow_override: true,
            eager_create: false,
            instances: Vec::new(),
            bean_overrides: Vec::new(),
        }
    }
}

impl ContextOptions {
    /// Sets whether a provider may replace another one with the same key. Default is `true`.
    ///
    /// Bean overrides are not affected by this option.
    pub fn allow_override(mut self, allow_override: bool) -> Self {
        self.allow_override = allow_override;
        self
    }

    /// Sets whether every bean is constructed while the context is created,
    /// once the bean overrides are applied. Default is `false`.
    pub fn eager_create(mut self, eager_create: bool) -> Self {
        self.eager_create = eager_create;
        self
    }

    /// Registers a ready-made bean with default name `""`.
    pub fn instance<T: 'static + Clone>(self, instance: T) -> Self {
        self.instance_with_name(instance, "")
    }

    /// Registers a ready-made bean named `name`.
    pub fn instance_with_name<T, N>(mut self, instance: T, name: N) -> Self
    where
        T: 'static + Clone,
        N: Into<Cow<'static, str>>,
    {
        let provider = DynProvider::without_constructor(Key::new::<T>(name), Source::Instance);
        self.instances.push((provider, Box::new(instance)));
        self
    }

    /// Appends the bean overrides declared by the test struct `S`.
    pub fn test_beans<S: TestBeans>(self) -> Self {
        self.bean_overrides(S::test_bean_overrides())
    }

    /// Appends bean overrides.
    pub fn bean_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = TestBeanOverride>,
    {
        self.bean_overrides.extend(overrides);
        self
    }

    /// Creates a context with the given modules.
    ///
    /// # Panics
    ///
    /// - Panics if two providers have the same key and [`allow_override`](ContextOptions::allow_override) is false.
    /// - Panics if a bean override cannot be applied, see [`ContextOptions::try_create`].
    #[track_caller]
    pub fn create(self, modules: Vec<ResolveModule>) -> Context {
        match self.try_create(modules) {
            Ok(cx) => cx,
            Err(e) => match e.source() {
                Some(cause) => panic!("{}: {}", e, cause),
                None => panic!("{}", e),
            },
        }
    }

    /// Creates a context with the given modules, returning the error of the first
    /// bean override that cannot be applied.
    ///
    /// # Panics
    ///
    /// - Panics if two providers have the same key and [`allow_override`](ContextOptions::allow_override) is false.
    #[track_caller]
    pub fn try_create(self, modules: Vec<ResolveModule>) -> Result<Context, OverrideError> {
        let ContextOptions {
            allow_override,
            eager_create,
            instances,
            bean_overrides,
        } = self;

        let mut cx = Context::new(allow_override);

        for (provider, instance) in instances {
            cx.register(provider, Some(instance));
        }

        cx.load_modules(modules);

        let mut registrar = mem::take(&mut cx.bean_overrides);
        registrar.apply(&mut cx, bean_overrides)?;
        cx.bean_overrides = registrar;

        if eager_create {
            cx.construct_all();
        }

        Ok(cx)
    }
}
