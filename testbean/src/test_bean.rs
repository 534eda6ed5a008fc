use std::{
    any::Any,
    borrow::Cow,
    fmt::Debug,
    hash::{Hash, Hasher},
};

use crate::{
    BeanOverrideStrategy, Context, Definition, FactoryMethod, Field, OverrideError,
    OverrideMetadata,
};

/// A bean override, as seen by the [`BeanOverrideRegistrar`](crate::BeanOverrideRegistrar).
///
/// Implementations are compared with [`Eq`] and [`Hash`] so that the same override
/// is applied only once.
pub trait BeanOverride: Eq + Hash + Debug {
    /// Returns the state shared by all overrides.
    fn metadata(&self) -> &OverrideMetadata;

    /// Returns the name of the bean to override, `None` to look it up by type.
    fn bean_name(&self) -> Option<Cow<'static, str>> {
        self.metadata().default_bean_name()
    }

    /// Creates the value that replaces the bean named `name`.
    ///
    /// The existing definition and instance, if any, are those being replaced.
    fn create_override(
        &self,
        name: &str,
        existing_definition: Option<&Definition>,
        existing_instance: Option<&dyn Any>,
    ) -> Result<Box<dyn Any>, OverrideError>;
}

/// A bean override whose value is created by calling a [`FactoryMethod`].
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
///
/// use testbean::{BeanOverride, FactoryMethod, Field, TestBeanOverride};
///
/// struct MyTest {
///     greeting: Rc<str>,
/// }
///
/// impl MyTest {
///     fn greeting() -> Rc<str> {
///         Rc::from("hi")
///     }
/// }
///
/// # fn main() {
/// let o = TestBeanOverride::new(
///     Field::new::<MyTest, Rc<str>>("greeting"),
///     FactoryMethod::new::<MyTest, _>("greeting", MyTest::greeting),
/// )
/// .name("welcome");
///
/// assert_eq!(o.bean_name().as_deref(), Some("welcome"));
///
/// let value = o.create_override("welcome", None, None).unwrap();
/// assert_eq!(&**value.downcast_ref::<Rc<str>>().unwrap(), "hi");
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct TestBeanOverride {
    metadata: OverrideMetadata,
    method: FactoryMethod,
    name: Option<Cow<'static, str>>,
}

impl TestBeanOverride {
    /// Creates an override of the bean `field` targets, replacing an existing provider
    /// that is looked up by type.
    pub fn new(field: Field, method: FactoryMethod) -> Self {
        Self {
            metadata: OverrideMetadata::new(field, BeanOverrideStrategy::ReplaceDefinition),
            method,
            name: None,
        }
    }

    /// Sets the name of the bean to override.
    ///
    /// A blank name is kept, but the bean is still looked up by type.
    pub fn name<N>(mut self, name: N) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        self.name = Some(name.into());
        self
    }

    /// Sets how the override is applied.
    pub fn strategy(mut self, strategy: BeanOverrideStrategy) -> Self {
        self.metadata = OverrideMetadata::new(*self.metadata.field(), strategy);
        self
    }

    /// Returns the factory method creating the value.
    pub fn method(&self) -> &FactoryMethod {
        &self.method
    }

    /// Returns the name as it was declared, blank or not.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl BeanOverride for TestBeanOverride {
    fn metadata(&self) -> &OverrideMetadata {
        &self.metadata
    }

    fn bean_name(&self) -> Option<Cow<'static, str>> {
        match &self.name {
            Some(name) if !name.trim().is_empty() => Some(name.clone()),
            _ => self.metadata.default_bean_name(),
        }
    }

    fn create_override(
        &self,
        _name: &str,
        _existing_definition: Option<&Definition>,
        _existing_instance: Option<&dyn Any>,
    ) -> Result<Box<dyn Any>, OverrideError> {
        self.method.invoke()
    }
}

impl PartialEq for TestBeanOverride {
    fn eq(&self, other: &Self) -> bool {
        self.metadata == other.metadata && self.method == other.method && self.name == other.name
    }
}

impl Eq for TestBeanOverride {}

impl Hash for TestBeanOverride {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.metadata.hash(state);
        self.method.hash(state);
        self.name.hash(state);
    }
}

/// A test struct declaring bean overrides on its fields.
///
/// Define this trait so that the purpose is not to be implemented manually,
/// but to use the `#[derive(TestBeans)]` macro to generate the implementation.
pub trait TestBeans: Sized {
    /// Returns one override per `#[test_bean]` field.
    fn test_bean_overrides() -> Vec<TestBeanOverride>;

    /// Builds the test struct, taking every `#[test_bean]` field from the context.
    ///
    /// # Panics
    ///
    /// - Panics if the overrides of this struct were not applied to the context.
    fn inject(cx: &mut Context) -> Self;
}
