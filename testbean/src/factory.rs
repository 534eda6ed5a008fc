use std::{
    any::Any,
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use crate::{error::PanicError, BoxError, OverrideError, Type};

type Invoker = Rc<dyn Fn() -> Result<Box<dyn Any>, BoxError>>;

/// Represents a factory method: a function without parameters and without receiver
/// that creates the value of a bean override.
///
/// Two factory methods are equal if they have the same declaring type, name and return type.
#[derive(Clone)]
pub struct FactoryMethod {
    declaring: Type,
    name: Cow<'static, str>,
    returns: Type,
    invoker: Invoker,
}

impl FactoryMethod {
    /// Creates a factory method named `name`, declared by `D`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use testbean::{FactoryMethod, Type};
    ///
    /// struct MyTest;
    ///
    /// impl MyTest {
    ///     fn number() -> i32 {
    ///         42
    ///     }
    /// }
    ///
    /// # fn main() {
    /// let method = FactoryMethod::new::<MyTest, _>("number", MyTest::number);
    /// assert_eq!(method.name(), "number");
    /// assert_eq!(method.return_type(), Type::new::<i32>());
    /// # }
    /// ```
    pub fn new<D: 'static, T: 'static>(name: impl Into<Cow<'static, str>>, factory: fn() -> T) -> Self {
        Self {
            declaring: Type::new::<D>(),
            name: name.into(),
            returns: Type::new::<T>(),
            invoker: Rc::new(move || Ok(Box::new(factory()) as Box<dyn Any>)),
        }
    }

    /// Creates a factory method named `name`, declared by `D`, that may fail.
    pub fn fallible<D: 'static, T: 'static, E>(
        name: impl Into<Cow<'static, str>>,
        factory: fn() -> Result<T, E>,
    ) -> Self
    where
        E: Into<BoxError> + 'static,
    {
        Self {
            declaring: Type::new::<D>(),
            name: name.into(),
            returns: Type::new::<T>(),
            invoker: Rc::new(move || match factory() {
                Ok(value) => Ok(Box::new(value) as Box<dyn Any>),
                Err(e) => Err(e.into()),
            }),
        }
    }

    /// Returns the type declaring the factory method.
    pub fn declaring_type(&self) -> Type {
        self.declaring
    }

    /// Returns the name of the factory method.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of the values the factory method creates.
    pub fn return_type(&self) -> Type {
        self.returns
    }

    /// Calls the factory method.
    ///
    /// A panic inside the factory is caught and reported like an error it returned.
    pub fn invoke(&self) -> Result<Box<dyn Any>, OverrideError> {
        let result = match panic::catch_unwind(AssertUnwindSafe(|| (self.invoker)())) {
            Ok(result) => result,
            Err(payload) => Err(Box::new(PanicError::from_payload(payload)) as BoxError),
        };

        result.map_err(|source| OverrideError::FactoryInvocation {
            method: self.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for FactoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMethod")
            .field("declaring", &self.declaring)
            .field("name", &self.name)
            .field("returns", &self.returns)
            .finish()
    }
}

impl PartialEq for FactoryMethod {
    fn eq(&self, other: &Self) -> bool {
        self.declaring == other.declaring
            && self.name == other.name
            && self.returns == other.returns
    }
}

impl Eq for FactoryMethod {}

impl Hash for FactoryMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring.hash(state);
        self.name.hash(state);
        self.returns.hash(state);
    }
}
