use std::{borrow::Cow, fmt};

use crate::{BeanOverrideStrategy, Type};

/// Represents a field of a test struct that receives a bean override.
///
/// The declared type of the field is the type of the bean to override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    owner: Type,
    name: &'static str,
    ty: Type,
}

impl Field {
    /// Creates a field named `name`, of type `T`, declared by `O`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use testbean::{Field, Type};
    ///
    /// #[derive(Clone)]
    /// struct Service;
    ///
    /// struct MyTest {
    ///     service: Service,
    /// }
    ///
    /// # fn main() {
    /// let field = Field::new::<MyTest, Service>("service");
    /// assert_eq!(field.name(), "service");
    /// assert_eq!(field.ty(), Type::new::<Service>());
    /// # }
    /// ```
    pub fn new<O: 'static, T: 'static>(name: &'static str) -> Self {
        Self {
            owner: Type::new::<O>(),
            name,
            ty: Type::new::<T>(),
        }
    }

    /// Returns the type declaring the field.
    pub fn owner(&self) -> Type {
        self.owner
    }

    /// Returns the name of the field.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type of the field.
    pub fn ty(&self) -> Type {
        self.ty
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

/// The state shared by every kind of bean override: which field declares it,
/// which bean type it targets, and how it is applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverrideMetadata {
    field: Field,
    bean_type: Type,
    strategy: BeanOverrideStrategy,
}

impl OverrideMetadata {
    /// Creates the metadata of an override declared by `field`.
    ///
    /// The bean type is the declared type of the field.
    pub fn new(field: Field, strategy: BeanOverrideStrategy) -> Self {
        Self {
            field,
            bean_type: field.ty(),
            strategy,
        }
    }

    /// Returns the field declaring the override.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Returns the type of the bean to override.
    pub fn bean_type(&self) -> Type {
        self.bean_type
    }

    /// Returns how the override is applied.
    pub fn strategy(&self) -> BeanOverrideStrategy {
        self.strategy
    }

    /// The bean name used when an override names none.
    ///
    /// Always `None`: the bean is then looked up by type, see
    /// [`BeanOverrideRegistrar`](crate::BeanOverrideRegistrar).
    pub fn default_bean_name(&self) -> Option<Cow<'static, str>> {
        None
    }
}
