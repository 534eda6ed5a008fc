use std::{borrow::Cow, fmt};

use crate::Type;

/// Identifies a bean: its name and its type.
///
/// The default name is `""`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    /// The name of the bean.
    pub name: Cow<'static, str>,
    /// The type of the bean.
    pub ty: Type,
}

impl Key {
    /// Creates a key for type `T` with the given name.
    pub fn new<T: 'static>(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_type(name, Type::new::<T>())
    }

    /// Creates a key for an already erased type.
    pub fn with_type(name: impl Into<Cow<'static, str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(name = {:?})", self.ty, self.name)
    }
}

/// Where the provider of a bean came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    /// Registered by a module, the instance is built by its constructor on first use.
    Constructor,
    /// Registered as a ready-made instance through [`ContextOptions::instance`](crate::ContextOptions::instance).
    Instance,
    /// Installed by a bean override, replacing or creating a provider.
    ///
    /// Modules loaded afterwards do not replace it.
    BeanOverride,
}

/// Describes a registered bean.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Definition {
    /// The key of the bean.
    pub key: Key,
    /// Where its provider came from.
    pub source: Source,
}
