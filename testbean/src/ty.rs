use std::{
    any::{type_name, TypeId},
    fmt,
};

/// The identity of a type, together with its name for messages.
///
/// Types sort by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Type {
    /// The name of the type, as given by [`type_name`].
    pub name: &'static str,
    /// The unique identifier of the type.
    pub id: TypeId,
}

impl Type {
    /// Returns the [`Type`] of `T`.
    pub fn new<T: ?Sized + 'static>() -> Type {
        Type {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Returns whether the type is `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
