use std::{any::Any, borrow::Cow, error::Error as StdError, fmt};

use thiserror::Error;

use crate::{Key, Type};

/// A boxed error returned by a fallible factory.
pub type BoxError = Box<dyn StdError + 'static>;

/// Errors raised while applying bean overrides to a context.
#[derive(Error, Debug)]
pub enum OverrideError {
    /// The factory method panicked or returned an error.
    #[error(
        "failed to invoke bean overriding method `{method}`; \
        a static method with no formal parameters is expected"
    )]
    FactoryInvocation {
        /// Name of the factory method.
        method: Cow<'static, str>,
        /// What the factory raised.
        #[source]
        source: BoxError,
    },

    /// Nothing to replace for a `ReplaceDefinition` override.
    #[error(
        "unable to override bean for field `{field}`: \
        no provider of type `{ty}`{} to replace",
        name_suffix(.name)
    )]
    NoBeanToOverride {
        /// The field that declares the override.
        field: String,
        /// The type of the bean.
        ty: Type,
        /// The explicit bean name, if any.
        name: Option<Cow<'static, str>>,
    },

    /// More than one provider matches the type and none is named after the field.
    #[error(
        "unable to select a bean to override for field `{field}`: \
        found {} providers of type `{ty}`: {candidates:?}",
        .candidates.len()
    )]
    AmbiguousBean {
        /// The field that declares the override.
        field: String,
        /// The type of the bean.
        ty: Type,
        /// The names of all matching providers.
        candidates: Vec<Cow<'static, str>>,
    },

    /// Two different overrides target the same bean.
    #[error("duplicate bean override for {key}: declared by `{first}` and `{second}`")]
    DuplicateOverride {
        /// The bean both overrides target.
        key: Key,
        /// The field applied first.
        first: String,
        /// The field rejected.
        second: String,
    },

    /// The override value does not have the type of the field.
    #[error("bean override for field `{field}` produced a value that is not `{expected}`")]
    TypeMismatch {
        /// The field that declares the override.
        field: String,
        /// The type of the field.
        expected: Type,
    },
}

fn name_suffix(name: &Option<Cow<'static, str>>) -> String {
    match name {
        Some(name) => format!(" named {:?}", name),
        None => String::new(),
    }
}

/// The payload of a caught panic, kept as an error.
#[derive(Debug)]
pub(crate) struct PanicError(pub(crate) String);

impl PanicError {
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_owned(),
                Err(_) => "factory panicked".to_owned(),
            },
        };

        PanicError(message)
    }
}

impl fmt::Display for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panicked: {}", self.0)
    }
}

impl StdError for PanicError {}
