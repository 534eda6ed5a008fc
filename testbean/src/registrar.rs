use std::{any::Any, borrow::Cow, collections::HashMap};

use crate::{BeanOverride, Context, Field, Key, OverrideError, TestBeanOverride};

/// Applies bean overrides to a [`Context`].
///
/// This runs after all modules are loaded and before any instance is eagerly created,
/// so that nothing observes the providers being replaced.
///
/// For each override, the bean to replace is selected as follows:
///
/// 1. if the override names a bean, the provider with that name and the bean type,
/// 2. otherwise, the only provider of the bean type,
/// 3. otherwise, among several providers of the bean type, the one named after the field.
///
/// If no provider is found, the override fails unless its strategy is
/// [`ReplaceOrCreateDefinition`](crate::BeanOverrideStrategy::ReplaceOrCreateDefinition),
/// in which case the value is registered under the requested name, or under the default name `""`.
pub struct BeanOverrideRegistrar<O = TestBeanOverride> {
    applied: HashMap<O, Key>,
    targets: HashMap<Key, Field>,
    fields: HashMap<Field, Key>,
}

impl<O> Default for BeanOverrideRegistrar<O> {
    fn default() -> Self {
        Self {
            applied: HashMap::new(),
            targets: HashMap::new(),
            fields: HashMap::new(),
        }
    }
}

impl<O: BeanOverride> BeanOverrideRegistrar<O> {
    /// Creates a registrar that has applied nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies all the given overrides, stopping at the first failure.
    pub fn apply<I>(&mut self, cx: &mut Context, overrides: I) -> Result<(), OverrideError>
    where
        I: IntoIterator<Item = O>,
    {
        overrides
            .into_iter()
            .try_for_each(|o| self.apply_one(cx, o).map(|_| ()))
    }

    /// Applies one override and returns the key of the bean it replaced or created.
    ///
    /// An override equal to one already applied is skipped, its value is not created again.
    pub fn apply_one(&mut self, cx: &mut Context, o: O) -> Result<Key, OverrideError> {
        if let Some(key) = self.applied.get(&o) {
            #[cfg(feature = "tracing")]
            tracing::debug!("(=) bean override already applied: {:?}", o);

            return Ok(key.clone());
        }

        let metadata = o.metadata();
        let field = *metadata.field();
        let key = Key::with_type(resolve_bean_name(cx, &o)?, metadata.bean_type());

        if let Some(first) = self.targets.get(&key) {
            return Err(OverrideError::DuplicateOverride {
                key,
                first: first.to_string(),
                second: field.to_string(),
            });
        }

        let value = o.create_override(
            &key.name,
            cx.get_definition(&key),
            cx.get_instance(&key),
        )?;

        if (*value).type_id() != field.ty().id {
            return Err(OverrideError::TypeMismatch {
                field: field.to_string(),
                expected: field.ty(),
            });
        }

        cx.install_override(key.clone(), value);

        #[cfg(feature = "tracing")]
        tracing::debug!("(~) bean override for `{}` installed as {}", field, key);

        self.targets.insert(key.clone(), field);
        self.fields.insert(field, key.clone());
        self.applied.insert(o, key.clone());

        Ok(key)
    }

    /// Returns the key of the bean replaced by the given override.
    pub fn key_for(&self, o: &O) -> Option<&Key> {
        self.applied.get(o)
    }
}

impl<O> BeanOverrideRegistrar<O> {
    /// Returns the key of the bean replaced by the override declared on `field`.
    pub fn key_for_field(&self, field: &Field) -> Option<&Key> {
        self.fields.get(field)
    }

    /// Returns the number of applied overrides.
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    /// Returns true if no override has been applied.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

fn resolve_bean_name<O: BeanOverride>(
    cx: &Context,
    o: &O,
) -> Result<Cow<'static, str>, OverrideError> {
    let metadata = o.metadata();
    let field = metadata.field();
    let ty = metadata.bean_type();
    let allows_create = metadata.strategy().allows_create();

    if let Some(name) = o.bean_name() {
        if allows_create || cx.contains(&Key::with_type(name.clone(), ty)) {
            return Ok(name);
        }

        return Err(OverrideError::NoBeanToOverride {
            field: field.to_string(),
            ty,
            name: Some(name),
        });
    }

    let mut candidates = cx.names_by_type(ty);

    match candidates.len() {
        0 if allows_create => Ok(Cow::Borrowed("")),
        0 => Err(OverrideError::NoBeanToOverride {
            field: field.to_string(),
            ty,
            name: None,
        }),
        1 => Ok(candidates.swap_remove(0)),
        _ => {
            if let Some(name) = candidates.iter().find(|name| **name == field.name()) {
                return Ok(name.clone());
            }

            candidates.sort();

            Err(OverrideError::AmbiguousBean {
                field: field.to_string(),
                ty,
                candidates,
            })
        }
    }
}
