use std::{any::Any, collections::HashMap};

use crate::{provider::Constructor, Definition, DynProvider, Key};

struct Entry {
    provider: DynProvider,
    instance: Option<Box<dyn Any>>,
}

/// Beans by key: each provider together with its instance, once there is one.
///
/// Replacing a provider drops the instance of the replaced one.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<Key, Entry>,
}

impl Registry {
    pub(crate) fn insert(&mut self, provider: DynProvider, instance: Option<Box<dyn Any>>) {
        let key = provider.key().clone();
        self.entries.insert(key, Entry { provider, instance });
    }

    /// Keeps the instance built by the provider of `key`.
    pub(crate) fn store(&mut self, key: &Key, instance: Box<dyn Any>) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.instance = Some(instance);
        }
    }

    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn definition(&self, key: &Key) -> Option<&Definition> {
        self.entries.get(key).map(|entry| entry.provider.definition())
    }

    pub(crate) fn instance(&self, key: &Key) -> Option<&dyn Any> {
        self.entries.get(key)?.instance.as_deref()
    }

    pub(crate) fn constructor(&self, key: &Key) -> Option<Constructor> {
        self.entries.get(key)?.provider.constructor()
    }

    pub(crate) fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.entries.values().map(|entry| entry.provider.definition())
    }

    /// Keys of the beans that have a constructor but no instance yet, in key order.
    pub(crate) fn pending(&self) -> Vec<Key> {
        let mut keys = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.instance.is_none() && entry.provider.constructor().is_some())
            .map(|(key, _)| key.clone())
            .collect::<Vec<_>>();

        keys.sort();
        keys
    }
}
