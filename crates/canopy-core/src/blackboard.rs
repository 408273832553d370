use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use tracing::warn;

/// Compile-time typed name for a blackboard entry.
///
/// The name is the storage key, so a `BbKey<T>` and a plain `&str` with the same text address the
/// same entry.
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for BbKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BbKey").field(&self.name).finish()
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Named store of arbitrarily typed values, used for communication between nodes.
///
/// Reads never fail: a missing entry, or one stored under a different type, is reported as
/// absent (the latter with a warning).
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<String, Box<dyn Any>>,
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether `key` is present and stores a `T`. Never warns.
    pub fn holds<T: 'static>(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(|v| v.is::<T>())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Overwrite (or create) the entry for `key`.
    pub fn set_value<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Read a copy of the entry for `key`, or `default` when it is absent.
    pub fn value<T: Clone + 'static>(&self, key: &str, default: T) -> T {
        self.value_ref::<T>(key).cloned().unwrap_or(default)
    }

    pub fn value_ref<T: 'static>(&self, key: &str) -> Option<&T> {
        let value = self.values.get(key)?;
        let typed = value.downcast_ref::<T>();
        if typed.is_none() {
            warn!(
                key,
                requested = type_name::<T>(),
                "blackboard type mismatch, treating entry as absent"
            );
        }
        typed
    }

    pub fn value_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        let value = self.values.get_mut(key)?;
        if !value.is::<T>() {
            warn!(
                key,
                requested = type_name::<T>(),
                "blackboard type mismatch, treating entry as absent"
            );
            return None;
        }
        value.downcast_mut::<T>()
    }

    /// Remove the entry for `key` if it holds a `T`; entries of another type are left in place.
    pub fn take_value<T: 'static>(&mut self, key: &str) -> Option<T> {
        if !self.values.get(key)?.is::<T>() {
            warn!(
                key,
                requested = type_name::<T>(),
                "blackboard type mismatch, entry not removed"
            );
            return None;
        }
        let value = self.values.remove(key)?;
        value.downcast::<T>().ok().map(|b| *b)
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        self.set_value(key.name, value);
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        self.value_ref(key.name)
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        self.value_mut(key.name)
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        self.take_value(key.name)
    }
}
