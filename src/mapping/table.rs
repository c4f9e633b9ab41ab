//! Virtual key table: two views over one physical ↔ virtual relation.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::input::Key;

/// Many-to-one mapping of physical keys to virtual key names.
///
/// Both maps are updated together by every mutation so that `p → v` is in
/// `virtual_by_key` exactly when `p` is in `keys_by_virtual[v]`.
#[derive(Debug, Clone, Default)]
pub struct VirtualKeyTable {
    virtual_by_key: HashMap<Key, String>,
    keys_by_virtual: HashMap<String, HashSet<Key>>,
    empty: HashSet<Key>,
}

impl VirtualKeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `physical` to `name`.
    ///
    /// First binding wins: if `physical` is already bound to any name the call
    /// is a no-op and returns `false`. Unbind explicitly to rebind.
    pub fn bind(&mut self, physical: Key, name: impl Into<String>) -> bool {
        let name = name.into();
        match self.virtual_by_key.entry(physical) {
            Entry::Occupied(existing) => {
                debug!(
                    "Ignoring bind {} -> {:?}, already bound to {:?}",
                    physical,
                    name,
                    existing.get()
                );
                false
            }
            Entry::Vacant(slot) => {
                debug!("Binding {} -> {:?}", physical, name);
                self.keys_by_virtual
                    .entry(name.clone())
                    .or_default()
                    .insert(physical);
                slot.insert(name);
                true
            }
        }
    }

    /// Removes `physical` from whichever name it is bound to.
    ///
    /// Only exact bindings are removed. A concrete gamepad key that merely
    /// resolves through an any-joystick binding returns `false`; unbind the
    /// any-joystick key instead.
    pub fn unbind_key(&mut self, physical: &Key) -> bool {
        let Some(name) = self.virtual_by_key.remove(physical) else {
            return false;
        };

        if let Some(keys) = self.keys_by_virtual.get_mut(&name) {
            keys.remove(physical);
            if keys.is_empty() {
                self.keys_by_virtual.remove(&name);
            }
        }
        debug!("Unbound {} from {:?}", physical, name);
        true
    }

    /// Removes every physical key bound to `name`.
    pub fn unbind_name(&mut self, name: &str) -> bool {
        let Some(keys) = self.keys_by_virtual.remove(name) else {
            return false;
        };

        for physical in &keys {
            self.virtual_by_key.remove(physical);
        }
        debug!("Unbound {} keys from {:?}", keys.len(), name);
        true
    }

    /// Virtual name bound to `physical`.
    ///
    /// A gamepad key on a concrete joystick falls back to the binding of the
    /// same button on any joystick. That fallback is shared by every pad and
    /// cannot be unbound for a single one.
    pub fn resolve(&self, physical: &Key) -> Option<&str> {
        self.virtual_by_key
            .get(physical)
            .or_else(|| {
                if physical.is_any_device() {
                    None
                } else {
                    self.virtual_by_key.get(&physical.widened())
                }
            })
            .map(String::as_str)
    }

    /// Physical keys bound to `name`; empty when the name is unbound.
    pub fn physical_keys_for(&self, name: &str) -> &HashSet<Key> {
        self.keys_by_virtual.get(name).unwrap_or(&self.empty)
    }

    pub fn is_bound(&self, physical: &Key) -> bool {
        self.virtual_by_key.contains_key(physical)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys_by_virtual.keys().map(String::as_str)
    }

    /// Every `(physical, name)` pair, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &str)> {
        self.virtual_by_key
            .iter()
            .map(|(key, name)| (key, name.as_str()))
    }

    /// Number of bound physical keys.
    pub fn len(&self) -> usize {
        self.virtual_by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.virtual_by_key.is_empty()
    }

    pub fn clear(&mut self) {
        self.virtual_by_key.clear();
        self.keys_by_virtual.clear();
    }
}
