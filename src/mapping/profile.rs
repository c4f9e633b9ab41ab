//! Serializable snapshot of a virtual key table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

use super::table::VirtualKeyTable;
use crate::input::Key;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to parse binding profile: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize binding profile: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Virtual key bindings keyed by name, e.g.
///
/// ```toml
/// [bindings]
/// jump = [{ device_class = "keyboard", code = 32 }]
/// ```
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingProfile {
    #[serde(default)]
    pub bindings: BTreeMap<String, Vec<Key>>,
}

impl BindingProfile {
    pub fn from_toml(content: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ProfileError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl VirtualKeyTable {
    /// Snapshot of the table with keys sorted per name.
    pub fn to_profile(&self) -> BindingProfile {
        let mut bindings: BTreeMap<String, Vec<Key>> = BTreeMap::new();
        for (physical, name) in self.iter() {
            bindings.entry(name.to_string()).or_default().push(*physical);
        }
        for keys in bindings.values_mut() {
            keys.sort();
        }
        BindingProfile { bindings }
    }

    /// Binds every entry of `profile`; keys that are already bound keep their
    /// current name. Returns the number of new bindings.
    pub fn apply_profile(&mut self, profile: &BindingProfile) -> usize {
        let mut applied = 0;
        for (name, keys) in &profile.bindings {
            for physical in keys {
                if self.bind(*physical, name.as_str()) {
                    applied += 1;
                } else {
                    debug!("Profile entry {} -> {:?} skipped", physical, name);
                }
            }
        }
        info!(
            "Applied binding profile: {} of {} entries bound",
            applied,
            profile.bindings.values().map(Vec::len).sum::<usize>()
        );
        applied
    }
}
