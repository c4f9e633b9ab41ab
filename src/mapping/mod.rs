//! Mapping of physical keys to virtual key names.
//!
//! The [`VirtualKeyTable`] is the remapping layer between device codes and the
//! action names game code queries. [`BindingProfile`] is its serializable form.

pub mod profile;
pub mod table;

pub use profile::{BindingProfile, ProfileError};
pub use table::VirtualKeyTable;
