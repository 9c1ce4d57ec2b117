//! Backend storage layouts
//!
//! A backend's fields live in the frontend's storage at sequential keys, in
//! declaration order. Every backend installed behind one frontend must keep
//! the declarations of all earlier versions as a prefix and may only append.
//! The frontend does not enforce this when swapping; an incompatible layout
//! silently reinterprets existing state. [`StorageLayout::check_upgrade`] is
//! the check operators run before proposing a swap.

use relay_abi::{FieldType, SlotKey};
use relay_host::Unit;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One declared field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: FieldType,
}

/// Ordered field declarations of a backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLayout {
    fields: Vec<FieldDecl>,
}

impl StorageLayout {
    /// Create an empty layout
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field declaration
    #[must_use]
    pub fn field(mut self, name: &str, ty: FieldType) -> Self {
        self.fields.push(FieldDecl {
            name: name.to_string(),
            ty,
        });
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Storage key of the field called `name`
    #[must_use]
    pub fn key_of(&self, name: &str) -> Option<SlotKey> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .map(|index| SlotKey::field(index as u64))
    }

    /// Whether `newer` keeps every field of `self` at the same position and
    /// type
    #[must_use]
    pub fn is_prefix_of(&self, newer: &StorageLayout) -> bool {
        Self::check_upgrade(self, newer).is_ok()
    }

    /// Verify that `new` only appends to `old`
    ///
    /// Field names are not compared; renaming a field keeps its slot.
    ///
    /// # Errors
    /// Returns the first incompatibility found
    pub fn check_upgrade(old: &StorageLayout, new: &StorageLayout) -> Result<(), LayoutError> {
        if new.len() < old.len() {
            return Err(LayoutError::Truncated {
                old_len: old.len(),
                new_len: new.len(),
            });
        }
        for (index, (before, after)) in old.fields.iter().zip(&new.fields).enumerate() {
            if before.ty != after.ty {
                return Err(LayoutError::TypeMismatch {
                    index,
                    name: before.name.clone(),
                    old: before.ty,
                    new: after.ty,
                });
            }
        }
        Ok(())
    }
}

impl Display for StorageLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.ty, field.name))
            .collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

/// Layout incompatibilities
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// New layout drops declared fields
    #[error("layout shrinks from {old_len} to {new_len} fields")]
    Truncated { old_len: usize, new_len: usize },

    /// A field changes type in place
    #[error("field {index} ({name}) changes type from {old} to {new}")]
    TypeMismatch {
        index: usize,
        name: String,
        old: FieldType,
        new: FieldType,
    },
}

/// Code that can be installed behind a dispatch frontend
///
/// Besides handling forwarded calls, a backend declares the fields it keeps
/// in the frontend's storage and exposes a one-time `initialize(address)`
/// entry point in place of a constructor.
pub trait Backend: Unit {
    /// Declared fields in storage order
    fn layout(&self) -> StorageLayout;
}
