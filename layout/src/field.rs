//! Named slots of a generated layout.

use crate::{Error, PackedType, Value};
use std::sync::RwLock;

/// A named field of a [crate::Generator].
///
/// Schemas are shared by every instance the generator creates. Only the initial value can
/// change, and changing it only affects instances created afterwards.
#[derive(Debug)]
pub struct FieldSchema {
    name: String,
    packed: PackedType,
    offset: usize,
    initial: RwLock<Option<Value>>,
}

impl FieldSchema {
    pub(crate) fn new(name: impl Into<String>, packed: PackedType, offset: usize) -> Self {
        Self {
            name: name.into(),
            packed,
            offset,
            initial: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn packed(&self) -> &PackedType {
        &self.packed
    }

    /// Declared byte offset: the sum of the element widths of all preceding fields.
    ///
    /// Arrays contribute the width of one element, so this is informational only.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the initial value, if one was set.
    pub fn initial(&self) -> Option<Value> {
        self.initial.read().unwrap().clone()
    }

    /// Sets the value new instances start with.
    ///
    /// The value is coerced like any assignment (fixed arrays are padded or truncated).
    pub fn set_initial(&self, value: impl Into<Value>) -> Result<(), Error> {
        let value = self.packed.coerce(value.into())?;
        *self.initial.write().unwrap() = Some(value);
        Ok(())
    }

    /// Removes the initial value so new instances start at the type's default.
    pub fn clear_initial(&self) {
        *self.initial.write().unwrap() = None;
    }

    /// The value a new instance's slot starts with.
    pub(crate) fn seed(&self) -> Value {
        self.initial().unwrap_or_else(|| self.packed.default_value())
    }
}
