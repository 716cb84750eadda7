//! Live instances of a generated layout.

use crate::{Accumulator, Error, FieldSchema, Generator, Value};
use bytes::Bytes;
use std::sync::Arc;
use tracing::trace;

/// One set of field values bound to a [Generator].
///
/// Every assignment goes through [crate::PackedType::coerce], so slots always match their
/// schema.
#[derive(Clone, Debug)]
pub struct Structure {
    generator: Arc<Generator>,
    slots: Vec<Value>,
}

impl Structure {
    pub(crate) fn new(generator: Arc<Generator>) -> Self {
        let slots = generator.fields().iter().map(FieldSchema::seed).collect();
        Self { generator, slots }
    }

    /// The generator this instance was created from.
    pub fn generator(&self) -> &Arc<Generator> {
        &self.generator
    }

    /// Returns a handle to the named field.
    pub fn get(&self, name: &str) -> Option<Field<'_>> {
        let index = self.generator.position(name)?;
        Some(Field {
            schema: &self.generator.fields()[index],
            value: &self.slots[index],
        })
    }

    /// Returns a mutable handle to the named field.
    pub fn get_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        let index = self.generator.position(name)?;
        Some(FieldMut {
            schema: &self.generator.fields()[index],
            value: &mut self.slots[index],
        })
    }

    /// Returns the current value of the named field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.generator
            .position(name)
            .map(|index| &self.slots[index])
    }

    /// Assigns the named field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        self.get_mut(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?
            .set(value)
    }

    /// Handles to every field, in packing order.
    pub fn fields(&self) -> impl Iterator<Item = Field<'_>> {
        self.generator
            .fields()
            .iter()
            .zip(&self.slots)
            .map(|(schema, value)| Field { schema, value })
    }

    /// Sum of the current encoded length of every field.
    pub fn total_length(&self) -> usize {
        self.fields().map(|field| field.byte_length()).sum()
    }

    /// Serializes every field, in order, with no prefixes or padding.
    pub fn pack(&self) -> Result<Bytes, Error> {
        let mut accumulator = Accumulator::new();
        for field in self.fields() {
            let chunks = field
                .schema
                .packed()
                .encode(field.value)
                .map_err(|err| Error::Pack(field.name().to_string(), Box::new(err)))?;
            accumulator.append_all(chunks);
        }
        Ok(accumulator.to_bytes())
    }

    /// Populates fields from packed bytes.
    ///
    /// Variable arrays and text are skipped and keep their current value. Trailing bytes
    /// are ignored. If any field can't be read, no field is modified.
    pub fn unpack_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        let mut reader = data;
        let mut decoded = Vec::with_capacity(self.slots.len());
        for (index, schema) in self.generator.fields().iter().enumerate() {
            match schema.packed().decode(&mut reader) {
                Ok(Some(value)) => decoded.push((index, value)),
                Ok(None) => trace!(field = schema.name(), "skipping variable-length field"),
                Err(Error::EndOfBuffer) => return Err(Error::Exhausted(schema.name().to_string())),
                Err(err) => return Err(err),
            }
        }
        for (index, value) in decoded {
            self.slots[index] = value;
        }
        Ok(())
    }

    /// Assigns fields positionally, stopping at the shorter of the fields and `values`.
    ///
    /// If any value doesn't fit its field, no field is modified.
    pub fn unpack_values<I>(&mut self, values: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = Value>,
    {
        let coerced = self
            .generator
            .fields()
            .iter()
            .zip(values)
            .map(|(schema, value)| schema.packed().coerce(value))
            .collect::<Result<Vec<_>, _>>()?;
        for (slot, value) in self.slots.iter_mut().zip(coerced) {
            *slot = value;
        }
        Ok(())
    }

    /// Returns true if both instances have the same length and pack to the same bytes.
    pub fn equals(&self, other: &Self) -> bool {
        if self.total_length() != other.total_length() {
            return false;
        }
        match (self.pack(), other.pack()) {
            (Ok(mine), Ok(theirs)) => mine == theirs,
            _ => false,
        }
    }
}

impl PartialEq for Structure {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// Read-only handle to a field of a [Structure].
#[derive(Clone, Copy, Debug)]
pub struct Field<'a> {
    schema: &'a FieldSchema,
    value: &'a Value,
}

impl<'a> Field<'a> {
    pub fn name(&self) -> &'a str {
        self.schema.name()
    }

    pub fn schema(&self) -> &'a FieldSchema {
        self.schema
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Current encoded length of the field.
    pub fn byte_length(&self) -> usize {
        self.schema.packed().encoded_len(self.value)
    }
}

/// Mutable handle to a field of a [Structure].
#[derive(Debug)]
pub struct FieldMut<'a> {
    schema: &'a FieldSchema,
    value: &'a mut Value,
}

impl FieldMut<'_> {
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn schema(&self) -> &FieldSchema {
        self.schema
    }

    pub fn value(&self) -> &Value {
        self.value
    }

    /// Assigns the field, coercing the value to the field's shape.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<(), Error> {
        *self.value = self.schema.packed().coerce(value.into())?;
        Ok(())
    }

    /// Current encoded length of the field.
    pub fn byte_length(&self) -> usize {
        self.schema.packed().encoded_len(self.value)
    }
}
