//! Generated layouts and the instances they create.

use crate::{Cache, Descriptor, Error, FieldSchema, PackedType, Structure, Value};
use std::{collections::HashMap, sync::Arc};

/// A parsed layout: an ordered set of [FieldSchema]s shared by every [Structure] it creates.
///
/// Generators are interned: equivalent descriptors resolve to the same `Arc<Generator>`
/// (see [Cache]).
#[derive(Debug)]
pub struct Generator {
    signature: String,
    fields: Vec<FieldSchema>,
    index: HashMap<String, usize>,
    fixed_len: usize,
}

impl Generator {
    /// Parses every entry of `descriptor` into a field schema.
    pub(crate) fn build(descriptor: &Descriptor, signature: String) -> Result<Self, Error> {
        let mut fields = Vec::with_capacity(descriptor.len());
        let mut index = HashMap::with_capacity(descriptor.len());
        let mut offset = 0;
        for (name, code) in descriptor.entries() {
            let packed = PackedType::parse(code)?;
            index.insert(name.to_string(), fields.len());
            fields.push(FieldSchema::new(name, packed, offset));
            offset += packed.element_width();
        }
        Ok(Self {
            signature,
            fields,
            index,
            fixed_len: offset,
        })
    }

    /// Returns the generator for a compact formula (one type letter per field, no arrays).
    ///
    /// Fields are named `Field0`, `Field1`, ...
    pub fn from_compact(formula: &str) -> Result<Arc<Self>, Error> {
        Cache::global().compact(formula)
    }

    /// Returns the generator for a mapping of field names to type codes.
    ///
    /// The order of `descriptor` is ignored. Fields are packed in natural name order
    /// (digit runs compare numerically), so `{"magic": "I", "length": "H"}` packs
    /// `length` first. To control the wire order, prefix names with their position,
    /// e.g. `1_magic` and `2_length`.
    ///
    /// ```
    /// use commonware_layout::Generator;
    ///
    /// let generator = Generator::from_named([("2_length", "H"), ("1_magic", "I")]).unwrap();
    /// let names: Vec<_> = generator.fields().iter().map(|field| field.name()).collect();
    /// assert_eq!(names, ["1_magic", "2_length"]);
    /// ```
    pub fn from_named<I, K, V>(descriptor: I) -> Result<Arc<Self>, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Cache::global().named(descriptor)
    }

    /// Returns the generator for a JSON object of field names to type codes.
    ///
    /// Key order in `json` is ignored: fields are packed in natural name order, as with
    /// [Generator::from_named].
    pub fn from_json(json: &str) -> Result<Arc<Self>, Error> {
        Cache::global().json(json)
    }

    /// Returns the generator for a parsed descriptor.
    pub fn from_descriptor(descriptor: &Descriptor) -> Result<Arc<Self>, Error> {
        Cache::global().get_or_create(descriptor)
    }

    /// Creates an instance, optionally populated from packed bytes.
    pub fn create_instance(self: &Arc<Self>, data: Option<&[u8]>) -> Result<Structure, Error> {
        let mut instance = Structure::new(self.clone());
        if let Some(data) = data {
            instance.unpack_bytes(data)?;
        }
        Ok(instance)
    }

    /// Creates an instance of a compact formula populated from positional values.
    pub fn unpack_values<I>(formula: &str, values: I) -> Result<Structure, Error>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut instance = Self::from_compact(formula)?.create_instance(None)?;
        instance.unpack_values(values)?;
        Ok(instance)
    }

    /// Creates an instance of a compact formula populated from packed bytes.
    pub fn unpack_bytes(formula: &str, data: &[u8]) -> Result<Structure, Error> {
        Self::from_compact(formula)?.create_instance(Some(data))
    }

    /// Creates an instance of a JSON descriptor populated from positional values.
    pub fn unpack_json_values<I>(json: &str, values: I) -> Result<Structure, Error>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut instance = Self::from_json(json)?.create_instance(None)?;
        instance.unpack_values(values)?;
        Ok(instance)
    }

    /// Creates an instance of a JSON descriptor populated from packed bytes.
    pub fn unpack_json_bytes(json: &str, data: &[u8]) -> Result<Structure, Error> {
        Self::from_json(json)?.create_instance(Some(data))
    }

    /// Returns the schema of the named field.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.position(name).map(|index| &self.fields[index])
    }

    /// All field schemas in packing order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Canonical descriptor text this generator is interned under.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sum of the element widths of all fields (the offset one past the last field).
    pub fn fixed_len(&self) -> usize {
        self.fixed_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arity, Kind};

    #[test]
    fn test_offsets() {
        let generator =
            Generator::from_named([("A", "I"), ("B", "b"), ("C", "c"), ("D", "b[10]"), ("E", "q")])
                .unwrap();
        let offsets: Vec<_> = generator.fields().iter().map(FieldSchema::offset).collect();
        // Arrays count their element width once
        assert_eq!(offsets, [0, 4, 5, 6, 7]);
        assert_eq!(generator.fixed_len(), 15);
        assert_eq!(generator.len(), 5);
    }

    #[test]
    fn test_field_lookup() {
        let generator = Generator::from_named([("Gen.Lookup", "d[]")]).unwrap();
        let field = generator.field("Gen.Lookup").unwrap();
        assert_eq!(field.packed().kind(), Kind::F64);
        assert_eq!(field.packed().arity(), Arity::Variable);
        assert!(generator.field("missing").is_none());
    }

    #[test]
    fn test_compact_names() {
        let generator = Generator::from_compact("hHbcqQfd?iIlL").unwrap();
        assert_eq!(generator.len(), 13);
        for (index, field) in generator.fields().iter().enumerate() {
            assert_eq!(field.name(), format!("Field{index}"));
        }
        assert_eq!(generator.field("Field12").unwrap().packed().kind(), Kind::U32);
    }

    #[test]
    fn test_compact_rejects_arrays() {
        assert!(matches!(
            Generator::from_compact("b[10]"),
            Err(Error::InvalidFormat(code)) if code == "["
        ));
        assert!(matches!(
            Generator::from_compact("Iz"),
            Err(Error::InvalidFormat(code)) if code == "z"
        ));
    }

    #[test]
    fn test_empty() {
        let generator = Generator::from_compact("").unwrap();
        assert!(generator.is_empty());
        assert_eq!(generator.signature(), "{}");
        let instance = generator.create_instance(None).unwrap();
        assert!(instance.pack().unwrap().is_empty());
    }

    #[test]
    fn test_create_instance_with_bytes() {
        let generator = Generator::from_named([("Gen.X", "H"), ("Gen.Y", "?")]).unwrap();
        let instance = generator.create_instance(Some(&[0x34, 0x12, 1])).unwrap();
        assert_eq!(u16::try_from(instance.value("Gen.X").unwrap()).unwrap(), 0x1234);
        assert!(bool::try_from(instance.value("Gen.Y").unwrap()).unwrap());

        assert!(matches!(
            generator.create_instance(Some(&[0x34])),
            Err(Error::Exhausted(field)) if field == "Gen.X"
        ));
    }

    #[test]
    fn test_unpack_helpers() {
        let instance =
            Generator::unpack_values("Ib", vec![Value::from(9u32), Value::from(3u8)]).unwrap();
        assert_eq!(&instance.pack().unwrap()[..], &[9, 0, 0, 0, 3]);

        let copy = Generator::unpack_bytes("Ib", &[9, 0, 0, 0, 3]).unwrap();
        assert_eq!(copy, instance);

        let json = r#"{"Helper.B": "b", "Helper.A": "I"}"#;
        let from_values =
            Generator::unpack_json_values(json, vec![Value::from(9u32), Value::from(3u8)])
                .unwrap();
        let from_bytes = Generator::unpack_json_bytes(json, &[9, 0, 0, 0, 3]).unwrap();
        assert_eq!(from_values, from_bytes);
        assert_eq!(from_values, instance);
    }

    #[test]
    fn test_packing_order_follows_names() {
        let generator = Generator::from_json(r#"{"Hdr.magic":"I","Hdr.length":"H"}"#).unwrap();
        let names: Vec<_> = generator.fields().iter().map(FieldSchema::name).collect();
        assert_eq!(names, ["Hdr.length", "Hdr.magic"]);

        // Positional prefixes pick the wire order
        let generator =
            Generator::from_json(r#"{"Hdr.1_magic":"I","Hdr.2_length":"H"}"#).unwrap();
        let mut instance = generator.create_instance(None).unwrap();
        instance.set("Hdr.1_magic", 0xCAFEu32).unwrap();
        instance.set("Hdr.2_length", 7u16).unwrap();
        assert_eq!(&instance.pack().unwrap()[..], &[0xFE, 0xCA, 0, 0, 7, 0]);
    }

    #[test]
    fn test_rejects_oversized_arrays() {
        for code in ["b[1152921504606846976]", "b[10000000000]", "Q[65537]"] {
            assert!(matches!(
                Generator::from_named([("Huge.A", code)]),
                Err(Error::InvalidFormat(c)) if c == code
            ));
        }
        let generator = Generator::from_named([("Huge.B", "Q[65536]")]).unwrap();
        let instance = generator.create_instance(None).unwrap();
        assert_eq!(instance.total_length(), 8 * 65536);
    }
}
