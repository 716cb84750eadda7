//! Host representation of field contents.
//!
//! A slot of a [crate::Structure] holds a [Value]: either one [Element] or an array of
//! them. Conversions from and to Rust primitives (and `Vec`s, slices and arrays of them)
//! are provided so callers rarely need to build elements by hand.

use crate::{Error, Kind};
use bytes::Bytes;

/// One element of a field.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Bool(bool),
    Char(char),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(String),
}

impl Element {
    /// Returns the kind of this element.
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Char(_) => Kind::Char,
            Self::U8(_) => Kind::U8,
            Self::I16(_) => Kind::I16,
            Self::U16(_) => Kind::U16,
            Self::I32(_) => Kind::I32,
            Self::U32(_) => Kind::U32,
            Self::I64(_) => Kind::I64,
            Self::U64(_) => Kind::U64,
            Self::F32(_) => Kind::F32,
            Self::F64(_) => Kind::F64,
            Self::Text(_) => Kind::Text,
        }
    }
}

/// Contents of one field slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Element),
    Array(Vec<Element>),
}

impl Value {
    /// Returns the element if this is a scalar.
    pub fn as_scalar(&self) -> Option<&Element> {
        match self {
            Self::Scalar(element) => Some(element),
            Self::Array(_) => None,
        }
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&[Element]> {
        match self {
            Self::Scalar(_) => None,
            Self::Array(elements) => Some(elements),
        }
    }

    /// Returns the number of elements (1 for a scalar).
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Array(elements) => elements.len(),
        }
    }

    /// Returns true if this is an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short description of the runtime shape, used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Scalar(element) => element.kind().to_string(),
            Self::Array(elements) => match elements.first() {
                Some(first) => format!("{}[{}]", first.kind(), elements.len()),
                None => "[]".to_string(),
            },
        }
    }
}

fn mismatch(expected: String, found: &Value) -> Error {
    Error::ShapeMismatch(expected, found.describe())
}

macro_rules! impl_conversions {
    ($type:ty, $variant:ident) => {
        impl From<$type> for Element {
            #[inline]
            fn from(value: $type) -> Self {
                Self::$variant(value)
            }
        }

        impl From<$type> for Value {
            #[inline]
            fn from(value: $type) -> Self {
                Self::Scalar(Element::$variant(value))
            }
        }

        impl From<Vec<$type>> for Value {
            #[inline]
            fn from(values: Vec<$type>) -> Self {
                Self::Array(values.into_iter().map(Element::$variant).collect())
            }
        }

        impl From<&[$type]> for Value {
            #[inline]
            fn from(values: &[$type]) -> Self {
                Self::Array(values.iter().cloned().map(Element::$variant).collect())
            }
        }

        impl<const N: usize> From<[$type; N]> for Value {
            #[inline]
            fn from(values: [$type; N]) -> Self {
                Self::Array(values.into_iter().map(Element::$variant).collect())
            }
        }

        impl TryFrom<Element> for $type {
            type Error = Error;

            fn try_from(element: Element) -> Result<Self, Error> {
                match element {
                    Element::$variant(value) => Ok(value),
                    other => Err(Error::ShapeMismatch(
                        Kind::$variant.to_string(),
                        other.kind().to_string(),
                    )),
                }
            }
        }

        impl TryFrom<Value> for $type {
            type Error = Error;

            fn try_from(value: Value) -> Result<Self, Error> {
                match value {
                    Value::Scalar(element) => element.try_into(),
                    other => Err(mismatch(Kind::$variant.to_string(), &other)),
                }
            }
        }

        impl TryFrom<&Value> for $type {
            type Error = Error;

            fn try_from(value: &Value) -> Result<Self, Error> {
                match value {
                    Value::Scalar(element) => element.clone().try_into(),
                    other => Err(mismatch(Kind::$variant.to_string(), other)),
                }
            }
        }

        impl TryFrom<Value> for Vec<$type> {
            type Error = Error;

            fn try_from(value: Value) -> Result<Self, Error> {
                match value {
                    Value::Array(elements) => elements.into_iter().map(<$type>::try_from).collect(),
                    other => Err(mismatch(format!("{}[]", Kind::$variant), &other)),
                }
            }
        }

        impl TryFrom<&Value> for Vec<$type> {
            type Error = Error;

            fn try_from(value: &Value) -> Result<Self, Error> {
                match value {
                    Value::Array(elements) => elements
                        .iter()
                        .cloned()
                        .map(<$type>::try_from)
                        .collect(),
                    other => Err(mismatch(format!("{}[]", Kind::$variant), other)),
                }
            }
        }
    };
}

impl_conversions!(bool, Bool);
impl_conversions!(char, Char);
impl_conversions!(u8, U8);
impl_conversions!(i16, I16);
impl_conversions!(u16, U16);
impl_conversions!(i32, I32);
impl_conversions!(u32, U32);
impl_conversions!(i64, I64);
impl_conversions!(u64, U64);
impl_conversions!(f32, F32);
impl_conversions!(f64, F64);
impl_conversions!(String, Text);

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(Element::Text(value.to_string()))
    }
}

impl From<Element> for Value {
    fn from(element: Element) -> Self {
        Self::Scalar(element)
    }
}

impl From<Vec<Element>> for Value {
    fn from(elements: Vec<Element>) -> Self {
        Self::Array(elements)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Self::from(&bytes[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        let value = Value::from(7u32);
        assert_eq!(value, Value::Scalar(Element::U32(7)));
        assert_eq!(u32::try_from(&value).unwrap(), 7);
        assert_eq!(u32::try_from(value).unwrap(), 7);

        let value = Value::from("name");
        assert_eq!(String::try_from(&value).unwrap(), "name");
    }

    #[test]
    fn test_array_conversions() {
        let value = Value::from(vec![1u8, 2, 3]);
        assert_eq!(value.len(), 3);
        assert_eq!(Vec::<u8>::try_from(&value).unwrap(), vec![1, 2, 3]);

        assert_eq!(Value::from([1u8, 2, 3]), value);
        assert_eq!(Value::from(&[1u8, 2, 3][..]), value);
        assert_eq!(Value::from(Bytes::from_static(&[1, 2, 3])), value);
    }

    #[test]
    fn test_conversion_mismatch() {
        let value = Value::from(7u32);
        assert!(matches!(
            u8::try_from(&value),
            Err(Error::ShapeMismatch(expected, found)) if expected == "u8" && found == "u32"
        ));
        assert!(matches!(
            Vec::<u32>::try_from(&value),
            Err(Error::ShapeMismatch(_, _))
        ));

        let value = Value::from(vec![1u16, 2]);
        assert!(matches!(
            u16::try_from(value),
            Err(Error::ShapeMismatch(_, found)) if found == "u16[2]"
        ));
    }

    #[test]
    fn test_accessors() {
        let scalar = Value::from(true);
        assert_eq!(scalar.as_scalar(), Some(&Element::Bool(true)));
        assert!(scalar.as_array().is_none());
        assert!(!scalar.is_empty());

        let empty = Value::Array(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.describe(), "[]");
    }
}
