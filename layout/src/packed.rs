//! Per-field encoding rules.
//!
//! A [PackedType] is parsed from a type code of the form `<letter>[ '[' digits? ']' ]`:
//!
//! - `I` is a scalar `u32`
//! - `b[10]` is a fixed array of ten bytes
//! - `b[]` (or `b[0]`) is a variable array of bytes
//!
//! # Arrays
//!
//! Declared lengths are capped at [MAX_ARRAY_LEN]. Every assignment to a fixed array is
//! truncated or padded (with the kind's default) to the declared length. Variable arrays
//! store exactly what they are given.
//!
//! # Decoding
//!
//! The packed form carries no lengths, so variable arrays and text can't be recovered from
//! a flat buffer. [PackedType::decode] reads nothing for them and returns `None`; callers
//! must populate such fields explicitly.

use crate::{util::at_least, Accumulator, Element, Error, Kind, Value};
use bytes::{Buf, Bytes, BytesMut};
use regex::Regex;
use std::{fmt, sync::LazyLock};

/// Largest declared length accepted for a fixed array.
pub const MAX_ARRAY_LEN: usize = 1 << 16;

static TYPE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<type>[iIlLhHbc?qQfds])(?<array>\[(?<size>[0-9]*)\])?$").unwrap()
});

/// Number of elements a field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// A single element.
    Scalar,
    /// Exactly this many elements.
    Fixed(usize),
    /// As many elements as were assigned.
    Variable,
}

/// Encoding rules for one (kind, arity) combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedType {
    kind: Kind,
    arity: Arity,
}

impl PackedType {
    pub const fn new(kind: Kind, arity: Arity) -> Self {
        Self { kind, arity }
    }

    /// Parses a type code.
    pub fn parse(code: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidFormat(code.to_string());
        let captures = TYPE_CODE.captures(code).ok_or_else(invalid)?;
        let kind = captures["type"]
            .chars()
            .next()
            .and_then(Kind::from_letter)
            .ok_or_else(invalid)?;
        let arity = match captures.name("size").map(|size| size.as_str()) {
            None => Arity::Scalar,
            Some("") => Arity::Variable,
            Some(size) => match size.parse::<usize>().map_err(|_| invalid())? {
                0 => Arity::Variable,
                len if len > MAX_ARRAY_LEN => return Err(invalid()),
                len => {
                    len.checked_mul(kind.width()).ok_or_else(invalid)?;
                    Arity::Fixed(len)
                }
            },
        };
        Ok(Self { kind, arity })
    }

    pub const fn kind(&self) -> Kind {
        self.kind
    }

    pub const fn arity(&self) -> Arity {
        self.arity
    }

    pub const fn is_array(&self) -> bool {
        !matches!(self.arity, Arity::Scalar)
    }

    /// Declared array length (0 for variable arrays and scalars).
    pub const fn array_len(&self) -> usize {
        match self.arity {
            Arity::Fixed(len) => len,
            Arity::Scalar | Arity::Variable => 0,
        }
    }

    /// Width of one element of the base kind.
    pub const fn element_width(&self) -> usize {
        self.kind.width()
    }

    /// Returns true if [PackedType::decode] can't recover this field from a flat buffer.
    pub const fn is_variable(&self) -> bool {
        matches!(self.arity, Arity::Variable) || !self.kind.is_fixed_width()
    }

    /// The value a slot of this type holds when no initial value was set.
    pub fn default_value(&self) -> Value {
        match self.arity {
            Arity::Scalar => Value::Scalar(self.kind.default_element()),
            Arity::Fixed(len) => Value::Array(vec![self.kind.default_element(); len]),
            Arity::Variable => Value::Array(Vec::new()),
        }
    }

    /// Type-checks `value` and converts it to the shape stored for this type.
    ///
    /// A scalar assigned to an array type is treated as a one-element array.
    pub fn coerce(&self, value: Value) -> Result<Value, Error> {
        match (self.arity, value) {
            (Arity::Scalar, Value::Scalar(element)) => Ok(Value::Scalar(self.check(element)?)),
            (Arity::Scalar, other) => Err(Error::ShapeMismatch(self.to_string(), other.describe())),
            (_, Value::Scalar(element)) => self.coerce(Value::Array(vec![element])),
            (Arity::Fixed(len), Value::Array(elements)) => {
                let mut stored = self.check_all(elements)?;
                stored.truncate(len);
                stored.resize_with(len, || self.kind.default_element());
                Ok(Value::Array(stored))
            }
            (Arity::Variable, Value::Array(elements)) => {
                Ok(Value::Array(self.check_all(elements)?))
            }
        }
    }

    /// Encodes a stored value, one chunk per element.
    pub fn encode(&self, value: &Value) -> Result<Accumulator, Error> {
        let elements = match (self.arity, value) {
            (Arity::Scalar, Value::Scalar(element)) => std::slice::from_ref(element),
            (Arity::Fixed(len), Value::Array(elements)) if elements.len() == len => elements,
            (Arity::Variable, Value::Array(elements)) => elements,
            (_, other) => {
                return Err(Error::ShapeMismatch(self.to_string(), other.describe()));
            }
        };

        let mut accumulator = Accumulator::new();
        for element in elements {
            if element.kind() != self.kind {
                return Err(Error::ShapeMismatch(
                    self.kind.to_string(),
                    element.kind().to_string(),
                ));
            }
            let mut chunk = BytesMut::with_capacity(element.encoded_len());
            element.write(&mut chunk)?;
            accumulator.append(Bytes::from(chunk));
        }
        Ok(accumulator)
    }

    /// Decodes a value from the buffer.
    ///
    /// Returns `None`, consuming nothing, for variable arrays and text.
    pub fn decode(&self, buf: &mut impl Buf) -> Result<Option<Value>, Error> {
        if self.is_variable() {
            return Ok(None);
        }
        match self.arity {
            Arity::Scalar => Ok(Some(Value::Scalar(self.kind.read(buf)?))),
            Arity::Fixed(len) => {
                at_least(&*buf, len.saturating_mul(self.kind.width()))?;
                let elements = (0..len)
                    .map(|_| self.kind.read(buf))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(Value::Array(elements)))
            }
            Arity::Variable => Ok(None),
        }
    }

    /// Current encoded length of a stored value.
    pub fn encoded_len(&self, value: &Value) -> usize {
        match value {
            Value::Scalar(element) => element.encoded_len(),
            Value::Array(elements) => elements.iter().map(Element::encoded_len).sum(),
        }
    }

    fn check(&self, element: Element) -> Result<Element, Error> {
        if element.kind() != self.kind {
            return Err(Error::ShapeMismatch(
                self.kind.to_string(),
                element.kind().to_string(),
            ));
        }
        if let Element::Char(c) = element {
            if u8::try_from(c).is_err() {
                return Err(Error::ShapeMismatch(
                    "single-byte char".to_string(),
                    format!("{c:?}"),
                ));
            }
        }
        Ok(element)
    }

    fn check_all(&self, elements: Vec<Element>) -> Result<Vec<Element>, Error> {
        elements
            .into_iter()
            .map(|element| self.check(element))
            .collect()
    }
}

impl fmt::Display for PackedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Arity::Scalar => write!(f, "{}", self.kind.letter()),
            Arity::Fixed(len) => write!(f, "{}[{}]", self.kind.letter(), len),
            Arity::Variable => write!(f, "{}[]", self.kind.letter()),
        }
    }
}
