//! The closed set of element types a field can hold.
//!
//! Every type letter of a type code maps to exactly one [Kind]. Fixed-width kinds are
//! written little-endian at their native width. `Text` has no fixed width: it is written
//! as raw UTF-8 and can't be read back from a flat buffer.

use crate::{util::at_least, Element, Error};
use bytes::{Buf, BufMut};
use std::fmt;

/// Element type of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Char,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Text,
}

impl Kind {
    /// Returns the kind named by a type letter, if any.
    ///
    /// `i`/`l` and `I`/`L` are aliases for the signed and unsigned 32-bit kinds.
    pub const fn from_letter(letter: char) -> Option<Self> {
        Some(match letter {
            'i' | 'l' => Self::I32,
            'I' | 'L' => Self::U32,
            'h' => Self::I16,
            'H' => Self::U16,
            'b' => Self::U8,
            'c' => Self::Char,
            '?' => Self::Bool,
            'q' => Self::I64,
            'Q' => Self::U64,
            'f' => Self::F32,
            'd' => Self::F64,
            's' => Self::Text,
            _ => return None,
        })
    }

    /// Returns the canonical type letter of this kind.
    pub const fn letter(&self) -> char {
        match self {
            Self::Bool => '?',
            Self::Char => 'c',
            Self::U8 => 'b',
            Self::I16 => 'h',
            Self::U16 => 'H',
            Self::I32 => 'i',
            Self::U32 => 'I',
            Self::I64 => 'q',
            Self::U64 => 'Q',
            Self::F32 => 'f',
            Self::F64 => 'd',
            Self::Text => 's',
        }
    }

    /// Width in bytes of one encoded element (0 for `Text`).
    pub const fn width(&self) -> usize {
        match self {
            Self::Bool | Self::Char | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::Text => 0,
        }
    }

    /// Returns true if elements of this kind have a fixed encoded width.
    pub const fn is_fixed_width(&self) -> bool {
        !matches!(self, Self::Text)
    }

    /// The value a slot of this kind holds when nothing was assigned.
    pub fn default_element(&self) -> Element {
        match self {
            Self::Bool => Element::Bool(false),
            Self::Char => Element::Char('\0'),
            Self::U8 => Element::U8(0),
            Self::I16 => Element::I16(0),
            Self::U16 => Element::U16(0),
            Self::I32 => Element::I32(0),
            Self::U32 => Element::U32(0),
            Self::I64 => Element::I64(0),
            Self::U64 => Element::U64(0),
            Self::F32 => Element::F32(0.0),
            Self::F64 => Element::F64(0.0),
            Self::Text => Element::Text(String::new()),
        }
    }

    /// Reads one element of this kind from the buffer.
    ///
    /// `Text` has no width on the wire and always fails.
    pub fn read(&self, buf: &mut impl Buf) -> Result<Element, Error> {
        at_least(&*buf, self.width())?;
        Ok(match self {
            Self::Bool => match buf.get_u8() {
                0 => Element::Bool(false),
                1 => Element::Bool(true),
                other => return Err(Error::InvalidBool(other)),
            },
            Self::Char => Element::Char(char::from(buf.get_u8())),
            Self::U8 => Element::U8(buf.get_u8()),
            Self::I16 => Element::I16(buf.get_i16_le()),
            Self::U16 => Element::U16(buf.get_u16_le()),
            Self::I32 => Element::I32(buf.get_i32_le()),
            Self::U32 => Element::U32(buf.get_u32_le()),
            Self::I64 => Element::I64(buf.get_i64_le()),
            Self::U64 => Element::U64(buf.get_u64_le()),
            Self::F32 => Element::F32(buf.get_f32_le()),
            Self::F64 => Element::F64(buf.get_f64_le()),
            Self::Text => {
                return Err(Error::ShapeMismatch(
                    "fixed-width kind".to_string(),
                    self.to_string(),
                ))
            }
        })
    }
}

impl Element {
    /// Writes this element to the buffer.
    ///
    /// Fails only for characters outside `'\0'..='\u{ff}'`, which don't fit in one byte.
    pub fn write(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        match self {
            Self::Bool(v) => buf.put_u8(u8::from(*v)),
            Self::Char(v) => buf.put_u8(
                u8::try_from(*v)
                    .map_err(|_| Error::ShapeMismatch(Kind::Char.to_string(), format!("{v:?}")))?,
            ),
            Self::U8(v) => buf.put_u8(*v),
            Self::I16(v) => buf.put_i16_le(*v),
            Self::U16(v) => buf.put_u16_le(*v),
            Self::I32(v) => buf.put_i32_le(*v),
            Self::U32(v) => buf.put_u32_le(*v),
            Self::I64(v) => buf.put_i64_le(*v),
            Self::U64(v) => buf.put_u64_le(*v),
            Self::F32(v) => buf.put_f32_le(*v),
            Self::F64(v) => buf.put_f64_le(*v),
            Self::Text(v) => buf.put_slice(v.as_bytes()),
        }
        Ok(())
    }

    /// Number of bytes [Element::write] produces.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            other => other.kind().width(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use paste::paste;

    const LETTERS: &str = "iIlLhHbc?qQfds";

    #[test]
    fn test_letters() {
        for letter in LETTERS.chars() {
            let kind = Kind::from_letter(letter).unwrap();
            // Aliases resolve to the canonical letter of their kind
            assert_eq!(Kind::from_letter(kind.letter()), Some(kind));
        }
        assert_eq!(Kind::from_letter('l'), Some(Kind::I32));
        assert_eq!(Kind::from_letter('L'), Some(Kind::U32));
        assert_eq!(Kind::from_letter('x'), None);
        assert_eq!(Kind::from_letter('['), None);
    }

    macro_rules! impl_kind_test {
        ($kind:ident, $variant:ident, $type:ty) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let width = std::mem::size_of::<$type>();
                    assert_eq!(Kind::$kind.width(), width);
                    for value in [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN] {
                        let mut buf = BytesMut::new();
                        Element::$variant(value).write(&mut buf).unwrap();
                        assert_eq!(buf.len(), width);
                        assert_eq!(&buf[..], &value.to_le_bytes()[..]);
                        let decoded = Kind::$kind.read(&mut buf.freeze()).unwrap();
                        assert_eq!(decoded, Element::$variant(value));
                    }
                }
            }
        };
    }

    impl_kind_test!(U8, U8, u8);
    impl_kind_test!(I16, I16, i16);
    impl_kind_test!(U16, U16, u16);
    impl_kind_test!(I32, I32, i32);
    impl_kind_test!(U32, U32, u32);
    impl_kind_test!(I64, I64, i64);
    impl_kind_test!(U64, U64, u64);
    impl_kind_test!(F32, F32, f32);
    impl_kind_test!(F64, F64, f64);

    #[test]
    fn test_bool() {
        let mut buf = BytesMut::new();
        Element::Bool(true).write(&mut buf).unwrap();
        Element::Bool(false).write(&mut buf).unwrap();
        assert_eq!(&buf[..], &[1, 0]);

        let mut reader = buf.freeze();
        assert_eq!(Kind::Bool.read(&mut reader).unwrap(), Element::Bool(true));
        assert_eq!(Kind::Bool.read(&mut reader).unwrap(), Element::Bool(false));

        let mut invalid: &[u8] = &[2];
        assert!(matches!(
            Kind::Bool.read(&mut invalid),
            Err(Error::InvalidBool(2))
        ));
    }

    #[test]
    fn test_char() {
        let mut buf = BytesMut::new();
        Element::Char('C').write(&mut buf).unwrap();
        Element::Char('\u{e9}').write(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x43, 0xe9]);

        let mut reader = buf.freeze();
        assert_eq!(Kind::Char.read(&mut reader).unwrap(), Element::Char('C'));
        assert_eq!(Kind::Char.read(&mut reader).unwrap(), Element::Char('\u{e9}'));

        // Characters wider than one byte can't be written
        let mut buf = BytesMut::new();
        assert!(matches!(
            Element::Char('\u{263a}').write(&mut buf),
            Err(Error::ShapeMismatch(_, _))
        ));
    }

    #[test]
    fn test_text() {
        let mut buf = BytesMut::new();
        let text = Element::Text("héllo".to_string());
        text.write(&mut buf).unwrap();
        assert_eq!(&buf[..], "héllo".as_bytes());
        assert_eq!(text.encoded_len(), 6);
        assert_eq!(Kind::Text.width(), 0);
        assert!(!Kind::Text.is_fixed_width());

        let mut reader = buf.freeze();
        assert!(matches!(
            Kind::Text.read(&mut reader),
            Err(Error::ShapeMismatch(_, _))
        ));
    }

    #[test]
    fn test_insufficient_buffer() {
        let mut reader: &[u8] = &[0x01, 0x02];
        assert!(matches!(Kind::U32.read(&mut reader), Err(Error::EndOfBuffer)));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Kind::U32.default_element(), Element::U32(0));
        assert_eq!(Kind::Bool.default_element(), Element::Bool(false));
        assert_eq!(Kind::Char.default_element(), Element::Char('\0'));
        assert_eq!(Kind::Text.default_element(), Element::Text(String::new()));
    }
}
