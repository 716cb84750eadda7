//! Describe, pack, and unpack fixed-layout binary records at runtime.
//!
//! # Overview
//!
//! A record layout is described with one type code per field, in the spirit of a
//! binary-struct format string. The layout is parsed once into a [Generator] that creates
//! [Structure]s: instances whose fields can be read and written by name, packed to a dense
//! byte buffer, and populated from bytes or from a positional list of values.
//!
//! # Type Codes
//!
//! A type code is a letter optionally followed by an array suffix:
//!
//! | letter | type | width |
//! |---|---|---|
//! | `i`, `l` | `i32` | 4 |
//! | `I`, `L` | `u32` | 4 |
//! | `h` / `H` | `i16` / `u16` | 2 |
//! | `b` | `u8` | 1 |
//! | `c` | `char` (one byte) | 1 |
//! | `?` | `bool` | 1 |
//! | `q` / `Q` | `i64` / `u64` | 8 |
//! | `f` / `d` | `f32` / `f64` | 4 / 8 |
//! | `s` | text (UTF-8) | variable |
//!
//! `b[10]` is a fixed array of ten bytes, `b[]` a variable array of bytes.
//!
//! Layouts are given either as a compact formula (`"Ibc"`, one letter per field, named
//! `Field0`, `Field1`, ...) or as a mapping of field names to type codes (directly or as a
//! JSON object). Field order is not taken from the mapping: fields are packed in natural
//! name order, so equivalent mappings always share one interned [Generator].
//!
//! # Format
//!
//! Fields are concatenated in order with no length prefixes and no padding. Numbers are
//! little-endian. The packed form is not self-describing: variable arrays and text are
//! written on [Structure::pack] but skipped by [Structure::unpack_bytes].
//!
//! # Example
//!
//! ```
//! use commonware_layout::Generator;
//!
//! let generator = Generator::from_json(
//!     r#"{"A": "I", "B": "b", "C": "c", "D": "b[10]", "E": "b[]"}"#,
//! )
//! .unwrap();
//!
//! // Initial values apply to instances created afterwards
//! generator.field("D").unwrap().set_initial(vec![0u8, 1, 2, 3]).unwrap();
//!
//! let mut record = generator.create_instance(None).unwrap();
//! record.set("A", 1u32).unwrap();
//! record.set("B", 2u8).unwrap();
//! record.set("C", 'C').unwrap();
//! record.set("E", vec![4u8, 5, 6, 7]).unwrap();
//!
//! let packed = record.pack().unwrap();
//! assert_eq!(&packed[..6], &[0x01, 0x00, 0x00, 0x00, 0x02, 0x43]);
//! assert_eq!(packed.len(), 4 + 1 + 1 + 10 + 4);
//!
//! // Variable arrays are not recovered from bytes
//! let mut copy = generator.create_instance(Some(&packed[..])).unwrap();
//! assert_ne!(copy, record);
//! copy.set("E", vec![4u8, 5, 6, 7]).unwrap();
//! assert_eq!(copy, record);
//! ```

pub mod buffer;
pub mod cache;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod generator;
pub mod kind;
pub mod packed;
pub mod structure;
pub mod util;
pub mod value;

// Re-export main types
pub use buffer::Accumulator;
pub use cache::Cache;
pub use descriptor::Descriptor;
pub use error::Error;
pub use field::FieldSchema;
pub use generator::Generator;
pub use kind::Kind;
pub use packed::{Arity, PackedType, MAX_ARRAY_LEN};
pub use structure::{Field, FieldMut, Structure};
pub use value::{Element, Value};
