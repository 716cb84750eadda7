//! Ordered collection of byte chunks, flattened on demand.

use bytes::{BufMut, Bytes, BytesMut};

/// Collects encoded chunks in order so a record can be assembled with a single allocation.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    chunks: Vec<Bytes>,
    len: usize,
}

impl Accumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk.
    pub fn append(&mut self, chunk: impl Into<Bytes>) {
        let chunk = chunk.into();
        self.len += chunk.len();
        self.chunks.push(chunk);
    }

    /// Appends every chunk of `other`, preserving their order.
    pub fn append_all(&mut self, other: Accumulator) {
        self.len += other.len;
        self.chunks.extend(other.chunks);
    }

    /// Total number of bytes appended so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The chunks in append order.
    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// Concatenates all chunks in append order.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len);
        for chunk in &self.chunks {
            buf.put_slice(chunk);
        }
        buf.freeze()
    }
}
