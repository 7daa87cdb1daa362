//! Bounds-checked big-endian reader over a byte slice.

use super::MalformedArtifactError;

/// A forward-only reader that reports truncation with absolute offsets.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            base: 0,
        }
    }

    /// Absolute offset of the next byte.
    pub(crate) fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Offset relative to the start of this cursor.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], MalformedArtifactError> {
        if self.remaining() < len {
            return Err(MalformedArtifactError::Truncated {
                offset: self.offset(),
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<(), MalformedArtifactError> {
        self.take(len).map(|_| ())
    }

    /// Splits off the next `len` bytes as an independent cursor.
    pub(crate) fn sub(&mut self, len: usize) -> Result<Cursor<'a>, MalformedArtifactError> {
        let base = self.offset();
        let bytes = self.take(len)?;
        Ok(Cursor {
            bytes,
            pos: 0,
            base,
        })
    }

    pub(crate) fn u1(&mut self) -> Result<u8, MalformedArtifactError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u2(&mut self) -> Result<u16, MalformedArtifactError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn u4(&mut self) -> Result<u32, MalformedArtifactError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn i4(&mut self) -> Result<i32, MalformedArtifactError> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn u8(&mut self) -> Result<u64, MalformedArtifactError> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_be_bytes(buf))
    }

    /// Signed eight-byte value.
    pub(crate) fn i8(&mut self) -> Result<i64, MalformedArtifactError> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(i64::from_be_bytes(buf))
    }
}
