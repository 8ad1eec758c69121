//! A forward-only little-endian reader over an in-memory buffer.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Sequential reader over a byte slice. Every read advances the offset, there
/// is no way to rewind or peek.
///
/// Reads that run out of input fail with
/// [`ErrorKind::UnexpectedEnd`][crate::error::ErrorKind::UnexpectedEnd],
/// except [`Cursor::read_tag_byte`] which reports exhaustion as `None` so that
/// the compound scan can tell a truncated document from a broken one.
pub struct Cursor<'de> {
    data: &'de [u8],
    offset: usize,
}

impl<'de> Cursor<'de> {
    pub fn new(data: &'de [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn consume(&mut self, n: usize) -> Result<&'de [u8]> {
        if n > self.remaining() {
            return Err(Error::unexpected_end(n, self.remaining(), self.offset));
        }
        let data: &'de [u8] = self.data;
        let start = self.offset;
        self.offset += n;
        Ok(&data[start..start + n])
    }

    /// Read a tag-type byte. `None` means the input is exhausted.
    pub fn read_tag_byte(&mut self) -> Option<u8> {
        let b = *self.data.get(self.offset)?;
        self.offset += 1;
        Some(b)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.consume(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.consume(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.consume(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.consume(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.consume(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.consume(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.consume(8)?))
    }

    /// Read exactly `n` raw bytes into an owned buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.consume(n)?.to_vec())
    }

    /// Read a signed 32-bit length prefix for elements of `element_size`
    /// bytes each. Fails with `MalformedLength` if it is negative or the
    /// elements cannot fit in what is left of the input.
    pub fn read_length(&mut self, element_size: usize) -> Result<usize> {
        let start = self.offset;
        let len = self.read_i32()?;
        self.check_length(len, element_size, start)
    }

    pub(crate) fn check_length(&self, len: i32, element_size: usize, at: usize) -> Result<usize> {
        let remaining = self.remaining();
        let malformed = || Error::malformed_length(len as i64, remaining, at);

        let n = usize::try_from(len).map_err(|_| malformed())?;
        match n.checked_mul(element_size) {
            Some(total) if total <= remaining => Ok(n),
            _ => Err(malformed()),
        }
    }
}
