use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::{Error, ErrorKind, Phase, Result};

/// Size of the header in front of a Bedrock `level.dat` root compound.
pub const HEADER_LEN: usize = 8;

/// The fixed header of a Bedrock `level.dat`: two little-endian integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    /// File format version written by the game.
    pub storage_version: i32,
    /// Declared number of NBT bytes following the header.
    pub payload_len: i32,
}

impl Header {
    /// Parse the header from the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header = bytes.get(..HEADER_LEN).ok_or_else(|| {
            Error::new(ErrorKind::InsufficientHeader { len: bytes.len() }, 0).during(Phase::Header)
        })?;

        Ok(Self {
            storage_version: LittleEndian::read_i32(&header[0..4]),
            payload_len: LittleEndian::read_i32(&header[4..8]),
        })
    }

    /// Check the declared payload length against the bytes actually present
    /// after the header.
    pub fn validate(&self, actual: usize) -> Result<()> {
        if usize::try_from(self.payload_len).ok() == Some(actual) {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::HeaderLengthMismatch {
                    declared: self.payload_len,
                    actual,
                },
                0,
            )
            .during(Phase::Header))
        }
    }
}
