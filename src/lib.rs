//! bedrocknbt decodes NBT data from *Minecraft: Bedrock Edition*. Bedrock
//! stores NBT little-endian, and its `level.dat` prefixes the root compound
//! with an 8-byte header. This crate turns such a buffer into an owned
//! [`Value`] tree.
//!
//! * For the entry points, see [`from_bytes`] and [`from_reader`].
//! * For resource limits and header validation see [`DecodeOptions`].
//! * For the decoded tree see [`Value`] and [`Compound`].
//! * For lower level access see [`de::Decoder`] and [`input::Cursor`].
//!
//! The decoder does no decompression and no file handling. Callers hand it
//! bytes that are already decompressed.
//!
//! # Quick example
//!
//! Print the name of a world from its `level.dat`.
//!
//! ```no_run
//! use bedrocknbt::error::Result;
//!
//! fn main() -> Result<()> {
//!     let file = std::fs::File::open("level.dat")?;
//!     let doc = bedrocknbt::from_reader(file)?;
//!
//!     println!("storage version {}", doc.header().storage_version);
//!     if let Some(name) = doc.level().and_then(|l| l.get("LevelName")) {
//!         println!("{}", name.as_str().unwrap_or("<not a string>"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Hardening
//!
//! Length prefixes are checked against the remaining input before anything
//! is allocated, nesting depth is capped (see [`DecodeOptions::max_depth`]),
//! and a decode either yields a whole tree or an [`error::Error`] carrying
//! the path of the tag that failed.

use serde::Serialize;

pub mod de;
pub mod error;
pub mod input;

mod document;
mod header;
mod options;
mod value;

pub use de::{from_bytes, from_bytes_with_opts, from_reader, from_reader_with_opts};
pub use document::Document;
pub use header::{Header, HEADER_LEN};
pub use options::{DecodeOptions, HeaderMode};
pub use value::*;

#[cfg(test)]
mod test;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Length-prefixed raw bytes.
    ByteArray = 7,
    /// Represents a UTF-8 string.
    String = 8,
    /// Represents a list of unnamed values that all share one tag.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

impl Tag {
    /// The fewest bytes a payload of this tag can occupy on the wire. Used to
    /// reject list counts that could never fit in the remaining input.
    pub fn min_payload_size(self) -> usize {
        match self {
            Tag::End => 0,
            Tag::Byte => 1,
            Tag::Short => 2,
            Tag::Int => 4,
            Tag::Long => 8,
            Tag::Float => 4,
            Tag::Double => 8,
            Tag::ByteArray => 4,
            Tag::String => 2,
            Tag::List => 5,
            Tag::Compound => 1,
            Tag::IntArray => 4,
            Tag::LongArray => 4,
        }
    }
}

// Written out by hand rather than derived, the tags will very rarely change.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}
