//! Decoding of little-endian NBT into [`Value`] trees.
//!
//! Most users want [`from_bytes`] or [`from_reader`], which expect a Bedrock
//! `level.dat` layout: an 8-byte [`Header`] followed by the entries of the
//! root compound. [`Decoder`] is exposed for NBT that is embedded in other
//! containers without that header.
//!
//! # Layout
//!
//! Every number is little-endian. A compound is a run of entries, each a
//! tag-type byte, a name, and a payload, terminated by an `End` byte. Lists
//! carry an element tag and a signed 32-bit count, and their elements have no
//! tag byte or name of their own. Strings have an *unsigned* 16-bit length,
//! while byte, int and long arrays have a signed 32-bit one.
//!
//! # Truncated documents
//!
//! Some writers leave off the `End` byte of the root compound. Running out of
//! input where the next root entry would start is therefore accepted. The
//! same situation inside a nested compound is an error.
//!
//! ```
//! # use bedrocknbt::{from_bytes, Value};
//! // header: version 10, 8 payload bytes. Then an Int named "a" and no End.
//! let input = [
//!     10, 0, 0, 0, 8, 0, 0, 0,
//!     3, 1, 0, b'a', 42, 0, 0, 0,
//! ];
//! let doc = from_bytes(&input).unwrap();
//! assert_eq!(doc.get("a"), Some(&Value::Int(42)));
//! ```

use std::io::Read;

use log::{debug, trace};

use crate::error::{Error, ErrorKind, PathSegment, Phase, Result};
use crate::input::Cursor;
use crate::{Compound, DecodeOptions, Document, Header, HeaderMode, Tag, Value, HEADER_LEN};

/// Decode a Bedrock `level.dat` from bytes, using default options.
pub fn from_bytes(input: &[u8]) -> Result<Document> {
    from_bytes_with_opts(input, DecodeOptions::default())
}

/// Decode a Bedrock `level.dat` from bytes.
pub fn from_bytes_with_opts(input: &[u8], opts: DecodeOptions) -> Result<Document> {
    if let Some(limit) = opts.max_input_len {
        if input.len() > limit {
            return Err(Error::new(
                ErrorKind::InputTooLarge {
                    len: input.len(),
                    limit,
                },
                0,
            )
            .during(Phase::Read));
        }
    }

    let header = Header::parse(input)?;
    let payload = &input[HEADER_LEN..];
    debug!(
        "level.dat header: storage version {}, declared length {}, actual length {}",
        header.storage_version,
        header.payload_len,
        payload.len()
    );

    if opts.header_mode == HeaderMode::Validate {
        header.validate(payload.len())?;
    }

    let mut decoder = Decoder::new(payload, opts);
    let root = decoder.decode_root_compound().map_err(Error::in_root)?;

    let trailing = decoder.cursor().remaining();
    if trailing > 0 {
        debug!("ignoring {} trailing bytes after root compound", trailing);
    }

    Ok(Document::new(header, root))
}

/// Decode a Bedrock `level.dat` from a reader, using default options. The
/// reader is drained into memory first and is not decompressed.
pub fn from_reader<R: Read>(reader: R) -> Result<Document> {
    from_reader_with_opts(reader, DecodeOptions::default())
}

/// Decode a Bedrock `level.dat` from a reader.
pub fn from_reader_with_opts<R: Read>(mut reader: R, opts: DecodeOptions) -> Result<Document> {
    let mut buf = Vec::new();
    match opts.max_input_len {
        // One byte past the limit is enough to know it was exceeded.
        Some(limit) => reader
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut buf)?,
        None => reader.read_to_end(&mut buf)?,
    };
    from_bytes_with_opts(&buf, opts)
}

/// Compound scans end on an `End` byte. Only the root additionally accepts
/// running out of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    EndTag,
    EndTagOrEof,
}

/// Recursive decoder over a buffer holding NBT without any header.
///
/// ```
/// # use bedrocknbt::{de::Decoder, DecodeOptions, Value};
/// // An Int named "a", then End.
/// let input = [3, 1, 0, b'a', 42, 0, 0, 0, 0];
/// let mut decoder = Decoder::new(&input, DecodeOptions::default());
/// let compound = decoder.decode_compound().unwrap();
/// assert_eq!(compound["a"], Value::Int(42));
/// ```
pub struct Decoder<'de> {
    input: Cursor<'de>,
    depth: usize,
    max_depth: usize,
}

impl<'de> Decoder<'de> {
    pub fn new(input: &'de [u8], opts: DecodeOptions) -> Self {
        Self {
            input: Cursor::new(input),
            depth: 0,
            max_depth: opts.max_depth,
        }
    }

    pub fn cursor(&self) -> &Cursor<'de> {
        &self.input
    }

    /// Decode the payload of a tag given its raw tag-type byte. Fails with
    /// `UnsupportedTagType` for bytes outside the known tags, and for `End`
    /// which has no payload.
    pub fn decode_tag(&mut self, tag_type: u8) -> Result<Value> {
        let tag = Tag::try_from(tag_type)
            .map_err(|_| Error::unsupported_tag(tag_type, self.input.offset()))?;
        self.decode_payload(tag)
    }

    /// Decode the entries of a compound up to and including its `End` byte.
    pub fn decode_compound(&mut self) -> Result<Compound> {
        self.nested(|de| de.compound_entries(Termination::EndTag))
    }

    /// Decode the entries of the outermost compound. Running out of input
    /// where an entry would start ends the compound instead of failing.
    pub fn decode_root_compound(&mut self) -> Result<Compound> {
        self.nested(|de| de.compound_entries(Termination::EndTagOrEof))
    }

    fn decode_payload(&mut self, tag: Tag) -> Result<Value> {
        Ok(match tag {
            Tag::Byte => Value::Byte(self.input.read_i8()?),
            Tag::Short => Value::Short(self.input.read_i16()?),
            Tag::Int => Value::Int(self.input.read_i32()?),
            Tag::Long => Value::Long(self.input.read_i64()?),
            Tag::Float => Value::Float(self.input.read_f32()?),
            Tag::Double => Value::Double(self.input.read_f64()?),
            Tag::ByteArray => {
                let len = self.input.read_length(1)?;
                Value::ByteArray(self.input.read_bytes(len)?)
            }
            Tag::String => Value::String(self.decode_string()?),
            Tag::List => Value::List(self.decode_list()?),
            Tag::Compound => Value::Compound(self.decode_compound()?),
            Tag::IntArray => {
                let len = self.input.read_length(std::mem::size_of::<i32>())?;
                let mut data = Vec::with_capacity(len);
                for _ in 0..len {
                    data.push(self.input.read_i32()?);
                }
                Value::IntArray(data)
            }
            Tag::LongArray => {
                let len = self.input.read_length(std::mem::size_of::<i64>())?;
                let mut data = Vec::with_capacity(len);
                for _ in 0..len {
                    data.push(self.input.read_i64()?);
                }
                Value::LongArray(data)
            }
            Tag::End => return Err(Error::unsupported_tag(0, self.input.offset())),
        })
    }

    fn decode_string(&mut self) -> Result<String> {
        let start = self.input.offset();
        let len = self.input.read_u16()? as usize;
        if len > self.input.remaining() {
            return Err(Error::malformed_length(
                len as i64,
                self.input.remaining(),
                start,
            ));
        }
        let bytes = self.input.read_bytes(len)?;
        String::from_utf8(bytes)
            .map_err(|e| Error::new(ErrorKind::NonUnicodeString(e.into_bytes()), start))
    }

    fn compound_entries(&mut self, termination: Termination) -> Result<Compound> {
        let mut compound = Compound::new();

        loop {
            let at = self.input.offset();
            let tag_type = match self.input.read_tag_byte() {
                Some(b) => b,
                None if termination == Termination::EndTagOrEof => {
                    debug!("root compound ended without End tag at offset {}", at);
                    break;
                }
                None => {
                    return Err(Error::unexpected_end(1, 0, at).during(Phase::TagType));
                }
            };

            if tag_type == u8::from(Tag::End) {
                break;
            }

            let tag = Tag::try_from(tag_type)
                .map_err(|_| Error::unsupported_tag(tag_type, at).during(Phase::TagType))?;
            let name = self.decode_string().map_err(|e| e.during(Phase::Name))?;

            let value = self
                .decode_payload(tag)
                .map_err(|e| e.within(PathSegment::Name(name.clone())))?;

            if compound.insert(name, value).is_some() {
                trace!("duplicate key in compound at offset {}, keeping last", at);
            }
        }

        trace!("decoded compound with {} entries", compound.len());
        Ok(compound)
    }

    fn decode_list(&mut self) -> Result<Vec<Value>> {
        let element_type = self
            .input
            .read_u8()
            .map_err(|e| e.during(Phase::ListHeader))?;
        let count_at = self.input.offset();
        let count = self
            .input
            .read_i32()
            .map_err(|e| e.during(Phase::ListHeader))?;

        // An empty list is valid whatever element tag it declares.
        if count == 0 {
            return Ok(Vec::new());
        }

        // End has no payload, so no count of it can be checked against the
        // input. Reject it before the count sizes anything.
        let element = match Tag::try_from(element_type) {
            Ok(Tag::End) | Err(_) => {
                return Err(Error::unsupported_tag(element_type, count_at - 1)
                    .during(Phase::ListHeader))
            }
            Ok(tag) => tag,
        };
        let count = self
            .input
            .check_length(count, element.min_payload_size(), count_at)
            .map_err(|e| e.during(Phase::ListHeader))?;

        trace!("decoding list of {} {:?}", count, element);
        self.nested(|de| de.list_elements(element, count))
    }

    fn list_elements(&mut self, element: Tag, count: usize) -> Result<Vec<Value>> {
        let mut list = Vec::with_capacity(count);
        for i in 0..count {
            let value = self
                .decode_payload(element)
                .map_err(|e| e.within(PathSegment::Index(i)))?;
            list.push(value);
        }
        Ok(list)
    }

    /// Run `f` one nesting level deeper, failing if that passes the limit.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(Error::new(
                ErrorKind::DepthLimitExceeded {
                    limit: self.max_depth,
                },
                self.input.offset(),
            ));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }
}
