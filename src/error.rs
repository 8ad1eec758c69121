//! Contains the Error and Result type used by the decoder.
use std::fmt;

use thiserror::Error;

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// The underlying cause of a failed decode.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A fixed-width or raw read needed more bytes than remained.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A length prefix was negative, or described more data than the input
    /// still holds.
    #[error("malformed length {len}: only {remaining} bytes remaining")]
    MalformedLength { len: i64, remaining: usize },

    /// A tag-type byte outside the known set. The position in the stream is
    /// lost after this.
    #[error("unsupported tag type: {0}")]
    UnsupportedTagType(u8),

    /// Fewer bytes than the fixed header needs.
    #[error("insufficient header: need 8 bytes, got {len}")]
    InsufficientHeader { len: usize },

    /// The header's payload length did not match the bytes that follow it.
    #[error("header declares {declared} payload bytes, found {actual}")]
    HeaderLengthMismatch { declared: i32, actual: usize },

    #[error("nesting exceeds depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("input of {len} bytes exceeds limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },

    /// Expected a UTF-8 string. Contains the offending bytes.
    #[error("invalid string, non-unicode: {}", String::from_utf8_lossy(.0))]
    NonUnicodeString(Vec<u8>),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// What the decoder was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Draining the source into memory.
    Read,
    Header,
    TagType,
    Name,
    ListHeader,
    Payload,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Read => "reading input",
            Phase::Header => "reading header",
            Phase::TagType => "reading tag type",
            Phase::Name => "reading tag name",
            Phase::ListHeader => "reading list header",
            Phase::Payload => "reading tag payload",
        })
    }
}

/// One step on the way from the root compound to the tag that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An entry of a compound.
    Name(String),
    /// An element of a list.
    Index(usize),
}

/// A decode failure, with the path and phase it happened in.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    phase: Phase,
    offset: usize,
    // Innermost segment first, pushed while the error unwinds.
    path: Vec<PathSegment>,
    in_root: bool,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Self {
            kind,
            phase: Phase::Payload,
            offset,
            path: Vec::new(),
            in_root: false,
        }
    }

    pub(crate) fn during(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        self.path.push(segment);
        self
    }

    pub(crate) fn in_root(mut self) -> Self {
        self.in_root = true;
        self
    }

    pub(crate) fn unexpected_end(needed: usize, remaining: usize, offset: usize) -> Self {
        Self::new(ErrorKind::UnexpectedEnd { needed, remaining }, offset)
    }

    pub(crate) fn malformed_length(len: i64, remaining: usize, offset: usize) -> Self {
        Self::new(ErrorKind::MalformedLength { len, remaining }, offset)
    }

    pub(crate) fn unsupported_tag(tag: u8, offset: usize) -> Self {
        Self::new(ErrorKind::UnsupportedTagType(tag), offset)
    }

    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Byte offset into the payload (after the header) where the failing
    /// read started. Errors in [`Phase::Read`] and [`Phase::Header`] come
    /// before the payload and report 0.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Path from the root to the failing tag, outermost first.
    pub fn path(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    /// Renders the path as `Data.Items[2].Count`. Empty names render as `""`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in self.path() {
            match segment {
                PathSegment::Name(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    if name.is_empty() {
                        out.push_str("\"\"");
                    } else {
                        out.push_str(name);
                    }
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    pub fn is_unexpected_end(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEnd { .. })
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_root {
            f.write_str("error reading root compound: ")?;
        }
        write!(f, "{}", self.phase)?;
        if !self.path.is_empty() {
            write!(f, " of {}", self.path_string())?;
        }
        write!(f, " at offset {}: {}", self.offset, self.kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(e), 0).during(Phase::Read)
    }
}
