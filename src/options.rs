/// How the 8-byte header in front of the root compound is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Parse the header but ignore what it says. This is what the game's own
    /// tools tolerate, and the default.
    #[default]
    Skip,
    /// Require the header's payload length to equal the number of bytes that
    /// follow the header.
    Validate,
}

/// Options for customizing decoding.
///
/// ```
/// # use bedrocknbt::{DecodeOptions, HeaderMode};
/// let opts = DecodeOptions::new()
///     .max_depth(64)
///     .max_input_len(16 * 1024 * 1024)
///     .header_mode(HeaderMode::Validate);
/// # let _ = opts;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub(crate) max_depth: usize,
    pub(crate) max_input_len: Option<usize>,
    pub(crate) header_mode: HeaderMode,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    /// Default nesting limit. Far deeper than anything the game writes.
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_input_len: None,
            header_mode: HeaderMode::Skip,
        }
    }

    /// Maximum nesting of compounds and lists, counting the root compound as
    /// depth 1. Empty lists have no elements to nest and do not count.
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    /// Maximum size of the whole input, header included. Unlimited by
    /// default. When decoding from a reader, at most one byte past this limit
    /// is read before failing.
    pub fn max_input_len(mut self, value: usize) -> Self {
        self.max_input_len = Some(value);
        self
    }

    pub fn header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }
}
