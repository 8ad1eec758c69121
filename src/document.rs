use serde::Serialize;

use crate::{Compound, Header, Value};

/// A decoded `level.dat`: its header and root compound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    header: Header,
    root: Compound,
}

impl Document {
    pub(crate) fn new(header: Header, root: Compound) -> Self {
        Self { header, root }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Every named tag found after the header.
    pub fn root(&self) -> &Compound {
        &self.root
    }

    pub fn into_root(self) -> Compound {
        self.root
    }

    /// The compound most files actually carry. The game writes its data as a
    /// single compound tag with an empty name, so this is `root()[""]`.
    pub fn level(&self) -> Option<&Compound> {
        self.root.get("")?.as_compound()
    }

    /// Look up a top level entry of the root.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }
}
