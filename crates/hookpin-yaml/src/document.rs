//! Parsed document and its provenance.

use std::fmt;

use crate::error::Result;
use crate::node::Node;
use crate::parser::Parser;

/// A parsed YAML document.
///
/// The tree returned by [`Document::parse`] is the same object mutated during
/// editing and handed to serialization; there is no plain-value intermediate
/// that would lose comments or formatting. Serialization is `Display`, the
/// same way `toml_edit` documents stringify.
#[derive(Debug, Clone)]
pub struct Document {
    root: Node,
    trailer: String,
    indent_unit: usize,
}

impl Document {
    /// Parse source text into a document.
    ///
    /// # Errors
    /// Returns [`crate::Error::Parse`] for malformed or unsupported input and
    /// [`crate::Error::EmptyDocument`] when the text holds only comments and
    /// whitespace.
    pub fn parse(text: &str) -> Result<Self> {
        Parser::new(text).parse_document()
    }

    pub(crate) fn assemble(root: Node, trailer: String, indent_unit: usize) -> Self {
        Self {
            root,
            trailer,
            indent_unit,
        }
    }

    /// Root node of the tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Mutable root node.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Indentation step observed at parse time (defaults to 2).
    pub fn indent_unit(&self) -> usize {
        self.indent_unit
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.root.emit(&mut out);
        out.push_str(&self.trailer);
        f.write_str(&out)
    }
}
