//! # hookpin-yaml
//!
//! Format-preserving YAML document editing.
//!
//! This crate provides functionality to:
//! - Parse YAML into a concrete syntax tree that keeps every comment, blank
//!   line, quoting choice, and key ordering
//! - Read and mutate the tree through a transparent map/array-style accessor
//!   ([`View`]) without naming CST types
//! - Serialize back to text, reproducing every untouched byte exactly
//! - Run atomic edit sessions against files (no partial writes)
//!
//! ## Architecture
//!
//! The tree is lossless by construction: every input byte belongs to exactly
//! one node fragment, and serialization concatenates the fragments in order.
//! A mutation replaces one node and nothing else, so sibling comments and
//! formatting survive unchanged. There is no plain-value intermediate that
//! provenance would have to be re-attached to.
//!
//! ## Example
//!
//! ```rust
//! use hookpin_yaml::edit_str;
//!
//! let source = "# pinned tools\nversion: 1.0.0\n";
//! let output = edit_str(source, |root| root.set("version", "2.0.0")).unwrap();
//! assert_eq!(output, "# pinned tools\nversion: 2.0.0\n");
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod node;
mod parser;
pub mod scalar;
pub mod session;
pub mod view;

// Re-export main types
pub use document::Document;
pub use error::{Error, Result};
pub use node::{MappingNode, NewValue, Node, ScalarNode, SequenceNode};
pub use scalar::{ScalarStyle, ScalarValue};
pub use session::{edit_document, edit_document_dry_run, edit_str};
pub use view::{Value, View};
