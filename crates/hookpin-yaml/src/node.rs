//! Concrete syntax tree nodes.
//!
//! Every byte of a parsed document is owned by exactly one fragment: scalar
//! lexemes and key texts live in `repr` fields, everything around them
//! (comments, blank lines, indentation, dashes, separators) in
//! `before`/`sep` fragments. Serialization concatenates the fragments in
//! document order, so untouched regions round-trip byte-for-byte while a
//! structurally replaced node re-renders only itself.

use crate::error::{Error, Result};
use crate::scalar::{render_key, render_scalar, ScalarStyle, ScalarValue};

/// A node of the concrete syntax tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Leaf scalar.
    Scalar(ScalarNode),
    /// Key/value mapping, block or flow style.
    Mapping(MappingNode),
    /// Ordered sequence, block or flow style.
    Sequence(SequenceNode),
}

impl Node {
    /// Node kind name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
        }
    }

    pub(crate) fn emit(&self, out: &mut String) {
        match self {
            Node::Scalar(scalar) => {
                out.push_str(&scalar.before);
                match &scalar.repr {
                    Some(repr) => out.push_str(repr),
                    None => out.push_str(&render_scalar(&scalar.value)),
                }
            }
            Node::Mapping(mapping) => {
                if let Some(delims) = &mapping.flow {
                    out.push_str(&delims.open);
                }
                for entry in &mapping.entries {
                    out.push_str(&entry.before);
                    out.push_str(&entry.key_repr);
                    entry.value.emit(out);
                    out.push_str(&entry.sep);
                }
                if let Some(delims) = &mapping.flow {
                    out.push_str(&delims.close);
                }
            }
            Node::Sequence(sequence) => {
                if let Some(delims) = &sequence.flow {
                    out.push_str(&delims.open);
                }
                for item in &sequence.items {
                    out.push_str(&item.before);
                    item.value.emit(out);
                    out.push_str(&item.sep);
                }
                if let Some(delims) = &sequence.flow {
                    out.push_str(&delims.close);
                }
            }
        }
    }

    fn scalar_lead(&self) -> Option<&str> {
        match self {
            Node::Scalar(scalar) if !scalar.before.is_empty() => Some(&scalar.before),
            _ => None,
        }
    }
}

/// Leaf node holding a primitive value plus its original lexeme.
#[derive(Debug, Clone)]
pub struct ScalarNode {
    /// Text between the introducing token (colon, dash, comma) and the lexeme.
    pub(crate) before: String,
    /// Original lexeme, quotes included; `None` once synthesized.
    pub(crate) repr: Option<String>,
    pub(crate) value: ScalarValue,
    pub(crate) style: ScalarStyle,
}

impl ScalarNode {
    /// The decoded value.
    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    /// The lexical style the scalar was written in.
    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    pub(crate) fn parsed(
        before: String,
        repr: String,
        value: ScalarValue,
        style: ScalarStyle,
    ) -> Self {
        Self {
            before,
            repr: Some(repr),
            value,
            style,
        }
    }

    pub(crate) fn synthesized(value: ScalarValue, before: String) -> Self {
        Self {
            before,
            repr: None,
            value,
            style: ScalarStyle::Plain,
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            before: String::new(),
            repr: Some(String::new()),
            value: ScalarValue::Null,
            style: ScalarStyle::Plain,
        }
    }
}

/// Opening/closing bracket fragments of a flow collection.
#[derive(Debug, Clone)]
pub(crate) struct FlowDelims {
    pub(crate) open: String,
    pub(crate) close: String,
}

#[derive(Debug, Clone)]
pub(crate) struct MappingEntry {
    pub(crate) before: String,
    pub(crate) key_repr: String,
    pub(crate) key: String,
    pub(crate) value: Node,
    pub(crate) sep: String,
}

/// Ordered set of unique keys mapped to value nodes.
#[derive(Debug, Clone)]
pub struct MappingNode {
    pub(crate) entries: Vec<MappingEntry>,
    pub(crate) indent: usize,
    pub(crate) flow: Option<FlowDelims>,
}

impl MappingNode {
    /// Look up a value node by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    /// Mutable lookup by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|e| e.key == key)
            .map(|e| &mut e.value)
    }

    /// Key existence.
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the mapping holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Replace the entry for `key`, or insert a new one after the last entry.
    pub(crate) fn set(&mut self, key: &str, value: NewValue, unit: usize) {
        let flow = self.flow.is_some();
        let ctx = BuildCtx {
            col: self.indent + unit,
            unit,
            flow,
            inline_ok: false,
        };
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            let lead = entry
                .value
                .scalar_lead()
                .map(str::to_string)
                .unwrap_or_else(|| if flow { String::new() } else { " ".to_string() });
            entry.value = build_node(value, ctx, lead);
            return;
        }
        if flow {
            if let Some(last) = self.entries.last_mut() {
                if last.sep.is_empty() {
                    last.sep = ",".to_string();
                }
            }
        }
        let before = if flow {
            if self.entries.is_empty() {
                String::new()
            } else {
                " ".to_string()
            }
        } else {
            format!("\n{}", " ".repeat(self.indent))
        };
        self.entries.push(MappingEntry {
            before,
            key_repr: format!("{}:", render_key(key)),
            key: key.to_string(),
            value: build_node(value, ctx, " ".to_string()),
            sep: String::new(),
        });
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SequenceItem {
    pub(crate) before: String,
    pub(crate) value: Node,
    pub(crate) sep: String,
}

/// Ordered, index-addressable list of nodes.
#[derive(Debug, Clone)]
pub struct SequenceNode {
    pub(crate) items: Vec<SequenceItem>,
    pub(crate) indent: usize,
    pub(crate) flow: Option<FlowDelims>,
}

impl SequenceNode {
    /// Item at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index).map(|item| &item.value)
    }

    /// Mutable item at `index`, if in range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index).map(|item| &mut item.value)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the sequence holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the item at `index` in place, or append when `index == len`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] for any index past the append
    /// boundary.
    pub(crate) fn set(&mut self, index: usize, value: NewValue, unit: usize) -> Result<()> {
        let flow = self.flow.is_some();
        let ctx = BuildCtx {
            col: self.indent + unit,
            unit,
            flow,
            inline_ok: true,
        };
        let len = self.items.len();
        if index < len {
            let item = &mut self.items[index];
            let lead = item
                .value
                .scalar_lead()
                .map(str::to_string)
                .unwrap_or_else(|| if flow { String::new() } else { " ".to_string() });
            item.value = build_node(value, ctx, lead);
            return Ok(());
        }
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        if flow {
            if let Some(last) = self.items.last_mut() {
                if last.sep.is_empty() {
                    last.sep = ",".to_string();
                }
            }
            let before = if self.items.is_empty() {
                String::new()
            } else {
                " ".to_string()
            };
            self.items.push(SequenceItem {
                before,
                value: build_node(value, ctx, String::new()),
                sep: String::new(),
            });
        } else {
            self.items.push(SequenceItem {
                before: format!("\n{}-", " ".repeat(self.indent)),
                value: build_node(value, ctx, " ".to_string()),
                sep: String::new(),
            });
        }
        Ok(())
    }
}

/// A native value being converted into a CST subtree on assignment.
///
/// Scalar variants become freshly rendered scalar nodes; `Seq`/`Map` become
/// whole subtrees laid out with the document's indentation conventions;
/// `Node` reparents an existing node taken from the same document.
#[derive(Debug, Clone)]
pub enum NewValue {
    /// Explicit null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Float scalar.
    Float(f64),
    /// String scalar.
    Str(String),
    /// Sequence of values.
    Seq(Vec<NewValue>),
    /// Mapping of key/value pairs, in insertion order.
    Map(Vec<(String, NewValue)>),
    /// Existing node reparented into the target slot.
    Node(Node),
}

impl From<&str> for NewValue {
    fn from(value: &str) -> Self {
        NewValue::Str(value.to_string())
    }
}

impl From<String> for NewValue {
    fn from(value: String) -> Self {
        NewValue::Str(value)
    }
}

impl From<bool> for NewValue {
    fn from(value: bool) -> Self {
        NewValue::Bool(value)
    }
}

impl From<i64> for NewValue {
    fn from(value: i64) -> Self {
        NewValue::Int(value)
    }
}

impl From<f64> for NewValue {
    fn from(value: f64) -> Self {
        NewValue::Float(value)
    }
}

impl From<ScalarValue> for NewValue {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Null => NewValue::Null,
            ScalarValue::Bool(b) => NewValue::Bool(b),
            ScalarValue::Int(i) => NewValue::Int(i),
            ScalarValue::Float(f) => NewValue::Float(f),
            ScalarValue::Str(s) => NewValue::Str(s),
        }
    }
}

impl From<Node> for NewValue {
    fn from(value: Node) -> Self {
        NewValue::Node(value)
    }
}

impl From<Vec<NewValue>> for NewValue {
    fn from(value: Vec<NewValue>) -> Self {
        NewValue::Seq(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BuildCtx {
    /// Column where block children of the built node are laid out.
    pub(crate) col: usize,
    pub(crate) unit: usize,
    pub(crate) flow: bool,
    /// Whether the first fragment may stay on the introducing line
    /// (true after a sequence dash, false after a mapping colon).
    pub(crate) inline_ok: bool,
}

pub(crate) fn build_node(value: NewValue, ctx: BuildCtx, lead: String) -> Node {
    match value {
        NewValue::Null => Node::Scalar(ScalarNode::synthesized(ScalarValue::Null, lead)),
        NewValue::Bool(b) => Node::Scalar(ScalarNode::synthesized(ScalarValue::Bool(b), lead)),
        NewValue::Int(i) => Node::Scalar(ScalarNode::synthesized(ScalarValue::Int(i), lead)),
        NewValue::Float(f) => Node::Scalar(ScalarNode::synthesized(ScalarValue::Float(f), lead)),
        NewValue::Str(s) => Node::Scalar(ScalarNode::synthesized(ScalarValue::Str(s), lead)),
        NewValue::Node(mut node) => {
            if let Node::Scalar(scalar) = &mut node {
                scalar.before = lead;
            }
            node
        }
        NewValue::Seq(items) => Node::Sequence(build_sequence(items, ctx, lead)),
        NewValue::Map(pairs) => Node::Mapping(build_mapping(pairs, ctx, lead)),
    }
}

fn build_sequence(items: Vec<NewValue>, ctx: BuildCtx, lead: String) -> SequenceNode {
    if ctx.flow {
        let last = items.len().saturating_sub(1);
        let items = items
            .into_iter()
            .enumerate()
            .map(|(i, v)| SequenceItem {
                before: if i == 0 { String::new() } else { " ".to_string() },
                value: build_node(v, ctx, String::new()),
                sep: if i == last {
                    String::new()
                } else {
                    ",".to_string()
                },
            })
            .collect();
        SequenceNode {
            items,
            indent: 0,
            flow: Some(FlowDelims {
                open: format!("{lead}["),
                close: "]".to_string(),
            }),
        }
    } else {
        let child = BuildCtx {
            col: ctx.col + ctx.unit,
            inline_ok: true,
            ..ctx
        };
        let items = items
            .into_iter()
            .enumerate()
            .map(|(i, v)| SequenceItem {
                before: if i == 0 && ctx.inline_ok {
                    format!("{lead}-")
                } else {
                    format!("\n{}-", " ".repeat(ctx.col))
                },
                value: build_node(v, child, " ".to_string()),
                sep: String::new(),
            })
            .collect();
        SequenceNode {
            items,
            indent: ctx.col,
            flow: None,
        }
    }
}

fn build_mapping(pairs: Vec<(String, NewValue)>, ctx: BuildCtx, lead: String) -> MappingNode {
    if ctx.flow {
        let last = pairs.len().saturating_sub(1);
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (key, v))| MappingEntry {
                before: if i == 0 { String::new() } else { " ".to_string() },
                key_repr: format!("{}:", render_key(&key)),
                key,
                value: build_node(v, ctx, " ".to_string()),
                sep: if i == last {
                    String::new()
                } else {
                    ",".to_string()
                },
            })
            .collect();
        MappingNode {
            entries,
            indent: 0,
            flow: Some(FlowDelims {
                open: format!("{lead}{{"),
                close: "}".to_string(),
            }),
        }
    } else {
        let child = BuildCtx {
            col: ctx.col + ctx.unit,
            inline_ok: false,
            ..ctx
        };
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (key, v))| MappingEntry {
                before: if i == 0 && ctx.inline_ok {
                    lead.clone()
                } else {
                    format!("\n{}", " ".repeat(ctx.col))
                },
                key_repr: format!("{}:", render_key(&key)),
                key,
                value: build_node(v, child, " ".to_string()),
                sep: String::new(),
            })
            .collect();
        MappingNode {
            entries,
            indent: ctx.col,
            flow: None,
        }
    }
}
