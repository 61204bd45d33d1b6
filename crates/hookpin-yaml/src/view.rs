//! Transparent read/write access over CST nodes.
//!
//! A [`View`] lets callers read and mutate the tree as if it were a plain
//! nested map/array value: scalars unwrap to native [`ScalarValue`]s,
//! containers re-wrap into child views over the same (non-copied) node, so
//! mutations through a child are visible through the parent. A view never
//! owns its node and is never constructed over a scalar.

use crate::error::{Error, Result};
use crate::node::{NewValue, Node};
use crate::scalar::ScalarValue;

/// Borrowed accessor over a mapping or sequence node.
#[derive(Debug)]
pub struct View<'a> {
    node: &'a mut Node,
    unit: usize,
}

/// A value reached through a [`View`].
#[derive(Debug)]
pub enum Value<'a> {
    /// Leaf scalar, already unwrapped to its native value.
    Scalar(ScalarValue),
    /// Nested container, wrapped without copying.
    Container(View<'a>),
}

impl<'a> View<'a> {
    /// Wrap a container node.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTraversal`] when the node is a scalar; scalars
    /// are terminal and only ever surface as unwrapped [`Value::Scalar`]s.
    pub fn over(node: &'a mut Node, indent_unit: usize) -> Result<Self> {
        if matches!(node, Node::Scalar(_)) {
            return Err(Error::InvalidTraversal {
                expected: "mapping or sequence",
                found: "scalar",
            });
        }
        Ok(Self {
            node,
            unit: indent_unit,
        })
    }

    /// True when the wrapped node is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self.node, Node::Mapping(_))
    }

    /// True when the wrapped node is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self.node, Node::Sequence(_))
    }

    /// Entry count for mappings, item count for sequences.
    pub fn len(&self) -> usize {
        match &*self.node {
            Node::Mapping(m) => m.len(),
            Node::Sequence(s) => s.len(),
            Node::Scalar(_) => 0,
        }
    }

    /// True when the container holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key existence on a mapping-backed view; false otherwise.
    pub fn has(&self, key: &str) -> bool {
        match &*self.node {
            Node::Mapping(m) => m.has(key),
            _ => false,
        }
    }

    /// Index existence on a sequence-backed view; false otherwise.
    pub fn has_index(&self, index: usize) -> bool {
        match &*self.node {
            Node::Sequence(s) => index < s.len(),
            _ => false,
        }
    }

    /// Keys of a mapping-backed view in document order; empty otherwise.
    pub fn keys(&self) -> Vec<String> {
        match &*self.node {
            Node::Mapping(m) => m.keys().map(String::from).collect(),
            _ => Vec::new(),
        }
    }

    /// Mapping lookup. Absent keys yield `Ok(None)`; nothing is created
    /// implicitly.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTraversal`] on a sequence-backed view.
    pub fn get(&mut self, key: &str) -> Result<Option<Value<'_>>> {
        let unit = self.unit;
        match &mut *self.node {
            Node::Mapping(m) => Ok(m.get_mut(key).map(|node| wrap(node, unit))),
            Node::Sequence(_) => Err(Error::InvalidTraversal {
                expected: "mapping",
                found: "sequence",
            }),
            Node::Scalar(_) => Err(Error::InvalidTraversal {
                expected: "mapping",
                found: "scalar",
            }),
        }
    }

    /// Sequence lookup by index. Out-of-range indexes yield `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTraversal`] on a mapping-backed view.
    pub fn get_index(&mut self, index: usize) -> Result<Option<Value<'_>>> {
        let unit = self.unit;
        match &mut *self.node {
            Node::Sequence(s) => Ok(s.get_mut(index).map(|node| wrap(node, unit))),
            Node::Mapping(_) => Err(Error::InvalidTraversal {
                expected: "sequence",
                found: "mapping",
            }),
            Node::Scalar(_) => Err(Error::InvalidTraversal {
                expected: "sequence",
                found: "scalar",
            }),
        }
    }

    /// Replace or insert a mapping entry. Native values become fresh CST
    /// subtrees honoring the document's indentation; an existing [`Node`] is
    /// reparented as-is.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTraversal`] on a sequence-backed view.
    pub fn set(&mut self, key: &str, value: impl Into<NewValue>) -> Result<()> {
        let unit = self.unit;
        match &mut *self.node {
            Node::Mapping(m) => {
                m.set(key, value.into(), unit);
                Ok(())
            }
            Node::Sequence(_) => Err(Error::InvalidTraversal {
                expected: "mapping",
                found: "sequence",
            }),
            Node::Scalar(_) => Err(Error::InvalidTraversal {
                expected: "mapping",
                found: "scalar",
            }),
        }
    }

    /// Replace the item at `index` in place, or append when `index` equals
    /// the current length.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] past the append boundary and
    /// [`Error::InvalidTraversal`] on a mapping-backed view.
    pub fn set_index(&mut self, index: usize, value: impl Into<NewValue>) -> Result<()> {
        let unit = self.unit;
        match &mut *self.node {
            Node::Sequence(s) => s.set(index, value.into(), unit),
            Node::Mapping(_) => Err(Error::InvalidTraversal {
                expected: "sequence",
                found: "mapping",
            }),
            Node::Scalar(_) => Err(Error::InvalidTraversal {
                expected: "sequence",
                found: "scalar",
            }),
        }
    }
}

fn wrap(node: &mut Node, unit: usize) -> Value<'_> {
    match node {
        Node::Scalar(scalar) => Value::Scalar(scalar.value().clone()),
        container => Value::Container(View {
            node: container,
            unit,
        }),
    }
}

impl<'a> Value<'a> {
    /// Unwrap as a container view.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTraversal`] for scalars; they are terminal.
    pub fn container(self) -> Result<View<'a>> {
        match self {
            Value::Container(view) => Ok(view),
            Value::Scalar(_) => Err(Error::InvalidTraversal {
                expected: "mapping or sequence",
                found: "scalar",
            }),
        }
    }

    /// Unwrap the native scalar value.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTraversal`] for containers.
    pub fn scalar(self) -> Result<ScalarValue> {
        match self {
            Value::Scalar(value) => Ok(value),
            Value::Container(view) => Err(Error::InvalidTraversal {
                expected: "scalar",
                found: if view.is_mapping() {
                    "mapping"
                } else {
                    "sequence"
                },
            }),
        }
    }

    /// Borrow string content, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    /// True for unwrapped leaves.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// True for wrapped containers.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Container(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn edit(text: &str, f: impl FnOnce(&mut View<'_>)) -> String {
        let mut doc = Document::parse(text).unwrap();
        let unit = doc.indent_unit();
        let mut root = View::over(doc.root_mut(), unit).unwrap();
        f(&mut root);
        doc.to_string()
    }

    #[test]
    fn test_get_unwraps_scalars() {
        let mut doc = Document::parse("a: 1\n").unwrap();
        let mut root = View::over(doc.root_mut(), 2).unwrap();
        match root.get("a").unwrap() {
            Some(Value::Scalar(ScalarValue::Int(1))) => {}
            other => panic!("unexpected: {other:?}"),
        }
        assert!(root.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_scalar_is_terminal() {
        let mut doc = Document::parse("a: 1\n").unwrap();
        let mut root = View::over(doc.root_mut(), 2).unwrap();
        let value = root.get("a").unwrap().unwrap();
        let err = value.container().unwrap_err();
        assert!(matches!(err, Error::InvalidTraversal { .. }));
    }

    #[test]
    fn test_view_never_wraps_scalar_root() {
        let mut doc = Document::parse("just a scalar\n").unwrap();
        let err = View::over(doc.root_mut(), 2).unwrap_err();
        assert!(matches!(err, Error::InvalidTraversal { .. }));
    }

    #[test]
    fn test_mapping_access_on_sequence_fails() {
        let mut doc = Document::parse("- a\n- b\n").unwrap();
        let mut root = View::over(doc.root_mut(), 2).unwrap();
        assert!(matches!(
            root.get("a"),
            Err(Error::InvalidTraversal { .. })
        ));
        assert!(matches!(
            root.set("a", 1i64),
            Err(Error::InvalidTraversal { .. })
        ));
        assert!(root.get_index(0).unwrap().is_some());
    }

    #[test]
    fn test_set_replaces_scalar_in_place() {
        let out = edit("version: 1.0.0  # keep\n", |root| {
            root.set("version", "2.0.0").unwrap();
        });
        assert_eq!(out, "version: 2.0.0  # keep\n");
    }

    #[test]
    fn test_set_inserts_new_entry() {
        let out = edit("a: 1\nb: 2\n", |root| {
            root.set("c", 3i64).unwrap();
        });
        assert_eq!(out, "a: 1\nb: 2\nc: 3\n");
    }

    #[test]
    fn test_set_index_replace_and_append() {
        let out = edit("deps:\n  - one\n  - two\n", |root| {
            let mut deps = root.get("deps").unwrap().unwrap().container().unwrap();
            deps.set_index(0, "uno").unwrap();
            deps.set_index(2, "three").unwrap();
        });
        assert_eq!(out, "deps:\n  - uno\n  - two\n  - three\n");
    }

    #[test]
    fn test_set_index_past_append_boundary() {
        let mut doc = Document::parse("deps:\n  - one\n").unwrap();
        let mut root = View::over(doc.root_mut(), 2).unwrap();
        let mut deps = root.get("deps").unwrap().unwrap().container().unwrap();
        let err = deps.set_index(2, "nope").unwrap_err();
        match err {
            Error::IndexOutOfRange { index, len } => {
                assert_eq!(index, 2);
                assert_eq!(len, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_child_mutation_visible_through_parent() {
        let out = edit("outer:\n  inner: old\n", |root| {
            let mut outer = root.get("outer").unwrap().unwrap().container().unwrap();
            outer.set("inner", "new").unwrap();
        });
        assert_eq!(out, "outer:\n  inner: new\n");
    }

    #[test]
    fn test_set_nested_native_sequence() {
        let out = edit("a: 1\n", |root| {
            root.set(
                "list",
                vec![NewValue::from("x"), NewValue::from("y")],
            )
            .unwrap();
        });
        assert_eq!(out, "a: 1\nlist:\n  - x\n  - y\n");
    }

    #[test]
    fn test_append_to_flow_sequence() {
        let out = edit("args: [--fix]\n", |root| {
            let mut args = root.get("args").unwrap().unwrap().container().unwrap();
            args.set_index(1, "--quiet").unwrap();
        });
        assert_eq!(out, "args: [--fix, --quiet]\n");
    }

    #[test]
    fn test_has_and_len() {
        let mut doc = Document::parse("a: 1\nitems:\n  - x\n").unwrap();
        let mut root = View::over(doc.root_mut(), 2).unwrap();
        assert!(root.has("a"));
        assert!(!root.has("z"));
        assert_eq!(root.len(), 2);
        let items = root.get("items").unwrap().unwrap().container().unwrap();
        assert!(items.has_index(0));
        assert!(!items.has_index(1));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_reparent_existing_node() {
        let out = edit("a: keep\nb: drop\n", |root| {
            let node = match &root.node {
                Node::Mapping(m) => m.get("a").cloned().unwrap(),
                _ => unreachable!(),
            };
            root.set("b", node).unwrap();
        });
        assert_eq!(out, "a: keep\nb: keep\n");
    }
}
