//! Generic depth-first traversal over a [`DocumentValue`] tree.
//!
//! Every consumer that needs to look at a whole tree (the XML encoder, the
//! outline used to populate tree views, tree statistics) goes through [`walk`]
//! with its own [`Visitor`] instead of re-implementing the dict/array recursion.
//!
//! Traversal order is document order: mapping keys in insertion order,
//! sequence elements by index. `leave` is always paired with `enter`, even
//! when the visitor asked to skip the children.

use std::fmt;

use serde::Serialize;

use crate::value::DocumentValue;

/// One step in a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Location of a node inside a tree.
///
/// Displays as the dot-joined segments, or the literal `root` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn push(&mut self, seg: PathSegment) {
        self.segments.push(seg);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn child_key(&self, key: &str) -> Self {
        let mut p = self.clone();
        p.push(PathSegment::Key(key.to_string()));
        p
    }

    pub fn child_index(&self, idx: usize) -> Self {
        let mut p = self.clone();
        p.push(PathSegment::Index(idx));
        p
    }

    /// Dot-joined form; empty for the root.
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("root")
        } else {
            f.write_str(&self.dotted())
        }
    }
}

/// Returned by [`Visitor::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    SkipChildren,
}

pub trait Visitor {
    fn enter(&mut self, path: &NodePath, value: &DocumentValue) -> Flow;

    fn leave(&mut self, _path: &NodePath, _value: &DocumentValue) {}
}

/// Walk `root` depth-first, calling `visitor` for every node.
pub fn walk<V: Visitor + ?Sized>(root: &DocumentValue, visitor: &mut V) {
    let mut path = NodePath::root();
    walk_node(root, &mut path, visitor);
}

fn walk_node<V: Visitor + ?Sized>(value: &DocumentValue, path: &mut NodePath, visitor: &mut V) {
    if visitor.enter(path, value) == Flow::Continue {
        match value {
            DocumentValue::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(i));
                    walk_node(item, path, visitor);
                    path.pop();
                }
            }
            DocumentValue::Mapping(d) => {
                for (k, v) in d.iter() {
                    path.push(PathSegment::Key(k.to_string()));
                    walk_node(v, path, visitor);
                    path.pop();
                }
            }
            _ => {}
        }
    }
    visitor.leave(path, value);
}

/// A flattened row describing one node, suitable for tree views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineRow {
    pub path: String,
    pub depth: usize,
    pub key: String,
    pub kind: String,
    pub display: String,
}

struct OutlineVisitor {
    rows: Vec<OutlineRow>,
    max_depth: Option<usize>,
}

impl Visitor for OutlineVisitor {
    fn enter(&mut self, path: &NodePath, value: &DocumentValue) -> Flow {
        let key = match path.last() {
            Some(seg) => seg.to_string(),
            None => "root".to_string(),
        };
        self.rows.push(OutlineRow {
            path: path.dotted(),
            depth: path.len(),
            key,
            kind: value.kind().as_str().to_string(),
            display: value.summary(),
        });
        match self.max_depth {
            Some(max) if path.len() >= max => Flow::SkipChildren,
            _ => Flow::Continue,
        }
    }
}

/// Flatten a tree into rows in document order.
///
/// `max_depth` limits how deep children are listed (`None` = unlimited).
pub fn outline(root: &DocumentValue, max_depth: Option<usize>) -> Vec<OutlineRow> {
    let mut v = OutlineVisitor {
        rows: Vec::new(),
        max_depth,
    };
    walk(root, &mut v);
    v.rows
}

/// Node counts for a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub mappings: usize,
    pub sequences: usize,
    pub leaves: usize,
    pub max_depth: usize,
}

impl Visitor for TreeStats {
    fn enter(&mut self, path: &NodePath, value: &DocumentValue) -> Flow {
        match value {
            DocumentValue::Mapping(_) => self.mappings += 1,
            DocumentValue::Sequence(_) => self.sequences += 1,
            _ => self.leaves += 1,
        }
        self.max_depth = self.max_depth.max(path.len());
        Flow::Continue
    }
}

pub fn stats(root: &DocumentValue) -> TreeStats {
    let mut s = TreeStats::default();
    walk(root, &mut s);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Dict;

    fn sample() -> DocumentValue {
        DocumentValue::Mapping(
            Dict::new()
                .with(
                    "ACPI",
                    Dict::new().with(
                        "Add",
                        vec![DocumentValue::Mapping(Dict::new().with("Path", "SSDT-PLUG.aml"))],
                    ),
                )
                .with("Timeout", 5i64),
        )
    }

    #[test]
    fn node_path_display() {
        assert_eq!(NodePath::root().to_string(), "root");
        let p = NodePath::root().child_key("ACPI").child_key("Add").child_index(0);
        assert_eq!(p.to_string(), "ACPI.Add.0");
    }

    #[test]
    fn outline_is_document_order() {
        let rows = outline(&sample(), None);
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["", "ACPI", "ACPI.Add", "ACPI.Add.0", "ACPI.Add.0.Path", "Timeout"]
        );
        assert_eq!(rows[4].display, "SSDT-PLUG.aml");
        assert_eq!(rows[2].kind, "array");
    }

    #[test]
    fn outline_depth_limit() {
        let rows = outline(&sample(), Some(1));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn stats_counts() {
        let s = stats(&sample());
        assert_eq!(
            s,
            TreeStats {
                mappings: 3,
                sequences: 1,
                leaves: 2,
                max_depth: 4
            }
        );
    }
}
