use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::path::{render_path, PathPattern, Step};
use crate::store::StoreError;
use crate::value::{PathValue, Value};

/// A node of a YANG data tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataNode {
    /// Node name; top-level nodes carry their module prefix (`module:name`).
    pub name: String,
    /// List keys in schema order. Empty for everything but list instances.
    pub keys: Vec<(String, String)>,
    /// Typed value, or the interior kind for containers and lists.
    pub value: Value,
    /// Child nodes in document order.
    pub children: Vec<DataNode>,
}

impl DataNode {
    /// Create a node with no keys or children.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            value,
            children: Vec::new(),
        }
    }

    /// Create an empty container node.
    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, Value::Container)
    }

    /// Create a list instance identified by `keys`.
    pub fn list_entry(name: impl Into<String>, keys: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            keys,
            value: Value::List,
            children: Vec::new(),
        }
    }

    /// Path step of this node, including key predicates.
    pub fn segment(&self) -> String {
        let mut out = self.name.clone();
        for (key, value) in &self.keys {
            let quote = if value.contains('\'') { '"' } else { '\'' };
            out.push_str(&format!("[{key}={quote}{value}{quote}]"));
        }
        out
    }

    /// Return the first child with the provided name.
    pub fn get_child(&self, name: &str) -> Option<&DataNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Append a child and return `self` for chaining.
    pub fn with_child(mut self, child: DataNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a typed leaf and return `self` for chaining.
    pub fn with_leaf(self, name: &str, value: Value) -> Self {
        self.with_child(DataNode::new(name, value))
    }
}

impl Display for DataNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment())?;
        if self.value.is_scalar() {
            write!(f, " = {}", self.value)?;
        }
        Ok(())
    }
}

/// An ordered forest of top-level data nodes, one per module root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataTree {
    pub roots: Vec<DataNode>,
}

impl DataTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from top-level nodes.
    pub fn from_roots(roots: Vec<DataNode>) -> Self {
        Self { roots }
    }

    /// Visit every node in pre-order with its ancestor chain (root first,
    /// node last).
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&[&'a DataNode])) {
        let mut trail = Vec::new();
        walk_nodes(&self.roots, &mut trail, &mut visit);
    }

    /// Return the first node at exactly `path`.
    pub fn find(&self, path: &str) -> Result<PathValue, StoreError> {
        let pattern = PathPattern::parse_exact(path)?;
        let mut found = None;
        self.walk(|trail| {
            if found.is_none() && pattern.matches_exact(trail) {
                found = Some(PathValue::new(
                    render_path(trail),
                    trail[trail.len() - 1].value.clone(),
                ));
            }
        });
        found.ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })
    }

    /// Return every node matching `pattern`, in document order.
    pub fn select(&self, pattern: &str) -> Result<Vec<PathValue>, StoreError> {
        let pattern = PathPattern::parse(pattern)?;
        let mut out = Vec::new();
        self.walk(|trail| {
            if pattern.matches(trail) {
                out.push(PathValue::new(
                    render_path(trail),
                    trail[trail.len() - 1].value.clone(),
                ));
            }
        });
        Ok(out)
    }

    /// Store `value` at `path`, creating missing containers and list
    /// instances on the way.
    pub fn set_item(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        let pattern = PathPattern::parse_exact(path)?;
        let Some((last, parents)) = pattern.steps.split_last() else {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: "path has no steps".to_string(),
            });
        };

        let mut siblings = &mut self.roots;
        for step in parents {
            let node = ensure_child_mut(siblings, step);
            if !node.value.is_interior() {
                return Err(StoreError::LeafInPath {
                    path: path.to_string(),
                    node: node.segment(),
                });
            }
            siblings = &mut node.children;
        }

        let Step::Named { name, keys } = last else {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: "wildcards are not allowed here".to_string(),
            });
        };

        if value.is_interior() {
            let node = ensure_child_mut(siblings, last);
            node.value = value;
            return Ok(());
        }
        if !keys.is_empty() {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: "a leaf cannot carry key predicates".to_string(),
            });
        }
        if let Some(pos) = siblings.iter().position(|c| last.matches_exact(c)) {
            let existing = &mut siblings[pos];
            if existing.value.is_interior() {
                return Err(StoreError::NotALeaf {
                    path: path.to_string(),
                    node: existing.segment(),
                });
            }
            existing.value = value;
        } else {
            siblings.push(DataNode::new(name.clone(), value));
        }
        Ok(())
    }
}

fn walk_nodes<'a>(
    nodes: &'a [DataNode],
    trail: &mut Vec<&'a DataNode>,
    visit: &mut impl FnMut(&[&'a DataNode]),
) {
    for node in nodes {
        trail.push(node);
        visit(trail.as_slice());
        walk_nodes(&node.children, trail, visit);
        trail.pop();
    }
}

/// Get or create the child addressed by `step`.
fn ensure_child_mut<'a>(siblings: &'a mut Vec<DataNode>, step: &Step) -> &'a mut DataNode {
    if let Some(pos) = siblings.iter().position(|c| step.matches_exact(c)) {
        return &mut siblings[pos];
    }
    let node = match step {
        Step::Named { name, keys } if keys.is_empty() => DataNode::container(name.clone()),
        Step::Named { name, keys } => DataNode::list_entry(name.clone(), keys.clone()),
        Step::Any => DataNode::container("*"),
    };
    siblings.push(node);
    let len = siblings.len();
    &mut siblings[len - 1]
}
