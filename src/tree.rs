//! Lineage trees as read from disk.
//!
//! On disk a lineage is a flat list of node records, each naming its parent:
//!
//! ```json
//! { "nodes": [
//!     { "id": 1, "label": "P0", "time": 0, "position": { "x": 0.0, "y": 0.0, "z": 0.0 } },
//!     { "id": 2, "parent": 1, "time": 4, "position": { "x": 1.0, "y": 0.0, "z": 0.0 } }
//! ] }
//! ```
//!
//! Records without a parent are roots. Siblings keep the order in which they
//! are listed. The flat form keeps arbitrarily deep lineages within the JSON
//! nesting limit.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use lineage_sorter::{NodeId, Point3D, Spot};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LayoutError, Result};

/// One tracked cell and its daughters.
#[derive(Debug, Clone, PartialEq)]
pub struct LineageNode {
    pub id: NodeId,
    pub label: String,
    /// Time point at which the node appears.
    pub time: i32,
    pub position: Point3D,
    pub children: Vec<LineageNode>,
}

impl LineageNode {
    pub fn new(id: NodeId, label: impl Into<String>, time: i32, position: Point3D) -> Self {
        Self {
            id,
            label: label.into(),
            time,
            position,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<LineageNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Nodes in this sub-tree, including itself.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth-first, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = &LineageNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

impl Spot for LineageNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn position(&self) -> Point3D {
        self.position
    }
}

/// A node as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub time: i32,
    pub position: Point3D,
}

#[derive(Serialize, Deserialize)]
struct LineageFile {
    nodes: Vec<NodeRecord>,
}

/// A forest of lineages, one root per initially tracked cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineageTree {
    pub roots: Vec<LineageNode>,
}

impl LineageTree {
    pub fn new(roots: Vec<LineageNode>) -> Self {
        Self { roots }
    }

    /// Parse and validate a tree from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: LineageFile = serde_json::from_str(json)?;
        Self::from_records(file.nodes)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: LineageFile = serde_json::from_reader(reader)?;
        Self::from_records(file.nodes)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Assemble the forest from parent-linked records.
    pub fn from_records(records: Vec<NodeRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(record.id, i).is_some() {
                return Err(LayoutError::DuplicateNode(record.id));
            }
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut roots = Vec::new();
        for (i, record) in records.iter().enumerate() {
            match record.parent {
                None => roots.push(i),
                Some(parent) => {
                    let &p = index.get(&parent).ok_or(LayoutError::UnknownParent {
                        child: record.id,
                        parent,
                    })?;
                    children[p].push(i);
                }
            }
        }

        // parents always precede their children in `reached`
        let mut reached = Vec::with_capacity(records.len());
        let mut stack = roots.clone();
        while let Some(i) = stack.pop() {
            reached.push(i);
            stack.extend(children[i].iter().copied());
        }
        if reached.len() != records.len() {
            let seen: HashSet<usize> = reached.iter().copied().collect();
            if let Some(stray) = (0..records.len()).find(|i| !seen.contains(i)) {
                return Err(LayoutError::DetachedNode(records[stray].id));
            }
        }

        let mut pending: Vec<Option<NodeRecord>> = records.into_iter().map(Some).collect();
        let mut built: Vec<Option<LineageNode>> = pending.iter().map(|_| None).collect();
        for &i in reached.iter().rev() {
            let Some(record) = pending[i].take() else {
                continue;
            };
            let kids = children[i].iter().filter_map(|&c| built[c].take()).collect();
            built[i] = Some(LineageNode {
                id: record.id,
                label: record.label,
                time: record.time,
                position: record.position,
                children: kids,
            });
        }

        let tree = Self {
            roots: roots.iter().filter_map(|&i| built[i].take()).collect(),
        };
        tree.validate()?;
        Ok(tree)
    }

    /// Flatten into records, parents before children.
    pub fn to_records(&self) -> Vec<NodeRecord> {
        let mut records = Vec::new();
        let mut stack: Vec<(&LineageNode, Option<NodeId>)> =
            self.roots.iter().rev().map(|r| (r, None)).collect();
        while let Some((node, parent)) = stack.pop() {
            records.push(NodeRecord {
                id: node.id,
                parent,
                label: node.label.clone(),
                time: node.time,
                position: node.position,
            });
            stack.extend(node.children.iter().rev().map(|c| (c, Some(node.id))));
        }
        records
    }

    /// Node ids must be unique, and time must not run backwards from a
    /// parent to its children.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for node in self.iter() {
            if !seen.insert(node.id) {
                return Err(LayoutError::DuplicateNode(node.id));
            }
            if let Some(child) = node.children.iter().find(|c| c.time < node.time) {
                return Err(LayoutError::TimeReversal {
                    parent: node.id,
                    child: child.id,
                });
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineageNode> {
        self.roots.iter().flat_map(LineageNode::iter)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl Serialize for LineageTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        LineageFile {
            nodes: self.to_records(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LineageTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let file = LineageFile::deserialize(deserializer)?;
        Self::from_records(file.nodes).map_err(serde::de::Error::custom)
    }
}
