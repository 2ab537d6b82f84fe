//! Tracked nodes as seen by the comparators.

use lineage_spatial::Point3D;

/// Identifier of a node in the lineage graph.
pub type NodeId = u64;

/// A tracked object whose current position can be queried.
///
/// Comparators call [`Spot::position`] on every comparison and never cache
/// it, so the ordering always reflects the object's current state.
pub trait Spot {
    /// Identity used by the equality guard; two handles with the same id are
    /// the same node.
    fn id(&self) -> NodeId;

    /// Human-readable label, used only for trace output.
    fn label(&self) -> &str;

    /// Current position.
    fn position(&self) -> Point3D;
}

impl<T: Spot + ?Sized> Spot for &T {
    fn id(&self) -> NodeId {
        (**self).id()
    }

    fn label(&self) -> &str {
        (**self).label()
    }

    fn position(&self) -> Point3D {
        (**self).position()
    }
}

/// A node with a fixed position, handy for landmarks and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSpot {
    pub id: NodeId,
    pub label: String,
    pub position: Point3D,
}

impl FixedSpot {
    pub fn new(id: NodeId, label: impl Into<String>, position: Point3D) -> Self {
        Self {
            id,
            label: label.into(),
            position,
        }
    }
}

impl Spot for FixedSpot {
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
