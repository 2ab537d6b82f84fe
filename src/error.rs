use lineage_sorter::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid layout options: {0}")]
    InvalidOptions(String),

    #[error("Node {0} appears more than once in the lineage")]
    DuplicateNode(NodeId),

    #[error("Node {child} starts before its parent {parent}")]
    TimeReversal { parent: NodeId, child: NodeId },

    #[error("Node {child} names unknown parent {parent}")]
    UnknownParent { child: NodeId, parent: NodeId },

    #[error("Node {0} is not reachable from any root")]
    DetachedNode(NodeId),

    #[error("Layout coordinates of node {0} do not fit the drawing range")]
    CoordinateOverflow(NodeId),

    #[error("Failed to read lineage: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
