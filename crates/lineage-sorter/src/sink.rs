//! Minimal graph drawing interface.
//!
//! Coordinates are 2-D layout units: x grows to the right, y grows downwards
//! with time. Colours are packed `0xRRGGBB`.

/// Default node width when none is given.
pub const DEFAULT_NODE_WIDTH: i32 = 10;
/// Default node height when none is given.
pub const DEFAULT_NODE_HEIGHT: i32 = 10;
/// Default vertical offset of a bend point, relative to the target node.
pub const DEFAULT_BEND_OFFSET_Y: i32 = -20;
/// Default node colour.
pub const DEFAULT_NODE_COLOR: u32 = 0x00_99_CC;

/// Receiver of layout primitives: an in-process viewer, a recorder, or a
/// process streaming to a remote renderer.
pub trait GraphSink {
    fn add_node(&mut self, id: &str, label: &str, color_rgb: u32, x: i32, y: i32) {
        self.add_node_sized(
            id,
            label,
            color_rgb,
            x,
            y,
            DEFAULT_NODE_WIDTH,
            DEFAULT_NODE_HEIGHT,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn add_node_sized(
        &mut self,
        id: &str,
        label: &str,
        color_rgb: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    );

    fn add_straight_line(&mut self, from_id: &str, to_id: &str);

    fn add_bended_line(&mut self, from_id: &str, to_id: &str, to_x: i32, to_y: i32) {
        self.add_bended_line_with_offset(from_id, to_id, to_x, to_y, DEFAULT_BEND_OFFSET_Y);
    }

    /// Line that leaves `from_id`, bends at `(to_x, to_y + bend_offset_y)` and
    /// ends in `to_id`.
    fn add_bended_line_with_offset(
        &mut self,
        from_id: &str,
        to_id: &str,
        to_x: i32,
        to_y: i32,
        bend_offset_y: i32,
    );
}

/// A primitive captured by [`GraphRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphElement {
    Node {
        id: String,
        label: String,
        color_rgb: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    StraightLine {
        from: String,
        to: String,
    },
    BendedLine {
        from: String,
        to: String,
        bend_x: i32,
        bend_y: i32,
    },
}

/// Sink that keeps every primitive in memory.
#[derive(Debug, Default, Clone)]
pub struct GraphRecorder {
    pub elements: Vec<GraphElement>,
}

impl GraphRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded node with the given id.
    pub fn node(&self, id: &str) -> Option<&GraphElement> {
        self.elements
            .iter()
            .find(|e| matches!(e, GraphElement::Node { id: node_id, .. } if node_id == id))
    }

    /// Ids of all recorded nodes, in emission order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                GraphElement::Node { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Layout position of a recorded node.
    pub fn position_of(&self, id: &str) -> Option<(i32, i32)> {
        match self.node(id)? {
            GraphElement::Node { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    /// Number of recorded lines of either kind.
    pub fn line_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| !matches!(e, GraphElement::Node { .. }))
            .count()
    }
}

impl GraphSink for GraphRecorder {
    fn add_node_sized(
        &mut self,
        id: &str,
        label: &str,
        color_rgb: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        self.elements.push(GraphElement::Node {
            id: id.to_string(),
            label: label.to_string(),
            color_rgb,
            x,
            y,
            width,
            height,
        });
    }

    fn add_straight_line(&mut self, from_id: &str, to_id: &str) {
        self.elements.push(GraphElement::StraightLine {
            from: from_id.to_string(),
            to: to_id.to_string(),
        });
    }

    fn add_bended_line_with_offset(
        &mut self,
        from_id: &str,
        to_id: &str,
        to_x: i32,
        to_y: i32,
        bend_offset_y: i32,
    ) {
        self.elements.push(GraphElement::BendedLine {
            from: from_id.to_string(),
            to: to_id.to_string(),
            bend_x: to_x,
            bend_y: to_y.saturating_add(bend_offset_y),
        });
    }
}
