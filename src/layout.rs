//! Tidy 2-D layout of a lineage tree with anatomically ordered daughters.
//!
//! Leaves take consecutive columns from left to right; every parent sits
//! centred above its first and last child, and the vertical position is the
//! node's time point. Which daughter comes first is decided by a
//! [`DescendantsSorter`], so the drawing follows the organism's orientation
//! rather than tracking order.

use lineage_sorter::{order_siblings, DescendantsSorter, GraphSink, NodeId, StrategyKind};
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::tree::{LineageNode, LineageTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Straight,
    /// Vertical drop with a horizontal run just above the child.
    Bended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub column_width: i32,
    pub row_height: i32,
    pub node_width: i32,
    pub node_height: i32,
    pub node_color: u32,
    pub line_style: LineStyle,
    pub bend_offset_y: i32,
    /// Draw the sorter's reference frame before the tree.
    pub export_debug_geometry: bool,
    /// Narrate every comparison through `tracing`.
    pub verbose_trace: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            column_width: 50,
            row_height: 10,
            node_width: lineage_sorter::sink::DEFAULT_NODE_WIDTH,
            node_height: lineage_sorter::sink::DEFAULT_NODE_HEIGHT,
            node_color: lineage_sorter::sink::DEFAULT_NODE_COLOR,
            line_style: LineStyle::Straight,
            bend_offset_y: lineage_sorter::sink::DEFAULT_BEND_OFFSET_Y,
            export_debug_geometry: false,
            verbose_trace: false,
        }
    }
}

impl LayoutOptions {
    pub fn validate(&self) -> Result<()> {
        if self.column_width <= 0 || self.row_height <= 0 {
            return Err(LayoutError::InvalidOptions(format!(
                "column width and row height must be positive, got {} and {}",
                self.column_width, self.row_height
            )));
        }
        if self.node_width <= 0 || self.node_height <= 0 {
            return Err(LayoutError::InvalidOptions(format!(
                "node size must be positive, got {}x{}",
                self.node_width, self.node_height
            )));
        }
        if self.node_color > 0xFF_FF_FF {
            return Err(LayoutError::InvalidOptions(format!(
                "node colour {:#x} is not a 24-bit RGB value",
                self.node_color
            )));
        }
        Ok(())
    }
}

/// Children of one branch point, in drawn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchOrder {
    pub parent: NodeId,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutSummary {
    pub strategy: StrategyKind,
    pub nodes: usize,
    pub leaves: usize,
    /// Nodes with two or more children.
    pub branch_points: usize,
    pub orders: Vec<BranchOrder>,
}

pub struct TreeLayout<'a> {
    sorter: &'a dyn DescendantsSorter,
    options: LayoutOptions,
}

impl<'a> TreeLayout<'a> {
    pub fn new(sorter: &'a dyn DescendantsSorter, options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { sorter, options })
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Daughters of `node` in drawn order.
    pub fn order_children<'n>(&self, node: &'n LineageNode) -> Vec<&'n LineageNode> {
        let mut children: Vec<&LineageNode> = node.children.iter().collect();
        if children.len() < 2 {
            return children;
        }
        if self.options.verbose_trace {
            children.sort_by(|a, b| self.sorter.compare_verbose(*a, *b));
        } else {
            order_siblings(self.sorter, &mut children);
        }
        tracing::debug!(
            parent = node.id,
            order = ?children.iter().map(|c| c.id).collect::<Vec<_>>(),
            "ordered daughters"
        );
        children
    }

    /// Reorder the children of every node in place.
    pub fn sort_tree(&self, tree: &mut LineageTree) {
        for root in &mut tree.roots {
            self.sort_subtree(root);
        }
    }

    fn sort_subtree(&self, node: &mut LineageNode) {
        let order: Vec<NodeId> = self.order_children(node).iter().map(|c| c.id).collect();
        node.children.sort_by_key(|c| order.iter().position(|id| *id == c.id));
        for child in &mut node.children {
            self.sort_subtree(child);
        }
    }

    /// Lay out `tree` into `sink`.
    ///
    /// Fails with [`LayoutError::CoordinateOverflow`] when a position leaves
    /// the `i32` drawing range; the sink then holds a partial drawing.
    pub fn layout(&self, tree: &LineageTree, sink: &mut dyn GraphSink) -> Result<LayoutSummary> {
        tree.validate()?;
        if self.options.export_debug_geometry {
            self.sorter.export_debug_graphics(sink);
        }

        let mut pass = Pass {
            layout: self,
            sink,
            next_column: 0,
            summary: LayoutSummary {
                strategy: self.sorter.strategy(),
                nodes: 0,
                leaves: 0,
                branch_points: 0,
                orders: Vec::new(),
            },
        };
        for root in &tree.roots {
            pass.place(root)?;
        }

        let summary = pass.summary;
        tracing::info!(
            strategy = %summary.strategy,
            nodes = summary.nodes,
            leaves = summary.leaves,
            branch_points = summary.branch_points,
            "laid out lineage"
        );
        Ok(summary)
    }
}

struct Pass<'l, 'a, 's> {
    layout: &'l TreeLayout<'a>,
    sink: &'s mut dyn GraphSink,
    next_column: i64,
    summary: LayoutSummary,
}

fn coordinate(value: i64, node: NodeId) -> Result<i32> {
    i32::try_from(value).map_err(|_| LayoutError::CoordinateOverflow(node))
}

impl Pass<'_, '_, '_> {
    /// Emit the sub-tree under `node` and return the node's position.
    fn place(&mut self, node: &LineageNode) -> Result<(i32, i32)> {
        let options = self.layout.options;
        let children = self.layout.order_children(node);

        let mut placed = Vec::with_capacity(children.len());
        for child in children {
            placed.push((child, self.place(child)?));
        }
        let x = match (placed.first(), placed.last()) {
            (Some((_, (first, _))), Some((_, (last, _)))) => {
                coordinate((i64::from(*first) + i64::from(*last)) / 2, node.id)?
            }
            _ => {
                let x = coordinate(self.next_column * i64::from(options.column_width), node.id)?;
                self.next_column += 1;
                self.summary.leaves += 1;
                x
            }
        };
        let y = coordinate(i64::from(node.time) * i64::from(options.row_height), node.id)?;

        let id = node.id.to_string();
        self.sink.add_node_sized(
            &id,
            &node.label,
            options.node_color,
            x,
            y,
            options.node_width,
            options.node_height,
        );
        self.summary.nodes += 1;

        for (child, (child_x, child_y)) in &placed {
            let child_id = child.id.to_string();
            match options.line_style {
                LineStyle::Straight => self.sink.add_straight_line(&id, &child_id),
                LineStyle::Bended => {
                    // the bend point itself must be drawable too
                    coordinate(
                        i64::from(*child_y) + i64::from(options.bend_offset_y),
                        child.id,
                    )?;
                    self.sink.add_bended_line_with_offset(
                        &id,
                        &child_id,
                        *child_x,
                        *child_y,
                        options.bend_offset_y,
                    );
                }
            }
        }

        if placed.len() > 1 {
            self.summary.branch_points += 1;
            self.summary.orders.push(BranchOrder {
                parent: node.id,
                children: placed.iter().map(|(c, _)| c.id).collect(),
            });
        }
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_sorter::{GraphElement, GraphRecorder, Point3D, SlicedSorter};

    fn sorter() -> SlicedSorter {
        SlicedSorter::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(0.0, 0.0, 10.0))
    }

    /// Root with an upper and a lower daughter, listed upper first.
    fn two_daughters() -> LineageTree {
        let upper = LineageNode::new(3, "upper", 2, Point3D::new(0.0, 5.0, 5.0));
        let lower = LineageNode::new(2, "lower", 2, Point3D::new(0.0, 5.0, 0.0));
        LineageTree::new(vec![LineageNode::new(1, "root", 0, Point3D::new(0.0, 5.0, 2.0))
            .with_children(vec![upper, lower])])
    }

    #[test]
    fn test_daughters_follow_sorter() {
        let sorter = sorter();
        let layout = TreeLayout::new(&sorter, LayoutOptions::default()).unwrap();
        let tree = two_daughters();

        let order: Vec<NodeId> = layout
            .order_children(&tree.roots[0])
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(order, vec![2, 3]);

        let mut sorted = tree.clone();
        layout.sort_tree(&mut sorted);
        assert_eq!(sorted.roots[0].children[0].id, 2);
        assert_eq!(sorted.node_count(), tree.node_count());
    }

    #[test]
    fn test_positions() {
        let sorter = sorter();
        let layout = TreeLayout::new(&sorter, LayoutOptions::default()).unwrap();
        let mut sink = GraphRecorder::new();
        let summary = layout.layout(&two_daughters(), &mut sink).unwrap();

        assert_eq!(sink.position_of("2"), Some((0, 20)));
        assert_eq!(sink.position_of("3"), Some((50, 20)));
        assert_eq!(sink.position_of("1"), Some((25, 0)));
        assert_eq!(sink.node_ids(), vec!["2", "3", "1"]);
        assert_eq!(sink.line_count(), 2);

        assert_eq!(summary.strategy, StrategyKind::Sliced);
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.leaves, 2);
        assert_eq!(summary.branch_points, 1);
        assert_eq!(
            summary.orders,
            vec![BranchOrder {
                parent: 1,
                children: vec![2, 3]
            }]
        );
    }

    #[test]
    fn test_forest_shares_columns() {
        let sorter = sorter();
        let layout = TreeLayout::new(&sorter, LayoutOptions::default()).unwrap();
        let mut tree = two_daughters();
        tree.roots
            .push(LineageNode::new(9, "loner", 1, Point3D::new(3.0, 3.0, 3.0)));

        let mut sink = GraphRecorder::new();
        let summary = layout.layout(&tree, &mut sink).unwrap();
        assert_eq!(sink.position_of("9"), Some((100, 10)));
        assert_eq!(summary.leaves, 3);
        assert_eq!(summary.branch_points, 1);
    }

    #[test]
    fn test_single_child_chain_stays_in_column() {
        let sorter = sorter();
        let layout = TreeLayout::new(&sorter, LayoutOptions::default()).unwrap();
        let tree = LineageTree::new(vec![LineageNode::new(1, "a", 0, Point3D::ORIGIN)
            .with_children(vec![LineageNode::new(2, "b", 1, Point3D::ORIGIN)])]);

        let mut sink = GraphRecorder::new();
        let summary = layout.layout(&tree, &mut sink).unwrap();
        assert_eq!(sink.position_of("1"), sink.position_of("2").map(|(x, _)| (x, 0)));
        assert_eq!(summary.branch_points, 0);
        assert!(summary.orders.is_empty());
    }

    #[test]
    fn test_bended_lines_and_styling() {
        let sorter = sorter();
        let options = LayoutOptions {
            column_width: 40,
            row_height: 5,
            node_width: 6,
            node_height: 4,
            node_color: 0xFF_00_00,
            line_style: LineStyle::Bended,
            bend_offset_y: -3,
            ..LayoutOptions::default()
        };
        let layout = TreeLayout::new(&sorter, options).unwrap();
        let mut sink = GraphRecorder::new();
        layout.layout(&two_daughters(), &mut sink).unwrap();

        assert!(sink.elements.contains(&GraphElement::BendedLine {
            from: "1".into(),
            to: "3".into(),
            bend_x: 40,
            bend_y: 7,
        }));
        assert!(matches!(
            sink.node("1"),
            Some(GraphElement::Node { color_rgb: 0xFF_00_00, width: 6, height: 4, .. })
        ));
    }

    #[test]
    fn test_debug_geometry_comes_first() {
        let sorter = sorter();
        let options = LayoutOptions {
            export_debug_geometry: true,
            verbose_trace: true,
            ..LayoutOptions::default()
        };
        let layout = TreeLayout::new(&sorter, options).unwrap();
        let mut sink = GraphRecorder::new();
        let summary = layout.layout(&two_daughters(), &mut sink).unwrap();

        assert_eq!(&sink.node_ids()[..2], &["South", "North"]);
        assert_eq!(summary.orders[0].children, vec![2, 3]);
    }

    #[test]
    fn test_rejects_bad_options() {
        let sorter = sorter();
        let options = LayoutOptions {
            column_width: 0,
            ..LayoutOptions::default()
        };
        assert!(matches!(
            TreeLayout::new(&sorter, options),
            Err(LayoutError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_empty_tree() {
        let sorter = sorter();
        let layout = TreeLayout::new(&sorter, LayoutOptions::default()).unwrap();
        let mut sink = GraphRecorder::new();
        let summary = layout.layout(&LineageTree::default(), &mut sink).unwrap();
        assert_eq!(summary.nodes, 0);
        assert!(sink.elements.is_empty());
    }

    #[test]
    fn test_time_beyond_drawing_range_is_an_error() {
        let sorter = sorter();
        let layout = TreeLayout::new(&sorter, LayoutOptions::default()).unwrap();
        let tree = LineageTree::new(vec![LineageNode::new(1, "late", 300_000_000, Point3D::ORIGIN)]);

        let mut sink = GraphRecorder::new();
        assert!(matches!(
            layout.layout(&tree, &mut sink),
            Err(LayoutError::CoordinateOverflow(1))
        ));
        assert!(sink.elements.is_empty());
    }

    #[test]
    fn test_bend_point_beyond_drawing_range_is_an_error() {
        let sorter = sorter();
        let early = -214_748_364;
        let tree = LineageTree::new(vec![LineageNode::new(1, "a", early, Point3D::ORIGIN)
            .with_children(vec![LineageNode::new(2, "b", early, Point3D::ORIGIN)])]);

        let straight = TreeLayout::new(&sorter, LayoutOptions::default()).unwrap();
        assert!(straight.layout(&tree, &mut GraphRecorder::new()).is_ok());

        let bended = TreeLayout::new(
            &sorter,
            LayoutOptions {
                line_style: LineStyle::Bended,
                ..LayoutOptions::default()
            },
        )
        .unwrap();
        assert!(matches!(
            bended.layout(&tree, &mut GraphRecorder::new()),
            Err(LayoutError::CoordinateOverflow(2))
        ));
    }

    #[test]
    fn test_deep_chain() {
        let depth = 300;
        let mut node = LineageNode::new(depth, "tip", depth as i32, Point3D::ORIGIN);
        for id in (1..depth).rev() {
            node = LineageNode::new(id, format!("n{id}"), id as i32, Point3D::ORIGIN)
                .with_children(vec![node]);
        }
        let tree = LineageTree::new(vec![node]);

        let sorter = sorter();
        let layout = TreeLayout::new(&sorter, LayoutOptions::default()).unwrap();
        let mut sink = GraphRecorder::new();
        let summary = layout.layout(&tree, &mut sink).unwrap();
        assert_eq!(summary.nodes, 300);
        assert_eq!(summary.leaves, 1);
        assert_eq!(sink.position_of("1"), Some((0, 10)));
        assert_eq!(sink.position_of("300"), Some((0, 3000)));
    }
}
