//! Lay out 3D cell lineage trees so that sister branches follow the
//! organism's anatomy.
//!
//! [`LineageTree`] holds the tracked cells, [`TreeLayout`] draws them into any
//! [`GraphSink`] while a [`DescendantsSorter`] decides which daughter of every
//! division goes left.
//!
//! ```ignore
//! use lineage_order::{LayoutOptions, LineageTree, TreeLayout};
//! use lineage_order::sorter::{GraphRecorder, SlicedSorter, Point3D};
//!
//! let sorter = SlicedSorter::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(0.0, 0.0, 10.0));
//! let tree = LineageTree::from_json(&json)?;
//! let mut sink = GraphRecorder::new();
//! let summary = TreeLayout::new(&sorter, LayoutOptions::default())?.layout(&tree, &mut sink)?;
//! ```

pub mod error;
pub mod layout;
pub mod tree;

pub use error::{LayoutError, Result};
pub use layout::{BranchOrder, LayoutOptions, LayoutSummary, LineStyle, TreeLayout};
pub use tree::{LineageNode, LineageTree};

pub use lineage_sorter as sorter;
pub use lineage_sorter::{DescendantsSorter, GraphSink};
