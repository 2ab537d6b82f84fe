//! Landmark-anchored ordering of sibling sub-trees in a 3D lineage.
//!
//! At every branch point of a lineage tree the two daughters are ordered so
//! that the drawn tree follows the anatomical orientation of the tracked
//! organism rather than insertion order. The ordering is computed against a
//! reference frame built once from a few landmark positions:
//!
//! - **Full frame** ([`FullFrameSorter`]): centre plus three orthonormal axes
//!   from north, south and east landmarks.
//! - **Sliced** ([`SlicedSorter`]): a single south→north axis anchored at the
//!   south pole.
//! - **Poles** ([`PolesSorter`]): the same axis direction through a separate
//!   centre landmark.
//!
//! Each comparison first checks whether one daughter is a layer nearer the
//! query centre, then tells side-by-side daughters apart using the frame's
//! axes. The verbose variant narrates every step into a [`TraceSink`] and is
//! guaranteed to reach the same outcome.
//!
//! # Usage
//!
//! ```ignore
//! use lineage_sorter::{DescendantsSorter, Landmarks, Sorter, StrategyKind};
//!
//! let sorter = Sorter::from_landmarks(StrategyKind::Sliced, &landmarks, None)?;
//! let mut daughters = vec![left, right];
//! lineage_sorter::order_siblings(&sorter, &mut daughters);
//! ```

pub mod axial;
pub mod error;
pub mod full_frame;
pub mod sink;
pub mod sorter;
pub mod spot;
pub mod strategy;
pub mod thresholds;
pub mod trace;

pub use axial::{AxialFrame, PolesSorter, SlicedSorter};
pub use error::{Result, SorterError};
pub use full_frame::{Axis, FullFrame, FullFrameSorter};
pub use sink::{GraphElement, GraphRecorder, GraphSink};
pub use sorter::{order_siblings, DescendantsSorter};
pub use spot::{FixedSpot, NodeId, Spot};
pub use strategy::{Landmarks, Sorter, StrategyKind};
pub use thresholds::Thresholds;
pub use trace::{decision_of, Decision, LogTrace, NoTrace, TraceEvent, TraceSink};

pub use lineage_spatial::{Point3D, Vector3D};
