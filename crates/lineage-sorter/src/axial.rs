//! Single-axis strategies: one oriented south→north axis serves as the
//! observer's up vector and as the normal of every examined plane, so the
//! planes are parallel slices along the axis.
//!
//! [`SlicedSorter`] anchors the axis at the south pole; [`PolesSorter`] runs
//! the same axis direction through a separate centre landmark.

use std::cmp::Ordering;

use lineage_spatial::{Point3D, Vector3D};

use crate::sink::GraphSink;
use crate::sorter::{add_debug_node, layering_phase, same_node_guard, DescendantsSorter, Layering};
use crate::spot::Spot;
use crate::strategy::StrategyKind;
use crate::thresholds::Thresholds;
use crate::trace::{decide, Decision, TraceEvent, TraceSink};

/// An oriented up axis through an anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxialFrame {
    up: Vector3D,
    anchor: Point3D,
}

impl AxialFrame {
    /// Axis oriented from `south` to `north`, passing through `anchor`.
    pub fn new(south: Point3D, north: Point3D, anchor: Point3D) -> Self {
        Self {
            up: (north - south).normalize(),
            anchor,
        }
    }

    pub fn up(&self) -> Vector3D {
        self.up
    }

    pub fn anchor(&self) -> Point3D {
        self.anchor
    }

    pub fn is_finite(&self) -> bool {
        self.up.is_finite() && self.anchor.is_finite()
    }

    /// Midpoint of the pair, projected orthogonally onto the axis.
    pub fn query_centre(&self, d1: Point3D, d2: Point3D) -> Point3D {
        d1.midpoint(&d2).project_onto_line(&self.anchor, &self.up)
    }

    fn compare(
        &self,
        thresholds: &Thresholds,
        d1: &dyn Spot,
        d2: &dyn Spot,
        trace: &mut dyn TraceSink,
    ) -> Ordering {
        if let Some(same) = same_node_guard(d1, d2, trace) {
            return same;
        }

        let p1 = d1.position();
        let p2 = d2.position();

        let centre = self.query_centre(p1, p2);
        trace.emit(TraceEvent::QueryCentre(centre));
        if trace.enabled() {
            let cosine = (p1.midpoint(&p2) - centre).normalize().dot(&self.up);
            trace.emit(TraceEvent::ProjectionCheck { cosine });
        }

        let (d1_to_d2, triangle_up) = match layering_phase(p1, p2, centre, thresholds, trace) {
            Layering::Decided(outcome) => return outcome,
            Layering::SideBySide {
                d1_to_d2,
                triangle_up,
            } => (d1_to_d2, triangle_up),
        };

        let lr_cutoff = thresholds.left_right_cutoff_deg();
        let angle_deg = triangle_up.unit_angle_deg(&self.up);

        if angle_deg < lr_cutoff {
            // normals nearly parallel: d1 is left of d2
            trace.emit(TraceEvent::LeftRight {
                angle_deg,
                parallel: true,
            });
            return decide(trace, Ordering::Less, Decision::LeftRight);
        }
        if angle_deg > 180.0 - lr_cutoff {
            trace.emit(TraceEvent::LeftRight {
                angle_deg,
                parallel: false,
            });
            return decide(trace, Ordering::Greater, Decision::LeftRight);
        }

        // the pair differs mainly along the axis: lower one first
        let along_up = d1_to_d2.dot(&self.up);
        trace.emit(TraceEvent::UpDown {
            perpendicularity_deg: angle_deg,
            along_up,
        });
        let outcome = if along_up > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        };
        decide(trace, outcome, Decision::UpDown)
    }
}

/// Sorter on the axis through the south and north poles.
#[derive(Debug, Clone)]
pub struct SlicedSorter {
    frame: AxialFrame,
    south: Point3D,
    north: Point3D,
    thresholds: Thresholds,
}

impl SlicedSorter {
    /// Build the sorter with [`Thresholds::AXIAL`].
    pub fn new(south: Point3D, north: Point3D) -> Self {
        let frame = AxialFrame::new(south, north, south);
        if !frame.is_finite() {
            tracing::warn!(%south, %north, "poles coincide, orderings will be meaningless");
        }
        Self {
            frame,
            south,
            north,
            thresholds: Thresholds::AXIAL,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn frame(&self) -> &AxialFrame {
        &self.frame
    }
}

impl DescendantsSorter for SlicedSorter {
    fn strategy(&self) -> StrategyKind {
        StrategyKind::Sliced
    }

    fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    fn compare_traced(
        &self,
        d1: &dyn Spot,
        d2: &dyn Spot,
        trace: &mut dyn TraceSink,
    ) -> Ordering {
        self.frame.compare(&self.thresholds, d1, d2, trace)
    }

    fn export_debug_graphics(&self, sink: &mut dyn GraphSink) {
        // south doubles as the axis anchor
        add_debug_node(sink, 0, "South", &format!("south at {}", self.south), 0x33_66_FF);
        add_debug_node(sink, 1, "North", &format!("north at {}", self.north), 0xFF_66_33);
        sink.add_straight_line("South", "North");
    }
}

/// Sorter on the south→north direction running through a centre landmark.
#[derive(Debug, Clone)]
pub struct PolesSorter {
    frame: AxialFrame,
    south: Point3D,
    north: Point3D,
    thresholds: Thresholds,
}

impl PolesSorter {
    /// Build the sorter with [`Thresholds::AXIAL`].
    pub fn new(centre: Point3D, south: Point3D, north: Point3D) -> Self {
        let frame = AxialFrame::new(south, north, centre);
        if !frame.is_finite() {
            tracing::warn!(%south, %north, "poles coincide, orderings will be meaningless");
        }
        Self {
            frame,
            south,
            north,
            thresholds: Thresholds::AXIAL,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn frame(&self) -> &AxialFrame {
        &self.frame
    }
}

impl DescendantsSorter for PolesSorter {
    fn strategy(&self) -> StrategyKind {
        StrategyKind::Poles
    }

    fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    fn compare_traced(
        &self,
        d1: &dyn Spot,
        d2: &dyn Spot,
        trace: &mut dyn TraceSink,
    ) -> Ordering {
        self.frame.compare(&self.thresholds, d1, d2, trace)
    }

    fn export_debug_graphics(&self, sink: &mut dyn GraphSink) {
        let centre = self.frame.anchor;
        add_debug_node(sink, 0, "Centre", &format!("centre at {centre}"), 0x80_80_80);
        add_debug_node(sink, 1, "South", &format!("south at {}", self.south), 0x33_66_FF);
        add_debug_node(sink, 2, "North", &format!("north at {}", self.north), 0xFF_66_33);
        sink.add_straight_line("Centre", "South");
        sink.add_straight_line("Centre", "North");
    }
}
