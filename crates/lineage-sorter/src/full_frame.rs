//! Full-frame strategy: a centre and three orthonormal axes built from the
//! north pole, south pole and an east landmark.

use std::cmp::Ordering;
use std::fmt;

use lineage_spatial::{Point3D, Vector3D};

use crate::error::{Result, SorterError};
use crate::sink::GraphSink;
use crate::sorter::{add_debug_node, layering_phase, same_node_guard, DescendantsSorter, Layering};
use crate::spot::Spot;
use crate::strategy::StrategyKind;
use crate::thresholds::Thresholds;
use crate::trace::{decide, Decision, TraceEvent, TraceSink};

/// Relative lateral offset of the east landmark below which the frame is
/// considered degenerate by [`FullFrameSorter::try_new`].
const COLLINEARITY_TOLERANCE: f64 = 1e-9;

/// Axes of a [`FullFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// South to north.
    A,
    /// Towards east, orthogonal to A.
    B,
    /// A × B.
    C,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::A, Axis::B, Axis::C];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::A => write!(f, "A"),
            Axis::B => write!(f, "B"),
            Axis::C => write!(f, "C"),
        }
    }
}

/// Centre plus a right-handed orthonormal basis (C = A × B).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullFrame {
    centre: Point3D,
    axis_a: Vector3D,
    axis_b: Vector3D,
    axis_c: Vector3D,
}

impl FullFrame {
    /// Build the frame. Collinear landmarks leave axes B and C non-finite.
    pub fn new(north: Point3D, south: Point3D, east: Point3D) -> Self {
        let centre = south.midpoint(&north);
        let axis_a = (north - south).normalize();

        // drop the A component of the east offset, keep the part pointing
        // from the east's foot on axis A towards east
        let east_offset = east - centre;
        let foot = centre + axis_a * east_offset.dot(&axis_a);
        let axis_b = (east - foot).normalize();

        let axis_c = axis_a.cross(&axis_b);

        Self {
            centre,
            axis_a,
            axis_b,
            axis_c,
        }
    }

    pub fn centre(&self) -> Point3D {
        self.centre
    }

    pub fn axis(&self, axis: Axis) -> Vector3D {
        match axis {
            Axis::A => self.axis_a,
            Axis::B => self.axis_b,
            Axis::C => self.axis_c,
        }
    }

    /// Whether every component of the frame is finite.
    pub fn is_finite(&self) -> bool {
        self.centre.is_finite()
            && self.axis_a.is_finite()
            && self.axis_b.is_finite()
            && self.axis_c.is_finite()
    }

    /// The axis (in either polarity) most parallel to `normal`.
    ///
    /// Candidates are scanned C, B, A with the positive orientation first;
    /// a candidate must beat the best angle so far (initially 90°) strictly,
    /// so earlier candidates win ties. Returns `(axis, positive, angle_deg)`;
    /// `axis` is `None` only when no angle is below 90°, i.e. for
    /// non-finite input.
    pub fn most_parallel_axis(&self, normal: &Vector3D) -> (Option<Axis>, bool, f64) {
        let candidates = [
            (Axis::C, self.axis_c),
            (Axis::B, self.axis_b),
            (Axis::A, self.axis_a),
        ];

        let mut best_angle = 90.0;
        let mut best_axis = None;
        let mut positive = true;

        for (axis, direction) in candidates {
            let angle = direction.unit_angle_deg(normal);
            if angle < best_angle {
                best_axis = Some(axis);
                positive = true;
                best_angle = angle;
            }
            if angle > 180.0 - best_angle {
                best_axis = Some(axis);
                positive = false;
                best_angle = 180.0 - angle;
            }
        }

        (best_axis, positive, best_angle)
    }

    fn east_is_off_axis(north: Point3D, south: Point3D, east: Point3D) -> bool {
        let span = north - south;
        let span_len = span.magnitude();
        if !(span_len > 0.0) {
            return false;
        }
        let lateral = span.cross(&(east - south)).magnitude() / span_len;
        lateral > COLLINEARITY_TOLERANCE * span_len
    }
}

/// Sorter anchored on a [`FullFrame`].
#[derive(Debug, Clone)]
pub struct FullFrameSorter {
    frame: FullFrame,
    thresholds: Thresholds,
}

impl FullFrameSorter {
    /// Build the sorter with [`Thresholds::FULL_FRAME`].
    ///
    /// Collinear landmarks are not rejected: the frame turns non-finite and
    /// comparisons return arbitrary (but total) orderings. A warning is
    /// logged in that case; use [`FullFrameSorter::try_new`] to fail instead.
    pub fn new(north: Point3D, south: Point3D, east: Point3D) -> Self {
        let frame = FullFrame::new(north, south, east);
        if !frame.is_finite() {
            tracing::warn!(
                %north, %south, %east,
                "full-frame landmarks are collinear, orderings will be meaningless"
            );
        }
        Self {
            frame,
            thresholds: Thresholds::FULL_FRAME,
        }
    }

    /// Build the sorter, refusing collinear or coincident landmarks.
    pub fn try_new(north: Point3D, south: Point3D, east: Point3D) -> Result<Self> {
        if north == south {
            return Err(SorterError::DegenerateLandmarks(format!(
                "north and south poles coincide at {north}"
            )));
        }
        if !FullFrame::east_is_off_axis(north, south, east) {
            return Err(SorterError::DegenerateLandmarks(format!(
                "east landmark {east} lies on the pole axis {south} -> {north}"
            )));
        }
        let sorter = Self::new(north, south, east);
        if !sorter.frame.is_finite() {
            return Err(SorterError::DegenerateLandmarks(
                "reference frame is not finite".to_string(),
            ));
        }
        Ok(sorter)
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn frame(&self) -> &FullFrame {
        &self.frame
    }
}

impl DescendantsSorter for FullFrameSorter {
    fn strategy(&self) -> StrategyKind {
        StrategyKind::FullFrame
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
        if let Some(same) = same_node_guard(d1, d2, trace) {
            return same;
        }

        let thresholds = self.thresholds;
        let centre = self.frame.centre;
        trace.emit(TraceEvent::QueryCentre(centre));

        let triangle_up = match layering_phase(d1.position(), d2.position(), centre, &thresholds, trace)
        {
            Layering::Decided(outcome) => return outcome,
            Layering::SideBySide { triangle_up, .. } => triangle_up,
        };

        // the frame axis most aligned with the local division-plane normal
        // acts as the "up" reference of this branch
        let (axis, positive, angle_deg) = self.frame.most_parallel_axis(&triangle_up);
        trace.emit(TraceEvent::BestAxis {
            axis,
            positive,
            angle_deg,
        });

        let outcome = if positive {
            Ordering::Less
        } else {
            Ordering::Greater
        };
        decide(trace, outcome, Decision::BestAxis)
    }

    fn export_debug_graphics(&self, sink: &mut dyn GraphSink) {
        let frame = &self.frame;
        add_debug_node(sink, 0, "Centre", &format!("centre at {}", frame.centre), 0x80_80_80);
        add_debug_node(sink, 1, "A", &format!("A at {}", frame.axis_a * 100.0), 0xCC_00_00);
        add_debug_node(sink, 2, "B", &format!("B at {}", frame.axis_b * 100.0), 0x00_AA_00);
        add_debug_node(sink, 3, "C", &format!("C at {}", frame.axis_c * 100.0), 0x00_00_CC);
        for axis in ["A", "B", "C"] {
            sink.add_straight_line("Centre", axis);
        }
    }
}
