//! The sorter contract and the decision steps shared by every strategy.

use std::cmp::Ordering;

use lineage_spatial::{Point3D, Vector3D};

use crate::sink::GraphSink;
use crate::spot::Spot;
use crate::strategy::StrategyKind;
use crate::thresholds::Thresholds;
use crate::trace::{decide, Decision, LogTrace, NoTrace, TraceEvent, TraceSink};

/// Orders sibling sub-trees of a lineage against a landmark reference frame.
///
/// Implementations are immutable after construction, so one sorter can be
/// shared by threads ordering independent sibling lists.
pub trait DescendantsSorter: Send + Sync {
    fn strategy(&self) -> StrategyKind;

    /// Thresholds in effect for every comparison of this sorter.
    fn thresholds(&self) -> Thresholds;

    /// Order `d1` relative to `d2`, narrating each step into `trace`.
    ///
    /// `Less` means d1 is drawn before (left of / inside) d2, `Equal` that
    /// both are the same node.
    fn compare_traced(&self, d1: &dyn Spot, d2: &dyn Spot, trace: &mut dyn TraceSink)
        -> Ordering;

    /// Render the reference frame as extra labeled nodes.
    fn export_debug_graphics(&self, sink: &mut dyn GraphSink);

    fn compare(&self, d1: &dyn Spot, d2: &dyn Spot) -> Ordering {
        self.compare_traced(d1, d2, &mut NoTrace)
    }

    /// Same outcome as [`DescendantsSorter::compare`], logged through `tracing`.
    fn compare_verbose(&self, d1: &dyn Spot, d2: &dyn Spot) -> Ordering {
        self.compare_traced(d1, d2, &mut LogTrace)
    }
}

/// Sort a sibling list in place with `sorter`.
pub fn order_siblings<S: Spot>(sorter: &dyn DescendantsSorter, siblings: &mut [S]) {
    siblings.sort_by(|a, b| sorter.compare(a, b));
}

/// Announce the pair and apply the equality guard.
pub(crate) fn same_node_guard(
    d1: &dyn Spot,
    d2: &dyn Spot,
    trace: &mut dyn TraceSink,
) -> Option<Ordering> {
    if trace.enabled() {
        trace.emit(TraceEvent::Comparing {
            first: d1.label().to_string(),
            second: d2.label().to_string(),
        });
    }
    if d1.id() == d2.id() {
        return Some(decide(trace, Ordering::Equal, Decision::SameNode));
    }
    None
}

/// Result of the layering phase.
pub(crate) enum Layering {
    Decided(Ordering),
    /// Neither daughter is markedly nearer the centre; carries the unit
    /// direction d1→d2 and the normal of the (d1, d2, centre) plane.
    SideBySide {
        d1_to_d2: Vector3D,
        triangle_up: Vector3D,
    },
}

/// Phase 1: is one daughter a layer nearer the query centre than the other?
pub(crate) fn layering_phase(
    d1: Point3D,
    d2: Point3D,
    centre: Point3D,
    thresholds: &Thresholds,
    trace: &mut dyn TraceSink,
) -> Layering {
    let to_centre = centre - d1;
    if to_centre == Vector3D::ZERO {
        // d1 is the centre itself, hence the inner one
        return Layering::Decided(decide(trace, Ordering::Less, Decision::FirstAtCentre));
    }

    let d1_to_d2 = (d2 - d1).normalize();
    let d1_to_centre = to_centre.normalize();

    let angle_deg = d1_to_centre.unit_angle_deg(&d1_to_d2);
    trace.emit(TraceEvent::Layering { angle_deg });

    // the tree of the daughter nearer the centre is drawn first
    if angle_deg <= thresholds.layering_lower_deg() {
        return Layering::Decided(decide(trace, Ordering::Greater, Decision::InnerLayer));
    }
    if angle_deg >= thresholds.layering_upper_deg() {
        return Layering::Decided(decide(trace, Ordering::Less, Decision::OuterLayer));
    }

    // right-hand rule: from d1→d2 towards d1→centre
    let triangle_up = d1_to_d2.cross(&d1_to_centre).normalize();
    trace.emit(TraceEvent::TriangleUp(triangle_up));

    Layering::SideBySide {
        d1_to_d2,
        triangle_up,
    }
}

pub(crate) const DEBUG_ORIGIN_X: i32 = -100;
pub(crate) const DEBUG_ROW_SPACING: i32 = 40;

/// Debug geometry is stacked in one column left of the tree.
pub(crate) fn add_debug_node(
    sink: &mut dyn GraphSink,
    row: i32,
    id: &str,
    label: &str,
    color_rgb: u32,
) {
    sink.add_node(id, label, color_rgb, DEBUG_ORIGIN_X, row * DEBUG_ROW_SPACING);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spot::FixedSpot;
    use crate::trace::decision_of;

    #[test]
    fn test_same_node_guard() {
        let a = FixedSpot::new(1, "a", Point3D::ORIGIN);
        let a_again = FixedSpot::new(1, "a'", Point3D::new(5.0, 0.0, 0.0));
        let b = FixedSpot::new(2, "b", Point3D::ORIGIN);

        let mut events = Vec::new();
        assert_eq!(same_node_guard(&a, &a_again, &mut events), Some(Ordering::Equal));
        assert_eq!(decision_of(&events), Some(Decision::SameNode));

        assert_eq!(same_node_guard(&a, &b, &mut NoTrace), None);
    }

    #[test]
    fn test_layering_inner_when_d2_at_centre() {
        let mut events = Vec::new();
        let outcome = layering_phase(
            Point3D::new(1.0, 2.0, 3.0),
            Point3D::ORIGIN,
            Point3D::ORIGIN,
            &Thresholds::FULL_FRAME,
            &mut events,
        );
        assert!(matches!(outcome, Layering::Decided(Ordering::Greater)));
        assert_eq!(decision_of(&events), Some(Decision::InnerLayer));
    }

    #[test]
    fn test_layering_first_at_centre() {
        let outcome = layering_phase(
            Point3D::ORIGIN,
            Point3D::new(1.0, 2.0, 3.0),
            Point3D::ORIGIN,
            &Thresholds::FULL_FRAME,
            &mut NoTrace,
        );
        assert!(matches!(outcome, Layering::Decided(Ordering::Less)));
    }

    #[test]
    fn test_layering_outer() {
        // d2 straight away from the centre
        let outcome = layering_phase(
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(2.0, 0.0, 0.0),
            Point3D::ORIGIN,
            &Thresholds::FULL_FRAME,
            &mut NoTrace,
        );
        assert!(matches!(outcome, Layering::Decided(Ordering::Less)));
    }

    #[test]
    fn test_layering_side_by_side_normal() {
        let outcome = layering_phase(
            Point3D::new(1.0, 0.0, 1.0),
            Point3D::new(1.0, 0.0, -1.0),
            Point3D::ORIGIN,
            &Thresholds::FULL_FRAME,
            &mut NoTrace,
        );
        match outcome {
            Layering::SideBySide {
                d1_to_d2,
                triangle_up,
            } => {
                assert_eq!(d1_to_d2, Vector3D::new(0.0, 0.0, -1.0));
                assert!((triangle_up - Vector3D::Y).magnitude() < 1e-12);
            }
            Layering::Decided(o) => panic!("expected side-by-side, got {o:?}"),
        }
    }
}
