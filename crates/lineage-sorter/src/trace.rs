//! Narration of comparator decisions.
//!
//! Every comparator runs one algorithm parameterized by a [`TraceSink`]. The
//! plain comparator passes [`NoTrace`]; the verbose one passes a sink that
//! records or logs each step. Sinks only observe: they never change the
//! outcome.

use std::cmp::Ordering;
use std::fmt;

use lineage_spatial::{Point3D, Vector3D};

use crate::full_frame::Axis;

/// Which rule settled a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Both handles denote the same node.
    SameNode,
    /// d1 sits exactly on the query centre.
    FirstAtCentre,
    /// d2 lies towards the query centre from d1.
    InnerLayer,
    /// d2 lies away from the query centre.
    OuterLayer,
    /// Full-frame: the frame axis most parallel to the division-plane normal.
    BestAxis,
    /// Single-axis: division-plane normal (anti)parallel to the up axis.
    LeftRight,
    /// Single-axis: pair separated along the up axis.
    UpDown,
}

impl Decision {
    /// Whether the comparison was settled by the side-by-side phase.
    pub fn is_side_by_side(&self) -> bool {
        matches!(self, Decision::BestAxis | Decision::LeftRight | Decision::UpDown)
    }
}

/// One step of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Comparing {
        first: String,
        second: String,
    },
    /// Query centre used by the layering test.
    QueryCentre(Point3D),
    /// Cosine between the pair-midpoint offset and the up axis; ~0 when the
    /// projection is orthogonal.
    ProjectionCheck {
        cosine: f64,
    },
    /// Angle at d1 between the directions to d2 and to the query centre.
    Layering {
        angle_deg: f64,
    },
    /// Normal of the plane through d1, d2 and the query centre.
    TriangleUp(Vector3D),
    BestAxis {
        axis: Option<Axis>,
        positive: bool,
        angle_deg: f64,
    },
    LeftRight {
        angle_deg: f64,
        parallel: bool,
    },
    UpDown {
        /// Angle between the triangle normal and the up axis.
        perpendicularity_deg: f64,
        /// Cosine between d1→d2 and the up axis.
        along_up: f64,
    },
    Decided {
        outcome: Ordering,
        by: Decision,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Comparing { first, second } => {
                write!(f, "comparing {first} and {second}")
            }
            TraceEvent::QueryCentre(centre) => write!(f, "query centre at {centre}"),
            TraceEvent::ProjectionCheck { cosine } => {
                write!(f, "cos(midpoint offset, up axis), should be zero: {cosine:.6}")
            }
            TraceEvent::Layering { angle_deg } => write!(f, "layering angle: {angle_deg:.2} deg"),
            TraceEvent::TriangleUp(normal) => write!(f, "triangle up: {normal}"),
            TraceEvent::BestAxis {
                axis,
                positive,
                angle_deg,
            } => {
                let sign = if *positive { "positive" } else { "negative" };
                match axis {
                    Some(axis) => write!(f, "best axis: {sign} {axis} ({angle_deg:.2} deg)"),
                    None => write!(f, "no axis below {angle_deg:.2} deg"),
                }
            }
            TraceEvent::LeftRight {
                angle_deg,
                parallel,
            } => {
                if *parallel {
                    write!(f, "parallel to up axis (diff {angle_deg:.2} deg)")
                } else {
                    write!(f, "opposite to up axis (diff {:.2} deg)", 180.0 - angle_deg)
                }
            }
            TraceEvent::UpDown {
                perpendicularity_deg,
                along_up,
            } => write!(
                f,
                "perpendicular to up axis ({perpendicularity_deg:.2} deg), d1->d2 along up: {along_up:.4}"
            ),
            TraceEvent::Decided { outcome, by } => {
                let relation = match outcome {
                    Ordering::Less => "first precedes second",
                    Ordering::Equal => "same node",
                    Ordering::Greater => "second precedes first",
                };
                write!(f, "{relation} ({by:?})")
            }
        }
    }
}

/// Receiver of comparator narration.
pub trait TraceSink {
    /// Whether events are consumed at all; allows skipping allocations.
    fn enabled(&self) -> bool {
        true
    }

    fn emit(&mut self, event: TraceEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn enabled(&self) -> bool {
        false
    }

    fn emit(&mut self, _event: TraceEvent) {}
}

/// Forwards events to `tracing`: outcomes at info, intermediate steps at debug.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn emit(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::Comparing { .. } | TraceEvent::Decided { .. } => {
                tracing::info!(target: "lineage_sorter::trace", "{event}")
            }
            _ => tracing::debug!(target: "lineage_sorter::trace", "  {event}"),
        }
    }
}

impl TraceSink for Vec<TraceEvent> {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// The rule that settled a recorded comparison, if it finished.
pub fn decision_of(events: &[TraceEvent]) -> Option<Decision> {
    events.iter().rev().find_map(|event| match event {
        TraceEvent::Decided { by, .. } => Some(*by),
        _ => None,
    })
}

/// Emit the final event and hand the outcome back.
pub(crate) fn decide(trace: &mut dyn TraceSink, outcome: Ordering, by: Decision) -> Ordering {
    trace.emit(TraceEvent::Decided { outcome, by });
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_and_decision() {
        let mut events: Vec<TraceEvent> = Vec::new();
        events.emit(TraceEvent::Layering { angle_deg: 45.0 });
        assert_eq!(decision_of(&events), None);

        let outcome = decide(&mut events, Ordering::Less, Decision::UpDown);
        assert_eq!(outcome, Ordering::Less);
        assert_eq!(decision_of(&events), Some(Decision::UpDown));
        assert!(Decision::UpDown.is_side_by_side());
        assert!(!Decision::InnerLayer.is_side_by_side());
    }

    #[test]
    fn test_no_trace_is_disabled() {
        assert!(!NoTrace.enabled());
        assert!(LogTrace.enabled());
    }

    #[test]
    fn test_display_narration() {
        let event = TraceEvent::BestAxis {
            axis: Some(Axis::C),
            positive: false,
            angle_deg: 12.5,
        };
        assert_eq!(event.to_string(), "best axis: negative C (12.50 deg)");

        let event = TraceEvent::Decided {
            outcome: Ordering::Greater,
            by: Decision::InnerLayer,
        };
        assert_eq!(event.to_string(), "second precedes first (InnerLayer)");
    }
}
