//! Strategy selection from resolved landmark positions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lineage_spatial::Point3D;
use serde::{Deserialize, Serialize};

use crate::axial::{PolesSorter, SlicedSorter};
use crate::error::{Result, SorterError};
use crate::full_frame::FullFrameSorter;
use crate::sink::GraphSink;
use crate::sorter::DescendantsSorter;
use crate::spot::Spot;
use crate::thresholds::Thresholds;
use crate::trace::TraceSink;

/// Available ordering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Centre plus three axes from north, south and east landmarks.
    #[default]
    FullFrame,
    /// South→north axis anchored at the south pole.
    Sliced,
    /// South→north axis through a separate centre landmark.
    Poles,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::FullFrame,
        StrategyKind::Sliced,
        StrategyKind::Poles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::FullFrame => "full-frame",
            StrategyKind::Sliced => "sliced",
            StrategyKind::Poles => "poles",
        }
    }

    /// Thresholds a freshly built sorter of this kind starts with.
    pub fn default_thresholds(&self) -> Thresholds {
        match self {
            StrategyKind::FullFrame => Thresholds::FULL_FRAME,
            StrategyKind::Sliced | StrategyKind::Poles => Thresholds::AXIAL,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = SorterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-frame" | "fullframe" | "deluxe" => Ok(StrategyKind::FullFrame),
            "sliced" | "slices" => Ok(StrategyKind::Sliced),
            "poles" => Ok(StrategyKind::Poles),
            other => Err(SorterError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Resolved landmark positions; which ones are needed depends on the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmarks {
    #[serde(default)]
    pub north: Option<Point3D>,
    #[serde(default)]
    pub south: Option<Point3D>,
    #[serde(default)]
    pub east: Option<Point3D>,
    #[serde(default)]
    pub centre: Option<Point3D>,
}

impl Landmarks {
    fn require(
        value: Option<Point3D>,
        strategy: StrategyKind,
        landmark: &'static str,
    ) -> Result<Point3D> {
        value.ok_or(SorterError::MissingLandmark { strategy, landmark })
    }
}

/// Any of the available sorters, chosen at runtime.
#[derive(Debug, Clone)]
pub enum Sorter {
    FullFrame(FullFrameSorter),
    Sliced(SlicedSorter),
    Poles(PolesSorter),
}

impl Sorter {
    /// Build a sorter of `kind` from `landmarks`.
    ///
    /// `thresholds` defaults to the strategy's own. The full-frame strategy
    /// refuses collinear landmarks here; build [`FullFrameSorter::new`]
    /// directly to accept them.
    pub fn from_landmarks(
        kind: StrategyKind,
        landmarks: &Landmarks,
        thresholds: Option<Thresholds>,
    ) -> Result<Self> {
        let thresholds = thresholds.unwrap_or_else(|| kind.default_thresholds());
        let sorter = match kind {
            StrategyKind::FullFrame => {
                let north = Landmarks::require(landmarks.north, kind, "north")?;
                let south = Landmarks::require(landmarks.south, kind, "south")?;
                let east = Landmarks::require(landmarks.east, kind, "east")?;
                Sorter::FullFrame(FullFrameSorter::try_new(north, south, east)?.with_thresholds(thresholds))
            }
            StrategyKind::Sliced => {
                let south = Landmarks::require(landmarks.south, kind, "south")?;
                let north = Landmarks::require(landmarks.north, kind, "north")?;
                Self::check_poles(south, north)?;
                Sorter::Sliced(SlicedSorter::new(south, north).with_thresholds(thresholds))
            }
            StrategyKind::Poles => {
                let centre = Landmarks::require(landmarks.centre, kind, "centre")?;
                let south = Landmarks::require(landmarks.south, kind, "south")?;
                let north = Landmarks::require(landmarks.north, kind, "north")?;
                Self::check_poles(south, north)?;
                Sorter::Poles(PolesSorter::new(centre, south, north).with_thresholds(thresholds))
            }
        };
        tracing::debug!(strategy = %kind, ?thresholds, "built descendants sorter");
        Ok(sorter)
    }

    fn check_poles(south: Point3D, north: Point3D) -> Result<()> {
        if south == north {
            return Err(SorterError::DegenerateLandmarks(format!(
                "south and north poles coincide at {south}"
            )));
        }
        Ok(())
    }

    fn inner(&self) -> &dyn DescendantsSorter {
        match self {
            Sorter::FullFrame(s) => s,
            Sorter::Sliced(s) => s,
            Sorter::Poles(s) => s,
        }
    }
}

impl DescendantsSorter for Sorter {
    fn strategy(&self) -> StrategyKind {
        self.inner().strategy()
    }

    fn thresholds(&self) -> Thresholds {
        self.inner().thresholds()
    }

    fn compare_traced(
        &self,
        d1: &dyn Spot,
        d2: &dyn Spot,
        trace: &mut dyn TraceSink,
    ) -> Ordering {
        self.inner().compare_traced(d1, d2, trace)
    }

    fn export_debug_graphics(&self, sink: &mut dyn GraphSink) {
        self.inner().export_debug_graphics(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks() -> Landmarks {
        Landmarks {
            north: Some(Point3D::new(0.0, 0.0, 10.0)),
            south: Some(Point3D::new(0.0, 0.0, 0.0)),
            east: Some(Point3D::new(5.0, 0.0, 5.0)),
            centre: Some(Point3D::new(0.0, 0.0, 5.0)),
        }
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("full-frame".parse::<StrategyKind>().unwrap(), StrategyKind::FullFrame);
        assert_eq!(" Sliced ".parse::<StrategyKind>().unwrap(), StrategyKind::Sliced);
        assert_eq!("poles".parse::<StrategyKind>().unwrap(), StrategyKind::Poles);
        assert!(matches!(
            "spiral".parse::<StrategyKind>(),
            Err(SorterError::UnknownStrategy(name)) if name == "spiral"
        ));
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_builds_every_strategy() {
        for kind in StrategyKind::ALL {
            let sorter = Sorter::from_landmarks(kind, &landmarks(), None).unwrap();
            assert_eq!(sorter.strategy(), kind);
            assert_eq!(sorter.thresholds(), kind.default_thresholds());
        }
    }

    #[test]
    fn test_missing_landmark() {
        let mut partial = landmarks();
        partial.east = None;
        let err = Sorter::from_landmarks(StrategyKind::FullFrame, &partial, None).unwrap_err();
        assert!(matches!(
            err,
            SorterError::MissingLandmark { landmark: "east", strategy: StrategyKind::FullFrame }
        ));
        assert_eq!(
            err.to_string(),
            "The full-frame strategy requires the 'east' landmark"
        );

        // sliced does not need east
        assert!(Sorter::from_landmarks(StrategyKind::Sliced, &partial, None).is_ok());

        partial.centre = None;
        assert!(Sorter::from_landmarks(StrategyKind::Poles, &partial, None).is_err());
    }

    #[test]
    fn test_degenerate_poles() {
        let mut same = landmarks();
        same.north = same.south;
        for kind in StrategyKind::ALL {
            assert!(matches!(
                Sorter::from_landmarks(kind, &same, None),
                Err(SorterError::DegenerateLandmarks(_))
            ));
        }
    }

    #[test]
    fn test_explicit_thresholds() {
        let t = Thresholds::new(10.0, 170.0, 45.0).unwrap();
        let sorter = Sorter::from_landmarks(StrategyKind::Poles, &landmarks(), Some(t)).unwrap();
        assert_eq!(sorter.thresholds(), t);
    }
}
