//! Angle thresholds steering the layering and left/right decisions.

use crate::error::{Result, SorterError};

/// Validated angle thresholds, all in degrees.
///
/// A sorter holds one of these by value and reads it on every comparison, so
/// changing thresholds means building a new sorter rather than mutating a
/// shared one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    layering_lower_deg: f64,
    layering_upper_deg: f64,
    left_right_cutoff_deg: f64,
}

impl Thresholds {
    /// Defaults of the full-frame strategy.
    pub const FULL_FRAME: Self = Self {
        layering_lower_deg: 20.0,
        layering_upper_deg: 160.0,
        left_right_cutoff_deg: 60.0,
    };

    /// Defaults of the single-axis (sliced and two-pole) strategies.
    pub const AXIAL: Self = Self {
        layering_lower_deg: 30.0,
        layering_upper_deg: 150.0,
        left_right_cutoff_deg: 60.0,
    };

    /// Build thresholds, rejecting combinations that make the decision
    /// regimes overlap.
    ///
    /// Requires `0 <= lower < upper <= 180` and `0 < left_right < 90`.
    pub fn new(
        layering_lower_deg: f64,
        layering_upper_deg: f64,
        left_right_cutoff_deg: f64,
    ) -> Result<Self> {
        Self {
            layering_lower_deg,
            layering_upper_deg,
            left_right_cutoff_deg,
        }
        .validated()
    }

    /// Replace the two layering cutoffs.
    pub fn with_layering(self, lower_deg: f64, upper_deg: f64) -> Result<Self> {
        Self::new(lower_deg, upper_deg, self.left_right_cutoff_deg)
    }

    /// Replace the left-right vs up-down cutoff.
    pub fn with_left_right_cutoff(self, cutoff_deg: f64) -> Result<Self> {
        Self::new(self.layering_lower_deg, self.layering_upper_deg, cutoff_deg)
    }

    /// Largest d1-vertex angle at which d2 counts as the inner (nearer) layer.
    pub fn layering_lower_deg(&self) -> f64 {
        self.layering_lower_deg
    }

    /// Smallest d1-vertex angle at which d1 counts as the inner layer.
    pub fn layering_upper_deg(&self) -> f64 {
        self.layering_upper_deg
    }

    /// Angle to the up axis below which a pair is told apart left/right
    /// rather than up/down. Unused by the full-frame strategy.
    pub fn left_right_cutoff_deg(&self) -> f64 {
        self.left_right_cutoff_deg
    }

    fn validated(self) -> Result<Self> {
        let Self {
            layering_lower_deg: lower,
            layering_upper_deg: upper,
            left_right_cutoff_deg: lr,
        } = self;

        if !(lower.is_finite() && upper.is_finite() && lr.is_finite()) {
            return Err(SorterError::InvalidThresholds(format!(
                "angles must be finite (lower {lower}, upper {upper}, left-right {lr})"
            )));
        }
        if !(0.0..=180.0).contains(&lower) || !(0.0..=180.0).contains(&upper) {
            return Err(SorterError::InvalidThresholds(format!(
                "layering cutoffs must lie within [0, 180] degrees (lower {lower}, upper {upper})"
            )));
        }
        if lower >= upper {
            return Err(SorterError::InvalidThresholds(format!(
                "layering lower cutoff {lower} must be below the upper cutoff {upper}"
            )));
        }
        if lr <= 0.0 || lr >= 90.0 {
            return Err(SorterError::InvalidThresholds(format!(
                "left-right cutoff {lr} must lie strictly between 0 and 90 degrees"
            )));
        }
        Ok(self)
    }
}
