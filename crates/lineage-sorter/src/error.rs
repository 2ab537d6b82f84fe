//! Error types for sorter construction.

use crate::strategy::StrategyKind;

/// Errors raised while building a sorter or its configuration.
///
/// Comparisons themselves never fail: once a sorter exists every call yields
/// an ordering, even for degenerate geometry.
#[derive(Debug, thiserror::Error)]
pub enum SorterError {
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Degenerate landmarks: {0}")]
    DegenerateLandmarks(String),

    #[error("The {strategy} strategy requires the '{landmark}' landmark")]
    MissingLandmark {
        strategy: StrategyKind,
        landmark: &'static str,
    },

    #[error("Unknown strategy: {0} (expected one of: full-frame, sliced, poles)")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, SorterError>;
