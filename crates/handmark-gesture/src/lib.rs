//! Hand-shape analysis: from a binary mask to a finger count and a planar
//! four-point correspondence.
//!
//! Stages, in pipeline order:
//! - [`extract_hand_contours`]: external contours, area filter, hull and
//!   convexity defects per contour.
//! - [`analyze_contours`] + [`GestureTracker`]: adaptive (mean-depth) valley
//!   acceptance, finger tally and the edge-triggered [`AdvanceSelection`].
//! - [`estimate_centroid`]: hull extremities of the whole mask and their mean.
//! - [`build_correspondence`]: the 12-coefficient matrix for a pose solver.
//!
//! [`HandAnalyzer`] runs all of them on one mask and keeps the cross-frame
//! gesture state.

mod analyze;
mod analyzer;
mod centroid;
mod correspond;
mod extract;
mod params;

pub use analyze::{
    analyze_contours, select_valleys, AdvanceSelection, DepthStats, FingerValley, GestureReading,
    GestureState, GestureTracker, ADVANCE_FROM, ADVANCE_TO, BASELINE_TALLY,
};
pub use analyzer::{HandAnalysis, HandAnalyzer};
pub use centroid::{
    estimate_centroid, hull_extremities, mask_hull, mean_point, CentroidPass, HullDiagnostics,
};
pub use correspond::{
    build_correspondence, CorrespondenceCount, CorrespondenceMatrix, CorrespondenceOutcome,
    COEFFICIENT_SCALE, CORRESPONDENCE_INDICES,
};
pub use extract::{extract_hand_contours, HandContour};
pub use params::GestureParams;
