use serde::{Deserialize, Serialize};

/// Thresholds of the gesture stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureParams {
    /// Contours enclosing less area (px²) are ignored.
    pub min_contour_area: f64,
    /// Contours with fewer defects carry no usable hand shape.
    pub min_defects: usize,
    /// Defects shallower than this (px) are treated as digitization noise
    /// and dropped before analysis. `0.0` keeps every defect.
    pub min_defect_depth: f64,
    /// Squared length a mask-hull edge must exceed for its end vertex to
    /// count as a hand extremity.
    pub extremity_min_sq_distance: i64,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            min_contour_area: 3000.0,
            min_defects: 3,
            min_defect_depth: 1.0,
            extremity_min_sq_distance: 3000,
        }
    }
}
