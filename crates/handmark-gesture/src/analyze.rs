//! Finger counting from convexity defects.
//!
//! A defect is a finger valley when its depth exceeds the mean depth of all
//! defects of the same contour. The threshold is frame-local, so the count
//! does not depend on how large the hand appears.

use handmark_core::{ConvexityDefect, DEPTH_FIXED_POINT_SCALE};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::HandContour;

/// Finger tally before any valley is accepted. N valleys between fingers
/// mean N + 1 fingers, so an empty frame also reports one finger.
pub const BASELINE_TALLY: u32 = 1;

/// Finger count of the previous frame that arms the advance event.
pub const ADVANCE_FROM: u32 = 4;
/// Finger count of the current frame that fires the advance event.
pub const ADVANCE_TO: u32 = 5;

/// Depth statistics of one contour's defects, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthStats {
    pub defects: usize,
    pub accepted: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// An accepted defect with its anchor points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FingerValley {
    pub start: Point2<i32>,
    pub far: Point2<i32>,
    pub end: Point2<i32>,
    pub depth: f64,
}

/// Result of one frame's analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureReading {
    pub finger_count: u32,
    /// `start, far, end` of every accepted valley, in acceptance order.
    pub relevant_points: Vec<Point2<i32>>,
    pub valleys: Vec<FingerValley>,
    /// One entry per analyzed contour.
    pub depth_stats: Vec<DepthStats>,
}

impl Default for GestureReading {
    fn default() -> Self {
        Self {
            finger_count: BASELINE_TALLY,
            relevant_points: Vec::new(),
            valleys: Vec::new(),
            depth_stats: Vec::new(),
        }
    }
}

#[inline]
fn depth_px(defect: &ConvexityDefect) -> f64 {
    defect.raw_depth as f64 / DEPTH_FIXED_POINT_SCALE
}

/// Indices of the defects deeper than the mean, plus their statistics.
pub fn select_valleys(defects: &[ConvexityDefect]) -> (Vec<usize>, DepthStats) {
    if defects.is_empty() {
        return (Vec::new(), DepthStats::default());
    }

    let depths: Vec<f64> = defects.iter().map(depth_px).collect();
    let n = depths.len() as f64;
    let mean = depths.iter().sum::<f64>() / n;
    let std_dev = (depths.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n).sqrt();

    let accepted: Vec<usize> = depths
        .iter()
        .enumerate()
        .filter(|(_, &d)| d > mean)
        .map(|(i, _)| i)
        .collect();

    let stats = DepthStats {
        defects: defects.len(),
        accepted: accepted.len(),
        mean,
        std_dev,
    };
    (accepted, stats)
}

/// Count fingers over every usable contour of the frame.
///
/// The tally is shared across contours and starts at [`BASELINE_TALLY`].
pub fn analyze_contours(contours: &[HandContour], min_defects: usize) -> GestureReading {
    let mut reading = GestureReading::default();

    for contour in contours.iter().filter(|c| c.is_usable(min_defects)) {
        let (accepted, stats) = select_valleys(&contour.defects);
        log::debug!(
            "contour area={:.0}: {} defects, mean depth {:.2}, std {:.2}, {} valleys",
            contour.area,
            stats.defects,
            stats.mean,
            stats.std_dev,
            stats.accepted
        );

        for idx in accepted {
            let defect = &contour.defects[idx];
            let valley = FingerValley {
                start: contour.point(defect.start),
                far: contour.point(defect.far),
                end: contour.point(defect.end),
                depth: depth_px(defect),
            };
            reading
                .relevant_points
                .extend([valley.start, valley.far, valley.end]);
            reading.valleys.push(valley);
            reading.finger_count += 1;
        }
        reading.depth_stats.push(stats);
    }

    reading
}

/// Discrete request to cycle the active overlay asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceSelection {
    pub previous: u32,
    pub current: u32,
}

/// Finger counts of the current and the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureState {
    pub current: u32,
    pub previous: u32,
}

/// Cross-frame gesture state with the edge-triggered advance detector.
#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    state: GestureState,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Feed this frame's finger count.
    ///
    /// Fires only on the exact `4 → 5` transition. The count becomes the
    /// next frame's `previous` whether or not the event fired.
    pub fn update(&mut self, finger_count: u32) -> Option<AdvanceSelection> {
        let previous = self.state.previous;
        self.state = GestureState {
            current: finger_count,
            previous: finger_count,
        };

        (previous == ADVANCE_FROM && finger_count == ADVANCE_TO).then_some(AdvanceSelection {
            previous,
            current: finger_count,
        })
    }
}
