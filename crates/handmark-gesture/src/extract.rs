//! External contours with their hulls and convexity defects.

use handmark_core::{
    contour_area, convex_hull_indices, convexity_defects, ConvexityDefect,
    DEPTH_FIXED_POINT_SCALE,
};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::GestureParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// One external contour that passed the area filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandContour {
    pub points: Vec<Point2<i32>>,
    pub area: f64,
    /// Hull vertices as indices into `points`.
    pub hull: Vec<usize>,
    pub defects: Vec<ConvexityDefect>,
}

impl HandContour {
    /// Analyze an already traced contour.
    pub fn from_points(points: Vec<Point2<i32>>, params: &GestureParams) -> Self {
        let area = contour_area(&points);
        let hull = convex_hull_indices(&points);
        let min_raw_depth = (params.min_defect_depth * DEPTH_FIXED_POINT_SCALE).round() as i32;
        let defects = convexity_defects(&points, &hull)
            .into_iter()
            .filter(|d| d.raw_depth >= min_raw_depth)
            .collect();
        Self {
            points,
            area,
            hull,
            defects,
        }
    }

    /// A hull exists and there are enough defects to describe fingers.
    pub fn is_usable(&self, min_defects: usize) -> bool {
        !self.hull.is_empty() && self.defects.len() >= min_defects
    }

    pub fn point(&self, idx: usize) -> Point2<i32> {
        self.points[idx]
    }
}

/// External contours of the non-zero regions of `mask`, each with enclosed
/// area at least `params.min_contour_area`.
///
/// Pure function of the mask: the same mask always yields the same contours,
/// hulls and defects, in the same order.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask, params), fields(width = mask.width(), height = mask.height()))
)]
pub fn extract_hand_contours(mask: &GrayImage, params: &GestureParams) -> Vec<HandContour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            c.points
                .iter()
                .map(|p| Point2::new(p.x, p.y))
                .collect::<Vec<_>>()
        })
        .filter(|points| contour_area(points) >= params.min_contour_area)
        .map(|points| HandContour::from_points(points, params))
        .collect()
}
