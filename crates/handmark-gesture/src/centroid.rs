//! Hand centroid from the convex hull of the whole mask.
//!
//! Only hull vertices that end a long hull edge are kept as extremities
//! (fingertips, wrist corners); the centroid is their integer mean.

use handmark_core::{convex_hull_indices, squared_distance};
use image::GrayImage;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::GestureParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Edge-length statistics of the mask hull, reported for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HullDiagnostics {
    pub mean_edge_length: f64,
    pub edge_length_std_dev: f64,
}

impl HullDiagnostics {
    /// Statistics over the open polyline `hull[0] → … → hull[n-1]`.
    pub fn from_hull(hull: &[Point2<i32>]) -> Option<Self> {
        if hull.len() < 2 {
            return None;
        }
        let lengths: Vec<f64> = hull
            .windows(2)
            .map(|w| (squared_distance(w[0], w[1]) as f64).sqrt())
            .collect();
        let n = lengths.len() as f64;
        let mean = lengths.iter().sum::<f64>() / n;
        let var = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean_edge_length: mean,
            edge_length_std_dev: var.sqrt(),
        })
    }
}

/// Everything the centroid pass computed for one mask.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CentroidPass {
    pub hull: Vec<Point2<i32>>,
    pub extremities: Vec<Point2<i32>>,
    pub centroid: Option<Point2<i32>>,
    pub diagnostics: Option<HullDiagnostics>,
}

/// Convex hull of every non-zero pixel of `mask`, as points.
///
/// Only the leftmost and rightmost non-zero pixel of each row can be a hull
/// vertex, so the interior is never visited by the hull routine.
pub fn mask_hull(mask: &GrayImage) -> Vec<Point2<i32>> {
    let (w, h) = mask.dimensions();
    let mut candidates = Vec::new();
    for y in 0..h {
        let mut row = (0..w).filter(|&x| mask.get_pixel(x, y).0[0] != 0);
        let Some(first) = row.next() else {
            continue;
        };
        let last = row.last().unwrap_or(first);
        candidates.push(Point2::new(first as i32, y as i32));
        if last != first {
            candidates.push(Point2::new(last as i32, y as i32));
        }
    }

    convex_hull_indices(&candidates)
        .into_iter()
        .map(|i| candidates[i])
        .collect()
}

/// Hull vertices that end an edge longer than `sqrt(min_sq_distance)`.
///
/// The closing edge `hull[n-1] → hull[0]` is checked first and contributes
/// `hull[0]`; every other edge `hull[i-1] → hull[i]` contributes `hull[i]`.
pub fn hull_extremities(hull: &[Point2<i32>], min_sq_distance: i64) -> Vec<Point2<i32>> {
    let (Some(&first), Some(&last)) = (hull.first(), hull.last()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    if squared_distance(first, last) > min_sq_distance {
        out.push(first);
    }
    out.extend(
        hull.windows(2)
            .filter(|w| squared_distance(w[1], w[0]) > min_sq_distance)
            .map(|w| w[1]),
    );
    out
}

/// Integer (truncating) mean of `points`; `None` when empty.
pub fn mean_point(points: &[Point2<i32>]) -> Option<Point2<i32>> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as i64;
    let (sx, sy) = points
        .iter()
        .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
    Some(Point2::new((sx / n) as i32, (sy / n) as i32))
}

#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask, params), fields(width = mask.width(), height = mask.height()))
)]
pub fn estimate_centroid(mask: &GrayImage, params: &GestureParams) -> CentroidPass {
    let hull = mask_hull(mask);
    let extremities = hull_extremities(&hull, params.extremity_min_sq_distance);
    let centroid = mean_point(&extremities);
    let diagnostics = HullDiagnostics::from_hull(&hull);

    if let Some(d) = &diagnostics {
        log::debug!(
            "mask hull: {} vertices, edge mean {:.2}, std {:.2}, {} extremities",
            hull.len(),
            d.mean_edge_length,
            d.edge_length_std_dev,
            extremities.len()
        );
    }

    CentroidPass {
        hull,
        extremities,
        centroid,
        diagnostics,
    }
}
