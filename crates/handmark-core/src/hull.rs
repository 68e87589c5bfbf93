//! Contour geometry: enclosed area, convex hull indices and convexity defects.
//!
//! Contours are closed, ordered integer polylines. Hulls are returned as
//! indices into the source contour so that defects can reference the
//! original points.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Defect depths are stored in fixed point: `raw_depth = round(depth * 256)`.
pub const DEPTH_FIXED_POINT_SCALE: f64 = 256.0;

/// A region where the contour dips inward from one hull edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvexityDefect {
    /// Contour index of the hull vertex where the defect starts.
    pub start: usize,
    /// Contour index of the hull vertex where the defect ends.
    pub end: usize,
    /// Contour index of the point farthest from the hull edge.
    pub far: usize,
    /// Distance of `far` from the hull edge line, in 1/256 pixel units.
    pub raw_depth: i32,
}

#[inline]
pub fn squared_distance(a: Point2<i32>, b: Point2<i32>) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

#[inline]
fn cross(o: Point2<i32>, a: Point2<i32>, b: Point2<i32>) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

/// Unsigned area enclosed by a closed polyline (shoelace formula).
pub fn contour_area(points: &[Point2<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64)
        .sum();
    twice.abs() as f64 * 0.5
}

/// Convex hull of `points`, as indices into `points`.
///
/// Vertices are ordered counter-clockwise for a y-up frame (clockwise on
/// screen). Collinear edge points and duplicates are dropped; for duplicated
/// coordinates the lowest index is kept.
pub fn convex_hull_indices(points: &[Point2<i32>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by_key(|&i| (points[i].x, points[i].y, i));
    order.dedup_by_key(|i| (points[*i].x, points[*i].y));

    if order.len() < 3 {
        return order;
    }

    let mut hull: Vec<usize> = Vec::with_capacity(2 * order.len());

    // lower chain
    for &i in &order {
        while hull.len() >= 2
            && cross(
                points[hull[hull.len() - 2]],
                points[hull[hull.len() - 1]],
                points[i],
            ) <= 0
        {
            hull.pop();
        }
        hull.push(i);
    }

    // upper chain
    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(
                points[hull[hull.len() - 2]],
                points[hull[hull.len() - 1]],
                points[i],
            ) <= 0
        {
            hull.pop();
        }
        hull.push(i);
    }

    // the last vertex repeats the first
    hull.pop();
    hull
}

/// Convexity defects of `contour` against its hull `hull` (contour indices).
///
/// For every pair of hull vertices adjacent along the contour, the contour
/// points strictly between them are scanned for the one farthest from the
/// line through the pair. Pairs with no interior contour point, or whose
/// interior lies on the line, produce no defect. Contours with fewer than
/// four points or hulls with fewer than three vertices have no defects.
pub fn convexity_defects(contour: &[Point2<i32>], hull: &[usize]) -> Vec<ConvexityDefect> {
    let n = contour.len();
    if n < 4 {
        return Vec::new();
    }

    let mut vertices: Vec<usize> = hull.iter().copied().filter(|&i| i < n).collect();
    vertices.sort_unstable();
    vertices.dedup();
    if vertices.len() < 3 {
        return Vec::new();
    }

    let mut defects = Vec::new();
    for (k, &start) in vertices.iter().enumerate() {
        let end = vertices[(k + 1) % vertices.len()];
        let p0 = contour[start];
        let p1 = contour[end];
        let dx0 = (p1.x - p0.x) as f64;
        let dy0 = (p1.y - p0.y) as f64;
        let len = (dx0 * dx0 + dy0 * dy0).sqrt();
        let scale = if len > 0.0 { 1.0 / len } else { 0.0 };

        let mut deepest: Option<(usize, f64)> = None;
        let mut j = (start + 1) % n;
        while j != end {
            let dx = (contour[j].x - p0.x) as f64;
            let dy = (contour[j].y - p0.y) as f64;
            let dist = (dx0 * dy - dy0 * dx).abs() * scale;
            if dist > deepest.map_or(0.0, |(_, d)| d) {
                deepest = Some((j, dist));
            }
            j = (j + 1) % n;
        }

        if let Some((far, depth)) = deepest {
            defects.push(ConvexityDefect {
                start,
                end,
                far,
                raw_depth: (depth * DEPTH_FIXED_POINT_SCALE).round() as i32,
            });
        }
    }
    defects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point2<i32>> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn area_of_axis_aligned_rectangle() {
        let rect = pts(&[(0, 0), (40, 0), (40, 25), (0, 25)]);
        assert_eq!(contour_area(&rect), 1000.0);
        let reversed: Vec<_> = rect.iter().rev().copied().collect();
        assert_eq!(contour_area(&reversed), 1000.0);
    }

    #[test]
    fn degenerate_contours_have_no_area() {
        assert_eq!(contour_area(&pts(&[(0, 0), (5, 5)])), 0.0);
        assert_eq!(contour_area(&pts(&[(0, 0), (5, 5), (10, 10)])), 0.0);
    }

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let cloud = pts(&[(0, 0), (5, 0), (10, 0), (10, 10), (4, 4), (0, 10), (6, 7)]);
        let mut hull = convex_hull_indices(&cloud);
        hull.sort_unstable();
        assert_eq!(hull, vec![0, 2, 3, 5]);
    }

    #[test]
    fn hull_is_counter_clockwise_in_y_up_frame() {
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let hull = convex_hull_indices(&square);
        assert_eq!(hull.len(), 4);
        let area2: i64 = (0..hull.len())
            .map(|k| {
                let p = square[hull[k]];
                let q = square[hull[(k + 1) % hull.len()]];
                p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64
            })
            .sum();
        assert!(area2 > 0);
    }

    #[test]
    fn hull_keeps_lowest_index_for_duplicates() {
        let line = pts(&[(3, 3), (3, 3), (3, 3)]);
        assert_eq!(convex_hull_indices(&line), vec![0]);
    }

    #[test]
    fn notch_produces_single_defect() {
        let contour = pts(&[(0, 0), (10, 0), (10, 10), (5, 4), (0, 10)]);
        let hull = convex_hull_indices(&contour);
        let defects = convexity_defects(&contour, &hull);
        assert_eq!(
            defects,
            vec![ConvexityDefect {
                start: 2,
                end: 4,
                far: 3,
                raw_depth: 6 * 256,
            }]
        );
    }

    #[test]
    fn convex_contour_has_no_defects() {
        let contour = pts(&[(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)]);
        let hull = convex_hull_indices(&contour);
        assert!(convexity_defects(&contour, &hull).is_empty());
    }

    #[test]
    fn tiny_inputs_have_no_defects() {
        let contour = pts(&[(0, 0), (10, 0), (5, 5)]);
        assert!(convexity_defects(&contour, &[0, 1, 2]).is_empty());
        let contour = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert!(convexity_defects(&contour, &[0, 1]).is_empty());
    }
}
