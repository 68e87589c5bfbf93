//! Four-point planar correspondence for the pose solver.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Relevant-point indices used as the four correspondence points.
pub const CORRESPONDENCE_INDICES: [usize; 4] = [10, 9, 2, 1];

/// Every offset from the centroid is divided by this.
pub const COEFFICIENT_SCALE: f64 = 5000.0;

/// Relevant-point counts the builder knows about (1 to 4 accepted valleys).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrespondenceCount {
    Three,
    Six,
    Nine,
    Twelve,
}

impl CorrespondenceCount {
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            3 => Some(Self::Three),
            6 => Some(Self::Six),
            9 => Some(Self::Nine),
            12 => Some(Self::Twelve),
            _ => None,
        }
    }

    pub fn points(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Six => 6,
            Self::Nine => 9,
            Self::Twelve => 12,
        }
    }
}

/// Four image points with their 12 object-plane coefficients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrespondenceMatrix {
    pub image_points: [Point2<f32>; 4],
    /// `(dx, dy, 0)` per point, already divided by [`COEFFICIENT_SCALE`].
    pub coefficients: [f32; 12],
    pub centroid: Point2<i32>,
}

impl CorrespondenceMatrix {
    /// Planar `(x, y)` of correspondence point `k`.
    pub fn object_xy(&self, k: usize) -> (f32, f32) {
        (self.coefficients[3 * k], self.coefficients[3 * k + 1])
    }
}

/// What the builder produced this frame. Only [`Ready`](Self::Ready)
/// carries coefficients; every other variant means "no pose this frame".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrespondenceOutcome {
    Ready(CorrespondenceMatrix),
    /// A known count with no correspondence layout.
    Unsupported { count: CorrespondenceCount },
    /// Twelve points were found but the mask hull gave no centroid.
    NoCentroid,
    /// Any other number of relevant points.
    Unhandled { points: usize },
}

impl CorrespondenceOutcome {
    pub fn matrix(&self) -> Option<&CorrespondenceMatrix> {
        match self {
            Self::Ready(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The coefficient matrix, empty unless [`Ready`](Self::Ready).
    pub fn coefficients(&self) -> &[f32] {
        match self {
            Self::Ready(m) => &m.coefficients,
            _ => &[],
        }
    }
}

/// Build the correspondence from this frame's relevant points.
pub fn build_correspondence(
    relevant_points: &[Point2<i32>],
    centroid: Option<Point2<i32>>,
) -> CorrespondenceOutcome {
    match CorrespondenceCount::from_len(relevant_points.len()) {
        Some(CorrespondenceCount::Twelve) => {}
        Some(count) => return CorrespondenceOutcome::Unsupported { count },
        None => {
            return CorrespondenceOutcome::Unhandled {
                points: relevant_points.len(),
            }
        }
    }
    let Some(c) = centroid else {
        return CorrespondenceOutcome::NoCentroid;
    };

    let mut image_points = [Point2::new(0.0f32, 0.0); 4];
    let mut coefficients = [0.0f32; 12];
    for (k, &idx) in CORRESPONDENCE_INDICES.iter().enumerate() {
        let p = relevant_points[idx];
        image_points[k] = Point2::new(p.x as f32, p.y as f32);
        coefficients[3 * k] = ((p.x - c.x) as f64 / COEFFICIENT_SCALE) as f32;
        coefficients[3 * k + 1] = ((c.y - p.y) as f64 / COEFFICIENT_SCALE) as f32;
        coefficients[3 * k + 2] = 0.0;
    }

    CorrespondenceOutcome::Ready(CorrespondenceMatrix {
        image_points,
        coefficients,
        centroid: c,
    })
}
