//! Geometry core for bare-hand AR markers.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any image type: contours arrive as integer point lists and the
//! pose stage works on plain `nalgebra` points.

mod camera;
mod hull;
mod homography;
mod logger;
mod pose;

pub use camera::CameraIntrinsics;
pub use homography::{homography_from_4pt, Homography};
pub use hull::{
    contour_area, convex_hull_indices, convexity_defects, squared_distance, ConvexityDefect,
    DEPTH_FIXED_POINT_SCALE,
};
pub use pose::{PlanarPoseSolver, Pose, PoseError, PoseSolver};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
