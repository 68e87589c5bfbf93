//! Planar pose from four image/object correspondences.
//!
//! The object plane is `z = 0`; object points come from the correspondence
//! coefficients `(cx, cy, 0)` scaled by the physical marker size.

use crate::{homography_from_4pt, CameraIntrinsics};
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Rotation3, Vector3};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned by pose solvers. None of them is fatal to a pipeline:
/// callers drop the overlay for the current frame.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    #[error("marker size must be positive and finite (got {0})")]
    InvalidMarkerSize(f64),
    #[error("correspondences are degenerate (coincident or collinear points)")]
    Degenerate,
    #[error("homography does not decompose into a rigid pose")]
    Decomposition,
}

/// Rigid transform from the object plane into the camera frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
}

impl Pose {
    pub fn transform(&self, p: Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * p.coords + self.translation)
    }

    /// Camera-from-object matrix in OpenCV axes (x right, y down, z forward).
    pub fn matrix(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(self.rotation.matrix());
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }

    /// Model-view matrix in OpenGL axes (y up, looking down -z).
    pub fn view_matrix(&self) -> Matrix4<f64> {
        let flip = Matrix4::from_diagonal(&nalgebra::Vector4::new(1.0, -1.0, -1.0, 1.0));
        flip * self.matrix()
    }

    /// `view_matrix` as 16 scalars in column-major order, ready for `glLoadMatrixd`.
    pub fn view_matrix_array(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.view_matrix().as_slice());
        out
    }
}

/// External pose solver seam.
pub trait PoseSolver {
    fn solve(
        &self,
        image_points: &[Point2<f32>; 4],
        coefficients: &[f32; 12],
        marker_size: f64,
        camera: &CameraIntrinsics,
    ) -> Result<Pose, PoseError>;
}

/// Homography decomposition solver for four coplanar points.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarPoseSolver;

impl PoseSolver for PlanarPoseSolver {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, image_points, coefficients, camera))
    )]
    fn solve(
        &self,
        image_points: &[Point2<f32>; 4],
        coefficients: &[f32; 12],
        marker_size: f64,
        camera: &CameraIntrinsics,
    ) -> Result<Pose, PoseError> {
        if !marker_size.is_finite() || marker_size <= 0.0 {
            return Err(PoseError::InvalidMarkerSize(marker_size));
        }

        let object: [Point2<f64>; 4] = std::array::from_fn(|k| {
            Point2::new(
                coefficients[3 * k] as f64 * marker_size,
                coefficients[3 * k + 1] as f64 * marker_size,
            )
        });
        let normalized: [Point2<f64>; 4] = std::array::from_fn(|k| {
            let p = image_points[k];
            camera.undistort_to_normalized(Point2::new(p.x as f64, p.y as f64))
        });

        let h = homography_from_4pt(&object, &normalized).ok_or(PoseError::Degenerate)?;
        decompose(h.column(0), h.column(1), h.column(2))
    }
}

fn decompose(h1: Vector3<f64>, h2: Vector3<f64>, h3: Vector3<f64>) -> Result<Pose, PoseError> {
    let norm = 0.5 * (h1.norm() + h2.norm());
    if !norm.is_finite() || norm < 1e-12 {
        return Err(PoseError::Decomposition);
    }

    let mut lambda = 1.0 / norm;
    if h3.z * lambda < 0.0 {
        // the plane must sit in front of the camera
        lambda = -lambda;
    }

    let r1 = h1 * lambda;
    let r2 = h2 * lambda;
    let r3 = r1.cross(&r2);
    let translation = h3 * lambda;

    let approx = Matrix3::from_columns(&[r1, r2, r3]);
    let svd = approx.svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(PoseError::Decomposition);
    };
    let mut r = u * v_t;
    if r.determinant() < 0.0 {
        let mut u = u;
        u.column_mut(2).neg_mut();
        r = u * v_t;
    }

    if !r.iter().all(|v| v.is_finite()) || !translation.iter().all(|v| v.is_finite()) {
        return Err(PoseError::Decomposition);
    }

    Ok(Pose {
        rotation: Rotation3::from_matrix_unchecked(r),
        translation,
    })
}
