use nalgebra::{Matrix3, Point2, Vector3};
use serde::{Deserialize, Serialize};

const UNDISTORT_ITERATIONS: usize = 20;

/// Pinhole intrinsics with Brown–Conrady distortion `[k1, k2, p1, p2, k3]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    #[serde(default)]
    pub distortion: [f64; 5],
}

impl Default for CameraIntrinsics {
    /// A plausible 640×480 webcam with no lens distortion.
    fn default() -> Self {
        Self {
            fx: 600.0,
            fy: 600.0,
            cx: 320.0,
            cy: 240.0,
            distortion: [0.0; 5],
        }
    }
}

impl CameraIntrinsics {
    pub fn camera_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    fn distort_normalized(&self, p: Point2<f64>) -> Point2<f64> {
        let [k1, k2, p1, p2, k3] = self.distortion;
        let (x, y) = (p.x, p.y);
        let r2 = x * x + y * y;
        let radial = 1.0 + r2 * (k1 + r2 * (k2 + r2 * k3));
        Point2::new(
            x * radial + 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x),
            y * radial + p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y,
        )
    }

    /// Project a camera-frame point (z > 0) to distorted pixel coordinates.
    pub fn project(&self, p_cam: Vector3<f64>) -> Point2<f64> {
        let n = Point2::new(p_cam.x / p_cam.z, p_cam.y / p_cam.z);
        let d = self.distort_normalized(n);
        Point2::new(self.fx * d.x + self.cx, self.fy * d.y + self.cy)
    }

    /// Map a distorted pixel to undistorted normalized image coordinates.
    ///
    /// Inverts the distortion model by fixed-point iteration, which converges
    /// for the moderate distortion of ordinary webcams.
    pub fn undistort_to_normalized(&self, pixel: Point2<f64>) -> Point2<f64> {
        let xd = (pixel.x - self.cx) / self.fx;
        let yd = (pixel.y - self.cy) / self.fy;
        if self.distortion.iter().all(|&c| c == 0.0) {
            return Point2::new(xd, yd);
        }

        let [k1, k2, p1, p2, k3] = self.distortion;
        let (mut x, mut y) = (xd, yd);
        for _ in 0..UNDISTORT_ITERATIONS {
            let r2 = x * x + y * y;
            let radial = 1.0 + r2 * (k1 + r2 * (k2 + r2 * k3));
            let dx = 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
            let dy = p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;
            x = (xd - dx) / radial;
            y = (yd - dy) / radial;
        }
        Point2::new(x, y)
    }
}
