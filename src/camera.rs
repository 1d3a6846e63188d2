use approx::relative_eq;
use nalgebra::{Matrix3, Rotation3, Vector3};

/// Maximum deviation from `R * R^T = I` accepted by [`CameraPose::try_from_matrix`].
pub const ORTHONORMALITY_TOLERANCE: f64 = 1e-4;

/// Camera intrinsic parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length and pixel scale in the X-axis.
    pub fx: f64,
    /// Focal length and pixel scale in the Y-axis.
    pub fy: f64,
    /// Camera X-center.
    pub cx: f64,
    /// Camera Y-center.
    pub cy: f64,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl CameraIntrinsics {
    pub fn from_simple_intrinsic(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            width: None,
            height: None,
        }
    }

    /// Reads the parameters from an upper triangular calibration matrix.
    /// Skew is dropped.
    pub fn from_matrix(k: &Matrix3<f64>) -> Self {
        Self::from_simple_intrinsic(k[(0, 0)], k[(1, 1)], k[(0, 2)], k[(1, 2)])
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }
}

/// Camera orientation and position.
///
/// The rotation maps world coordinates into the camera frame, so a world
/// point `X` is at `rotation * (X - center)` in camera coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPose {
    rotation: Rotation3<f64>,
    center: Vector3<f64>,
}

impl CameraPose {
    pub fn new(rotation: Rotation3<f64>, center: Vector3<f64>) -> Self {
        Self { rotation, center }
    }

    /// Creates a pose from a raw rotation matrix.
    ///
    /// # Returns
    ///
    /// `None` if the matrix isn't orthonormal with determinant +1. The matrix
    /// is never corrected.
    pub fn try_from_matrix(rotation: &Matrix3<f64>, center: Vector3<f64>) -> Option<Self> {
        let orthonormal = relative_eq!(
            rotation * rotation.transpose(),
            Matrix3::identity(),
            epsilon = ORTHONORMALITY_TOLERANCE
        );
        if !orthonormal || rotation.determinant() <= 0.0 {
            return None;
        }

        Some(Self::new(Rotation3::from_matrix_unchecked(*rotation), center))
    }

    /// World-to-camera rotation.
    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    /// Camera center in world coordinates.
    pub fn center(&self) -> &Vector3<f64> {
        &self.center
    }

    /// The `t` of the `[R|t]` extrinsic matrix.
    pub fn translation(&self) -> Vector3<f64> {
        -(self.rotation * self.center)
    }
}

/// A camera pose tagged with the identity key of its image.
#[derive(Clone, Debug)]
pub struct IdentifiedPose {
    /// Image file name without directory and extension.
    pub key: String,
    pub pose: CameraPose,
    pub intrinsics: Option<CameraIntrinsics>,
}

impl IdentifiedPose {
    pub fn new<K: Into<String>>(key: K, pose: CameraPose) -> Self {
        Self {
            key: key.into(),
            pose,
            intrinsics: None,
        }
    }

    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = Some(intrinsics);
        self
    }
}
