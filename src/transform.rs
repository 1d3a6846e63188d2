use nalgebra::{Matrix4, Rotation3, Vector3};

use std::ops;

/// Similarity transform: uniform scale, rotation and translation.
/// Maps a point `p` to `scale * rotation * p + translation`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityTransform {
    scale: f64,
    rotation: Rotation3<f64>,
    translation: Vector3<f64>,
}

impl SimilarityTransform {
    pub fn eye() -> Self {
        Self {
            scale: 1.0,
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Creates a new transform from its parts.
    ///
    /// # Arguments
    ///
    /// * `scale` - Scale factor, must be positive.
    /// * `rotation` - Proper rotation.
    /// * `translation` - Translation applied after scaling and rotating.
    pub fn new(scale: f64, rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        debug_assert!(scale > 0.0, "similarity scale must be positive");
        Self {
            scale,
            rotation,
            translation,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }

    pub fn transform_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * point * self.scale + self.translation
    }

    /// Brings a world-to-camera rotation expressed in the source frame into
    /// the destination frame. Scale and translation don't affect orientation.
    pub fn align_rotation(&self, world_to_camera: &Rotation3<f64>) -> Rotation3<f64> {
        world_to_camera * self.rotation.inverse()
    }

    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        let inv_scale = 1.0 / self.scale;
        Self {
            scale: inv_scale,
            translation: -(inv_rotation * self.translation) * inv_scale,
            rotation: inv_rotation,
        }
    }
}

impl ops::Mul<&Vector3<f64>> for &SimilarityTransform {
    type Output = Vector3<f64>;

    fn mul(self, rhs: &Vector3<f64>) -> Self::Output {
        self.transform_point(rhs)
    }
}

impl ops::Mul<&SimilarityTransform> for &SimilarityTransform {
    type Output = SimilarityTransform;

    fn mul(self, rhs: &SimilarityTransform) -> Self::Output {
        SimilarityTransform {
            scale: self.scale * rhs.scale,
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation * rhs.translation * self.scale + self.translation,
        }
    }
}

impl From<&SimilarityTransform> for Matrix4<f64> {
    fn from(transform: &SimilarityTransform) -> Self {
        let mut matrix = Matrix4::identity();
        matrix
            .fixed_slice_mut::<3, 3>(0, 0)
            .copy_from(&(transform.rotation.matrix() * transform.scale));
        matrix
            .fixed_slice_mut::<3, 1>(0, 3)
            .copy_from(&transform.translation);
        matrix
    }
}

impl std::fmt::Display for SimilarityTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (axis_angle, angle) = match self.rotation.axis_angle() {
            Some((axis, angle)) => (axis.into_inner(), angle),
            None => (Vector3::z(), 0.0),
        };
        write!(
            f,
            "scale: {:.6}, rotation: {:.4}° about [{:.4}, {:.4}, {:.4}], translation: [{:.6}, {:.6}, {:.6}]",
            self.scale,
            angle.to_degrees(),
            axis_angle[0],
            axis_angle[1],
            axis_angle[2],
            self.translation[0],
            self.translation[1],
            self.translation[2]
        )
    }
}
