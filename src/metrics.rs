use nalgebra::Matrix3;

use crate::{correspondence::Correspondences, transform::SimilarityTransform};

/// Residuals of one camera after alignment.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorRecord {
    /// Identity key of the camera.
    pub key: String,
    /// Distance between the aligned and ground truth centers, in ground truth units.
    pub position: f64,
    /// Angle between the aligned and ground truth orientations, in degrees.
    pub rotation: f64,
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: position: {:.6}, rotation: {:.4}°",
            self.key, self.position, self.rotation
        )
    }
}

/// Geodesic angle in radians between two rotation matrices.
///
/// The cosine is clamped into `[-1, 1]`, so matrices carrying round-off
/// still give `0` or `π` instead of `NaN`.
pub fn rotation_angle(lhs: &Matrix3<f64>, rhs: &Matrix3<f64>) -> f64 {
    let cos = ((lhs.transpose() * rhs).trace() - 1.0) / 2.0;
    cos.clamp(-1.0, 1.0).acos()
}

/// Same as [`rotation_angle`], in degrees.
pub fn rotation_angle_degrees(lhs: &Matrix3<f64>, rhs: &Matrix3<f64>) -> f64 {
    rotation_angle(lhs, rhs).to_degrees()
}

/// Computes the residuals of each correspondence once the estimate is mapped
/// into the ground truth frame by `transform`.
///
/// # Returns
///
/// One record per correspondence, in the same order.
pub fn compute_errors(
    correspondences: &Correspondences,
    transform: &SimilarityTransform,
) -> Vec<ErrorRecord> {
    correspondences
        .iter()
        .map(|item| {
            let aligned_center = transform.transform_point(item.estimated.center());
            let aligned_rotation = transform.align_rotation(item.estimated.rotation());

            ErrorRecord {
                key: item.key.to_string(),
                position: (aligned_center - item.ground_truth.center()).norm(),
                rotation: rotation_angle_degrees(
                    item.ground_truth.rotation().matrix(),
                    aligned_rotation.matrix(),
                ),
            }
        })
        .collect()
}
