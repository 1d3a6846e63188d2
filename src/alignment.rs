//! Closed-form least-squares similarity between two corresponding point sets.
//!
//! Umeyama, "Least-squares estimation of transformation parameters between
//! two point patterns", TPAMI 1991.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{error::AlignmentError, transform::SimilarityTransform};

/// Minimum number of point pairs to determine a similarity transform.
pub const MIN_CORRESPONDENCES: usize = 3;

/// Estimates the similarity transform that maps estimated camera centers onto
/// ground truth camera centers.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEstimator {
    /// A configuration is degenerate when the second largest singular value of
    /// the cross-covariance is below this fraction of the largest one.
    pub degeneracy_tolerance: f64,
}

impl Default for SimilarityEstimator {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: 1e-10,
        }
    }
}

impl SimilarityEstimator {
    pub fn degeneracy_tolerance(mut self, value: f64) -> Self {
        self.degeneracy_tolerance = value;
        self
    }

    /// Finds `T` minimizing `sum ||ground_truth[i] - T(estimated[i])||^2`.
    ///
    /// # Arguments
    ///
    /// * `estimated` - Points in the source frame.
    /// * `ground_truth` - Corresponding points in the destination frame, same order.
    ///
    /// # Returns
    ///
    /// The transform, or an error if there are less than 3 pairs or the points
    /// are collinear or coincident.
    pub fn estimate(
        &self,
        estimated: &[Vector3<f64>],
        ground_truth: &[Vector3<f64>],
    ) -> Result<SimilarityTransform, AlignmentError> {
        if estimated.len() != ground_truth.len() {
            return Err(AlignmentError::MismatchedLengths(
                estimated.len(),
                ground_truth.len(),
            ));
        }
        let count = estimated.len();
        if count < MIN_CORRESPONDENCES {
            return Err(AlignmentError::NotEnoughCorrespondences(count));
        }

        let estimated_mean = centroid(estimated);
        let gt_mean = centroid(ground_truth);

        let mut covariance = Matrix3::zeros();
        let mut estimated_variance = 0.0;
        for (est, gt) in estimated.iter().zip(ground_truth) {
            let est = est - estimated_mean;
            covariance += (gt - gt_mean) * est.transpose();
            estimated_variance += est.norm_squared();
        }
        covariance /= count as f64;
        estimated_variance /= count as f64;

        let svd = covariance.svd(true, true);
        let singular_values = svd.singular_values;

        let mut sorted = [singular_values[0], singular_values[1], singular_values[2]];
        sorted.sort_by(|a, b| b.total_cmp(a));
        if sorted[0] <= f64::MIN_POSITIVE
            || sorted[1] <= self.degeneracy_tolerance * sorted[0]
        {
            return Err(AlignmentError::Degenerate {
                count,
                singular_values: sorted,
            });
        }

        let (u, v_t) = match (svd.u, svd.v_t) {
            (Some(u), Some(v_t)) => (u, v_t),
            _ => {
                return Err(AlignmentError::Degenerate {
                    count,
                    singular_values: sorted,
                })
            }
        };

        // Flip the direction of the smallest singular value if U * V^T is a reflection.
        let mut signs = Vector3::new(1.0, 1.0, 1.0);
        if u.determinant() * v_t.determinant() < 0.0 {
            signs[singular_values.imin()] = -1.0;
        }

        let rotation = u * Matrix3::from_diagonal(&signs) * v_t;
        let scale = singular_values.dot(&signs) / estimated_variance;
        let translation = gt_mean - rotation * estimated_mean * scale;

        Ok(SimilarityTransform::new(
            scale,
            Rotation3::from_matrix_unchecked(rotation),
            translation,
        ))
    }
}

fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    let sum: Vector3<f64> = points.iter().sum();
    sum / points.len() as f64
}
