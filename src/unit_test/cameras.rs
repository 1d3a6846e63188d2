use nalgebra::{Rotation3, Vector3};
use rstest::fixture;

use crate::{
    camera::{CameraPose, IdentifiedPose},
    correspondence::Correspondences,
    transform::SimilarityTransform,
};

/// Eight cameras along a helix looking at varying directions.
#[fixture]
pub fn sample_ground_truth() -> Vec<IdentifiedPose> {
    (0..8)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::FRAC_PI_4;
            let center = Vector3::new(3.0 * angle.cos(), 3.0 * angle.sin(), 0.5 * i as f64);
            let rotation = Rotation3::from_euler_angles(0.1 * i as f64, -0.05 * i as f64, angle);
            IdentifiedPose::new(format!("{i:04}"), CameraPose::new(rotation, center))
        })
        .collect()
}

#[fixture]
pub fn sample_similarity() -> SimilarityTransform {
    SimilarityTransform::new(
        2.5,
        Rotation3::from_euler_angles(0.3, -0.2, 1.1),
        Vector3::new(1.0, -2.0, 0.5),
    )
}

/// Creates an estimate that `transform` maps exactly onto the ground truth.
pub fn synthesize_estimate(
    ground_truth: &[IdentifiedPose],
    transform: &SimilarityTransform,
) -> Correspondences {
    let inverse = transform.inverse();
    ground_truth
        .iter()
        .map(|gt| {
            let estimated = CameraPose::new(
                gt.pose.rotation() * transform.rotation(),
                inverse.transform_point(gt.pose.center()),
            );
            (gt.key.clone(), gt.pose.clone(), estimated)
        })
        .collect()
}
