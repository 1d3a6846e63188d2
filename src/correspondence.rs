use std::collections::HashMap;
use std::path::Path;

use nalgebra::Vector3;

use crate::{
    camera::{CameraPose, IdentifiedPose},
    io::ReconstructionSource,
};

/// Identity key of an image path: the file name without directory and extension.
pub fn identity_key(image_path: &str) -> String {
    Path::new(image_path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A ground truth camera paired with its estimate.
#[derive(Clone, Copy, Debug)]
pub struct Correspondence<'a> {
    pub key: &'a str,
    pub ground_truth: &'a CameraPose,
    pub estimated: &'a CameraPose,
}

/// Matched cameras, stored as index-aligned sequences.
#[derive(Clone, Debug, Default)]
pub struct Correspondences {
    /// Identity keys.
    pub keys: Vec<String>,
    /// Ground truth poses.
    pub ground_truth: Vec<CameraPose>,
    /// Estimated poses, in the reconstruction's frame.
    pub estimated: Vec<CameraPose>,
}

impl Correspondences {
    /// Adds a new pair.
    ///
    /// # Arguments
    ///
    /// * `key` - Identity key shared by both cameras.
    /// * `ground_truth` - Reference pose.
    /// * `estimated` - Reconstructed pose.
    pub fn push<K: Into<String>>(&mut self, key: K, ground_truth: CameraPose, estimated: CameraPose) {
        self.keys.push(key.into());
        self.ground_truth.push(ground_truth);
        self.estimated.push(estimated);
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no camera was matched.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the pair at `index`, or `None` if it is out of bounds.
    pub fn get(&self, index: usize) -> Option<Correspondence<'_>> {
        Some(Correspondence {
            key: self.keys.get(index)?,
            ground_truth: self.ground_truth.get(index)?,
            estimated: self.estimated.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Correspondence<'_>> + '_ {
        self.keys
            .iter()
            .zip(self.ground_truth.iter())
            .zip(self.estimated.iter())
            .map(|((key, ground_truth), estimated)| Correspondence {
                key,
                ground_truth,
                estimated,
            })
    }

    pub fn ground_truth_centers(&self) -> Vec<Vector3<f64>> {
        self.ground_truth.iter().map(|pose| *pose.center()).collect()
    }

    pub fn estimated_centers(&self) -> Vec<Vector3<f64>> {
        self.estimated.iter().map(|pose| *pose.center()).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, CameraPose, CameraPose)> for Correspondences {
    /// Creates the pairs from `(key, ground truth, estimated)` tuples.
    fn from_iter<T: IntoIterator<Item = (K, CameraPose, CameraPose)>>(iter: T) -> Self {
        let mut correspondences = Correspondences::default();
        for (key, ground_truth, estimated) in iter {
            correspondences.push(key, ground_truth, estimated);
        }
        correspondences
    }
}


/// Ground truth poses indexed by identity key.
pub struct GroundTruthIndex<'a> {
    poses: HashMap<String, &'a IdentifiedPose>,
    case_insensitive: bool,
}

impl<'a> GroundTruthIndex<'a> {
    /// Indexes the poses. If two entries share a key, the first one wins.
    pub fn new(ground_truth: &'a [IdentifiedPose], case_insensitive: bool) -> Self {
        let mut poses = HashMap::with_capacity(ground_truth.len());
        for pose in ground_truth {
            let key = normalize_key(&pose.key, case_insensitive);
            if poses.contains_key(&key) {
                log::warn!("Duplicated ground truth key {}, keeping the first", pose.key);
                continue;
            }
            poses.insert(key, pose);
        }

        Self {
            poses,
            case_insensitive,
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a IdentifiedPose> {
        self.poses
            .get(&normalize_key(key, self.case_insensitive))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

fn normalize_key(key: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Pairs the reconstructed views with the ground truth cameras of the same image.
///
/// Views without pose or without ground truth are skipped. The result follows
/// the reconstruction's view order.
pub fn match_views<S>(ground_truth: &GroundTruthIndex, reconstruction: &S) -> Correspondences
where
    S: ReconstructionSource + ?Sized,
{
    let mut correspondences = Correspondences::default();
    for view in reconstruction.views() {
        let Some(estimated) = reconstruction.view_pose(view) else {
            log::debug!("View {} ({}) isn't reconstructed", view.id, view.image_path);
            continue;
        };

        let key = identity_key(&view.image_path);
        let Some(gt_pose) = ground_truth.get(&key) else {
            log::debug!("View {} ({}) has no ground truth", view.id, view.image_path);
            continue;
        };

        correspondences.push(gt_pose.key.clone(), gt_pose.pose.clone(), estimated.clone());
    }

    log::info!(
        "Matched {} of {} views with ground truth",
        correspondences.len(),
        reconstruction.views().len()
    );
    correspondences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_test::{sample_ground_truth, InMemoryReconstruction};
    use nalgebra::Rotation3;
    use rstest::*;

    fn pose_at(x: f64) -> CameraPose {
        CameraPose::new(Rotation3::identity(), Vector3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_identity_key() {
        assert_eq!(identity_key("/x/a.png"), "a");
        assert_eq!(identity_key("relative/dir/img_01.JPG"), "img_01");
        assert_eq!(identity_key("noext"), "noext");
        assert_eq!(identity_key(""), "");
    }

    #[test]
    fn test_match_keeps_view_order() {
        let ground_truth = vec![
            IdentifiedPose::new("a", pose_at(1.0)),
            IdentifiedPose::new("b", pose_at(2.0)),
            IdentifiedPose::new("c", pose_at(3.0)),
        ];
        let reconstruction = InMemoryReconstruction::default()
            .with_view("/z/c.jpg", Some(pose_at(30.0)))
            .with_view("/y/d.png", Some(pose_at(40.0)))
            .with_view("/x/a.png", Some(pose_at(10.0)));

        let correspondences =
            match_views(&GroundTruthIndex::new(&ground_truth, false), &reconstruction);

        assert_eq!(correspondences.keys, vec!["c", "a"]);
        let first = correspondences.get(0).unwrap();
        assert_eq!(first.key, "c");
        assert_eq!(first.ground_truth.center().x, 3.0);
        assert_eq!(first.estimated.center().x, 30.0);
        assert!(correspondences.get(2).is_none());
        assert_eq!(correspondences.estimated[1].center().x, 10.0);
    }

    #[test]
    fn test_match_skips_views_without_ground_truth() {
        let ground_truth = vec![
            IdentifiedPose::new("a", pose_at(1.0)),
            IdentifiedPose::new("b", pose_at(2.0)),
            IdentifiedPose::new("c", pose_at(3.0)),
        ];
        let reconstruction = InMemoryReconstruction::default()
            .with_view("/x/a.png", Some(pose_at(10.0)))
            .with_view("/y/d.png", Some(pose_at(40.0)))
            .with_view("/z/c.jpg", Some(pose_at(30.0)));

        let correspondences =
            match_views(&GroundTruthIndex::new(&ground_truth, false), &reconstruction);
        assert_eq!(correspondences.len(), 2);
        assert_eq!(correspondences.keys, vec!["a", "c"]);
    }

    #[test]
    fn test_match_skips_unregistered_views() {
        let ground_truth = vec![
            IdentifiedPose::new("a", pose_at(1.0)),
            IdentifiedPose::new("b", pose_at(2.0)),
            IdentifiedPose::new("c", pose_at(3.0)),
        ];
        let reconstruction = InMemoryReconstruction::default()
            .with_view("/x/a.png", Some(pose_at(10.0)))
            .with_view("/x/b.png", None)
            .with_view("/z/c.jpg", Some(pose_at(30.0)));

        let correspondences =
            match_views(&GroundTruthIndex::new(&ground_truth, false), &reconstruction);
        assert_eq!(correspondences.keys, vec!["a", "c"]);
    }

    #[test]
    fn test_duplicated_key_first_wins() {
        let ground_truth = vec![
            IdentifiedPose::new("a", pose_at(1.0)),
            IdentifiedPose::new("a", pose_at(2.0)),
        ];
        let index = GroundTruthIndex::new(&ground_truth, false);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a").unwrap().pose.center().x, 1.0);
    }

    #[test]
    fn test_case_sensitivity() {
        let ground_truth = vec![IdentifiedPose::new("IMG_01", pose_at(1.0))];

        assert!(GroundTruthIndex::new(&ground_truth, false)
            .get("img_01")
            .is_none());
        assert!(GroundTruthIndex::new(&ground_truth, true)
            .get("img_01")
            .is_some());
    }

    #[rstest]
    fn test_match_all(sample_ground_truth: Vec<IdentifiedPose>) {
        let reconstruction = InMemoryReconstruction::from_poses(
            sample_ground_truth
                .iter()
                .map(|gt| (format!("images/{}.png", gt.key), gt.pose.clone())),
        );

        let correspondences =
            match_views(&GroundTruthIndex::new(&sample_ground_truth, false), &reconstruction);
        assert_eq!(correspondences.len(), sample_ground_truth.len());
        for item in correspondences.iter() {
            assert_eq!(item.ground_truth, item.estimated);
        }
    }
}
