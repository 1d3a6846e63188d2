use std::collections::HashMap;

use crate::{
    camera::CameraPose,
    io::{ReconstructionSource, View},
};

/// A reconstruction held in memory. Each registered view gets a pose with its id.
#[derive(Default)]
pub struct InMemoryReconstruction {
    views: Vec<View>,
    poses: HashMap<u32, CameraPose>,
}

impl InMemoryReconstruction {
    pub fn from_poses<I: IntoIterator<Item = (String, CameraPose)>>(poses: I) -> Self {
        poses
            .into_iter()
            .fold(Self::default(), |reconstruction, (image_path, pose)| {
                reconstruction.with_view(&image_path, Some(pose))
            })
    }

    pub fn with_view(mut self, image_path: &str, pose: Option<CameraPose>) -> Self {
        let id = self.views.len() as u32;
        let pose_id = pose.map(|pose| {
            self.poses.insert(id, pose);
            id
        });
        self.views.push(View {
            id,
            image_path: image_path.to_string(),
            pose_id,
        });
        self
    }
}

impl ReconstructionSource for InMemoryReconstruction {
    fn views(&self) -> &[View] {
        &self.views
    }

    fn pose(&self, pose_id: u32) -> Option<&CameraPose> {
        self.poses.get(&pose_id)
    }

    fn num_poses(&self) -> usize {
        self.poses.len()
    }
}
