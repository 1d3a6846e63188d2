use crate::camera::CameraPose;

/// An image of the reconstruction.
#[derive(Clone, Debug)]
pub struct View {
    pub id: u32,
    /// Path of the image file, as recorded by the reconstruction.
    pub image_path: String,
    /// Pose of the view. `None` when the view wasn't registered.
    pub pose_id: Option<u32>,
}

/// Access to the views and poses of an estimated reconstruction.
pub trait ReconstructionSource {
    /// Views in the reconstruction's iteration order.
    fn views(&self) -> &[View];
    fn pose(&self, pose_id: u32) -> Option<&CameraPose>;
    fn num_poses(&self) -> usize;

    /// Returns the pose of a view, if it was reconstructed.
    fn view_pose(&self, view: &View) -> Option<&CameraPose> {
        view.pose_id.and_then(|pose_id| self.pose(pose_id))
    }
}
