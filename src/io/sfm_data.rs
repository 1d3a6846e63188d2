use serde_derive::Deserialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use nalgebra::{Matrix3, Vector3};

use super::{
    reconstruction::{ReconstructionSource, View},
    LoadError,
};
use crate::camera::CameraPose;

/// File name looked up when the reconstruction path is a directory.
pub const SFM_DATA_FILENAME: &str = "sfm_data.json";

/// Index used by openMVG for views without pose or intrinsic.
const UNDEFINED_INDEX: u32 = u32::MAX;

/// Reconstruction stored in the openMVG `sfm_data.json` format.
/// Only views and extrinsics are loaded.
pub struct SfmData {
    pub root_path: PathBuf,
    views: Vec<View>,
    poses: HashMap<u32, CameraPose>,
}

#[derive(Deserialize, Debug)]
struct KeyValue<T> {
    key: u32,
    value: T,
}

#[derive(Deserialize, Debug)]
struct ViewData {
    #[serde(default)]
    local_path: String,
    filename: String,
    id_view: u32,
    #[serde(default = "undefined_index")]
    id_pose: u32,
}

#[derive(Deserialize, Debug)]
struct PtrWrapper {
    data: Option<ViewData>,
}

#[derive(Deserialize, Debug)]
struct ViewValue {
    ptr_wrapper: PtrWrapper,
}

#[derive(Deserialize, Debug)]
struct PoseValue {
    rotation: [[f64; 3]; 3],
    center: [f64; 3],
}

#[derive(Deserialize, Debug)]
struct Document {
    #[serde(default)]
    root_path: String,
    #[serde(default)]
    views: Vec<KeyValue<ViewValue>>,
    #[serde(default)]
    extrinsics: Vec<KeyValue<PoseValue>>,
}

fn undefined_index() -> u32 {
    UNDEFINED_INDEX
}

impl SfmData {
    /// Loads the reconstruction.
    ///
    /// # Arguments
    ///
    /// * `path` - Either the JSON file or a directory holding `sfm_data.json`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let filepath = if path.is_dir() {
            path.join(SFM_DATA_FILENAME)
        } else {
            path.to_path_buf()
        };

        let file = std::fs::File::open(&filepath).map_err(|err| LoadError::file(&filepath, err))?;
        let document: Document = serde_json::from_reader(std::io::BufReader::new(file))?;
        Self::from_document(document)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Self::from_document(serde_json::from_str(json)?)
    }

    fn from_document(document: Document) -> Result<Self, LoadError> {
        let root_path = PathBuf::from(&document.root_path);

        let views = document
            .views
            .into_iter()
            .filter_map(|entry| entry.value.ptr_wrapper.data.map(|data| (entry.key, data)))
            .map(|(key, data)| {
                let image_path = root_path.join(&data.local_path).join(&data.filename);
                if key != data.id_view {
                    log::warn!(
                        "View key {key} differs from its id_view {}, using the key",
                        data.id_view
                    );
                }
                View {
                    id: key,
                    image_path: image_path.to_string_lossy().into_owned(),
                    pose_id: (data.id_pose != UNDEFINED_INDEX).then_some(data.id_pose),
                }
            })
            .collect::<Vec<View>>();

        let mut poses = HashMap::with_capacity(document.extrinsics.len());
        for entry in document.extrinsics {
            let rotation = Matrix3::from_fn(|r, c| entry.value.rotation[r][c]);
            let center = Vector3::from_column_slice(&entry.value.center);
            let pose = CameraPose::try_from_matrix(&rotation, center).ok_or_else(|| {
                LoadError::ParseError(format!(
                    "extrinsic {} has a rotation that isn't orthonormal",
                    entry.key
                ))
            })?;
            poses.insert(entry.key, pose);
        }

        Ok(Self {
            root_path,
            views,
            poses,
        })
    }
}

impl ReconstructionSource for SfmData {
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
