//! Readers for ground truth camera directories.
//!
//! Each supported layout is a [`GroundTruthFormat`] variant. A ground truth
//! directory holds one file per camera, named after the image it belongs to
//! plus the format's suffix (`0000.png.camera`, `0000.bin`).

mod openmvg;
pub use openmvg::{decompose_projection, read_openmvg_camera};

mod strecha;
pub use strecha::read_strecha_camera;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::LoadError;
use crate::{
    camera::{CameraIntrinsics, CameraPose, IdentifiedPose},
    error::EvalError,
};

/// `--camtype` value that asks for auto-detection.
pub const AUTO_DETECT: i32 = -1;

/// Supported ground truth camera formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundTruthFormat {
    /// openMVG binary projection matrices, `*.bin`.
    OpenMvg,
    /// Strecha text cameras for `png` images, `*.png.camera`.
    StrechaPng,
    /// Strecha text cameras for `jpg` images, `*.jpg.camera`.
    StrechaJpg,
    /// Strecha text cameras for `PNG` images, `*.PNG.camera`.
    StrechaPngUpper,
    /// Strecha text cameras for `JPG` images, `*.JPG.camera`.
    StrechaJpgUpper,
}

impl GroundTruthFormat {
    /// All formats, in auto-detection priority order.
    pub const ALL: [GroundTruthFormat; 5] = [
        GroundTruthFormat::OpenMvg,
        GroundTruthFormat::StrechaPng,
        GroundTruthFormat::StrechaJpg,
        GroundTruthFormat::StrechaPngUpper,
        GroundTruthFormat::StrechaJpgUpper,
    ];

    /// Numeric identifier used by `--camtype`.
    pub fn id(&self) -> i32 {
        match self {
            GroundTruthFormat::OpenMvg => 1,
            GroundTruthFormat::StrechaPng => 2,
            GroundTruthFormat::StrechaJpg => 3,
            GroundTruthFormat::StrechaPngUpper => 4,
            GroundTruthFormat::StrechaJpgUpper => 5,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.id() == id)
    }

    /// File name suffix, without the leading dot.
    pub fn suffix(&self) -> &'static str {
        match self {
            GroundTruthFormat::OpenMvg => "bin",
            GroundTruthFormat::StrechaPng => "png.camera",
            GroundTruthFormat::StrechaJpg => "jpg.camera",
            GroundTruthFormat::StrechaPngUpper => "PNG.camera",
            GroundTruthFormat::StrechaJpgUpper => "JPG.camera",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GroundTruthFormat::OpenMvg => "openMVG camera (bin)",
            GroundTruthFormat::StrechaPng => "Strecha camera (png)",
            GroundTruthFormat::StrechaJpg => "Strecha camera (jpg)",
            GroundTruthFormat::StrechaPngUpper => "Strecha camera (PNG)",
            GroundTruthFormat::StrechaJpgUpper => "Strecha camera (JPG)",
        }
    }

    /// Whether identity keys of this format are matched ignoring case.
    pub fn case_insensitive_keys(&self) -> bool {
        matches!(
            self,
            GroundTruthFormat::StrechaPngUpper | GroundTruthFormat::StrechaJpgUpper
        )
    }

    /// Finds the first format, in priority order, with at least one file in the directory.
    pub fn detect<P: AsRef<Path>>(gt_dir: P) -> Result<Option<Self>, LoadError> {
        for format in Self::ALL {
            if !format.list_files(gt_dir.as_ref())?.is_empty() {
                return Ok(Some(format));
            }
        }
        Ok(None)
    }

    /// Resolves the `--camtype` selector, scanning the directory when it is [`AUTO_DETECT`].
    pub fn from_camtype<P: AsRef<Path>>(camtype: i32, gt_dir: P) -> Result<Self, EvalError> {
        let gt_dir = gt_dir.as_ref();
        let format = if camtype == AUTO_DETECT {
            Self::detect(gt_dir)?
        } else {
            Self::from_id(camtype)
        };

        format.ok_or_else(|| {
            let reason = if camtype == AUTO_DETECT {
                format!(
                    "no known camera file (*.bin, *.png.camera, *.jpg.camera, *.PNG.camera, *.JPG.camera) in {}",
                    gt_dir.display()
                )
            } else {
                format!("camera type {camtype} is unknown")
            };
            EvalError::configuration(format!(
                "Unsupported camera type: {reason}. Please write your camera reader."
            ))
        })
    }

    /// Lists the camera files of this format, sorted by path.
    pub fn list_files(&self, gt_dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&gt_dir.to_string_lossy()),
            self.suffix()
        );
        let mut files = glob::glob(&pattern)?.collect::<Result<Vec<PathBuf>, _>>()?;
        files.sort();
        Ok(files)
    }

    /// Identity key of a camera file: its file name without the format suffix.
    pub fn key_of(&self, filepath: &Path) -> Option<String> {
        let filename = filepath.file_name()?.to_str()?;
        filename
            .strip_suffix(self.suffix())
            .and_then(|stem| stem.strip_suffix('.'))
            .map(str::to_string)
    }

    pub fn read_camera(&self, filepath: &Path) -> Result<(CameraPose, CameraIntrinsics), LoadError> {
        match self {
            GroundTruthFormat::OpenMvg => read_openmvg_camera(filepath),
            _ => read_strecha_camera(filepath),
        }
    }

    /// Reads every camera of the directory. Files are read in parallel, the
    /// result follows the sorted file order.
    pub fn read_dir<P: AsRef<Path>>(&self, gt_dir: P) -> Result<Vec<IdentifiedPose>, LoadError> {
        let files = self.list_files(gt_dir.as_ref())?;
        files
            .par_iter()
            .map(|filepath| -> Result<IdentifiedPose, LoadError> {
                let key = self.key_of(filepath).ok_or_else(|| {
                    LoadError::ParseError(format!(
                        "{}: can't derive an image name",
                        filepath.display()
                    ))
                })?;
                let (pose, intrinsics) = self.read_camera(filepath)?;
                log::debug!("Read ground truth camera {key} from {}", filepath.display());
                Ok(IdentifiedPose::new(key, pose).with_intrinsics(intrinsics))
            })
            .collect()
    }
}

impl std::fmt::Display for GroundTruthFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
