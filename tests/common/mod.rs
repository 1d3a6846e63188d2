use std::path::Path;

use nalgebra::{Matrix3, Matrix3x4, Rotation3, Vector3};
use serde_json::{json, Value};
use sfmeval::{camera::CameraPose, transform::SimilarityTransform};

pub const CALIBRATION: [f64; 9] = [
    2759.48, 0.0, 1520.69, //
    0.0, 2764.16, 1006.81, //
    0.0, 0.0, 1.0,
];

/// Ground truth cameras on a helix, keyed `0000`, `0001`, ...
pub fn ground_truth_cameras(count: usize) -> Vec<(String, CameraPose)> {
    (0..count)
        .map(|i| {
            let angle = i as f64 * 0.7;
            let center = Vector3::new(4.0 * angle.cos(), 4.0 * angle.sin(), 0.3 * i as f64);
            let rotation = Rotation3::from_euler_angles(0.05 * i as f64, 0.2, angle);
            (format!("{i:04}"), CameraPose::new(rotation, center))
        })
        .collect()
}

pub fn reconstruction_frame() -> SimilarityTransform {
    SimilarityTransform::new(
        0.2,
        Rotation3::from_euler_angles(-0.4, 0.9, 0.1),
        Vector3::new(10.0, 0.0, -3.0),
    )
}

/// Expresses a ground truth pose in a frame that `transform` maps back onto the ground truth.
pub fn to_reconstruction_frame(pose: &CameraPose, transform: &SimilarityTransform) -> CameraPose {
    CameraPose::new(
        pose.rotation() * transform.rotation(),
        transform.inverse().transform_point(pose.center()),
    )
}

pub fn write_strecha_camera(filepath: &Path, pose: &CameraPose) {
    let camera_to_world = pose.rotation().matrix().transpose();
    let mut values = CALIBRATION.to_vec();
    values.extend([0.0, 0.0, 0.0]);
    values.extend(camera_to_world.transpose().iter());
    values.extend(pose.center().iter());
    values.extend([3072.0, 2048.0]);

    let text = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    std::fs::write(filepath, text).unwrap();
}

pub fn write_openmvg_camera(filepath: &Path, pose: &CameraPose) {
    let mut extrinsics = Matrix3x4::zeros();
    extrinsics
        .fixed_slice_mut::<3, 3>(0, 0)
        .copy_from(pose.rotation().matrix());
    extrinsics.set_column(3, &pose.translation());
    let projection = Matrix3::from_row_slice(&CALIBRATION) * extrinsics;

    // openMVG dumps the matrix in column-major order.
    let bytes = projection
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect::<Vec<u8>>();
    std::fs::write(filepath, bytes).unwrap();
}

/// Builds an openMVG `sfm_data.json`. Views with a `None` pose are unregistered.
pub fn sfm_data_json(views: &[(String, Option<CameraPose>)]) -> Value {
    let mut json_views = Vec::new();
    let mut extrinsics = Vec::new();
    for (id, (filename, pose)) in views.iter().enumerate() {
        let id_pose = if pose.is_some() { id as u64 } else { u32::MAX as u64 };
        json_views.push(json!({
            "key": id,
            "value": {
                "polymorphic_id": 1073741824u64,
                "ptr_wrapper": {
                    "id": 2147483649u64 + id as u64,
                    "data": {
                        "local_path": "",
                        "filename": filename,
                        "width": 3072,
                        "height": 2048,
                        "id_view": id,
                        "id_intrinsic": 0,
                        "id_pose": id_pose
                    }
                }
            }
        }));

        if let Some(pose) = pose {
            let rotation = pose.rotation().matrix();
            let rows = (0..3)
                .map(|r| vec![rotation[(r, 0)], rotation[(r, 1)], rotation[(r, 2)]])
                .collect::<Vec<_>>();
            extrinsics.push(json!({
                "key": id,
                "value": {
                    "rotation": rows,
                    "center": [pose.center().x, pose.center().y, pose.center().z]
                }
            }));
        }
    }

    json!({
        "sfm_data_version": "0.3",
        "root_path": "/data/images",
        "views": json_views,
        "intrinsics": [],
        "extrinsics": extrinsics,
        "structure": [],
        "control_points": []
    })
}

pub fn write_sfm_data(filepath: &Path, views: &[(String, Option<CameraPose>)]) {
    std::fs::write(filepath, sfm_data_json(views).to_string()).unwrap();
}
