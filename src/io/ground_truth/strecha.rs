use std::path::Path;

use nalgebra::{Matrix3, Vector3};

use crate::{
    camera::{CameraIntrinsics, CameraPose},
    io::LoadError,
};

/// K (9), radial distortion (3), camera-to-world rotation (9) and center (3).
const MIN_VALUES: usize = 24;

/// Reads a Strecha camera file.
///
/// The file is a whitespace separated list of numbers: the row-major calibration
/// matrix, 3 distortion coefficients, the row-major camera-to-world rotation, the
/// camera center and, optionally, the image width and height.
pub fn read_strecha_camera(filepath: &Path) -> Result<(CameraPose, CameraIntrinsics), LoadError> {
    let text = std::fs::read_to_string(filepath).map_err(|err| LoadError::file(filepath, err))?;
    parse_strecha_camera(&text)
        .map_err(|msg| LoadError::ParseError(format!("{}: {msg}", filepath.display())))
}

fn parse_strecha_camera(text: &str) -> Result<(CameraPose, CameraIntrinsics), String> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| format!("invalid number `{token}`"))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    if values.len() < MIN_VALUES {
        return Err(format!(
            "expected at least {MIN_VALUES} values, got {}",
            values.len()
        ));
    }

    let k = Matrix3::from_row_slice(&values[0..9]);
    let camera_to_world = Matrix3::from_row_slice(&values[12..21]);
    let center = Vector3::from_column_slice(&values[21..24]);

    let pose = CameraPose::try_from_matrix(&camera_to_world.transpose(), center)
        .ok_or_else(|| "rotation isn't orthonormal".to_string())?;

    let mut intrinsics = CameraIntrinsics::from_matrix(&k);
    match values.get(MIN_VALUES..MIN_VALUES + 2) {
        Some([width, height]) => {
            intrinsics = intrinsics.with_size(*width as usize, *height as usize);
        }
        _ if values.len() > MIN_VALUES => {
            log::warn!(
                "Incomplete image size, ignoring {} trailing values",
                values.len() - MIN_VALUES
            );
        }
        _ => (),
    }
    if values.len() > MIN_VALUES + 2 {
        log::warn!(
            "Ignoring {} values after the image size",
            values.len() - MIN_VALUES - 2
        );
    }

    Ok((pose, intrinsics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    const FOUNTAIN_0000: &str = "2759.48 0 1520.69
0 2764.16 1006.81
0 0 1
0 0 0
0.450927 -0.0945642 -0.887537
-0.892535 -0.0401974 -0.449183
0.00679989 0.994707 -0.102528
-7.28137 -7.57667 0.204923
3072 2048
";

    #[test]
    fn test_parse_fountain_camera() {
        let (pose, intrinsics) = parse_strecha_camera(FOUNTAIN_0000).unwrap();

        assert_eq!(intrinsics.fx, 2759.48);
        assert_eq!(intrinsics.cx, 1520.69);
        assert_eq!(intrinsics.width, Some(3072));
        assert_eq!(intrinsics.height, Some(2048));

        assert_relative_eq!(*pose.center(), Vector3::new(-7.28137, -7.57667, 0.204923));
        // The file holds camera-to-world, poses are world-to-camera.
        assert_eq!(pose.rotation().matrix()[(0, 1)], -0.892535);
        assert_eq!(pose.rotation().matrix()[(1, 0)], -0.0945642);
    }

    #[test]
    fn test_parse_without_image_size() {
        let rotation = Rotation3::from_euler_angles(0.1, 0.2, 0.3);
        let camera_to_world = rotation.transpose();
        let mut text = String::from("500 0 320 0 500 240 0 0 1 0 0 0\n");
        for v in camera_to_world.matrix().transpose().iter() {
            text.push_str(&format!("{v} "));
        }
        text.push_str("1 2 3");

        let (pose, intrinsics) = parse_strecha_camera(&text).unwrap();
        assert_eq!(intrinsics.width, None);
        assert_relative_eq!(pose.rotation().matrix(), rotation.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn test_parse_with_trailing_values() {
        let text = format!("{FOUNTAIN_0000} 0 0");
        let (_, intrinsics) = parse_strecha_camera(&text).unwrap();
        assert_eq!(intrinsics.width, Some(3072));
        assert_eq!(intrinsics.height, Some(2048));

        let text = FOUNTAIN_0000.replace("3072 2048", "3072");
        let (_, intrinsics) = parse_strecha_camera(&text).unwrap();
        assert_eq!(intrinsics.width, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_strecha_camera("1 2 3").unwrap_err().contains("at least"));
        assert!(parse_strecha_camera("1 2 x").unwrap_err().contains("`x`"));

        let skewed = FOUNTAIN_0000.replace("0.450927", "1.450927");
        assert!(parse_strecha_camera(&skewed).is_err());
    }
}
