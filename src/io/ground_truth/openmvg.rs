use std::path::Path;

use nalgebra::{Matrix3, Matrix3x4, Rotation3, Vector3};

use crate::{
    camera::{CameraIntrinsics, CameraPose},
    io::LoadError,
};

/// Number of `f64` values in a binary camera: the 3x4 projection matrix.
const NUM_VALUES: usize = 12;

/// Reads a binary openMVG camera: the 3x4 projection matrix `P = K[R|t]`
/// stored as 12 little-endian doubles in column-major order.
pub fn read_openmvg_camera(filepath: &Path) -> Result<(CameraPose, CameraIntrinsics), LoadError> {
    let bytes = std::fs::read(filepath).map_err(|err| LoadError::file(filepath, err))?;
    if bytes.len() < NUM_VALUES * std::mem::size_of::<f64>() {
        return Err(LoadError::ParseError(format!(
            "{}: expected {} bytes for a projection matrix, got {}",
            filepath.display(),
            NUM_VALUES * std::mem::size_of::<f64>(),
            bytes.len()
        )));
    }

    let values = bytes
        .chunks_exact(std::mem::size_of::<f64>())
        .take(NUM_VALUES)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect::<Vec<f64>>();
    let projection = Matrix3x4::from_column_slice(&values);

    let (k, rotation, translation) = decompose_projection(&projection).ok_or_else(|| {
        LoadError::ParseError(format!(
            "{}: projection matrix is singular",
            filepath.display()
        ))
    })?;

    let center = -(rotation.transpose() * translation);
    Ok((
        CameraPose::new(rotation, center),
        CameraIntrinsics::from_matrix(&k),
    ))
}

/// Splits a projection matrix `P = K[R|t]` into its calibration, rotation and translation.
///
/// `K` is upper triangular with a positive diagonal and `K[2, 2] = 1`, `R` is a proper rotation.
///
/// # Returns
///
/// `None` if the left 3x3 block of `P` is singular.
pub fn decompose_projection(
    projection: &Matrix3x4<f64>,
) -> Option<(Matrix3<f64>, Rotation3<f64>, Vector3<f64>)> {
    let kr = projection.fixed_slice::<3, 3>(0, 0).into_owned();
    if kr.determinant().abs() < f64::EPSILON {
        return None;
    }

    let (mut k, mut r) = rq(&kr);

    // Make the diagonal of K positive, `K D D R` with `D = D^-1` keeps the product.
    for i in 0..3 {
        if k[(i, i)] < 0.0 {
            k.column_mut(i).neg_mut();
            r.row_mut(i).neg_mut();
        }
    }

    let mut translation = k.try_inverse()? * projection.column(3);
    // P and -P are the same camera.
    if r.determinant() < 0.0 {
        r.neg_mut();
        translation.neg_mut();
    }

    let k = k / k[(2, 2)];
    Some((k, Rotation3::from_matrix_unchecked(r), translation))
}

/// RQ decomposition of a 3x3 matrix, computed from the QR of its row-reversed transpose.
fn rq(matrix: &Matrix3<f64>) -> (Matrix3<f64>, Matrix3<f64>) {
    let flip = Matrix3::new(
        0.0, 0.0, 1.0, //
        0.0, 1.0, 0.0, //
        1.0, 0.0, 0.0,
    );
    let qr = (flip * matrix).transpose().qr();
    let upper = flip * qr.r().transpose() * flip;
    let orthogonal = flip * qr.q().transpose();
    (upper, orthogonal)
}
