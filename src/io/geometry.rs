use nalgebra::Vector3;
use ndarray::prelude::*;

/// Point cloud attributes written to and read from geometry files.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// The 3D points. Shape is (Nx3).
    pub points: Array2<f64>,
    /// The RGB colors. Shape is (Nx3).
    pub colors: Option<Array2<u8>>,
}

impl Geometry {
    pub fn from_points(points: &[Vector3<f64>]) -> Self {
        Self {
            points: Array2::from_shape_fn((points.len(), 3), |(i, c)| points[i][c]),
            colors: None,
        }
    }

    /// Paints every vertex with the same color.
    pub fn with_color(mut self, rgb: [u8; 3]) -> Self {
        self.colors = Some(Array2::from_shape_fn((self.len_vertices(), 3), |(_, c)| {
            rgb[c]
        }));
        self
    }

    /// Appends the vertices of `other`. Colors are kept only if both geometries have them.
    pub fn stack(&self, other: &Geometry) -> Geometry {
        let colors = match (&self.colors, &other.colors) {
            (Some(lhs), Some(rhs)) => Some(vstack(lhs, rhs)),
            _ => None,
        };

        Geometry {
            points: vstack(&self.points, &other.points),
            colors,
        }
    }

    pub fn len_vertices(&self) -> usize {
        self.points.nrows()
    }

    pub fn point(&self, index: usize) -> Vector3<f64> {
        Vector3::new(
            self.points[[index, 0]],
            self.points[[index, 1]],
            self.points[[index, 2]],
        )
    }
}

fn vstack<T: Copy>(top: &Array2<T>, bottom: &Array2<T>) -> Array2<T> {
    let top_rows = top.nrows();
    Array2::from_shape_fn((top_rows + bottom.nrows(), 3), |(i, c)| {
        if i < top_rows {
            top[[i, c]]
        } else {
            bottom[[i - top_rows, c]]
        }
    })
}
