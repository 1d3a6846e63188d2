use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::{Geometry, LoadError};
use ndarray::{Array2, Axis};
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use ply_rs::{parser, ply};

/// Vertex attributes we care about. Coordinates may be stored as float or double.
#[derive(Debug)]
struct Vertex {
    point: [f64; 3],
    color: [u8; 3],
}

impl ply::PropertyAccess for Vertex {
    fn new() -> Self {
        Vertex {
            point: [0f64; 3],
            color: [0u8; 3],
        }
    }
    fn set_property(&mut self, key: String, property: ply::Property) {
        let axis = match key.as_str() {
            "x" => Some(0),
            "y" => Some(1),
            "z" => Some(2),
            _ => None,
        };
        match (axis, key.as_str(), property) {
            (Some(axis), _, ply::Property::Double(v)) => self.point[axis] = v,
            (Some(axis), _, ply::Property::Float(v)) => self.point[axis] = v as f64,
            (None, "red", ply::Property::UChar(v)) => self.color[0] = v,
            (None, "green", ply::Property::UChar(v)) => self.color[1] = v,
            (None, "blue", ply::Property::UChar(v)) => self.color[2] = v,
            (_, _, _) => (),
        }
    }
}

/// Reads the vertices of a PLY file. Other elements are skipped.
pub fn read_ply<P>(filepath: P) -> Result<Geometry, LoadError>
where
    P: AsRef<Path>,
{
    let filepath = filepath.as_ref();
    let fptr = File::open(filepath).map_err(|err| LoadError::file(filepath, err))?;
    let mut f = std::io::BufReader::new(fptr);

    let vertex_parser = parser::Parser::<Vertex>::new();
    let header = vertex_parser.read_header(&mut f)?;

    let mut geometry = None;
    for (_ignore_key, element) in &header.elements {
        if element.name != "vertex" {
            // Elements are stored sequentially, the rest must be consumed to move on.
            let skip_parser = parser::Parser::<DefaultElement>::new();
            skip_parser.read_payload_for_element(&mut f, element, &header)?;
            continue;
        }

        let vertex_vec = vertex_parser.read_payload_for_element(&mut f, element, &header)?;
        let points = Array2::<f64>::from_shape_fn((vertex_vec.len(), 3), |(i, c)| {
            vertex_vec[i].point[c]
        });

        let colors = ["red", "green", "blue"]
            .iter()
            .all(|k| element.properties.contains_key(*k))
            .then(|| {
                Array2::<u8>::from_shape_fn((vertex_vec.len(), 3), |(i, c)| vertex_vec[i].color[c])
            });

        geometry = Some(Geometry { points, colors });
    }

    geometry.ok_or_else(|| {
        LoadError::ParseError(format!("{}: no vertex element", filepath.display()))
    })
}

/// Writes the geometry as an ASCII PLY with double precision coordinates.
pub fn write_ply<P>(filepath: P, geom: &Geometry) -> Result<(), LoadError>
where
    P: AsRef<Path>,
{
    let mut ply = {
        let mut ply = Ply::<DefaultElement>::new();
        let mut vertex_element = ElementDef::new("vertex".to_string());
        ["x", "y", "z"].iter().for_each(|key| {
            vertex_element.properties.add(PropertyDef::new(
                key.to_string(),
                PropertyType::Scalar(ScalarType::Double),
            ));
        });

        let mut vertex_array: Vec<DefaultElement> = geom
            .points
            .axis_iter(Axis(0))
            .map(|point| {
                let mut elem = DefaultElement::new();
                elem.insert("x".to_string(), Property::Double(point[0]));
                elem.insert("y".to_string(), Property::Double(point[1]));
                elem.insert("z".to_string(), Property::Double(point[2]));
                elem
            })
            .collect();

        if let Some(colors) = &geom.colors {
            ["red", "green", "blue"].iter().for_each(|key| {
                vertex_element.properties.add(PropertyDef::new(
                    key.to_string(),
                    PropertyType::Scalar(ScalarType::UChar),
                ));
            });

            colors
                .axis_iter(Axis(0))
                .enumerate()
                .for_each(|(i, color)| {
                    vertex_array[i].insert("red".to_string(), Property::UChar(color[0]));
                    vertex_array[i].insert("green".to_string(), Property::UChar(color[1]));
                    vertex_array[i].insert("blue".to_string(), Property::UChar(color[2]));
                });
        }

        ply.header.elements.add(vertex_element);
        ply.payload.insert("vertex".to_string(), vertex_array);

        ply.make_consistent()
            .map_err(|err| LoadError::ParseError(format!("inconsistent PLY: {err:?}")))?;
        ply
    };

    ply.header.encoding = Encoding::Ascii;

    let filepath = filepath.as_ref();
    let mut buf =
        BufWriter::new(File::create(filepath).map_err(|err| LoadError::file(filepath, err))?);
    Writer::new().write_ply(&mut buf, &mut ply)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{read_ply, write_ply};
    use crate::io::Geometry;
    use nalgebra::Vector3;

    #[test]
    fn should_read_what_was_written() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("cameras.ply");
        let geom = Geometry::from_points(&[
            Vector3::new(0.125, -3.5, 1e-7),
            Vector3::new(1234.5678901234, 2.0, -0.333333333333),
        ])
        .with_color([0, 255, 0]);

        write_ply(&filepath, &geom).unwrap();
        let read = read_ply(&filepath).unwrap();

        assert_eq!(read.len_vertices(), 2);
        assert_eq!(read.point(0), geom.point(0));
        assert!((read.point(1) - geom.point(1)).norm() < 1e-9);
        assert_eq!(read.colors.unwrap().row(1).to_vec(), vec![0, 255, 0]);
    }

    #[test]
    fn should_write_header_without_colors() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("plain.ply");
        write_ply(&filepath, &Geometry::from_points(&[Vector3::new(1.0, 2.0, 3.0)])).unwrap();

        let text = std::fs::read_to_string(&filepath).unwrap();
        assert!(text.starts_with("ply"));
        assert!(text.contains("element vertex 1"));
        assert!(text.contains("property double x"));
        assert!(!text.contains("red"));
        assert!(read_ply(&filepath).unwrap().colors.is_none());
    }
}
