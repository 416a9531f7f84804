use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use obj::{load_obj, Obj, Position};

use super::core::Material;
use super::error::{Result, SceneError};
use super::math::{Mat4, Vec3};
use super::surface::{Mesh, Triangle};

/// Loads a Wavefront OBJ file as a mesh, moving every vertex through `transform`.
pub fn load_mesh(path: impl AsRef<Path>, transform: &Mat4, material: Material) -> Result<Mesh> {
    let path = path.as_ref();
    let input = BufReader::new(File::open(path)?);
    let mesh = read_mesh(input, transform, material)?;
    debug!(
        "loaded {} with {} triangles",
        path.display(),
        mesh.triangles().len()
    );
    Ok(mesh)
}

/// Reads OBJ data from `input`. Degenerate faces are skipped with a warning.
pub fn read_mesh(input: impl BufRead, transform: &Mat4, material: Material) -> Result<Mesh> {
    let obj: Obj<Position, u32> = load_obj(input)?;
    let vertices: Vec<Vec3> = obj
        .vertices
        .iter()
        .map(|vertex| transform.apply(vertex.position.into()))
        .collect();
    let vertex = |face: usize, index: u32| {
        vertices
            .get(index as usize)
            .copied()
            .ok_or_else(|| SceneError::FaceIndexOutOfRange {
                face,
                index: index as usize,
                vertices: vertices.len(),
            })
    };

    let mut triangles = Vec::with_capacity(obj.indices.len() / 3);
    let mut skipped = 0;
    for (face, indices) in obj.indices.chunks_exact(3).enumerate() {
        let triangle = Triangle::new(
            vertex(face, indices[0])?,
            vertex(face, indices[1])?,
            vertex(face, indices[2])?,
        );
        if triangle.is_degenerate() {
            skipped += 1;
            continue;
        }
        triangles.push(triangle);
    }
    if skipped > 0 {
        warn!("skipped {} degenerate faces", skipped);
    }
    Ok(Mesh::from_triangles(triangles).with_material(material))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::core::Surface;
    use crate::raytracing::math::Ray;

    const QUAD: &str = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
v 0 0 0
f 1 2 3
f 1 3 4
f 1 2 1
";

    #[test]
    fn reads_faces_and_skips_degenerate_ones() {
        let mesh = read_mesh(QUAD.as_bytes(), &Mat4::identity(), Material::default()).unwrap();
        assert_eq!(mesh.triangles().len(), 2);
    }

    #[test]
    fn applies_transform_and_material() {
        let transform = Mat4::translate(Vec3::new(0.0, 0.0, -4.0));
        let material = Material {
            reflection: 0.3,
            ..Material::default()
        };
        let mesh = read_mesh(QUAD.as_bytes(), &transform, material).unwrap();
        let hit = mesh
            .intersect(&Ray::new(Vec3::new(0.5, -0.5, 0.0), -Vec3::z_axis()))
            .unwrap();
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert_eq!(hit.surface.material().reflection, 0.3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err =
            load_mesh("does/not/exist.obj", &Mat4::identity(), Material::default()).unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
