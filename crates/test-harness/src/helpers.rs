//! Reference bodies and file fixtures shared by the scenario suite.

use std::path::{Path, PathBuf};

use gravity_kernel::{
    IntegrityPolicy, MetricUnit, NormalOrientation, Polyhedron, PolyhedronError, Vec3,
};

/// Errors raised by harness helpers and assertions.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("fixture setup failed: {0}")]
    Fixture(#[from] std::io::Error),

    #[error(transparent)]
    Polyhedron(#[from] PolyhedronError),
}

/// The eight corners of the [-1, 1]^3 cube.
pub fn cube_vertices() -> Vec<Vec3> {
    vec![
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ]
}

/// Twelve triangular faces of the cube with outward winding.
pub fn cube_faces() -> Vec<[usize; 3]> {
    vec![
        [1, 3, 2],
        [0, 3, 1],
        [0, 1, 5],
        [0, 5, 4],
        [0, 7, 3],
        [0, 4, 7],
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 6],
        [3, 7, 6],
        [4, 5, 6],
        [4, 6, 7],
    ]
}

/// The unit-density cube in the given metric unit, integrity verified.
pub fn unit_cube(unit: MetricUnit) -> Result<Polyhedron, HarnessError> {
    Ok(Polyhedron::new(
        cube_vertices(),
        cube_faces(),
        1.0,
        NormalOrientation::Outwards,
        IntegrityPolicy::Verify,
        unit,
    )?)
}

/// The cube with selected faces flipped (first two indices swapped) and
/// integrity checking disabled, for orientation-detection scenarios.
pub fn cube_with_flipped_faces(flipped: &[usize]) -> Result<Polyhedron, HarnessError> {
    let mut faces = cube_faces();
    for &index in flipped {
        faces[index].swap(0, 1);
    }
    Ok(Polyhedron::new(
        cube_vertices(),
        faces,
        1.0,
        NormalOrientation::Outwards,
        IntegrityPolicy::Disable,
        MetricUnit::Unitless,
    )?)
}

/// A fresh scratch directory for file-based fixtures.
pub fn scratch_dir(tag: &str) -> Result<PathBuf, HarnessError> {
    let dir = std::env::temp_dir().join(format!(
        "gravity-harness-{tag}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Writes a text fixture into the scratch directory and returns its path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> Result<PathBuf, HarnessError> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

/// The cube as Wavefront OBJ text.
pub fn cube_obj() -> String {
    let mut text = String::new();
    for vertex in cube_vertices() {
        text.push_str(&format!("v {} {} {}\n", vertex.x, vertex.y, vertex.z));
    }
    for face in cube_faces() {
        text.push_str(&format!(
            "f {} {} {}\n",
            face[0] + 1,
            face[1] + 1,
            face[2] + 1
        ));
    }
    text
}

/// The cube as Geomview OFF text.
pub fn cube_off() -> String {
    let vertices = cube_vertices();
    let faces = cube_faces();
    let mut text = format!("OFF\n{} {} 0\n", vertices.len(), faces.len());
    for vertex in vertices {
        text.push_str(&format!("{} {} {}\n", vertex.x, vertex.y, vertex.z));
    }
    for face in faces {
        text.push_str(&format!("3 {} {} {}\n", face[0], face[1], face[2]));
    }
    text
}

/// The cube as a TetGen `.node` file (one-based).
pub fn cube_node() -> String {
    let vertices = cube_vertices();
    let mut text = format!("{} 3 0 0\n", vertices.len());
    for (index, vertex) in vertices.iter().enumerate() {
        text.push_str(&format!(
            "{} {} {} {}\n",
            index + 1,
            vertex.x,
            vertex.y,
            vertex.z
        ));
    }
    text
}

/// The cube as a TetGen `.face` file matching [`cube_node`].
pub fn cube_face() -> String {
    let faces = cube_faces();
    let mut text = format!("{} 0\n", faces.len());
    for (index, face) in faces.iter().enumerate() {
        text.push_str(&format!(
            "{} {} {} {}\n",
            index + 1,
            face[0] + 1,
            face[1] + 1,
            face[2] + 1
        ));
    }
    text
}

/// The cube as ASCII STL text.
pub fn cube_stl() -> String {
    let vertices = cube_vertices();
    let mut text = String::from("solid cube\n");
    for face in cube_faces() {
        text.push_str("  facet normal 0 0 0\n    outer loop\n");
        for &index in &face {
            let v = vertices[index];
            text.push_str(&format!("      vertex {} {} {}\n", v.x, v.y, v.z));
        }
        text.push_str("    endloop\n  endfacet\n");
    }
    text.push_str("endsolid cube\n");
    text
}

/// The cube as a Medit `.mesh` file (one-based).
pub fn cube_medit() -> String {
    let vertices = cube_vertices();
    let faces = cube_faces();
    let mut text = String::from("MeshVersionFormatted 1\nDimension 3\nVertices\n");
    text.push_str(&format!("{}\n", vertices.len()));
    for vertex in vertices {
        text.push_str(&format!("{} {} {} 0\n", vertex.x, vertex.y, vertex.z));
    }
    text.push_str(&format!("Triangles\n{}\n", faces.len()));
    for face in faces {
        text.push_str(&format!(
            "{} {} {} 0\n",
            face[0] + 1,
            face[1] + 1,
            face[2] + 1
        ));
    }
    text.push_str("End\n");
    text
}
