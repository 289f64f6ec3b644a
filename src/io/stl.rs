use stl_io;

use crate::io;
use crate::geo_3d::Point;

/// Load the triangles of a tessellated face from an STL file (ascii or binary).
/// Uses the external `stl_io` crate.
/// Triangle winding is kept as exported, so it carries the face orientation.
pub fn load_stl_triangles(filename: &str) -> io::IoResult<Vec<[Point; 3]>> {
    let mut file = io::open(filename)?;
    let stl = match stl_io::read_stl(&mut file)
    {
        Ok(stl) => stl,
        Err(error) => {
            return Err(io::IoError{file: Some(filename.to_string()), cause: io::IoErrorType::File(error)});
        },
    };

    let to_point = |index: usize| {
        let vertex = &stl.vertices[index];
        Point::new(vertex[0] as f64, vertex[1] as f64, vertex[2] as f64)
    };

    let triangles: Vec<[Point; 3]> = stl.faces.iter()
        .map(|face| [to_point(face.vertices[0]), to_point(face.vertices[1]), to_point(face.vertices[2])])
        .collect();

    if triangles.is_empty() {
        return Err(io::IoError{file: Some(filename.to_string()), cause: io::IoErrorType::StringOnly("STL file has no triangles".to_string())});
    }
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_ascii_stl() {
        let path = std::env::temp_dir().join(format!("cfdcase_stl_{}.stl", std::process::id()));
        let text = concat!(
            "solid inlet\n",
            "  facet normal 0 0 1\n",
            "    outer loop\n",
            "      vertex 0 0 0\n",
            "      vertex 1 0 0\n",
            "      vertex 1 1 0\n",
            "    endloop\n",
            "  endfacet\n",
            "endsolid inlet\n",
        );
        std::fs::write(&path, text).unwrap();
        let triangles = load_stl_triangles(&path.to_string_lossy()).unwrap();
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0][1], Point::new(1.0, 0.0, 0.0));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = load_stl_triangles("does/not/exist.stl").unwrap_err();
        assert_eq!(error.file.as_deref(), Some("does/not/exist.stl"));
    }
}
