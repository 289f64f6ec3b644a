use std::fmt;
use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::geo_3d::{
    Point,
    GeoVector,
    Plane,
    GeoError,
    ProcResult,
    err_str,
};

/// Relative tolerance for the planarity check, scaled by the face size.
const PLANARITY_TOLERANCE: f64 = 1e-6;

/// Reference to a face of a CAD object: (object name, sub-element name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaceRef {
    pub object: String,
    pub face: String,
}
impl FaceRef {
    pub fn new(object: &str, face: &str) -> Self {
        FaceRef{object: object.to_string(), face: face.to_string()}
    }
}
impl fmt::Display for FaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object, self.face)
    }
}

/// Face description as given in the analysis config.
/// Either an outline (ordered counter-clockwise when seen from outside the fluid domain)
/// or a path to a tessellated STL export of the face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaceCfg {
    pub object: String,
    pub face: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "outline")]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stl: Option<String>,
}
impl FaceCfg {
    pub fn reference(&self) -> FaceRef {
        FaceRef::new(&self.object, &self.face)
    }
}

/// A face, stored as triangles whose winding gives the outward normal.
#[derive(Debug, Clone)]
pub struct Face {
    pub reference: FaceRef,
    triangles: Vec<[Point; 3]>,
}
impl Face {
    /// Build a face from a closed outline (fan triangulated).
    pub fn from_outline(reference: FaceRef, points: &[Point]) -> ProcResult<Self> {
        if points.len() < 3 {
            return err_str(&format!("Face {} needs at least 3 outline points, got {}", reference, points.len()));
        }
        let triangles = (1..points.len() - 1)
            .map(|i| [points[0], points[i], points[i + 1]])
            .collect();
        Ok(Face{reference, triangles})
    }

    /// Build a face from an already tessellated set of triangles.
    pub fn from_triangles(reference: FaceRef, triangles: Vec<[Point; 3]>) -> Self {
        Face{reference, triangles}
    }

    /// Build a face from its config entry, loading STL data relative to `base_dir`.
    pub fn from_cfg(cfg: &FaceCfg, base_dir: &Path) -> ProcResult<Self> {
        match (&cfg.stl, cfg.points.is_empty()) {
            (Some(stl), true) => {
                let path = base_dir.join(stl);
                let triangles = crate::io::stl::load_stl_triangles(&path.to_string_lossy())?;
                Ok(Face::from_triangles(cfg.reference(), triangles))
            },
            (None, false) => Face::from_outline(cfg.reference(), &cfg.points),
            (Some(_), false) => err_str(&format!("Face {} has both an outline and an STL file", cfg.reference())),
            (None, true) => err_str(&format!("Face {} has neither an outline nor an STL file", cfg.reference())),
        }
    }

    /// Sum of the triangle area vectors. Its direction is the face normal for planar faces.
    pub fn area_vector(&self) -> GeoVector {
        let mut sum = GeoVector::zero();
        for [a, b, c] in self.triangles.iter() {
            sum += (*b - *a).cross(&(*c - *a)) * 0.5;
        }
        sum
    }

    /// Face area.
    pub fn area(&self) -> f64 {
        self.triangles.iter()
            .map(|[a, b, c]| (*b - *a).cross(&(*c - *a)).norm() * 0.5)
            .sum()
    }

    /// All triangle corners.
    pub fn vertices(&self) -> Vec<Point> {
        self.triangles.iter().flat_map(|tri| tri.iter().copied()).collect()
    }

    /// The plane of the face. Fails if the face is degenerate or not planar.
    pub fn plane(&self) -> ProcResult<Plane> {
        let vertices = self.vertices();
        let centroid = Point::centroid(&vertices);
        let size = vertices.iter().map(|p| p.distance(&centroid)).fold(0.0, f64::max);

        let area_vector = self.area_vector();
        if size == 0.0 || area_vector.norm() <= 1e-12 * size * size || area_vector.has_nan() {
            return Err(GeoError::Degenerate(self.reference.clone()));
        }

        let plane = Plane::from_normal_and_point(area_vector, centroid);
        let deviation = vertices.iter()
            .map(|p| plane.distance_to_point(p).abs())
            .fold(0.0, f64::max);
        if deviation > PLANARITY_TOLERANCE * size {
            return Err(GeoError::NonPlanar{face: self.reference.clone(), deviation});
        }
        Ok(plane)
    }

    /// Unit normal pointing out of the fluid domain.
    pub fn outward_normal(&self) -> ProcResult<GeoVector> {
        Ok(self.plane()?.get_normal())
    }
}

/// The set of faces boundary conditions can reference.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    faces: Vec<Face>,
}
impl Geometry {
    /// Create an empty geometry.
    pub fn new() -> Self {
        Geometry{faces: Vec::new()}
    }

    /// Load every face of the analysis config.
    pub fn from_cfgs(cfgs: &[FaceCfg], base_dir: &Path) -> ProcResult<Self> {
        let mut geometry = Geometry::new();
        for cfg in cfgs.iter() {
            if geometry.contains(&cfg.reference()) {
                return err_str(&format!("Face {} is defined twice", cfg.reference()));
            }
            geometry.add_face(Face::from_cfg(cfg, base_dir)?);
        }
        Ok(geometry)
    }

    /// Add a face, replacing any face with the same reference.
    pub fn add_face(&mut self, face: Face) {
        self.faces.retain(|f| f.reference != face.reference);
        self.faces.push(face);
    }

    /// Check whether a face is present.
    pub fn contains(&self, reference: &FaceRef) -> bool {
        self.faces.iter().any(|f| &f.reference == reference)
    }

    /// Look up a face by reference.
    pub fn find(&self, reference: &FaceRef) -> ProcResult<&Face> {
        self.faces.iter()
            .find(|f| &f.reference == reference)
            .ok_or_else(|| GeoError::MissingFace(reference.clone()))
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0, z),
            Point::new(1.0, 0.0, z),
            Point::new(1.0, 1.0, z),
            Point::new(0.0, 1.0, z),
        ]
    }

    #[test]
    fn outline_normal_follows_winding() {
        let face = Face::from_outline(FaceRef::new("Box", "Face1"), &square(2.0)).unwrap();
        let normal = face.outward_normal().unwrap();
        assert!((normal.z - 1.0).abs() < 1e-12);
        assert!((face.area() - 1.0).abs() < 1e-12);

        let mut reversed = square(2.0);
        reversed.reverse();
        let face = Face::from_outline(FaceRef::new("Box", "Face2"), &reversed).unwrap();
        assert!((face.outward_normal().unwrap().z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_planar_face_is_rejected() {
        let mut points = square(0.0);
        points[2].z = 0.2;
        let face = Face::from_outline(FaceRef::new("Box", "Warped"), &points).unwrap();
        assert!(matches!(face.outward_normal(), Err(GeoError::NonPlanar{..})));
    }

    #[test]
    fn degenerate_face_is_rejected() {
        let points = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0)];
        let face = Face::from_outline(FaceRef::new("Box", "Line"), &points).unwrap();
        assert!(matches!(face.outward_normal(), Err(GeoError::Degenerate(_))));
    }

    #[test]
    fn geometry_lookup() {
        let cfgs = vec![FaceCfg{object: "Box".to_string(), face: "Face1".to_string(), points: square(0.0), stl: None}];
        let geometry = Geometry::from_cfgs(&cfgs, Path::new(".")).unwrap();
        assert_eq!(geometry.len(), 1);
        assert!(geometry.find(&FaceRef::new("Box", "Face1")).is_ok());
        assert!(matches!(geometry.find(&FaceRef::new("Box", "Face9")), Err(GeoError::MissingFace(_))));

        let duplicated = vec![cfgs[0].clone(), cfgs[0].clone()];
        assert!(Geometry::from_cfgs(&duplicated, Path::new(".")).is_err());
    }
}
