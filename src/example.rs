use std::path::PathBuf;

use crate::analysis::{Analysis, InitialFields, MeshSettings, SolverSettings};
use crate::args;
use crate::boundary::{BoundaryCondition, BoundaryKind, InletBc, OutletBc, WallBc, VelocitySpec};
use crate::geo_3d::{FaceCfg, FaceRef, Point};
use crate::physics::PhysicsModel;
use crate::units::Quantity;
use crate::CfdResult;

const OBJECT: &str = "Duct";

/// Outline of one side of the unit cube, wound so its normal points out of the cube.
fn cube_side(axis: usize, high: bool) -> Vec<Point> {
    let at = if high { 1.0 } else { 0.0 };
    let mut corners = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    if !high {
        corners.reverse();
    }
    corners.iter()
        .map(|[a, b]| match axis {
            0 => Point::new(at, *a, *b),
            1 => Point::new(*b, at, *a),
            _ => Point::new(*a, *b, at),
        })
        .collect()
}

fn side(name: &str, axis: usize, high: bool) -> FaceCfg {
    FaceCfg{object: OBJECT.to_string(), face: name.to_string(), points: cube_side(axis, high), stl: None}
}

/// A complete analysis of flow through a square duct.
pub fn example_analysis() -> Analysis {
    let faces = |names: &[&str]| names.iter().map(|name| FaceRef::new(OBJECT, name)).collect::<Vec<_>>();
    Analysis{
        version: Analysis::CURRENT_VERSION,
        name: "duct".to_string(),
        physics: PhysicsModel::default(),
        materials: Analysis::default_materials(),
        boundaries: vec![
            BoundaryCondition::new("inlet", faces(&["Face1"]),
                BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: Some(VelocitySpec::magnitude(Quantity::new(1.0, "m/s")))})),
            BoundaryCondition::new("outlet", faces(&["Face2"]),
                BoundaryKind::Outlet(OutletBc::StaticPressure{pressure: Some(Quantity::new(0.0, "Pa"))})),
            BoundaryCondition::new("walls", faces(&["Face3", "Face4", "Face5", "Face6"]),
                BoundaryKind::Wall(WallBc::Fixed)),
        ],
        initial: InitialFields::default(),
        mesh: MeshSettings::default(),
        solver: SolverSettings::default(),
        geometry: vec![
            side("Face1", 0, false),
            side("Face2", 0, true),
            side("Face3", 1, false),
            side("Face4", 1, true),
            side("Face5", 2, false),
            side("Face6", 2, true),
        ],
        base_dir: PathBuf::new(),
    }
}

/// Render the example analysis config in a config format.
pub fn render_config(format: args::Format) -> args::ProcResult<String> {
    let analysis = example_analysis();
    Ok(match format {
        args::Format::Yaml => serde_yaml::to_string(&analysis)?,
        args::Format::Json => serde_json::to_string_pretty(&analysis)?,
        args::Format::Toml => toml::to_string_pretty(&analysis)?,
    })
}

/// Display an example analysis config.
pub fn display_config(example_args: args::ExampleArgs) -> CfdResult<()> {
    println!("{}", render_config(example_args.format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case;

    #[test]
    fn example_is_valid_and_inflowing() {
        let analysis = example_analysis();
        let geometry = analysis.load_geometry().unwrap();
        assert_eq!(analysis.validate(&geometry), vec![]);
        for face in analysis.geometry.iter() {
            assert!(geometry.find(&face.reference()).unwrap().plane().is_ok());
        }

        let (_, files) = case::render_case(&analysis, &geometry).unwrap();
        let velocity = files.iter().find(|file| file.path == std::path::Path::new("0").join("U")).unwrap().parse().unwrap();
        assert_eq!(velocity.lookup_value("boundaryField/inlet/value").unwrap().to_string(), "uniform (1 0 0)");
    }

    #[test]
    fn every_format_reads_back() {
        let dir = std::env::temp_dir().join(format!("cfdcase_example_{}", std::process::id()));
        crate::io::create_dir_all(&dir).unwrap();
        for (format, name) in [(args::Format::Yaml, "duct.yaml"), (args::Format::Json, "duct.json"), (args::Format::Toml, "duct.toml")] {
            crate::io::write_to_file(dir.join(name), &render_config(format).unwrap()).unwrap();
            let loaded = crate::analysis::load_analysis(dir.join(name)).unwrap();
            assert_eq!(loaded.boundaries, example_analysis().boundaries);
            assert_eq!(loaded.geometry, example_analysis().geometry);
        }
        crate::io::remove_dir_if_present(&dir).unwrap();
    }
}
