use std::path::{Path, PathBuf};

use cfdcase::analysis::Analysis;
use cfdcase::boundary::{BoundaryKind, InletBc, OutletBc, VelocitySpec};
use cfdcase::case::{self, CaseError, Dict, Value};
use cfdcase::example::example_analysis;
use cfdcase::units::Quantity;

/// Fresh scratch directory for one test.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cfdcase_{}_{}", name, std::process::id()));
    cfdcase::io::remove_dir_if_present(&dir).unwrap();
    cfdcase::io::create_dir_all(&dir).unwrap();
    dir
}

fn set_inlet(analysis: &mut Analysis, kind: BoundaryKind) {
    analysis.boundaries[0].kind = kind;
}

fn inlet_velocity(analysis: &Analysis) -> String {
    let geometry = analysis.load_geometry().unwrap();
    let (_, files) = case::render_case(analysis, &geometry).unwrap();
    let velocity = files.iter().find(|file| file.path == Path::new("0").join("U")).unwrap();
    velocity.parse().unwrap().lookup_value("boundaryField/inlet/value").unwrap().to_string()
}

#[test]
fn uniform_inlet_writes_fixed_value() {
    let dir = scratch("uniform_inlet");
    let mut analysis = example_analysis();
    set_inlet(&mut analysis, BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: Some(VelocitySpec::cartesian(1.0, 0.0, 0.0, "m/s"))}));
    let geometry = analysis.load_geometry().unwrap();

    let summary = case::write_case(&analysis, &geometry, dir.join("duct"), true).unwrap();
    assert_eq!(summary.application.to_string(), "simpleFoam");
    assert!(summary.files.contains(&PathBuf::from("Allrun")));

    let velocity = case::read_foam_file(dir.join("duct").join("0").join("U")).unwrap();
    assert_eq!(velocity.lookup_value("boundaryField/inlet/type").unwrap().as_word(), Some("fixedValue"));
    assert_eq!(velocity.lookup_value("boundaryField/inlet/value").unwrap().to_string(), "uniform (1 0 0)");
    assert_eq!(velocity.lookup_value("boundaryField/walls/type").unwrap().as_word(), Some("noSlip"));
    assert!(!dir.join("duct.tmp").exists());

    cfdcase::io::remove_dir_if_present(&dir).unwrap();
}

#[test]
fn velocity_magnitude_follows_the_face_normal() {
    let mut analysis = example_analysis();
    set_inlet(&mut analysis, BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: Some(VelocitySpec::magnitude(Quantity::new(2.0, "m/s")))}));
    // Inlets point into the domain by default
    assert_eq!(inlet_velocity(&analysis), "uniform (2 0 0)");

    analysis.boundaries[0].reverse_normal = Some(false);
    assert_eq!(inlet_velocity(&analysis), "uniform (-2 0 0)");
}

fn field_file(analysis: &Analysis, name: &str) -> Dict {
    let geometry = analysis.load_geometry().unwrap();
    let (_, files) = case::render_case(analysis, &geometry).unwrap();
    files.iter().find(|file| file.path == Path::new("0").join(name)).unwrap().parse().unwrap()
}

#[test]
fn converted_units_reach_the_field_files() {
    let mut analysis = example_analysis();
    set_inlet(&mut analysis, BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: Some(VelocitySpec::cartesian(36.0, 0.0, 0.0, "km/h"))}));
    analysis.boundaries[1].kind = BoundaryKind::Outlet(OutletBc::StaticPressure{pressure: Some(Quantity::new(1.2, "kPa"))});

    match field_file(&analysis, "U").lookup_value("boundaryField/inlet/value") {
        Some(Value::Uniform(value)) => match value.as_ref() {
            Value::Vector([ux, uy, uz]) => {
                assert!((ux - 10.0).abs() < 1e-9, "{}", ux);
                assert_eq!((*uy, *uz), (0.0, 0.0));
            },
            other => panic!("expected a vector, got {:?}", other),
        },
        other => panic!("expected a uniform value, got {:?}", other),
    }

    // Incompressible solvers take p / rho, with rho = 1.2 kg/m^3 for air
    match field_file(&analysis, "p").lookup_value("boundaryField/outlet/value") {
        Some(Value::Uniform(value)) => {
            let kinematic = value.as_number().unwrap();
            assert!((kinematic - 1000.0).abs() < 1e-6, "{}", kinematic);
        },
        other => panic!("expected a uniform value, got {:?}", other),
    }
}

#[test]
fn missing_total_pressure_names_the_field() {
    let mut analysis = example_analysis();
    set_inlet(&mut analysis, BoundaryKind::Inlet(InletBc::TotalPressure{pressure: None}));
    let geometry = analysis.load_geometry().unwrap();
    match case::render_case(&analysis, &geometry) {
        Err(CaseError::Invalid(errors)) => {
            assert!(errors.iter().any(|error| error.field == "Pressure" && error.context.contains("inlet")));
        },
        other => panic!("expected a validation error, got {:?}", other.map(|(app, _)| app)),
    }
}

#[test]
fn unit_mismatch_is_an_error() {
    let mut analysis = example_analysis();
    set_inlet(&mut analysis, BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: Some(VelocitySpec::cartesian(1.0, 0.0, 0.0, "Pa"))}));
    let geometry = analysis.load_geometry().unwrap();
    match case::render_case(&analysis, &geometry) {
        Err(CaseError::Invalid(errors)) => assert!(errors.iter().any(|error| error.field == "Velocity")),
        other => panic!("expected a unit error, got {:?}", other.map(|(app, _)| app)),
    }
}

#[test]
fn failed_write_keeps_the_previous_case() {
    let dir = scratch("failed_write");
    let case_dir = dir.join("duct");
    let mut analysis = example_analysis();
    let geometry = analysis.load_geometry().unwrap();
    case::write_case(&analysis, &geometry, &case_dir, true).unwrap();
    let control_dict = cfdcase::io::read_to_string(case_dir.join("system").join("controlDict")).unwrap();

    // The mesh directory does not exist, so the write fails part way
    analysis.solver.end_time = 5000.0;
    analysis.mesh.mesh_dir = Some(dir.join("no_mesh").display().to_string());
    assert!(case::write_case(&analysis, &geometry, &case_dir, true).is_err());
    assert_eq!(cfdcase::io::read_to_string(case_dir.join("system").join("controlDict")).unwrap(), control_dict);

    // Retrying once the mesh is there succeeds
    let poly_mesh = dir.join("no_mesh").join("polyMesh");
    cfdcase::io::create_dir_all(&poly_mesh).unwrap();
    for file in ["points", "faces", "owner", "neighbour", "boundary"] {
        cfdcase::io::write_to_file(poly_mesh.join(file), "FoamFile {}\n").unwrap();
    }
    case::write_case(&analysis, &geometry, &case_dir, true).unwrap();
    assert!(case_dir.join("constant").join("polyMesh").join("points").is_file());
    let control_dict = case::read_foam_file(case_dir.join("system").join("controlDict")).unwrap();
    assert_eq!(control_dict.get_value("endTime").unwrap().as_number(), Some(5000.0));
    assert!(!dir.join("duct.tmp").exists());
    assert!(!dir.join("duct.old").exists());

    cfdcase::io::remove_dir_if_present(&dir).unwrap();
}
