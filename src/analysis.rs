//! The analysis: physics, materials, boundary conditions, initial fields,
//! mesh and solver settings, written out as one case directory.

mod settings;
mod legacy;
mod proc_errors;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use crate::boundary::{BoundaryCondition, ValidationContext};
use crate::geo_3d::{FaceCfg, Geometry};
use crate::material::FluidMaterial;
use crate::physics::PhysicsModel;
use crate::units::Dimension;
use crate::validation::ValidationError;

pub use settings::{
    InitialFields,
    MeshSettings,
    SolverSettings,
};
pub use legacy::{
    AnalysisV1,
    LegacyBoundary,
    LegacyValues,
    migrate_v1_to_v2,
};
pub use proc_errors::{
    AnalysisError,
    ProcResult,
    err_str,
};

/// A complete analysis (current config version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Analysis {
    #[serde(default = "Analysis::current_version")]
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub physics: PhysicsModel,
    /// Fluids. Free-surface analyses take two, the first being the tracked phase.
    #[serde(default = "Analysis::default_materials")]
    pub materials: Vec<FluidMaterial>,
    #[serde(default)]
    pub boundaries: Vec<BoundaryCondition>,
    #[serde(default)]
    pub initial: InitialFields,
    #[serde(default)]
    pub mesh: MeshSettings,
    #[serde(default)]
    pub solver: SolverSettings,
    /// Faces boundary conditions refer to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geometry: Vec<FaceCfg>,
    /// Directory relative paths are resolved against (the config file's directory).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Analysis {
    pub const CURRENT_VERSION: u32 = 2;

    pub fn current_version() -> u32 {
        Analysis::CURRENT_VERSION
    }
    pub fn default_materials() -> Vec<FluidMaterial> {
        FluidMaterial::preset("air").into_iter().collect()
    }

    /// Phase names of a free-surface analysis, empty otherwise.
    pub fn phases(&self) -> Vec<String> {
        if !self.physics.is_free_surface() {
            return Vec::new();
        }
        self.materials.iter().map(|material| material.name.clone()).collect()
    }

    /// Load the faces the boundaries refer to.
    pub fn load_geometry(&self) -> ProcResult<Geometry> {
        Ok(Geometry::from_cfgs(&self.geometry, &self.base_dir)?)
    }

    /// Resolve a path given in the config.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Check the whole analysis. Every problem found is returned.
    pub fn validate(&self, geometry: &Geometry) -> Vec<ValidationError> {
        let mut errors = self.physics.validate();

        errors.extend(self.validate_materials());

        if self.boundaries.is_empty() {
            errors.push(ValidationError::new("analysis", "Boundaries", "no boundary conditions defined"));
        }
        let mut names = BTreeSet::new();
        let mut claimed = BTreeSet::new();
        let phases = self.phases();
        let ctx = ValidationContext{physics: &self.physics, geometry, phases: &phases};
        for boundary in self.boundaries.iter() {
            if !names.insert(boundary.name.as_str()) {
                errors.push(ValidationError::new("analysis", "Boundaries", &format!("boundary name '{}' is used twice", boundary.name)));
            }
            for face in boundary.faces.iter() {
                if !claimed.insert(face) {
                    errors.push(ValidationError::new(&format!("boundary '{}'", boundary.name), "Faces",
                        &format!("face {} already belongs to another boundary", face)));
                }
            }
            errors.extend(boundary.validate(&ctx));
        }

        errors.extend(self.validate_initial(&phases));
        errors.extend(self.validate_solver());
        errors
    }

    fn validate_materials(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let expected = if self.physics.is_free_surface() { 2 } else { 1 };
        if self.materials.len() != expected {
            errors.push(ValidationError::new("analysis", "Materials",
                &format!("{} material(s) expected for {} phase flow, got {}", expected, self.physics.phase, self.materials.len())));
        }
        let mut names = BTreeSet::new();
        for material in self.materials.iter() {
            if !names.insert(material.name.as_str()) {
                errors.push(ValidationError::new("analysis", "Materials", &format!("material name '{}' is used twice", material.name)));
            }
            errors.extend(material.validate(&self.physics));
            if let Err(error) = material.to_si() {
                errors.push(ValidationError::new(&format!("material '{}'", material.name), "Units", error.error.to_string().trim_start_matches("- ")));
            }
        }
        if self.physics.is_free_surface() && self.materials.first().map_or(false, |m| m.surface_tension.is_none()) {
            errors.push(ValidationError::new(&format!("material '{}'", self.materials[0].name), "SurfaceTension",
                "required for the tracked phase of a free-surface flow"));
        }
        errors
    }

    fn validate_initial(&self, phases: &[String]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut check = |field: &str, result: bool| {
            if !result {
                errors.push(ValidationError::new("initial", field, "value has the wrong unit"));
            }
        };
        let initial = &self.initial;
        check("Velocity", initial.velocity.iter().all(|u| u.to_si(Dimension::Velocity).is_ok()));
        check("Pressure", initial.pressure.to_si(Dimension::Pressure).is_ok());
        check("ReferencePressure", initial.reference_pressure.to_si(Dimension::Pressure).is_ok());
        if self.physics.has_energy() {
            check("Temperature", initial.temperature.to_si(Dimension::Temperature).map_or(false, |t| t > 0.0));
        }
        if let Some(model) = self.physics.turbulence_model() {
            for quantity in model.solved_fields() {
                check(&quantity.to_string(), initial.turbulence_value(*quantity).to_si(quantity.dimension()).is_ok());
            }
        }
        for (phase, fraction) in initial.volume_fractions.iter() {
            if !phases.contains(phase) || !(0.0..=1.0).contains(fraction) {
                errors.push(ValidationError::new("initial", "VolumeFraction", &format!("'{}' must be a phase with a fraction between 0 and 1", phase)));
            }
        }
        if initial.potential_flow && !self.physics.is_viscous() {
            errors.push(ValidationError::new("initial", "PotentialFlow", "the analysis already is a potential-flow analysis"));
        }
        errors
    }

    fn validate_solver(&self) -> Vec<ValidationError> {
        let solver = &self.solver;
        let mut errors = Vec::new();
        let positive = [
            ("EndTime", solver.end_time),
            ("TimeStep", solver.time_step),
            ("WriteInterval", solver.write_interval),
            ("MaxCourant", solver.max_courant),
            ("ConvergenceTolerance", solver.convergence_tolerance),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                errors.push(ValidationError::new("solver", field, "must be a positive number"));
            }
        }
        if solver.cores == 0 {
            errors.push(ValidationError::new("solver", "Cores", "at least one core is needed"));
        }
        if solver.outer_correctors == 0 {
            errors.push(ValidationError::new("solver", "OuterCorrectors", "at least one outer corrector is needed"));
        }
        if let Some(scale) = self.mesh.scale {
            if !(scale > 0.0 && scale.is_finite()) {
                errors.push(ValidationError::new("mesh", "Scale", "must be a positive number"));
            }
        }
        errors
    }
}

/// Load an analysis config of any supported version and format.
/// Configs without a `version` are version 1.
pub fn load_analysis<P: AsRef<Path>>(path: P) -> ProcResult<Analysis> {
    let value: serde_json::Value = crate::io::read_cfg_file(&path)?;
    let version = match value.get("version") {
        None => 1,
        Some(version) => match version.as_u64() {
            Some(version) => version,
            None => return err_str(&format!("Config version must be a whole number, got {}", version)),
        },
    };
    let mut analysis = match version {
        1 => migrate_v1_to_v2(serde_json::from_value(value)?)?,
        2 => serde_json::from_value::<Analysis>(value)?,
        other => return err_str(&format!("Unsupported config version {} (supported: 1, {})", other, Analysis::CURRENT_VERSION)),
    };
    analysis.base_dir = path.as_ref().parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BoundaryKind, InletBc, OutletBc, WallBc, VelocitySpec};
    use crate::geo_3d::{FaceRef, Point};
    use crate::physics::{PhaseMode, TimeScheme};
    use crate::units::Quantity;

    fn square(x: f64) -> Vec<Point> {
        vec![
            Point::new(x, 0.0, 0.0),
            Point::new(x, 0.0, 1.0),
            Point::new(x, 1.0, 1.0),
            Point::new(x, 1.0, 0.0),
        ]
    }

    fn analysis() -> Analysis {
        let face = |name: &str, x: f64| FaceCfg{object: "Duct".to_string(), face: name.to_string(), points: square(x), stl: None};
        Analysis{
            version: Analysis::CURRENT_VERSION,
            name: "duct".to_string(),
            physics: PhysicsModel::default(),
            materials: Analysis::default_materials(),
            boundaries: vec![
                BoundaryCondition::new("inlet", vec![FaceRef::new("Duct", "Face1")],
                    BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: Some(VelocitySpec::cartesian(1.0, 0.0, 0.0, "m/s"))})),
                BoundaryCondition::new("outlet", vec![FaceRef::new("Duct", "Face2")],
                    BoundaryKind::Outlet(OutletBc::StaticPressure{pressure: Some(Quantity::new(0.0, "Pa"))})),
            ],
            initial: InitialFields::default(),
            mesh: MeshSettings::default(),
            solver: SolverSettings::default(),
            geometry: vec![face("Face1", 0.0), face("Face2", 1.0)],
            base_dir: PathBuf::new(),
        }
    }

    #[test]
    fn valid_analysis_passes() {
        let analysis = analysis();
        let geometry = analysis.load_geometry().unwrap();
        assert_eq!(analysis.validate(&geometry), vec![]);
    }

    #[test]
    fn duplicates_are_reported() {
        let mut analysis = analysis();
        let mut wall = analysis.boundaries[1].clone();
        wall.kind = BoundaryKind::Wall(WallBc::Fixed);
        analysis.boundaries.push(wall);
        let geometry = analysis.load_geometry().unwrap();
        let errors = analysis.validate(&geometry);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|error| error.field == "Boundaries" || error.field == "Faces"));
    }

    #[test]
    fn free_surface_needs_two_phases() {
        let mut analysis = analysis();
        analysis.physics.phase = PhaseMode::FreeSurface;
        analysis.physics.time = TimeScheme::Transient;
        let geometry = analysis.load_geometry().unwrap();
        assert!(crate::validation::names_field(&analysis.validate(&geometry), "Materials"));

        analysis.materials = vec![FluidMaterial::preset("water").unwrap(), FluidMaterial::preset("air").unwrap()];
        analysis.initial.volume_fractions.insert("water".to_string(), 1.0);
        assert_eq!(analysis.validate(&geometry), vec![]);
        assert_eq!(analysis.phases(), vec!["water".to_string(), "air".to_string()]);
    }

    #[test]
    fn loads_both_versions() {
        let dir = std::env::temp_dir().join(format!("cfdcase_analysis_{}", std::process::id()));
        crate::io::create_dir_all(&dir).unwrap();

        let v2 = serde_yaml::to_string(&analysis()).unwrap();
        crate::io::write_to_file(dir.join("v2.yaml"), &v2).unwrap();
        let loaded = load_analysis(dir.join("v2.yaml")).unwrap();
        assert_eq!(loaded.boundaries, analysis().boundaries);
        assert_eq!(loaded.base_dir, dir);

        crate::io::write_to_file(dir.join("v1.json"), "{\"name\": \"old\", \"boundaries\": [{\"Name\": \"in\", \"BoundaryType\": \"inlet\", \"BoundarySubtype\": \"totalPressureInlet\", \"Pressure\": \"1 kPa\"}]}").unwrap();
        let loaded = load_analysis(dir.join("v1.json")).unwrap();
        assert_eq!(loaded.version, 2);
        assert_eq!(loaded.boundaries[0].kind, BoundaryKind::Inlet(InletBc::TotalPressure{pressure: Some(Quantity::new(1.0, "kPa"))}));

        crate::io::write_to_file(dir.join("v9.json"), "{\"version\": 9, \"name\": \"new\"}").unwrap();
        assert!(matches!(load_analysis(dir.join("v9.json")), Err(AnalysisError::StringOnly(_))));

        crate::io::remove_dir_if_present(&dir).unwrap();
    }
}
