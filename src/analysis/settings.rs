use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::physics::TurbulenceQuantity;
use crate::units::Quantity;

/// Initial values of the solved fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitialFields {
    /// Velocity components.
    #[serde(default = "InitialFields::default_velocity", alias = "U")]
    pub velocity: [Quantity; 3],

    /// Gauge pressure.
    #[serde(default = "InitialFields::default_pressure", alias = "p")]
    pub pressure: Quantity,

    /// Pressure every gauge pressure is relative to, for solvers working on absolute pressure.
    #[serde(default = "InitialFields::default_reference_pressure")]
    pub reference_pressure: Quantity,

    #[serde(default = "InitialFields::default_temperature", alias = "T")]
    pub temperature: Quantity,

    /// Turbulence field values. Missing entries take the quantity's default.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub turbulence: BTreeMap<TurbulenceQuantity, Quantity>,

    /// Initial volume fraction per phase (free-surface analyses).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volume_fractions: BTreeMap<String, f64>,

    /// Initialise the flow with a potential-flow solution before the main solver.
    #[serde(default)]
    pub potential_flow: bool,
}
impl InitialFields {
    pub fn default_velocity() -> [Quantity; 3] {
        [Quantity::new(0.0, "m/s"), Quantity::new(0.0, "m/s"), Quantity::new(0.0, "m/s")]
    }
    pub fn default_pressure() -> Quantity {
        Quantity::new(0.0, "Pa")
    }
    pub fn default_reference_pressure() -> Quantity {
        Quantity::new(101_325.0, "Pa")
    }
    pub fn default_temperature() -> Quantity {
        Quantity::new(293.0, "K")
    }

    /// Initial turbulence value of a quantity.
    pub fn turbulence_value(&self, quantity: TurbulenceQuantity) -> Quantity {
        self.turbulence.get(&quantity).cloned().unwrap_or_else(|| quantity.default_value())
    }
}
impl Default for InitialFields {
    fn default() -> Self {
        InitialFields{
            velocity: InitialFields::default_velocity(),
            pressure: InitialFields::default_pressure(),
            reference_pressure: InitialFields::default_reference_pressure(),
            temperature: InitialFields::default_temperature(),
            turbulence: BTreeMap::new(),
            volume_fractions: BTreeMap::new(),
            potential_flow: false,
        }
    }
}

/// Where the mesh comes from. Meshing itself happens outside the crate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshSettings {
    /// Directory holding a `polyMesh`, relative to the analysis config file.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "mesh", alias = "input")]
    pub mesh_dir: Option<String>,

    /// Factor taking mesh coordinates to metres. Unset: already in metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// Run controls of the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSettings {
    /// Iteration count for steady analyses, end time in seconds for transient ones.
    #[serde(default = "SolverSettings::default_end_time")]
    pub end_time: f64,

    /// Time step in seconds. Steady analyses always step by 1.
    #[serde(default = "SolverSettings::default_time_step", alias = "dt")]
    pub time_step: f64,

    /// Output interval, in iterations or seconds.
    #[serde(default = "SolverSettings::default_write_interval")]
    pub write_interval: f64,

    /// Let the solver adapt the time step to `max_courant` (transient only).
    #[serde(default)]
    pub adjust_time_step: bool,

    #[serde(default = "SolverSettings::default_max_courant")]
    pub max_courant: f64,

    /// PIMPLE outer correctors per time step.
    #[serde(default = "SolverSettings::default_outer_correctors")]
    pub outer_correctors: u32,

    /// Initial-residual target below which a steady run stops.
    #[serde(default = "SolverSettings::default_convergence_tolerance", alias = "tolerance")]
    pub convergence_tolerance: f64,

    /// Number of parallel processes. More than one decomposes the case.
    #[serde(default = "SolverSettings::default_cores", alias = "parallel_cores")]
    pub cores: u32,
}
impl SolverSettings {
    pub fn default_end_time() -> f64 {
        1000.0
    }
    pub fn default_time_step() -> f64 {
        1.0
    }
    pub fn default_write_interval() -> f64 {
        100.0
    }
    pub fn default_max_courant() -> f64 {
        1.0
    }
    pub fn default_outer_correctors() -> u32 {
        1
    }
    pub fn default_convergence_tolerance() -> f64 {
        1e-4
    }
    pub fn default_cores() -> u32 {
        1
    }
}
impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings{
            end_time: SolverSettings::default_end_time(),
            time_step: SolverSettings::default_time_step(),
            write_interval: SolverSettings::default_write_interval(),
            adjust_time_step: false,
            max_courant: SolverSettings::default_max_courant(),
            outer_correctors: SolverSettings::default_outer_correctors(),
            convergence_tolerance: SolverSettings::default_convergence_tolerance(),
            cores: SolverSettings::default_cores(),
        }
    }
}
