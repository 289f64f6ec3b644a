use crate::analysis::Analysis;
use crate::case::{CaseError, ProcResult, err_str};
use crate::geo_3d::Geometry;
use crate::material::MaterialSi;
use crate::physics::{PhysicsModel, SolverApplication, TurbulenceModel, TurbulenceQuantity};
use crate::units::Dimension;

/// Everything the case files are derived from, converted to SI once.
#[derive(Debug, Clone)]
pub struct CaseContext<'a> {
    pub analysis: &'a Analysis,
    pub geometry: &'a Geometry,
    pub application: SolverApplication,
    pub model: Option<TurbulenceModel>,
    /// First entry is the primary (or tracked) fluid.
    pub materials: Vec<MaterialSi>,
    pub velocity: [f64; 3],
    /// Gauge pressure in Pa.
    pub pressure: f64,
    pub reference_pressure: f64,
    pub temperature: f64,
}

impl<'a> CaseContext<'a> {
    pub fn new(analysis: &'a Analysis, geometry: &'a Geometry) -> ProcResult<Self> {
        let application = analysis.physics.application().map_err(|error| CaseError::Invalid(vec![error]))?;
        let materials = analysis.materials.iter()
            .map(|material| material.to_si())
            .collect::<Result<Vec<_>, _>>()?;
        if materials.is_empty() {
            return err_str("The analysis has no material");
        }
        let initial = &analysis.initial;
        let velocity = [
            initial.velocity[0].si_in(Dimension::Velocity, "initial: Velocity")?,
            initial.velocity[1].si_in(Dimension::Velocity, "initial: Velocity")?,
            initial.velocity[2].si_in(Dimension::Velocity, "initial: Velocity")?,
        ];
        Ok(CaseContext{
            analysis,
            geometry,
            application,
            model: analysis.physics.turbulence_model(),
            materials,
            velocity,
            pressure: initial.pressure.si_in(Dimension::Pressure, "initial: Pressure")?,
            reference_pressure: initial.reference_pressure.si_in(Dimension::Pressure, "initial: ReferencePressure")?,
            temperature: initial.temperature.si_in(Dimension::Temperature, "initial: Temperature")?,
        })
    }

    pub fn physics(&self) -> &PhysicsModel {
        &self.analysis.physics
    }

    pub fn fluid(&self) -> &MaterialSi {
        &self.materials[0]
    }

    /// Pressure as the solver reads it, from a gauge pressure in Pa:
    /// kinematic for incompressible solvers, absolute for compressible and buoyant ones.
    pub fn solver_pressure(&self, gauge: f64) -> f64 {
        if self.application.uses_kinematic_pressure() {
            gauge / self.fluid().density
        } else if self.application == SolverApplication::InterFoam {
            gauge
        } else {
            gauge + self.reference_pressure
        }
    }

    pub fn pressure_dimensions(&self) -> [i32; 7] {
        if self.application.uses_kinematic_pressure() {
            [0, 2, -2, 0, 0, 0, 0]
        } else {
            [1, -1, -2, 0, 0, 0, 0]
        }
    }

    pub fn initial_turbulence(&self, quantity: TurbulenceQuantity) -> ProcResult<f64> {
        let context = format!("initial: {}", quantity);
        Ok(self.analysis.initial.turbulence_value(quantity).si_in(quantity.dimension(), &context)?)
    }

    pub fn initial_fraction(&self, phase: &str) -> f64 {
        self.analysis.initial.volume_fractions.get(phase).copied().unwrap_or(0.0)
    }
}
