use crate::physics::{
    PhysicsModel,
    TimeScheme,
    FlowRegime,
    ThermalMode,
    PhaseMode,
    TurbulenceTier,
};
use crate::validation::ValidationError;

/// External solver application a case is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SolverApplication {
    #[strum(serialize = "simpleFoam")]
    SimpleFoam,
    #[strum(serialize = "pimpleFoam")]
    PimpleFoam,
    #[strum(serialize = "buoyantSimpleFoam")]
    BuoyantSimpleFoam,
    #[strum(serialize = "buoyantPimpleFoam")]
    BuoyantPimpleFoam,
    #[strum(serialize = "rhoSimpleFoam")]
    RhoSimpleFoam,
    #[strum(serialize = "rhoPimpleFoam")]
    RhoPimpleFoam,
    #[strum(serialize = "rhoCentralFoam")]
    RhoCentralFoam,
    #[strum(serialize = "interFoam")]
    InterFoam,
    #[strum(serialize = "potentialFoam")]
    PotentialFoam,
}
impl SolverApplication {
    /// Pick the application for a physics model.
    /// Combinations without a supported solver are reported as validation errors.
    pub fn select(physics: &PhysicsModel) -> Result<Self, ValidationError> {
        let unsupported = |field: &str, message: &str| Err(ValidationError::new("physics", field, message));
        let steady = physics.time == TimeScheme::Steady;

        if physics.phase == PhaseMode::FreeSurface {
            if physics.flow == FlowRegime::Compressible {
                return unsupported("Flow", "compressible free-surface flow is not supported");
            }
            if physics.thermal == ThermalMode::Energy {
                return unsupported("Thermal", "heat transfer with a free surface is not supported");
            }
            if steady {
                return unsupported("Time", "free-surface flow must be transient");
            }
            if physics.turbulence_tier == TurbulenceTier::Inviscid {
                return unsupported("Turbulence", "free-surface flow must be viscous");
            }
            return Ok(SolverApplication::InterFoam);
        }

        if physics.turbulence_tier == TurbulenceTier::Inviscid {
            return match (physics.flow, steady) {
                (FlowRegime::Compressible, false) => Ok(SolverApplication::RhoCentralFoam),
                (FlowRegime::Compressible, true) => unsupported("Time", "inviscid compressible flow must be transient"),
                (FlowRegime::Incompressible, true) if physics.thermal == ThermalMode::Isothermal => Ok(SolverApplication::PotentialFoam),
                (FlowRegime::Incompressible, true) => unsupported("Thermal", "potential flow cannot carry heat transfer"),
                (FlowRegime::Incompressible, false) => unsupported("Time", "inviscid incompressible flow must be steady (potential flow)"),
            };
        }

        Ok(match (physics.flow, physics.thermal, steady) {
            (FlowRegime::Incompressible, ThermalMode::Isothermal, true) => SolverApplication::SimpleFoam,
            (FlowRegime::Incompressible, ThermalMode::Isothermal, false) => SolverApplication::PimpleFoam,
            (FlowRegime::Incompressible, ThermalMode::Energy, true) => SolverApplication::BuoyantSimpleFoam,
            (FlowRegime::Incompressible, ThermalMode::Energy, false) => SolverApplication::BuoyantPimpleFoam,
            (FlowRegime::Compressible, _, true) => SolverApplication::RhoSimpleFoam,
            (FlowRegime::Compressible, _, false) => SolverApplication::RhoPimpleFoam,
        })
    }

    /// Whether the application uses the SIMPLE algorithm (steady pseudo-time).
    pub fn is_steady(&self) -> bool {
        matches!(self,
            SolverApplication::SimpleFoam
            | SolverApplication::BuoyantSimpleFoam
            | SolverApplication::RhoSimpleFoam
            | SolverApplication::PotentialFoam)
    }

    /// Whether the application works on kinematic pressure (p / rho).
    pub fn uses_kinematic_pressure(&self) -> bool {
        matches!(self,
            SolverApplication::SimpleFoam
            | SolverApplication::PimpleFoam
            | SolverApplication::PotentialFoam)
    }

    /// Whether pressure is solved as p_rgh (hydrostatic part removed).
    pub fn solves_p_rgh(&self) -> bool {
        matches!(self,
            SolverApplication::BuoyantSimpleFoam
            | SolverApplication::BuoyantPimpleFoam
            | SolverApplication::InterFoam)
    }

    /// Whether the application reads `thermophysicalProperties` and solves for T.
    pub fn solves_energy(&self) -> bool {
        matches!(self,
            SolverApplication::BuoyantSimpleFoam
            | SolverApplication::BuoyantPimpleFoam
            | SolverApplication::RhoSimpleFoam
            | SolverApplication::RhoPimpleFoam
            | SolverApplication::RhoCentralFoam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::TurbulenceModel;

    fn physics() -> PhysicsModel {
        PhysicsModel::default()
    }

    #[test]
    fn incompressible_selection() {
        let mut p = physics();
        assert_eq!(SolverApplication::select(&p).unwrap(), SolverApplication::SimpleFoam);
        p.time = TimeScheme::Transient;
        assert_eq!(SolverApplication::select(&p).unwrap(), SolverApplication::PimpleFoam);
        p.thermal = ThermalMode::Energy;
        assert_eq!(SolverApplication::select(&p).unwrap(), SolverApplication::BuoyantPimpleFoam);
        assert!(SolverApplication::BuoyantPimpleFoam.solves_p_rgh());
    }

    #[test]
    fn compressible_selection() {
        let mut p = physics();
        p.flow = FlowRegime::Compressible;
        assert_eq!(SolverApplication::select(&p).unwrap(), SolverApplication::RhoSimpleFoam);
        p.turbulence_tier = TurbulenceTier::Inviscid;
        p.turbulence_model = None;
        assert_eq!(SolverApplication::select(&p).unwrap_err().field, "Time");
        p.time = TimeScheme::Transient;
        assert_eq!(SolverApplication::select(&p).unwrap(), SolverApplication::RhoCentralFoam);
    }

    #[test]
    fn free_surface_selection() {
        let mut p = physics();
        p.phase = PhaseMode::FreeSurface;
        assert_eq!(SolverApplication::select(&p).unwrap_err().field, "Time");
        p.time = TimeScheme::Transient;
        p.turbulence_tier = TurbulenceTier::Les;
        p.turbulence_model = Some(TurbulenceModel::Wale);
        assert_eq!(SolverApplication::select(&p).unwrap(), SolverApplication::InterFoam);
        p.flow = FlowRegime::Compressible;
        assert_eq!(SolverApplication::select(&p).unwrap_err().field, "Flow");
    }

    #[test]
    fn names_are_solver_binaries() {
        assert_eq!(SolverApplication::BuoyantSimpleFoam.to_string(), "buoyantSimpleFoam");
    }
}
