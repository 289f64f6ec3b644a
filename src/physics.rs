//! Global physics settings of an analysis.

mod turbulence;
mod application;

use serde::{Serialize, Deserialize};

use crate::validation::ValidationError;

pub use turbulence::{
    TurbulenceTier,
    TurbulenceModel,
    TurbulenceQuantity,
};
pub use application::SolverApplication;

/// Time dependence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum TimeScheme {
    #[default]
    Steady,
    Transient,
}

/// Flow compressibility regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum FlowRegime {
    #[default]
    Incompressible,
    Compressible,
}

/// Thermal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum ThermalMode {
    #[default]
    Isothermal,
    /// Energy equation solved (heat transfer, buoyancy).
    Energy,
}

/// Phase count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum PhaseMode {
    #[default]
    Single,
    /// Two immiscible phases tracked by a volume fraction.
    FreeSurface,
}

/// Physics model of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicsModel {
    #[serde(default)]
    pub time: TimeScheme,
    #[serde(default)]
    pub flow: FlowRegime,
    #[serde(default)]
    pub thermal: ThermalMode,
    #[serde(default)]
    pub phase: PhaseMode,
    /// Gravity vector in m/s^2, used by buoyant and free-surface solvers.
    #[serde(default = "PhysicsModel::default_gravity")]
    pub gravity: [f64; 3],
    #[serde(default = "PhysicsModel::default_turbulence_tier", alias = "turbulence")]
    pub turbulence_tier: TurbulenceTier,
    /// Unset means the tier's default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbulence_model: Option<TurbulenceModel>,
}
impl PhysicsModel {
    pub fn default_gravity() -> [f64; 3] {
        [0.0, -9.81, 0.0]
    }
    pub fn default_turbulence_tier() -> TurbulenceTier {
        TurbulenceTier::Rans
    }

    /// The turbulence model in effect, if the tier has one.
    pub fn turbulence_model(&self) -> Option<TurbulenceModel> {
        if !self.turbulence_tier.is_turbulent() {
            return None;
        }
        self.turbulence_model.or(self.turbulence_tier.default_model())
    }

    /// Whether viscous stresses are modelled at all.
    pub fn is_viscous(&self) -> bool {
        self.turbulence_tier != TurbulenceTier::Inviscid
    }

    pub fn is_transient(&self) -> bool {
        self.time == TimeScheme::Transient
    }

    pub fn is_free_surface(&self) -> bool {
        self.phase == PhaseMode::FreeSurface
    }

    /// Whether temperature is part of the case (energy solved or compressible).
    pub fn has_energy(&self) -> bool {
        self.thermal == ThermalMode::Energy || self.flow == FlowRegime::Compressible
    }

    /// Solver application for this physics.
    pub fn application(&self) -> Result<SolverApplication, ValidationError> {
        SolverApplication::select(self)
    }

    /// Check the internal consistency of the physics settings.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Some(model) = self.turbulence_model {
            if !self.turbulence_tier.is_turbulent() {
                errors.push(ValidationError::new("physics", "TurbulenceModel",
                    &format!("model {} given, but the {} tier has no turbulence model", model, self.turbulence_tier)));
            } else if model.tier() != self.turbulence_tier {
                errors.push(ValidationError::new("physics", "TurbulenceModel",
                    &format!("{} is a {} model, not a {} model", model, model.tier(), self.turbulence_tier)));
            }
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            errors.push(ValidationError::new("physics", "Gravity", "components must be finite"));
        }
        if let Err(error) = self.application() {
            errors.push(error);
        }
        errors
    }
}
impl Default for PhysicsModel {
    fn default() -> Self {
        PhysicsModel{
            time: TimeScheme::default(),
            flow: FlowRegime::default(),
            thermal: ThermalMode::default(),
            phase: PhaseMode::default(),
            gravity: PhysicsModel::default_gravity(),
            turbulence_tier: PhysicsModel::default_turbulence_tier(),
            turbulence_model: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_must_match_tier() {
        let mut physics = PhysicsModel::default();
        physics.turbulence_model = Some(TurbulenceModel::Wale);
        let errors = physics.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "TurbulenceModel");

        physics.turbulence_tier = TurbulenceTier::Les;
        assert!(physics.validate().is_empty());

        physics.turbulence_tier = TurbulenceTier::Laminar;
        assert_eq!(physics.validate()[0].field, "TurbulenceModel");
        assert_eq!(physics.turbulence_model(), None);
    }

    #[test]
    fn tier_default_model_applies() {
        let physics = PhysicsModel::default();
        assert_eq!(physics.turbulence_model(), Some(TurbulenceModel::KOmegaSst));
    }

    #[test]
    fn reads_minimal_yaml() {
        let physics: PhysicsModel = serde_yaml::from_str("time: transient\nturbulence: LES\nturbulence_model: kEqn\n").unwrap();
        assert!(physics.is_transient());
        assert_eq!(physics.turbulence_model(), Some(TurbulenceModel::KEqn));
        assert_eq!(physics.gravity, [0.0, -9.81, 0.0]);
    }
}
