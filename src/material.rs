//! Fluid materials.

use serde::{Serialize, Deserialize};

use crate::physics::PhysicsModel;
use crate::units::{Dimension, Quantity, QuantityError};
use crate::validation::ValidationError;

/// A fluid and its physical properties, each as a quantity string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FluidMaterial {
    pub name: String,
    #[serde(default = "FluidMaterial::default_density")]
    pub density: Quantity,
    #[serde(default = "FluidMaterial::default_dynamic_viscosity", alias = "viscosity")]
    pub dynamic_viscosity: Quantity,
    #[serde(default = "FluidMaterial::default_molar_mass")]
    pub molar_mass: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_heat: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prandtl: Option<f64>,
    /// Sutherland viscosity law, replacing the constant viscosity for compressible flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sutherland: Option<Sutherland>,
    /// Thermal expansion coefficient in 1/K for Boussinesq buoyancy. Unset: 1/T (ideal gas).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion_coefficient: Option<f64>,
    /// Surface tension against the other phase (free-surface analyses).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_tension: Option<Quantity>,
}

/// Sutherland law coefficients: `mu = As * sqrt(T) / (1 + Ts / T)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sutherland {
    /// Coefficient in kg/(m s K^0.5).
    #[serde(rename = "As")]
    pub a_s: f64,
    /// Sutherland temperature.
    #[serde(rename = "Ts")]
    pub t_s: Quantity,
}

/// Material properties converted to SI.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSi {
    pub name: String,
    pub density: f64,
    pub dynamic_viscosity: f64,
    pub kinematic_viscosity: f64,
    pub molar_mass: f64,
    pub specific_heat: Option<f64>,
    pub prandtl: Option<f64>,
    /// (As, Ts)
    pub sutherland: Option<(f64, f64)>,
    pub expansion_coefficient: Option<f64>,
    pub surface_tension: Option<f64>,
}

impl FluidMaterial {
    pub fn default_density() -> Quantity {
        Quantity::new(1.20, "kg/m^3")
    }
    pub fn default_dynamic_viscosity() -> Quantity {
        Quantity::new(1.80e-5, "Pa*s")
    }
    pub fn default_molar_mass() -> Quantity {
        Quantity::new(0.0289, "kg/mol")
    }

    /// Material library entry by (case-insensitive) name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "air" => Some(FluidMaterial{
                name: "air".to_string(),
                density: Quantity::new(1.20, "kg/m^3"),
                dynamic_viscosity: Quantity::new(1.80e-5, "Pa*s"),
                molar_mass: Quantity::new(0.0289, "kg/mol"),
                specific_heat: Some(Quantity::new(1005.0, "J/kg/K")),
                prandtl: Some(0.71),
                sutherland: Some(Sutherland{a_s: 1.458e-6, t_s: Quantity::new(110.4, "K")}),
                expansion_coefficient: None,
                surface_tension: None,
            }),
            "water" => Some(FluidMaterial{
                name: "water".to_string(),
                density: Quantity::new(998.0, "kg/m^3"),
                dynamic_viscosity: Quantity::new(1.003e-3, "Pa*s"),
                molar_mass: Quantity::new(0.018, "kg/mol"),
                specific_heat: Some(Quantity::new(4182.0, "J/kg/K")),
                prandtl: Some(7.0),
                sutherland: None,
                expansion_coefficient: Some(2.07e-4),
                surface_tension: Some(Quantity::new(0.07, "N/m")),
            }),
            _ => None,
        }
    }

    /// Convert every property to SI. Unit problems are hard errors.
    pub fn to_si(&self) -> Result<MaterialSi, QuantityError> {
        let context = |field: &str| format!("material '{}': {}", self.name, field);
        let density = self.density.si_in(Dimension::Density, &context("Density"))?;
        let dynamic_viscosity = self.dynamic_viscosity.si_in(Dimension::DynamicViscosity, &context("DynamicViscosity"))?;
        let molar_mass = self.molar_mass.si_in(Dimension::MolarMass, &context("MolarMass"))?;
        let specific_heat = match &self.specific_heat {
            Some(cp) => Some(cp.si_in(Dimension::SpecificHeat, &context("SpecificHeat"))?),
            None => None,
        };
        let sutherland = match &self.sutherland {
            Some(law) => Some((law.a_s, law.t_s.si_in(Dimension::Temperature, &context("Ts"))?)),
            None => None,
        };
        let surface_tension = match &self.surface_tension {
            Some(sigma) => Some(sigma.si_in(Dimension::SurfaceTension, &context("SurfaceTension"))?),
            None => None,
        };
        Ok(MaterialSi{
            name: self.name.clone(),
            density,
            dynamic_viscosity,
            kinematic_viscosity: dynamic_viscosity / density,
            molar_mass,
            specific_heat,
            prandtl: self.prandtl,
            sutherland,
            expansion_coefficient: self.expansion_coefficient,
            surface_tension,
        })
    }

    /// Check the material has what the physics needs.
    pub fn validate(&self, physics: &PhysicsModel) -> Vec<ValidationError> {
        let context = format!("material '{}'", self.name);
        let mut errors = Vec::new();
        if !is_foam_word(&self.name) {
            errors.push(ValidationError::new(&context, "Name", "must be a single word without spaces or braces"));
        }
        let positive = |quantity: &Quantity, dimension: Dimension| {
            quantity.to_si(dimension).map(|value| value > 0.0).unwrap_or(true)
        };
        if !positive(&self.density, Dimension::Density) {
            errors.push(ValidationError::new(&context, "Density", "must be positive"));
        }
        if !positive(&self.dynamic_viscosity, Dimension::DynamicViscosity) {
            errors.push(ValidationError::new(&context, "DynamicViscosity", "must be positive"));
        }
        if physics.has_energy() {
            if self.specific_heat.is_none() {
                errors.push(ValidationError::new(&context, "SpecificHeat", "required when the energy equation is solved"));
            }
            if self.prandtl.is_none() {
                errors.push(ValidationError::new(&context, "Prandtl", "required when the energy equation is solved"));
            }
        }
        errors
    }
}

/// Whether a name can be written as a bare dictionary word.
pub fn is_foam_word(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| c.is_whitespace() || "{}();\"/\\".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ThermalMode;

    #[test]
    fn presets_resolve() {
        let air = FluidMaterial::preset("Air").unwrap().to_si().unwrap();
        assert!((air.kinematic_viscosity - 1.5e-5).abs() < 1e-9);
        assert!(FluidMaterial::preset("unobtainium").is_none());
    }

    #[test]
    fn unit_errors_carry_context() {
        let mut water = FluidMaterial::preset("water").unwrap();
        water.density = Quantity::new(998.0, "m/s");
        let error = water.to_si().unwrap_err();
        assert_eq!(error.context, "material 'water': Density");
    }

    #[test]
    fn energy_needs_thermal_properties() {
        let mut physics = PhysicsModel::default();
        let mut material = FluidMaterial::preset("air").unwrap();
        material.specific_heat = None;
        assert!(material.validate(&physics).is_empty());

        physics.thermal = ThermalMode::Energy;
        let errors = material.validate(&physics);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "SpecificHeat");
    }

    #[test]
    fn word_names() {
        assert!(is_foam_word("water"));
        assert!(!is_foam_word("sea water"));
        assert!(!is_foam_word(""));
    }
}
