use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::boundary::{
    BoundaryCategory,
    BoundarySubtype,
    BoundaryInput,
    BoundaryUiSpec,
    ThermalType,
    ThermalInput,
    TurbulenceInlet,
    BoundaryError,
    ProcResult,
    err_str,
    get_boundary_ui_spec,
    get_turbulence_inlet_spec,
};
use crate::geo_3d::{self, FaceRef, GeoError, GeoVector, Geometry};
use crate::material::is_foam_word;
use crate::physics::PhysicsModel;
use crate::units::{Dimension, Quantity};
use crate::validation::ValidationError;

/// Velocity input: Cartesian components, or a magnitude along a face normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VelocitySpec {
    Cartesian {
        ux: Quantity,
        uy: Quantity,
        uz: Quantity,
    },
    Magnitude {
        magnitude: Quantity,
        /// Face whose normal gives the direction. Unset: the boundary's first face.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction_face: Option<FaceRef>,
    },
}
impl VelocitySpec {
    pub fn cartesian(ux: f64, uy: f64, uz: f64, unit: &str) -> Self {
        VelocitySpec::Cartesian{
            ux: Quantity::new(ux, unit),
            uy: Quantity::new(uy, unit),
            uz: Quantity::new(uz, unit),
        }
    }

    pub fn magnitude(magnitude: Quantity) -> Self {
        VelocitySpec::Magnitude{magnitude, direction_face: None}
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum WallBc {
    Fixed,
    Slip,
    PartialSlip {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slip_ratio: Option<Quantity>,
    },
    Translating {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        velocity: Option<VelocitySpec>,
    },
    Rough {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        roughness_height: Option<Quantity>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        roughness_constant: Option<Quantity>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum InletBc {
    UniformVelocity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        velocity: Option<VelocitySpec>,
    },
    VolumetricFlowRate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flow_rate: Option<Quantity>,
    },
    MassFlowRate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mass_flow_rate: Option<Quantity>,
    },
    TotalPressure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure: Option<Quantity>,
    },
    StaticPressure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure: Option<Quantity>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum OutletBc {
    StaticPressure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure: Option<Quantity>,
    },
    UniformVelocity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        velocity: Option<VelocitySpec>,
    },
    OutFlow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum OpenBc {
    TotalPressure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure: Option<Quantity>,
    },
    FarField {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure: Option<Quantity>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        velocity: Option<VelocitySpec>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum ConstraintBc {
    Symmetry,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum BaffleBc {
    Porous {
        method: PorousMethod,
    },
}

/// How the pressure drop of a porous baffle is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PorousMethod {
    /// Pressure drop = coeff * 1/2 rho U^2.
    Coefficient {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure_drop_coeff: Option<Quantity>,
    },
    /// Woven wire screen, coefficient derived from its geometry.
    Screen {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wire_diameter: Option<Quantity>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spacing: Option<Quantity>,
    },
}

/// Category and subtype of a boundary, carrying only the inputs the subtype uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum BoundaryKind {
    Wall(WallBc),
    Inlet(InletBc),
    Outlet(OutletBc),
    Open(OpenBc),
    Constraint(ConstraintBc),
    Baffle(BaffleBc),
}
impl BoundaryKind {
    /// A boundary of the given subtype with every input unset.
    pub fn from_subtype(subtype: BoundarySubtype) -> Self {
        use BoundarySubtype::*;
        match subtype {
            FixedWall => BoundaryKind::Wall(WallBc::Fixed),
            SlipWall => BoundaryKind::Wall(WallBc::Slip),
            PartialSlipWall => BoundaryKind::Wall(WallBc::PartialSlip{slip_ratio: None}),
            TranslatingWall => BoundaryKind::Wall(WallBc::Translating{velocity: None}),
            RoughWall => BoundaryKind::Wall(WallBc::Rough{roughness_height: None, roughness_constant: None}),
            UniformVelocityInlet => BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: None}),
            VolumetricFlowRateInlet => BoundaryKind::Inlet(InletBc::VolumetricFlowRate{flow_rate: None}),
            MassFlowRateInlet => BoundaryKind::Inlet(InletBc::MassFlowRate{mass_flow_rate: None}),
            TotalPressureInlet => BoundaryKind::Inlet(InletBc::TotalPressure{pressure: None}),
            StaticPressureInlet => BoundaryKind::Inlet(InletBc::StaticPressure{pressure: None}),
            StaticPressureOutlet => BoundaryKind::Outlet(OutletBc::StaticPressure{pressure: None}),
            UniformVelocityOutlet => BoundaryKind::Outlet(OutletBc::UniformVelocity{velocity: None}),
            OutFlowOutlet => BoundaryKind::Outlet(OutletBc::OutFlow),
            TotalPressureOpening => BoundaryKind::Open(OpenBc::TotalPressure{pressure: None}),
            FarField => BoundaryKind::Open(OpenBc::FarField{pressure: None, velocity: None}),
            Symmetry => BoundaryKind::Constraint(ConstraintBc::Symmetry),
            Empty => BoundaryKind::Constraint(ConstraintBc::Empty),
            PorousBaffle => BoundaryKind::Baffle(BaffleBc::Porous{method: PorousMethod::Coefficient{pressure_drop_coeff: None}}),
        }
    }

    pub fn category(&self) -> BoundaryCategory {
        self.subtype().category()
    }

    /// Flat registry key of the active subtype.
    pub fn subtype(&self) -> BoundarySubtype {
        use BoundarySubtype::*;
        match self {
            BoundaryKind::Wall(wall) => match wall {
                WallBc::Fixed => FixedWall,
                WallBc::Slip => SlipWall,
                WallBc::PartialSlip{..} => PartialSlipWall,
                WallBc::Translating{..} => TranslatingWall,
                WallBc::Rough{..} => RoughWall,
            },
            BoundaryKind::Inlet(inlet) => match inlet {
                InletBc::UniformVelocity{..} => UniformVelocityInlet,
                InletBc::VolumetricFlowRate{..} => VolumetricFlowRateInlet,
                InletBc::MassFlowRate{..} => MassFlowRateInlet,
                InletBc::TotalPressure{..} => TotalPressureInlet,
                InletBc::StaticPressure{..} => StaticPressureInlet,
            },
            BoundaryKind::Outlet(outlet) => match outlet {
                OutletBc::StaticPressure{..} => StaticPressureOutlet,
                OutletBc::UniformVelocity{..} => UniformVelocityOutlet,
                OutletBc::OutFlow => OutFlowOutlet,
            },
            BoundaryKind::Open(open) => match open {
                OpenBc::TotalPressure{..} => TotalPressureOpening,
                OpenBc::FarField{..} => FarField,
            },
            BoundaryKind::Constraint(constraint) => match constraint {
                ConstraintBc::Symmetry => Symmetry,
                ConstraintBc::Empty => Empty,
            },
            BoundaryKind::Baffle(BaffleBc::Porous{..}) => PorousBaffle,
        }
    }

    pub fn ui_spec(&self) -> BoundaryUiSpec {
        get_boundary_ui_spec(self.category(), self.subtype())
    }

    /// Active inputs of the subtype with their current values.
    pub fn inputs(&self) -> Vec<(BoundaryInput, InputValue<'_>)> {
        use BoundaryInput as I;
        use InputValue::{Scalar, Vector};
        match self {
            BoundaryKind::Wall(WallBc::Fixed)
            | BoundaryKind::Wall(WallBc::Slip)
            | BoundaryKind::Outlet(OutletBc::OutFlow)
            | BoundaryKind::Constraint(_) => Vec::new(),
            BoundaryKind::Wall(WallBc::PartialSlip{slip_ratio}) => vec![(I::SlipRatio, Scalar(slip_ratio.as_ref()))],
            BoundaryKind::Wall(WallBc::Translating{velocity}) => vec![(I::Velocity, Vector(velocity.as_ref()))],
            BoundaryKind::Wall(WallBc::Rough{roughness_height, roughness_constant}) => vec![
                (I::RoughnessHeight, Scalar(roughness_height.as_ref())),
                (I::RoughnessConstant, Scalar(roughness_constant.as_ref())),
            ],
            BoundaryKind::Inlet(InletBc::UniformVelocity{velocity}) => vec![(I::Velocity, Vector(velocity.as_ref()))],
            BoundaryKind::Inlet(InletBc::VolumetricFlowRate{flow_rate}) => vec![(I::VolumetricFlowRate, Scalar(flow_rate.as_ref()))],
            BoundaryKind::Inlet(InletBc::MassFlowRate{mass_flow_rate}) => vec![(I::MassFlowRate, Scalar(mass_flow_rate.as_ref()))],
            BoundaryKind::Inlet(InletBc::TotalPressure{pressure})
            | BoundaryKind::Inlet(InletBc::StaticPressure{pressure})
            | BoundaryKind::Outlet(OutletBc::StaticPressure{pressure})
            | BoundaryKind::Open(OpenBc::TotalPressure{pressure}) => vec![(I::Pressure, Scalar(pressure.as_ref()))],
            BoundaryKind::Outlet(OutletBc::UniformVelocity{velocity}) => vec![(I::Velocity, Vector(velocity.as_ref()))],
            BoundaryKind::Open(OpenBc::FarField{pressure, velocity}) => vec![
                (I::Pressure, Scalar(pressure.as_ref())),
                (I::Velocity, Vector(velocity.as_ref())),
            ],
            BoundaryKind::Baffle(BaffleBc::Porous{method: PorousMethod::Coefficient{pressure_drop_coeff}}) => vec![
                (I::PressureDropCoeff, Scalar(pressure_drop_coeff.as_ref())),
            ],
            BoundaryKind::Baffle(BaffleBc::Porous{method: PorousMethod::Screen{wire_diameter, spacing}}) => vec![
                (I::WireDiameter, Scalar(wire_diameter.as_ref())),
                (I::Spacing, Scalar(spacing.as_ref())),
            ],
        }
    }
}

/// Borrowed value of a boundary input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputValue<'a> {
    Scalar(Option<&'a Quantity>),
    Vector(Option<&'a VelocitySpec>),
}

/// Thermal condition of a boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ThermalBc {
    /// Unset temperature: the initial temperature.
    FixedTemperature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature: Option<Quantity>,
    },
    Adiabatic,
    HeatFlux {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heat_flux: Option<Quantity>,
    },
    /// Unset ambient temperature: the initial temperature.
    HeatTransferCoefficient {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coefficient: Option<Quantity>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ambient_temperature: Option<Quantity>,
    },
}
impl ThermalBc {
    pub fn default_for(thermal_type: ThermalType) -> Self {
        match thermal_type {
            ThermalType::FixedTemperature => ThermalBc::FixedTemperature{temperature: None},
            ThermalType::Adiabatic => ThermalBc::Adiabatic,
            ThermalType::HeatFlux => ThermalBc::HeatFlux{heat_flux: None},
            ThermalType::HeatTransferCoefficient => ThermalBc::HeatTransferCoefficient{coefficient: None, ambient_temperature: None},
        }
    }

    pub fn thermal_type(&self) -> ThermalType {
        match self {
            ThermalBc::FixedTemperature{..} => ThermalType::FixedTemperature,
            ThermalBc::Adiabatic => ThermalType::Adiabatic,
            ThermalBc::HeatFlux{..} => ThermalType::HeatFlux,
            ThermalBc::HeatTransferCoefficient{..} => ThermalType::HeatTransferCoefficient,
        }
    }

    /// Values of the thermal rows, and whether each must be set.
    fn rows(&self) -> Vec<(ThermalInput, Option<&Quantity>, bool)> {
        match self {
            ThermalBc::FixedTemperature{temperature} => vec![(ThermalInput::Temperature, temperature.as_ref(), false)],
            ThermalBc::Adiabatic => Vec::new(),
            ThermalBc::HeatFlux{heat_flux} => vec![(ThermalInput::HeatFlux, heat_flux.as_ref(), true)],
            ThermalBc::HeatTransferCoefficient{coefficient, ambient_temperature} => vec![
                (ThermalInput::HeatTransferCoeff, coefficient.as_ref(), true),
                (ThermalInput::AmbientTemperature, ambient_temperature.as_ref(), false),
            ],
        }
    }
}

/// A boundary condition on a set of faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    /// Patch name in the mesh.
    pub name: String,
    #[serde(default)]
    pub faces: Vec<FaceRef>,
    #[serde(flatten)]
    pub kind: BoundaryKind,
    /// Unset: the subtype's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_normal: Option<bool>,
    #[serde(default, skip_serializing_if = "TurbulenceInlet::is_unset")]
    pub turbulence: TurbulenceInlet,
    /// Unset: the subtype's default thermal type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal: Option<ThermalBc>,
    /// Inflow volume fraction per phase.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volume_fractions: BTreeMap<String, f64>,
}

/// What a boundary is validated against.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub physics: &'a PhysicsModel,
    pub geometry: &'a Geometry,
    /// Phase (material) names of a free-surface analysis.
    pub phases: &'a [String],
}

impl BoundaryCondition {
    pub fn new(name: &str, faces: Vec<FaceRef>, kind: BoundaryKind) -> Self {
        BoundaryCondition{
            name: name.to_string(),
            faces,
            kind,
            reverse_normal: None,
            turbulence: TurbulenceInlet::default(),
            thermal: None,
            volume_fractions: BTreeMap::new(),
        }
    }

    pub fn category(&self) -> BoundaryCategory {
        self.kind.category()
    }

    pub fn subtype(&self) -> BoundarySubtype {
        self.kind.subtype()
    }

    pub fn ui_spec(&self) -> BoundaryUiSpec {
        self.kind.ui_spec()
    }

    /// Whether derived directions point against the outward normal.
    pub fn reverse(&self) -> bool {
        self.reverse_normal.unwrap_or(self.ui_spec().reverse_default)
    }

    /// Thermal condition in effect, `None` if the subtype has no thermal panel.
    pub fn thermal_bc(&self) -> Option<ThermalBc> {
        let spec = self.ui_spec();
        if !spec.thermal_panel {
            return None;
        }
        match &self.thermal {
            Some(thermal) => Some(thermal.clone()),
            None => spec.thermal_types.first().map(|t| ThermalBc::default_for(*t)),
        }
    }

    fn context(&self) -> String {
        format!("boundary '{}'", self.name)
    }

    fn field_context(&self, field: &str) -> String {
        format!("boundary '{}': {}", self.name, field)
    }

    /// Unit direction derived from a face normal: the outward normal of
    /// `direction_face` (or the boundary's first face), negated if reversed.
    pub fn flow_direction(&self, direction_face: Option<&FaceRef>, geometry: &Geometry) -> geo_3d::ProcResult<GeoVector> {
        let face = match direction_face.or(self.faces.first()) {
            Some(face) => face,
            None => return geo_3d::err_str(&format!("Boundary '{}' has no face to derive a direction from", self.name)),
        };
        let normal = geometry.find(face)?.outward_normal()?;
        Ok(if self.reverse() { -normal } else { normal })
    }

    /// SI value of a required scalar input.
    pub fn required(&self, value: Option<&Quantity>, input: BoundaryInput) -> ProcResult<f64> {
        match value {
            Some(quantity) => Ok(quantity.si_in(input.dimension(), &self.field_context(&input.name()))?),
            None => Err(BoundaryError::Invalid(ValidationError::new(&self.context(), &input.name(), "required but not set"))),
        }
    }

    /// SI velocity vector of a velocity input.
    pub fn velocity_si(&self, velocity: Option<&VelocitySpec>, geometry: &Geometry) -> ProcResult<[f64; 3]> {
        let context = self.field_context("Velocity");
        match velocity {
            None => Err(BoundaryError::Invalid(ValidationError::new(&self.context(), "Velocity", "required but not set"))),
            Some(VelocitySpec::Cartesian{ux, uy, uz}) => Ok([
                ux.si_in(Dimension::Velocity, &context)?,
                uy.si_in(Dimension::Velocity, &context)?,
                uz.si_in(Dimension::Velocity, &context)?,
            ]),
            Some(VelocitySpec::Magnitude{magnitude, direction_face}) => {
                let magnitude = magnitude.si_in(Dimension::Velocity, &context)?;
                let direction = self.flow_direction(direction_face.as_ref(), geometry)?;
                Ok((direction * magnitude).to_array())
            },
        }
    }

    /// SI value of a thermal input, `None` if unset and optional.
    pub fn thermal_si(&self, value: Option<&Quantity>, input: ThermalInput, required: bool) -> ProcResult<Option<f64>> {
        match value {
            Some(quantity) => Ok(Some(quantity.si_in(input.dimension(), &self.field_context(&input.to_string()))?)),
            None if required => Err(BoundaryError::Invalid(ValidationError::new(&self.context(), &input.to_string(), "required but not set"))),
            None => Ok(None),
        }
    }

    /// Pressure drop coefficient of a porous baffle: dp = k * 1/2 rho U^2.
    /// Screens use k = (1 - b) / b^2 with the open area ratio b = (1 - d/s)^2.
    pub fn pressure_drop_coefficient(&self) -> ProcResult<f64> {
        match &self.kind {
            BoundaryKind::Baffle(BaffleBc::Porous{method: PorousMethod::Coefficient{pressure_drop_coeff}}) => {
                self.required(pressure_drop_coeff.as_ref(), BoundaryInput::PressureDropCoeff)
            },
            BoundaryKind::Baffle(BaffleBc::Porous{method: PorousMethod::Screen{wire_diameter, spacing}}) => {
                let d = self.required(wire_diameter.as_ref(), BoundaryInput::WireDiameter)?;
                let s = self.required(spacing.as_ref(), BoundaryInput::Spacing)?;
                if d <= 0.0 || s <= d {
                    return Err(BoundaryError::Invalid(ValidationError::new(&self.context(), "Spacing", "must be larger than the wire diameter")));
                }
                let open = (1.0 - d / s).powi(2);
                Ok((1.0 - open) / (open * open))
            },
            _ => err_str(&format!("Boundary '{}' is a {} boundary, not a porous baffle", self.name, self.subtype())),
        }
    }

    /// Check the boundary against the analysis. Every problem found is returned.
    pub fn validate(&self, ctx: &ValidationContext) -> Vec<ValidationError> {
        let context = self.context();
        let spec = self.ui_spec();
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| errors.push(ValidationError::new(&context, field, message));

        if !is_foam_word(&self.name) {
            push("Name", "must be a single word without spaces or braces");
        }
        if self.faces.is_empty() {
            push("Faces", "no faces selected");
        }
        for face in self.faces.iter().filter(|face| !ctx.geometry.contains(face)) {
            push("Faces", &format!("face {} is not part of the geometry", face));
        }

        for (input, value) in self.kind.inputs() {
            match value {
                InputValue::Scalar(None) | InputValue::Vector(None) => push(&input.name(), "required but not set"),
                InputValue::Scalar(Some(quantity)) => {
                    if let Err(error) = quantity.to_si(input.dimension()) {
                        push(&input.name(), &one_line(&error.to_string()));
                    }
                },
                InputValue::Vector(Some(velocity)) => {
                    if let Err(error) = self.velocity_si(Some(velocity), ctx.geometry) {
                        let skip = matches!(&error, BoundaryError::Geometry(GeoError::MissingFace(face)) if self.faces.contains(face));
                        if !skip {
                            push(&input.name(), &one_line(&error.to_string()));
                        }
                    }
                },
            }
        }
        self.validate_ranges(&mut push);

        if spec.turbulence_panel {
            if let Some(model) = ctx.physics.turbulence_model() {
                match self.turbulence.active_mode(model) {
                    Some(mode) => {
                        for quantity in mode.quantities {
                            if self.turbulence.value(*quantity).to_si(quantity.dimension()).is_err() {
                                push(&quantity.to_string(), &format!("expected a {} value", quantity.dimension()));
                            }
                        }
                    },
                    None => {
                        let available = get_turbulence_inlet_spec(model).modes.iter()
                            .map(|mode| mode.key.to_string())
                            .collect::<Vec<_>>()
                            .join(", ");
                        push("TurbulenceSpecification", &format!("not available for {}, choose one of: {}", model, available));
                    },
                }
            }
        }

        if ctx.physics.has_energy() {
            if let Some(thermal) = &self.thermal {
                if !spec.thermal_types.contains(&thermal.thermal_type()) {
                    push("Thermal", &format!("{} is not available for {} boundaries", thermal.thermal_type(), self.subtype()));
                }
            }
            if let Some(thermal) = self.thermal_bc() {
                for (row, value, required) in thermal.rows() {
                    match value {
                        None if required => push(&row.to_string(), "required but not set"),
                        None => (),
                        Some(quantity) => {
                            if quantity.to_si(row.dimension()).is_err() {
                                push(&row.to_string(), &format!("expected a {} value", row.dimension()));
                            }
                        },
                    }
                }
            }
        }

        if ctx.physics.is_free_surface() && spec.volume_fraction_panel {
            for (phase, fraction) in self.volume_fractions.iter() {
                if !ctx.phases.contains(phase) {
                    push("VolumeFraction", &format!("unknown phase '{}'", phase));
                }
                if !(0.0..=1.0).contains(fraction) {
                    push("VolumeFraction", &format!("fraction of '{}' must be between 0 and 1", phase));
                }
            }
        }

        errors
    }

    fn validate_ranges(&self, push: &mut impl FnMut(&str, &str)) {
        let si = |quantity: &Option<Quantity>, dimension: Dimension| {
            quantity.as_ref().and_then(|q| q.to_si(dimension).ok())
        };
        match &self.kind {
            BoundaryKind::Wall(WallBc::PartialSlip{slip_ratio}) => {
                if let Some(ratio) = si(slip_ratio, Dimension::Dimensionless) {
                    if !(0.0..=1.0).contains(&ratio) {
                        push("SlipRatio", "must be between 0 and 1");
                    }
                }
            },
            BoundaryKind::Wall(WallBc::Rough{roughness_height, ..}) => {
                if si(roughness_height, Dimension::Length).map_or(false, |height| height < 0.0) {
                    push("RoughnessHeight", "must not be negative");
                }
            },
            BoundaryKind::Baffle(BaffleBc::Porous{method: PorousMethod::Screen{wire_diameter, spacing}}) => {
                if let (Some(d), Some(s)) = (si(wire_diameter, Dimension::Length), si(spacing, Dimension::Length)) {
                    if d <= 0.0 || s <= d {
                        push("Spacing", "must be larger than the wire diameter");
                    }
                }
            },
            _ => (),
        }
    }
}

/// Innermost line of a nested error message, without the list marker.
fn one_line(message: &str) -> String {
    message.lines()
        .map(|line| line.trim_start_matches("- ").trim())
        .filter(|line| !line.is_empty())
        .last()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_3d::{Face, Point};
    use crate::physics::{ThermalMode, TurbulenceModel, TurbulenceQuantity};
    use crate::boundary::InletModeKey;

    fn geometry() -> Geometry {
        let mut geometry = Geometry::new();
        let outline = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(0.0, 1.0, 1.0),
            Point::new(0.0, 1.0, 0.0),
        ];
        // Outward normal along -x
        geometry.add_face(Face::from_outline(FaceRef::new("Box", "Face1"), &outline).unwrap());
        geometry
    }

    fn boundary(kind: BoundaryKind) -> BoundaryCondition {
        BoundaryCondition::new("patch", vec![FaceRef::new("Box", "Face1")], kind)
    }

    fn validate(boundary: &BoundaryCondition, physics: &PhysicsModel) -> Vec<ValidationError> {
        let geometry = geometry();
        boundary.validate(&ValidationContext{physics, geometry: &geometry, phases: &[]})
    }

    #[test]
    fn kinds_map_to_their_registry_keys() {
        for category in <BoundaryCategory as strum::IntoEnumIterator>::iter() {
            for subtype in category.subtypes() {
                let kind = BoundaryKind::from_subtype(subtype);
                assert_eq!(kind.subtype(), subtype);
                assert_eq!(kind.category(), category);
                let fields = kind.ui_spec().fields;
                for (input, _) in kind.inputs() {
                    assert!(fields.contains(&input), "{} of {}", input, subtype);
                }
            }
        }
    }

    #[test]
    fn direction_follows_the_reversal_flag() {
        let geometry = geometry();
        let mut wall = boundary(BoundaryKind::Wall(WallBc::Fixed));
        let direction = wall.flow_direction(None, &geometry).unwrap();
        assert!((direction.x + 1.0).abs() < 1e-12);

        wall.reverse_normal = Some(true);
        let direction = wall.flow_direction(None, &geometry).unwrap();
        assert!((direction.x - 1.0).abs() < 1e-12);

        // Inlets reverse by default, so a magnitude points into the domain
        let inlet = boundary(BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: None}));
        let velocity = inlet.velocity_si(Some(&VelocitySpec::magnitude(Quantity::new(2.0, "m/s"))), &geometry).unwrap();
        assert!((velocity[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn missing_pressure_is_named() {
        let inlet = boundary(BoundaryKind::Inlet(InletBc::TotalPressure{pressure: None}));
        let errors = validate(&inlet, &PhysicsModel::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Pressure");
        assert_eq!(errors[0].context, "boundary 'patch'");
    }

    #[test]
    fn unit_mismatch_is_reported() {
        let outlet = boundary(BoundaryKind::Outlet(OutletBc::StaticPressure{pressure: Some(Quantity::new(3.0, "m/s"))}));
        let errors = validate(&outlet, &PhysicsModel::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Pressure");
    }

    #[test]
    fn faces_must_exist() {
        let mut wall = boundary(BoundaryKind::Wall(WallBc::Slip));
        wall.faces.push(FaceRef::new("Box", "Face7"));
        let errors = validate(&wall, &PhysicsModel::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Faces");
    }

    #[test]
    fn turbulence_mode_must_suit_the_model() {
        let mut inlet = boundary(BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: Some(VelocitySpec::cartesian(1.0, 0.0, 0.0, "m/s"))}));
        inlet.turbulence.mode = Some(InletModeKey::IntensityAndLengthScale);
        let mut physics = PhysicsModel::default();
        assert!(validate(&inlet, &physics).is_empty());

        physics.turbulence_model = Some(TurbulenceModel::SpalartAllmaras);
        assert_eq!(validate(&inlet, &physics)[0].field, "TurbulenceSpecification");

        inlet.turbulence.mode = None;
        inlet.turbulence.values.insert(TurbulenceQuantity::NuTilda, Quantity::new(1.0, "m/s"));
        assert_eq!(validate(&inlet, &physics)[0].field, "nuTilda");
    }

    #[test]
    fn thermal_inputs_only_matter_with_energy() {
        let mut wall = boundary(BoundaryKind::Wall(WallBc::Fixed));
        wall.thermal = Some(ThermalBc::HeatFlux{heat_flux: None});
        let mut physics = PhysicsModel::default();
        assert!(validate(&wall, &physics).is_empty());

        physics.thermal = ThermalMode::Energy;
        assert_eq!(validate(&wall, &physics)[0].field, "HeatFlux");

        let mut outlet = boundary(BoundaryKind::Outlet(OutletBc::StaticPressure{pressure: Some(Quantity::new(0.0, "Pa"))}));
        outlet.thermal = Some(ThermalBc::Adiabatic);
        assert_eq!(validate(&outlet, &physics)[0].field, "Thermal");
        assert_eq!(wall.thermal_bc().unwrap().thermal_type(), ThermalType::HeatFlux);
        assert_eq!(boundary(BoundaryKind::Wall(WallBc::Slip)).thermal_bc(), Some(ThermalBc::Adiabatic));
    }

    #[test]
    fn screen_geometry_is_checked() {
        let baffle = boundary(BoundaryKind::Baffle(BaffleBc::Porous{method: PorousMethod::Screen{
            wire_diameter: Some(Quantity::new(2.0, "mm")),
            spacing: Some(Quantity::new(1.0, "mm")),
        }}));
        assert_eq!(validate(&baffle, &PhysicsModel::default())[0].field, "Spacing");
        assert!(matches!(baffle.pressure_drop_coefficient(), Err(BoundaryError::Invalid(_))));

        let screen = boundary(BoundaryKind::Baffle(BaffleBc::Porous{method: PorousMethod::Screen{
            wire_diameter: Some(Quantity::new(1.0, "mm")),
            spacing: Some(Quantity::new(2.0, "mm")),
        }}));
        // Open area ratio 1/4
        assert!((screen.pressure_drop_coefficient().unwrap() - 12.0).abs() < 1e-9);

        let wall = boundary(BoundaryKind::Wall(WallBc::Fixed));
        assert!(matches!(wall.pressure_drop_coefficient(), Err(BoundaryError::StringOnly(_))));
    }

    #[test]
    fn reads_flat_yaml() {
        let yaml = "\
name: inlet
faces: [{object: Box, face: Face1}]
category: inlet
subtype: uniformVelocity
velocity: {ux: 1 m/s, uy: 0 m/s, uz: 0 m/s}
turbulence:
  mode: IntensityAndLengthScale
";
        let read: BoundaryCondition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(read.subtype(), BoundarySubtype::UniformVelocityInlet);
        assert_eq!(read.turbulence.mode, Some(InletModeKey::IntensityAndLengthScale));

        let written = serde_yaml::to_string(&read).unwrap();
        let again: BoundaryCondition = serde_yaml::from_str(&written).unwrap();
        assert_eq!(read, again);

        let baffle: BoundaryCondition = serde_yaml::from_str("name: screen\ncategory: baffle\nsubtype: porous\nmethod:\n  screen: {wire_diameter: 0.5 mm, spacing: 3 mm}\n").unwrap();
        assert_eq!(baffle.subtype(), BoundarySubtype::PorousBaffle);
    }
}
