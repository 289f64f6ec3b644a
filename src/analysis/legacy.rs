/*!
 * Version 1 analysis config.
 *
 * Version 1 stored every boundary as one flat record holding every input of
 * every subtype, selected by a (type, subtype) pair, like the host's property
 * bag. Dormant inputs always held their defaults.
 * `migrate_v1_to_v2` turns those records into typed boundary conditions.
 */

use std::collections::BTreeMap;
use std::path::PathBuf;
use serde::{Serialize, Deserialize};

use crate::analysis::{
    Analysis,
    InitialFields,
    MeshSettings,
    SolverSettings,
    ProcResult,
    err_str,
};
use crate::boundary::{
    BoundaryCategory,
    BoundarySubtype,
    BoundaryCondition,
    BoundaryInput,
    BoundaryKind,
    WallBc,
    InletBc,
    OutletBc,
    OpenBc,
    ConstraintBc,
    BaffleBc,
    PorousMethod,
    VelocitySpec,
    ThermalType,
    ThermalBc,
    InletModeKey,
    TurbulenceInlet,
};
use crate::geo_3d::{FaceCfg, FaceRef};
use crate::material::FluidMaterial;
use crate::physics::{PhysicsModel, TurbulenceQuantity};
use crate::units::Quantity;

/// Version 1 analysis config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisV1 {
    #[serde(default = "AnalysisV1::version")]
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub physics: PhysicsModel,
    #[serde(default)]
    pub materials: Vec<FluidMaterial>,
    #[serde(default)]
    pub boundaries: Vec<LegacyBoundary>,
    #[serde(default)]
    pub initial: InitialFields,
    #[serde(default)]
    pub mesh: MeshSettings,
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub geometry: Vec<FaceCfg>,
}
impl AnalysisV1 {
    fn version() -> u32 {
        1
    }
}

/// Flat version 1 boundary record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyBoundary {
    #[serde(alias = "Label")]
    pub name: String,
    #[serde(default, alias = "References")]
    pub faces: Vec<FaceRef>,
    pub boundary_type: BoundaryCategory,
    #[serde(alias = "BoundarySubType")]
    pub boundary_subtype: BoundarySubtype,
    #[serde(flatten)]
    pub values: LegacyValues,
}

/// Every input of every subtype, at its default unless set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LegacyValues {
    pub velocity_is_cartesian: bool,
    pub ux: Quantity,
    pub uy: Quantity,
    pub uz: Quantity,
    pub velocity_mag: Quantity,
    pub direction_face: Option<FaceRef>,
    pub reverse_normal: Option<bool>,
    pub pressure: Quantity,
    pub slip_ratio: Quantity,
    pub vol_flow_rate: Quantity,
    pub mass_flow_rate: Quantity,
    pub roughness_height: Quantity,
    pub roughness_constant: Quantity,
    /// 0: pressure drop coefficient, 1: wire screen.
    pub porous_baffle_method: u8,
    pub pressure_drop_coeff: Quantity,
    pub screen_wire_diameter: Quantity,
    pub screen_spacing: Quantity,
    pub turbulence_inlet_specification: Option<InletModeKey>,
    pub turbulent_kinetic_energy: Quantity,
    pub specific_dissipation_rate: Quantity,
    pub dissipation_rate: Quantity,
    pub nu_tilda: Quantity,
    pub intermittency: Quantity,
    pub re_thetat: Quantity,
    pub turbulent_viscosity: Quantity,
    pub turbulence_intensity: Quantity,
    pub turbulence_length_scale: Quantity,
    pub thermal_boundary_type: Option<ThermalType>,
    pub temperature: Quantity,
    pub heat_flux: Quantity,
    pub heat_transfer_coeff: Quantity,
    pub volume_fractions: BTreeMap<String, f64>,
}
impl Default for LegacyValues {
    fn default() -> Self {
        use BoundaryInput as I;
        use TurbulenceQuantity as Q;
        LegacyValues{
            velocity_is_cartesian: true,
            ux: I::Velocity.default_value(),
            uy: I::Velocity.default_value(),
            uz: I::Velocity.default_value(),
            velocity_mag: I::Velocity.default_value(),
            direction_face: None,
            reverse_normal: None,
            pressure: I::Pressure.default_value(),
            slip_ratio: I::SlipRatio.default_value(),
            vol_flow_rate: I::VolumetricFlowRate.default_value(),
            mass_flow_rate: I::MassFlowRate.default_value(),
            roughness_height: I::RoughnessHeight.default_value(),
            roughness_constant: I::RoughnessConstant.default_value(),
            porous_baffle_method: 0,
            pressure_drop_coeff: I::PressureDropCoeff.default_value(),
            screen_wire_diameter: I::WireDiameter.default_value(),
            screen_spacing: I::Spacing.default_value(),
            turbulence_inlet_specification: None,
            turbulent_kinetic_energy: Q::K.default_value(),
            specific_dissipation_rate: Q::Omega.default_value(),
            dissipation_rate: Q::Epsilon.default_value(),
            nu_tilda: Q::NuTilda.default_value(),
            intermittency: Q::GammaInt.default_value(),
            re_thetat: Q::ReThetat.default_value(),
            turbulent_viscosity: Q::Nut.default_value(),
            turbulence_intensity: Q::Intensity.default_value(),
            turbulence_length_scale: Q::LengthScale.default_value(),
            thermal_boundary_type: None,
            temperature: InitialFields::default_temperature(),
            heat_flux: Quantity::new(0.0, "W/m^2"),
            heat_transfer_coeff: Quantity::new(0.0, "W/m^2/K"),
            volume_fractions: BTreeMap::new(),
        }
    }
}

impl LegacyBoundary {
    /// Convert to a typed boundary condition, keeping only the active subtype's inputs.
    pub fn migrate(self) -> ProcResult<BoundaryCondition> {
        use BoundarySubtype::*;

        if self.boundary_subtype.category() != self.boundary_type {
            return err_str(&format!(
                "Boundary '{}': subtype {} is not a {} subtype. Available: {}",
                self.name,
                self.boundary_subtype,
                self.boundary_type,
                self.boundary_type.subtypes().iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", "),
            ));
        }

        let v = self.values;
        let velocity = if v.velocity_is_cartesian {
            VelocitySpec::Cartesian{ux: v.ux.clone(), uy: v.uy.clone(), uz: v.uz.clone()}
        } else {
            VelocitySpec::Magnitude{magnitude: v.velocity_mag.clone(), direction_face: v.direction_face.clone()}
        };
        let pressure = Some(v.pressure.clone());

        let kind = match self.boundary_subtype {
            FixedWall => BoundaryKind::Wall(WallBc::Fixed),
            SlipWall => BoundaryKind::Wall(WallBc::Slip),
            PartialSlipWall => BoundaryKind::Wall(WallBc::PartialSlip{slip_ratio: Some(v.slip_ratio.clone())}),
            TranslatingWall => BoundaryKind::Wall(WallBc::Translating{velocity: Some(velocity)}),
            RoughWall => BoundaryKind::Wall(WallBc::Rough{
                roughness_height: Some(v.roughness_height.clone()),
                roughness_constant: Some(v.roughness_constant.clone()),
            }),
            UniformVelocityInlet => BoundaryKind::Inlet(InletBc::UniformVelocity{velocity: Some(velocity)}),
            VolumetricFlowRateInlet => BoundaryKind::Inlet(InletBc::VolumetricFlowRate{flow_rate: Some(v.vol_flow_rate.clone())}),
            MassFlowRateInlet => BoundaryKind::Inlet(InletBc::MassFlowRate{mass_flow_rate: Some(v.mass_flow_rate.clone())}),
            TotalPressureInlet => BoundaryKind::Inlet(InletBc::TotalPressure{pressure}),
            StaticPressureInlet => BoundaryKind::Inlet(InletBc::StaticPressure{pressure}),
            StaticPressureOutlet => BoundaryKind::Outlet(OutletBc::StaticPressure{pressure}),
            UniformVelocityOutlet => BoundaryKind::Outlet(OutletBc::UniformVelocity{velocity: Some(velocity)}),
            OutFlowOutlet => BoundaryKind::Outlet(OutletBc::OutFlow),
            TotalPressureOpening => BoundaryKind::Open(OpenBc::TotalPressure{pressure}),
            FarField => BoundaryKind::Open(OpenBc::FarField{pressure, velocity: Some(velocity)}),
            Symmetry => BoundaryKind::Constraint(ConstraintBc::Symmetry),
            Empty => BoundaryKind::Constraint(ConstraintBc::Empty),
            PorousBaffle => {
                let method = match v.porous_baffle_method {
                    0 => PorousMethod::Coefficient{pressure_drop_coeff: Some(v.pressure_drop_coeff.clone())},
                    1 => PorousMethod::Screen{
                        wire_diameter: Some(v.screen_wire_diameter.clone()),
                        spacing: Some(v.screen_spacing.clone()),
                    },
                    other => return err_str(&format!("Boundary '{}': unknown porous baffle method {} (0: coefficient, 1: screen)", self.name, other)),
                };
                BoundaryKind::Baffle(BaffleBc::Porous{method})
            },
        };

        let values = BTreeMap::from([
            (TurbulenceQuantity::K, v.turbulent_kinetic_energy),
            (TurbulenceQuantity::Omega, v.specific_dissipation_rate),
            (TurbulenceQuantity::Epsilon, v.dissipation_rate),
            (TurbulenceQuantity::NuTilda, v.nu_tilda),
            (TurbulenceQuantity::GammaInt, v.intermittency),
            (TurbulenceQuantity::ReThetat, v.re_thetat),
            (TurbulenceQuantity::Nut, v.turbulent_viscosity),
            (TurbulenceQuantity::Intensity, v.turbulence_intensity),
            (TurbulenceQuantity::LengthScale, v.turbulence_length_scale),
        ]);

        // The host used the temperature row as the ambient temperature for heat transfer coefficients
        let thermal = v.thermal_boundary_type.map(|thermal_type| match thermal_type {
            ThermalType::FixedTemperature => ThermalBc::FixedTemperature{temperature: Some(v.temperature.clone())},
            ThermalType::Adiabatic => ThermalBc::Adiabatic,
            ThermalType::HeatFlux => ThermalBc::HeatFlux{heat_flux: Some(v.heat_flux.clone())},
            ThermalType::HeatTransferCoefficient => ThermalBc::HeatTransferCoefficient{
                coefficient: Some(v.heat_transfer_coeff.clone()),
                ambient_temperature: Some(v.temperature.clone()),
            },
        });

        Ok(BoundaryCondition{
            name: self.name,
            faces: self.faces,
            kind,
            reverse_normal: v.reverse_normal,
            turbulence: TurbulenceInlet{mode: v.turbulence_inlet_specification, values},
            thermal,
            volume_fractions: v.volume_fractions,
        })
    }
}

/// Migrate a version 1 analysis to the current typed form.
pub fn migrate_v1_to_v2(v1: AnalysisV1) -> ProcResult<Analysis> {
    if v1.version != 1 {
        return err_str(&format!("Expected a version 1 analysis, got version {}", v1.version));
    }
    let boundaries = v1.boundaries.into_iter()
        .map(LegacyBoundary::migrate)
        .collect::<ProcResult<Vec<_>>>()?;
    Ok(Analysis{
        version: Analysis::CURRENT_VERSION,
        name: v1.name,
        physics: v1.physics,
        materials: v1.materials,
        boundaries,
        initial: v1.initial,
        mesh: v1.mesh,
        solver: v1.solver,
        geometry: v1.geometry,
        base_dir: PathBuf::new(),
    })
}
