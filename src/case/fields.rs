/*!
 * Initial field files under `0/`.
 *
 * Every field is a `FieldWriter`. Which fields a case has depends on the
 * solver application and the turbulence model (see `case_fields`).
 *
 * New fields need:
 * - A struct implementing `FieldWriter`
 * - An enum variant containing that struct in `FieldChoice`
 * - A line in `case_fields` deciding when the field is written
 */

use enum_dispatch::enum_dispatch;

use crate::boundary::{
    BoundaryCategory,
    BoundaryCondition,
    BoundaryInput,
    BoundaryKind,
    BoundarySubtype,
    InletBc,
    OpenBc,
    OutletBc,
    ThermalBc,
    ThermalInput,
    WallBc,
};
use crate::case::context::CaseContext;
use crate::case::dictionary::{Dict, Value};
use crate::case::{CaseError, ProcResult};
use crate::physics::{SolverApplication, TurbulenceQuantity};
use crate::validation::ValidationError;

/// A field file under `0/`.
#[enum_dispatch]
pub trait FieldWriter {
    /// File name.
    fn name(&self) -> String;
    fn class(&self) -> &'static str {
        "volScalarField"
    }
    fn dimensions(&self, ctx: &CaseContext) -> [i32; 7];
    fn internal_value(&self, ctx: &CaseContext) -> ProcResult<Value>;
    /// Stanza of a wall, inlet, outlet or opening patch.
    fn patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict>;
    /// Stanza of both sides of a baffle.
    fn baffle_patch(&self, _ctx: &CaseContext, _boundary: &BoundaryCondition) -> ProcResult<Dict> {
        Ok(patch_type("cyclic"))
    }
}

/// Field file enum.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(FieldWriter)]
pub enum FieldChoice {
    Velocity(VelocityField),
    Pressure(PressureField),
    Temperature(TemperatureField),
    Turbulence(TurbulenceField),
    ThermalDiffusivity(ThermalDiffusivityField),
    VolumeFraction(VolumeFractionField),
}

/// Fields written for the analysis, in file order.
pub fn case_fields(ctx: &CaseContext) -> Vec<FieldChoice> {
    let application = ctx.application;
    let mut fields: Vec<FieldChoice> = vec![VelocityField.into()];
    match application {
        SolverApplication::InterFoam => fields.push(PressureField{role: PressureRole::Rgh}.into()),
        SolverApplication::BuoyantSimpleFoam | SolverApplication::BuoyantPimpleFoam => {
            fields.push(PressureField{role: PressureRole::Derived}.into());
            fields.push(PressureField{role: PressureRole::Rgh}.into());
        },
        _ if application.uses_kinematic_pressure() => fields.push(PressureField{role: PressureRole::Kinematic}.into()),
        _ => fields.push(PressureField{role: PressureRole::Static}.into()),
    }
    if application.solves_energy() {
        fields.push(TemperatureField.into());
    }
    if let Some(model) = ctx.model {
        for quantity in model.solved_fields() {
            fields.push(TurbulenceField{quantity: *quantity}.into());
        }
        if application.solves_energy() {
            fields.push(ThermalDiffusivityField.into());
        }
    }
    if let Some(phase) = ctx.analysis.phases().first() {
        fields.push(VolumeFractionField{phase: phase.clone()}.into());
    }
    fields
}

/// Patch names of the two sides of a baffle.
pub fn baffle_patch_names(name: &str) -> [String; 2] {
    [format!("{}_master", name), format!("{}_slave", name)]
}

/// Full dictionary body of a field file.
pub fn field_dict(field: &FieldChoice, ctx: &CaseContext) -> ProcResult<Dict> {
    let mut patches = Dict::new();
    for boundary in ctx.analysis.boundaries.iter() {
        match boundary.subtype() {
            BoundarySubtype::Symmetry => {
                patches.set_dict(&boundary.name, patch_type("symmetry"));
            },
            BoundarySubtype::Empty => {
                patches.set_dict(&boundary.name, patch_type("empty"));
            },
            BoundarySubtype::PorousBaffle => {
                let stanza = field.baffle_patch(ctx, boundary)?;
                for side in baffle_patch_names(&boundary.name) {
                    patches.set_dict(&side, stanza.clone());
                }
            },
            _ => {
                patches.set_dict(&boundary.name, field.patch(ctx, boundary)?);
            },
        }
    }
    Ok(Dict::new()
        .with("dimensions", Value::Dimensions(field.dimensions(ctx)))
        .with("internalField", field.internal_value(ctx)?)
        .with_dict("boundaryField", patches))
}

fn patch_type(keyword: &str) -> Dict {
    Dict::new().with("type", Value::word(keyword))
}

fn fixed_value(value: Value) -> Dict {
    patch_type("fixedValue").with("value", value)
}

fn inlet_outlet(value: Value) -> Dict {
    patch_type("inletOutlet")
        .with("inletValue", value.clone())
        .with("value", value)
}

fn calculated(value: Value) -> Dict {
    patch_type("calculated").with("value", value)
}

/// Fixed for inlets, switching to zero gradient on outflow elsewhere.
fn inflow_value(boundary: &BoundaryCondition, value: Value) -> Dict {
    if boundary.category() == BoundaryCategory::Inlet {
        fixed_value(value)
    } else {
        inlet_outlet(value)
    }
}

/// Walls on which the no-slip wall treatment applies.
fn is_viscous_wall(ctx: &CaseContext, boundary: &BoundaryCondition) -> bool {
    boundary.category() == BoundaryCategory::Wall
        && boundary.subtype() != BoundarySubtype::SlipWall
        && ctx.physics().is_viscous()
}

/// Velocity `U`.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityField;
impl FieldWriter for VelocityField {
    fn name(&self) -> String {
        "U".to_string()
    }
    fn class(&self) -> &'static str {
        "volVectorField"
    }
    fn dimensions(&self, _ctx: &CaseContext) -> [i32; 7] {
        [0, 1, -1, 0, 0, 0, 0]
    }
    fn internal_value(&self, ctx: &CaseContext) -> ProcResult<Value> {
        Ok(Value::uniform_vector(ctx.velocity))
    }

    fn patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict> {
        let zero = Value::uniform_vector([0.0; 3]);
        if boundary.category() == BoundaryCategory::Wall && !is_viscous_wall(ctx, boundary) {
            return Ok(patch_type("slip"));
        }
        Ok(match &boundary.kind {
            BoundaryKind::Wall(WallBc::Slip) => patch_type("slip"),
            BoundaryKind::Wall(WallBc::Fixed) | BoundaryKind::Wall(WallBc::Rough{..}) => patch_type("noSlip"),
            BoundaryKind::Wall(WallBc::PartialSlip{slip_ratio}) => {
                let ratio = boundary.required(slip_ratio.as_ref(), BoundaryInput::SlipRatio)?;
                patch_type("partialSlip")
                    .with("valueFraction", Value::uniform_scalar(1.0 - ratio))
                    .with("value", zero)
            },
            BoundaryKind::Wall(WallBc::Translating{velocity}) => {
                let velocity = boundary.velocity_si(velocity.as_ref(), ctx.geometry)?;
                patch_type("translatingWallVelocity")
                    .with("U", Value::Vector(velocity))
                    .with("value", Value::uniform_vector(velocity))
            },
            BoundaryKind::Inlet(InletBc::UniformVelocity{velocity}) | BoundaryKind::Outlet(OutletBc::UniformVelocity{velocity}) => {
                fixed_value(Value::uniform_vector(boundary.velocity_si(velocity.as_ref(), ctx.geometry)?))
            },
            BoundaryKind::Inlet(InletBc::VolumetricFlowRate{flow_rate}) => {
                let flow_rate = boundary.required(flow_rate.as_ref(), BoundaryInput::VolumetricFlowRate)?;
                patch_type("flowRateInletVelocity")
                    .with("volumetricFlowRate", Value::Number(flow_rate))
                    .with("extrapolateProfile", Value::switch(false))
                    .with("value", zero)
            },
            BoundaryKind::Inlet(InletBc::MassFlowRate{mass_flow_rate}) => {
                let mass_flow_rate = boundary.required(mass_flow_rate.as_ref(), BoundaryInput::MassFlowRate)?;
                let mut stanza = patch_type("flowRateInletVelocity")
                    .with("massFlowRate", Value::Number(mass_flow_rate));
                if ctx.application.uses_kinematic_pressure() {
                    stanza.set("rhoInlet", Value::Number(ctx.fluid().density));
                }
                stanza
                    .with("extrapolateProfile", Value::switch(false))
                    .with("value", zero)
            },
            BoundaryKind::Inlet(InletBc::TotalPressure{..})
            | BoundaryKind::Inlet(InletBc::StaticPressure{..})
            | BoundaryKind::Open(OpenBc::TotalPressure{..}) => {
                patch_type("pressureInletOutletVelocity").with("value", zero)
            },
            BoundaryKind::Outlet(OutletBc::StaticPressure{..}) => inlet_outlet(zero),
            BoundaryKind::Outlet(OutletBc::OutFlow) => patch_type("zeroGradient"),
            BoundaryKind::Open(OpenBc::FarField{velocity, ..}) => {
                let velocity = Value::uniform_vector(boundary.velocity_si(velocity.as_ref(), ctx.geometry)?);
                patch_type("freestreamVelocity")
                    .with("freestreamValue", velocity.clone())
                    .with("value", velocity)
            },
            BoundaryKind::Constraint(_) | BoundaryKind::Baffle(_) => {
                panic!("BUG: Constraint and baffle patches are written by field_dict");
            },
        })
    }
}

/// How a pressure field is solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureRole {
    /// `p` divided by density, incompressible solvers.
    Kinematic,
    /// Absolute `p`, compressible solvers.
    Static,
    /// `p_rgh`, buoyant and free-surface solvers.
    Rgh,
    /// `p` computed from `p_rgh`.
    Derived,
}

/// Pressure `p` or `p_rgh`.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureField {
    pub role: PressureRole,
}
impl PressureField {
    fn value(&self, ctx: &CaseContext, boundary: &BoundaryCondition, pressure: Option<&crate::units::Quantity>) -> ProcResult<Value> {
        let gauge = boundary.required(pressure, BoundaryInput::Pressure)?;
        Ok(Value::uniform_scalar(ctx.solver_pressure(gauge)))
    }
}
impl FieldWriter for PressureField {
    fn name(&self) -> String {
        match self.role {
            PressureRole::Rgh => "p_rgh".to_string(),
            _ => "p".to_string(),
        }
    }
    fn dimensions(&self, ctx: &CaseContext) -> [i32; 7] {
        ctx.pressure_dimensions()
    }
    fn internal_value(&self, ctx: &CaseContext) -> ProcResult<Value> {
        Ok(Value::uniform_scalar(ctx.solver_pressure(ctx.pressure)))
    }

    fn patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict> {
        if self.role == PressureRole::Derived {
            return Ok(calculated(self.internal_value(ctx)?));
        }
        let rgh = self.role == PressureRole::Rgh;
        let from_velocity = if rgh {
            patch_type("fixedFluxPressure").with("value", self.internal_value(ctx)?)
        } else {
            patch_type("zeroGradient")
        };
        Ok(match &boundary.kind {
            BoundaryKind::Wall(_)
            | BoundaryKind::Inlet(InletBc::UniformVelocity{..})
            | BoundaryKind::Inlet(InletBc::VolumetricFlowRate{..})
            | BoundaryKind::Inlet(InletBc::MassFlowRate{..})
            | BoundaryKind::Outlet(OutletBc::UniformVelocity{..}) => from_velocity,
            BoundaryKind::Outlet(OutletBc::OutFlow) => patch_type("zeroGradient"),
            BoundaryKind::Inlet(InletBc::TotalPressure{pressure}) | BoundaryKind::Open(OpenBc::TotalPressure{pressure}) => {
                let value = self.value(ctx, boundary, pressure.as_ref())?;
                patch_type(if rgh { "prghTotalPressure" } else { "totalPressure" })
                    .with("p0", value.clone())
                    .with("value", value)
            },
            BoundaryKind::Inlet(InletBc::StaticPressure{pressure}) | BoundaryKind::Outlet(OutletBc::StaticPressure{pressure}) => {
                let value = self.value(ctx, boundary, pressure.as_ref())?;
                if rgh {
                    patch_type("prghPressure")
                        .with("p", value.clone())
                        .with("value", value)
                } else {
                    fixed_value(value)
                }
            },
            BoundaryKind::Open(OpenBc::FarField{pressure, ..}) => {
                let value = self.value(ctx, boundary, pressure.as_ref())?;
                patch_type("freestreamPressure")
                    .with("freestreamValue", value.clone())
                    .with("value", value)
            },
            BoundaryKind::Constraint(_) | BoundaryKind::Baffle(_) => {
                panic!("BUG: Constraint and baffle patches are written by field_dict");
            },
        })
    }

    fn baffle_patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict> {
        if self.role == PressureRole::Derived {
            return Ok(patch_type("cyclic"));
        }
        Ok(patch_type("porousBafflePressure")
            .with("patchType", Value::word("cyclic"))
            .with("D", Value::Number(0.0))
            .with("I", Value::Number(boundary.pressure_drop_coefficient()?))
            .with("length", Value::Number(1.0))
            .with("jump", Value::uniform_scalar(0.0))
            .with("value", self.internal_value(ctx)?))
    }
}

/// Temperature `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureField;
impl FieldWriter for TemperatureField {
    fn name(&self) -> String {
        "T".to_string()
    }
    fn dimensions(&self, _ctx: &CaseContext) -> [i32; 7] {
        [0, 0, 0, 1, 0, 0, 0]
    }
    fn internal_value(&self, ctx: &CaseContext) -> ProcResult<Value> {
        Ok(Value::uniform_scalar(ctx.temperature))
    }

    fn patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict> {
        let initial = Value::uniform_scalar(ctx.temperature);
        let thermal = match boundary.thermal_bc() {
            Some(thermal) => thermal,
            None => return Ok(patch_type("zeroGradient")),
        };
        Ok(match &thermal {
            ThermalBc::FixedTemperature{temperature} => {
                let temperature = boundary.thermal_si(temperature.as_ref(), ThermalInput::Temperature, false)?
                    .unwrap_or(ctx.temperature);
                inflow_value(boundary, Value::uniform_scalar(temperature))
            },
            ThermalBc::Adiabatic => patch_type("zeroGradient"),
            ThermalBc::HeatFlux{heat_flux} => {
                let heat_flux = boundary.thermal_si(heat_flux.as_ref(), ThermalInput::HeatFlux, true)?.unwrap_or_default();
                patch_type("externalWallHeatFluxTemperature")
                    .with("mode", Value::word("flux"))
                    .with("q", Value::uniform_scalar(heat_flux))
                    .with("kappaMethod", Value::word("fluidThermo"))
                    .with("value", initial)
            },
            ThermalBc::HeatTransferCoefficient{coefficient, ambient_temperature} => {
                let coefficient = boundary.thermal_si(coefficient.as_ref(), ThermalInput::HeatTransferCoeff, true)?.unwrap_or_default();
                let ambient = boundary.thermal_si(ambient_temperature.as_ref(), ThermalInput::AmbientTemperature, false)?
                    .unwrap_or(ctx.temperature);
                patch_type("externalWallHeatFluxTemperature")
                    .with("mode", Value::word("coefficient"))
                    .with("h", Value::uniform_scalar(coefficient))
                    .with("Ta", Value::Tokens(vec![Value::word("constant"), Value::Number(ambient)]))
                    .with("kappaMethod", Value::word("fluidThermo"))
                    .with("value", initial)
            },
        })
    }
}

/// A turbulence field of the model (`k`, `epsilon`, `omega`, `nuTilda`, `nut`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TurbulenceField {
    pub quantity: TurbulenceQuantity,
}
impl TurbulenceField {
    fn wall_patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition, initial: Value) -> ProcResult<Dict> {
        use TurbulenceQuantity as Q;
        if !is_viscous_wall(ctx, boundary) {
            return Ok(match self.quantity {
                Q::Nut => calculated(initial),
                _ => patch_type("zeroGradient"),
            });
        }
        Ok(match self.quantity {
            Q::K => patch_type("kqRWallFunction").with("value", initial),
            Q::Epsilon => patch_type("epsilonWallFunction").with("value", initial),
            Q::Omega => patch_type("omegaWallFunction").with("value", initial),
            Q::NuTilda => fixed_value(Value::uniform_scalar(0.0)),
            Q::Nut => self.nut_wall_patch(ctx, boundary)?,
            _ => patch_type("zeroGradient"),
        })
    }

    fn nut_wall_patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict> {
        let zero = Value::uniform_scalar(0.0);
        let spalding = ctx.model.map_or(true, |model| model.uses_spalding_wall_function());
        if spalding {
            return Ok(patch_type("nutUSpaldingWallFunction").with("value", zero));
        }
        Ok(match &boundary.kind {
            BoundaryKind::Wall(WallBc::Rough{roughness_height, roughness_constant}) => {
                let height = boundary.required(roughness_height.as_ref(), BoundaryInput::RoughnessHeight)?;
                let constant = boundary.required(roughness_constant.as_ref(), BoundaryInput::RoughnessConstant)?;
                patch_type("nutkRoughWallFunction")
                    .with("Ks", Value::uniform_scalar(height))
                    .with("Cs", Value::uniform_scalar(constant))
                    .with("value", zero)
            },
            _ => patch_type("nutkWallFunction").with("value", zero),
        })
    }

    fn inflow_patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition, initial: Value) -> ProcResult<Dict> {
        use TurbulenceQuantity as Q;
        let model = match ctx.model {
            Some(model) => model,
            None => return Ok(patch_type("zeroGradient")),
        };
        let mode = match boundary.turbulence.active_mode(model) {
            Some(mode) => mode,
            None => return Err(CaseError::Invalid(vec![ValidationError::new(
                &format!("boundary '{}'", boundary.name), "TurbulenceSpecification", &format!("not available for {}", model))])),
        };
        let si = |quantity: TurbulenceQuantity| -> ProcResult<f64> {
            let context = format!("boundary '{}': {}", boundary.name, quantity);
            Ok(boundary.turbulence.value(quantity).si_in(quantity.dimension(), &context)?)
        };

        if mode.quantities.contains(&Q::Intensity) {
            match self.quantity {
                Q::K => return Ok(patch_type("turbulentIntensityKineticEnergyInlet")
                    .with("intensity", Value::Number(si(Q::Intensity)?))
                    .with("value", initial)),
                Q::Epsilon => return Ok(patch_type("turbulentMixingLengthDissipationRateInlet")
                    .with("mixingLength", Value::Number(si(Q::LengthScale)?))
                    .with("value", initial)),
                Q::Omega => return Ok(patch_type("turbulentMixingLengthFrequencyInlet")
                    .with("mixingLength", Value::Number(si(Q::LengthScale)?))
                    .with("value", initial)),
                _ => (),
            }
        }
        if self.quantity == Q::Nut && !mode.quantities.contains(&Q::Nut) {
            return Ok(calculated(initial));
        }
        Ok(inflow_value(boundary, Value::uniform_scalar(si(self.quantity)?)))
    }
}
impl FieldWriter for TurbulenceField {
    fn name(&self) -> String {
        self.quantity.to_string()
    }
    fn dimensions(&self, _ctx: &CaseContext) -> [i32; 7] {
        self.quantity.foam_dimensions()
    }
    fn internal_value(&self, ctx: &CaseContext) -> ProcResult<Value> {
        Ok(Value::uniform_scalar(ctx.initial_turbulence(self.quantity)?))
    }

    fn patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict> {
        let initial = self.internal_value(ctx)?;
        if boundary.category() == BoundaryCategory::Wall {
            return self.wall_patch(ctx, boundary, initial);
        }
        if !boundary.ui_spec().turbulence_panel {
            return Ok(match self.quantity {
                TurbulenceQuantity::Nut => calculated(initial),
                _ => patch_type("zeroGradient"),
            });
        }
        self.inflow_patch(ctx, boundary, initial)
    }
}

/// Turbulent thermal diffusivity `alphat`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalDiffusivityField;
impl FieldWriter for ThermalDiffusivityField {
    fn name(&self) -> String {
        "alphat".to_string()
    }
    fn dimensions(&self, _ctx: &CaseContext) -> [i32; 7] {
        [1, -1, -1, 0, 0, 0, 0]
    }
    fn internal_value(&self, _ctx: &CaseContext) -> ProcResult<Value> {
        Ok(Value::uniform_scalar(0.0))
    }

    fn patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict> {
        let zero = Value::uniform_scalar(0.0);
        if is_viscous_wall(ctx, boundary) {
            return Ok(patch_type("compressible::alphatWallFunction")
                .with("Prt", Value::Number(0.85))
                .with("value", zero));
        }
        Ok(calculated(zero))
    }
}

/// Volume fraction `alpha.<phase>` of the tracked phase.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeFractionField {
    pub phase: String,
}
impl FieldWriter for VolumeFractionField {
    fn name(&self) -> String {
        format!("alpha.{}", self.phase)
    }
    fn dimensions(&self, _ctx: &CaseContext) -> [i32; 7] {
        [0; 7]
    }
    fn internal_value(&self, ctx: &CaseContext) -> ProcResult<Value> {
        Ok(Value::uniform_scalar(ctx.initial_fraction(&self.phase)))
    }

    fn patch(&self, ctx: &CaseContext, boundary: &BoundaryCondition) -> ProcResult<Dict> {
        if !boundary.ui_spec().volume_fraction_panel {
            return Ok(patch_type("zeroGradient"));
        }
        let fraction = boundary.volume_fractions.get(&self.phase).copied()
            .unwrap_or_else(|| ctx.initial_fraction(&self.phase));
        Ok(inflow_value(boundary, Value::uniform_scalar(fraction)))
    }
}
