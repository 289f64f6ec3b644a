/*!
 * Boundary schema registry.
 *
 * For every boundary (category, subtype) pair this answers which inputs and
 * which optional panels apply. The table is a single exhaustive `match`, so a
 * new subtype does not compile until it has an entry.
 */

use serde::{Serialize, Deserialize};
use strum::EnumIter;

use crate::boundary::{BoundaryCategory, BoundarySubtype};
use crate::units::{Dimension, Quantity};

/// A basic input of a boundary condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum BoundaryInput {
    Velocity,
    VolumetricFlowRate,
    MassFlowRate,
    Pressure,
    SlipRatio,
    RoughnessHeight,
    RoughnessConstant,
    PressureDropCoeff,
    WireDiameter,
    Spacing,
}
impl BoundaryInput {
    /// Field name used in validation messages.
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            BoundaryInput::Velocity => Dimension::Velocity,
            BoundaryInput::VolumetricFlowRate => Dimension::VolumetricFlowRate,
            BoundaryInput::MassFlowRate => Dimension::MassFlowRate,
            BoundaryInput::Pressure => Dimension::Pressure,
            BoundaryInput::SlipRatio
            | BoundaryInput::RoughnessConstant
            | BoundaryInput::PressureDropCoeff => Dimension::Dimensionless,
            BoundaryInput::RoughnessHeight
            | BoundaryInput::WireDiameter
            | BoundaryInput::Spacing => Dimension::Length,
        }
    }

    /// Value a dormant input holds before the user sets it.
    pub fn default_value(&self) -> Quantity {
        match self {
            BoundaryInput::Velocity => Quantity::new(0.0, "m/s"),
            BoundaryInput::VolumetricFlowRate => Quantity::new(0.0, "m^3/s"),
            BoundaryInput::MassFlowRate => Quantity::new(0.0, "kg/s"),
            BoundaryInput::Pressure => Quantity::new(0.0, "Pa"),
            BoundaryInput::SlipRatio => Quantity::new(0.0, ""),
            BoundaryInput::RoughnessHeight => Quantity::new(0.0, "m"),
            BoundaryInput::RoughnessConstant => Quantity::new(0.5, ""),
            BoundaryInput::PressureDropCoeff => Quantity::new(0.0, ""),
            BoundaryInput::WireDiameter => Quantity::new(0.2, "mm"),
            BoundaryInput::Spacing => Quantity::new(2.0, "mm"),
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            BoundaryInput::Velocity => "Velocity as Cartesian components, or a magnitude along a face normal",
            BoundaryInput::VolumetricFlowRate => "Volumetric flow rate through the boundary",
            BoundaryInput::MassFlowRate => "Mass flow rate through the boundary",
            BoundaryInput::Pressure => "Pressure relative to the reference (gauge)",
            BoundaryInput::SlipRatio => "Fraction of slip, between 0 and 1",
            BoundaryInput::RoughnessHeight => "Equivalent sand-grain roughness height",
            BoundaryInput::RoughnessConstant => "Roughness constant (0.5 for uniform sand grains)",
            BoundaryInput::PressureDropCoeff => "Pressure drop coefficient of the baffle",
            BoundaryInput::WireDiameter => "Diameter of the screen wire",
            BoundaryInput::Spacing => "Centre-to-centre spacing of the screen wires",
        }
    }
}

/// Thermal boundary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, EnumIter, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ThermalType {
    FixedTemperature,
    Adiabatic,
    HeatFlux,
    HeatTransferCoefficient,
}

/// Input row of the thermal panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum ThermalInput {
    Temperature,
    HeatFlux,
    HeatTransferCoeff,
    AmbientTemperature,
}
impl ThermalInput {
    pub fn dimension(&self) -> Dimension {
        match self {
            ThermalInput::Temperature | ThermalInput::AmbientTemperature => Dimension::Temperature,
            ThermalInput::HeatFlux => Dimension::HeatFlux,
            ThermalInput::HeatTransferCoeff => Dimension::HeatTransferCoeff,
        }
    }
}

/// Rows of the thermal panel for a thermal type.
pub fn thermal_rows(thermal_type: ThermalType) -> &'static [ThermalInput] {
    match thermal_type {
        ThermalType::FixedTemperature => &[ThermalInput::Temperature],
        ThermalType::Adiabatic => &[],
        ThermalType::HeatFlux => &[ThermalInput::HeatFlux],
        ThermalType::HeatTransferCoefficient => &[ThermalInput::HeatTransferCoeff, ThermalInput::AmbientTemperature],
    }
}

/// What applies to one boundary subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryUiSpec {
    /// Whether the basic input tab has anything to show.
    pub tab_enabled: bool,
    /// Basic inputs, in display order.
    pub fields: &'static [BoundaryInput],
    /// Whether a derived direction points against the face's outward normal.
    pub reverse_default: bool,
    pub turbulence_panel: bool,
    pub volume_fraction_panel: bool,
    pub thermal_panel: bool,
    /// Allowed thermal types; the first is the default.
    pub thermal_types: &'static [ThermalType],
}

const NO_THERMAL: &[ThermalType] = &[];
const INFLOW_THERMAL: &[ThermalType] = &[ThermalType::FixedTemperature];
const WALL_THERMAL: &[ThermalType] = &[
    ThermalType::Adiabatic,
    ThermalType::FixedTemperature,
    ThermalType::HeatFlux,
    ThermalType::HeatTransferCoefficient,
];

/// Spec of a subtype with only basic inputs.
const fn basic(fields: &'static [BoundaryInput], reverse_default: bool) -> BoundaryUiSpec {
    BoundaryUiSpec{
        tab_enabled: !fields.is_empty(),
        fields,
        reverse_default,
        turbulence_panel: false,
        volume_fraction_panel: false,
        thermal_panel: false,
        thermal_types: NO_THERMAL,
    }
}

/// Spec of a subtype through which fluid may enter, so every panel applies.
const fn inflow(fields: &'static [BoundaryInput], reverse_default: bool) -> BoundaryUiSpec {
    BoundaryUiSpec{
        tab_enabled: true,
        fields,
        reverse_default,
        turbulence_panel: true,
        volume_fraction_panel: true,
        thermal_panel: true,
        thermal_types: INFLOW_THERMAL,
    }
}

/// Spec of a wall subtype: thermal panel only.
const fn wall(fields: &'static [BoundaryInput]) -> BoundaryUiSpec {
    BoundaryUiSpec{
        tab_enabled: !fields.is_empty(),
        fields,
        reverse_default: false,
        turbulence_panel: false,
        volume_fraction_panel: false,
        thermal_panel: true,
        thermal_types: WALL_THERMAL,
    }
}

/// Look up the spec of a boundary subtype.
/// The subtype must belong to the category; anything else is a bug in the caller.
pub fn get_boundary_ui_spec(category: BoundaryCategory, subtype: BoundarySubtype) -> BoundaryUiSpec {
    use BoundaryInput as I;
    use BoundarySubtype::*;

    if subtype.category() != category {
        panic!("BUG: Boundary subtype {} is not part of category {}", subtype, category);
    }
    match subtype {
        FixedWall => wall(&[]),
        SlipWall => wall(&[]),
        PartialSlipWall => wall(&[I::SlipRatio]),
        TranslatingWall => wall(&[I::Velocity]),
        RoughWall => wall(&[I::RoughnessHeight, I::RoughnessConstant]),

        UniformVelocityInlet => inflow(&[I::Velocity], true),
        VolumetricFlowRateInlet => inflow(&[I::VolumetricFlowRate], true),
        MassFlowRateInlet => inflow(&[I::MassFlowRate], true),
        TotalPressureInlet => inflow(&[I::Pressure], true),
        StaticPressureInlet => inflow(&[I::Pressure], true),

        StaticPressureOutlet => inflow(&[I::Pressure], false),
        UniformVelocityOutlet => basic(&[I::Velocity], false),
        OutFlowOutlet => basic(&[], false),

        TotalPressureOpening => inflow(&[I::Pressure], true),
        FarField => inflow(&[I::Pressure, I::Velocity], true),

        Symmetry => basic(&[], false),
        Empty => basic(&[], false),

        PorousBaffle => basic(&[I::PressureDropCoeff, I::WireDiameter, I::Spacing], false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn registry_is_total() {
        for category in BoundaryCategory::iter() {
            for subtype in category.subtypes() {
                let spec = get_boundary_ui_spec(category, subtype);
                assert_eq!(spec.tab_enabled, !spec.fields.is_empty() || spec.turbulence_panel, "{}", subtype);
                assert_eq!(spec.thermal_panel, !spec.thermal_types.is_empty(), "{}", subtype);
                for input in spec.fields {
                    assert!(input.default_value().to_si(input.dimension()).is_ok(), "{} of {}", input, subtype);
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn foreign_subtype_panics() {
        get_boundary_ui_spec(BoundaryCategory::Wall, BoundarySubtype::FarField);
    }

    #[test]
    fn inlets_point_into_the_domain() {
        for subtype in BoundaryCategory::Inlet.subtypes() {
            let spec = get_boundary_ui_spec(BoundaryCategory::Inlet, subtype);
            assert!(spec.reverse_default);
            assert!(spec.turbulence_panel && spec.volume_fraction_panel);
            assert_eq!(spec.thermal_types, &[ThermalType::FixedTemperature]);
        }
        let outlet = get_boundary_ui_spec(BoundaryCategory::Outlet, BoundarySubtype::UniformVelocityOutlet);
        assert!(!outlet.reverse_default);
    }

    #[test]
    fn walls_default_to_adiabatic() {
        let spec = get_boundary_ui_spec(BoundaryCategory::Wall, BoundarySubtype::FixedWall);
        assert!(!spec.tab_enabled);
        assert_eq!(spec.thermal_types[0], ThermalType::Adiabatic);
        assert_eq!(spec.thermal_types.len(), ThermalType::iter().count());
    }

    #[test]
    fn thermal_rows_by_type() {
        assert!(thermal_rows(ThermalType::Adiabatic).is_empty());
        assert_eq!(thermal_rows(ThermalType::HeatTransferCoefficient).len(), 2);
        for thermal_type in ThermalType::iter() {
            for row in thermal_rows(thermal_type) {
                assert!(matches!(row.dimension(), Dimension::Temperature | Dimension::HeatFlux | Dimension::HeatTransferCoeff));
            }
        }
    }
}
