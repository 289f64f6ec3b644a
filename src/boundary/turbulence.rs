use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::physics::{TurbulenceModel, TurbulenceQuantity};
use crate::units::Quantity;

/// Way of specifying turbulence at an inflow boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum InletModeKey {
    #[serde(rename = "TKEAndDissipationRate")]
    #[strum(serialize = "TKEAndDissipationRate")]
    TkeAndDissipationRate,
    #[serde(rename = "TKEAndSpecDissipationRate")]
    #[strum(serialize = "TKEAndSpecDissipationRate")]
    TkeAndSpecDissipationRate,
    #[serde(rename = "TKESpecDissipationRateGammaAndReThetat")]
    #[strum(serialize = "TKESpecDissipationRateGammaAndReThetat")]
    TkeSpecDissipationRateGammaAndReThetat,
    #[serde(rename = "TransportedNuTilda")]
    #[strum(serialize = "TransportedNuTilda")]
    TransportedNuTilda,
    #[serde(rename = "TurbulentViscosity")]
    #[strum(serialize = "TurbulentViscosity")]
    TurbulentViscosity,
    #[serde(rename = "TurbulentViscosityAndK")]
    #[strum(serialize = "TurbulentViscosityAndK")]
    TurbulentViscosityAndK,
    #[serde(rename = "IntensityAndLengthScale")]
    #[strum(serialize = "IntensityAndLengthScale")]
    IntensityAndLengthScale,
}

/// One inlet specification mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InletMode {
    pub name: &'static str,
    pub key: InletModeKey,
    pub help: &'static str,
    /// Quantities the mode populates.
    pub quantities: &'static [TurbulenceQuantity],
}

/// Inlet modes of a turbulence model. The first is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurbulenceInletSpec {
    pub modes: &'static [InletMode],
}
impl TurbulenceInletSpec {
    pub fn default_mode(&self) -> &'static InletMode {
        &self.modes[0]
    }

    pub fn find(&self, key: InletModeKey) -> Option<&'static InletMode> {
        self.modes.iter().find(|mode| mode.key == key)
    }
}

use TurbulenceQuantity as Q;

const INTENSITY_MODE: InletMode = InletMode{
    name: "Intensity & length scale",
    key: InletModeKey::IntensityAndLengthScale,
    help: "Turbulence intensity and eddy length scale",
    quantities: &[Q::Intensity, Q::LengthScale],
};

const K_EPSILON_MODES: &[InletMode] = &[
    InletMode{
        name: "Kinetic energy & dissipation",
        key: InletModeKey::TkeAndDissipationRate,
        help: "TKE (k) and dissipation rate (epsilon)",
        quantities: &[Q::K, Q::Epsilon],
    },
    INTENSITY_MODE,
];

const K_OMEGA_MODES: &[InletMode] = &[
    InletMode{
        name: "Kinetic energy & specific dissipation rate",
        key: InletModeKey::TkeAndSpecDissipationRate,
        help: "TKE (k) and specific dissipation rate (omega)",
        quantities: &[Q::K, Q::Omega],
    },
    INTENSITY_MODE,
];

const K_OMEGA_LM_MODES: &[InletMode] = &[
    InletMode{
        name: "Kinetic energy, specific dissipation rate, intermittency & ReThetat",
        key: InletModeKey::TkeSpecDissipationRateGammaAndReThetat,
        help: "TKE (k), specific dissipation rate (omega), intermittency (gammaInt) and transition onset Reynolds number (ReThetat)",
        quantities: &[Q::K, Q::Omega, Q::GammaInt, Q::ReThetat],
    },
    INTENSITY_MODE,
];

const SPALART_ALLMARAS_MODES: &[InletMode] = &[
    InletMode{
        name: "Modified turbulent viscosity",
        key: InletModeKey::TransportedNuTilda,
        help: "Transported modified turbulent viscosity (nuTilda)",
        quantities: &[Q::NuTilda],
    },
];

const ALGEBRAIC_LES_MODES: &[InletMode] = &[
    InletMode{
        name: "Turbulent viscosity",
        key: InletModeKey::TurbulentViscosity,
        help: "Turbulent viscosity (nut)",
        quantities: &[Q::Nut],
    },
];

const K_EQN_MODES: &[InletMode] = &[
    InletMode{
        name: "Turbulent viscosity & kinetic energy",
        key: InletModeKey::TurbulentViscosityAndK,
        help: "Turbulent viscosity (nut) and subgrid TKE (k)",
        quantities: &[Q::Nut, Q::K],
    },
    INTENSITY_MODE,
];

/// Inlet modes available for a turbulence model.
pub fn get_turbulence_inlet_spec(model: TurbulenceModel) -> TurbulenceInletSpec {
    use TurbulenceModel::*;
    let modes = match model {
        KEpsilon | RealizableKE | RngKEpsilon => K_EPSILON_MODES,
        KOmega | KOmegaSst | KOmegaSstDes => K_OMEGA_MODES,
        KOmegaSstLm => K_OMEGA_LM_MODES,
        SpalartAllmaras | SpalartAllmarasDes | SpalartAllmarasDdes | SpalartAllmarasIddes => SPALART_ALLMARAS_MODES,
        Smagorinsky | Wale => ALGEBRAIC_LES_MODES,
        KEqn => K_EQN_MODES,
    };
    TurbulenceInletSpec{modes}
}

/// Turbulence settings of an inflow boundary.
/// Values irrelevant to the selected mode are kept but ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurbulenceInlet {
    /// Unset means the model's default mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<InletModeKey>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<TurbulenceQuantity, Quantity>,
}
impl TurbulenceInlet {
    /// The mode in effect for a model, `None` if the set mode does not apply to it.
    pub fn active_mode(&self, model: TurbulenceModel) -> Option<&'static InletMode> {
        let spec = get_turbulence_inlet_spec(model);
        match self.mode {
            Some(key) => spec.find(key),
            None => Some(spec.default_mode()),
        }
    }

    pub fn is_unset(&self) -> bool {
        self.mode.is_none() && self.values.is_empty()
    }

    /// Value of a quantity, falling back to its default.
    pub fn value(&self, quantity: TurbulenceQuantity) -> Quantity {
        self.values.get(&quantity).cloned().unwrap_or_else(|| quantity.default_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_model_has_a_consistent_inlet_spec() {
        for model in TurbulenceModel::iter() {
            let spec = get_turbulence_inlet_spec(model);
            assert!(!spec.modes.is_empty(), "{}", model);
            let allowed = model.inlet_quantities();
            for mode in spec.modes {
                assert!(!mode.quantities.is_empty());
                for quantity in mode.quantities {
                    assert!(allowed.contains(quantity), "{} mode {} uses {}", model, mode.key, quantity);
                }
            }
        }
    }

    #[test]
    fn mode_selection() {
        let mut inlet = TurbulenceInlet::default();
        assert_eq!(inlet.active_mode(TurbulenceModel::KEpsilon).unwrap().key, InletModeKey::TkeAndDissipationRate);

        inlet.mode = Some(InletModeKey::IntensityAndLengthScale);
        assert_eq!(inlet.active_mode(TurbulenceModel::KOmegaSst).unwrap().key, InletModeKey::IntensityAndLengthScale);
        assert!(inlet.active_mode(TurbulenceModel::SpalartAllmaras).is_none());
    }

    #[test]
    fn values_fall_back_to_defaults() {
        let mut inlet = TurbulenceInlet::default();
        inlet.values.insert(TurbulenceQuantity::K, Quantity::new(0.5, "m^2/s^2"));
        assert_eq!(inlet.value(TurbulenceQuantity::K).magnitude, 0.5);
        assert_eq!(inlet.value(TurbulenceQuantity::Omega), TurbulenceQuantity::Omega.default_value());

        let read: TurbulenceInlet = serde_yaml::from_str("mode: IntensityAndLengthScale\nvalues:\n  intensity: 5 %\n  lengthScale: 10 mm\n").unwrap();
        assert_eq!(read.values.len(), 2);
    }
}
