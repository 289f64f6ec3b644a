use serde::{Serialize, Deserialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::units::{Dimension, Quantity};

/// Coarse turbulence modelling category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, EnumIter, strum::Display, strum::EnumString)]
pub enum TurbulenceTier {
    #[serde(rename = "inviscid", alias = "Inviscid")]
    #[strum(serialize = "inviscid", ascii_case_insensitive)]
    Inviscid,
    #[serde(rename = "laminar", alias = "Laminar")]
    #[strum(serialize = "laminar", ascii_case_insensitive)]
    Laminar,
    #[serde(rename = "RANS", alias = "rans")]
    #[strum(serialize = "RANS", ascii_case_insensitive)]
    Rans,
    #[serde(rename = "LES", alias = "les")]
    #[strum(serialize = "LES", ascii_case_insensitive)]
    Les,
    #[serde(rename = "DES", alias = "des")]
    #[strum(serialize = "DES", ascii_case_insensitive)]
    Des,
}
impl TurbulenceTier {
    /// Models selectable within this tier, in display order.
    pub fn models(&self) -> Vec<TurbulenceModel> {
        TurbulenceModel::iter().filter(|model| model.tier() == *self).collect()
    }

    /// Model used when the tier is chosen without naming one.
    pub fn default_model(&self) -> Option<TurbulenceModel> {
        match self {
            TurbulenceTier::Inviscid | TurbulenceTier::Laminar => None,
            TurbulenceTier::Rans => Some(TurbulenceModel::KOmegaSst),
            TurbulenceTier::Les => Some(TurbulenceModel::Smagorinsky),
            TurbulenceTier::Des => Some(TurbulenceModel::SpalartAllmarasDdes),
        }
    }

    /// `simulationType` keyword of the momentum transport dictionary.
    /// DES models are run through the LES machinery.
    pub fn simulation_type(&self) -> &'static str {
        match self {
            TurbulenceTier::Inviscid | TurbulenceTier::Laminar => "laminar",
            TurbulenceTier::Rans => "RAS",
            TurbulenceTier::Les | TurbulenceTier::Des => "LES",
        }
    }

    /// Whether a turbulence model (and its fields) is involved.
    pub fn is_turbulent(&self) -> bool {
        matches!(self, TurbulenceTier::Rans | TurbulenceTier::Les | TurbulenceTier::Des)
    }
}

/// Specific turbulence model. Names follow the solver's model keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, EnumIter, strum::Display, strum::EnumString)]
pub enum TurbulenceModel {
    #[serde(rename = "kEpsilon")]
    #[strum(serialize = "kEpsilon")]
    KEpsilon,
    #[serde(rename = "realizableKE")]
    #[strum(serialize = "realizableKE")]
    RealizableKE,
    #[serde(rename = "RNGkEpsilon")]
    #[strum(serialize = "RNGkEpsilon")]
    RngKEpsilon,
    #[serde(rename = "kOmega")]
    #[strum(serialize = "kOmega")]
    KOmega,
    #[serde(rename = "kOmegaSST")]
    #[strum(serialize = "kOmegaSST")]
    KOmegaSst,
    #[serde(rename = "SpalartAllmaras")]
    #[strum(serialize = "SpalartAllmaras")]
    SpalartAllmaras,
    #[serde(rename = "kOmegaSSTLM")]
    #[strum(serialize = "kOmegaSSTLM")]
    KOmegaSstLm,
    #[serde(rename = "Smagorinsky")]
    #[strum(serialize = "Smagorinsky")]
    Smagorinsky,
    #[serde(rename = "WALE")]
    #[strum(serialize = "WALE")]
    Wale,
    #[serde(rename = "kEqn")]
    #[strum(serialize = "kEqn")]
    KEqn,
    #[serde(rename = "SpalartAllmarasDES")]
    #[strum(serialize = "SpalartAllmarasDES")]
    SpalartAllmarasDes,
    #[serde(rename = "SpalartAllmarasDDES")]
    #[strum(serialize = "SpalartAllmarasDDES")]
    SpalartAllmarasDdes,
    #[serde(rename = "SpalartAllmarasIDDES")]
    #[strum(serialize = "SpalartAllmarasIDDES")]
    SpalartAllmarasIddes,
    #[serde(rename = "kOmegaSSTDES")]
    #[strum(serialize = "kOmegaSSTDES")]
    KOmegaSstDes,
}
impl TurbulenceModel {
    /// Tier this model belongs to.
    pub fn tier(&self) -> TurbulenceTier {
        use TurbulenceModel::*;
        match self {
            KEpsilon | RealizableKE | RngKEpsilon | KOmega | KOmegaSst | SpalartAllmaras | KOmegaSstLm => TurbulenceTier::Rans,
            Smagorinsky | Wale | KEqn => TurbulenceTier::Les,
            SpalartAllmarasDes | SpalartAllmarasDdes | SpalartAllmarasIddes | KOmegaSstDes => TurbulenceTier::Des,
        }
    }

    /// Fields the model needs in the initial-conditions directory.
    pub fn solved_fields(&self) -> &'static [TurbulenceQuantity] {
        use TurbulenceModel::*;
        use TurbulenceQuantity as Q;
        match self {
            KEpsilon | RealizableKE | RngKEpsilon => &[Q::K, Q::Epsilon, Q::Nut],
            KOmega | KOmegaSst | KOmegaSstDes => &[Q::K, Q::Omega, Q::Nut],
            SpalartAllmaras | SpalartAllmarasDes | SpalartAllmarasDdes | SpalartAllmarasIddes => &[Q::NuTilda, Q::Nut],
            KOmegaSstLm => &[Q::K, Q::Omega, Q::GammaInt, Q::ReThetat, Q::Nut],
            Smagorinsky | Wale => &[Q::Nut],
            KEqn => &[Q::K, Q::Nut],
        }
    }

    /// Quantities an inlet may specify for this model: its solved fields plus the
    /// intensity and length scale for models with a turbulent kinetic energy.
    pub fn inlet_quantities(&self) -> Vec<TurbulenceQuantity> {
        let mut quantities = self.solved_fields().to_vec();
        if quantities.contains(&TurbulenceQuantity::K) {
            quantities.push(TurbulenceQuantity::Intensity);
            quantities.push(TurbulenceQuantity::LengthScale);
        }
        quantities
    }

    /// Whether walls use the Spalding law (single-equation and LES models)
    /// instead of a k-based wall function for `nut`.
    pub fn uses_spalding_wall_function(&self) -> bool {
        !self.solved_fields().contains(&TurbulenceQuantity::K)
    }
}

/// A turbulence input quantity, either a solved field or an inlet parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, EnumIter, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum TurbulenceQuantity {
    #[serde(rename = "k")]
    K,
    #[serde(rename = "epsilon")]
    Epsilon,
    #[serde(rename = "omega")]
    Omega,
    #[serde(rename = "nuTilda")]
    NuTilda,
    #[serde(rename = "nut")]
    Nut,
    #[serde(rename = "gammaInt")]
    GammaInt,
    #[serde(rename = "ReThetat")]
    #[strum(serialize = "ReThetat")]
    ReThetat,
    #[serde(rename = "intensity")]
    Intensity,
    #[serde(rename = "lengthScale")]
    LengthScale,
}
impl TurbulenceQuantity {
    /// Field file name, `None` for inlet-only parameters.
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            TurbulenceQuantity::K => Some("k"),
            TurbulenceQuantity::Epsilon => Some("epsilon"),
            TurbulenceQuantity::Omega => Some("omega"),
            TurbulenceQuantity::NuTilda => Some("nuTilda"),
            TurbulenceQuantity::Nut => Some("nut"),
            TurbulenceQuantity::GammaInt => Some("gammaInt"),
            TurbulenceQuantity::ReThetat => Some("ReThetat"),
            TurbulenceQuantity::Intensity | TurbulenceQuantity::LengthScale => None,
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            TurbulenceQuantity::K => Dimension::SpecificEnergy,
            TurbulenceQuantity::Epsilon => Dimension::DissipationRate,
            TurbulenceQuantity::Omega => Dimension::Frequency,
            TurbulenceQuantity::NuTilda | TurbulenceQuantity::Nut => Dimension::KinematicViscosity,
            TurbulenceQuantity::GammaInt | TurbulenceQuantity::ReThetat | TurbulenceQuantity::Intensity => Dimension::Dimensionless,
            TurbulenceQuantity::LengthScale => Dimension::Length,
        }
    }

    /// Fallback value when neither the boundary nor the initial conditions give one.
    pub fn default_value(&self) -> Quantity {
        match self {
            TurbulenceQuantity::K => Quantity::new(0.01, "m^2/s^2"),
            TurbulenceQuantity::Epsilon => Quantity::new(50.0, "m^2/s^3"),
            TurbulenceQuantity::Omega => Quantity::new(1.0, "1/s"),
            TurbulenceQuantity::NuTilda => Quantity::new(3e-5, "m^2/s"),
            TurbulenceQuantity::Nut => Quantity::new(0.0, "m^2/s"),
            TurbulenceQuantity::GammaInt => Quantity::new(1.0, ""),
            TurbulenceQuantity::ReThetat => Quantity::new(160.0, ""),
            TurbulenceQuantity::Intensity => Quantity::new(1.0, "%"),
            TurbulenceQuantity::LengthScale => Quantity::new(0.1, "m"),
        }
    }

    /// Exponents of [kg m s K mol A cd] for the field file header.
    pub fn foam_dimensions(&self) -> [i32; 7] {
        match self.dimension() {
            Dimension::SpecificEnergy => [0, 2, -2, 0, 0, 0, 0],
            Dimension::DissipationRate => [0, 2, -3, 0, 0, 0, 0],
            Dimension::Frequency => [0, 0, -1, 0, 0, 0, 0],
            Dimension::KinematicViscosity => [0, 2, -1, 0, 0, 0, 0],
            Dimension::Length => [0, 1, 0, 0, 0, 0, 0],
            _ => [0, 0, 0, 0, 0, 0, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn every_model_belongs_to_exactly_one_turbulent_tier() {
        let total: usize = TurbulenceTier::iter().map(|tier| tier.models().len()).sum();
        assert_eq!(total, TurbulenceModel::iter().count());
        assert_eq!(TurbulenceModel::iter().count(), 14);
        for tier in [TurbulenceTier::Inviscid, TurbulenceTier::Laminar] {
            assert!(tier.models().is_empty());
            assert!(tier.default_model().is_none());
        }
        for tier in [TurbulenceTier::Rans, TurbulenceTier::Les, TurbulenceTier::Des] {
            assert_eq!(tier.default_model().unwrap().tier(), tier);
        }
    }

    #[test]
    fn solved_fields_are_fields() {
        for model in TurbulenceModel::iter() {
            assert!(model.solved_fields().contains(&TurbulenceQuantity::Nut), "{} must carry nut", model);
            for quantity in model.solved_fields() {
                assert!(quantity.field_name().is_some());
            }
        }
    }

    #[test]
    fn names_match_solver_keywords() {
        assert_eq!(TurbulenceModel::KOmegaSst.to_string(), "kOmegaSST");
        assert_eq!(TurbulenceModel::from_str("WALE").unwrap(), TurbulenceModel::Wale);
        assert_eq!(TurbulenceTier::from_str("rans").unwrap(), TurbulenceTier::Rans);
        let model: TurbulenceModel = serde_json::from_str("\"RNGkEpsilon\"").unwrap();
        assert_eq!(model, TurbulenceModel::RngKEpsilon);
    }

    #[test]
    fn defaults_have_the_right_dimension() {
        for quantity in TurbulenceQuantity::iter() {
            assert!(quantity.default_value().to_si(quantity.dimension()).is_ok(), "{}", quantity);
        }
    }
}
