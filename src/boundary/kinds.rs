use serde::{Serialize, Deserialize};
use strum::{EnumIter, IntoEnumIterator};

/// Boundary category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, EnumIter, strum::Display, strum::EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum BoundaryCategory {
    Wall,
    Inlet,
    Outlet,
    Open,
    Constraint,
    Baffle,
}
impl BoundaryCategory {
    /// Subtypes of the category, in display order. The first is the default.
    pub fn subtypes(&self) -> Vec<BoundarySubtype> {
        BoundarySubtype::iter().filter(|subtype| subtype.category() == *self).collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoundaryCategory::Wall => "Wall",
            BoundaryCategory::Inlet => "Inlet",
            BoundaryCategory::Outlet => "Outlet",
            BoundaryCategory::Open => "Opening",
            BoundaryCategory::Constraint => "Constraint",
            BoundaryCategory::Baffle => "Baffle",
        }
    }
}

/// Flat key of every boundary subtype, unique across categories.
/// Names match the legacy (version 1) config spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, EnumIter, strum::Display, strum::EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum BoundarySubtype {
    FixedWall,
    SlipWall,
    PartialSlipWall,
    TranslatingWall,
    RoughWall,

    UniformVelocityInlet,
    VolumetricFlowRateInlet,
    MassFlowRateInlet,
    #[serde(alias = "pressureInlet")]
    TotalPressureInlet,
    StaticPressureInlet,

    #[serde(alias = "pressureOutlet")]
    StaticPressureOutlet,
    UniformVelocityOutlet,
    OutFlowOutlet,

    TotalPressureOpening,
    FarField,

    Symmetry,
    Empty,

    PorousBaffle,
}
impl BoundarySubtype {
    /// Category the subtype belongs to.
    pub fn category(&self) -> BoundaryCategory {
        use BoundarySubtype::*;
        match self {
            FixedWall | SlipWall | PartialSlipWall | TranslatingWall | RoughWall => BoundaryCategory::Wall,
            UniformVelocityInlet | VolumetricFlowRateInlet | MassFlowRateInlet | TotalPressureInlet | StaticPressureInlet => BoundaryCategory::Inlet,
            StaticPressureOutlet | UniformVelocityOutlet | OutFlowOutlet => BoundaryCategory::Outlet,
            TotalPressureOpening | FarField => BoundaryCategory::Open,
            Symmetry | Empty => BoundaryCategory::Constraint,
            PorousBaffle => BoundaryCategory::Baffle,
        }
    }

    pub fn label(&self) -> &'static str {
        use BoundarySubtype::*;
        match self {
            FixedWall => "No-slip (viscous)",
            SlipWall => "Slip (inviscid)",
            PartialSlipWall => "Partial slip",
            TranslatingWall => "Translating",
            RoughWall => "Rough",
            UniformVelocityInlet => "Uniform velocity",
            VolumetricFlowRateInlet => "Volumetric flow rate",
            MassFlowRateInlet => "Mass flow rate",
            TotalPressureInlet => "Total pressure",
            StaticPressureInlet => "Static pressure",
            StaticPressureOutlet => "Static pressure",
            UniformVelocityOutlet => "Uniform velocity",
            OutFlowOutlet => "Extrapolated",
            TotalPressureOpening => "Ambient pressure",
            FarField => "Far-field",
            Symmetry => "Symmetry plane",
            Empty => "Empty (2D)",
            PorousBaffle => "Porous baffle",
        }
    }

    pub fn help(&self) -> &'static str {
        use BoundarySubtype::*;
        match self {
            FixedWall => "Zero velocity relative to wall",
            SlipWall => "Frictionless wall; zero normal velocity",
            PartialSlipWall => "Blended slip: 0 is no-slip, 1 is full slip",
            TranslatingWall => "Fixed velocity tangential to wall; zero normal velocity",
            RoughWall => "Wall roughness function included through wall functions",
            UniformVelocityInlet => "Velocity specified; normal component imposed for reverse flow",
            VolumetricFlowRateInlet => "Uniform volumetric flow rate specified",
            MassFlowRateInlet => "Uniform mass flow rate specified",
            TotalPressureInlet => "Total pressure specified; treated as static pressure for reverse flow",
            StaticPressureInlet => "Static pressure specified",
            StaticPressureOutlet => "Static pressure specified for outflow and reverse flow",
            UniformVelocityOutlet => "Normal component imposed for outflow; velocity fixed for reverse flow",
            OutFlowOutlet => "All fields extrapolated; use with care!",
            TotalPressureOpening => "Boundary open to surrounding with total pressure specified",
            FarField => "Characteristic-based non-reflecting boundary",
            Symmetry => "Symmetry of flow quantities about boundary face",
            Empty => "Front and back faces of a two-dimensional domain",
            PorousBaffle => "Permeable screen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn every_category_has_subtypes() {
        let counts: Vec<usize> = BoundaryCategory::iter().map(|category| category.subtypes().len()).collect();
        assert_eq!(counts, vec![5, 5, 3, 2, 2, 1]);
    }

    #[test]
    fn names_are_camel_case() {
        assert_eq!(BoundaryCategory::Open.to_string(), "open");
        assert_eq!(BoundarySubtype::OutFlowOutlet.to_string(), "outFlowOutlet");
        assert_eq!(BoundarySubtype::from_str("uniformvelocityinlet").unwrap(), BoundarySubtype::UniformVelocityInlet);
        let subtype: BoundarySubtype = serde_yaml::from_str("farField").unwrap();
        assert_eq!(subtype.category(), BoundaryCategory::Open);
        let subtype: BoundarySubtype = serde_yaml::from_str("pressureInlet").unwrap();
        assert_eq!(subtype, BoundarySubtype::TotalPressureInlet);
    }
}
