//! Physical quantity strings.
//!
//! Every user-facing physical input is stored as a magnitude and a unit string
//! (`"1.5 m/s"`, `"101.325 kPa"`). The case writer converts them to the SI
//! units the solver expects and refuses any unit that does not match the
//! expected dimension.

use serde::{Serialize, Deserialize};

/// Physical dimension of a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Dimension {
    Dimensionless,
    Length,
    Velocity,
    Pressure,
    Density,
    DynamicViscosity,
    KinematicViscosity,
    VolumetricFlowRate,
    MassFlowRate,
    Temperature,
    HeatFlux,
    HeatTransferCoeff,
    SpecificHeat,
    MolarMass,
    /// m^2/s^2, turbulent kinetic energy.
    SpecificEnergy,
    /// m^2/s^3, turbulent dissipation rate.
    DissipationRate,
    /// 1/s, specific dissipation rate.
    Frequency,
    SurfaceTension,
}

/// A known unit symbol: `si = value * factor + offset`.
struct UnitDef {
    symbol: &'static str,
    dimension: Dimension,
    factor: f64,
    offset: f64,
}

macro_rules! unit {
    ($symbol:expr, $dim:ident, $factor:expr) => {
        UnitDef{symbol: $symbol, dimension: Dimension::$dim, factor: $factor, offset: 0.0}
    };
    ($symbol:expr, $dim:ident, $factor:expr, $offset:expr) => {
        UnitDef{symbol: $symbol, dimension: Dimension::$dim, factor: $factor, offset: $offset}
    };
}

/// Unit table. Symbols are compared after normalization (see `normalize_unit`).
const UNITS: &[UnitDef] = &[
    unit!("", Dimensionless, 1.0),
    unit!("%", Dimensionless, 0.01),

    unit!("m", Length, 1.0),
    unit!("cm", Length, 1e-2),
    unit!("mm", Length, 1e-3),
    unit!("um", Length, 1e-6),
    unit!("km", Length, 1e3),
    unit!("in", Length, 0.0254),
    unit!("ft", Length, 0.3048),

    unit!("m/s", Velocity, 1.0),
    unit!("mm/s", Velocity, 1e-3),
    unit!("cm/s", Velocity, 1e-2),
    unit!("km/h", Velocity, 1.0 / 3.6),
    unit!("ft/s", Velocity, 0.3048),

    unit!("Pa", Pressure, 1.0),
    unit!("kPa", Pressure, 1e3),
    unit!("MPa", Pressure, 1e6),
    unit!("mbar", Pressure, 1e2),
    unit!("bar", Pressure, 1e5),
    unit!("atm", Pressure, 101_325.0),
    unit!("psi", Pressure, 6_894.757_293_168),

    unit!("kg/m3", Density, 1.0),
    unit!("g/cm3", Density, 1e3),
    unit!("kg/l", Density, 1e3),

    unit!("Pa*s", DynamicViscosity, 1.0),
    unit!("mPa*s", DynamicViscosity, 1e-3),
    unit!("kg/m/s", DynamicViscosity, 1.0),
    unit!("kg/(m*s)", DynamicViscosity, 1.0),
    unit!("P", DynamicViscosity, 0.1),
    unit!("cP", DynamicViscosity, 1e-3),

    unit!("m2/s", KinematicViscosity, 1.0),
    unit!("mm2/s", KinematicViscosity, 1e-6),
    unit!("St", KinematicViscosity, 1e-4),
    unit!("cSt", KinematicViscosity, 1e-6),

    unit!("m3/s", VolumetricFlowRate, 1.0),
    unit!("m3/h", VolumetricFlowRate, 1.0 / 3600.0),
    unit!("l/s", VolumetricFlowRate, 1e-3),
    unit!("l/min", VolumetricFlowRate, 1e-3 / 60.0),

    unit!("kg/s", MassFlowRate, 1.0),
    unit!("g/s", MassFlowRate, 1e-3),
    unit!("kg/min", MassFlowRate, 1.0 / 60.0),
    unit!("kg/h", MassFlowRate, 1.0 / 3600.0),

    unit!("K", Temperature, 1.0),
    unit!("degC", Temperature, 1.0, 273.15),
    unit!("°C", Temperature, 1.0, 273.15),
    unit!("degF", Temperature, 5.0 / 9.0, 459.67 * 5.0 / 9.0),
    unit!("°F", Temperature, 5.0 / 9.0, 459.67 * 5.0 / 9.0),

    unit!("W/m2", HeatFlux, 1.0),
    unit!("kW/m2", HeatFlux, 1e3),

    unit!("W/m2/K", HeatTransferCoeff, 1.0),
    unit!("W/(m2*K)", HeatTransferCoeff, 1.0),
    unit!("kW/m2/K", HeatTransferCoeff, 1e3),

    unit!("J/kg/K", SpecificHeat, 1.0),
    unit!("J/(kg*K)", SpecificHeat, 1.0),
    unit!("kJ/kg/K", SpecificHeat, 1e3),
    unit!("kJ/(kg*K)", SpecificHeat, 1e3),

    unit!("kg/mol", MolarMass, 1.0),
    unit!("g/mol", MolarMass, 1e-3),
    unit!("kg/kmol", MolarMass, 1e-3),

    unit!("m2/s2", SpecificEnergy, 1.0),
    unit!("J/kg", SpecificEnergy, 1.0),

    unit!("m2/s3", DissipationRate, 1.0),
    unit!("W/kg", DissipationRate, 1.0),

    unit!("N/m", SurfaceTension, 1.0),
    unit!("mN/m", SurfaceTension, 1e-3),

    unit!("1/s", Frequency, 1.0),
    unit!("s-1", Frequency, 1.0),
    unit!("Hz", Frequency, 1.0),
];

/// Unit handling error type.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    /// The quantity string could not be split into a number and a unit.
    Parse(String),
    /// The unit symbol is not in the unit table.
    UnknownUnit(String),
    /// The unit is known but measures something else.
    Mismatch {
        unit: String,
        expected: Dimension,
        found: Dimension,
    },
}
impl std::fmt::Display for UnitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitError::Parse(text) => write!(f, "- Could not parse quantity \"{}\"", text),
            UnitError::UnknownUnit(unit) => write!(f, "- Unknown unit \"{}\"", unit),
            UnitError::Mismatch{unit, expected, found} => write!(f, "- Unit \"{}\" is a {} unit, expected {}", unit, found, expected),
        }
    }
}

/// Result type for the `units` module.
pub type UnitResult<T> = std::result::Result<T, UnitError>;

/// A unit error tied to the input it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityError {
    /// Which input, e.g. `boundary 'inlet': Velocity`.
    pub context: String,
    pub error: UnitError,
}
impl std::fmt::Display for QuantityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "- In {}:\n{}", self.context, self.error)
    }
}

/// A magnitude and a unit string, as entered by the user.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "QuantityRepr", into = "String")]
pub struct Quantity {
    pub magnitude: f64,
    pub unit: String,
}
impl Quantity {
    /// Create a new quantity.
    pub fn new(magnitude: f64, unit: &str) -> Self {
        Quantity{magnitude, unit: unit.to_string()}
    }

    /// Parse a quantity string such as `"2.5 m/s"`, `"20degC"` or `"0.3"`.
    pub fn parse(text: &str) -> UnitResult<Self> {
        let text = text.trim();
        // Longest leading slice that parses as a number
        let split = (1..=text.len())
            .rev()
            .filter(|&i| text.is_char_boundary(i))
            .find(|&i| text[..i].trim().parse::<f64>().is_ok());
        match split {
            Some(i) => {
                let magnitude = text[..i].trim().parse::<f64>().map_err(|_| UnitError::Parse(text.to_string()))?;
                Ok(Quantity{magnitude, unit: text[i..].trim().to_string()})
            },
            None => Err(UnitError::Parse(text.to_string())),
        }
    }

    /// Dimension measured by the quantity's unit.
    pub fn dimension(&self) -> UnitResult<Dimension> {
        Ok(lookup_unit(&self.unit)?.dimension)
    }

    /// Convert to the SI value of the expected dimension.
    /// A unit measuring a different dimension is an error, never a silent default.
    pub fn to_si(&self, expected: Dimension) -> UnitResult<f64> {
        let unit = lookup_unit(&self.unit)?;
        if unit.dimension != expected {
            return Err(UnitError::Mismatch{unit: self.unit.clone(), expected, found: unit.dimension});
        }
        Ok(self.magnitude * unit.factor + unit.offset)
    }

    /// `to_si`, with the error labelled by where the quantity was entered.
    pub fn si_in(&self, expected: Dimension, context: &str) -> std::result::Result<f64, QuantityError> {
        self.to_si(expected).map_err(|error| QuantityError{context: context.to_string(), error})
    }
}
impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.unit)
        }
    }
}
impl std::str::FromStr for Quantity {
    type Err = UnitError;

    fn from_str(text: &str) -> UnitResult<Self> {
        Quantity::parse(text)
    }
}
impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.to_string()
    }
}

/// Config files may give a bare number, which is read as dimensionless.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Text(String),
    Number(f64),
}
impl TryFrom<QuantityRepr> for Quantity {
    type Error = UnitError;

    fn try_from(repr: QuantityRepr) -> UnitResult<Self> {
        match repr {
            QuantityRepr::Text(text) => Quantity::parse(&text),
            QuantityRepr::Number(magnitude) => Ok(Quantity::new(magnitude, "")),
        }
    }
}

/// Normalize unit spelling: no spaces, no carets, ASCII superscripts and multiplication.
fn normalize_unit(unit: &str) -> String {
    unit.chars()
        .filter(|c| !c.is_whitespace() && *c != '^')
        .map(|c| match c {
            '²' => '2',
            '³' => '3',
            '·' | '⋅' => '*',
            'µ' | 'μ' => 'u',
            c => c,
        })
        .collect()
}

fn lookup_unit(unit: &str) -> UnitResult<&'static UnitDef> {
    let normalized = normalize_unit(unit);
    // Exact match first: "P" and "Pa" differ only by case elsewhere
    UNITS.iter()
        .find(|def| normalize_unit(def.symbol) == normalized)
        .or_else(|| UNITS.iter().find(|def| {
            let symbol = normalize_unit(def.symbol);
            symbol.len() > 1 && symbol.eq_ignore_ascii_case(&normalized)
        }))
        .ok_or_else(|| UnitError::UnknownUnit(unit.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn parses_magnitude_and_unit() {
        let q = Quantity::parse("2.5 m/s").unwrap();
        assert_eq!(q.magnitude, 2.5);
        assert_eq!(q.unit, "m/s");

        let q = Quantity::parse("1e5Pa").unwrap();
        assert_eq!(q.magnitude, 1e5);
        assert_eq!(q.unit, "Pa");

        let q = Quantity::parse("-3").unwrap();
        assert_eq!(q.magnitude, -3.0);
        assert_eq!(q.unit, "");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(Quantity::parse("fast"), Err(UnitError::Parse(_))));
        assert!(matches!(Quantity::parse(""), Err(UnitError::Parse(_))));
    }

    #[test]
    fn converts_to_si() {
        assert!(close(Quantity::parse("101.325 kPa").unwrap().to_si(Dimension::Pressure).unwrap(), 101_325.0));
        assert!(close(Quantity::parse("20 degC").unwrap().to_si(Dimension::Temperature).unwrap(), 293.15));
        assert!(close(Quantity::parse("60 l/min").unwrap().to_si(Dimension::VolumetricFlowRate).unwrap(), 1e-3));
        assert!(close(Quantity::parse("1.8e-5 kg/m^3").unwrap().to_si(Dimension::Density).unwrap(), 1.8e-5));
        assert!(close(Quantity::parse("1 mPa·s").unwrap().to_si(Dimension::DynamicViscosity).unwrap(), 1e-3));
        assert!(close(Quantity::parse("5 %").unwrap().to_si(Dimension::Dimensionless).unwrap(), 0.05));
        assert!(close(Quantity::parse("1 m²/s³").unwrap().to_si(Dimension::DissipationRate).unwrap(), 1.0));
    }

    #[test]
    fn poise_is_not_pascal() {
        assert_eq!(Quantity::parse("1 P").unwrap().dimension().unwrap(), Dimension::DynamicViscosity);
        assert_eq!(Quantity::parse("1 pa").unwrap().dimension().unwrap(), Dimension::Pressure);
    }

    #[test]
    fn mismatch_is_an_error() {
        let q = Quantity::parse("3 m/s").unwrap();
        match q.to_si(Dimension::Pressure) {
            Err(UnitError::Mismatch{expected, found, ..}) => {
                assert_eq!(expected, Dimension::Pressure);
                assert_eq!(found, Dimension::Velocity);
            },
            other => panic!("Expected a mismatch, got {:?}", other),
        }
        assert!(matches!(Quantity::parse("3 furlongs").unwrap().to_si(Dimension::Length), Err(UnitError::UnknownUnit(_))));
    }

    #[test]
    fn bare_numbers_are_dimensionless() {
        let q: Quantity = serde_json::from_str("0.25").unwrap();
        assert_eq!(q.to_si(Dimension::Dimensionless).unwrap(), 0.25);
        assert!(q.to_si(Dimension::Velocity).is_err());

        let q: Quantity = serde_json::from_str("\"4 mm\"").unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"4 mm\"");
    }
}
