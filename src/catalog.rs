/*

catalog.rs - Unit catalog for Dimensional
Copyright (C) 2022  Kian Kasad

This file is part of Dimensional.

Dimensional is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, version 3 of the License.

Dimensional is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Dimensional.  If not, see <https://www.gnu.org/licenses/>.

*/

//! # Unit catalog
//!
//! A [`Catalog`] is the data source behind the [resolver][1]: a list of
//! [`UnitDefinition`]s, each naming a canonical unit, its aliases, its
//! [dimension family][DimensionFamily], and how to convert it to that
//! family's base unit.
//!
//! The [standard catalog][Catalog::standard] uses the coherent SI unit of
//! every family as its base (m, kg, s, A, K, mol, cd, N, J, ...). Callers can
//! build their own catalog with different bases; factors are always relative
//! to the base of the unit's own family.
//!
//! [1]: crate::resolver

use std::{
    borrow::Borrow,
    fmt::{self, Display},
};

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    converter::UnitConverter,
    dimension::DimensionFamily,
    rat_util_macros::rat,
    rational::Rational,
};

/// # Unit token
///
/// A non-empty canonical unit identifier. Equality is string equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitToken(String);

impl UnitToken {
    /// Create a new token.
    ///
    /// ## Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] if `name` is empty or
    /// whitespace-only.
    pub fn new(name: &str) -> Result<Self, CatalogError> {
        if name.trim().is_empty() {
            Err(CatalogError::InvalidArgument(
                "unit token must not be empty".to_owned(),
            ))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Get the token's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UnitToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UnitToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// # Unit definition
///
/// One catalog entry.
#[derive(Clone, Debug)]
pub struct UnitDefinition {
    name: UnitToken,
    aliases: Vec<String>,
    factor: Rational,
    family: DimensionFamily,
    converter: UnitConverter,
}

impl UnitDefinition {
    /// Define a unit which is `factor` times its family's base unit.
    ///
    /// ## Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] if the name is empty, the
    /// family is [`DimensionFamily::Unknown`], or the factor is zero.
    pub fn linear<I, S>(
        name: &str,
        family: DimensionFamily,
        factor: Rational,
        aliases: I,
    ) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_family(name, family)?;
        let converter = UnitConverter::linear(factor).map_err(|_| {
            CatalogError::InvalidArgument(format!("unit `{}` has a zero factor", name))
        })?;
        Ok(Self {
            name: UnitToken::new(name)?,
            aliases: aliases.into_iter().map(Into::into).collect(),
            factor,
            family,
            converter,
        })
    }

    /// Define a unit converted by a custom [`UnitConverter`].
    ///
    /// `factor` is the unit's magnitude relative to the base unit, used when
    /// the unit takes part in dimensional arithmetic. For an affine scale it
    /// is the scale without the offset, e.g. `5/9` for degrees Fahrenheit.
    pub fn with_converter<I, S>(
        name: &str,
        family: DimensionFamily,
        factor: Rational,
        converter: UnitConverter,
        aliases: I,
    ) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_family(name, family)?;
        if factor.is_zero() {
            return Err(CatalogError::InvalidArgument(format!(
                "unit `{}` has a zero factor",
                name
            )));
        }
        Ok(Self {
            name: UnitToken::new(name)?,
            aliases: aliases.into_iter().map(Into::into).collect(),
            factor,
            family,
            converter,
        })
    }

    /// Definition from the built-in tables, which are known to be valid.
    fn trusted(
        name: &'static str,
        family: DimensionFamily,
        factor: Rational,
        converter: UnitConverter,
        aliases: &[&'static str],
    ) -> Self {
        Self {
            name: UnitToken(name.to_owned()),
            aliases: aliases.iter().map(|alias| (*alias).to_owned()).collect(),
            factor,
            family,
            converter,
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &UnitToken {
        &self.name
    }

    /// Alternative names, not including the canonical name.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Canonical name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Magnitude relative to the family's base unit.
    pub fn factor(&self) -> Rational {
        self.factor
    }

    /// Dimension family.
    pub fn family(&self) -> DimensionFamily {
        self.family
    }

    /// Conversion strategy.
    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }
}

fn check_family(name: &str, family: DimensionFamily) -> Result<(), CatalogError> {
    if family == DimensionFamily::Unknown {
        return Err(CatalogError::InvalidArgument(format!(
            "unit `{}` must belong to a known family",
            name
        )));
    }
    Ok(())
}

/// # Unit catalog
///
/// An ordered collection of [`UnitDefinition`]s. Order matters only for
/// duplicates: the [resolver][1] keeps the first definition it sees for a
/// name.
///
/// [1]: crate::resolver::UnitResolver
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    definitions: Vec<UnitDefinition>,
}

impl Catalog {
    /// Create a catalog from a list of definitions.
    pub fn new(definitions: Vec<UnitDefinition>) -> Self {
        Self { definitions }
    }

    /// The built-in catalog of SI, metric, and imperial units.
    pub fn standard() -> &'static Catalog {
        &STANDARD_CATALOG
    }

    /// Iterate over the definitions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, UnitDefinition> {
        self.definitions.iter()
    }

    /// Number of definitions, including duplicates.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Test whether the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Find the first definition with `name` as its canonical name or an
    /// alias. This is a linear scan; the resolver keeps an index instead.
    pub fn find(&self, name: &str) -> Option<&UnitDefinition> {
        self.definitions
            .iter()
            .find(|def| def.names().any(|n| n == name))
    }
}

impl FromIterator<UnitDefinition> for Catalog {
    fn from_iter<T: IntoIterator<Item = UnitDefinition>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a UnitDefinition;
    type IntoIter = std::slice::Iter<'a, UnitDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// # Catalog error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A definition or token was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

macro_rules! units {
    ( $( $name:literal $family:ident $n:literal / $d:literal [ $( $alias:literal ),* $(,)? ] ),* $(,)? ) => {
        vec![ $(
            UnitDefinition::trusted(
                $name,
                DimensionFamily::$family,
                rat!($n, $d),
                UnitConverter::Linear(rat!($n, $d)),
                &[ $( $alias ),* ],
            ),
        )* ]
    };
}

/// Degrees Celsius: `K = °C + 273.15`.
fn celsius() -> UnitDefinition {
    let offset = Decimal::new(27315, 2);
    UnitDefinition::trusted(
        "degC",
        DimensionFamily::Temperature,
        Rational::ONE,
        UnitConverter::delegate(
            move |c| c.checked_add(offset),
            move |k| k.checked_sub(offset),
        ),
        &["°C", "celsius"],
    )
}

/// Degrees Fahrenheit: `K = (°F + 459.67) × 5/9`.
fn fahrenheit() -> UnitDefinition {
    let offset = Decimal::new(45967, 2);
    let five = Decimal::from(5);
    let nine = Decimal::from(9);
    UnitDefinition::trusted(
        "degF",
        DimensionFamily::Temperature,
        rat!(5, 9),
        UnitConverter::delegate(
            move |f| f.checked_add(offset)?.checked_mul(five)?.checked_div(nine),
            move |k| k.checked_mul(nine)?.checked_div(five)?.checked_sub(offset),
        ),
        &["°F", "fahrenheit"],
    )
}

static STANDARD_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let mut definitions = units! {
        // Dimensionless (base: 1)
        "1"     Scalar  1 / 1               ["one", "scalar"],
        "%"     Scalar  1 / 100             ["percent"],
        "ppm"   Scalar  1 / 1000000         [],
        "rad"   Scalar  1 / 1               ["radian", "radians"],

        // Length (base: meter)
        "m"     Length  1 / 1               ["meter", "meters", "metre", "metres"],
        "km"    Length  1000 / 1            ["kilometer", "kilometers", "kilometre", "kilometres"],
        "cm"    Length  1 / 100             ["centimeter", "centimeters"],
        "mm"    Length  1 / 1000            ["millimeter", "millimeters"],
        "µm"    Length  1 / 1000000         ["um", "micrometer", "micron"],
        "nm"    Length  1 / 1000000000      ["nanometer", "nanometers"],
        "in"    Length  127 / 5000          ["inch", "inches"],
        "ft"    Length  381 / 1250          ["foot", "feet"],
        "yd"    Length  1143 / 1250         ["yard", "yards"],
        "mi"    Length  201168 / 125        ["mile", "miles"],
        "nmi"   Length  1852 / 1            ["nauticalmile"],

        // Mass (base: kilogram)
        "kg"    Mass    1 / 1               ["kilogram", "kilograms"],
        "g"     Mass    1 / 1000            ["gram", "grams"],
        "mg"    Mass    1 / 1000000         ["milligram", "milligrams"],
        "t"     Mass    1000 / 1            ["tonne", "tonnes"],
        "lb"    Mass    45359237 / 100000000    ["lbs", "pound", "pounds"],
        "oz"    Mass    45359237 / 1600000000   ["ounce", "ounces"],

        // Time (base: second)
        "s"     Time    1 / 1               ["sec", "second", "seconds"],
        "ms"    Time    1 / 1000            ["millisecond", "milliseconds"],
        "µs"    Time    1 / 1000000         ["us", "microsecond", "microseconds"],
        "ns"    Time    1 / 1000000000      ["nanosecond", "nanoseconds"],
        "min"   Time    60 / 1              ["mins", "minute", "minutes"],
        "h"     Time    3600 / 1            ["hr", "hour", "hours"],
        "d"     Time    86400 / 1           ["day", "days"],
        "wk"    Time    604800 / 1          ["week", "weeks"],

        // Electric current (base: ampere)
        "A"     ElectricCurrent 1 / 1       ["amp", "amps", "ampere", "amperes"],
        "mA"    ElectricCurrent 1 / 1000    ["milliampere", "milliamperes"],
        "kA"    ElectricCurrent 1000 / 1    ["kiloampere"],

        // Temperature (base: kelvin); affine scales are added below
        "K"     Temperature 1 / 1           ["kelvin"],
        "degR"  Temperature 5 / 9           ["°R", "rankine"],

        // Amount of substance (base: mole)
        "mol"   AmountOfSubstance 1 / 1     ["mole", "moles"],
        "mmol"  AmountOfSubstance 1 / 1000  ["millimole"],
        "kmol"  AmountOfSubstance 1000 / 1  ["kilomole"],

        // Luminous intensity (base: candela)
        "cd"    LuminousIntensity 1 / 1     ["candela", "candelas"],

        // Area (base: square meter)
        "m²"    Area    1 / 1               ["m2", "sqm"],
        "cm²"   Area    1 / 10000           ["cm2"],
        "km²"   Area    1000000 / 1         ["km2"],
        "ha"    Area    10000 / 1           ["hectare", "hectares"],
        "acre"  Area    40468564224 / 10000000  ["acres"],
        "ft²"   Area    9290304 / 100000000 ["ft2", "sqft"],
        "in²"   Area    16129 / 25000000    ["in2", "sqin"],

        // Volume (base: cubic meter)
        "m³"    Volume  1 / 1               ["m3", "cbm"],
        "L"     Volume  1 / 1000            ["l", "liter", "liters", "litre", "litres"],
        "mL"    Volume  1 / 1000000         ["ml", "milliliter", "milliliters"],
        "cm³"   Volume  1 / 1000000         ["cm3", "cc"],
        "gal"   Volume  3785411784 / 1000000000000  ["gallon", "gallons"],

        // Velocity (base: meter per second)
        "m/s"   Velocity    1 / 1           ["mps"],
        "km/h"  Velocity    5 / 18          ["kph", "kmh"],
        "mph"   Velocity    1397 / 3125     ["mi/h"],
        "kn"    Velocity    463 / 900       ["knot", "knots"],
        "ft/s"  Velocity    381 / 1250      ["fps"],

        // Acceleration (base: meter per second squared)
        "m/s²"  Acceleration    1 / 1       ["m/s2", "mps2"],
        "gn"    Acceleration    196133 / 20000  ["gee"],
        "Gal"   Acceleration    1 / 100     ["galileo"],

        // Force (base: newton)
        "N"     Force   1 / 1               ["newton", "newtons"],
        "kN"    Force   1000 / 1            ["kilonewton", "kilonewtons"],
        "dyn"   Force   1 / 100000          ["dyne", "dynes"],
        "lbf"   Force   44482216152605 / 10000000000000 ["poundforce"],
        "kgf"   Force   196133 / 20000      ["kilogramforce"],

        // Energy (base: joule)
        "J"     Energy  1 / 1               ["joule", "joules"],
        "kJ"    Energy  1000 / 1            ["kilojoule", "kilojoules"],
        "MJ"    Energy  1000000 / 1         ["megajoule", "megajoules"],
        "Nm"    Energy  1 / 1               ["N·m", "newtonmeter", "newtonmeters"],
        "Wh"    Energy  3600 / 1            ["watthour", "watthours"],
        "kWh"   Energy  3600000 / 1         ["kilowatthour", "kilowatthours"],
        "cal"   Energy  523 / 125           ["calorie", "calories"],
        "kcal"  Energy  4184 / 1            ["Cal", "kilocalorie", "kilocalories"],
        "BTU"   Energy  105505585262 / 100000000    ["btu"],
        "erg"   Energy  1 / 10000000        ["ergs"],

        // Power (base: watt)
        "W"     Power   1 / 1               ["watt", "watts"],
        "mW"    Power   1 / 1000            ["milliwatt", "milliwatts"],
        "kW"    Power   1000 / 1            ["kilowatt", "kilowatts"],
        "MW"    Power   1000000 / 1         ["megawatt", "megawatts"],
        "hp"    Power   74569987158227022 / 100000000000000 ["horsepower"],

        // Pressure (base: pascal)
        "Pa"    Pressure    1 / 1           ["pascal", "pascals"],
        "kPa"   Pressure    1000 / 1        ["kilopascal", "kilopascals"],
        "MPa"   Pressure    1000000 / 1     ["megapascal", "megapascals"],
        "bar"   Pressure    100000 / 1      ["bars"],
        "mbar"  Pressure    100 / 1         ["millibar", "millibars"],
        "atm"   Pressure    101325 / 1      ["atmosphere", "atmospheres"],
        "Torr"  Pressure    101325 / 760    ["torr"],
        "psi"   Pressure    1112055403815125 / 161290000000 [],

        // Frequency (base: hertz)
        "Hz"    Frequency   1 / 1           ["hertz"],
        "kHz"   Frequency   1000 / 1        ["kilohertz"],
        "MHz"   Frequency   1000000 / 1     ["megahertz"],
        "GHz"   Frequency   1000000000 / 1  ["gigahertz"],
        "rpm"   Frequency   1 / 60          [],

        // Momentum (base: kilogram meter per second)
        "kg·m/s"    Momentum    1 / 1       ["kg*m/s", "N·s", "Ns"],

        // Density (base: kilogram per cubic meter)
        "kg/m³"     Density     1 / 1       ["kg/m3"],
        "g/cm³"     Density     1000 / 1    ["g/cm3", "g/cc"],

        // Electric charge (base: coulomb)
        "C"     Charge  1 / 1               ["coulomb", "coulombs"],
        "mAh"   Charge  18 / 5              ["milliamphour"],
        "Ah"    Charge  3600 / 1            ["amphour"],

        // Voltage (base: volt)
        "V"     Voltage 1 / 1               ["volt", "volts"],
        "mV"    Voltage 1 / 1000            ["millivolt", "millivolts"],
        "kV"    Voltage 1000 / 1            ["kilovolt", "kilovolts"],

        // Capacitance (base: farad)
        "F"     Capacitance 1 / 1           ["farad", "farads"],
        "µF"    Capacitance 1 / 1000000     ["uF", "microfarad"],
        "nF"    Capacitance 1 / 1000000000  ["nanofarad"],
        "pF"    Capacitance 1 / 1000000000000   ["picofarad"],

        // Resistance (base: ohm)
        "Ω"     Resistance  1 / 1           ["ohm", "ohms"],
        "kΩ"    Resistance  1000 / 1        ["kohm", "kiloohm"],
        "MΩ"    Resistance  1000000 / 1     ["Mohm", "megaohm"],

        // Inductance (base: henry)
        "H"     Inductance  1 / 1           ["henry", "henries"],
        "mH"    Inductance  1 / 1000        ["millihenry"],
        "µH"    Inductance  1 / 1000000     ["uH", "microhenry"],

        // Magnetic flux (base: weber)
        "Wb"    MagneticFlux    1 / 1       ["weber", "webers"],
        "Mx"    MagneticFlux    1 / 100000000   ["maxwell"],

        // Magnetic flux density (base: tesla)
        "T"     MagneticFluxDensity 1 / 1   ["tesla", "teslas"],
        "mT"    MagneticFluxDensity 1 / 1000    ["millitesla"],
        "G"     MagneticFluxDensity 1 / 10000   ["gauss"],
    };
    definitions.push(celsius());
    definitions.push(fahrenheit());
    Catalog::new(definitions)
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn token_must_not_be_empty() {
        assert!(UnitToken::new("").is_err());
        assert!(UnitToken::new("  ").is_err());
        assert_eq!(UnitToken::new("kg").unwrap().as_str(), "kg");
    }

    #[test]
    fn linear_definition_validation() {
        assert!(UnitDefinition::linear("", DimensionFamily::Length, Rational::ONE, ["x"]).is_err());
        assert!(
            UnitDefinition::linear("zero", DimensionFamily::Length, Rational::ZERO, [""; 0])
                .is_err()
        );
        assert!(
            UnitDefinition::linear("what", DimensionFamily::Unknown, Rational::ONE, [""; 0])
                .is_err()
        );
        let def = UnitDefinition::linear("ft", DimensionFamily::Length, rat!(381, 1250), ["foot"])
            .unwrap();
        assert_eq!(def.names().collect::<Vec<_>>(), vec!["ft", "foot"]);
        assert!(def.converter().is_exact());
    }

    /// Every family in the standard catalog has exactly one base unit first.
    #[test]
    fn standard_bases() {
        let catalog = Catalog::standard();
        for family in DimensionFamily::iter().filter(|f| *f != DimensionFamily::Unknown) {
            let first = catalog.iter().find(|def| def.family() == family);
            let first = first.unwrap_or_else(|| panic!("no units for {}", family));
            assert_eq!(first.factor(), Rational::ONE, "{}", family);
            assert!(first.converter().is_exact(), "{}", family);
        }
    }

    /// No two standard definitions claim the same name.
    #[test]
    fn standard_names_unique() {
        let mut seen = HashSet::new();
        for def in Catalog::standard() {
            for name in def.names() {
                assert!(seen.insert(name.to_owned()), "duplicate name `{}`", name);
            }
        }
    }

    #[test]
    fn standard_lookup() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.find("inches").unwrap().name().as_str(), "in");
        assert_eq!(catalog.find("psi").unwrap().factor().to_decimal().round_dp(6).to_string(), "6894.757293");
        assert!(catalog.find("furlong").is_none());
        assert!(!catalog.find("degC").unwrap().converter().is_exact());
    }
}
