/*

known.rs - Preferred unit names for recognized dimensions
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

//! # Known signatures
//!
//! Maps [dimension signatures][DimensionSignature] of recognized physical
//! quantities to a [`PreferredUnit`], so that a result with signature
//! `L^2 M T^-2` can be shown as *J* rather than `m^2·kg/s^2`.

use std::{collections::BTreeMap, str::FromStr};

use once_cell::sync::Lazy;

use crate::dimension::{DimensionFamily, DimensionSignature};

/// # Preferred unit
///
/// Human-readable naming for a recognized signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreferredUnit {
    name: String,
    alternates: Vec<String>,
    description: String,
}

impl PreferredUnit {
    /// Create a new [`PreferredUnit`].
    pub fn new(name: &str, alternates: &[&str], description: &str) -> Self {
        Self {
            name: name.to_owned(),
            alternates: alternates.iter().map(|alt| (*alt).to_owned()).collect(),
            description: description.to_owned(),
        }
    }

    /// Canonical name, e.g. `J`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names, e.g. `Nm`.
    pub fn alternates(&self) -> &[String] {
        &self.alternates
    }

    /// Description of the physical quantity, e.g. `Energy`.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The [`DimensionFamily`] named by the description, if any.
    pub fn family(&self) -> Option<DimensionFamily> {
        DimensionFamily::from_str(&self.description).ok()
    }
}

/// # Known-signature map
///
/// Read-only after construction. Iteration follows signature order, so it is
/// deterministic.
#[derive(Clone, Debug, Default)]
pub struct KnownSignatures {
    map: BTreeMap<DimensionSignature, PreferredUnit>,
}

impl KnownSignatures {
    /// Build a map from `(signature, preferred unit)` pairs.
    ///
    /// If a signature appears more than once, the first entry wins.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (DimensionSignature, PreferredUnit)>,
    {
        let mut map = BTreeMap::new();
        for (signature, preferred) in entries {
            map.entry(signature).or_insert(preferred);
        }
        Self { map }
    }

    /// The built-in map of SI quantities.
    pub fn standard() -> &'static KnownSignatures {
        &STANDARD_SIGNATURES
    }

    /// Look up the preferred unit for a signature.
    pub fn try_get_preferred_unit(&self, signature: &DimensionSignature) -> Option<&PreferredUnit> {
        self.map.get(signature)
    }

    /// Test whether a signature is recognized.
    pub fn is_known(&self, signature: &DimensionSignature) -> bool {
        self.map.contains_key(signature)
    }

    /// Iterate over every recognized signature in order.
    pub fn get_known_signatures(&self) -> impl Iterator<Item = &DimensionSignature> {
        self.map.keys()
    }

    /// The family a signature belongs to, or [`DimensionFamily::Unknown`].
    pub fn family_of(&self, signature: &DimensionSignature) -> DimensionFamily {
        self.try_get_preferred_unit(signature)
            .and_then(PreferredUnit::family)
            .unwrap_or(DimensionFamily::Unknown)
    }

    /// Number of recognized signatures.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Test whether no signatures are recognized.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

macro_rules! known {
    ( $( $family:ident $name:literal [ $( $alt:literal ),* $(,)? ] ),* $(,)? ) => {
        vec![ $(
            (
                DimensionFamily::$family.signature().unwrap_or_default(),
                PreferredUnit::new(
                    $name,
                    &[ $( $alt ),* ],
                    &DimensionFamily::$family.to_string(),
                ),
            ),
        )* ]
    };
}

static STANDARD_SIGNATURES: Lazy<KnownSignatures> = Lazy::new(|| {
    KnownSignatures::new(known! {
        Scalar              "1"     [],
        Length              "m"     ["meter"],
        Mass                "kg"    ["kilogram"],
        Time                "s"     ["second"],
        ElectricCurrent     "A"     ["ampere"],
        Temperature         "K"     ["kelvin"],
        AmountOfSubstance   "mol"   ["mole"],
        LuminousIntensity   "cd"    ["candela"],
        Area                "m²"    ["m^2"],
        Volume              "m³"    ["m^3"],
        Velocity            "m/s"   [],
        Acceleration        "m/s²"  ["m/s^2"],
        Force               "N"     ["kg·m/s^2"],
        Energy              "J"     ["Nm", "N·m"],
        Power               "W"     ["J/s"],
        Pressure            "Pa"    ["N/m^2"],
        Frequency           "Hz"    ["1/s"],
        Momentum            "kg·m/s" ["N·s"],
        Density             "kg/m³" ["kg/m^3"],
        Charge              "C"     ["A·s"],
        Voltage             "V"     ["W/A"],
        Capacitance         "F"     ["C/V"],
        Resistance          "Ω"     ["ohm", "V/A"],
        Inductance          "H"     ["Wb/A"],
        MagneticFlux        "Wb"    ["V·s"],
        MagneticFluxDensity "T"     ["Wb/m^2"],
    })
});

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn energy_is_joules() {
        let known = KnownSignatures::standard();
        let joule = known
            .try_get_preferred_unit(&DimensionSignature::ENERGY)
            .expect("energy is known");
        assert_eq!(joule.name(), "J");
        assert_eq!(joule.alternates(), ["Nm", "N·m"]);
        assert_eq!(joule.description(), "Energy");
        assert_eq!(joule.family(), Some(DimensionFamily::Energy));
    }

    /// Every family with a signature is recognized and maps back to itself.
    #[test]
    fn all_families_known() {
        let known = KnownSignatures::standard();
        for family in DimensionFamily::iter() {
            if let Some(signature) = family.signature() {
                assert!(known.is_known(&signature), "{}", family);
                assert_eq!(known.family_of(&signature), family);
            }
        }
        assert_eq!(known.len(), 26);
    }

    #[test]
    fn unknown_signature() {
        let known = KnownSignatures::standard();
        let odd = DimensionSignature::from(&[5, 0, 0, 0, 3][..]);
        assert!(!known.is_known(&odd));
        assert_eq!(known.try_get_preferred_unit(&odd), None);
        assert_eq!(known.family_of(&odd), DimensionFamily::Unknown);
    }

    #[test]
    fn iteration_is_sorted() {
        let signatures: Vec<_> = KnownSignatures::standard().get_known_signatures().collect();
        let mut sorted = signatures.clone();
        sorted.sort();
        assert_eq!(signatures, sorted);
    }

    #[test]
    fn first_entry_wins() {
        let known = KnownSignatures::new([
            (DimensionSignature::ENERGY, PreferredUnit::new("J", &[], "Energy")),
            (DimensionSignature::ENERGY, PreferredUnit::new("Nm", &[], "Torque")),
        ]);
        assert_eq!(known.len(), 1);
        assert_eq!(
            known.try_get_preferred_unit(&DimensionSignature::ENERGY).map(PreferredUnit::name),
            Some("J")
        );
        // "Torque" is not a family name, and the entry was skipped anyway
        assert_eq!(known.family_of(&DimensionSignature::ENERGY), DimensionFamily::Energy);
    }
}
