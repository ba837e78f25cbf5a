/*

dimension.rs - Dimension handling for Dimensional
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

//! Dimension handling for Dimensional.
//!
//! Dimensions are how units map to physical quantities. A
//! [`DimensionSignature`] records the exponent of each of the seven SI
//! [base quantities][BaseQuantity]; a newton is `L^1 M^1 T^-2`. Each
//! catalog unit also carries a [`DimensionFamily`], a named tag such as
//! *Force* whose signature is fixed.

use std::ops::Index;

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};
use thiserror::Error;

/// Base quantity/dimension type.
///
/// Each variant represents a [basic physical dimension/quantity][1]. The
/// declaration order is the canonical dimension order shared by the
/// [composite parser][2] and the [formatter][3].
///
/// [1]: https://en.wikipedia.org/wiki/Physical_quantity#Dimensions
/// [2]: crate::parser
/// [3]: crate::format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCountMacro, EnumIter, Display,
)]
pub enum BaseQuantity {
    /// Length, `L`
    Length,
    /// Mass, `M`
    Mass,
    /// Time, `T`
    Time,
    /// Electric current, `I`
    #[strum(to_string = "Electric Current")]
    ElectricCurrent,
    /// Thermodynamic temperature, `Θ`
    Temperature,
    /// Amount of substance, `N`
    #[strum(to_string = "Amount of Substance")]
    AmountOfSubstance,
    /// Luminous intensity, `J`
    #[strum(to_string = "Luminous Intensity")]
    LuminousIntensity,
}

impl BaseQuantity {
    /// Conventional dimension symbol, e.g. `L` for length.
    pub const fn symbol(self) -> &'static str {
        match self {
            BaseQuantity::Length => "L",
            BaseQuantity::Mass => "M",
            BaseQuantity::Time => "T",
            BaseQuantity::ElectricCurrent => "I",
            BaseQuantity::Temperature => "Θ",
            BaseQuantity::AmountOfSubstance => "N",
            BaseQuantity::LuminousIntensity => "J",
        }
    }

    /// Symbol of the coherent SI base unit, e.g. `kg` for mass.
    pub const fn si_token(self) -> &'static str {
        match self {
            BaseQuantity::Length => "m",
            BaseQuantity::Mass => "kg",
            BaseQuantity::Time => "s",
            BaseQuantity::ElectricCurrent => "A",
            BaseQuantity::Temperature => "K",
            BaseQuantity::AmountOfSubstance => "mol",
            BaseQuantity::LuminousIntensity => "cd",
        }
    }
}

/// Dimension signature.
///
/// Specifies a dimension of measure by storing an array of exponents indexed
/// by base quantities. Ordering is lexicographic over the exponents in
/// [`BaseQuantity`] order; it exists for deterministic iteration only.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct DimensionSignature([i8; BaseQuantity::COUNT]);

impl DimensionSignature {
    /// No dimension at all: pure numbers and ratios.
    pub const DIMENSIONLESS: Self = Self::new([0, 0, 0, 0, 0, 0, 0]);
    /// `L`
    pub const LENGTH: Self = Self::new([1, 0, 0, 0, 0, 0, 0]);
    /// `M`
    pub const MASS: Self = Self::new([0, 1, 0, 0, 0, 0, 0]);
    /// `T`
    pub const TIME: Self = Self::new([0, 0, 1, 0, 0, 0, 0]);
    /// `I`
    pub const ELECTRIC_CURRENT: Self = Self::new([0, 0, 0, 1, 0, 0, 0]);
    /// `Θ`
    pub const TEMPERATURE: Self = Self::new([0, 0, 0, 0, 1, 0, 0]);
    /// `N`
    pub const AMOUNT_OF_SUBSTANCE: Self = Self::new([0, 0, 0, 0, 0, 1, 0]);
    /// `J`
    pub const LUMINOUS_INTENSITY: Self = Self::new([0, 0, 0, 0, 0, 0, 1]);

    /// `L²`
    pub const AREA: Self = Self::new([2, 0, 0, 0, 0, 0, 0]);
    /// `L³`
    pub const VOLUME: Self = Self::new([3, 0, 0, 0, 0, 0, 0]);
    /// `L·T⁻¹`
    pub const VELOCITY: Self = Self::new([1, 0, -1, 0, 0, 0, 0]);
    /// `L·T⁻²`
    pub const ACCELERATION: Self = Self::new([1, 0, -2, 0, 0, 0, 0]);
    /// `L·M·T⁻²`
    pub const FORCE: Self = Self::new([1, 1, -2, 0, 0, 0, 0]);
    /// `L²·M·T⁻²`
    pub const ENERGY: Self = Self::new([2, 1, -2, 0, 0, 0, 0]);
    /// `L²·M·T⁻³`
    pub const POWER: Self = Self::new([2, 1, -3, 0, 0, 0, 0]);
    /// `L⁻¹·M·T⁻²`
    pub const PRESSURE: Self = Self::new([-1, 1, -2, 0, 0, 0, 0]);
    /// `T⁻¹`
    pub const FREQUENCY: Self = Self::new([0, 0, -1, 0, 0, 0, 0]);
    /// `L·M·T⁻¹`
    pub const MOMENTUM: Self = Self::new([1, 1, -1, 0, 0, 0, 0]);
    /// `L⁻³·M`
    pub const DENSITY: Self = Self::new([-3, 1, 0, 0, 0, 0, 0]);
    /// `T·I`
    pub const CHARGE: Self = Self::new([0, 0, 1, 1, 0, 0, 0]);
    /// `L²·M·T⁻³·I⁻¹`
    pub const VOLTAGE: Self = Self::new([2, 1, -3, -1, 0, 0, 0]);
    /// `L⁻²·M⁻¹·T⁴·I²`
    pub const CAPACITANCE: Self = Self::new([-2, -1, 4, 2, 0, 0, 0]);
    /// `L²·M·T⁻³·I⁻²`
    pub const RESISTANCE: Self = Self::new([2, 1, -3, -2, 0, 0, 0]);
    /// `L²·M·T⁻²·I⁻²`
    pub const INDUCTANCE: Self = Self::new([2, 1, -2, -2, 0, 0, 0]);
    /// `L²·M·T⁻²·I⁻¹`
    pub const MAGNETIC_FLUX: Self = Self::new([2, 1, -2, -1, 0, 0, 0]);
    /// `M·T⁻²·I⁻¹`
    pub const MAGNETIC_FLUX_DENSITY: Self = Self::new([0, 1, -2, -1, 0, 0, 0]);

    /// Create a signature from exponents in [`BaseQuantity`] order.
    pub const fn new(exponents: [i8; BaseQuantity::COUNT]) -> Self {
        Self(exponents)
    }

    /// Signature of a single base quantity.
    pub fn of(quantity: BaseQuantity) -> Self {
        let mut exponents = [0; BaseQuantity::COUNT];
        exponents[quantity as usize] = 1;
        Self(exponents)
    }

    /// Exponent of one base quantity.
    pub fn exponent(&self, quantity: BaseQuantity) -> i8 {
        self.0[quantity as usize]
    }

    /// All exponents in [`BaseQuantity`] order.
    pub const fn exponents(&self) -> [i8; BaseQuantity::COUNT] {
        self.0
    }

    /// Test whether the signature is dimensionless.
    ///
    /// A quantity with a dimensionless signature is just a numerical value.
    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|x| *x == 0)
    }

    /// Multiply two dimensions by adding their exponents.
    ///
    /// ## Errors
    ///
    /// Returns [`ExponentOverflow`] if an exponent leaves the `i8` range.
    pub fn multiply(&self, other: &Self) -> Result<Self, ExponentOverflow> {
        self.zip_with(other, i8::checked_add)
    }

    /// Divide two dimensions by subtracting their exponents.
    ///
    /// ## Errors
    ///
    /// Returns [`ExponentOverflow`] if an exponent leaves the `i8` range.
    pub fn divide(&self, other: &Self) -> Result<Self, ExponentOverflow> {
        self.zip_with(other, i8::checked_sub)
    }

    /// Raise a dimension to an integer power.
    ///
    /// Effectively multiplies each base quantity's exponent by the power.
    pub fn pow(&self, pow: i32) -> Result<Self, ExponentOverflow> {
        let mut result = Self::DIMENSIONLESS;
        for bq in BaseQuantity::iter() {
            result.0[bq as usize] = i32::from(self[bq])
                .checked_mul(pow)
                .and_then(|exp| i8::try_from(exp).ok())
                .ok_or(ExponentOverflow(bq))?;
        }
        Ok(result)
    }

    fn zip_with<F>(&self, other: &Self, op: F) -> Result<Self, ExponentOverflow>
    where
        F: Fn(i8, i8) -> Option<i8>,
    {
        let mut result = Self::DIMENSIONLESS;
        for bq in BaseQuantity::iter() {
            result.0[bq as usize] = op(self[bq], other[bq]).ok_or(ExponentOverflow(bq))?;
        }
        Ok(result)
    }

    /// Iterate over the base quantities with non-zero exponents.
    pub fn components(&self) -> impl Iterator<Item = (BaseQuantity, i8)> + '_ {
        BaseQuantity::iter()
            .map(move |bq| (bq, self[bq]))
            .filter(|(_, exp)| *exp != 0)
    }

    /// Render the signature with dimension symbols, e.g. `L^2 M T^-2`.
    pub fn to_symbolic(&self) -> String {
        if self.is_dimensionless() {
            return String::from("1");
        }
        self.components()
            .map(|(bq, exp)| match exp {
                1 => bq.symbol().to_owned(),
                _ => format!("{}^{}", bq.symbol(), exp),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&[i8]> for DimensionSignature {
    /// Creates a [`DimensionSignature`] from a slice of [`i8`]'s.
    ///
    /// If the slice is smaller than the number of [base quantities][1], the
    /// exponent for each missing quantity is set to 0. If the slice is larger,
    /// the extra elements are ignored.
    ///
    /// [1]: BaseQuantity
    fn from(src: &[i8]) -> Self {
        let mut new = Self::DIMENSIONLESS;
        let max = src.len().min(BaseQuantity::COUNT);
        new.0[..max].copy_from_slice(&src[..max]);
        new
    }
}

impl From<[i8; BaseQuantity::COUNT]> for DimensionSignature {
    fn from(src: [i8; BaseQuantity::COUNT]) -> Self {
        Self(src)
    }
}

impl Index<BaseQuantity> for DimensionSignature {
    type Output = i8;

    fn index(&self, index: BaseQuantity) -> &Self::Output {
        &self.0[index as usize]
    }
}

/// Raised when a signature exponent leaves the `i8` range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Exponent of {0} is out of range")]
pub struct ExponentOverflow(pub BaseQuantity);

/// # Dimension family
///
/// The named physical quantity a catalog unit measures. Each family except
/// [`Unknown`][Self::Unknown] has a fixed signature. The display names double
/// as the descriptions in the [known-signature map][1], which is how a
/// composite unit's family is recovered from its signature.
///
/// [1]: crate::known
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display,
)]
pub enum DimensionFamily {
    /// Dimensionless quantities, like ratios and percentages.
    Scalar,
    /// Coherent SI unit `m`
    Length,
    /// Coherent SI unit `kg`
    Mass,
    /// Coherent SI unit `s`
    Time,
    /// Coherent SI unit `A`
    #[strum(to_string = "Electric Current")]
    ElectricCurrent,
    /// Coherent SI unit `K`
    Temperature,
    /// Coherent SI unit `mol`
    #[strum(to_string = "Amount of Substance")]
    AmountOfSubstance,
    /// Coherent SI unit `cd`
    #[strum(to_string = "Luminous Intensity")]
    LuminousIntensity,
    /// Coherent SI unit `m²`
    Area,
    /// Coherent SI unit `m³`
    Volume,
    /// Coherent SI unit `m/s`
    Velocity,
    /// Coherent SI unit `m/s²`
    Acceleration,
    /// Coherent SI unit `N`
    Force,
    /// Coherent SI unit `J`
    Energy,
    /// Coherent SI unit `W`
    Power,
    /// Coherent SI unit `Pa`
    Pressure,
    /// Coherent SI unit `Hz`
    Frequency,
    /// Coherent SI unit `kg·m/s`
    Momentum,
    /// Coherent SI unit `kg/m³`
    Density,
    /// Coherent SI unit `C`
    #[strum(to_string = "Electric Charge")]
    Charge,
    /// Coherent SI unit `V`
    Voltage,
    /// Coherent SI unit `F`
    Capacitance,
    /// Coherent SI unit `Ω`
    Resistance,
    /// Coherent SI unit `H`
    Inductance,
    /// Coherent SI unit `Wb`
    #[strum(to_string = "Magnetic Flux")]
    MagneticFlux,
    /// Coherent SI unit `T`
    #[strum(to_string = "Magnetic Flux Density")]
    MagneticFluxDensity,
    /// A signature with no named family, like `m^5`.
    Unknown,
}

impl DimensionFamily {
    /// Signature shared by every unit in the family.
    ///
    /// Returns [`None`] for [`Unknown`][Self::Unknown].
    pub const fn signature(self) -> Option<DimensionSignature> {
        use DimensionFamily::*;
        Some(match self {
            Scalar => DimensionSignature::DIMENSIONLESS,
            Length => DimensionSignature::LENGTH,
            Mass => DimensionSignature::MASS,
            Time => DimensionSignature::TIME,
            ElectricCurrent => DimensionSignature::ELECTRIC_CURRENT,
            Temperature => DimensionSignature::TEMPERATURE,
            AmountOfSubstance => DimensionSignature::AMOUNT_OF_SUBSTANCE,
            LuminousIntensity => DimensionSignature::LUMINOUS_INTENSITY,
            Area => DimensionSignature::AREA,
            Volume => DimensionSignature::VOLUME,
            Velocity => DimensionSignature::VELOCITY,
            Acceleration => DimensionSignature::ACCELERATION,
            Force => DimensionSignature::FORCE,
            Energy => DimensionSignature::ENERGY,
            Power => DimensionSignature::POWER,
            Pressure => DimensionSignature::PRESSURE,
            Frequency => DimensionSignature::FREQUENCY,
            Momentum => DimensionSignature::MOMENTUM,
            Density => DimensionSignature::DENSITY,
            Charge => DimensionSignature::CHARGE,
            Voltage => DimensionSignature::VOLTAGE,
            Capacitance => DimensionSignature::CAPACITANCE,
            Resistance => DimensionSignature::RESISTANCE,
            Inductance => DimensionSignature::INDUCTANCE,
            MagneticFlux => DimensionSignature::MAGNETIC_FLUX,
            MagneticFluxDensity => DimensionSignature::MAGNETIC_FLUX_DENSITY,
            Unknown => return None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::{assert_eq, assert_ne};

    use super::*;

    /// Test multiplication of [signatures][DimensionSignature]
    #[test]
    fn multiplication() {
        let a = DimensionSignature::from(&[1, 2, 3][..]);
        let b = DimensionSignature::from(&[4, 5, 6][..]);
        assert_eq!(a.multiply(&b).unwrap(), DimensionSignature::from(&[5, 7, 9][..]));
        assert_eq!(a.exponents()[..3], [1, 2, 3]);
        assert_eq!(b.exponents()[..3], [4, 5, 6]);
    }

    #[test]
    fn division() {
        let force = DimensionSignature::FORCE;
        let length = DimensionSignature::LENGTH;
        assert_eq!(
            force.divide(&DimensionSignature::MASS).unwrap(),
            DimensionSignature::ACCELERATION
        );
        assert_eq!(
            DimensionSignature::ENERGY.divide(&length).unwrap(),
            force
        );
        assert_eq!(force.divide(&force).unwrap(), DimensionSignature::DIMENSIONLESS);
    }

    /// Test raising a [`DimensionSignature`] to a power
    #[test]
    fn exponentiation() {
        let a = DimensionSignature::from(&[1, 2, 3][..]);
        assert_eq!(a.pow(4).unwrap(), DimensionSignature::from(&[4, 8, 12][..]));
        assert_eq!(a.pow(-1).unwrap(), DimensionSignature::from(&[-1, -2, -3][..]));
        assert_eq!(a.exponents()[..3], [1, 2, 3]);
    }

    #[test]
    fn exponent_overflow() {
        let big = DimensionSignature::from(&[120][..]);
        assert_eq!(
            big.multiply(&big),
            Err(ExponentOverflow(BaseQuantity::Length))
        );
        assert_eq!(
            DimensionSignature::from(&[0, -100][..]).divide(&DimensionSignature::from(&[0, 100][..])),
            Err(ExponentOverflow(BaseQuantity::Mass))
        );
        assert!(DimensionSignature::TIME.pow(200).is_err());
    }

    /// Algebraic laws relating multiply and divide
    #[test]
    fn algebra_laws() {
        let samples = [
            DimensionSignature::DIMENSIONLESS,
            DimensionSignature::ENERGY,
            DimensionSignature::CAPACITANCE,
            DimensionSignature::from(&[-3, 2, 0, 1, -1, 4, 2][..]),
        ];
        let one = DimensionSignature::DIMENSIONLESS;
        for s in samples {
            assert_eq!(s.multiply(&s.divide(&s).unwrap()).unwrap(), s);
            assert_eq!(one.multiply(&s).unwrap(), s);
            assert_eq!(s.divide(&s).unwrap(), one);
            for t in samples {
                assert_eq!(s.multiply(&t).unwrap().divide(&t).unwrap(), s);
                assert_eq!(s.divide(&t).unwrap().multiply(&t).unwrap(), s);
            }
        }
    }

    /// Test checking if a signature is dimensionless
    #[test]
    fn dimensionless() {
        assert!(DimensionSignature::from(&[0; BaseQuantity::COUNT][..]).is_dimensionless());
        assert!(!DimensionSignature::LUMINOUS_INTENSITY.is_dimensionless());
    }

    /// Test equality checking for signatures
    #[test]
    fn equality() {
        let a = DimensionSignature::from(&[1, 2, 3][..]);
        let b = DimensionSignature::from(&[1, 2, 3][..]);
        let c = DimensionSignature::from(&[4, 5, 6][..]);
        let d = DimensionSignature::from(&[3, 2, 1][..]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(d, d);
    }

    #[test]
    fn ordering() {
        assert!(DimensionSignature::MASS < DimensionSignature::LENGTH);
        assert!(DimensionSignature::DIMENSIONLESS < DimensionSignature::LUMINOUS_INTENSITY);
        assert!(DimensionSignature::PRESSURE < DimensionSignature::DIMENSIONLESS);
    }

    #[test]
    fn single_base_quantities() {
        for bq in BaseQuantity::iter() {
            let sig = DimensionSignature::of(bq);
            assert_eq!(sig[bq], 1);
            assert_eq!(sig.components().count(), 1);
        }
        assert_eq!(DimensionSignature::of(BaseQuantity::Time), DimensionSignature::TIME);
    }

    #[test]
    fn symbolic() {
        assert_eq!(DimensionSignature::FORCE.to_symbolic(), "L M T^-2");
        assert_eq!(DimensionSignature::DIMENSIONLESS.to_symbolic(), "1");
    }

    #[test]
    fn family_names_round_trip() {
        for family in DimensionFamily::iter() {
            assert_eq!(DimensionFamily::from_str(&family.to_string()).unwrap(), family);
        }
        assert_eq!(DimensionFamily::MagneticFluxDensity.to_string(), "Magnetic Flux Density");
    }

    #[test]
    fn family_signatures_are_distinct() {
        let signatures: Vec<_> = DimensionFamily::iter()
            .filter_map(DimensionFamily::signature)
            .collect();
        for (i, a) in signatures.iter().enumerate() {
            for b in &signatures[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(DimensionFamily::Unknown.signature(), None);
    }
}
