/*

math.rs - Arithmetic on dimensioned quantities
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

/*!

# Dimensional math

Multiplication and division of quantities expressed in [resolved units][1].
The result keeps the raw product or quotient of the values, the combined
dimension signature, and the exact combined conversion factor, so
`value × factor` is the result in base units.

```
use dimensional::{dimension::DimensionSignature, math, resolver::UnitResolver};
use rust_decimal::Decimal;

let resolver = UnitResolver::standard();
let newton = resolver.resolve("N").unwrap();
let metre = resolver.resolve("m").unwrap();

let work = math::multiply(&newton, &metre, Decimal::from(10), Decimal::from(2)).unwrap();
assert_eq!(work.value(), Decimal::from(20));
assert_eq!(work.signature(), DimensionSignature::ENERGY);
```

[1]: crate::resolver::NormalizedUnit
*/

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    converter::ConversionError,
    dimension::{DimensionSignature, ExponentOverflow},
    format::{CompositeFormatter, Formatter},
    known::KnownSignatures,
    rational::{ArithmeticError, Rational},
    resolver::NormalizedUnit,
};

/// # Result of dimensional arithmetic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DimensionalResult {
    value: Decimal,
    signature: DimensionSignature,
    factor: Rational,
}

impl DimensionalResult {
    /// Create a result from its parts.
    pub fn new(value: Decimal, signature: DimensionSignature, factor: Rational) -> Self {
        Self {
            value,
            signature,
            factor,
        }
    }

    /// The raw value, in the product of the operand units.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Dimension of the result.
    pub fn signature(&self) -> DimensionSignature {
        self.signature
    }

    /// Factor from the operand units to base units, as a decimal.
    pub fn factor(&self) -> Decimal {
        self.factor.to_decimal()
    }

    /// Factor from the operand units to base units.
    pub fn factor_exact(&self) -> Rational {
        self.factor
    }

    /// Tests whether all units cancelled out.
    pub fn is_scalar(&self) -> bool {
        self.signature.is_dimensionless()
    }

    /// The value expressed in base units, `value × factor`.
    pub fn base_value(&self) -> Result<Decimal, MathError> {
        let numer = Decimal::from(self.factor.numer());
        let denom = Decimal::from(self.factor.denom());
        self.value
            .checked_mul(numer)
            .and_then(|v| v.checked_div(denom))
            .or_else(|| self.value.checked_div(denom).and_then(|v| v.checked_mul(numer)))
            .ok_or(MathError::Overflow)
    }

    /// Express the result in `target`, which must measure the same
    /// dimension.
    pub fn to_unit(&self, target: &NormalizedUnit) -> Result<Decimal, MathError> {
        if target.signature() != self.signature {
            return Err(MathError::IncompatibleUnits(
                self.signature.to_string(),
                target.token().to_string(),
            ));
        }
        Ok(target.converter().from_base(self.base_value()?)?)
    }

    /// Name the result's unit: the preferred unit for a known signature,
    /// otherwise the signature rendered by `formatter`.
    pub fn unit_name(&self, known: &KnownSignatures, formatter: &CompositeFormatter) -> String {
        match known.try_get_preferred_unit(&self.signature) {
            Some(preferred) => preferred.name().to_string(),
            None => formatter.format(&self.signature),
        }
    }

    /// Render the value in base units followed by its unit name.
    ///
    /// Scalars are rendered without a unit. If the base value overflows, the
    /// raw value and factor are shown instead.
    pub fn describe(
        &self,
        precision: usize,
        known: &KnownSignatures,
        formatter: &CompositeFormatter,
    ) -> String {
        let magnitude = match self.base_value() {
            Ok(value) => value.format(precision),
            Err(_) => format!(
                "{} × {}",
                self.value.format(precision),
                self.factor.format(precision)
            ),
        };
        if self.is_scalar() {
            magnitude
        } else {
            format!("{} {}", magnitude, self.unit_name(known, formatter))
        }
    }
}

impl Formatter for DimensionalResult {
    /// Formats the result with the standard signature names and SI tokens.
    fn format(&self, precision: usize) -> String {
        self.describe(
            precision,
            KnownSignatures::standard(),
            &CompositeFormatter::default(),
        )
    }
}

/// Multiply two quantities.
pub fn multiply(
    left: &NormalizedUnit,
    right: &NormalizedUnit,
    left_value: Decimal,
    right_value: Decimal,
) -> Result<DimensionalResult, MathError> {
    Ok(DimensionalResult {
        value: left_value
            .checked_mul(right_value)
            .ok_or(MathError::Overflow)?,
        signature: left.signature().multiply(&right.signature())?,
        factor: combine(
            left.factor_exact(),
            right.factor_exact(),
            Rational::approximating_mul,
        )?,
    })
}

/// Divide one quantity by another.
///
/// ## Errors
///
/// Returns [`MathError::DivideByZero`] if `denominator_value` is zero.
pub fn divide(
    numerator: &NormalizedUnit,
    denominator: &NormalizedUnit,
    numerator_value: Decimal,
    denominator_value: Decimal,
) -> Result<DimensionalResult, MathError> {
    if denominator_value.is_zero() {
        return Err(MathError::DivideByZero);
    }
    Ok(DimensionalResult {
        value: numerator_value
            .checked_div(denominator_value)
            .ok_or(MathError::Overflow)?,
        signature: numerator.signature().divide(&denominator.signature())?,
        factor: combine(
            numerator.factor_exact(),
            denominator.factor_exact(),
            Rational::approximating_div,
        )?,
    })
}

/// Combine two factors exactly, or through [`Decimal`] if the exact result
/// does not fit.
fn combine<F>(lhs: Rational, rhs: Rational, op: F) -> Result<Rational, MathError>
where
    F: Fn(&Rational, &Rational) -> Result<Rational, ArithmeticError>,
{
    op(&lhs, &rhs).map_err(|err| match err {
        ArithmeticError::Overflow => MathError::Overflow,
        other => other.into(),
    })
}

/// Errors raised by [`multiply`] and [`divide`] and by conversions of their results.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MathError {
    /// The divisor value is zero.
    #[error("Division by zero")]
    DivideByZero,

    /// A value or factor does not fit, even through decimal arithmetic.
    #[error("Arithmetic overflow")]
    Overflow,

    /// The result cannot be expressed in the requested unit.
    #[error("Cannot express a quantity of dimension `{0}` in `{1}`")]
    IncompatibleUnits(String, String),

    /// The combined signature has an exponent out of range.
    #[error(transparent)]
    Exponent(#[from] ExponentOverflow),

    /// Exact arithmetic failed for a reason other than overflow.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// Converting the result to another unit failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        catalog::UnitToken, dimension::DimensionFamily, rat_util_macros::rat,
        resolver::UnitResolver,
    };

    fn unit(name: &str) -> NormalizedUnit {
        UnitResolver::standard().resolve(name).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn odd_unit(factor: Rational) -> NormalizedUnit {
        NormalizedUnit::new(
            UnitToken::new("odd").unwrap(),
            factor,
            DimensionFamily::Length,
            DimensionSignature::LENGTH,
        )
        .unwrap()
    }

    #[test]
    fn work() {
        let result = multiply(&unit("N"), &unit("m"), dec("10"), dec("2")).unwrap();
        assert_eq!(result.value(), dec("20"));
        assert_eq!(result.signature(), DimensionSignature::ENERGY);
        assert_eq!(result.factor_exact(), Rational::ONE);
        assert_eq!(result.format(5), "20 J");
    }

    #[test]
    fn cancellation() {
        let result = divide(&unit("m"), &unit("m"), dec("10"), dec("5")).unwrap();
        assert_eq!(result.value(), dec("2"));
        assert!(result.is_scalar());
        assert_eq!(result.factor_exact(), Rational::ONE);
        assert_eq!(result.format(5), "2");
    }

    #[test]
    fn divide_by_zero() {
        assert_eq!(
            divide(&unit("m"), &unit("s"), dec("1"), Decimal::ZERO),
            Err(MathError::DivideByZero)
        );
    }

    #[test]
    fn mixed_units() {
        let result = divide(&unit("km"), &unit("h"), dec("90"), dec("1")).unwrap();
        assert_eq!(result.signature(), DimensionSignature::VELOCITY);
        assert_eq!(result.factor_exact(), rat!(5, 18));
        assert_eq!(result.base_value().unwrap(), dec("25"));
        assert_eq!(result.to_unit(&unit("m/s")).unwrap(), dec("25"));
        assert_eq!(result.to_unit(&unit("mph")).unwrap().round_dp(4), dec("55.9234"));
        assert!(matches!(
            result.to_unit(&unit("kg")),
            Err(MathError::IncompatibleUnits(..))
        ));
    }

    #[test]
    fn naming() {
        let known = KnownSignatures::standard();
        let formatter = CompositeFormatter::default();
        let result = multiply(&unit("N"), &unit("m"), dec("1"), dec("1")).unwrap();
        assert_eq!(result.unit_name(known, &formatter), "J");
        let result = multiply(&unit("m^2"), &unit("m^3"), dec("1"), dec("1")).unwrap();
        assert_eq!(result.unit_name(known, &formatter), "m^5");
    }

    #[test]
    fn factor_overflow_falls_back_to_decimal() {
        let left = odd_unit(Rational::new(5_000_000_029, 7).unwrap());
        let right = odd_unit(Rational::new(5_000_000_039, 11).unwrap());
        let result = multiply(&left, &right, Decimal::ONE, Decimal::ONE).unwrap();
        let factor = result.factor().round();
        assert!(factor > dec("324675320000000000"), "{}", factor);
        assert!(factor < dec("324675340000000000"), "{}", factor);
    }

    #[test]
    fn factor_underflow_is_an_error() {
        let tiny = odd_unit(Rational::new(1, 4_000_000_007).unwrap());
        assert_eq!(
            multiply(&tiny, &tiny, Decimal::ONE, Decimal::ONE),
            Err(MathError::Overflow)
        );
    }
}
